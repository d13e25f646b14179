#![no_main]

use hardy_cbor_stream::{Decoder, Event, SliceSource, StreamBuffer};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut whole: Vec<Event> = Vec::new();
    Decoder::new(SliceSource::new(data)).run(&mut whole);

    // Split at a data-dependent point; resumption must not change the events
    let split = data.first().map_or(0, |b| *b as usize % (data.len() + 1));
    let mut decoder = Decoder::new(StreamBuffer::new());
    let mut chunked: Vec<Event> = Vec::new();
    decoder.source_mut().feed(&data[..split]);
    decoder.run(&mut chunked);
    decoder.source_mut().feed(&data[split..]);
    decoder.run(&mut chunked);

    assert_eq!(format!("{whole:?}"), format!("{chunked:?}"));
});
