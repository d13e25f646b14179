#![no_main]

use hardy_cbor_stream::{Reader, SliceSource};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut reader = Reader::new(SliceSource::new(data));
    while reader.has_more() {
        let before = reader.source().position();
        match reader.skip() {
            Ok(()) => assert!(reader.source().position() > before),
            Err(_) => {
                assert_eq!(reader.source().position(), before);
                break;
            }
        }
    }
    assert!(reader.source().position() <= data.len());

    // A tag and its content never measure shorter than the tag alone
    let reader = Reader::new(SliceSource::new(data));
    if let (Ok(item), Ok(tagged)) = (reader.item_len(), reader.tagged_len()) {
        assert!(tagged >= item);
    }
});
