use super::*;
use alloc::string::ToString;
use alloc::vec;
use alloc::vec::Vec;
use hex_literal::hex;

fn decode(data: &[u8]) -> (Vec<Event>, Status) {
    let mut decoder = Decoder::new(SliceSource::new(data));
    let mut events: Vec<Event> = Vec::new();
    let status = decoder.run(&mut events);
    (events, status)
}

fn decode_ok(data: &[u8]) -> Vec<Event> {
    let (events, status) = decode(data);
    assert_eq!(status, Status::NeedMoreData);
    events
}

#[test]
fn rfc_integers() {
    // RFC 8949, Appendix A
    assert_eq!(decode_ok(&hex!("00")), vec![Event::Integer(0)]);
    assert_eq!(decode_ok(&hex!("17")), vec![Event::Integer(23)]);
    assert_eq!(decode_ok(&hex!("1818")), vec![Event::Integer(24)]);
    assert_eq!(decode_ok(&hex!("1903e8")), vec![Event::Integer(1000)]);
    assert_eq!(decode_ok(&hex!("1a000f4240")), vec![Event::Integer(1000000)]);
    assert_eq!(
        decode_ok(&hex!("1b000000e8d4a51000")),
        vec![Event::ExtraInteger(1000000000000, Sign::Positive)]
    );
    assert_eq!(
        decode_ok(&hex!("1bffffffffffffffff")),
        vec![Event::ExtraInteger(u64::MAX, Sign::Positive)]
    );
    assert_eq!(decode_ok(&hex!("20")), vec![Event::Integer(-1)]);
    assert_eq!(decode_ok(&hex!("29")), vec![Event::Integer(-10)]);
    assert_eq!(decode_ok(&hex!("3863")), vec![Event::Integer(-100)]);
    assert_eq!(decode_ok(&hex!("3903e7")), vec![Event::Integer(-1000)]);
    assert_eq!(
        decode_ok(&hex!("3bffffffffffffffff")),
        vec![Event::ExtraInteger(u64::MAX, Sign::Negative)]
    );
}

#[test]
fn negative_500() {
    // -1 - 499
    assert_eq!(decode_ok(&hex!("3901f3")), vec![Event::Integer(-500)]);
}

#[test]
fn thirty_two_bit_boundaries() {
    assert_eq!(
        decode_ok(&hex!("1a7fffffff")),
        vec![Event::Integer(i32::MAX as i64)]
    );
    assert_eq!(
        decode_ok(&hex!("1a80000000")),
        vec![Event::ExtraInteger(0x80000000, Sign::Positive)]
    );
    assert_eq!(
        decode_ok(&hex!("3a7ffffffe")),
        vec![Event::Integer(i32::MIN as i64 + 1)]
    );
    assert_eq!(
        decode_ok(&hex!("3a7fffffff")),
        vec![Event::Integer(i32::MIN as i64)]
    );
    assert_eq!(
        decode_ok(&hex!("3a80000000")),
        vec![Event::ExtraInteger(0x80000000, Sign::Negative)]
    );
}

#[test]
fn embedded_array_counts() {
    for c in 0..24u8 {
        assert_eq!(decode_ok(&[0x80 | c]), vec![Event::Array(c as u64)]);
    }
}

#[test]
fn wide_container_counts() {
    assert_eq!(decode_ok(&hex!("9903e8")), vec![Event::Array(1000)]);
    assert_eq!(decode_ok(&hex!("9a000003e8")), vec![Event::Array(1000)]);
    assert_eq!(decode_ok(&hex!("b818")), vec![Event::Map(24)]);
}

#[test]
fn containers_are_not_descended() {
    assert_eq!(
        decode_ok(&hex!("8301820203820405")),
        vec![
            Event::Array(3),
            Event::Integer(1),
            Event::Array(2),
            Event::Integer(2),
            Event::Integer(3),
            Event::Array(2),
            Event::Integer(4),
            Event::Integer(5),
        ]
    );
    assert_eq!(
        decode_ok(&hex!("a26161016162820203")),
        vec![
            Event::Map(2),
            Event::String("a".to_string()),
            Event::Integer(1),
            Event::String("b".to_string()),
            Event::Array(2),
            Event::Integer(2),
            Event::Integer(3),
        ]
    );
}

#[test]
fn strings() {
    assert_eq!(decode_ok(&hex!("40")), vec![Event::Bytes(Vec::new())]);
    assert_eq!(
        decode_ok(&hex!("4401020304")),
        vec![Event::Bytes(vec![1, 2, 3, 4])]
    );
    assert_eq!(decode_ok(&hex!("60")), vec![Event::String("".to_string())]);
    assert_eq!(
        decode_ok(&hex!("6449455446")),
        vec![Event::String("IETF".to_string())]
    );
    assert_eq!(
        decode_ok(&hex!("62c3bc")),
        vec![Event::String("\u{00fc}".to_string())]
    );
    assert_eq!(
        decode_ok(&hex!("5803010203")),
        vec![Event::Bytes(vec![1, 2, 3])]
    );
    assert_eq!(
        decode_ok(&hex!("790003616263")),
        vec![Event::String("abc".to_string())]
    );
}

#[test]
fn invalid_utf8_freezes() {
    let (events, status) = decode(&hex!("62c328 01"));
    assert_eq!(status, Status::Failed);
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], Event::Error(Error::InvalidUtf8(_))));

    // Later strings in the same stream are never delivered
    let mut decoder = Decoder::new(StreamBuffer::new());
    let mut events: Vec<Event> = Vec::new();
    decoder.source_mut().feed(&hex!("6161 62c328"));
    assert_eq!(decoder.run(&mut events), Status::Failed);
    decoder.source_mut().feed(&hex!("6162"));
    assert_eq!(decoder.run(&mut events), Status::Failed);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0], Event::String("a".to_string()));
    assert!(matches!(events[1], Event::Error(Error::InvalidUtf8(_))));
    assert_eq!(decoder.source().len(), 2);
}

#[test]
fn tags() {
    assert_eq!(
        decode_ok(&hex!("c11a514b67b0")),
        vec![Event::Tag(1), Event::Integer(1363896240)]
    );
    assert_eq!(decode_ok(&hex!("d818")), vec![Event::Tag(24)]);
    assert_eq!(decode_ok(&hex!("d90100")), vec![Event::Tag(256)]);
    assert_eq!(decode_ok(&hex!("da00010000")), vec![Event::Tag(65536)]);
    assert_eq!(
        decode_ok(&hex!("db0000000100000000")),
        vec![Event::ExtraTag(1 << 32)]
    );
}

#[test]
fn simple_and_floats() {
    assert_eq!(
        decode_ok(&hex!("f4 f5 f6 f7 f0 f8ff")),
        vec![
            Event::Bool(false),
            Event::Bool(true),
            Event::Null,
            Event::Undefined,
            Event::Special(16),
            Event::Special(255),
        ]
    );
    assert_eq!(
        decode_ok(&hex!("f93c00 f9c400 fa47c35000 fb3ff199999999999a")),
        vec![
            Event::Half(1.0),
            Event::Half(-4.0),
            Event::Float(100000.0),
            Event::Double(1.1),
        ]
    );
    assert_eq!(
        decode_ok(&hex!("f97c00 faff800000")),
        vec![Event::Half(f32::INFINITY), Event::Float(f32::NEG_INFINITY)]
    );
}

#[test]
fn resumes_after_short_payload() {
    let mut decoder = Decoder::new(StreamBuffer::new());
    let mut events: Vec<Event> = Vec::new();

    decoder.source_mut().feed(&hex!("45 010203"));
    assert_eq!(decoder.run(&mut events), Status::NeedMoreData);
    assert!(events.is_empty());
    assert_eq!(decoder.state(), State::ByteData(5));
    assert_eq!(decoder.source().len(), 3);

    // Nothing changes while still short
    assert_eq!(decoder.step(&mut events), Step::Pending);
    assert_eq!(decoder.source().len(), 3);

    decoder.source_mut().feed(&hex!("0405"));
    assert_eq!(decoder.run(&mut events), Status::NeedMoreData);
    assert_eq!(events, vec![Event::Bytes(vec![1, 2, 3, 4, 5])]);
    assert!(decoder.is_idle());
    assert!(decoder.source().is_empty());
}

#[test]
fn resumes_in_length_field() {
    let mut decoder = Decoder::new(StreamBuffer::new());
    let mut events: Vec<Event> = Vec::new();

    decoder.source_mut().feed(&hex!("1a0001"));
    assert_eq!(decoder.run(&mut events), Status::NeedMoreData);
    assert_eq!(decoder.state(), State::Unsigned(Field::Four));
    assert_eq!(decoder.source().len(), 2);

    decoder.source_mut().feed(&hex!("86a0"));
    decoder.run(&mut events);
    assert_eq!(events, vec![Event::Integer(100000)]);
}

#[test]
fn byte_at_a_time_matches_whole() {
    let data = hex!(
        "a3 6161 83 01 3901f3 c1 1a514b67b0
         4401020304 82 f93e00 fb3ff199999999999a
         6162 a1 6449455446 f5"
    );
    let whole = decode_ok(&data);

    let mut decoder = Decoder::new(StreamBuffer::new());
    let mut events: Vec<Event> = Vec::new();
    for b in data {
        decoder.source_mut().feed(&[b]);
        assert_eq!(decoder.run(&mut events), Status::NeedMoreData);
    }
    assert!(decoder.is_idle());
    assert_eq!(events, whole);
    assert_eq!(decoder.source().consumed(), data.len());
}

#[test]
fn reserved_minors_freeze() {
    for major in 0..8u8 {
        for minor in 28..=31u8 {
            let data = [(major << 5) | minor, 0x01, 0x02];
            let mut decoder = Decoder::new(StreamBuffer::new());
            decoder.source_mut().feed(&data);

            let mut events: Vec<Event> = Vec::new();
            assert_eq!(decoder.run(&mut events), Status::Failed);
            assert!(decoder.is_frozen());
            assert_eq!(events.len(), 1);
            assert!(matches!(&events[0], Event::Error(e) if e.is_format_error()));

            // Frozen is absorbing: no reads, no callbacks
            decoder.source_mut().feed(&hex!("0102"));
            assert_eq!(decoder.run(&mut events), Status::Failed);
            assert_eq!(decoder.step(&mut events), Step::Frozen);
            assert_eq!(events.len(), 1);
            assert_eq!(decoder.source().len(), 4);
        }
    }
}

#[test]
fn eight_byte_lengths_are_unsupported() {
    for (data, major) in [
        (hex!("5b0000000000000001"), MajorType::ByteString),
        (hex!("7b0000000000000001"), MajorType::Utf8String),
        (hex!("9b0000000000000001"), MajorType::Array),
        (hex!("bb0000000000000001"), MajorType::Map),
    ] {
        let (events, status) = decode(&data);
        assert_eq!(status, Status::Failed);
        assert_eq!(events, vec![Event::Error(Error::LengthOverflow(major))]);
    }
}

#[test]
fn allocation_limit() {
    let data = hex!("45 0102030405");
    let mut decoder = Decoder::with_limits(
        SliceSource::new(&data),
        Limits::default().with_max_length(4),
    );
    let mut events: Vec<Event> = Vec::new();
    assert_eq!(decoder.run(&mut events), Status::Failed);
    assert_eq!(events, vec![Event::Error(Error::AllocationLimit(5, 4))]);

    let data = hex!("7a00010000");
    let mut decoder = Decoder::with_limits(
        SliceSource::new(&data),
        Limits::default().with_max_length(1024),
    );
    let mut events: Vec<Event> = Vec::new();
    assert_eq!(decoder.run(&mut events), Status::Failed);
    assert_eq!(events, vec![Event::Error(Error::AllocationLimit(65536, 1024))]);
}

#[test]
fn pending_on_empty() {
    let mut decoder = Decoder::new(SliceSource::new(&[]));
    let mut events: Vec<Event> = Vec::new();
    assert_eq!(decoder.step(&mut events), Step::Pending);
    assert_eq!(decoder.state(), State::Head);
    assert!(events.is_empty());
}

#[derive(Default)]
struct Counter {
    floats: Vec<f32>,
    items: usize,
    errors: usize,
}

impl Listener for Counter {
    fn on_integer(&mut self, _: i64) {
        self.items += 1
    }
    fn on_extra_integer(&mut self, _: u64, _: Sign) {
        self.items += 1
    }
    fn on_bytes(&mut self, _: Vec<u8>) {
        self.items += 1
    }
    fn on_string(&mut self, _: alloc::string::String) {
        self.items += 1
    }
    fn on_array(&mut self, _: u64) {
        self.items += 1
    }
    fn on_map(&mut self, _: u64) {
        self.items += 1
    }
    fn on_tag(&mut self, _: u64) {
        self.items += 1
    }
    fn on_extra_tag(&mut self, _: u64) {
        self.items += 1
    }
    fn on_bool(&mut self, _: bool) {
        self.items += 1
    }
    fn on_null(&mut self) {
        self.items += 1
    }
    fn on_undefined(&mut self) {
        self.items += 1
    }
    fn on_special(&mut self, _: u8) {
        self.items += 1
    }
    fn on_float(&mut self, value: f32) {
        self.floats.push(value)
    }
    fn on_double(&mut self, _: f64) {
        self.items += 1
    }
    fn on_error(&mut self, _: &Error) {
        self.errors += 1
    }
}

#[test]
fn half_defaults_to_float() {
    let data = hex!("82 f93e00 fa3fc00000 1c");
    let mut decoder = Decoder::new(SliceSource::new(&data));
    let mut counter = Counter::default();
    assert_eq!(decoder.run(&mut counter), Status::Failed);
    assert_eq!(counter.floats, vec![1.5, 1.5]);
    assert_eq!(counter.items, 1);
    assert_eq!(counter.errors, 1);
}

#[test]
fn event_children() {
    assert_eq!(Event::Array(3).children(), 3);
    assert_eq!(Event::Map(2).children(), 4);
    assert_eq!(Event::Tag(1).children(), 1);
    assert_eq!(Event::Integer(7).children(), 0);
}
