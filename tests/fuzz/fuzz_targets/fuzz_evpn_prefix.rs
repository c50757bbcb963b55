#![no_main]
use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use obmp_parsed::{EvpnPrefix, MsgBusParser, SchemaVersion};

#[derive(Arbitrary, Debug)]
struct Input<'a> {
    major: u8,
    minor: u8,
    max_lines: u8,
    payload: &'a str,
}

fuzz_target!(|input: Input| {
    let max_lines = input.max_lines as usize + 1;
    let parser = MsgBusParser::new().with_max_lines(max_lines);
    let version = SchemaVersion::new(input.major, input.minor);

    let batch = parser
        .decode::<EvpnPrefix>(input.payload, version)
        .expect("registry always has a base layout");

    let non_empty = input
        .payload
        .split_terminator('\n')
        .take(max_lines)
        .filter(|l| l.len() > 3)
        .count();
    assert_eq!(batch.records.len(), non_empty);
});
