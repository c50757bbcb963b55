#![no_main]
use libfuzzer_sys::fuzz_target;
use obmp_parsed::Coercer;

const COERCERS: [Coercer; 8] = [
    Coercer::Required,
    Coercer::NullAsEmpty,
    Coercer::Integer,
    Coercer::Long,
    Coercer::IntegerEmptyAsZero,
    Coercer::LongEmptyAsZero,
    Coercer::Flag {
        literal: "add",
        matched: false,
    },
    Coercer::Timestamp,
];

fuzz_target!(|data: &str| {
    for coercer in COERCERS {
        let _ = coercer.coerce(&[data]);
    }
    let (rd, rd_type) = data.split_once('\t').unwrap_or((data, ""));
    let _ = Coercer::RouteDistinguisher.coerce(&[rd, rd_type]);
});
