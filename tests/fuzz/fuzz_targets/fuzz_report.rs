#![no_main]
use libfuzzer_sys::fuzz_target;
use pipecover::report::{generate_report_from_bytes, Configuration};

fuzz_target!(|data: &[u8]| {
    // Whatever parses must aggregate without overflow or panics.
    let conf = Configuration {
        exclusions: vec!["vendor/**".to_string()],
        ..Default::default()
    };
    if let Ok(report) = generate_report_from_bytes(data, &conf) {
        assert!(report.total.missing_blocks <= report.total.blocks);
        assert!(report.total.missing_stmts <= report.total.stmts);
    }
});
