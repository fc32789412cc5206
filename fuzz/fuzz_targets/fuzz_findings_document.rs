//! Fuzz target for findings document parsing and report generation.
//!
//! Any document that parses must compose without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use lsr_common::FindingsDocument;
use lsr_core::ReportComposer;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(doc) = FindingsDocument::from_json(text) {
        let _ = ReportComposer::default().generate(&doc.into_findings());
    }
});
