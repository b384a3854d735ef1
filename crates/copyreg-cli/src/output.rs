//! JSON output formatting

use copyreg_core::{Thresholds, Verdict};
use serde::Serialize;

/// Exit status for a rejected candidate
pub const EXIT_REJECTED: i32 = 2;

#[derive(Debug, Serialize)]
pub struct CheckOutput {
    pub candidate: String,
    pub corpus_size: usize,
    pub thresholds: Thresholds,
    pub accepted: bool,
    pub summary: String,
    #[serde(flatten)]
    pub verdict: Verdict,
}

impl CheckOutput {
    pub fn new(
        candidate: String,
        corpus_size: usize,
        thresholds: Thresholds,
        verdict: Verdict,
    ) -> Self {
        Self {
            candidate,
            corpus_size,
            thresholds,
            accepted: verdict.is_accepted(),
            summary: verdict.summary(),
            verdict,
        }
    }

    pub fn exit_code(&self) -> i32 {
        if self.accepted {
            0
        } else {
            EXIT_REJECTED
        }
    }
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing output: {}", e),
    }
}
