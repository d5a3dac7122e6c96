//! Averages the `"AverageLatency"` field across an NDJSON benchmark log.

pub mod decoder;
pub mod error;
pub mod metrics;
pub mod report;

pub use decoder::{decode_line, DecodedLine, LineDecoder, LineOutcome, SkipReason};
pub use error::ReportError;
pub use metrics::{mean, Mean, MeanValue, LATENCY_FIELD};
pub use report::{summarize, summarize_file, Report, SkipCounts};
