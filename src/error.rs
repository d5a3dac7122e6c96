use std::io;
use std::path::PathBuf;

// ─── Unified error type ──────────────────────────────────────────

/// Fatal failures of a report run. Bad records are not errors; they are
/// counted as skips (see [`crate::decoder::SkipReason`]).
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("read failed at line {line_no}: {source}")]
    Read {
        line_no: u64,
        #[source]
        source: io::Error,
    },
}
