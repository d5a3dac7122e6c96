//! Line-stream decoder for NDJSON benchmark output.
//!
//! Every input line is classified into a [`LineOutcome`]: either a latency
//! sample, or a skip together with the reason it was skipped. Nothing here
//! fails on bad records; only the underlying reader can produce errors.
//!
//! Lines end at `\n`, `\r\n` or a bare `\r`. A raw carriage return cannot
//! occur inside a JSON document, so splitting on it never cuts a record.

use std::io::{self, BufRead};

use serde::Deserialize;
use serde_json::Value;

use crate::metrics::LATENCY_FIELD;

// ─── Public types ────────────────────────────────────────────────

/// Why a line did not contribute a sample.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    #[error("blank line")]
    Blank,
    #[error("invalid JSON: {0}")]
    Malformed(String),
    #[error("record is not a JSON object")]
    NotAnObject,
    #[error("record has no \"{}\" field", LATENCY_FIELD)]
    MissingField,
    #[error("\"{}\" is not an integer-like value", LATENCY_FIELD)]
    NonNumeric,
}

/// Classification of a single input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Sample(i128),
    Skipped(SkipReason),
}

/// One line of input after decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedLine {
    /// 1-based position in the input
    pub line_no: u64,
    pub outcome: LineOutcome,
}

// ─── Per-line decoding ───────────────────────────────────────────

/// Shapes the latency field is accepted in. Anything that does not match
/// one of these is treated as non-numeric.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawLatency {
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Flag(bool),
}

impl RawLatency {
    /// Integer coercion. JSON integers are taken exactly; integers too
    /// wide for `u64` arrive as floats. Floats truncate toward zero,
    /// saturating at the `i128` bounds.
    fn to_integer(&self) -> Option<i128> {
        match self {
            Self::Int(v) => Some(i128::from(*v)),
            Self::UInt(v) => Some(i128::from(*v)),
            Self::Float(v) => Some(v.trunc() as i128),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Flag(b) => Some(i128::from(*b)),
        }
    }
}

/// Decode one NDJSON line into a latency sample or a skip reason.
pub fn decode_line(line: &str) -> LineOutcome {
    if line.trim().is_empty() {
        return LineOutcome::Skipped(SkipReason::Blank);
    }

    let value: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => return LineOutcome::Skipped(SkipReason::Malformed(e.to_string())),
    };

    let Value::Object(mut record) = value else {
        return LineOutcome::Skipped(SkipReason::NotAnObject);
    };

    let Some(raw) = record.remove(LATENCY_FIELD) else {
        return LineOutcome::Skipped(SkipReason::MissingField);
    };

    match RawLatency::deserialize(raw).ok().and_then(|r| r.to_integer()) {
        Some(latency) => LineOutcome::Sample(latency),
        None => LineOutcome::Skipped(SkipReason::NonNumeric),
    }
}

// ─── Streaming over a reader ─────────────────────────────────────

/// Lazy, single-pass iterator of decoded lines over a buffered reader.
///
/// Yields `Err` when the reader fails (including on invalid UTF-8); callers
/// are expected to stop at the first error.
pub struct LineDecoder<R> {
    reader: R,
    line_no: u64,
    /// Previous line ended in `\r`; a `\n` right after it belongs to it.
    after_cr: bool,
}

impl<R: BufRead> LineDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            after_cr: false,
        }
    }

    /// Number of lines read so far.
    pub fn line_no(&self) -> u64 {
        self.line_no
    }

    /// Next line without its terminator, or `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = Vec::new();

        loop {
            let (used, terminated) = {
                let available = match self.reader.fill_buf() {
                    Ok(bytes) => bytes,
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                    Err(e) => return Err(e),
                };
                if available.is_empty() {
                    break;
                }

                if std::mem::take(&mut self.after_cr) && available[0] == b'\n' {
                    (1, false)
                } else {
                    match available.iter().position(|&b| b == b'\n' || b == b'\r') {
                        Some(i) => {
                            buf.extend_from_slice(&available[..i]);
                            self.after_cr = available[i] == b'\r';
                            (i + 1, true)
                        }
                        None => {
                            buf.extend_from_slice(available);
                            (available.len(), false)
                        }
                    }
                }
            };

            self.reader.consume(used);
            if terminated {
                return to_text(buf).map(Some);
            }
        }

        if buf.is_empty() {
            Ok(None)
        } else {
            to_text(buf).map(Some)
        }
    }
}

fn to_text(buf: Vec<u8>) -> io::Result<String> {
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

impl<R: BufRead> Iterator for LineDecoder<R> {
    type Item = io::Result<DecodedLine>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.read_line().transpose()?;
        self.line_no += 1;
        Some(line.map(|text| DecodedLine {
            line_no: self.line_no,
            outcome: decode_line(&text),
        }))
    }
}
