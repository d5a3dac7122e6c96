use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::decoder::{LineDecoder, LineOutcome, SkipReason};
use crate::error::ReportError;
use crate::metrics::{Mean, MeanValue};

/// Per-reason tally of lines that did not contribute a sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipCounts {
    pub blank: u64,
    pub malformed: u64,
    pub not_an_object: u64,
    pub missing_field: u64,
    pub non_numeric: u64,
}

impl SkipCounts {
    pub fn record(&mut self, reason: &SkipReason) {
        let slot = match reason {
            SkipReason::Blank => &mut self.blank,
            SkipReason::Malformed(_) => &mut self.malformed,
            SkipReason::NotAnObject => &mut self.not_an_object,
            SkipReason::MissingField => &mut self.missing_field,
            SkipReason::NonNumeric => &mut self.non_numeric,
        };
        *slot += 1;
    }

    pub fn total(&self) -> u64 {
        self.blank + self.malformed + self.not_an_object + self.missing_field + self.non_numeric
    }
}

/// Outcome of one pass over an input file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Report {
    pub mean: MeanValue,
    pub samples: u64,
    pub skipped: SkipCounts,
}

/// Fold every line of `reader` into a [`Report`].
///
/// Skipped lines are excluded from the mean and only show up in
/// `Report::skipped` and the debug log. The first read error aborts the run.
pub fn summarize<R: BufRead>(reader: R) -> Result<Report, ReportError> {
    let mut acc = Mean::new();
    let mut skipped = SkipCounts::default();
    let mut decoder = LineDecoder::new(reader);

    while let Some(line) = decoder.next() {
        let line = line.map_err(|source| ReportError::Read {
            line_no: decoder.line_no(),
            source,
        })?;

        match line.outcome {
            LineOutcome::Sample(latency) => acc.push(latency),
            LineOutcome::Skipped(reason) => {
                debug!(line = line.line_no, %reason, "skipping line");
                skipped.record(&reason);
            }
        }
    }

    debug!(
        lines = decoder.line_no(),
        samples = acc.count(),
        skipped = skipped.total(),
        "input exhausted"
    );

    Ok(Report {
        mean: acc.value(),
        samples: acc.count(),
        skipped,
    })
}

/// Open `path` and summarize it. The file is closed before this returns,
/// whether the run succeeded or not.
pub fn summarize_file(path: impl AsRef<Path>) -> Result<Report, ReportError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ReportError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    summarize(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn run(input: &str) -> Report {
        summarize(Cursor::new(input)).unwrap()
    }

    #[test]
    fn empty_input() {
        let report = run("");
        assert_eq!(report.mean, MeanValue::Empty);
        assert_eq!(report.samples, 0);
        assert_eq!(report.skipped.total(), 0);
        assert_eq!(report.mean.to_string(), "0");
    }

    #[test]
    fn malformed_line_is_excluded() {
        let report = run("this is not json\n{\"AverageLatency\": 10}\n");
        assert_eq!(report.mean.to_string(), "10.0");
        assert_eq!(report.samples, 1);
        assert_eq!(report.skipped.malformed, 1);
    }

    #[test]
    fn missing_key_is_excluded_like_malformed() {
        let with_missing = run("{\"Other\": 99}\n{\"AverageLatency\": 4}\n{\"AverageLatency\": 6}\n");
        let with_garbage = run("}{\n{\"AverageLatency\": 4}\n{\"AverageLatency\": 6}\n");
        assert_eq!(with_missing.mean, with_garbage.mean);
        assert_eq!(with_missing.mean.to_string(), "5.0");
        assert_eq!(with_missing.skipped.missing_field, 1);
        assert_eq!(with_garbage.skipped.malformed, 1);
    }

    #[test]
    fn floats_truncate_before_summing() {
        let report = run("{\"AverageLatency\": 2.9}\n{\"AverageLatency\": 4}\n");
        assert_eq!(report.mean.to_string(), "3.0");
    }

    #[test]
    fn integers_beyond_i64_are_not_clamped() {
        let report = run("{\"AverageLatency\": 18446744073709551615}\n{\"AverageLatency\": 0}\n");
        assert_eq!(report.samples, 2);
        assert_eq!(report.mean.to_string(), "9.223372036854776e+18");

        let report = run("{\"AverageLatency\": 100000000000000000000}\n{\"AverageLatency\": 0}\n");
        assert_eq!(report.mean.to_string(), "5e+19");
    }

    #[test]
    fn bare_cr_line_endings() {
        let report = run("{\"AverageLatency\": 1}\r{\"AverageLatency\": 3}\r");
        assert_eq!(report.samples, 2);
        assert_eq!(report.skipped.total(), 0);
        assert_eq!(report.mean.to_string(), "2.0");
    }

    #[test]
    fn every_skip_reason_is_counted() {
        let input = [
            "",
            "nope",
            "[]",
            "{\"x\": 1}",
            "{\"AverageLatency\": null}",
            "{\"AverageLatency\": 7}",
        ]
        .join("\n");
        let report = run(&input);
        assert_eq!(
            report.skipped,
            SkipCounts {
                blank: 1,
                malformed: 1,
                not_an_object: 1,
                missing_field: 1,
                non_numeric: 1,
            }
        );
        assert_eq!(report.skipped.total(), 5);
        assert_eq!(report.samples, 1);
        assert_eq!(report.mean, MeanValue::Value(7.0));
    }

    #[test]
    fn read_error_reports_line() {
        let input: &[u8] = b"{\"AverageLatency\": 1}\n{\"AverageLatency\": 2}\n\xc3\x28\n";
        match summarize(input) {
            Err(ReportError::Read { line_no, .. }) => assert_eq!(line_no, 3),
            other => panic!("expected read error, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.ndjson");
        match summarize_file(&path) {
            Err(ReportError::Open { path: p, source }) => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected open error, got {other:?}"),
        }
    }

    #[test]
    fn summarize_file_reads_from_disk() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{\"AverageLatency\": 100}}").unwrap();
        writeln!(file, "{{\"AverageLatency\": 201}}").unwrap();
        file.flush().unwrap();

        let report = summarize_file(file.path()).unwrap();
        assert_eq!(report.samples, 2);
        assert_eq!(report.mean.to_string(), "150.5");
    }
}
