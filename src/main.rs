use std::process::ExitCode;

use bench_latency_avg::summarize_file;
use tracing_subscriber::EnvFilter;

/// Default log filter when `RUST_LOG` is unset. Keeps stderr quiet on a
/// normal run; set `RUST_LOG=debug` to see every skipped line.
const DEFAULT_LOG_FILTER: &str = "warn";

fn main() -> ExitCode {
    init_tracing();

    // ── 1. Arguments ─────────────────────────────────────────────
    let mut args = std::env::args_os();
    let program = args
        .next()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_owned());
    let rest: Vec<_> = args.collect();

    let [path] = rest.as_slice() else {
        println!("Usage: {program} filename");
        return ExitCode::from(1);
    };

    // ── 2. Read, decode, average ─────────────────────────────────
    match summarize_file(path) {
        Ok(report) => {
            println!("{}", report.mean);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("❌ {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
