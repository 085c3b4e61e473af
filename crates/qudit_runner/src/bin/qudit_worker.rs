//! `qudit_worker` binary: executes one circuit specification for a
//! subprocess execution context.
//!
//! # Usage
//!
//! ```bash
//! qudit_worker --input circuit.json --pretty
//! cat circuit.json | qudit_worker --context host-b --log-level warn
//! ```
//!
//! Input is a bare circuit specification or a `{"circuit":…,"precision":…}`
//! request; a precision carried by the request takes priority over
//! `--precision`.
//!
//! The response is written to stdout as a tagged JSON object. Circuit errors
//! are reported inside the response with exit status 0; a non-zero exit means
//! the worker itself could not run. Logs go to stderr.

use anyhow::Context;
use clap::Parser;
use qudit_core::QuditResult;
use qudit_runner::{WorkerRequest, WorkerResponse};
use qudit_sim::{Backend, ExperimentReport, SimulatorBackend};
use std::io::Read;
use std::path::PathBuf;

/// Command-line arguments for the worker binary.
#[derive(Parser, Debug)]
#[command(
    name = "qudit_worker",
    version,
    about = "Qudit circuit worker: circuit specification in, experiment report out",
    long_about = None
)]
struct Args {
    /// Circuit specification JSON file (stdin when omitted).
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Pretty-print the response.
    #[arg(long, default_value_t = false)]
    pretty: bool,

    /// Context label written into the report.
    #[arg(long, default_value = "qudit_worker")]
    context: String,

    /// Decimal places of reported entropies when the request carries none.
    #[arg(long, default_value_t = qudit_core::consistency::ENTROPY_DECIMALS)]
    precision: u32,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level_filter = args
        .log_level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .unwrap_or(tracing_subscriber::filter::LevelFilter::INFO);

    // stdout carries the response
    tracing_subscriber::fmt()
        .with_max_level(log_level_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    log::info!("qudit_worker v{} ({})", qudit_runner::VERSION, args.context);

    let input = match args.input.as_deref() {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read circuit specification from stdin")?;
            buf
        }
    };

    let response = WorkerResponse::from_result(execute(&args, &input));
    match &response {
        WorkerResponse::Ok { report } => log::info!("{}", report),
        WorkerResponse::Error { kind, message } => log::warn!("{}: {}", kind, message),
    }

    let output = if args.pretty {
        response.to_json_pretty()?
    } else {
        response.to_json()?
    };
    println!("{}", output);
    Ok(())
}

fn execute(args: &Args, input: &str) -> QuditResult<ExperimentReport> {
    let request = WorkerRequest::from_json(input)?;
    SimulatorBackend::new()
        .with_name(&args.context)
        .with_precision(request.precision.unwrap_or(args.precision))
        .execute(&request.circuit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use qudit_core::ErrorKind;

    const GHZ_5_7: &str = r#"{"dimensions":[5,7],"steps":[
            {"gate":"hadamard","target":0},
            {"gate":"controlled_shift","control":0,"target":1}
        ],"seed":42}"#;

    fn args(extra: &[&str]) -> Args {
        Args::parse_from(["qudit_worker"].iter().chain(extra).copied())
    }

    #[test]
    fn test_execute_valid_input() {
        let report = execute(&args(&["--context", "w"]), GHZ_5_7).unwrap();
        assert_eq!(report.context, "w");
        assert_eq!(report.precision, 6);
        assert_eq!(report.entropy_of(&[1]), Some(1.609438));

        let report = execute(&args(&["--precision", "3"]), GHZ_5_7).unwrap();
        assert_eq!(report.entropy_of(&[1]), Some(1.609));
    }

    #[test]
    fn test_request_precision_wins() {
        let input = format!(r#"{{"circuit":{},"precision":9}}"#, GHZ_5_7);
        let report = execute(&args(&["--precision", "3"]), &input).unwrap();
        assert_eq!(report.precision, 9);
        assert!((report.entropy_of(&[0]).unwrap() - 1.609437912).abs() < 1e-12);
    }

    #[test]
    fn test_execute_malformed_input() {
        let err = execute(&args(&[]), "{not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Serialization);
    }

    #[test]
    fn test_args() {
        let args = Args::parse_from(["qudit_worker", "--pretty", "--context", "host-b"]);
        assert!(args.pretty);
        assert!(args.input.is_none());
        assert_eq!(args.context, "host-b");
        assert_eq!(args.log_level, "info");
    }
}
