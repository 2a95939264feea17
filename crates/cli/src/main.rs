//! `csvgate` -- check a CSV file against the `name, email, age` contract.
//!
//! Prints the parsed table when every row passes, or the list of
//! validation errors otherwise.
//!
//! # Environment variables
//!
//! | Variable            | Required | Default | Description                     |
//! |---------------------|----------|---------|---------------------------------|
//! | `CSVGATE_OUTPUT`    | no       | `table` | `table` or `json`               |
//! | `CSVGATE_DELIMITER` | no       | `,`     | Single ASCII field delimiter    |
//! | `CSVGATE_LOG`       | no       | `info`  | Log level when `RUST_LOG` unset |
//!
//! `--output`, `--delimiter` and `--log-level` take precedence; a variable is
//! not read when its flag is given.
//!
//! # Exit status
//!
//! `0` valid, `1` invalid, `2` usage or configuration error.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use csvgate_cli::app::{self, CheckRequest, EXIT_USAGE};
use csvgate_cli::config::{CliConfig, CliOverrides, OutputFormat};
use csvgate_cli::logging;

#[derive(Parser)]
#[command(
    name = "csvgate",
    version,
    about = "Validate a CSV file against the name, email, age contract"
)]
struct Cli {
    /// Path to the CSV file
    file: PathBuf,

    /// Output format: table or json
    #[arg(long)]
    output: Option<OutputFormat>,

    /// Field delimiter (single ASCII character, or `tab`)
    #[arg(long)]
    delimiter: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let overrides = CliOverrides {
        output: cli.output,
        delimiter: cli.delimiter,
        log_level: cli.log_level,
    };
    let config = match CliConfig::from_env_with(overrides) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration error: {err}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    logging::init(&config.log_level);

    let request = CheckRequest {
        path: cli.file,
        output: config.output,
        delimiter: config.delimiter,
    };
    tracing::debug!(
        path = %request.path.display(),
        delimiter = %char::from(request.delimiter),
        "Starting check"
    );

    let report = match app::check_file(&request).await {
        Ok(report) => report,
        Err(err) => {
            tracing::error!(error = %err, "Check failed");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let mut stdout = std::io::stdout().lock();
    if let Err(err) = stdout.write_all(report.rendered.as_bytes()) {
        tracing::error!(error = %err, "Failed to write output");
        return ExitCode::from(EXIT_USAGE);
    }

    ExitCode::from(report.exit_code())
}
