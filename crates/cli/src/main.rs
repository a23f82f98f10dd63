// vsync - reconcile a vendor spreadsheet against QuickBooks

mod commands;
mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};

use exit_codes::{sync_exit_code, EXIT_CONFIG, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};
use vendorsync_config::ConfigError;
use vendorsync_recon::SyncError;

#[derive(Parser)]
#[command(name = "vsync")]
#[command(about = "Reconcile a vendor spreadsheet against the QuickBooks vendor list")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// More log output (debug)
    #[arg(long, short = 'v', global = true, action = ArgAction::SetTrue, conflicts_with = "quiet")]
    verbose: bool,

    /// Only warnings and errors
    #[arg(long, short = 'q', global = true, action = ArgAction::SetTrue)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare the spreadsheet with QuickBooks, write the report, add new vendors
    #[command(after_help = "\
Examples:
  vsync sync --source vendors.xlsx --gateway-url http://qb-host:8181/relay
  vsync sync --source vendors.xlsx --company 'C:\\Books\\acme.qbw' --output out/report.json
  VSYNC_GATEWAY_URL=http://qb-host:8181/relay vsync sync --source vendors.csv --json")]
    Sync {
        /// Spreadsheet (.xlsx, .xls, .ods) or CSV holding the vendor table
        #[arg(long)]
        source: PathBuf,

        /// Report path [default: settings value, else comparison_report.json]
        #[arg(long)]
        output: Option<PathBuf>,

        /// QuickBooks company file (default: the currently open company)
        #[arg(long)]
        company: Option<String>,

        /// Settings file [default: <config dir>/vendorsync/config.toml]
        #[arg(long)]
        config: Option<PathBuf>,

        /// qbXML relay base URL
        #[arg(long, env = "VSYNC_GATEWAY_URL")]
        gateway_url: Option<String>,

        /// Print the report document to stdout as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compare the spreadsheet with an exported vendor list, offline
    #[command(after_help = "\
Examples:
  vsync compare --source vendors.xlsx --remote qb_export.csv
  vsync compare --source vendors.xlsx --remote qb_export.csv --output report.json

The remote export is a CSV with `record_id` and `name` columns.")]
    Compare {
        /// Spreadsheet (.xlsx, .xls, .ods) or CSV holding the vendor table
        #[arg(long)]
        source: PathBuf,

        /// CSV export of the remote vendor list
        #[arg(long)]
        remote: PathBuf,

        /// Write the report here instead of printing it
        #[arg(long)]
        output: Option<PathBuf>,

        /// Settings file (column mapping)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn long_version() -> &'static str {
    concat!(env!("CARGO_PKG_VERSION"), "\nqbxml:   13.0 (default request version)")
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<SyncError> for CliError {
    fn from(err: SyncError) -> Self {
        let code = sync_exit_code(&err);
        let hint = match &err {
            SyncError::NotFound(_) => Some("check the --source path".to_string()),
            SyncError::Format(_) => {
                Some("check [source] sheet, id_column and name_column in the settings file".to_string())
            }
            SyncError::Gateway(_) => {
                Some("is the qbXML relay running and QuickBooks open?".to_string())
            }
            SyncError::Persistence { .. } => None,
        };
        Self { code, message: err.to_string(), hint }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self { code: EXIT_CONFIG, message: err.to_string(), hint: None }
    }
}

fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Sync {
            source,
            output,
            company,
            config,
            gateway_url,
            json,
        } => commands::cmd_sync(commands::SyncArgs {
            source,
            output,
            company,
            config,
            gateway_url,
            json,
        }),
        Commands::Compare {
            source,
            remote,
            output,
            config,
        } => commands::cmd_compare(source, remote, output, config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("error: {}", e.message);
            if let Some(hint) = e.hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(e.code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn sync_args_parse() {
        let cli = Cli::try_parse_from([
            "vsync",
            "sync",
            "--source",
            "vendors.xlsx",
            "--company",
            "acme.qbw",
            "--gateway-url",
            "http://relay",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Sync { source, company, gateway_url, output, json, .. } => {
                assert_eq!(source, PathBuf::from("vendors.xlsx"));
                assert_eq!(company.as_deref(), Some("acme.qbw"));
                assert_eq!(gateway_url.as_deref(), Some("http://relay"));
                assert_eq!(output, None);
                assert!(!json);
            }
            _ => panic!("expected sync"),
        }
    }

    #[test]
    fn source_is_required() {
        assert!(Cli::try_parse_from(["vsync", "sync"]).is_err());
        assert!(Cli::try_parse_from(["vsync", "compare", "--source", "a.csv"]).is_err());
    }

    #[test]
    fn sync_error_keeps_exit_code_and_hint() {
        let err = CliError::from(SyncError::Gateway("connection refused".into()));
        assert_eq!(err.code, exit_codes::EXIT_GATEWAY);
        assert!(err.message.contains("connection refused"));
        assert!(err.hint.is_some());
    }
}
