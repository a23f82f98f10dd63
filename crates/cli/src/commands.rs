//! `vsync sync` and `vsync compare`.

use std::path::{Path, PathBuf};

use chrono::Utc;

use vendorsync_config::Settings;
use vendorsync_io::{extract_records, ColumnMap, SpreadsheetExtractor};
use vendorsync_qbxml::{GatewayOptions, HttpRelayProcessor, QbxmlGateway};
use vendorsync_recon::{
    reconcile, sync_with_summary, write_report, Origin, RecordExtractor, ReportDocument, SyncError,
    VendorRecord, WriteBack,
};

use crate::CliError;

pub struct SyncArgs {
    pub source: PathBuf,
    pub output: Option<PathBuf>,
    pub company: Option<String>,
    pub config: Option<PathBuf>,
    pub gateway_url: Option<String>,
    pub json: bool,
}

fn column_map(settings: &Settings) -> ColumnMap {
    ColumnMap {
        sheet: settings.source.sheet.clone(),
        id_column: settings.source.id_column.clone(),
        name_column: settings.source.name_column.clone(),
    }
}

pub fn cmd_sync(args: SyncArgs) -> Result<(), CliError> {
    let settings = Settings::load(args.config.as_deref())?;

    let url = args
        .gateway_url
        .or_else(|| settings.gateway.url.clone())
        .ok_or_else(|| {
            CliError::usage("no qbXML relay configured")
                .with_hint("pass --gateway-url, set VSYNC_GATEWAY_URL, or set [gateway] url in the settings file")
        })?;
    let processor = HttpRelayProcessor::new(&url)
        .map_err(|e| CliError::usage(format!("invalid gateway URL '{url}': {e}")))?;
    let gateway = QbxmlGateway::new(
        processor,
        GatewayOptions {
            app_name: settings.gateway.app_name.clone(),
            qbxml_version: settings.gateway.qbxml_version.clone(),
        },
    );

    let company = args
        .company
        .unwrap_or_else(|| settings.gateway.company_file.clone());
    let output = args.output.unwrap_or_else(|| settings.report.output.clone());
    let extractor = SpreadsheetExtractor::new(column_map(&settings));

    let run = sync_with_summary(&extractor, &gateway, &company, &args.source, &output)?;

    if args.json {
        print_document(&run.document)?;
        return Ok(());
    }

    println!("report:    {}", run.report_path.display());
    println!("matched:   {}", run.document.same_vendors);
    println!("new:       {}", run.document.added_vendors.len());
    println!("conflicts: {}", run.document.conflicts.len());
    match run.write_back {
        WriteBack::Skipped => println!("write-back: nothing to add"),
        WriteBack::Completed(summary) => println!(
            "write-back: {} added, {} already present, {} failed",
            summary.created, summary.already_exists, summary.failed
        ),
        WriteBack::Failed(reason) => println!("write-back: failed ({reason})"),
    }
    Ok(())
}

pub fn cmd_compare(
    source: PathBuf,
    remote: PathBuf,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<(), CliError> {
    let settings = Settings::load(config.as_deref())?;

    let source_records = SpreadsheetExtractor::new(column_map(&settings)).extract(&source)?;
    let remote_records = load_remote_export(&remote)?;
    log::info!(
        "{} spreadsheet vendors, {} exported vendors",
        source_records.len(),
        remote_records.len()
    );

    let comparison = reconcile(&source_records, &remote_records);
    let document = ReportDocument::from_comparison(&comparison, Utc::now());

    match output {
        Some(path) => {
            let written = write_report(&document, &path)?;
            eprintln!("report written to {}", written.display());
            Ok(())
        }
        None => print_document(&document),
    }
}

fn load_remote_export(path: &Path) -> Result<Vec<VendorRecord>, CliError> {
    extract_records(path, &ColumnMap::remote_export(), Origin::Remote).map_err(|e| {
        CliError::from(SyncError::from(e))
            .with_hint("the remote export must be a CSV with record_id and name columns")
    })
}

fn print_document(document: &ReportDocument) -> Result<(), CliError> {
    let json = document
        .to_json_pretty()
        .map_err(|e| CliError::general(format!("cannot serialize report: {e}")))?;
    println!("{json}");
    Ok(())
}
