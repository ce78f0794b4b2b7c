//! File-based entry points for the command line
//!
//! The web layer receives uploads as bytes with a declared content type. The
//! command line works on paths instead, so this module reads the file, works
//! out its content type (explicit or from the extension) and hands it to the
//! same parsing and persistence code the server uses.

use crate::config::IngestionConfig;
use crate::core::ingestion::{build_accounts, Ingestor, UploadSummary};
use crate::io::csv_format::{parse_with_format, write_accounts_csv};
use crate::io::upload_format::UploadFormat;
use crate::types::{AppError, IngestionError, UploadError, UploadRecord};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Parse a file and write the accounts it would create as CSV
///
/// Rows are converted exactly as an upload would convert them (generated ids,
/// rounded balances) but nothing is stored. Generated ids differ between runs.
///
/// # Arguments
///
/// * `path` - File to validate
/// * `content_type` - Declared content type; inferred from the extension when `None`
/// * `config` - Accepted formats and header options
/// * `output` - Writer receiving the normalized CSV
///
/// # Returns
///
/// The number of accounts written.
///
/// # Errors
///
/// - `FileNotFound` / `IoError` if the file cannot be read
/// - `Upload` if the content type, structure or any row is invalid
/// - `Output` if writing fails
pub fn validate_file(
    path: &Path,
    content_type: Option<&str>,
    config: &IngestionConfig,
    output: &mut dyn Write,
) -> Result<usize, AppError> {
    let records = read_records(path, content_type, config)?;
    let accounts = build_accounts(records).map_err(UploadError::from)?;

    write_accounts_csv(&accounts, output)?;
    Ok(accounts.len())
}

/// Load a file into the store behind `ingestor`
///
/// Used to seed the server at startup. Existing ids are skipped.
pub fn import_file(
    path: &Path,
    content_type: Option<&str>,
    ingestor: &Ingestor,
) -> Result<UploadSummary, AppError> {
    let bytes = read_file(path)?;
    let content_type = match content_type {
        Some(content_type) => content_type,
        None => infer_format(path, ingestor.config())?.media_type(),
    };

    let summary = ingestor.upload(&bytes, content_type)?;
    info!(path = %path.display(), inserted = summary.inserted, "Seed file imported");
    Ok(summary)
}

fn read_records(
    path: &Path,
    content_type: Option<&str>,
    config: &IngestionConfig,
) -> Result<Vec<UploadRecord>, AppError> {
    let bytes = read_file(path)?;
    let format = match content_type {
        Some(content_type) => {
            UploadFormat::from_content_type(content_type, config).map_err(UploadError::from)?
        }
        None => infer_format(path, config)?,
    };

    Ok(parse_with_format(&bytes, format, config).map_err(UploadError::from)?)
}

fn read_file(path: &Path) -> Result<Vec<u8>, AppError> {
    if !path.is_file() {
        return Err(AppError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(fs::read(path)?)
}

/// Pick a format from the file extension, honouring the accepted formats
fn infer_format(path: &Path, config: &IngestionConfig) -> Result<UploadFormat, AppError> {
    let unsupported = || {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        AppError::from(UploadError::from(IngestionError::unsupported_file_type(
            &name,
            &UploadFormat::allowed(config),
        )))
    };

    match UploadFormat::from_path(path) {
        Some(UploadFormat::TabDelimited) if !config.accept_tab_delimited => Err(unsupported()),
        Some(format) => Ok(format),
        None => Err(unsupported()),
    }
}
