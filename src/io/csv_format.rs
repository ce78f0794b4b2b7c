//! Delimited format handling for account uploads and account output
//!
//! This module centralizes all tabular format concerns, providing:
//! - Upload parsing with header validation
//! - Conversion of data rows into `UploadRecord`s
//! - Account output serialization
//!
//! All functions are pure (no file access) for easy testing.

use crate::config::IngestionConfig;
use crate::io::upload_format::UploadFormat;
use crate::types::{Account, AppError, IngestionError, UploadRecord, REQUIRED_HEADERS};
use csv::{ReaderBuilder, StringRecord};
use std::io::Write;

/// Parse an uploaded file into raw account records
///
/// The first line is the header and must carry exactly the required names
/// (`ID`, `Name`, `Balance`): in order for CSV, in any order for
/// tab-delimited text. Header names are lowercased and every later line is
/// zipped positionally against them. Empty lines are skipped, but a line of
/// empty fields (`,,`) is kept as a record. Each record carries its data row
/// counted from the header line, so skipped lines still count. Values are
/// kept as raw strings; no row-level validation happens here.
///
/// # Arguments
///
/// * `bytes` - Raw file contents
/// * `content_type` - Content type declared by the uploader
/// * `config` - Accepted formats and header matching options
///
/// # Returns
///
/// One record per data line, in file order.
///
/// # Errors
///
/// - `UnsupportedFileType` if the content type is not allowed
/// - `MalformedContent` if the file is not UTF-8, is empty, or has the wrong header
pub fn parse_upload(
    bytes: &[u8],
    content_type: &str,
    config: &IngestionConfig,
) -> Result<Vec<UploadRecord>, IngestionError> {
    let format = UploadFormat::from_content_type(content_type, config)?;
    parse_with_format(bytes, format, config)
}

/// Parse an upload whose format is already known
///
/// Same contract as [`parse_upload`] without the content type check.
pub fn parse_with_format(
    bytes: &[u8],
    format: UploadFormat,
    config: &IngestionConfig,
) -> Result<Vec<UploadRecord>, IngestionError> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| IngestionError::malformed(format!("file is not valid UTF-8: {}", e)))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = ReaderBuilder::new()
        .delimiter(format.delimiter())
        .quoting(format.quoting())
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = reader.records();

    let header = match rows.next() {
        Some(header) => header.map_err(|e| IngestionError::malformed(e.to_string()))?,
        None => return Err(IngestionError::malformed("file is empty")),
    };
    let keys = header_keys(&header, format, config)?;
    let header_line = content_line(text, &header);

    let mut records = Vec::new();
    for row in rows {
        let row = row.map_err(|e| IngestionError::malformed(e.to_string()))?;
        if is_empty_line(&row) {
            continue;
        }
        let data_row = content_line(text, &row).saturating_sub(header_line);
        records.push(
            UploadRecord::from_fields(keys.iter().map(String::as_str), row.iter())
                .at_row(usize::try_from(data_row).unwrap_or(usize::MAX)),
        );
    }

    Ok(records)
}

/// Validate the header row and return its lowercased names
fn header_keys(
    header: &StringRecord,
    format: UploadFormat,
    config: &IngestionConfig,
) -> Result<Vec<String>, IngestionError> {
    let names: Vec<&str> = header.iter().collect();
    let same = |found: &str, required: &str| {
        if config.case_insensitive_headers {
            found.eq_ignore_ascii_case(required)
        } else {
            found == required
        }
    };

    let valid = if format.ordered_header() {
        names.len() == REQUIRED_HEADERS.len()
            && names
                .iter()
                .zip(REQUIRED_HEADERS)
                .all(|(found, required)| same(found, required))
    } else {
        // Set equality: every name is required and every required name is present
        names
            .iter()
            .all(|found| REQUIRED_HEADERS.iter().any(|required| same(found, required)))
            && REQUIRED_HEADERS
                .iter()
                .all(|required| names.iter().any(|found| same(found, required)))
    };

    if !valid {
        return Err(IngestionError::malformed(format!(
            "unexpected header [{}]",
            names.join(", ")
        )));
    }

    Ok(names.iter().map(|name| name.to_lowercase()).collect())
}

/// A line with no content at all; `,,` has three empty fields and is not one
fn is_empty_line(row: &StringRecord) -> bool {
    row.len() == 1 && row[0].is_empty()
}

/// Line on which a record's content starts
///
/// The reader stamps a record with the position where reading began, before
/// it skips the empty lines in front of the content, so those are added here.
fn content_line(text: &str, row: &StringRecord) -> u64 {
    let Some(position) = row.position() else {
        return 0;
    };
    let start = usize::try_from(position.byte()).unwrap_or(usize::MAX);
    let skipped = text
        .get(start..)
        .unwrap_or_default()
        .bytes()
        .take_while(|&byte| byte == b'\r' || byte == b'\n')
        .filter(|&byte| byte == b'\n')
        .count();
    position.line() + skipped as u64
}

/// Write accounts in upload-compatible CSV format
///
/// Writes the `ID,Name,Balance` header followed by one line per account,
/// sorted by name then id for deterministic output. Balances carry two
/// fraction digits, so the output can be uploaded again unchanged.
///
/// # Arguments
///
/// * `accounts` - Slice of accounts to write
/// * `output` - Mutable reference to a writer for outputting CSV
///
/// # Errors
///
/// Returns `AppError::Output` if a write error occurred
pub fn write_accounts_csv(accounts: &[Account], output: &mut dyn Write) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_writer(output);

    writer.write_record(REQUIRED_HEADERS)?;

    let mut sorted_accounts: Vec<&Account> = accounts.iter().collect();
    sorted_accounts.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

    for account in sorted_accounts {
        writer.write_record([
            account.id.to_string(),
            account.name.clone(),
            account.formatted_balance(),
        ])?;
    }

    writer.flush()?;

    Ok(())
}
