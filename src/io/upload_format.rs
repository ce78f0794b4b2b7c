//! Upload format detection
//!
//! Maps a declared content type (or a file extension, for the CLI) onto one of
//! the supported delimited formats and exposes the per-format parsing rules.

use crate::config::IngestionConfig;
use crate::types::IngestionError;
use std::path::Path;

/// Supported delimited upload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFormat {
    /// Comma-separated values with quoting, header checked in order
    Csv,
    /// Tab-separated plain text without quoting, header checked as a set
    TabDelimited,
}

impl UploadFormat {
    /// Media type that selects this format
    pub const fn media_type(self) -> &'static str {
        match self {
            UploadFormat::Csv => "text/csv",
            UploadFormat::TabDelimited => "text/plain",
        }
    }

    /// Field delimiter byte
    pub const fn delimiter(self) -> u8 {
        match self {
            UploadFormat::Csv => b',',
            UploadFormat::TabDelimited => b'\t',
        }
    }

    /// Whether double quotes delimit fields
    pub const fn quoting(self) -> bool {
        matches!(self, UploadFormat::Csv)
    }

    /// Whether the header must list the required names in order
    pub const fn ordered_header(self) -> bool {
        matches!(self, UploadFormat::Csv)
    }

    /// Content types accepted under the given configuration
    pub fn allowed(config: &IngestionConfig) -> Vec<&'static str> {
        let mut allowed = vec![UploadFormat::Csv.media_type()];
        if config.accept_tab_delimited {
            allowed.push(UploadFormat::TabDelimited.media_type());
        }
        allowed
    }

    /// Resolve a declared content type
    ///
    /// Parameters such as `; charset=utf-8` are ignored and the media type is
    /// compared case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `UnsupportedFileType` when the media type is not allowed.
    pub fn from_content_type(
        content_type: &str,
        config: &IngestionConfig,
    ) -> Result<Self, IngestionError> {
        let media_type = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match media_type.as_str() {
            "text/csv" => Ok(UploadFormat::Csv),
            "text/plain" if config.accept_tab_delimited => Ok(UploadFormat::TabDelimited),
            _ => Err(IngestionError::unsupported_file_type(
                content_type,
                &Self::allowed(config),
            )),
        }
    }

    /// Guess the format from a file extension
    ///
    /// `.csv` maps to CSV; `.txt` and `.tsv` map to tab-delimited text.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "csv" => Some(UploadFormat::Csv),
            "txt" | "tsv" => Some(UploadFormat::TabDelimited),
            _ => None,
        }
    }
}
