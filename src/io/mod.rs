//! I/O module
//!
//! Handles delimited upload parsing and account output.
//!
//! # Components
//!
//! - `upload_format` - Content type and extension detection
//! - `csv_format` - Header validation, record parsing, output serialization

pub mod csv_format;
pub mod upload_format;

pub use csv_format::{parse_upload, parse_with_format, write_accounts_csv};
pub use upload_format::UploadFormat;
