//! Upload-related types
//!
//! An `UploadRecord` is the transient, untyped shape of one data row from an
//! uploaded accounts file. It only lives between parsing and persistence.

/// Header names every upload must carry, in the order the CSV format expects
pub const REQUIRED_HEADERS: [&str; 3] = ["ID", "Name", "Balance"];

/// One parsed data row with raw string values
///
/// Each field is keyed by the lowercased header it was read under. A field is
/// `None` when the row was too short to reach that column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub balance: Option<String>,
    /// Data row within the source file, counted from the header (row 0)
    pub row: Option<usize>,
}

impl UploadRecord {
    /// Build a record from already-extracted values
    pub fn new(
        id: Option<impl Into<String>>,
        name: Option<impl Into<String>>,
        balance: Option<impl Into<String>>,
    ) -> Self {
        UploadRecord {
            id: id.map(Into::into),
            name: name.map(Into::into),
            balance: balance.map(Into::into),
            row: None,
        }
    }

    /// Tag the record with the data row it was read from
    pub fn at_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    /// Zip a row's fields against lowercased column keys
    ///
    /// Keys other than `id`, `name` and `balance` are ignored, as are fields
    /// beyond the last key. A key that repeats keeps its last value.
    pub fn from_fields<'a, K, F>(keys: K, fields: F) -> Self
    where
        K: IntoIterator<Item = &'a str>,
        F: IntoIterator<Item = &'a str>,
    {
        let mut record = UploadRecord::default();
        for (key, value) in keys.into_iter().zip(fields) {
            let slot = match key {
                "id" => &mut record.id,
                "name" => &mut record.name,
                "balance" => &mut record.balance,
                _ => continue,
            };
            *slot = Some(value.to_string());
        }
        record
    }
}
