//! # Reference Tables
//!
//! Typed representation of the comma-delimited reference data that leaders
//! ship under their `data/` directory, plus the keyed index used to line up
//! rows between an installed table and a freshly generated one.
//!
//! ## Format
//!
//! UTF-8 text, first line is the header, every following line is one row.
//! Fields never span lines. The key field is column 0 unless a table says
//! otherwise.
//!
//! ## Keys
//!
//! A row's key is its key field trimmed and lowercased. Rows that are too
//! short to carry the key field, or whose key is blank, are skipped when an
//! index is built. They are not errors. When two rows normalize to the same
//! key, the **later row wins**.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use log::debug;

use crate::error::{Error, Result};

/// A single record of a reference table.
///
/// Rows are never mutated once built; merging produces new collections that
/// reuse whole rows from either side.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Row(Vec<String>);

impl Row {
    /// Build a row from anything that yields string-like fields.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(fields.into_iter().map(Into::into).collect())
    }

    /// All fields, in column order
    pub fn fields(&self) -> &[String] {
        &self.0
    }

    /// Field at `index`, if the row is long enough
    pub fn field(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Normalized key of this row, or `None` when the row cannot be keyed.
    pub fn key(&self, key_column: usize) -> Option<String> {
        let key = normalize_key(self.field(key_column)?);
        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    }
}

impl<S: Into<String>> From<Vec<S>> for Row {
    fn from(fields: Vec<S>) -> Self {
        Self::new(fields)
    }
}

/// Normalize a key field: surrounding whitespace removed, lowercased.
pub fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Normalize a non-key field for comparison: trimmed, uppercased.
pub fn normalize_value(value: &str) -> String {
    value.trim().to_uppercase()
}

/// A table: header plus ordered rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowCollection {
    header: Vec<String>,
    rows: Vec<Row>,
}

impl RowCollection {
    pub fn new<H, S>(header: H, rows: Vec<Row>) -> Self
    where
        H: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into_iter().map(Into::into).collect(),
            rows,
        }
    }

    /// A collection with neither header nor rows
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of data rows (the header is not counted)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when there are no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True when a header is present, i.e. the table has a known shape
    pub fn has_header(&self) -> bool {
        !self.header.is_empty()
    }

    /// Rows whose field count differs from the header.
    ///
    /// These are tolerated everywhere; the iterator exists for diagnostics.
    pub fn non_conforming(&self) -> impl Iterator<Item = &Row> {
        let width = self.header.len();
        self.rows.iter().filter(move |row| row.len() != width)
    }

    /// Same header, different rows
    pub fn with_rows(&self, rows: Vec<Row>) -> Self {
        Self {
            header: self.header.clone(),
            rows,
        }
    }

    /// Parse CSV text. The first record is the header.
    ///
    /// Records may have any number of fields; shape mismatches are kept as
    /// non-conforming rows instead of failing the parse.
    pub fn from_csv_str(content: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(content.as_bytes());

        let mut records = reader.records();
        let header = match records.next() {
            Some(record) => record?.iter().map(str::to_string).collect(),
            None => return Ok(Self::empty()),
        };

        let mut rows = Vec::new();
        for record in records {
            rows.push(Row::new(record?.iter()));
        }

        Ok(Self { header, rows })
    }

    /// Serialize to CSV text with `\n` line endings.
    ///
    /// A collection without a header is written as rows only.
    pub fn to_csv_string(&self) -> Result<String> {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        if self.has_header() {
            writer.write_record(&self.header)?;
        }
        for row in &self.rows {
            writer.write_record(row.fields())?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| Error::Io(io::Error::new(e.error().kind(), e.error().to_string())))?;
        String::from_utf8(bytes).map_err(|e| Error::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
    }

    /// Load a table from disk.
    ///
    /// Returns `Ok(None)` when the file does not exist; absence is not an
    /// error.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::TableRead {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };

        Self::from_csv_str(&content)
            .map(Some)
            .map_err(|e| Error::TableRead {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }

    /// Replace the table at `path` with this collection.
    ///
    /// The full content is serialized first, written to a sibling temporary
    /// file and renamed over the target, so a failed write never leaves a
    /// half-written table behind.
    pub fn store(&self, path: &Path) -> Result<()> {
        let content = self.to_csv_string()?;
        let write_err = |e: io::Error| Error::TableWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }

        let temp_name = format!(
            ".{}.{}.tmp",
            path.file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_default(),
            std::process::id()
        );
        let temp_path = path.with_file_name(temp_name);

        if let Err(e) = fs::write(&temp_path, content.as_bytes()) {
            let _ = fs::remove_file(&temp_path);
            return Err(write_err(e));
        }
        if let Err(e) = fs::rename(&temp_path, path) {
            let _ = fs::remove_file(&temp_path);
            return Err(write_err(e));
        }

        debug!("Wrote {} rows to {}", self.len(), path.display());
        Ok(())
    }
}

/// Lookup from normalized key to row, ordered by key.
pub type KeyedIndex<'a> = BTreeMap<String, &'a Row>;

/// Build a keyed index over `rows`.
///
/// Rows with no field at `key_column`, or whose key normalizes to an empty
/// string, contribute nothing. Duplicate normalized keys resolve to the row
/// that comes **last** in iteration order.
pub fn build_key_index(rows: &[Row], key_column: usize) -> KeyedIndex<'_> {
    let mut index = BTreeMap::new();
    for row in rows {
        match row.key(key_column) {
            Some(key) => {
                if index.insert(key.clone(), row).is_some() {
                    debug!("Duplicate key '{}': later row replaces earlier one", key);
                }
            }
            None => debug!("Skipping unkeyed row with {} fields", row.len()),
        }
    }
    index
}
