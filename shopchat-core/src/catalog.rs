//! Product catalog — CSV loading and query matching.
//!
//! The catalog is read-only reference data. It is reread from disk for every
//! chat request, and matching is a plain case-insensitive substring scan over
//! each row's field values.

use crate::error::CatalogError;
use std::path::Path;
use tracing::debug;

/// Columns every catalog file must provide.
pub const REQUIRED_COLUMNS: [&str; 5] = ["product_id", "name", "description", "category", "price"];

/// Default number of rows handed to the prompt builder.
pub const DEFAULT_MATCH_LIMIT: usize = 4;

/// A single catalog record, with its fields kept in file column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRow {
    fields: Vec<(String, String)>,
}

impl CatalogRow {
    /// Create a row from `(column, value)` pairs.
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// Look up a field by column name.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    fn field(&self, column: &str) -> &str {
        self.get(column).unwrap_or_default()
    }

    pub fn product_id(&self) -> &str {
        self.field("product_id")
    }

    pub fn name(&self) -> &str {
        self.field("name")
    }

    pub fn description(&self) -> &str {
        self.field("description")
    }

    pub fn category(&self) -> &str {
        self.field("category")
    }

    pub fn price(&self) -> &str {
        self.field("price")
    }

    /// Field values in column order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, value)| value.as_str())
    }

    /// Lower-cased text blob the matcher searches: all values, newline-joined.
    pub fn search_text(&self) -> String {
        self.values().collect::<Vec<_>>().join("\n").to_lowercase()
    }

    /// Whether an already-normalized query occurs in this row's text.
    pub fn matches(&self, normalized_query: &str) -> bool {
        self.search_text().contains(normalized_query)
    }
}

/// The product table.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    columns: Vec<String>,
    rows: Vec<CatalogRow>,
}

impl Catalog {
    /// Load a catalog from a CSV file.
    ///
    /// A missing file is reported as [`CatalogError::Unavailable`].
    pub async fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CatalogError::Unavailable {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let catalog = Self::parse(&content)?;
        debug!(path = %path.display(), rows = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// Parse CSV text with a header row.
    pub fn parse(content: &str) -> Result<Self, CatalogError> {
        let mut records = parse_records(content.trim_start_matches('\u{feff}'))?.into_iter();

        let columns = match records.next() {
            Some((_, header)) => header,
            None => Vec::new(),
        };
        for required in REQUIRED_COLUMNS {
            if !columns.iter().any(|c| c == required) {
                return Err(CatalogError::MissingColumn {
                    column: required.to_string(),
                });
            }
        }

        let mut rows = Vec::new();
        for (line, values) in records {
            if values.len() != columns.len() {
                return Err(CatalogError::Malformed {
                    line,
                    message: format!("expected {} fields, found {}", columns.len(), values.len()),
                });
            }
            rows.push(CatalogRow::new(
                columns.iter().cloned().zip(values).collect(),
            ));
        }

        Ok(Self { columns, rows })
    }

    /// Column names in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[CatalogRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The first `limit` rows in table order.
    pub fn head(&self, limit: usize) -> Vec<&CatalogRow> {
        self.rows.iter().take(limit).collect()
    }

    /// Select up to `limit` rows whose text contains `query`.
    ///
    /// An empty query, or a query nothing matches, falls back to the first
    /// `limit` rows, so the result is never empty for a non-empty table.
    pub fn find_relevant_rows(&self, query: &str, limit: usize) -> Vec<&CatalogRow> {
        let normalized = query.trim().to_lowercase();
        if normalized.is_empty() {
            return self.head(limit);
        }

        let matches: Vec<&CatalogRow> = self
            .rows
            .iter()
            .filter(|row| row.matches(&normalized))
            .take(limit)
            .collect();

        if matches.is_empty() {
            debug!(query = %normalized, "No catalog rows matched; using leading rows");
            return self.head(limit);
        }
        matches
    }
}

/// Split CSV text into records, returning each with its starting line number.
///
/// Handles `"`-quoted fields (embedded commas, newlines and `""` escapes)
/// and skips blank lines.
fn parse_records(content: &str) -> Result<Vec<(usize, Vec<String>)>, CatalogError> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut quoted = false;
    let mut line = 1;
    let mut record_line = 1;

    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if !quoted && field.trim().is_empty() => {
                field.clear();
                in_quotes = true;
                quoted = true;
            }
            ',' => finish_field(&mut field, &mut quoted, &mut record),
            '\r' => {}
            '\n' => {
                let blank = record.is_empty() && !quoted && field.trim().is_empty();
                if !blank {
                    finish_field(&mut field, &mut quoted, &mut record);
                    records.push((record_line, std::mem::take(&mut record)));
                }
                field.clear();
                line += 1;
                record_line = line;
            }
            // Text after a closing quote is kept as part of the field.
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(CatalogError::Malformed {
            line: record_line,
            message: "unterminated quoted field".to_string(),
        });
    }
    if !record.is_empty() || quoted || !field.trim().is_empty() {
        finish_field(&mut field, &mut quoted, &mut record);
        records.push((record_line, record));
    }

    Ok(records)
}

fn finish_field(field: &mut String, quoted: &mut bool, record: &mut Vec<String>) {
    let value = if *quoted {
        std::mem::take(field)
    } else {
        let trimmed = field.trim().to_string();
        field.clear();
        trimmed
    };
    *quoted = false;
    record.push(value);
}
