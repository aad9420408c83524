//! Options handed to table sources and sinks

use crate::error::{FrameError, FrameResult};
use crate::infrastructure::hash::{key_map, KeyMap};
use crate::types::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Parses one raw field into a cell value
pub type ValueParser = Arc<dyn Fn(&str) -> FrameResult<Value> + Send + Sync>;

/// Derives a row key from the raw fields of a record
pub type RowKeyParser<R> = Arc<dyn Fn(&[&str]) -> FrameResult<R> + Send + Sync>;

/// Maps a column name and its index in the source to the name used in the table
pub type ColumnNameMapping = Arc<dyn Fn(&str, usize) -> String + Send + Sync>;

/// Infer a value from raw text
///
/// Empty text is null; `true`/`false` are booleans; integers become int or
/// long by magnitude; other numbers are doubles; everything else is text.
/// Surrounding whitespace is dropped in every case.
pub fn infer_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    match trimmed {
        "true" => return Value::Boolean(true),
        "false" => return Value::Boolean(false),
        _ => {}
    }
    if let Ok(v) = trimmed.parse::<i32>() {
        Value::Int(v)
    } else if let Ok(v) = trimmed.parse::<i64>() {
        Value::Long(v)
    } else if let Ok(v) = trimmed.parse::<f64>() {
        Value::Double(v)
    } else {
        Value::Text(trimmed.to_string())
    }
}

/// Options describing how a source should read a table
///
/// # Example
/// ```
/// use framestore::io::ReadOptions;
/// use framestore::types::Value;
///
/// let mut options: ReadOptions<i64> = ReadOptions::new();
/// options
///     .set_resource("cars93.csv")
///     .set_exclude_column_indexes([0])
///     .set_row_key_parser(|fields| Ok(fields[0].parse().unwrap_or_default()));
///
/// assert!(!options.is_column_included(0));
/// assert_eq!(options.parse_value("MPG", "31").unwrap(), Value::Int(31));
/// assert_eq!(options.parse_row_key(&["42", "Audi"]).unwrap(), Some(42));
/// ```
#[derive(Clone)]
pub struct ReadOptions<R> {
    resource: Option<String>,
    header: bool,
    exclude_column_indexes: Vec<usize>,
    include_column_indexes: Option<Vec<usize>>,
    parsers: KeyMap<String, ValueParser>,
    row_key_parser: Option<RowKeyParser<R>>,
    column_name_mapping: Option<ColumnNameMapping>,
}

impl<R> ReadOptions<R> {
    /// Options with a header row and every column included
    pub fn new() -> Self {
        Self {
            resource: None,
            header: true,
            exclude_column_indexes: Vec::new(),
            include_column_indexes: None,
            parsers: key_map(0),
            row_key_parser: None,
            column_name_mapping: None,
        }
    }

    /// File path, URL or other locator the source understands
    pub fn set_resource<S: Into<String>>(&mut self, resource: S) -> &mut Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn set_header(&mut self, header: bool) -> &mut Self {
        self.header = header;
        self
    }

    pub fn set_exclude_column_indexes<I>(&mut self, indexes: I) -> &mut Self
    where
        I: IntoIterator<Item = usize>,
    {
        self.exclude_column_indexes = indexes.into_iter().collect();
        self
    }

    /// Restrict reading to these source column indexes
    pub fn set_include_column_indexes<I>(&mut self, indexes: I) -> &mut Self
    where
        I: IntoIterator<Item = usize>,
    {
        self.include_column_indexes = Some(indexes.into_iter().collect());
        self
    }

    /// Parser for one column, by its name in the source
    pub fn set_parser<S, F>(&mut self, column: S, parser: F) -> &mut Self
    where
        S: Into<String>,
        F: Fn(&str) -> FrameResult<Value> + Send + Sync + 'static,
    {
        self.parsers.insert(column.into(), Arc::new(parser));
        self
    }

    pub fn set_row_key_parser<F>(&mut self, parser: F) -> &mut Self
    where
        F: Fn(&[&str]) -> FrameResult<R> + Send + Sync + 'static,
    {
        self.row_key_parser = Some(Arc::new(parser));
        self
    }

    pub fn set_column_name_mapping<F>(&mut self, mapping: F) -> &mut Self
    where
        F: Fn(&str, usize) -> String + Send + Sync + 'static,
    {
        self.column_name_mapping = Some(Arc::new(mapping));
        self
    }

    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }

    /// Resource that must have been set
    pub fn require_resource(&self) -> FrameResult<&str> {
        self.resource()
            .ok_or_else(|| FrameError::InvalidConfig("no resource configured".to_string()))
    }

    pub fn header(&self) -> bool {
        self.header
    }

    pub fn exclude_column_indexes(&self) -> &[usize] {
        &self.exclude_column_indexes
    }

    pub fn include_column_indexes(&self) -> Option<&[usize]> {
        self.include_column_indexes.as_deref()
    }

    /// Returns true if the source column at `index` should be read
    pub fn is_column_included(&self, index: usize) -> bool {
        if self.exclude_column_indexes.contains(&index) {
            return false;
        }
        match &self.include_column_indexes {
            Some(included) => included.contains(&index),
            None => true,
        }
    }

    /// Table column name for a source column, after any mapping
    pub fn column_name(&self, name: &str, index: usize) -> String {
        match &self.column_name_mapping {
            Some(mapping) => mapping(name, index),
            None => name.to_string(),
        }
    }

    /// Parse a field with the column's parser, or infer its value
    pub fn parse_value(&self, column: &str, raw: &str) -> FrameResult<Value> {
        match self.parsers.get(column) {
            Some(parser) => parser(raw),
            None => Ok(infer_value(raw)),
        }
    }

    /// Row key for a record, if a row key parser is configured
    pub fn parse_row_key(&self, fields: &[&str]) -> FrameResult<Option<R>> {
        self.row_key_parser
            .as_ref()
            .map(|parser| parser(fields))
            .transpose()
    }
}

impl<R> Default for ReadOptions<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> fmt::Debug for ReadOptions<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parsers: Vec<&String> = self.parsers.keys().collect();
        parsers.sort();
        f.debug_struct("ReadOptions")
            .field("resource", &self.resource)
            .field("header", &self.header)
            .field("exclude_column_indexes", &self.exclude_column_indexes)
            .field("include_column_indexes", &self.include_column_indexes)
            .field("parsers", &parsers)
            .field("row_key_parser", &self.row_key_parser.is_some())
            .field("column_name_mapping", &self.column_name_mapping.is_some())
            .finish()
    }
}

/// Options describing how a sink should write a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriteOptions {
    /// File path or other locator the sink understands
    pub resource: Option<String>,
    /// Label written for the row key column
    pub title: Option<String>,
    /// Whether to write a header record
    pub header: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            resource: None,
            title: None,
            header: true,
        }
    }
}

impl WriteOptions {
    pub fn set_resource<S: Into<String>>(&mut self, resource: S) -> &mut Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn set_title<S: Into<String>>(&mut self, title: S) -> &mut Self {
        self.title = Some(title.into());
        self
    }

    pub fn set_header(&mut self, header: bool) -> &mut Self {
        self.header = header;
        self
    }
}
