//! Tabular input data for report sections.
//!
//! A [`Record`] is one row of aggregated data: an *ordered* mapping from
//! column name to scalar value. Column order is significant — the first key
//! is the display label or chart category, subsequent keys carry values. A
//! [`Dataset`] is an ordered sequence of records sharing the same key shape;
//! the first record's key order defines the table header row and chart
//! series names.
//!
//! Datasets are produced by an external aggregation step and consumed
//! read-only by the composer. The composer makes no assumption about how
//! they were computed, only about shape.

use crate::common::{Error, Result};

/// A scalar cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Plain text
    Text(String),
    /// Integer count
    Int(i64),
    /// Floating-point number
    Float(f64),
}

impl Value {
    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Text(_) => None,
        }
    }

    /// Render the value the way report cells display it: numbers as
    /// thousands-grouped integers with no decimals, text as-is.
    ///
    /// # Examples
    ///
    /// ```
    /// use statusdeck::dataset::Value;
    /// assert_eq!(Value::Int(1_234_567).display_cell(), "1,234,567");
    /// assert_eq!(Value::Float(12.0).display_cell(), "12");
    /// assert_eq!(Value::Text("ERROR".into()).display_cell(), "ERROR");
    /// ```
    pub fn display_cell(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Int(i) => group_thousands(*i),
            Value::Float(f) => group_thousands(f.round() as i64),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<u64> for Value {
    fn from(i: u64) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

/// One row of aggregated data with ordered columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    columns: Vec<(String, Value)>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: append a column.
    ///
    /// # Examples
    ///
    /// ```
    /// use statusdeck::dataset::Record;
    /// let rec = Record::new().with("status", "ERROR").with("count", 5i64);
    /// assert_eq!(rec.keys().collect::<Vec<_>>(), vec!["status", "count"]);
    /// ```
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.columns.push((key.to_string(), value.into()));
        self
    }

    /// Append a column in place.
    pub fn push(&mut self, key: &str, value: impl Into<Value>) {
        self.columns.push((key.to_string(), value.into()));
    }

    /// Ordered column names.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(k, _)| k.as_str())
    }

    /// Look up a value by column name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Ordered values.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.columns.iter().map(|(_, v)| v)
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the record has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// An ordered sequence of records sharing column shape.
pub type Dataset = Vec<Record>;

/// Check that every record carries the same keys in the same order as the
/// first, and that at least `required` columns are present.
///
/// Returns the first record's ordered keys on success.
pub fn validate_shape(data: &[Record], required: usize) -> Result<Vec<String>> {
    let first = match data.first() {
        Some(r) => r,
        None => return Ok(Vec::new()),
    };

    let headers: Vec<String> = first.keys().map(String::from).collect();
    if headers.len() < required {
        return Err(Error::InsufficientColumns {
            required,
            found: headers.len(),
        });
    }

    for (idx, record) in data.iter().enumerate().skip(1) {
        if !record.keys().eq(headers.iter().map(String::as_str)) {
            return Err(Error::MalformedDataset(format!(
                "record {} has keys [{}], expected [{}]",
                idx,
                record.keys().collect::<Vec<_>>().join(", "),
                headers.join(", ")
            )));
        }
    }

    Ok(headers)
}

/// Extract one numeric column as f64 values, by key.
///
/// Fails with [`Error::MissingKey`] if any record lacks the key, and with
/// [`Error::MalformedDataset`] if a value under the key is not numeric.
pub fn numeric_column(data: &[Record], key: &str) -> Result<Vec<f64>> {
    data.iter()
        .map(|record| {
            let value = record
                .get(key)
                .ok_or_else(|| Error::MissingKey(key.to_string()))?;
            value.as_f64().ok_or_else(|| {
                Error::MalformedDataset(format!("non-numeric value under key '{}'", key))
            })
        })
        .collect()
}

/// Extract one column as display text, by key.
///
/// Fails with [`Error::MissingKey`] if any record lacks the key.
pub fn text_column(data: &[Record], key: &str) -> Result<Vec<String>> {
    data.iter()
        .map(|record| {
            record
                .get(key)
                .map(Value::display_cell)
                .ok_or_else(|| Error::MissingKey(key.to_string()))
        })
        .collect()
}

/// Format an integer with thousands separators.
///
/// # Examples
///
/// ```
/// use statusdeck::dataset::group_thousands;
/// assert_eq!(group_thousands(1_234_567), "1,234,567");
/// assert_eq!(group_thousands(-5000), "-5,000");
/// assert_eq!(group_thousands(42), "42");
/// ```
pub fn group_thousands(value: i64) -> String {
    let mut buffer = itoa::Buffer::new();
    let digits = buffer.format(value);
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    grouped.push_str(sign);
    let lead = digits.len() % 3;
    if lead > 0 {
        grouped.push_str(&digits[..lead]);
        if digits.len() > lead {
            grouped.push(',');
        }
    }
    for (i, chunk) in digits[lead..].as_bytes().chunks(3).enumerate() {
        if i > 0 {
            grouped.push(',');
        }
        grouped.push_str(std::str::from_utf8(chunk).expect("ascii digits"));
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
        assert_eq!(group_thousands(-1_234_567), "-1,234,567");
        assert_eq!(group_thousands(100_000), "100,000");
    }

    #[test]
    fn test_display_cell_drops_decimals() {
        assert_eq!(Value::Float(12.0).display_cell(), "12");
        assert_eq!(Value::Float(1234.6).display_cell(), "1,235");
        assert_eq!(Value::Int(5).display_cell(), "5");
    }

    #[test]
    fn test_validate_shape_uniform() {
        let data = vec![
            Record::new().with("status", "ERROR").with("count", 5i64),
            Record::new().with("status", "TIMEOUT").with("count", 3i64),
        ];
        let headers = validate_shape(&data, 2).unwrap();
        assert_eq!(headers, vec!["status", "count"]);
    }

    #[test]
    fn test_validate_shape_reordered_keys() {
        let data = vec![
            Record::new().with("status", "ERROR").with("count", 5i64),
            Record::new().with("count", 3i64).with("status", "TIMEOUT"),
        ];
        assert!(matches!(
            validate_shape(&data, 2),
            Err(Error::MalformedDataset(_))
        ));
    }

    #[test]
    fn test_validate_shape_insufficient_columns() {
        let data = vec![Record::new().with("status", "ERROR")];
        assert!(matches!(
            validate_shape(&data, 2),
            Err(Error::InsufficientColumns {
                required: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn test_validate_shape_empty_is_ok() {
        assert!(validate_shape(&[], 3).unwrap().is_empty());
    }

    #[test]
    fn test_numeric_column_missing_key() {
        let data = vec![Record::new().with("status", "ERROR")];
        assert!(matches!(
            numeric_column(&data, "count"),
            Err(Error::MissingKey(k)) if k == "count"
        ));
    }

    #[test]
    fn test_numeric_column_values() {
        let data = vec![
            Record::new().with("status", "ERROR").with("count", 5i64),
            Record::new().with("status", "TIMEOUT").with("count", 3i64),
        ];
        assert_eq!(numeric_column(&data, "count").unwrap(), vec![5.0, 3.0]);
    }
}
