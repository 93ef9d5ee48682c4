//! Driver-independent row and parameter model
//!
//! Rows returned by a [`Session`](crate::Session) are decoded once into
//! [`Value`]s so services never touch driver types. Accessors are lossy on
//! purpose: a NULL number reads as `0` and a NULL string as `""`, which is how
//! the console has always presented missing catalog data.

use std::sync::Arc;

use chrono::NaiveDateTime;

static NULL: Value = Value::Null;

/// A single column value
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Timestamp(NaiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_i64(&self) -> i64 {
        match self {
            Value::Integer(v) => *v,
            Value::Float(v) => *v as i64,
            Value::Text(s) => s.trim().parse().unwrap_or(0),
            Value::Null | Value::Timestamp(_) => 0,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Value::Integer(v) => *v as f64,
            Value::Float(v) => *v,
            Value::Text(s) => s.trim().parse().unwrap_or(0.0),
            Value::Null | Value::Timestamp(_) => 0.0,
        }
    }

    pub fn as_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Integer(v) => v.to_string(),
            Value::Float(v) => v.to_string(),
            Value::Text(s) => s.clone(),
            Value::Timestamp(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// Text value, or `None` for NULL
    pub fn as_opt_text(&self) -> Option<String> {
        if self.is_null() {
            None
        } else {
            Some(self.as_text())
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Timestamp(ts) => Some(*ts),
            Value::Text(s) => oradmin_common::time::parse_timestamp(s),
            _ => None,
        }
    }

    /// Truthiness of flag columns produced by `CASE WHEN .. THEN 1 ELSE 0 END`
    pub fn as_bool(&self) -> bool {
        match self {
            Value::Text(s) => matches!(s.trim(), "1" | "YES" | "TRUE" | "Y"),
            other => other.as_i64() != 0,
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::Timestamp(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

/// A result row; columns are looked up case-insensitively.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    pub fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        Row { columns, values }
    }

    /// Build a row from `(column, value)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let (columns, values): (Vec<String>, Vec<Value>) =
            pairs.into_iter().map(|(c, v)| (c.into(), v)).unzip();
        Row {
            columns: columns.into(),
            values,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of the named column, or NULL when the column is absent
    pub fn get(&self, column: &str) -> &Value {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(column))
            .and_then(|i| self.values.get(i))
            .unwrap_or(&NULL)
    }

    /// Value at a zero-based position, or NULL when out of range
    pub fn at(&self, index: usize) -> &Value {
        self.values.get(index).unwrap_or(&NULL)
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

/// A named bind parameter (`:name` in the statement text)
#[derive(Clone, Debug, PartialEq)]
pub struct SqlParam {
    pub name: String,
    pub value: Value,
}

pub fn param(name: &str, value: impl Into<Value>) -> SqlParam {
    SqlParam {
        name: name.to_string(),
        value: value.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_reads_as_zero_and_empty() {
        assert_eq!(Value::Null.as_i64(), 0);
        assert_eq!(Value::Null.as_f64(), 0.0);
        assert_eq!(Value::Null.as_text(), "");
        assert_eq!(Value::Null.as_opt_text(), None);
        assert!(!Value::Null.as_bool());
    }

    #[test]
    fn test_numeric_conversions() {
        assert_eq!(Value::Float(42.0).as_i64(), 42);
        assert_eq!(Value::Text(" 17 ".into()).as_i64(), 17);
        assert_eq!(Value::Integer(3).as_f64(), 3.0);
        assert!(Value::Integer(1).as_bool());
        assert!(Value::Float(1.0).as_bool());
        assert!(!Value::Integer(0).as_bool());
    }

    #[test]
    fn test_row_lookup_is_case_insensitive() {
        let row = Row::from_pairs([
            ("FECHA_EVENTO", Value::from("2024-05-01 10:00:00")),
            ("exitoso", Value::Integer(1)),
        ]);
        assert!(row.get("exitoso").as_bool());
        assert!(row.get("EXITOSO").as_bool());
        assert!(row.get("fecha_evento").as_timestamp().is_some());
        assert!(row.get("missing").is_null());
        assert!(row.at(9).is_null());
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_option_into_value() {
        let none: Option<i64> = None;
        assert_eq!(Value::from(none), Value::Null);
        assert_eq!(Value::from(Some("x")), Value::Text("x".into()));
    }

    #[test]
    fn test_param() {
        let p = param("limite", 5);
        assert_eq!(p.name, "limite");
        assert_eq!(p.value, Value::Integer(5));
    }
}
