use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::shared::AppError;

/// A single bound value, either sent to the database or read back from it
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Bool(bool),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Int(_) => 2,
            Value::Text(_) => 3,
            Value::Timestamp(_) => 4,
        }
    }

    /// Total ordering used for sorting; NULL sorts lowest.
    pub fn compare(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Timestamp(a), Value::Timestamp(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
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

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Timestamp(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

static NULL: Value = Value::Null;

/// A result row keyed by output column name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: BTreeMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for seeding test data
    pub fn with(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn insert(&mut self, column: &str, value: impl Into<Value>) {
        self.values.insert(column.to_string(), value.into());
    }

    /// Missing columns read as NULL, the way a left join fills them in.
    pub fn value(&self, column: &str) -> &Value {
        self.values.get(column).unwrap_or(&NULL)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Copies every column of `other` into this row
    pub fn merge(&mut self, other: &Row) {
        for (column, value) in other.iter() {
            self.values.insert(column.to_string(), value.clone());
        }
    }

    pub fn get_i64(&self, column: &str) -> Result<i64, AppError> {
        match self.opt_i64(column)? {
            Some(value) => Ok(value),
            None => Err(AppError::DecodeError(format!("column {} is null", column))),
        }
    }

    pub fn opt_i64(&self, column: &str) -> Result<Option<i64>, AppError> {
        match self.require(column)? {
            Value::Null => Ok(None),
            Value::Int(v) => Ok(Some(*v)),
            Value::Bool(b) => Ok(Some(*b as i64)),
            other => Err(mismatch(column, "integer", other)),
        }
    }

    /// Flags are stored as 0/1 integers or native booleans.
    pub fn get_bool(&self, column: &str) -> Result<bool, AppError> {
        match self.require(column)? {
            Value::Bool(b) => Ok(*b),
            Value::Int(v) => Ok(*v != 0),
            other => Err(mismatch(column, "boolean", other)),
        }
    }

    pub fn opt_string(&self, column: &str) -> Result<Option<String>, AppError> {
        match self.require(column)? {
            Value::Null => Ok(None),
            Value::Text(s) => Ok(Some(s.clone())),
            other => Err(mismatch(column, "text", other)),
        }
    }

    pub fn get_string(&self, column: &str) -> Result<String, AppError> {
        Ok(self.opt_string(column)?.unwrap_or_default())
    }

    pub fn opt_timestamp(&self, column: &str) -> Result<Option<DateTime<Utc>>, AppError> {
        match self.require(column)? {
            Value::Null => Ok(None),
            Value::Timestamp(t) => Ok(Some(*t)),
            other => Err(mismatch(column, "timestamp", other)),
        }
    }

    fn require(&self, column: &str) -> Result<&Value, AppError> {
        self.values
            .get(column)
            .ok_or_else(|| AppError::DecodeError(format!("missing column {}", column)))
    }
}

fn mismatch(column: &str, expected: &str, found: &Value) -> AppError {
    AppError::DecodeError(format!(
        "column {} expected {}, found {:?}",
        column, expected, found
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_column_is_a_decode_error() {
        let row = Row::new().with("id", 1);
        assert!(matches!(
            row.get_i64("agent_id"),
            Err(AppError::DecodeError(_))
        ));
    }

    #[test]
    fn flags_accept_integers_and_booleans() {
        let row = Row::new().with("a", 1).with("b", 0).with("c", true);
        assert!(row.get_bool("a").unwrap());
        assert!(!row.get_bool("b").unwrap());
        assert!(row.get_bool("c").unwrap());
    }

    #[test]
    fn null_text_reads_as_empty_string() {
        let row = Row::new().with("icon", Option::<String>::None);
        assert_eq!(row.get_string("icon").unwrap(), "");
        assert_eq!(row.opt_string("icon").unwrap(), None);
    }

    #[test]
    fn wrong_type_is_rejected() {
        let row = Row::new().with("name", "lobby");
        assert!(matches!(row.get_i64("name"), Err(AppError::DecodeError(_))));
    }

    #[test]
    fn null_sorts_below_everything() {
        assert_eq!(Value::Null.compare(&Value::Int(-5)), Ordering::Less);
        assert_eq!(Value::Int(3).compare(&Value::Int(2)), Ordering::Greater);
    }
}
