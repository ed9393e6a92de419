//! Wire-level value domain: the three semantic types a column may carry.

use std::fmt;

use crate::error::{ControlError, ControlResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Str(s) => write!(f, "{s}"),
        }
    }
}

impl Value {
    pub fn parse(_col: &str, text: &str) -> ControlResult<Value> {
        if let Ok(i) = text.parse::<i64>() {
            return Ok(Value::Int(i));
        }
        if let Ok(f) = text.parse::<f64>() {
            return Ok(Value::Float(f));
        }
        Ok(Value::Str(text.to_string()))
    }

    pub fn as_f64(&self) -> ControlResult<f64> {
        match self {
            Value::Int(i) => Ok(*i as f64),
            Value::Float(f) => Ok(*f),
            Value::Str(s) => s.parse().map_err(|_| ControlError::BadValue("?".into(), s.clone())),
        }
    }

    pub fn as_i64(&self) -> ControlResult<i64> {
        match self {
            Value::Int(i) => Ok(*i),
            Value::Float(f) => Ok(*f as i64),
            Value::Str(s) => s.parse().map_err(|_| ControlError::BadValue("?".into(), s.clone())),
        }
    }

    pub fn as_str(&self) -> String {
        self.to_string()
    }
}
