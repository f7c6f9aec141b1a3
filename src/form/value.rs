use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

pub type FormMap = BTreeMap<String, FormValue>;

/// Persistent record tree held by the editor.
///
/// Lists and objects sit behind `Arc`, so cloning a `FormValue` or rebuilding
/// one ancestor chain leaves every untouched branch shared with the previous
/// version.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum FormValue {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
    List(Arc<Vec<FormValue>>),
    Object(Arc<FormMap>),
}

impl FormValue {
    pub fn empty_object() -> Self {
        FormValue::Object(Arc::new(FormMap::new()))
    }

    pub fn empty_list() -> Self {
        FormValue::List(Arc::new(Vec::new()))
    }

    pub fn object<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, FormValue)>,
        K: Into<String>,
    {
        FormValue::Object(Arc::new(
            entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    pub fn list<I: IntoIterator<Item = FormValue>>(items: I) -> Self {
        FormValue::List(Arc::new(items.into_iter().collect()))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FormValue::Null)
    }

    pub fn as_object(&self) -> Option<&FormMap> {
        match self {
            FormValue::Object(map) => Some(&**map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FormValue]> {
        match self {
            FormValue::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FormValue::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FormValue::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Numbers, or text that parses as a number (form inputs often hold "5000").
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FormValue::Number(n) => n.as_f64(),
            FormValue::Text(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&FormValue> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Text form of a scalar, used by the report formatter. Containers and
    /// null have no display form.
    pub fn display(&self) -> Option<String> {
        match self {
            FormValue::Null | FormValue::List(_) | FormValue::Object(_) => None,
            FormValue::Bool(flag) => Some(if *flag { "Yes" } else { "No" }.to_string()),
            FormValue::Number(n) => Some(n.to_string()),
            FormValue::Text(text) => Some(text.clone()),
        }
    }

    /// True when both values point at the same shared branch. Scalars compare
    /// by value since they are never shared.
    pub fn same_branch(&self, other: &FormValue) -> bool {
        match (self, other) {
            (FormValue::Object(a), FormValue::Object(b)) => Arc::ptr_eq(a, b),
            (FormValue::List(a), FormValue::List(b)) => Arc::ptr_eq(a, b),
            (a, b) => a == b,
        }
    }

    /// Server id (`_id`) of a stored record.
    pub fn record_id(&self) -> Option<&str> {
        self.get("_id").and_then(FormValue::as_str).filter(|id| !id.is_empty())
    }
}

impl From<Value> for FormValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FormValue::Null,
            Value::Bool(flag) => FormValue::Bool(flag),
            Value::Number(n) => FormValue::Number(n),
            Value::String(text) => FormValue::Text(text),
            Value::Array(items) => FormValue::list(items.into_iter().map(FormValue::from)),
            Value::Object(map) => FormValue::object(map.into_iter().map(|(k, v)| (k, FormValue::from(v)))),
        }
    }
}

impl From<&FormValue> for Value {
    fn from(value: &FormValue) -> Self {
        match value {
            FormValue::Null => Value::Null,
            FormValue::Bool(flag) => Value::Bool(*flag),
            FormValue::Number(n) => Value::Number(n.clone()),
            FormValue::Text(text) => Value::String(text.clone()),
            FormValue::List(items) => Value::Array(items.iter().map(Value::from).collect()),
            FormValue::Object(map) => Value::Object(
                map.iter().map(|(k, v)| (k.clone(), Value::from(v))).collect(),
            ),
        }
    }
}

impl From<FormValue> for Value {
    fn from(value: FormValue) -> Self {
        Value::from(&value)
    }
}

impl From<&str> for FormValue {
    fn from(text: &str) -> Self {
        FormValue::Text(text.to_string())
    }
}

impl From<String> for FormValue {
    fn from(text: String) -> Self {
        FormValue::Text(text)
    }
}

impl From<bool> for FormValue {
    fn from(flag: bool) -> Self {
        FormValue::Bool(flag)
    }
}

impl From<f64> for FormValue {
    fn from(n: f64) -> Self {
        Number::from_f64(n).map(FormValue::Number).unwrap_or(FormValue::Null)
    }
}

impl From<i64> for FormValue {
    fn from(n: i64) -> Self {
        FormValue::Number(n.into())
    }
}
