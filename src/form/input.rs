use serde_json::Number;

use crate::form::value::FormValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Text,
    Select,
    Date,
    Number,
    Checkbox,
}

/// A change event coming from a bound form control.
#[derive(Debug, Clone, PartialEq)]
pub struct InputEvent {
    pub kind: InputKind,
    pub value: String,
    pub checked: bool,
}

impl InputEvent {
    pub fn text(value: impl Into<String>) -> Self {
        Self { kind: InputKind::Text, value: value.into(), checked: false }
    }

    pub fn select(value: impl Into<String>) -> Self {
        Self { kind: InputKind::Select, value: value.into(), checked: false }
    }

    pub fn date(value: impl Into<String>) -> Self {
        Self { kind: InputKind::Date, value: value.into(), checked: false }
    }

    pub fn number(value: impl Into<String>) -> Self {
        Self { kind: InputKind::Number, value: value.into(), checked: false }
    }

    /// Checkbox controls report `checked`; their `value` attribute is ignored.
    pub fn checkbox(checked: bool) -> Self {
        Self { kind: InputKind::Checkbox, value: "on".to_string(), checked }
    }

    pub fn into_value(self) -> FormValue {
        match self.kind {
            InputKind::Checkbox => FormValue::Bool(self.checked),
            InputKind::Number => {
                let trimmed = self.value.trim();
                if trimmed.is_empty() {
                    return FormValue::Null;
                }
                if let Ok(int) = trimmed.parse::<i64>() {
                    return FormValue::Number(int.into());
                }
                trimmed
                    .parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(FormValue::Number)
                    .unwrap_or(FormValue::Text(self.value))
            }
            InputKind::Text | InputKind::Select | InputKind::Date => FormValue::Text(self.value),
        }
    }
}
