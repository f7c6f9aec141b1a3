use serde::Serialize;

use crate::form::FormValue;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalarySummary {
    pub basic: f64,
    pub allowances: f64,
    pub deductions: f64,
    pub gross: f64,
    pub net: f64,
}

impl SalarySummary {
    /// Totals a `salaryDetails` sub-record. Every numeric leaf under
    /// `allowances` and `deductions` counts, whatever its key.
    pub fn from_details(details: &FormValue) -> Self {
        let basic = details
            .get("basicSalary")
            .and_then(FormValue::as_f64)
            .unwrap_or(0.0);
        let allowances = details.get("allowances").map(sum_leaves).unwrap_or(0.0);
        let deductions = details.get("deductions").map(sum_leaves).unwrap_or(0.0);
        let gross = basic + allowances;

        Self {
            basic,
            allowances,
            deductions,
            gross,
            net: gross - deductions,
        }
    }

    pub fn to_value(&self) -> FormValue {
        FormValue::object([
            ("basic", FormValue::from(self.basic)),
            ("allowances", FormValue::from(self.allowances)),
            ("deductions", FormValue::from(self.deductions)),
            ("gross", FormValue::from(self.gross)),
            ("net", FormValue::from(self.net)),
        ])
    }
}

fn sum_leaves(value: &FormValue) -> f64 {
    match value {
        FormValue::Object(map) => map.values().map(sum_leaves).sum(),
        FormValue::List(items) => items.iter().map(sum_leaves).sum(),
        leaf => leaf.as_f64().filter(|n| n.is_finite()).unwrap_or(0.0),
    }
}
