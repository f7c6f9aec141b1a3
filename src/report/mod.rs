//! Printable documents built from a fully loaded record.
//!
//! Rendering is pure: a record (usually run through [`view_model`]), a
//! [`Template`] and the [`StaticAssets`] go in, an HTML string comes out.
//! Fields the record lacks render as empty text instead of failing.

pub mod attendance;
pub mod payroll;
pub mod template;
pub mod templates;

use std::sync::Arc;

use crate::form::{get_path, FormMap, FormValue};
use crate::models::{GuardianType, RecordKind};

pub use attendance::{AttendanceEntry, AttendanceStatus, AttendanceSummary};
pub use payroll::SalarySummary;
pub use template::{escape_html, StaticAssets, Template};

pub fn format(record: &FormValue, template: &Template, assets: &StaticAssets) -> String {
    template.render(record, assets)
}

/// Formats `record` after adding the computed fields templates rely on.
pub fn render(kind: RecordKind, record: &FormValue, template: &Template, assets: &StaticAssets) -> String {
    format(&view_model(kind, record), template, assets)
}

pub fn full_name(record: &FormValue) -> String {
    let part = |key: &str| {
        record
            .get(key)
            .and_then(FormValue::as_str)
            .unwrap_or("")
            .trim()
            .to_string()
    };
    let first = part("firstName");
    let last = part("lastName");
    format!("{} {}", first, last).trim().to_string()
}

/// Record plus `fullName`, `kindLabel` and, per kind, `contactName`
/// (students) or `employment` and `payroll` (teachers and staff).
pub fn view_model(kind: RecordKind, record: &FormValue) -> FormValue {
    let mut fields = vec![
        ("fullName", FormValue::from(full_name(record))),
        ("kindLabel", FormValue::from(kind.label())),
    ];

    match kind {
        RecordKind::Student => {
            let contact = match GuardianType::from_record(record) {
                GuardianType::Parent => first_text(record, &["parentInfo.father.name", "parentInfo.mother.name"]),
                GuardianType::Guardian => first_text(record, &["guardianInfo.name"]),
            };
            fields.push(("contactName", FormValue::from(contact)));
        }
        RecordKind::Teacher | RecordKind::Staff => {
            let profile_key = if kind == RecordKind::Teacher { "teacherProfile" } else { "staffProfile" };
            let profile = record.get(profile_key).cloned().unwrap_or_else(FormValue::empty_object);
            let salary = profile.get("salaryDetails").cloned().unwrap_or_default();
            fields.push(("payroll", SalarySummary::from_details(&salary).to_value()));
            fields.push(("employment", profile));
        }
    }

    with_fields(record, fields)
}

/// View model for the attendance report of one record.
pub fn attendance_view(kind: RecordKind, record: &FormValue, entries: &[AttendanceEntry]) -> FormValue {
    let mut sorted = entries.to_vec();
    sorted.sort_by_key(|entry| entry.date);

    let rows = sorted.iter().map(|entry| {
        FormValue::object([
            ("date", FormValue::from(entry.date.format("%Y-%m-%d").to_string())),
            ("status", FormValue::from(entry.status.label())),
        ])
    });

    with_fields(
        &view_model(kind, record),
        vec![
            ("attendance", AttendanceSummary::from_entries(entries).to_value()),
            ("attendanceEntries", FormValue::list(rows)),
        ],
    )
}

fn first_text(record: &FormValue, paths: &[&str]) -> String {
    paths
        .iter()
        .filter_map(|path| get_path(record, path).and_then(FormValue::as_str))
        .map(str::trim)
        .find(|text| !text.is_empty())
        .unwrap_or("")
        .to_string()
}

fn with_fields(record: &FormValue, fields: Vec<(&str, FormValue)>) -> FormValue {
    let mut map: FormMap = record.as_object().cloned().unwrap_or_default();
    for (key, value) in fields {
        map.insert(key.to_string(), value);
    }
    FormValue::Object(Arc::new(map))
}
