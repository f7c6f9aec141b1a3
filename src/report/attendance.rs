use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::form::FormValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Leave,
}

impl AttendanceStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::Late => "Late",
            AttendanceStatus::Leave => "Leave",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceEntry {
    pub date: NaiveDate,
    pub status: AttendanceStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    pub total: u32,
    pub present: u32,
    pub absent: u32,
    pub late: u32,
    pub leave: u32,
    /// Late arrivals count as attended.
    pub percentage: f64,
}

impl AttendanceSummary {
    pub fn from_entries(entries: &[AttendanceEntry]) -> Self {
        let mut summary = entries.iter().fold(Self::default(), |mut acc, entry| {
            acc.total += 1;
            match entry.status {
                AttendanceStatus::Present => acc.present += 1,
                AttendanceStatus::Absent => acc.absent += 1,
                AttendanceStatus::Late => acc.late += 1,
                AttendanceStatus::Leave => acc.leave += 1,
            }
            acc
        });

        if summary.total > 0 {
            let attended = f64::from(summary.present + summary.late);
            summary.percentage = (attended / f64::from(summary.total) * 10_000.0).round() / 100.0;
        }
        summary
    }

    pub fn to_value(&self) -> FormValue {
        FormValue::object([
            ("total", FormValue::from(i64::from(self.total))),
            ("present", FormValue::from(i64::from(self.present))),
            ("absent", FormValue::from(i64::from(self.absent))),
            ("late", FormValue::from(i64::from(self.late))),
            ("leave", FormValue::from(i64::from(self.leave))),
            ("percentage", FormValue::from(self.percentage)),
        ])
    }
}
