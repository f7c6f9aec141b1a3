use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::form::{get_path, FormValue};

use super::{parse_date, Staff, Student, Teacher};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Student,
    Teacher,
    Staff,
}

/// A named group of fields shown together in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tab {
    pub id: &'static str,
    pub label: &'static str,
    /// Path prefixes bound by this tab.
    pub fields: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Check {
    Required,
    Email,
    Date,
}

#[derive(Debug, Clone, Copy)]
struct Rule {
    path: &'static str,
    label: &'static str,
    check: Check,
}

const fn rule(path: &'static str, label: &'static str, check: Check) -> Rule {
    Rule { path, label, check }
}

const PERSONAL_FIELDS: &[&str] = &[
    "firstName", "lastName", "email", "phone", "dateOfBirth", "gender", "status", "profilePhoto", "address",
];

const STUDENT_TABS: &[Tab] = &[
    Tab { id: "personal", label: "Personal", fields: PERSONAL_FIELDS },
    Tab { id: "parent", label: "Parent / Guardian", fields: &["guardianType", "parentInfo", "guardianInfo"] },
    Tab {
        id: "academic",
        label: "Academic",
        fields: &["classId", "section", "rollNumber", "admissionNumber", "academicInfo"],
    },
    Tab { id: "medical", label: "Medical", fields: &["medicalInfo"] },
    Tab { id: "documents", label: "Documents", fields: &["documents"] },
];

const TEACHER_TABS: &[Tab] = &[
    Tab { id: "personal", label: "Personal", fields: PERSONAL_FIELDS },
    Tab {
        id: "professional",
        label: "Professional",
        fields: &[
            "teacherProfile.employeeId",
            "teacherProfile.designation",
            "teacherProfile.departmentId",
            "teacherProfile.joiningDate",
            "teacherProfile.experienceYears",
            "teacherProfile.specialization",
            "teacherProfile.qualifications",
            "teacherProfile.classes",
        ],
    },
    Tab { id: "salary", label: "Salary", fields: &["teacherProfile.salaryDetails"] },
    Tab {
        id: "bank",
        label: "Bank & Emergency",
        fields: &["teacherProfile.bankAccount", "teacherProfile.emergencyContact"],
    },
    Tab { id: "documents", label: "Documents", fields: &["teacherProfile.documents"] },
];

const STAFF_TABS: &[Tab] = &[
    Tab { id: "personal", label: "Personal", fields: PERSONAL_FIELDS },
    Tab {
        id: "employment",
        label: "Employment",
        fields: &[
            "staffProfile.employeeId",
            "staffProfile.designation",
            "staffProfile.departmentId",
            "staffProfile.joiningDate",
            "staffProfile.shift",
            "staffProfile.qualifications",
        ],
    },
    Tab { id: "salary", label: "Salary", fields: &["staffProfile.salaryDetails"] },
    Tab {
        id: "bank",
        label: "Bank & Emergency",
        fields: &["staffProfile.bankAccount", "staffProfile.emergencyContact"],
    },
    Tab { id: "documents", label: "Documents", fields: &["staffProfile.documents"] },
];

const IDENTITY_RULES: &[Rule] = &[
    rule("firstName", "First name", Check::Required),
    rule("lastName", "Last name", Check::Required),
    rule("email", "Email", Check::Required),
    rule("email", "Email", Check::Email),
    rule("dateOfBirth", "Date of birth", Check::Date),
];

const STUDENT_RULES: &[Rule] = &[
    rule("classId", "Class", Check::Required),
    rule("academicInfo.admissionDate", "Admission date", Check::Date),
];

const TEACHER_RULES: &[Rule] = &[rule("teacherProfile.joiningDate", "Joining date", Check::Date)];

const STAFF_RULES: &[Rule] = &[rule("staffProfile.joiningDate", "Joining date", Check::Date)];

const GUARDIAN_RULES: &[Rule] = &[
    rule("guardianInfo.name", "Guardian name", Check::Required),
    rule("guardianInfo.phone", "Guardian phone", Check::Required),
];

/// Which sub-record carries a student's family contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuardianType {
    Parent,
    Guardian,
}

impl GuardianType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GuardianType::Parent => "parent",
            GuardianType::Guardian => "guardian",
        }
    }

    /// Sub-record shown for this discriminator.
    pub fn branch(&self) -> &'static str {
        match self {
            GuardianType::Parent => "parentInfo",
            GuardianType::Guardian => "guardianInfo",
        }
    }

    pub fn from_record(record: &FormValue) -> Self {
        match record.get("guardianType").and_then(FormValue::as_str) {
            Some("guardian") => GuardianType::Guardian,
            _ => GuardianType::Parent,
        }
    }
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [RecordKind::Student, RecordKind::Teacher, RecordKind::Staff];

    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Student => "Student",
            RecordKind::Teacher => "Teacher",
            RecordKind::Staff => "Staff",
        }
    }

    /// Empty record with every nested sub-record the server expects.
    pub fn template(&self) -> Result<FormValue, AppError> {
        let value = match self {
            RecordKind::Student => serde_json::to_value(Student::default())?,
            RecordKind::Teacher => serde_json::to_value(Teacher::default())?,
            RecordKind::Staff => serde_json::to_value(Staff::default())?,
        };
        Ok(FormValue::from(value))
    }

    pub fn tabs(&self) -> &'static [Tab] {
        match self {
            RecordKind::Student => STUDENT_TABS,
            RecordKind::Teacher => TEACHER_TABS,
            RecordKind::Staff => STAFF_TABS,
        }
    }

    pub fn first_tab(&self) -> &'static Tab {
        &self.tabs()[0]
    }

    pub fn tab(&self, id: &str) -> Option<&'static Tab> {
        self.tabs().iter().find(|tab| tab.id == id)
    }

    /// Tab whose fields cover `path`.
    pub fn tab_of(&self, path: &str) -> Option<&'static Tab> {
        self.tabs().iter().find(|tab| {
            tab.fields.iter().any(|prefix| {
                path == *prefix
                    || path
                        .strip_prefix(prefix)
                        .is_some_and(|rest| rest.starts_with('.'))
            })
        })
    }

    pub fn documents_path(&self) -> &'static str {
        match self {
            RecordKind::Student => "documents",
            RecordKind::Teacher => "teacherProfile.documents",
            RecordKind::Staff => "staffProfile.documents",
        }
    }

    pub fn qualifications_path(&self) -> Option<&'static str> {
        match self {
            RecordKind::Student => None,
            RecordKind::Teacher => Some("teacherProfile.qualifications"),
            RecordKind::Staff => Some("staffProfile.qualifications"),
        }
    }

    pub fn classes_path(&self) -> Option<&'static str> {
        match self {
            RecordKind::Teacher => Some("teacherProfile.classes"),
            _ => None,
        }
    }

    pub fn salary_path(&self) -> Option<&'static str> {
        match self {
            RecordKind::Student => None,
            RecordKind::Teacher => Some("teacherProfile.salaryDetails"),
            RecordKind::Staff => Some("staffProfile.salaryDetails"),
        }
    }

    /// Client-side checks run before a record is submitted. Returns one
    /// message per failed rule, prefixed with the tab holding the field.
    pub fn validate(&self, record: &FormValue) -> Vec<String> {
        let kind_rules = match self {
            RecordKind::Student => STUDENT_RULES,
            RecordKind::Teacher => TEACHER_RULES,
            RecordKind::Staff => STAFF_RULES,
        };
        let guardian_rules = match self {
            RecordKind::Student if GuardianType::from_record(record) == GuardianType::Guardian => GUARDIAN_RULES,
            _ => &[],
        };

        IDENTITY_RULES
            .iter()
            .chain(kind_rules)
            .chain(guardian_rules)
            .filter_map(|rule| {
                let text = get_path(record, rule.path)
                    .and_then(FormValue::display)
                    .unwrap_or_default();
                let text = text.trim();
                let problem = match rule.check {
                    Check::Required if text.is_empty() => Some(format!("{} is required", rule.label)),
                    Check::Email if !text.is_empty() && !looks_like_email(text) => {
                        Some(format!("{} is not a valid email address", rule.label))
                    }
                    Check::Date if !text.is_empty() && parse_date(text).is_none() => {
                        Some(format!("{} must be a date (YYYY-MM-DD)", rule.label))
                    }
                    _ => None,
                }?;
                let tab = self.tab_of(rule.path).map(|tab| tab.label).unwrap_or("General");
                Some(format!("{}: {}", tab, problem))
            })
            .collect()
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn looks_like_email(text: &str) -> bool {
    match text.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.starts_with('.') && domain.contains('.') && !domain.ends_with('.')
        }
        None => false,
    }
}
