pub mod common;
pub mod pagination;
pub mod record;
pub mod staff;
pub mod student;
pub mod teacher;

pub use common::{
    Address, Allowances, BankAccount, ClassAssignment, Contact, Deductions, Document, FileRef, Qualification,
    SalaryDetails, parse_date,
};
pub use pagination::Pagination;
pub use record::{GuardianType, RecordKind, Tab};
pub use staff::{Staff, StaffProfile};
pub use student::{AcademicInfo, GuardianInfo, MedicalInfo, Parent, ParentInfo, Student};
pub use teacher::{Teacher, TeacherProfile};
