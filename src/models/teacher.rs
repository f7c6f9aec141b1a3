use serde::{Deserialize, Serialize};

use super::common::{Address, BankAccount, ClassAssignment, Contact, Document, FileRef, Qualification, SalaryDetails};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeacherProfile {
    pub employee_id: String,
    pub designation: String,
    pub department_id: String,
    pub joining_date: String,
    pub experience_years: f64,
    pub specialization: String,
    pub qualifications: Vec<Qualification>,
    pub classes: Vec<ClassAssignment>,
    pub salary_details: SalaryDetails,
    pub bank_account: BankAccount,
    pub emergency_contact: Contact,
    pub documents: Vec<Document>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Teacher {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    pub gender: String,
    pub status: String,
    pub profile_photo: FileRef,
    pub branch_id: String,
    pub address: Address,
    pub teacher_profile: TeacherProfile,
    pub qr_code_url: String,
}

impl Default for Teacher {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            phone: String::new(),
            date_of_birth: String::new(),
            gender: String::new(),
            status: "active".to_string(),
            profile_photo: FileRef::default(),
            branch_id: String::new(),
            address: Address::default(),
            teacher_profile: TeacherProfile::default(),
            qr_code_url: String::new(),
        }
    }
}
