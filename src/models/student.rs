use serde::{Deserialize, Serialize};

use super::common::{Address, Contact, Document, FileRef};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Parent {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub occupation: String,
    pub cnic: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParentInfo {
    pub father: Parent,
    pub mother: Parent,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuardianInfo {
    pub name: String,
    pub relation: String,
    pub phone: String,
    pub email: String,
    pub address: Address,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AcademicInfo {
    pub admission_date: String,
    pub previous_school: String,
    pub previous_class: String,
    pub academic_year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicalInfo {
    pub blood_group: String,
    pub allergies: String,
    pub conditions: String,
    pub medications: String,
    pub emergency_contact: Contact,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Student {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub date_of_birth: String,
    pub gender: String,
    pub status: String,
    pub profile_photo: FileRef,
    pub branch_id: String,
    pub roll_number: String,
    pub admission_number: String,
    pub class_id: String,
    pub section: String,
    pub guardian_type: String,
    pub address: Address,
    pub parent_info: ParentInfo,
    pub guardian_info: GuardianInfo,
    pub academic_info: AcademicInfo,
    pub medical_info: MedicalInfo,
    pub documents: Vec<Document>,
    pub qr_code_url: String,
}

impl Default for Student {
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
            roll_number: String::new(),
            admission_number: String::new(),
            class_id: String::new(),
            section: String::new(),
            guardian_type: "parent".to_string(),
            address: Address::default(),
            parent_info: ParentInfo::default(),
            guardian_info: GuardianInfo::default(),
            academic_info: AcademicInfo::default(),
            medical_info: MedicalInfo::default(),
            documents: Vec::new(),
            qr_code_url: String::new(),
        }
    }
}
