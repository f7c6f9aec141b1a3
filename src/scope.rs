use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    BranchAdmin,
}

/// Who a screen is mounted for. A branch scope narrows list queries to one
/// branch and stamps that branch onto new records; a global scope does neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    pub role: Role,
    pub branch_id: Option<String>,
}

impl Scope {
    pub fn global() -> Self {
        Self { role: Role::SuperAdmin, branch_id: None }
    }

    pub fn branch(branch_id: impl Into<String>) -> Self {
        Self {
            role: Role::BranchAdmin,
            branch_id: Some(branch_id.into()),
        }
    }

    pub fn branch_id(&self) -> Option<&str> {
        self.branch_id.as_deref().filter(|id| !id.is_empty())
    }
}

impl Default for Scope {
    fn default() -> Self {
        Scope::global()
    }
}
