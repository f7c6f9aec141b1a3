use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::form::FormValue;
use crate::models::Pagination;

/// Envelope every gateway response uses.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListData {
    #[serde(default)]
    pub items: Vec<FormValue>,
    pub pagination: Pagination,
}

/// Query sent with a list request. Empty filters are left off the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListPage {
    pub items: Vec<FormValue>,
    pub pagination: Pagination,
}

impl From<ListData> for ListPage {
    fn from(data: ListData) -> Self {
        Self {
            items: data.items,
            pagination: data.pagination,
        }
    }
}

/// A file picked by the user plus the metadata fields sent alongside it.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub metadata: BTreeMap<String, String>,
}

impl UploadRequest {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub public_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Where an uploaded file ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    pub url: String,
    pub public_id: String,
}

impl UploadReceipt {
    pub fn to_value(&self) -> FormValue {
        FormValue::object([
            ("url", FormValue::from(self.url.as_str())),
            ("publicId", FormValue::from(self.public_id.as_str())),
        ])
    }
}
