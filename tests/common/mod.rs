#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use school_admin::AppError;
use school_admin::form::FormValue;
use school_admin::gateway::{Endpoints, Gateway, ListPage, ListParams, UploadReceipt, UploadRequest};
use school_admin::models::Pagination;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(ListParams),
    Get(String),
    Create(FormValue),
    Update(String, FormValue),
    Remove(String),
    Upload(String),
}

/// In-memory gateway that records every call.
#[derive(Default)]
pub struct MockGateway {
    records: Mutex<Vec<FormValue>>,
    calls: Mutex<Vec<Call>>,
    next_id: AtomicUsize,
    pub reject_saves: AtomicBool,
    pub reject_uploads: AtomicBool,
    pub fail_lists: AtomicBool,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<FormValue>) -> Self {
        let gateway = Self::new();
        *gateway.records.lock().unwrap() = records;
        gateway
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| matches(c)).count()
    }

    pub fn lists(&self) -> usize {
        self.count(|c| matches!(c, Call::List(_)))
    }

    pub fn records(&self) -> Vec<FormValue> {
        self.records.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn full_name(record: &FormValue) -> String {
    let part = |k: &str| record.get(k).and_then(FormValue::as_str).unwrap_or("").to_string();
    format!("{} {}", part("firstName"), part("lastName")).to_lowercase()
}

fn with_id(record: &FormValue, id: &str) -> FormValue {
    let mut map = record.as_object().cloned().unwrap_or_default();
    map.insert("_id".to_string(), FormValue::from(id));
    FormValue::Object(std::sync::Arc::new(map))
}

#[async_trait]
impl Gateway for MockGateway {
    async fn list(&self, _endpoints: &Endpoints, params: &ListParams) -> Result<ListPage, AppError> {
        self.record(Call::List(params.clone()));
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(AppError::Rejected("list unavailable".to_string()));
        }

        let records = self.records.lock().unwrap();
        let matching: Vec<FormValue> = records
            .iter()
            .filter(|r| match &params.search {
                Some(search) => full_name(r).contains(&search.to_lowercase()),
                None => true,
            })
            .filter(|r| match &params.status {
                Some(status) => r.get("status").and_then(FormValue::as_str) == Some(status.as_str()),
                None => true,
            })
            .cloned()
            .collect();

        let limit = params.limit.max(1);
        let pagination = Pagination::from_total(params.page, limit, matching.len() as u64);
        let items = matching
            .into_iter()
            .skip(((params.page.max(1) - 1) * limit) as usize)
            .take(limit as usize)
            .collect();
        Ok(ListPage { items, pagination })
    }

    async fn get(&self, _endpoints: &Endpoints, id: &str) -> Result<FormValue, AppError> {
        self.record(Call::Get(id.to_string()));
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.record_id() == Some(id))
            .cloned()
            .ok_or_else(|| AppError::Rejected("Record not found".to_string()))
    }

    async fn create(&self, _endpoints: &Endpoints, payload: &FormValue) -> Result<FormValue, AppError> {
        self.record(Call::Create(payload.clone()));
        if self.reject_saves.load(Ordering::SeqCst) {
            return Err(AppError::Rejected("Email already exists".to_string()));
        }
        let id = format!("id-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let saved = with_id(payload, &id);
        self.records.lock().unwrap().push(saved.clone());
        Ok(saved)
    }

    async fn update(&self, _endpoints: &Endpoints, id: &str, payload: &FormValue) -> Result<FormValue, AppError> {
        self.record(Call::Update(id.to_string(), payload.clone()));
        if self.reject_saves.load(Ordering::SeqCst) {
            return Err(AppError::Rejected("Update failed".to_string()));
        }
        let saved = with_id(payload, id);
        let mut records = self.records.lock().unwrap();
        if let Some(slot) = records.iter_mut().find(|r| r.record_id() == Some(id)) {
            *slot = saved.clone();
        }
        Ok(saved)
    }

    async fn remove(&self, _endpoints: &Endpoints, id: &str) -> Result<(), AppError> {
        self.record(Call::Remove(id.to_string()));
        self.records.lock().unwrap().retain(|r| r.record_id() != Some(id));
        Ok(())
    }

    async fn upload(&self, upload: UploadRequest) -> Result<UploadReceipt, AppError> {
        self.record(Call::Upload(upload.file_name.clone()));
        if self.reject_uploads.load(Ordering::SeqCst) {
            return Err(AppError::Rejected("File type not allowed".to_string()));
        }
        Ok(UploadReceipt {
            url: format!("https://files.example.com/{}", upload.file_name),
            public_id: format!("uploads/{}", upload.file_name),
        })
    }
}

pub fn student(id: &str, first: &str, last: &str) -> FormValue {
    let value = serde_json::json!({
        "_id": id,
        "firstName": first,
        "lastName": last,
        "email": format!("{}@school.test", first.to_lowercase()),
        "classId": "C1",
        "status": "active",
    });
    FormValue::from(value)
}

pub fn students(count: usize) -> Vec<FormValue> {
    (1..=count)
        .map(|n| student(&format!("s{}", n), &format!("Student{}", n), "Test"))
        .collect()
}
