use std::future::Future;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::form::{get_in, merge_defaults, set_in, FieldPath, FormValue, InputEvent};
use crate::gateway::{Endpoints, Gateway, UploadReceipt, UploadRequest};
use crate::models::{ClassAssignment, Document, GuardianType, RecordKind};
use crate::notify::{Notice, Notifier};
use crate::scope::Scope;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit { id: String },
}

/// In-progress record plus the flags the form renders from.
#[derive(Debug, Clone)]
pub struct EditorSession {
    pub mode: EditorMode,
    pub active_tab: &'static str,
    pub record: FormValue,
    pub submitting: bool,
    pub uploading: bool,
}

/// Tabbed create/edit form for one record kind.
///
/// Every edit replaces the whole record through the field-path mutator, and
/// nothing reaches the gateway until `submit`, which sends the full record in
/// one request.
pub struct RecordEditor {
    gateway: Arc<dyn Gateway>,
    notifier: Arc<dyn Notifier>,
    kind: RecordKind,
    endpoints: Endpoints,
    scope: Scope,
    session: Option<EditorSession>,
}

impl RecordEditor {
    pub fn new(gateway: Arc<dyn Gateway>, notifier: Arc<dyn Notifier>, kind: RecordKind, scope: Scope) -> Self {
        Self {
            gateway,
            notifier,
            kind,
            endpoints: Endpoints::for_kind(kind),
            scope,
            session: None,
        }
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&EditorSession> {
        self.session.as_ref()
    }

    pub fn record(&self) -> Option<&FormValue> {
        self.session.as_ref().map(|s| &s.record)
    }

    pub fn mode(&self) -> Option<&EditorMode> {
        self.session.as_ref().map(|s| &s.mode)
    }

    pub fn active_tab(&self) -> Option<&'static str> {
        self.session.as_ref().map(|s| s.active_tab)
    }

    pub fn is_submitting(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.submitting)
    }

    pub fn is_uploading(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.uploading)
    }

    pub fn open_create(&mut self) -> Result<(), AppError> {
        let mut record = self.kind.template()?;
        if let Some(branch_id) = self.scope.branch_id() {
            record = set_in(&record, &FieldPath::parse("branchId")?, FormValue::from(branch_id))?;
        }

        debug!("opening {} editor in create mode", self.kind);
        self.session = Some(EditorSession {
            mode: EditorMode::Create,
            active_tab: self.kind.first_tab().id,
            record,
            submitting: false,
            uploading: false,
        });
        Ok(())
    }

    /// Opens a stored record. Sub-records the stored copy lacks are filled
    /// from the template so the eventual payload carries every key.
    pub fn open_edit(&mut self, existing: FormValue) -> Result<(), AppError> {
        let id = existing.record_id().ok_or(AppError::MissingId)?.to_string();
        let record = merge_defaults(&self.kind.template()?, &existing);

        debug!("opening {} editor for {}", self.kind, id);
        self.session = Some(EditorSession {
            mode: EditorMode::Edit { id },
            active_tab: self.kind.first_tab().id,
            record,
            submitting: false,
            uploading: false,
        });
        Ok(())
    }

    pub fn close(&mut self) {
        self.session = None;
    }

    pub fn change_tab(&mut self, tab_id: &str) -> Result<(), AppError> {
        let tab = self
            .kind
            .tab(tab_id)
            .ok_or_else(|| AppError::UnknownTab(tab_id.to_string()))?;
        self.session_mut()?.active_tab = tab.id;
        Ok(())
    }

    pub fn edit_field(&mut self, path: &str, value: impl Into<FormValue>) -> Result<(), AppError> {
        let path = FieldPath::parse(path)?;
        self.replace_at(&path, value.into())
    }

    pub fn apply_input(&mut self, path: &str, event: InputEvent) -> Result<(), AppError> {
        self.edit_field(path, event.into_value())
    }

    pub fn value_at(&self, path: &str) -> Option<&FormValue> {
        let path = FieldPath::parse(path).ok()?;
        self.record().and_then(|record| get_in(record, &path))
    }

    /// Appends `item` to the list at `list_path`.
    pub fn push_item(&mut self, list_path: &str, item: FormValue) -> Result<(), AppError> {
        let path = FieldPath::parse(list_path)?;
        let mut items = self.list_at(&path)?;
        items.push(item);
        self.replace_at(&path, FormValue::list(items))
    }

    /// Drops the element at `index` from the list at `list_path`. An index
    /// past the end leaves the list as it is.
    pub fn remove_item(&mut self, list_path: &str, index: usize) -> Result<(), AppError> {
        let path = FieldPath::parse(list_path)?;
        let items: Vec<FormValue> = self
            .list_at(&path)?
            .into_iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, item)| item)
            .collect();
        self.replace_at(&path, FormValue::list(items))
    }

    /// Adds the assignment, or removes the one with the same `classId`.
    /// Returns whether the class is assigned afterwards.
    pub fn toggle_class(&mut self, assignment: ClassAssignment) -> Result<bool, AppError> {
        let classes = self
            .kind
            .classes_path()
            .ok_or_else(|| AppError::InvalidPath(format!("{} records have no class assignments", self.kind)))?;
        let path = FieldPath::parse(classes)?;
        let items = self.list_at(&path)?;

        let before = items.len();
        let mut kept: Vec<FormValue> = items
            .into_iter()
            .filter(|item| item.get("classId").and_then(FormValue::as_str) != Some(assignment.class_id.as_str()))
            .collect();
        let assigned = kept.len() == before;
        if assigned {
            kept.push(FormValue::from(serde_json::to_value(&assignment)?));
        }

        self.replace_at(&path, FormValue::list(kept))?;
        Ok(assigned)
    }

    /// Switches which family sub-record is shown. Data already entered in
    /// the other branch stays in the record.
    pub fn set_guardian_type(&mut self, guardian_type: GuardianType) -> Result<(), AppError> {
        if self.kind != RecordKind::Student {
            return Err(AppError::InvalidPath(format!("{} records have no guardianType", self.kind)));
        }
        self.edit_field("guardianType", guardian_type.as_str())
    }

    pub fn guardian_type(&self) -> Option<GuardianType> {
        match self.kind {
            RecordKind::Student => self.record().map(GuardianType::from_record),
            _ => None,
        }
    }

    /// Path of the family sub-record currently on screen.
    pub fn visible_guardian_branch(&self) -> Option<&'static str> {
        self.guardian_type().map(|g| g.branch())
    }

    pub fn validate(&self) -> Result<(), AppError> {
        let record = self.record().ok_or(AppError::EditorClosed)?;
        let problems = self.kind.validate(record);
        if problems.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(problems))
        }
    }

    /// Uploads a file and stores the resulting `{url, publicId}` at `path`.
    /// When the upload fails the record is left untouched.
    pub async fn attach_file(&mut self, path: &str, upload: UploadRequest) -> Result<UploadReceipt, AppError> {
        let path = FieldPath::parse(path)?;
        let receipt = self.upload_file(upload).await?;
        self.replace_at(&path, receipt.to_value())?;
        Ok(receipt)
    }

    /// Uploads a file and appends it to the record's document list.
    pub async fn attach_document(&mut self, doc_type: &str, upload: UploadRequest) -> Result<(), AppError> {
        let name = upload.file_name.clone();
        let receipt = self
            .upload_file(upload.with_metadata("type", doc_type))
            .await?;

        let document = Document {
            doc_type: doc_type.to_string(),
            name,
            url: receipt.url,
            public_id: receipt.public_id,
            uploaded_at: Utc::now(),
        };
        let item = FormValue::from(serde_json::to_value(&document)?);
        self.push_item(self.kind.documents_path(), item)
    }

    /// Sends the whole record (POST for a new one, PUT for an existing one).
    ///
    /// On success the editor closes and `on_saved` is awaited with the saved
    /// record, typically to refetch the list. On failure the record stays in
    /// place for correction.
    pub async fn submit<F, Fut>(&mut self, on_saved: F) -> Result<FormValue, AppError>
    where
        F: FnOnce(FormValue) -> Fut,
        Fut: Future<Output = ()>,
    {
        let kind = self.kind;
        let session = self.session.as_mut().ok_or(AppError::EditorClosed)?;
        if session.submitting {
            return Err(AppError::EditorBusy("a submit is already in flight"));
        }
        if session.uploading {
            return Err(AppError::EditorBusy("an upload is still running"));
        }

        let problems = kind.validate(&session.record);
        if !problems.is_empty() {
            let err = AppError::Validation(problems);
            self.notifier.notify(Notice::error(err.user_message()));
            return Err(err);
        }

        session.submitting = true;
        let payload = session.record.clone();
        let mode = session.mode.clone();

        let result = match &mode {
            EditorMode::Create => {
                info!("creating {}", kind);
                self.gateway.create(&self.endpoints, &payload).await
            }
            EditorMode::Edit { id } => {
                info!("updating {} {}", kind, id);
                self.gateway.update(&self.endpoints, id, &payload).await
            }
        };

        match result {
            Ok(saved) => {
                self.session = None;
                let verb = if mode == EditorMode::Create { "created" } else { "updated" };
                self.notifier.notify(Notice::success(format!("{} {} successfully", kind, verb)));
                on_saved(saved.clone()).await;
                Ok(saved)
            }
            Err(err) => {
                warn!("saving {} failed: {}", kind, err);
                if let Some(session) = self.session.as_mut() {
                    session.submitting = false;
                }
                self.notifier.notify(Notice::error(err.user_message()));
                Err(err)
            }
        }
    }

    async fn upload_file(&mut self, upload: UploadRequest) -> Result<UploadReceipt, AppError> {
        let session = self.session_mut()?;
        if session.submitting {
            return Err(AppError::EditorBusy("cannot upload while submitting"));
        }
        session.uploading = true;

        let result = self.gateway.upload(upload).await;

        if let Some(session) = self.session.as_mut() {
            session.uploading = false;
        }
        match result {
            Ok(receipt) => {
                self.notifier.notify(Notice::success("File uploaded"));
                Ok(receipt)
            }
            Err(err) => {
                warn!("upload failed: {}", err);
                self.notifier.notify(Notice::error(format!("Upload failed: {}", err.user_message())));
                Err(err)
            }
        }
    }

    fn session_mut(&mut self) -> Result<&mut EditorSession, AppError> {
        self.session.as_mut().ok_or(AppError::EditorClosed)
    }

    fn replace_at(&mut self, path: &FieldPath, value: FormValue) -> Result<(), AppError> {
        let session = self.session_mut()?;
        session.record = set_in(&session.record, path, value)?;
        Ok(())
    }

    fn list_at(&self, path: &FieldPath) -> Result<Vec<FormValue>, AppError> {
        let record = self.record().ok_or(AppError::EditorClosed)?;
        match get_in(record, path) {
            None | Some(FormValue::Null) => Ok(Vec::new()),
            Some(FormValue::List(items)) => Ok(items.to_vec()),
            Some(_) => Err(AppError::PathConflict {
                path: path.to_string(),
                segment: path.to_string(),
            }),
        }
    }
}
