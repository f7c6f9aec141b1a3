use std::sync::Arc;

use tracing::warn;

use crate::error::AppError;
use crate::form::FormValue;
use crate::gateway::{Endpoints, Gateway};
use crate::models::RecordKind;
use crate::notify::{Confirm, Notifier};
use crate::scope::Scope;

use super::record_editor::RecordEditor;
use super::record_list::RecordList;

/// One CRUD screen: the list and its editor, mounted for a kind and scope.
pub struct Dashboard {
    pub list: RecordList,
    pub editor: RecordEditor,
}

impl Dashboard {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        notifier: Arc<dyn Notifier>,
        confirm: Arc<dyn Confirm>,
        kind: RecordKind,
        scope: Scope,
        page_limit: u32,
    ) -> Self {
        let list = RecordList::new(
            gateway.clone(),
            notifier.clone(),
            confirm,
            kind,
            scope.clone(),
            page_limit,
        );
        let editor = RecordEditor::new(gateway, notifier, kind, scope);
        Self { list, editor }
    }

    pub fn with_endpoints(self, endpoints: Endpoints) -> Self {
        Self {
            list: self.list.with_endpoints(endpoints.clone()),
            editor: self.editor.with_endpoints(endpoints),
        }
    }

    pub async fn open_edit(&mut self, id: &str) -> Result<(), AppError> {
        self.list.edit(id, &mut self.editor).await
    }

    /// Submits the editor and refetches the list once the save lands.
    pub async fn submit(&mut self) -> Result<FormValue, AppError> {
        let list = &mut self.list;
        self.editor
            .submit(|_saved| async move {
                if let Err(err) = list.refresh().await {
                    warn!("refresh after save failed: {}", err);
                }
            })
            .await
    }
}
