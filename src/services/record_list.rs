use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::form::FormValue;
use crate::gateway::{Endpoints, Gateway, ListPage, ListParams};
use crate::models::{Pagination, RecordKind};
use crate::notify::{Confirm, Notice, Notifier};
use crate::report::{self, StaticAssets, Template};
use crate::scope::Scope;

use super::record_editor::RecordEditor;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilters {
    pub search: String,
    pub status: Option<String>,
    /// Class for students, department for teachers and staff.
    pub group: Option<String>,
}

/// Everything a list fetch depends on. Any change to it means a refetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub filters: ListFilters,
    pub page: u32,
    pub limit: u32,
}

impl ListQuery {
    pub fn new(limit: u32) -> Self {
        Self {
            filters: ListFilters::default(),
            page: 1,
            limit,
        }
    }

    pub fn to_params(&self, kind: RecordKind, scope: &Scope) -> ListParams {
        let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.trim().is_empty());
        let group = non_empty(&self.filters.group);
        let search = self.filters.search.trim();

        ListParams {
            page: self.page,
            limit: self.limit,
            search: (!search.is_empty()).then(|| search.to_string()),
            status: non_empty(&self.filters.status),
            class_id: if kind == RecordKind::Student { group.clone() } else { None },
            department_id: if kind == RecordKind::Student { None } else { group },
            branch_id: scope.branch_id().map(str::to_string),
        }
    }
}

/// Handle for one list fetch. Only the most recently issued ticket may
/// update the screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub params: ListParams,
}

/// Paginated, filtered table of records with row actions.
pub struct RecordList {
    gateway: Arc<dyn Gateway>,
    notifier: Arc<dyn Notifier>,
    confirm: Arc<dyn Confirm>,
    kind: RecordKind,
    endpoints: Endpoints,
    scope: Scope,
    query: ListQuery,
    pagination: Pagination,
    rows: Vec<FormValue>,
    loading: bool,
    issued: u64,
}

impl RecordList {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        notifier: Arc<dyn Notifier>,
        confirm: Arc<dyn Confirm>,
        kind: RecordKind,
        scope: Scope,
        limit: u32,
    ) -> Self {
        Self {
            gateway,
            notifier,
            confirm,
            kind,
            endpoints: Endpoints::for_kind(kind),
            scope,
            query: ListQuery::new(limit),
            pagination: Pagination::empty(limit),
            rows: Vec::new(),
            loading: false,
            issued: 0,
        }
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn rows(&self) -> &[FormValue] {
        &self.rows
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn has_next(&self) -> bool {
        self.pagination.has_next()
    }

    pub fn has_prev(&self) -> bool {
        self.pagination.has_prev()
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        self.loading = true;
        FetchTicket {
            generation: self.issued,
            params: self.query.to_params(self.kind, &self.scope),
        }
    }

    /// Applies a fetch result. Returns `Ok(false)` when a newer fetch has
    /// been issued since `ticket`, in which case nothing changes.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: Result<ListPage, AppError>) -> Result<bool, AppError> {
        if ticket.generation != self.issued {
            debug!(
                "discarding stale {} list response (generation {} < {})",
                self.kind, ticket.generation, self.issued
            );
            return Ok(false);
        }

        self.loading = false;
        match result {
            Ok(page) => {
                self.query.page = page.pagination.page.max(1);
                self.pagination = page.pagination;
                self.rows = page.items;
                Ok(true)
            }
            Err(err) => {
                warn!("fetching {} list failed: {}", self.kind, err);
                self.notifier
                    .notify(Notice::error(format!("Failed to load records: {}", err.user_message())));
                Err(err)
            }
        }
    }

    pub async fn refresh(&mut self) -> Result<(), AppError> {
        let ticket = self.begin_fetch();
        let result = self.gateway.list(&self.endpoints, &ticket.params).await;
        self.complete_fetch(ticket, result).map(|_| ())
    }

    /// Edits the query and refetches when it actually changed. A change to
    /// the filters sends the view back to the first page.
    pub async fn update_query<F>(&mut self, edit: F) -> Result<bool, AppError>
    where
        F: FnOnce(&mut ListQuery),
    {
        let mut next = self.query.clone();
        edit(&mut next);
        if next.filters != self.query.filters {
            next.page = 1;
        }
        if next == self.query {
            return Ok(false);
        }

        self.query = next;
        self.refresh().await?;
        Ok(true)
    }

    pub async fn set_search(&mut self, search: &str) -> Result<bool, AppError> {
        let search = search.to_string();
        self.update_query(|q| q.filters.search = search).await
    }

    pub async fn set_status(&mut self, status: Option<&str>) -> Result<bool, AppError> {
        let status = status.map(str::to_string);
        self.update_query(|q| q.filters.status = status).await
    }

    pub async fn set_group(&mut self, group: Option<&str>) -> Result<bool, AppError> {
        let group = group.map(str::to_string);
        self.update_query(|q| q.filters.group = group).await
    }

    pub async fn go_to_page(&mut self, page: u32) -> Result<bool, AppError> {
        if !self.pagination.contains(page) {
            return Err(AppError::PageOutOfRange {
                requested: page,
                pages: self.pagination.pages,
            });
        }
        self.update_query(|q| q.page = page).await
    }

    pub async fn next_page(&mut self) -> Result<bool, AppError> {
        let page = self.query.page.saturating_add(1);
        self.go_to_page(page).await
    }

    pub async fn prev_page(&mut self) -> Result<bool, AppError> {
        let page = self.query.page.saturating_sub(1);
        self.go_to_page(page).await
    }

    /// Loads the full record for the read-only detail view.
    pub async fn view(&self, id: &str) -> Result<FormValue, AppError> {
        match self.gateway.get(&self.endpoints, id).await {
            Ok(record) => Ok(record),
            Err(err) => {
                warn!("loading {} {} failed: {}", self.kind, id, err);
                self.notifier
                    .notify(Notice::error(format!("Failed to load record: {}", err.user_message())));
                Err(err)
            }
        }
    }

    pub async fn edit(&self, id: &str, editor: &mut RecordEditor) -> Result<(), AppError> {
        let record = self.view(id).await?;
        editor.open_edit(record)
    }

    /// Deletes after the user confirms. Returns `Ok(false)` when the user
    /// backs out, in which case the gateway is never called.
    pub async fn delete(&mut self, id: &str) -> Result<bool, AppError> {
        let name = self
            .rows
            .iter()
            .find(|row| row.record_id() == Some(id))
            .map(report::full_name)
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| id.to_string());

        let prompt = format!("Delete {} {}? This cannot be undone.", self.kind.label().to_lowercase(), name);
        if !self.confirm.confirm(&prompt) {
            debug!("delete of {} {} cancelled", self.kind, id);
            return Ok(false);
        }

        if let Err(err) = self.gateway.remove(&self.endpoints, id).await {
            warn!("deleting {} {} failed: {}", self.kind, id, err);
            self.notifier
                .notify(Notice::error(format!("Failed to delete: {}", err.user_message())));
            return Err(err);
        }

        info!("deleted {} {}", self.kind, id);
        self.notifier.notify(Notice::success(format!("{} deleted", self.kind)));
        self.refresh().await?;
        Ok(true)
    }

    /// Loads a record and renders it through `template` for printing.
    pub async fn download(&self, id: &str, template: &Template, assets: &StaticAssets) -> Result<String, AppError> {
        let record = self.view(id).await?;
        Ok(report::render(self.kind, &record, template, assets))
    }
}
