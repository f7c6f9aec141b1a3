pub mod dto;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::GatewayConfig;
use crate::error::AppError;
use crate::form::FormValue;
use crate::models::RecordKind;

pub use dto::{ApiResponse, ListData, ListPage, ListParams, UploadReceipt, UploadRequest, UploadResponse};

/// Route set for one record collection. Item routes are `{collection}/{id}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    pub collection: String,
}

impl Endpoints {
    pub fn new(collection: impl Into<String>) -> Self {
        Self { collection: collection.into() }
    }

    pub fn for_kind(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Student => Self::new("/students"),
            RecordKind::Teacher => Self::new("/teachers"),
            RecordKind::Staff => Self::new("/staff"),
        }
    }

    pub fn item(&self, id: &str) -> String {
        format!("{}/{}", self.collection.trim_end_matches('/'), id)
    }
}

#[async_trait]
pub trait Gateway: Send + Sync {
    async fn list(&self, endpoints: &Endpoints, params: &ListParams) -> Result<ListPage, AppError>;
    async fn get(&self, endpoints: &Endpoints, id: &str) -> Result<FormValue, AppError>;
    async fn create(&self, endpoints: &Endpoints, payload: &FormValue) -> Result<FormValue, AppError>;
    async fn update(&self, endpoints: &Endpoints, id: &str, payload: &FormValue) -> Result<FormValue, AppError>;
    async fn remove(&self, endpoints: &Endpoints, id: &str) -> Result<(), AppError>;
    async fn upload(&self, upload: UploadRequest) -> Result<UploadReceipt, AppError>;
}

pub struct HttpGateway {
    client: Client,
    config: GatewayConfig,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str) -> (RequestBuilder, String) {
        let request_id = Uuid::new_v4().to_string();
        let mut builder = self
            .client
            .request(method, self.config.url(path))
            .header("x-request-id", request_id.as_str());
        if let Some(token) = &self.config.api_token {
            builder = builder.bearer_auth(token);
        }
        (builder, request_id)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        request_id: &str,
        what: &str,
    ) -> Result<T, AppError> {
        let response = builder.send().await.map_err(|e| {
            warn!(%request_id, "{} failed to send: {}", what, e);
            AppError::Transport(e)
        })?;

        let status = response.status();
        let body = response.text().await?;
        debug!(%request_id, "{} -> {}", what, status);

        if !status.is_success() {
            // Error bodies usually still carry the {success, message} envelope.
            if let Ok(envelope) = serde_json::from_str::<ApiResponse<serde_json::Value>>(&body) {
                if let Some(message) = envelope.message {
                    warn!(%request_id, "{} rejected with {}: {}", what, status, message);
                    return Err(AppError::Rejected(message));
                }
            }
            warn!(%request_id, "{} failed with {}", what, status);
            return Err(AppError::HttpStatus { status: status.as_u16(), body });
        }

        serde_json::from_str::<T>(&body).map_err(|e| {
            warn!(%request_id, "{} returned an unreadable body: {}", what, e);
            AppError::Decode(e)
        })
    }

    async fn send_envelope<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        request_id: &str,
        what: &str,
    ) -> Result<Option<T>, AppError> {
        let envelope: ApiResponse<T> = self.send(builder, request_id, what).await?;
        if !envelope.success {
            let message = envelope
                .message
                .unwrap_or_else(|| format!("{} was rejected", what));
            warn!(%request_id, "{} rejected: {}", what, message);
            return Err(AppError::Rejected(message));
        }
        Ok(envelope.data)
    }
}

fn require_data<T>(data: Option<T>, what: &str) -> Result<T, AppError> {
    data.ok_or_else(|| AppError::Rejected(format!("{} returned no data", what)))
}

#[async_trait]
impl Gateway for HttpGateway {
    async fn list(&self, endpoints: &Endpoints, params: &ListParams) -> Result<ListPage, AppError> {
        let (builder, request_id) = self.request(Method::GET, &endpoints.collection);
        let what = format!("list {}", endpoints.collection);
        info!(%request_id, page = params.page, limit = params.limit, "{}", what);

        let data: Option<ListData> = self
            .send_envelope(builder.query(params), &request_id, &what)
            .await?;
        Ok(require_data(data, &what)?.into())
    }

    async fn get(&self, endpoints: &Endpoints, id: &str) -> Result<FormValue, AppError> {
        let path = endpoints.item(id);
        let (builder, request_id) = self.request(Method::GET, &path);
        let what = format!("get {}", path);
        info!(%request_id, "{}", what);

        let data = self.send_envelope(builder, &request_id, &what).await?;
        require_data(data, &what)
    }

    async fn create(&self, endpoints: &Endpoints, payload: &FormValue) -> Result<FormValue, AppError> {
        let (builder, request_id) = self.request(Method::POST, &endpoints.collection);
        let what = format!("create {}", endpoints.collection);
        info!(%request_id, "{}", what);

        let data = self
            .send_envelope(builder.json(payload), &request_id, &what)
            .await?;
        require_data(data, &what)
    }

    async fn update(&self, endpoints: &Endpoints, id: &str, payload: &FormValue) -> Result<FormValue, AppError> {
        let path = endpoints.item(id);
        let (builder, request_id) = self.request(Method::PUT, &path);
        let what = format!("update {}", path);
        info!(%request_id, "{}", what);

        let data = self
            .send_envelope(builder.json(payload), &request_id, &what)
            .await?;
        require_data(data, &what)
    }

    async fn remove(&self, endpoints: &Endpoints, id: &str) -> Result<(), AppError> {
        let path = endpoints.item(id);
        let (builder, request_id) = self.request(Method::DELETE, &path);
        let what = format!("delete {}", path);
        info!(%request_id, "{}", what);

        self.send_envelope::<serde_json::Value>(builder, &request_id, &what)
            .await?;
        Ok(())
    }

    async fn upload(&self, upload: UploadRequest) -> Result<UploadReceipt, AppError> {
        let (builder, request_id) = self.request(Method::POST, &self.config.upload_path);
        let what = format!("upload {}", upload.file_name);
        info!(%request_id, size = upload.bytes.len(), "{}", what);

        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name.clone())
            .mime_str(&upload.content_type)?;
        let form = upload
            .metadata
            .into_iter()
            .fold(Form::new().part("file", part), |form, (key, value)| form.text(key, value));

        let response: UploadResponse = self
            .send(builder.multipart(form), &request_id, &what)
            .await?;
        if !response.success {
            let message = response
                .message
                .unwrap_or_else(|| "Upload was rejected".to_string());
            warn!(%request_id, "{} rejected: {}", what, message);
            return Err(AppError::Rejected(message));
        }

        match (response.url, response.public_id) {
            (Some(url), public_id) => Ok(UploadReceipt {
                url,
                public_id: public_id.unwrap_or_default(),
            }),
            (None, _) => Err(AppError::Rejected(format!("{} returned no url", what))),
        }
    }
}
