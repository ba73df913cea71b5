//! reqwest client for the showcase REST backend

use super::error::{ApiError, ApiResult};
use super::traits::ApiClientTrait;
use crate::state::models::{
    AppActionResponse, Application, ApplicationDetail, ApplicationItem, ApproveUser,
    ApproveUserRequest, AuthResponse, Comment, CreateApplication, CreateComment,
    CreatePublicApplication, Department, EditApplication, Institute, LoginRequest,
    RegistrationRequest, RejectUserRequest, Role, User,
};
use crate::storage::{LocalStorage, ACCESS_TOKEN_KEY};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const JSON: &str = "application/json";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Whether a request carries the bearer token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    Bearer,
    Anonymous,
}

/// Client for communicating with the backend
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    storage: Arc<LocalStorage>,
}

impl ApiClient {
    /// Create a client rooted at `base_url` (no trailing slash)
    pub fn new(base_url: impl Into<String>, storage: Arc<LocalStorage>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("showcase-tui/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            storage,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str, auth: Auth) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .header(ACCEPT, JSON)
            .header(CONTENT_TYPE, JSON);
        if auth == Auth::Bearer {
            // an absent token is sent as an empty bearer
            let token = self.storage.get(ACCESS_TOKEN_KEY).unwrap_or_default();
            builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        builder
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, auth: Auth) -> ApiResult<T> {
        self.send(Method::GET, path, self.request(Method::GET, path, auth))
            .await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
        auth: Auth,
    ) -> ApiResult<T> {
        let mut builder = self.request(Method::POST, path, auth);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.send(Method::POST, path, builder).await
    }

    async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let builder = self.request(Method::PATCH, path, Auth::Bearer).json(body);
        self.send(Method::PATCH, path, builder).await
    }

    /// Send and decode; non-2xx bodies are parsed as JSON and returned as errors
    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        builder: RequestBuilder,
    ) -> ApiResult<T> {
        debug!("{} {}", method, path);
        let response = builder.send().await.map_err(|e| {
            warn!("{} {} failed: {}", method, path, e);
            ApiError::Network(e)
        })?;

        let status = response.status();
        let bytes = response.bytes().await?;

        if status.is_success() {
            serde_json::from_slice(&bytes).map_err(|e| {
                warn!("{} {} returned an unexpected body: {}", method, path, e);
                ApiError::Decode(e.to_string())
            })
        } else {
            let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            warn!("{} {} -> {}", method, path, status);
            Err(ApiError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }

    /// Run a storage update on the blocking pool; it writes the storage file
    async fn update_storage(&self, update: impl FnOnce(&LocalStorage) + Send + 'static) {
        let storage = Arc::clone(&self.storage);
        if let Err(e) = tokio::task::spawn_blocking(move || update(storage.as_ref())).await {
            warn!("Storage update failed: {}", e);
        }
    }

    async fn store_token(&self, response: &AuthResponse) {
        if response.access.is_empty() {
            return;
        }
        let token = response.access.clone();
        self.update_storage(move |storage| storage.set(ACCESS_TOKEN_KEY, &token))
            .await;
    }
}

#[async_trait]
impl ApiClientTrait for ApiClient {
    async fn my_applications(&self) -> ApiResult<Vec<ApplicationItem>> {
        self.get("/showcase/project-applications/my_applications", Auth::Bearer)
            .await
    }

    async fn create_main_application(
        &self,
        payload: CreateApplication,
    ) -> ApiResult<Application> {
        self.post("/showcase/project-applications/", Some(&payload), Auth::Bearer)
            .await
    }

    async fn create_public_application(
        &self,
        payload: CreatePublicApplication,
    ) -> ApiResult<Application> {
        self.post(
            "/showcase/project-applications/simple/",
            Some(&payload),
            Auth::Anonymous,
        )
        .await
    }

    async fn institutes(&self) -> ApiResult<Vec<Institute>> {
        self.get("/showcase/institutes/", Auth::Anonymous).await
    }

    async fn departments(&self) -> ApiResult<Vec<Department>> {
        self.get("/accounts/departments/", Auth::Bearer).await
    }

    async fn roles(&self) -> ApiResult<Vec<Role>> {
        self.get("/accounts/roles/", Auth::Bearer).await
    }

    async fn registration_requests(&self) -> ApiResult<Vec<ApproveUser>> {
        self.get("/accounts/registration-requests/", Auth::Bearer)
            .await
    }

    async fn approve_registration(&self, request: ApproveUserRequest) -> ApiResult<ApproveUser> {
        let path = format!("/accounts/registration-requests/{}/approve/", request.user_id);
        let body = json!({
            "role_id": request.role_id,
            "department_id": request.department_id,
        });
        self.post(&path, Some(&body), Auth::Bearer).await
    }

    async fn reject_registration(&self, request: RejectUserRequest) -> ApiResult<ApproveUser> {
        let path = format!("/accounts/registration-requests/{}/reject/", request.user_id);
        let body = json!({ "reason": request.reason });
        self.post(&path, Some(&body), Auth::Bearer).await
    }

    async fn coordination_applications(&self) -> ApiResult<Vec<ApplicationItem>> {
        self.get("/showcase/project-applications/my_in_work/", Auth::Bearer)
            .await
    }

    async fn application_detail(&self, id: u64) -> ApiResult<ApplicationDetail> {
        self.get(&format!("/showcase/project-applications/{id}/"), Auth::Bearer)
            .await
    }

    async fn edit_application(
        &self,
        id: u64,
        payload: EditApplication,
    ) -> ApiResult<Application> {
        self.patch(&format!("/showcase/project-applications/{id}/"), &payload)
            .await
    }

    async fn add_comment(&self, comment: CreateComment) -> ApiResult<Comment> {
        let path = format!(
            "/showcase/project-applications/{}/add_comment/",
            comment.application_id
        );
        let body = json!({ "field": comment.field, "text": comment.text });
        self.post(&path, Some(&body), Auth::Bearer).await
    }

    async fn approve_application(&self, id: u64) -> ApiResult<AppActionResponse> {
        let path = format!("/showcase/project-applications/{id}/approve/");
        self.post::<Value, _>(&path, None, Auth::Bearer).await
    }

    async fn request_changes(&self, id: u64) -> ApiResult<AppActionResponse> {
        let path = format!("/showcase/project-applications/{id}/request_changes/");
        self.post::<Value, _>(&path, None, Auth::Bearer).await
    }

    async fn reject_application(&self, id: u64, reason: String) -> ApiResult<AppActionResponse> {
        let path = format!("/showcase/project-applications/{id}/reject/");
        self.post(&path, Some(&json!({ "reason": reason })), Auth::Bearer)
            .await
    }

    async fn login(&self, request: LoginRequest) -> ApiResult<AuthResponse> {
        let response: AuthResponse = self
            .post("/auth/login/", Some(&request), Auth::Anonymous)
            .await?;
        self.store_token(&response).await;
        Ok(response)
    }

    async fn register(&self, request: RegistrationRequest) -> ApiResult<AuthResponse> {
        let response: AuthResponse = self
            .post("/accounts/registration-requests/", Some(&request), Auth::Anonymous)
            .await?;
        self.store_token(&response).await;
        Ok(response)
    }

    async fn current_user(&self) -> ApiResult<User> {
        self.get("/auth/user", Auth::Bearer).await
    }

    fn has_token(&self) -> bool {
        self.storage
            .get(ACCESS_TOKEN_KEY)
            .is_some_and(|token| !token.is_empty())
    }

    async fn logout(&self) {
        self.update_storage(|storage| storage.remove(ACCESS_TOKEN_KEY))
            .await;
    }
}
