//! Trait abstraction for the REST client to enable mocking in tests

use super::error::ApiResult;
use crate::state::models::{
    AppActionResponse, Application, ApplicationDetail, ApplicationItem, ApproveUser,
    ApproveUserRequest, AuthResponse, Comment, CreateApplication, CreateComment,
    CreatePublicApplication, Department, EditApplication, Institute, LoginRequest,
    RegistrationRequest, RejectUserRequest, Role, User,
};
use async_trait::async_trait;

/// Backend operations used by the store, one per endpoint
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ApiClientTrait: Send + Sync {
    /// Applications authored by the signed-in user
    async fn my_applications(&self) -> ApiResult<Vec<ApplicationItem>>;

    /// Submit an application as the signed-in user
    async fn create_main_application(&self, payload: CreateApplication)
        -> ApiResult<Application>;

    /// Submit an application without an account
    async fn create_public_application(
        &self,
        payload: CreatePublicApplication,
    ) -> ApiResult<Application>;

    async fn institutes(&self) -> ApiResult<Vec<Institute>>;

    async fn departments(&self) -> ApiResult<Vec<Department>>;

    async fn roles(&self) -> ApiResult<Vec<Role>>;

    /// Pending account registrations (administrators only)
    async fn registration_requests(&self) -> ApiResult<Vec<ApproveUser>>;

    async fn approve_registration(&self, request: ApproveUserRequest) -> ApiResult<ApproveUser>;

    async fn reject_registration(&self, request: RejectUserRequest) -> ApiResult<ApproveUser>;

    /// Applications assigned to the signed-in coordinator
    async fn coordination_applications(&self) -> ApiResult<Vec<ApplicationItem>>;

    async fn application_detail(&self, id: u64) -> ApiResult<ApplicationDetail>;

    async fn edit_application(&self, id: u64, payload: EditApplication)
        -> ApiResult<Application>;

    async fn add_comment(&self, comment: CreateComment) -> ApiResult<Comment>;

    async fn approve_application(&self, id: u64) -> ApiResult<AppActionResponse>;

    async fn request_changes(&self, id: u64) -> ApiResult<AppActionResponse>;

    async fn reject_application(&self, id: u64, reason: String) -> ApiResult<AppActionResponse>;

    /// Authenticate; a returned access token is persisted
    async fn login(&self, request: LoginRequest) -> ApiResult<AuthResponse>;

    /// Submit a registration request; a returned access token is persisted
    async fn register(&self, request: RegistrationRequest) -> ApiResult<AuthResponse>;

    /// Profile for the persisted token
    async fn current_user(&self) -> ApiResult<User>;

    /// Whether an access token is persisted
    fn has_token(&self) -> bool;

    /// Forget the persisted token (local only)
    async fn logout(&self);
}
