//! Async action dispatcher
//!
//! `dispatch` applies the pending phase synchronously and runs the API call
//! on the tokio runtime; the terminal phase comes back over a channel as a
//! [`Completion`] that the event loop hands to `settle`. A completion is
//! applied only if it is the latest dispatch of its kind and its view scope
//! is still alive, so out-of-order or orphaned responses never reach the store.

use super::{
    Action, ActionKind, ApplicationAction, CatalogAction, ControlApproveAction,
    CoordinationAction, Decision, Phase, Store, UserAction,
};
use crate::api::{ApiClientTrait, ApiError};
use crate::state::models::{
    ApproveUserRequest, CreateApplication, CreateComment, CreatePublicApplication,
    EditApplication, LoginRequest, RegistrationRequest, RejectUserRequest,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// An async operation to run against the backend
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Login(LoginRequest),
    Register(RegistrationRequest),
    CheckAuth,
    Logout,
    Institutes,
    Departments,
    Roles,
    MyApplications,
    CreateMainApplication(CreateApplication),
    CreatePublicApplication(CreatePublicApplication),
    CoordinationApplications,
    ApplicationDetail(u64),
    AddComment(CreateComment),
    EditApplication { id: u64, payload: EditApplication },
    ApproveApplication(u64),
    RequestChanges(u64),
    /// Reject with a coordinator-supplied reason
    RejectApplication { id: u64, reason: String },
    RegistrationRequests,
    ApproveRegistration(ApproveUserRequest),
    RejectRegistration(RejectUserRequest),
}

impl Request {
    pub fn kind(&self) -> ActionKind {
        match self {
            Request::Login(_) => ActionKind::Login,
            Request::Register(_) => ActionKind::Register,
            Request::CheckAuth => ActionKind::CheckAuth,
            Request::Logout => ActionKind::Logout,
            Request::Institutes => ActionKind::Institutes,
            Request::Departments => ActionKind::Departments,
            Request::Roles => ActionKind::Roles,
            Request::MyApplications => ActionKind::MyApplications,
            Request::CreateMainApplication(_) => ActionKind::CreateMainApplication,
            Request::CreatePublicApplication(_) => ActionKind::CreatePublicApplication,
            Request::CoordinationApplications => ActionKind::CoordinationApplications,
            Request::ApplicationDetail(_) => ActionKind::ApplicationDetail,
            Request::AddComment(_) => ActionKind::AddComment,
            Request::EditApplication { .. } => ActionKind::EditApplication,
            Request::ApproveApplication(_) => ActionKind::ApproveApplication,
            Request::RequestChanges(_) => ActionKind::RequestChanges,
            Request::RejectApplication { .. } => ActionKind::RejectApplication,
            Request::RegistrationRequests => ActionKind::RegistrationRequests,
            Request::ApproveRegistration(_) => ActionKind::ApproveRegistration,
            Request::RejectRegistration(_) => ActionKind::RejectRegistration,
        }
    }

    /// The pending phase applied before the call starts
    fn pending(&self) -> Action {
        match self {
            Request::Login(_) => Action::User(UserAction::Login(Phase::Pending)),
            Request::Register(_) => Action::User(UserAction::Register(Phase::Pending)),
            Request::CheckAuth => Action::User(UserAction::CheckAuth(Phase::Pending)),
            Request::Logout => Action::User(UserAction::Logout(Phase::Pending)),
            Request::Institutes => Action::Catalog(CatalogAction::Institutes(Phase::Pending)),
            Request::Departments => Action::Catalog(CatalogAction::Departments(Phase::Pending)),
            Request::Roles => Action::Catalog(CatalogAction::Roles(Phase::Pending)),
            Request::MyApplications => {
                Action::Application(ApplicationAction::FetchMine(Phase::Pending))
            }
            Request::CreateMainApplication(_) => {
                Action::Application(ApplicationAction::CreateMain(Phase::Pending))
            }
            Request::CreatePublicApplication(_) => {
                Action::Application(ApplicationAction::CreatePublic(Phase::Pending))
            }
            Request::CoordinationApplications => {
                Action::Coordination(CoordinationAction::FetchApplications(Phase::Pending))
            }
            Request::ApplicationDetail(_) => {
                Action::Coordination(CoordinationAction::FetchDetail(Phase::Pending))
            }
            Request::AddComment(_) => {
                Action::Coordination(CoordinationAction::AddComment(Phase::Pending))
            }
            Request::EditApplication { .. } => {
                Action::Coordination(CoordinationAction::Edit(Phase::Pending))
            }
            Request::ApproveApplication(_) => Action::Coordination(CoordinationAction::Decide(
                Decision::Approve,
                Phase::Pending,
            )),
            Request::RequestChanges(_) => Action::Coordination(CoordinationAction::Decide(
                Decision::RequestChanges,
                Phase::Pending,
            )),
            Request::RejectApplication { .. } => Action::Coordination(
                CoordinationAction::Decide(Decision::Reject, Phase::Pending),
            ),
            Request::RegistrationRequests => {
                Action::ControlApprove(ControlApproveAction::FetchUsers(Phase::Pending))
            }
            Request::ApproveRegistration(_) => {
                Action::ControlApprove(ControlApproveAction::Approve(Phase::Pending))
            }
            Request::RejectRegistration(_) => {
                Action::ControlApprove(ControlApproveAction::Reject(Phase::Pending))
            }
        }
    }
}

/// Terminal phase of a dispatched request, tagged for settling
#[derive(Debug, Clone)]
pub struct Completion {
    pub kind: ActionKind,
    pub seq: u64,
    pub scope: CancellationToken,
    pub action: Action,
}

/// Runs requests and settles their completions into the store
pub struct Dispatcher {
    api: Arc<dyn ApiClientTrait>,
    tx: UnboundedSender<Completion>,
    issued: HashMap<ActionKind, u64>,
}

impl Dispatcher {
    /// Create a dispatcher and the receiving end of its completion channel
    pub fn new(api: Arc<dyn ApiClientTrait>) -> (Self, UnboundedReceiver<Completion>) {
        let (tx, rx) = unbounded_channel();
        let dispatcher = Self {
            api,
            tx,
            issued: HashMap::new(),
        };
        (dispatcher, rx)
    }

    /// Apply the pending phase and start the call; returns the sequence number
    pub fn dispatch(
        &mut self,
        store: &mut Store,
        request: Request,
        scope: &CancellationToken,
    ) -> u64 {
        let kind = request.kind();
        let seq = {
            let counter = self.issued.entry(kind).or_insert(0);
            *counter += 1;
            *counter
        };
        debug!("Dispatching {:?} #{}", kind, seq);
        store.apply(request.pending());

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let scope = scope.clone();
        tokio::spawn(async move {
            let action = perform(api.as_ref(), request).await;
            let completion = Completion {
                kind,
                seq,
                scope,
                action,
            };
            if tx.send(completion).is_err() {
                debug!("Completion for {:?} #{} has no receiver", kind, seq);
            }
        });
        seq
    }

    /// Apply a completion if it is still current; returns the applied action
    pub fn settle(&self, store: &mut Store, completion: Completion) -> Option<Action> {
        let Completion {
            kind,
            seq,
            scope,
            action,
        } = completion;
        let latest = self.issued.get(&kind).copied().unwrap_or(0);

        if seq != latest {
            debug!("Dropping stale {:?} #{} (latest #{})", kind, seq, latest);
            return None;
        }
        if scope.is_cancelled() {
            debug!("Dropping {:?} #{} for a closed view", kind, seq);
            store.clear_loading(kind);
            return None;
        }

        store.apply(action.clone());
        Some(action)
    }
}

/// Message carried by a failure, if any
fn failure(kind: &str, err: ApiError) -> Option<String> {
    warn!("{} failed: {}", kind, err);
    err.message()
}

fn phase<T>(kind: &str, result: Result<T, ApiError>) -> Phase<T> {
    match result {
        Ok(value) => Phase::Fulfilled(value),
        Err(err) => Phase::Rejected(failure(kind, err)),
    }
}

/// Run a request and produce its terminal action
async fn perform(api: &dyn ApiClientTrait, request: Request) -> Action {
    match request {
        Request::Login(body) => {
            Action::User(UserAction::Login(phase("login", api.login(body).await)))
        }
        Request::Register(body) => Action::User(UserAction::Register(phase(
            "registration",
            api.register(body).await,
        ))),
        Request::CheckAuth => {
            // never rejects: an invalid token just means "signed out"
            let user = if api.has_token() {
                match api.current_user().await {
                    Ok(user) => Some(user),
                    Err(err) => {
                        debug!("Stored token rejected: {}", err);
                        None
                    }
                }
            } else {
                None
            };
            Action::User(UserAction::CheckAuth(Phase::Fulfilled(user)))
        }
        Request::Logout => {
            api.logout().await;
            Action::User(UserAction::Logout(Phase::Fulfilled(())))
        }
        Request::Institutes => Action::Catalog(CatalogAction::Institutes(phase(
            "institutes",
            api.institutes().await,
        ))),
        Request::Departments => Action::Catalog(CatalogAction::Departments(phase(
            "departments",
            api.departments().await,
        ))),
        Request::Roles => Action::Catalog(CatalogAction::Roles(phase("roles", api.roles().await))),
        Request::MyApplications => Action::Application(ApplicationAction::FetchMine(phase(
            "my applications",
            api.my_applications().await,
        ))),
        Request::CreateMainApplication(body) => Action::Application(
            ApplicationAction::CreateMain(phase(
                "create application",
                api.create_main_application(body).await,
            )),
        ),
        Request::CreatePublicApplication(body) => Action::Application(
            ApplicationAction::CreatePublic(phase(
                "create public application",
                api.create_public_application(body).await,
            )),
        ),
        Request::CoordinationApplications => Action::Coordination(
            CoordinationAction::FetchApplications(phase(
                "coordination applications",
                api.coordination_applications().await,
            )),
        ),
        Request::ApplicationDetail(id) => Action::Coordination(CoordinationAction::FetchDetail(
            phase("application detail", api.application_detail(id).await),
        )),
        Request::AddComment(body) => Action::Coordination(CoordinationAction::AddComment(
            phase("add comment", api.add_comment(body).await),
        )),
        Request::EditApplication { id, payload } => {
            let result = api.edit_application(id, payload).await;
            Action::Coordination(CoordinationAction::Edit(phase("edit application", result)))
        }
        Request::ApproveApplication(id) => Action::Coordination(CoordinationAction::Decide(
            Decision::Approve,
            phase("approve application", api.approve_application(id).await),
        )),
        Request::RequestChanges(id) => Action::Coordination(CoordinationAction::Decide(
            Decision::RequestChanges,
            phase("request changes", api.request_changes(id).await),
        )),
        Request::RejectApplication { id, reason } => Action::Coordination(
            CoordinationAction::Decide(
                Decision::Reject,
                phase("reject application", api.reject_application(id, reason).await),
            ),
        ),
        Request::RegistrationRequests => Action::ControlApprove(ControlApproveAction::FetchUsers(
            phase("registration requests", api.registration_requests().await),
        )),
        Request::ApproveRegistration(body) => Action::ControlApprove(
            ControlApproveAction::Approve(phase(
                "approve registration",
                api.approve_registration(body).await,
            )),
        ),
        Request::RejectRegistration(body) => Action::ControlApprove(
            ControlApproveAction::Reject(phase(
                "reject registration",
                api.reject_registration(body).await,
            )),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockApiClientTrait;
    use crate::state::models::{
        AppActionResponse, Application, ApplicationDetail, ApplicationItem, AuthResponse, Comment,
        User,
    };
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::time::Duration;

    fn item(id: u64) -> ApplicationItem {
        ApplicationItem {
            id,
            ..Default::default()
        }
    }

    fn dispatcher(mock: MockApiClientTrait) -> (Dispatcher, UnboundedReceiver<Completion>) {
        Dispatcher::new(Arc::new(mock))
    }

    async fn next(rx: &mut UnboundedReceiver<Completion>) -> Completion {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("completion in time")
            .expect("channel open")
    }

    #[tokio::test]
    async fn test_fetch_roundtrip_success() {
        let mut mock = MockApiClientTrait::new();
        mock.expect_my_applications()
            .times(1)
            .returning(|| Ok(vec![item(1), item(2)]));
        let (mut dispatcher, mut rx) = dispatcher(mock);
        let mut store = Store::default();
        let scope = CancellationToken::new();

        dispatcher.dispatch(&mut store, Request::MyApplications, &scope);
        assert!(store.application.is_loading);
        assert_eq!(store.application.error, None);

        let completion = next(&mut rx).await;
        let applied = dispatcher.settle(&mut store, completion);
        assert!(applied.is_some());
        assert!(!store.application.is_loading);
        assert_eq!(store.application.applications, vec![item(1), item(2)]);
    }

    #[tokio::test]
    async fn test_fetch_roundtrip_failure_with_message() {
        let mut mock = MockApiClientTrait::new();
        mock.expect_my_applications().returning(|| {
            Err(ApiError::Status {
                status: 403,
                body: json!({"detail": "Forbidden"}),
            })
        });
        let (mut dispatcher, mut rx) = dispatcher(mock);
        let mut store = Store::default();
        let scope = CancellationToken::new();

        dispatcher.dispatch(&mut store, Request::MyApplications, &scope);
        let applied = dispatcher.settle(&mut store, next(&mut rx).await).unwrap();

        assert!(applied.is_rejected());
        assert!(!store.application.is_loading);
        assert_eq!(store.application.error.as_deref(), Some("Forbidden"));
    }

    #[tokio::test]
    async fn test_fetch_roundtrip_failure_without_message_uses_fallback() {
        let mut mock = MockApiClientTrait::new();
        mock.expect_coordination_applications().returning(|| {
            Err(ApiError::Status {
                status: 500,
                body: Value::Null,
            })
        });
        let (mut dispatcher, mut rx) = dispatcher(mock);
        let mut store = Store::default();
        let scope = CancellationToken::new();

        dispatcher.dispatch(&mut store, Request::CoordinationApplications, &scope);
        assert!(store.coordination.is_loading_apps);
        dispatcher.settle(&mut store, next(&mut rx).await);

        assert!(!store.coordination.is_loading_apps);
        assert_eq!(
            store.coordination.error.as_deref(),
            Some("Failed to load applications")
        );
    }

    #[tokio::test]
    async fn test_stale_completion_is_dropped() {
        let mut mock = MockApiClientTrait::new();
        mock.expect_application_detail().returning(|id| {
            Ok(ApplicationDetail {
                application: Application {
                    id,
                    ..Default::default()
                },
                ..Default::default()
            })
        });
        let (mut dispatcher, mut rx) = dispatcher(mock);
        let mut store = Store::default();
        let scope = CancellationToken::new();

        let first = dispatcher.dispatch(&mut store, Request::ApplicationDetail(1), &scope);
        let second = dispatcher.dispatch(&mut store, Request::ApplicationDetail(2), &scope);
        assert!(second > first);

        let mut completions = vec![next(&mut rx).await, next(&mut rx).await];
        // deliver the newer response first, then the older one
        completions.sort_by_key(|c| std::cmp::Reverse(c.seq));
        let applied: Vec<bool> = completions
            .into_iter()
            .map(|c| dispatcher.settle(&mut store, c).is_some())
            .collect();

        assert_eq!(applied, vec![true, false]);
        let detail = store.coordination.detail.as_ref().unwrap();
        assert_eq!(detail.application.id, 2);
        assert!(!store.coordination.is_loading_detail);
    }

    #[tokio::test]
    async fn test_cancelled_scope_is_dropped_and_loading_cleared() {
        let mut mock = MockApiClientTrait::new();
        mock.expect_registration_requests()
            .returning(|| Ok(vec![Default::default()]));
        let (mut dispatcher, mut rx) = dispatcher(mock);
        let mut store = Store::default();
        let scope = CancellationToken::new();

        dispatcher.dispatch(&mut store, Request::RegistrationRequests, &scope);
        scope.cancel();

        let applied = dispatcher.settle(&mut store, next(&mut rx).await);
        assert_eq!(applied, None);
        assert!(store.control.users.is_empty());
        assert!(!store.control.is_loading_list);
    }

    #[tokio::test]
    async fn test_check_auth_without_token_skips_request() {
        let mut mock = MockApiClientTrait::new();
        mock.expect_has_token().return_const(false);
        mock.expect_current_user().never();
        let (mut dispatcher, mut rx) = dispatcher(mock);
        let mut store = Store::default();

        dispatcher.dispatch(&mut store, Request::CheckAuth, &CancellationToken::new());
        dispatcher.settle(&mut store, next(&mut rx).await);

        assert!(store.user.is_auth_checked);
        assert_eq!(store.user.user, None);
    }

    #[tokio::test]
    async fn test_check_auth_invalid_token_resolves_signed_out() {
        let mut mock = MockApiClientTrait::new();
        mock.expect_has_token().return_const(true);
        mock.expect_current_user().returning(|| {
            Err(ApiError::Status {
                status: 401,
                body: json!({"detail": "expired"}),
            })
        });
        let (mut dispatcher, mut rx) = dispatcher(mock);
        let mut store = Store::default();

        dispatcher.dispatch(&mut store, Request::CheckAuth, &CancellationToken::new());
        let applied = dispatcher.settle(&mut store, next(&mut rx).await).unwrap();

        assert!(!applied.is_rejected());
        assert!(store.user.is_auth_checked);
        assert_eq!(store.user.error, None);
    }

    #[tokio::test]
    async fn test_login_then_logout() {
        let mut mock = MockApiClientTrait::new();
        mock.expect_login().returning(|_| {
            Ok(AuthResponse {
                access: "tok".into(),
                user: Some(User {
                    id: 3,
                    ..Default::default()
                }),
                ..Default::default()
            })
        });
        mock.expect_logout().times(1).return_const(());
        let (mut dispatcher, mut rx) = dispatcher(mock);
        let mut store = Store::default();
        let scope = CancellationToken::new();

        let request = LoginRequest {
            email: "a@b.ru".into(),
            password: "pw".into(),
        };
        dispatcher.dispatch(&mut store, Request::Login(request), &scope);
        assert!(store.user.is_loading);
        dispatcher.settle(&mut store, next(&mut rx).await);
        assert_eq!(store.user.user.as_ref().map(|u| u.id), Some(3));

        dispatcher.dispatch(&mut store, Request::Logout, &scope);
        dispatcher.settle(&mut store, next(&mut rx).await);
        assert_eq!(store.user.user, None);
    }

    #[tokio::test]
    async fn test_comment_is_prepended_through_dispatch() {
        let mut mock = MockApiClientTrait::new();
        mock.expect_add_comment()
            .withf(|c| c.application_id == 4 && c.field == "goal")
            .returning(|c| {
                Ok(Comment {
                    id: 10,
                    field: c.field,
                    text: c.text,
                    ..Default::default()
                })
            });
        let (mut dispatcher, mut rx) = dispatcher(mock);
        let mut store = Store::default();
        store.coordination.detail = Some(Default::default());

        dispatcher.dispatch(
            &mut store,
            Request::AddComment(CreateComment {
                application_id: 4,
                field: "goal".into(),
                text: "Be specific".into(),
            }),
            &CancellationToken::new(),
        );
        assert!(store.coordination.is_loading_comment);
        dispatcher.settle(&mut store, next(&mut rx).await);

        let detail = store.coordination.detail.as_ref().unwrap();
        assert_eq!(detail.comments[0].id, 10);
        assert_eq!(detail.comment_count("goal"), 1);
    }

    #[tokio::test]
    async fn test_reject_application_sends_reason() {
        let mut mock = MockApiClientTrait::new();
        mock.expect_reject_application()
            .with(eq(7), eq("Duplicate of #3".to_string()))
            .times(1)
            .returning(|_, _| Ok(Default::default()));
        let (mut dispatcher, mut rx) = dispatcher(mock);
        let mut store = Store::default();

        dispatcher.dispatch(
            &mut store,
            Request::RejectApplication {
                id: 7,
                reason: "Duplicate of #3".into(),
            },
            &CancellationToken::new(),
        );
        assert!(store.coordination.is_loading_decision);
        let applied = dispatcher.settle(&mut store, next(&mut rx).await);
        assert!(matches!(
            applied,
            Some(Action::Coordination(CoordinationAction::Decide(
                Decision::Reject,
                Phase::Fulfilled(_)
            )))
        ));
    }

    #[tokio::test]
    async fn test_request_changes_updates_status() {
        let mut mock = MockApiClientTrait::new();
        mock.expect_request_changes().with(eq(7)).returning(|_| {
            Ok(AppActionResponse {
                status: "rework".into(),
                status_name: "Needs rework".into(),
                ..Default::default()
            })
        });
        let (mut dispatcher, mut rx) = dispatcher(mock);
        let mut store = Store::default();
        store.coordination.detail = Some(Default::default());

        dispatcher.dispatch(&mut store, Request::RequestChanges(7), &CancellationToken::new());
        dispatcher.settle(&mut store, next(&mut rx).await);

        let detail = store.coordination.detail.as_ref().unwrap();
        assert_eq!(detail.application.status.code, "rework");
        assert!(!store.coordination.is_loading_decision);
    }

    #[tokio::test]
    async fn test_sequence_numbers_are_per_kind() {
        let mut mock = MockApiClientTrait::new();
        mock.expect_institutes().returning(|| Ok(vec![]));
        mock.expect_roles().returning(|| Ok(vec![]));
        let (mut dispatcher, mut rx) = dispatcher(mock);
        let mut store = Store::default();
        let scope = CancellationToken::new();

        assert_eq!(dispatcher.dispatch(&mut store, Request::Institutes, &scope), 1);
        assert_eq!(dispatcher.dispatch(&mut store, Request::Roles, &scope), 1);
        assert_eq!(dispatcher.dispatch(&mut store, Request::Institutes, &scope), 2);

        for _ in 0..3 {
            next(&mut rx).await;
        }
    }
}
