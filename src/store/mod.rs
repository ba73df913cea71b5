//! Application store: typed slices, their reducers and the async dispatcher
//!
//! Every slice is a plain struct updated only through its `Reducer`. The
//! [`Store`] aggregates the slices and is owned by the app, never global.

mod application;
mod catalog;
mod control_approve;
mod coordination;
mod dispatch;
mod user;

pub use application::{ApplicationAction, ApplicationReducer, ApplicationState};
pub use catalog::{CatalogAction, CatalogReducer, CatalogState};
pub use control_approve::{ControlApproveAction, ControlApproveReducer, ControlApproveState};
pub use coordination::{CoordinationAction, CoordinationReducer, CoordinationState, Decision};
pub use dispatch::{Completion, Dispatcher, Request};
pub use user::{UserAction, UserReducer, UserState};

/// Pure state transition: `(State, Action) -> State`
pub trait Reducer {
    type State: Default;
    type Action;

    fn reduce(state: Self::State, action: Self::Action) -> Self::State;
}

/// Three-phase lifecycle of an async action
#[derive(Debug, Clone, PartialEq)]
pub enum Phase<T> {
    Pending,
    Fulfilled(T),
    /// Human-readable message, if the failure carried one
    Rejected(Option<String>),
}

impl<T> Phase<T> {
    pub fn is_rejected(&self) -> bool {
        matches!(self, Phase::Rejected(_))
    }
}

/// Stored message for a rejection, falling back when none was carried
pub(crate) fn rejection(message: Option<String>, fallback: &str) -> Option<String> {
    Some(
        message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string()),
    )
}

/// Async action types; sequencing is tracked per kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Login,
    Register,
    CheckAuth,
    Logout,
    Institutes,
    Departments,
    Roles,
    MyApplications,
    CreateMainApplication,
    CreatePublicApplication,
    CoordinationApplications,
    ApplicationDetail,
    AddComment,
    EditApplication,
    ApproveApplication,
    RequestChanges,
    RejectApplication,
    RegistrationRequests,
    ApproveRegistration,
    RejectRegistration,
}

/// Any action of any slice
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    User(UserAction),
    Catalog(CatalogAction),
    Application(ApplicationAction),
    Coordination(CoordinationAction),
    ControlApprove(ControlApproveAction),
}

impl Action {
    /// Whether this is the rejected phase of an async action
    pub fn is_rejected(&self) -> bool {
        match self {
            Action::User(a) => a.is_rejected(),
            Action::Catalog(a) => a.is_rejected(),
            Action::Application(a) => a.is_rejected(),
            Action::Coordination(a) => a.is_rejected(),
            Action::ControlApprove(a) => a.is_rejected(),
        }
    }
}

/// All slices of the application state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    pub user: UserState,
    pub catalog: CatalogState,
    pub application: ApplicationState,
    pub coordination: CoordinationState,
    pub control: ControlApproveState,
}

fn reduce_in_place<R: Reducer>(slot: &mut R::State, action: R::Action) {
    *slot = R::reduce(std::mem::take(slot), action);
}

impl Store {
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::User(a) => reduce_in_place::<UserReducer>(&mut self.user, a),
            Action::Catalog(a) => reduce_in_place::<CatalogReducer>(&mut self.catalog, a),
            Action::Application(a) => {
                reduce_in_place::<ApplicationReducer>(&mut self.application, a)
            }
            Action::Coordination(a) => {
                reduce_in_place::<CoordinationReducer>(&mut self.coordination, a)
            }
            Action::ControlApprove(a) => {
                reduce_in_place::<ControlApproveReducer>(&mut self.control, a)
            }
        }
    }

    /// Drop the loading flag of an action whose completion was discarded
    pub fn clear_loading(&mut self, kind: ActionKind) {
        use ActionKind as K;
        match kind {
            K::Login | K::Register => self.user.is_loading = false,
            K::CheckAuth => self.user.is_auth_checked = true,
            K::Logout => {}
            K::Institutes | K::Departments | K::Roles => self.catalog.is_loading = false,
            K::MyApplications | K::CreateMainApplication | K::CreatePublicApplication => {
                self.application.is_loading = false
            }
            K::CoordinationApplications => self.coordination.is_loading_apps = false,
            K::ApplicationDetail => self.coordination.is_loading_detail = false,
            K::AddComment => self.coordination.is_loading_comment = false,
            K::EditApplication | K::ApproveApplication | K::RequestChanges | K::RejectApplication => {
                self.coordination.is_loading_decision = false
            }
            K::RegistrationRequests => self.control.is_loading_list = false,
            K::ApproveRegistration | K::RejectRegistration => {
                self.control.is_loading_request = false
            }
        }
    }

    /// Current error of the slice that owns `kind`
    pub fn error_for(&self, kind: ActionKind) -> Option<&str> {
        use ActionKind as K;
        let error = match kind {
            K::Login | K::Register | K::CheckAuth | K::Logout => &self.user.error,
            K::Institutes | K::Departments | K::Roles => &self.catalog.error,
            K::MyApplications | K::CreateMainApplication | K::CreatePublicApplication => {
                &self.application.error
            }
            K::CoordinationApplications
            | K::ApplicationDetail
            | K::AddComment
            | K::EditApplication
            | K::ApproveApplication
            | K::RequestChanges
            | K::RejectApplication => &self.coordination.error,
            K::RegistrationRequests | K::ApproveRegistration | K::RejectRegistration => {
                &self.control.error
            }
        };
        error.as_deref()
    }
}
