//! Signed-in user slice

use super::{rejection, Phase, Reducer};
use crate::state::models::{AuthResponse, User};

const FALLBACK: &str = "Something went wrong";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserState {
    pub user: Option<User>,
    /// Whether the startup token check has finished
    pub is_auth_checked: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UserAction {
    Login(Phase<AuthResponse>),
    Register(Phase<AuthResponse>),
    /// Resolves to the token's profile, `None` when there is no valid token
    CheckAuth(Phase<Option<User>>),
    Logout(Phase<()>),
}

impl UserAction {
    pub fn is_rejected(&self) -> bool {
        match self {
            UserAction::Login(p) | UserAction::Register(p) => p.is_rejected(),
            UserAction::CheckAuth(p) => p.is_rejected(),
            UserAction::Logout(p) => p.is_rejected(),
        }
    }
}

pub struct UserReducer;

impl Reducer for UserReducer {
    type State = UserState;
    type Action = UserAction;

    fn reduce(mut state: UserState, action: UserAction) -> UserState {
        match action {
            UserAction::Login(Phase::Pending) | UserAction::Register(Phase::Pending) => {
                state.is_loading = true;
                state.error = None;
            }
            UserAction::Login(Phase::Fulfilled(response)) => {
                state.is_loading = false;
                state.user = response.user;
                state.is_auth_checked = true;
            }
            UserAction::Register(Phase::Fulfilled(_)) => {
                state.is_loading = false;
            }
            UserAction::Login(Phase::Rejected(message))
            | UserAction::Register(Phase::Rejected(message)) => {
                state.is_loading = false;
                state.error = rejection(message, FALLBACK);
            }
            UserAction::CheckAuth(Phase::Pending) => {}
            UserAction::CheckAuth(Phase::Fulfilled(user)) => {
                state.user = user;
                state.is_auth_checked = true;
            }
            UserAction::CheckAuth(Phase::Rejected(_)) => {
                state.user = None;
                state.is_auth_checked = true;
            }
            UserAction::Logout(Phase::Fulfilled(())) => {
                state.user = None;
            }
            UserAction::Logout(_) => {}
        }
        state
    }
}
