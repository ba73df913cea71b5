//! Administrator review of account registration requests

use super::{rejection, Phase, Reducer};
use crate::state::models::ApproveUser;

const FALLBACK: &str = "Failed to load users";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlApproveState {
    pub users: Vec<ApproveUser>,
    pub current_user: Option<ApproveUser>,
    pub is_open_approve_modal: bool,
    pub is_open_reject_modal: bool,
    pub is_open_detail_modal: bool,
    pub is_loading_list: bool,
    pub is_loading_request: bool,
    pub error: Option<String>,
}

impl ControlApproveState {
    pub fn any_modal_open(&self) -> bool {
        self.is_open_approve_modal || self.is_open_reject_modal || self.is_open_detail_modal
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControlApproveAction {
    FetchUsers(Phase<Vec<ApproveUser>>),
    Approve(Phase<ApproveUser>),
    Reject(Phase<ApproveUser>),
    SetCurrentUser(ApproveUser),
    ClearCurrentUser,
    OpenApproveModal,
    OpenRejectModal,
    OpenDetailModal,
    CloseModals,
}

impl ControlApproveAction {
    pub fn is_rejected(&self) -> bool {
        match self {
            ControlApproveAction::FetchUsers(p) => p.is_rejected(),
            ControlApproveAction::Approve(p) | ControlApproveAction::Reject(p) => p.is_rejected(),
            _ => false,
        }
    }
}

fn replace_by_id(users: &mut [ApproveUser], updated: ApproveUser) {
    if let Some(slot) = users.iter_mut().find(|u| u.id == updated.id) {
        *slot = updated;
    }
}

pub struct ControlApproveReducer;

impl Reducer for ControlApproveReducer {
    type State = ControlApproveState;
    type Action = ControlApproveAction;

    fn reduce(mut state: ControlApproveState, action: ControlApproveAction) -> ControlApproveState {
        match action {
            ControlApproveAction::FetchUsers(Phase::Pending) => {
                state.is_loading_list = true;
                state.error = None;
            }
            ControlApproveAction::FetchUsers(Phase::Fulfilled(users)) => {
                state.is_loading_list = false;
                state.users = users;
            }
            ControlApproveAction::FetchUsers(Phase::Rejected(message)) => {
                state.is_loading_list = false;
                state.error = rejection(message, FALLBACK);
            }
            ControlApproveAction::Approve(Phase::Pending)
            | ControlApproveAction::Reject(Phase::Pending) => {
                state.is_loading_request = true;
                state.error = None;
            }
            ControlApproveAction::Approve(Phase::Fulfilled(updated)) => {
                replace_by_id(&mut state.users, updated);
                state.is_loading_request = false;
                state.current_user = None;
                state.is_open_approve_modal = false;
            }
            ControlApproveAction::Reject(Phase::Fulfilled(updated)) => {
                replace_by_id(&mut state.users, updated);
                state.is_loading_request = false;
                state.current_user = None;
                state.is_open_reject_modal = false;
            }
            ControlApproveAction::Approve(Phase::Rejected(message))
            | ControlApproveAction::Reject(Phase::Rejected(message)) => {
                state.is_loading_request = false;
                state.error = rejection(message, FALLBACK);
            }
            ControlApproveAction::SetCurrentUser(user) => state.current_user = Some(user),
            ControlApproveAction::ClearCurrentUser => state.current_user = None,
            ControlApproveAction::OpenApproveModal => state.is_open_approve_modal = true,
            ControlApproveAction::OpenRejectModal => state.is_open_reject_modal = true,
            ControlApproveAction::OpenDetailModal => state.is_open_detail_modal = true,
            ControlApproveAction::CloseModals => {
                state.is_open_approve_modal = false;
                state.is_open_reject_modal = false;
                state.is_open_detail_modal = false;
            }
        }
        state
    }
}
