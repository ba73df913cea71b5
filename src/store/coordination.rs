//! Coordinator workspace: assigned applications, detail, comments, decisions

use super::{rejection, Phase, Reducer};
use crate::state::models::{
    AppActionResponse, Application, ApplicationDetail, ApplicationItem, Comment, FieldRef, Status,
};

const LIST_FALLBACK: &str = "Failed to load applications";
const DETAIL_FALLBACK: &str = "Failed to load application";
const COMMENT_FALLBACK: &str = "Failed to create comment";
const UPDATE_FALLBACK: &str = "Failed to update application";

/// Workflow transitions a coordinator can apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    RequestChanges,
    Reject,
}

impl Decision {
    /// Name of the matching entry in `available_actions`
    pub fn action_name(self) -> &'static str {
        match self {
            Decision::Approve => "approve",
            Decision::RequestChanges => "request_changes",
            Decision::Reject => "reject",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Decision::Approve => "Approve",
            Decision::RequestChanges => "Request changes",
            Decision::Reject => "Reject",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinationState {
    pub applications: Vec<ApplicationItem>,
    pub detail: Option<ApplicationDetail>,
    /// Field selected for reading or adding comments
    pub current_field: Option<FieldRef>,
    pub is_loading_apps: bool,
    pub is_loading_detail: bool,
    pub is_loading_comment: bool,
    /// Edit or decision in flight
    pub is_loading_decision: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CoordinationAction {
    FetchApplications(Phase<Vec<ApplicationItem>>),
    FetchDetail(Phase<ApplicationDetail>),
    AddComment(Phase<Comment>),
    Edit(Phase<Application>),
    Decide(Decision, Phase<AppActionResponse>),
    SetCurrentField(Option<FieldRef>),
}

impl CoordinationAction {
    pub fn is_rejected(&self) -> bool {
        match self {
            CoordinationAction::FetchApplications(p) => p.is_rejected(),
            CoordinationAction::FetchDetail(p) => p.is_rejected(),
            CoordinationAction::AddComment(p) => p.is_rejected(),
            CoordinationAction::Edit(p) => p.is_rejected(),
            CoordinationAction::Decide(_, p) => p.is_rejected(),
            CoordinationAction::SetCurrentField(_) => false,
        }
    }
}

pub struct CoordinationReducer;

impl Reducer for CoordinationReducer {
    type State = CoordinationState;
    type Action = CoordinationAction;

    fn reduce(mut state: CoordinationState, action: CoordinationAction) -> CoordinationState {
        match action {
            CoordinationAction::FetchApplications(phase) => match phase {
                Phase::Pending => {
                    state.is_loading_apps = true;
                    state.error = None;
                }
                Phase::Fulfilled(items) => {
                    state.is_loading_apps = false;
                    state.applications = items;
                }
                Phase::Rejected(message) => {
                    state.is_loading_apps = false;
                    state.error = rejection(message, LIST_FALLBACK);
                }
            },
            CoordinationAction::FetchDetail(phase) => match phase {
                Phase::Pending => {
                    state.is_loading_detail = true;
                    state.error = None;
                }
                Phase::Fulfilled(detail) => {
                    state.is_loading_detail = false;
                    state.detail = Some(detail);
                }
                Phase::Rejected(message) => {
                    state.is_loading_detail = false;
                    state.error = rejection(message, DETAIL_FALLBACK);
                }
            },
            CoordinationAction::AddComment(phase) => match phase {
                Phase::Pending => {
                    state.is_loading_comment = true;
                    state.error = None;
                }
                Phase::Fulfilled(comment) => {
                    state.is_loading_comment = false;
                    if let Some(detail) = state.detail.as_mut() {
                        detail.comments.insert(0, comment);
                    }
                }
                Phase::Rejected(message) => {
                    state.is_loading_comment = false;
                    state.error = rejection(message, COMMENT_FALLBACK);
                }
            },
            CoordinationAction::Edit(phase) => match phase {
                Phase::Pending => {
                    state.is_loading_decision = true;
                    state.error = None;
                }
                Phase::Fulfilled(application) => {
                    state.is_loading_decision = false;
                    if let Some(detail) = state.detail.as_mut() {
                        if detail.application.id == application.id {
                            detail.application = application;
                        }
                    }
                }
                Phase::Rejected(message) => {
                    state.is_loading_decision = false;
                    state.error = rejection(message, UPDATE_FALLBACK);
                }
            },
            CoordinationAction::Decide(_, phase) => match phase {
                Phase::Pending => {
                    state.is_loading_decision = true;
                    state.error = None;
                }
                Phase::Fulfilled(response) => {
                    state.is_loading_decision = false;
                    if let Some(detail) = state.detail.as_mut() {
                        if !response.status.is_empty() {
                            detail.application.status = Status {
                                code: response.status,
                                name: response.status_name,
                            };
                        }
                    }
                }
                Phase::Rejected(message) => {
                    state.is_loading_decision = false;
                    state.error = rejection(message, UPDATE_FALLBACK);
                }
            },
            CoordinationAction::SetCurrentField(field) => {
                state.current_field = field;
            }
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn detail_with_comments(ids: &[u64]) -> ApplicationDetail {
        ApplicationDetail {
            application: Application {
                id: 4,
                title: "Old title".into(),
                ..Default::default()
            },
            comments: ids
                .iter()
                .map(|&id| Comment {
                    id,
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_comment_is_prepended() {
        let state = CoordinationState {
            detail: Some(detail_with_comments(&[1, 2])),
            ..Default::default()
        };
        let state = CoordinationReducer::reduce(state, CoordinationAction::AddComment(Phase::Pending));
        assert!(state.is_loading_comment);
        let state = CoordinationReducer::reduce(
            state,
            CoordinationAction::AddComment(Phase::Fulfilled(Comment {
                id: 9,
                ..Default::default()
            })),
        );
        assert!(!state.is_loading_comment);
        let ids: Vec<u64> = state.detail.unwrap().comments.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![9, 1, 2]);
    }

    #[test]
    fn test_comment_without_detail_is_ignored() {
        let state = CoordinationReducer::reduce(
            CoordinationState::default(),
            CoordinationAction::AddComment(Phase::Fulfilled(Comment::default())),
        );
        assert_eq!(state.detail, None);
    }

    #[test]
    fn test_edit_merges_application_keeps_comments() {
        let state = CoordinationState {
            detail: Some(detail_with_comments(&[1])),
            ..Default::default()
        };
        let state = CoordinationReducer::reduce(
            state,
            CoordinationAction::Edit(Phase::Fulfilled(Application {
                id: 4,
                title: "New title".into(),
                ..Default::default()
            })),
        );
        let detail = state.detail.unwrap();
        assert_eq!(detail.application.title, "New title");
        assert_eq!(detail.comments.len(), 1);
    }

    #[test]
    fn test_decision_updates_status() {
        let state = CoordinationState {
            detail: Some(detail_with_comments(&[])),
            ..Default::default()
        };
        let state = CoordinationReducer::reduce(
            state,
            CoordinationAction::Decide(Decision::Reject, Phase::Pending),
        );
        assert!(state.is_loading_decision);
        let state = CoordinationReducer::reduce(
            state,
            CoordinationAction::Decide(
                Decision::Reject,
                Phase::Fulfilled(AppActionResponse {
                    message: "done".into(),
                    status: "rejected".into(),
                    status_name: "Rejected".into(),
                }),
            ),
        );
        assert!(!state.is_loading_decision);
        assert_eq!(state.detail.unwrap().application.status.name, "Rejected");
    }

    #[test]
    fn test_rejections_use_per_action_fallbacks() {
        let cases = [
            (
                CoordinationAction::FetchApplications(Phase::Rejected(None)),
                "Failed to load applications",
            ),
            (
                CoordinationAction::FetchDetail(Phase::Rejected(None)),
                "Failed to load application",
            ),
            (
                CoordinationAction::AddComment(Phase::Rejected(None)),
                "Failed to create comment",
            ),
            (
                CoordinationAction::Edit(Phase::Rejected(None)),
                "Failed to update application",
            ),
        ];
        for (action, expected) in cases {
            let state = CoordinationReducer::reduce(CoordinationState::default(), action);
            assert_eq!(state.error.as_deref(), Some(expected));
        }
    }

    #[test]
    fn test_set_current_field() {
        let field = FieldRef::new("goal", "Goal");
        let state = CoordinationReducer::reduce(
            CoordinationState::default(),
            CoordinationAction::SetCurrentField(Some(field.clone())),
        );
        assert_eq!(state.current_field, Some(field));
        let state = CoordinationReducer::reduce(state, CoordinationAction::SetCurrentField(None));
        assert_eq!(state.current_field, None);
    }

    #[test]
    fn test_decision_action_names() {
        assert_eq!(Decision::RequestChanges.action_name(), "request_changes");
        assert_eq!(Decision::Approve.label(), "Approve");
    }
}
