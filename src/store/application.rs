//! Applications authored by the user, plus application submission

use super::{rejection, Phase, Reducer};
use crate::state::models::{sort_newest_first, Application, ApplicationItem};

const LIST_FALLBACK: &str = "Failed to load applications";
const CREATE_FALLBACK: &str = "Something went wrong";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationState {
    pub applications: Vec<ApplicationItem>,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApplicationAction {
    FetchMine(Phase<Vec<ApplicationItem>>),
    CreateMain(Phase<Application>),
    CreatePublic(Phase<Application>),
}

impl ApplicationAction {
    pub fn is_rejected(&self) -> bool {
        match self {
            ApplicationAction::FetchMine(p) => p.is_rejected(),
            ApplicationAction::CreateMain(p) | ApplicationAction::CreatePublic(p) => {
                p.is_rejected()
            }
        }
    }
}

pub struct ApplicationReducer;

impl Reducer for ApplicationReducer {
    type State = ApplicationState;
    type Action = ApplicationAction;

    fn reduce(mut state: ApplicationState, action: ApplicationAction) -> ApplicationState {
        match action {
            ApplicationAction::FetchMine(Phase::Pending)
            | ApplicationAction::CreateMain(Phase::Pending)
            | ApplicationAction::CreatePublic(Phase::Pending) => {
                state.is_loading = true;
                state.error = None;
            }
            ApplicationAction::FetchMine(Phase::Fulfilled(mut items)) => {
                state.is_loading = false;
                sort_newest_first(&mut items);
                state.applications = items;
            }
            ApplicationAction::CreateMain(Phase::Fulfilled(_))
            | ApplicationAction::CreatePublic(Phase::Fulfilled(_)) => {
                state.is_loading = false;
            }
            ApplicationAction::FetchMine(Phase::Rejected(message)) => {
                state.is_loading = false;
                state.error = rejection(message, LIST_FALLBACK);
            }
            ApplicationAction::CreateMain(Phase::Rejected(message))
            | ApplicationAction::CreatePublic(Phase::Rejected(message)) => {
                state.is_loading = false;
                state.error = rejection(message, CREATE_FALLBACK);
            }
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn item(id: u64) -> ApplicationItem {
        ApplicationItem {
            id,
            ..Default::default()
        }
    }

    #[test]
    fn test_fetch_replaces_list() {
        let state = ApplicationState {
            applications: vec![item(1), item(2)],
            ..Default::default()
        };
        let state = ApplicationReducer::reduce(state, ApplicationAction::FetchMine(Phase::Pending));
        assert!(state.is_loading);
        let state = ApplicationReducer::reduce(
            state,
            ApplicationAction::FetchMine(Phase::Fulfilled(vec![item(3)])),
        );
        assert!(!state.is_loading);
        assert_eq!(state.applications, vec![item(3)]);
    }

    #[test]
    fn test_fetched_list_is_newest_first() {
        let dated = |id, created: &str| ApplicationItem {
            creation_date: created.into(),
            ..item(id)
        };
        let state = ApplicationReducer::reduce(
            ApplicationState::default(),
            ApplicationAction::FetchMine(Phase::Fulfilled(vec![
                dated(1, "2024-02-01T10:00:00Z"),
                dated(2, "2024-04-15T10:00:00Z"),
                dated(3, "2024-03-20T10:00:00Z"),
            ])),
        );
        let ids: Vec<u64> = state.applications.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_fallbacks_differ_for_list_and_create() {
        let state = ApplicationReducer::reduce(
            ApplicationState::default(),
            ApplicationAction::FetchMine(Phase::Rejected(None)),
        );
        assert_eq!(state.error.as_deref(), Some("Failed to load applications"));

        let state = ApplicationReducer::reduce(
            ApplicationState::default(),
            ApplicationAction::CreatePublic(Phase::Rejected(None)),
        );
        assert_eq!(state.error.as_deref(), Some("Something went wrong"));
    }

    #[test]
    fn test_create_keeps_list_untouched() {
        let state = ApplicationState {
            applications: vec![item(1)],
            is_loading: true,
            ..Default::default()
        };
        let state = ApplicationReducer::reduce(
            state,
            ApplicationAction::CreateMain(Phase::Fulfilled(Application::default())),
        );
        assert!(!state.is_loading);
        assert_eq!(state.applications, vec![item(1)]);
    }

    #[test]
    fn test_pending_clears_previous_error() {
        let state = ApplicationState {
            error: Some("old".into()),
            ..Default::default()
        };
        let state = ApplicationReducer::reduce(state, ApplicationAction::CreateMain(Phase::Pending));
        assert_eq!(state.error, None);
    }
}
