//! Reference catalogs: institutes, departments, roles

use super::{rejection, Phase, Reducer};
use crate::state::models::{Department, Institute, Role};

const FALLBACK: &str = "Failed to load catalog";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogState {
    pub institutes: Vec<Institute>,
    pub departments: Vec<Department>,
    pub roles: Vec<Role>,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogAction {
    Institutes(Phase<Vec<Institute>>),
    Departments(Phase<Vec<Department>>),
    Roles(Phase<Vec<Role>>),
}

impl CatalogAction {
    pub fn is_rejected(&self) -> bool {
        match self {
            CatalogAction::Institutes(p) => p.is_rejected(),
            CatalogAction::Departments(p) => p.is_rejected(),
            CatalogAction::Roles(p) => p.is_rejected(),
        }
    }
}

pub struct CatalogReducer;

/// Shared pending/rejected handling; fulfilled replaces the target list
fn settle<T>(
    state: &mut CatalogState,
    phase: Phase<Vec<T>>,
    target: impl FnOnce(&mut CatalogState) -> &mut Vec<T>,
) {
    match phase {
        Phase::Pending => {
            state.is_loading = true;
            state.error = None;
        }
        Phase::Fulfilled(items) => {
            state.is_loading = false;
            *target(state) = items;
        }
        Phase::Rejected(message) => {
            state.is_loading = false;
            state.error = rejection(message, FALLBACK);
        }
    }
}

impl Reducer for CatalogReducer {
    type State = CatalogState;
    type Action = CatalogAction;

    fn reduce(mut state: CatalogState, action: CatalogAction) -> CatalogState {
        match action {
            CatalogAction::Institutes(phase) => settle(&mut state, phase, |s| &mut s.institutes),
            CatalogAction::Departments(phase) => {
                settle(&mut state, phase, |s| &mut s.departments)
            }
            CatalogAction::Roles(phase) => settle(&mut state, phase, |s| &mut s.roles),
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fulfilled_replaces_only_its_list() {
        let state = CatalogState {
            roles: vec![Role {
                code: "student".into(),
                name: "Student".into(),
            }],
            ..Default::default()
        };
        let state = CatalogReducer::reduce(state, CatalogAction::Departments(Phase::Pending));
        assert!(state.is_loading);
        let state = CatalogReducer::reduce(
            state,
            CatalogAction::Departments(Phase::Fulfilled(vec![Department {
                id: 1,
                name: "Math".into(),
                short_name: "M".into(),
            }])),
        );
        assert!(!state.is_loading);
        assert_eq!(state.departments.len(), 1);
        assert_eq!(state.roles.len(), 1);
    }

    #[test]
    fn test_rejected_keeps_lists_and_sets_message() {
        let state = CatalogState {
            institutes: vec![Institute::default()],
            ..Default::default()
        };
        let state = CatalogReducer::reduce(
            state,
            CatalogAction::Institutes(Phase::Rejected(Some("offline".into()))),
        );
        assert_eq!(state.error.as_deref(), Some("offline"));
        assert_eq!(state.institutes.len(), 1);

        let state = CatalogReducer::reduce(state, CatalogAction::Roles(Phase::Rejected(None)));
        assert_eq!(state.error.as_deref(), Some("Failed to load catalog"));
    }
}
