//! Application state definitions

use super::forms::{
    application_form, approve_user_form, comment_form, login_form, public_application_form,
    reason_form, registration_form, ApplicationForm, ApproveUserForm, CommentForm, FieldFocus,
    LoginForm, PublicApplicationForm, ReasonForm, RegistrationForm, APPLICATION_STEPS,
    PUBLIC_APPLICATION_STEPS,
};
use super::wizard::{StepGating, Wizard};
use crate::store::Decision;
use std::collections::VecDeque;
use tokio_util::sync::CancellationToken;

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Login,
    Registration,
    PublicApplication,
    Home,
    MyApplications,
    ApplicationDetail,
    NewApplication,
    Coordination,
    CoordinationDetail,
    Control,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "Sign in",
            Self::Registration => "Registration",
            Self::PublicApplication => "Submit a project",
            Self::Home => "Showcase",
            Self::MyApplications => "My applications",
            Self::ApplicationDetail => "Application",
            Self::NewApplication => "New application",
            Self::Coordination => "Coordination",
            Self::CoordinationDetail => "Review application",
            Self::Control => "Registration requests",
        }
    }

    /// Reachable without a signed-in user
    pub fn is_public(&self) -> bool {
        matches!(
            self,
            Self::Login | Self::Registration | Self::PublicApplication
        )
    }
}

/// View parameters for navigation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewParams {
    pub application_id: Option<u64>,
}

impl ViewParams {
    pub fn application(id: u64) -> Self {
        Self {
            application_id: Some(id),
        }
    }
}

/// Entries of the home menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    MyApplications,
    NewApplication,
    Coordination,
    Control,
    Logout,
}

const ADMIN_MENU: &[MenuEntry] = &[
    MenuEntry::NewApplication,
    MenuEntry::MyApplications,
    MenuEntry::Coordination,
    MenuEntry::Control,
    MenuEntry::Logout,
];

const MENTOR_MENU: &[MenuEntry] = &[
    MenuEntry::NewApplication,
    MenuEntry::MyApplications,
    MenuEntry::Logout,
];

const MEMBER_MENU: &[MenuEntry] = &[
    MenuEntry::NewApplication,
    MenuEntry::MyApplications,
    MenuEntry::Coordination,
    MenuEntry::Logout,
];

/// Home menu entries visible to a user role
///
/// Registration requests are admin-only; mentors do not coordinate.
pub fn home_menu(role: Option<&str>) -> &'static [MenuEntry] {
    match role {
        Some("admin") => ADMIN_MENU,
        Some("mentor") => MENTOR_MENU,
        _ => MEMBER_MENU,
    }
}

impl MenuEntry {
    pub fn label(&self) -> &'static str {
        match self {
            Self::MyApplications => "My applications",
            Self::NewApplication => "New application",
            Self::Coordination => "Coordination",
            Self::Control => "Registration requests",
            Self::Logout => "Log out",
        }
    }

    /// View opened by the entry; `None` for log out
    pub fn target(&self) -> Option<View> {
        match self {
            Self::MyApplications => Some(View::MyApplications),
            Self::NewApplication => Some(View::NewApplication),
            Self::Coordination => Some(View::Coordination),
            Self::Control => Some(View::Control),
            Self::Logout => None,
        }
    }
}

/// Interaction mode of the coordination detail view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailMode {
    #[default]
    Browse,
    Comment,
    Edit,
    /// Entering the reason for rejecting the application
    Reject,
}

/// Title filter typed above a list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub query: String,
    /// Keys go to the query instead of the list
    pub editing: bool,
}

impl ListFilter {
    pub fn is_active(&self) -> bool {
        !self.query.is_empty()
    }
}

/// Main application state
pub struct AppState {
    // Navigation
    pub current_view: View,
    pub view_params: ViewParams,
    pub view_history: Vec<(View, ViewParams)>,
    /// Lifetime of the current view; requests issued under it are dropped once cancelled
    scope: CancellationToken,

    // Selection
    pub selected_index: usize,
    pub scroll_offset: usize,
    pub focus: FieldFocus,
    /// Highlighted option inside a multi-select field
    pub option_cursor: usize,
    pub list_filter: ListFilter,

    // Errors waiting to be shown, oldest first
    errors: VecDeque<String>,

    // Mounted forms
    pub gating: StepGating,
    pub wizard: Wizard,
    pub login_form: LoginForm,
    pub registration_form: RegistrationForm,
    pub application_form: ApplicationForm,
    pub public_form: PublicApplicationForm,
    pub edit_form: ApplicationForm,
    pub comment_form: CommentForm,
    pub reason_form: ReasonForm,
    pub approve_form: ApproveUserForm,

    // Coordination detail
    pub detail_mode: DetailMode,
    /// Decision awaiting confirmation
    pub pending_decision: Option<Decision>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(StepGating::default())
    }
}

impl AppState {
    pub fn new(gating: StepGating) -> Self {
        Self {
            current_view: View::default(),
            view_params: ViewParams::default(),
            view_history: Vec::new(),
            scope: CancellationToken::new(),
            selected_index: 0,
            scroll_offset: 0,
            focus: FieldFocus::default(),
            option_cursor: 0,
            list_filter: ListFilter::default(),
            errors: VecDeque::new(),
            gating,
            wizard: Wizard::new(1, gating),
            login_form: login_form(),
            registration_form: registration_form(),
            application_form: application_form(),
            public_form: public_application_form(),
            edit_form: application_form(),
            comment_form: comment_form(),
            reason_form: reason_form(),
            approve_form: approve_user_form(),
            detail_mode: DetailMode::default(),
            pending_decision: None,
        }
    }

    /// Scope of the current view
    pub fn scope(&self) -> &CancellationToken {
        &self.scope
    }

    /// Open a view, remembering the current one for `go_back`
    pub fn navigate(&mut self, view: View, params: ViewParams) {
        self.view_history
            .push((self.current_view, self.view_params));
        self.enter(view, params);
    }

    /// Return to the previous view. Returns false when there is none.
    pub fn go_back(&mut self) -> bool {
        match self.view_history.pop() {
            Some((view, params)) => {
                self.enter(view, params);
                true
            }
            None => false,
        }
    }

    /// Open a view and forget the history (sign in, sign out)
    pub fn reset_to(&mut self, view: View) {
        self.view_history.clear();
        self.enter(view, ViewParams::default());
    }

    /// Switch views: close the old scope and mount the new view's forms
    fn enter(&mut self, view: View, params: ViewParams) {
        self.scope.cancel();
        self.scope = CancellationToken::new();
        self.current_view = view;
        self.view_params = params;
        self.reset_selection();
        self.focus.reset();
        self.option_cursor = 0;
        self.list_filter = ListFilter::default();
        self.detail_mode = DetailMode::Browse;
        self.pending_decision = None;

        match view {
            View::Login => self.login_form = login_form(),
            View::Registration => self.registration_form = registration_form(),
            View::PublicApplication => {
                self.public_form = public_application_form();
                self.wizard = Wizard::new(PUBLIC_APPLICATION_STEPS.len(), self.gating);
            }
            View::NewApplication => {
                self.application_form = application_form();
                self.wizard = Wizard::new(APPLICATION_STEPS.len(), self.gating);
            }
            View::CoordinationDetail => {
                self.comment_form = comment_form();
                self.reason_form = reason_form();
            }
            View::Control => {
                self.approve_form = approve_user_form();
                self.reason_form = reason_form();
            }
            _ => {}
        }
    }

    /// Switch the coordination detail into another mode
    pub fn set_detail_mode(&mut self, mode: DetailMode) {
        self.detail_mode = mode;
        self.focus.reset();
        self.scroll_offset = 0;
        match mode {
            DetailMode::Comment => self.comment_form = comment_form(),
            DetailMode::Reject => self.reason_form = reason_form(),
            DetailMode::Browse | DetailMode::Edit => {}
        }
    }

    /// Queue an error for the error dialog
    pub fn push_error(&mut self, message: String) {
        if self.errors.back() != Some(&message) {
            self.errors.push_back(message);
        }
    }

    /// Error currently shown, if any
    pub fn current_error(&self) -> Option<&str> {
        self.errors.front().map(String::as_str)
    }

    /// Errors still waiting behind the one on screen
    pub fn queued_errors(&self) -> usize {
        self.errors.len().saturating_sub(1)
    }

    pub fn dismiss_error(&mut self) {
        self.errors.pop_front();
    }

    /// Move selection down
    pub fn move_selection_down(&mut self, max: usize) {
        if max > 0 && self.selected_index < max - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up
    pub fn move_selection_up(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Keep the selection inside a list that may have shrunk
    pub fn clamp_selection(&mut self, len: usize) {
        if len == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }
    }

    /// Reset selection
    pub fn reset_selection(&mut self) {
        self.selected_index = 0;
        self.scroll_offset = 0;
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(1);
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    /// Scroll down a page (10 lines)
    pub fn scroll_down_page(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(10);
    }

    /// Scroll up a page (10 lines)
    pub fn scroll_up_page(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(10);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::forms::LoginField;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_navigation_cancels_previous_scope() {
        let mut state = AppState::default();
        let first = state.scope().clone();
        state.navigate(View::Registration, ViewParams::default());
        assert!(first.is_cancelled());
        assert!(!state.scope().is_cancelled());

        let second = state.scope().clone();
        assert!(state.go_back());
        assert!(second.is_cancelled());
        assert_eq!(state.current_view, View::Login);
    }

    #[test]
    fn test_list_filter_cleared_between_views() {
        let mut state = AppState::default();
        state.reset_to(View::Home);
        state.navigate(View::MyApplications, ViewParams::default());
        state.list_filter.query.push_str("map");
        state.navigate(View::ApplicationDetail, ViewParams::application(1));
        state.go_back();
        assert!(!state.list_filter.is_active());
    }

    #[test]
    fn test_go_back_without_history() {
        let mut state = AppState::default();
        assert!(!state.go_back());
        assert_eq!(state.current_view, View::Login);
    }

    #[test]
    fn test_params_restored_on_back() {
        let mut state = AppState::default();
        state.reset_to(View::Home);
        state.navigate(View::Coordination, ViewParams::default());
        state.navigate(View::CoordinationDetail, ViewParams::application(12));
        assert_eq!(state.view_params.application_id, Some(12));
        state.go_back();
        assert_eq!(state.current_view, View::Coordination);
        assert_eq!(state.view_params.application_id, None);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut state = AppState::default();
        state.navigate(View::Registration, ViewParams::default());
        state.reset_to(View::Home);
        assert!(state.view_history.is_empty());
        assert!(!state.go_back());
    }

    #[test]
    fn test_entering_form_view_remounts_form() {
        let mut state = AppState::default();
        state.login_form.set_value(LoginField::Email, "someone@example.com");
        state.navigate(View::Registration, ViewParams::default());
        state.go_back();
        assert_eq!(state.login_form.text(LoginField::Email), "");
    }

    #[test]
    fn test_wizard_sized_per_view() {
        let mut state = AppState::new(StepGating::Strict);
        state.reset_to(View::Home);
        state.navigate(View::NewApplication, ViewParams::default());
        assert_eq!(state.wizard.total_steps(), APPLICATION_STEPS.len());
        assert_eq!(state.wizard.gating(), StepGating::Strict);
    }

    #[test]
    fn test_error_queue_order_and_dedup() {
        let mut state = AppState::default();
        state.push_error("first".into());
        state.push_error("first".into());
        state.push_error("second".into());
        assert_eq!(state.current_error(), Some("first"));
        assert_eq!(state.queued_errors(), 1);
        state.dismiss_error();
        assert_eq!(state.current_error(), Some("second"));
        state.dismiss_error();
        assert_eq!(state.current_error(), None);
    }

    #[test]
    fn test_clamp_selection() {
        let mut state = AppState::default();
        state.selected_index = 5;
        state.clamp_selection(3);
        assert_eq!(state.selected_index, 2);
        state.clamp_selection(0);
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn test_home_menu_by_role() {
        assert!(home_menu(Some("admin")).contains(&MenuEntry::Control));
        assert_eq!(
            home_menu(Some("mentor")),
            &[
                MenuEntry::NewApplication,
                MenuEntry::MyApplications,
                MenuEntry::Logout
            ]
        );
        for role in [Some("student"), Some("expert"), None] {
            let menu = home_menu(role);
            assert!(menu.contains(&MenuEntry::Coordination));
            assert!(!menu.contains(&MenuEntry::Control));
            assert_eq!(menu.last(), Some(&MenuEntry::Logout));
        }
    }

    #[test]
    fn test_menu_targets() {
        assert_eq!(MenuEntry::Control.target(), Some(View::Control));
        assert_eq!(MenuEntry::Logout.target(), None);
        assert!(View::PublicApplication.is_public());
        assert!(!View::Home.is_public());
    }
}
