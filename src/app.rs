//! Application state and core logic

use crate::api::ApiClientTrait;
use crate::config::ClientConfig;
use crate::platform;
use crate::state::forms::{
    approve_user_form, create_application_request, cycle_choice, edit_application_request,
    edit_form_from, filter_items, login_request, public_application_request, reason_form,
    registration_request, toggle_choice, ApplicationField, ApproveUserField, Choice, CommentField,
    FieldFocus, FieldValue, FormFields, FormState, LoginField, PublicApplicationField, ReasonField,
    RegistrationField, SelectOption, APPLICATION_REQUIRED, APPLICATION_STEPS,
    APPROVE_USER_REQUIRED, EDIT_FIELDS, LOGIN_REQUIRED, PUBLIC_APPLICATION_REQUIRED,
    PUBLIC_APPLICATION_STEPS, REGISTRATION_REQUIRED,
};
use crate::state::models::{
    ApplicationDetail, ApplicationItem, ApproveUserRequest, CreateComment, FieldRef,
    RejectUserRequest, RequestStatus, COMMENTABLE_FIELDS, PROJECT_LEVELS,
};
use crate::state::wizard::{StepGating, Wizard};
use crate::state::{home_menu, AppState, DetailMode, MenuEntry, View, ViewParams};
use crate::store::{
    Action, ActionKind, ApplicationAction, Completion, ControlApproveAction, CoordinationAction,
    Decision, Dispatcher, Phase, Request, Store, UserAction,
};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Window in which a second Ctrl+C quits
const DOUBLE_TAP_WINDOW: Duration = Duration::from_millis(800);

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Domain slices fed by the dispatcher
    pub store: Store,
    dispatcher: Dispatcher,
    completions: UnboundedReceiver<Completion>,
    /// Scope for requests that outlive any single view
    session: CancellationToken,
    /// Whether the app should quit
    quit: bool,
    /// Feedback line shown in the status bar
    pub status_message: Option<String>,
    /// Timestamp of last Ctrl+C press for double-tap quit
    pub last_ctrl_c: Option<Instant>,
}

impl App {
    pub fn new(api: Arc<dyn ApiClientTrait>, config: &ClientConfig) -> Self {
        let (dispatcher, completions) = Dispatcher::new(api);
        Self {
            state: AppState::new(StepGating::from_strict(config.strict_wizard)),
            store: Store::default(),
            dispatcher,
            completions,
            session: CancellationToken::new(),
            quit: false,
            status_message: None,
            last_ctrl_c: None,
        }
    }

    /// Resume a stored session, if any
    pub fn start(&mut self) {
        self.session_request(Request::CheckAuth);
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    /// Home menu entries for the signed-in user's role
    pub fn home_menu(&self) -> &'static [MenuEntry] {
        home_menu(self.store.user.user.as_ref().map(|u| u.role.as_str()))
    }

    /// Application detail loaded for the current view
    pub fn current_detail(&self) -> Option<&ApplicationDetail> {
        let id = self.state.view_params.application_id?;
        self.store
            .coordination
            .detail
            .as_ref()
            .filter(|d| d.application.id == id)
    }

    /// Run a request scoped to the current view
    fn request(&mut self, request: Request) {
        self.dispatcher
            .dispatch(&mut self.store, request, self.state.scope());
    }

    /// Run a request that outlives view changes; used where the API client
    /// persists the access token, so the store must see the outcome too
    fn session_request(&mut self, request: Request) {
        self.dispatcher
            .dispatch(&mut self.store, request, &self.session);
    }

    /// Settle every completion that has arrived
    pub fn drain_completions(&mut self) {
        while let Ok(completion) = self.completions.try_recv() {
            self.on_completion(completion);
        }
    }

    fn on_completion(&mut self, completion: Completion) {
        let kind = completion.kind;
        if let Some(action) = self.dispatcher.settle(&mut self.store, completion) {
            self.after_action(kind, action);
        }
    }

    /// React to a settled action: surface failures, navigate on success
    fn after_action(&mut self, kind: ActionKind, action: Action) {
        if action.is_rejected() {
            let message = self
                .store
                .error_for(kind)
                .unwrap_or("Something went wrong")
                .to_string();
            self.push_error(message);
            return;
        }

        match action {
            Action::User(UserAction::Login(Phase::Fulfilled(_))) => {
                info!("Signed in");
                if self.store.user.user.is_none() {
                    self.session_request(Request::CheckAuth);
                }
                self.state.reset_to(View::Home);
            }
            Action::User(UserAction::CheckAuth(Phase::Fulfilled(Some(_)))) => {
                if self.state.current_view == View::Login {
                    self.state.reset_to(View::Home);
                }
            }
            Action::User(UserAction::Register(Phase::Fulfilled(_))) => {
                self.status_message =
                    Some("Registration request sent, wait for an administrator".to_string());
                if self.state.current_view == View::Registration && !self.state.go_back() {
                    self.state.reset_to(View::Login);
                }
            }
            Action::User(UserAction::Logout(Phase::Fulfilled(()))) => {
                info!("Signed out");
                self.state.reset_to(View::Login);
                self.status_message = Some("Signed out".to_string());
            }
            Action::Application(ApplicationAction::CreateMain(Phase::Fulfilled(created))) => {
                self.status_message = Some(format!("Application #{} submitted", created.id));
                self.state.go_back();
                if self.state.current_view == View::MyApplications {
                    self.load_view();
                } else {
                    self.open(View::MyApplications, ViewParams::default());
                }
            }
            Action::Application(ApplicationAction::CreatePublic(Phase::Fulfilled(_))) => {
                self.status_message = Some("Application submitted, thank you".to_string());
                self.back();
            }
            Action::Application(ApplicationAction::FetchMine(Phase::Fulfilled(_))) => {
                let visible = self.visible_applications().len();
                self.state.clamp_selection(visible);
            }
            Action::Coordination(CoordinationAction::FetchApplications(Phase::Fulfilled(
                items,
            ))) => {
                self.state.clamp_selection(items.len());
            }
            Action::Coordination(CoordinationAction::AddComment(Phase::Fulfilled(_))) => {
                self.state.set_detail_mode(DetailMode::Browse);
                self.status_message = Some("Comment added".to_string());
            }
            Action::Coordination(CoordinationAction::Edit(Phase::Fulfilled(_))) => {
                self.state.set_detail_mode(DetailMode::Browse);
                self.status_message = Some("Application updated".to_string());
            }
            Action::Coordination(CoordinationAction::Decide(decision, Phase::Fulfilled(response))) => {
                let message = if response.message.is_empty() {
                    format!("{}: done", decision.label())
                } else {
                    response.message
                };
                self.status_message = Some(message);
                self.back();
            }
            Action::ControlApprove(ControlApproveAction::FetchUsers(Phase::Fulfilled(users))) => {
                self.state.clamp_selection(users.len());
            }
            Action::ControlApprove(ControlApproveAction::Approve(Phase::Fulfilled(user))) => {
                self.status_message = Some(format!("Approved {}", user.full_name()));
            }
            Action::ControlApprove(ControlApproveAction::Reject(Phase::Fulfilled(user))) => {
                self.status_message = Some(format!("Rejected {}", user.full_name()));
            }
            _ => {}
        }
    }

    /// Navigate to a view and load its data
    fn open(&mut self, view: View, params: ViewParams) {
        self.state.navigate(view, params);
        self.load_view();
    }

    /// Return to the previous view and refresh it
    fn back(&mut self) {
        if self.state.go_back() {
            self.load_view();
        }
    }

    /// Fetch whatever the current view displays
    fn load_view(&mut self) {
        debug!("Loading {:?}", self.state.current_view);
        match self.state.current_view {
            View::PublicApplication | View::NewApplication => self.request(Request::Institutes),
            View::MyApplications => self.request(Request::MyApplications),
            View::ApplicationDetail | View::CoordinationDetail => {
                if let Some(id) = self.state.view_params.application_id {
                    self.request(Request::ApplicationDetail(id));
                }
                self.sync_current_field();
            }
            View::Coordination => self.request(Request::CoordinationApplications),
            View::Control => {
                self.close_modals();
                self.request(Request::RegistrationRequests);
                self.request(Request::Roles);
                self.request(Request::Departments);
            }
            View::Login | View::Registration | View::Home => {}
        }
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        // Double Ctrl+C quits from anywhere
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            let now = Instant::now();
            if self
                .last_ctrl_c
                .is_some_and(|t| now.duration_since(t) < DOUBLE_TAP_WINDOW)
            {
                self.quit = true;
            } else {
                self.last_ctrl_c = Some(now);
                self.status_message = Some("Press Ctrl+C again to quit".to_string());
            }
            return;
        }

        // Error dialog is modal
        if self.state.current_error().is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return;
        }

        // Clear any status messages on key press
        self.status_message = None;

        match self.state.current_view {
            View::Login => self.handle_login_key(key),
            View::Registration => self.handle_registration_key(key),
            View::PublicApplication => self.handle_public_application_key(key),
            View::Home => self.handle_home_key(key),
            View::MyApplications => self.handle_my_applications_key(key),
            View::ApplicationDetail => self.handle_application_detail_key(key),
            View::NewApplication => self.handle_new_application_key(key),
            View::Coordination => self.handle_coordination_key(key),
            View::CoordinationDetail => self.handle_coordination_detail_key(key),
            View::Control => self.handle_control_key(key),
        }
    }

    // Sign in and registration

    fn handle_login_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('r') => {
                    self.open(View::Registration, ViewParams::default());
                    return;
                }
                KeyCode::Char('p') => {
                    self.open(View::PublicApplication, ViewParams::default());
                    return;
                }
                _ => {}
            }
        }

        let input = edit_form(
            &mut self.state.login_form,
            LoginField::ALL,
            &mut self.state.focus,
            &mut self.state.option_cursor,
            no_options,
            key,
        );
        if input == FormInput::Submit {
            self.submit_login();
        }
    }

    fn submit_login(&mut self) {
        if self.store.user.is_loading
            || !ready_to_submit(&mut self.state.login_form, LOGIN_REQUIRED)
        {
            return;
        }
        let body = login_request(&self.state.login_form);
        self.session_request(Request::Login(body));
    }

    fn handle_registration_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.back();
            return;
        }

        let input = edit_form(
            &mut self.state.registration_form,
            RegistrationField::ALL,
            &mut self.state.focus,
            &mut self.state.option_cursor,
            no_options,
            key,
        );
        if input == FormInput::Submit {
            self.submit_registration();
        }
    }

    fn submit_registration(&mut self) {
        if self.store.user.is_loading
            || !ready_to_submit(&mut self.state.registration_form, REGISTRATION_REQUIRED)
        {
            return;
        }
        let body = registration_request(&self.state.registration_form);
        self.session_request(Request::Register(body));
    }

    // Application wizards

    /// Institutes as select options
    pub fn institute_choices(&self) -> Vec<Choice> {
        self.store
            .catalog
            .institutes
            .iter()
            .map(SelectOption::to_choice)
            .collect()
    }

    fn handle_public_application_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.back();
            return;
        }

        let institutes = self.institute_choices();
        let input = wizard_input(
            &mut self.state.public_form,
            PUBLIC_APPLICATION_STEPS,
            PUBLIC_APPLICATION_REQUIRED,
            &mut self.state.wizard,
            &mut self.state.focus,
            &mut self.state.option_cursor,
            |field| match field {
                PublicApplicationField::TargetInstitutes => institutes.clone(),
                _ => Vec::new(),
            },
            key,
        );
        if input == FormInput::Submit {
            self.submit_public_application();
        }
    }

    fn submit_public_application(&mut self) {
        if self.store.application.is_loading {
            return;
        }
        let state = &mut self.state;
        if !ready_to_submit(&mut state.public_form, PUBLIC_APPLICATION_REQUIRED) {
            show_incomplete_step(
                &state.public_form,
                PUBLIC_APPLICATION_STEPS,
                PUBLIC_APPLICATION_REQUIRED,
                &mut state.wizard,
                &mut state.focus,
            );
            return;
        }
        let body = public_application_request(&self.state.public_form);
        self.request(Request::CreatePublicApplication(body));
    }

    fn handle_new_application_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.back();
            return;
        }

        let institutes = self.institute_choices();
        let input = wizard_input(
            &mut self.state.application_form,
            APPLICATION_STEPS,
            APPLICATION_REQUIRED,
            &mut self.state.wizard,
            &mut self.state.focus,
            &mut self.state.option_cursor,
            |field| application_options(field, &institutes),
            key,
        );
        if input == FormInput::Submit {
            self.submit_application();
        }
    }

    fn submit_application(&mut self) {
        if self.store.application.is_loading {
            return;
        }
        let state = &mut self.state;
        if !ready_to_submit(&mut state.application_form, APPLICATION_REQUIRED) {
            show_incomplete_step(
                &state.application_form,
                APPLICATION_STEPS,
                APPLICATION_REQUIRED,
                &mut state.wizard,
                &mut state.focus,
            );
            return;
        }
        let Some(author) = self.store.user.user.as_ref() else {
            self.push_error("Sign in to submit an application");
            return;
        };
        let body = create_application_request(&self.state.application_form, author);
        self.request(Request::CreateMainApplication(body));
    }

    // Menus and lists

    fn handle_home_key(&mut self, key: KeyEvent) {
        let menu = self.home_menu();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.state.move_selection_down(menu.len()),
            KeyCode::Up | KeyCode::Char('k') => self.state.move_selection_up(),
            KeyCode::Enter => {
                if let Some(entry) = menu.get(self.state.selected_index) {
                    match entry.target() {
                        Some(view) => self.open(view, ViewParams::default()),
                        None => self.logout(),
                    }
                }
            }
            KeyCode::Char('q') => self.quit = true,
            _ => {}
        }
    }

    fn logout(&mut self) {
        self.session_request(Request::Logout);
    }

    /// The user's applications that pass the title filter
    pub fn visible_applications(&self) -> Vec<&ApplicationItem> {
        filter_items(
            &self.store.application.applications,
            &self.state.list_filter.query,
        )
    }

    fn handle_my_applications_key(&mut self, key: KeyEvent) {
        if self.state.list_filter.editing {
            self.handle_list_filter_key(key);
            return;
        }

        let count = self.visible_applications().len();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.state.move_selection_down(count),
            KeyCode::Up | KeyCode::Char('k') => self.state.move_selection_up(),
            KeyCode::Enter => {
                let selected = self
                    .visible_applications()
                    .get(self.state.selected_index)
                    .map(|item| item.id);
                if let Some(id) = selected {
                    self.open(View::ApplicationDetail, ViewParams::application(id));
                }
            }
            KeyCode::Char('/') => self.state.list_filter.editing = true,
            KeyCode::Char('n') => self.open(View::NewApplication, ViewParams::default()),
            KeyCode::Char('r') => self.load_view(),
            KeyCode::Esc if self.state.list_filter.is_active() => {
                self.state.list_filter.query.clear();
                self.state.reset_selection();
            }
            KeyCode::Esc => self.back(),
            _ => {}
        }
    }

    fn handle_list_filter_key(&mut self, key: KeyEvent) {
        let filter = &mut self.state.list_filter;
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                filter.query.push(c);
            }
            KeyCode::Backspace => {
                filter.query.pop();
            }
            KeyCode::Enter => {
                filter.editing = false;
                return;
            }
            KeyCode::Esc => {
                filter.query.clear();
                filter.editing = false;
            }
            _ => return,
        }
        self.state.reset_selection();
    }

    fn handle_application_detail_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.state.scroll_down(),
            KeyCode::Up | KeyCode::Char('k') => self.state.scroll_up(),
            KeyCode::PageDown | KeyCode::Char('d') => self.state.scroll_down_page(),
            KeyCode::PageUp | KeyCode::Char('u') => self.state.scroll_up_page(),
            KeyCode::Char('y') => self.copy_application(),
            KeyCode::Char('r') => self.load_view(),
            KeyCode::Esc => self.back(),
            _ => {}
        }
    }

    fn handle_coordination_key(&mut self, key: KeyEvent) {
        let count = self.store.coordination.applications.len();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.state.move_selection_down(count),
            KeyCode::Up | KeyCode::Char('k') => self.state.move_selection_up(),
            KeyCode::Enter => {
                let selected = self
                    .store
                    .coordination
                    .applications
                    .get(self.state.selected_index)
                    .map(|item| item.id);
                if let Some(id) = selected {
                    self.open(View::CoordinationDetail, ViewParams::application(id));
                }
            }
            KeyCode::Char('r') => self.load_view(),
            KeyCode::Esc => self.back(),
            _ => {}
        }
    }

    fn copy_application(&mut self) {
        let text = match self.current_detail() {
            Some(detail) => detail.application.to_plain_text(),
            None => {
                self.status_message = Some("Nothing to copy yet".to_string());
                return;
            }
        };
        match copy_to_clipboard(&text) {
            Ok(()) => {
                self.status_message = Some(format!("Copied {} chars", text.chars().count()));
            }
            Err(e) => self.push_error(format!("Failed to copy: {}", e)),
        }
    }

    // Coordination detail

    fn handle_coordination_detail_key(&mut self, key: KeyEvent) {
        match self.state.detail_mode {
            DetailMode::Browse => self.handle_detail_browse_key(key),
            DetailMode::Comment => self.handle_comment_key(key),
            DetailMode::Edit => self.handle_edit_key(key),
            DetailMode::Reject => self.handle_reject_key(key),
        }
    }

    fn handle_detail_browse_key(&mut self, key: KeyEvent) {
        if let Some(decision) = self.state.pending_decision {
            match key.code {
                KeyCode::Enter | KeyCode::Char('y') => {
                    self.state.pending_decision = None;
                    self.decide(decision);
                }
                KeyCode::Esc | KeyCode::Char('n') => self.state.pending_decision = None,
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.state
                    .move_selection_down(COMMENTABLE_FIELDS.len() + 1);
                self.sync_current_field();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.state.move_selection_up();
                self.sync_current_field();
            }
            KeyCode::PageDown => self.state.scroll_down_page(),
            KeyCode::PageUp => self.state.scroll_up_page(),
            KeyCode::Char('J') => self.state.scroll_down(),
            KeyCode::Char('K') => self.state.scroll_up(),
            KeyCode::Char('c') => self.start_comment(),
            KeyCode::Char('e') => self.start_edit(),
            KeyCode::Char('a') => self.confirm_decision(Decision::Approve),
            KeyCode::Char('w') => self.confirm_decision(Decision::RequestChanges),
            KeyCode::Char('x') => self.confirm_decision(Decision::Reject),
            KeyCode::Char('y') => self.copy_application(),
            KeyCode::Char('r') => self.load_view(),
            KeyCode::Esc => self.back(),
            _ => {}
        }
    }

    /// Mirror the highlighted row into the slice; row 0 shows all comments
    fn sync_current_field(&mut self) {
        let field = self
            .state
            .selected_index
            .checked_sub(1)
            .and_then(|i| COMMENTABLE_FIELDS.get(i))
            .map(|(code, name)| FieldRef::new(code, name));
        self.store
            .apply(Action::Coordination(CoordinationAction::SetCurrentField(field)));
        self.state.scroll_offset = 0;
    }

    fn start_comment(&mut self) {
        if self.store.coordination.current_field.is_none() {
            self.push_error("Select a field to comment on");
            return;
        }
        self.state.set_detail_mode(DetailMode::Comment);
    }

    fn start_edit(&mut self) {
        match self.current_detail().map(edit_form_from) {
            Some(form) => {
                self.state.edit_form = form;
                self.state.set_detail_mode(DetailMode::Edit);
            }
            None => self.status_message = Some("Application is still loading".to_string()),
        }
    }

    fn confirm_decision(&mut self, decision: Decision) {
        if self.store.coordination.is_loading_decision {
            return;
        }
        let available = self
            .current_detail()
            .is_some_and(|d| d.has_action(decision.action_name()));
        if !available {
            self.status_message = Some(format!(
                "{} is not available for this application",
                decision.label()
            ));
            return;
        }
        match decision {
            Decision::Reject => self.state.set_detail_mode(DetailMode::Reject),
            Decision::Approve | Decision::RequestChanges => {
                self.state.pending_decision = Some(decision)
            }
        }
    }

    fn decide(&mut self, decision: Decision) {
        let Some(id) = self.state.view_params.application_id else {
            return;
        };
        match decision {
            Decision::Approve => self.request(Request::ApproveApplication(id)),
            Decision::RequestChanges => self.request(Request::RequestChanges(id)),
            Decision::Reject => self.state.set_detail_mode(DetailMode::Reject),
        }
    }

    fn handle_comment_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.state.set_detail_mode(DetailMode::Browse);
            return;
        }

        let input = edit_form(
            &mut self.state.comment_form,
            CommentField::ALL,
            &mut self.state.focus,
            &mut self.state.option_cursor,
            no_options,
            key,
        );
        if input == FormInput::Submit {
            self.submit_comment();
        }
    }

    fn submit_comment(&mut self) {
        if self.store.coordination.is_loading_comment
            || !ready_to_submit(&mut self.state.comment_form, CommentField::ALL)
        {
            return;
        }
        let field = self
            .store
            .coordination
            .current_field
            .as_ref()
            .map(|f| f.code.clone());
        let (Some(application_id), Some(field)) = (self.state.view_params.application_id, field)
        else {
            self.push_error("Select a field to comment on");
            return;
        };
        let body = CreateComment {
            application_id,
            field,
            text: self
                .state
                .comment_form
                .text(CommentField::Text)
                .trim()
                .to_string(),
        };
        self.request(Request::AddComment(body));
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.state.set_detail_mode(DetailMode::Browse);
            return;
        }

        let institutes = self.institute_choices();
        let input = edit_form(
            &mut self.state.edit_form,
            EDIT_FIELDS,
            &mut self.state.focus,
            &mut self.state.option_cursor,
            |field| application_options(field, &institutes),
            key,
        );
        if input == FormInput::Submit {
            self.submit_edit();
        }
    }

    fn submit_edit(&mut self) {
        let required: Vec<ApplicationField> = APPLICATION_REQUIRED
            .iter()
            .copied()
            .filter(|f| EDIT_FIELDS.contains(f))
            .collect();
        if self.store.coordination.is_loading_decision
            || !ready_to_submit(&mut self.state.edit_form, &required)
        {
            return;
        }
        let Some(id) = self.state.view_params.application_id else {
            return;
        };
        let payload = edit_application_request(&self.state.edit_form);
        self.request(Request::EditApplication { id, payload });
    }

    fn handle_reject_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.state.set_detail_mode(DetailMode::Browse);
            return;
        }

        let input = edit_form(
            &mut self.state.reason_form,
            ReasonField::ALL,
            &mut self.state.focus,
            &mut self.state.option_cursor,
            no_options,
            key,
        );
        if input == FormInput::Submit {
            self.submit_application_rejection();
        }
    }

    fn submit_application_rejection(&mut self) {
        if self.store.coordination.is_loading_decision
            || !ready_to_submit(&mut self.state.reason_form, ReasonField::ALL)
        {
            return;
        }
        let Some(id) = self.state.view_params.application_id else {
            return;
        };
        let reason = self
            .state
            .reason_form
            .text(ReasonField::Reason)
            .trim()
            .to_string();
        self.request(Request::RejectApplication { id, reason });
    }

    // Registration requests

    fn handle_control_key(&mut self, key: KeyEvent) {
        let control = &self.store.control;
        if control.is_open_approve_modal {
            self.handle_approve_modal_key(key);
            return;
        }
        if control.is_open_reject_modal {
            self.handle_reject_modal_key(key);
            return;
        }
        if control.is_open_detail_modal {
            self.handle_request_detail_key(key);
            return;
        }

        let count = control.users.len();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.state.move_selection_down(count),
            KeyCode::Up | KeyCode::Char('k') => self.state.move_selection_up(),
            KeyCode::Enter => {
                if self.select_request() {
                    self.control(ControlApproveAction::OpenDetailModal);
                }
            }
            KeyCode::Char('a') => self.open_approve_modal(),
            KeyCode::Char('x') => self.open_reject_modal(),
            KeyCode::Char('r') => self.load_view(),
            KeyCode::Esc => self.back(),
            _ => {}
        }
    }

    fn control(&mut self, action: ControlApproveAction) {
        self.store.apply(Action::ControlApprove(action));
    }

    /// Make the highlighted registration request current
    fn select_request(&mut self) -> bool {
        let selected = self
            .store
            .control
            .users
            .get(self.state.selected_index)
            .cloned();
        match selected {
            Some(user) => {
                self.control(ControlApproveAction::SetCurrentUser(user));
                true
            }
            None => false,
        }
    }

    /// Only submitted requests can still be decided
    fn current_request_is_open(&mut self) -> bool {
        let open = self
            .store
            .control
            .current_user
            .as_ref()
            .is_some_and(|u| u.status == RequestStatus::Submitted);
        if !open {
            self.status_message = Some("This request has already been processed".to_string());
        }
        open
    }

    fn open_approve_modal(&mut self) {
        if !self.select_request() || !self.current_request_is_open() {
            return;
        }
        self.state.approve_form = approve_user_form();
        self.state.focus.reset();
        self.control(ControlApproveAction::CloseModals);
        self.control(ControlApproveAction::OpenApproveModal);
    }

    fn open_reject_modal(&mut self) {
        if !self.select_request() || !self.current_request_is_open() {
            return;
        }
        self.state.reason_form = reason_form();
        self.state.focus.reset();
        self.control(ControlApproveAction::CloseModals);
        self.control(ControlApproveAction::OpenRejectModal);
    }

    fn close_modals(&mut self) {
        self.control(ControlApproveAction::CloseModals);
        self.control(ControlApproveAction::ClearCurrentUser);
    }

    fn handle_request_detail_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('a') => self.open_approve_modal(),
            KeyCode::Char('x') => self.open_reject_modal(),
            KeyCode::Esc | KeyCode::Enter => self.close_modals(),
            _ => {}
        }
    }

    fn handle_approve_modal_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.close_modals();
            return;
        }

        let catalog = &self.store.catalog;
        let roles: Vec<Choice> = catalog.roles.iter().map(SelectOption::to_choice).collect();
        let departments: Vec<Choice> = catalog
            .departments
            .iter()
            .map(SelectOption::to_choice)
            .collect();
        let input = edit_form(
            &mut self.state.approve_form,
            ApproveUserField::ALL,
            &mut self.state.focus,
            &mut self.state.option_cursor,
            |field| match field {
                ApproveUserField::Role => roles.clone(),
                ApproveUserField::Department => departments.clone(),
            },
            key,
        );
        if input == FormInput::Submit {
            self.submit_approval();
        }
    }

    fn submit_approval(&mut self) {
        if self.store.control.is_loading_request {
            return;
        }
        if !ready_to_submit(&mut self.state.approve_form, APPROVE_USER_REQUIRED) {
            self.status_message = Some("Choose a role and a department".to_string());
            return;
        }
        let Some(user_id) = self.store.control.current_user.as_ref().map(|u| u.id) else {
            self.push_error("User not found");
            return;
        };
        let form = &self.state.approve_form;
        let role = form
            .value(ApproveUserField::Role)
            .and_then(FieldValue::as_choice)
            .map(|c| c.value.clone());
        let department = form
            .value(ApproveUserField::Department)
            .and_then(FieldValue::as_choice)
            .and_then(|c| c.value.parse::<u64>().ok());
        match (role, department) {
            (Some(role_id), Some(department_id)) => {
                self.request(Request::ApproveRegistration(ApproveUserRequest {
                    user_id,
                    role_id,
                    department_id,
                }))
            }
            _ => self.push_error("Invalid role or department"),
        }
    }

    fn handle_reject_modal_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Esc {
            self.close_modals();
            return;
        }

        let input = edit_form(
            &mut self.state.reason_form,
            ReasonField::ALL,
            &mut self.state.focus,
            &mut self.state.option_cursor,
            no_options,
            key,
        );
        if input == FormInput::Submit {
            self.submit_registration_rejection();
        }
    }

    fn submit_registration_rejection(&mut self) {
        if self.store.control.is_loading_request
            || !ready_to_submit(&mut self.state.reason_form, ReasonField::ALL)
        {
            return;
        }
        let Some(user_id) = self.store.control.current_user.as_ref().map(|u| u.id) else {
            self.push_error("User not found");
            return;
        };
        let reason = self
            .state
            .reason_form
            .text(ReasonField::Reason)
            .trim()
            .to_string();
        self.request(Request::RejectRegistration(RejectUserRequest { user_id, reason }));
    }
}

/// What a key press did to a form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormInput {
    Edited,
    Submit,
    Ignored,
}

fn no_options<F>(_field: F) -> Vec<Choice> {
    Vec::new()
}

/// Options of the select fields shared by the create and edit forms
pub(crate) fn application_options(field: ApplicationField, institutes: &[Choice]) -> Vec<Choice> {
    match field {
        ApplicationField::ProjectLevel => PROJECT_LEVELS.iter().map(SelectOption::to_choice).collect(),
        ApplicationField::TargetInstitutes => institutes.to_vec(),
        _ => Vec::new(),
    }
}

/// Apply an editing key to the focused field among `fields`.
///
/// Text fields take characters; Enter adds a newline in multiline fields and
/// submits elsewhere. Flags toggle with Space, single choices cycle with
/// Left/Right, multi-selects move a cursor with Left/Right and toggle with Space.
fn edit_form<F: FormFields>(
    form: &mut FormState<F>,
    fields: &[F],
    focus: &mut FieldFocus,
    option_cursor: &mut usize,
    options: impl Fn(F) -> Vec<Choice>,
    key: KeyEvent,
) -> FormInput {
    if platform::is_submit(&key) {
        return FormInput::Submit;
    }
    match key.code {
        KeyCode::Tab | KeyCode::Down => {
            focus.next(fields.len());
            *option_cursor = 0;
            return FormInput::Edited;
        }
        KeyCode::BackTab | KeyCode::Up => {
            focus.prev(fields.len());
            *option_cursor = 0;
            return FormInput::Edited;
        }
        _ => {}
    }

    let Some(field) = focus.current(fields) else {
        return FormInput::Ignored;
    };
    let typing = !key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
    let value = form
        .value(field)
        .cloned()
        .unwrap_or_else(|| field.initial());

    match (value, key.code) {
        (FieldValue::Text(_), KeyCode::Enter) if field.is_multiline() => {
            form.push_char(field, '\n');
            FormInput::Edited
        }
        (_, KeyCode::Enter) => FormInput::Submit,
        (FieldValue::Text(_), KeyCode::Char(c)) if typing => {
            form.push_char(field, c);
            FormInput::Edited
        }
        (FieldValue::Text(_), KeyCode::Backspace) => {
            form.pop_char(field);
            FormInput::Edited
        }
        (FieldValue::Flag(_), KeyCode::Char(' ')) => {
            form.set_checked(field);
            FormInput::Edited
        }
        (FieldValue::Choice(current), KeyCode::Left | KeyCode::Right) => {
            let forward = key.code == KeyCode::Right;
            let next = cycle_choice(current.as_ref(), &options(field), forward);
            form.set_selected(field, FieldValue::Choice(next));
            FormInput::Edited
        }
        (FieldValue::Choices(_), KeyCode::Left) => {
            *option_cursor = option_cursor.saturating_sub(1);
            FormInput::Edited
        }
        (FieldValue::Choices(_), KeyCode::Right) => {
            if *option_cursor + 1 < options(field).len() {
                *option_cursor += 1;
            }
            FormInput::Edited
        }
        (FieldValue::Choices(selected), KeyCode::Char(' ')) => {
            if let Some(choice) = options(field).get(*option_cursor) {
                form.set_selected(field, FieldValue::Choices(toggle_choice(&selected, choice)));
            }
            FormInput::Edited
        }
        _ => FormInput::Ignored,
    }
}

/// Apply a key to a wizard form; PageDown/PageUp move between steps and
/// submitting before the last step advances instead.
#[allow(clippy::too_many_arguments)]
fn wizard_input<F: FormFields>(
    form: &mut FormState<F>,
    steps: &[(&str, &[F])],
    required: &[F],
    wizard: &mut Wizard,
    focus: &mut FieldFocus,
    option_cursor: &mut usize,
    options: impl Fn(F) -> Vec<Choice>,
    key: KeyEvent,
) -> FormInput {
    let step_fields: &[F] = steps
        .get(wizard.active_step() - 1)
        .map(|(_, fields)| *fields)
        .unwrap_or(&[]);

    match key.code {
        KeyCode::PageDown => {
            advance_step(form, step_fields, required, wizard, focus);
            *option_cursor = 0;
            return FormInput::Edited;
        }
        KeyCode::PageUp => {
            wizard.previous();
            focus.reset();
            *option_cursor = 0;
            return FormInput::Edited;
        }
        _ => {}
    }

    match edit_form(form, step_fields, focus, option_cursor, options, key) {
        FormInput::Submit if !wizard.is_last() => {
            advance_step(form, step_fields, required, wizard, focus);
            *option_cursor = 0;
            FormInput::Edited
        }
        other => other,
    }
}

/// Move to the next step if the gating allows; otherwise show why not
fn advance_step<F: FormFields>(
    form: &mut FormState<F>,
    step_fields: &[F],
    required: &[F],
    wizard: &mut Wizard,
    focus: &mut FieldFocus,
) {
    let valid = form.is_subset_valid(step_fields, required);
    if wizard.try_next(valid) {
        focus.reset();
    } else if !valid {
        form.validate_fields(step_fields);
    }
}

/// Jump to the first step still blocking submission
fn show_incomplete_step<F: FormFields>(
    form: &FormState<F>,
    steps: &[(&str, &[F])],
    required: &[F],
    wizard: &mut Wizard,
    focus: &mut FieldFocus,
) {
    if let Some(index) = steps
        .iter()
        .position(|(_, fields)| !form.is_subset_valid(fields, required))
    {
        wizard.go_to(index + 1);
        focus.reset();
    }
}

/// Run the submission gate, surfacing inline errors when it blocks
fn ready_to_submit<F: FormFields>(form: &mut FormState<F>, required: &[F]) -> bool {
    if form.blocks_submit(required) {
        form.validate_fields(F::ALL);
        false
    } else {
        true
    }
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    use arboard::Clipboard;
    let mut clipboard = Clipboard::new()?;
    clipboard.set_text(text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, MockApiClientTrait};
    use crate::state::models::{
        AppActionResponse, ApplicationItem, ApproveUser, AuthResponse, AvailableAction,
        Department, Role, User,
    };
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tokio::time::timeout;

    fn app_with(mock: MockApiClientTrait) -> App {
        App::new(Arc::new(mock), &ClientConfig::default())
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn press_ctrl(app: &mut App, c: char) {
        app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL));
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    /// Wait for the next completion and settle it
    async fn settle_next(app: &mut App) {
        let received = timeout(Duration::from_secs(5), app.completions.recv()).await;
        let completion = tokio_test::assert_ok!(received).expect("completion channel closed");
        app.on_completion(completion);
    }

    fn detail(id: u64, actions: &[&str]) -> ApplicationDetail {
        let mut detail = ApplicationDetail {
            available_actions: actions
                .iter()
                .map(|a| AvailableAction {
                    action: a.to_string(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        };
        detail.application.id = id;
        detail
    }

    #[tokio::test]
    async fn test_login_navigates_home() {
        let mut mock = MockApiClientTrait::new();
        mock.expect_login()
            .withf(|req| req.email == "ivanov@example.com" && req.password == "secret")
            .times(1)
            .returning(|_| {
                Ok(AuthResponse {
                    access: "token".into(),
                    user: Some(User {
                        id: 1,
                        first_name: "Ivan".into(),
                        ..Default::default()
                    }),
                    ..Default::default()
                })
            });
        let mut app = app_with(mock);

        type_text(&mut app, "ivanov@example.com");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "secret");
        press(&mut app, KeyCode::Enter);
        assert!(app.store.user.is_loading);

        settle_next(&mut app).await;
        assert_eq!(app.state.current_view, View::Home);
        assert_eq!(app.store.user.user.as_ref().map(|u| u.id), Some(1));
        assert!(app.state.view_history.is_empty());
    }

    #[tokio::test]
    async fn test_login_gate_blocks_empty_form() {
        let mut app = app_with(MockApiClientTrait::new());
        type_text(&mut app, "not-an-email");
        press(&mut app, KeyCode::Enter);

        assert!(!app.store.user.is_loading);
        assert_eq!(
            app.state.login_form.error(LoginField::Email),
            Some("Invalid email address")
        );
        assert_eq!(
            app.state.login_form.error(LoginField::Password),
            Some("Enter your password")
        );
    }

    #[tokio::test]
    async fn test_rejected_login_shows_error_dialog() {
        let mut mock = MockApiClientTrait::new();
        mock.expect_login().returning(|_| {
            Err(ApiError::Status {
                status: 401,
                body: json!({"detail": "Invalid credentials"}),
            })
        });
        let mut app = app_with(mock);

        type_text(&mut app, "a@b.ru");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "wrong");
        press(&mut app, KeyCode::Enter);
        settle_next(&mut app).await;

        assert_eq!(app.state.current_view, View::Login);
        assert_eq!(app.state.current_error(), Some("Invalid credentials"));

        // Keys are swallowed while the dialog is open
        type_text(&mut app, "x");
        assert_eq!(app.state.login_form.text(LoginField::Password), "wrong");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state.current_error(), None);
    }

    #[tokio::test]
    async fn test_leaving_view_drops_its_completion() {
        let mut mock = MockApiClientTrait::new();
        mock.expect_coordination_applications().returning(|| {
            Ok(vec![ApplicationItem {
                id: 3,
                ..Default::default()
            }])
        });
        let mut app = app_with(mock);
        app.state.reset_to(View::Home);

        app.open(View::Coordination, ViewParams::default());
        assert!(app.store.coordination.is_loading_apps);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state.current_view, View::Home);

        settle_next(&mut app).await;
        assert!(app.store.coordination.applications.is_empty());
        assert!(!app.store.coordination.is_loading_apps);
    }

    #[tokio::test]
    async fn test_reject_application_sends_typed_reason() {
        let mut mock = MockApiClientTrait::new();
        mock.expect_application_detail()
            .returning(|id| Ok(detail(id, &["reject"])));
        mock.expect_coordination_applications()
            .returning(|| Ok(Vec::new()));
        mock.expect_reject_application()
            .withf(|id, reason| *id == 7 && reason == "Out of scope")
            .times(1)
            .returning(|_, _| {
                Ok(AppActionResponse {
                    message: "Application rejected".into(),
                    status: "rejected".into(),
                    status_name: "Rejected".into(),
                })
            });
        let mut app = app_with(mock);
        app.state.reset_to(View::Home);
        app.open(View::Coordination, ViewParams::default());
        settle_next(&mut app).await;
        app.open(View::CoordinationDetail, ViewParams::application(7));
        settle_next(&mut app).await;

        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.state.detail_mode, DetailMode::Reject);

        // Empty reason is blocked
        press_ctrl(&mut app, 's');
        assert!(!app.store.coordination.is_loading_decision);

        type_text(&mut app, "Out of scope");
        press_ctrl(&mut app, 's');
        assert!(app.store.coordination.is_loading_decision);
        settle_next(&mut app).await;

        assert_eq!(
            app.status_message.as_deref(),
            Some("Application rejected")
        );
        assert_eq!(app.state.current_view, View::Coordination);
    }

    #[tokio::test]
    async fn test_unavailable_decision_is_refused() {
        let mut mock = MockApiClientTrait::new();
        mock.expect_application_detail()
            .returning(|id| Ok(detail(id, &["request_changes"])));
        let mut app = app_with(mock);
        app.state.reset_to(View::Home);
        app.open(View::CoordinationDetail, ViewParams::application(5));
        settle_next(&mut app).await;

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.state.pending_decision, None);
        assert!(app.status_message.is_some());

        press(&mut app, KeyCode::Char('w'));
        assert_eq!(app.state.pending_decision, Some(Decision::RequestChanges));
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state.pending_decision, None);
        assert_eq!(app.state.current_view, View::CoordinationDetail);
    }

    #[tokio::test]
    async fn test_comment_requires_selected_field() {
        let mut mock = MockApiClientTrait::new();
        mock.expect_application_detail()
            .returning(|id| Ok(detail(id, &[])));
        let mut app = app_with(mock);
        app.state.reset_to(View::Home);
        app.open(View::CoordinationDetail, ViewParams::application(2));
        settle_next(&mut app).await;

        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.state.current_error(), Some("Select a field to comment on"));
        press(&mut app, KeyCode::Esc);

        press(&mut app, KeyCode::Char('j'));
        assert_eq!(
            app.store.coordination.current_field.as_ref().map(|f| f.code.as_str()),
            Some(COMMENTABLE_FIELDS[0].0)
        );
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.state.detail_mode, DetailMode::Comment);
    }

    #[tokio::test]
    async fn test_approve_registration_with_role_and_department() {
        let mut mock = MockApiClientTrait::new();
        mock.expect_approve_registration()
            .withf(|req| req.user_id == 9 && req.role_id == "expert" && req.department_id == 3)
            .times(1)
            .returning(|req| {
                Ok(ApproveUser {
                    id: req.user_id,
                    status: RequestStatus::Approved,
                    ..Default::default()
                })
            });
        let mut app = app_with(mock);
        app.store.catalog.roles = vec![Role {
            code: "expert".into(),
            name: "Expert".into(),
        }];
        app.store.catalog.departments = vec![Department {
            id: 3,
            name: "Software".into(),
            short_name: String::new(),
        }];
        app.store.control.users = vec![ApproveUser {
            id: 9,
            ..Default::default()
        }];
        app.state.reset_to(View::Control);

        press(&mut app, KeyCode::Char('a'));
        assert!(app.store.control.is_open_approve_modal);

        // Submitting without choices is refused
        press(&mut app, KeyCode::Enter);
        assert!(!app.store.control.is_loading_request);

        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Enter);
        assert!(app.store.control.is_loading_request);
        settle_next(&mut app).await;

        assert!(!app.store.control.is_open_approve_modal);
        assert_eq!(app.store.control.users[0].status, RequestStatus::Approved);
        assert_eq!(app.store.control.current_user, None);
    }

    #[tokio::test]
    async fn test_processed_request_cannot_be_reopened() {
        let mut app = app_with(MockApiClientTrait::new());
        app.store.control.users = vec![ApproveUser {
            id: 4,
            status: RequestStatus::Rejected,
            ..Default::default()
        }];
        app.state.reset_to(View::Control);

        press(&mut app, KeyCode::Char('x'));
        assert!(!app.store.control.is_open_reject_modal);
        assert!(app.status_message.is_some());
    }

    #[tokio::test]
    async fn test_wizard_gating_follows_config() {
        let strict = ClientConfig {
            strict_wizard: true,
            ..Default::default()
        };
        let mut app = App::new(Arc::new(MockApiClientTrait::new()), &strict);
        app.state.navigate(View::NewApplication, ViewParams::default());
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.state.wizard.active_step(), 1);
        assert_eq!(
            app.state.application_form.error(ApplicationField::Title),
            Some("Enter the project title")
        );

        let mut app = app_with(MockApiClientTrait::new());
        app.state.navigate(View::NewApplication, ViewParams::default());
        press(&mut app, KeyCode::PageDown);
        assert_eq!(app.state.wizard.active_step(), 2);
        press(&mut app, KeyCode::PageUp);
        assert_eq!(app.state.wizard.active_step(), 1);
    }

    #[tokio::test]
    async fn test_incomplete_submit_jumps_to_first_step() {
        let mut app = app_with(MockApiClientTrait::new());
        app.state.navigate(View::NewApplication, ViewParams::default());
        let last = APPLICATION_STEPS.len();
        app.state.wizard.go_to(last);

        press_ctrl(&mut app, 's');
        assert_eq!(app.state.wizard.active_step(), 1);
        assert!(!app.store.application.is_loading);
    }

    #[test]
    fn test_edit_form_choice_and_flag() {
        let mut form = crate::state::forms::application_form();
        let mut focus = FieldFocus::default();
        let mut cursor = 0;
        let fields = [ApplicationField::ProjectLevel, ApplicationField::NeedsConsultation];
        let options = |f| application_options(f, &[]);

        let input = edit_form(
            &mut form,
            &fields,
            &mut focus,
            &mut cursor,
            options,
            KeyEvent::new(KeyCode::Right, KeyModifiers::NONE),
        );
        assert_eq!(input, FormInput::Edited);
        assert_eq!(
            form.value(ApplicationField::ProjectLevel)
                .and_then(FieldValue::as_choice)
                .map(|c| c.label.as_str()),
            Some("L2")
        );

        focus.next(fields.len());
        edit_form(
            &mut form,
            &fields,
            &mut focus,
            &mut cursor,
            options,
            KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE),
        );
        assert!(form.flag(ApplicationField::NeedsConsultation));
    }

    #[test]
    fn test_edit_form_multiselect() {
        let mut form = crate::state::forms::public_application_form();
        let mut focus = FieldFocus::default();
        let mut cursor = 0;
        let fields = [PublicApplicationField::TargetInstitutes];
        let institutes = vec![Choice::new("IIT", "IT"), Choice::new("IEF", "Economics")];
        let mut press = |code| {
            edit_form(
                &mut form,
                &fields,
                &mut focus,
                &mut cursor,
                |_| institutes.clone(),
                KeyEvent::new(code, KeyModifiers::NONE),
            );
        };

        press(KeyCode::Right);
        press(KeyCode::Char(' '));
        drop(press);
        assert_eq!(
            form.value(PublicApplicationField::TargetInstitutes)
                .map(FieldValue::as_choices),
            Some(&[Choice::new("IEF", "Economics")][..])
        );

        edit_form(
            &mut form,
            &fields,
            &mut focus,
            &mut cursor,
            |_| institutes.clone(),
            KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE),
        );
        assert!(form
            .value(PublicApplicationField::TargetInstitutes)
            .is_some_and(|v| v.as_choices().is_empty()));
    }

    #[tokio::test]
    async fn test_member_menu_hides_registration_requests() {
        let mut mock = MockApiClientTrait::new();
        mock.expect_logout().times(1).return_const(());
        let mut app = app_with(mock);
        app.store.user.user = Some(User {
            id: 4,
            role: "student".into(),
            ..Default::default()
        });
        app.state.reset_to(View::Home);
        assert!(!app.home_menu().contains(&MenuEntry::Control));

        for _ in 0..10 {
            press(&mut app, KeyCode::Down);
        }
        press(&mut app, KeyCode::Enter);
        assert_ne!(app.state.current_view, View::Control);

        // the last entry signs out
        settle_next(&mut app).await;
        assert_eq!(app.state.current_view, View::Login);
    }

    #[tokio::test]
    async fn test_login_settles_after_leaving_view() {
        let mut mock = MockApiClientTrait::new();
        mock.expect_login().times(1).returning(|_| {
            Ok(AuthResponse {
                access: "token".into(),
                user: Some(User {
                    id: 2,
                    ..Default::default()
                }),
                ..Default::default()
            })
        });
        let mut app = app_with(mock);

        type_text(&mut app, "a@b.ru");
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "secret");
        press(&mut app, KeyCode::Enter);
        press_ctrl(&mut app, 'r');
        assert_eq!(app.state.current_view, View::Registration);

        settle_next(&mut app).await;
        assert_eq!(app.store.user.user.as_ref().map(|u| u.id), Some(2));
        assert_eq!(app.state.current_view, View::Home);
    }

    fn dated_item(id: u64, title: &str, created: &str) -> ApplicationItem {
        ApplicationItem {
            id,
            title: title.into(),
            creation_date: created.into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_search_filters_my_applications() {
        let mut mock = MockApiClientTrait::new();
        mock.expect_my_applications().times(1).returning(|| {
            Ok(vec![
                dated_item(1, "Campus map", "2024-01-05T10:00:00Z"),
                dated_item(2, "Lab booking", "2024-03-01T10:00:00Z"),
                dated_item(3, "Map of dorms", "2024-02-10T10:00:00Z"),
            ])
        });
        mock.expect_application_detail()
            .returning(|id| Ok(detail(id, &[])));
        let mut app = app_with(mock);
        app.state.reset_to(View::Home);
        app.open(View::MyApplications, ViewParams::default());
        settle_next(&mut app).await;

        let ids = |app: &App| -> Vec<u64> {
            app.visible_applications().iter().map(|a| a.id).collect()
        };
        assert_eq!(ids(&app), vec![2, 3, 1]);

        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "MAP");
        press(&mut app, KeyCode::Enter);
        assert!(!app.state.list_filter.editing);
        assert_eq!(ids(&app), vec![3, 1]);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state.current_view, View::ApplicationDetail);
        assert_eq!(app.state.view_params.application_id, Some(1));
    }

    #[test]
    fn test_search_without_matches_then_clear() {
        let mut app = app_with(MockApiClientTrait::new());
        app.state.reset_to(View::Home);
        app.state
            .navigate(View::MyApplications, ViewParams::default());
        app.store.application.applications = vec![dated_item(1, "Campus map", "")];

        press(&mut app, KeyCode::Char('/'));
        type_text(&mut app, "robot");
        press(&mut app, KeyCode::Enter);
        assert!(app.visible_applications().is_empty());

        // nothing to open
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state.current_view, View::MyApplications);

        // first Esc clears the search, the second leaves the list
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.visible_applications().len(), 1);
        assert_eq!(app.state.current_view, View::MyApplications);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state.current_view, View::Home);
    }

    #[test]
    fn test_double_ctrl_c_quits() {
        let mut app = App::new(
            Arc::new(MockApiClientTrait::new()),
            &ClientConfig::default(),
        );
        press_ctrl(&mut app, 'c');
        assert!(!app.should_quit());
        press_ctrl(&mut app, 'c');
        assert!(app.should_quit());
    }
}
