//! Wire types exchanged with the showcase backend

use super::forms::{Searchable, SelectOption};
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime};
use std::cmp::Reverse;
use serde::{Deserialize, Deserializer, Serialize};

/// Decode `null` as the type's default (the backend sends null for blank text)
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Render an ISO timestamp as a local date, falling back to the raw string
pub fn format_date(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Local).format("%d.%m.%Y %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Code/name pair used for statuses
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Status {
    #[serde(default, deserialize_with = "null_default")]
    pub code: String,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Institute {
    pub code: String,
    pub name: String,
}

impl SelectOption for Institute {
    fn option_value(&self) -> String {
        self.code.clone()
    }

    fn option_label(&self) -> String {
        self.name.clone()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Department {
    pub id: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub short_name: String,
}

impl SelectOption for Department {
    fn option_value(&self) -> String {
        self.id.to_string()
    }

    fn option_label(&self) -> String {
        if self.short_name.is_empty() {
            self.name.clone()
        } else {
            format!("{} ({})", self.name, self.short_name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Role {
    pub code: String,
    pub name: String,
}

impl SelectOption for Role {
    fn option_value(&self) -> String {
        self.code.clone()
    }

    fn option_label(&self) -> String {
        self.name.clone()
    }
}

/// Project scale levels offered by the application form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectLevel {
    pub id: u32,
    pub name: &'static str,
}

pub const PROJECT_LEVELS: &[ProjectLevel] = &[
    ProjectLevel { id: 1, name: "L1" },
    ProjectLevel { id: 2, name: "L2" },
    ProjectLevel { id: 3, name: "L3" },
];

impl SelectOption for ProjectLevel {
    fn option_value(&self) -> String {
        self.id.to_string()
    }

    fn option_label(&self) -> String {
        self.name.to_string()
    }
}

/// Authenticated user profile
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub middle_name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub role: String,
    #[serde(default, deserialize_with = "null_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_default")]
    pub department: Department,
}

impl User {
    pub fn full_name(&self) -> String {
        [&self.last_name, &self.first_name, &self.middle_name]
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub first_name: String,
    pub last_name: String,
    pub middle_name: String,
    pub email: String,
    pub phone: String,
    pub comment: String,
}

/// Login/registration response; registration may omit the tokens
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuthResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub access: String,
    #[serde(default, deserialize_with = "null_default")]
    pub refresh: String,
    #[serde(default)]
    pub user: Option<User>,
}

/// Row of an application list
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApplicationItem {
    pub id: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_default")]
    pub company: String,
    #[serde(default, deserialize_with = "null_default")]
    pub author_name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub author_email: String,
    #[serde(default, deserialize_with = "null_default")]
    pub creation_date: String,
    #[serde(default)]
    pub needs_consultation: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub status: Status,
}

impl ApplicationItem {
    /// Creation time; naive timestamps are read as UTC
    pub fn created_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.creation_date)
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(&self.creation_date, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|naive| naive.and_utc().fixed_offset())
            })
    }
}

impl Searchable for ApplicationItem {
    fn search_text(&self) -> &str {
        &self.title
    }
}

/// Newest applications first; items without a readable date go last
pub fn sort_newest_first(items: &mut [ApplicationItem]) {
    items.sort_by_key(|item| Reverse(item.created_at()));
}

/// Full project application
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Application {
    pub id: u64,
    #[serde(deserialize_with = "null_default")]
    pub title: String,
    #[serde(deserialize_with = "null_default")]
    pub creation_date: String,
    #[serde(deserialize_with = "null_default")]
    pub status: Status,

    #[serde(deserialize_with = "null_default")]
    pub author: u64,
    #[serde(deserialize_with = "null_default")]
    pub author_division: String,
    #[serde(deserialize_with = "null_default")]
    pub author_firstname: String,
    #[serde(deserialize_with = "null_default")]
    pub author_middlename: String,
    #[serde(deserialize_with = "null_default")]
    pub author_lastname: String,
    #[serde(deserialize_with = "null_default")]
    pub author_phone: String,
    #[serde(deserialize_with = "null_default")]
    pub author_email: String,
    #[serde(deserialize_with = "null_default")]
    pub author_role: String,

    #[serde(deserialize_with = "null_default")]
    pub company: String,
    #[serde(deserialize_with = "null_default")]
    pub company_contacts: String,
    #[serde(deserialize_with = "null_default")]
    pub project_level: String,
    #[serde(deserialize_with = "null_default")]
    pub target_institutes: Vec<Institute>,

    #[serde(deserialize_with = "null_default")]
    pub problem_holder: String,
    #[serde(deserialize_with = "null_default")]
    pub goal: String,
    #[serde(deserialize_with = "null_default")]
    pub barrier: String,
    #[serde(deserialize_with = "null_default")]
    pub existing_solutions: String,

    #[serde(deserialize_with = "null_default")]
    pub context: String,
    #[serde(deserialize_with = "null_default")]
    pub recommended_tools: String,
    #[serde(deserialize_with = "null_default")]
    pub stakeholders: String,
    #[serde(deserialize_with = "null_default")]
    pub experts: String,
    #[serde(deserialize_with = "null_default")]
    pub additional_materials: String,
    pub needs_consultation: bool,
}

impl Application {
    pub fn author_name(&self) -> String {
        [
            &self.author_lastname,
            &self.author_firstname,
            &self.author_middlename,
        ]
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Text of a commentable field by its wire code
    pub fn field_text(&self, code: &str) -> String {
        match code {
            "title" => self.title.clone(),
            "company" => self.company.clone(),
            "company_contacts" => self.company_contacts.clone(),
            "project_level" => self.project_level.clone(),
            "target_institutes" => self
                .target_institutes
                .iter()
                .map(|i| i.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            "problem_holder" => self.problem_holder.clone(),
            "goal" => self.goal.clone(),
            "barrier" => self.barrier.clone(),
            "existing_solutions" => self.existing_solutions.clone(),
            "context" => self.context.clone(),
            "stakeholders" => self.stakeholders.clone(),
            "recommended_tools" => self.recommended_tools.clone(),
            "experts" => self.experts.clone(),
            "additional_materials" => self.additional_materials.clone(),
            _ => String::new(),
        }
    }

    /// Plain-text rendering used for clipboard export
    pub fn to_plain_text(&self) -> String {
        let mut out = format!("#{} {}\n", self.id, self.title);
        out.push_str(&format!("Status: {}\n", self.status.name));
        out.push_str(&format!("Author: {}\n\n", self.author_name()));
        for (code, label) in COMMENTABLE_FIELDS {
            let text = self.field_text(code);
            if !text.is_empty() {
                out.push_str(&format!("{label}:\n{text}\n\n"));
            }
        }
        out
    }
}

/// Field codes that coordinators may comment on, with their labels
pub const COMMENTABLE_FIELDS: &[(&str, &str)] = &[
    ("title", "Project title"),
    ("company", "Customer organisation"),
    ("company_contacts", "Customer contacts"),
    ("project_level", "Project level"),
    ("target_institutes", "Target institutes"),
    ("problem_holder", "Problem holder"),
    ("goal", "Goal"),
    ("barrier", "Barrier"),
    ("existing_solutions", "Existing solutions"),
    ("context", "Context"),
    ("stakeholders", "Stakeholders"),
    ("recommended_tools", "Recommended tools"),
    ("experts", "Experts"),
    ("additional_materials", "Additional materials"),
];

/// A field selected for commenting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef {
    pub code: String,
    pub name: String,
}

impl FieldRef {
    pub fn new(code: &str, name: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommentAuthor {
    pub id: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub short_name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub role_name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub department_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Comment {
    pub id: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub field: String,
    #[serde(default, deserialize_with = "null_default")]
    pub text: String,
    #[serde(default, deserialize_with = "null_default")]
    pub author: CommentAuthor,
    #[serde(default, deserialize_with = "null_default")]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersonRef {
    pub id: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InvolvedUser {
    pub id: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub user: PersonRef,
    #[serde(default, deserialize_with = "null_default")]
    pub added_at: String,
    #[serde(default)]
    pub added_by: Option<PersonRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InvolvedDepartment {
    pub id: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub department: Department,
    #[serde(default, deserialize_with = "null_default")]
    pub added_at: String,
    #[serde(default)]
    pub added_by: Option<PersonRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ActionConfig {
    #[serde(default, deserialize_with = "null_default")]
    pub status_code: String,
}

/// Workflow transition the current user may perform
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AvailableAction {
    pub action: String,
    #[serde(default, deserialize_with = "null_default")]
    pub label: String,
    #[serde(default, deserialize_with = "null_default")]
    pub config: ActionConfig,
}

/// Application with coordination data
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApplicationDetail {
    #[serde(flatten)]
    pub application: Application,
    #[serde(default, deserialize_with = "null_default")]
    pub involved_users: Vec<InvolvedUser>,
    #[serde(default, deserialize_with = "null_default")]
    pub involved_departments: Vec<InvolvedDepartment>,
    #[serde(default, deserialize_with = "null_default")]
    pub comments: Vec<Comment>,
    #[serde(default, deserialize_with = "null_default")]
    pub available_actions: Vec<AvailableAction>,
}

impl ApplicationDetail {
    pub fn has_action(&self, name: &str) -> bool {
        self.available_actions.iter().any(|a| a.action == name)
    }

    pub fn comment_count(&self, field_code: &str) -> usize {
        self.comments.iter().filter(|c| c.field == field_code).count()
    }

    /// Comments for a field, or all comments when no field is selected
    pub fn comments_for(&self, field: Option<&FieldRef>) -> Vec<&Comment> {
        self.comments
            .iter()
            .filter(|c| field.is_none_or(|f| c.field == f.code))
            .collect()
    }
}

/// Result of approve / request-changes / reject on an application
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppActionResponse {
    #[serde(default, deserialize_with = "null_default")]
    pub message: String,
    #[serde(default, deserialize_with = "null_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_default")]
    pub status_name: String,
}

/// Payload for an authenticated application
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateApplication {
    pub author: u64,
    pub author_firstname: String,
    pub author_middlename: String,
    pub author_lastname: String,
    pub author_phone: String,
    pub author_email: String,
    pub author_role: String,
    pub author_division: String,

    pub title: String,
    pub company: String,
    pub company_contacts: String,
    pub project_level: String,
    pub target_institutes: Vec<String>,

    pub problem_holder: String,
    pub goal: String,
    pub barrier: String,
    pub existing_solutions: String,

    pub context: String,
    pub stakeholders: String,
    pub recommended_tools: String,
    pub experts: String,
    pub additional_materials: String,
    pub needs_consultation: bool,
}

/// Payload for an anonymous application
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreatePublicApplication {
    pub author_firstname: String,
    pub author_middlename: String,
    pub author_lastname: String,
    pub author_phone: String,
    pub author_email: String,

    pub company: String,
    pub company_contacts: String,
    pub target_institutes: Vec<Institute>,

    pub problem_holder: String,
    pub goal: String,
    pub barrier: String,
    pub existing_solutions: String,
}

/// Payload for editing an application under coordination
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EditApplication {
    pub title: String,
    pub company: String,
    pub company_contacts: String,
    pub project_level: String,
    pub target_institutes: Vec<String>,

    pub problem_holder: String,
    pub goal: String,
    pub barrier: String,
    pub existing_solutions: String,

    pub context: String,
    pub stakeholders: String,
    pub recommended_tools: String,
    pub experts: String,
    pub additional_materials: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateComment {
    pub application_id: u64,
    pub field: String,
    pub text: String,
}

/// Registration request status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Submitted,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Actor {
    pub id: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub full_name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub email: String,
}

/// Pending account registration awaiting an administrator
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ApproveUser {
    pub id: u64,
    #[serde(default, deserialize_with = "null_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub last_name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub middle_name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_default")]
    pub comment: String,
    #[serde(default, deserialize_with = "null_default")]
    pub created_at: String,
    #[serde(default)]
    pub status: RequestStatus,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub department: Option<Department>,
    #[serde(default)]
    pub actor: Option<Actor>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl ApproveUser {
    pub fn full_name(&self) -> String {
        [&self.last_name, &self.first_name, &self.middle_name]
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApproveUserRequest {
    pub user_id: u64,
    pub role_id: String,
    pub department_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectUserRequest {
    pub user_id: u64,
    pub reason: String,
}
