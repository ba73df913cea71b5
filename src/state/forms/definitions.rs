//! Concrete forms of the application workflow

use super::field::{Choice, FieldValue, FormFields, SelectOption};
use super::form_state::FormState;
use super::validation::{email_format, required, Schema};
use crate::state::models::{
    ApplicationDetail, CreateApplication, CreatePublicApplication, EditApplication, Institute,
    LoginRequest, RegistrationRequest, User, PROJECT_LEVELS,
};

// Login

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoginField {
    Email,
    Password,
}

impl FormFields for LoginField {
    const ALL: &'static [Self] = &[LoginField::Email, LoginField::Password];

    fn name(self) -> &'static str {
        match self {
            LoginField::Email => "email",
            LoginField::Password => "password",
        }
    }

    fn label(self) -> &'static str {
        match self {
            LoginField::Email => "Email",
            LoginField::Password => "Password",
        }
    }
}

pub type LoginForm = FormState<LoginField>;

pub const LOGIN_REQUIRED: &[LoginField] = &[LoginField::Email, LoginField::Password];

pub fn login_form() -> LoginForm {
    FormState::new(
        Schema::new()
            .field(
                LoginField::Email,
                [
                    required("Enter your email"),
                    email_format("Invalid email address"),
                ],
            )
            .field(LoginField::Password, [required("Enter your password")]),
    )
}

pub fn login_request(form: &LoginForm) -> LoginRequest {
    LoginRequest {
        email: form.text(LoginField::Email).trim().to_string(),
        password: form.text(LoginField::Password).to_string(),
    }
}

// Registration

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistrationField {
    LastName,
    FirstName,
    MiddleName,
    Email,
    Phone,
    Comment,
}

impl FormFields for RegistrationField {
    const ALL: &'static [Self] = &[
        RegistrationField::LastName,
        RegistrationField::FirstName,
        RegistrationField::MiddleName,
        RegistrationField::Email,
        RegistrationField::Phone,
        RegistrationField::Comment,
    ];

    fn name(self) -> &'static str {
        match self {
            RegistrationField::LastName => "last_name",
            RegistrationField::FirstName => "first_name",
            RegistrationField::MiddleName => "middle_name",
            RegistrationField::Email => "email",
            RegistrationField::Phone => "phone",
            RegistrationField::Comment => "comment",
        }
    }

    fn label(self) -> &'static str {
        match self {
            RegistrationField::LastName => "Last name",
            RegistrationField::FirstName => "First name",
            RegistrationField::MiddleName => "Middle name",
            RegistrationField::Email => "Email",
            RegistrationField::Phone => "Phone",
            RegistrationField::Comment => "Comment for the administrator",
        }
    }

    fn is_multiline(self) -> bool {
        matches!(self, RegistrationField::Comment)
    }
}

pub type RegistrationForm = FormState<RegistrationField>;

pub const REGISTRATION_REQUIRED: &[RegistrationField] = &[
    RegistrationField::LastName,
    RegistrationField::FirstName,
    RegistrationField::Email,
    RegistrationField::Phone,
];

pub fn registration_form() -> RegistrationForm {
    FormState::new(
        Schema::new()
            .field(RegistrationField::LastName, [required("Enter your last name")])
            .field(
                RegistrationField::FirstName,
                [required("Enter your first name")],
            )
            .field(
                RegistrationField::Email,
                [
                    required("Enter your email"),
                    email_format("Invalid email address"),
                ],
            )
            .field(RegistrationField::Phone, [required("Enter your phone")]),
    )
}

pub fn registration_request(form: &RegistrationForm) -> RegistrationRequest {
    let text = |f| form.text(f).trim().to_string();
    RegistrationRequest {
        first_name: text(RegistrationField::FirstName),
        last_name: text(RegistrationField::LastName),
        middle_name: text(RegistrationField::MiddleName),
        email: text(RegistrationField::Email),
        phone: text(RegistrationField::Phone),
        comment: text(RegistrationField::Comment),
    }
}

// Authenticated application (also used for editing)

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplicationField {
    Title,
    Company,
    CompanyContacts,
    ProjectLevel,
    TargetInstitutes,
    ProblemHolder,
    Goal,
    Barrier,
    ExistingSolutions,
    Context,
    Stakeholders,
    RecommendedTools,
    Experts,
    AdditionalMaterials,
    NeedsConsultation,
}

impl FormFields for ApplicationField {
    const ALL: &'static [Self] = &[
        ApplicationField::Title,
        ApplicationField::Company,
        ApplicationField::CompanyContacts,
        ApplicationField::ProjectLevel,
        ApplicationField::TargetInstitutes,
        ApplicationField::ProblemHolder,
        ApplicationField::Goal,
        ApplicationField::Barrier,
        ApplicationField::ExistingSolutions,
        ApplicationField::Context,
        ApplicationField::Stakeholders,
        ApplicationField::RecommendedTools,
        ApplicationField::Experts,
        ApplicationField::AdditionalMaterials,
        ApplicationField::NeedsConsultation,
    ];

    fn name(self) -> &'static str {
        match self {
            ApplicationField::Title => "title",
            ApplicationField::Company => "company",
            ApplicationField::CompanyContacts => "company_contacts",
            ApplicationField::ProjectLevel => "project_level",
            ApplicationField::TargetInstitutes => "target_institutes",
            ApplicationField::ProblemHolder => "problem_holder",
            ApplicationField::Goal => "goal",
            ApplicationField::Barrier => "barrier",
            ApplicationField::ExistingSolutions => "existing_solutions",
            ApplicationField::Context => "context",
            ApplicationField::Stakeholders => "stakeholders",
            ApplicationField::RecommendedTools => "recommended_tools",
            ApplicationField::Experts => "experts",
            ApplicationField::AdditionalMaterials => "additional_materials",
            ApplicationField::NeedsConsultation => "needs_consultation",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ApplicationField::Title => "Project title",
            ApplicationField::Company => "Customer organisation",
            ApplicationField::CompanyContacts => "Customer contacts",
            ApplicationField::ProjectLevel => "Project level",
            ApplicationField::TargetInstitutes => "Target institutes",
            ApplicationField::ProblemHolder => "Problem holder",
            ApplicationField::Goal => "Goal",
            ApplicationField::Barrier => "Barrier",
            ApplicationField::ExistingSolutions => "Existing solutions",
            ApplicationField::Context => "Context",
            ApplicationField::Stakeholders => "Stakeholders",
            ApplicationField::RecommendedTools => "Recommended tools",
            ApplicationField::Experts => "Experts",
            ApplicationField::AdditionalMaterials => "Additional materials",
            ApplicationField::NeedsConsultation => "Needs consultation",
        }
    }

    fn is_multiline(self) -> bool {
        !matches!(
            self,
            ApplicationField::Title
                | ApplicationField::Company
                | ApplicationField::ProjectLevel
                | ApplicationField::TargetInstitutes
                | ApplicationField::ProblemHolder
                | ApplicationField::NeedsConsultation
        )
    }

    fn initial(self) -> FieldValue {
        match self {
            ApplicationField::ProjectLevel => {
                FieldValue::Choice(PROJECT_LEVELS.first().map(SelectOption::to_choice))
            }
            ApplicationField::TargetInstitutes => FieldValue::Choices(Vec::new()),
            ApplicationField::NeedsConsultation => FieldValue::Flag(false),
            _ => FieldValue::default(),
        }
    }
}

pub type ApplicationForm = FormState<ApplicationField>;

/// Wizard steps of the application form
pub const APPLICATION_STEPS: &[(&str, &[ApplicationField])] = &[
    (
        "About the project",
        &[
            ApplicationField::Title,
            ApplicationField::Company,
            ApplicationField::CompanyContacts,
            ApplicationField::ProjectLevel,
            ApplicationField::TargetInstitutes,
        ],
    ),
    (
        "Problem",
        &[
            ApplicationField::ProblemHolder,
            ApplicationField::Goal,
            ApplicationField::Barrier,
            ApplicationField::ExistingSolutions,
        ],
    ),
    (
        "Context",
        &[
            ApplicationField::Context,
            ApplicationField::Stakeholders,
            ApplicationField::RecommendedTools,
            ApplicationField::Experts,
            ApplicationField::AdditionalMaterials,
            ApplicationField::NeedsConsultation,
        ],
    ),
];

/// Fields shown when a coordinator edits an application
pub const EDIT_FIELDS: &[ApplicationField] = &[
    ApplicationField::Title,
    ApplicationField::Company,
    ApplicationField::CompanyContacts,
    ApplicationField::ProjectLevel,
    ApplicationField::TargetInstitutes,
    ApplicationField::ProblemHolder,
    ApplicationField::Goal,
    ApplicationField::Barrier,
    ApplicationField::ExistingSolutions,
    ApplicationField::Context,
    ApplicationField::Stakeholders,
    ApplicationField::RecommendedTools,
    ApplicationField::Experts,
    ApplicationField::AdditionalMaterials,
];

pub const APPLICATION_REQUIRED: &[ApplicationField] = &[
    ApplicationField::Title,
    ApplicationField::Company,
    ApplicationField::CompanyContacts,
    ApplicationField::ProblemHolder,
    ApplicationField::Goal,
    ApplicationField::Barrier,
];

pub fn application_form() -> ApplicationForm {
    FormState::new(
        Schema::new()
            .field(ApplicationField::Title, [required("Enter the project title")])
            .field(
                ApplicationField::Company,
                [required("Enter the customer organisation")],
            )
            .field(
                ApplicationField::CompanyContacts,
                [required("Enter the customer contacts")],
            )
            .field(
                ApplicationField::ProblemHolder,
                [required("Enter the problem holder")],
            )
            .field(ApplicationField::Goal, [required("Describe the goal")])
            .field(ApplicationField::Barrier, [required("Describe the barrier")]),
    )
}

/// Populate an edit form from a loaded application, without validation
pub fn edit_form_from(detail: &ApplicationDetail) -> ApplicationForm {
    let app = &detail.application;
    let level = PROJECT_LEVELS
        .iter()
        .find(|l| l.name == app.project_level)
        .or(PROJECT_LEVELS.first())
        .map(SelectOption::to_choice);

    let mut form = application_form();
    form.set_values([
        (ApplicationField::Title, FieldValue::text(&app.title)),
        (ApplicationField::Company, FieldValue::text(&app.company)),
        (
            ApplicationField::CompanyContacts,
            FieldValue::text(&app.company_contacts),
        ),
        (ApplicationField::ProjectLevel, FieldValue::Choice(level)),
        (
            ApplicationField::TargetInstitutes,
            FieldValue::Choices(app.target_institutes.iter().map(|i| i.to_choice()).collect()),
        ),
        (
            ApplicationField::ProblemHolder,
            FieldValue::text(&app.problem_holder),
        ),
        (ApplicationField::Goal, FieldValue::text(&app.goal)),
        (ApplicationField::Barrier, FieldValue::text(&app.barrier)),
        (
            ApplicationField::ExistingSolutions,
            FieldValue::text(&app.existing_solutions),
        ),
        (ApplicationField::Context, FieldValue::text(&app.context)),
        (
            ApplicationField::Stakeholders,
            FieldValue::text(&app.stakeholders),
        ),
        (
            ApplicationField::RecommendedTools,
            FieldValue::text(&app.recommended_tools),
        ),
        (ApplicationField::Experts, FieldValue::text(&app.experts)),
        (
            ApplicationField::AdditionalMaterials,
            FieldValue::text(&app.additional_materials),
        ),
        (
            ApplicationField::NeedsConsultation,
            FieldValue::Flag(app.needs_consultation),
        ),
    ]);
    form
}

fn level_name(form: &ApplicationForm) -> String {
    form.value(ApplicationField::ProjectLevel)
        .and_then(FieldValue::as_choice)
        .map(|c| c.label.clone())
        .unwrap_or_default()
}

fn institute_codes(value: Option<&FieldValue>) -> Vec<String> {
    value
        .map(FieldValue::as_choices)
        .unwrap_or_default()
        .iter()
        .map(|c| c.value.clone())
        .collect()
}

/// Build the create payload, stamping the author from the signed-in user
pub fn create_application_request(form: &ApplicationForm, author: &User) -> CreateApplication {
    use ApplicationField as F;
    let text = |f| form.text(f).to_string();
    CreateApplication {
        author: author.id,
        author_firstname: author.first_name.clone(),
        author_middlename: author.middle_name.clone(),
        author_lastname: author.last_name.clone(),
        author_phone: author.phone.clone(),
        author_email: author.email.clone(),
        author_role: author.role.clone(),
        author_division: author.department.name.clone(),
        title: text(F::Title),
        company: text(F::Company),
        company_contacts: text(F::CompanyContacts),
        project_level: level_name(form),
        target_institutes: institute_codes(form.value(F::TargetInstitutes)),
        problem_holder: text(F::ProblemHolder),
        goal: text(F::Goal),
        barrier: text(F::Barrier),
        existing_solutions: text(F::ExistingSolutions),
        context: text(F::Context),
        stakeholders: text(F::Stakeholders),
        recommended_tools: text(F::RecommendedTools),
        experts: text(F::Experts),
        additional_materials: text(F::AdditionalMaterials),
        needs_consultation: form.flag(F::NeedsConsultation),
    }
}

pub fn edit_application_request(form: &ApplicationForm) -> EditApplication {
    use ApplicationField as F;
    let text = |f| form.text(f).to_string();
    EditApplication {
        title: text(F::Title),
        company: text(F::Company),
        company_contacts: text(F::CompanyContacts),
        project_level: level_name(form),
        target_institutes: institute_codes(form.value(F::TargetInstitutes)),
        problem_holder: text(F::ProblemHolder),
        goal: text(F::Goal),
        barrier: text(F::Barrier),
        existing_solutions: text(F::ExistingSolutions),
        context: text(F::Context),
        stakeholders: text(F::Stakeholders),
        recommended_tools: text(F::RecommendedTools),
        experts: text(F::Experts),
        additional_materials: text(F::AdditionalMaterials),
    }
}

// Anonymous application

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PublicApplicationField {
    AuthorLastname,
    AuthorFirstname,
    AuthorMiddlename,
    AuthorPhone,
    AuthorEmail,
    Company,
    CompanyContacts,
    TargetInstitutes,
    ProblemHolder,
    Goal,
    Barrier,
    ExistingSolutions,
}

impl FormFields for PublicApplicationField {
    const ALL: &'static [Self] = &[
        PublicApplicationField::AuthorLastname,
        PublicApplicationField::AuthorFirstname,
        PublicApplicationField::AuthorMiddlename,
        PublicApplicationField::AuthorPhone,
        PublicApplicationField::AuthorEmail,
        PublicApplicationField::Company,
        PublicApplicationField::CompanyContacts,
        PublicApplicationField::TargetInstitutes,
        PublicApplicationField::ProblemHolder,
        PublicApplicationField::Goal,
        PublicApplicationField::Barrier,
        PublicApplicationField::ExistingSolutions,
    ];

    fn name(self) -> &'static str {
        match self {
            PublicApplicationField::AuthorLastname => "author_lastname",
            PublicApplicationField::AuthorFirstname => "author_firstname",
            PublicApplicationField::AuthorMiddlename => "author_middlename",
            PublicApplicationField::AuthorPhone => "author_phone",
            PublicApplicationField::AuthorEmail => "author_email",
            PublicApplicationField::Company => "company",
            PublicApplicationField::CompanyContacts => "company_contacts",
            PublicApplicationField::TargetInstitutes => "target_institutes",
            PublicApplicationField::ProblemHolder => "problem_holder",
            PublicApplicationField::Goal => "goal",
            PublicApplicationField::Barrier => "barrier",
            PublicApplicationField::ExistingSolutions => "existing_solutions",
        }
    }

    fn label(self) -> &'static str {
        match self {
            PublicApplicationField::AuthorLastname => "Last name",
            PublicApplicationField::AuthorFirstname => "First name",
            PublicApplicationField::AuthorMiddlename => "Middle name",
            PublicApplicationField::AuthorPhone => "Phone",
            PublicApplicationField::AuthorEmail => "Email",
            PublicApplicationField::Company => "Customer organisation",
            PublicApplicationField::CompanyContacts => "Customer contacts",
            PublicApplicationField::TargetInstitutes => "Target institutes",
            PublicApplicationField::ProblemHolder => "Problem holder",
            PublicApplicationField::Goal => "Goal",
            PublicApplicationField::Barrier => "Barrier",
            PublicApplicationField::ExistingSolutions => "Existing solutions",
        }
    }

    fn is_multiline(self) -> bool {
        matches!(
            self,
            PublicApplicationField::CompanyContacts
                | PublicApplicationField::Goal
                | PublicApplicationField::Barrier
                | PublicApplicationField::ExistingSolutions
        )
    }

    fn initial(self) -> FieldValue {
        match self {
            PublicApplicationField::TargetInstitutes => FieldValue::Choices(Vec::new()),
            _ => FieldValue::default(),
        }
    }
}

pub type PublicApplicationForm = FormState<PublicApplicationField>;

pub const PUBLIC_APPLICATION_STEPS: &[(&str, &[PublicApplicationField])] = &[
    (
        "About you",
        &[
            PublicApplicationField::AuthorLastname,
            PublicApplicationField::AuthorFirstname,
            PublicApplicationField::AuthorMiddlename,
            PublicApplicationField::AuthorPhone,
            PublicApplicationField::AuthorEmail,
        ],
    ),
    (
        "Customer",
        &[
            PublicApplicationField::Company,
            PublicApplicationField::CompanyContacts,
            PublicApplicationField::TargetInstitutes,
        ],
    ),
    (
        "Problem",
        &[
            PublicApplicationField::ProblemHolder,
            PublicApplicationField::Goal,
            PublicApplicationField::Barrier,
            PublicApplicationField::ExistingSolutions,
        ],
    ),
];

pub const PUBLIC_APPLICATION_REQUIRED: &[PublicApplicationField] = &[
    PublicApplicationField::AuthorLastname,
    PublicApplicationField::AuthorFirstname,
    PublicApplicationField::AuthorPhone,
    PublicApplicationField::AuthorEmail,
    PublicApplicationField::Company,
    PublicApplicationField::CompanyContacts,
    PublicApplicationField::ProblemHolder,
    PublicApplicationField::Goal,
    PublicApplicationField::Barrier,
];

pub fn public_application_form() -> PublicApplicationForm {
    use PublicApplicationField as F;
    FormState::new(
        Schema::new()
            .field(F::AuthorLastname, [required("Enter your last name")])
            .field(F::AuthorFirstname, [required("Enter your first name")])
            .field(F::AuthorPhone, [required("Enter your phone")])
            .field(
                F::AuthorEmail,
                [
                    required("Enter your email"),
                    email_format("Invalid email address"),
                ],
            )
            .field(F::Company, [required("Enter the customer organisation")])
            .field(F::CompanyContacts, [required("Enter the customer contacts")])
            .field(F::ProblemHolder, [required("Enter the problem holder")])
            .field(F::Goal, [required("Describe the goal")])
            .field(F::Barrier, [required("Describe the barrier")]),
    )
}

/// Anonymous payloads carry full institute objects, not codes
pub fn public_application_request(form: &PublicApplicationForm) -> CreatePublicApplication {
    use PublicApplicationField as F;
    let text = |f| form.text(f).trim().to_string();
    CreatePublicApplication {
        author_firstname: text(F::AuthorFirstname),
        author_middlename: text(F::AuthorMiddlename),
        author_lastname: text(F::AuthorLastname),
        author_phone: text(F::AuthorPhone),
        author_email: text(F::AuthorEmail),
        company: text(F::Company),
        company_contacts: text(F::CompanyContacts),
        target_institutes: form
            .value(F::TargetInstitutes)
            .map(FieldValue::as_choices)
            .unwrap_or_default()
            .iter()
            .map(|c| Institute {
                code: c.value.clone(),
                name: c.label.clone(),
            })
            .collect(),
        problem_holder: text(F::ProblemHolder),
        goal: text(F::Goal),
        barrier: text(F::Barrier),
        existing_solutions: text(F::ExistingSolutions),
    }
}

// Single-field forms: comment and rejection reason

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentField {
    Text,
}

impl FormFields for CommentField {
    const ALL: &'static [Self] = &[CommentField::Text];

    fn name(self) -> &'static str {
        "text"
    }

    fn label(self) -> &'static str {
        "Comment"
    }

    fn is_multiline(self) -> bool {
        true
    }
}

pub type CommentForm = FormState<CommentField>;

pub fn comment_form() -> CommentForm {
    FormState::new(Schema::new().field(CommentField::Text, [required("Comment cannot be empty")]))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReasonField {
    Reason,
}

impl FormFields for ReasonField {
    const ALL: &'static [Self] = &[ReasonField::Reason];

    fn name(self) -> &'static str {
        "reason"
    }

    fn label(self) -> &'static str {
        "Reason"
    }

    fn is_multiline(self) -> bool {
        true
    }
}

pub type ReasonForm = FormState<ReasonField>;

pub fn reason_form() -> ReasonForm {
    FormState::new(Schema::new().field(ReasonField::Reason, [required("State the reason")]))
}

// Registration approval

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApproveUserField {
    Role,
    Department,
}

impl FormFields for ApproveUserField {
    const ALL: &'static [Self] = &[ApproveUserField::Role, ApproveUserField::Department];

    fn name(self) -> &'static str {
        match self {
            ApproveUserField::Role => "role_id",
            ApproveUserField::Department => "department_id",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ApproveUserField::Role => "Role",
            ApproveUserField::Department => "Department",
        }
    }

    fn initial(self) -> FieldValue {
        FieldValue::Choice(None)
    }
}

pub type ApproveUserForm = FormState<ApproveUserField>;

pub const APPROVE_USER_REQUIRED: &[ApproveUserField] =
    &[ApproveUserField::Role, ApproveUserField::Department];

pub fn approve_user_form() -> ApproveUserForm {
    FormState::new(Schema::new())
}

/// Step through `options` from the field's current choice (wrapping)
pub fn cycle_choice(current: Option<&Choice>, options: &[Choice], forward: bool) -> Option<Choice> {
    if options.is_empty() {
        return None;
    }
    let position = current.and_then(|c| options.iter().position(|o| o.value == c.value));
    let next = match (position, forward) {
        (None, _) => 0,
        (Some(i), true) => (i + 1) % options.len(),
        (Some(0), false) => options.len() - 1,
        (Some(i), false) => i - 1,
    };
    options.get(next).cloned()
}

/// Add or remove `choice` from a multi-select value
pub fn toggle_choice(selected: &[Choice], choice: &Choice) -> Vec<Choice> {
    if selected.iter().any(|c| c.value == choice.value) {
        selected
            .iter()
            .filter(|c| c.value != choice.value)
            .cloned()
            .collect()
    } else {
        let mut out = selected.to_vec();
        out.push(choice.clone());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::models::{Application, Department};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_login_form_gate() {
        let mut form = login_form();
        assert!(form.blocks_submit(LOGIN_REQUIRED));
        form.set_value(LoginField::Email, "student@uni.ru");
        form.set_value(LoginField::Password, "pw");
        assert!(!form.blocks_submit(LOGIN_REQUIRED));
        assert_eq!(
            login_request(&form),
            LoginRequest {
                email: "student@uni.ru".into(),
                password: "pw".into()
            }
        );
    }

    #[test]
    fn test_registration_optional_fields_unvalidated() {
        let mut form = registration_form();
        form.set_value(RegistrationField::MiddleName, "");
        form.set_value(RegistrationField::Comment, "");
        assert!(form.errors().is_empty());
    }

    #[test]
    fn test_application_steps_cover_every_field_once() {
        let seen: Vec<ApplicationField> = APPLICATION_STEPS
            .iter()
            .flat_map(|(_, fields)| fields.iter().copied())
            .collect();
        let unique: std::collections::HashSet<_> = seen.iter().copied().collect();
        assert_eq!(seen.len(), ApplicationField::ALL.len());
        assert_eq!(unique.len(), ApplicationField::ALL.len());
    }

    #[test]
    fn test_public_steps_cover_every_field() {
        let count: usize = PUBLIC_APPLICATION_STEPS.iter().map(|(_, f)| f.len()).sum();
        assert_eq!(count, PublicApplicationField::ALL.len());
    }

    #[test]
    fn test_application_initial_values() {
        let form = application_form();
        let level = form
            .value(ApplicationField::ProjectLevel)
            .and_then(FieldValue::as_choice)
            .map(|c| c.label.clone());
        assert_eq!(level.as_deref(), Some("L1"));
        assert!(!form.flag(ApplicationField::NeedsConsultation));
    }

    #[test]
    fn test_create_payload_stamps_author() {
        let mut form = application_form();
        form.set_value(ApplicationField::Title, "Drone mapping");
        form.set_selected(
            ApplicationField::TargetInstitutes,
            FieldValue::Choices(vec![Choice::new("IIT", "IT institute")]),
        );
        form.set_checked(ApplicationField::NeedsConsultation);
        let author = User {
            id: 9,
            first_name: "Anna".into(),
            role: "student".into(),
            department: Department {
                id: 1,
                name: "Robotics".into(),
                short_name: "R".into(),
            },
            ..Default::default()
        };
        let payload = create_application_request(&form, &author);
        assert_eq!(payload.author, 9);
        assert_eq!(payload.author_division, "Robotics");
        assert_eq!(payload.title, "Drone mapping");
        assert_eq!(payload.project_level, "L1");
        assert_eq!(payload.target_institutes, vec!["IIT".to_string()]);
        assert!(payload.needs_consultation);
    }

    #[test]
    fn test_edit_form_population_matches_level_by_name() {
        let detail = ApplicationDetail {
            application: Application {
                title: "Old".into(),
                project_level: "L3".into(),
                target_institutes: vec![Institute {
                    code: "IE".into(),
                    name: "Economics".into(),
                }],
                ..Default::default()
            },
            ..Default::default()
        };
        let form = edit_form_from(&detail);
        assert_eq!(form.text(ApplicationField::Title), "Old");
        assert!(form.errors().is_empty());
        let payload = edit_application_request(&form);
        assert_eq!(payload.project_level, "L3");
        assert_eq!(payload.target_institutes, vec!["IE".to_string()]);
    }

    #[test]
    fn test_edit_form_unknown_level_falls_back_to_first() {
        let detail = ApplicationDetail {
            application: Application {
                project_level: "L9".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        let payload = edit_application_request(&edit_form_from(&detail));
        assert_eq!(payload.project_level, "L1");
    }

    #[test]
    fn test_public_payload_keeps_institute_objects() {
        let mut form = public_application_form();
        form.set_selected(
            PublicApplicationField::TargetInstitutes,
            FieldValue::Choices(vec![Choice::new("IIT", "IT institute")]),
        );
        let payload = public_application_request(&form);
        assert_eq!(
            payload.target_institutes,
            vec![Institute {
                code: "IIT".into(),
                name: "IT institute".into()
            }]
        );
    }

    #[test]
    fn test_reason_form_requires_text() {
        let mut form = reason_form();
        assert!(form.blocks_submit(&[ReasonField::Reason]));
        form.set_value(ReasonField::Reason, "  ");
        assert_eq!(form.error(ReasonField::Reason), Some("State the reason"));
        form.set_value(ReasonField::Reason, "Duplicate project");
        assert!(!form.blocks_submit(&[ReasonField::Reason]));
    }

    #[test]
    fn test_approve_form_requires_both_choices() {
        let mut form = approve_user_form();
        assert!(form.blocks_submit(APPROVE_USER_REQUIRED));
        form.set_selected(
            ApproveUserField::Role,
            FieldValue::Choice(Some(Choice::new("expert", "Expert"))),
        );
        assert!(form.blocks_submit(APPROVE_USER_REQUIRED));
        form.set_selected(
            ApproveUserField::Department,
            FieldValue::Choice(Some(Choice::new("2", "Math"))),
        );
        assert!(!form.blocks_submit(APPROVE_USER_REQUIRED));
    }

    #[test]
    fn test_cycle_choice_wraps() {
        let options = vec![Choice::new("1", "a"), Choice::new("2", "b")];
        assert_eq!(cycle_choice(None, &options, true), Some(options[0].clone()));
        assert_eq!(
            cycle_choice(Some(&options[1]), &options, true),
            Some(options[0].clone())
        );
        assert_eq!(
            cycle_choice(Some(&options[0]), &options, false),
            Some(options[1].clone())
        );
        assert_eq!(cycle_choice(None, &[], true), None);
    }

    #[test]
    fn test_toggle_choice() {
        let a = Choice::new("a", "A");
        let b = Choice::new("b", "B");
        let selected = toggle_choice(&[a.clone()], &b);
        assert_eq!(selected, vec![a.clone(), b.clone()]);
        assert_eq!(toggle_choice(&selected, &a), vec![b]);
    }
}
