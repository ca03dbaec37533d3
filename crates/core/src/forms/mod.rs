//! Form definitions.
//!
//! Every form is a plain struct of [`Field`](crate::fields::Field)s. The [`Form`] trait lets the
//! binding state machine treat them uniformly: bind each field, check each field, then run the
//! form's cross-field rules.

pub mod event;
pub mod patient;
pub mod user;

use crate::binding::{FormReport, Submission};
use crate::config::CoreConfig;
use crate::error::{FieldError, RegistryError, ValidationErrors};
use crate::fields::{FieldView, FormData, FormField};
use crate::reference::FormChoices;
use serde::Serialize;

pub use event::{DischargeForm, EventForm, FollowupForm, InguinalMeshHerniaRepairForm};
pub use patient::{PatientEditForm, PatientSearchForm};
pub use user::{LoginForm, UserCreateForm, UserEditForm};

/// A bindable, validatable set of fields.
pub trait Form {
    fn kind(&self) -> FormKind;

    /// Fields in declaration order.
    fn fields(&self) -> Vec<&dyn FormField>;

    fn fields_mut(&mut self) -> Vec<&mut dyn FormField>;

    /// Errors from rules spanning more than one field. Must not mutate the form.
    fn cross_field_errors(&self) -> Vec<FieldError> {
        Vec::new()
    }

    /// Copy submitted values into every field. Each field binds independently.
    fn bind(&mut self, data: &FormData) {
        for field in self.fields_mut() {
            field.bind(data);
        }
    }

    /// Recompute the full error set: field checks first, then cross-field rules.
    fn errors(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        for field in self.fields() {
            field.check(&mut errors);
        }
        errors.extend(self.cross_field_errors());
        errors
    }

    /// Field views with each field's messages from `errors` attached.
    fn views(&self, errors: &ValidationErrors) -> Vec<FieldView> {
        self.fields()
            .into_iter()
            .map(|field| {
                let mut view = field.view();
                view.errors = errors
                    .for_field(field.name())
                    .map(|e| e.message.clone())
                    .collect();
                view
            })
            .collect()
    }
}

impl<F: Form + ?Sized> Form for Box<F> {
    fn kind(&self) -> FormKind {
        (**self).kind()
    }

    fn fields(&self) -> Vec<&dyn FormField> {
        (**self).fields()
    }

    fn fields_mut(&mut self) -> Vec<&mut dyn FormField> {
        (**self).fields_mut()
    }

    fn cross_field_errors(&self) -> Vec<FieldError> {
        (**self).cross_field_errors()
    }

    fn bind(&mut self, data: &FormData) {
        (**self).bind(data)
    }

    fn errors(&self) -> ValidationErrors {
        (**self).errors()
    }

    fn views(&self, errors: &ValidationErrors) -> Vec<FieldView> {
        (**self).views(errors)
    }
}

/// Every form the registry knows, addressable by a stable slug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormKind {
    Login,
    UserCreate,
    UserEdit,
    Patient,
    PatientSearch,
    Event,
    Discharge,
    Followup,
    InguinalMeshHerniaRepair,
}

impl FormKind {
    pub const ALL: [FormKind; 9] = [
        FormKind::Login,
        FormKind::UserCreate,
        FormKind::UserEdit,
        FormKind::Patient,
        FormKind::PatientSearch,
        FormKind::Event,
        FormKind::Discharge,
        FormKind::Followup,
        FormKind::InguinalMeshHerniaRepair,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FormKind::Login => "login",
            FormKind::UserCreate => "user-create",
            FormKind::UserEdit => "user-edit",
            FormKind::Patient => "patient",
            FormKind::PatientSearch => "patient-search",
            FormKind::Event => "event",
            FormKind::Discharge => "discharge",
            FormKind::Followup => "followup",
            FormKind::InguinalMeshHerniaRepair => "inguinal-mesh-hernia-repair",
        }
    }

    /// A fresh, unbound instance of this form.
    pub fn build(self, choices: &FormChoices, cfg: &CoreConfig) -> Box<dyn Form + Send> {
        match self {
            FormKind::Login => Box::new(LoginForm::new()),
            FormKind::UserCreate => Box::new(UserCreateForm::new(choices, cfg)),
            FormKind::UserEdit => Box::new(UserEditForm::new(choices, cfg)),
            FormKind::Patient => Box::new(PatientEditForm::new(choices)),
            FormKind::PatientSearch => Box::new(PatientSearchForm::new(choices)),
            FormKind::Event => Box::new(EventForm::new(choices)),
            FormKind::Discharge => Box::new(DischargeForm::new(choices)),
            FormKind::Followup => Box::new(FollowupForm::new(choices)),
            FormKind::InguinalMeshHerniaRepair => {
                Box::new(InguinalMeshHerniaRepairForm::new(choices))
            }
        }
    }

    /// Report for an empty form, as shown before anything is submitted.
    pub fn blank(self, choices: &FormChoices, cfg: &CoreConfig) -> FormReport {
        Submission::new(self.build(choices, cfg)).report()
    }

    /// Bind and validate `data` against this form.
    pub fn process(self, data: &FormData, choices: &FormChoices, cfg: &CoreConfig) -> FormReport {
        Submission::new(self.build(choices, cfg))
            .bind(data)
            .validate()
            .report()
    }
}

impl std::fmt::Display for FormKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FormKind {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| RegistryError::UnknownForm(s.to_owned()))
    }
}
