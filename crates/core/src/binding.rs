//! Request binding state machine.
//!
//! A submission moves `Unbound → Bound → Validated`:
//!
//! - [`Submission<F, Unbound>`] holds defaults or values pre-populated from a record.
//! - [`Submission::bind`] consumes it and copies the raw submission into every field.
//! - [`Submission::validate`] consumes the bound submission and yields [`Validated::Valid`] or
//!   [`Validated::Invalid`] with the complete error set.
//!
//! Each transition consumes `self`, so a form cannot be validated before it is bound or bound
//! twice. [`Submission::errors`] is available on a bound submission for re-checking without
//! consuming it; it recomputes the same set every time.
//!
//! Nothing here performs I/O. Whatever the caller persists on `Valid` is the whole bound form;
//! on `Invalid` the caller re-renders [`Validated::report`], which still carries every submitted
//! value.

use crate::error::ValidationErrors;
use crate::fields::{FieldView, FormData};
use crate::forms::{Form, FormKind};
use serde::Serialize;
use std::marker::PhantomData;

// ============================================================================
// TYPE-STATE MARKERS
// ============================================================================

/// Marker type: no submission has been applied yet.
#[derive(Clone, Copy, Debug)]
pub struct Unbound;

/// Marker type: raw submitted values have been copied into the fields.
#[derive(Clone, Copy, Debug)]
pub struct Bound;

// ============================================================================
// SUBMISSION
// ============================================================================

/// One form being processed for one request.
#[derive(Clone, Debug)]
pub struct Submission<F, S> {
    form: F,
    state: PhantomData<S>,
}

impl<F: Form, S> Submission<F, S> {
    pub fn form(&self) -> &F {
        &self.form
    }
}

impl<F: Form> Submission<F, Unbound> {
    pub fn new(form: F) -> Self {
        Self {
            form,
            state: PhantomData,
        }
    }

    /// Apply `data` to every field. Coercion failures stay on their fields.
    pub fn bind(mut self, data: &FormData) -> Submission<F, Bound> {
        self.form.bind(data);
        tracing::debug!(form = %self.form.kind(), keys = data.len(), "bound submission");
        Submission {
            form: self.form,
            state: PhantomData,
        }
    }

    /// Report for displaying the form before anything was submitted.
    pub fn report(&self) -> FormReport {
        FormReport::new(
            self.form.kind(),
            false,
            self.form.views(&ValidationErrors::new()),
            ValidationErrors::new(),
        )
    }
}

impl<F: Form> Submission<F, Bound> {
    /// The complete error set for the bound values.
    pub fn errors(&self) -> ValidationErrors {
        self.form.errors()
    }

    pub fn validate(self) -> Validated<F> {
        let errors = self.errors();
        let kind = self.form.kind();

        if errors.is_empty() {
            tracing::debug!(form = %kind, "submission valid");
            Validated::Valid(self.form)
        } else {
            tracing::debug!(form = %kind, errors = errors.len(), "submission invalid");
            Validated::Invalid {
                form: self.form,
                errors,
            }
        }
    }
}

// ============================================================================
// OUTCOME
// ============================================================================

/// Outcome of validating a bound submission.
#[derive(Clone, Debug)]
pub enum Validated<F> {
    Valid(F),
    Invalid { form: F, errors: ValidationErrors },
}

impl<F: Form> Validated<F> {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validated::Valid(_))
    }

    pub fn form(&self) -> &F {
        match self {
            Validated::Valid(form) | Validated::Invalid { form, .. } => form,
        }
    }

    pub fn into_form(self) -> F {
        match self {
            Validated::Valid(form) | Validated::Invalid { form, .. } => form,
        }
    }

    /// The error set; empty for a valid submission.
    pub fn errors(&self) -> ValidationErrors {
        match self {
            Validated::Valid(_) => ValidationErrors::new(),
            Validated::Invalid { errors, .. } => errors.clone(),
        }
    }

    pub fn report(&self) -> FormReport {
        let errors = self.errors();
        FormReport::new(
            self.form().kind(),
            true,
            self.form().views(&errors),
            errors,
        )
    }
}

// ============================================================================
// REPORT
// ============================================================================

/// The bound snapshot handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormReport {
    pub form: FormKind,
    /// Whether a submission has been applied.
    pub bound: bool,
    /// `true` only for a bound submission with no errors.
    pub valid: bool,
    pub fields: Vec<FieldView>,
    pub errors: ValidationErrors,
}

impl FormReport {
    fn new(form: FormKind, bound: bool, fields: Vec<FieldView>, errors: ValidationErrors) -> Self {
        Self {
            form,
            bound,
            valid: bound && errors.is_empty(),
            fields,
            errors,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldView> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Submitted (or pre-populated) value of `name`.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.field(name).and_then(|f| f.value.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::forms::LoginForm;

    #[test]
    fn unbound_report_has_no_errors_and_is_not_valid() {
        let report = Submission::new(LoginForm::new()).report();
        assert!(!report.bound);
        assert!(!report.valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn valid_submission_keeps_values() {
        let data = FormData::new()
            .with("username", "clerk@example.org")
            .with("password", "hunter2")
            .with("remember_me", "on");
        let outcome = Submission::new(LoginForm::new()).bind(&data).validate();
        assert!(outcome.is_valid());

        let form = outcome.into_form();
        assert_eq!(form.username.text(), "clerk@example.org");
        assert!(form.remember_me.is_true());
    }

    #[test]
    fn invalid_submission_carries_errors_and_values() {
        let data = FormData::new()
            .with("username", "clerk@example.org")
            .with("remember_me", "sometimes");
        let outcome = Submission::new(LoginForm::new()).bind(&data).validate();
        assert!(!outcome.is_valid());

        let errors = outcome.errors();
        assert!(errors.has_kind("password", ErrorKind::Required));
        assert!(errors.has_kind("remember_me", ErrorKind::InvalidChoice));

        let report = outcome.report();
        assert_eq!(report.value("username"), Some("clerk@example.org"));
        assert_eq!(report.value("remember_me"), Some("sometimes"));
    }

    #[test]
    fn errors_are_idempotent() {
        let bound = Submission::new(LoginForm::new()).bind(&FormData::new());
        let first = bound.errors();
        let second = bound.errors();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }
}
