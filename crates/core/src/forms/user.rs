//! Login and user account forms.

use super::{Form, FormKind};
use crate::choices::choices_for_bool;
use crate::config::CoreConfig;
use crate::error::FieldError;
use crate::fields::{Field, FormField};
use crate::password::{validate_password_strength, validate_passwords_match};
use crate::reference::FormChoices;

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub username: Field<String>,
    pub password: Field<String>,
    pub remember_me: Field<bool>,
}

impl LoginForm {
    pub fn new() -> Self {
        Self {
            username: Field::new("username", "Username").required(),
            password: Field::new("password", "Password").required(),
            remember_me: Field::new("remember_me", "Remember Me"),
        }
    }
}

impl Default for LoginForm {
    fn default() -> Self {
        Self::new()
    }
}

impl Form for LoginForm {
    fn kind(&self) -> FormKind {
        FormKind::Login
    }

    fn fields(&self) -> Vec<&dyn FormField> {
        vec![&self.username, &self.password, &self.remember_me]
    }

    fn fields_mut(&mut self) -> Vec<&mut dyn FormField> {
        vec![&mut self.username, &mut self.password, &mut self.remember_me]
    }
}

/// Registration of a new user. A password is mandatory and must be strong enough.
#[derive(Debug, Clone)]
pub struct UserCreateForm {
    pub name: Field<String>,
    pub email: Field<String>,
    pub center_id: Field<String>,
    pub new_password: Field<String>,
    pub verify_password: Field<String>,
    minimum_password_strength: f64,
}

impl UserCreateForm {
    pub fn new(choices: &FormChoices, cfg: &CoreConfig) -> Self {
        Self {
            name: Field::new("name", "Name").required(),
            email: Field::new("email", "Email").required(),
            center_id: Field::new("center_id", "Center").with_choices(choices.centers(true)),
            new_password: Field::new("new_password", "New Password").required(),
            verify_password: Field::new("verify_password", "Verify Password"),
            minimum_password_strength: cfg.minimum_password_strength(),
        }
    }
}

impl Form for UserCreateForm {
    fn kind(&self) -> FormKind {
        FormKind::UserCreate
    }

    fn fields(&self) -> Vec<&dyn FormField> {
        vec![
            &self.name,
            &self.email,
            &self.center_id,
            &self.new_password,
            &self.verify_password,
        ]
    }

    fn fields_mut(&mut self) -> Vec<&mut dyn FormField> {
        vec![
            &mut self.name,
            &mut self.email,
            &mut self.center_id,
            &mut self.new_password,
            &mut self.verify_password,
        ]
    }

    fn cross_field_errors(&self) -> Vec<FieldError> {
        [
            validate_passwords_match(&self.new_password, &self.verify_password),
            validate_password_strength(&self.new_password, self.minimum_password_strength),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Editing an existing user. The password only changes when a new one is entered.
#[derive(Debug, Clone)]
pub struct UserEditForm {
    pub name: Field<String>,
    pub email: Field<String>,
    pub center_id: Field<String>,
    pub current_password: Field<String>,
    pub new_password: Field<String>,
    pub verify_password: Field<String>,
    pub active: Field<bool>,
    minimum_password_strength: f64,
}

impl UserEditForm {
    pub fn new(choices: &FormChoices, cfg: &CoreConfig) -> Self {
        Self {
            name: Field::new("name", "Name").required(),
            email: Field::new("email", "Email").required(),
            center_id: Field::new("center_id", "Center").with_choices(choices.centers(true)),
            current_password: Field::new("current_password", "Current Password"),
            new_password: Field::new("new_password", "New Password"),
            verify_password: Field::new("verify_password", "Verify Password"),
            active: Field::new("active", "Active")
                .with_choices(choices_for_bool())
                .with_value(Some(true)),
            minimum_password_strength: cfg.minimum_password_strength(),
        }
    }

    /// `true` when the submission asks for a password change.
    pub fn changes_password(&self) -> bool {
        !self.new_password.text().is_empty()
    }
}

impl Form for UserEditForm {
    fn kind(&self) -> FormKind {
        FormKind::UserEdit
    }

    fn fields(&self) -> Vec<&dyn FormField> {
        vec![
            &self.name,
            &self.email,
            &self.center_id,
            &self.current_password,
            &self.new_password,
            &self.verify_password,
            &self.active,
        ]
    }

    fn fields_mut(&mut self) -> Vec<&mut dyn FormField> {
        vec![
            &mut self.name,
            &mut self.email,
            &mut self.center_id,
            &mut self.current_password,
            &mut self.new_password,
            &mut self.verify_password,
            &mut self.active,
        ]
    }

    fn cross_field_errors(&self) -> Vec<FieldError> {
        if !self.changes_password() {
            return Vec::new();
        }

        [
            validate_passwords_match(&self.new_password, &self.verify_password),
            validate_password_strength(&self.new_password, self.minimum_password_strength),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::Submission;
    use crate::error::ErrorKind;
    use crate::fields::FormData;
    use registry_types::ReferenceItem;

    fn choices() -> FormChoices {
        FormChoices {
            centers: vec![ReferenceItem::new(1, "Kisiizi")],
            ..FormChoices::default()
        }
    }

    #[test]
    fn user_create_accepts_matching_strong_password() {
        let data = FormData::new()
            .with("name", "Grace Atim")
            .with("email", "grace@example.org")
            .with("center_id", "1")
            .with("new_password", "Tr0ub4dor&3")
            .with("verify_password", "Tr0ub4dor&3");
        let outcome = Submission::new(UserCreateForm::new(&choices(), &CoreConfig::default()))
            .bind(&data)
            .validate();
        assert!(outcome.is_valid(), "unexpected errors: {:?}", outcome.errors());
    }

    #[test]
    fn user_create_rejects_mismatch_and_weak_password() {
        let data = FormData::new()
            .with("name", "Grace Atim")
            .with("email", "grace@example.org")
            .with("new_password", "abc")
            .with("verify_password", "abd");
        let errors = Submission::new(UserCreateForm::new(&choices(), &CoreConfig::default()))
            .bind(&data)
            .errors();
        assert!(errors.has_kind("verify_password", ErrorKind::Mismatch));
        assert!(errors.has_kind("new_password", ErrorKind::WeakPassword));
    }

    #[test]
    fn user_create_requires_a_password() {
        let data = FormData::new()
            .with("name", "Grace Atim")
            .with("email", "grace@example.org");
        let errors = Submission::new(UserCreateForm::new(&choices(), &CoreConfig::default()))
            .bind(&data)
            .errors();
        assert!(errors.has_kind("new_password", ErrorKind::Required));
    }

    #[test]
    fn user_edit_without_new_password_skips_password_rules() {
        let data = FormData::new()
            .with("name", "Grace Atim")
            .with("email", "grace@example.org")
            .with("verify_password", "left over");
        let outcome = Submission::new(UserEditForm::new(&choices(), &CoreConfig::default()))
            .bind(&data)
            .validate();
        assert!(outcome.is_valid(), "unexpected errors: {:?}", outcome.errors());

        let form = outcome.into_form();
        assert!(form.active.is_true(), "active defaults to true");
    }

    #[test]
    fn user_edit_rejects_unknown_active_token() {
        let data = FormData::new()
            .with("name", "Grace Atim")
            .with("email", "grace@example.org")
            .with("active", "sometimes");
        let errors = Submission::new(UserEditForm::new(&choices(), &CoreConfig::default()))
            .bind(&data)
            .errors();
        assert!(errors.has_kind("active", ErrorKind::InvalidChoice));
    }

    #[test]
    fn user_edit_checks_new_password_against_configured_minimum() {
        let strict = CoreConfig::new(0.9, "registry.test".into()).expect("valid config");
        let data = FormData::new()
            .with("name", "Grace Atim")
            .with("email", "grace@example.org")
            .with("new_password", "Tr0ub4dor&3")
            .with("verify_password", "Tr0ub4dor&3");
        let errors = Submission::new(UserEditForm::new(&choices(), &strict))
            .bind(&data)
            .errors();
        assert!(errors.has_kind("new_password", ErrorKind::WeakPassword));
    }
}
