//! Form fields and raw submission data.
//!
//! A [`Field`] is a named, typed slot. Binding copies the raw submitted string into the field and
//! coerces it; a coercion failure is kept on the field as a [`Rejection`] instead of being
//! raised, so every other field still binds. Validation later turns rejections, missing required
//! values and out-of-list selections into [`FieldError`]s.

use crate::choices::{bool_token, coerce_bool};
use crate::constants::{DATE_FORMAT, NOT_A_VALID_CHOICE_MESSAGE, REQUIRED_MESSAGE};
use crate::error::{ErrorKind, FieldError, Rejection, ValidationErrors};
use crate::{RegistryError, RegistryResult};
use chrono::NaiveDate;
use registry_types::Choice;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Raw key/value pairs of one form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData(BTreeMap<String, String>);

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build form data from `key=value` arguments. The value may itself contain `=`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidInput`] for an argument without `=` or with an empty key.
    pub fn parse_pairs<I, S>(pairs: I) -> RegistryResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut data = Self::new();
        for pair in pairs {
            let pair = pair.as_ref();
            match pair.split_once('=') {
                Some((key, value)) if !key.trim().is_empty() => {
                    data.insert(key.trim(), value);
                }
                _ => {
                    return Err(RegistryError::InvalidInput(format!(
                        "expected key=value, got '{pair}'"
                    )))
                }
            }
        }
        Ok(data)
    }
}

impl From<HashMap<String, String>> for FormData {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map.into_iter().collect())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// A type a field can hold.
pub trait FieldValue: Clone + std::fmt::Debug {
    /// Coerce a non-blank raw string.
    fn coerce(raw: &str) -> Result<Self, Rejection>;

    /// The token this value is displayed and re-submitted as.
    fn render(&self) -> String;
}

impl FieldValue for String {
    fn coerce(raw: &str) -> Result<Self, Rejection> {
        Ok(raw.to_owned())
    }

    fn render(&self) -> String {
        self.clone()
    }
}

impl FieldValue for i64 {
    fn coerce(raw: &str) -> Result<Self, Rejection> {
        raw.trim()
            .parse::<i64>()
            .map_err(|_| Rejection::new(ErrorKind::InvalidNumber, "Not a valid integer value"))
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

impl FieldValue for bool {
    fn coerce(raw: &str) -> Result<Self, Rejection> {
        match coerce_bool(Some(raw))? {
            Some(value) => Ok(value),
            None => Err(Rejection::new(
                ErrorKind::InvalidChoice,
                NOT_A_VALID_CHOICE_MESSAGE,
            )),
        }
    }

    fn render(&self) -> String {
        bool_token(*self).to_owned()
    }
}

impl FieldValue for NaiveDate {
    fn coerce(raw: &str) -> Result<Self, Rejection> {
        NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
            .map_err(|_| Rejection::new(ErrorKind::InvalidDate, "Not a valid date value"))
    }

    fn render(&self) -> String {
        self.format(DATE_FORMAT).to_string()
    }
}

/// Serialisable view of one field for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    pub name: String,
    pub label: String,
    /// The submitted value, or the rendered pre-populated value when nothing was submitted.
    pub value: Option<String>,
    pub required: bool,
    pub readonly: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<Choice>>,
    pub errors: Vec<String>,
}

/// Object-safe view of a field, so forms can iterate heterogeneous fields.
pub trait FormField {
    fn name(&self) -> &'static str;
    fn bind(&mut self, data: &FormData);
    fn check(&self, errors: &mut ValidationErrors);
    fn view(&self) -> FieldView;
}

/// A named, typed form field.
#[derive(Debug, Clone)]
pub struct Field<T> {
    name: &'static str,
    label: &'static str,
    required: bool,
    readonly: bool,
    choices: Option<Vec<Choice>>,
    raw: Option<String>,
    value: Option<T>,
    rejection: Option<Rejection>,
}

impl<T: FieldValue> Field<T> {
    pub fn new(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            required: false,
            readonly: false,
            choices: None,
            raw: None,
            value: None,
            rejection: None,
        }
    }

    /// Mark the field as mandatory.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn readonly(mut self) -> Self {
        self.readonly = true;
        self
    }

    /// Restrict the field to a choice list. A non-empty value outside the list is rejected.
    pub fn with_choices(mut self, choices: Vec<Choice>) -> Self {
        self.choices = Some(choices);
        self
    }

    /// Pre-populate the field, e.g. from a persisted record or a default.
    pub fn with_value(mut self, value: Option<T>) -> Self {
        self.set(value);
        self
    }

    pub fn set(&mut self, value: Option<T>) {
        self.raw = value.as_ref().map(FieldValue::render);
        self.value = value;
        self.rejection = None;
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn choices(&self) -> Option<&[Choice]> {
        self.choices.as_deref()
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        self.rejection.as_ref()
    }

    fn error(&self, kind: ErrorKind, message: impl Into<String>) -> FieldError {
        FieldError::new(self.name, kind, message)
    }
}

impl Field<String> {
    /// The text value, or `""` when empty.
    pub fn text(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    pub fn is_blank(&self) -> bool {
        self.text().trim().is_empty()
    }
}

impl Field<bool> {
    /// `true` only when the field holds an explicit true value.
    pub fn is_true(&self) -> bool {
        self.value == Some(true)
    }
}

impl<T: FieldValue> FormField for Field<T> {
    fn name(&self) -> &'static str {
        self.name
    }

    /// Keys absent from `data` leave the current value alone. A present key replaces it; blank
    /// input means "no value".
    fn bind(&mut self, data: &FormData) {
        let Some(raw) = data.get(self.name) else {
            return;
        };

        self.raw = Some(raw.to_owned());
        self.rejection = None;
        self.value = None;

        if raw.trim().is_empty() {
            return;
        }

        match T::coerce(raw) {
            Ok(value) => self.value = Some(value),
            Err(rejection) => self.rejection = Some(rejection),
        }
    }

    fn check(&self, errors: &mut ValidationErrors) {
        if let Some(rejection) = &self.rejection {
            errors.push(self.error(rejection.kind, rejection.message.clone()));
            return;
        }

        let Some(value) = &self.value else {
            if self.required {
                errors.push(self.error(ErrorKind::Required, REQUIRED_MESSAGE));
            }
            return;
        };

        if let Some(choices) = &self.choices {
            let token = value.render();
            let token = token.trim();
            if !choices.iter().any(|c| !c.is_blank() && c.token == token) {
                errors.push(self.error(ErrorKind::InvalidChoice, NOT_A_VALID_CHOICE_MESSAGE));
            }
        }
    }

    fn view(&self) -> FieldView {
        FieldView {
            name: self.name.to_owned(),
            label: self.label.to_owned(),
            value: self.raw.clone(),
            required: self.required,
            readonly: self.readonly,
            choices: self.choices.clone(),
            errors: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pairs_splits_on_first_equals() {
        let data = FormData::parse_pairs(["name=Jane Doe", "comments=a=b", "empty="])
            .expect("pairs should parse");
        assert_eq!(data.get("name"), Some("Jane Doe"));
        assert_eq!(data.get("comments"), Some("a=b"));
        assert_eq!(data.get("empty"), Some(""));
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn parse_pairs_rejects_missing_equals() {
        let err = FormData::parse_pairs(["name"]).expect_err("should reject");
        assert!(matches!(err, RegistryError::InvalidInput(msg) if msg.contains("key=value")));
        assert!(FormData::parse_pairs(["=value"]).is_err());
    }

    #[test]
    fn binding_keeps_raw_value_and_coerces() {
        let mut field = Field::<i64>::new("age", "Age");
        field.bind(&FormData::new().with("age", " 42 "));
        assert_eq!(field.raw(), Some(" 42 "));
        assert_eq!(field.value(), Some(&42));

        let mut errors = ValidationErrors::new();
        field.check(&mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn coercion_failure_is_kept_on_the_field() {
        let mut field = Field::<i64>::new("age", "Age");
        field.bind(&FormData::new().with("age", "forty"));
        assert_eq!(field.value(), None);
        assert_eq!(field.raw(), Some("forty"));

        let mut errors = ValidationErrors::new();
        field.check(&mut errors);
        assert!(errors.has_kind("age", ErrorKind::InvalidNumber));
    }

    #[test]
    fn absent_key_keeps_prepopulated_value() {
        let mut field = Field::<String>::new("name", "Name").with_value(Some("Ada".into()));
        field.bind(&FormData::new().with("other", "x"));
        assert_eq!(field.text(), "Ada");

        field.bind(&FormData::new().with("name", ""));
        assert_eq!(field.value(), None);
        assert_eq!(field.raw(), Some(""));
    }

    #[test]
    fn required_field_reports_missing_value() {
        let mut field = Field::<String>::new("name", "Name").required();
        field.bind(&FormData::new().with("name", "   "));

        let mut errors = ValidationErrors::new();
        field.check(&mut errors);
        assert!(errors.has_kind("name", ErrorKind::Required));
    }

    #[test]
    fn select_rejects_values_outside_choice_list() {
        let choices = vec![Choice::blank(), Choice::new("1", "Kisiizi"), Choice::new("2", "Mbarara")];
        let mut field = Field::<String>::new("center_id", "Center").with_choices(choices);

        field.bind(&FormData::new().with("center_id", "2"));
        let mut errors = ValidationErrors::new();
        field.check(&mut errors);
        assert!(errors.is_empty());

        field.bind(&FormData::new().with("center_id", "7"));
        let mut errors = ValidationErrors::new();
        field.check(&mut errors);
        assert!(errors.has_kind("center_id", ErrorKind::InvalidChoice));

        field.bind(&FormData::new().with("center_id", ""));
        let mut errors = ValidationErrors::new();
        field.check(&mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn bool_and_date_fields_coerce() {
        let mut flag = Field::<bool>::new("infection", "Infection?");
        flag.bind(&FormData::new().with("infection", "True"));
        assert!(flag.is_true());

        flag.bind(&FormData::new().with("infection", "perhaps"));
        let mut errors = ValidationErrors::new();
        flag.check(&mut errors);
        assert!(errors.has_kind("infection", ErrorKind::InvalidChoice));

        let mut date = Field::<NaiveDate>::new("date", "Date");
        date.bind(&FormData::new().with("date", "2019-03-31"));
        assert_eq!(date.value(), NaiveDate::from_ymd_opt(2019, 3, 31).as_ref());

        date.bind(&FormData::new().with("date", "31/03/2019"));
        let mut errors = ValidationErrors::new();
        date.check(&mut errors);
        assert!(errors.has_kind("date", ErrorKind::InvalidDate));
    }

    #[test]
    fn view_exposes_raw_value_and_choices() {
        let field = Field::<bool>::new("active", "Active")
            .with_choices(crate::choices::choices_for_bool())
            .with_value(Some(true));
        let view = field.view();
        assert_eq!(view.value.as_deref(), Some("True"));
        assert_eq!(view.choices.map(|c| c.len()), Some(2));
    }
}
