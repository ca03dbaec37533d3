//! Value types shared by the registry crates.
//!
//! These are deliberately small: a trimmed, never-empty text wrapper used for mandatory record
//! fields, and the `(token, label)` / `(id, name)` pairs that flow between the persistence layer,
//! the forms layer and whatever renders a selection widget.

use serde::{Deserialize, Serialize};

/// Errors raised when constructing validated text.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input was empty or whitespace only.
    #[error("Text cannot be empty")]
    Empty,
}

/// Text that is guaranteed to contain at least one non-whitespace character.
///
/// Leading and trailing whitespace is removed on construction, so two submissions that differ only
/// by padding produce equal values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Trims `input` and wraps it, rejecting blank input with [`TextError::Empty`].
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl TryFrom<String> for NonEmptyText {
    type Error = TextError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A single `(token, label)` option of a selection widget.
///
/// `token` is what the browser submits back; `label` is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub token: String,
    pub label: String,
}

impl Choice {
    pub fn new(token: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            label: label.into(),
        }
    }

    /// The `("", "(Any)")` sentinel placed at the top of search-form choice lists.
    pub fn blank() -> Self {
        Self::new("", "(Any)")
    }

    pub fn is_blank(&self) -> bool {
        self.token.is_empty()
    }
}

/// A row of reference data (center, patient, attendee, procedure, mesh type) as supplied by the
/// persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceItem {
    pub id: i64,
    pub name: String,
}

impl ReferenceItem {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl From<&ReferenceItem> for Choice {
    fn from(item: &ReferenceItem) -> Self {
        Choice::new(item.id.to_string(), item.name.clone())
    }
}
