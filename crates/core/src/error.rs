use serde::Serialize;

/// Errors raised by the registry core outside of per-field validation.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("unknown form: {0}")]
    UnknownForm(String),
    #[error("unknown enumeration: {0}")]
    UnknownEnum(String),
    #[error("storage failure: {0}")]
    Storage(#[from] StorageError),
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;

/// Failures reported by the persistence collaborator.
///
/// These are never turned into field errors; callers surface them as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// A submitted token that maps to no variant of a closed choice set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChoiceError {
    #[error("'{token}' is not a valid choice for {choice}")]
    InvalidChoice { choice: &'static str, token: String },
}

impl ChoiceError {
    pub fn invalid(choice: &'static str, token: impl Into<String>) -> Self {
        ChoiceError::InvalidChoice {
            choice,
            token: token.into(),
        }
    }
}

/// Category of a field-level validation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// Token does not map to any known choice.
    InvalidChoice,
    /// Mandatory field left empty.
    Required,
    InvalidNumber,
    InvalidDate,
    /// Description missing while its gating flag is set.
    RequiredWhenFlagged,
    /// Value supplied while its gating flag is not set.
    ForbiddenWhenUnflagged,
    /// Numeric value outside its permitted range.
    InvalidRange,
    /// Confirmation field does not match its original.
    Mismatch,
    WeakPassword,
}

/// A single `(field, kind, message)` validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub kind: ErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }
}

/// Why a raw value could not be coerced into a field's type.
///
/// Carries no field name; [`crate::fields::Field`] attaches its own name when reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub kind: ErrorKind,
    pub message: String,
}

impl Rejection {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<ChoiceError> for Rejection {
    fn from(err: ChoiceError) -> Self {
        Rejection::new(ErrorKind::InvalidChoice, err.to_string())
    }
}

/// The full error set of one validation pass, in field declaration order followed by
/// cross-field rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
        self.0.iter()
    }

    /// Errors attached to `field`, in the order they were raised.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldError> + 'a {
        self.0.iter().filter(move |e| e.field == field)
    }

    pub fn has_kind(&self, field: &str, kind: ErrorKind) -> bool {
        self.for_field(field).any(|e| e.kind == kind)
    }
}

impl Extend<FieldError> for ValidationErrors {
    fn extend<T: IntoIterator<Item = FieldError>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldError;
    type IntoIter = std::slice::Iter<'a, FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
