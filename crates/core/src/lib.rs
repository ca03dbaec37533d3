//! # Registry Core
//!
//! Form binding and validation for the hernia surgery registry.
//!
//! This crate contains:
//! - Typed choice adapters for clinical enumerations and yes/no flags
//! - Form definitions (login, users, patients, clinical events)
//! - The `Unbound → Bound → Validated` submission state machine
//! - Cross-field clinical validation rules
//!
//! **No API concerns**: HTTP handlers and the command line live in `api-rest` and `cli`.
//! Persistence is reached only through the [`ReferenceData`] and [`RecordStore`] traits.

pub mod binding;
pub mod choices;
pub mod clinical;
pub mod config;
pub mod constants;
pub mod error;
pub mod fields;
pub mod forms;
pub mod password;
pub mod patient;
pub mod reference;
pub mod validation;

pub use binding::{Bound, FormReport, Submission, Unbound, Validated};
pub use choices::ChoiceEnum;
pub use config::CoreConfig;
pub use error::{
    ChoiceError, ErrorKind, FieldError, RegistryError, RegistryResult, StorageError,
    StorageResult, ValidationErrors,
};
pub use fields::{Field, FieldView, FormData, FormField};
pub use forms::{Form, FormKind};
pub use patient::PatientRecord;
pub use reference::{load_choices, FormChoices, RecordStore, ReferenceData};
pub use registry_types::{Choice, NonEmptyText, ReferenceItem, TextError};
