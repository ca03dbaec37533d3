//! Persisted patient record.
//!
//! Only a valid [`PatientEditForm`](crate::forms::PatientEditForm) produces one of these, so the
//! mandatory fields are typed as such.

use registry_types::NonEmptyText;
use serde::{Deserialize, Serialize};

/// Gender tokens accepted by the patient forms, with their display labels.
pub const GENDERS: [(&str, &str); 2] = [("M", "Male"), ("F", "Female")];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    pub name: NonEmptyText,
    pub national_id: Option<String>,
    pub hospital_number: Option<String>,
    pub birth_year: Option<i64>,
    pub age: Option<i64>,
    pub center_id: i64,
    /// One of the [`GENDERS`] tokens.
    pub gender: String,
    pub phone_1: Option<String>,
    pub phone_1_comments: Option<String>,
    pub phone_2: Option<String>,
    pub phone_2_comments: Option<String>,
    pub address: Option<String>,
}

impl PatientRecord {
    /// A record with only the mandatory fields set.
    pub fn new(name: NonEmptyText, center_id: i64, gender: impl Into<String>) -> Self {
        Self {
            name,
            national_id: None,
            hospital_number: None,
            birth_year: None,
            age: None,
            center_id,
            gender: gender.into(),
            phone_1: None,
            phone_1_comments: None,
            phone_2: None,
            phone_2_comments: None,
            address: None,
        }
    }
}
