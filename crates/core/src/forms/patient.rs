//! Patient registration, editing and search forms.

use super::{Form, FormKind};
use crate::constants::NEXT_ACTION_CREATE_EPISODE;
use crate::error::FieldError;
use crate::fields::{Field, FormField};
use crate::patient::{PatientRecord, GENDERS};
use crate::reference::FormChoices;
use crate::validation::non_negative;
use crate::{RegistryError, RegistryResult};
use registry_types::{Choice, NonEmptyText};

fn gender_choices() -> Vec<Choice> {
    GENDERS
        .iter()
        .map(|(token, label)| Choice::new(*token, *label))
        .collect()
}

/// Trimmed text of an optional field, `None` when blank.
fn optional_text(field: &Field<String>) -> Option<String> {
    (!field.is_blank()).then(|| field.text().trim().to_owned())
}

fn contains_ignore_case(haystack: Option<&str>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(&needle.to_lowercase()))
}

// ============================================================================
// EDIT
// ============================================================================

#[derive(Debug, Clone)]
pub struct PatientEditForm {
    pub id: Field<i64>,
    pub name: Field<String>,
    pub national_id: Field<String>,
    pub hospital_number: Field<String>,
    pub birth_year: Field<i64>,
    pub age: Field<i64>,
    pub center_id: Field<String>,
    pub gender: Field<String>,
    pub phone_1: Field<String>,
    pub phone_1_comments: Field<String>,
    pub phone_2: Field<String>,
    pub phone_2_comments: Field<String>,
    pub address: Field<String>,
    pub next_action: Field<String>,
    pub created_by: Field<String>,
    pub created_at: Field<String>,
    pub updated_by: Field<String>,
    pub updated_at: Field<String>,
}

impl PatientEditForm {
    pub fn new(choices: &FormChoices) -> Self {
        Self {
            id: Field::new("id", "Patient Id").readonly(),
            name: Field::new("name", "Name").required(),
            national_id: Field::new("national_id", "National Id"),
            hospital_number: Field::new("hospital_number", "Hospital Number"),
            birth_year: Field::new("birth_year", "Year of Birth"),
            age: Field::new("age", "Age"),
            center_id: Field::new("center_id", "Center")
                .required()
                .with_choices(choices.centers(false)),
            gender: Field::new("gender", "Gender")
                .required()
                .with_choices(gender_choices()),
            phone_1: Field::new("phone_1", "Phone #1 No."),
            phone_1_comments: Field::new("phone_1_comments", "Phone #1 Comments"),
            phone_2: Field::new("phone_2", "Phone #2 No."),
            phone_2_comments: Field::new("phone_2_comments", "Phone #2 Comments"),
            address: Field::new("address", "Address (e.g. Village, District)"),
            next_action: Field::new("next_action", "NextAction"),
            created_by: Field::new("created_by", "Created By").readonly(),
            created_at: Field::new("created_at", "Created At").readonly(),
            updated_by: Field::new("updated_by", "Updated By").readonly(),
            updated_at: Field::new("updated_at", "Updated At").readonly(),
        }
    }

    /// A form pre-populated from a stored record, ready to be bound against an edit submission.
    pub fn from_record(choices: &FormChoices, id: i64, record: &PatientRecord) -> Self {
        let mut form = Self::new(choices);
        form.id.set(Some(id));
        form.name.set(Some(record.name.to_string()));
        form.national_id.set(record.national_id.clone());
        form.hospital_number.set(record.hospital_number.clone());
        form.birth_year.set(record.birth_year);
        form.age.set(record.age);
        form.center_id.set(Some(record.center_id.to_string()));
        form.gender.set(Some(record.gender.clone()));
        form.phone_1.set(record.phone_1.clone());
        form.phone_1_comments.set(record.phone_1_comments.clone());
        form.phone_2.set(record.phone_2.clone());
        form.phone_2_comments.set(record.phone_2_comments.clone());
        form.address.set(record.address.clone());
        form
    }

    /// The record described by a valid form.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidInput`] if a mandatory value is missing or malformed,
    /// which only happens when called on a form that did not validate.
    pub fn to_record(&self) -> RegistryResult<PatientRecord> {
        let name = NonEmptyText::new(self.name.text())
            .map_err(|e| RegistryError::InvalidInput(format!("name: {e}")))?;

        let center = self.center_id.text().trim();
        let center_id = center.parse::<i64>().map_err(|_| {
            RegistryError::InvalidInput(format!("center_id: '{center}' is not a center id"))
        })?;

        let gender = optional_text(&self.gender)
            .ok_or_else(|| RegistryError::InvalidInput("gender: missing".into()))?;

        Ok(PatientRecord {
            name,
            national_id: optional_text(&self.national_id),
            hospital_number: optional_text(&self.hospital_number),
            birth_year: self.birth_year.value().copied(),
            age: self.age.value().copied(),
            center_id,
            gender,
            phone_1: optional_text(&self.phone_1),
            phone_1_comments: optional_text(&self.phone_1_comments),
            phone_2: optional_text(&self.phone_2),
            phone_2_comments: optional_text(&self.phone_2_comments),
            address: optional_text(&self.address),
        })
    }

    /// `true` when the user asked to record an episode straight after saving.
    pub fn creates_episode_next(&self) -> bool {
        self.next_action.text() == NEXT_ACTION_CREATE_EPISODE
    }
}

impl Form for PatientEditForm {
    fn kind(&self) -> FormKind {
        FormKind::Patient
    }

    fn fields(&self) -> Vec<&dyn FormField> {
        vec![
            &self.id,
            &self.name,
            &self.national_id,
            &self.hospital_number,
            &self.birth_year,
            &self.age,
            &self.center_id,
            &self.gender,
            &self.phone_1,
            &self.phone_1_comments,
            &self.phone_2,
            &self.phone_2_comments,
            &self.address,
            &self.next_action,
            &self.created_by,
            &self.created_at,
            &self.updated_by,
            &self.updated_at,
        ]
    }

    fn fields_mut(&mut self) -> Vec<&mut dyn FormField> {
        vec![
            &mut self.id,
            &mut self.name,
            &mut self.national_id,
            &mut self.hospital_number,
            &mut self.birth_year,
            &mut self.age,
            &mut self.center_id,
            &mut self.gender,
            &mut self.phone_1,
            &mut self.phone_1_comments,
            &mut self.phone_2,
            &mut self.phone_2_comments,
            &mut self.address,
            &mut self.next_action,
            &mut self.created_by,
            &mut self.created_at,
            &mut self.updated_by,
            &mut self.updated_at,
        ]
    }

    fn cross_field_errors(&self) -> Vec<FieldError> {
        [non_negative(&self.birth_year), non_negative(&self.age)]
            .into_iter()
            .flatten()
            .collect()
    }
}

// ============================================================================
// SEARCH
// ============================================================================

/// Search criteria. Every field is optional; empty criteria match everything.
#[derive(Debug, Clone)]
pub struct PatientSearchForm {
    pub id: Field<i64>,
    pub name: Field<String>,
    pub national_id: Field<String>,
    pub hospital_number: Field<String>,
    pub birth_year: Field<i64>,
    pub age: Field<i64>,
    pub center_id: Field<String>,
    pub gender: Field<String>,
    pub phone: Field<String>,
    pub address: Field<String>,
}

impl PatientSearchForm {
    pub fn new(choices: &FormChoices) -> Self {
        let genders = std::iter::once(Choice::new("", "Any"))
            .chain(gender_choices())
            .collect();

        Self {
            id: Field::new("id", "Patient Id"),
            name: Field::new("name", "Name"),
            national_id: Field::new("national_id", "National Id"),
            hospital_number: Field::new("hospital_number", "Hospital Number"),
            birth_year: Field::new("birth_year", "Year of Birth"),
            age: Field::new("age", "Age"),
            center_id: Field::new("center_id", "Center").with_choices(choices.centers(true)),
            gender: Field::new("gender", "Gender").with_choices(genders),
            phone: Field::new("phone", "Phone #"),
            address: Field::new("address", "Address (e.g. Village, District)"),
        }
    }

    /// Whether `record` satisfies every non-empty criterion.
    ///
    /// Text criteria match case-insensitive substrings; the phone criterion matches either
    /// number. Center, gender, year of birth and age must be equal.
    pub fn matches(&self, record: &PatientRecord) -> bool {
        let text_criteria = [
            (&self.name, Some(record.name.as_str())),
            (&self.national_id, record.national_id.as_deref()),
            (&self.hospital_number, record.hospital_number.as_deref()),
            (&self.address, record.address.as_deref()),
        ];
        for (field, value) in text_criteria {
            if let Some(needle) = optional_text(field) {
                if !contains_ignore_case(value, &needle) {
                    return false;
                }
            }
        }

        if let Some(needle) = optional_text(&self.phone) {
            if !contains_ignore_case(record.phone_1.as_deref(), &needle)
                && !contains_ignore_case(record.phone_2.as_deref(), &needle)
            {
                return false;
            }
        }

        if let Some(center) = optional_text(&self.center_id) {
            if center != record.center_id.to_string() {
                return false;
            }
        }

        if let Some(gender) = optional_text(&self.gender) {
            if gender != record.gender {
                return false;
            }
        }

        let exact = [
            (self.birth_year.value(), record.birth_year),
            (self.age.value(), record.age),
        ];
        exact
            .into_iter()
            .all(|(wanted, actual)| wanted.map_or(true, |w| Some(*w) == actual))
    }
}

impl Form for PatientSearchForm {
    fn kind(&self) -> FormKind {
        FormKind::PatientSearch
    }

    fn fields(&self) -> Vec<&dyn FormField> {
        vec![
            &self.id,
            &self.name,
            &self.national_id,
            &self.hospital_number,
            &self.birth_year,
            &self.age,
            &self.center_id,
            &self.gender,
            &self.phone,
            &self.address,
        ]
    }

    fn fields_mut(&mut self) -> Vec<&mut dyn FormField> {
        vec![
            &mut self.id,
            &mut self.name,
            &mut self.national_id,
            &mut self.hospital_number,
            &mut self.birth_year,
            &mut self.age,
            &mut self.center_id,
            &mut self.gender,
            &mut self.phone,
            &mut self.address,
        ]
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
            centers: vec![ReferenceItem::new(1, "Kisiizi"), ReferenceItem::new(2, "Mbarara")],
            ..FormChoices::default()
        }
    }

    fn amina() -> PatientRecord {
        PatientRecord {
            national_id: Some("CM9100".into()),
            birth_year: Some(1980),
            phone_2: Some("0772 123456".into()),
            address: Some("Rukungiri District".into()),
            ..PatientRecord::new(NonEmptyText::new("Amina Yusuf").expect("non-empty"), 1, "F")
        }
    }

    #[test]
    fn valid_submission_becomes_a_record() {
        let data = FormData::new()
            .with("name", " Amina Yusuf ")
            .with("center_id", "2")
            .with("gender", "F")
            .with("birth_year", "1980")
            .with("phone_1", "")
            .with("next_action", "CreateEpisode");
        let outcome = Submission::new(PatientEditForm::new(&choices()))
            .bind(&data)
            .validate();
        assert!(outcome.is_valid(), "unexpected errors: {:?}", outcome.errors());

        let form = outcome.into_form();
        assert!(form.creates_episode_next());
        let record = form.to_record().expect("valid form converts");
        assert_eq!(record.name.as_str(), "Amina Yusuf");
        assert_eq!(record.center_id, 2);
        assert_eq!(record.birth_year, Some(1980));
        assert_eq!(record.phone_1, None);
    }

    #[test]
    fn missing_mandatory_fields_and_bad_selections_are_reported() {
        let data = FormData::new()
            .with("center_id", "9")
            .with("gender", "X")
            .with("age", "-4");
        let errors = Submission::new(PatientEditForm::new(&choices()))
            .bind(&data)
            .errors();
        assert!(errors.has_kind("name", ErrorKind::Required));
        assert!(errors.has_kind("center_id", ErrorKind::InvalidChoice));
        assert!(errors.has_kind("gender", ErrorKind::InvalidChoice));
        assert!(errors.has_kind("age", ErrorKind::InvalidRange));
    }

    #[test]
    fn edit_keeps_stored_values_for_fields_not_submitted() {
        let form = PatientEditForm::from_record(&choices(), 7, &amina());
        let outcome = Submission::new(form)
            .bind(&FormData::new().with("address", "Kabale"))
            .validate();
        assert!(outcome.is_valid(), "unexpected errors: {:?}", outcome.errors());

        let record = outcome.form().to_record().expect("valid form converts");
        assert_eq!(record.address.as_deref(), Some("Kabale"));
        assert_eq!(record.national_id.as_deref(), Some("CM9100"));
        assert_eq!(outcome.form().id.value(), Some(&7));
    }

    #[test]
    fn to_record_refuses_an_unvalidated_form() {
        let err = PatientEditForm::new(&choices())
            .to_record()
            .expect_err("name is missing");
        assert!(matches!(err, RegistryError::InvalidInput(msg) if msg.starts_with("name")));
    }

    #[test]
    fn search_gender_offers_any() {
        let form = PatientSearchForm::new(&choices());
        let genders = form.gender.choices().expect("gender has choices");
        assert_eq!(genders[0], Choice::new("", "Any"));
        assert_eq!(genders.len(), 3);
    }

    #[test]
    fn search_matches_on_every_given_criterion() {
        let search = |data: FormData| {
            let outcome = Submission::new(PatientSearchForm::new(&choices()))
                .bind(&data)
                .validate();
            assert!(outcome.is_valid(), "unexpected errors: {:?}", outcome.errors());
            outcome.into_form().matches(&amina())
        };

        assert!(search(FormData::new()));
        assert!(search(FormData::new().with("name", "amina").with("gender", "")));
        assert!(search(FormData::new().with("phone", "123456")));
        assert!(search(FormData::new().with("center_id", "1").with("birth_year", "1980")));
        assert!(!search(FormData::new().with("center_id", "2")));
        assert!(!search(FormData::new().with("name", "amina").with("gender", "M")));
        assert!(!search(FormData::new().with("age", "40")));
    }
}
