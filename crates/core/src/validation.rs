//! Cross-field validation rules.
//!
//! Clinical yes/no flags come with a free-text description. These rules tie each description to
//! its flag. Every rule reads only the bound form and returns at most one error, so the rules
//! can run in any order and produce the same aggregate set.
//!
//! Descriptions only get the "required when flagged" direction. Duration counters also get the
//! inverse: a day count is only meaningful when post-operative antibiotics were given.

use crate::choices::ChoiceEnum;
use crate::clinical::Pain;
use crate::error::{ErrorKind, FieldError};
use crate::fields::{Field, FormField};
use crate::forms::event::{DischargeForm, FollowupForm};

/// A cross-field rule over a bound form.
pub type Validator<F> = fn(&F) -> Option<FieldError>;

fn flag_name(flag: &Field<bool>) -> &'static str {
    flag.label().trim_end_matches('?').trim()
}

/// `description` must be filled in when `flag` is true.
///
/// # Arguments
///
/// * `flag` - The yes/no field that gates the description.
/// * `description` - The free-text field the flag asks for.
///
/// # Errors
///
/// Returns a `RequiredWhenFlagged` error on `description` when the flag is true and the
/// description is empty or whitespace.
pub fn required_when_flagged(flag: &Field<bool>, description: &Field<String>) -> Option<FieldError> {
    if flag.is_true() && description.is_blank() {
        return Some(FieldError::new(
            description.name(),
            ErrorKind::RequiredWhenFlagged,
            format!("Description is required when {} is Yes", flag_name(flag)),
        ));
    }
    None
}

/// An optional count that must not be negative.
pub fn non_negative(field: &Field<i64>) -> Option<FieldError> {
    let count = *field.value()?;
    if count < 0 {
        return Some(FieldError::new(
            field.name(),
            ErrorKind::InvalidRange,
            format!("{} must be zero or more", field.label()),
        ));
    }
    None
}

/// An optional day count: never negative, and only recorded when `flag` is true.
///
/// # Errors
///
/// Returns `InvalidRange` for a negative count, otherwise `ForbiddenWhenUnflagged` when a count
/// is given while `flag` is not true.
pub fn days_gated_by(flag: &Field<bool>, days: &Field<i64>) -> Option<FieldError> {
    days.value()?;

    if let Some(err) = non_negative(days) {
        return Some(err);
    }

    if !flag.is_true() {
        return Some(FieldError::new(
            days.name(),
            ErrorKind::ForbiddenWhenUnflagged,
            format!(
                "{} should only be recorded when {} is Yes",
                days.label(),
                flag_name(flag)
            ),
        ));
    }

    None
}

/// `pain_comments` is required when `pain` is anything other than No Pain.
pub fn validate_pain_comments(form: &FollowupForm) -> Option<FieldError> {
    let pain = *form.pain.value()?;
    if pain != Pain::NoPain && form.pain_comments.is_blank() {
        return Some(FieldError::new(
            form.pain_comments.name(),
            ErrorKind::RequiredWhenFlagged,
            format!("Description is required when Pain is {}", pain.label()),
        ));
    }
    None
}

/// `mesh_awareness` gates `mesh_awareness_comments`.
pub fn validate_aware_of_mesh(form: &FollowupForm) -> Option<FieldError> {
    required_when_flagged(&form.mesh_awareness, &form.mesh_awareness_comments)
}

/// `infection` gates `infection_comments`.
pub fn validate_infection(form: &FollowupForm) -> Option<FieldError> {
    required_when_flagged(&form.infection, &form.infection_comments)
}

/// `seroma` gates `seroma_comments`.
pub fn validate_seroma(form: &FollowupForm) -> Option<FieldError> {
    required_when_flagged(&form.seroma, &form.seroma_comments)
}

/// `numbness` gates `numbness_comments`.
pub fn validate_numbness(form: &FollowupForm) -> Option<FieldError> {
    required_when_flagged(&form.numbness, &form.numbness_comments)
}

/// `perioperative_complication` gates `perioperative_complication_comments`.
pub fn validate_perioperative_complication(form: &DischargeForm) -> Option<FieldError> {
    required_when_flagged(
        &form.perioperative_complication,
        &form.perioperative_complication_comments,
    )
}

/// `post_operative_antibiotics` gates `post_operative_antibiotics_comments`.
pub fn validate_post_operative_antibiotics(form: &DischargeForm) -> Option<FieldError> {
    required_when_flagged(
        &form.post_operative_antibiotics,
        &form.post_operative_antibiotics_comments,
    )
}

/// IV days must not be negative and need `post_operative_antibiotics`.
pub fn validate_antibiotics_iv_days(form: &DischargeForm) -> Option<FieldError> {
    days_gated_by(
        &form.post_operative_antibiotics,
        &form.post_operative_antibiotics_iv_days,
    )
}

/// Oral days must not be negative and need `post_operative_antibiotics`.
pub fn validate_antibiotics_oral_days(form: &DischargeForm) -> Option<FieldError> {
    days_gated_by(
        &form.post_operative_antibiotics,
        &form.post_operative_antibiotics_oral_days,
    )
}

/// Run `validators` against `form`, collecting every error.
pub fn run_all<F>(form: &F, validators: &[Validator<F>]) -> Vec<FieldError> {
    validators.iter().filter_map(|rule| rule(form)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FormData;

    fn flag(value: &str) -> Field<bool> {
        let mut field = Field::<bool>::new("infection", "Infection?");
        field.bind(&FormData::new().with("infection", value));
        field
    }

    fn text(value: &str) -> Field<String> {
        let mut field = Field::<String>::new("infection_comments", "Infection Description");
        field.bind(&FormData::new().with("infection_comments", value));
        field
    }

    fn days(value: &str) -> Field<i64> {
        let mut field = Field::<i64>::new("post_operative_antibiotics_iv_days", "IV antibiotics for # days");
        field.bind(&FormData::new().with("post_operative_antibiotics_iv_days", value));
        field
    }

    #[test]
    fn flagged_without_description_is_rejected() {
        let err = required_when_flagged(&flag("True"), &text("")).expect("should fail");
        assert_eq!(err.field, "infection_comments");
        assert_eq!(err.kind, ErrorKind::RequiredWhenFlagged);
        assert_eq!(err.message, "Description is required when Infection is Yes");
    }

    #[test]
    fn whitespace_description_counts_as_empty() {
        assert!(required_when_flagged(&flag("yes"), &text("   ")).is_some());
    }

    #[test]
    fn unflagged_or_described_is_accepted() {
        assert!(required_when_flagged(&flag("False"), &text("")).is_none());
        assert!(required_when_flagged(&flag(""), &text("")).is_none());
        assert!(required_when_flagged(&flag("True"), &text("wound swab taken")).is_none());
        // Descriptions are never forbidden when the flag is off.
        assert!(required_when_flagged(&flag("False"), &text("resolved")).is_none());
    }

    #[test]
    fn negative_days_are_out_of_range() {
        let err = days_gated_by(&flag("True"), &days("-1")).expect("should fail");
        assert_eq!(err.kind, ErrorKind::InvalidRange);
    }

    #[test]
    fn days_without_flag_are_forbidden() {
        let err = days_gated_by(&flag("False"), &days("3")).expect("should fail");
        assert_eq!(err.kind, ErrorKind::ForbiddenWhenUnflagged);
        assert!(err.message.contains("Infection is Yes"));
    }

    #[test]
    fn absent_or_valid_days_are_accepted() {
        assert!(days_gated_by(&flag("False"), &days("")).is_none());
        assert!(days_gated_by(&flag("True"), &days("0")).is_none());
        assert!(days_gated_by(&flag("True"), &days("5")).is_none());
    }
}
