//! Clinical event forms: the shared event header plus discharge, follow-up and surgery details.
//!
//! Every concrete event form embeds an [`EventForm`] and lists its fields first, so the header
//! binds and validates the same way everywhere.

use super::{Form, FormKind};
use crate::choices::{choices_for, choices_for_bool};
use crate::clinical::{AnestheticType, Cepod, Complexity, InguinalHerniaType, Occurrence, Pain, Side};
use crate::error::FieldError;
use crate::fields::{Field, FormField};
use crate::reference::FormChoices;
use crate::validation::{
    run_all, validate_antibiotics_iv_days, validate_antibiotics_oral_days, validate_aware_of_mesh,
    validate_infection, validate_numbness, validate_pain_comments,
    validate_perioperative_complication, validate_post_operative_antibiotics, validate_seroma,
    Validator,
};
use chrono::NaiveDate;

const DISCHARGE_RULES: &[Validator<DischargeForm>] = &[
    validate_perioperative_complication,
    validate_post_operative_antibiotics,
    validate_antibiotics_iv_days,
    validate_antibiotics_oral_days,
];

const FOLLOWUP_RULES: &[Validator<FollowupForm>] = &[
    validate_pain_comments,
    validate_aware_of_mesh,
    validate_infection,
    validate_seroma,
    validate_numbness,
];

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn yes_no(name: &'static str, label: &'static str) -> Field<bool> {
    Field::new(name, label).with_choices(choices_for_bool())
}

fn chain<'a>(
    head: Vec<&'a dyn FormField>,
    tail: impl IntoIterator<Item = &'a dyn FormField>,
) -> Vec<&'a dyn FormField> {
    head.into_iter().chain(tail).collect()
}

fn chain_mut<'a>(
    head: Vec<&'a mut dyn FormField>,
    tail: impl IntoIterator<Item = &'a mut dyn FormField>,
) -> Vec<&'a mut dyn FormField> {
    head.into_iter().chain(tail).collect()
}

// ============================================================================
// EVENT HEADER
// ============================================================================

#[derive(Debug, Clone)]
pub struct EventForm {
    pub id: Field<i64>,
    pub version: Field<i64>,
    /// Submitted as `type`.
    pub event_type: Field<String>,
    pub date: Field<NaiveDate>,
    pub patient_id: Field<String>,
    pub center_id: Field<String>,
    pub comments: Field<String>,
    pub created_by: Field<String>,
    pub created_at: Field<String>,
    pub updated_by: Field<String>,
    pub updated_at: Field<String>,
}

impl EventForm {
    pub fn new(choices: &FormChoices) -> Self {
        Self {
            id: Field::new("id", "id"),
            version: Field::new("version", "version"),
            event_type: Field::new("type", "Type").readonly(),
            date: Field::new("date", "Date").with_value(Some(today())),
            patient_id: Field::new("patient_id", "Patient")
                .readonly()
                .with_choices(choices.patients(false)),
            center_id: Field::new("center_id", "Center").with_choices(choices.centers(false)),
            comments: Field::new("comments", "Comments"),
            created_by: Field::new("created_by", "Created By").readonly(),
            created_at: Field::new("created_at", "Created At").readonly(),
            updated_by: Field::new("updated_by", "Updated By").readonly(),
            updated_at: Field::new("updated_at", "Updated At").readonly(),
        }
    }

    fn typed(choices: &FormChoices, event_type: &str) -> Self {
        let mut event = Self::new(choices);
        event.event_type.set(Some(event_type.to_owned()));
        event
    }
}

impl Form for EventForm {
    fn kind(&self) -> FormKind {
        FormKind::Event
    }

    fn fields(&self) -> Vec<&dyn FormField> {
        vec![
            &self.id,
            &self.version,
            &self.event_type,
            &self.date,
            &self.patient_id,
            &self.center_id,
            &self.comments,
            &self.created_by,
            &self.created_at,
            &self.updated_by,
            &self.updated_at,
        ]
    }

    /// Leaves out `type`: the label is set by the concrete form, never by the submission.
    fn fields_mut(&mut self) -> Vec<&mut dyn FormField> {
        vec![
            &mut self.id,
            &mut self.version,
            &mut self.date,
            &mut self.patient_id,
            &mut self.center_id,
            &mut self.comments,
            &mut self.created_by,
            &mut self.created_at,
            &mut self.updated_by,
            &mut self.updated_at,
        ]
    }
}

// ============================================================================
// DISCHARGE
// ============================================================================

#[derive(Debug, Clone)]
pub struct DischargeForm {
    pub event: EventForm,
    pub perioperative_complication: Field<bool>,
    pub perioperative_complication_comments: Field<String>,
    pub post_operative_antibiotics: Field<bool>,
    pub post_operative_antibiotics_comments: Field<String>,
    pub post_operative_antibiotics_iv_days: Field<i64>,
    pub post_operative_antibiotics_oral_days: Field<i64>,
}

impl DischargeForm {
    pub fn new(choices: &FormChoices) -> Self {
        Self {
            event: EventForm::typed(choices, "Discharge"),
            perioperative_complication: yes_no(
                "perioperative_complication",
                "Perioperative Complication?",
            ),
            perioperative_complication_comments: Field::new(
                "perioperative_complication_comments",
                "Perioperative Complication Description",
            ),
            post_operative_antibiotics: yes_no(
                "post_operative_antibiotics",
                "Post-Operative Antibiotics?",
            ),
            post_operative_antibiotics_comments: Field::new(
                "post_operative_antibiotics_comments",
                "Post-Operative Antibiotics Description",
            ),
            post_operative_antibiotics_iv_days: Field::new(
                "post_operative_antibiotics_iv_days",
                "IV antibiotics for # days",
            ),
            post_operative_antibiotics_oral_days: Field::new(
                "post_operative_antibiotics_oral_days",
                "Oral antibiotics for # days",
            ),
        }
    }
}

impl Form for DischargeForm {
    fn kind(&self) -> FormKind {
        FormKind::Discharge
    }

    fn fields(&self) -> Vec<&dyn FormField> {
        chain(
            self.event.fields(),
            [
                &self.perioperative_complication as &dyn FormField,
                &self.perioperative_complication_comments,
                &self.post_operative_antibiotics,
                &self.post_operative_antibiotics_comments,
                &self.post_operative_antibiotics_iv_days,
                &self.post_operative_antibiotics_oral_days,
            ],
        )
    }

    fn fields_mut(&mut self) -> Vec<&mut dyn FormField> {
        chain_mut(
            self.event.fields_mut(),
            [
                &mut self.perioperative_complication as &mut dyn FormField,
                &mut self.perioperative_complication_comments,
                &mut self.post_operative_antibiotics,
                &mut self.post_operative_antibiotics_comments,
                &mut self.post_operative_antibiotics_iv_days,
                &mut self.post_operative_antibiotics_oral_days,
            ],
        )
    }

    fn cross_field_errors(&self) -> Vec<FieldError> {
        run_all(self, DISCHARGE_RULES)
    }
}

// ============================================================================
// FOLLOW-UP
// ============================================================================

#[derive(Debug, Clone)]
pub struct FollowupForm {
    pub event: EventForm,
    pub attendee_id: Field<String>,
    pub pain: Field<Pain>,
    pub pain_comments: Field<String>,
    pub mesh_awareness: Field<bool>,
    pub mesh_awareness_comments: Field<String>,
    pub infection: Field<bool>,
    pub infection_comments: Field<String>,
    pub seroma: Field<bool>,
    pub seroma_comments: Field<String>,
    pub numbness: Field<bool>,
    pub numbness_comments: Field<String>,
}

impl FollowupForm {
    pub fn new(choices: &FormChoices) -> Self {
        Self {
            event: EventForm::typed(choices, "Follow-up"),
            attendee_id: Field::new("attendee_id", "Attendee")
                .required()
                .with_choices(choices.attendees(false)),
            pain: Field::new("pain", "Pain")
                .required()
                .with_choices(choices_for::<Pain>(false)),
            pain_comments: Field::new("pain_comments", "Pain Description"),
            mesh_awareness: yes_no("mesh_awareness", "Aware of Mesh?"),
            mesh_awareness_comments: Field::new(
                "mesh_awareness_comments",
                "Mesh Awareness Description",
            ),
            infection: yes_no("infection", "Infection?"),
            infection_comments: Field::new("infection_comments", "Infection Description"),
            seroma: yes_no("seroma", "Seroma?"),
            seroma_comments: Field::new("seroma_comments", "Seroma Description"),
            numbness: yes_no("numbness", "Numbness?"),
            numbness_comments: Field::new("numbness_comments", "Numbness Description"),
        }
    }
}

impl Form for FollowupForm {
    fn kind(&self) -> FormKind {
        FormKind::Followup
    }

    fn fields(&self) -> Vec<&dyn FormField> {
        chain(
            self.event.fields(),
            [
                &self.attendee_id as &dyn FormField,
                &self.pain,
                &self.pain_comments,
                &self.mesh_awareness,
                &self.mesh_awareness_comments,
                &self.infection,
                &self.infection_comments,
                &self.seroma,
                &self.seroma_comments,
                &self.numbness,
                &self.numbness_comments,
            ],
        )
    }

    fn fields_mut(&mut self) -> Vec<&mut dyn FormField> {
        chain_mut(
            self.event.fields_mut(),
            [
                &mut self.attendee_id as &mut dyn FormField,
                &mut self.pain,
                &mut self.pain_comments,
                &mut self.mesh_awareness,
                &mut self.mesh_awareness_comments,
                &mut self.infection,
                &mut self.infection_comments,
                &mut self.seroma,
                &mut self.seroma_comments,
                &mut self.numbness,
                &mut self.numbness_comments,
            ],
        )
    }

    fn cross_field_errors(&self) -> Vec<FieldError> {
        run_all(self, FOLLOWUP_RULES)
    }
}

// ============================================================================
// INGUINAL MESH HERNIA REPAIR
// ============================================================================

#[derive(Debug, Clone)]
pub struct InguinalMeshHerniaRepairForm {
    pub event: EventForm,
    pub cepod: Field<Cepod>,
    pub side: Field<Side>,
    pub occurrence: Field<Occurrence>,
    pub hernia_type: Field<InguinalHerniaType>,
    pub complexity: Field<Complexity>,
    pub mesh_type_id: Field<String>,
    pub anaesthetic_type: Field<AnestheticType>,
    pub anaesthetic_other: Field<String>,
    pub diathermy_used: Field<bool>,
    pub discharge_date: Field<NaiveDate>,
    pub primary_surgeon_id: Field<String>,
    pub secondary_surgeon_id: Field<String>,
    pub tertiary_surgeon_id: Field<String>,
    pub procedure_id: Field<String>,
    pub additional_procedure: Field<String>,
    pub complications: Field<String>,
}

impl InguinalMeshHerniaRepairForm {
    pub fn new(choices: &FormChoices) -> Self {
        Self {
            event: EventForm::typed(choices, "Inguinal Mesh Hernia Repair"),
            cepod: Field::new("cepod", "CEPOD")
                .required()
                .with_choices(choices_for::<Cepod>(false)),
            side: Field::new("side", "Side")
                .required()
                .with_choices(choices_for::<Side>(false)),
            occurrence: Field::new("occurrence", "Occurrence")
                .required()
                .with_choices(choices_for::<Occurrence>(false)),
            hernia_type: Field::new("hernia_type", "Hernia Type")
                .required()
                .with_choices(choices_for::<InguinalHerniaType>(false)),
            complexity: Field::new("complexity", "Complexity")
                .required()
                .with_choices(choices_for::<Complexity>(false)),
            mesh_type_id: Field::new("mesh_type_id", "Mesh Type")
                .required()
                .with_choices(choices.mesh_types(false)),
            anaesthetic_type: Field::new("anaesthetic_type", "Anaesthetic Type")
                .required()
                .with_choices(choices_for::<AnestheticType>(false)),
            anaesthetic_other: Field::new("anaesthetic_other", "Anaesthetic Other"),
            diathermy_used: yes_no("diathermy_used", "Diathermy Used?"),
            discharge_date: Field::new("discharge_date", "Discharge Date")
                .with_value(Some(today())),
            primary_surgeon_id: Field::new("primary_surgeon_id", "Primary Surgeon")
                .with_choices(choices.attendees(true)),
            secondary_surgeon_id: Field::new("secondary_surgeon_id", "Secondary Surgeon")
                .with_choices(choices.attendees(true)),
            tertiary_surgeon_id: Field::new("tertiary_surgeon_id", "Tertiary Surgeon")
                .with_choices(choices.attendees(true)),
            procedure_id: Field::new("procedure_id", "Procedure")
                .with_choices(choices.procedures(true)),
            additional_procedure: Field::new("additional_procedure", "Additional Procedure"),
            complications: Field::new("complications", "Complications"),
        }
    }
}

impl Form for InguinalMeshHerniaRepairForm {
    fn kind(&self) -> FormKind {
        FormKind::InguinalMeshHerniaRepair
    }

    fn fields(&self) -> Vec<&dyn FormField> {
        chain(
            self.event.fields(),
            [
                &self.cepod as &dyn FormField,
                &self.side,
                &self.occurrence,
                &self.hernia_type,
                &self.complexity,
                &self.mesh_type_id,
                &self.anaesthetic_type,
                &self.anaesthetic_other,
                &self.diathermy_used,
                &self.discharge_date,
                &self.primary_surgeon_id,
                &self.secondary_surgeon_id,
                &self.tertiary_surgeon_id,
                &self.procedure_id,
                &self.additional_procedure,
                &self.complications,
            ],
        )
    }

    fn fields_mut(&mut self) -> Vec<&mut dyn FormField> {
        chain_mut(
            self.event.fields_mut(),
            [
                &mut self.cepod as &mut dyn FormField,
                &mut self.side,
                &mut self.occurrence,
                &mut self.hernia_type,
                &mut self.complexity,
                &mut self.mesh_type_id,
                &mut self.anaesthetic_type,
                &mut self.anaesthetic_other,
                &mut self.diathermy_used,
                &mut self.discharge_date,
                &mut self.primary_surgeon_id,
                &mut self.secondary_surgeon_id,
                &mut self.tertiary_surgeon_id,
                &mut self.procedure_id,
                &mut self.additional_procedure,
                &mut self.complications,
            ],
        )
    }
}
