//! Seams to the persistence collaborator.
//!
//! The forms layer never queries a store itself. A caller reads reference data through
//! [`ReferenceData`] before binding, turns it into [`FormChoices`] and hands those to the form
//! constructors. Validated records go back through [`RecordStore`].

use crate::error::StorageResult;
use registry_types::{Choice, ReferenceItem};
use serde::{Deserialize, Serialize};

/// Reference tables that populate selection widgets. Each list is ordered by name.
pub trait ReferenceData {
    fn centers(&self) -> StorageResult<Vec<ReferenceItem>>;
    fn patients(&self) -> StorageResult<Vec<ReferenceItem>>;
    /// Users who can attend a follow-up or operate.
    fn attendees(&self) -> StorageResult<Vec<ReferenceItem>>;
    fn procedures(&self) -> StorageResult<Vec<ReferenceItem>>;
    fn mesh_types(&self) -> StorageResult<Vec<ReferenceItem>>;
}

/// Create/update/read for one record type.
pub trait RecordStore<R> {
    fn create(&self, record: R) -> StorageResult<i64>;
    fn update(&self, id: i64, record: R) -> StorageResult<()>;
    fn get(&self, id: i64) -> StorageResult<R>;
}

/// Turn reference rows into a choice list, optionally prefixed with the blank sentinel.
pub fn choices_from_items(items: &[ReferenceItem], include_blank: bool) -> Vec<Choice> {
    let blank = include_blank.then(Choice::blank);
    blank
        .into_iter()
        .chain(items.iter().map(Choice::from))
        .collect()
}

/// Reference data read once per request, ready for form construction.
///
/// Missing lists deserialise as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormChoices {
    pub centers: Vec<ReferenceItem>,
    pub patients: Vec<ReferenceItem>,
    pub attendees: Vec<ReferenceItem>,
    pub procedures: Vec<ReferenceItem>,
    pub mesh_types: Vec<ReferenceItem>,
}

impl FormChoices {
    pub fn centers(&self, include_blank: bool) -> Vec<Choice> {
        choices_from_items(&self.centers, include_blank)
    }

    pub fn patients(&self, include_blank: bool) -> Vec<Choice> {
        choices_from_items(&self.patients, include_blank)
    }

    pub fn attendees(&self, include_blank: bool) -> Vec<Choice> {
        choices_from_items(&self.attendees, include_blank)
    }

    pub fn procedures(&self, include_blank: bool) -> Vec<Choice> {
        choices_from_items(&self.procedures, include_blank)
    }

    pub fn mesh_types(&self, include_blank: bool) -> Vec<Choice> {
        choices_from_items(&self.mesh_types, include_blank)
    }
}

/// Read every reference list from `store`.
///
/// # Errors
///
/// Propagates the first [`crate::StorageError`] the store reports.
pub fn load_choices(store: &impl ReferenceData) -> StorageResult<FormChoices> {
    Ok(FormChoices {
        centers: store.centers()?,
        patients: store.patients()?,
        attendees: store.attendees()?,
        procedures: store.procedures()?,
        mesh_types: store.mesh_types()?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;

    struct FixedStore {
        fail_patients: bool,
    }

    impl ReferenceData for FixedStore {
        fn centers(&self) -> StorageResult<Vec<ReferenceItem>> {
            Ok(vec![ReferenceItem::new(2, "Kisiizi"), ReferenceItem::new(1, "Mbarara")])
        }

        fn patients(&self) -> StorageResult<Vec<ReferenceItem>> {
            if self.fail_patients {
                return Err(StorageError::Unavailable("connection reset".into()));
            }
            Ok(vec![ReferenceItem::new(10, "Amina Yusuf")])
        }

        fn attendees(&self) -> StorageResult<Vec<ReferenceItem>> {
            Ok(vec![ReferenceItem::new(3, "Dr Okello")])
        }

        fn procedures(&self) -> StorageResult<Vec<ReferenceItem>> {
            Ok(vec![ReferenceItem::new(1, "Inguinal Mesh Hernia Repair")])
        }

        fn mesh_types(&self) -> StorageResult<Vec<ReferenceItem>> {
            Ok(vec![ReferenceItem::new(1, "Mosquito net")])
        }
    }

    #[test]
    fn load_choices_keeps_store_order() {
        let choices = load_choices(&FixedStore { fail_patients: false }).expect("should load");
        let centers = choices.centers(false);
        assert_eq!(centers[0], Choice::new("2", "Kisiizi"));
        assert_eq!(centers[1], Choice::new("1", "Mbarara"));
    }

    #[test]
    fn blank_sentinel_is_prepended_on_request() {
        let choices = load_choices(&FixedStore { fail_patients: false }).expect("should load");
        let with_blank = choices.patients(true);
        assert_eq!(with_blank.len(), 2);
        assert_eq!(with_blank[0], Choice::new("", "(Any)"));
    }

    #[test]
    fn storage_failures_propagate() {
        let err = load_choices(&FixedStore { fail_patients: true }).expect_err("should fail");
        assert!(matches!(err, StorageError::Unavailable(msg) if msg.contains("reset")));
    }
}
