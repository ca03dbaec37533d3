//! In-memory persistence behind the REST surface.
//!
//! Reference lists are fixed at construction; patient records are created and updated through
//! [`RecordStore`]. Concurrent writers to the same record are last-write-wins.

use registry_core::forms::PatientSearchForm;
use registry_core::{
    PatientRecord, RecordStore, ReferenceData, ReferenceItem, StorageError, StorageResult,
};
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct Tables {
    centers: Vec<ReferenceItem>,
    attendees: Vec<ReferenceItem>,
    procedures: Vec<ReferenceItem>,
    mesh_types: Vec<ReferenceItem>,
    patients: BTreeMap<i64, PatientRecord>,
    last_patient_id: i64,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

fn by_name(items: &[ReferenceItem]) -> Vec<ReferenceItem> {
    let mut items = items.to_vec();
    items.sort_by(|a, b| a.name.cmp(&b.name));
    items
}

impl MemoryStore {
    pub fn new(
        centers: Vec<ReferenceItem>,
        attendees: Vec<ReferenceItem>,
        procedures: Vec<ReferenceItem>,
        mesh_types: Vec<ReferenceItem>,
    ) -> Self {
        Self {
            tables: RwLock::new(Tables {
                centers,
                attendees,
                procedures,
                mesh_types,
                ..Tables::default()
            }),
        }
    }

    /// A store with demonstration reference data and no patients.
    pub fn seeded() -> Self {
        Self::new(
            vec![
                ReferenceItem::new(1, "Kisiizi Hospital"),
                ReferenceItem::new(2, "Mbarara Regional Referral Hospital"),
            ],
            vec![
                ReferenceItem::new(1, "Dr Okello"),
                ReferenceItem::new(2, "Dr Nankya"),
            ],
            vec![ReferenceItem::new(1, "Inguinal Mesh Hernia Repair")],
            vec![
                ReferenceItem::new(1, "Mosquito net"),
                ReferenceItem::new(2, "Commercial polypropylene"),
            ],
        )
    }

    fn read(&self) -> StorageResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| StorageError::Unavailable("store lock poisoned".into()))
    }

    fn write(&self) -> StorageResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| StorageError::Unavailable("store lock poisoned".into()))
    }

    /// Patients matching a validated search form, ordered by name.
    pub fn search_patients(
        &self,
        criteria: &PatientSearchForm,
    ) -> StorageResult<Vec<(i64, PatientRecord)>> {
        let tables = self.read()?;
        let mut found: Vec<(i64, PatientRecord)> = tables
            .patients
            .iter()
            .filter(|(id, record)| {
                criteria.id.value().map_or(true, |wanted| wanted == *id) && criteria.matches(record)
            })
            .map(|(id, record)| (*id, record.clone()))
            .collect();
        found.sort_by(|a, b| a.1.name.as_str().cmp(b.1.name.as_str()));
        Ok(found)
    }
}

impl ReferenceData for MemoryStore {
    fn centers(&self) -> StorageResult<Vec<ReferenceItem>> {
        Ok(by_name(&self.read()?.centers))
    }

    fn patients(&self) -> StorageResult<Vec<ReferenceItem>> {
        let tables = self.read()?;
        let items: Vec<ReferenceItem> = tables
            .patients
            .iter()
            .map(|(id, record)| ReferenceItem::new(*id, record.name.as_str()))
            .collect();
        Ok(by_name(&items))
    }

    fn attendees(&self) -> StorageResult<Vec<ReferenceItem>> {
        Ok(by_name(&self.read()?.attendees))
    }

    fn procedures(&self) -> StorageResult<Vec<ReferenceItem>> {
        Ok(by_name(&self.read()?.procedures))
    }

    fn mesh_types(&self) -> StorageResult<Vec<ReferenceItem>> {
        Ok(by_name(&self.read()?.mesh_types))
    }
}

impl RecordStore<PatientRecord> for MemoryStore {
    fn create(&self, record: PatientRecord) -> StorageResult<i64> {
        let mut tables = self.write()?;
        tables.last_patient_id += 1;
        let id = tables.last_patient_id;
        tables.patients.insert(id, record);
        tracing::debug!(id, "patient created");
        Ok(id)
    }

    fn update(&self, id: i64, record: PatientRecord) -> StorageResult<()> {
        let mut tables = self.write()?;
        match tables.patients.get_mut(&id) {
            Some(existing) => {
                *existing = record;
                tracing::debug!(id, "patient updated");
                Ok(())
            }
            None => Err(StorageError::NotFound {
                entity: "patient",
                id,
            }),
        }
    }

    fn get(&self, id: i64) -> StorageResult<PatientRecord> {
        self.read()?
            .patients
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound {
                entity: "patient",
                id,
            })
    }
}
