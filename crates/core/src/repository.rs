//! Repository abstraction over the durable patient store.
//!
//! The service performs a uniqueness pre-check before writing, but the store
//! itself must enforce the unique-email constraint atomically with each
//! write: the check-then-write window is otherwise a race between concurrent
//! requests. Implementations report a violated constraint as
//! [`StoreError::DuplicateEmail`], which the service translates to the same
//! conflict outcome as the pre-check.

use crate::error::{StoreError, StoreResult};
use crate::patient::{Patient, PatientId};
use registry_types::EmailAddress;
use std::sync::RwLock;

/// Durable-store operations required by the patient service.
///
/// Each operation is a single logical unit against the store; the service
/// never spans a transaction across calls.
pub trait PatientRepository: Send + Sync {
    fn find_by_id(&self, id: &PatientId) -> StoreResult<Option<Patient>>;
    fn find_by_email(&self, email: &EmailAddress) -> StoreResult<Option<Patient>>;
    /// All patients in a stable order.
    fn find_all(&self) -> StoreResult<Vec<Patient>>;
    /// Inserts a new row, enforcing the unique-email constraint atomically
    /// with the write.
    fn insert(&self, patient: Patient) -> StoreResult<()>;
    /// Replaces the row with the same id, enforcing the unique-email
    /// constraint against all other rows.
    fn update(&self, patient: Patient) -> StoreResult<()>;
    /// Hard-removes the row. Returns whether a row existed.
    fn delete_by_id(&self, id: &PatientId) -> StoreResult<bool>;
    fn exists_by_email(&self, email: &EmailAddress) -> StoreResult<bool>;
}

/// In-process store stand-in.
///
/// Rows live in an `RwLock`-guarded, insertion-ordered table. Writes take the
/// lock for the whole constraint-check-plus-write, which is what makes the
/// unique-email guarantee hold under concurrent callers.
#[derive(Debug, Default)]
pub struct MemoryPatientRepository {
    rows: RwLock<Vec<Patient>>,
}

impl MemoryPatientRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, Vec<Patient>>> {
        self.rows
            .read()
            .map_err(|_| StoreError::Backend("patient store lock poisoned".into()))
    }

    fn write(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, Vec<Patient>>> {
        self.rows
            .write()
            .map_err(|_| StoreError::Backend("patient store lock poisoned".into()))
    }
}

impl PatientRepository for MemoryPatientRepository {
    fn find_by_id(&self, id: &PatientId) -> StoreResult<Option<Patient>> {
        Ok(self.read()?.iter().find(|p| p.id == *id).cloned())
    }

    fn find_by_email(&self, email: &EmailAddress) -> StoreResult<Option<Patient>> {
        Ok(self.read()?.iter().find(|p| p.email == *email).cloned())
    }

    fn find_all(&self) -> StoreResult<Vec<Patient>> {
        Ok(self.read()?.clone())
    }

    fn insert(&self, patient: Patient) -> StoreResult<()> {
        let mut rows = self.write()?;
        if rows.iter().any(|p| p.email == patient.email) {
            return Err(StoreError::DuplicateEmail(patient.email.to_string()));
        }
        rows.push(patient);
        Ok(())
    }

    fn update(&self, patient: Patient) -> StoreResult<()> {
        let mut rows = self.write()?;
        if rows
            .iter()
            .any(|p| p.id != patient.id && p.email == patient.email)
        {
            return Err(StoreError::DuplicateEmail(patient.email.to_string()));
        }
        match rows.iter_mut().find(|p| p.id == patient.id) {
            Some(slot) => {
                *slot = patient;
                Ok(())
            }
            None => Err(StoreError::MissingRow(patient.id.to_string())),
        }
    }

    fn delete_by_id(&self, id: &PatientId) -> StoreResult<bool> {
        let mut rows = self.write()?;
        match rows.iter().position(|p| p.id == *id) {
            Some(index) => {
                rows.remove(index);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn exists_by_email(&self, email: &EmailAddress) -> StoreResult<bool> {
        Ok(self.read()?.iter().any(|p| p.email == *email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use registry_types::NonEmptyText;

    fn patient(name: &str, email: &str) -> Patient {
        Patient {
            id: PatientId::new(),
            name: NonEmptyText::new(name).unwrap(),
            email: EmailAddress::parse(email).unwrap(),
            address: NonEmptyText::new("123 Main St").unwrap(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 15).unwrap(),
            registered_date: NaiveDate::from_ymd_opt(2025, 9, 13).unwrap(),
        }
    }

    #[test]
    fn insert_enforces_the_unique_email_constraint() {
        let repo = MemoryPatientRepository::new();
        repo.insert(patient("Alice Smith", "alice@example.com"))
            .expect("first insert should succeed");

        let err = repo
            .insert(patient("Alice Clone", "alice@example.com"))
            .expect_err("duplicate email must be rejected by the store");
        assert!(matches!(err, StoreError::DuplicateEmail(email) if email == "alice@example.com"));
        assert_eq!(repo.find_all().unwrap().len(), 1);
    }

    #[test]
    fn update_rejects_another_rows_email_but_allows_own() {
        let repo = MemoryPatientRepository::new();
        let alice = patient("Alice Smith", "alice@example.com");
        let bob = patient("Bob Jones", "bob@example.com");
        repo.insert(alice.clone()).unwrap();
        repo.insert(bob.clone()).unwrap();

        let mut stolen = bob.clone();
        stolen.email = alice.email.clone();
        let err = repo.update(stolen).expect_err("email is taken");
        assert!(matches!(err, StoreError::DuplicateEmail(_)));

        // Re-writing a row with its own email is not a conflict.
        let mut renamed = bob.clone();
        renamed.name = NonEmptyText::new("Robert Jones").unwrap();
        repo.update(renamed).expect("same-row email should be fine");
        let stored = repo.find_by_id(&bob.id).unwrap().expect("row exists");
        assert_eq!(stored.name.as_str(), "Robert Jones");
    }

    #[test]
    fn update_reports_a_missing_row() {
        let repo = MemoryPatientRepository::new();
        let err = repo
            .update(patient("Ghost", "ghost@example.com"))
            .expect_err("row does not exist");
        assert!(matches!(err, StoreError::MissingRow(_)));
    }

    #[test]
    fn delete_reports_whether_a_row_existed() {
        let repo = MemoryPatientRepository::new();
        let alice = patient("Alice Smith", "alice@example.com");
        repo.insert(alice.clone()).unwrap();

        assert!(repo.delete_by_id(&alice.id).unwrap());
        assert!(!repo.delete_by_id(&alice.id).unwrap());
        assert!(repo.find_by_id(&alice.id).unwrap().is_none());
    }

    #[test]
    fn find_all_preserves_insertion_order() {
        let repo = MemoryPatientRepository::new();
        let names = ["Alice A", "Bob B", "Carol C"];
        for (i, name) in names.iter().enumerate() {
            repo.insert(patient(name, &format!("p{i}@example.com")))
                .unwrap();
        }
        let listed: Vec<String> = repo
            .find_all()
            .unwrap()
            .iter()
            .map(|p| p.name.to_string())
            .collect();
        assert_eq!(listed, names);
    }

    #[test]
    fn lookups_distinguish_id_and_email() {
        let repo = MemoryPatientRepository::new();
        let alice = patient("Alice Smith", "alice@example.com");
        repo.insert(alice.clone()).unwrap();

        assert!(repo.exists_by_email(&alice.email).unwrap());
        assert!(!repo
            .exists_by_email(&EmailAddress::parse("other@example.com").unwrap())
            .unwrap());
        let found = repo.find_by_email(&alice.email).unwrap().expect("found");
        assert_eq!(found.id, alice.id);
    }
}
