//! Patient lifecycle orchestration.
//!
//! The service is the only component with business logic: it validates
//! inbound payloads, enforces email uniqueness and drives the repository.
//! The uniqueness pre-check before a write exists for a fast, friendly
//! rejection; the store constraint applied inside the repository write is the
//! authoritative guard, and a constraint violation reported there maps to the
//! same `EmailConflict` outcome. No locks are held across the check-then-act
//! window.
//!
//! The service holds an explicit repository reference injected at
//! construction; there is no global state and no cache in front of the store.

use crate::error::{PatientError, PatientResult, StoreError};
use crate::mapper::{self, CreatePatientRequest, PatientResponse, UpdatePatientRequest};
use crate::patient::PatientId;
use crate::repository::PatientRepository;
use crate::validation;
use std::sync::Arc;

/// Pure patient data operations - no API concerns.
#[derive(Clone)]
pub struct PatientService {
    repo: Arc<dyn PatientRepository>,
}

impl PatientService {
    /// Creates a service backed by the given repository.
    pub fn new(repo: Arc<dyn PatientRepository>) -> Self {
        Self { repo }
    }

    /// Returns every patient in the store's stable order, mapped to the
    /// external shape. An empty store yields an empty list.
    pub fn list_patients(&self) -> PatientResult<Vec<PatientResponse>> {
        let patients = self.repo.find_all()?;
        Ok(patients.iter().map(mapper::to_response).collect())
    }

    /// Creates a patient from a validated request.
    ///
    /// # Errors
    ///
    /// - [`PatientError::Validation`] when any field fails the create-mode
    ///   rules; nothing is written.
    /// - [`PatientError::EmailConflict`] when the email is already held by
    ///   another patient, whether caught by the pre-check or by the store
    ///   constraint on insert.
    /// - [`PatientError::Storage`] for any other store failure.
    pub fn create_patient(&self, req: &CreatePatientRequest) -> PatientResult<PatientResponse> {
        let fields = validation::validate_create(&req.payload())?;

        // Fast-path rejection with a friendly error; the store constraint on
        // insert is what actually guarantees uniqueness under concurrency.
        if let Some(existing) = self.repo.find_by_email(&fields.email)? {
            tracing::debug!(id = %existing.id, "create rejected: email already registered");
            return Err(PatientError::EmailConflict {
                email: fields.email.to_string(),
            });
        }

        let patient = mapper::patient_from_new(PatientId::new(), fields);
        match self.repo.insert(patient.clone()) {
            Ok(()) => {
                tracing::info!(id = %patient.id, "patient created");
                Ok(mapper::to_response(&patient))
            }
            Err(StoreError::DuplicateEmail(email)) => Err(PatientError::EmailConflict { email }),
            Err(e) => Err(PatientError::Storage(e)),
        }
    }

    /// Updates a patient in place. `id` and `registered_date` are preserved;
    /// every other field is replaced by the request's values.
    ///
    /// # Errors
    ///
    /// - [`PatientError::NotFound`] when `id` does not name a stored patient
    ///   (an unparseable id is treated the same).
    /// - [`PatientError::Validation`] when any field fails the update-mode
    ///   rules; the stored record is unchanged.
    /// - [`PatientError::EmailConflict`] when the new email belongs to a
    ///   different patient. Keeping the current email is not a conflict.
    /// - [`PatientError::Storage`] for any other store failure.
    pub fn update_patient(
        &self,
        id: &str,
        req: &UpdatePatientRequest,
    ) -> PatientResult<PatientResponse> {
        let Some(patient_id) = PatientId::parse(id) else {
            return Err(PatientError::NotFound { id: id.to_owned() });
        };
        let Some(current) = self.repo.find_by_id(&patient_id)? else {
            return Err(PatientError::NotFound { id: id.to_owned() });
        };

        let fields = validation::validate_update(&req.payload())?;

        // Only a changed email needs a uniqueness re-check; the target's own
        // email can never self-conflict.
        if fields.email != current.email && self.repo.exists_by_email(&fields.email)? {
            return Err(PatientError::EmailConflict {
                email: fields.email.to_string(),
            });
        }

        let updated = mapper::apply_update(&current, fields);
        match self.repo.update(updated.clone()) {
            Ok(()) => {
                tracing::info!(id = %updated.id, "patient updated");
                Ok(mapper::to_response(&updated))
            }
            Err(StoreError::DuplicateEmail(email)) => Err(PatientError::EmailConflict { email }),
            Err(StoreError::MissingRow(_)) => Err(PatientError::NotFound { id: id.to_owned() }),
            Err(e) => Err(PatientError::Storage(e)),
        }
    }

    /// Hard-removes a patient.
    ///
    /// # Errors
    ///
    /// - [`PatientError::NotFound`] when `id` does not name a stored patient.
    /// - [`PatientError::Storage`] for store failures.
    pub fn delete_patient(&self, id: &str) -> PatientResult<()> {
        let Some(patient_id) = PatientId::parse(id) else {
            return Err(PatientError::NotFound { id: id.to_owned() });
        };
        if self.repo.delete_by_id(&patient_id)? {
            tracing::info!(id = %patient_id, "patient deleted");
            Ok(())
        } else {
            Err(PatientError::NotFound { id: id.to_owned() })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryPatientRepository;

    fn test_service() -> PatientService {
        PatientService::new(Arc::new(MemoryPatientRepository::new()))
    }

    fn create_req(name: &str, email: &str) -> CreatePatientRequest {
        CreatePatientRequest {
            name: Some(name.into()),
            email: Some(email.into()),
            address: Some("123 Main St".into()),
            date_of_birth: Some("1990-05-15".into()),
            registered_date: Some("2025-09-13".into()),
        }
    }

    fn update_req(name: &str, email: &str) -> UpdatePatientRequest {
        UpdatePatientRequest {
            name: Some(name.into()),
            email: Some(email.into()),
            address: Some("456 Oak Ave".into()),
            date_of_birth: Some("1990-05-15".into()),
        }
    }

    #[test]
    fn creates_with_distinct_emails_grow_the_list_one_by_one() {
        let service = test_service();
        let mut ids = Vec::new();
        for i in 0..3 {
            let before = service.list_patients().unwrap().len();
            let resp = service
                .create_patient(&create_req("John Doe", &format!("john{i}@example.com")))
                .expect("create should succeed");
            ids.push(resp.id);
            assert_eq!(service.list_patients().unwrap().len(), before + 1);
        }
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 3, "every create produced a distinct id");
    }

    #[test]
    fn duplicate_email_create_conflicts_and_writes_nothing() {
        let service = test_service();
        service
            .create_patient(&create_req("John Doe", "john.doe@example.com"))
            .expect("first create succeeds");

        let err = service
            .create_patient(&create_req("Johnny Doe", "john.doe@example.com"))
            .expect_err("second create with the same email must fail");
        assert!(
            matches!(err, PatientError::EmailConflict { ref email } if email == "john.doe@example.com")
        );
        assert_eq!(service.list_patients().unwrap().len(), 1);
    }

    #[test]
    fn invalid_create_reports_fields_and_writes_nothing() {
        let service = test_service();
        let err = service
            .create_patient(&CreatePatientRequest::default())
            .expect_err("empty request is invalid");
        let PatientError::Validation(errors) = err else {
            panic!("expected a validation error");
        };
        assert_eq!(errors.len(), 5);
        assert!(service.list_patients().unwrap().is_empty());
    }

    #[test]
    fn created_response_matches_request_minus_registered_date() {
        let service = test_service();
        let resp = service
            .create_patient(&create_req("John Doe", "john.doe@example.com"))
            .expect("create succeeds");

        assert_eq!(resp.name, "John Doe");
        assert_eq!(resp.email, "john.doe@example.com");
        assert_eq!(resp.address, "123 Main St");
        assert_eq!(resp.date_of_birth.to_string(), "1990-05-15");

        let listed = service.list_patients().unwrap();
        assert_eq!(listed, vec![resp]);
    }

    #[test]
    fn update_replaces_fields_and_keeps_identity() {
        let service = test_service();
        let created = service
            .create_patient(&create_req("John Doe", "john.doe@example.com"))
            .unwrap();

        let updated = service
            .update_patient(&created.id, &update_req("Jane Doe", "jane.doe@example.com"))
            .expect("update should succeed");
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Jane Doe");
        assert_eq!(updated.address, "456 Oak Ave");
        assert_eq!(service.list_patients().unwrap().len(), 1);
    }

    #[test]
    fn invalid_update_leaves_the_record_unchanged() {
        let service = test_service();
        let created = service
            .create_patient(&create_req("John Doe", "john.doe@example.com"))
            .unwrap();

        let bad = UpdatePatientRequest {
            email: Some("not-an-email".into()),
            date_of_birth: Some("someday".into()),
            ..update_req("Jane Doe", "ignored@example.com")
        };
        let err = service
            .update_patient(&created.id, &bad)
            .expect_err("two fields are invalid");
        let PatientError::Validation(errors) = err else {
            panic!("expected a validation error");
        };
        assert!(errors.message_for("email").is_some());
        assert!(errors.message_for("dateOfBirth").is_some());

        let listed = service.list_patients().unwrap();
        assert_eq!(listed[0].name, "John Doe");
        assert_eq!(listed[0].email, "john.doe@example.com");
    }

    #[test]
    fn update_to_anothers_email_conflicts_but_own_email_does_not() {
        let service = test_service();
        let alice = service
            .create_patient(&create_req("Alice Smith", "alice@example.com"))
            .unwrap();
        let _bob = service
            .create_patient(&create_req("Bob Jones", "bob@example.com"))
            .unwrap();

        let err = service
            .update_patient(&alice.id, &update_req("Alice Smith", "bob@example.com"))
            .expect_err("bob holds that email");
        assert!(matches!(err, PatientError::EmailConflict { .. }));

        // Resubmitting her own email is not a self-conflict.
        service
            .update_patient(&alice.id, &update_req("Alice B Smith", "alice@example.com"))
            .expect("keeping the current email should succeed");
    }

    #[test]
    fn operations_after_delete_are_not_found() {
        let service = test_service();
        let created = service
            .create_patient(&create_req("John Doe", "john.doe@example.com"))
            .unwrap();

        service.delete_patient(&created.id).expect("delete succeeds");

        let err = service
            .update_patient(&created.id, &update_req("John Doe", "john.doe@example.com"))
            .expect_err("record is gone");
        assert!(matches!(err, PatientError::NotFound { .. }));

        let err = service
            .delete_patient(&created.id)
            .expect_err("second delete fails");
        assert!(matches!(err, PatientError::NotFound { .. }));
    }

    #[test]
    fn unknown_and_malformed_ids_are_not_found() {
        let service = test_service();
        let random = PatientId::new().to_string();
        assert!(matches!(
            service.delete_patient(&random),
            Err(PatientError::NotFound { .. })
        ));
        assert!(matches!(
            service.update_patient("not-a-uuid", &update_req("X Y", "x@example.com")),
            Err(PatientError::NotFound { .. })
        ));
    }

    #[test]
    fn concurrent_creates_with_one_email_admit_exactly_one_winner() {
        let service = test_service();
        let mut handles = Vec::new();
        for i in 0..8 {
            let service = service.clone();
            handles.push(std::thread::spawn(move || {
                service.create_patient(&create_req(&format!("Racer {i}"), "race@example.com"))
            }));
        }

        let mut successes = 0;
        for handle in handles {
            match handle.join().expect("thread should not panic") {
                Ok(_) => successes += 1,
                Err(PatientError::EmailConflict { .. }) => {}
                Err(other) => panic!("unexpected error: {other}"),
            }
        }
        assert_eq!(successes, 1);
        assert_eq!(service.list_patients().unwrap().len(), 1);
    }
}
