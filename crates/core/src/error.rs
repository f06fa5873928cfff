use crate::validation::ValidationErrors;

/// Typed outcomes of a patient service call.
///
/// Every failure a caller can act on is a distinct variant; nothing surfaces
/// as an opaque, unclassified failure. The API surface maps each variant to a
/// user-facing status.
#[derive(Debug, thiserror::Error)]
pub enum PatientError {
    /// One or more fields failed structural validation. Carries the full
    /// field-to-message set; no write was performed.
    #[error("invalid patient payload: {0}")]
    Validation(#[from] ValidationErrors),
    /// The requested create/update would produce a duplicate email.
    #[error("a patient with email {email} already exists")]
    EmailConflict { email: String },
    /// The referenced id does not exist.
    #[error("no patient with id {id}")]
    NotFound { id: String },
    /// The durable store failed for reasons unrelated to the request
    /// contents. Not retried automatically; the caller decides.
    #[error("patient store failure: {0}")]
    Storage(#[from] StoreError),
}

pub type PatientResult<T> = std::result::Result<T, PatientError>;

/// Failures reported by the durable store underneath the repository.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A write violated the store's unique-email constraint. This is the
    /// authoritative uniqueness guard; the service translates it to
    /// [`PatientError::EmailConflict`].
    #[error("email {0} violates the unique email constraint")]
    DuplicateEmail(String),
    /// The target row was gone by the time the write ran.
    #[error("no stored patient with id {0}")]
    MissingRow(String),
    /// Connectivity or other backend failure.
    #[error("store backend failure: {0}")]
    Backend(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
