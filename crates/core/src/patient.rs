//! The canonical patient record and its identifier.

use chrono::NaiveDate;
use registry_types::{EmailAddress, NonEmptyText};
use uuid::Uuid;

/// Globally unique patient identifier.
///
/// Assigned by the service at creation, immutable, never reused. Exchanged
/// externally in the hyphenated UUID string form; all lookups, updates and
/// deletes are keyed by it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PatientId(Uuid);

impl PatientId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an identifier from its external string form.
    ///
    /// Returns `None` when the input is not a well-formed UUID; callers treat
    /// that the same as an unknown id.
    pub fn parse(input: &str) -> Option<Self> {
        Uuid::parse_str(input.trim()).ok().map(Self)
    }
}

impl Default for PatientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PatientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row per person: identity and contact fields only.
///
/// Exactly one live patient may hold a given email at any time; the store's
/// unique-email constraint enforces this.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Patient {
    pub id: PatientId,
    pub name: NonEmptyText,
    pub email: EmailAddress,
    pub address: NonEmptyText,
    pub date_of_birth: NaiveDate,
    /// When the patient was onboarded. Write-once: set at creation, excluded
    /// from update payloads and from external responses.
    pub registered_date: NaiveDate,
}
