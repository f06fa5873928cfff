//! Pure conversions between external wire shapes and the patient entity.
//!
//! No I/O and no validation here: payloads are validated before they are
//! mapped to an entity, so the entity constructors below are infallible.
//! Request fields stay raw strings so the validation layer owns required-ness
//! and per-field messages rather than serde rejecting the whole payload.

use crate::patient::{Patient, PatientId};
use crate::validation::{NewPatientFields, PatientPayload, PatientUpdateFields};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inbound payload for `POST /patients`.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
    #[serde(default)]
    pub registered_date: Option<String>,
}

impl CreatePatientRequest {
    /// Borrowed field view for the validation layer.
    pub fn payload(&self) -> PatientPayload<'_> {
        PatientPayload {
            name: self.name.as_deref(),
            email: self.email.as_deref(),
            address: self.address.as_deref(),
            date_of_birth: self.date_of_birth.as_deref(),
            registered_date: self.registered_date.as_deref(),
        }
    }
}

/// Inbound payload for `PUT /patients/{id}`.
///
/// Has no `registeredDate` member: the field is write-once and a supplied
/// value is ignored rather than applied.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatientRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<String>,
}

impl UpdatePatientRequest {
    /// Borrowed field view for the validation layer.
    pub fn payload(&self) -> PatientPayload<'_> {
        PatientPayload {
            name: self.name.as_deref(),
            email: self.email.as_deref(),
            address: self.address.as_deref(),
            date_of_birth: self.date_of_birth.as_deref(),
            registered_date: None,
        }
    }
}

/// Externally visible patient shape.
///
/// `registeredDate` is deliberately absent: it is accepted on create but
/// never read back (internal-only field).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub address: String,
    pub date_of_birth: NaiveDate,
}

/// Builds the entity for a freshly created patient. The id is generated by
/// the caller; client-supplied ids are never accepted.
pub fn patient_from_new(id: PatientId, fields: NewPatientFields) -> Patient {
    Patient {
        id,
        name: fields.name,
        email: fields.email,
        address: fields.address,
        date_of_birth: fields.date_of_birth,
        registered_date: fields.registered_date,
    }
}

/// Applies update fields to an existing patient, preserving `id` and
/// `registered_date`.
pub fn apply_update(current: &Patient, fields: PatientUpdateFields) -> Patient {
    Patient {
        id: current.id,
        name: fields.name,
        email: fields.email,
        address: fields.address,
        date_of_birth: fields.date_of_birth,
        registered_date: current.registered_date,
    }
}

/// Maps an entity to its external response shape.
pub fn to_response(patient: &Patient) -> PatientResponse {
    PatientResponse {
        id: patient.id.to_string(),
        name: patient.name.as_str().to_owned(),
        email: patient.email.as_str().to_owned(),
        address: patient.address.as_str().to_owned(),
        date_of_birth: patient.date_of_birth,
    }
}
