//! Structural validation of inbound patient payloads.
//!
//! Validation is pure and does not short-circuit: every field is checked and
//! the aggregate error set carries one entry per failing field, in a stable
//! field order. A single rule walk serves both operations; [`ValidationMode`]
//! selects whether `registeredDate` participates (it is write-once and not
//! accepted on update).
//!
//! On success the checks yield typed field sets, so the mapper downstream
//! stays pure and infallible.

use chrono::{NaiveDate, Utc};
use registry_types::{EmailAddress, NonEmptyText, TextError};

/// Calendar dates are exchanged in `YYYY-MM-DD` form.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Which operation the payload is for. Create requires every field including
/// `registeredDate`; update requires every field except `registeredDate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationMode {
    Create,
    Update,
}

/// A single field-level validation failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    /// External (wire) field name, e.g. `dateOfBirth`.
    pub field: &'static str,
    pub message: String,
}

/// Ordered set of field-level validation failures, at most one per field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Returns the message recorded for `field`, if any.
    pub fn message_for(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for e in &self.0 {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// Serialized as a field-to-message object, which is the shape the API
// surface returns to callers.
impl serde::Serialize for ValidationErrors {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for e in &self.0 {
            map.serialize_entry(e.field, &e.message)?;
        }
        map.end()
    }
}

/// Raw field view shared by the create and update payloads.
#[derive(Clone, Copy, Debug, Default)]
pub struct PatientPayload<'a> {
    pub name: Option<&'a str>,
    pub email: Option<&'a str>,
    pub address: Option<&'a str>,
    pub date_of_birth: Option<&'a str>,
    pub registered_date: Option<&'a str>,
}

/// Fields accepted for a new patient, typed and ready for the mapper.
#[derive(Clone, Debug)]
pub struct NewPatientFields {
    pub name: NonEmptyText,
    pub email: EmailAddress,
    pub address: NonEmptyText,
    pub date_of_birth: NaiveDate,
    pub registered_date: NaiveDate,
}

/// Fields accepted for an update. `registered_date` is write-once and has no
/// counterpart here.
#[derive(Clone, Debug)]
pub struct PatientUpdateFields {
    pub name: NonEmptyText,
    pub email: EmailAddress,
    pub address: NonEmptyText,
    pub date_of_birth: NaiveDate,
}

#[derive(Default)]
struct Checked {
    name: Option<NonEmptyText>,
    email: Option<EmailAddress>,
    address: Option<NonEmptyText>,
    date_of_birth: Option<NaiveDate>,
    registered_date: Option<NaiveDate>,
}

/// Runs every per-field rule for the given mode.
///
/// Each check records exactly one error when it fails, so `errors` is empty
/// exactly when all checked fields produced a value.
fn run_checks(payload: &PatientPayload<'_>, mode: ValidationMode) -> (Checked, ValidationErrors) {
    let mut errors = ValidationErrors::default();

    let name = check_text(payload.name, "name", &mut errors);
    let email = check_email(payload.email, &mut errors);
    let address = check_text(payload.address, "address", &mut errors);
    let date_of_birth = check_birth_date(payload.date_of_birth, &mut errors);
    let registered_date = match mode {
        ValidationMode::Create => check_date(payload.registered_date, "registeredDate", &mut errors),
        ValidationMode::Update => None,
    };

    (
        Checked {
            name,
            email,
            address,
            date_of_birth,
            registered_date,
        },
        errors,
    )
}

fn check_text(
    value: Option<&str>,
    field: &'static str,
    errors: &mut ValidationErrors,
) -> Option<NonEmptyText> {
    let Some(raw) = value else {
        errors.push(field, format!("{field} is required"));
        return None;
    };
    match NonEmptyText::new(raw) {
        Ok(text) => Some(text),
        Err(_) => {
            errors.push(field, format!("{field} cannot be empty"));
            None
        }
    }
}

fn check_email(value: Option<&str>, errors: &mut ValidationErrors) -> Option<EmailAddress> {
    let Some(raw) = value else {
        errors.push("email", "email is required");
        return None;
    };
    match EmailAddress::parse(raw) {
        Ok(email) => Some(email),
        Err(TextError::Empty) => {
            errors.push("email", "email cannot be empty");
            None
        }
        Err(_) => {
            errors.push("email", "email must be a valid email address");
            None
        }
    }
}

fn check_date(
    value: Option<&str>,
    field: &'static str,
    errors: &mut ValidationErrors,
) -> Option<NaiveDate> {
    let Some(raw) = value else {
        errors.push(field, format!("{field} is required"));
        return None;
    };
    match NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(field, format!("{field} must be a valid YYYY-MM-DD date"));
            None
        }
    }
}

fn check_birth_date(value: Option<&str>, errors: &mut ValidationErrors) -> Option<NaiveDate> {
    let date = check_date(value, "dateOfBirth", errors)?;
    if date > Utc::now().date_naive() {
        errors.push("dateOfBirth", "dateOfBirth cannot be in the future");
        return None;
    }
    Some(date)
}

/// Validates a create payload: all five fields required.
pub fn validate_create(payload: &PatientPayload<'_>) -> Result<NewPatientFields, ValidationErrors> {
    let (checked, errors) = run_checks(payload, ValidationMode::Create);
    match (
        checked.name,
        checked.email,
        checked.address,
        checked.date_of_birth,
        checked.registered_date,
    ) {
        (Some(name), Some(email), Some(address), Some(date_of_birth), Some(registered_date))
            if errors.is_empty() =>
        {
            Ok(NewPatientFields {
                name,
                email,
                address,
                date_of_birth,
                registered_date,
            })
        }
        _ => Err(errors),
    }
}

/// Validates an update payload: every updatable field must be resupplied;
/// `registeredDate` is not accepted.
pub fn validate_update(
    payload: &PatientPayload<'_>,
) -> Result<PatientUpdateFields, ValidationErrors> {
    let (checked, errors) = run_checks(payload, ValidationMode::Update);
    match (
        checked.name,
        checked.email,
        checked.address,
        checked.date_of_birth,
    ) {
        (Some(name), Some(email), Some(address), Some(date_of_birth)) if errors.is_empty() => {
            Ok(PatientUpdateFields {
                name,
                email,
                address,
                date_of_birth,
            })
        }
        _ => Err(errors),
    }
}
