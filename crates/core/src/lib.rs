//! # Registry Core
//!
//! Core business logic for the patient registry.
//!
//! This crate contains pure data operations and the patient lifecycle:
//! - The canonical [`Patient`] entity and its identifier
//! - Structural validation of inbound payloads ([`validation`])
//! - Pure mapping between wire shapes and the entity ([`mapper`])
//! - The repository abstraction over the durable store ([`repository`])
//! - The [`PatientService`] orchestrating validation, uniqueness and storage
//!
//! **No API concerns**: HTTP routing, status mapping and server wiring belong
//! in the `patient-registry` binary crate.

pub mod error;
pub mod mapper;
pub mod patient;
pub mod repository;
pub mod service;
pub mod validation;

pub use error::{PatientError, PatientResult, StoreError, StoreResult};
pub use mapper::{CreatePatientRequest, PatientResponse, UpdatePatientRequest};
pub use patient::{Patient, PatientId};
pub use repository::{MemoryPatientRepository, PatientRepository};
pub use service::PatientService;
pub use validation::{FieldError, ValidationErrors, ValidationMode};

// Re-export the validated text primitives so downstream crates need only one
// dependency.
pub use registry_types::{EmailAddress, NonEmptyText, TextError};
