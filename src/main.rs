use std::sync::Arc;

use patient_registry::app;
use registry_core::{MemoryPatientRepository, PatientService};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the patient registry.
///
/// Resolves configuration once at startup and injects it explicitly; nothing
/// reads the environment during request handling.
///
/// # Environment Variables
/// - `REGISTRY_ADDR`: REST server address (default: "0.0.0.0:3000")
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("patient_registry=info".parse()?)
                .add_directive("registry_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("REGISTRY_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    tracing::info!("++ Starting patient registry REST on {}", addr);

    let patient_service = PatientService::new(Arc::new(MemoryPatientRepository::new()));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app(patient_service)).await?;

    Ok(())
}
