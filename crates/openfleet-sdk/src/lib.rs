#![deny(missing_docs)]

//! # OpenFleet SDK
//!
//! Rust client for the **OpenFleet** delivery-management REST API:
//! authenticate with an API key, serialize typed resources to JSON, issue
//! requests against the v2 endpoints, and deserialize responses back into
//! resources.
//!
//! The SDK provides:
//!
//! * [`OpenFleetClient`] — authenticated HTTP client with job and vehicle
//!   operations (create, update, upsert save, search, hydrate, delete,
//!   paged listing, bulk variants, document export).
//! * [`Endpoints`] — canonical REST path definitions.
//! * [`SdkError`] — unified error type for all SDK operations.
//!
//! Resource types from [`openfleet_models`] are re-exported for
//! convenience.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use openfleet_sdk::{Job, OpenFleetClient};
//!
//! # async fn run() -> Result<(), openfleet_sdk::SdkError> {
//! let client = OpenFleetClient::new("myapikey123")?;
//!
//! let mut job = Job::delivery();
//! job.set_do_number("DO-1001");
//! job.set_date("2024-06-01");
//! job.set_address("1 Fleet Street, Singapore");
//! client.save_job(&mut job).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod endpoints;
pub mod error;
pub mod jobs;
pub mod vehicles;

pub use client::{OpenFleetClient, API_KEY_HEADER, DEFAULT_BASE_URL};
pub use endpoints::Endpoints;
pub use error::SdkError;
pub use jobs::{JobListArgs, BULK_CHUNK_SIZE};
pub use vehicles::VehicleListArgs;

// Re-export resource types from openfleet-models for ergonomic usage.
pub use openfleet_models::{
    DocumentFormat, Item, ItemCollection, Job, JobType, Vehicle, VehicleStatus,
};
