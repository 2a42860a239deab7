//! Stratus cloud infrastructure abstraction
//!
//! This crate defines the provider-neutral contract for provisioning and
//! managing virtual compute servers across cloud backends: lifecycle
//! mutations, inventory queries and snapshot-schedule management, all in
//! provider-neutral terms.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 calling code                     │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │               stratus-cloud                      │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │         Driver Abstraction                │   │
//! │  │  trait InfrastructureDriver { ... }       │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌──────────────┐  ┌──────────────┐            │
//! │  │ Schema Check │  │ Wait Engine  │            │
//! │  └──────────────┘  └──────────────┘            │
//! └───────┬─────────────────────────────────────────┘
//!         │
//! ┌───────▼────────────┐
//! │ stratus-cloud-     │
//! │ openstack driver   │
//! └────────────────────┘
//! ```
//!
//! Backends share no behavior beyond the contract shape: the status
//! normalizer, schema validator and wait engine are free-standing helpers
//! each driver composes, not a base class.

pub mod driver;
pub mod error;
pub mod schema;
pub mod status;
pub mod wait;

// Re-exports
pub use driver::{
    AddressScope, ImageSchedule, InfrastructureDriver, IpAddressSet, IpVersion, NetworkAddresses,
    ResourceSummary, ServerFilter, ServerHandle, ServerSpec, ServerSummary,
};
pub use error::{CloudError, Result};
pub use schema::{check_structure, validate, StructureError};
pub use status::ServerStatus;
pub use wait::{converge, WaitSpec, DEFAULT_TIMEOUT, REBOOT_TIMEOUT};
