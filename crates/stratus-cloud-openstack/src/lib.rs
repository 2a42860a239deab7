//! OpenStack backend for the Stratus infrastructure driver contract
//!
//! Construction is two-step, with validation first:
//!
//! ```ignore
//! let config = OpenStackConfig::from_value(&params)?; // schema-gated
//! let driver = OpenStackDriver::new(config, compute); // compute: impl ComputeApi
//! ```
//!
//! The live connection is consumed behind [`ComputeApi`]; the vendor HTTP
//! client is supplied by the caller.

pub mod compute;
pub mod config;
pub mod driver;

// Re-exports
pub use compute::{
    AddressCollection, ComputeApi, CreateServer, FlavorEntry, ImageEntry, Page, RebuildServer,
    ServerDetail, ServerEntry, PRIVATE_NETWORK, PUBLIC_NETWORK,
};
pub use config::OpenStackConfig;
pub use driver::OpenStackDriver;
