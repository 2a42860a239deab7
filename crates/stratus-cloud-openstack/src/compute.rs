//! Compute connection contract
//!
//! The live provider connection is consumed behind this trait: resource
//! lookup by id, marker-paginated listings, the mutation calls, the
//! provider's own bounded wait-until-status poll, and the snapshot
//! schedule feature. Implementations wrap the vendor SDK or HTTP client;
//! that client itself is supplied by the caller, not built here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::IpAddr;
use std::time::Duration;
use stratus_cloud::{Result, ServerFilter};

/// Provider labels for the standard shared networks every server joins
pub const PUBLIC_NETWORK: &str = "public";
pub const PRIVATE_NETWORK: &str = "private";

/// One page of a marker-paginated listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Marker for the next page, if any
    pub next: Option<String>,
}

impl<T> Page<T> {
    /// A single-page result with no continuation.
    pub fn complete(items: Vec<T>) -> Self {
        Self { items, next: None }
    }
}

/// Addresses keyed by network label, as the provider reports them
pub type AddressCollection = BTreeMap<String, Vec<IpAddr>>;

/// Live server state as reported by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerDetail {
    pub id: String,
    pub name: String,
    /// Native status token, e.g. `ACTIVE` or `VERIFY_RESIZE`
    pub status: String,
    #[serde(rename = "flavorId")]
    pub flavor_id: String,
    #[serde(rename = "imageId")]
    pub image_id: String,
    pub addresses: AddressCollection,
}

/// Inventory entry from a server listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerEntry {
    pub id: String,
    pub name: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageEntry {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlavorEntry {
    pub id: String,
    pub name: String,
}

/// Server creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateServer {
    pub name: String,
    #[serde(rename = "imageId")]
    pub image_id: String,
    #[serde(rename = "flavorId")]
    pub flavor_id: String,
    /// Network labels to attach, in order
    pub networks: Vec<String>,
}

/// Rebuild request; the server name is kept, the OS image replaced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebuildServer {
    pub name: String,
    #[serde(rename = "imageId")]
    pub image_id: String,
    #[serde(rename = "flavorId")]
    pub flavor_id: String,
}

/// The opaque provider connection the driver is constructed over
///
/// Provider-level failures (auth, quota, not-found) surface through
/// [`CloudError`](stratus_cloud::CloudError) untranslated by the driver.
#[async_trait]
pub trait ComputeApi: Send + Sync {
    /// Re-resolve a server by id and return its live state.
    async fn server(&self, id: &str) -> Result<ServerDetail>;

    /// Issue a creation request and return the new server's id.
    async fn create_server(&self, request: &CreateServer) -> Result<String>;

    async fn resize_server(&self, id: &str, flavor_id: &str) -> Result<()>;
    async fn confirm_resize(&self, id: &str) -> Result<()>;
    async fn revert_resize(&self, id: &str) -> Result<()>;
    async fn rebuild_server(&self, id: &str, request: &RebuildServer) -> Result<()>;
    async fn delete_server(&self, id: &str) -> Result<()>;
    async fn reboot_server(&self, id: &str) -> Result<()>;

    /// Provider-native bounded poll: returns once the server reports the
    /// native `status` token or the timeout elapses, whichever comes
    /// first. Arrival at the target is not guaranteed; callers re-check.
    async fn wait_for_server_status(&self, id: &str, status: &str, timeout: Duration) -> Result<()>;

    async fn list_servers(
        &self,
        filter: &ServerFilter,
        marker: Option<&str>,
    ) -> Result<Page<ServerEntry>>;

    async fn list_images(&self, marker: Option<&str>) -> Result<Page<ImageEntry>>;
    async fn list_flavors(&self, marker: Option<&str>) -> Result<Page<FlavorEntry>>;

    /// Current snapshot-schedule retention, if a schedule exists.
    async fn image_schedule(&self, id: &str) -> Result<Option<u32>>;

    /// Set (or clear, with `None`) the snapshot-schedule retention.
    async fn set_image_schedule(&self, id: &str, retention: Option<u32>) -> Result<()>;
}
