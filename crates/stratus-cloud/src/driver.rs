//! Infrastructure driver trait definition
//!
//! The provider-neutral contract every compute backend implements:
//! lifecycle mutations, inventory queries and snapshot-schedule
//! management, all expressed in generic identifiers and the shared status
//! vocabulary. Drivers hold one live provider connection and no cross-call
//! state; every operation re-resolves its handle against the provider.

use crate::error::Result;
use crate::status::ServerStatus;
use crate::wait::WaitSpec;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::IpAddr;

/// Opaque provider-assigned server identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServerHandle(String);

impl ServerHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ServerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ServerHandle {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ServerHandle {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Backend-defined server creation descriptor
///
/// Carries the device and implementation attribute bundles a concrete
/// driver derives name, image, flavor and network selection from. Which
/// keys are required is up to the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerSpec {
    pub device_attributes: serde_json::Value,
    pub implementation_attributes: serde_json::Value,
}

impl ServerSpec {
    pub fn new(device_attributes: serde_json::Value, implementation_attributes: serde_json::Value) -> Self {
        Self { device_attributes, implementation_attributes }
    }

    /// Get a device attribute as a specific type
    pub fn device_attr<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.device_attributes
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Get an implementation attribute as a specific type
    pub fn implementation_attr<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.implementation_attributes
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }
}

/// Backend-defined listing predicate, passed through to the provider
pub type ServerFilter = BTreeMap<String, String>;

/// Inventory row for server listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSummary {
    pub id: String,
    pub name: String,
    pub status: ServerStatus,
}

/// Inventory row for image and flavor listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSummary {
    pub id: String,
    pub name: String,
}

/// Interface visibility of a server address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressScope {
    Public,
    Private,
}

impl std::fmt::Display for AddressScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressScope::Public => write!(f, "public"),
            AddressScope::Private => write!(f, "private"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpVersion {
    V4,
    V6,
}

impl IpVersion {
    /// The version of a concrete address
    pub fn of(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(_) => IpVersion::V4,
            IpAddr::V6(_) => IpVersion::V6,
        }
    }
}

impl std::fmt::Display for IpVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IpVersion::V4 => write!(f, "IPv4"),
            IpVersion::V6 => write!(f, "IPv6"),
        }
    }
}

/// At most one address per family for a single network
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkAddresses {
    #[serde(rename = "4")]
    pub v4: Option<IpAddr>,
    #[serde(rename = "6")]
    pub v6: Option<IpAddr>,
}

impl NetworkAddresses {
    /// Record an address in its family slot; the last write wins.
    pub fn set(&mut self, addr: IpAddr) {
        match addr {
            IpAddr::V4(_) => self.v4 = Some(addr),
            IpAddr::V6(_) => self.v6 = Some(addr),
        }
    }

    pub fn get(&self, version: IpVersion) -> Option<IpAddr> {
        match version {
            IpVersion::V4 => self.v4,
            IpVersion::V6 => self.v6,
        }
    }
}

/// Server addresses keyed by network name
pub type IpAddressSet = BTreeMap<String, NetworkAddresses>;

/// Snapshot-schedule descriptor; `retention` of `None` means no schedule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSchedule {
    pub retention: Option<u32>,
}

/// Compute backend abstraction trait
///
/// All operations are synchronous from the caller's point of view: a
/// mutation with waiting enabled blocks the calling task until the target
/// status is confirmed or the timeout elapses. Concurrency across servers
/// is the caller's concern; concurrent mutations against the same handle
/// race at the provider.
#[async_trait]
pub trait InfrastructureDriver: Send + Sync {
    /// Backend name (e.g. "openstack")
    fn name(&self) -> &str;

    /// Create a server from a backend-defined spec and return its handle.
    /// With waiting enabled, blocks until the server is `active`.
    async fn create_server(&self, spec: &ServerSpec, wait: WaitSpec) -> Result<ServerHandle>;

    /// Resize to a new flavor; waits for `active`.
    async fn resize_server(&self, server: &ServerHandle, flavor: &str, wait: WaitSpec) -> Result<()>;

    /// Confirm a pending resize; waits for `active`.
    async fn confirm_resize_server(&self, server: &ServerHandle, wait: WaitSpec) -> Result<()>;

    /// Revert a pending resize; waits for `active`.
    async fn revert_resize_server(&self, server: &ServerHandle, wait: WaitSpec) -> Result<()>;

    /// Rebuild the server's OS image. Omitted flavor or image are re-read
    /// from the live server and reused; waits for `active`.
    async fn rebuild_server(
        &self,
        server: &ServerHandle,
        flavor: Option<&str>,
        image: Option<&str>,
        wait: WaitSpec,
    ) -> Result<()>;

    /// Delete the server; waits for `deleted`.
    async fn delete_server(&self, server: &ServerHandle, wait: WaitSpec) -> Result<()>;

    /// Reboot the server; waits for `active` with a shorter default
    /// timeout than the other mutations.
    async fn reboot_server(&self, server: &ServerHandle, wait: WaitSpec) -> Result<()>;

    /// Current status, normalized into the generic vocabulary.
    async fn server_status(&self, server: &ServerHandle) -> Result<ServerStatus>;

    /// Flavor id of the live server.
    async fn server_flavor(&self, server: &ServerHandle) -> Result<String>;

    /// Filtered projection of [`InfrastructureDriver::server_ips`].
    ///
    /// Returns `Ok(None)` when no matching address exists; a scope/version
    /// combination the backend does not expose at all is
    /// [`CloudError::Unsupported`](crate::CloudError::Unsupported).
    async fn server_address(
        &self,
        server: &ServerHandle,
        scope: AddressScope,
        version: IpVersion,
    ) -> Result<Option<IpAddr>>;

    async fn server_public_ipv4(&self, server: &ServerHandle) -> Result<Option<IpAddr>> {
        self.server_address(server, AddressScope::Public, IpVersion::V4).await
    }

    async fn server_private_ipv4(&self, server: &ServerHandle) -> Result<Option<IpAddr>> {
        self.server_address(server, AddressScope::Private, IpVersion::V4).await
    }

    async fn server_public_ipv6(&self, server: &ServerHandle) -> Result<Option<IpAddr>> {
        self.server_address(server, AddressScope::Public, IpVersion::V6).await
    }

    async fn server_private_ipv6(&self, server: &ServerHandle) -> Result<Option<IpAddr>> {
        self.server_address(server, AddressScope::Private, IpVersion::V6).await
    }

    /// All addresses of the server, flattened per network name.
    async fn server_ips(&self, server: &ServerHandle) -> Result<IpAddressSet>;

    /// List servers matching a backend-defined filter, in provider order.
    async fn servers(&self, filter: &ServerFilter) -> Result<Vec<ServerSummary>>;

    /// List available images, in provider order.
    async fn images(&self) -> Result<Vec<ResourceSummary>>;

    /// List available flavors, in provider order.
    async fn flavors(&self) -> Result<Vec<ResourceSummary>>;

    /// Current snapshot schedule of the server.
    async fn image_schedule(&self, server: &ServerHandle) -> Result<ImageSchedule>;

    /// Set the snapshot-schedule retention. Idempotent.
    async fn create_image_schedule(&self, server: &ServerHandle, retention: u32) -> Result<()>;

    /// Same underlying set-retention operation as
    /// [`InfrastructureDriver::create_image_schedule`].
    async fn update_image_schedule(&self, server: &ServerHandle, retention: u32) -> Result<()> {
        self.create_image_schedule(server, retention).await
    }

    /// Clear the snapshot schedule.
    async fn delete_image_schedule(&self, server: &ServerHandle) -> Result<()>;
}
