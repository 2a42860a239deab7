//! OpenStack driver implementation
//!
//! Translates the generic [`InfrastructureDriver`] contract into compute
//! connection calls, normalizing native status tokens and running the
//! shared wait engine after each mutation when the caller opts in.

use crate::compute::{ComputeApi, CreateServer, RebuildServer, PRIVATE_NETWORK, PUBLIC_NETWORK};
use crate::config::OpenStackConfig;
use async_trait::async_trait;
use std::net::IpAddr;
use std::time::Duration;
use stratus_cloud::{
    converge, AddressScope, CloudError, ImageSchedule, InfrastructureDriver, IpAddressSet,
    IpVersion, ResourceSummary, Result, ServerFilter, ServerHandle, ServerSpec, ServerStatus,
    ServerSummary, WaitSpec, DEFAULT_TIMEOUT, REBOOT_TIMEOUT,
};

/// Native status tokens used as wait targets
const ACTIVE: &str = "ACTIVE";
const DELETED: &str = "DELETED";

/// OpenStack-backed infrastructure driver
///
/// Wraps one live compute connection for its entire lifetime. The driver
/// is stateless across calls: every operation re-resolves its handle
/// against the provider, so it is safe to share across tasks operating on
/// different servers.
pub struct OpenStackDriver<C> {
    config: OpenStackConfig,
    compute: C,
}

impl<C: ComputeApi> OpenStackDriver<C> {
    /// Wrap a live compute connection established from already-validated
    /// connection parameters (see [`OpenStackConfig::from_value`]).
    pub fn new(config: OpenStackConfig, compute: C) -> Self {
        Self { config, compute }
    }

    pub fn region(&self) -> &str {
        &self.config.region
    }

    /// Shared wait step run after each mutation.
    async fn settle(
        &self,
        id: &str,
        native_target: &str,
        wait: WaitSpec,
        default_timeout: Duration,
    ) -> Result<()> {
        if !wait.is_enabled() {
            return Ok(());
        }

        let target = ServerStatus::from_provider(native_target);
        let timeout = wait.timeout_or(default_timeout);
        converge(
            target,
            timeout,
            move |timeout| self.compute.wait_for_server_status(id, native_target, timeout),
            move || async move {
                let detail = self.compute.server(id).await?;
                Ok(ServerStatus::from_provider(&detail.status))
            },
        )
        .await
    }
}

fn required_device_attr(spec: &ServerSpec, key: &str) -> Result<String> {
    spec.device_attr(key).ok_or_else(|| {
        CloudError::InvalidConfig(format!("server spec is missing required device attribute `{key}`"))
    })
}

#[async_trait]
impl<C: ComputeApi> InfrastructureDriver for OpenStackDriver<C> {
    fn name(&self) -> &str {
        "openstack"
    }

    async fn create_server(&self, spec: &ServerSpec, wait: WaitSpec) -> Result<ServerHandle> {
        let request = CreateServer {
            name: required_device_attr(spec, "dns.external.fqdn")?,
            image_id: required_device_attr(spec, "implementation.image_id")?,
            flavor_id: required_device_attr(spec, "implementation.flavor_id")?,
            networks: {
                let mut networks = vec![PUBLIC_NETWORK.to_string(), PRIVATE_NETWORK.to_string()];
                if let Some(network) = spec.implementation_attr::<String>("default_cloud_network") {
                    networks.push(network);
                }
                networks
            },
        };

        tracing::info!(
            server = %request.name,
            image_id = %request.image_id,
            flavor_id = %request.flavor_id,
            "creating server"
        );

        let id = self.compute.create_server(&request).await?;
        self.settle(&id, ACTIVE, wait, DEFAULT_TIMEOUT).await?;
        Ok(ServerHandle::new(id))
    }

    async fn resize_server(&self, server: &ServerHandle, flavor: &str, wait: WaitSpec) -> Result<()> {
        tracing::info!(%server, %flavor, "resizing server");
        self.compute.resize_server(server.as_str(), flavor).await?;
        self.settle(server.as_str(), ACTIVE, wait, DEFAULT_TIMEOUT).await
    }

    async fn confirm_resize_server(&self, server: &ServerHandle, wait: WaitSpec) -> Result<()> {
        tracing::info!(%server, "confirming resize");
        self.compute.confirm_resize(server.as_str()).await?;
        self.settle(server.as_str(), ACTIVE, wait, DEFAULT_TIMEOUT).await
    }

    async fn revert_resize_server(&self, server: &ServerHandle, wait: WaitSpec) -> Result<()> {
        tracing::info!(%server, "reverting resize");
        self.compute.revert_resize(server.as_str()).await?;
        self.settle(server.as_str(), ACTIVE, wait, DEFAULT_TIMEOUT).await
    }

    async fn rebuild_server(
        &self,
        server: &ServerHandle,
        flavor: Option<&str>,
        image: Option<&str>,
        wait: WaitSpec,
    ) -> Result<()> {
        // A rebuild keeps the current flavor and name unless overridden;
        // both are read from the live server.
        let current = self.compute.server(server.as_str()).await?;
        let request = RebuildServer {
            name: current.name,
            flavor_id: flavor.map(str::to_owned).unwrap_or(current.flavor_id),
            image_id: image.map(str::to_owned).unwrap_or(current.image_id),
        };

        tracing::info!(
            %server,
            flavor_id = %request.flavor_id,
            image_id = %request.image_id,
            "rebuilding server"
        );

        self.compute.rebuild_server(server.as_str(), &request).await?;
        self.settle(server.as_str(), ACTIVE, wait, DEFAULT_TIMEOUT).await
    }

    async fn delete_server(&self, server: &ServerHandle, wait: WaitSpec) -> Result<()> {
        tracing::info!(%server, "deleting server");
        self.compute.delete_server(server.as_str()).await?;
        self.settle(server.as_str(), DELETED, wait, DEFAULT_TIMEOUT).await
    }

    async fn reboot_server(&self, server: &ServerHandle, wait: WaitSpec) -> Result<()> {
        tracing::info!(%server, "rebooting server");
        self.compute.reboot_server(server.as_str()).await?;
        self.settle(server.as_str(), ACTIVE, wait, REBOOT_TIMEOUT).await
    }

    async fn server_status(&self, server: &ServerHandle) -> Result<ServerStatus> {
        let detail = self.compute.server(server.as_str()).await?;
        Ok(ServerStatus::from_provider(&detail.status))
    }

    async fn server_flavor(&self, server: &ServerHandle) -> Result<String> {
        let detail = self.compute.server(server.as_str()).await?;
        Ok(detail.flavor_id)
    }

    async fn server_address(
        &self,
        server: &ServerHandle,
        scope: AddressScope,
        version: IpVersion,
    ) -> Result<Option<IpAddr>> {
        // This backend never reports private IPv6 addresses.
        if scope == AddressScope::Private && version == IpVersion::V6 {
            return Err(CloudError::Unsupported(format!(
                "the {} backend does not expose {scope} {version} addresses",
                self.name()
            )));
        }

        let detail = self.compute.server(server.as_str()).await?;
        let label = match scope {
            AddressScope::Public => PUBLIC_NETWORK,
            AddressScope::Private => PRIVATE_NETWORK,
        };

        Ok(detail
            .addresses
            .get(label)
            .and_then(|addrs| addrs.iter().copied().find(|a| IpVersion::of(*a) == version)))
    }

    async fn server_ips(&self, server: &ServerHandle) -> Result<IpAddressSet> {
        let detail = self.compute.server(server.as_str()).await?;

        let mut ips = IpAddressSet::new();
        for (network, addresses) in &detail.addresses {
            let network = network.replace(' ', "_");
            let entry = ips.entry(network).or_default();
            for addr in addresses {
                entry.set(*addr);
            }
        }
        Ok(ips)
    }

    async fn servers(&self, filter: &ServerFilter) -> Result<Vec<ServerSummary>> {
        let mut servers = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let page = self.compute.list_servers(filter, marker.as_deref()).await?;
            servers.extend(page.items.into_iter().map(|entry| ServerSummary {
                id: entry.id,
                name: entry.name,
                status: ServerStatus::from_provider(&entry.status),
            }));
            match page.next {
                Some(next) => marker = Some(next),
                None => break,
            }
        }

        Ok(servers)
    }

    async fn images(&self) -> Result<Vec<ResourceSummary>> {
        let mut images = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let page = self.compute.list_images(marker.as_deref()).await?;
            images.extend(
                page.items
                    .into_iter()
                    .map(|entry| ResourceSummary { id: entry.id, name: entry.name }),
            );
            match page.next {
                Some(next) => marker = Some(next),
                None => break,
            }
        }

        Ok(images)
    }

    async fn flavors(&self) -> Result<Vec<ResourceSummary>> {
        let mut flavors = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let page = self.compute.list_flavors(marker.as_deref()).await?;
            flavors.extend(
                page.items
                    .into_iter()
                    .map(|entry| ResourceSummary { id: entry.id, name: entry.name }),
            );
            match page.next {
                Some(next) => marker = Some(next),
                None => break,
            }
        }

        Ok(flavors)
    }

    async fn image_schedule(&self, server: &ServerHandle) -> Result<ImageSchedule> {
        let retention = self.compute.image_schedule(server.as_str()).await?;
        Ok(ImageSchedule { retention })
    }

    async fn create_image_schedule(&self, server: &ServerHandle, retention: u32) -> Result<()> {
        tracing::info!(%server, retention, "setting image schedule");
        self.compute.set_image_schedule(server.as_str(), Some(retention)).await
    }

    async fn delete_image_schedule(&self, server: &ServerHandle) -> Result<()> {
        tracing::info!(%server, "clearing image schedule");
        self.compute.set_image_schedule(server.as_str(), None).await
    }
}
