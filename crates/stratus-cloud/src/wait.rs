//! Wait-for-state engine
//!
//! One blocking poll-until-target combinator shared by every mutating
//! driver operation; only the target status and the timeout vary per
//! operation. There is no cancellation hook: the only exits are
//! target-reached or timeout.

use crate::error::{CloudError, Result};
use crate::status::ServerStatus;
use std::future::Future;
use std::time::Duration;

/// Default wait timeout for mutating operations.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Default wait timeout for reboots, which settle faster.
pub const REBOOT_TIMEOUT: Duration = Duration::from_secs(300);

/// Per-call opt-in to blocking completion
///
/// Not persisted anywhere; attached to each mutating call. A timeout of
/// `None` means "use the operation's default".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WaitSpec {
    enabled: bool,
    timeout: Option<Duration>,
}

impl WaitSpec {
    /// Return as soon as the provider accepts the mutation.
    pub fn none() -> Self {
        Self::default()
    }

    /// Block until the target status, with the operation's default timeout.
    pub fn wait() -> Self {
        Self { enabled: true, timeout: None }
    }

    /// Block until the target status, with an explicit timeout.
    pub fn wait_for(timeout: Duration) -> Self {
        Self { enabled: true, timeout: Some(timeout) }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Effective timeout given the operation's default.
    pub fn timeout_or(&self, default: Duration) -> Duration {
        self.timeout.unwrap_or(default)
    }
}

/// Block until a resource reaches `target` or `timeout` elapses.
///
/// `block` is the provider's own bounded status poll. It may return
/// without the resource having arrived at the target, so the status is
/// re-fetched through `status` and compared explicitly afterwards; a miss
/// raises [`CloudError::Timeout`] carrying the last observed status.
///
/// The provider mutation has already been issued by the time this runs, so
/// a timeout means "unknown completion", never "operation failed".
pub async fn converge<B, BFut, S, SFut>(
    target: ServerStatus,
    timeout: Duration,
    block: B,
    status: S,
) -> Result<()>
where
    B: FnOnce(Duration) -> BFut,
    BFut: Future<Output = Result<()>>,
    S: FnOnce() -> SFut,
    SFut: Future<Output = Result<ServerStatus>>,
{
    tracing::debug!(%target, ?timeout, "waiting for server status");
    block(timeout).await?;

    let last = status().await?;
    if last != target {
        tracing::warn!(%target, %last, ?timeout, "server did not reach target status");
        return Err(CloudError::Timeout { target, last, timeout });
    }
    Ok(())
}
