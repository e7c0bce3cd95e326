//! Host probe port — is a host on the network right now?

use std::future::Future;

/// Reachability check with a bounded timeout.
///
/// Implementations must never fail: timeouts and errors are reported as
/// unreachable.
pub trait HostProbe {
    fn is_reachable(&self, host: &str) -> impl Future<Output = bool> + Send;
}
