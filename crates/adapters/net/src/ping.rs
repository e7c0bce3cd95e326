//! Host presence through the system `ping`.

use std::process::Stdio;
use std::time::Duration;

use hued_app::ports::HostProbe;

/// Extra time granted to the `ping` process beyond its own deadline.
const GRACE: Duration = Duration::from_millis(500);

/// Sends a single echo request and waits at most `timeout` for the reply.
#[derive(Debug, Clone)]
pub struct PingProbe {
    program: String,
    timeout: Duration,
}

impl PingProbe {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self::with_program("ping", timeout)
    }

    /// Use another `ping`-compatible executable.
    pub fn with_program(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }
}

impl HostProbe for PingProbe {
    async fn is_reachable(&self, host: &str) -> bool {
        let wait_secs = self.timeout.as_secs().max(1).to_string();
        let mut command = tokio::process::Command::new(&self.program);
        command
            .args(["-c", "1", "-q", "-W", wait_secs.as_str(), host])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        match tokio::time::timeout(self.timeout + GRACE, command.status()).await {
            Ok(Ok(status)) => status.success(),
            Ok(Err(err)) => {
                tracing::warn!(%host, program = %self.program, error = %err, "could not run ping");
                false
            }
            Err(_) => {
                tracing::debug!(%host, "ping timed out");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn should_report_reachable_when_ping_succeeds() {
        let probe = PingProbe::with_program("true", Duration::from_secs(1));
        assert!(probe.is_reachable("phone.lan").await);
    }

    #[tokio::test]
    async fn should_report_unreachable_when_ping_fails() {
        let probe = PingProbe::with_program("false", Duration::from_secs(1));
        assert!(!probe.is_reachable("phone.lan").await);
    }

    #[tokio::test]
    async fn should_report_unreachable_when_ping_is_missing() {
        let probe = PingProbe::with_program("/nonexistent/ping", Duration::from_secs(1));
        assert!(!probe.is_reachable("phone.lan").await);
    }
}
