//! The probe action: pipe an `ncat` one-liner into a shell.
//!
//! The command line is built only from validated fields, so every piece is
//! already restricted to digits, dots, and plain words before it reaches the
//! shell.

use crate::input::{EchoInput, Protocol};
use sidecar_core::{ActionPerformer, ServiceError, ServiceResult};
use std::future::Future;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, warn};

/// Extra time the outer guard allows past the in-command `timeout`.
const GUARD_SLACK: Duration = Duration::from_secs(2);

/// Shortest `timeout` handed to `ncat`. `timeout 0` disables the limit.
pub const MIN_TIMEOUT_SECS: u64 = 1;

/// Format the shell line for a probe.
///
/// `timeout_secs` is raised to [`MIN_TIMEOUT_SECS`].
///
/// ```
/// use sidecar_echo::input::{EchoInput, Protocol};
/// use sidecar_echo::probe::probe_command;
///
/// let input = EchoInput {
///     addr: "203.0.113.7".into(),
///     port: 5000,
///     proto: Protocol::Udp,
///     text: "hello".into(),
/// };
/// assert_eq!(
///     probe_command(&input, 6),
///     "echo hello | timeout 6 ncat -u 203.0.113.7 5000"
/// );
/// ```
#[must_use]
pub fn probe_command(input: &EchoInput, timeout_secs: u64) -> String {
    let flags = match input.proto {
        Protocol::Udp => " -u",
        Protocol::Tcp => "",
    };

    let timeout_secs = timeout_secs.max(MIN_TIMEOUT_SECS);

    format!(
        "echo {} | timeout {timeout_secs} ncat{flags} {} {}",
        input.text, input.addr, input.port
    )
}

/// Sends the probe through `ncat`, driven by a shell reading from stdin.
#[derive(Debug, Clone)]
pub struct NcatProbe {
    shell: String,
    timeout: Duration,
}

impl NcatProbe {
    /// Create a probe that runs `shell` with the given `ncat` timeout.
    ///
    /// Timeouts below [`MIN_TIMEOUT_SECS`] are raised to it.
    #[must_use]
    pub fn new(shell: impl Into<String>, timeout: Duration) -> Self {
        Self {
            shell: shell.into(),
            timeout: timeout.max(Duration::from_secs(MIN_TIMEOUT_SECS)),
        }
    }

    /// Shell program the command is piped into.
    #[must_use]
    pub fn shell(&self) -> &str {
        &self.shell
    }

    /// Timeout passed to `timeout(1)` in the command.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn run(&self, input: EchoInput) -> ServiceResult<()> {
        let command = probe_command(&input, self.timeout.as_secs());
        debug!(shell = %self.shell, %command, "Spawning probe");

        let mut child = Command::new(&self.shell)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ServiceError::action_failed(format!("cannot spawn {}: {e}", self.shell)))?;

        // The pipe closes when `stdin` drops at the end of this block, which
        // lets the shell run the line and exit.
        {
            let mut stdin = child
                .stdin
                .take()
                .ok_or_else(|| ServiceError::action_failed("shell stdin not captured"))?;
            stdin
                .write_all(command.as_bytes())
                .await
                .map_err(|e| ServiceError::action_failed(format!("cannot write to shell: {e}")))?;
        }

        let guard = self.timeout + GUARD_SLACK;
        let status = tokio::time::timeout(guard, child.wait())
            .await
            .map_err(|_| {
                ServiceError::action_failed(format!("probe still running after {}s", guard.as_secs()))
            })?
            .map_err(|e| ServiceError::action_failed(format!("cannot wait for shell: {e}")))?;

        if status.success() {
            debug!(addr = %input.addr, port = input.port, proto = %input.proto, "Probe sent");
        } else {
            warn!(
                addr = %input.addr,
                port = input.port,
                proto = %input.proto,
                %status,
                "Probe command exited unsuccessfully"
            );
        }

        Ok(())
    }
}

impl Default for NcatProbe {
    fn default() -> Self {
        Self::new("bash", Duration::from_secs(6))
    }
}

impl ActionPerformer<EchoInput> for NcatProbe {
    type Output = ();

    fn perform(&self, input: EchoInput) -> impl Future<Output = ServiceResult<()>> + Send {
        self.run(input)
    }
}
