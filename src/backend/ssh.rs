use super::subprocess::{run_bounded, RunFailure};
use super::BackendError;
use std::process::Command;
use std::time::Duration;

#[derive(Debug, Clone)]
pub(crate) struct SshRunner {
    binary: String,
    username: String,
    timeout: Duration,
}

impl SshRunner {
    pub(crate) fn new(username: &str, timeout: Duration) -> Self {
        Self {
            binary: "ssh".to_string(),
            username: username.to_string(),
            timeout,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_binary(binary: &str, username: &str, timeout: Duration) -> Self {
        Self {
            binary: binary.to_string(),
            username: username.to_string(),
            timeout,
        }
    }

    fn base_command(&self) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .arg("-o")
            .arg("BatchMode=yes")
            .arg("-o")
            .arg("StrictHostKeyChecking=no")
            .arg("-l")
            .arg(&self.username);
        command
    }

    pub(crate) fn run_command(&self, target: &str, command: &str) -> Result<String, BackendError> {
        let mut invocation = self.base_command();
        invocation.arg(target).arg(command);
        self.run(target, invocation, None)
    }

    pub(crate) fn run_subsystem(
        &self,
        target: &str,
        port: u16,
        subsystem: &str,
        payload: &str,
    ) -> Result<String, BackendError> {
        let mut invocation = self.base_command();
        invocation
            .arg("-p")
            .arg(port.to_string())
            .arg("-s")
            .arg(target)
            .arg(subsystem);
        self.run(target, invocation, Some(payload))
    }

    fn run(
        &self,
        target: &str,
        invocation: Command,
        payload: Option<&str>,
    ) -> Result<String, BackendError> {
        let output = run_bounded(invocation, payload, self.timeout).map_err(|err| match err {
            RunFailure::MissingBinary => BackendError::MissingBinary {
                binary: self.binary.clone(),
            },
            RunFailure::TimedOut => BackendError::Timeout {
                target: target.to_string(),
                timeout_secs: self.timeout.as_secs(),
            },
            RunFailure::Io(err) => BackendError::SshCommand {
                target: target.to_string(),
                reason: err.to_string(),
            },
        })?;

        if !output.success {
            let reason = if output.stderr.trim().is_empty() {
                format!("exit code {}", output.exit_code.unwrap_or(-1))
            } else {
                output.stderr.trim().to_string()
            };
            return Err(BackendError::SshCommand {
                target: target.to_string(),
                reason,
            });
        }

        Ok(output.stdout)
    }
}
