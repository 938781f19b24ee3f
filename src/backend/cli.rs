use super::ssh::SshRunner;
use super::{BackendError, DeviceCli, InterfaceSummary};
use crate::config::DeviceAuth;
use std::time::Duration;

const INTERFACE_BRIEF_COMMAND: &str = "show ip interface brief";
const BANNER_COMMAND: &str = "show banner motd";

#[derive(Debug, Clone)]
pub struct SshCliBackend {
    runner: SshRunner,
}

impl SshCliBackend {
    pub fn new(auth: &DeviceAuth, timeout: Duration) -> Self {
        Self {
            runner: SshRunner::new(&auth.username, timeout),
        }
    }
}

impl DeviceCli for SshCliBackend {
    fn interface_summary(&self, target: &str) -> Result<Vec<InterfaceSummary>, BackendError> {
        let output = self.runner.run_command(target, INTERFACE_BRIEF_COMMAND)?;
        Ok(parse_interface_brief(&output))
    }

    fn read_banner(&self, target: &str) -> Result<Option<String>, BackendError> {
        let output = self.runner.run_command(target, BANNER_COMMAND)?;
        let trimmed = output.trim();
        if trimmed.is_empty() || trimmed.to_ascii_lowercase().contains("not configured") {
            return Ok(None);
        }
        Ok(Some(trimmed.to_string()))
    }
}

pub fn parse_interface_brief(output: &str) -> Vec<InterfaceSummary> {
    let mut rows = Vec::new();
    for line in output.lines() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 6 {
            continue;
        }
        if tokens[0].eq_ignore_ascii_case("interface") {
            continue;
        }
        let status = tokens[4..tokens.len() - 1].join(" ").to_ascii_lowercase();
        rows.push(InterfaceSummary {
            name: tokens[0].to_string(),
            status,
        });
    }
    rows
}
