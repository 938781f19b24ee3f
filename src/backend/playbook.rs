use super::subprocess::{run_bounded, RunFailure};
use super::{BackendError, PlaybookRunner};
use crate::config::PlaybookSettings;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

const ANSIBLE_BINARY: &str = "ansible-playbook";

#[derive(Debug, Clone)]
pub struct AnsibleRunner {
    playbooks: PlaybookSettings,
    devices: BTreeMap<String, String>,
    timeout: Duration,
}

impl AnsibleRunner {
    pub fn new(
        playbooks: PlaybookSettings,
        devices: BTreeMap<String, String>,
        timeout: Duration,
    ) -> Self {
        Self {
            playbooks,
            devices,
            timeout,
        }
    }

    fn device_name(&self, target: &str) -> String {
        self.devices
            .get(target)
            .cloned()
            .unwrap_or_else(|| target.replace('.', "-"))
    }

    fn artifact_path(&self, target: &str) -> PathBuf {
        let file_name = format!("show_run_{}.txt", self.device_name(target));
        match &self.playbooks.working_dir {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        }
    }

    fn run_playbook(
        &self,
        playbook: &Path,
        target: &str,
        extra_vars: &[String],
    ) -> Result<(), BackendError> {
        let failed = || BackendError::PlaybookFailed {
            playbook: playbook.display().to_string(),
            target: target.to_string(),
        };

        let mut command = Command::new(ANSIBLE_BINARY);
        command.arg(playbook);
        command.arg("-e").arg(format!("router_ip={target}"));
        for var in extra_vars {
            command.arg("-e").arg(var);
        }
        if let Some(dir) = &self.playbooks.working_dir {
            command.current_dir(dir);
        }

        // any launch failure collapses to the playbook-failed outcome
        let output = run_bounded(command, None, self.timeout).map_err(|_: RunFailure| failed())?;

        let recap = format!("{}{}", output.stdout, output.stderr);
        if !output.success || !recap.contains("failed=0") {
            return Err(failed());
        }
        Ok(())
    }
}

fn banner_var(banner: &str) -> String {
    let escaped = banner.replace('"', "\\\"");
    format!("motd_message=\"{escaped}\"")
}

impl PlaybookRunner for AnsibleRunner {
    fn retrieve_running_config(&self, target: &str) -> Result<PathBuf, BackendError> {
        self.run_playbook(&self.playbooks.showrun, target, &[])?;
        let artifact = self.artifact_path(target);
        if !artifact.exists() {
            return Err(BackendError::MissingArtifact {
                path: artifact.display().to_string(),
            });
        }
        Ok(artifact)
    }

    fn write_banner(&self, target: &str, banner: &str) -> Result<(), BackendError> {
        self.run_playbook(&self.playbooks.motd, target, &[banner_var(banner)])
    }
}
