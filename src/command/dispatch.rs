use super::validate::REJECT_NO_METHOD;
use super::{Keyword, Outcome, ValidatedCommand};
use crate::backend::{
    BackendError, DeviceCli, InterfaceSummary, Management, Method, PlaybookRunner,
};
use crate::shared::logging::append_agent_log;
use std::path::PathBuf;

pub const NO_BANNER_MESSAGE: &str = "Error: No MOTD Configured";
pub const SHOW_CONFIG_MESSAGE: &str = "show running config";
pub const BANNER_WRITTEN_MESSAGE: &str = "Ok: success";

pub struct Dispatcher {
    restconf: Box<dyn Management>,
    netconf: Box<dyn Management>,
    cli: Box<dyn DeviceCli>,
    playbook: Box<dyn PlaybookRunner>,
    interface_name: String,
    state_root: Option<PathBuf>,
}

impl Dispatcher {
    pub fn new(
        restconf: Box<dyn Management>,
        netconf: Box<dyn Management>,
        cli: Box<dyn DeviceCli>,
        playbook: Box<dyn PlaybookRunner>,
        interface_name: String,
    ) -> Self {
        Self {
            restconf,
            netconf,
            cli,
            playbook,
            interface_name,
            state_root: None,
        }
    }

    pub fn with_state_root(mut self, state_root: PathBuf) -> Self {
        self.state_root = Some(state_root);
        self
    }

    pub fn dispatch(&self, command: &ValidatedCommand) -> Outcome {
        match command.keyword {
            Keyword::Create | Keyword::Delete | Keyword::Enable | Keyword::Disable => {
                self.run_mutation(command)
            }
            Keyword::Status => self.run_status(command),
            Keyword::InterfaceStatus => self.run_interface_status(command),
            Keyword::ShowConfig => self.run_show_config(command),
            Keyword::Motd => self.run_motd(command),
        }
    }

    fn management(&self, method: Method) -> &dyn Management {
        match method {
            Method::Restconf => self.restconf.as_ref(),
            Method::Netconf => self.netconf.as_ref(),
        }
    }

    fn run_mutation(&self, command: &ValidatedCommand) -> Outcome {
        let Some(method) = command.method else {
            return Outcome::rejected(REJECT_NO_METHOD);
        };
        let backend = self.management(method);
        let target = command.target.as_str();

        let exists = match backend.exists(target) {
            Ok(exists) => exists,
            Err(err) => return self.backend_failure(command, &err),
        };
        let is_noop = match command.keyword {
            Keyword::Create => exists,
            _ => !exists,
        };
        if is_noop {
            return Outcome::already_in_desired_state(self.cannot_message(command.keyword));
        }

        let result = match command.keyword {
            Keyword::Create => backend.create(target),
            Keyword::Delete => backend.delete(target),
            Keyword::Enable => backend.set_enabled(target, true),
            Keyword::Disable => backend.set_enabled(target, false),
            _ => unreachable!("run_mutation only receives mutating keywords"),
        };
        match result {
            Ok(()) => Outcome::ok(self.success_message(command.keyword, method)),
            Err(err) => self.backend_failure(command, &err),
        }
    }

    fn run_status(&self, command: &ValidatedCommand) -> Outcome {
        let Some(method) = command.method else {
            return Outcome::rejected(REJECT_NO_METHOD);
        };
        let name = &self.interface_name;
        let method_name = method.display_name();
        match self.management(method).query_state(&command.target) {
            Ok(Some(state)) => {
                let (admin, oper) = (state.admin_status.as_str(), state.oper_status.as_str());
                match (admin, oper) {
                    ("up", "up") => {
                        Outcome::ok(format!("Interface {name} is enabled (checked by {method_name})"))
                    }
                    ("down", "down") => Outcome::ok(format!(
                        "Interface {name} is disabled (checked by {method_name})"
                    )),
                    _ => Outcome::ok(format!(
                        "Interface {name} admin-status={admin} oper-status={oper} (checked by {method_name})"
                    )),
                }
            }
            Ok(None) => Outcome::not_found(format!(
                "No Interface {name} (checked by {method_name})"
            )),
            Err(err) => self.backend_failure(command, &err),
        }
    }

    fn run_interface_status(&self, command: &ValidatedCommand) -> Outcome {
        match self.cli.interface_summary(&command.target) {
            Ok(rows) => Outcome::ok(summary_message(&rows)),
            Err(err) => self.backend_failure(command, &err),
        }
    }

    fn run_show_config(&self, command: &ValidatedCommand) -> Outcome {
        match self.playbook.retrieve_running_config(&command.target) {
            Ok(artifact) => Outcome::ok_with_attachment(SHOW_CONFIG_MESSAGE, artifact),
            Err(err) => self.backend_failure(command, &err),
        }
    }

    fn run_motd(&self, command: &ValidatedCommand) -> Outcome {
        if let Some(banner) = command
            .argument_text
            .as_deref()
            .filter(|text| !text.trim().is_empty())
        {
            return match self.playbook.write_banner(&command.target, banner) {
                Ok(()) => Outcome::ok(BANNER_WRITTEN_MESSAGE),
                Err(err) => self.backend_failure(command, &err),
            };
        }
        match self.cli.read_banner(&command.target) {
            Ok(Some(banner)) => Outcome::ok(banner),
            Ok(None) => Outcome::not_found(NO_BANNER_MESSAGE),
            Err(err) => self.backend_failure(command, &err),
        }
    }

    fn success_message(&self, keyword: Keyword, method: Method) -> String {
        let verb = match keyword {
            Keyword::Create => "created",
            Keyword::Delete => "deleted",
            Keyword::Enable => "enabled",
            Keyword::Disable => "shutdowned",
            _ => unreachable!("only mutating keywords have success verbs"),
        };
        format!(
            "Interface {} is {verb} successfully using {}",
            self.interface_name,
            method.display_name()
        )
    }

    fn cannot_message(&self, keyword: Keyword) -> String {
        let verb = match keyword {
            Keyword::Create => "create",
            Keyword::Delete => "delete",
            Keyword::Enable => "enable",
            Keyword::Disable => "shutdown",
            _ => unreachable!("only mutating keywords have no-op forms"),
        };
        format!("Cannot {verb}: Interface {}", self.interface_name)
    }

    fn backend_failure(&self, command: &ValidatedCommand, err: &BackendError) -> Outcome {
        if let Some(state_root) = &self.state_root {
            let _ = append_agent_log(
                state_root,
                &format!(
                    "backend error during {} on {}: {err}",
                    command.keyword, command.target
                ),
            );
        }
        Outcome::backend_error(err.label())
    }
}

fn summary_message(rows: &[InterfaceSummary]) -> String {
    let mut up = 0_usize;
    let mut down = 0_usize;
    let mut admin_down = 0_usize;
    let mut statuses = Vec::with_capacity(rows.len());
    for row in rows {
        statuses.push(format!("{} {}", row.name, row.status));
        if row.status == "up" {
            up += 1;
        } else if row.status == "down" {
            down += 1;
        } else if row.status.contains("administratively down") {
            admin_down += 1;
        }
    }
    format!(
        "{} -> {up} up, {down} down, {admin_down} administratively down",
        statuses.join(", ")
    )
}
