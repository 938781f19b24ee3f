use super::{Outcome, SessionState, StructuredCommand};
use crate::backend::Method;

pub const REJECT_UNKNOWN_COMMAND: &str = "Error: No command or unknown command";
pub const REJECT_NO_DEVICE: &str = "Error: No device specified";
pub const REJECT_NO_METHOD: &str = "Error: No method specified";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Create,
    Delete,
    Enable,
    Disable,
    Status,
    InterfaceStatus,
    ShowConfig,
    Motd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirements {
    pub needs_method: bool,
    pub needs_target: bool,
}

impl Keyword {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "create" => Some(Self::Create),
            "delete" => Some(Self::Delete),
            "enable" => Some(Self::Enable),
            "disable" => Some(Self::Disable),
            "status" => Some(Self::Status),
            "interface_status" => Some(Self::InterfaceStatus),
            "show_config" => Some(Self::ShowConfig),
            "motd" => Some(Self::Motd),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Delete => "delete",
            Self::Enable => "enable",
            Self::Disable => "disable",
            Self::Status => "status",
            Self::InterfaceStatus => "interface_status",
            Self::ShowConfig => "show_config",
            Self::Motd => "motd",
        }
    }

    pub fn requirements(self) -> Requirements {
        match self {
            Self::Create | Self::Delete | Self::Enable | Self::Disable | Self::Status => {
                Requirements {
                    needs_method: true,
                    needs_target: true,
                }
            }
            Self::InterfaceStatus | Self::ShowConfig | Self::Motd => Requirements {
                needs_method: false,
                needs_target: true,
            },
        }
    }

}

impl std::fmt::Display for Keyword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCommand {
    pub keyword: Keyword,
    pub method: Option<Method>,
    pub target: String,
    pub argument_text: Option<String>,
}

pub fn validate(
    command: &StructuredCommand,
    session: &SessionState,
) -> Result<ValidatedCommand, Outcome> {
    let keyword = command
        .keyword
        .as_deref()
        .and_then(Keyword::parse)
        .ok_or_else(|| Outcome::rejected(REJECT_UNKNOWN_COMMAND))?;
    let requirements = keyword.requirements();

    let target = if requirements.needs_target {
        command
            .target
            .clone()
            .ok_or_else(|| Outcome::rejected(REJECT_NO_DEVICE))?
    } else {
        command.target.clone().unwrap_or_default()
    };

    let method = if requirements.needs_method {
        Some(
            session
                .selected_method()
                .ok_or_else(|| Outcome::rejected(REJECT_NO_METHOD))?,
        )
    } else {
        None
    };

    Ok(ValidatedCommand {
        keyword,
        method,
        target,
        argument_text: command.argument_text.clone(),
    })
}
