use std::path::PathBuf;

pub mod cli;
pub mod netconf;
pub mod playbook;
pub mod restconf;
pub(crate) mod ssh;
pub(crate) mod subprocess;

pub use cli::SshCliBackend;
pub use netconf::NetconfBackend;
pub use playbook::AnsibleRunner;
pub use restconf::RestconfBackend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Restconf,
    Netconf,
}

impl Method {
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Restconf => "Restconf",
            Self::Netconf => "Netconf",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "restconf" => Some(Self::Restconf),
            "netconf" => Some(Self::Netconf),
            _ => None,
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("restconf request to {url} failed: {reason}")]
    RestconfRequest { url: String, reason: String },
    #[error("restconf returned unexpected status {status} for {url}")]
    RestconfStatus { url: String, status: u16 },
    #[error("restconf reply could not be decoded: {0}")]
    RestconfDecode(String),
    #[error("netconf session to {target} failed: {reason}")]
    NetconfSession { target: String, reason: String },
    #[error("netconf rpc was not acknowledged: {reply}")]
    NetconfRejected { reply: String },
    #[error("ssh command on {target} failed: {reason}")]
    SshCommand { target: String, reason: String },
    #[error("ssh binary `{binary}` is not installed")]
    MissingBinary { binary: String },
    #[error("command on {target} exceeded the {timeout_secs}s deadline")]
    Timeout { target: String, timeout_secs: u64 },
    #[error("playbook {playbook} failed for {target}")]
    PlaybookFailed { playbook: String, target: String },
    #[error("playbook artifact {path} was not produced")]
    MissingArtifact { path: String },
}

impl BackendError {
    pub fn label(&self) -> &'static str {
        match self {
            Self::RestconfRequest { .. }
            | Self::RestconfStatus { .. }
            | Self::RestconfDecode(_) => "Restconf",
            Self::NetconfSession { .. } | Self::NetconfRejected { .. } => "Netconf",
            Self::SshCommand { .. } | Self::MissingBinary { .. } | Self::Timeout { .. } => "Ssh",
            Self::PlaybookFailed { .. } | Self::MissingArtifact { .. } => "Ansible",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceState {
    pub admin_status: String,
    pub oper_status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceSummary {
    pub name: String,
    pub status: String,
}

pub trait Management {
    fn exists(&self, target: &str) -> Result<bool, BackendError>;
    fn create(&self, target: &str) -> Result<(), BackendError>;
    fn delete(&self, target: &str) -> Result<(), BackendError>;
    fn set_enabled(&self, target: &str, enabled: bool) -> Result<(), BackendError>;
    fn query_state(&self, target: &str) -> Result<Option<InterfaceState>, BackendError>;
}

pub trait DeviceCli {
    fn interface_summary(&self, target: &str) -> Result<Vec<InterfaceSummary>, BackendError>;
    fn read_banner(&self, target: &str) -> Result<Option<String>, BackendError>;
}

pub trait PlaybookRunner {
    fn retrieve_running_config(&self, target: &str) -> Result<PathBuf, BackendError>;
    fn write_banner(&self, target: &str, banner: &str) -> Result<(), BackendError>;
}
