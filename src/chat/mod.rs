use std::path::Path;

pub mod webex;

pub use webex::WebexClient;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("missing required env var `{0}`")]
    MissingEnvVar(String),
    #[error("no chat room is configured; set chat.room_id or WEBEX_ROOM_ID")]
    MissingRoom,
    #[error("chat api request failed: {0}")]
    ApiRequest(String),
    #[error("chat api responded with status {0}")]
    ApiStatus(u16),
    #[error("chat api reply could not be decoded: {0}")]
    ApiDecode(String),
    #[error("failed to read attachment {path}: {source}")]
    Attachment {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub trait ChatTransport {
    fn fetch_latest(&self) -> Result<Option<ChatMessage>, ChatError>;
    fn post(&self, text: &str, attachment: Option<&Path>) -> Result<(), ChatError>;
}

pub(crate) fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
