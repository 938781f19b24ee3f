use super::{non_empty_env, ChatError, ChatMessage, ChatTransport};
use crate::config::ChatSettings;
use serde::Deserialize;
use serde_json::json;
use std::fs;
use std::path::Path;
use std::time::Duration;

const DEFAULT_API_BASE: &str = "https://webexapis.com/v1";
const TOKEN_ENV: &str = "WEBEX_TOKEN";
const ROOM_ENV: &str = "WEBEX_ROOM_ID";

#[derive(Clone)]
pub struct WebexClient {
    agent: ureq::Agent,
    api_base: String,
    token: String,
    room_id: String,
}

#[derive(Debug, Clone, Deserialize)]
struct MessagesPage {
    #[serde(default)]
    items: Vec<MessageItem>,
}

#[derive(Debug, Clone, Deserialize)]
struct MessageItem {
    id: String,
    #[serde(default)]
    text: Option<String>,
}

impl WebexClient {
    pub fn from_env(settings: &ChatSettings, timeout: Duration) -> Result<Self, ChatError> {
        let token = non_empty_env(TOKEN_ENV)
            .ok_or_else(|| ChatError::MissingEnvVar(TOKEN_ENV.to_string()))?;
        let room_id = non_empty_env(ROOM_ENV)
            .or_else(|| {
                settings
                    .room_id
                    .clone()
                    .filter(|v| !v.trim().is_empty())
            })
            .ok_or(ChatError::MissingRoom)?;
        let api_base = non_empty_env("NETWARDEN_WEBEX_API_BASE")
            .or_else(|| settings.api_base.clone().filter(|v| !v.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        Ok(Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            api_base,
            token,
            room_id,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base.trim_end_matches('/'), path)
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    fn map_transport_error(err: ureq::Error) -> ChatError {
        match err {
            ureq::Error::Status(status, _) => ChatError::ApiStatus(status),
            other => ChatError::ApiRequest(other.to_string()),
        }
    }
}

fn multipart_boundary() -> Result<String, ChatError> {
    let mut bytes = [0_u8; 16];
    getrandom::getrandom(&mut bytes).map_err(|err| {
        ChatError::ApiRequest(format!("failed to generate multipart boundary: {err}"))
    })?;
    Ok(bytes.iter().fold(
        String::with_capacity(bytes.len() * 2),
        |mut acc, byte| {
            acc.push_str(&format!("{byte:02x}"));
            acc
        },
    ))
}

fn multipart_body(
    boundary: &str,
    room_id: &str,
    text: &str,
    file_name: &str,
    file_bytes: &[u8],
) -> Vec<u8> {
    let mut body = Vec::new();
    for (field, value) in [("roomId", room_id), ("text", text)] {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{field}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(
        format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{file_name}\"\r\nContent-Type: text/plain\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(file_bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

impl ChatTransport for WebexClient {
    fn fetch_latest(&self) -> Result<Option<ChatMessage>, ChatError> {
        let url = format!(
            "{}?roomId={}&max=1",
            self.endpoint("messages"),
            urlencoding::encode(&self.room_id)
        );
        let response = self
            .agent
            .get(&url)
            .set("Authorization", &self.bearer())
            .call()
            .map_err(Self::map_transport_error)?;
        let page: MessagesPage = response
            .into_json()
            .map_err(|err| ChatError::ApiDecode(err.to_string()))?;
        Ok(page.items.into_iter().next().map(|item| ChatMessage {
            id: item.id,
            text: item.text.unwrap_or_default(),
        }))
    }

    fn post(&self, text: &str, attachment: Option<&Path>) -> Result<(), ChatError> {
        let url = self.endpoint("messages");
        let Some(path) = attachment else {
            self.agent
                .post(&url)
                .set("Authorization", &self.bearer())
                .send_json(json!({"roomId": self.room_id, "text": text}))
                .map_err(Self::map_transport_error)?;
            return Ok(());
        };

        let file_bytes = fs::read(path).map_err(|err| ChatError::Attachment {
            path: path.display().to_string(),
            source: err,
        })?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("attachment.txt");
        let boundary = multipart_boundary()?;
        let body = multipart_body(&boundary, &self.room_id, text, file_name, &file_bytes);
        self.agent
            .post(&url)
            .set("Authorization", &self.bearer())
            .set(
                "Content-Type",
                &format!("multipart/form-data; boundary={boundary}"),
            )
            .send_bytes(&body)
            .map_err(Self::map_transport_error)?;
        Ok(())
    }
}
