use super::SessionState;
use crate::backend::Method;
use crate::config::Settings;

pub const FREE_TEXT_KEYWORD: &str = "motd";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredCommand {
    pub method: Option<Method>,
    pub target: Option<String>,
    pub keyword: Option<String>,
    pub argument_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedMessage {
    NotAddressed,
    MethodSelected(Method),
    Command(StructuredCommand),
}

pub fn parse_message(
    text: &str,
    settings: &Settings,
    session: &mut SessionState,
) -> ParsedMessage {
    let mut tokens = text.split_whitespace();
    match tokens.next() {
        Some(first) if first == settings.mention => {}
        _ => return ParsedMessage::NotAddressed,
    }
    let rest: Vec<&str> = tokens.collect();

    let mut idx = 0;
    let mut method = None;
    if let Some(parsed) = rest.first().and_then(|token| Method::parse(token)) {
        session.select_method(parsed);
        method = Some(parsed);
        idx += 1;
        if idx == rest.len() {
            return ParsedMessage::MethodSelected(parsed);
        }
    }

    let mut target = None;
    if let Some(token) = rest.get(idx) {
        if settings.is_known_device(token) {
            target = Some(token.to_string());
            idx += 1;
        }
    }

    let mut keyword = None;
    if let Some(token) = rest.get(idx) {
        keyword = Some(token.to_ascii_lowercase());
        idx += 1;
    }

    let argument_text = if keyword.as_deref() == Some(FREE_TEXT_KEYWORD) && idx < rest.len() {
        Some(rest[idx..].join(" "))
    } else {
        None
    };

    ParsedMessage::Command(StructuredCommand {
        method,
        target,
        keyword,
        argument_text,
    })
}
