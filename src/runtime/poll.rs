use crate::backend::Method;
use crate::chat::{ChatError, ChatTransport};
use crate::command::{
    parse_message, validate, Dispatcher, Outcome, ParsedMessage, SessionState,
};
use crate::config::Settings;
use crate::shared::logging::append_agent_log;
use std::path::Path;
use std::thread;
use std::time::Duration;

pub const ATTACHMENT_FAILURE_MESSAGE: &str = "Error: Ansible";

pub fn method_ack_message(method: Method) -> String {
    format!("Method {} is selected", method.display_name())
}

pub fn process_message(
    text: &str,
    settings: &Settings,
    session: &mut SessionState,
    dispatcher: &Dispatcher,
) -> Option<Outcome> {
    match parse_message(text, settings, session) {
        ParsedMessage::NotAddressed => None,
        ParsedMessage::MethodSelected(method) => Some(Outcome::ok(method_ack_message(method))),
        ParsedMessage::Command(command) => Some(match validate(&command, session) {
            Ok(validated) => dispatcher.dispatch(&validated),
            Err(rejection) => rejection,
        }),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub fetched: bool,
    pub duplicate: bool,
    pub dispatched: bool,
    pub replied: bool,
}

pub fn poll_cycle(
    chat: &dyn ChatTransport,
    settings: &Settings,
    session: &mut SessionState,
    dispatcher: &Dispatcher,
    state_root: Option<&Path>,
) -> Result<CycleReport, ChatError> {
    let mut report = CycleReport::default();
    let Some(message) = chat.fetch_latest()? else {
        return Ok(report);
    };
    report.fetched = true;

    if session.is_duplicate(&message.id) {
        report.duplicate = true;
        return Ok(report);
    }
    session.mark_processed(&message.id);

    let Some(outcome) = process_message(&message.text, settings, session, dispatcher) else {
        return Ok(report);
    };
    report.dispatched = true;
    log(
        state_root,
        &format!(
            "message {}: {:?} {}",
            message.id, outcome.status, outcome.message
        ),
    );

    deliver(chat, &outcome, state_root)?;
    report.replied = true;
    Ok(report)
}

fn deliver(
    chat: &dyn ChatTransport,
    outcome: &Outcome,
    state_root: Option<&Path>,
) -> Result<(), ChatError> {
    match chat.post(&outcome.message, outcome.attachment.as_deref()) {
        Ok(()) => Ok(()),
        Err(ChatError::Attachment { path, source }) => {
            log(
                state_root,
                &format!("failed to open attachment {path}: {source}"),
            );
            chat.post(ATTACHMENT_FAILURE_MESSAGE, None)
        }
        Err(err) => Err(err),
    }
}

fn log(state_root: Option<&Path>, line: &str) {
    if let Some(root) = state_root {
        let _ = append_agent_log(root, line);
    }
}

pub fn run_loop(
    chat: &dyn ChatTransport,
    settings: &Settings,
    dispatcher: &Dispatcher,
    state_root: &Path,
) {
    let mut session = SessionState::new();
    let interval = Duration::from_secs(settings.poll_interval_secs);
    loop {
        thread::sleep(interval);
        if let Err(err) = poll_cycle(chat, settings, &mut session, dispatcher, Some(state_root)) {
            let _ = append_agent_log(state_root, &format!("poll cycle failed: {err}"));
        }
    }
}
