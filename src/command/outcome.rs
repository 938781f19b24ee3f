use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeStatus {
    Ok,
    NotFound,
    AlreadyInDesiredState,
    Rejected,
    BackendError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: OutcomeStatus,
    pub message: String,
    pub attachment: Option<PathBuf>,
}

impl Outcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Ok,
            message: message.into(),
            attachment: None,
        }
    }

    pub fn ok_with_attachment(message: impl Into<String>, attachment: PathBuf) -> Self {
        Self {
            status: OutcomeStatus::Ok,
            message: message.into(),
            attachment: Some(attachment),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::NotFound,
            message: message.into(),
            attachment: None,
        }
    }

    pub fn already_in_desired_state(message: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::AlreadyInDesiredState,
            message: message.into(),
            attachment: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Rejected,
            message: message.into(),
            attachment: None,
        }
    }

    pub fn backend_error(label: &str) -> Self {
        Self {
            status: OutcomeStatus::BackendError,
            message: format!("Error: {label}"),
            attachment: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_error_message_uses_the_label_vocabulary() {
        let outcome = Outcome::backend_error("Restconf");
        assert_eq!(outcome.status, OutcomeStatus::BackendError);
        assert_eq!(outcome.message, "Error: Restconf");
        assert_eq!(outcome.attachment, None);
    }

    #[test]
    fn only_the_attachment_constructor_carries_a_path() {
        let outcome = Outcome::ok_with_attachment("show running config", PathBuf::from("a.txt"));
        assert_eq!(outcome.attachment, Some(PathBuf::from("a.txt")));
        assert_eq!(Outcome::ok("done").attachment, None);
    }
}
