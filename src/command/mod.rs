pub mod dispatch;
pub mod outcome;
pub mod parser;
pub mod session;
pub mod validate;

pub use dispatch::Dispatcher;
pub use outcome::{Outcome, OutcomeStatus};
pub use parser::{parse_message, ParsedMessage, StructuredCommand, FREE_TEXT_KEYWORD};
pub use session::SessionState;
pub use validate::{
    validate, Keyword, Requirements, ValidatedCommand, REJECT_NO_DEVICE, REJECT_NO_METHOD,
    REJECT_UNKNOWN_COMMAND,
};
