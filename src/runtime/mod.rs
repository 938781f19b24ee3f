pub mod poll;

pub use poll::{
    method_ack_message, poll_cycle, process_message, run_loop, CycleReport,
    ATTACHMENT_FAILURE_MESSAGE,
};
