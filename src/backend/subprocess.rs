use std::io::{Read, Write};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

const WAIT_POLL: Duration = Duration::from_millis(10);

#[derive(Debug)]
pub(crate) struct RunOutput {
    pub(crate) stdout: String,
    pub(crate) stderr: String,
    pub(crate) success: bool,
    pub(crate) exit_code: Option<i32>,
}

#[derive(Debug)]
pub(crate) enum RunFailure {
    MissingBinary,
    TimedOut,
    Io(std::io::Error),
}

pub(crate) fn run_bounded(
    mut command: Command,
    payload: Option<&str>,
    timeout: Duration,
) -> Result<RunOutput, RunFailure> {
    command
        .stdin(if payload.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = match command.spawn() {
        Ok(child) => child,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(RunFailure::MissingBinary)
        }
        Err(err) => return Err(RunFailure::Io(err)),
    };

    if let Some(payload) = payload {
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| RunFailure::Io(std::io::Error::other("missing stdin pipe")))?;
        stdin
            .write_all(payload.as_bytes())
            .map_err(RunFailure::Io)?;
        // dropping stdin closes the pipe so the child sees EOF
    }

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| RunFailure::Io(std::io::Error::other("missing stdout pipe")))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| RunFailure::Io(std::io::Error::other("missing stderr pipe")))?;

    let stdout_reader = thread::spawn(move || {
        let mut buf = String::new();
        let mut stdout = stdout;
        let _ = stdout.read_to_string(&mut buf);
        buf
    });
    let stderr_reader = thread::spawn(move || {
        let mut buf = String::new();
        let mut stderr = stderr;
        let _ = stderr.read_to_string(&mut buf);
        buf
    });

    let start = Instant::now();
    let exit_status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    let _ = stdout_reader.join();
                    let _ = stderr_reader.join();
                    return Err(RunFailure::TimedOut);
                }
                thread::sleep(WAIT_POLL);
            }
            Err(err) => return Err(RunFailure::Io(err)),
        }
    };

    Ok(RunOutput {
        stdout: stdout_reader.join().unwrap_or_default(),
        stderr: stderr_reader.join().unwrap_or_default(),
        success: exit_status.success(),
        exit_code: exit_status.code(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Command {
        let mut command = Command::new("sh");
        command.arg("-c").arg(script);
        command
    }

    #[test]
    fn stdout_and_exit_code_are_captured() {
        let output = run_bounded(sh("echo out; echo err >&2"), None, Duration::from_secs(5))
            .expect("command runs");
        assert!(output.success);
        assert_eq!(output.exit_code, Some(0));
        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
    }

    #[test]
    fn nonzero_exit_is_not_a_run_failure() {
        let output =
            run_bounded(sh("exit 4"), None, Duration::from_secs(5)).expect("command runs");
        assert!(!output.success);
        assert_eq!(output.exit_code, Some(4));
    }

    #[test]
    fn missing_binary_is_distinguished() {
        let command = Command::new("netwarden-test-no-such-binary");
        match run_bounded(command, None, Duration::from_secs(5)) {
            Err(RunFailure::MissingBinary) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn deadline_kills_long_running_commands() {
        match run_bounded(sh("sleep 5"), None, Duration::from_millis(100)) {
            Err(RunFailure::TimedOut) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn stdin_payload_reaches_the_child() {
        let output = run_bounded(sh("cat"), Some("<hello/>"), Duration::from_secs(5))
            .expect("command runs");
        assert_eq!(output.stdout, "<hello/>");
    }
}
