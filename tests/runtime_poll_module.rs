use netwarden::backend::{
    BackendError, DeviceCli, InterfaceState, InterfaceSummary, Management, PlaybookRunner,
};
use netwarden::chat::{ChatError, ChatMessage, ChatTransport};
use netwarden::command::{Dispatcher, SessionState};
use netwarden::config::Settings;
use netwarden::runtime::{poll_cycle, process_message, CycleReport, ATTACHMENT_FAILURE_MESSAGE};
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

fn settings() -> Settings {
    serde_yaml::from_str(
        r#"
mention: "/66070014"
devices:
  "10.0.15.61": CSR1KV-Pod1-1
  "10.0.15.62": CSR1KV-Pod1-2
interface:
  name: Loopback66070014
  ipv4_address: 172.6.14.1
  netmask: 255.255.255.0
playbooks:
  showrun: playbook.yaml
  motd: motd_playbook.yaml
"#,
    )
    .expect("parse settings")
}

#[derive(Clone, Default)]
struct FakeManagement {
    exists: Rc<Cell<bool>>,
    mutations: Rc<RefCell<Vec<String>>>,
}

impl Management for FakeManagement {
    fn exists(&self, _target: &str) -> Result<bool, BackendError> {
        Ok(self.exists.get())
    }

    fn create(&self, _target: &str) -> Result<(), BackendError> {
        self.mutations.borrow_mut().push("create".to_string());
        self.exists.set(true);
        Ok(())
    }

    fn delete(&self, _target: &str) -> Result<(), BackendError> {
        self.mutations.borrow_mut().push("delete".to_string());
        self.exists.set(false);
        Ok(())
    }

    fn set_enabled(&self, _target: &str, enabled: bool) -> Result<(), BackendError> {
        self.mutations
            .borrow_mut()
            .push(format!("set_enabled={enabled}"));
        Ok(())
    }

    fn query_state(&self, _target: &str) -> Result<Option<InterfaceState>, BackendError> {
        if !self.exists.get() {
            return Ok(None);
        }
        Ok(Some(InterfaceState {
            admin_status: "up".to_string(),
            oper_status: "up".to_string(),
        }))
    }
}

#[derive(Clone, Default)]
struct StubCli;

impl DeviceCli for StubCli {
    fn interface_summary(&self, _target: &str) -> Result<Vec<InterfaceSummary>, BackendError> {
        Ok(Vec::new())
    }

    fn read_banner(&self, _target: &str) -> Result<Option<String>, BackendError> {
        Ok(None)
    }
}

#[derive(Clone, Default)]
struct StubPlaybook {
    artifact: Rc<RefCell<Option<PathBuf>>>,
}

impl PlaybookRunner for StubPlaybook {
    fn retrieve_running_config(&self, target: &str) -> Result<PathBuf, BackendError> {
        self.artifact
            .borrow()
            .clone()
            .ok_or(BackendError::PlaybookFailed {
                playbook: "playbook.yaml".to_string(),
                target: target.to_string(),
            })
    }

    fn write_banner(&self, _target: &str, _banner: &str) -> Result<(), BackendError> {
        Ok(())
    }
}

#[derive(Clone, Default)]
struct FakeChat {
    latest: Rc<RefCell<Option<ChatMessage>>>,
    posts: Rc<RefCell<Vec<(String, Option<PathBuf>)>>>,
}

impl FakeChat {
    fn set_latest(&self, id: &str, text: &str) {
        *self.latest.borrow_mut() = Some(ChatMessage {
            id: id.to_string(),
            text: text.to_string(),
        });
    }

    fn posts(&self) -> Vec<(String, Option<PathBuf>)> {
        self.posts.borrow().clone()
    }
}

impl ChatTransport for FakeChat {
    fn fetch_latest(&self) -> Result<Option<ChatMessage>, ChatError> {
        Ok(self.latest.borrow().clone())
    }

    fn post(&self, text: &str, attachment: Option<&Path>) -> Result<(), ChatError> {
        if let Some(path) = attachment {
            if !path.exists() {
                return Err(ChatError::Attachment {
                    path: path.display().to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
                });
            }
        }
        self.posts
            .borrow_mut()
            .push((text.to_string(), attachment.map(Path::to_path_buf)));
        Ok(())
    }
}

struct Harness {
    chat: FakeChat,
    playbook: StubPlaybook,
    dispatcher: Dispatcher,
    settings: Settings,
    session: SessionState,
}

fn harness() -> Harness {
    let playbook = StubPlaybook::default();
    let dispatcher = Dispatcher::new(
        Box::new(FakeManagement::default()),
        Box::new(FakeManagement::default()),
        Box::new(StubCli),
        Box::new(playbook.clone()),
        "loopback66070014".to_string(),
    );
    Harness {
        chat: FakeChat::default(),
        playbook,
        dispatcher,
        settings: settings(),
        session: SessionState::new(),
    }
}

impl Harness {
    fn cycle(&mut self) -> CycleReport {
        poll_cycle(
            &self.chat,
            &self.settings,
            &mut self.session,
            &self.dispatcher,
            None,
        )
        .expect("poll cycle")
    }
}

#[test]
fn unaddressed_messages_produce_no_reply() {
    let mut h = harness();
    h.chat.set_latest("m1", "good morning everyone");

    let report = h.cycle();
    assert!(report.fetched);
    assert!(!report.dispatched);
    assert!(h.chat.posts().is_empty());
}

#[test]
fn empty_room_is_a_quiet_cycle() {
    let mut h = harness();
    let report = h.cycle();
    assert!(!report.fetched);
    assert!(h.chat.posts().is_empty());
}

#[test]
fn redelivered_message_id_is_dispatched_once() {
    let mut h = harness();
    h.chat.set_latest("m1", "/66070014 restconf 10.0.15.61 create");

    let first = h.cycle();
    assert!(first.dispatched && first.replied);

    let second = h.cycle();
    assert!(second.duplicate);
    assert!(!second.dispatched);
    assert_eq!(h.chat.posts().len(), 1);
}

#[test]
fn create_scenario_end_to_end() {
    let mut h = harness();
    h.chat.set_latest("m1", "/66070014 restconf 10.0.15.61 create");

    h.cycle();
    let posts = h.chat.posts();
    assert_eq!(posts.len(), 1);
    assert_eq!(
        posts[0].0,
        "Interface loopback66070014 is created successfully using Restconf"
    );
    assert_eq!(posts[0].1, None);
}

#[test]
fn status_without_a_selected_method_is_rejected() {
    let mut h = harness();
    h.chat.set_latest("m1", "/66070014 10.0.15.61 status");

    h.cycle();
    let posts = h.chat.posts();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].0, "Error: No method specified");
}

#[test]
fn method_selection_is_acknowledged_and_sticks() {
    let mut h = harness();
    h.chat.set_latest("m1", "/66070014 netconf");
    h.cycle();

    h.chat.set_latest("m2", "/66070014 10.0.15.61 create");
    h.cycle();

    let posts = h.chat.posts();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].0, "Method Netconf is selected");
    assert_eq!(
        posts[1].0,
        "Interface loopback66070014 is created successfully using Netconf"
    );
}

#[test]
fn method_override_switches_subsequent_commands() {
    let mut h = harness();
    h.chat.set_latest("m1", "/66070014 netconf");
    h.cycle();
    h.chat.set_latest("m2", "/66070014 restconf");
    h.cycle();
    h.chat.set_latest("m3", "/66070014 10.0.15.61 create");
    h.cycle();

    let posts = h.chat.posts();
    assert_eq!(
        posts[2].0,
        "Interface loopback66070014 is created successfully using Restconf"
    );
}

#[test]
fn unknown_keyword_is_reported_in_text() {
    let mut h = harness();
    h.chat.set_latest("m1", "/66070014 10.0.15.61 reboot");
    h.cycle();
    assert_eq!(h.chat.posts()[0].0, "Error: No command or unknown command");
}

#[test]
fn show_config_reply_carries_the_artifact() {
    let dir = tempfile::tempdir().expect("tempdir");
    let artifact = dir.path().join("show_run_CSR1KV-Pod1-1.txt");
    std::fs::write(&artifact, "hostname CSR1KV-Pod1-1\n").expect("write artifact");

    let mut h = harness();
    *h.playbook.artifact.borrow_mut() = Some(artifact.clone());
    h.chat.set_latest("m1", "/66070014 10.0.15.61 show_config");
    h.cycle();

    let posts = h.chat.posts();
    assert_eq!(posts[0].0, "show running config");
    assert_eq!(posts[0].1, Some(artifact));
}

#[test]
fn missing_artifact_degrades_to_a_text_only_error() {
    let mut h = harness();
    *h.playbook.artifact.borrow_mut() = Some(PathBuf::from("/nonexistent/show_run.txt"));
    h.chat.set_latest("m1", "/66070014 10.0.15.61 show_config");
    h.cycle();

    let posts = h.chat.posts();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].0, ATTACHMENT_FAILURE_MESSAGE);
    assert_eq!(posts[0].1, None);
}

#[test]
fn process_message_is_silent_for_foreign_text() {
    let mut session = SessionState::new();
    let h = harness();
    assert!(process_message("deploy finished", &h.settings, &mut session, &h.dispatcher).is_none());
}
