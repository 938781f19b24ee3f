use netwarden::backend::Method;
use netwarden::command::{parse_message, ParsedMessage, SessionState};
use netwarden::config::Settings;

fn settings() -> Settings {
    serde_yaml::from_str(
        r#"
mention: "/66070014"
devices:
  "10.0.15.61": CSR1KV-Pod1-1
  "10.0.15.65": CSR1KV-Pod1-5
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

#[test]
fn target_detection_wins_the_method_then_address_ambiguity() {
    let settings = settings();
    let mut session = SessionState::new();
    let parsed = parse_message("/66070014 restconf 10.0.15.65 status", &settings, &mut session);
    match parsed {
        ParsedMessage::Command(command) => {
            assert_eq!(command.method, Some(Method::Restconf));
            assert_eq!(command.target.as_deref(), Some("10.0.15.65"));
            assert_eq!(command.keyword.as_deref(), Some("status"));
        }
        other => panic!("unexpected parse: {other:?}"),
    }
}

#[test]
fn motd_bimodality_is_decided_by_trailing_tokens() {
    let settings = settings();
    let mut session = SessionState::new();

    match parse_message("/66070014 10.0.15.65 motd", &settings, &mut session) {
        ParsedMessage::Command(command) => assert_eq!(command.argument_text, None),
        other => panic!("unexpected parse: {other:?}"),
    }

    match parse_message(
        "/66070014 10.0.15.65 motd Welcome admins",
        &settings,
        &mut session,
    ) {
        ParsedMessage::Command(command) => {
            assert_eq!(command.argument_text.as_deref(), Some("Welcome admins"));
        }
        other => panic!("unexpected parse: {other:?}"),
    }
}

#[test]
fn method_token_updates_the_session_even_when_validation_would_fail() {
    let settings = settings();
    let mut session = SessionState::new();
    // unknown keyword follows, but the selection must already have stuck
    let parsed = parse_message("/66070014 netconf frobnicate", &settings, &mut session);
    assert!(matches!(parsed, ParsedMessage::Command(_)));
    assert_eq!(session.selected_method(), Some(Method::Netconf));
}

#[test]
fn mention_prefix_is_required_and_exact() {
    let settings = settings();
    let mut session = SessionState::new();
    for text in [
        "66070014 create",
        "/66070015 create",
        "say /66070014 create",
        "",
    ] {
        assert_eq!(
            parse_message(text, &settings, &mut session),
            ParsedMessage::NotAddressed,
            "text {text:?} must not address the agent"
        );
    }
}
