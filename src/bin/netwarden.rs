use netwarden::backend::{AnsibleRunner, NetconfBackend, RestconfBackend, SshCliBackend};
use netwarden::chat::WebexClient;
use netwarden::command::Dispatcher;
use netwarden::config::{default_state_root_path, load_settings};
use netwarden::runtime::run_loop;
use std::path::PathBuf;
use std::time::Duration;

const CHAT_TIMEOUT: Duration = Duration::from_secs(10);

fn output_header() -> &'static str {
    "netwarden\nnetwarden is a chat-driven network device control agent."
}

fn run() -> Result<(), String> {
    println!("{}\n", output_header());

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config_path = args.first().map(PathBuf::from);
    let settings =
        load_settings(config_path.as_deref()).map_err(|err| format!("settings: {err}"))?;
    let state_root = default_state_root_path().map_err(|err| format!("state root: {err}"))?;
    let backend_timeout = Duration::from_secs(settings.backend_timeout_secs);

    let chat = WebexClient::from_env(&settings.chat, CHAT_TIMEOUT)
        .map_err(|err| format!("chat: {err}"))?;
    let dispatcher = Dispatcher::new(
        Box::new(RestconfBackend::new(
            &settings.device_auth,
            settings.interface.clone(),
            backend_timeout,
        )),
        Box::new(NetconfBackend::new(
            &settings.device_auth,
            settings.interface.clone(),
            backend_timeout,
        )),
        Box::new(SshCliBackend::new(&settings.device_auth, backend_timeout)),
        Box::new(AnsibleRunner::new(
            settings.playbooks.clone(),
            settings.devices.clone(),
            backend_timeout,
        )),
        settings.interface.display_name(),
    )
    .with_state_root(state_root.clone());

    run_loop(&chat, &settings, &dispatcher, &state_root);
    Ok(())
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
