pub mod error;
pub mod load;
pub mod paths;
pub mod settings;

pub use error::ConfigError;
pub use load::load_settings;
pub use paths::{
    default_settings_path, default_state_root_path, GLOBAL_SETTINGS_FILE_NAME, GLOBAL_STATE_DIR,
};
pub use settings::{
    ChatSettings, DeviceAuth, InterfaceSpec, PlaybookSettings, Settings,
};
