//! Configuration loading.

pub mod settings;

pub use settings::{
    expand_env_vars, LookupSettings, ResultSettings, ServiceSettings, Settings, SettingsError,
};
