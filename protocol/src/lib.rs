pub mod config;
pub mod endpoints;
pub mod key;

pub use config::ConfigError;
pub use config::KeyTriggerConfig;
pub use config::PageBindingsConfig;
pub use key::KeyChord;
pub use key::Modifiers;
pub use key::ModifierMode;
