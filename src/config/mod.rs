pub mod settings;

pub use settings::{AppConfig, LevelsConfig, ProviderConfig};
