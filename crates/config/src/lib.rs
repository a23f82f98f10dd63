// Configuration loading

pub mod settings;

pub use settings::{ConfigError, GatewaySettings, ReportSettings, Settings, SourceSettings};
