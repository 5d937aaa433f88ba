mod configuration;
pub use configuration::Configuration;

mod application;
pub use application::Application;

mod log_level;
pub use log_level::LogLevel;

mod probe;
pub use probe::Probe;

mod overrides;
pub use overrides::Overrides;
