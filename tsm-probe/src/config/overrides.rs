use crate::config::LogLevel;


/// Values given on the command line. Each one wins over its configuration file counterpart.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub name: Option<String>,
    pub command: Vec<String>,
    pub grace_period_s: Option<f64>,
    pub shutdown_timeout_s: Option<f64>,
    pub log_level: Option<LogLevel>,
}
