use std::fs;
use serde::Deserialize;

use crate::config::{Application, LogLevel, Overrides, Probe};
use crate::config::probe::seconds_to_duration;
use crate::probe::ProbeSettings;


#[derive(Deserialize, Debug, Default)]
pub struct Configuration {
    #[serde(default)]
    application: Application,
    #[serde(default)]
    probe: Probe,
}


impl Configuration {
    pub fn from_file(file_path: String) -> Result<Configuration, String> {
        return match fs::read_to_string(&file_path) {
            Ok(content) => {
                Configuration::from_string(content)
            },
            Err(error) => {
                Err(format!("Error reading configuration file {}: {}", file_path, error))
            }
        }
    }

    pub fn from_string(content: String) -> Result<Configuration, String> {
        return match toml::from_str(&content) {
            Ok(configuration) => {
                Ok(configuration)
            },
            Err(error) => {
                Err(format!("Error parsing configuration file: {}", error))
            }
        }
    }

    pub fn get_application(&self) -> &Application {
        return &self.application;
    }

    pub fn get_probe(&self) -> &Probe {
        return &self.probe;
    }

    pub fn get_log_level(&self, overrides: &Overrides) -> LogLevel {
        return match &overrides.log_level {
            Some(log_level) => log_level.clone(),
            None => self.get_application().get_log_level(),
        };
    }

    /// Merges the configured probe with the command line overrides.
    /// A command given on the command line replaces the configured one as a whole.
    pub fn build_settings(&self, overrides: &Overrides) -> Result<ProbeSettings, String> {
        let command = if overrides.command.is_empty() {
            self.probe.get_command()
        } else {
            overrides.command.clone()
        };

        if command.is_empty() {
            return Err(String::from("No command to probe given"));
        }

        let mut settings = ProbeSettings::new(command);

        let name = overrides.name.clone().or(self.probe.get_name());
        if let Some(name) = name {
            settings = settings.with_name(name);
        }

        let grace_period_s = overrides.grace_period_s.or(self.probe.get_grace_period_s());
        if let Some(seconds) = grace_period_s {
            settings = settings.with_grace_period(seconds_to_duration("grace_period_s", seconds)?);
        }

        let shutdown_timeout_s = overrides.shutdown_timeout_s.or(self.probe.get_shutdown_timeout_s());
        if let Some(seconds) = shutdown_timeout_s {
            settings = settings.with_shutdown_timeout(seconds_to_duration("shutdown_timeout_s", seconds)?);
        }

        return Ok(settings);
    }
}
