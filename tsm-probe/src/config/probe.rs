use std::time::Duration;
use serde::Deserialize;


#[derive(Deserialize, Debug, Default)]
pub struct Probe {
    name: Option<String>,
    command: Option<Vec<String>>,
    grace_period_s: Option<f64>,
    shutdown_timeout_s: Option<f64>,
}


impl Probe {
    pub fn get_name(&self) -> Option<String> {
        return self.name.clone();
    }

    pub fn get_command(&self) -> Vec<String> {
        return match &self.command {
            Some(command) => command.clone(),
            None => Vec::new(),
        };
    }

    pub fn get_grace_period_s(&self) -> Option<f64> {
        return self.grace_period_s;
    }

    pub fn get_shutdown_timeout_s(&self) -> Option<f64> {
        return self.shutdown_timeout_s;
    }
}


/// Converts a number of seconds into a duration, rejecting negative and non-finite values.
pub fn seconds_to_duration(key: &str, seconds: f64) -> Result<Duration, String> {
    return match Duration::try_from_secs_f64(seconds) {
        Ok(duration) => Ok(duration),
        Err(error) => Err(format!("Invalid value {} for {}: {}", seconds, key, error)),
    };
}
