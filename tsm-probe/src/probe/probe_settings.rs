use std::time::Duration;


pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(3);
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);


#[derive(Debug, Clone, PartialEq)]
pub struct ProbeSettings {
    /// Label used in console output
    pub name: String,
    /// Executable followed by its arguments, passed through as is
    pub command: Vec<String>,
    /// Wait between spawning the process and checking it
    pub grace_period: Duration,
    /// Wait after SIGTERM before escalating to SIGKILL
    pub shutdown_timeout: Duration,
}


impl ProbeSettings {
    pub fn new(command: Vec<String>) -> ProbeSettings {
        let name = match command.first() {
            Some(executable) => executable.clone(),
            None => String::new(),
        };

        return ProbeSettings {
            name,
            command,
            grace_period: DEFAULT_GRACE_PERIOD,
            shutdown_timeout: DEFAULT_SHUTDOWN_TIMEOUT,
        };
    }

    pub fn with_name(mut self, name: String) -> ProbeSettings {
        self.name = name;
        return self;
    }

    pub fn with_grace_period(mut self, grace_period: Duration) -> ProbeSettings {
        self.grace_period = grace_period;
        return self;
    }

    pub fn with_shutdown_timeout(mut self, shutdown_timeout: Duration) -> ProbeSettings {
        self.shutdown_timeout = shutdown_timeout;
        return self;
    }
}
