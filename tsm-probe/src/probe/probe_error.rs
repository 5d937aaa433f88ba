use std::io;
use thiserror::Error;


#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("no command to probe given")]
    EmptyCommand,

    /// The child could not be created at all, e.g. the executable is missing.
    #[error("failed to launch {executable}: {source}")]
    Launch {
        executable: String,
        #[source]
        source: io::Error,
    },

    #[error("process {0} was not started")]
    NotStarted(String),

    #[error("failed to poll {executable}: {source}")]
    Poll {
        executable: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to signal {executable}: {source}")]
    Signal {
        executable: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to collect output of {executable}: {source}")]
    Output {
        executable: String,
        #[source]
        source: io::Error,
    },
}


impl ProbeError {
    pub fn is_launch_failure(&self) -> bool {
        return matches!(self, ProbeError::Launch { .. });
    }
}
