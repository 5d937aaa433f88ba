use std::process::ExitStatus;


/// How a process that was alive at check time went away afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum Shutdown {
    Terminated(process_control::ExitStatus), // exited within the shutdown timeout after SIGTERM
    Killed, // ignored SIGTERM and was killed
}


#[derive(Debug, Clone, PartialEq)]
pub enum ProbeResult {
    Alive {
        shutdown: Shutdown,
    },
    Exited {
        status: ExitStatus,
        stdout: Vec<u8>,
        stderr: Vec<u8>,
    },
}


impl ProbeResult {
    pub fn alive_at_check(&self) -> bool {
        return matches!(self, ProbeResult::Alive { .. });
    }

    pub fn exit_code(&self) -> i32 {
        return match self {
            ProbeResult::Alive { .. } => 0,
            ProbeResult::Exited { .. } => 1,
        };
    }
}
