use std::thread;
use std::time::{Duration, Instant};
use log::{debug, info, warn};

use crate::probe::{InterruptHandle, Process, ProbeError, ProbeResult, ProbeSettings, Shutdown};


/// Starts a command once, waits for the grace period and checks whether it is still alive.
#[derive(Debug)]
pub struct LivenessProbe {
    settings: ProbeSettings,
    interrupt_handle: InterruptHandle,
}


impl LivenessProbe {
    pub fn new(settings: ProbeSettings) -> LivenessProbe {
        return LivenessProbe {
            settings,
            interrupt_handle: InterruptHandle::new(),
        };
    }

    pub fn get_settings(&self) -> &ProbeSettings {
        return &self.settings;
    }

    pub fn get_interrupt_handle(&self) -> InterruptHandle {
        return self.interrupt_handle.clone();
    }

    /// Ok(Alive) if the process was still running after the grace period. It has been
    /// stopped again by the time this returns.
    /// Ok(Exited) if it was already gone, along with everything it wrote.
    /// Err if it could not be launched or controlled at all.
    pub fn run(&self) -> Result<ProbeResult, ProbeError> {
        let (executable, arguments) = match self.settings.command.split_first() {
            Some((executable, arguments)) => (executable.clone(), arguments.to_vec()),
            None => return Err(ProbeError::EmptyCommand),
        };

        let mut process = Process::new(executable, arguments)
            .with_interrupt_handle(self.interrupt_handle.clone());
        let pid = process.start()?;

        debug!(
            "Probing {} (pid={}), checking again in {}",
            self.settings.name,
            pid,
            humantime::format_duration(self.settings.grace_period),
        );
        thread::sleep(self.settings.grace_period);

        let result = self.check(&mut process);

        // kills anything still left in the group, then unpublishes it
        drop(process);

        return result;
    }

    fn check(&self, process: &mut Process) -> Result<ProbeResult, ProbeError> {
        return match process.exit_status()? {
            None => {
                info!("{} is alive after {}", self.settings.name, humantime::format_duration(self.settings.grace_period));
                let shutdown = self.shut_down(process)?;
                Ok(ProbeResult::Alive { shutdown })
            }
            Some(exit_status) => {
                warn!("{} exited before the check with {}", self.settings.name, exit_status);
                process.kill_leftovers()?;
                let output = process.collect_output()?;
                Ok(ProbeResult::Exited {
                    status: output.status,
                    stdout: output.stdout,
                    stderr: output.stderr,
                })
            }
        };
    }

    fn shut_down(&self, process: &mut Process) -> Result<Shutdown, ProbeError> {
        let started = Instant::now();
        process.terminate()?;

        return match process.wait_for(self.settings.shutdown_timeout)? {
            Some(exit_status) => {
                debug!("{} stopped after {:?}", process.get_executable(), started.elapsed());
                process.kill_leftovers()?;
                Ok(Shutdown::Terminated(exit_status))
            }
            None => {
                warn!(
                    "{} did not stop within {} after SIGTERM, killing it",
                    process.get_executable(),
                    humantime::format_duration(self.settings.shutdown_timeout),
                );
                process.kill()?;
                Ok(Shutdown::Killed)
            }
        };
    }
}


/// Runs a single probe of `command` with the default shutdown timeout.
pub fn run_probe(command: &[String], grace_period: Duration) -> Result<ProbeResult, ProbeError> {
    let settings = ProbeSettings::new(command.to_vec()).with_grace_period(grace_period);
    return LivenessProbe::new(settings).run();
}
