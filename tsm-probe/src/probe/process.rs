use std::io;
use std::os::unix::process::CommandExt;
use std::process::{Child, Command, ExitStatus, Output, Stdio};
use std::time::Duration;
use nix::errno::Errno;
use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use process_control::{ChildExt, Control};
use log::{debug, warn, trace};

use crate::probe::{InterruptHandle, ProbeError};


/// Sends `signal` to every process in the group `pgid`. None only checks for existence.
/// Ok(false) means the group no longer exists.
pub fn signal_group(pgid: Pid, signal: Option<Signal>) -> io::Result<bool> {
    return match killpg(pgid, signal) {
        Ok(()) => Ok(true),
        Err(Errno::ESRCH) => Ok(false),
        Err(errno) => Err(io::Error::from(errno)),
    };
}


/// A single child process whose stdout and stderr are captured into pipes.
/// The child leads its own process group, so signals reach everything it spawned.
#[derive(Debug)]
pub struct Process {
    executable: String,
    arguments: Vec<String>,
    child: Option<Child>,
    pgid: Option<Pid>,
    interrupt_handle: Option<InterruptHandle>,
}


impl Process {
    pub fn new(
        executable: String,
        arguments: Vec<String>,
    ) -> Process {
        return Process {
            executable,
            arguments,
            child: None,
            pgid: None,
            interrupt_handle: None,
        };
    }

    /// Publishes the process group to `interrupt_handle` while the child is around.
    pub fn with_interrupt_handle(mut self, interrupt_handle: InterruptHandle) -> Process {
        self.interrupt_handle = Some(interrupt_handle);
        return self;
    }

    pub fn get_executable(&self) -> &str {
        return &self.executable;
    }

    pub fn get_pid(&self) -> Option<u32> {
        return match self.child {
            Some(ref child) => Some(child.id()),
            None => None,
        };
    }

    pub fn get_pgid(&self) -> Option<Pid> {
        return self.pgid;
    }

    /// Starts the child process
    pub fn start(&mut self) -> Result<u32, ProbeError> {
        if let Some(pid) = self.get_pid() {
            warn!("Cannot start process {} because it is already started (pid={})", self.executable, pid);
            return Ok(pid);
        }

        let child = Command::new(&self.executable)
            .args(&self.arguments)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .process_group(0)
            .spawn();

        return match child {
            Ok(child) => {
                let pid = child.id();
                debug!("Process {} was started (pid={})", self.executable, pid);
                let pgid = Pid::from_raw(pid as i32);
                if let Some(ref interrupt_handle) = self.interrupt_handle {
                    interrupt_handle.set_group(pgid);
                }
                self.pgid = Some(pgid);
                self.child = Some(child);
                Ok(pid)
            }
            Err(error) => {
                self.child = None;
                self.pgid = None;
                Err(ProbeError::Launch {
                    executable: self.executable.clone(),
                    source: error,
                })
            }
        };
    }

    /// Polls the child without blocking. None means it is still running.
    pub fn exit_status(&mut self) -> Result<Option<ExitStatus>, ProbeError> {
        let child = self.child_mut()?;

        return match child.try_wait() {
            Ok(Some(exit_status)) => {
                debug!("Process {} exited with {}", self.executable, exit_status);
                Ok(Some(exit_status))
            }
            Ok(None) => {
                trace!("Process {} is still running", self.executable);
                Ok(None)
            }
            Err(error) => {
                Err(ProbeError::Poll {
                    executable: self.executable.clone(),
                    source: error,
                })
            }
        };
    }

    /// Asks the process group to exit by sending SIGTERM.
    pub fn terminate(&mut self) -> Result<(), ProbeError> {
        if self.signal(Signal::SIGTERM)? {
            debug!("Sent SIGTERM to process {}", self.executable);
        } else {
            debug!("Process {} is already gone", self.executable);
        }

        return Ok(());
    }

    /// Waits at most `timeout` for the child to exit. None means it is still running.
    pub fn wait_for(&mut self, timeout: Duration) -> Result<Option<process_control::ExitStatus>, ProbeError> {
        let child = self.child_mut()?;

        let wait_result = child
            .controlled()
            .time_limit(timeout)
            .wait();

        return match wait_result {
            Ok(Some(exit_status)) => {
                debug!("Process {} exited with {}", self.executable, exit_status);
                self.cleanup_process_handles();
                Ok(Some(exit_status))
            }
            Ok(None) => {
                Ok(None)
            }
            Err(error) => {
                Err(ProbeError::Poll {
                    executable: self.executable.clone(),
                    source: error,
                })
            }
        };
    }

    /// Kills the process group with SIGKILL and reaps the child.
    pub fn kill(&mut self) -> Result<ExitStatus, ProbeError> {
        self.signal(Signal::SIGKILL)?;

        let executable = self.executable.clone();
        let child = self.child_mut()?;

        return match child.wait() {
            Ok(exit_status) => {
                debug!("Process {} was killed ({})", executable, exit_status);
                self.cleanup_process_handles();
                Ok(exit_status)
            }
            Err(error) => {
                Err(ProbeError::Poll { executable, source: error })
            }
        };
    }

    /// Kills whatever the child left behind in its process group.
    pub fn kill_leftovers(&mut self) -> Result<(), ProbeError> {
        if self.signal(Signal::SIGKILL)? {
            warn!("Process {} left running processes behind, killed them", self.executable);
        }

        return Ok(());
    }

    /// Reads everything the child wrote to stdout and stderr.
    /// Blocks until both pipes are closed, so only call this once the child has exited.
    pub fn collect_output(&mut self) -> Result<Output, ProbeError> {
        let child = match self.child.take() {
            Some(child) => child,
            None => return Err(ProbeError::NotStarted(self.executable.clone())),
        };

        return match child.wait_with_output() {
            Ok(output) => {
                debug!(
                    "Collected {} bytes of stdout and {} bytes of stderr from process {}",
                    output.stdout.len(),
                    output.stderr.len(),
                    self.executable,
                );
                Ok(output)
            }
            Err(error) => {
                Err(ProbeError::Output {
                    executable: self.executable.clone(),
                    source: error,
                })
            }
        };
    }

    fn signal(&self, signal: Signal) -> Result<bool, ProbeError> {
        let pgid = match self.pgid {
            Some(pgid) => pgid,
            None => return Err(ProbeError::NotStarted(self.executable.clone())),
        };

        return match signal_group(pgid, Some(signal)) {
            Ok(delivered) => Ok(delivered),
            Err(error) => {
                Err(ProbeError::Signal {
                    executable: self.executable.clone(),
                    source: error,
                })
            }
        };
    }

    fn child_mut(&mut self) -> Result<&mut Child, ProbeError> {
        return match self.child {
            Some(ref mut child) => Ok(child),
            None => Err(ProbeError::NotStarted(self.executable.clone())),
        };
    }

    fn cleanup_process_handles(&mut self) {
        if let Some(mut child) = self.child.take() {
            drop(child.stdout.take());
            drop(child.stderr.take());

            // reap in case the bounded wait left a zombie behind
            let _ = child.try_wait();
        }
    }
}


impl Drop for Process {
    /// Nothing started by the child outlives the `Process`, even when the child itself is gone.
    fn drop(&mut self) {
        let pgid = match self.pgid {
            Some(pgid) => pgid,
            None => return,
        };

        if let Ok(true) = signal_group(pgid, Some(Signal::SIGKILL)) {
            debug!("Killed what was left of process group {} of {}", pgid, self.executable);
        }

        if let Some(ref mut child) = self.child {
            let _ = child.wait();
        }

        if let Some(ref interrupt_handle) = self.interrupt_handle {
            interrupt_handle.clear();
        }
    }
}


#[cfg(test)]
mod tests {
    use std::thread;
    use super::*;

    fn gen_sleeping_process() -> Process {
        return Process::new(String::from("sleep"), vec![String::from("60")]);
    }

    fn gen_shell_process(script: &str) -> Process {
        return Process::new(
            String::from("sh"),
            vec![String::from("-c"), String::from(script)],
        );
    }

    fn group_exists(pgid: Pid) -> bool {
        return signal_group(pgid, None).unwrap();
    }

    /// Orphans are reaped by init, so give it a moment.
    fn wait_until_group_is_gone(pgid: Pid) -> bool {
        for _ in 0..50 {
            if !group_exists(pgid) {
                return true;
            }
            thread::sleep(Duration::from_millis(20));
        }

        return false;
    }

    #[test]
    fn pid_returns_none_before_start() {
        let process = gen_sleeping_process();

        assert_eq!(process.get_pid(), None);
        assert_eq!(process.get_pgid(), None);
    }

    #[test]
    fn start_returns_pid_which_leads_the_group() {
        let mut process = gen_sleeping_process();

        let pid = process.start().unwrap();
        assert_eq!(process.get_pid(), Some(pid));
        assert_eq!(process.get_pgid(), Some(Pid::from_raw(pid as i32)));
        process.kill().unwrap();
    }

    #[test]
    fn start_when_executable_missing_should_return_launch_error() {
        let mut process = Process::new(String::from("tsm-probe-does-not-exist"), vec![]);

        let error = process.start().unwrap_err();
        assert!(error.is_launch_failure());
        assert_eq!(process.get_pid(), None);
    }

    #[test]
    fn exit_status_when_not_started_should_return_error() {
        let mut process = gen_sleeping_process();

        assert!(process.exit_status().is_err());
        assert!(process.terminate().is_err());
    }

    #[test]
    fn exit_status_returns_none_while_running() {
        let mut process = gen_sleeping_process();

        process.start().unwrap();
        assert!(process.exit_status().unwrap().is_none());
        process.kill().unwrap();
    }

    #[test]
    fn terminate_stops_cooperative_process() {
        let mut process = gen_sleeping_process();

        let pid = process.start().unwrap();
        process.terminate().unwrap();
        let exit_status = process.wait_for(Duration::from_secs(5)).unwrap();

        assert!(exit_status.is_some());
        assert_eq!(process.get_pid(), None);
        assert!(!group_exists(Pid::from_raw(pid as i32)));
    }

    #[test]
    fn wait_for_returns_none_when_sigterm_is_ignored() {
        let mut process = gen_shell_process("trap '' TERM; sleep 60");

        let pid = process.start().unwrap();
        thread::sleep(Duration::from_millis(200));
        process.terminate().unwrap();

        assert!(process.wait_for(Duration::from_millis(300)).unwrap().is_none());
        assert_eq!(process.get_pid(), Some(pid));
        process.kill().unwrap();
        assert_eq!(process.get_pid(), None);
    }

    #[test]
    fn collect_output_returns_exact_streams() {
        let mut process = gen_shell_process("printf out; printf err >&2; exit 3");

        process.start().unwrap();
        thread::sleep(Duration::from_millis(300));
        let output = process.collect_output().unwrap();

        assert_eq!(output.status.code(), Some(3));
        assert_eq!(output.stdout, b"out");
        assert_eq!(output.stderr, b"err");
    }

    #[test]
    fn kill_leftovers_kills_orphaned_descendants() {
        let mut process = gen_shell_process("sleep 60 & exit 0");

        let pid = process.start().unwrap();
        thread::sleep(Duration::from_millis(300));
        assert!(process.exit_status().unwrap().is_some());
        assert!(group_exists(Pid::from_raw(pid as i32)));

        // the orphaned sleep holds the pipes open until it is killed
        process.kill_leftovers().unwrap();
        let output = process.collect_output().unwrap();
        assert!(output.status.success());
    }

    #[test]
    fn drop_kills_running_process() {
        let mut process = gen_sleeping_process();

        let pid = process.start().unwrap();
        drop(process);

        assert!(!group_exists(Pid::from_raw(pid as i32)));
    }

    #[test]
    fn kill_leftovers_after_terminate_kills_descendants_ignoring_sigterm() {
        let mut process = gen_shell_process("sh -c \"trap '' TERM; sleep 60\" & sleep 60");

        let pid = process.start().unwrap();
        let pgid = Pid::from_raw(pid as i32);
        thread::sleep(Duration::from_millis(300));
        process.terminate().unwrap();

        assert!(process.wait_for(Duration::from_secs(2)).unwrap().is_some());
        assert!(group_exists(pgid));

        process.kill_leftovers().unwrap();
        assert!(wait_until_group_is_gone(pgid));
    }

    #[test]
    fn drop_after_leader_exit_kills_remaining_group() {
        let mut process = gen_shell_process("sleep 60 & exit 0");

        let pid = process.start().unwrap();
        let pgid = Pid::from_raw(pid as i32);
        thread::sleep(Duration::from_millis(300));
        assert!(process.exit_status().unwrap().is_some());
        assert!(group_exists(pgid));

        drop(process);
        assert!(wait_until_group_is_gone(pgid));
    }

    #[test]
    fn start_publishes_group_and_drop_clears_it() {
        let interrupt_handle = InterruptHandle::new();
        let mut process = gen_sleeping_process().with_interrupt_handle(interrupt_handle.clone());

        let pid = process.start().unwrap();
        assert_eq!(interrupt_handle.get_group(), Some(Pid::from_raw(pid as i32)));

        drop(process);
        assert_eq!(interrupt_handle.get_group(), None);
    }
}
