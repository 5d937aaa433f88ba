use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};
use nix::sys::signal::Signal;
use nix::unistd::Pid;
use log::{debug, error};

use crate::probe::process::signal_group;


const NO_GROUP: i32 = 0;


/// Shared slot holding the process group of the probe's current child.
/// Lets a Ctrl-C handler on another thread take the child down with it.
#[derive(Debug, Clone, Default)]
pub struct InterruptHandle {
    group: Arc<AtomicI32>,
}


impl InterruptHandle {
    pub fn new() -> InterruptHandle {
        return InterruptHandle::default();
    }

    pub fn set_group(&self, pgid: Pid) {
        self.group.store(pgid.as_raw(), Ordering::SeqCst);
    }

    pub fn clear(&self) {
        self.group.store(NO_GROUP, Ordering::SeqCst);
    }

    pub fn get_group(&self) -> Option<Pid> {
        return match self.group.load(Ordering::SeqCst) {
            NO_GROUP => None,
            pgid => Some(Pid::from_raw(pgid)),
        };
    }

    /// Kills the current process group, if any. Returns true if something was killed.
    pub fn interrupt(&self) -> bool {
        let pgid = match self.group.swap(NO_GROUP, Ordering::SeqCst) {
            NO_GROUP => return false,
            pgid => Pid::from_raw(pgid),
        };

        return match signal_group(pgid, Some(Signal::SIGKILL)) {
            Ok(killed) => {
                debug!("Interrupted, killed process group {}", pgid);
                killed
            }
            Err(e) => {
                error!("Failed to kill process group {}: {}", pgid, e);
                false
            }
        };
    }
}
