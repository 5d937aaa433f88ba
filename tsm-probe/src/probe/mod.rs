mod process;
pub use process::{Process, signal_group};

mod probe_error;
pub use probe_error::ProbeError;

mod probe_result;
pub use probe_result::{ProbeResult, Shutdown};

mod probe_settings;
pub use probe_settings::ProbeSettings;

mod liveness_probe;
pub use liveness_probe::{LivenessProbe, run_probe};

mod interrupt;
pub use interrupt::InterruptHandle;
