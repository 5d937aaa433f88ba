use std::io::{self, Write};
use humantime::format_duration;

use crate::probe::{ProbeError, ProbeResult, ProbeSettings, Shutdown};


pub fn print_start(settings: &ProbeSettings) {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Err(e) = write_start(&mut out, settings) {
        eprintln!("Failed to write probe start: {}", e);
    }
}


pub fn print_result(settings: &ProbeSettings, result: &ProbeResult) {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if let Err(e) = write_result(&mut out, settings, result) {
        eprintln!("Failed to write probe result: {}", e);
    }
}


pub fn print_error(settings: &ProbeSettings, error: &ProbeError) {
    let stderr = io::stderr();
    let mut out = stderr.lock();

    if let Err(e) = write_error(&mut out, settings, error) {
        eprintln!("Failed to write probe error: {}", e);
    }
}


pub fn write_start<W: Write>(out: &mut W, settings: &ProbeSettings) -> io::Result<()> {
    writeln!(out, "Testing {}...", settings.name)?;
    writeln!(out, "Starting {}, checking again in {}", settings.name, format_duration(settings.grace_period))?;

    return out.flush();
}


pub fn write_result<W: Write>(out: &mut W, settings: &ProbeSettings, result: &ProbeResult) -> io::Result<()> {
    match result {
        ProbeResult::Alive { shutdown } => {
            writeln!(out, "✅ {} is running", settings.name)?;
            match shutdown {
                Shutdown::Terminated(exit_status) => {
                    writeln!(out, "Stopped after SIGTERM ({})", exit_status)?;
                }
                Shutdown::Killed => {
                    writeln!(
                        out,
                        "Force-killed after ignoring SIGTERM for {}",
                        format_duration(settings.shutdown_timeout),
                    )?;
                }
            }
        }
        ProbeResult::Exited { status, stdout, stderr } => {
            writeln!(
                out,
                "❌ {} failed to start, exited within {} ({})",
                settings.name,
                format_duration(settings.grace_period),
                status,
            )?;
            writeln!(out, "STDOUT: {}", String::from_utf8_lossy(stdout))?;
            writeln!(out, "STDERR: {}", String::from_utf8_lossy(stderr))?;
        }
    }

    return out.flush();
}


pub fn write_error<W: Write>(out: &mut W, settings: &ProbeSettings, error: &ProbeError) -> io::Result<()> {
    if error.is_launch_failure() {
        writeln!(out, "❌ {} could not be launched: {}", settings.name, error)?;
    } else {
        writeln!(out, "❌ {} could not be probed: {}", settings.name, error)?;
    }

    return out.flush();
}
