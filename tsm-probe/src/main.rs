use std::process::exit;
use argparse::{ArgumentParser, List, Store, StoreOption};
use log::{debug, error};

use tsm_probe::config::{Configuration, LogLevel, Overrides};
use tsm_probe::probe::{LivenessProbe, ProbeSettings};
use tsm_probe::report;


const EXIT_PROBE_ERROR: i32 = 2;
const EXIT_CONFIG_ERROR: i32 = 10;
const EXIT_INTERRUPTED: i32 = 130;


struct CommandLineParameters {
    config_file: String,
    overrides: Overrides,
}


fn parse_args_or_exit() -> CommandLineParameters {
    let mut config_file = String::new();
    let mut name: Option<String> = None;
    let mut grace_period_s: Option<f64> = None;
    let mut shutdown_timeout_s: Option<f64> = None;
    let mut log_level: Option<LogLevel> = None;
    let mut command: Vec<String> = Vec::new();

    {
        let mut ap = ArgumentParser::new();
        ap.set_description("Taschenmesser Startup Probe. Starts a command, waits for the grace period \
                            and exits with 0 if the command is still running, 1 if it exited.");
        ap.stop_on_first_argument(true);
        ap.refer(&mut config_file).add_option(&["-c", "--config"], Store, "Configuration file");
        ap.refer(&mut name).add_option(&["-n", "--name"], StoreOption, "Name shown in the verdict");
        ap.refer(&mut grace_period_s).add_option(&["-g", "--grace-period"], StoreOption,
                                                 "Seconds to wait before checking (default 3)");
        ap.refer(&mut shutdown_timeout_s).add_option(&["-t", "--shutdown-timeout"], StoreOption,
                                                     "Seconds to wait after SIGTERM before killing (default 5)");
        ap.refer(&mut log_level).add_option(&["-l", "--log-level"], StoreOption,
                                            "Log level: debug, info, warn or error");
        ap.refer(&mut command).add_argument("command", List, "Command to probe, followed by its arguments");

        match ap.parse_args() {
            Ok(()) => {},
            Err(0) => exit(0),
            Err(_) => exit(EXIT_CONFIG_ERROR),
        }
    }

    CommandLineParameters {
        config_file,
        overrides: Overrides {
            name,
            command,
            grace_period_s,
            shutdown_timeout_s,
            log_level,
        },
    }
}


fn init_config_or_exit(config_file: String) -> Configuration {
    if config_file.is_empty() {
        return Configuration::default();
    }

    match Configuration::from_file(config_file) {
        Ok(configuration) => {
            configuration
        },
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(EXIT_CONFIG_ERROR);
        }
    }
}


fn init_logger(configuration: &Configuration, overrides: &Overrides) {
    let log_level = configuration.get_log_level(overrides);
    let env = env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV,
                                                   log_level.to_string());
    env_logger::init_from_env(env);
}


fn build_settings_or_exit(configuration: &Configuration, overrides: &Overrides) -> ProbeSettings {
    match configuration.build_settings(overrides) {
        Ok(settings) => {
            debug!("Probe settings: {:?}", settings);
            settings
        },
        Err(e) => {
            error!("{}", e);
            exit(EXIT_CONFIG_ERROR);
        }
    }
}


fn init_probe_or_exit(settings: ProbeSettings) -> LivenessProbe {
    let probe = LivenessProbe::new(settings);

    // The child runs in its own process group and does not see our Ctrl-C
    let interrupt_handle = probe.get_interrupt_handle();
    let result = ctrlc::set_handler(move || {
        interrupt_handle.interrupt();
        exit(EXIT_INTERRUPTED);
    });

    if let Err(e) = result {
        error!("Error setting Ctrl-C handler: {}", e);
        exit(EXIT_PROBE_ERROR);
    }

    return probe;
}


fn main() {
    let params = parse_args_or_exit();
    let configuration = init_config_or_exit(params.config_file);
    init_logger(&configuration, &params.overrides);
    let settings = build_settings_or_exit(&configuration, &params.overrides);
    let probe = init_probe_or_exit(settings);

    report::print_start(probe.get_settings());
    let exit_code = match probe.run() {
        Ok(result) => {
            report::print_result(probe.get_settings(), &result);
            result.exit_code()
        },
        Err(e) => {
            report::print_error(probe.get_settings(), &e);
            EXIT_PROBE_ERROR
        }
    };

    exit(exit_code);
}
