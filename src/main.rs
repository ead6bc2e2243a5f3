use std::io;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use dotenvy::dotenv;
use env_logger::Env;
use hidapi::HidApi;
use log::{debug, error, warn};

use usbrelay_cli::{
    handle_run, load_env_defaults, parse_commands, resolve_usb_id, Cli, DeviceFailurePolicy,
    ParseError, RelayCommand, RunOptions, RunResult, EXIT_DEVICE_FAILURE, EXIT_PARSE_FAILURE,
};

fn main() -> ExitCode {
    // .envでUSBIDを指定できるようにする
    dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let (mut commands, options) = match prepare(&cli) {
        Ok(prepared) => prepared,
        Err(err) => {
            error!("{}", err);
            return ExitCode::from(EXIT_PARSE_FAILURE);
        }
    };

    match run(&mut commands, &options) {
        Ok(result) => ExitCode::from(result.exit_code()),
        Err(err) => {
            error!("{:#}", err);
            ExitCode::from(EXIT_DEVICE_FAILURE)
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

/// デバイスに触る前に引数と環境変数をすべて検証する
fn prepare(cli: &Cli) -> std::result::Result<(Vec<RelayCommand>, RunOptions), ParseError> {
    let commands = parse_commands(&cli.commands)?;
    for (command, arg) in commands.iter().zip(&cli.commands) {
        if command.is_truncated(arg) {
            warn!("argument '{}' truncated to '{}'", arg, command.origin);
        }
        debug!(
            "Orig: {}, Serial: {}, Relay: {} State: {}",
            command.origin, command.serial, command.relay_num, command.state
        );
    }

    let env = load_env_defaults()?;
    let options = RunOptions {
        usb_id: resolve_usb_id(cli.usbid, &env),
        on_device_failure: if cli.keep_going {
            DeviceFailurePolicy::Skip
        } else {
            DeviceFailurePolicy::Abort
        },
    };
    Ok((commands, options))
}

fn run(commands: &mut [RelayCommand], options: &RunOptions) -> Result<RunResult> {
    let api = HidApi::new().context("failed to initialize HID API")?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = handle_run(&api, commands, options, &mut out)?;
    debug!("{} error(s)", result.errors());
    Ok(result)
}
