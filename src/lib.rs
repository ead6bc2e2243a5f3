pub mod cli;
pub mod commands;
pub mod env_config;
pub mod error;
pub mod hid;
pub mod relay;
pub mod report;
pub mod usb_id;
pub mod util;

pub use cli::Cli;
pub use commands::{
    dump_states, handle_run, report_unmatched, DeviceFailurePolicy, RunOptions, RunResult,
};
pub use env_config::{load_env_defaults, resolve_usb_id, EnvDefaults};
pub use error::{DeviceError, ParseError, RunError, EXIT_DEVICE_FAILURE, EXIT_PARSE_FAILURE};
pub use hid::{DeviceDescriptor, DeviceSnapshot, HidBackend, HidDeviceIo};
pub use relay::{parse_commands, RelayCommand, RelayState};
pub use usb_id::{parse_usb_id, UsbId};
pub use util::{format_bytes, leading_integer};
