use std::io::{self, Write};

use log::{debug, error, warn};

use crate::error::{DeviceError, RunError};
use crate::hid::{
    operate_relay, read_snapshot, relay_count, DeviceDescriptor, DeviceSnapshot, HidBackend,
    HidDeviceIo,
};
use crate::relay::{RelayCommand, RelayState};
use crate::usb_id::UsbId;

/// デバイスのopen/状態読み取りに失敗したときの扱い
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeviceFailurePolicy {
    /// その場で実行全体を打ち切る
    #[default]
    Abort,
    /// そのデバイスだけ飛ばし、エラー1件として数える
    Skip,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct RunOptions {
    pub usb_id: UsbId,
    pub on_device_failure: DeviceFailurePolicy,
}

/// 1回の実行の集計。終了コードはエラー件数の合計
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunResult {
    pub failed_writes: u32,
    pub unmatched: u32,
    pub skipped_devices: u32,
}

impl RunResult {
    pub fn errors(&self) -> u32 {
        self.failed_writes
            .saturating_add(self.unmatched)
            .saturating_add(self.skipped_devices)
    }

    /// プロセスの終了コードは1バイトなので255で頭打ち
    pub fn exit_code(&self) -> u8 {
        u8::try_from(self.errors()).unwrap_or(u8::MAX)
    }
}

/// 列挙した全ボードに対してコマンドを照合・実行する
///
/// - コマンドが1つも無ければ各ボードの状態を `out` に出力する(問い合わせモード)
/// - シリアルが一致したコマンドごとに1回ずつ書き込む。重複は除かない
/// - 最後にどのボードにも一致しなかったコマンドを警告し、件数を数える
pub fn handle_run<B: HidBackend>(
    backend: &B,
    commands: &mut [RelayCommand],
    options: &RunOptions,
    out: &mut dyn Write,
) -> Result<RunResult, RunError> {
    let mut result = RunResult::default();
    let devices = backend.enumerate(options.usb_id);
    debug!("{} device(s) found for {}", devices.len(), options.usb_id);

    for descriptor in &devices {
        match process_device(backend, descriptor, commands, out) {
            Ok(failed_writes) => {
                result.failed_writes = result.failed_writes.saturating_add(failed_writes);
            }
            Err(RunError::Device(err)) if options.on_device_failure == DeviceFailurePolicy::Skip => {
                warn!("skipping device: {:#}", anyhow::Error::new(err));
                result.skipped_devices = result.skipped_devices.saturating_add(1);
            }
            Err(err) => return Err(err),
        }
    }

    result.unmatched = report_unmatched(commands);
    Ok(result)
}

/// 1台分の処理。ハンドルはこの関数を抜けるときに必ず閉じられる
fn process_device<B: HidBackend>(
    backend: &B,
    descriptor: &DeviceDescriptor,
    commands: &mut [RelayCommand],
    out: &mut dyn Write,
) -> Result<u32, RunError> {
    log_descriptor(descriptor);
    let relay_count = relay_count(descriptor);
    debug!("  Number of Relays = {}", relay_count);

    let path = descriptor.display_path();
    let device = backend
        .open(&descriptor.path)
        .map_err(|source| DeviceError::Open {
            path: path.to_string(),
            source,
        })?;
    let snapshot =
        read_snapshot(&device, descriptor, relay_count).map_err(|source| DeviceError::Read {
            path: path.to_string(),
            source,
        })?;

    if commands.is_empty() {
        dump_states(&snapshot, out)?;
        return Ok(0);
    }

    Ok(execute_matching(&device, &snapshot, commands))
}

/// シリアルがバイト単位で一致した全コマンドを書き込み、失敗した件数を返す
///
/// 書き込みに失敗しても「試行済み」として executed を立てる。
pub fn execute_matching(
    device: &dyn HidDeviceIo,
    snapshot: &DeviceSnapshot,
    commands: &mut [RelayCommand],
) -> u32 {
    let mut failed = 0u32;
    for (index, command) in commands.iter_mut().enumerate() {
        if command.serial.as_bytes() != snapshot.serial() {
            continue;
        }

        debug!(
            "{} HID Serial: {} Serial: {}, Relay: {} State: {}",
            index + 1,
            snapshot.serial_lossy(),
            command.serial,
            command.relay_num,
            command.state
        );
        if let Err(source) = operate_relay(device, command.relay_num, command.state) {
            let err = DeviceError::Write {
                serial: command.serial.clone(),
                relay: command.relay_num,
                source,
            };
            error!("{:#}", anyhow::Error::new(err));
            failed = failed.saturating_add(1);
        }
        command.executed = true;
    }
    failed
}

/// `<serial>_<relay>=<0|1>` を1リレー1行で出力する。stdoutに出すのはこれだけ
pub fn dump_states(snapshot: &DeviceSnapshot, out: &mut dyn Write) -> io::Result<()> {
    for (relay, state) in snapshot.relay_states() {
        out.write_all(snapshot.serial())?;
        writeln!(out, "_{}={}", relay, u8::from(state == RelayState::On))?;
    }
    Ok(())
}

/// 各コマンドの照合結果を出力し、未実行のコマンド数を返す
pub fn report_unmatched(commands: &[RelayCommand]) -> u32 {
    let mut unmatched = 0u32;
    for command in commands {
        if command.executed {
            debug!(
                "Serial: {}, Relay: {} State: {} --- Found",
                command.serial, command.relay_num, command.state
            );
        } else {
            warn!(
                "Serial: {}, Relay: {} State: {} --- Not Found",
                command.serial, command.relay_num, command.state
            );
            unmatched = unmatched.saturating_add(1);
        }
    }
    unmatched
}

fn log_descriptor(descriptor: &DeviceDescriptor) {
    debug!(
        "Device Found\n  type: {:04x} {:04x}\n  path: {}\n  serial_number: {}",
        descriptor.vendor_id,
        descriptor.product_id,
        descriptor.display_path(),
        descriptor.serial_number.as_deref().unwrap_or("-")
    );
    debug!("  Manufacturer: {}", descriptor.manufacturer.as_deref().unwrap_or("-"));
    debug!("  Product:      {}", descriptor.product.as_deref().unwrap_or("-"));
    debug!("  Release:      {:x}", descriptor.release_number);
    debug!("  Interface:    {}", descriptor.interface_number);
}
