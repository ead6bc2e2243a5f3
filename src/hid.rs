use std::borrow::Cow;
use std::ffi::{CStr, CString};

use hidapi::{HidApi, HidDevice, HidResult};
use log::{debug, warn};

use crate::relay::RelayState;
use crate::report::{relay_count_from_product, write_report, StateReport, DEFAULT_RELAY_COUNT};
use crate::usb_id::UsbId;
use crate::util::format_bytes;

/// HIDデバイスIOを抽象化するトレイト（テストでモックしやすくするため）
///
/// ハンドルはdropで閉じる。
pub trait HidDeviceIo {
    fn get_feature_report(&self, data: &mut [u8]) -> HidResult<usize>;
    fn write(&self, data: &[u8]) -> HidResult<usize>;
}

impl HidDeviceIo for HidDevice {
    fn get_feature_report(&self, data: &mut [u8]) -> HidResult<usize> {
        HidDevice::get_feature_report(self, data)
    }

    fn write(&self, data: &[u8]) -> HidResult<usize> {
        HidDevice::write(self, data)
    }
}

/// デバイスの列挙とopenを担うバックエンド
pub trait HidBackend {
    type Device: HidDeviceIo;

    /// 並び順はOS任せで安定しない
    fn enumerate(&self, usb_id: UsbId) -> Vec<DeviceDescriptor>;
    fn open(&self, path: &CStr) -> HidResult<Self::Device>;
}

impl HidBackend for HidApi {
    type Device = HidDevice;

    fn enumerate(&self, usb_id: UsbId) -> Vec<DeviceDescriptor> {
        self.device_list()
            .filter(|info| usb_id.matches(info.vendor_id(), info.product_id()))
            .map(DeviceDescriptor::from_info)
            .collect()
    }

    fn open(&self, path: &CStr) -> HidResult<HidDevice> {
        self.open_path(path)
    }
}

#[derive(Clone, Debug)]
pub struct DeviceDescriptor {
    pub path: CString,
    pub vendor_id: u16,
    pub product_id: u16,
    pub serial_number: Option<String>,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
    pub release_number: u16,
    pub interface_number: i32,
}

impl DeviceDescriptor {
    pub fn from_info(info: &hidapi::DeviceInfo) -> Self {
        Self {
            path: info.path().to_owned(),
            vendor_id: info.vendor_id(),
            product_id: info.product_id(),
            serial_number: info.serial_number().map(|s| s.to_string()),
            manufacturer: info.manufacturer_string().map(|s| s.to_string()),
            product: info.product_string().map(|s| s.to_string()),
            release_number: info.release_number(),
            interface_number: info.interface_number(),
        }
    }

    pub fn display_path(&self) -> Cow<'_, str> {
        self.path.to_string_lossy()
    }
}

/// 1台分の状態。デバイスごとに毎回読み直し、使い終わったら捨てる
#[derive(Clone, Debug)]
pub struct DeviceSnapshot {
    pub path: String,
    pub relay_count: u8,
    pub report: StateReport,
}

impl DeviceSnapshot {
    pub fn serial(&self) -> &[u8] {
        self.report.serial()
    }

    pub fn serial_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.serial())
    }

    /// (1始まりのリレー番号, 状態) を昇順で返す
    pub fn relay_states(&self) -> impl Iterator<Item = (u8, RelayState)> + '_ {
        (0..self.relay_count).map(move |i| (i + 1, self.report.relay_state(i)))
    }
}

/// 製品名からリレー数を推定し、分からなければ既定値を使う
pub fn relay_count(descriptor: &DeviceDescriptor) -> u8 {
    relay_count_from_product(descriptor.product.as_deref()).unwrap_or_else(|| {
        warn!(
            "unknown relay count for product {:?}, assuming {}",
            descriptor.product.as_deref().unwrap_or("-"),
            DEFAULT_RELAY_COUNT
        );
        DEFAULT_RELAY_COUNT
    })
}

/// feature reportを1回読み、シリアルと状態ビットマスクを取り出す
pub fn read_snapshot(
    device: &dyn HidDeviceIo,
    descriptor: &DeviceDescriptor,
    relay_count: u8,
) -> HidResult<DeviceSnapshot> {
    let mut buf = StateReport::request();
    let received = device.get_feature_report(&mut buf)?;
    debug!("  feature report ({} bytes): {}", received, format_bytes(&buf));

    Ok(DeviceSnapshot {
        path: descriptor.display_path().into_owned(),
        relay_count,
        report: StateReport::from_raw(buf),
    })
}

/// リレー1つの状態を書き込む
pub fn operate_relay(device: &dyn HidDeviceIo, relay_num: u8, state: RelayState) -> HidResult<usize> {
    device.write(&write_report(relay_num, state))
}
