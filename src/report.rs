//! リレーボードの9バイトHIDレポート
//!
//! feature reportはシリアル番号(NUL終端ASCII)と状態ビットマスクが同じバッファに
//! 重なって入っている。7バイト目がビットマスクで、ビット i が立っていれば
//! リレー i+1 がON。

use crate::relay::RelayState;

pub const REPORT_LEN: usize = 9;
/// 状態取得時に先頭バイトへ入れるreport id
pub const STATE_REPORT_ID: u8 = 0x01;
pub const RELAY_MAX: u8 = 8;
pub const DEFAULT_RELAY_COUNT: u8 = 2;
pub const PRODUCT_PREFIX: &str = "USBRelay";

const STATE_BYTE: usize = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StateReport {
    raw: [u8; REPORT_LEN],
}

impl StateReport {
    /// get_feature_reportに渡すバッファ
    pub fn request() -> [u8; REPORT_LEN] {
        let mut buf = [0u8; REPORT_LEN];
        buf[0] = STATE_REPORT_ID;
        buf
    }

    /// 末尾バイトは必ずNULにしてシリアル部分の終端を保証する
    pub fn from_raw(mut raw: [u8; REPORT_LEN]) -> Self {
        raw[REPORT_LEN - 1] = 0;
        Self { raw }
    }

    pub fn raw(&self) -> &[u8; REPORT_LEN] {
        &self.raw
    }

    /// 先頭からNULまでのバイト列。NULが無ければビットマスクのバイトも含む
    pub fn serial(&self) -> &[u8] {
        let end = self
            .raw
            .iter()
            .position(|b| *b == 0)
            .unwrap_or(REPORT_LEN - 1);
        self.raw.get(..end).unwrap_or_default()
    }

    pub fn relay_mask(&self) -> u8 {
        self.raw[STATE_BYTE]
    }

    /// index は0始まり
    pub fn relay_state(&self, index: u8) -> RelayState {
        let bit = 1u8.checked_shl(u32::from(index)).unwrap_or(0);
        if self.relay_mask() & bit != 0 {
            RelayState::On
        } else {
            RelayState::Off
        }
    }
}

pub fn write_report(relay_num: u8, state: RelayState) -> [u8; REPORT_LEN] {
    let mut buf = [0u8; REPORT_LEN];
    buf[1] = state.wire_value();
    buf[2] = relay_num;
    buf
}

/// 製品名 `USBRelayN` からリレー数を得る。2..=RELAY_MAX の外なら None
pub fn relay_count_from_product(product: Option<&str>) -> Option<u8> {
    let rest = product?.strip_prefix(PRODUCT_PREFIX)?;
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let count: u8 = rest.get(..digits_end)?.parse().ok()?;
    (2..=RELAY_MAX).contains(&count).then_some(count)
}
