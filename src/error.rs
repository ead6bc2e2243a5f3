use std::io;

use hidapi::HidError;
use thiserror::Error;

/// コマンドライン/環境変数の解釈に失敗したときの終了コード
pub const EXIT_PARSE_FAILURE: u8 = 2;
/// デバイスのopen/読み取り失敗で実行を打ち切ったときの終了コード
pub const EXIT_DEVICE_FAILURE: u8 = 1;

/// 引数・USBIDの解釈エラー。いずれもデバイスに触る前に実行を止める
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("can't parse argument '{arg}': {reason}")]
    MalformedArgument { arg: String, reason: &'static str },
    #[error("relay num must be between 0 and {max}, got {value}", max = u8::MAX)]
    RelayOutOfRange { value: i64 },
    #[error("invalid format for USBID, expecting 'abcd:ef12': '{0}'")]
    InvalidUsbId(String),
    #[error("invalid USBID, numbers are out of range: '{0}'")]
    UsbIdOutOfRange(String),
}

#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("unable to open device {path}")]
    Open {
        path: String,
        #[source]
        source: HidError,
    },
    #[error("unable to read relay state from {path}")]
    Read {
        path: String,
        #[source]
        source: HidError,
    },
    #[error("unable to write relay {relay} on board {serial}")]
    Write {
        serial: String,
        relay: u8,
        #[source]
        source: HidError,
    },
}

/// 実行全体を中断させるエラー
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Device(#[from] DeviceError),
    #[error("failed to print relay states")]
    Output(#[from] io::Error),
}
