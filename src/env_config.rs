use std::env;

use crate::error::ParseError;
use crate::usb_id::UsbId;

pub const USBID_VAR: &str = "USBID";

#[derive(Clone, Debug, Default)]
pub struct EnvDefaults {
    pub usb_id: Option<UsbId>,
}

/// 環境変数(.env含む)から既定値を読む。値が壊れていればその場でエラー
pub fn load_env_defaults() -> Result<EnvDefaults, ParseError> {
    Ok(EnvDefaults {
        usb_id: usb_id_from_var(env::var(USBID_VAR))?,
    })
}

/// CLI指定を優先し、無ければ環境変数、どちらも無ければ工場出荷時のIDを使う
pub fn resolve_usb_id(cli: Option<UsbId>, env: &EnvDefaults) -> UsbId {
    cli.or(env.usb_id).unwrap_or_default()
}

pub(crate) fn usb_id_from_var(
    value: Result<String, env::VarError>,
) -> Result<Option<UsbId>, ParseError> {
    match value {
        Ok(value) => value.parse().map(Some),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(raw)) => Err(ParseError::InvalidUsbId(
            raw.to_string_lossy().into_owned(),
        )),
    }
}
