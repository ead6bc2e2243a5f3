use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

use crate::error::ParseError;

pub const DEFAULT_VENDOR_ID: u16 = 0x16c0;
pub const DEFAULT_PRODUCT_ID: u16 = 0x05df;

/// 列挙対象にする vendor id / product id の組
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UsbId {
    pub vendor_id: u16,
    pub product_id: u16,
}

impl Default for UsbId {
    fn default() -> Self {
        Self {
            vendor_id: DEFAULT_VENDOR_ID,
            product_id: DEFAULT_PRODUCT_ID,
        }
    }
}

impl UsbId {
    pub fn matches(&self, vendor_id: u16, product_id: u16) -> bool {
        self.vendor_id == vendor_id && self.product_id == product_id
    }
}

impl fmt::Display for UsbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}:{:04x}", self.vendor_id, self.product_id)
    }
}

impl FromStr for UsbId {
    type Err = ParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (vendor, product) = input
            .split_once(':')
            .filter(|(v, p)| !v.is_empty() && !p.is_empty())
            .ok_or_else(|| ParseError::InvalidUsbId(input.to_string()))?;

        Ok(Self {
            vendor_id: parse_hex_half(vendor, input)?,
            product_id: parse_hex_half(product, input)?,
        })
    }
}

/// clapの `value_parser` 用
pub fn parse_usb_id(input: &str) -> Result<UsbId, ParseError> {
    input.parse()
}

fn parse_hex_half(half: &str, input: &str) -> Result<u16, ParseError> {
    let digits = half
        .strip_prefix("0x")
        .or_else(|| half.strip_prefix("0X"))
        .unwrap_or(half);

    let value = u32::from_str_radix(digits, 16).map_err(|e| match e.kind() {
        IntErrorKind::PosOverflow => ParseError::UsbIdOutOfRange(input.to_string()),
        _ => ParseError::InvalidUsbId(input.to_string()),
    })?;
    u16::try_from(value).map_err(|_| ParseError::UsbIdOutOfRange(input.to_string()))
}
