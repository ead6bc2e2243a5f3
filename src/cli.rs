use clap::Parser;

use crate::usb_id::{parse_usb_id, UsbId};

#[derive(Parser, Debug)]
#[command(
    name = "usbrelay",
    version,
    about = "Control USB HID connected electrical relay modules"
)]
pub struct Cli {
    /// 列挙・照合の詳細をstderrに出す
    #[arg(short, long)]
    pub verbose: bool,
    /// 対象ボードのvendor:product (16進, 例 16c0:05df)。環境変数USBIDより優先
    #[arg(long, value_name = "VID:PID", value_parser = parse_usb_id)]
    pub usbid: Option<UsbId>,
    /// open/状態読み取りに失敗したボードを飛ばして残りを処理する
    #[arg(long)]
    pub keep_going: bool,
    /// SERIAL_RELAY=STATE 形式のコマンド。省略すると全ボードの状態を表示
    #[arg(value_name = "SERIAL_RELAY=STATE")]
    pub commands: Vec<String>,
}
