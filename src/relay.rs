use std::fmt;

use crate::error::ParseError;
use crate::util::leading_integer;

/// 1つの引数として受け付ける最大バイト数。超えた分は区切り文字で分割する前に切り捨てる
pub const ARG_MAX_LEN: usize = 19;

const DELIMITERS: [char; 2] = ['_', '='];

/// リレーの目標状態。値はwriteレポートの2バイト目にそのまま載る
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelayState {
    On,
    Off,
}

impl RelayState {
    pub fn wire_value(self) -> u8 {
        match self {
            RelayState::On => 0xff,
            RelayState::Off => 0xfd,
        }
    }

    /// 0以外の整数ならON。数字で始まらないトークンは0扱いなのでOFFになる
    pub fn from_token(token: &str) -> Self {
        if leading_integer(token) != 0 {
            RelayState::On
        } else {
            RelayState::Off
        }
    }
}

impl fmt::Display for RelayState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RelayState::On => "on",
            RelayState::Off => "off",
        })
    }
}

/// `SERIAL_RELAY=STATE` 形式の1コマンド
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelayCommand {
    /// 切り詰め後の元引数（診断表示用）
    pub origin: String,
    pub serial: String,
    pub relay_num: u8,
    pub state: RelayState,
    /// いずれかのボードに一致して書き込みを試みたら立つ
    pub executed: bool,
}

impl RelayCommand {
    pub fn parse(arg: &str) -> Result<Self, ParseError> {
        let origin = truncate_arg(arg);
        let malformed = |reason| ParseError::MalformedArgument {
            arg: origin.to_string(),
            reason,
        };

        let mut fields = origin.split(DELIMITERS);
        let serial = fields
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| malformed("missing serial"))?;
        let relay = fields
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| malformed("missing relay number"))?;
        let state = fields
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| malformed("missing state"))?;
        if fields.next().is_some() {
            return Err(malformed("too many fields"));
        }

        let value = leading_integer(relay);
        let relay_num = u8::try_from(value).map_err(|_| ParseError::RelayOutOfRange { value })?;

        Ok(Self {
            origin: origin.to_string(),
            serial: serial.to_string(),
            relay_num,
            state: RelayState::from_token(state),
            executed: false,
        })
    }

    pub fn is_truncated(&self, arg: &str) -> bool {
        self.origin.len() < arg.len()
    }
}

/// `parse` の逆変換。stateは 1/0 で表す
impl fmt::Display for RelayCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            RelayState::On => 1,
            RelayState::Off => 0,
        };
        write!(f, "{}_{}={}", self.serial, self.relay_num, state)
    }
}

/// 引数を順に解釈する。1つでも失敗すれば全体を失敗とし、部分的なコマンド列は返さない
pub fn parse_commands<S: AsRef<str>>(args: &[S]) -> Result<Vec<RelayCommand>, ParseError> {
    args.iter().map(|arg| RelayCommand::parse(arg.as_ref())).collect()
}

/// UTF-8の境界を保ったまま ARG_MAX_LEN バイト以内に切り詰める
fn truncate_arg(arg: &str) -> &str {
    let end = arg
        .char_indices()
        .map(|(i, c)| i + c.len_utf8())
        .take_while(|end| *end <= ARG_MAX_LEN)
        .last()
        .unwrap_or(0);
    arg.get(..end).unwrap_or(arg)
}
