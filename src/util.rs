/// C の `atol` と同じく先頭の整数部分だけを読む。
///
/// 先頭の空白と符号を受け付け、数字が続かなければ 0 を返す。
/// 桁あふれは i64 の範囲で飽和させる。
pub fn leading_integer(input: &str) -> i64 {
    let trimmed = input.trim_start();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let magnitude = digits
        .chars()
        .map_while(|c| c.to_digit(10))
        .fold(0i64, |acc, d| {
            acc.saturating_mul(10).saturating_add(i64::from(d))
        });

    if negative {
        magnitude.saturating_neg()
    } else {
        magnitude
    }
}

pub fn format_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
