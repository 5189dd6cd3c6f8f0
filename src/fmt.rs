/// Digits of `|val|` with thousands separators: 1234567.891 -> "1,234,567.89".
fn grouped(val: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, val.abs());
    let (int_part, frac) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };
    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if let Some(f) = frac {
        out.push('.');
        out.push_str(f);
    }
    out
}

/// Currency with two decimals: $1,234.56
pub fn money(val: f64) -> String {
    let sign = if val < 0.0 { "-" } else { "" };
    format!("{sign}${}", grouped(val, 2))
}

/// Two-decimal ratio such as ROMS: 1,250.00
pub fn ratio(val: f64) -> String {
    let sign = if val < 0.0 { "-" } else { "" };
    format!("{sign}{}", grouped(val, 2))
}
