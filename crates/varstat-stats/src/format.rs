/// Most decimal places an `f64` can meaningfully carry.
pub const MAX_PRECISION: usize = 15;

/// Rounds half away from zero to `precision` decimal places.
///
/// `precision` is capped at [`MAX_PRECISION`]; values too large to scale are
/// returned unchanged.
pub fn round_to(value: f64, precision: usize) -> f64 {
    let factor = 10f64.powi(precision.min(MAX_PRECISION) as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

/// Inserts `,` between digit groups of the integer part of a formatted number.
pub fn number_with_delimiter(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (integer, fraction) = match unsigned.find('.') {
        Some(idx) => unsigned.split_at(idx),
        None => (unsigned, ""),
    };
    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (idx, digit) in integer.chars().enumerate() {
        if idx > 0 && (integer.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    format!("{sign}{grouped}{fraction}")
}

/// Formats a count: `-` for zero, digit-grouped otherwise.
pub fn format_count(count: usize) -> String {
    if count == 0 {
        "-".to_string()
    } else {
        number_with_delimiter(&count.to_string())
    }
}

/// Formats a decimal for a table cell.
///
/// Absent values render as `-`. One decimal place is used, or enough places
/// to show the leading significant digit when `0 < |x| < 1`. `template`
/// replaces `{}` with the formatted number.
pub fn format_decimal(value: Option<f64>, template: Option<&str>) -> String {
    let value = match value {
        Some(value) if value.is_finite() => value,
        _ => return "-".to_string(),
    };
    let precision = if value != 0.0 && value.abs() < 1.0 {
        ((-value.abs().log10().floor()) as usize).min(MAX_PRECISION)
    } else {
        1
    };
    let rounded = round_to(value, precision) + 0.0;
    let number = number_with_delimiter(&format!("{:.*}", precision, rounded));
    match template {
        Some(template) => template.replace("{}", &number),
        None => number,
    }
}
