//! Config files give the rotation limit as "256M" or "1G"; the engine works in bytes.

const KIB: u64 = 1024;

/// Parses a byte count with an optional `K`/`M`/`G` unit (an extra `B` and any case are accepted).
///
/// # Errors
/// `InvalidSize` for anything that is not a whole number with a known unit, or that overflows.
pub fn parse_size(s: &str) -> Result<u64, crate::Error> {
    let invalid = || crate::Error::InvalidSize(s.to_string());
    let upper = s.trim().to_uppercase();
    let digits = upper.strip_suffix('B').unwrap_or(&upper);
    let (num, multiplier) = match digits.chars().last() {
        Some('K') => (&digits[..digits.len() - 1], KIB),
        Some('M') => (&digits[..digits.len() - 1], KIB * KIB),
        Some('G') => (&digits[..digits.len() - 1], KIB * KIB * KIB),
        _ => (digits, 1),
    };
    num.trim()
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(multiplier))
        .ok_or_else(invalid)
}

/// Human-readable byte count for diagnostics.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    #[allow(clippy::cast_precision_loss)]
    let value = bytes as f64;

    if bytes >= KIB * KIB * KIB {
        format!("{:.2} GB", value / (KIB * KIB * KIB) as f64)
    } else if bytes >= KIB * KIB {
        format!("{:.2} MB", value / (KIB * KIB) as f64)
    } else if bytes >= KIB {
        format!("{:.2} KB", value / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}
