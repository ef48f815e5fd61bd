//! Number formatting for table cells

/// Groups the digits of `value` in threes with `,`
///
/// ```
/// # use frontend::shared::components::table::format_count;
/// assert_eq!(format_count(1200000), "1,200,000");
/// ```
pub fn format_count(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Cell text for an optional count; missing values show a dash
pub fn format_optional_count(value: Option<i64>) -> String {
    value.map(format_count).unwrap_or_else(|| "-".to_string())
}

/// Budget in Swiss francs, e.g. `CHF 250,000`
pub fn format_budget(value: Option<i64>) -> String {
    match value {
        Some(v) => format!("CHF {}", format_count(v)),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
        assert_eq!(format_count(-45000), "-45,000");
    }

    #[test]
    fn test_optional_values() {
        assert_eq!(format_optional_count(None), "-");
        assert_eq!(format_optional_count(Some(12000)), "12,000");
        assert_eq!(format_budget(Some(250000)), "CHF 250,000");
        assert_eq!(format_budget(None), "-");
    }
}
