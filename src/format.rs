//! Rupee and date formatting for tiles, tooltips and axis labels.

use chrono::NaiveDate;

use crate::series::round_half_up;

/// `₹` followed by Indian-style digit grouping (`1,87,200`).
pub fn format_inr(value: f64, decimals: usize) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}₹{}", group_indian(value.abs(), decimals))
}

/// Like [`format_inr`] but always carries a sign, e.g. `+₹7,200`.
pub fn format_signed_inr(value: f64, decimals: usize) -> String {
    if value < 0.0 {
        format_inr(value, decimals)
    } else {
        format!("+{}", format_inr(value, decimals))
    }
}

/// Groups the integer part as lakh/crore: last three digits, then pairs.
pub fn group_indian(value: f64, decimals: usize) -> String {
    let fixed = format!("{value:.decimals$}");
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (fixed.as_str(), None),
    };

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 2);
    let head_len = digits.len().saturating_sub(3);
    for (i, c) in digits[..head_len].iter().enumerate() {
        if i > 0 && (head_len - i) % 2 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }
    if head_len > 0 {
        grouped.push(',');
    }
    grouped.extend(&digits[head_len..]);

    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

/// Axis tick in thousands, e.g. `₹187k`. Halves round up.
pub fn axis_tick(value: f64) -> String {
    format!("₹{:.0}k", round_half_up(value / 1000.0))
}

/// `12 Apr`
pub fn day_month(date: NaiveDate) -> String {
    date.format("%-d %b").to_string()
}

/// `12 April 2024`
pub fn long_date(date: NaiveDate) -> String {
    date.format("%-d %B %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indian_grouping() {
        assert_eq!(group_indian(0.0, 0), "0");
        assert_eq!(group_indian(999.0, 0), "999");
        assert_eq!(group_indian(7_200.0, 0), "7,200");
        assert_eq!(group_indian(100_000.0, 0), "1,00,000");
        assert_eq!(group_indian(187_200.0, 0), "1,87,200");
        assert_eq!(group_indian(12_345_678.0, 0), "1,23,45,678");
        assert_eq!(group_indian(1_263.54, 2), "1,263.54");
    }

    #[test]
    fn rupee_amounts() {
        assert_eq!(format_inr(180_000.0, 0), "₹1,80,000");
        assert_eq!(format_inr(142.45, 2), "₹142.45");
        assert_eq!(format_inr(-7_200.0, 0), "-₹7,200");
        assert_eq!(format_signed_inr(7_200.0, 0), "+₹7,200");
        assert_eq!(format_signed_inr(-50.0, 0), "-₹50");
    }

    #[test]
    fn ticks_in_thousands() {
        assert_eq!(axis_tick(187_200.0), "₹187k");
        assert_eq!(axis_tick(90_000.0), "₹90k");
        assert_eq!(axis_tick(186_500.0), "₹187k");
        assert_eq!(axis_tick(185_500.0), "₹186k");
        assert_eq!(axis_tick(186_499.0), "₹186k");
    }

    #[test]
    fn dates() {
        let date = NaiveDate::from_ymd_opt(2024, 4, 12).unwrap();
        assert_eq!(day_month(date), "12 Apr");
        assert_eq!(long_date(date), "12 April 2024");
        assert_eq!(day_month(NaiveDate::from_ymd_opt(2025, 1, 3).unwrap()), "3 Jan");
    }
}
