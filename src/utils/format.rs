//! Display formatting for amounts and dates (en-IN conventions).

use chrono::NaiveDate;

/// Formats an amount as rupees with Indian digit grouping and two decimals,
/// e.g. `₹1,23,456.78`.
pub fn format_currency(amount: f64) -> String {
    let negative = amount < 0.0;
    let total_paise = (amount.abs() * 100.0).round() as u64;
    let rupees = group_indian(total_paise / 100);
    let paise = total_paise % 100;
    if negative {
        format!("-₹{rupees}.{paise:02}")
    } else {
        format!("₹{rupees}.{paise:02}")
    }
}

/// Indian grouping: the last three digits form one group, the rest pair up,
/// e.g. `1234567` becomes `12,34,567`.
fn group_indian(value: u64) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Short display form, e.g. `15 Jan 2024`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%-d %b %Y").to_string()
}

/// Relative label for listings: Today, Yesterday, "N days ago" within a
/// week, the plain date beyond that (and for future dates).
pub fn relative_date(date: NaiveDate, today: NaiveDate) -> String {
    let days = (today - date).num_days();
    match days {
        0 => "Today".to_string(),
        1 => "Yesterday".to_string(),
        2..=6 => format!("{days} days ago"),
        _ => format_date(date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn currency_uses_indian_grouping() {
        assert_eq!(format_currency(0.0), "₹0.00");
        assert_eq!(format_currency(999.5), "₹999.50");
        assert_eq!(format_currency(1000.0), "₹1,000.00");
        assert_eq!(format_currency(123456.78), "₹1,23,456.78");
        assert_eq!(format_currency(12345678.0), "₹1,23,45,678.00");
        assert_eq!(format_currency(-200.0), "-₹200.00");
    }

    #[test]
    fn dates_render_short_form() {
        assert_eq!(format_date(date(2024, 1, 15)), "15 Jan 2024");
        assert_eq!(format_date(date(2024, 11, 3)), "3 Nov 2024");
    }

    #[test]
    fn relative_labels() {
        let today = date(2024, 6, 15);
        assert_eq!(relative_date(today, today), "Today");
        assert_eq!(relative_date(date(2024, 6, 14), today), "Yesterday");
        assert_eq!(relative_date(date(2024, 6, 10), today), "5 days ago");
        assert_eq!(relative_date(date(2024, 6, 1), today), "1 Jun 2024");
        assert_eq!(relative_date(date(2024, 7, 1), today), "1 Jul 2024");
    }
}
