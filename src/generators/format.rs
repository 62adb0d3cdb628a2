//! Display formatting shared by the generators

/// `$2.4M`
pub fn millions(value: f64) -> String {
    format!("${:.1}M", value / 1_000_000.0)
}

/// `$540K`
pub fn thousands(value: f64) -> String {
    format!("${:.0}K", value / 1_000.0)
}

/// `12.3%`
pub fn percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// `+3.2%` / `-1.0%`; zero carries no sign
pub fn signed_percent(value: f64) -> String {
    if value > 0.0 {
        format!("+{:.1}%", value)
    } else {
        format!("{:.1}%", value)
    }
}

/// Round to one decimal place
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formats() {
        assert_eq!(millions(2_412_345.0), "$2.4M");
        assert_eq!(thousands(539_600.0), "$540K");
        assert_eq!(thousands(-12_400.0), "$-12K");
    }

    #[test]
    fn test_percent_formats() {
        assert_eq!(percent(12.345), "12.3%");
        assert_eq!(signed_percent(3.21), "+3.2%");
        assert_eq!(signed_percent(-1.0), "-1.0%");
        assert_eq!(signed_percent(0.0), "0.0%");
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(12.34), 12.3);
        assert_eq!(round1(-7.06), -7.1);
    }
}
