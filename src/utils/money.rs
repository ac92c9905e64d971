//! Currency utility functions for handling GBP conversions.
//!
//! All monetary values in the database are stored in pence (1 pound = 100
//! pence) to avoid floating-point precision issues. This module is the only
//! place that converts between the two representations, so the checkout
//! path and the payout path can never round differently.

/// Convert pounds to pence (multiply by 100, round half away from zero)
pub fn pounds_to_pence(pounds: f64) -> i64 {
    (pounds * 100.0).round() as i64
}

/// Convert pence to pounds (divide by 100)
pub fn pence_to_pounds(pence: i64) -> f64 {
    pence as f64 / 100.0
}

/// Format pence as a pound string with 2 decimal places
pub fn format_pence_as_pounds(pence: i64) -> String {
    format!("£{:.2}", pence_to_pounds(pence))
}

/// Validate and parse a user-supplied amount string to pounds.
///
/// Accepts an optional leading pound sign; rejects non-numeric, non-finite
/// and non-positive input. The result is normalized to 2 decimal places.
pub fn parse_money(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().trim_start_matches('£').trim();
    let num = cleaned.parse::<f64>().ok()?;
    if !num.is_finite() || num <= 0.0 {
        return None;
    }
    Some((num * 100.0).round() / 100.0)
}

/// Split an amount into (platform_fee_pence, driver_payout_pence) at the
/// given fee percentage. Integer arithmetic end to end; the fee is rounded
/// to the nearest penny and the payout is the exact remainder, so the two
/// always add back up to the original amount.
pub fn fee_split(amount_pence: i64, fee_percent: i64) -> (i64, i64) {
    let fee = (amount_pence * fee_percent + 50) / 100;
    (fee, amount_pence - fee)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pounds_to_pence() {
        assert_eq!(pounds_to_pence(100.0), 10000);
        assert_eq!(pounds_to_pence(0.50), 50);
        assert_eq!(pounds_to_pence(123.45), 12345);
        assert_eq!(pounds_to_pence(45.0), 4500);
    }

    #[test]
    fn test_pence_to_pounds() {
        assert_eq!(pence_to_pounds(10000), 100.0);
        assert_eq!(pence_to_pounds(50), 0.50);
        assert_eq!(pence_to_pounds(12345), 123.45);
    }

    #[test]
    fn test_format_pence_as_pounds() {
        assert_eq!(format_pence_as_pounds(10000), "£100.00");
        assert_eq!(format_pence_as_pounds(50), "£0.50");
        assert_eq!(format_pence_as_pounds(12345), "£123.45");
    }

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("100.00"), Some(100.0));
        assert_eq!(parse_money("£45"), Some(45.0));
        assert_eq!(parse_money(" £ 12.50 "), Some(12.50));
        assert_eq!(parse_money("12.505"), Some(12.51));
        assert_eq!(parse_money("0"), None);
        assert_eq!(parse_money("-100"), None);
        assert_eq!(parse_money("abc"), None);
        assert_eq!(parse_money("NaN"), None);
        assert_eq!(parse_money("inf"), None);
        assert_eq!(parse_money(""), None);
    }

    #[test]
    fn test_fee_split_at_twenty_percent() {
        // £100.00 -> £20.00 fee, £80.00 payout
        assert_eq!(fee_split(10000, 20), (2000, 8000));
        // £45.00 -> £9.00 fee, £36.00 payout
        assert_eq!(fee_split(4500, 20), (900, 3600));
    }

    #[test]
    fn test_fee_split_rounds_to_nearest_penny() {
        // £0.33 at 20% -> 6.6p fee, rounds to 7p
        assert_eq!(fee_split(33, 20), (7, 26));
        // £0.01 at 20% -> 0.2p fee, rounds to 0p
        assert_eq!(fee_split(1, 20), (0, 1));
    }

    #[test]
    fn test_fee_split_always_adds_back_up() {
        for amount in [1, 33, 99, 4500, 10000, 123_456_789] {
            for percent in [0, 1, 15, 20, 50, 100] {
                let (fee, payout) = fee_split(amount, percent);
                assert_eq!(fee + payout, amount);
                assert!(fee >= 0);
                assert!(payout >= 0);
            }
        }
    }

    #[test]
    fn test_conversion_round_trip_has_no_drift() {
        // The same conversion is used when charging the customer and when
        // paying the driver, so £100.00 in is 10000 minor units at checkout
        // and 8000 minor units at payout time.
        let amount = parse_money("£100.00").unwrap();
        let pence = pounds_to_pence(amount);
        assert_eq!(pence, 10000);
        let (_, payout) = fee_split(pence, 20);
        assert_eq!(payout, 8000);
    }
}
