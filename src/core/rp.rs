//! Impact count to penetration resistance for the Stolf impact penetrometer.
//!
//! `RP (MPa) = (5.6 + 6.89 * I) / 10.2`, where `I` is the number of impacts needed to
//! drive the rod through a layer.

pub const RP_INTERCEPT: f64 = 5.6;
pub const RP_SLOPE: f64 = 6.89;
pub const RP_DIVISOR: f64 = 10.2;

/// Penetration resistance in MPa for an impact count.
pub fn rp(impacts: u32) -> f64 {
    (RP_INTERCEPT + RP_SLOPE * f64::from(impacts)) / RP_DIVISOR
}

/// Impact counts are whole, non-negative numbers. Anything else is absent.
pub fn parse_impacts(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok()
}

/// RP for a raw entry, `None` when the entry is not a valid impact count.
pub fn rp_from_input(raw: &str) -> Option<f64> {
    parse_impacts(raw).map(rp)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rp_known_values() {
        assert!((rp(0) - 0.549_019_6).abs() < 1e-6);
        assert!((rp(10) - 7.303_921_6).abs() < 1e-6);
        assert!((rp(1) - 1.224_509_8).abs() < 1e-6);
    }

    #[test]
    fn test_rp_from_input() {
        assert_eq!(rp_from_input(" 10 "), Some(rp(10)));
        assert_eq!(rp_from_input("0"), Some(rp(0)));
        assert_eq!(rp_from_input("abc"), None);
        assert_eq!(rp_from_input("-3"), None);
        assert_eq!(rp_from_input("2.5"), None);
        assert_eq!(rp_from_input(""), None);
    }
}
