//! Coarse Australian state/territory derived from a postcode.

use std::fmt;
use std::ops::RangeInclusive;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Nsw,
    Act,
    Vic,
    Qld,
    Sa,
    Wa,
    Tas,
    Nt,
    Australia,
}

impl Location {
    pub fn as_str(self) -> &'static str {
        match self {
            Location::Nsw => "NSW",
            Location::Act => "ACT",
            Location::Vic => "VIC",
            Location::Qld => "QLD",
            Location::Sa => "SA",
            Location::Wa => "WA",
            Location::Tas => "TAS",
            Location::Nt => "NT",
            Location::Australia => "Australia",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Scanned top to bottom; NSW and ACT interleave around Canberra.
const RANGES: &[(RangeInclusive<u16>, Location)] = &[
    (2000..=2599, Location::Nsw),
    (2619..=2898, Location::Nsw),
    (2921..=2999, Location::Nsw),
    (2600..=2618, Location::Act),
    (2899..=2920, Location::Act),
    (3000..=3999, Location::Vic),
    (8000..=8999, Location::Vic),
    (4000..=4999, Location::Qld),
    (9000..=9999, Location::Qld),
    (5000..=5999, Location::Sa),
    (6000..=6999, Location::Wa),
    (7000..=7999, Location::Tas),
    (800..=899, Location::Nt),
];

pub fn from_postcode_number(postcode: u16) -> Location {
    RANGES
        .iter()
        .find(|(range, _)| range.contains(&postcode))
        .map(|(_, location)| *location)
        .unwrap_or(Location::Australia)
}

/// Resolves a postcode as submitted ("0800", "2000"). Anything that is not a
/// number falls through to `Australia`.
pub fn from_postcode(postcode: &str) -> Location {
    postcode
        .trim()
        .parse::<u16>()
        .map(from_postcode_number)
        .unwrap_or(Location::Australia)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn canberra_interleaving() {
        assert_eq!(from_postcode("2600"), Location::Act);
        assert_eq!(from_postcode("2618"), Location::Act);
        assert_eq!(from_postcode("2619"), Location::Nsw);
        assert_eq!(from_postcode("2898"), Location::Nsw);
        assert_eq!(from_postcode("2899"), Location::Act);
        assert_eq!(from_postcode("2900"), Location::Act);
        assert_eq!(from_postcode("2920"), Location::Act);
        assert_eq!(from_postcode("2921"), Location::Nsw);
        assert_eq!(from_postcode("2950"), Location::Nsw);
    }

    #[test]
    fn state_boundaries() {
        let cases = [
            ("2000", "NSW"),
            ("2599", "NSW"),
            ("3000", "VIC"),
            ("3999", "VIC"),
            ("8000", "VIC"),
            ("4000", "QLD"),
            ("9999", "QLD"),
            ("5000", "SA"),
            ("6999", "WA"),
            ("7000", "TAS"),
            ("0800", "NT"),
            ("0899", "NT"),
        ];
        for (postcode, expected) in cases {
            assert_eq!(from_postcode(postcode).as_str(), expected, "postcode {postcode}");
        }
    }

    #[test]
    fn unmatched_postcodes_fall_back_to_australia() {
        assert_eq!(from_postcode("0200"), Location::Australia);
        assert_eq!(from_postcode("0900"), Location::Australia);
        assert_eq!(from_postcode("1999"), Location::Australia);
        assert_eq!(from_postcode("abcd"), Location::Australia);
    }

    proptest! {
        #[test]
        fn at_most_one_range_matches(postcode in 0u16..10_000) {
            let hits = RANGES.iter().filter(|(range, _)| range.contains(&postcode)).count();
            prop_assert!(hits <= 1);
        }

        #[test]
        fn zero_padded_text_agrees_with_number(postcode in 0u16..10_000) {
            let text = format!("{postcode:04}");
            prop_assert_eq!(from_postcode(&text), from_postcode_number(postcode));
        }
    }
}
