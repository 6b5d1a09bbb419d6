//! GFR band normalisation.
//!
//! | Class | GFR (mL/min) | Representative |
//! |-------|--------------|----------------|
//! | A     | ≥ 90         | 105            |
//! | B     | 60 – 89      | 74.5           |
//! | C     | 45 – 59      | 52             |
//! | D     | 30 – 44      | 37             |
//! | E     | 15 – 29      | 22             |
//! | F     | < 15         | 7.5            |
//!
//! Values between two integer bands (59.5) fall into the lower, more
//! severe band.

use painrx_common::{RenalClass, RenalValue};

use crate::rule_text::MatchKey;

/// Lower bound (inclusive) of each class, most severe last.
const BANDS: [(RenalClass, f64); 6] = [
    (RenalClass::A, 90.0),
    (RenalClass::B, 60.0),
    (RenalClass::C, 45.0),
    (RenalClass::D, 30.0),
    (RenalClass::E, 15.0),
    (RenalClass::F, f64::NEG_INFINITY),
];

/// Class whose band contains `gfr`.
pub fn class_for_gfr(gfr: f64) -> RenalClass {
    BANDS
        .iter()
        .find(|(_, lower)| gfr >= *lower)
        .map(|(class, _)| *class)
        .unwrap_or(RenalClass::F)
}

/// Midpoint used when a lettered result meets a numeric threshold.
pub fn representative_gfr(class: RenalClass) -> f64 {
    match class {
        RenalClass::A => 105.0,
        RenalClass::B => 74.5,
        RenalClass::C => 52.0,
        RenalClass::D => 37.0,
        RenalClass::E => 22.0,
        RenalClass::F => 7.5,
    }
}

pub fn renal_as_class(value: RenalValue) -> RenalClass {
    match value {
        RenalValue::Class(class) => class,
        RenalValue::Numeric(gfr) => class_for_gfr(gfr),
    }
}

pub fn renal_as_number(value: RenalValue) -> f64 {
    match value {
        RenalValue::Numeric(gfr) => gfr,
        RenalValue::Class(class) => representative_gfr(class),
    }
}

/// Whether a renal result satisfies a clause key, converting whichever
/// side needs it.
pub fn renal_matches(value: RenalValue, key: &MatchKey) -> bool {
    match key {
        MatchKey::Class(letter) => RenalClass::from_letter(*letter)
            .map(|wanted| renal_as_class(value) == wanted)
            .unwrap_or(false),
        MatchKey::Compare { op, threshold } => op.holds(renal_as_number(value), *threshold),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule_text::Comparison;

    #[test]
    fn test_band_edges() {
        assert_eq!(class_for_gfr(120.0), RenalClass::A);
        assert_eq!(class_for_gfr(90.0), RenalClass::A);
        assert_eq!(class_for_gfr(89.5), RenalClass::B);
        assert_eq!(class_for_gfr(60.0), RenalClass::B);
        assert_eq!(class_for_gfr(59.0), RenalClass::C);
        assert_eq!(class_for_gfr(59.9), RenalClass::C);
        assert_eq!(class_for_gfr(45.0), RenalClass::C);
        assert_eq!(class_for_gfr(30.0), RenalClass::D);
        assert_eq!(class_for_gfr(15.0), RenalClass::E);
        assert_eq!(class_for_gfr(14.9), RenalClass::F);
        assert_eq!(class_for_gfr(0.0), RenalClass::F);
    }

    #[test]
    fn test_representatives_stay_in_band() {
        for class in RenalClass::ALL {
            assert_eq!(class_for_gfr(representative_gfr(class)), class);
        }
        let c = representative_gfr(RenalClass::C);
        assert!((45.0..=59.0).contains(&c));
    }

    #[test]
    fn test_cross_matching() {
        let lt30 = MatchKey::Compare { op: Comparison::Lt, threshold: 30.0 };
        assert!(renal_matches(RenalValue::Class(RenalClass::E), &lt30));
        assert!(!renal_matches(RenalValue::Class(RenalClass::C), &lt30));
        assert!(renal_matches(RenalValue::Numeric(52.0), &MatchKey::Class('C')));
        assert!(!renal_matches(RenalValue::Numeric(61.0), &MatchKey::Class('C')));
        assert!(!renal_matches(RenalValue::Numeric(61.0), &MatchKey::Class('Z')));
    }
}
