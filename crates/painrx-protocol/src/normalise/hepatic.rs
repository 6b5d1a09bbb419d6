//! Child-Pugh normalisation.

use painrx_common::HepaticClass;

use crate::rule_text::MatchKey;

/// Child-Pugh points (5–15) to class: 5–6 A, 7–9 B, 10–15 C.
pub fn class_for_child_pugh_points(points: u8) -> Option<HepaticClass> {
    match points {
        5..=6 => Some(HepaticClass::A),
        7..=9 => Some(HepaticClass::B),
        10..=15 => Some(HepaticClass::C),
        _ => None,
    }
}

/// Hepatic clauses are categorical; numeric keys are read as Child-Pugh points.
pub fn hepatic_matches(class: HepaticClass, key: &MatchKey) -> bool {
    match key {
        MatchKey::Class(letter) => HepaticClass::from_letter(*letter) == Some(class),
        MatchKey::Compare { op, threshold } => {
            let points = match class {
                HepaticClass::A => 5.5,
                HepaticClass::B => 8.0,
                HepaticClass::C => 12.5,
            };
            op.holds(points, *threshold)
        }
    }
}
