//! Clinical value normalisation.
//!
//! Protocol cells and lab results do not always use the same representation.
//! Two normalisers are provided:
//! - `renal`: GFR in mL/min ↔ class A–F, in both directions
//! - `hepatic`: Child-Pugh points → class A–C

pub mod hepatic;
pub mod renal;

pub use hepatic::{class_for_child_pugh_points, hepatic_matches};
pub use renal::{class_for_gfr, renal_as_class, renal_as_number, renal_matches, representative_gfr};
