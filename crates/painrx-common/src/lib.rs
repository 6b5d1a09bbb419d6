//! painrx-common — Shared types, errors, and configuration used across all painrx crates.

pub mod error;
pub mod clinical;
pub mod patient;
pub mod protocol;
pub mod engine_config;

// Re-export commonly used types
pub use clinical::{HepaticClass, RenalClass, RenalValue};
pub use engine_config::{EngineConfig, PainTrendConfig, WeightConfig};
pub use error::{PainRxError, Result};
pub use patient::{LabPanel, PainHistory, PatientSnapshot};
pub use protocol::{DrugSpec, ProtocolRow};
