//! Study sessions for Flashdeck
//!
//! This module provides:
//! - The study algorithm contract shared by all scheduling policies
//! - Rotational and mastery-weighted policies
//! - The study session that wires a policy to the codec and settings

pub mod algorithm;
pub mod mastery;
pub mod rotational;
pub mod session;

pub use algorithm::{AlgorithmKind, SnapshotError, StudyAlgorithm, StudyError};
pub use mastery::MasteryWeightedAlgorithm;
pub use rotational::RotationalAlgorithm;
pub use session::{SessionError, StudySession};
