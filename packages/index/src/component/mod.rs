//! Per-domain component scoring.
//!
//! Each scorer turns one district's domain record into the component block
//! that appears in the fused output: a risk, a 0–100 score derived from it,
//! and a band. Score and band are always computed from the same risk.

pub mod air;
pub mod greenspace;
pub mod noise;

pub use air::score_air;
pub use greenspace::{CapacityRanks, score_greenspace};
pub use noise::score_noise;

use crate::risk::round_to;

/// Decimal places kept on reported component risks.
const RISK_DECIMALS: i32 = 4;

/// Rounds a risk for reporting.
fn report_risk(risk: Option<f64>) -> Option<f64> {
    risk.map(|r| round_to(r, RISK_DECIMALS))
}
