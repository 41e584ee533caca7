//! Stage functions for the decision pipeline.
//!
//! Three pure functions back the triage, planning, and safety stages:
//! collision probability, maneuver optimization, and safety validation.
//! The formulas are calibration heuristics for exercising the pipeline,
//! not real orbital mechanics.

use serde::{Deserialize, Serialize};

/// Decay rate applied to miss distance in the Pc heuristic
pub const PC_DISTANCE_DECAY: f64 = 10.0;

/// Scale applied to the covariance eigenvalue in the Pc heuristic
pub const PC_COVARIANCE_SCALE: f64 = 0.001;

/// Pc above this threshold is classified as high risk
pub const HIGH_RISK_PC: f64 = 1e-4;

/// Target post-maneuver separation in km
pub const TARGET_MISS_KM: f64 = 5.0;

/// Delta-v required per km of correction (linear proxy for an
/// iterative delta-v search)
pub const DELTA_V_PER_KM: f64 = 0.00005;

/// Maximum delta-v the fuel budget allows, in km/s
pub const FUEL_LIMIT_KMS: f64 = 0.005;

/// Minimum acceptable post-maneuver perigee in km
pub const ORBIT_MIN_PERIGEE_KM: f64 = 400.0;

/// Post-maneuver perigee reported by the planner. Known approximation
/// boundary: true perigee evolution as a function of delta-v is not
/// propagated.
pub const PLACEHOLDER_PERIGEE_KM: f64 = 450.0;

/// Risk classification of a conjunction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    High,
    Low,
}

impl RiskLevel {
    /// Classify a collision probability
    pub fn from_pc(pc: f64) -> Self {
        if pc > HIGH_RISK_PC {
            Self::High
        } else {
            Self::Low
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "HIGH"),
            Self::Low => write!(f, "LOW"),
        }
    }
}

/// Result of the triage stage
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Probability of collision, always in [0, 1]
    pub pc: f64,

    /// Classification derived from `pc`
    pub risk_level: RiskLevel,
}

/// Result of the planning stage
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ManeuverPlan {
    /// Velocity change required for the maneuver, km/s
    pub delta_v_kms: f64,

    /// Delta-v as a percentage of the fuel budget
    pub fuel_cost_percent: f64,

    /// Estimated post-maneuver perigee, km
    pub new_perigee_km: f64,
}

/// Result of the safety stage
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SafetyVerdict {
    /// Delta-v is strictly within the fuel budget
    pub fuel_safe: bool,

    /// Perigee stays strictly above the orbital floor
    pub orbit_safe: bool,

    /// Both constraints hold
    pub approved_for_execution: bool,
}

/// Compute the collision probability for a conjunction.
///
/// `pc = min(1.0, exp(-miss * 10) * covariance * 0.001)` — a heuristic
/// calibrated against historical data patterns, not a real Pc computation.
///
/// Precondition: `miss_distance_km >= 0`. Negative values are accepted but
/// the exponential grows unbounded; callers validate non-negativity
/// upstream.
pub fn assess(miss_distance_km: f64, covariance_eigenvalue: f64) -> RiskAssessment {
    let risk_factor = (-miss_distance_km * PC_DISTANCE_DECAY).exp();
    let pc = (risk_factor * covariance_eigenvalue * PC_COVARIANCE_SCALE).min(1.0);

    RiskAssessment {
        pc,
        risk_level: RiskLevel::from_pc(pc),
    }
}

/// Compute the minimum delta-v needed to reach the target separation.
///
/// The closed-form correction stands in for an iterative optimization
/// loop; a real solver would add a convergence tolerance and an
/// iteration cap.
pub fn optimize(miss_distance_km: f64) -> ManeuverPlan {
    let required_correction = (TARGET_MISS_KM - miss_distance_km).max(0.0);
    let delta_v_kms = required_correction * DELTA_V_PER_KM;

    ManeuverPlan {
        delta_v_kms,
        fuel_cost_percent: (delta_v_kms / FUEL_LIMIT_KMS) * 100.0,
        new_perigee_km: PLACEHOLDER_PERIGEE_KM,
    }
}

/// Validate a maneuver plan against the fuel and orbital constraints.
///
/// Both comparisons are strict: a delta-v exactly at the fuel limit or a
/// perigee exactly at the floor is rejected.
pub fn validate(delta_v_kms: f64, perigee_km: f64) -> SafetyVerdict {
    let fuel_safe = delta_v_kms < FUEL_LIMIT_KMS;
    let orbit_safe = perigee_km > ORBIT_MIN_PERIGEE_KM;

    SafetyVerdict {
        fuel_safe,
        orbit_safe,
        approved_for_execution: fuel_safe && orbit_safe,
    }
}
