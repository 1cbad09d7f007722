//! Verdict assembly - rating tiers and the combined evaluation report.

use serde::Serialize;

use crate::breach::BreachStatus;
use crate::compliance::ComplianceResult;
use crate::evaluator::StrengthMetrics;

/// Entropy thresholds (bits) for the tiers above the weakest. Lower
/// bounds are inclusive: a value exactly on a boundary earns the higher
/// tier.
pub const WEAK_BITS: f64 = 28.0;
pub const FAIR_BITS: f64 = 40.0;
pub const STRONG_BITS: f64 = 60.0;
pub const VERY_STRONG_BITS: f64 = 90.0;

/// Passwords shorter than this never rate above [`RatingTier::Weak`],
/// whatever the entropy estimate says.
pub const SHORT_PASSWORD_LIMIT: usize = 8;

/// Coarse strength label derived from the entropy estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RatingTier {
    VeryWeak,
    Weak,
    Fair,
    Strong,
    VeryStrong,
}

impl RatingTier {
    /// Derives the tier from measured metrics.
    pub fn from_metrics(metrics: &StrengthMetrics) -> Self {
        let by_entropy = if metrics.entropy_bits >= VERY_STRONG_BITS {
            RatingTier::VeryStrong
        } else if metrics.entropy_bits >= STRONG_BITS {
            RatingTier::Strong
        } else if metrics.entropy_bits >= FAIR_BITS {
            RatingTier::Fair
        } else if metrics.entropy_bits >= WEAK_BITS {
            RatingTier::Weak
        } else {
            RatingTier::VeryWeak
        };

        if metrics.length < SHORT_PASSWORD_LIMIT {
            by_entropy.min(RatingTier::Weak)
        } else {
            by_entropy
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RatingTier::VeryWeak => "Very Weak",
            RatingTier::Weak => "Weak",
            RatingTier::Fair => "Fair",
            RatingTier::Strong => "Strong",
            RatingTier::VeryStrong => "Very Strong",
        }
    }
}

/// Combined evaluation report for one password.
///
/// Breach status is independent of the rating and the compliance result.
/// A breached password can still carry a high entropy rating; callers
/// are expected to surface both facts rather than let one suppress the
/// other.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    pub metrics: StrengthMetrics,
    pub rating: RatingTier,
    pub compliance: ComplianceResult,
    pub breach: BreachStatus,
}

/// Merges the three measurements into the final report.
pub fn assemble_verdict(
    metrics: StrengthMetrics,
    compliance: ComplianceResult,
    breach: BreachStatus,
) -> Verdict {
    Verdict {
        rating: RatingTier::from_metrics(&metrics),
        metrics,
        compliance,
        breach,
    }
}
