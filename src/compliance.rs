//! Policy compliance - per-requirement pass/fail breakdown.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::evaluator::{CharClass, StrengthMetrics, character_classes};
use crate::policy::PolicyDefinition;

/// Requirements a policy framework can impose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    MinLength,
    RequireLower,
    RequireUpper,
    RequireDigits,
    RequireSymbols,
    MinEntropy,
}

impl Requirement {
    /// Short name used in rendered checklists.
    pub fn label(self) -> &'static str {
        match self {
            Requirement::MinLength => "min_length",
            Requirement::RequireLower => "lower",
            Requirement::RequireUpper => "upper",
            Requirement::RequireDigits => "digit",
            Requirement::RequireSymbols => "symbol",
            Requirement::MinEntropy => "entropy",
        }
    }
}

/// The value a policy demands for one requirement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Threshold {
    Flag(bool),
    Chars(usize),
    Bits(f64),
}

/// Outcome of a single requirement check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RequirementCheck {
    pub requirement: Requirement,
    pub required: Threshold,
    pub met: bool,
}

/// Per-requirement breakdown of a password against one policy.
///
/// Every requirement the policy defines is listed, including ones that
/// are trivially satisfied because the policy does not demand them, so
/// callers can render a complete checklist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceResult {
    pub policy_name: String,
    pub checks: Vec<RequirementCheck>,
    pub overall_pass: bool,
}

impl ComplianceResult {
    /// Labels of the requirements that were not met.
    pub fn failed(&self) -> Vec<&'static str> {
        self.checks
            .iter()
            .filter(|check| !check.met)
            .map(|check| check.requirement.label())
            .collect()
    }
}

/// Checks `password` against `policy`.
///
/// A character-class requirement is met when the policy does not demand
/// it or the class is present. Length and entropy requirements compare
/// against the measured metrics. The empty password fails every
/// positive-valued requirement without error.
pub fn check_compliance(
    password: &SecretString,
    metrics: &StrengthMetrics,
    policy: &PolicyDefinition,
) -> ComplianceResult {
    let classes = character_classes(password.expose_secret());
    let class_met = |required: bool, class: CharClass| !required || classes.contains(&class);

    let checks = vec![
        RequirementCheck {
            requirement: Requirement::MinLength,
            required: Threshold::Chars(policy.min_length),
            met: metrics.length >= policy.min_length,
        },
        RequirementCheck {
            requirement: Requirement::RequireLower,
            required: Threshold::Flag(policy.require_lower),
            met: class_met(policy.require_lower, CharClass::Lower),
        },
        RequirementCheck {
            requirement: Requirement::RequireUpper,
            required: Threshold::Flag(policy.require_upper),
            met: class_met(policy.require_upper, CharClass::Upper),
        },
        RequirementCheck {
            requirement: Requirement::RequireDigits,
            required: Threshold::Flag(policy.require_digits),
            met: class_met(policy.require_digits, CharClass::Digit),
        },
        RequirementCheck {
            requirement: Requirement::RequireSymbols,
            required: Threshold::Flag(policy.require_symbols),
            met: class_met(policy.require_symbols, CharClass::Symbol),
        },
        RequirementCheck {
            requirement: Requirement::MinEntropy,
            required: Threshold::Bits(policy.min_entropy),
            met: metrics.entropy_bits >= policy.min_entropy,
        },
    ];
    let overall_pass = checks.iter().all(|check| check.met);

    ComplianceResult {
        policy_name: policy.name.clone(),
        checks,
        overall_pass,
    }
}
