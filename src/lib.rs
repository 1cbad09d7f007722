//! Password strength and policy compliance engine
//!
//! This library evaluates a candidate password against three independent
//! measures - length, character pool diversity, and estimated entropy -
//! checks it against a named policy framework, and looks it up in a
//! known-breach list. The result is a single structured [`Verdict`].
//!
//! The entropy estimate is a coarse `length * log2(pool_size)`
//! approximation, not a formal information-theoretic measure.
//!
//! # Features
//!
//! - `cli` (default): Command line shell around the engine
//! - `tracing`: Enables logging via tracing crate
//!
//! # Environment Variables
//!
//! - `PASSGAUGE_POLICY_PATH`: Custom path to the policy document
//!   (default: `./assets/frameworks.json`)
//! - `PASSGAUGE_BREACH_PATH`: Custom path to the breach list
//!   (default: `./assets/breach-top-250.json`)
//!
//! # Example
//!
//! ```rust
//! use passgauge::{BreachIndex, PolicyStore, evaluate_password};
//! use secrecy::SecretString;
//!
//! let policies = PolicyStore::load(r#"{
//!     "default": "Baseline",
//!     "frameworks": {
//!         "Baseline": { "min_length": 8, "require_digits": true, "min_entropy": 40 }
//!     }
//! }"#);
//! let breaches = BreachIndex::from_entries(["password1", "letmein"]);
//!
//! let password = SecretString::new("Tr0ub4dor&3".to_string().into());
//! let verdict = evaluate_password(&password, "Baseline", &policies, &breaches);
//!
//! assert!(verdict.compliance.overall_pass);
//! assert!(!verdict.breach.is_breached);
//! println!("Rating: {}", verdict.rating.label());
//! ```

// Internal modules
mod breach;
mod compliance;
mod evaluator;
mod policy;
mod verdict;

// Public API
pub use breach::{BreachIndex, BreachListError, BreachStatus, default_breach_path};
pub use compliance::{
    ComplianceResult, Requirement, RequirementCheck, Threshold, check_compliance,
};
pub use evaluator::{
    CharClass, MIN_POOL_SIZE, StrengthMetrics, character_classes, classify, evaluate_password,
    measure_strength,
};
pub use policy::{
    FALLBACK_POLICY_NAME, PolicyDefinition, PolicyError, PolicyStore, default_policy_path,
};
pub use verdict::{RatingTier, Verdict, assemble_verdict};
