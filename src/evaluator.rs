//! Password strength evaluator - character pool model and entropy estimate.

use std::collections::BTreeSet;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::breach::BreachIndex;
use crate::compliance::check_compliance;
use crate::policy::PolicyStore;
use crate::verdict::{Verdict, assemble_verdict};

/// Smallest pool size fed into the entropy estimate.
///
/// Keeps `log2(pool)` finite and non-negative even when no character
/// class is present (the empty password).
pub const MIN_POOL_SIZE: u32 = 2;

/// Character classes recognized by the pool model.
///
/// Every character maps to exactly one class; a class contributes to the
/// pool once no matter how often it occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CharClass {
    Lower,
    Upper,
    Digit,
    Symbol,
    Whitespace,
    NonAscii,
}

impl CharClass {
    pub const ALL: [CharClass; 6] = [
        CharClass::Lower,
        CharClass::Upper,
        CharClass::Digit,
        CharClass::Symbol,
        CharClass::Whitespace,
        CharClass::NonAscii,
    ];

    /// Estimated alphabet size the class adds to the pool.
    ///
    /// Lower, upper and digit use their real alphabet sizes. The symbol
    /// bucket counts the 32 ASCII punctuation characters, whitespace the
    /// 6 common whitespace characters, and non-ASCII adds a flat 100 for
    /// the much larger underlying alphabet.
    pub const fn pool_contribution(self) -> u32 {
        match self {
            CharClass::Lower => 26,
            CharClass::Upper => 26,
            CharClass::Digit => 10,
            CharClass::Symbol => 32,
            CharClass::Whitespace => 6,
            CharClass::NonAscii => 100,
        }
    }
}

/// Maps a character to its class.
///
/// ASCII characters are dispatched by kind; any code point above 127 is
/// [`CharClass::NonAscii`], including accented letters.
pub fn classify(c: char) -> CharClass {
    if !c.is_ascii() {
        CharClass::NonAscii
    } else if c.is_ascii_lowercase() {
        CharClass::Lower
    } else if c.is_ascii_uppercase() {
        CharClass::Upper
    } else if c.is_ascii_digit() {
        CharClass::Digit
    } else if c.is_ascii_whitespace() {
        CharClass::Whitespace
    } else {
        CharClass::Symbol
    }
}

/// Returns the set of character classes present in `password`.
pub fn character_classes(password: &str) -> BTreeSet<CharClass> {
    password.chars().map(classify).collect()
}

/// Raw strength measurements for a single password.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StrengthMetrics {
    /// Number of characters (Unicode code points), whitespace included.
    pub length: usize,
    /// Estimated alphabet size implied by the classes present, never
    /// below [`MIN_POOL_SIZE`].
    pub pool_size: u32,
    /// `length * log2(pool_size)`; 0 for the empty password.
    pub entropy_bits: f64,
}

/// Measures length, character pool and estimated entropy.
pub fn measure_strength(password: &SecretString) -> StrengthMetrics {
    let pwd = password.expose_secret();
    let length = pwd.chars().count();
    let pool: u32 = character_classes(pwd)
        .iter()
        .map(|class| class.pool_contribution())
        .sum();
    let pool_size = pool.max(MIN_POOL_SIZE);
    let entropy_bits = length as f64 * f64::from(pool_size).log2();

    StrengthMetrics {
        length,
        pool_size,
        entropy_bits,
    }
}

/// Evaluates a password against a named policy and the breach index.
///
/// This is the single entry point the surrounding shell calls. The store
/// resolves `policy_name` (unknown or empty names fall back to the
/// store's default), metrics, compliance and breach status are computed
/// independently, and the assembled [`Verdict`] is returned. Every input
/// produces a verdict; nothing here fails.
pub fn evaluate_password(
    password: &SecretString,
    policy_name: &str,
    policies: &PolicyStore,
    breaches: &BreachIndex,
) -> Verdict {
    let policy = policies.resolve(policy_name);
    let metrics = measure_strength(password);
    let compliance = check_compliance(password, &metrics, policy);
    let breach = breaches.status(password.expose_secret());

    assemble_verdict(metrics, compliance, breach)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::RatingTier;

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.to_string().into())
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.05
    }

    #[test]
    fn test_classify_ascii_classes() {
        assert_eq!(classify('a'), CharClass::Lower);
        assert_eq!(classify('Z'), CharClass::Upper);
        assert_eq!(classify('7'), CharClass::Digit);
        assert_eq!(classify('!'), CharClass::Symbol);
        assert_eq!(classify('~'), CharClass::Symbol);
        assert_eq!(classify(' '), CharClass::Whitespace);
        assert_eq!(classify('\t'), CharClass::Whitespace);
    }

    #[test]
    fn test_classify_non_ascii() {
        assert_eq!(classify('é'), CharClass::NonAscii);
        assert_eq!(classify('日'), CharClass::NonAscii);
        assert_eq!(classify('€'), CharClass::NonAscii);
    }

    #[test]
    fn test_pool_contributions_are_stable() {
        let total: u32 = CharClass::ALL
            .iter()
            .map(|class| class.pool_contribution())
            .sum();
        assert_eq!(total, 26 + 26 + 10 + 32 + 6 + 100);
    }

    #[test]
    fn test_length_counts_code_points() {
        assert_eq!(measure_strength(&secret("abc def")).length, 7);
        assert_eq!(measure_strength(&secret("naïve")).length, 5);
        assert_eq!(measure_strength(&secret("日本語")).length, 3);
    }

    #[test]
    fn test_pool_size_sums_present_classes() {
        assert_eq!(measure_strength(&secret("abc")).pool_size, 26);
        assert_eq!(measure_strength(&secret("abc123")).pool_size, 36);
        assert_eq!(measure_strength(&secret("aB1")).pool_size, 62);
        assert_eq!(measure_strength(&secret("aB1!")).pool_size, 94);
        assert_eq!(measure_strength(&secret("a b")).pool_size, 32);
    }

    #[test]
    fn test_pool_size_floor() {
        assert_eq!(measure_strength(&secret("")).pool_size, MIN_POOL_SIZE);
        assert!(measure_strength(&secret("a")).pool_size >= MIN_POOL_SIZE);
    }

    #[test]
    fn test_entropy_of_lowercase_word() {
        let metrics = measure_strength(&secret("abc"));
        assert!(close(metrics.entropy_bits, 3.0 * 26f64.log2()));
        assert!(close(metrics.entropy_bits, 14.1));
    }

    #[test]
    fn test_empty_password_has_zero_entropy() {
        let metrics = measure_strength(&secret(""));
        assert_eq!(metrics.length, 0);
        assert_eq!(metrics.entropy_bits, 0.0);
    }

    #[test]
    fn test_entropy_monotone_in_length() {
        let mut previous = -1.0;
        for n in 0..64 {
            let metrics = measure_strength(&secret(&"x".repeat(n)));
            assert_eq!(metrics.pool_size, if n == 0 { 2 } else { 26 });
            assert!(metrics.entropy_bits >= previous);
            previous = metrics.entropy_bits;
        }
    }

    #[test]
    fn test_entropy_monotone_in_pool() {
        // Same length, progressively richer pools.
        let samples = ["aaaaaaaa", "aaaaaaa1", "aaaaaA1!"];
        let mut previous = 0.0;
        for sample in samples {
            let metrics = measure_strength(&secret(sample));
            assert_eq!(metrics.length, 8);
            assert!(metrics.entropy_bits >= previous);
            previous = metrics.entropy_bits;
        }
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let policies = PolicyStore::load(
            r#"{"default": "A", "frameworks": {"A": {"min_length": 10, "require_upper": true, "min_entropy": 50}}}"#,
        );
        let breaches = BreachIndex::from_entries(["password1"]);
        let pwd = secret("Tr0ub4dor&3");

        let first = evaluate_password(&pwd, "A", &policies, &breaches);
        let second = evaluate_password(&pwd, "A", &policies, &breaches);
        assert_eq!(first, second);
    }

    #[test]
    fn test_evaluate_all_class_password() {
        let policies = PolicyStore::load(
            r#"{"default": "Full", "frameworks": {"Full": {
                "min_length": 8,
                "require_lower": true,
                "require_upper": true,
                "require_digits": true,
                "require_symbols": true,
                "min_entropy": 0
            }}}"#,
        );
        let breaches = BreachIndex::default();

        let verdict = evaluate_password(&secret("Tr0ub4dor&3"), "Full", &policies, &breaches);
        assert_eq!(verdict.metrics.length, 11);
        assert_eq!(verdict.metrics.pool_size, 26 + 26 + 10 + 32);
        assert!(verdict.compliance.overall_pass);
        assert!(!verdict.breach.is_breached);
    }

    #[test]
    fn test_evaluate_breached_password_keeps_rating() {
        // Breach status is reported independently of the entropy rating.
        let policies = PolicyStore::load(
            r#"{"default": "A", "frameworks": {"A": {"min_length": 8, "min_entropy": 0}}}"#,
        );
        let breaches = BreachIndex::from_entries(["correcthorsebatterystaple"]);

        let verdict =
            evaluate_password(&secret("CorrectHorseBatteryStaple"), "A", &policies, &breaches);
        assert!(verdict.breach.is_breached);
        assert!(verdict.rating >= RatingTier::Strong);
        assert!(verdict.compliance.overall_pass);
    }

    #[test]
    fn test_evaluate_unknown_policy_uses_default() {
        let policies = PolicyStore::load(
            r#"{"default": "A", "frameworks": {"A": {"min_length": 3, "min_entropy": 0}}}"#,
        );
        let verdict =
            evaluate_password(&secret("abcd"), "NoSuchPolicy", &policies, &BreachIndex::default());
        assert_eq!(verdict.compliance.policy_name, "A");
        assert!(verdict.compliance.overall_pass);
    }
}
