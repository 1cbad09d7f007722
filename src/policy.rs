//! Policy framework store
//!
//! Loads and validates the `{default, frameworks}` policy document and
//! resolves policy names to definitions. A document that fails
//! validation is recovered into the built-in "Simple" fallback policy;
//! loading never aborts an evaluation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the built-in policy used when a document fails validation.
pub const FALLBACK_POLICY_NAME: &str = "Simple";

#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Failed to read policy document: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed policy document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Policy document defines no frameworks")]
    NoFrameworks,
    #[error("Framework `{framework}` is missing required field `{field}`")]
    MissingField {
        framework: String,
        field: &'static str,
    },
    #[error("Framework `{framework}` has an invalid `{field}` value")]
    InvalidField {
        framework: String,
        field: &'static str,
    },
    #[error("Policy document does not name a default framework")]
    MissingDefault,
    #[error("Default framework `{0}` is not defined")]
    UnknownDefault(String),
}

/// A named set of minimum requirements a password must satisfy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyDefinition {
    pub name: String,
    pub min_length: usize,
    pub require_lower: bool,
    pub require_upper: bool,
    pub require_digits: bool,
    pub require_symbols: bool,
    pub min_entropy: f64,
    pub description: String,
}

impl PolicyDefinition {
    /// The built-in fallback policy: 8+ characters, nothing else.
    fn simple() -> Self {
        Self {
            name: FALLBACK_POLICY_NAME.to_string(),
            min_length: 8,
            require_lower: false,
            require_upper: false,
            require_digits: false,
            require_symbols: false,
            min_entropy: 0.0,
            description: "Built-in fallback: 8+ characters".to_string(),
        }
    }
}

/// Wire shape of the policy document before validation.
#[derive(Deserialize)]
struct RawDocument {
    default: Option<String>,
    #[serde(default)]
    frameworks: BTreeMap<String, RawFramework>,
}

#[derive(Deserialize)]
struct RawFramework {
    min_length: Option<i64>,
    min_entropy: Option<f64>,
    #[serde(default)]
    require_lower: bool,
    #[serde(default)]
    require_upper: bool,
    #[serde(default)]
    require_digits: bool,
    #[serde(default)]
    require_symbols: bool,
    #[serde(default)]
    desc: String,
}

/// Validated, immutable collection of policy frameworks.
///
/// Invariant: `frameworks` is non-empty and `default_name` is always one
/// of its keys, so [`PolicyStore::resolve`] is total. A store built from
/// an invalid document holds only the "Simple" policy and remembers why
/// in [`PolicyStore::fallback_reason`].
#[derive(Debug)]
pub struct PolicyStore {
    frameworks: BTreeMap<String, PolicyDefinition>,
    default_name: String,
    fallback: Option<PolicyError>,
}

impl PolicyStore {
    /// Parses and validates a policy document from JSON text.
    ///
    /// Never fails: a document that does not validate yields the
    /// fallback store instead.
    pub fn load(text: &str) -> Self {
        Self::try_load(text).unwrap_or_else(Self::fallback_store)
    }

    /// Builds a store from an already-parsed JSON document.
    pub fn from_document(document: serde_json::Value) -> Self {
        Self::try_from_document(document).unwrap_or_else(Self::fallback_store)
    }

    /// Reads and validates a policy document file.
    ///
    /// I/O failures are recovered the same way validation failures are:
    /// the returned store is usable either way.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let store = Self::load(&text);

                #[cfg(feature = "tracing")]
                if !store.is_fallback() {
                    tracing::info!(
                        "Loaded {} policy frameworks from {}",
                        store.frameworks.len(),
                        path.display()
                    );
                }

                store
            }
            Err(err) => Self::fallback_store(PolicyError::Io(err)),
        }
    }

    fn try_load(text: &str) -> Result<Self, PolicyError> {
        let raw: RawDocument = serde_json::from_str(text)?;
        Self::validate(raw)
    }

    fn try_from_document(document: serde_json::Value) -> Result<Self, PolicyError> {
        let raw: RawDocument = serde_json::from_value(document)?;
        Self::validate(raw)
    }

    /// All-or-nothing validation: one bad framework rejects the whole
    /// document.
    fn validate(raw: RawDocument) -> Result<Self, PolicyError> {
        if raw.frameworks.is_empty() {
            return Err(PolicyError::NoFrameworks);
        }

        let mut frameworks = BTreeMap::new();
        for (name, cfg) in raw.frameworks {
            let min_length = cfg.min_length.ok_or_else(|| PolicyError::MissingField {
                framework: name.clone(),
                field: "min_length",
            })?;
            let min_length =
                usize::try_from(min_length).map_err(|_| PolicyError::InvalidField {
                    framework: name.clone(),
                    field: "min_length",
                })?;

            let min_entropy = cfg.min_entropy.ok_or_else(|| PolicyError::MissingField {
                framework: name.clone(),
                field: "min_entropy",
            })?;
            if !min_entropy.is_finite() || min_entropy < 0.0 {
                return Err(PolicyError::InvalidField {
                    framework: name,
                    field: "min_entropy",
                });
            }

            frameworks.insert(
                name.clone(),
                PolicyDefinition {
                    name,
                    min_length,
                    require_lower: cfg.require_lower,
                    require_upper: cfg.require_upper,
                    require_digits: cfg.require_digits,
                    require_symbols: cfg.require_symbols,
                    min_entropy,
                    description: cfg.desc,
                },
            );
        }

        let default_name = raw.default.ok_or(PolicyError::MissingDefault)?;
        if !frameworks.contains_key(&default_name) {
            return Err(PolicyError::UnknownDefault(default_name));
        }

        Ok(Self {
            frameworks,
            default_name,
            fallback: None,
        })
    }

    fn fallback_store(reason: PolicyError) -> Self {
        #[cfg(feature = "tracing")]
        tracing::warn!("Policy document rejected, using fallback policy: {reason}");

        let simple = PolicyDefinition::simple();
        let mut frameworks = BTreeMap::new();
        frameworks.insert(simple.name.clone(), simple);

        Self {
            frameworks,
            default_name: FALLBACK_POLICY_NAME.to_string(),
            fallback: Some(reason),
        }
    }

    /// Returns the named framework, or the store's default when the name
    /// is unknown (or empty).
    pub fn resolve(&self, name: &str) -> &PolicyDefinition {
        self.frameworks
            .get(name)
            .unwrap_or_else(|| &self.frameworks[&self.default_name])
    }

    /// Framework names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.frameworks.keys().map(String::as_str)
    }

    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    pub fn len(&self) -> usize {
        self.frameworks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frameworks.is_empty()
    }

    /// True when the store holds the built-in fallback instead of a
    /// validated document.
    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// The failure that forced the fallback, if any.
    pub fn fallback_reason(&self) -> Option<&PolicyError> {
        self.fallback.as_ref()
    }
}

/// Returns the policy document path.
///
/// Priority:
/// 1. Environment variable `PASSGAUGE_POLICY_PATH`
/// 2. Default path `./assets/frameworks.json`
pub fn default_policy_path() -> PathBuf {
    std::env::var("PASSGAUGE_POLICY_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./assets/frameworks.json"))
}
