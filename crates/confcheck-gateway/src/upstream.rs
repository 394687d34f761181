//! # Upstreams
//!
//! Typed view of the `upstreams` section of a Kong declarative config.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use confcheck_core::{CheckError, ConfigDocument};

/// A backend endpoint belonging to an upstream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Target {
    /// `host:port` of the endpoint.
    pub target: String,
}

/// A named backend target group.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Upstream {
    /// Unique name used for lookups.
    pub name: String,
    /// Load-balancing hash input (`none`, `consumer`, `ip`, `header`, `cookie`, ...).
    #[serde(default)]
    pub hash_on: Option<String>,
    /// Cookie carrying the affinity key when `hash_on` is `cookie`.
    #[serde(default)]
    pub hash_on_cookie: Option<String>,
    /// Endpoints, in declaration order.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub targets: Vec<Target>,
}

impl Upstream {
    /// Effective `hash_on`; Kong treats an absent value as `none`.
    pub fn hash_on(&self) -> &str {
        self.hash_on.as_deref().unwrap_or("none")
    }

    /// Affinity cookie name, if set to something non-empty.
    pub fn cookie(&self) -> Option<&str> {
        self.hash_on_cookie.as_deref().filter(|c| !c.is_empty())
    }

    /// `target` field of every target, in order.
    pub fn target_addresses(&self) -> Vec<String> {
        self.targets.iter().map(|t| t.target.clone()).collect()
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// How repeated upstream names are handled when indexing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The later entry replaces the earlier one.
    #[default]
    LastWins,
    /// A repeated name is an invariant violation.
    Reject,
}

/// One `upstreams` entry, keyed by its `name`.
///
/// Only the name is read when the config is loaded. The remaining fields are
/// decoded on demand, so a malformed entry only fails the check that looks
/// it up.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamEntry {
    /// Position in the `upstreams` sequence.
    pub position: usize,
    /// The entry's `name`.
    pub name: String,
    raw: Value,
}

impl UpstreamEntry {
    /// Decode the full entry.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Parse`] naming the entry's position if a field
    /// has the wrong shape.
    pub fn decode(&self, document: &ConfigDocument) -> Result<Upstream, CheckError> {
        Upstream::deserialize(&self.raw).map_err(|e| {
            CheckError::parse(
                document.path(),
                document.format(),
                format!("upstreams[{}]: {e}", self.position),
            )
        })
    }
}

/// The `upstreams` section of a gateway config, indexed lazily.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GatewayConfig {
    /// Top-level `upstreams`, in declaration order.
    pub upstreams: Vec<UpstreamEntry>,
}

impl GatewayConfig {
    /// Read the `upstreams` section of a parsed document.
    ///
    /// An empty document or a document without `upstreams` yields no
    /// upstreams, so lookups fail with [`CheckError::MissingEntry`] rather
    /// than a parse error.
    ///
    /// # Errors
    ///
    /// Returns [`CheckError::Parse`] if the root is not a mapping,
    /// `upstreams` is not a sequence, or an entry has no string `name`.
    pub fn from_document(document: &ConfigDocument) -> Result<Self, CheckError> {
        let structural = |reason: String| CheckError::parse(document.path(), document.format(), reason);

        let root = match document.root() {
            Value::Null => return Ok(Self::default()),
            Value::Object(map) => map,
            _ => return Err(structural("expected a mapping at the document root".to_string())),
        };

        let entries = match root.get("upstreams") {
            None | Some(Value::Null) => return Ok(Self::default()),
            Some(Value::Array(entries)) => entries,
            Some(_) => return Err(structural("`upstreams` must be a sequence".to_string())),
        };

        let upstreams = entries
            .iter()
            .enumerate()
            .map(|(position, raw)| {
                let name = raw
                    .get("name")
                    .and_then(Value::as_str)
                    .ok_or_else(|| structural(format!("upstreams[{position}]: missing string field `name`")))?;
                Ok(UpstreamEntry {
                    position,
                    name: name.to_string(),
                    raw: raw.clone(),
                })
            })
            .collect::<Result<Vec<_>, CheckError>>()?;

        Ok(Self { upstreams })
    }
}

/// Index upstream entries by name.
///
/// # Errors
///
/// Under [`DuplicatePolicy::Reject`], returns
/// [`CheckError::InvariantViolation`] for the first repeated name.
pub fn index_upstreams(
    upstreams: &[UpstreamEntry],
    policy: DuplicatePolicy,
) -> Result<BTreeMap<&str, &UpstreamEntry>, CheckError> {
    let mut index = BTreeMap::new();
    for upstream in upstreams {
        if index.insert(upstream.name.as_str(), upstream).is_some() {
            match policy {
                DuplicatePolicy::LastWins => {
                    tracing::warn!(upstream = %upstream.name, "duplicate upstream name; later entry wins");
                }
                DuplicatePolicy::Reject => {
                    return Err(CheckError::InvariantViolation {
                        entry: upstream.name.clone(),
                        field: "name".to_string(),
                        expected: "unique".to_string(),
                        actual: "duplicate".to_string(),
                    });
                }
            }
        }
    }
    Ok(index)
}
