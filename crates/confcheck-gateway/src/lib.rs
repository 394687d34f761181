//! # confcheck-gateway: API Gateway Config Invariants
//!
//! Checks a Kong declarative config for a named upstream that balances with
//! cookie-based session affinity.
//!
//! ## Pipeline (`affinity`)
//!
//! 1. Parse the config as YAML through the injected parser registry.
//! 2. Index the top-level `upstreams` sequence by `name` alone, applying an
//!    explicit [`DuplicatePolicy`].
//! 3. Look up the expected upstream ([`CheckError::MissingEntry`] if absent)
//!    and decode only that entry.
//! 4. Require `hash_on` to equal the expected value
//!    ([`CheckError::InvariantViolation`] otherwise).
//! 5. Report the affinity cookie and the ordered target list.
//!
//! The pipeline is linear and stops at the first failing step.
//!
//! ## Crate Policy
//!
//! - Depends only on `confcheck-core` internally.
//! - Fields the checks do not look at are tolerated, so full Kong configs
//!   (services, routes, plugins) load unchanged.
//!
//! [`CheckError::MissingEntry`]: confcheck_core::CheckError::MissingEntry
//! [`CheckError::InvariantViolation`]: confcheck_core::CheckError::InvariantViolation

pub mod affinity;
pub mod upstream;

pub use affinity::{AffinityChecker, AffinityExpectation, AffinityReport};
pub use upstream::{index_upstreams, DuplicatePolicy, GatewayConfig, Target, Upstream, UpstreamEntry};

/// Gateway config location, relative to the repository root.
pub const DEFAULT_CONFIG_PATH: &str = "infra/api-gateway/kong.yml";

/// Upstream that must carry session affinity.
pub const DEFAULT_UPSTREAM: &str = "backend-upstream";

/// Required `hash_on` value for cookie-based session affinity.
pub const DEFAULT_HASH_ON: &str = "cookie";
