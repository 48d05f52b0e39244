//! Container catalog loading
//!
//! A catalog is a TOML file declaring containers and their optional
//! organizing policies. Loading a catalog produces an [`InMemoryStore`]
//! ready for resolution.
//!
//! ```toml
//! [containers.inbox]
//!
//! [containers.news]
//! policy = { kind = "date", format = "%Y/%m" }
//!
//! [containers.tickets]
//! policy = { kind = "attribute", key = "category" }
//!
//! [containers.dropbox.policy]
//! kind = "pattern"
//! rules = [
//!     { pattern = "(?i)invoice", target = "finance/invoices" },
//! ]
//!
//! [containers.old-news]
//! policy = { kind = "redirect", target = "news" }
//! ```
//!
//! For `date` and `attribute` policies, `base` defaults to the container's
//! own id, so `news` buckets into `news/2024/05` unless overridden.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::domain::{
    AttributeRoutePolicy, DateBucketPolicy, DomainError, PatternRoutePolicy, RedirectPolicy,
};
use crate::infrastructure::error::{InfraError, InfraResult};
use crate::infrastructure::traits::InMemoryStore;

/// Default bucket format for date policies that do not specify one.
pub const DEFAULT_DATE_FORMAT: &str = "%Y/%m";

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    containers: BTreeMap<String, ContainerSpec>,
}

#[derive(Debug, Deserialize)]
struct ContainerSpec {
    policy: Option<PolicySpec>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
enum PolicySpec {
    Date {
        base: Option<String>,
        format: Option<String>,
    },
    Attribute {
        key: String,
        base: Option<String>,
    },
    Pattern {
        rules: Vec<RuleSpec>,
    },
    Redirect {
        target: String,
    },
}

#[derive(Debug, Deserialize)]
struct RuleSpec {
    pattern: String,
    target: String,
}

/// Load a catalog file and build the store it describes.
pub fn load_catalog(path: &Path) -> InfraResult<InMemoryStore> {
    load_catalog_with_format(path, DEFAULT_DATE_FORMAT)
}

/// Load a catalog with a caller-supplied default date format
/// (from settings) for date policies that do not specify one.
pub fn load_catalog_with_format(path: &Path, default_format: &str) -> InfraResult<InMemoryStore> {
    debug!("load_catalog: path={}", path.display());

    let content = std::fs::read_to_string(path)
        .map_err(|e| InfraError::io(format!("read catalog {}", path.display()), e))?;

    parse_catalog_with_format(&content, path, default_format)
}

/// Parse catalog content into a store. `path` is used for error context only.
pub fn parse_catalog(content: &str, path: &Path) -> InfraResult<InMemoryStore> {
    parse_catalog_with_format(content, path, DEFAULT_DATE_FORMAT)
}

fn parse_catalog_with_format(
    content: &str,
    path: &Path,
    default_format: &str,
) -> InfraResult<InMemoryStore> {
    let file: CatalogFile = toml::from_str(content).map_err(|e| InfraError::Catalog {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut store = InMemoryStore::new();

    for (id, spec) in file.containers {
        match spec.policy {
            None => store.insert_plain(id),
            Some(policy_spec) => {
                let policy = build_policy(&id, policy_spec, default_format).map_err(|e| {
                    InfraError::Catalog {
                        path: path.to_path_buf(),
                        message: format!("container '{id}': {e}"),
                    }
                })?;
                store.insert_organizing(id, policy);
            }
        }
    }

    debug!("load_catalog: {} containers", store.container_ids().len());
    Ok(store)
}

fn build_policy(
    container_id: &str,
    spec: PolicySpec,
    default_format: &str,
) -> Result<Arc<dyn crate::domain::OrganizingPolicy>, DomainError> {
    match spec {
        PolicySpec::Date { base, format } => {
            let base = base.unwrap_or_else(|| container_id.to_string());
            let format = format.unwrap_or_else(|| default_format.to_string());
            Ok(Arc::new(DateBucketPolicy::new(base, format)?))
        }
        PolicySpec::Attribute { key, base } => {
            let base = base.unwrap_or_else(|| container_id.to_string());
            Ok(Arc::new(AttributeRoutePolicy::new(key, base)))
        }
        PolicySpec::Pattern { rules } => {
            let pairs = rules.into_iter().map(|r| (r.pattern, r.target));
            Ok(Arc::new(PatternRoutePolicy::new(pairs)?))
        }
        PolicySpec::Redirect { target } => Ok(Arc::new(RedirectPolicy::new(target))),
    }
}
