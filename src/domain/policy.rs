//! Organizing policies: per-container placement computation
//!
//! An organizing container carries one of these policies. Given the item
//! about to be inserted, the policy computes the container that should
//! actually hold it. `Ok(None)` means "no replacement this round" and is
//! not an error; evaluation failures propagate to the caller unchanged.

use chrono::format::{Item as FormatItem, StrftimeItems};
use regex::Regex;

use crate::domain::entities::{ContainerRef, Item};
use crate::domain::error::{DomainError, DomainResult};

/// Placement capability attached to an organizing container.
pub trait OrganizingPolicy: Send + Sync {
    /// Compute the container that should hold `item`.
    ///
    /// `Ok(None)` leaves the placement unchanged for this round.
    fn target_container(&self, item: &Item) -> DomainResult<Option<ContainerRef>>;

    /// Short policy kind name for display ("date", "attribute", ...).
    fn kind(&self) -> &'static str;
}

/// Routes items into date buckets under a base container,
/// e.g. base "news" with format "%Y/%m" yields "news/2024/05".
#[derive(Debug)]
pub struct DateBucketPolicy {
    base: String,
    format: String,
}

impl DateBucketPolicy {
    /// Create a date bucket policy. The format string is validated eagerly.
    pub fn new(base: impl Into<String>, format: impl Into<String>) -> DomainResult<Self> {
        let format = format.into();
        let has_errors = StrftimeItems::new(&format).any(|i| matches!(i, FormatItem::Error));
        if has_errors {
            return Err(DomainError::InvalidPolicy {
                message: format!("invalid date format: {format}"),
            });
        }
        Ok(Self {
            base: base.into(),
            format,
        })
    }
}

impl OrganizingPolicy for DateBucketPolicy {
    fn target_container(&self, item: &Item) -> DomainResult<Option<ContainerRef>> {
        let Some(ts) = item.created_at else {
            // Undated items stay where they were requested
            return Ok(None);
        };
        let bucket = ts.format(&self.format).to_string();
        Ok(Some(ContainerRef::new(format!("{}/{}", self.base, bucket))))
    }

    fn kind(&self) -> &'static str {
        "date"
    }
}

/// Routes items by the value of one attribute, e.g. key "category" with
/// base "tickets" sends category=billing to "tickets/billing".
pub struct AttributeRoutePolicy {
    key: String,
    base: String,
}

impl AttributeRoutePolicy {
    pub fn new(key: impl Into<String>, base: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            base: base.into(),
        }
    }
}

impl OrganizingPolicy for AttributeRoutePolicy {
    fn target_container(&self, item: &Item) -> DomainResult<Option<ContainerRef>> {
        match item.attributes.get(&self.key) {
            Some(value) if !value.is_empty() => Ok(Some(ContainerRef::new(format!(
                "{}/{}",
                self.base, value
            )))),
            _ => Ok(None),
        }
    }

    fn kind(&self) -> &'static str {
        "attribute"
    }
}

/// One pattern rule: items whose name matches go to `target`.
#[derive(Debug)]
pub struct PatternRule {
    pub pattern: Regex,
    pub target: String,
}

/// Routes items by matching their name against ordered regex rules;
/// the first matching rule wins.
#[derive(Debug)]
pub struct PatternRoutePolicy {
    rules: Vec<PatternRule>,
}

impl PatternRoutePolicy {
    /// Create a pattern policy from (pattern, target) pairs.
    /// Regexes are compiled eagerly.
    pub fn new<I, S, T>(rules: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: Into<String>,
    {
        let mut compiled = Vec::new();
        for (pattern, target) in rules {
            let regex = Regex::new(pattern.as_ref()).map_err(|e| DomainError::InvalidPolicy {
                message: format!("invalid pattern '{}': {}", pattern.as_ref(), e),
            })?;
            compiled.push(PatternRule {
                pattern: regex,
                target: target.into(),
            });
        }
        Ok(Self { rules: compiled })
    }
}

impl OrganizingPolicy for PatternRoutePolicy {
    fn target_container(&self, item: &Item) -> DomainResult<Option<ContainerRef>> {
        for rule in &self.rules {
            if rule.pattern.is_match(&item.name) {
                return Ok(Some(ContainerRef::new(rule.target.clone())));
            }
        }
        Ok(None)
    }

    fn kind(&self) -> &'static str {
        "pattern"
    }
}

/// Always routes to a fixed target, regardless of the item.
pub struct RedirectPolicy {
    target: String,
}

impl RedirectPolicy {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }
}

impl OrganizingPolicy for RedirectPolicy {
    fn target_container(&self, _item: &Item) -> DomainResult<Option<ContainerRef>> {
        Ok(Some(ContainerRef::new(self.target.clone())))
    }

    fn kind(&self) -> &'static str {
        "redirect"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn given_dated_item_when_date_policy_applied_then_routes_to_bucket() {
        let policy = DateBucketPolicy::new("news", "%Y/%m").unwrap();
        let item = Item::new("press-release.txt")
            .with_created_at(Utc.with_ymd_and_hms(2024, 5, 17, 12, 0, 0).unwrap());

        let target = policy.target_container(&item).unwrap();

        assert_eq!(target, Some(ContainerRef::new("news/2024/05")));
    }

    #[test]
    fn given_undated_item_when_date_policy_applied_then_no_target() {
        let policy = DateBucketPolicy::new("news", "%Y/%m").unwrap();
        let target = policy.target_container(&Item::new("undated.txt")).unwrap();
        assert_eq!(target, None);
    }

    #[test]
    fn given_bad_format_when_creating_date_policy_then_invalid_policy() {
        let err = DateBucketPolicy::new("news", "%Q").unwrap_err();
        assert!(matches!(err, DomainError::InvalidPolicy { .. }));
    }

    #[test]
    fn given_missing_attribute_when_attribute_policy_applied_then_no_target() {
        let policy = AttributeRoutePolicy::new("category", "tickets");
        let target = policy.target_container(&Item::new("ticket-1")).unwrap();
        assert_eq!(target, None);
    }

    #[test]
    fn given_attribute_when_attribute_policy_applied_then_routes_by_value() {
        let policy = AttributeRoutePolicy::new("category", "tickets");
        let item = Item::new("ticket-1").with_attribute("category", "billing");

        let target = policy.target_container(&item).unwrap();

        assert_eq!(target, Some(ContainerRef::new("tickets/billing")));
    }

    #[test]
    fn given_multiple_rules_when_pattern_policy_applied_then_first_match_wins() {
        let policy = PatternRoutePolicy::new([
            (r"(?i)invoice", "finance/invoices"),
            (r"\.txt$", "docs/text"),
        ])
        .unwrap();

        let target = policy
            .target_container(&Item::new("Invoice-2024.txt"))
            .unwrap();

        assert_eq!(target, Some(ContainerRef::new("finance/invoices")));
    }

    #[test]
    fn given_no_matching_rule_when_pattern_policy_applied_then_no_target() {
        let policy = PatternRoutePolicy::new([(r"(?i)invoice", "finance/invoices")]).unwrap();
        let target = policy.target_container(&Item::new("photo.jpg")).unwrap();
        assert_eq!(target, None);
    }

    #[test]
    fn given_invalid_regex_when_creating_pattern_policy_then_invalid_policy() {
        let err = PatternRoutePolicy::new([(r"(unclosed", "x")]).unwrap_err();
        assert!(matches!(err, DomainError::InvalidPolicy { .. }));
    }

    #[test]
    fn given_redirect_policy_when_applied_then_always_routes_to_target() {
        let policy = RedirectPolicy::new("archive");
        let target = policy.target_container(&Item::new("anything")).unwrap();
        assert_eq!(target, Some(ContainerRef::new("archive")));
    }
}
