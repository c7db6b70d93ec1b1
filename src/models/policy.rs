//! Policy metadata schema shared by the extractor and the migrator.
//!
//! Key components:
//! - `TargetLabel`: closed vocabulary of violation targets, with the legacy
//!   `checkXXX` flag each of the first three replaces.
//! - `LabelOrder`: how labels are joined when rendering docs.
//! - `PolicyMetadata`: the per-file extraction result.
//! - `LegacyFlag`: a recognized `checkXXX := true` line found during migration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
/// Kind of subject a policy's violations apply to.
pub enum TargetLabel {
    #[serde(rename = "serviceAccounts")]
    ServiceAccounts,
    #[serde(rename = "nodes")]
    Nodes,
    #[serde(rename = "combined")]
    Combined,
    #[serde(rename = "users")]
    Users,
    #[serde(rename = "groups")]
    Groups,
}

impl TargetLabel {
    /// Every label, in the order the extractor checks a `targets` line.
    pub const ALL: [TargetLabel; 5] = [
        TargetLabel::ServiceAccounts,
        TargetLabel::Nodes,
        TargetLabel::Combined,
        TargetLabel::Users,
        TargetLabel::Groups,
    ];

    /// Labels that have a legacy boolean flag.
    pub const LEGACY: [TargetLabel; 3] = [
        TargetLabel::ServiceAccounts,
        TargetLabel::Nodes,
        TargetLabel::Combined,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TargetLabel::ServiceAccounts => "serviceAccounts",
            TargetLabel::Nodes => "nodes",
            TargetLabel::Combined => "combined",
            TargetLabel::Users => "users",
            TargetLabel::Groups => "groups",
        }
    }

    /// Name of the pre-`targets` boolean that declared this label, if any.
    pub fn legacy_flag(self) -> Option<&'static str> {
        match self {
            TargetLabel::ServiceAccounts => Some("checkServiceAccounts"),
            TargetLabel::Nodes => Some("checkNodes"),
            TargetLabel::Combined => Some("checkCombined"),
            TargetLabel::Users | TargetLabel::Groups => None,
        }
    }
}

impl fmt::Display for TargetLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Join order for `Violation types` in rendered docs.
pub enum LabelOrder {
    /// First-seen order in the policy source.
    #[default]
    Source,
    /// Reverse alphabetical by label name.
    ReverseSorted,
}

impl LabelOrder {
    /// Parse `source` or `reverse-sorted`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "source" => Some(LabelOrder::Source),
            "reverse-sorted" => Some(LabelOrder::ReverseSorted),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
/// Metadata extracted from one policy file.
pub struct PolicyMetadata {
    pub name: String,
    pub path: PathBuf,
    pub description: String,
    pub severity: String,
    /// Unique labels in first-seen order.
    pub targets: Vec<TargetLabel>,
}

impl PolicyMetadata {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            description: String::new(),
            severity: String::new(),
            targets: Vec::new(),
        }
    }

    /// Add `label` unless already present.
    pub fn add_target(&mut self, label: TargetLabel) {
        if !self.targets.contains(&label) {
            self.targets.push(label);
        }
    }

    /// Labels arranged for display.
    pub fn ordered_targets(&self, order: LabelOrder) -> Vec<TargetLabel> {
        let mut out = self.targets.clone();
        if order == LabelOrder::ReverseSorted {
            out.sort_by(|a, b| b.as_str().cmp(a.as_str()));
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A `checkXXX := true` line recognized during migration.
pub struct LegacyFlag {
    pub label: TargetLabel,
    pub line: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_target_dedupes_and_keeps_first_seen_order() {
        let mut md = PolicyMetadata::new("p", "lib/p.rego");
        md.add_target(TargetLabel::Users);
        md.add_target(TargetLabel::Nodes);
        md.add_target(TargetLabel::Users);
        assert_eq!(md.targets, vec![TargetLabel::Users, TargetLabel::Nodes]);
    }

    #[test]
    fn test_reverse_sorted_uses_label_names() {
        let mut md = PolicyMetadata::new("p", "lib/p.rego");
        md.add_target(TargetLabel::Nodes);
        md.add_target(TargetLabel::ServiceAccounts);
        md.add_target(TargetLabel::Users);
        let labels: Vec<_> = md
            .ordered_targets(LabelOrder::ReverseSorted)
            .into_iter()
            .map(TargetLabel::as_str)
            .collect();
        assert_eq!(labels, vec!["users", "serviceAccounts", "nodes"]);
        assert_eq!(md.ordered_targets(LabelOrder::Source)[0], TargetLabel::Nodes);
    }

    #[test]
    fn test_label_order_parse() {
        assert_eq!(LabelOrder::parse("source"), Some(LabelOrder::Source));
        assert_eq!(
            LabelOrder::parse("reverse-sorted"),
            Some(LabelOrder::ReverseSorted)
        );
        assert_eq!(LabelOrder::parse("alpha"), None);
        // Same vocabulary as the config file accepts.
        assert_eq!(LabelOrder::parse("reverse"), None);
    }
}
