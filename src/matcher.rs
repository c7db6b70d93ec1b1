//! Line-level recognition of Rego declarations.
//!
//! Policies are not parsed. Each predicate here checks a single line for one
//! declaration shape, anchored at the line start:
//! - simple: `name := ...` or `name = ...`
//! - boolean: `name := true`
//! - set: `name := {...}`
//! - set member: `name := {..., "element", ...}`
//!
//! Anything else is opaque text to the callers. The free functions compile
//! on every call; scanners that test many lines hold a `Declaration` instead.

use regex::Regex;

/// Compiled patterns for one declaration name.
pub struct Declaration {
    name: String,
    simple: Regex,
    truthy: Regex,
    set: Regex,
}

impl Declaration {
    pub fn new(name: &str) -> Self {
        let n = regex::escape(name);
        Declaration {
            name: name.to_string(),
            simple: compile(&format!(r"^\s*{n}\s*:?=")),
            truthy: compile(&format!(r"^\s*{n}\s*:?=\s*true\b")),
            set: compile(&format!(r"^\s*{n}\s*:?=\s*\{{.*\}}")),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_simple(&self, line: &str) -> bool {
        self.simple.is_match(line)
    }

    pub fn is_true(&self, line: &str) -> bool {
        self.truthy.is_match(line)
    }

    pub fn is_set(&self, line: &str) -> bool {
        self.set.is_match(line)
    }

    /// Set literal on this line contains `"element"` as a quoted token.
    pub fn set_contains(&self, line: &str, element: &str) -> bool {
        if !self.is_set(line) {
            return false;
        }
        let (Some(open), Some(close)) = (line.find('{'), line.rfind('}')) else {
            return false;
        };
        if close <= open {
            return false;
        }
        let quoted = format!("\"{element}\"");
        line[open + 1..close].contains(&quoted)
    }
}

// Names pass through `regex::escape`, so every pattern built in `new` compiles.
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("escaped declaration pattern")
}

/// True if `line` declares `name` with `=` or `:=`.
pub fn matches_simple_declaration(line: &str, name: &str) -> bool {
    Declaration::new(name).is_simple(line)
}

/// True if `line` assigns literal `true` to `name`.
pub fn matches_boolean_true_declaration(line: &str, name: &str) -> bool {
    Declaration::new(name).is_true(line)
}

/// True if `line` assigns a brace-delimited set literal to `name`.
pub fn matches_set_declaration(line: &str, name: &str) -> bool {
    Declaration::new(name).is_set(line)
}

/// True if `line` assigns a set literal to `set_name` that contains `"element"`.
pub fn matches_set_containing_element(line: &str, set_name: &str, element: &str) -> bool {
    Declaration::new(set_name).set_contains(line, element)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_declaration_accepts_both_assignments() {
        assert!(matches_simple_declaration("desc := \"x\"", "desc"));
        assert!(matches_simple_declaration("  desc=\"x\"", "desc"));
        assert!(matches_simple_declaration("\tseverity  :=  \"High\"", "severity"));
        assert!(!matches_simple_declaration("description := \"x\"", "desc"));
        assert!(!matches_simple_declaration("# desc := \"x\"", "desc"));
    }

    #[test]
    fn test_boolean_true_requires_whole_word() {
        assert!(matches_boolean_true_declaration("checkNodes := true", "checkNodes"));
        assert!(matches_boolean_true_declaration("  checkNodes=true\n", "checkNodes"));
        assert!(!matches_boolean_true_declaration("checkNodes := false", "checkNodes"));
        assert!(!matches_boolean_true_declaration("checkNodes := trueish", "checkNodes"));
        assert!(!matches_boolean_true_declaration("checkNodesX := true", "checkNodes"));
    }

    #[test]
    fn test_set_declaration() {
        assert!(matches_set_declaration("targets := {\"nodes\"}", "targets"));
        assert!(matches_set_declaration("targets = {}", "targets"));
        assert!(!matches_set_declaration("targets := [\"nodes\"]", "targets"));
        assert!(!matches_set_declaration("x := targets", "targets"));
    }

    #[test]
    fn test_set_containing_element_tolerates_order_and_spacing() {
        let line = "targets := {  \"users\" ,\"nodes\"  }";
        assert!(matches_set_containing_element(line, "targets", "nodes"));
        assert!(matches_set_containing_element(line, "targets", "users"));
        assert!(!matches_set_containing_element(line, "targets", "groups"));
    }

    #[test]
    fn test_set_containing_element_ignores_substrings() {
        let line = "targets := {\"serviceAccounts\"}";
        assert!(!matches_set_containing_element(line, "targets", "Accounts"));
        assert!(!matches_set_containing_element(
            "targets := {\"nodesX\"}",
            "targets",
            "nodes"
        ));
    }

    #[test]
    fn test_declaration_escapes_name() {
        let d = Declaration::new("a.b");
        assert_eq!(d.name(), "a.b");
        assert!(d.is_simple("a.b := 1"));
        assert!(!d.is_simple("axb := 1"));
    }
}
