// crates/ruleforge-cli/src/tests/i18n.rs
// ============================================================================
// Module: CLI Catalog Tests
// Description: Unit tests for catalog integrity and substitution.
// Purpose: Keep the message catalog well-formed as pages are added.
// Dependencies: ruleforge-cli i18n module
// ============================================================================

//! ## Overview
//! Verifies catalog keys are unique, templates use well-formed placeholders,
//! and the [`t!`](crate::t) macro substitutes named arguments.

use std::collections::BTreeSet;

use crate::i18n::MessageArg;
use crate::i18n::catalog;
use crate::i18n::catalog_entries;
use crate::i18n::translate;

fn parse_placeholder_names(template: &str) -> Result<BTreeSet<String>, String> {
    let mut placeholders = BTreeSet::new();
    let mut rest = template;
    let mut offset = 0usize;
    while let Some(open) = rest.find(['{', '}']) {
        if rest.as_bytes()[open] == b'}' {
            return Err(format!("unmatched '}}' at byte {}", offset + open));
        }
        let after = &rest[open + 1 ..];
        let close = after.find('}').ok_or_else(|| format!("unclosed '{{' at byte {}", offset + open))?;
        let name = &after[.. close];
        if name.is_empty() {
            return Err(format!("empty placeholder at byte {}", offset + open));
        }
        if !name.chars().all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_') {
            return Err(format!("placeholder '{name}' must use [a-z0-9_]"));
        }
        placeholders.insert(name.to_string());
        let consumed = open + 1 + close + 1;
        offset += consumed;
        rest = &rest[consumed ..];
    }
    Ok(placeholders)
}

#[test]
fn catalog_keys_are_unique() {
    let mut seen = BTreeSet::new();
    let mut duplicates = BTreeSet::new();
    for (key, _) in catalog_entries() {
        if !seen.insert(*key) {
            duplicates.insert(*key);
        }
    }
    assert!(duplicates.is_empty(), "catalog must not contain duplicate keys: {duplicates:?}");
    assert_eq!(catalog().len(), catalog_entries().len());
}

#[test]
fn catalog_templates_have_valid_placeholder_syntax() {
    for (key, template) in catalog_entries() {
        parse_placeholder_names(template).unwrap_or_else(|error| {
            panic!("invalid placeholder syntax for key '{key}': {error}")
        });
    }
}

#[test]
fn placeholder_parser_rejects_malformed_templates() {
    assert!(parse_placeholder_names("open {brace").is_err());
    assert!(parse_placeholder_names("close } brace").is_err());
    assert!(parse_placeholder_names("empty {}").is_err());
    assert!(parse_placeholder_names("upper {Name}").is_err());
    let names = parse_placeholder_names("{a} and {b_2} and {a}").unwrap();
    assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["a".to_string(), "b_2".to_string()]);
}

#[test]
fn translate_substitutes_placeholders() {
    let output = translate(
        "gate.locked",
        vec![MessageArg::new("page", "/dashboard"), MessageArg::new("scan", "/scan-now")],
    );
    assert!(output.starts_with("/dashboard is locked"));
    assert!(output.contains("(/scan-now)"));
}

#[test]
fn translate_falls_back_to_key() {
    assert_eq!(translate("no.such.key", Vec::new()), "no.such.key");
}

#[test]
fn macro_formats_named_arguments() {
    let version = "9.9.9";
    assert_eq!(crate::t!("main.version", version = version), "ruleforge 9.9.9");
    assert_eq!(crate::t!("runs.rules", count = 12), "12 rules");
}
