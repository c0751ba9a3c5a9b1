#![deny(missing_docs)]

//! # Naming
//!
//! Normalizes raw schema field names into PascalCase identifiers, and derives
//! the file/table names used by emitters.
//!
//! Refinement runs in two stages:
//! 1. Custom-field markers (`_1__c`, `_s__c`, `__c`) collapse to `C`.
//! 2. Each underscore is deleted and the character after it upper-cased.

use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};

/// Custom-field markers, applied in order, each replaced by [`MARKER_REPLACEMENT`].
pub const CUSTOM_FIELD_MARKERS: [&str; 3] = ["_1__c", "_s__c", "__c"];

/// Replacement for every custom-field marker.
pub const MARKER_REPLACEMENT: &str = "C";

/// Controls whether names are refined or passed through verbatim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefineMode {
    /// Apply marker stripping and PascalCase conversion.
    #[default]
    Refine,
    /// Keep raw names untouched.
    Verbatim,
}

impl RefineMode {
    /// Builds a mode from a `refine_names` flag.
    pub fn from_flag(refine_names: bool) -> Self {
        if refine_names {
            RefineMode::Refine
        } else {
            RefineMode::Verbatim
        }
    }
}

/// Refines a raw schema name into an identifier.
///
/// Pure: the result depends only on `raw` and `mode`.
///
/// # Examples
/// ```
/// use entitygen_core::naming::{refine, RefineMode};
///
/// assert_eq!(refine("First_Name__c", RefineMode::Refine), "FirstNameC");
/// assert_eq!(refine("What_can_we_help_with", RefineMode::Refine), "WhatCanWeHelpWith");
/// assert_eq!(refine("First_Name__c", RefineMode::Verbatim), "First_Name__c");
/// ```
pub fn refine(raw: &str, mode: RefineMode) -> String {
    match mode {
        RefineMode::Verbatim => raw.to_string(),
        RefineMode::Refine => pascalize(&strip_markers(raw)),
    }
}

fn strip_markers(raw: &str) -> String {
    CUSTOM_FIELD_MARKERS
        .iter()
        .fold(raw.to_string(), |name, marker| {
            name.replace(marker, MARKER_REPLACEMENT)
        })
}

/// Deletes underscores one at a time, upper-casing the following character.
/// A trailing underscore has no follower and is simply dropped.
fn pascalize(name: &str) -> String {
    let mut out = name.to_string();
    while let Some(index) = out.find('_') {
        let mut rest = out[index + 1..].chars();
        out = match rest.next() {
            Some(next) => format!("{}{}{}", &out[..index], next.to_uppercase(), rest.as_str()),
            None => out[..index].to_string(),
        };
    }
    out
}

/// Snake-cased stem for an emitted file or table
/// (e.g. `AccountQueryBuilder` -> `account_query_builder`).
pub fn file_stem(name: &str) -> String {
    name.to_snake_case()
}

const RUST_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
    "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
    "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
    "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe", "unsized",
    "use", "virtual", "where", "while", "yield",
];

/// Renders a name as a Rust identifier, escaping keywords.
///
/// `self`, `Self`, `super` and `crate` cannot be raw identifiers and get a
/// trailing underscore instead.
pub fn rust_ident(name: &str) -> String {
    match name {
        "self" | "Self" | "super" | "crate" => format!("{}_", name),
        _ if RUST_KEYWORDS.contains(&name) => format!("r#{}", name),
        _ => name.to_string(),
    }
}
