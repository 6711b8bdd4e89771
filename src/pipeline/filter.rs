// src/pipeline/filter.rs
use std::collections::HashMap;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::ContactRecord;

/// Keyword and per-field predicate configuration for `filter_records`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterSpec {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub exclude_keywords: Vec<String>,
    #[serde(default = "default_min_data_points")]
    pub min_data_points: usize,
    #[serde(default)]
    pub advanced_filters: HashMap<String, FieldCriteria>,
}

fn default_min_data_points() -> usize {
    3
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            exclude_keywords: Vec::new(),
            min_data_points: default_min_data_points(),
            advanced_filters: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldCriteria {
    /// At least one of these substrings must be present (case-insensitive).
    #[serde(default)]
    pub contains: Vec<String>,
    /// None of these substrings may be present (case-insensitive).
    #[serde(default)]
    pub not_contains: Vec<String>,
    /// The field must match this pattern (case-insensitive).
    #[serde(default)]
    pub regex: Option<String>,
}

/// A malformed filter spec is an input error, reported before any record is
/// examined.
#[derive(Debug, Error)]
#[error("invalid filter spec: {0}")]
pub struct FilterSpecError(pub String);

/// Keep only records passing every configured criterion. Pure and
/// order-preserving; the result is a subset of the input.
pub fn filter_records(
    records: Vec<ContactRecord>,
    spec: &FilterSpec,
) -> Result<Vec<ContactRecord>, FilterSpecError> {
    let compiled = compile_advanced_filters(spec)?;

    let kept = records
        .into_iter()
        .filter(|record| {
            if !record.error.is_empty() {
                return false;
            }
            if record.populated_field_count() < spec.min_data_points {
                return false;
            }
            let text = record.searchable_text();
            if !spec.keywords.is_empty()
                && !spec.keywords.iter().any(|k| text.contains(&k.to_lowercase()))
            {
                return false;
            }
            if spec
                .exclude_keywords
                .iter()
                .any(|k| text.contains(&k.to_lowercase()))
            {
                return false;
            }
            compiled
                .iter()
                .all(|(field, criteria, regex)| field_passes(record, field, criteria, regex))
        })
        .collect();
    Ok(kept)
}

type CompiledFilter<'a> = (&'a String, &'a FieldCriteria, Option<Regex>);

fn compile_advanced_filters(spec: &FilterSpec) -> Result<Vec<CompiledFilter<'_>>, FilterSpecError> {
    let mut compiled = Vec::new();
    for (field, criteria) in &spec.advanced_filters {
        let regex = match &criteria.regex {
            Some(pattern) => Some(
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| {
                        FilterSpecError(format!("bad regex for field {field}: {e}"))
                    })?,
            ),
            None => None,
        };
        compiled.push((field, criteria, regex));
    }
    Ok(compiled)
}

fn field_passes(
    record: &ContactRecord,
    field: &str,
    criteria: &FieldCriteria,
    regex: &Option<Regex>,
) -> bool {
    // A predicate on a field the record does not expose fails, dropping the
    // record; it is not vacuously true.
    let Some(value) = record.field(field) else {
        return false;
    };
    let value_lower = value.to_lowercase();
    if !criteria.contains.is_empty()
        && !criteria
            .contains
            .iter()
            .any(|c| value_lower.contains(&c.to_lowercase()))
    {
        return false;
    }
    if criteria
        .not_contains
        .iter()
        .any(|c| value_lower.contains(&c.to_lowercase()))
    {
        return false;
    }
    if let Some(re) = regex {
        if !re.is_match(&value) {
            return false;
        }
    }
    true
}
