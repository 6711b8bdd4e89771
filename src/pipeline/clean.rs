// src/pipeline/clean.rs
use std::collections::HashSet;

use regex::Regex;
use tracing::debug;

use crate::models::ContactRecord;

const MAX_FIELD_LEN: usize = 500;

/// Normalize, validate, and deduplicate a record collection in one
/// order-preserving pass. Idempotent: cleaning a cleaned collection is a
/// no-op.
pub fn clean_records(records: Vec<ContactRecord>) -> Vec<ContactRecord> {
    let email_re = Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap();
    let mut seen_emails: HashSet<String> = HashSet::new();
    let mut seen_identities: HashSet<(String, String)> = HashSet::new();
    let mut cleaned = Vec::new();
    let input_len = records.len();

    for mut record in records {
        if !record.error.is_empty() {
            continue;
        }

        clean_record_fields(&mut record);
        if !record.email.is_empty() && !email_re.is_match(&record.email) {
            record.email = String::new();
        }

        if !record.email.is_empty() && !seen_emails.insert(record.email.clone()) {
            continue;
        }
        let identity = (record.company_name.clone(), record.website_url.clone());
        if !seen_identities.insert(identity) {
            continue;
        }
        cleaned.push(record);
    }

    debug!("Cleaned {} records down to {}", input_len, cleaned.len());
    cleaned
}

fn clean_record_fields(record: &mut ContactRecord) {
    clean_field(&mut record.company_name);
    clean_field(&mut record.website_url);
    clean_field(&mut record.domain);
    clean_field(&mut record.description);
    clean_field(&mut record.contact_name);
    clean_field(&mut record.job_title);
    clean_field(&mut record.email);
    clean_field(&mut record.phone);
    clean_field(&mut record.address);
    clean_field(&mut record.meta_description);
    clean_field(&mut record.meta_keywords);
    clean_field(&mut record.contact_page_url);
    clean_sequence(&mut record.industry_keywords);
    clean_sequence(&mut record.social_links);
}

/// Collapse whitespace, strip non-printable characters, truncate oversized
/// values to 497 chars plus an ellipsis marker.
fn clean_field(value: &mut String) {
    let stripped: String = value
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .filter(|c| !c.is_control())
        .collect();
    let collapsed = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    *value = if collapsed.chars().count() > MAX_FIELD_LEN {
        let truncated: String = collapsed.chars().take(MAX_FIELD_LEN - 3).collect();
        format!("{}...", truncated)
    } else {
        collapsed
    };
}

fn clean_sequence(values: &mut Vec<String>) {
    let mut result: Vec<String> = Vec::new();
    for value in values.iter() {
        let mut value = value.clone();
        clean_field(&mut value);
        if !value.is_empty() && !result.contains(&value) {
            result.push(value);
        }
    }
    *values = result;
}
