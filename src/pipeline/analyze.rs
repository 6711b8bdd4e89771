// src/pipeline/analyze.rs
use serde::Serialize;

use crate::models::ContactRecord;

/// Immutable aggregate summary of a record collection, computed fresh each
/// time. Frequency tables keep first-encountered order; the top-5 lists are
/// stable-sorted by descending count, so ties stay in encounter order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub total: usize,
    pub with_email: usize,
    pub with_phone: usize,
    pub with_contact_name: usize,
    pub with_job_title: usize,
    pub industries: Vec<(String, usize)>,
    pub domains: Vec<(String, usize)>,
    pub top_industries: Vec<(String, usize)>,
    pub top_domains: Vec<(String, usize)>,
}

pub fn analyze_records(records: &[ContactRecord]) -> AnalysisReport {
    let mut report = AnalysisReport {
        total: records.len(),
        ..Default::default()
    };

    for record in records {
        if !record.email.is_empty() {
            report.with_email += 1;
        }
        if !record.phone.is_empty() {
            report.with_phone += 1;
        }
        if !record.contact_name.is_empty() {
            report.with_contact_name += 1;
        }
        if !record.job_title.is_empty() {
            report.with_job_title += 1;
        }
        for keyword in &record.industry_keywords {
            let keyword = keyword.trim();
            if !keyword.is_empty() {
                bump(&mut report.industries, keyword);
            }
        }
        if !record.domain.is_empty() {
            bump(&mut report.domains, &record.domain);
        }
    }

    report.top_industries = top_n(&report.industries, 5);
    report.top_domains = top_n(&report.domains, 5);
    report
}

/// Increment a key in a first-encountered-order frequency table.
fn bump(table: &mut Vec<(String, usize)>, key: &str) {
    match table.iter_mut().find(|(k, _)| k == key) {
        Some((_, count)) => *count += 1,
        None => table.push((key.to_string(), 1)),
    }
}

fn top_n(table: &[(String, usize)], n: usize) -> Vec<(String, usize)> {
    let mut sorted = table.to_vec();
    // sort_by is stable: equal counts keep first-encountered order.
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    sorted.truncate(n);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(domain: &str, keywords: &[&str]) -> ContactRecord {
        ContactRecord {
            domain: domain.to_string(),
            industry_keywords: keywords.iter().map(|k| k.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn empty_input_yields_zero_report() {
        let report = analyze_records(&[]);
        assert_eq!(report.total, 0);
        assert_eq!(report.with_email, 0);
        assert!(report.top_industries.is_empty());
        assert!(report.top_domains.is_empty());
    }

    #[test]
    fn counts_populated_contact_fields() {
        let mut a = record("a.example", &[]);
        a.email = "x@a.example".into();
        a.phone = "5551234567".into();
        let mut b = record("b.example", &[]);
        b.contact_name = "Jane Doe".into();
        b.job_title = "CEO".into();
        let report = analyze_records(&[a, b]);
        assert_eq!(report.total, 2);
        assert_eq!(report.with_email, 1);
        assert_eq!(report.with_phone, 1);
        assert_eq!(report.with_contact_name, 1);
        assert_eq!(report.with_job_title, 1);
    }

    #[test]
    fn top_lists_are_bounded_and_sorted() {
        let records: Vec<ContactRecord> = vec![
            record("a.example", &["k1", "k2", "k3", "k4", "k5", "k6", "k7"]),
            record("a.example", &["k3"]),
            record("b.example", &["k3", "k5"]),
        ];
        let report = analyze_records(&records);
        assert!(report.top_industries.len() <= 5);
        assert_eq!(report.top_industries[0], ("k3".to_string(), 3));
        assert_eq!(report.top_industries[1], ("k5".to_string(), 2));
        for pair in report.top_industries.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
        assert_eq!(report.top_domains[0], ("a.example".to_string(), 2));
    }

    #[test]
    fn ties_keep_first_encountered_order() {
        let records = vec![
            record("a.example", &["alpha"]),
            record("b.example", &["beta"]),
            record("c.example", &["gamma"]),
        ];
        let report = analyze_records(&records);
        assert_eq!(
            report.top_industries,
            vec![
                ("alpha".to_string(), 1),
                ("beta".to_string(), 1),
                ("gamma".to_string(), 1)
            ]
        );
    }

    #[test]
    fn blank_keywords_are_ignored() {
        let records = vec![record("a.example", &["", "  ", "real"])];
        let report = analyze_records(&records);
        assert_eq!(report.industries, vec![("real".to_string(), 1)]);
    }
}
