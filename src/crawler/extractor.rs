// src/crawler/extractor.rs
use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

use crate::models::ContactRecord;

/// Lowercased host with any leading "www." stripped.
pub fn domain_from_url(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default().to_lowercase();
    host.strip_prefix("www.").unwrap_or(&host).to_string()
}

/// Multi-heuristic field extraction. Every field is resolved by an ordered
/// list of selectors/patterns where the first non-empty hit wins, so the
/// priority is explicit rather than implicit in call order. Pure function of
/// (document, url); an unrecognizable page yields empty fields, never an
/// error.
pub struct FieldExtractor {
    email_re: Regex,
    phone_na_re: Regex,
    phone_intl_re: Regex,
    legal_suffix_re: Regex,
    address_res: Vec<Regex>,
    social_res: Vec<Regex>,
    whitespace_re: Regex,
    nonword_re: Regex,
    name_selectors: Vec<Selector>,
    description_selectors: Vec<(Selector, bool)>,
    keywords_selector: Selector,
    person_selectors: Vec<Selector>,
    inner_name_selectors: Vec<Selector>,
    title_selectors: Vec<Selector>,
    page_title_selector: Selector,
}

const NOREPLY_PREFIXES: [&str; 3] = ["noreply", "no-reply", "donotreply"];

impl FieldExtractor {
    pub fn new() -> Self {
        let meta = true; // selector reads the content attribute
        Self {
            email_re: Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap(),
            phone_na_re: Regex::new(
                r"((?:\+\d{1,2}[\s.-]?)?\(?\d{3}\)?[\s.-]?\d{3}[\s.-]?\d{4})",
            )
            .unwrap(),
            phone_intl_re: Regex::new(r"(?:\+\d{1,3}[\s.-]?)?(?:\d{1,4}[\s.-]?){2,4}\d").unwrap(),
            legal_suffix_re: Regex::new(
                r"[A-Z][A-Za-z0-9 ]{0,20} (?:Inc\.|LLC|Ltd\.|Corp\.|Corp\b|Company\b)",
            )
            .unwrap(),
            address_res: vec![
                // US: 123 Main Street, Springfield, IL 62704
                Regex::new(r"\d+\s[A-Za-z ]+,\s[A-Za-z ]+,\s[A-Z]{2}\s\d{5}").unwrap(),
                // Canadian: 99 Bay Street, Toronto, ON M5J 2R8
                Regex::new(r"\d+\s[A-Za-z ]+,\s[A-Za-z ]+,\s[A-Z]{2}\s[A-Z]\d[A-Z]\s?\d[A-Z]\d")
                    .unwrap(),
                // Generic UK/EU street style
                Regex::new(r"\d+\s[A-Za-z ]+,\s[A-Za-z ]+\s[0-9A-Z]{2,8}").unwrap(),
            ],
            social_res: vec![
                Regex::new(r#"https?://(?:www\.)?linkedin\.com/[^\s"'<>]+"#).unwrap(),
                Regex::new(r#"https?://(?:www\.)?(?:twitter\.com|x\.com)/[^\s"'<>]+"#).unwrap(),
                Regex::new(r#"https?://(?:www\.)?facebook\.com/[^\s"'<>]+"#).unwrap(),
                Regex::new(r#"https?://(?:www\.)?instagram\.com/[^\s"'<>]+"#).unwrap(),
            ],
            whitespace_re: Regex::new(r"\s+").unwrap(),
            nonword_re: Regex::new(r"[^\w\s@.,()+/:-]").unwrap(),
            name_selectors: [r#"[itemprop="name"]"#, ".company-name", ".org-name"]
                .iter()
                .map(|s| Selector::parse(s).unwrap())
                .collect(),
            description_selectors: vec![
                (Selector::parse(r#"meta[name="description"]"#).unwrap(), meta),
                (
                    Selector::parse(r#"meta[property="og:description"]"#).unwrap(),
                    meta,
                ),
                (Selector::parse(".company-description").unwrap(), !meta),
                (Selector::parse(".about-us").unwrap(), !meta),
                (Selector::parse(r#"[itemprop="description"]"#).unwrap(), !meta),
            ],
            keywords_selector: Selector::parse(r#"meta[name="keywords"]"#).unwrap(),
            person_selectors: [
                ".team-member",
                ".employee",
                r#"[itemprop="employee"]"#,
                ".staff",
                ".contact-person",
            ]
            .iter()
            .map(|s| Selector::parse(s).unwrap())
            .collect(),
            inner_name_selectors: [".name", "h3"]
                .iter()
                .map(|s| Selector::parse(s).unwrap())
                .collect(),
            title_selectors: [".job-title", ".title", ".position"]
                .iter()
                .map(|s| Selector::parse(s).unwrap())
                .collect(),
            page_title_selector: Selector::parse("title").unwrap(),
        }
    }

    pub fn extract(&self, html: &str, source_url: &Url) -> ContactRecord {
        let mut record = ContactRecord {
            website_url: source_url.to_string(),
            domain: domain_from_url(source_url),
            ..Default::default()
        };
        if html.trim().is_empty() {
            return record;
        }

        let document = Html::parse_document(html);
        let visible = self.visible_text(&document);
        let cleaned = self.clean_text(&visible);

        record.company_name = self.extract_company_name(&document, &cleaned, &record.domain);
        record.description = self.extract_description(&document);
        record.industry_keywords = self.extract_keywords(&document);
        let (name, title) = self.extract_person(&document);
        record.contact_name = name;
        record.job_title = title;
        record.email = self.extract_email(html);
        record.phone = self.extract_phone(html);
        record.address = self.extract_address(&cleaned);
        record.social_links = self.extract_social_links(html);
        record.meta_description = self
            .first_meta_content(&document, r#"meta[name="description"]"#)
            .unwrap_or_default();
        record.meta_keywords = self
            .first_meta_content(&document, r#"meta[name="keywords"]"#)
            .unwrap_or_default();

        debug!(
            "Extracted {} populated fields from {}",
            record.populated_field_count(),
            source_url
        );
        record
    }

    fn visible_text(&self, document: &Html) -> String {
        document
            .root_element()
            .text()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Collapse whitespace and drop characters that are noise for the text
    /// heuristics. Commas and street punctuation stay so the address
    /// patterns can match.
    fn clean_text(&self, text: &str) -> String {
        let stripped = self.nonword_re.replace_all(text, "");
        self.whitespace_re
            .replace_all(&stripped, " ")
            .trim()
            .to_string()
    }

    fn extract_company_name(&self, document: &Html, cleaned_text: &str, domain: &str) -> String {
        for selector in &self.name_selectors {
            if let Some(element) = document.select(selector).next() {
                let text = element.text().collect::<String>().trim().to_string();
                if !text.is_empty() && text.len() < 100 {
                    return clean_company_name(&text);
                }
            }
        }
        if let Some(title) = document.select(&self.page_title_selector).next() {
            let text = title.text().collect::<String>().trim().to_string();
            if !text.is_empty() && text.len() < 100 {
                return clean_company_name(&text);
            }
        }
        if let Some(m) = self.legal_suffix_re.find(cleaned_text) {
            return m.as_str().trim().to_string();
        }
        domain
            .split('.')
            .next()
            .map(title_case_label)
            .unwrap_or_default()
    }

    fn extract_description(&self, document: &Html) -> String {
        for (selector, is_meta) in &self.description_selectors {
            if let Some(element) = document.select(selector).next() {
                let text = if *is_meta {
                    element.value().attr("content").unwrap_or("").to_string()
                } else {
                    element.text().collect::<String>()
                };
                let text = text.trim().to_string();
                if !text.is_empty() {
                    return truncate_chars(&text, 200);
                }
            }
        }
        String::new()
    }

    fn extract_keywords(&self, document: &Html) -> Vec<String> {
        let Some(content) = document
            .select(&self.keywords_selector)
            .next()
            .and_then(|el| el.value().attr("content"))
        else {
            return Vec::new();
        };
        let mut keywords = Vec::new();
        for keyword in content.split(',') {
            let keyword = keyword.trim();
            if !keyword.is_empty() && !keywords.iter().any(|k| k == keyword) {
                keywords.push(keyword.to_string());
            }
            if keywords.len() == 5 {
                break;
            }
        }
        keywords
    }

    fn extract_person(&self, document: &Html) -> (String, String) {
        let mut contact_name = String::new();
        'outer: for selector in &self.person_selectors {
            for container in document.select(selector) {
                let mut name = String::new();
                for inner in &self.inner_name_selectors {
                    if let Some(el) = container.select(inner).next() {
                        name = el.text().collect::<String>().trim().to_string();
                        if !name.is_empty() {
                            break;
                        }
                    }
                }
                if name.is_empty() {
                    name = container.text().collect::<String>().trim().to_string();
                }
                if !name.is_empty() {
                    contact_name = self.whitespace_re.replace_all(&name, " ").to_string();
                    break 'outer;
                }
            }
        }
        if contact_name.is_empty() {
            return (String::new(), String::new());
        }
        // Job title is only meaningful next to a person.
        let mut job_title = String::new();
        for selector in &self.title_selectors {
            if let Some(el) = document.select(selector).next() {
                let text = el.text().collect::<String>().trim().to_string();
                if !text.is_empty() {
                    job_title = self.whitespace_re.replace_all(&text, " ").to_string();
                    break;
                }
            }
        }
        (contact_name, job_title)
    }

    fn extract_email(&self, html: &str) -> String {
        for m in self.email_re.find_iter(html) {
            let email = m.as_str().to_lowercase();
            let local = email.split('@').next().unwrap_or("");
            if NOREPLY_PREFIXES.iter().any(|p| local.starts_with(p)) {
                continue;
            }
            return email;
        }
        String::new()
    }

    fn extract_phone(&self, html: &str) -> String {
        if let Some(caps) = self.phone_na_re.captures(html) {
            // Group-capture fallback: use the full match when the primary
            // group came up empty.
            let raw = caps
                .get(1)
                .filter(|m| !m.as_str().is_empty())
                .or_else(|| caps.get(0))
                .map(|m| m.as_str())
                .unwrap_or("");
            let normalized = normalize_phone(raw);
            if normalized.trim_start_matches('+').len() >= 10 {
                return normalized;
            }
        }
        for m in self.phone_intl_re.find_iter(html) {
            let normalized = normalize_phone(m.as_str());
            if normalized.trim_start_matches('+').len() >= 8 {
                return normalized;
            }
        }
        String::new()
    }

    fn extract_address(&self, cleaned_text: &str) -> String {
        for re in &self.address_res {
            if let Some(m) = re.find(cleaned_text) {
                return m.as_str().trim().to_string();
            }
        }
        String::new()
    }

    fn extract_social_links(&self, html: &str) -> Vec<String> {
        let mut links = Vec::new();
        for re in &self.social_res {
            for m in re.find_iter(html) {
                let link = m.as_str().to_string();
                if !links.contains(&link) {
                    links.push(link);
                }
            }
        }
        links
    }

    fn first_meta_content(&self, document: &Html, selector: &str) -> Option<String> {
        let selector = Selector::parse(selector).unwrap();
        document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn clean_company_name(name: &str) -> String {
    name.replace(" | ", " ")
        .replace(" - ", " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_label(label: &str) -> String {
    label
        .split(['-', '_'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn truncate_chars(text: &str, limit: usize) -> String {
    if text.chars().count() > limit {
        let truncated: String = text.chars().take(limit).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

fn normalize_phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}
