// src/models.rs
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// One extracted entity. Every field defaults to empty; absence is always
/// the empty string / empty vec, never a null-distinct value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactRecord {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub website_url: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub industry_keywords: Vec<String>,
    #[serde(default)]
    pub contact_name: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub social_links: Vec<String>,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub meta_keywords: String,
    #[serde(default)]
    pub contact_page_url: String,
    /// Set when the record came out of a failed crawl. The pipeline drops
    /// such records unconditionally.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
}

impl ContactRecord {
    /// Field names accepted by `field()`, in record order.
    pub const FIELD_NAMES: [&'static str; 14] = [
        "company_name",
        "website_url",
        "domain",
        "description",
        "industry_keywords",
        "contact_name",
        "job_title",
        "email",
        "phone",
        "address",
        "social_links",
        "meta_description",
        "meta_keywords",
        "contact_page_url",
    ];

    /// By-name access to a data field. Sequence fields are joined with ", ".
    /// Unknown names yield `None` (the filter engine treats that as a failed
    /// predicate).
    pub fn field(&self, name: &str) -> Option<String> {
        match name {
            "company_name" => Some(self.company_name.clone()),
            "website_url" => Some(self.website_url.clone()),
            "domain" => Some(self.domain.clone()),
            "description" => Some(self.description.clone()),
            "industry_keywords" => Some(self.industry_keywords.join(", ")),
            "contact_name" => Some(self.contact_name.clone()),
            "job_title" => Some(self.job_title.clone()),
            "email" => Some(self.email.clone()),
            "phone" => Some(self.phone.clone()),
            "address" => Some(self.address.clone()),
            "social_links" => Some(self.social_links.join(", ")),
            "meta_description" => Some(self.meta_description.clone()),
            "meta_keywords" => Some(self.meta_keywords.clone()),
            "contact_page_url" => Some(self.contact_page_url.clone()),
            _ => None,
        }
    }

    /// Number of non-empty data fields. The error marker does not count.
    pub fn populated_field_count(&self) -> usize {
        Self::FIELD_NAMES
            .iter()
            .filter(|name| self.field(name).map(|v| !v.is_empty()).unwrap_or(false))
            .count()
    }

    /// Lowercased concatenation of every field value, for keyword matching.
    pub fn searchable_text(&self) -> String {
        Self::FIELD_NAMES
            .iter()
            .filter_map(|name| self.field(name))
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}
