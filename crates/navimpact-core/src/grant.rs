use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grant {
    pub id: String,
    pub title: String,
    #[serde(default, alias = "fundingBody", alias = "funding_body")]
    pub funder: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_status() -> String {
    "open".to_string()
}

impl Grant {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            funder: String::new(),
            amount: None,
            deadline: None,
            status: default_status(),
            category: String::new(),
            description: String::new(),
            tags: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_camel_case_funder_and_sparse_records() {
        let grant: Grant = serde_json::from_str(
            r#"{"id":"g-1","title":"Screen Fund","fundingBody":"VicScreen","amount":50000}"#,
        )
        .expect("parse grant");

        assert_eq!(grant.funder, "VicScreen");
        assert_eq!(grant.amount, Some(50000.0));
        assert_eq!(grant.status, "open");
        assert!(grant.tags.is_empty());
    }
}
