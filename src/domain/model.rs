use crate::utils::error::{DeskError, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Backend tables the desk reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Quotes,
    Categories,
    RequestQuotes,
    Feedbacks,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Quotes => "quotes",
            Table::Categories => "categories",
            Table::RequestQuotes => "request_quotes",
            Table::Feedbacks => "feedbacks",
        }
    }

    pub fn entity_name(&self) -> &'static str {
        match self {
            Table::Quotes => "quote",
            Table::Categories => "category",
            Table::RequestQuotes => "quote request",
            Table::Feedbacks => "feedback",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl QuoteStatus {
    pub const ALL: [QuoteStatus; 3] = [
        QuoteStatus::Draft,
        QuoteStatus::Published,
        QuoteStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Draft => "draft",
            QuoteStatus::Published => "published",
            QuoteStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuoteStatus {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(QuoteStatus::Draft),
            "published" => Ok(QuoteStatus::Published),
            "archived" => Ok(QuoteStatus::Archived),
            other => Err(DeskError::validation(
                "status",
                format!("unknown status '{}', expected draft, published or archived", other),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub id: Uuid,
    pub quote: String,
    pub author: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub status: QuoteStatus,
    /// 由哪一筆投稿晉升而來
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quote {
    pub fn is_public(&self) -> bool {
        self.status == QuoteStatus::Published
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewQuote {
    pub quote: String,
    pub author: String,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub status: QuoteStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<Uuid>,
}

impl NewQuote {
    pub fn new(quote: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            quote: quote.into(),
            author: author.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_status(mut self, status: QuoteStatus) -> Self {
        self.status = status;
        self
    }
}

/// Partial update for a quote. `Some(None)` clears a nullable column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuotePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Option<Uuid>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<QuoteStatus>,
}

impl QuotePatch {
    pub fn status(status: QuoteStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl NewCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

/// 訪客投稿，等待管理員晉升或捨棄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub id: Uuid,
    pub name: String,
    pub quote: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewQuoteRequest {
    pub name: String,
    pub quote: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub id: Uuid,
    pub email: String,
    pub thoughts: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewFeedback {
    pub email: String,
    pub thoughts: String,
}

/// A typed record living in one backend table.
pub trait TableRecord: DeserializeOwned {
    const TABLE: Table;
}

impl TableRecord for Quote {
    const TABLE: Table = Table::Quotes;
}

impl TableRecord for Category {
    const TABLE: Table = Table::Categories;
}

impl TableRecord for QuoteRequest {
    const TABLE: Table = Table::RequestQuotes;
}

impl TableRecord for Feedback {
    const TABLE: Table = Table::Feedbacks;
}

/// 將後端回傳的 JSON 轉為型別化記錄，欄位不符即失敗
pub fn decode_row<T: TableRecord>(row: serde_json::Value) -> Result<T> {
    serde_json::from_value(row).map_err(|e| DeskError::MalformedRecord {
        table: T::TABLE.to_string(),
        message: e.to_string(),
    })
}

pub fn decode_rows<T: TableRecord>(rows: Vec<serde_json::Value>) -> Result<Vec<T>> {
    rows.into_iter().map(decode_row).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_quote_with_defaults() {
        let row = json!({
            "id": "5f1b0a8e-8d6a-4c1e-9a55-0d2f3f1c2b11",
            "quote": "Hope is not a strategy",
            "author": "A. Nonymous",
            "created_at": "2024-05-01T10:00:00.123456+00:00",
            "updated_at": "2024-05-01T10:00:00+00:00"
        });

        let quote: Quote = decode_row(row).unwrap();
        assert_eq!(quote.status, QuoteStatus::Draft);
        assert_eq!(quote.category_id, None);
        assert_eq!(quote.description, None);
    }

    #[test]
    fn test_decode_rejects_missing_author() {
        let row = json!({
            "id": "5f1b0a8e-8d6a-4c1e-9a55-0d2f3f1c2b11",
            "quote": "text",
            "created_at": "2024-05-01T10:00:00+00:00",
            "updated_at": "2024-05-01T10:00:00+00:00"
        });

        let err = decode_row::<Quote>(row).unwrap_err();
        assert!(matches!(err, DeskError::MalformedRecord { ref table, .. } if table == "quotes"));
    }

    #[test]
    fn test_decode_rejects_unknown_status() {
        let row = json!({
            "id": "5f1b0a8e-8d6a-4c1e-9a55-0d2f3f1c2b11",
            "quote": "text",
            "author": "someone",
            "status": "pending",
            "created_at": "2024-05-01T10:00:00+00:00",
            "updated_at": "2024-05-01T10:00:00+00:00"
        });

        assert!(decode_row::<Quote>(row).is_err());
    }

    #[test]
    fn test_patch_serializes_only_present_fields() {
        let patch = QuotePatch {
            description: Some(None),
            status: Some(QuoteStatus::Published),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, json!({"description": null, "status": "published"}));
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("Published".parse::<QuoteStatus>().unwrap(), QuoteStatus::Published);
        assert!("pending".parse::<QuoteStatus>().is_err());
    }
}
