use crate::domain::model::{Category, Quote, QuoteStatus};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub id: Uuid,
    pub name: String,
    pub quotes: usize,
}

/// Numbers shown on the admin statistics tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total_quotes: usize,
    pub drafts: usize,
    pub published: usize,
    pub archived: usize,
    pub categories: usize,
    pub uncategorized: usize,
    pub average_per_category: usize,
    pub per_category: Vec<CategoryCount>,
}

pub fn compute(quotes: &[Quote], categories: &[Category]) -> CatalogStats {
    let count_status = |status: QuoteStatus| quotes.iter().filter(|q| q.status == status).count();

    let per_category = categories
        .iter()
        .map(|c| CategoryCount {
            id: c.id,
            name: c.name.clone(),
            quotes: quotes.iter().filter(|q| q.category_id == Some(c.id)).count(),
        })
        .collect();

    // 沒有分類時平均為 0
    let average_per_category = if categories.is_empty() {
        0
    } else {
        (quotes.len() as f64 / categories.len() as f64).round() as usize
    };

    CatalogStats {
        total_quotes: quotes.len(),
        drafts: count_status(QuoteStatus::Draft),
        published: count_status(QuoteStatus::Published),
        archived: count_status(QuoteStatus::Archived),
        categories: categories.len(),
        uncategorized: quotes.iter().filter(|q| q.category_id.is_none()).count(),
        average_per_category,
        per_category,
    }
}
