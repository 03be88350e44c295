use crate::domain::model::{Quote, QuoteStatus};
use std::str::FromStr;
use uuid::Uuid;

/// Category selector of the listing; `"all"` disables the category filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Uuid),
}

impl CategoryFilter {
    fn matches(&self, quote: &Quote) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(id) => quote.category_id == Some(*id),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(CategoryFilter::All)
        } else {
            Uuid::parse_str(s).map(CategoryFilter::Only)
        }
    }
}

fn contains_term(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn matches_search(quote: &Quote, needle: &str) -> bool {
    needle.is_empty()
        || contains_term(&quote.quote, needle)
        || contains_term(&quote.author, needle)
        || quote
            .description
            .as_deref()
            .is_some_and(|d| contains_term(d, needle))
}

/// Case-insensitive search over text, author and description, combined with the
/// category and optional status filters. Keeps the input order.
pub fn filter_quotes<'a>(
    quotes: &'a [Quote],
    term: &str,
    category: CategoryFilter,
    status: Option<QuoteStatus>,
) -> Vec<&'a Quote> {
    let needle = term.to_lowercase();
    quotes
        .iter()
        .filter(|q| matches_search(q, &needle))
        .filter(|q| category.matches(q))
        .filter(|q| status.map_or(true, |s| q.status == s))
        .collect()
}

/// 公開頁面：只顯示已發佈的引言
pub fn public_quotes<'a>(quotes: &'a [Quote], term: &str, category: CategoryFilter) -> Vec<&'a Quote> {
    filter_quotes(quotes, term, category, None)
        .into_iter()
        .filter(|q| q.is_public())
        .collect()
}
