use crate::core::cache::{Cache, Collection};
use crate::core::filter::{self, CategoryFilter};
use crate::core::integrity;
use crate::core::locks::KeyedLocks;
use crate::core::moderation::{self, TransitionPolicy};
use crate::core::stats::{self, CatalogStats};
use crate::domain::model::{
    decode_row, decode_rows, Category, CategoryPatch, Feedback, NewCategory, NewFeedback,
    NewQuote, NewQuoteRequest, Quote, QuotePatch, QuoteRequest, QuoteStatus, Table, TableRecord,
};
use crate::domain::ports::{Gateway, ListQuery};
use crate::utils::error::{DeskError, Result};
use crate::utils::validation::{validate_email, validate_required_text};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Cached access to quotes, categories and requests, plus every moderation action.
///
/// Writes go straight to the gateway; the local cache is only invalidated after the
/// backend acknowledged the write, so a failed call leaves the cached state untouched.
pub struct QuoteRepository<G: Gateway> {
    gateway: G,
    cache: RwLock<Cache>,
    policy: TransitionPolicy,
    category_locks: KeyedLocks,
    request_locks: KeyedLocks,
}

impl<G: Gateway> QuoteRepository<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            cache: RwLock::new(Cache::new()),
            policy: TransitionPolicy::default(),
            category_locks: KeyedLocks::new(),
            request_locks: KeyedLocks::new(),
        }
    }

    pub fn with_policy(mut self, policy: TransitionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> TransitionPolicy {
        self.policy
    }

    async fn invalidate(&self, collections: &[Collection]) {
        let mut cache = self.cache.write().await;
        for collection in collections {
            cache.invalidate(*collection);
        }
    }

    async fn fetch_one<T: TableRecord>(&self, id: Uuid) -> Result<T> {
        let rows = self
            .gateway
            .list(T::TABLE, &ListQuery::new().eq("id", id).limit(1))
            .await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| DeskError::not_found(T::TABLE.entity_name(), id))?;
        decode_row(row)
    }

    // ---- reads ----

    pub async fn list_quotes(&self) -> Result<Arc<Vec<Quote>>> {
        let generation = {
            let cache = self.cache.read().await;
            if let Some(quotes) = cache.quotes() {
                return Ok(quotes);
            }
            cache.generation(Collection::Quotes)
        };

        let rows = self
            .gateway
            .list(Table::Quotes, &ListQuery::new().order_by("created_at", false))
            .await?;
        let quotes = decode_rows(rows)?;
        tracing::debug!("Fetched {} quotes", quotes.len());

        Ok(self.cache.write().await.store_quotes(generation, quotes))
    }

    pub async fn list_categories(&self) -> Result<Arc<Vec<Category>>> {
        let generation = {
            let cache = self.cache.read().await;
            if let Some(categories) = cache.categories() {
                return Ok(categories);
            }
            cache.generation(Collection::Categories)
        };

        let rows = self
            .gateway
            .list(Table::Categories, &ListQuery::new().order_by("name", true))
            .await?;
        let categories = decode_rows(rows)?;

        Ok(self.cache.write().await.store_categories(generation, categories))
    }

    pub async fn list_requests(&self) -> Result<Arc<Vec<QuoteRequest>>> {
        let generation = {
            let cache = self.cache.read().await;
            if let Some(requests) = cache.requests() {
                return Ok(requests);
            }
            cache.generation(Collection::Requests)
        };

        let rows = self
            .gateway
            .list(Table::RequestQuotes, &ListQuery::new().order_by("created_at", false))
            .await?;
        let requests = decode_rows(rows)?;

        Ok(self.cache.write().await.store_requests(generation, requests))
    }

    /// Drops every snapshot and reloads quotes and categories.
    pub async fn refresh(&self) -> Result<()> {
        self.cache.write().await.invalidate_all();
        tokio::try_join!(self.list_quotes(), self.list_categories())?;
        Ok(())
    }

    pub async fn filter_quotes(&self, term: &str, category: CategoryFilter) -> Result<Vec<Quote>> {
        let quotes = self.list_quotes().await?;
        Ok(filter::filter_quotes(&quotes, term, category, None)
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn filter_quotes_by_status(
        &self,
        term: &str,
        category: CategoryFilter,
        status: QuoteStatus,
    ) -> Result<Vec<Quote>> {
        let quotes = self.list_quotes().await?;
        Ok(filter::filter_quotes(&quotes, term, category, Some(status))
            .into_iter()
            .cloned()
            .collect())
    }

    /// The public listing: published quotes only.
    pub async fn public_quotes(&self, term: &str, category: CategoryFilter) -> Result<Vec<Quote>> {
        let quotes = self.list_quotes().await?;
        Ok(filter::public_quotes(&quotes, term, category)
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn stats(&self) -> Result<CatalogStats> {
        let (quotes, categories) = tokio::try_join!(self.list_quotes(), self.list_categories())?;
        Ok(stats::compute(&quotes, &categories))
    }

    // ---- quotes ----

    pub async fn add_quote(&self, new: NewQuote) -> Result<Quote> {
        // 持有分類鎖，避免與刪除分類交錯
        let _guard = match new.category_id {
            Some(category_id) => {
                let guard = self.category_locks.acquire(category_id).await;
                integrity::ensure_category_exists(&self.gateway, category_id).await?;
                Some(guard)
            }
            None => None,
        };

        let row = self
            .gateway
            .insert(Table::Quotes, serde_json::to_value(&new)?)
            .await?;
        let quote: Quote = decode_row(row)?;

        self.invalidate(&[Collection::Quotes]).await;
        tracing::info!("Added quote {} by {} ({})", quote.id, quote.author, quote.status);
        Ok(quote)
    }

    /// Admin edit. The status check and the write are not serialized per quote, so two
    /// concurrent edits can both pass the strict table; the backend keeps the last write.
    pub async fn update_quote(&self, id: Uuid, patch: QuotePatch) -> Result<Quote> {
        if patch.is_empty() {
            return Err(DeskError::validation("patch", "nothing to update"));
        }

        let _guard = match patch.category_id {
            Some(Some(category_id)) => {
                let guard = self.category_locks.acquire(category_id).await;
                integrity::ensure_category_exists(&self.gateway, category_id).await?;
                Some(guard)
            }
            _ => None,
        };

        let current: Quote = self.fetch_one(id).await?;
        if let Some(target) = patch.status {
            self.policy.check_edit(current.status, target)?;
        }

        let row = self
            .gateway
            .update(Table::Quotes, id, serde_json::to_value(&patch)?)
            .await?;
        let quote: Quote = decode_row(row)?;

        self.invalidate(&[Collection::Quotes]).await;
        tracing::info!("Updated quote {} ({} -> {})", id, current.status, quote.status);
        Ok(quote)
    }

    pub async fn publish_quote(&self, id: Uuid) -> Result<Quote> {
        let current: Quote = self.fetch_one(id).await?;
        moderation::check_publish(current.status)?;

        let row = self
            .gateway
            .update(
                Table::Quotes,
                id,
                serde_json::to_value(QuotePatch::status(QuoteStatus::Published))?,
            )
            .await?;
        let quote: Quote = decode_row(row)?;

        self.invalidate(&[Collection::Quotes]).await;
        tracing::info!("Published quote {}", id);
        Ok(quote)
    }

    pub async fn delete_quote(&self, id: Uuid) -> Result<()> {
        let _quote: Quote = self.fetch_one(id).await?;
        self.gateway.delete(Table::Quotes, id).await?;
        self.invalidate(&[Collection::Quotes]).await;
        tracing::info!("Deleted quote {}", id);
        Ok(())
    }

    // ---- categories ----

    pub async fn add_category(&self, new: NewCategory) -> Result<Category> {
        let row = self
            .gateway
            .insert(Table::Categories, serde_json::to_value(&new)?)
            .await?;
        let category: Category = decode_row(row)?;

        self.invalidate(&[Collection::Categories]).await;
        tracing::info!("Added category {} ({})", category.name, category.id);
        Ok(category)
    }

    pub async fn update_category(&self, id: Uuid, patch: CategoryPatch) -> Result<Category> {
        let row = self
            .gateway
            .update(Table::Categories, id, serde_json::to_value(&patch)?)
            .await?;
        let category: Category = decode_row(row)?;

        self.invalidate(&[Collection::Categories]).await;
        tracing::info!("Updated category {}", id);
        Ok(category)
    }

    /// Refuses with `ConflictError` while any quote still references the category.
    pub async fn delete_category(&self, id: Uuid) -> Result<()> {
        let _guard = self.category_locks.acquire(id).await;

        let _category: Category = self.fetch_one(id).await?;
        integrity::ensure_category_unused(&self.gateway, id).await?;
        self.gateway.delete(Table::Categories, id).await?;

        self.invalidate(&[Collection::Categories, Collection::Quotes]).await;
        tracing::info!("Deleted category {}", id);
        Ok(())
    }

    // ---- requests ----

    /// Visitor intake. Name, quote and description are all required.
    pub async fn submit_request(&self, new: NewQuoteRequest) -> Result<QuoteRequest> {
        validate_required_text("name", &new.name)?;
        validate_required_text("quote", &new.quote)?;
        validate_required_text("description", &new.description)?;

        let row = self
            .gateway
            .insert(Table::RequestQuotes, serde_json::to_value(&new)?)
            .await?;
        let request: QuoteRequest = decode_row(row)?;

        self.invalidate(&[Collection::Requests]).await;
        tracing::info!("Received quote request {} from {}", request.id, request.name);
        Ok(request)
    }

    /// Turns a request into a draft quote and removes the request.
    ///
    /// The quote remembers its `request_id`. If an earlier attempt created the quote but
    /// failed to delete the request, a retry reuses that quote instead of inserting again.
    pub async fn promote_request(&self, id: Uuid) -> Result<Quote> {
        let _guard = self.request_locks.acquire(id).await;

        let request: QuoteRequest = self.fetch_one(id).await?;

        let existing = self
            .gateway
            .list(Table::Quotes, &ListQuery::new().eq("request_id", id).limit(1))
            .await?;
        let quote: Quote = match existing.into_iter().next() {
            Some(row) => {
                tracing::warn!("Request {} was already promoted, finishing cleanup", id);
                decode_row(row)?
            }
            None => {
                let new = NewQuote {
                    quote: request.quote.clone(),
                    author: request.name.clone(),
                    description: request.description.clone(),
                    category_id: None,
                    status: moderation::initial_status(None),
                    request_id: Some(request.id),
                };
                let row = self
                    .gateway
                    .insert(Table::Quotes, serde_json::to_value(&new)?)
                    .await?;
                // 新增成功後才寫入快取失效，刪除失敗時草稿仍可見
                self.invalidate(&[Collection::Quotes]).await;
                decode_row(row)?
            }
        };

        self.gateway.delete(Table::RequestQuotes, id).await?;
        self.invalidate(&[Collection::Quotes, Collection::Requests]).await;

        tracing::info!("Promoted request {} to draft quote {}", id, quote.id);
        Ok(quote)
    }

    pub async fn discard_request(&self, id: Uuid) -> Result<()> {
        let _guard = self.request_locks.acquire(id).await;

        let _request: QuoteRequest = self.fetch_one(id).await?;
        self.gateway.delete(Table::RequestQuotes, id).await?;

        self.invalidate(&[Collection::Requests]).await;
        tracing::info!("Discarded request {}", id);
        Ok(())
    }

    // ---- feedback ----

    pub async fn submit_feedback(&self, new: NewFeedback) -> Result<Feedback> {
        validate_email("email", &new.email)?;
        validate_required_text("thoughts", &new.thoughts)?;

        let row = self
            .gateway
            .insert(Table::Feedbacks, serde_json::to_value(&new)?)
            .await?;
        let feedback: Feedback = decode_row(row)?;

        tracing::info!("Received feedback {}", feedback.id);
        Ok(feedback)
    }
}
