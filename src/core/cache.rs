use crate::domain::model::{Category, Quote, QuoteRequest};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Quotes,
    Categories,
    Requests,
}

#[derive(Debug)]
struct Slot<T> {
    data: Option<Arc<Vec<T>>>,
    generation: u64,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            data: None,
            generation: 0,
        }
    }
}

impl<T> Slot<T> {
    fn invalidate(&mut self) {
        self.data = None;
        self.generation += 1;
    }

    /// 只有在抓取期間沒有被 invalidate 才寫入，避免舊資料蓋掉新狀態
    fn store(&mut self, generation: u64, rows: Vec<T>) -> Arc<Vec<T>> {
        let rows = Arc::new(rows);
        if generation == self.generation {
            self.data = Some(rows.clone());
        }
        rows
    }
}

/// Read-through snapshot of the three listings, invalidated after every write.
#[derive(Debug, Default)]
pub struct Cache {
    quotes: Slot<Quote>,
    categories: Slot<Category>,
    requests: Slot<QuoteRequest>,
}

impl Cache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invalidate(&mut self, collection: Collection) {
        tracing::debug!("Invalidating {:?} cache", collection);
        match collection {
            Collection::Quotes => self.quotes.invalidate(),
            Collection::Categories => self.categories.invalidate(),
            Collection::Requests => self.requests.invalidate(),
        }
    }

    pub fn invalidate_all(&mut self) {
        self.invalidate(Collection::Quotes);
        self.invalidate(Collection::Categories);
        self.invalidate(Collection::Requests);
    }

    pub fn generation(&self, collection: Collection) -> u64 {
        match collection {
            Collection::Quotes => self.quotes.generation,
            Collection::Categories => self.categories.generation,
            Collection::Requests => self.requests.generation,
        }
    }

    pub fn is_fresh(&self, collection: Collection) -> bool {
        match collection {
            Collection::Quotes => self.quotes.data.is_some(),
            Collection::Categories => self.categories.data.is_some(),
            Collection::Requests => self.requests.data.is_some(),
        }
    }

    pub fn quotes(&self) -> Option<Arc<Vec<Quote>>> {
        self.quotes.data.clone()
    }

    pub fn categories(&self) -> Option<Arc<Vec<Category>>> {
        self.categories.data.clone()
    }

    pub fn requests(&self) -> Option<Arc<Vec<QuoteRequest>>> {
        self.requests.data.clone()
    }

    pub fn store_quotes(&mut self, generation: u64, rows: Vec<Quote>) -> Arc<Vec<Quote>> {
        self.quotes.store(generation, rows)
    }

    pub fn store_categories(&mut self, generation: u64, rows: Vec<Category>) -> Arc<Vec<Category>> {
        self.categories.store(generation, rows)
    }

    pub fn store_requests(&mut self, generation: u64, rows: Vec<QuoteRequest>) -> Arc<Vec<QuoteRequest>> {
        self.requests.store(generation, rows)
    }
}
