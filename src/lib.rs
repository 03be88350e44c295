pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{MemoryGateway, RestGateway};
pub use config::DeskConfig;
pub use crate::core::filter::{filter_quotes, public_quotes, CategoryFilter};
pub use crate::core::moderation::TransitionPolicy;
pub use crate::core::notice::{report, Action, Lang, Notice};
pub use crate::core::repository::QuoteRepository;
pub use domain::model::{
    Category, CategoryPatch, NewCategory, NewFeedback, NewQuote, NewQuoteRequest, Quote,
    QuotePatch, QuoteRequest, QuoteStatus,
};
pub use domain::ports::{Gateway, ListQuery};
pub use utils::error::{DeskError, Result};
