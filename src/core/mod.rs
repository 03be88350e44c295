pub mod cache;
pub mod filter;
pub mod integrity;
pub mod locks;
pub mod moderation;
pub mod notice;
pub mod repository;
pub mod stats;

pub use crate::domain::model::{Category, Quote, QuoteRequest, QuoteStatus};
pub use crate::domain::ports::Gateway;
pub use crate::utils::error::Result;
