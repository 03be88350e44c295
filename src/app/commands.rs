use crate::config::cli::Command;
use crate::core::repository::QuoteRepository;
use crate::core::stats::CatalogStats;
use crate::domain::model::{
    Category, CategoryPatch, NewCategory, NewFeedback, NewQuote, NewQuoteRequest, Quote,
    QuotePatch, QuoteRequest,
};
use crate::domain::ports::Gateway;
use crate::utils::error::Result;
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

/// Runs one CLI command and renders its output (text or JSON).
pub async fn execute<G: Gateway>(
    repo: &QuoteRepository<G>,
    command: Command,
    json: bool,
) -> Result<String> {
    match command {
        Command::Quotes {
            search,
            category,
            status,
        } => {
            let quotes = match status {
                Some(status) => repo.filter_quotes_by_status(&search, category, status).await?,
                None => repo.filter_quotes(&search, category).await?,
            };
            let categories = repo.list_categories().await?;
            render_quotes(&quotes, &categories, json)
        }
        Command::Public { search, category } => {
            let quotes = repo.public_quotes(&search, category).await?;
            let categories = repo.list_categories().await?;
            render_quotes(&quotes, &categories, json)
        }
        Command::Categories => {
            let categories = repo.list_categories().await?;
            let stats = repo.stats().await?;
            render_categories(&categories, &stats, json)
        }
        Command::Requests => {
            let requests = repo.list_requests().await?;
            render_requests(&requests, json)
        }
        Command::Stats => {
            let stats = repo.stats().await?;
            render_stats(&stats, json)
        }
        Command::AddQuote {
            quote,
            author,
            description,
            category,
            status,
        } => {
            let new = NewQuote {
                quote,
                author,
                description,
                category_id: category,
                status,
                request_id: None,
            };
            let quote = repo.add_quote(new).await?;
            render_one(&quote, json)
        }
        Command::UpdateQuote {
            id,
            quote,
            author,
            description,
            clear_description,
            category,
            clear_category,
            status,
        } => {
            let patch = QuotePatch {
                quote,
                author,
                description: if clear_description { Some(None) } else { description.map(Some) },
                category_id: if clear_category { Some(None) } else { category.map(Some) },
                status,
            };
            let quote = repo.update_quote(id, patch).await?;
            render_one(&quote, json)
        }
        Command::Publish { id } => {
            let quote = repo.publish_quote(id).await?;
            render_one(&quote, json)
        }
        Command::DeleteQuote { id } => {
            repo.delete_quote(id).await?;
            Ok(String::new())
        }
        Command::AddCategory { name, description } => {
            let category = repo.add_category(NewCategory { name, description }).await?;
            render_one(&category, json)
        }
        Command::UpdateCategory {
            id,
            name,
            description,
        } => {
            let patch = CategoryPatch {
                name,
                description: description.map(Some),
            };
            let category = repo.update_category(id, patch).await?;
            render_one(&category, json)
        }
        Command::DeleteCategory { id } => {
            repo.delete_category(id).await?;
            Ok(String::new())
        }
        Command::Promote { id } => {
            let quote = repo.promote_request(id).await?;
            render_one(&quote, json)
        }
        Command::Discard { id } => {
            repo.discard_request(id).await?;
            Ok(String::new())
        }
        Command::Request {
            name,
            quote,
            description,
        } => {
            let request = repo
                .submit_request(NewQuoteRequest {
                    name,
                    quote,
                    description,
                })
                .await?;
            render_one(&request, json)
        }
        Command::Feedback { email, thoughts } => {
            repo.submit_feedback(NewFeedback { email, thoughts }).await?;
            Ok(String::new())
        }
    }
}

fn render_one<T: Serialize + std::fmt::Debug>(record: &T, json: bool) -> Result<String> {
    if json {
        Ok(serde_json::to_string_pretty(record)?)
    } else {
        Ok(format!("{:#?}", record))
    }
}

pub fn render_quotes(quotes: &[Quote], categories: &[Category], json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(quotes)?);
    }

    let names: HashMap<Uuid, &str> = categories.iter().map(|c| (c.id, c.name.as_str())).collect();
    let mut lines = vec![format!("{} quotes", quotes.len())];
    for quote in quotes {
        let category = quote
            .category_id
            .and_then(|id| names.get(&id).copied())
            .unwrap_or("-");
        lines.push(format!(
            "{} [{}] \"{}\" - {} ({})",
            quote.id, quote.status, quote.quote, quote.author, category
        ));
    }
    Ok(lines.join("\n"))
}

fn render_categories(categories: &[Category], stats: &CatalogStats, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(categories)?);
    }

    let counts: HashMap<Uuid, usize> = stats.per_category.iter().map(|c| (c.id, c.quotes)).collect();
    let lines: Vec<String> = categories
        .iter()
        .map(|c| {
            format!(
                "{} {} ({} quotes){}",
                c.id,
                c.name,
                counts.get(&c.id).copied().unwrap_or(0),
                c.description
                    .as_deref()
                    .map(|d| format!(": {}", d))
                    .unwrap_or_default()
            )
        })
        .collect();
    Ok(lines.join("\n"))
}

fn render_requests(requests: &[QuoteRequest], json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(requests)?);
    }

    let lines: Vec<String> = requests
        .iter()
        .map(|r| format!("{} {} \"{}\" from {}", r.id, r.created_at.format("%Y-%m-%d"), r.quote, r.name))
        .collect();
    Ok(lines.join("\n"))
}

fn render_stats(stats: &CatalogStats, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(stats)?);
    }

    Ok(format!(
        "Total quotes: {} (draft {}, published {}, archived {})\nCategories: {}\nAverage per category: {}\nUncategorized: {}",
        stats.total_quotes,
        stats.drafts,
        stats.published,
        stats.archived,
        stats.categories,
        stats.average_per_category,
        stats.uncategorized
    ))
}
