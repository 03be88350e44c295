use crate::core::filter::CategoryFilter;
use crate::core::notice::{Action, Lang};
use crate::domain::model::QuoteStatus;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "quote-desk")]
#[command(about = "Moderation desk for a bilingual quote collection")]
pub struct Cli {
    #[arg(long, short, help = "Path to the TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Override the display language (en, ta)")]
    pub lang: Option<Lang>,

    #[arg(long, help = "Print records as JSON")]
    pub json: bool,

    #[arg(long, short, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List every quote (admin view)
    Quotes {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        category: CategoryFilter,
        #[arg(long)]
        status: Option<QuoteStatus>,
    },
    /// List published quotes (public view)
    Public {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        category: CategoryFilter,
    },
    Categories,
    Requests,
    AddQuote {
        #[arg(long)]
        quote: String,
        #[arg(long)]
        author: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<Uuid>,
        #[arg(long, default_value = "draft")]
        status: QuoteStatus,
    },
    UpdateQuote {
        id: Uuid,
        #[arg(long)]
        quote: Option<String>,
        #[arg(long)]
        author: Option<String>,
        #[arg(long, conflicts_with = "clear_description")]
        description: Option<String>,
        #[arg(long)]
        clear_description: bool,
        #[arg(long, conflicts_with = "clear_category")]
        category: Option<Uuid>,
        #[arg(long)]
        clear_category: bool,
        #[arg(long)]
        status: Option<QuoteStatus>,
    },
    /// Move a draft to published
    Publish { id: Uuid },
    DeleteQuote { id: Uuid },
    AddCategory {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
    },
    UpdateCategory {
        id: Uuid,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a category that no quote uses
    DeleteCategory { id: Uuid },
    /// Turn a visitor request into a draft quote
    Promote { id: Uuid },
    Discard { id: Uuid },
    /// Submit a quote request as a visitor
    Request {
        #[arg(long)]
        name: String,
        #[arg(long)]
        quote: String,
        #[arg(long)]
        description: String,
    },
    Feedback {
        #[arg(long)]
        email: String,
        #[arg(long)]
        thoughts: String,
    },
    Stats,
}

impl Command {
    pub fn action(&self) -> Action {
        match self {
            Command::Quotes { .. } | Command::Public { .. } | Command::Stats => Action::FetchQuotes,
            Command::Categories => Action::FetchCategories,
            Command::Requests => Action::FetchRequests,
            Command::AddQuote { .. } => Action::AddQuote,
            Command::UpdateQuote { .. } => Action::UpdateQuote,
            Command::Publish { .. } => Action::PublishQuote,
            Command::DeleteQuote { .. } => Action::DeleteQuote,
            Command::AddCategory { .. } => Action::AddCategory,
            Command::UpdateCategory { .. } => Action::UpdateCategory,
            Command::DeleteCategory { .. } => Action::DeleteCategory,
            Command::Promote { .. } => Action::PromoteRequest,
            Command::Discard { .. } => Action::DiscardRequest,
            Command::Request { .. } => Action::SubmitRequest,
            Command::Feedback { .. } => Action::SubmitFeedback,
        }
    }

    /// 讀取類指令只輸出資料，不顯示成功通知
    pub fn is_read(&self) -> bool {
        matches!(
            self,
            Command::Quotes { .. }
                | Command::Public { .. }
                | Command::Categories
                | Command::Requests
                | Command::Stats
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quotes_filters() {
        let id = Uuid::new_v4();
        let id_text = id.to_string();
        let cli = Cli::parse_from([
            "quote-desk",
            "quotes",
            "--search",
            "hope",
            "--category",
            id_text.as_str(),
            "--status",
            "published",
        ]);

        match cli.command {
            Command::Quotes { search, category, status } => {
                assert_eq!(search, "hope");
                assert_eq!(category, CategoryFilter::Only(id));
                assert_eq!(status, Some(QuoteStatus::Published));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_flags() {
        let cli = Cli::parse_from(["quote-desk", "--lang", "ta", "--json", "stats"]);
        assert_eq!(cli.lang, Some(Lang::Ta));
        assert!(cli.json);
        assert!(cli.command.is_read());
        assert_eq!(cli.command.action(), Action::FetchQuotes);
    }

    #[test]
    fn test_clear_and_set_description_conflict() {
        let id = Uuid::new_v4().to_string();
        let result = Cli::try_parse_from([
            "quote-desk",
            "update-quote",
            id.as_str(),
            "--description",
            "x",
            "--clear-description",
        ]);
        assert!(result.is_err());
    }
}
