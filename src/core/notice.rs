use crate::utils::error::{DeskError, ErrorCategory};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display language of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Ta,
}

impl FromStr for Lang {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Lang::En),
            "ta" => Ok(Lang::Ta),
            other => Err(DeskError::InvalidConfigValueError {
                field: "display.language".to_string(),
                value: other.to_string(),
                reason: "Supported languages: en, ta".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Destructive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    FetchQuotes,
    FetchCategories,
    FetchRequests,
    AddQuote,
    UpdateQuote,
    PublishQuote,
    DeleteQuote,
    AddCategory,
    UpdateCategory,
    DeleteCategory,
    PromoteRequest,
    DiscardRequest,
    SubmitRequest,
    SubmitFeedback,
}

impl Action {
    fn success_text(&self, lang: Lang) -> (&'static str, &'static str) {
        use Action as A;
        match (self, lang) {
            (A::FetchQuotes, Lang::En) => ("Quotes loaded", "The quote list is up to date"),
            (A::FetchQuotes, Lang::Ta) => ("மேற்கோள்கள் ஏற்றப்பட்டன", "பட்டியல் புதுப்பிக்கப்பட்டது"),
            (A::FetchCategories, Lang::En) => ("Categories loaded", "The category list is up to date"),
            (A::FetchCategories, Lang::Ta) => ("வகைகள் ஏற்றப்பட்டன", "பட்டியல் புதுப்பிக்கப்பட்டது"),
            (A::FetchRequests, Lang::En) => ("Requests loaded", "The request list is up to date"),
            (A::FetchRequests, Lang::Ta) => ("கோரிக்கைகள் ஏற்றப்பட்டன", "பட்டியல் புதுப்பிக்கப்பட்டது"),
            (A::AddQuote, Lang::En) => (
                "Quote added successfully",
                "The quote has been added to the collection",
            ),
            (A::AddQuote, Lang::Ta) => ("மேற்கோள் சேர்க்கப்பட்டது", "மேற்கோள் தொகுப்பில் சேர்க்கப்பட்டது"),
            (A::UpdateQuote, Lang::En) => ("Quote updated successfully", "The quote has been updated"),
            (A::UpdateQuote, Lang::Ta) => ("மேற்கோள் புதுப்பிக்கப்பட்டது", "மாற்றங்கள் சேமிக்கப்பட்டன"),
            (A::PublishQuote, Lang::En) => ("Quote published", "The quote is now visible to everyone"),
            (A::PublishQuote, Lang::Ta) => ("மேற்கோள் வெளியிடப்பட்டது", "இப்போது அனைவரும் காணலாம்"),
            (A::DeleteQuote, Lang::En) => (
                "Quote deleted successfully",
                "The quote has been removed from the collection",
            ),
            (A::DeleteQuote, Lang::Ta) => ("மேற்கோள் நீக்கப்பட்டது", "மேற்கோள் தொகுப்பிலிருந்து நீக்கப்பட்டது"),
            (A::AddCategory, Lang::En) => ("Category added successfully", "The category has been created"),
            (A::AddCategory, Lang::Ta) => ("வகை சேர்க்கப்பட்டது", "புதிய வகை உருவாக்கப்பட்டது"),
            (A::UpdateCategory, Lang::En) => ("Category updated successfully", "The category has been updated"),
            (A::UpdateCategory, Lang::Ta) => ("வகை புதுப்பிக்கப்பட்டது", "மாற்றங்கள் சேமிக்கப்பட்டன"),
            (A::DeleteCategory, Lang::En) => ("Category deleted successfully", "The category has been removed"),
            (A::DeleteCategory, Lang::Ta) => ("வகை நீக்கப்பட்டது", "வகை அகற்றப்பட்டது"),
            (A::PromoteRequest, Lang::En) => ("Request accepted", "The request is now a draft quote"),
            (A::PromoteRequest, Lang::Ta) => ("கோரிக்கை ஏற்கப்பட்டது", "கோரிக்கை வரைவு மேற்கோளாக மாற்றப்பட்டது"),
            (A::DiscardRequest, Lang::En) => ("Request discarded", "The request has been removed"),
            (A::DiscardRequest, Lang::Ta) => ("கோரிக்கை நிராகரிக்கப்பட்டது", "கோரிக்கை அகற்றப்பட்டது"),
            (A::SubmitRequest, Lang::En) => ("Success", "Your quote has been submitted."),
            (A::SubmitRequest, Lang::Ta) => ("வெற்றி", "உங்கள் மேற்கோள் சமர்ப்பிக்கப்பட்டது."),
            (A::SubmitFeedback, Lang::En) => ("Success", "Your feedback has been submitted."),
            (A::SubmitFeedback, Lang::Ta) => ("வெற்றி", "உங்கள் கருத்து சமர்ப்பிக்கப்பட்டது."),
        }
    }

    fn failure_title(&self, lang: Lang) -> &'static str {
        use Action as A;
        if lang == Lang::Ta {
            return "பிழை";
        }
        match self {
            A::FetchQuotes => "Error fetching quotes",
            A::FetchCategories => "Error fetching categories",
            A::FetchRequests => "Error fetching requests",
            A::AddQuote => "Error adding quote",
            A::UpdateQuote => "Error updating quote",
            A::PublishQuote => "Error publishing quote",
            A::DeleteQuote => "Error deleting quote",
            A::AddCategory => "Error adding category",
            A::UpdateCategory => "Error updating category",
            A::DeleteCategory => "Cannot delete category",
            A::PromoteRequest => "Error accepting request",
            A::DiscardRequest => "Error discarding request",
            A::SubmitRequest | A::SubmitFeedback => "Error",
        }
    }

    /// 訪客表單在後端失敗時顯示固定訊息
    fn transport_failure_text(&self, lang: Lang) -> Option<&'static str> {
        match (self, lang) {
            (Action::SubmitRequest, Lang::En) => Some("Failed to submit your quote."),
            (Action::SubmitRequest, Lang::Ta) => Some("உங்கள் மேற்கோளை சமர்ப்பிக்க முடியவில்லை."),
            (Action::SubmitFeedback, Lang::En) => Some("Failed to submit feedback."),
            (Action::SubmitFeedback, Lang::Ta) => Some("உங்கள் கருத்தை சமர்ப்பிக்க முடியவில்லை."),
            _ => None,
        }
    }
}

/// A user-visible notification for the outcome of one action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn success(action: Action, lang: Lang) -> Self {
        let (title, description) = action.success_text(lang);
        Self {
            level: NoticeLevel::Success,
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    pub fn failure(action: Action, error: &DeskError, lang: Lang) -> Self {
        let description = match (error.category(), action.transport_failure_text(lang)) {
            (ErrorCategory::Transport, Some(text)) => text.to_string(),
            _ => error.user_friendly_message(lang),
        };
        Self {
            level: NoticeLevel::Destructive,
            title: action.failure_title(lang).to_string(),
            description,
        }
    }

    pub fn is_success(&self) -> bool {
        self.level == NoticeLevel::Success
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.level {
            NoticeLevel::Success => "✅",
            NoticeLevel::Destructive => "❌",
        };
        write!(f, "{} {}: {}", marker, self.title, self.description)
    }
}

/// Turns an action result into the notice shown to the user. Errors stop here.
pub fn report<T>(action: Action, result: &Result<T, DeskError>, lang: Lang) -> Notice {
    match result {
        Ok(_) => Notice::success(action, lang),
        Err(e) => {
            tracing::warn!("{:?} failed: {} ({:?})", action, e, e.category());
            Notice::failure(action, e, lang)
        }
    }
}
