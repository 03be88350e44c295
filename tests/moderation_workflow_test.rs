use anyhow::Result;
use quote_desk::domain::ports::GatewayOp;
use quote_desk::domain::model::Table;
use quote_desk::{
    report, Action, CategoryFilter, DeskError, Lang, MemoryGateway, NewCategory, NewQuote,
    NewQuoteRequest, QuotePatch, QuoteRepository, QuoteStatus,
};
use std::sync::Arc;
use uuid::Uuid;

fn desk() -> (Arc<MemoryGateway>, QuoteRepository<Arc<MemoryGateway>>) {
    let gateway = Arc::new(MemoryGateway::new());
    (gateway.clone(), QuoteRepository::new(gateway))
}

#[tokio::test]
async fn test_draft_becomes_public_after_publishing_update() -> Result<()> {
    let (_, repo) = desk();
    let quote = repo
        .add_quote(NewQuote::new("Hope is not a strategy", "A. Nonymous"))
        .await?;
    assert_eq!(quote.status, QuoteStatus::Draft);
    assert_eq!(quote.category_id, None);

    let public = repo.public_quotes("", CategoryFilter::All).await?;
    assert!(public.iter().all(|q| q.id != quote.id));

    repo.update_quote(quote.id, QuotePatch::status(QuoteStatus::Published))
        .await?;

    let public = repo.public_quotes("", CategoryFilter::All).await?;
    assert_eq!(public.len(), 1);
    assert_eq!(public[0].id, quote.id);
    Ok(())
}

#[tokio::test]
async fn test_public_listing_never_shows_unpublished() -> Result<()> {
    let (_, repo) = desk();
    for (text, status) in [
        ("one", QuoteStatus::Draft),
        ("two", QuoteStatus::Published),
        ("three", QuoteStatus::Archived),
        ("four", QuoteStatus::Published),
    ] {
        repo.add_quote(NewQuote::new(text, "someone").with_status(status))
            .await?;
    }

    let public = repo.public_quotes("", CategoryFilter::All).await?;
    let texts: Vec<&str> = public.iter().map(|q| q.quote.as_str()).collect();
    // 最新的排最前面
    assert_eq!(texts, vec!["four", "two"]);

    let all = repo.filter_quotes("", CategoryFilter::All).await?;
    assert_eq!(all.len(), 4);
    Ok(())
}

#[tokio::test]
async fn test_publish_action_only_from_draft() -> Result<()> {
    let (_, repo) = desk();
    let draft = repo.add_quote(NewQuote::new("draft", "a")).await?;
    let archived = repo
        .add_quote(NewQuote::new("archived", "a").with_status(QuoteStatus::Archived))
        .await?;

    let published = repo.publish_quote(draft.id).await?;
    assert_eq!(published.status, QuoteStatus::Published);

    let err = repo.publish_quote(archived.id).await.unwrap_err();
    assert!(matches!(err, DeskError::InvalidTransition { .. }));

    let err = repo.publish_quote(draft.id).await.unwrap_err();
    assert!(matches!(err, DeskError::InvalidTransition { .. }));
    Ok(())
}

#[tokio::test]
async fn test_permissive_edit_allows_any_status() -> Result<()> {
    let (_, repo) = desk();
    let quote = repo
        .add_quote(NewQuote::new("q", "a").with_status(QuoteStatus::Published))
        .await?;

    for status in [QuoteStatus::Archived, QuoteStatus::Draft, QuoteStatus::Archived, QuoteStatus::Published] {
        let updated = repo.update_quote(quote.id, QuotePatch::status(status)).await?;
        assert_eq!(updated.status, status);
    }
    Ok(())
}

#[tokio::test]
async fn test_category_delete_guarded_by_references() -> Result<()> {
    let (_, repo) = desk();
    let c1 = repo.add_category(NewCategory::new("Life")).await?;
    let c2 = repo.add_category(NewCategory::new("Love")).await?;
    let quote = repo
        .add_quote(NewQuote::new("Love is patient", "Paul").with_category(c2.id))
        .await?;

    repo.delete_category(c1.id).await?;
    let categories = repo.list_categories().await?;
    assert!(categories.iter().all(|c| c.id != c1.id));

    let err = repo.delete_category(c2.id).await.unwrap_err();
    assert!(matches!(err, DeskError::ConflictError { .. }));

    let categories = repo.list_categories().await?;
    assert!(categories.iter().any(|c| c.id == c2.id));
    let quotes = repo.list_quotes().await?;
    assert_eq!(quotes.len(), 1);
    assert_eq!(quotes[0].id, quote.id);
    assert_eq!(quotes[0].category_id, Some(c2.id));

    let notice = report(Action::DeleteCategory, &Err::<(), _>(err), Lang::En);
    assert_eq!(notice.title, "Cannot delete category");
    Ok(())
}

#[tokio::test]
async fn test_category_freed_after_quote_moves() -> Result<()> {
    let (_, repo) = desk();
    let category = repo.add_category(NewCategory::new("Dreams")).await?;
    let quote = repo
        .add_quote(NewQuote::new("q", "a").with_category(category.id))
        .await?;

    assert!(repo.delete_category(category.id).await.is_err());

    repo.update_quote(
        quote.id,
        QuotePatch {
            category_id: Some(None),
            ..Default::default()
        },
    )
    .await?;
    repo.delete_category(category.id).await?;
    assert!(repo.list_categories().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_promote_request_creates_single_draft() -> Result<()> {
    let (_, repo) = desk();
    let request = repo
        .submit_request(NewQuoteRequest {
            name: "Kavi".to_string(),
            quote: "அன்பே சிவம்".to_string(),
            description: "Tirumantiram".to_string(),
        })
        .await?;
    assert_eq!(repo.list_requests().await?.len(), 1);

    let quote = repo.promote_request(request.id).await?;

    let requests = repo.list_requests().await?;
    assert!(requests.iter().all(|r| r.id != request.id));

    let quotes = repo.list_quotes().await?;
    let promoted: Vec<_> = quotes.iter().filter(|q| q.request_id == Some(request.id)).collect();
    assert_eq!(promoted.len(), 1);
    assert_eq!(promoted[0].id, quote.id);
    assert_eq!(promoted[0].status, QuoteStatus::Draft);
    assert_eq!(promoted[0].author, "Kavi");
    assert_eq!(promoted[0].quote, "அன்பே சிவம்");
    assert_eq!(promoted[0].category_id, None);

    // 已晉升的投稿不能再晉升一次
    let err = repo.promote_request(request.id).await.unwrap_err();
    assert!(matches!(err, DeskError::NotFound { .. }));
    assert_eq!(repo.list_quotes().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_promotion_failure_before_insert_leaves_request() -> Result<()> {
    let (gateway, repo) = desk();
    let request = repo
        .submit_request(NewQuoteRequest {
            name: "Kavi".to_string(),
            quote: "q".to_string(),
            description: "d".to_string(),
        })
        .await?;

    gateway.fail_next(Table::Quotes, GatewayOp::Insert).await;
    let err = repo.promote_request(request.id).await.unwrap_err();
    assert!(matches!(err, DeskError::BackendError { .. }));

    assert_eq!(repo.list_requests().await?.len(), 1);
    assert!(repo.list_quotes().await?.is_empty());

    repo.promote_request(request.id).await?;
    assert!(repo.list_requests().await?.is_empty());
    assert_eq!(repo.list_quotes().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_discard_request() -> Result<()> {
    let (_, repo) = desk();
    let request = repo
        .submit_request(NewQuoteRequest {
            name: "n".to_string(),
            quote: "q".to_string(),
            description: "d".to_string(),
        })
        .await?;

    repo.discard_request(request.id).await?;
    assert!(repo.list_requests().await?.is_empty());
    assert!(repo.list_quotes().await?.is_empty());

    assert!(matches!(
        repo.discard_request(request.id).await,
        Err(DeskError::NotFound { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn test_submit_request_requires_all_fields() -> Result<()> {
    let (gateway, repo) = desk();
    let result = repo
        .submit_request(NewQuoteRequest {
            name: "Kavi".to_string(),
            quote: "q".to_string(),
            description: "  ".to_string(),
        })
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, DeskError::ValidationError { ref field, .. } if field == "description"));
    assert_eq!(gateway.row_count(Table::RequestQuotes).await, 0);

    let notice = report(Action::SubmitRequest, &Err::<(), _>(err), Lang::Ta);
    assert_eq!(notice.description, "தயவுசெய்து அனைத்து விவரங்களையும் நிரப்பவும்.");
    Ok(())
}

#[tokio::test]
async fn test_transport_failure_leaves_state_unchanged() -> Result<()> {
    let (gateway, repo) = desk();
    let category = repo.add_category(NewCategory::new("Life")).await?;

    gateway.fail_next(Table::Categories, GatewayOp::Delete).await;
    let err = repo.delete_category(category.id).await.unwrap_err();
    assert!(matches!(err, DeskError::BackendError { .. }));
    assert_eq!(repo.list_categories().await?.len(), 1);

    gateway.fail_next(Table::Quotes, GatewayOp::List).await;
    assert!(repo.refresh().await.is_err());
    // 下一次讀取重新抓取
    assert!(repo.list_quotes().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_search_and_category_filter_through_repository() -> Result<()> {
    let (_, repo) = desk();
    let love = repo.add_category(NewCategory::new("Love")).await?;
    repo.add_quote(NewQuote::new("Love is patient", "Paul").with_category(love.id))
        .await?;
    repo.add_quote(NewQuote::new("Stay hungry", "Steve").with_description("love what you do"))
        .await?;
    repo.add_quote(NewQuote::new("Carpe diem", "Horace")).await?;

    let by_term = repo.filter_quotes("LOVE", CategoryFilter::All).await?;
    assert_eq!(by_term.len(), 2);
    assert_eq!(by_term[0].author, "Steve");

    let by_category = repo.filter_quotes("love", CategoryFilter::Only(love.id)).await?;
    assert_eq!(by_category.len(), 1);
    assert_eq!(by_category[0].author, "Paul");

    let stats = repo.stats().await?;
    assert_eq!(stats.total_quotes, 3);
    assert_eq!(stats.categories, 1);
    assert_eq!(stats.average_per_category, 3);
    Ok(())
}

#[tokio::test]
async fn test_delete_unknown_ids_is_not_found() -> Result<()> {
    let (gateway, repo) = desk();
    let kept = repo.add_category(NewCategory::new("Life")).await?;
    repo.add_quote(NewQuote::new("q", "a")).await?;

    let err = repo.delete_quote(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, DeskError::NotFound { ref entity, .. } if entity == "quote"));

    let err = repo.delete_category(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, DeskError::NotFound { ref entity, .. } if entity == "category"));

    assert_eq!(gateway.row_count(Table::Quotes).await, 1);
    assert_eq!(repo.list_categories().await?[0].id, kept.id);

    let notice = report(Action::DeleteCategory, &Err::<(), _>(err), Lang::En);
    assert!(!notice.is_success());
    Ok(())
}

#[tokio::test]
async fn test_update_quote_with_unknown_category_is_rejected() -> Result<()> {
    let (_, repo) = desk();
    let category = repo.add_category(NewCategory::new("Life")).await?;
    let quote = repo
        .add_quote(NewQuote::new("q", "a").with_category(category.id))
        .await?;

    let err = repo
        .update_quote(
            quote.id,
            QuotePatch {
                category_id: Some(Some(Uuid::new_v4())),
                status: Some(QuoteStatus::Published),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DeskError::NotFound { ref entity, .. } if entity == "category"));

    // 原本的資料完全沒變
    let quotes = repo.list_quotes().await?;
    assert_eq!(quotes[0].category_id, Some(category.id));
    assert_eq!(quotes[0].status, QuoteStatus::Draft);
    assert!(repo.public_quotes("", CategoryFilter::All).await?.iter().all(|q| q.is_public()));
    Ok(())
}
