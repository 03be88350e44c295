use crate::domain::model::Table;
use crate::domain::ports::{Gateway, ListQuery};
use crate::utils::error::{DeskError, Result};
use uuid::Uuid;

/// True when at least one quote points at the category. Existence only, no count.
pub async fn category_in_use<G: Gateway + ?Sized>(gateway: &G, category_id: Uuid) -> Result<bool> {
    let rows = gateway
        .list(
            Table::Quotes,
            &ListQuery::new().eq("category_id", category_id).limit(1),
        )
        .await?;
    Ok(!rows.is_empty())
}

pub async fn ensure_category_unused<G: Gateway + ?Sized>(gateway: &G, category_id: Uuid) -> Result<()> {
    if category_in_use(gateway, category_id).await? {
        tracing::warn!("Category {} is still referenced, refusing to delete", category_id);
        return Err(DeskError::ConflictError {
            message: format!("cannot delete category {}: category in use", category_id),
        });
    }
    Ok(())
}

/// Guards against dangling category references on quote writes.
pub async fn ensure_category_exists<G: Gateway + ?Sized>(gateway: &G, category_id: Uuid) -> Result<()> {
    let rows = gateway
        .list(
            Table::Categories,
            &ListQuery::new().eq("id", category_id).limit(1),
        )
        .await?;
    if rows.is_empty() {
        return Err(DeskError::not_found("category", category_id));
    }
    Ok(())
}
