use crate::domain::model::Table;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub column: String,
    pub ascending: bool,
}

/// 查詢條件：等值過濾、排序、筆數上限
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub filters: Vec<(String, String)>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters.push((column.to_string(), value.to_string()));
        self
    }

    pub fn order_by(mut self, column: &str, ascending: bool) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            ascending,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOp {
    List,
    Insert,
    Update,
    Delete,
}

impl GatewayOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayOp::List => "list",
            GatewayOp::Insert => "insert",
            GatewayOp::Update => "update",
            GatewayOp::Delete => "delete",
        }
    }
}

/// CRUD access to the hosted backend. Rows travel as JSON objects; typing happens
/// in `domain::model::decode_rows`.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn list(&self, table: Table, query: &ListQuery) -> Result<Vec<Value>>;
    async fn insert(&self, table: Table, record: Value) -> Result<Value>;
    async fn update(&self, table: Table, id: Uuid, patch: Value) -> Result<Value>;
    async fn delete(&self, table: Table, id: Uuid) -> Result<()>;
}

#[async_trait]
impl<G: Gateway + ?Sized> Gateway for std::sync::Arc<G> {
    async fn list(&self, table: Table, query: &ListQuery) -> Result<Vec<Value>> {
        (**self).list(table, query).await
    }

    async fn insert(&self, table: Table, record: Value) -> Result<Value> {
        (**self).insert(table, record).await
    }

    async fn update(&self, table: Table, id: Uuid, patch: Value) -> Result<Value> {
        (**self).update(table, id, patch).await
    }

    async fn delete(&self, table: Table, id: Uuid) -> Result<()> {
        (**self).delete(table, id).await
    }
}
