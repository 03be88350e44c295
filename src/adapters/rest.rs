use crate::domain::model::Table;
use crate::domain::ports::{Gateway, GatewayOp, ListQuery};
use crate::utils::error::{DeskError, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

/// Gateway for a PostgREST-style backend (`{base}/rest/v1/{table}`).
#[derive(Debug, Clone)]
pub struct RestGateway {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestGateway {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn table_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base_url, table.as_str())
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
    }

    async fn checked(table: Table, op: GatewayOp, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        // PostgREST 錯誤格式: {"message": "...", "code": "..."}
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .unwrap_or(body);

        tracing::debug!("{} {} failed with {}: {}", op.as_str(), table, status, message);
        Err(DeskError::BackendError {
            table: table.to_string(),
            operation: op.as_str().to_string(),
            status: status.as_u16(),
            message,
        })
    }

    fn first_row(table: Table, rows: Vec<Value>) -> Result<Value> {
        rows.into_iter().next().ok_or_else(|| DeskError::MalformedRecord {
            table: table.to_string(),
            message: "backend returned an empty representation".to_string(),
        })
    }
}

fn query_params(query: &ListQuery) -> Vec<(String, String)> {
    let mut params = vec![("select".to_string(), "*".to_string())];
    for (column, value) in &query.filters {
        params.push((column.clone(), format!("eq.{}", value)));
    }
    if let Some(order) = &query.order {
        let direction = if order.ascending { "asc" } else { "desc" };
        params.push(("order".to_string(), format!("{}.{}", order.column, direction)));
    }
    if let Some(limit) = query.limit {
        params.push(("limit".to_string(), limit.to_string()));
    }
    params
}

#[async_trait]
impl Gateway for RestGateway {
    async fn list(&self, table: Table, query: &ListQuery) -> Result<Vec<Value>> {
        let url = self.table_url(table);
        tracing::debug!("GET {} {:?}", url, query);

        let response = self
            .authorized(self.client.get(&url))
            .query(&query_params(query))
            .send()
            .await?;
        let response = Self::checked(table, GatewayOp::List, response).await?;
        let rows: Vec<Value> = response.json().await?;

        tracing::debug!("Fetched {} rows from {}", rows.len(), table);
        Ok(rows)
    }

    async fn insert(&self, table: Table, record: Value) -> Result<Value> {
        let url = self.table_url(table);
        tracing::debug!("POST {}", url);

        let response = self
            .authorized(self.client.post(&url))
            .header("Prefer", "return=representation")
            .json(&record)
            .send()
            .await?;
        let response = Self::checked(table, GatewayOp::Insert, response).await?;
        let rows: Vec<Value> = response.json().await?;
        Self::first_row(table, rows)
    }

    async fn update(&self, table: Table, id: Uuid, patch: Value) -> Result<Value> {
        let url = self.table_url(table);
        tracing::debug!("PATCH {} id={}", url, id);

        let response = self
            .authorized(self.client.patch(&url))
            .header("Prefer", "return=representation")
            .query(&[("id", format!("eq.{}", id))])
            .json(&patch)
            .send()
            .await?;
        let response = Self::checked(table, GatewayOp::Update, response).await?;
        let rows: Vec<Value> = response.json().await?;

        // 沒有符合的列時 PostgREST 回傳空陣列
        rows.into_iter()
            .next()
            .ok_or_else(|| DeskError::not_found(table.as_str(), id))
    }

    async fn delete(&self, table: Table, id: Uuid) -> Result<()> {
        let url = self.table_url(table);
        tracing::debug!("DELETE {} id={}", url, id);

        let response = self
            .authorized(self.client.delete(&url))
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await?;
        Self::checked(table, GatewayOp::Delete, response).await?;
        Ok(())
    }
}
