use crate::domain::model::Table;
use crate::domain::ports::{Gateway, GatewayOp, ListQuery};
use crate::utils::error::{DeskError, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    rows: HashMap<Table, Vec<Value>>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl Tables {
    /// 單調遞增的時間戳，確保 created_at 排序穩定
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let mut now = Utc::now();
        if let Some(last) = self.last_timestamp {
            if now <= last {
                now = last + Duration::microseconds(1);
            }
        }
        self.last_timestamp = Some(now);
        now
    }
}

/// In-process backend used for local runs and tests. Mirrors the backend defaults:
/// generated ids, timestamps and `status = draft` for quotes.
#[derive(Default)]
pub struct MemoryGateway {
    tables: Mutex<Tables>,
    failures: Mutex<HashSet<(Table, GatewayOp)>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// 讓下一次對該表的操作失敗一次
    pub async fn fail_next(&self, table: Table, op: GatewayOp) {
        self.failures.lock().await.insert((table, op));
    }

    pub async fn row_count(&self, table: Table) -> usize {
        self.tables
            .lock()
            .await
            .rows
            .get(&table)
            .map(Vec::len)
            .unwrap_or(0)
    }

    async fn take_failure(&self, table: Table, op: GatewayOp) -> Result<()> {
        if self.failures.lock().await.remove(&(table, op)) {
            return Err(DeskError::BackendError {
                table: table.to_string(),
                operation: op.as_str().to_string(),
                status: 503,
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

fn filter_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::String(a)), Some(Value::String(b))) => {
            match (
                DateTime::parse_from_rfc3339(a),
                DateTime::parse_from_rfc3339(b),
            ) {
                (Ok(a), Ok(b)) => a.cmp(&b),
                _ => a.to_lowercase().cmp(&b.to_lowercase()),
            }
        }
        (Some(Value::Number(a)), Some(Value::Number(b))) => a
            .as_f64()
            .partial_cmp(&b.as_f64())
            .unwrap_or(Ordering::Equal),
        // NULL 排在最後
        (Some(Value::Null) | None, Some(Value::Null) | None) => Ordering::Equal,
        (Some(Value::Null) | None, _) => Ordering::Greater,
        (_, Some(Value::Null) | None) => Ordering::Less,
        (Some(a), Some(b)) => a.to_string().cmp(&b.to_string()),
    }
}

fn as_object(table: Table, value: Value) -> Result<Map<String, Value>> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(DeskError::BackendError {
            table: table.to_string(),
            operation: "write".to_string(),
            status: 400,
            message: format!("expected a JSON object, got {}", other),
        }),
    }
}

fn row_id(row: &Value) -> Option<&str> {
    row.get("id").and_then(Value::as_str)
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn list(&self, table: Table, query: &ListQuery) -> Result<Vec<Value>> {
        self.take_failure(table, GatewayOp::List).await?;

        let tables = self.tables.lock().await;
        let mut rows: Vec<Value> = tables
            .rows
            .get(&table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| {
                        query.filters.iter().all(|(column, expected)| {
                            row.get(column).and_then(filter_text).as_deref()
                                == Some(expected.as_str())
                        })
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ordering = compare_values(a.get(&order.column), b.get(&order.column));
                if order.ascending {
                    ordering
                } else {
                    ordering.reverse()
                }
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn insert(&self, table: Table, record: Value) -> Result<Value> {
        self.take_failure(table, GatewayOp::Insert).await?;

        let mut row = as_object(table, record)?;
        let mut tables = self.tables.lock().await;
        let now = Value::String(tables.next_timestamp().to_rfc3339());

        row.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
        row.insert("created_at".to_string(), now.clone());
        if table == Table::Quotes {
            row.insert("updated_at".to_string(), now);
            row.entry("status")
                .or_insert_with(|| Value::String("draft".to_string()));
        }

        let row = Value::Object(row);
        tables.rows.entry(table).or_default().push(row.clone());
        Ok(row)
    }

    async fn update(&self, table: Table, id: Uuid, patch: Value) -> Result<Value> {
        self.take_failure(table, GatewayOp::Update).await?;

        let patch = as_object(table, patch)?;
        let mut tables = self.tables.lock().await;
        let now = tables.next_timestamp().to_rfc3339();
        let id = id.to_string();

        let row = tables
            .rows
            .get_mut(&table)
            .and_then(|rows| rows.iter_mut().find(|row| row_id(row) == Some(id.as_str())))
            .ok_or_else(|| DeskError::not_found(table.as_str(), &id))?;

        if let Value::Object(fields) = row {
            for (key, value) in patch {
                if key != "id" {
                    fields.insert(key, value);
                }
            }
            if table == Table::Quotes {
                fields.insert("updated_at".to_string(), Value::String(now));
            }
        }
        Ok(row.clone())
    }

    async fn delete(&self, table: Table, id: Uuid) -> Result<()> {
        self.take_failure(table, GatewayOp::Delete).await?;

        let id = id.to_string();
        let mut tables = self.tables.lock().await;
        if let Some(rows) = tables.rows.get_mut(&table) {
            rows.retain(|row| row_id(row) != Some(id.as_str()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_assigns_id_and_defaults() {
        let gateway = MemoryGateway::new();
        let row = gateway
            .insert(Table::Quotes, json!({"quote": "q", "author": "a"}))
            .await
            .unwrap();

        assert!(row_id(&row).is_some());
        assert_eq!(row["status"], "draft");
        assert_eq!(row["created_at"], row["updated_at"]);
    }

    #[tokio::test]
    async fn test_list_orders_newest_first_and_limits() {
        let gateway = MemoryGateway::new();
        for name in ["first", "second", "third"] {
            gateway
                .insert(Table::Categories, json!({ "name": name }))
                .await
                .unwrap();
        }

        let rows = gateway
            .list(
                Table::Categories,
                &ListQuery::new().order_by("created_at", false).limit(2),
            )
            .await
            .unwrap();
        let names: Vec<&str> = rows.iter().filter_map(|r| r["name"].as_str()).collect();
        assert_eq!(names, vec!["third", "second"]);
    }

    #[tokio::test]
    async fn test_eq_filter_skips_null_columns() {
        let gateway = MemoryGateway::new();
        gateway
            .insert(Table::Quotes, json!({"quote": "q", "author": "a", "category_id": null}))
            .await
            .unwrap();

        let rows = gateway
            .list(Table::Quotes, &ListQuery::new().eq("category_id", "null"))
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_injected_failure_fires_once() {
        let gateway = MemoryGateway::new();
        gateway.fail_next(Table::Categories, GatewayOp::Insert).await;

        let first = gateway.insert(Table::Categories, json!({"name": "x"})).await;
        assert!(matches!(first, Err(DeskError::BackendError { status: 503, .. })));

        let second = gateway.insert(Table::Categories, json!({"name": "x"})).await;
        assert!(second.is_ok());
        assert_eq!(gateway.row_count(Table::Categories).await, 1);
    }

    #[test]
    fn test_update_unknown_row_is_not_found() {
        let gateway = MemoryGateway::new();
        let result = tokio_test::block_on(gateway.update(
            Table::Quotes,
            Uuid::new_v4(),
            json!({"status": "published"}),
        ));
        assert!(matches!(result, Err(DeskError::NotFound { .. })));
    }
}
