//! Shared fixtures for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::Entity;
use crate::error::OrmResult;
use crate::executor::{BufferedRows, Executor, WriteResult};
use crate::value::Value;

// ── Entities ──

#[derive(Debug, Clone, Default, PartialEq, Entity)]
pub struct User {
    pub id: i64,
    pub name: String,
}

impl User {
    pub fn new(id: i64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Entity)]
#[orm(table = "AuditLog")]
pub struct AuditEntry {
    pub id: i64,
    #[orm(column = "Kind")]
    pub event_kind: String,
    pub user_id: Option<i32>,
    #[orm(skip)]
    pub cached: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Entity)]
pub struct AllKinds {
    pub flag: bool,
    pub tiny: i8,
    pub small: i16,
    pub int: i32,
    pub big: i64,
    pub ubyte: u8,
    pub ushort: u16,
    pub uint: u32,
    pub ratio: f32,
    pub score: f64,
    pub label: String,
    pub blob: Vec<u8>,
    pub doc: serde_json::Value,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub local_at: chrono::NaiveDateTime,
    pub key: uuid::Uuid,
    pub note: Option<String>,
    pub maybe_count: Option<i64>,
}

#[derive(Debug, Default, Entity)]
pub struct Pair(pub i64, pub i64);

#[derive(Debug, Default, Entity)]
pub struct Marker;

// ── Executor ──

/// Executor that records every statement and replays queued results.
#[derive(Debug, Default)]
pub struct MockExecutor {
    pub log: Mutex<Vec<(String, Vec<Value>)>>,
    rows: Mutex<VecDeque<BufferedRows>>,
    writes: Mutex<VecDeque<WriteResult>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(self, columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        self.rows
            .lock()
            .unwrap()
            .push_back(BufferedRows::new(columns.iter().copied(), rows));
        self
    }

    pub fn with_write(self, result: WriteResult) -> Self {
        self.writes.lock().unwrap().push_back(result);
        self
    }

    pub fn statements(&self) -> Vec<(String, Vec<Value>)> {
        self.log.lock().unwrap().clone()
    }

    fn record(&self, sql: &str, args: &[Value]) {
        self.log
            .lock()
            .unwrap()
            .push((sql.to_string(), args.to_vec()));
    }
}

impl Executor for MockExecutor {
    type Rows = BufferedRows;

    async fn execute_write(&self, sql: &str, args: &[Value]) -> OrmResult<WriteResult> {
        self.record(sql, args);
        Ok(self.writes.lock().unwrap().pop_front().unwrap_or_default())
    }

    async fn execute_query(&self, sql: &str, args: &[Value]) -> OrmResult<BufferedRows> {
        self.record(sql, args);
        Ok(self.rows.lock().unwrap().pop_front().unwrap_or_default())
    }
}
