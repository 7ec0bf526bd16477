//! DuckDB connection wrapper with row conversion helpers.
//!
//! Queries come in two flavours: string-parameter queries produced by
//! [`SqlBuilder`](crate::sql_builder::SqlBuilder), and typed-parameter queries
//! used by the store for ids, prices and dates.

use crate::error::{PricerError, Result};
use chrono::NaiveDate;
use duckdb::{types::ValueRef, Connection as DuckDbConnection, ToSql};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Wraps a DuckDB connection to the price database.
pub struct Connection {
    conn: DuckDbConnection,
    /// Database file, or `None` for an in-memory database.
    pub path: Option<PathBuf>,
}

impl Connection {
    /// Open (or create) a file-backed database, creating parent directories.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let conn = DuckDbConnection::open(path)?;
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    /// Open a throwaway in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory()?;
        Ok(Self { conn, path: None })
    }

    /// Execute SQL and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row is represented as a `HashMap<String, serde_json::Value>`.
    /// Parameters are bound as text.
    pub fn execute(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let param_values: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();
        self.execute_params(sql, &param_values)
    }

    /// Execute SQL with typed parameters and return rows as `HashMap`s.
    pub fn execute_params(
        &self,
        sql: &str,
        params: &[&dyn ToSql],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows_result = stmt.query(params)?;

        // Column metadata is only available once the statement has run.
        let stmt_ref = rows_result
            .as_ref()
            .ok_or_else(|| PricerError::InvalidArgument(format!("no statement for: {sql}")))?;
        let column_names: Vec<String> = stmt_ref
            .column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();
        let column_count = stmt_ref.column_count();

        let mut out: Vec<HashMap<String, serde_json::Value>> = Vec::new();
        while let Some(row) = rows_result.next()? {
            let mut map = HashMap::with_capacity(column_count);
            for (i, col_name) in column_names.iter().enumerate() {
                map.insert(col_name.clone(), convert_value_ref(row.get_ref(i)?));
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    pub fn execute_into<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<T>> {
        rows_into(self.execute(sql, params)?)
    }

    /// Typed-parameter counterpart of [`execute_into`](Self::execute_into).
    pub fn execute_params_into<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[&dyn ToSql],
    ) -> Result<Vec<T>> {
        rows_into(self.execute_params(sql, params)?)
    }

    /// Execute SQL and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Option<serde_json::Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let param_values: Vec<&dyn ToSql> = params.iter().map(|p| p as &dyn ToSql).collect();

        let mut rows = stmt.query(param_values.as_slice())?;
        if let Some(row) = rows.next()? {
            Ok(Some(convert_value_ref(row.get_ref(0)?)))
        } else {
            Ok(None)
        }
    }

    /// Run one or more statements without results (DDL, maintenance).
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Run a single DML statement and return the number of affected rows.
    pub fn execute_update(&self, sql: &str, params: &[&dyn ToSql]) -> Result<usize> {
        Ok(self.conn.execute(sql, params)?)
    }

    /// Access the underlying DuckDB connection for advanced usage.
    pub fn raw(&self) -> &DuckDbConnection {
        &self.conn
    }
}

fn rows_into<T: DeserializeOwned>(rows: Vec<HashMap<String, serde_json::Value>>) -> Result<Vec<T>> {
    let mut results = Vec::with_capacity(rows.len());
    for row in rows {
        let value = serde_json::Value::Object(row.into_iter().collect());
        results.push(serde_json::from_value(value)?);
    }
    Ok(results)
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    match val {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Boolean(b) => serde_json::Value::Bool(b),
        ValueRef::TinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::SmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Int(n) => serde_json::Value::Number(n.into()),
        ValueRef::BigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UBigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::HugeInt(n) => {
            // COUNT(*) comes back as HUGEINT on some versions
            if let Ok(i) = i64::try_from(n) {
                serde_json::Value::Number(i.into())
            } else {
                serde_json::Value::String(n.to_string())
            }
        }
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(bytes) => {
            serde_json::Value::String(String::from_utf8_lossy(bytes).to_string())
        }
        ValueRef::Date32(days) => NaiveDate::from_ymd_opt(1970, 1, 1)
            .and_then(|epoch| epoch.checked_add_signed(chrono::Duration::days(days as i64)))
            .map(|d| serde_json::Value::String(d.format("%Y-%m-%d").to_string()))
            .unwrap_or(serde_json::Value::Null),
        _ => serde_json::Value::Null,
    }
}
