//! Parameterized `SELECT` construction for card lookups.
//!
//! Values never appear in the SQL text; each filter appends a `?` placeholder
//! and its value to the parameter list, in order.
//!
//! # Example
//!
//! ```rust
//! use poke_pricer::SqlBuilder;
//! let (sql, params) = SqlBuilder::new("card")
//!     .where_eq("set_code", "BASE")
//!     .where_contains("name", "pika")
//!     .order_by(&["id ASC"])
//!     .limit(10)
//!     .build();
//! assert_eq!(params, vec!["BASE", "%pika%"]);
//! ```

/// Escape character used by [`SqlBuilder::where_contains`].
const LIKE_ESCAPE: char = '\\';

pub struct SqlBuilder {
    columns: Vec<String>,
    table: String,
    filters: Vec<String>,
    params: Vec<String>,
    order: Vec<String>,
    limit: Option<usize>,
    offset: Option<usize>,
}

impl SqlBuilder {
    /// `SELECT * FROM {table}` with no filters.
    pub fn new(table: &str) -> Self {
        Self {
            columns: vec!["*".to_string()],
            table: table.to_string(),
            filters: Vec::new(),
            params: Vec::new(),
            order: Vec::new(),
            limit: None,
            offset: None,
        }
    }

    /// Replace the selected columns.
    pub fn select(&mut self, cols: &[&str]) -> &mut Self {
        self.columns = cols.iter().map(|c| c.to_string()).collect();
        self
    }

    /// `{column} = ?`
    pub fn where_eq(&mut self, column: &str, value: &str) -> &mut Self {
        self.filters.push(format!("{column} = ?"));
        self.params.push(value.to_string());
        self
    }

    /// Case-insensitive substring match.
    ///
    /// `%` and `_` in `needle` match literally.
    pub fn where_contains(&mut self, column: &str, needle: &str) -> &mut Self {
        self.filters
            .push(format!("LOWER({column}) LIKE LOWER(?) ESCAPE '{LIKE_ESCAPE}'"));
        self.params.push(format!("%{}%", escape_like(needle)));
        self
    }

    /// Append ORDER BY terms, e.g. `"id ASC"`.
    pub fn order_by(&mut self, terms: &[&str]) -> &mut Self {
        self.order.extend(terms.iter().map(|t| t.to_string()));
        self
    }

    pub fn limit(&mut self, n: usize) -> &mut Self {
        self.limit = Some(n);
        self
    }

    pub fn offset(&mut self, n: usize) -> &mut Self {
        self.offset = Some(n);
        self
    }

    /// Render the statement, one clause per line, with its parameters.
    pub fn build(&self) -> (String, Vec<String>) {
        let mut lines = vec![
            format!("SELECT {}", self.columns.join(", ")),
            format!("FROM {}", self.table),
        ];
        if !self.filters.is_empty() {
            lines.push(format!("WHERE {}", self.filters.join(" AND ")));
        }
        if !self.order.is_empty() {
            lines.push(format!("ORDER BY {}", self.order.join(", ")));
        }
        if let Some(n) = self.limit {
            lines.push(format!("LIMIT {n}"));
        }
        if let Some(n) = self.offset {
            lines.push(format!("OFFSET {n}"));
        }
        (lines.join("\n"), self.params.clone())
    }
}

fn escape_like(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '%' | '_') || c == LIKE_ESCAPE {
            out.push(LIKE_ESCAPE);
        }
        out.push(c);
    }
    out
}
