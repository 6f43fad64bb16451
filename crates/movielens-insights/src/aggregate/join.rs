//! Text-column access and the hash index behind the left joins.

use crate::error::{AnalysisError, Result};
use polars::prelude::*;
use std::collections::HashMap;

/// Fetch `name` from `df` as a `String` series.
///
/// Non-text columns (e.g. integer ids in a caller-built table) are cast so
/// keys are always compared as raw text.
pub(crate) fn text_series(df: &DataFrame, table: &str, name: &str) -> Result<Series> {
    let column = df
        .column(name)
        .map_err(|_| AnalysisError::missing_column(table, name))?;
    column
        .as_materialized_series()
        .cast(&DataType::String)
        .map_err(|e| AnalysisError::computation(format!("reading {table}.{name} as text"), e.to_string()))
}

static UNMATCHED: [Option<&str>; 1] = [None];

/// Right side of a left join, keyed by join key.
///
/// Keeps every right row per key so a left row is repeated once per match,
/// exactly like a relational left join.
pub(crate) struct KeyIndex<'a> {
    rows: HashMap<&'a str, Vec<Option<&'a str>>>,
}

impl<'a> KeyIndex<'a> {
    /// Index `values` by `keys`. Rows with a null key can never match and
    /// are left out.
    pub(crate) fn build(keys: &'a StringChunked, values: &'a StringChunked) -> Self {
        let mut rows: HashMap<&'a str, Vec<Option<&'a str>>> = HashMap::new();
        for (key, value) in keys.into_iter().zip(values) {
            if let Some(key) = key {
                rows.entry(key).or_default().push(value);
            }
        }
        Self { rows }
    }

    /// Right-side values joined to a left row with `key`.
    ///
    /// A null or unmatched key yields a single null, the left join's
    /// placeholder for the absent right side.
    pub(crate) fn lookup(&self, key: Option<&str>) -> &[Option<&'a str>] {
        key.and_then(|k| self.rows.get(k))
            .map(|matches| matches.as_slice())
            .unwrap_or(&UNMATCHED)
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }
}
