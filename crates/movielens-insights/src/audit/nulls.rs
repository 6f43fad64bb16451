use crate::types::{ColumnNullCount, NullAudit};
use polars::prelude::*;
use std::fmt;
use tabled::Table;
use tabled::settings::{Alignment, Style};
use tracing::debug;

/// Counts missing values per column.
pub struct NullAuditor;

impl NullAuditor {
    /// Audit every column of `df`, in schema order.
    ///
    /// Only real nulls are counted. Empty text never reaches the table as
    /// an empty string because the loader reads empty fields as null.
    pub fn audit(df: &DataFrame, label: &str) -> NullAudit {
        let row_count = df.height();

        let columns = df
            .get_columns()
            .iter()
            .map(|column| {
                let null_count = column.null_count();
                let null_percentage = if row_count > 0 {
                    (null_count as f64 / row_count as f64) * 100.0
                } else {
                    0.0
                };
                debug!("  {}.{}: {} nulls", label, column.name(), null_count);
                ColumnNullCount {
                    column: column.name().to_string(),
                    null_count,
                    null_percentage,
                }
            })
            .collect();

        NullAudit {
            label: label.to_string(),
            row_count,
            columns,
        }
    }
}

/// Audit `df` under `label`. See [`NullAuditor::audit`].
pub fn audit_nulls(df: &DataFrame, label: &str) -> NullAudit {
    NullAuditor::audit(df, label)
}

impl NullAudit {
    /// The audit as a `Column | Null Count` table.
    pub fn to_table(&self) -> Table {
        let mut table = Table::new(&self.columns);
        table.with(Style::ascii()).with(Alignment::center());
        table
    }
}

impl fmt::Display for NullAudit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Null values in {} DataFrame:", self.label)?;
        write!(f, "{}", self.to_table())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_audit_counts_nulls_in_schema_order() {
        let df = df![
            "userId" => [Some("1"), Some("2"), Some("3")],
            "movieId" => [Some("10"), Some("20"), Some("30")],
            "tag" => [Some("funny"), None, None],
            "timestamp" => [None, Some("1445714994"), Some("1445715207")]
        ]
        .unwrap();

        let audit = NullAuditor::audit(&df, "tags");

        let counts: Vec<_> = audit
            .columns
            .iter()
            .map(|c| (c.column.as_str(), c.null_count))
            .collect();
        assert_eq!(
            counts,
            vec![("userId", 0), ("movieId", 0), ("tag", 2), ("timestamp", 1)]
        );
        assert_eq!(audit.row_count, 3);
        assert_eq!(audit.label, "tags");
    }

    #[test]
    fn test_audit_counts_bounded_by_row_count() {
        let df = df![
            "a" => [None::<&str>, None, None],
            "b" => [Some("x"), Some("y"), Some("z")]
        ]
        .unwrap();

        let audit = audit_nulls(&df, "t");

        for column in &audit.columns {
            assert!(column.null_count <= audit.row_count);
        }
        assert_eq!(audit.null_count("a"), Some(3));
        assert_eq!(audit.columns[0].null_percentage, 100.0);
    }

    #[test]
    fn test_audit_empty_string_is_not_null() {
        let df = df!["tag" => [Some(""), Some("funny"), None]].unwrap();

        let audit = NullAuditor::audit(&df, "tags");

        assert_eq!(audit.null_count("tag"), Some(1));
    }

    #[test]
    fn test_audit_no_missing_markers_yields_zero() {
        let df = df![
            "movieId" => ["1", "2"],
            "title" => ["Toy Story (1995)", "Jumanji (1995)"],
            "genres" => ["Adventure|Animation", "Adventure|Children"]
        ]
        .unwrap();

        let audit = NullAuditor::audit(&df, "movies");

        assert_eq!(audit.columns.len(), 3);
        assert_eq!(audit.total_nulls(), 0);
    }

    #[test]
    fn test_audit_zero_rows() {
        let df = df![
            "movieId" => Vec::<&str>::new(),
            "title" => Vec::<&str>::new()
        ]
        .unwrap();

        let audit = NullAuditor::audit(&df, "movies");

        assert_eq!(audit.row_count, 0);
        assert_eq!(audit.columns.len(), 2);
        assert!(audit.columns.iter().all(|c| c.null_count == 0));
        assert!(audit.columns.iter().all(|c| c.null_percentage == 0.0));
    }

    #[test]
    fn test_audit_zero_columns() {
        let audit = NullAuditor::audit(&DataFrame::empty(), "nothing");

        assert!(audit.columns.is_empty());
        assert_eq!(audit.total_nulls(), 0);
        assert!(audit.to_string().starts_with("Null values in nothing DataFrame:"));
    }

    #[test]
    fn test_display_renders_titled_table() {
        let df = df![
            "movieId" => [Some("1"), Some("2")],
            "genres" => [Some("Comedy"), None]
        ]
        .unwrap();

        let rendered = NullAuditor::audit(&df, "movies").to_string();

        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(lines[0], "Null values in movies DataFrame:");
        assert!(lines[1].starts_with("+---------+"));
        assert_eq!(lines[2], "| Column  | Null Count |");
        assert!(rendered.contains("| movieId |"));
        assert!(rendered.contains("| genres  |"));
        assert!(!rendered.contains("50"));
    }
}
