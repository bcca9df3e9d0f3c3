//! Bulk loading
//!
//! Truncate-and-reload of every destination table inside one transaction.
//! A table either reloads completely or the whole run rolls back; readers
//! never observe a half-truncated state.

use crate::config::DatabaseConfig;
use crate::project::{SqlValue, TableLoad, TableSpec};
use crate::Result;
use std::future::Future;
use std::pin::Pin;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, NoTls, Transaction};

/// The extended protocol caps one Bind message at 65535 parameters
const MAX_BIND_PARAMS: usize = 65_535;

type SqlFuture<'a> = Pin<Box<dyn Future<Output = Result<u64>> + Send + 'a>>;

/// Statement sink: the live transaction in production, a recorder in
/// tests. All table statements go through this seam; the commit does not.
trait StatementSink {
    fn execute_sql<'a>(
        &'a mut self,
        sql: &'a str,
        params: &'a [&'a (dyn ToSql + Sync)],
    ) -> SqlFuture<'a>;
}

impl StatementSink for Transaction<'_> {
    fn execute_sql<'a>(
        &'a mut self,
        sql: &'a str,
        params: &'a [&'a (dyn ToSql + Sync)],
    ) -> SqlFuture<'a> {
        Box::pin(async move { Ok(self.execute(sql, params).await?) })
    }
}

/// Connects to the destination database and spawns the connection driver.
pub async fn connect(config: &DatabaseConfig) -> Result<Client> {
    let (client, connection) = tokio_postgres::Config::new()
        .host(&config.host)
        .port(config.port)
        .user(&config.user)
        .password(&config.password)
        .dbname(&config.dbname)
        .connect(NoTls)
        .await?;

    // The connection object drives the socket; it must be polled for the
    // client to make progress
    tokio::spawn(async move {
        if let Err(error) = connection.await {
            tracing::error!("Database connection error: {error}");
        }
    });

    Ok(client)
}

/// Reloads every table in order inside a single transaction.
///
/// Dropping the transaction on any error rolls everything back, so a
/// failure partway through leaves yesterday's data intact.
pub async fn load_tables(client: &mut Client, loads: &[TableLoad]) -> Result<()> {
    let mut transaction = client.transaction().await?;
    run_tables(&mut transaction, loads).await?;
    transaction.commit().await?;
    Ok(())
}

/// Issues every truncate and insert in table order. The commit happens in
/// the caller, strictly after this returns `Ok`.
async fn run_tables<S: StatementSink>(sink: &mut S, loads: &[TableLoad]) -> Result<()> {
    for load in loads {
        let truncate = format!("TRUNCATE TABLE {} CASCADE", load.spec.name);
        sink.execute_sql(&truncate, &[]).await?;

        if load.rows.is_empty() {
            tracing::warn!("No rows for {}, table left empty", load.spec.name);
            continue;
        }

        let arity = load.spec.columns.len();
        for chunk in load.rows.chunks(rows_per_insert(arity)) {
            let statement = insert_statement(load.spec, chunk.len());
            let params = flatten_params(chunk);
            sink.execute_sql(&statement, &params).await?;
        }
        tracing::info!("Loaded {} rows into {}", load.rows.len(), load.spec.name);
    }

    Ok(())
}

/// Rows allowed in one insert before the parameter count would exceed the
/// protocol limit.
fn rows_per_insert(arity: usize) -> usize {
    (MAX_BIND_PARAMS / arity).max(1)
}

/// Builds one multi-row positional insert for `n_rows` rows.
fn insert_statement(spec: &TableSpec, n_rows: usize) -> String {
    let arity = spec.columns.len();
    let mut statement = format!(
        "INSERT INTO {} ({}) VALUES ",
        spec.name,
        spec.columns.join(", ")
    );

    for row in 0..n_rows {
        if row > 0 {
            statement.push_str(", ");
        }
        statement.push('(');
        for column in 0..arity {
            if column > 0 {
                statement.push_str(", ");
            }
            statement.push('$');
            statement.push_str(&(row * arity + column + 1).to_string());
        }
        statement.push(')');
    }

    statement
}

fn flatten_params(rows: &[Vec<SqlValue>]) -> Vec<&(dyn ToSql + Sync)> {
    rows.iter()
        .flatten()
        .map(|cell| cell as &(dyn ToSql + Sync))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{
        AD_AUDIENCE, NEWSLETTER_PERFORMANCE, PUBLICATIONS, UNIFIED_PERFORMANCE, URL_PERFORMANCE,
    };
    use crate::SyncError;

    /// Records every statement; fails any whose text contains `fail_on`.
    struct RecordingSink {
        executed: Vec<String>,
        fail_on: Option<&'static str>,
    }

    impl RecordingSink {
        fn new(fail_on: Option<&'static str>) -> Self {
            RecordingSink {
                executed: Vec::new(),
                fail_on,
            }
        }
    }

    impl StatementSink for RecordingSink {
        fn execute_sql<'a>(
            &'a mut self,
            sql: &'a str,
            _params: &'a [&'a (dyn ToSql + Sync)],
        ) -> SqlFuture<'a> {
            let fail = self.fail_on.is_some_and(|needle| sql.contains(needle));
            self.executed.push(sql.to_string());
            Box::pin(async move {
                if fail {
                    Err(SyncError::Io(std::io::Error::new(
                        std::io::ErrorKind::Other,
                        "insert rejected",
                    )))
                } else {
                    Ok(1)
                }
            })
        }
    }

    fn null_row(spec: &TableSpec) -> Vec<SqlValue> {
        spec.columns.iter().map(|_| SqlValue::Null).collect()
    }

    fn load_with_rows(spec: &'static TableSpec, n: usize) -> TableLoad {
        let mut load = TableLoad::new(spec);
        for _ in 0..n {
            load.push(null_row(spec));
        }
        load
    }

    #[test]
    fn insert_statement_numbers_placeholders_across_rows() {
        let spec = TableSpec {
            name: "t",
            columns: &["a", "b", "c"],
        };
        assert_eq!(
            insert_statement(&spec, 2),
            "INSERT INTO t (a, b, c) VALUES ($1, $2, $3), ($4, $5, $6)"
        );
    }

    #[test]
    fn insert_statement_single_row() {
        let spec = TableSpec {
            name: "pair",
            columns: &["x", "y"],
        };
        assert_eq!(
            insert_statement(&spec, 1),
            "INSERT INTO pair (x, y) VALUES ($1, $2)"
        );
    }

    #[test]
    fn params_flatten_in_row_major_order() {
        let load = load_with_rows(&URL_PERFORMANCE, 2);
        let params = flatten_params(&load.rows);
        assert_eq!(params.len(), 2 * URL_PERFORMANCE.columns.len());
    }

    #[test]
    fn chunk_size_stays_under_the_parameter_cap() {
        // The widest tables have 24 columns: 2730 * 24 = 65520 <= 65535
        assert_eq!(rows_per_insert(24), 2730);
        assert_eq!(rows_per_insert(17), 3855);
        for arity in 1..=32 {
            assert!(rows_per_insert(arity) * arity <= MAX_BIND_PARAMS);
            assert!(rows_per_insert(arity) >= 1);
        }
    }

    #[tokio::test]
    async fn oversized_loads_split_into_capped_inserts() {
        // One row past the 17-column chunk boundary forces a second insert
        let loads = vec![load_with_rows(&AD_AUDIENCE, 3856)];
        let mut sink = RecordingSink::new(None);

        run_tables(&mut sink, &loads).await.unwrap();

        let inserts: Vec<&String> = sink
            .executed
            .iter()
            .filter(|sql| sql.starts_with("INSERT"))
            .collect();
        assert_eq!(inserts.len(), 2);
        assert!(inserts[0].contains(&format!("${}", 3855 * 17)));
        assert!(!inserts[0].contains(&format!("${}", 3855 * 17 + 1)));
        assert!(inserts[1].ends_with("($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)"));
    }

    #[tokio::test]
    async fn tables_run_in_order_truncate_before_insert() {
        let loads = vec![
            load_with_rows(&NEWSLETTER_PERFORMANCE, 1),
            load_with_rows(&URL_PERFORMANCE, 0),
            load_with_rows(&UNIFIED_PERFORMANCE, 1),
        ];
        let mut sink = RecordingSink::new(None);

        run_tables(&mut sink, &loads).await.unwrap();

        let executed = &sink.executed;
        assert_eq!(executed[0], "TRUNCATE TABLE newsletter_performance_table CASCADE");
        assert!(executed[1].starts_with("INSERT INTO newsletter_performance_table"));
        // Empty tables truncate but insert nothing
        assert_eq!(executed[2], "TRUNCATE TABLE url_performance_table CASCADE");
        assert_eq!(executed[3], "TRUNCATE TABLE unified_performance_table CASCADE");
        assert!(executed[4].starts_with("INSERT INTO unified_performance_table"));
        assert_eq!(executed.len(), 5);
    }

    #[tokio::test]
    async fn failure_in_third_table_stops_before_any_commit() {
        let loads = vec![
            load_with_rows(&NEWSLETTER_PERFORMANCE, 1),
            load_with_rows(&URL_PERFORMANCE, 1),
            load_with_rows(&UNIFIED_PERFORMANCE, 1),
            load_with_rows(&PUBLICATIONS, 1),
        ];
        let mut sink = RecordingSink::new(Some("INSERT INTO unified_performance_table"));

        let result = run_tables(&mut sink, &loads).await;

        // The error reaches the caller before `load_tables` would commit,
        // so the first two tables' statements stay uncommitted
        assert!(matches!(result, Err(SyncError::Io(_))));
        let last = sink.executed.last().unwrap();
        assert!(last.starts_with("INSERT INTO unified_performance_table"));
        assert!(!sink
            .executed
            .iter()
            .any(|sql| sql.contains("publications_table")));
    }
}
