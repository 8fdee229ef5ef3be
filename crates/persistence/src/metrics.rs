//! Database metrics collection.

use metrics::{counter, gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

/// Record database query duration.
pub fn record_query_duration(query_name: &str, duration_secs: f64) {
    histogram!(
        "database_query_duration_seconds",
        "query" => query_name.to_string()
    )
    .record(duration_secs);
}

/// Record connection pool size, split into active and idle.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();
    let active = size.saturating_sub(idle);

    gauge!("database_connections_active").set(active as f64);
    gauge!("database_connections_idle").set(idle as f64);
    gauge!("database_connections_total").set(size as f64);
}

/// Record the outcome of a commit and how many changes it carried.
pub fn record_commit(changes: usize, success: bool) {
    let outcome = if success { "committed" } else { "rolled_back" };
    counter!("storage_commits_total", "outcome" => outcome).increment(1);
    if success {
        counter!("storage_committed_changes_total").increment(changes as u64);
    }
}

/// Times a query and records it on [`QueryTimer::record`].
///
/// ```ignore
/// let timer = QueryTimer::new("all_states");
/// let rows = sqlx::query_as::<_, StateEntity>(...).fetch_all(&pool).await;
/// timer.record();
/// ```
pub struct QueryTimer {
    query_name: String,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query_name: impl Into<String>) -> Self {
        Self {
            query_name: query_name.into(),
            start: Instant::now(),
        }
    }

    pub fn record(self) {
        let duration = self.start.elapsed().as_secs_f64();
        record_query_duration(&self.query_name, duration);
    }
}
