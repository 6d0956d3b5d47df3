//! Command/query execution
//!
//! Handlers are plain async functions (`handle(pool, request)`). Routes run
//! them through [`execute_command`] or [`execute_query`], which time the call
//! and log its outcome under the request type's name.

use std::fmt::Display;
use std::future::Future;
use std::time::Instant;

use mediator::Request;

pub mod middleware;

use middleware::{Command, Query};

fn request_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full)
}

/// Run a write operation.
pub async fn execute_command<C, R, E, F, Fut>(command: C, handler: F) -> Result<R, E>
where
    C: Command + Request<Result<R, E>>,
    F: FnOnce(C) -> Fut,
    Fut: Future<Output = Result<R, E>>,
    E: Display,
{
    let name = request_name::<C>();
    let started = Instant::now();
    let result = handler(command).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match &result {
        Ok(_) => tracing::info!(command = name, elapsed_ms, "Command completed"),
        Err(err) => tracing::warn!(command = name, elapsed_ms, error = %err, "Command failed"),
    }

    result
}

/// Run a read operation.
pub async fn execute_query<Q, R, E, F, Fut>(query: Q, handler: F) -> Result<R, E>
where
    Q: Query + Request<Result<R, E>>,
    F: FnOnce(Q) -> Fut,
    Fut: Future<Output = Result<R, E>>,
    E: Display,
{
    let name = request_name::<Q>();
    let started = Instant::now();
    let result = handler(query).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match &result {
        Ok(_) => tracing::debug!(query = name, elapsed_ms, "Query completed"),
        Err(err) => tracing::debug!(query = name, elapsed_ms, error = %err, "Query failed"),
    }

    result
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct RenameThing {
        name: String,
    }

    impl Request<Result<String, String>> for RenameThing {}
    impl Command for RenameThing {}

    #[derive(Debug)]
    struct CountThings;

    impl Request<Result<u64, String>> for CountThings {}
    impl Query for CountThings {}

    #[test]
    fn test_request_name_is_unqualified() {
        assert_eq!(request_name::<RenameThing>(), "RenameThing");
    }

    #[tokio::test]
    async fn test_execute_command_passes_result_through() {
        let ok = execute_command(RenameThing { name: "a".into() }, |c| async move {
            Ok::<_, String>(c.name.to_uppercase())
        })
        .await;
        assert_eq!(ok.unwrap(), "A");

        let err = execute_command(RenameThing { name: String::new() }, |_| async {
            Err::<String, _>("name is required".to_string())
        })
        .await;
        assert_eq!(err.unwrap_err(), "name is required");
    }

    #[tokio::test]
    async fn test_execute_query_passes_result_through() {
        let count = execute_query(CountThings, |_| async { Ok::<_, String>(3) }).await;
        assert_eq!(count.unwrap(), 3);
    }
}
