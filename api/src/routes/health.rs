use actix_web::{web, HttpResponse};
use serde_json::{json, Value};
use um_infra::PoolStatistics;

use super::AppState;

/// GET /health
///
/// Reports `healthy` unless a configured database fails its check, in which
/// case the status is 503. A configured pool also reports its connection
/// counts under `pool`.
pub async fn health<S: 'static>(state: web::Data<AppState<S>>) -> HttpResponse {
    let (database, pool) = match &state.database {
        None => ("not_configured", Value::Null),
        Some(pool) => {
            let status = match pool.health_check().await {
                Ok(true) => "up",
                Ok(false) | Err(_) => "down",
            };
            (status, pool_json(&pool.get_statistics()))
        }
    };

    let healthy = database != "down";
    let body = json!({
        "status": if healthy { "healthy" } else { "unhealthy" },
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "database": database,
        "pool": pool,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    if healthy {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    }
}

fn pool_json(stats: &PoolStatistics) -> Value {
    json!({
        "connections": stats.connections,
        "idle": stats.idle_connections,
        "max": stats.max_connections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_json_reports_counts() {
        let stats = PoolStatistics {
            connections: 5,
            idle_connections: 3,
            max_connections: 10,
        };

        assert_eq!(
            pool_json(&stats),
            json!({ "connections": 5, "idle": 3, "max": 10 })
        );
    }
}
