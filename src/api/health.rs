use actix_web::{HttpResponse, Responder, get, web};
use serde::Serialize;
use sqlx::{Pool, Postgres};
use tracing::error;

/// Probe response
#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    status: &'static str,
    database: &'static str,
}

async fn database_reachable(pool: &Pool<Postgres>, probe: &str) -> bool {
    match sqlx::query("SELECT 1").execute(pool).await {
        Ok(_) => true,
        Err(e) => {
            error!("{} probe failed: database unavailable: {:?}", probe, e);
            false
        }
    }
}

/// General health check including database connectivity.
/// Use for load balancers and uptime monitors.
#[get("/health")]
async fn health_check(pool: web::Data<Pool<Postgres>>) -> impl Responder {
    if database_reachable(pool.get_ref(), "Health").await {
        HttpResponse::Ok().json(HealthResponse {
            ok: true,
            status: "healthy",
            database: "connected",
        })
    } else {
        HttpResponse::ServiceUnavailable().json(HealthResponse {
            ok: false,
            status: "unhealthy",
            database: "disconnected",
        })
    }
}

/// Readiness probe: 503 while the database is unreachable, recovers with it.
#[get("/ready")]
async fn readiness_check(pool: web::Data<Pool<Postgres>>) -> impl Responder {
    if database_reachable(pool.get_ref(), "Readiness").await {
        HttpResponse::Ok().json(HealthResponse {
            ok: true,
            status: "ready",
            database: "connected",
        })
    } else {
        HttpResponse::ServiceUnavailable().json(HealthResponse {
            ok: false,
            status: "not_ready",
            database: "disconnected",
        })
    }
}

/// Liveness probe; never touches dependencies.
#[get("/live")]
async fn liveness_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        status: "alive",
        database: "not_checked",
    })
}

pub fn health_config(config: &mut web::ServiceConfig) {
    config
        .service(health_check)
        .service(readiness_check)
        .service(liveness_check);
}
