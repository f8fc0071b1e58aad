/// HTTP route handlers
pub mod ai;
pub mod analytics;
pub mod auth;
pub mod brands;
pub mod connections;
pub mod deals;
pub mod deliverables;
pub mod invoices;
pub mod negotiations;
pub mod posts;
pub mod revenue;
pub mod team;
pub mod tickets;

use actix_web::{web, HttpResponse};
use serde_json::json;

/// Liveness probe
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok", "service": "studio-service" }))
}

/// Routes that require a bearer token.
pub fn configure_protected(cfg: &mut web::ServiceConfig) {
    cfg.route("/auth/me", web::get().to(auth::me));
    brands::configure(cfg);
    deals::configure(cfg);
    deliverables::configure(cfg);
    revenue::configure(cfg);
    invoices::configure(cfg);
    negotiations::configure(cfg);
    team::configure(cfg);
    tickets::configure(cfg);
    posts::configure(cfg);
    connections::configure(cfg);
    analytics::configure(cfg);
    ai::configure(cfg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    #[actix_rt::test]
    async fn test_health_endpoint() {
        let app =
            test::init_service(App::new().route("/api/health", web::get().to(health))).await;
        let req = test::TestRequest::get().uri("/api/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
    }
}
