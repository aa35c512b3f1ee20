use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::error::{JsonPayloadError, PathError, QueryPayloadError};
use actix_web::middleware::NormalizePath;
use actix_web::{get, HttpRequest, HttpResponse, Responder};
use actix_web::{web, App, HttpServer};

use serde::Serialize;

use tracing_actix_web::TracingLogger;

use crate::controller::{subscriptions, RestError};
use crate::service::SubscriptionService;

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: &'static str,
    message: &'static str,
}

/// Simple health-check endpoint
#[tracing::instrument(name = "Health check")]
#[get("/health")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthStatus {
        status: "ok",
        message: "Subscription service is running",
    })
}

fn json_error(e: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::warn!("Rejected request body: {}", e);
    RestError::BadRequest(e.to_string()).into()
}

fn query_error(e: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::warn!("Rejected query string: {}", e);
    RestError::BadRequest(e.to_string()).into()
}

fn path_error(e: PathError, _req: &HttpRequest) -> actix_web::Error {
    tracing::warn!("Rejected path: {}", e);
    RestError::BadRequest("Invalid ID format".into()).into()
}

/// Run the application on a specified TCP listener
pub fn run(listener: TcpListener, service: SubscriptionService) -> anyhow::Result<Server> {
    // Wrap application data
    let service = web::Data::new(service);

    // Start the server
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            // `/api/v1/subscriptions/` is served the same as `/api/v1/subscriptions`
            .wrap(NormalizePath::trim())
            .app_data(service.clone())
            .app_data(web::JsonConfig::default().error_handler(json_error))
            .app_data(web::QueryConfig::default().error_handler(query_error))
            .app_data(web::PathConfig::default().error_handler(path_error))
            .service(health_check)
            .service(web::scope("/api/v1").service(subscriptions::scope()))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
