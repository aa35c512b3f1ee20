use actix_web::dev::HttpServiceFactory;
use actix_web::{delete, get, post, web, HttpResponse, Responder};

use crate::controller::RestResult;
use crate::model::{CostQuery, CreateSubscriptionRequest, TotalCost};
use crate::service::SubscriptionService;

/// Create endpoint for new subscriptions
#[tracing::instrument(name = "Create a new subscription", skip(service))]
#[post("")]
async fn create(
    service: web::Data<SubscriptionService>,
    body: web::Json<CreateSubscriptionRequest>,
) -> RestResult<impl Responder> {
    let subscription = service.create(body.into_inner()).await?;

    Ok(HttpResponse::Created().json(subscription))
}

#[tracing::instrument(name = "List all subscriptions", skip(service))]
#[get("")]
async fn list(service: web::Data<SubscriptionService>) -> RestResult<impl Responder> {
    let subscriptions = service.list().await?;

    tracing::info!(count = subscriptions.len(), "Fetched all subscriptions");
    Ok(HttpResponse::Ok().json(subscriptions))
}

/// Total price of subscriptions active during the requested window
#[tracing::instrument(name = "Calculate total subscription cost", skip(service))]
#[get("/cost")]
async fn cost(
    service: web::Data<SubscriptionService>,
    query: web::Query<CostQuery>,
) -> RestResult<impl Responder> {
    let total_cost = service.total_cost(query.into_inner()).await?;

    Ok(HttpResponse::Ok().json(TotalCost { total_cost }))
}

#[tracing::instrument(name = "Fetch a subscription by id", skip(service))]
#[get("/{id}")]
async fn fetch(
    service: web::Data<SubscriptionService>,
    path: web::Path<(i32,)>,
) -> RestResult<impl Responder> {
    let (id,) = path.into_inner();

    let subscription = service.get(id).await?;

    Ok(HttpResponse::Ok().json(subscription))
}

#[tracing::instrument(name = "Delete a subscription by id", skip(service))]
#[delete("/{id}")]
async fn remove(
    service: web::Data<SubscriptionService>,
    path: web::Path<(i32,)>,
) -> RestResult<impl Responder> {
    let (id,) = path.into_inner();

    service.delete(id).await?;

    tracing::info!(subscription_id = id, "Deleted subscription");
    Ok(HttpResponse::NoContent().finish())
}

/// Subscriptions API endpoints
pub fn scope() -> impl HttpServiceFactory {
    // NOTE: `/cost` must be registered ahead of `/{id}`
    web::scope("/subscriptions")
        .service(create)
        .service(list)
        .service(cost)
        .service(fetch)
        .service(remove)
}
