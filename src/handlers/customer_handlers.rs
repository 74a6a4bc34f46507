use actix_web::{HttpResponse, web};
use log::info;
use validator::Validate;

use crate::client::CustomerApi;
use crate::error::ConsoleError;
use crate::middlewares::authmw::BearerToken;
use crate::models::customer::CustomerView;
use crate::models::design::RecordId;
use crate::state::app_state::AppState;
use crate::structs::customer_request::{CustomerUpdate, NewCustomer};

async fn customer_views<A: CustomerApi>(
    api: &A,
    redirect_base: &str,
) -> Result<Vec<CustomerView>, ConsoleError> {
    let customers = api.list_customers().await?;
    Ok(customers
        .into_iter()
        .map(|customer| CustomerView::new(customer, redirect_base))
        .collect())
}

pub async fn list_customers(
    app_state: web::Data<AppState>,
    token: web::ReqData<BearerToken>,
) -> Result<HttpResponse, ConsoleError> {
    let api = app_state.api_client(token.as_str());
    let customers = customer_views(&api, &app_state.redirect_base).await?;

    Ok(HttpResponse::Ok().json(customers))
}

pub async fn create_customer(
    app_state: web::Data<AppState>,
    token: web::ReqData<BearerToken>,
    web::Json(req): web::Json<NewCustomer>,
) -> Result<HttpResponse, ConsoleError> {
    let req = req.trimmed();
    if let Err(errors) = req.validate() {
        return Ok(HttpResponse::BadRequest().json(errors));
    }

    let created = app_state
        .api_client(token.as_str())
        .create_customer(&req)
        .await?;
    info!("Created customer {}", req.first_name);

    Ok(HttpResponse::Created().json(created))
}

/// Edits contact details and the destination. The redirect code stays, so
/// printed codes follow the new destination.
pub async fn update_customer(
    app_state: web::Data<AppState>,
    token: web::ReqData<BearerToken>,
    path: web::Path<String>,
    web::Json(req): web::Json<CustomerUpdate>,
) -> Result<HttpResponse, ConsoleError> {
    let req = req.trimmed();
    if let Err(errors) = req.validate() {
        return Ok(HttpResponse::BadRequest().json(errors));
    }

    let customer_id = RecordId::from(path.as_str());
    let updated = app_state
        .api_client(token.as_str())
        .update_customer(&customer_id, &req)
        .await?;
    info!("Updated customer {}", customer_id);

    Ok(HttpResponse::Ok().json(updated))
}

pub async fn delete_customer(
    app_state: web::Data<AppState>,
    token: web::ReqData<BearerToken>,
    path: web::Path<String>,
) -> Result<HttpResponse, ConsoleError> {
    let customer_id = RecordId::from(path.as_str());
    app_state
        .api_client(token.as_str())
        .delete_customer(&customer_id)
        .await?;
    info!("Deleted customer {}", customer_id);

    Ok(HttpResponse::NoContent().finish())
}
