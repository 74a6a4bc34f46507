use actix_web::{HttpResponse, web};

use crate::client::DesignApi;
use crate::error::ConsoleError;
use crate::middlewares::authmw::BearerToken;
use crate::models::design::{DesignRecord, DesignView, RecordId};
use crate::repository::DesignRepository;
use crate::state::app_state::AppState;

pub async fn list_designs(
    app_state: web::Data<AppState>,
    token: web::ReqData<BearerToken>,
    path: web::Path<String>,
) -> Result<HttpResponse, ConsoleError> {
    let qr_id = RecordId::from(path.as_str());
    let mut repository = DesignRepository::new(app_state.api_client(token.as_str()), qr_id);
    let designs: Vec<DesignView> = repository
        .list()
        .await?
        .iter()
        .map(DesignView::from)
        .collect();

    Ok(HttpResponse::Ok().json(designs))
}

/// Body uses the stored column names; unreadable columns take their defaults.
pub async fn create_design(
    app_state: web::Data<AppState>,
    token: web::ReqData<BearerToken>,
    path: web::Path<String>,
    web::Json(record): web::Json<DesignRecord>,
) -> Result<HttpResponse, ConsoleError> {
    let qr_id = RecordId::from(path.as_str());
    let mut repository = DesignRepository::new(app_state.api_client(token.as_str()), qr_id);
    let design = repository.create(&record.name(), &record.style()).await?;

    Ok(HttpResponse::Created().json(DesignView::from(&design)))
}

pub async fn delete_design(
    app_state: web::Data<AppState>,
    token: web::ReqData<BearerToken>,
    path: web::Path<String>,
) -> Result<HttpResponse, ConsoleError> {
    let design_id = RecordId::from(path.as_str());
    app_state
        .api_client(token.as_str())
        .delete_design(&design_id)
        .await?;

    Ok(HttpResponse::NoContent().finish())
}
