use actix_web::web;

use crate::handlers::customer_handlers::{
    create_customer, delete_customer, list_customers, update_customer,
};
use crate::handlers::design_handlers::{create_design, delete_design, list_designs};
use crate::handlers::health_handlers::health_check;
use crate::handlers::qr_code_handlers::{create_qr_code, list_qr_codes, update_qr_code};
use crate::handlers::qr_handlers::{export_qr, preview_qr};
use crate::middlewares::authmw::BearerAuth;

/// Configure the routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // Health check - no auth required
    cfg.route("/api/health/check", web::get().to(health_check));
    // API routes - require a bearer token
    cfg.service(
        web::scope("/api")
            .wrap(BearerAuth)
            .route("/qr/preview", web::post().to(preview_qr))
            .route("/qr/export", web::post().to(export_qr))
            .route("/qr/{qr_id}/designs", web::get().to(list_designs))
            .route("/qr/{qr_id}/designs", web::post().to(create_design))
            .route("/designs/{design_id}", web::delete().to(delete_design))
            .route("/customers", web::get().to(list_customers))
            .route("/customers", web::post().to(create_customer))
            .route("/customers/{customer_id}", web::put().to(update_customer))
            .route("/customers/{customer_id}", web::delete().to(delete_customer))
            .route("/customers/{customer_id}/qrcodes", web::get().to(list_qr_codes))
            .route("/customers/{customer_id}/qrcodes", web::post().to(create_qr_code))
            .route("/qrcodes/{qr_id}", web::put().to(update_qr_code)),
    );
}
