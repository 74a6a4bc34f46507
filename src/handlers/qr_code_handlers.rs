use actix_web::{HttpResponse, web};
use log::info;
use validator::Validate;

use crate::client::QrCodeApi;
use crate::error::ConsoleError;
use crate::middlewares::authmw::BearerToken;
use crate::models::design::RecordId;
use crate::models::qr_record::QrRecordView;
use crate::state::app_state::AppState;
use crate::structs::qr_code_request::QrCodeForm;

async fn qr_code_views<A: QrCodeApi>(
    api: &A,
    customer_id: &RecordId,
    redirect_base: &str,
) -> Result<Vec<QrRecordView>, ConsoleError> {
    let records = api.list_qr_codes(customer_id).await?;
    Ok(records
        .into_iter()
        .map(|record| QrRecordView::new(record, redirect_base))
        .collect())
}

pub async fn list_qr_codes(
    app_state: web::Data<AppState>,
    token: web::ReqData<BearerToken>,
    path: web::Path<String>,
) -> Result<HttpResponse, ConsoleError> {
    let api = app_state.api_client(token.as_str());
    let customer_id = RecordId::from(path.as_str());
    let codes = qr_code_views(&api, &customer_id, &app_state.redirect_base).await?;

    Ok(HttpResponse::Ok().json(codes))
}

pub async fn create_qr_code(
    app_state: web::Data<AppState>,
    token: web::ReqData<BearerToken>,
    path: web::Path<String>,
    web::Json(req): web::Json<QrCodeForm>,
) -> Result<HttpResponse, ConsoleError> {
    let req = req.normalized();
    if let Err(errors) = req.validate() {
        return Ok(HttpResponse::BadRequest().json(errors));
    }

    let customer_id = RecordId::from(path.as_str());
    let created = app_state
        .api_client(token.as_str())
        .create_qr_code(&customer_id, &req)
        .await?;
    info!("Created {} QR code for customer {}", req.qr_type, customer_id);

    Ok(HttpResponse::Created().json(created))
}

pub async fn update_qr_code(
    app_state: web::Data<AppState>,
    token: web::ReqData<BearerToken>,
    path: web::Path<String>,
    web::Json(req): web::Json<QrCodeForm>,
) -> Result<HttpResponse, ConsoleError> {
    let req = req.normalized();
    if let Err(errors) = req.validate() {
        return Ok(HttpResponse::BadRequest().json(errors));
    }

    let qr_id = RecordId::from(path.as_str());
    let updated = app_state
        .api_client(token.as_str())
        .update_qr_code(&qr_id, &req)
        .await?;

    Ok(HttpResponse::Ok().json(updated))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::qr_record::QrRecord;
    use serde_json::Value;

    #[derive(Default)]
    struct FakeQrCodeApi {
        records: Vec<QrRecord>,
    }

    impl QrCodeApi for FakeQrCodeApi {
        async fn list_qr_codes(&self, customer_id: &RecordId) -> Result<Vec<QrRecord>, ConsoleError> {
            Ok(self
                .records
                .iter()
                .filter(|r| r.customer_id.as_ref() == Some(customer_id))
                .cloned()
                .collect())
        }

        async fn create_qr_code(
            &self,
            _customer_id: &RecordId,
            _qr: &QrCodeForm,
        ) -> Result<Value, ConsoleError> {
            Ok(Value::Null)
        }

        async fn update_qr_code(&self, _qr_id: &RecordId, _qr: &QrCodeForm) -> Result<Value, ConsoleError> {
            Ok(Value::Null)
        }
    }

    fn record(id: i64, customer_id: i64, code: Option<&str>) -> QrRecord {
        QrRecord {
            id: Some(RecordId::Number(id)),
            customer_id: Some(RecordId::Number(customer_id)),
            redirect_code: code.map(String::from),
            ..QrRecord::default()
        }
    }

    #[actix_web::test]
    async fn lists_only_the_customers_codes() {
        let api = FakeQrCodeApi {
            records: vec![
                record(1, 5, Some("a1")),
                record(2, 6, Some("b2")),
                record(3, 5, None),
            ],
        };
        let views = qr_code_views(&api, &RecordId::Number(5), "https://oilqr.com")
            .await
            .unwrap();
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].qr_value.as_deref(), Some("https://oilqr.com/r/a1"));
        assert!(views[1].qr_value.is_none());
    }

    #[actix_web::test]
    async fn customer_without_codes_gets_an_empty_list() {
        let views = qr_code_views(&FakeQrCodeApi::default(), &RecordId::Number(9), "https://oilqr.com")
            .await
            .unwrap();
        assert!(views.is_empty());
    }
}
