use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, web};
use log::info;

use crate::client::ApiClient;
use crate::editor::QrEditor;
use crate::error::ConsoleError;
use crate::middlewares::authmw::BearerToken;
use crate::qr::compose::encode_png;
use crate::state::app_state::AppState;
use crate::structs::qr_request::QrRenderRequest;

/// Replay a render request onto a fresh editor: base style, saved design, then edits.
async fn open_editor(
    app_state: &AppState,
    token: &BearerToken,
    req: QrRenderRequest,
) -> Result<QrEditor<ApiClient>, ConsoleError> {
    let logo = req.logo_overlay()?;
    let api = app_state.api_client(token.as_str());
    let mut editor = QrEditor::open(&req.customer, &app_state.redirect_base, api)?
        .with_logo(logo)
        .with_max_canvas(app_state.config.max_canvas_px);

    if let Some(style) = req.style {
        editor = editor.with_style(style);
    }
    if let Some(design_id) = &req.design_id {
        editor.refresh_designs().await?;
        editor.load_design(design_id)?;
    }
    for edit in &req.edits {
        editor.set_field(&edit.path, &edit.value)?;
    }
    Ok(editor)
}

/// On-screen preview at display resolution.
pub async fn preview_qr(
    app_state: web::Data<AppState>,
    token: web::ReqData<BearerToken>,
    web::Json(req): web::Json<QrRenderRequest>,
) -> Result<HttpResponse, ConsoleError> {
    let mut editor = open_editor(&app_state, &token, req).await?;
    let preview = editor.render_preview()?;
    let png = encode_png(&preview)?;

    Ok(HttpResponse::Ok().content_type("image/png").body(png))
}

/// Supersampled export, returned as a PNG download.
pub async fn export_qr(
    app_state: web::Data<AppState>,
    token: web::ReqData<BearerToken>,
    web::Json(req): web::Json<QrRenderRequest>,
) -> Result<HttpResponse, ConsoleError> {
    let mut editor = open_editor(&app_state, &token, req).await?;
    editor.ensure_base()?;
    let file = editor.export()?.ok_or(ConsoleError::NotRendered)?;
    info!("Serving export {} for {}", file.filename, editor.payload());

    Ok(HttpResponse::Ok()
        .content_type("image/png")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file.filename)],
        })
        .body(file.png))
}
