use image::RgbaImage;
use log::{debug, info};
use serde_json::Value;

use crate::client::DesignApi;
use crate::controller::StyleController;
use crate::error::ConsoleError;
use crate::models::customer::Customer;
use crate::models::design::{RecordId, SavedDesign};
use crate::models::style::{HexColor, StyleConfig};
use crate::qr::compose::{Compositor, DEFAULT_MAX_CANVAS_PX, LogoOverlay};
use crate::qr::encode::{RasterSurface, render_code};
use crate::qr::payload::EncodedPayload;
use crate::repository::DesignRepository;

/// PNG ready to be offered as a download.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub filename: String,
    pub size: u32,
    pub png: Vec<u8>,
}

/// One open QR editor for one customer.
///
/// State belongs to the instance and is dropped with it. Actions that depend on
/// an earlier step are guarded: export needs a rendered preview, and loading a
/// design needs a completed design fetch.
pub struct QrEditor<A> {
    style: StyleController,
    payload: EncodedPayload,
    caption: String,
    export_filename: String,
    logo: Option<LogoOverlay>,
    max_canvas: u32,
    base: Option<RasterSurface>,
    base_key: Option<(u32, HexColor)>,
    designs: Option<DesignRepository<A>>,
    status: Option<String>,
}

fn no_designs() -> ConsoleError {
    ConsoleError::validation("This QR code has no saved designs")
}

impl<A: DesignApi> QrEditor<A> {
    /// Designs are only available when the customer has a QR record.
    pub fn open(customer: &Customer, redirect_base: &str, api: A) -> Result<Self, ConsoleError> {
        let payload = EncodedPayload::for_redirect(redirect_base, customer.redirect_code())?;
        debug!("Opening editor for {}", payload);
        Ok(Self {
            style: StyleController::new(),
            payload,
            caption: customer.caption(),
            export_filename: customer.export_filename(),
            logo: None,
            max_canvas: DEFAULT_MAX_CANVAS_PX,
            base: None,
            base_key: None,
            designs: customer
                .qr_id
                .clone()
                .map(|qr_id| DesignRepository::new(api, qr_id)),
            status: None,
        })
    }

    pub fn with_style(mut self, style: StyleConfig) -> Self {
        self.style.load(style);
        self
    }

    pub fn with_logo(mut self, logo: Option<LogoOverlay>) -> Self {
        self.logo = logo;
        self
    }

    pub fn with_max_canvas(mut self, max_px: u32) -> Self {
        self.max_canvas = max_px;
        self
    }

    pub fn style(&self) -> &StyleConfig {
        self.style.config()
    }

    pub fn payload(&self) -> &EncodedPayload {
        &self.payload
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn export_filename(&self) -> &str {
        &self.export_filename
    }

    /// Transient message for the user, e.g. "Design saved!".
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn designs(&self) -> &[SavedDesign] {
        self.designs.as_ref().map(|r| r.designs()).unwrap_or_default()
    }

    pub fn set_field(&mut self, path: &str, value: &Value) -> Result<(), ConsoleError> {
        self.style.set_field(path, value)
    }

    pub fn reset(&mut self) {
        self.style.reset();
    }

    /// Encode the code surface, again only when its size or color changed.
    pub fn ensure_base(&mut self) -> Result<(), ConsoleError> {
        let config = self.style.config();
        let key = (config.code_size, config.foreground_color);
        if self.base.is_none() || self.base_key != Some(key) {
            debug!("Encoding {}px code for {}", key.0, self.payload);
            self.base = Some(render_code(&self.payload, key.0, key.1, HexColor::WHITE)?);
            self.base_key = Some(key);
        }
        Ok(())
    }

    fn compositor(&self) -> Compositor<'_> {
        Compositor::new(self.style.config())
            .with_logo(self.logo.as_ref())
            .with_max_canvas(self.max_canvas)
    }

    pub fn render_preview(&mut self) -> Result<RgbaImage, ConsoleError> {
        self.ensure_base()?;
        let base = self.base.as_ref().ok_or(ConsoleError::NotRendered)?;
        self.compositor().preview(base)
    }

    pub fn download_enabled(&self) -> bool {
        self.base.is_some()
    }

    /// Run the export pipeline with the current style. Does nothing until a
    /// preview has rendered once.
    pub fn export(&mut self) -> Result<Option<ExportedFile>, ConsoleError> {
        if self.base.is_none() {
            debug!("Export requested before the preview rendered, ignoring");
            return Ok(None);
        }
        self.ensure_base()?;
        let base = self.base.as_ref().ok_or(ConsoleError::NotRendered)?;
        let exported = self.compositor().export(base)?;
        let png = exported.to_png()?;
        info!(
            "Exported {} ({}px, {} bytes)",
            self.export_filename,
            exported.size(),
            png.len()
        );
        Ok(Some(ExportedFile {
            filename: self.export_filename.clone(),
            size: exported.size(),
            png,
        }))
    }

    pub fn load_enabled(&self) -> bool {
        self.designs.as_ref().is_some_and(|r| r.is_loaded())
    }

    /// Record a status for a failed design action and hand the error back.
    fn report(&mut self, err: ConsoleError, action: &str) -> ConsoleError {
        self.status = Some(match &err {
            ConsoleError::Validation(message) => message.clone(),
            ConsoleError::Unauthorized { .. } => err.to_string(),
            e if e.is_transport() => format!("Error: {}", e),
            _ => format!("Error {}", action),
        });
        err
    }

    pub async fn refresh_designs(&mut self) -> Result<(), ConsoleError> {
        let result = match self.designs.as_mut() {
            Some(repository) => repository.list().await.map(|_| ()),
            None => Err(no_designs()),
        };
        result.map_err(|e| self.report(e, "loading designs"))
    }

    pub async fn save_design(&mut self, name: &str) -> Result<SavedDesign, ConsoleError> {
        let style = self.style.config().clone();
        let result = match self.designs.as_mut() {
            Some(repository) => repository.create(name, &style).await,
            None => Err(no_designs()),
        };
        match result {
            Ok(design) => {
                self.status = Some("Design saved!".to_string());
                Ok(design)
            }
            Err(e) => Err(self.report(e, "saving design")),
        }
    }

    /// Copy a saved design into the working style. Each field was already
    /// resolved with its own default when the list was fetched.
    pub fn load_design(&mut self, design_id: &RecordId) -> Result<(), ConsoleError> {
        if !self.load_enabled() {
            return Err(ConsoleError::validation("Saved designs are still loading"));
        }
        let style = self
            .designs
            .as_ref()
            .and_then(|r| r.find(design_id))
            .map(|d| d.style.clone())
            .ok_or_else(|| ConsoleError::NotFound(format!("Design {}", design_id)))?;
        self.style.load(style);
        Ok(())
    }

    pub async fn delete_design(&mut self, design_id: &RecordId) -> Result<(), ConsoleError> {
        let result = match self.designs.as_mut() {
            Some(repository) => repository.delete(design_id).await,
            None => Err(no_designs()),
        };
        result.map_err(|e| self.report(e, "deleting design"))
    }
}
