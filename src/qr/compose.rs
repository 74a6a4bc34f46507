use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbaImage};
use log::debug;

use crate::error::ConsoleError;
use crate::models::style::StyleConfig;
use crate::qr::encode::RasterSurface;
use crate::qr::raster::{clip_rounded_corners, stroke_rounded_border};

/// Supersampling factor of the export canvas.
pub const SUPERSAMPLE: u32 = 2;

pub const DEFAULT_LOGO_PERCENT: u32 = 20;
const MIN_LOGO_PERCENT: u32 = 5;
const MAX_LOGO_PERCENT: u32 = 40;

/// Largest canvas side composed in memory unless configured otherwise.
pub const DEFAULT_MAX_CANVAS_PX: u32 = 8192;

/// Pixel measurements of one compositing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub qr_px: u32,
    pub pad: u32,
    pub border: u32,
    pub radius: u32,
    pub canvas_size: u32,
}

impl Geometry {
    pub fn at_scale(style: &StyleConfig, factor: u32) -> Self {
        let qr_px = style.code_size * factor;
        let pad = style.effective_padding() * factor;
        let border = style.effective_border() * factor;
        let radius = style.effective_radius() * factor;
        Self {
            qr_px,
            pad,
            border,
            radius,
            canvas_size: qr_px + 2 * pad + 2 * border,
        }
    }

    /// Display resolution, no supersampling.
    pub fn preview(style: &StyleConfig) -> Self {
        Self::at_scale(style, 1)
    }

    /// Supersampled canvas for the chosen export quality.
    pub fn export(style: &StyleConfig) -> Self {
        Self::at_scale(style, style.export_quality.supersampled_scale())
    }

    /// Distance from each canvas edge to the code.
    pub fn code_offset(&self) -> u32 {
        self.border + self.pad
    }

    /// Side of the downscaled export image.
    pub fn output_size(&self) -> u32 {
        (self.canvas_size / SUPERSAMPLE).max(1)
    }
}

/// Logo drawn over the center of the code, sized relative to the code.
#[derive(Debug, Clone)]
pub struct LogoOverlay {
    image: RgbaImage,
    percent: u32,
}

impl LogoOverlay {
    pub fn new(image: RgbaImage, percent: Option<u32>) -> Self {
        let percent = percent
            .unwrap_or(DEFAULT_LOGO_PERCENT)
            .clamp(MIN_LOGO_PERCENT, MAX_LOGO_PERCENT);
        Self { image, percent }
    }

    pub fn from_png_bytes(bytes: &[u8], percent: Option<u32>) -> Result<Self, ConsoleError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| ConsoleError::InvalidLogo(e.to_string()))?
            .to_rgba8();
        if image.width() == 0 || image.height() == 0 {
            return Err(ConsoleError::InvalidLogo("image is empty".to_string()));
        }
        Ok(Self::new(image, percent))
    }

    pub fn percent(&self) -> u32 {
        self.percent
    }

    fn draw(&self, canvas: &mut RgbaImage, geometry: &Geometry) {
        let target = (geometry.qr_px * self.percent / 100).max(1);
        let (w, h) = self.image.dimensions();
        let (fit_w, fit_h) = if w >= h {
            (target, (target as u64 * h as u64 / w as u64).max(1) as u32)
        } else {
            ((target as u64 * w as u64 / h as u64).max(1) as u32, target)
        };
        let resized = imageops::resize(&self.image, fit_w, fit_h, FilterType::Lanczos3);
        let x = (geometry.canvas_size - fit_w) / 2;
        let y = (geometry.canvas_size - fit_h) / 2;
        imageops::overlay(canvas, &resized, x as i64, y as i64);
    }
}

/// A finished export, ready to be saved.
#[derive(Debug, Clone)]
pub struct ExportedImage {
    pub image: RgbaImage,
}

impl ExportedImage {
    pub fn size(&self) -> u32 {
        self.image.width()
    }

    pub fn to_png(&self) -> Result<Vec<u8>, ConsoleError> {
        encode_png(&self.image)
    }
}

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ConsoleError> {
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}

/// Composes a base code surface with the border, padding, corner and logo styling.
///
/// The order is fixed: background, code, border stroke, corner mask, logo.
pub struct Compositor<'a> {
    style: &'a StyleConfig,
    logo: Option<&'a LogoOverlay>,
    max_canvas: u32,
}

impl<'a> Compositor<'a> {
    pub fn new(style: &'a StyleConfig) -> Self {
        Self {
            style,
            logo: None,
            max_canvas: DEFAULT_MAX_CANVAS_PX,
        }
    }

    /// Refuse canvases with a side above `max_px` instead of allocating them.
    pub fn with_max_canvas(mut self, max_px: u32) -> Self {
        self.max_canvas = max_px;
        self
    }

    pub fn with_logo(mut self, logo: Option<&'a LogoOverlay>) -> Self {
        self.logo = logo;
        self
    }

    /// On-screen rendering at display resolution.
    pub fn preview(&self, base: &RasterSurface) -> Result<RgbaImage, ConsoleError> {
        self.compose(base, &Geometry::preview(self.style))
    }

    /// Supersampled rendering downscaled to the export resolution.
    pub fn export(&self, base: &RasterSurface) -> Result<ExportedImage, ConsoleError> {
        let geometry = Geometry::export(self.style);
        let canvas = self.compose(base, &geometry)?;
        let size = geometry.output_size();
        debug!(
            "Downscaling {}px supersampled canvas to {}px ({} quality)",
            geometry.canvas_size, size, self.style.export_quality
        );
        Ok(ExportedImage {
            image: imageops::resize(&canvas, size, size, FilterType::Lanczos3),
        })
    }

    fn compose(&self, base: &RasterSurface, geometry: &Geometry) -> Result<RgbaImage, ConsoleError> {
        if geometry.canvas_size > self.max_canvas {
            return Err(ConsoleError::CanvasTooLarge {
                size: geometry.canvas_size,
                max: self.max_canvas,
            });
        }

        let mut canvas = RgbaImage::from_pixel(
            geometry.canvas_size,
            geometry.canvas_size,
            self.style.background().to_rgba(),
        );

        let offset = geometry.code_offset() as i64;
        if base.dimensions() == (geometry.qr_px, geometry.qr_px) {
            imageops::replace(&mut canvas, base, offset, offset);
        } else {
            // Export sizes are whole multiples of the code size, nearest keeps modules sharp.
            let scaled = imageops::resize(base, geometry.qr_px, geometry.qr_px, FilterType::Nearest);
            imageops::replace(&mut canvas, &scaled, offset, offset);
        }

        if geometry.border > 0 {
            stroke_rounded_border(
                &mut canvas,
                geometry.border,
                geometry.radius,
                self.style.border.color,
            );
        }

        if geometry.radius > 0 {
            clip_rounded_corners(&mut canvas, geometry.radius);
        }

        if let Some(logo) = self.logo {
            logo.draw(&mut canvas, geometry);
        }

        Ok(canvas)
    }
}
