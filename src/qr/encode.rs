use image::RgbaImage;
use qrcode::{Color, EcLevel, QrCode};

use crate::error::ConsoleError;
use crate::models::style::HexColor;
use crate::qr::payload::EncodedPayload;

/// A square raster holding only the scannable matrix.
pub type RasterSurface = RgbaImage;

/// Encode `payload` at error-correction level H and rasterize it onto exactly
/// `size_px` × `size_px` pixels, without a quiet zone.
///
/// Level H keeps the code readable when a logo covers its center.
pub fn render_code(
    payload: &EncodedPayload,
    size_px: u32,
    fg: HexColor,
    bg: HexColor,
) -> Result<RasterSurface, ConsoleError> {
    let code = QrCode::with_error_correction_level(payload.as_str().as_bytes(), EcLevel::H)?;
    let modules = code.width() as u64;
    let colors = code.to_colors();
    let size = size_px.max(1);
    let (dark, light) = (fg.to_rgba(), bg.to_rgba());

    Ok(RgbaImage::from_fn(size, size, |x, y| {
        let col = x as u64 * modules / size as u64;
        let row = y as u64 * modules / size as u64;
        match colors[(row * modules + col) as usize] {
            Color::Dark => dark,
            Color::Light => light,
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> EncodedPayload {
        EncodedPayload::for_redirect("https://oilqr.com", "abc123").unwrap()
    }

    #[test]
    fn surface_has_requested_size() {
        let surface = render_code(&payload(), 333, HexColor::BLACK, HexColor::WHITE).unwrap();
        assert_eq!(surface.dimensions(), (333, 333));
    }

    #[test]
    fn finder_pattern_sits_in_the_top_left_corner() {
        let fg = HexColor::new(0x00, 0x00, 0x80);
        let surface = render_code(&payload(), 600, fg, HexColor::WHITE).unwrap();
        assert_eq!(*surface.get_pixel(0, 0), fg.to_rgba());
        assert_eq!(*surface.get_pixel(599, 0), fg.to_rgba());
        assert_eq!(*surface.get_pixel(0, 599), fg.to_rgba());
    }

    #[test]
    fn uses_only_the_two_colors() {
        let surface = render_code(&payload(), 120, HexColor::BLACK, HexColor::WHITE).unwrap();
        assert!(surface.pixels().all(|p| p.0 == [0, 0, 0, 255] || p.0 == [255, 255, 255, 255]));
    }
}
