//! Verification-code rasterization.

use image::{ImageBuffer, Rgba};
use qrcode::{EcLevel, QrCode};

use super::text::Surface;
use super::CertError;

/// Quiet-zone width in modules on each side.
pub const QUIET_MODULES: u32 = 2;

/// Encode `payload` as a QR raster no larger than `max_side` pixels.
///
/// The output stays at an exact whole-pixel module size (largest that fits)
/// instead of being resampled up to `max_side`; resampling blurs module edges
/// and hurts decoding at small sizes. The compositor centers the result in
/// the reserved rect.
pub fn code_image(
    payload: &str,
    max_side: u32,
    dark: [u8; 3],
    light: [u8; 3],
) -> Result<Surface, CertError> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M)
        .map_err(|e| CertError::Encoding(format!("qr encode: {e}")))?;

    let width_modules = code.width() as u32;
    let total_modules = width_modules + 2 * QUIET_MODULES;
    let module_px = (max_side / total_modules).max(1);
    let side = total_modules * module_px;

    let light_px = Rgba([light[0], light[1], light[2], 255]);
    let dark_px = Rgba([dark[0], dark[1], dark[2], 255]);
    let mut img = ImageBuffer::from_pixel(side, side, light_px);

    for y in 0..width_modules {
        for x in 0..width_modules {
            if !matches!(code[(x as usize, y as usize)], qrcode::Color::Dark) {
                continue;
            }
            let px0 = (x + QUIET_MODULES) * module_px;
            let py0 = (y + QUIET_MODULES) * module_px;
            for py in py0..(py0 + module_px) {
                for px in px0..(px0 + module_px) {
                    img.put_pixel(px, py, dark_px);
                }
            }
        }
    }

    Ok(img)
}
