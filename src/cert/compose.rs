//! Compositor: draws every certificate element back-to-front onto a fresh
//! surface and encodes the result as PNG.

use image::{imageops::FilterType, DynamicImage, ImageBuffer, ImageEncoder, Rgba};

use crate::assets::Assets;

use super::code;
use super::layout::{Layout, Rect};
use super::text::{self, Surface};
use super::{CertError, CertificateRequest, RenderedCertificate};

#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub bg_top: [u8; 3],
    pub bg_bottom: [u8; 3],
    pub paper: [u8; 3],
    /// Dark accent: border stroke, title, recipient name, code modules.
    pub accent: [u8; 3],
    pub ink: [u8; 3],
    pub muted: [u8; 3],
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            bg_top: [0x24, 0x3B, 0x55],
            bg_bottom: [0x14, 0x1E, 0x30],
            paper: [0xFD, 0xFB, 0xF7],
            accent: [0x1F, 0x3A, 0x5F],
            ink: [0x2A, 0x2A, 0x2A],
            muted: [0x6E, 0x6E, 0x6E],
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RenderConfig {
    pub layout: super::LayoutConfig,
    pub theme: Theme,
}

pub fn hex_color(s: &str) -> Result<[u8; 3], CertError> {
    let s = s.trim().trim_start_matches('#');
    if s.len() != 6 {
        return Err(CertError::Encoding(format!("invalid color: {s}")));
    }
    let b = hex::decode(s).map_err(|_| CertError::Encoding(format!("invalid color: {s}")))?;
    Ok([b[0], b[1], b[2]])
}

const SUB_UNIT: &str = "Office of Student Affairs";
const TITLE: &str = "CERTIFICATE OF PARTICIPATION";
const SUBTITLE: &str = "Awarded in recognition of active participation";
const SALUTATION: &str = "This is to certify that";
const CLOSING: &str = "We appreciate the enthusiasm and commitment shown throughout \
the programme and wish them continued success in all future academic and \
professional endeavours.";

pub fn hours_phrase(hours: u32) -> String {
    if hours == 1 {
        "1 hour".to_string()
    } else {
        format!("{hours} hours")
    }
}

fn narrative(req: &CertificateRequest) -> String {
    format!(
        "has actively participated in {} organised by {} on {}, successfully \
completing {} of engagement.",
        req.event_type,
        req.institution,
        req.event_date,
        hours_phrase(req.hours)
    )
}

/// Identifier shown in the footer, taken from the tail of the verification
/// payload so the render stays a function of its declared inputs.
pub fn footer_id(payload: &str) -> &str {
    payload.rsplit('/').next().unwrap_or(payload)
}

/// Render one certificate. Pure: no I/O beyond the pre-resolved assets, no
/// shared mutable state, byte-identical output for identical inputs. Either
/// a complete certificate comes back or an error; never partial output.
pub fn render(
    cfg: &RenderConfig,
    req: &CertificateRequest,
    payload: &str,
    assets: &Assets,
) -> Result<RenderedCertificate, CertError> {
    let layout = Layout::compute(&cfg.layout)?;
    let img = compose(&layout, &cfg.theme, req, payload, assets)?;
    let png = encode_png(img)?;
    Ok(RenderedCertificate {
        png,
        verification_payload: payload.to_string(),
    })
}

fn compose(
    layout: &Layout,
    theme: &Theme,
    req: &CertificateRequest,
    payload: &str,
    assets: &Assets,
) -> Result<Surface, CertError> {
    let mut img: Surface = ImageBuffer::from_pixel(
        layout.canvas.w,
        layout.canvas.h,
        Rgba([theme.bg_top[0], theme.bg_top[1], theme.bg_top[2], 255]),
    );

    // 1. Background gradient + paper fill.
    fill_vertical_gradient(&mut img, &layout.canvas, theme.bg_top, theme.bg_bottom);
    fill_rounded_rect(&mut img, &layout.paper, layout.corner_radius, theme.paper);

    // 2. Border stroke.
    stroke_rounded_rect(
        &mut img,
        &layout.paper,
        layout.corner_radius,
        layout.stroke_width,
        theme.accent,
    );

    // 3. Institutional marks. Absent logos are a normal outcome; the slots
    // stay empty and nothing else moves.
    if let Some(logo) = &assets.logo_left {
        place_in_slot(&mut img, logo, &layout.logo_left);
    }
    if let Some(logo) = &assets.logo_right {
        place_in_slot(&mut img, logo, &layout.logo_right);
    }

    // 4. Header text, centered on the paper, top to bottom.
    let cx = layout.paper.center_x();
    let hy = layout.header.y as i32;
    let s = |v: u32| ((v as f32) * layout.scale).round() as i32;
    text::draw_text_centered(
        &mut img,
        &assets.bold,
        layout.font_px(44.0),
        cx,
        hy + s(8),
        theme.ink,
        &req.institution,
    );
    text::draw_text_centered(
        &mut img,
        &assets.regular,
        layout.font_px(22.0),
        cx,
        hy + s(68),
        theme.ink,
        SUB_UNIT,
    );
    text::draw_text_centered(
        &mut img,
        &assets.bold,
        layout.font_px(34.0),
        cx,
        hy + s(122),
        theme.accent,
        TITLE,
    );
    text::draw_text_centered(
        &mut img,
        &assets.oblique,
        layout.font_px(20.0),
        cx,
        hy + s(172),
        theme.muted,
        SUBTITLE,
    );

    // 5. Body text.
    let bx = layout.body.x as i32;
    let wrap = layout.body.w as f32;
    let mut y = layout.body.y as i32;

    text::draw_text(
        &mut img,
        &assets.regular,
        layout.font_px(22.0),
        bx,
        y,
        theme.ink,
        SALUTATION,
    );
    y += layout.line_height as i32 + s(4);

    text::draw_text(
        &mut img,
        &assets.bold,
        layout.font_px(36.0),
        bx,
        y,
        theme.accent,
        &req.name,
    );
    y += s(50);

    text::draw_text(
        &mut img,
        &assets.regular,
        layout.font_px(20.0),
        bx,
        y,
        theme.muted,
        &format!("USN: {}", req.usn),
    );
    y += layout.line_height as i32 + s(8);

    let body_px = layout.font_px(22.0);
    for line in text::wrap_words(&assets.regular, body_px, wrap, &narrative(req)) {
        text::draw_text(&mut img, &assets.regular, body_px, bx, y, theme.ink, &line);
        y += layout.line_height as i32;
    }
    y += s(10);
    for line in text::wrap_words(&assets.regular, body_px, wrap, CLOSING) {
        text::draw_text(&mut img, &assets.regular, body_px, bx, y, theme.ink, &line);
        y += layout.line_height as i32;
    }

    // 6. Signature lines. Decorative, no data dependency.
    let label_px = layout.font_px(18.0);
    for slot in &layout.signatures {
        fill_rect(&mut img, &slot.line, theme.ink);
        text::draw_text_centered(
            &mut img,
            &assets.regular,
            label_px,
            slot.line.x + slot.line.w / 2,
            slot.line.bottom() as i32 + s(8),
            theme.ink,
            slot.label,
        );
    }

    // 7. Verification code, centered in its reserved rect.
    let qr = code::code_image(payload, layout.code.w, theme.accent, theme.paper)?;
    let qx = layout.code.x + (layout.code.w.saturating_sub(qr.width())) / 2;
    let qy = layout.code.y + (layout.code.h.saturating_sub(qr.height())) / 2;
    overlay(&mut img, &qr, qx, qy);

    // 8. Footer identifier.
    text::draw_text(
        &mut img,
        &assets.oblique,
        layout.font_px(16.0),
        layout.footer.0 as i32,
        layout.footer.1 as i32,
        theme.muted,
        &format!("Certificate ID: {}", footer_id(payload)),
    );

    Ok(img)
}

fn encode_png(img: Surface) -> Result<Vec<u8>, CertError> {
    // Opaque composition, so the output is plain 24-bit RGB.
    let rgb = DynamicImage::ImageRgba8(img).to_rgb8();
    let mut png = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png);
    encoder
        .write_image(rgb.as_raw(), rgb.width(), rgb.height(), image::ColorType::Rgb8)
        .map_err(|e| CertError::Encoding(e.to_string()))?;
    Ok(png)
}

fn fill_rect(img: &mut Surface, rect: &Rect, color: [u8; 3]) {
    let px = Rgba([color[0], color[1], color[2], 255]);
    for y in rect.y..rect.bottom().min(img.height()) {
        for x in rect.x..rect.right().min(img.width()) {
            img.put_pixel(x, y, px);
        }
    }
}

fn fill_vertical_gradient(img: &mut Surface, rect: &Rect, top: [u8; 3], bottom: [u8; 3]) {
    let h = rect.h.max(1) as f32;
    for y in rect.y..rect.bottom().min(img.height()) {
        let t = (y - rect.y) as f32 / h;
        let px = Rgba([
            lerp_u8(top[0], bottom[0], t),
            lerp_u8(top[1], bottom[1], t),
            lerp_u8(top[2], bottom[2], t),
            255,
        ]);
        for x in rect.x..rect.right().min(img.width()) {
            img.put_pixel(x, y, px);
        }
    }
}

fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    (a as f32 + (b as f32 - a as f32) * t).round() as u8
}

fn rounded_rect_contains(x: i32, y: i32, w: i32, h: i32, r: i32) -> bool {
    if x < 0 || y < 0 || x >= w || y >= h {
        return false;
    }
    if x >= r && x < w - r {
        return true;
    }
    if y >= r && y < h - r {
        return true;
    }
    let cx = if x < r { r - 1 } else { w - r };
    let cy = if y < r { r - 1 } else { h - r };
    let dx = x - cx;
    let dy = y - cy;
    dx * dx + dy * dy <= r * r
}

fn fill_rounded_rect(img: &mut Surface, rect: &Rect, radius: u32, color: [u8; 3]) {
    let px = Rgba([color[0], color[1], color[2], 255]);
    let (w, h, r) = (rect.w as i32, rect.h as i32, radius as i32);
    for yy in 0..h {
        for xx in 0..w {
            if rounded_rect_contains(xx, yy, w, h, r) {
                let (ax, ay) = (rect.x + xx as u32, rect.y + yy as u32);
                if ax < img.width() && ay < img.height() {
                    img.put_pixel(ax, ay, px);
                }
            }
        }
    }
}

fn stroke_rounded_rect(img: &mut Surface, rect: &Rect, radius: u32, stroke: u32, color: [u8; 3]) {
    let px = Rgba([color[0], color[1], color[2], 255]);
    let (w, h, r) = (rect.w as i32, rect.h as i32, radius as i32);
    let s = stroke as i32;
    let inner_r = (r - s).max(0);
    for yy in 0..h {
        for xx in 0..w {
            let outer = rounded_rect_contains(xx, yy, w, h, r);
            let inner = rounded_rect_contains(xx - s, yy - s, w - 2 * s, h - 2 * s, inner_r);
            if outer && !inner {
                let (ax, ay) = (rect.x + xx as u32, rect.y + yy as u32);
                if ax < img.width() && ay < img.height() {
                    img.put_pixel(ax, ay, px);
                }
            }
        }
    }
}

/// Alpha-composite `src` onto `img` with its top-left corner at (x, y).
fn overlay(img: &mut Surface, src: &Surface, x: u32, y: u32) {
    for oy in 0..src.height() {
        for ox in 0..src.width() {
            let bx = x + ox;
            let by = y + oy;
            if bx >= img.width() || by >= img.height() {
                continue;
            }
            let p = src.get_pixel(ox, oy);
            let a = p[3] as f32 / 255.0;
            if a <= 0.0 {
                continue;
            }
            let inv = 1.0 - a;
            let dst = img.get_pixel_mut(bx, by);
            dst.0[0] = (p[0] as f32 * a + dst.0[0] as f32 * inv) as u8;
            dst.0[1] = (p[1] as f32 * a + dst.0[1] as f32 * inv) as u8;
            dst.0[2] = (p[2] as f32 * a + dst.0[2] as f32 * inv) as u8;
            dst.0[3] = 255;
        }
    }
}

/// Scale an asset into a slot preserving aspect ratio, centered horizontally
/// and anchored to the slot top.
fn place_in_slot(img: &mut Surface, asset: &DynamicImage, slot: &Rect) {
    if slot.w == 0 || slot.h == 0 {
        return;
    }
    let scaled = asset.resize(slot.w, slot.h, FilterType::Lanczos3).to_rgba8();
    let x = slot.x + (slot.w.saturating_sub(scaled.width())) / 2;
    overlay(img, &scaled, x, slot.y);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hours_phrase_pluralizes() {
        assert_eq!(hours_phrase(0), "0 hours");
        assert_eq!(hours_phrase(1), "1 hour");
        assert_eq!(hours_phrase(2), "2 hours");
        assert_eq!(hours_phrase(36), "36 hours");
    }

    #[test]
    fn footer_id_takes_payload_tail() {
        assert_eq!(footer_id("https://example.org/view/abc123"), "abc123");
        assert_eq!(footer_id("opaque-token"), "opaque-token");
    }

    #[test]
    fn hex_color_parses_with_and_without_hash() {
        assert_eq!(hex_color("#1F3A5F").unwrap(), [0x1F, 0x3A, 0x5F]);
        assert_eq!(hex_color("ffffff").unwrap(), [255, 255, 255]);
        assert!(hex_color("#12").is_err());
        assert!(hex_color("zzzzzz").is_err());
    }
}
