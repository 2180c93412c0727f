//! Text measurement, glyph drawing and greedy word wrapping.

use image::{ImageBuffer, Rgba};
use rusttype::{point, Font, Scale};

pub type Surface = ImageBuffer<Rgba<u8>, Vec<u8>>;

/// Pixel width of `text` at `px`, kerning included.
pub fn text_width(font: &Font<'_>, px: f32, text: &str) -> f32 {
    let scale = Scale::uniform(px);
    let mut width = 0.0f32;
    for g in font.layout(text, scale, point(0.0, 0.0)) {
        width = g.position().x + g.unpositioned().h_metrics().advance_width;
    }
    width
}

/// Draw `text` with its top edge at `y`, alpha-blending glyph coverage onto
/// the surface. Pixels outside the surface are skipped.
pub fn draw_text(
    img: &mut Surface,
    font: &Font<'_>,
    px: f32,
    x: i32,
    y: i32,
    color: [u8; 3],
    text: &str,
) {
    let scale = Scale::uniform(px);
    let v_metrics = font.v_metrics(scale);
    let baseline = y as f32 + v_metrics.ascent;

    for glyph in font.layout(text, scale, point(x as f32, baseline)) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        glyph.draw(|gx, gy, v| {
            let px = gx as i32 + bb.min.x;
            let py = gy as i32 + bb.min.y;
            if px < 0 || py < 0 {
                return;
            }
            let (px, py) = (px as u32, py as u32);
            if px >= img.width() || py >= img.height() {
                return;
            }
            let a = v.clamp(0.0, 1.0);
            if a <= 0.0 {
                return;
            }
            let inv = 1.0 - a;
            let dst = img.get_pixel_mut(px, py);
            dst.0[0] = (color[0] as f32 * a + dst.0[0] as f32 * inv) as u8;
            dst.0[1] = (color[1] as f32 * a + dst.0[1] as f32 * inv) as u8;
            dst.0[2] = (color[2] as f32 * a + dst.0[2] as f32 * inv) as u8;
            dst.0[3] = 255;
        });
    }
}

/// Draw `text` horizontally centered on `center_x`.
pub fn draw_text_centered(
    img: &mut Surface,
    font: &Font<'_>,
    px: f32,
    center_x: u32,
    y: i32,
    color: [u8; 3],
    text: &str,
) {
    let w = text_width(font, px, text);
    let x = center_x as f32 - w / 2.0;
    draw_text(img, font, px, x.round() as i32, y, color, text);
}

/// Greedy word wrap: pack words into a line while the measured width stays
/// within `max_width`; break before the word that would overflow. Every word
/// is emitted — a single word wider than `max_width` gets a line of its own
/// rather than being dropped. No state is shared between calls.
pub fn wrap_words(font: &Font<'_>, px: f32, max_width: f32, text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if text_width(font, px, &candidate) > max_width {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
