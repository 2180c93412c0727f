//! Layout engine: derives every drawing region from the canvas configuration.
//!
//! Purely arithmetic. No text measurement happens here (that depends on font
//! metrics and belongs to the compositor) and nothing here reads the clock or
//! any global state, so identical configs always yield identical geometry.

use super::CertError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn right(&self) -> u32 {
        self.x + self.w
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.h
    }

    pub fn center_x(&self) -> u32 {
        self.x + self.w / 2
    }

    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LayoutConfig {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    /// Device-scale factor. Every region and font size is multiplied by it,
    /// so relative proportions hold at any output resolution.
    pub scale: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            width: 1400,
            height: 900,
            margin: 40,
            scale: 1.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SignatureSlot {
    pub line: Rect,
    pub label: &'static str,
}

/// Complete derived geometry for one canvas configuration.
///
/// Invariants checked at construction: the paper rect sits inside the canvas
/// with the configured margin, and every child region sits inside the paper.
/// The body wrap region never reaches the verification-code rect; the wrap
/// width is recomputed from the code rect rather than hard-coded.
#[derive(Clone, Debug)]
pub struct Layout {
    pub scale: f32,
    pub canvas: Rect,
    pub paper: Rect,
    pub corner_radius: u32,
    pub stroke_width: u32,
    pub header: Rect,
    pub logo_left: Rect,
    pub logo_right: Rect,
    /// Body text region; `w` is the wrap width.
    pub body: Rect,
    pub line_height: u32,
    pub signatures: [SignatureSlot; 2],
    pub code: Rect,
    /// Top-left anchor of the footer identifier line.
    pub footer: (u32, u32),
}

// Base geometry in logical pixels, before the device-scale factor.
const PAD: u32 = 48;
const HEADER_FRAC: f32 = 0.28;
const LOGO_SIDE: u32 = 110;
const BODY_INDENT: u32 = 24;
const BODY_GAP: u32 = 24;
const CODE_SIDE: u32 = 180;
const CODE_GUTTER: u32 = 36;
const CODE_LIFT: u32 = 36;
const SIG_LEN: u32 = 220;
const SIG_THICKNESS: u32 = 2;
const SIG_AREA: u32 = 64;
const LINE_HEIGHT: u32 = 34;
const CORNER_RADIUS: u32 = 18;
const STROKE_WIDTH: u32 = 3;
const FOOTER_RISE: u32 = 30;

impl Layout {
    pub fn compute(cfg: &LayoutConfig) -> Result<Self, CertError> {
        if !(cfg.scale.is_finite() && cfg.scale > 0.0) {
            return Err(CertError::InvalidDimension(format!(
                "scale must be positive, got {}",
                cfg.scale
            )));
        }
        if cfg.width <= 2 * cfg.margin || cfg.height <= 2 * cfg.margin {
            return Err(CertError::InvalidDimension(format!(
                "canvas {}x{} leaves no paper region at margin {}",
                cfg.width, cfg.height, cfg.margin
            )));
        }

        let s = |v: u32| -> u32 { ((v as f32) * cfg.scale).round() as u32 };

        let canvas = Rect {
            x: 0,
            y: 0,
            w: s(cfg.width),
            h: s(cfg.height),
        };
        let margin = s(cfg.margin);
        let paper = Rect {
            x: margin,
            y: margin,
            w: canvas.w - 2 * margin,
            h: canvas.h - 2 * margin,
        };

        let pad = s(PAD);
        let header = Rect {
            x: paper.x + pad,
            y: paper.y + pad,
            w: paper.w.saturating_sub(2 * pad),
            h: ((paper.h as f32) * HEADER_FRAC).round() as u32,
        };

        let logo = s(LOGO_SIDE);
        let logo_left = Rect {
            x: header.x,
            y: header.y,
            w: logo,
            h: logo,
        };
        let logo_right = Rect {
            x: header.right().saturating_sub(logo),
            y: header.y,
            w: logo,
            h: logo,
        };

        let code_side = s(CODE_SIDE);
        let code = Rect {
            x: (paper.right().saturating_sub(pad + code_side)),
            y: (paper.bottom().saturating_sub(pad + code_side + s(CODE_LIFT))),
            w: code_side,
            h: code_side,
        };

        let body_x = header.x + s(BODY_INDENT);
        let body_y = header.bottom() + s(BODY_GAP);
        let sig_y = paper.bottom().saturating_sub(pad + s(SIG_AREA));
        // Wrap width derives from the actual code rect so body text can never
        // reach it, whatever the canvas configuration.
        let wrap_width = code
            .x
            .checked_sub(s(CODE_GUTTER) + body_x)
            .unwrap_or_default();
        let body_h = sig_y.saturating_sub(s(40) + body_y);
        let body = Rect {
            x: body_x,
            y: body_y,
            w: wrap_width,
            h: body_h,
        };

        let sig_len = s(SIG_LEN);
        let signatures = [
            SignatureSlot {
                line: Rect {
                    x: body_x,
                    y: sig_y,
                    w: sig_len,
                    h: s(SIG_THICKNESS).max(1),
                },
                label: "Head of Department",
            },
            SignatureSlot {
                line: Rect {
                    x: (body_x + wrap_width).saturating_sub(sig_len),
                    y: sig_y,
                    w: sig_len,
                    h: s(SIG_THICKNESS).max(1),
                },
                label: "Principal",
            },
        ];

        let footer = (paper.x + pad, paper.bottom().saturating_sub(s(FOOTER_RISE)));

        let layout = Layout {
            scale: cfg.scale,
            canvas,
            paper,
            corner_radius: s(CORNER_RADIUS),
            stroke_width: s(STROKE_WIDTH).max(1),
            header,
            logo_left,
            logo_right,
            body,
            line_height: s(LINE_HEIGHT).max(1),
            signatures,
            code,
            footer,
        };
        layout.validate(cfg)?;
        Ok(layout)
    }

    fn validate(&self, cfg: &LayoutConfig) -> Result<(), CertError> {
        if self.body.w == 0 || self.body.h == 0 {
            return Err(CertError::InvalidDimension(format!(
                "canvas {}x{} too small for the certificate chrome",
                cfg.width, cfg.height
            )));
        }
        let children = [
            &self.header,
            &self.logo_left,
            &self.logo_right,
            &self.body,
            &self.code,
            &self.signatures[0].line,
            &self.signatures[1].line,
        ];
        for child in children {
            if !self.paper.contains(child) {
                return Err(CertError::InvalidDimension(format!(
                    "canvas {}x{} too small for the certificate chrome",
                    cfg.width, cfg.height
                )));
            }
        }
        if self.body.intersects(&self.code) {
            return Err(CertError::InvalidDimension(
                "body wrap region would overlap the verification code".into(),
            ));
        }
        Ok(())
    }

    /// Scale a logical font size to device pixels.
    pub fn font_px(&self, base: f32) -> f32 {
        base * self.scale
    }
}
