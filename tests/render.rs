use certgen::assets::Assets;
use certgen::cert::{
    self, CertError, CertificateRequest, Layout, LayoutConfig, Rect, RenderConfig,
};
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};

fn sample_request() -> CertificateRequest {
    CertificateRequest {
        name: "Asha Rao".into(),
        usn: "1RV21CS001".into(),
        institution: "RV College".into(),
        event_type: "Workshop on Graph Algorithms".into(),
        event_date: "2024-03-15".into(),
        hours: 3,
    }
}

const PAYLOAD: &str = "https://example.org/view/abc123";

fn assets() -> Assets {
    Assets::load().expect("bundled assets").without_logos()
}

#[test]
fn end_to_end_renders_canvas_sized_decodable_png() {
    let cfg = RenderConfig::default();
    let rendered = cert::render(&cfg, &sample_request(), PAYLOAD, &assets()).unwrap();
    assert_eq!(rendered.verification_payload, PAYLOAD);

    let img = image::load_from_memory(&rendered.png).expect("valid png");
    assert_eq!(img.dimensions(), (1400, 900));

    // The embedded code must decode back to exactly the payload.
    let layout = Layout::compute(&cfg.layout).unwrap();
    let code = img
        .crop_imm(layout.code.x, layout.code.y, layout.code.w, layout.code.h)
        .to_luma8();
    let mut prepared = rqrr::PreparedImage::prepare(code);
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1, "expected one scannable code");
    let (_meta, content) = grids[0].decode().expect("decodable code");
    assert_eq!(content, PAYLOAD);
}

#[test]
fn rendering_is_deterministic() {
    let cfg = RenderConfig::default();
    let req = sample_request();
    let assets = assets();
    let a = cert::render(&cfg, &req, PAYLOAD, &assets).unwrap();
    let b = cert::render(&cfg, &req, PAYLOAD, &assets).unwrap();
    assert_eq!(a.png, b.png);
}

#[test]
fn invalid_canvas_produces_error_and_no_buffer() {
    let cfg = RenderConfig {
        layout: LayoutConfig {
            width: 50,
            height: 50,
            margin: 40,
            scale: 1.0,
        },
        ..RenderConfig::default()
    };
    let result = cert::render(&cfg, &sample_request(), PAYLOAD, &assets());
    assert!(matches!(result, Err(CertError::InvalidDimension(_))));
}

fn region_pixels(img: &DynamicImage, r: &Rect) -> Vec<u8> {
    img.crop_imm(r.x, r.y, r.w, r.h).to_rgba8().into_raw()
}

#[test]
fn missing_logos_shift_nothing_outside_their_slots() {
    let cfg = RenderConfig::default();
    let layout = Layout::compute(&cfg.layout).unwrap();
    let req = sample_request();

    let bare = assets();
    let mut logod = Assets::load().expect("bundled assets").without_logos();
    let mut mark = RgbaImage::from_pixel(64, 64, Rgba([180, 30, 30, 255]));
    for i in 0..64 {
        mark.put_pixel(i, i, Rgba([255, 255, 255, 255]));
    }
    logod.logo_left = Some(DynamicImage::ImageRgba8(mark.clone()));
    logod.logo_right = Some(DynamicImage::ImageRgba8(mark));

    let without = cert::render(&cfg, &req, PAYLOAD, &bare).unwrap();
    let with = cert::render(&cfg, &req, PAYLOAD, &logod).unwrap();

    let without = image::load_from_memory(&without.png).unwrap();
    let with = image::load_from_memory(&with.png).unwrap();

    // Body, code and signature regions are pixel-identical either way.
    for region in [
        &layout.body,
        &layout.code,
        &layout.signatures[0].line,
        &layout.signatures[1].line,
    ] {
        assert_eq!(
            region_pixels(&without, region),
            region_pixels(&with, region),
            "region {region:?} moved when logos appeared"
        );
    }
    // Sanity: the logo slot itself did change.
    assert_ne!(
        region_pixels(&without, &layout.logo_left),
        region_pixels(&with, &layout.logo_left)
    );
}

#[test]
fn singular_and_plural_hours_render_differently() {
    let cfg = RenderConfig::default();
    let assets = assets();
    let mut one = sample_request();
    one.hours = 1;
    let mut many = sample_request();
    many.hours = 2;

    let a = cert::render(&cfg, &one, PAYLOAD, &assets).unwrap();
    let b = cert::render(&cfg, &many, PAYLOAD, &assets).unwrap();
    assert_ne!(a.png, b.png);
}

#[test]
fn scale_factor_doubles_output_dimensions() {
    let cfg = RenderConfig {
        layout: LayoutConfig {
            scale: 2.0,
            ..LayoutConfig::default()
        },
        ..RenderConfig::default()
    };
    let rendered = cert::render(&cfg, &sample_request(), PAYLOAD, &assets()).unwrap();
    let img = image::load_from_memory(&rendered.png).unwrap();
    assert_eq!(img.dimensions(), (2800, 1800));
}
