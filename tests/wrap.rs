use certgen::assets::{assets_dir, load_font_cached};
use certgen::cert::text::{text_width, wrap_words};

const PARAGRAPH: &str = "has actively participated in Workshop on Graph Algorithms \
organised by RV College on 2024-03-15, successfully completing 3 hours of engagement.";

fn font() -> std::sync::Arc<rusttype::Font<'static>> {
    load_font_cached(&assets_dir().join("fonts").join("DejaVuSans.ttf")).expect("bundled font")
}

#[test]
fn lines_never_exceed_wrap_width() {
    let font = font();
    for max_width in [200.0, 400.0, 984.0] {
        for line in wrap_words(&font, 22.0, max_width, PARAGRAPH) {
            let w = text_width(&font, 22.0, &line);
            let single_word = !line.contains(' ');
            assert!(
                w <= max_width || single_word,
                "line {line:?} measures {w} > {max_width}"
            );
        }
    }
}

#[test]
fn wrapping_is_lossless() {
    let font = font();
    for max_width in [150.0, 300.0, 700.0] {
        let lines = wrap_words(&font, 22.0, max_width, PARAGRAPH);
        assert_eq!(lines.join(" "), PARAGRAPH);
    }
}

#[test]
fn overlong_word_is_emitted_not_dropped() {
    let font = font();
    let text = "start pneumonoultramicroscopicsilicovolcanoconiosis end";
    let lines = wrap_words(&font, 22.0, 80.0, text);
    assert_eq!(lines.join(" "), text);
    assert!(lines
        .iter()
        .any(|l| l == "pneumonoultramicroscopicsilicovolcanoconiosis"));
}

#[test]
fn empty_and_whitespace_paragraphs_yield_no_lines() {
    let font = font();
    assert!(wrap_words(&font, 22.0, 500.0, "").is_empty());
    assert!(wrap_words(&font, 22.0, 500.0, "   \t ").is_empty());
}

#[test]
fn paragraphs_wrap_independently() {
    let font = font();
    let first = wrap_words(&font, 22.0, 300.0, PARAGRAPH);
    let _other = wrap_words(&font, 22.0, 120.0, "a different shorter paragraph of words");
    let again = wrap_words(&font, 22.0, 300.0, PARAGRAPH);
    assert_eq!(first, again);
}
