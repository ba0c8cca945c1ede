use super::*;
use test_case::test_case;

#[test_case("Hello" => "(Hello)")]
#[test_case("" => "()")]
#[test_case("f(x)" => "(f\\(x\\))")]
#[test_case("a\\b" => "(a\\\\b)")]
fn escape(text: &str) -> String {
    ps_string(text)
}

#[test]
fn reject_non_font() {
    assert!(TtfOutliner::new(b"not a font".to_vec(), 0).is_err());
}

#[test]
fn glyph_sink_scales_and_flips() {
    let mut builder = PathBuilder::new();
    let mut sink = GlyphSink {
        builder: &mut builder,
        scale: 0.5,
        x: 10.0,
        y: 20.0,
    };
    sink.move_to(0.0, 0.0);
    sink.line_to(4.0, 8.0);
    sink.close();
    let path = builder.finish().unwrap();
    let b = path.bounds();
    assert_eq!((b.left(), b.top(), b.right(), b.bottom()), (10.0, 16.0, 12.0, 20.0));
}
