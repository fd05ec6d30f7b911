use super::*;

#[test]
fn xml_escaping() {
    assert_eq!(
        escape_xml("A&B <c> \"q\" 'x'\u{7}"),
        "A&amp;B &lt;c&gt; &quot;q&quot; &apos;x&apos;"
    );
    assert_eq!(escape_xml("삼성전자"), "삼성전자");
}

#[test]
fn svg_carries_anchor_color_and_weight() {
    let items = [
        TextItem {
            x: 10.0,
            y: 20.0,
            size_px: 12.0,
            color: Rgba8::rgb(0x3b, 0x3a, 0x36),
            anchor: Anchor::End,
            bold: true,
            text: "A & B".to_string(),
        },
        TextItem::centered_at(
            5.0,
            5.0,
            10.0,
            Rgba8::rgb(255, 0, 0).with_opacity(0.5),
            Anchor::Start,
            "",
        ),
    ];
    let svg = overlay_svg(64, 32, "NanumGothic, sans-serif", &items);

    assert!(svg.starts_with("<svg"));
    assert!(svg.contains(r#"width="64" height="32""#));
    assert!(svg.contains("font-family=\"&apos;NanumGothic&apos;, sans-serif\""));
    assert!(svg.contains(
        r##"text-anchor="end" fill="#3b3a36" font-weight="bold">A &amp; B</text>"##
    ));
    // Empty labels are skipped.
    assert_eq!(svg.matches("<text").count(), 1);
}

#[test]
fn centered_items_drop_baseline_below_center() {
    let item = TextItem::centered_at(0.0, 100.0, 20.0, Rgba8::rgb(0, 0, 0), Anchor::Middle, "x");
    assert_eq!(item.y, 107.0);
    assert!(!item.bold);
}

#[test]
fn translucent_text_sets_fill_opacity() {
    let item = TextItem::centered_at(
        0.0,
        0.0,
        10.0,
        Rgba8::rgb(0, 0, 0).with_opacity(0.5),
        Anchor::Start,
        "x",
    );
    let svg = overlay_svg(8, 8, "sans-serif", &[item]);
    assert!(svg.contains(r#"fill-opacity="0.502""#), "{svg}");
}

#[test]
fn empty_overlay_rasterizes_transparent() {
    let db = Arc::new(usvg::fontdb::Database::new());
    let svg = overlay_svg(16, 8, "sans-serif", &[]);
    let rgba = rasterize_overlay(&svg, 16, 8, &db).unwrap();
    assert_eq!(rgba.len(), 16 * 8 * 4);
    assert!(rgba.iter().all(|b| *b == 0));
}

#[test]
fn text_without_fonts_still_rasterizes() {
    let db = Arc::new(usvg::fontdb::Database::new());
    let item = TextItem::centered_at(4.0, 4.0, 6.0, Rgba8::rgb(0, 0, 0), Anchor::Start, "x");
    let svg = overlay_svg(16, 8, "sans-serif", &[item]);
    assert_eq!(rasterize_overlay(&svg, 16, 8, &db).unwrap().len(), 16 * 8 * 4);
}
