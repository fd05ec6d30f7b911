use super::*;

#[test]
fn presets_are_valid_and_named() {
    for preset in StylePreset::ALL {
        preset.config().validate().unwrap();
        assert_eq!(preset.name().parse::<StylePreset>().unwrap(), preset);
    }
    assert_eq!(StylePreset::default(), StylePreset::PastelWood);
}

#[test]
fn unknown_preset_lists_choices() {
    let err = "neon".parse::<StylePreset>().unwrap_err().to_string();
    assert!(err.contains("pastel_wood"), "{err}");
}

#[test]
fn preset_palettes() {
    assert_eq!(StylePreset::PastelWood.config().palette.len(), 9);
    assert_eq!(StylePreset::DeepNavy.config().palette.len(), 20);
    assert_eq!(StylePreset::MinimalWhite.config().palette.len(), 8);
}

#[test]
fn bar_colors_cycle_by_column() {
    let s = StylePreset::MinimalWhite.config();
    assert_eq!(s.bar_color(0), SET2[0]);
    assert_eq!(s.bar_color(8), SET2[0]);
    assert_eq!(s.bar_color(9), SET2[1]);
}

#[test]
fn json_overrides_keep_unset_fields() {
    let json = r##"{
        "base": "deep_navy",
        "title_size": 40,
        "axes": { "left": 0.3 },
        "palette": ["#ff0000", "#00ff0080"]
    }"##;
    let s = StyleConfig::from_json(json, StylePreset::PastelWood).unwrap();
    let navy = StylePreset::DeepNavy.config();

    assert_eq!(s.title_size, 40.0);
    assert_eq!(s.axes.left, 0.3);
    assert_eq!(s.axes.right, navy.axes.right);
    assert_eq!(s.background, navy.background);
    assert_eq!(s.palette, vec![Rgba8::rgb(255, 0, 0), Rgba8 { r: 0, g: 255, b: 0, a: 128 }]);
}

#[test]
fn json_without_base_uses_given_preset() {
    let s = StyleConfig::from_json("{}", StylePreset::MinimalWhite).unwrap();
    assert_eq!(s, StylePreset::MinimalWhite.config());
}

#[test]
fn json_rejects_typos_and_bad_layouts() {
    assert!(StyleConfig::from_json(r#"{"titel_size": 3}"#, StylePreset::PastelWood).is_err());
    assert!(
        StyleConfig::from_json(r#"{"axes": {"left": 0.9, "right": 0.5}}"#, StylePreset::PastelWood)
            .is_err()
    );
    assert!(StyleConfig::from_json(r#"{"bar_size": 0}"#, StylePreset::PastelWood).is_err());
    assert!(StyleConfig::from_json("[1]", StylePreset::PastelWood).is_err());
}
