use super::*;

#[test]
fn family_names_split_and_unquote() {
    assert_eq!(
        family_names(" NanumGothic , 'Noto Sans CJK KR',\"DejaVu Sans\", sans-serif,"),
        vec!["NanumGothic", "Noto Sans CJK KR", "DejaVu Sans", "sans-serif"]
    );
    assert!(family_names(" , ").is_empty());
}

#[test]
fn css_family_list_quotes_named_families_only() {
    assert_eq!(
        css_family_list("NanumGothic, Noto Sans CJK KR, sans-serif"),
        "'NanumGothic', 'Noto Sans CJK KR', sans-serif"
    );
}

#[test]
fn missing_font_dirs_are_ignored() {
    let db = build_fontdb(&[PathBuf::from("target/unit-fonts/does-not-exist")]);
    report_font_choice(&db, "NoSuchFamily, sans-serif");
}

#[test]
fn empty_database_is_reported_without_panicking() {
    report_font_choice(&usvg::fontdb::Database::new(), "sans-serif");
}
