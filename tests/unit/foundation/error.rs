use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        RaceError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(RaceError::data("x").to_string().contains("data error:"));
    assert!(RaceError::render("x").to_string().contains("render error:"));
    assert!(RaceError::encode("x").to_string().contains("encode error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = RaceError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn anyhow_context_converts_through_question_mark() {
    fn inner() -> RaceResult<()> {
        use anyhow::Context as _;
        let r: Result<(), std::io::Error> = Err(std::io::Error::other("disk"));
        r.context("read input")?;
        Ok(())
    }
    let err = inner().unwrap_err();
    assert!(matches!(err, RaceError::Other(_)));
    assert!(err.to_string().contains("read input"));
}
