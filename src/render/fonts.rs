use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Font database shared by every rendered frame.
///
/// Holds system fonts plus `.ttf`/`.otf`/`.ttc` files found in the given directories and in a
/// `fonts/` subdirectory of each.
pub fn build_fontdb(dirs: &[PathBuf]) -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();

    load_fonts_from_dir(&mut db, Path::new("fonts"));
    for dir in dirs {
        load_fonts_from_dir(&mut db, dir);
        load_fonts_from_dir(&mut db, &dir.join("fonts"));
    }

    tracing::debug!(faces = db.len(), "font database ready");
    Arc::new(db)
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable font file");
        }
    }
}

/// Split a CSS-like family list into trimmed, unquoted names.
pub fn family_names(list: &str) -> Vec<String> {
    list.split(',')
        .map(|f| f.trim().trim_matches(|c| c == '"' || c == '\'').trim())
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect()
}

/// Family list with named families quoted, ready for an SVG `font-family` attribute.
pub fn css_family_list(list: &str) -> String {
    const GENERIC: [&str; 5] = ["serif", "sans-serif", "monospace", "cursive", "fantasy"];
    family_names(list)
        .into_iter()
        .map(|name| {
            if GENERIC.contains(&name.as_str()) {
                name
            } else {
                format!("'{}'", name.replace('\'', ""))
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Log which family of `list` will actually be used, and warn when none is installed.
pub fn report_font_choice(db: &usvg::fontdb::Database, list: &str) {
    if db.is_empty() {
        tracing::warn!("no fonts found; text labels will not be drawn");
        return;
    }
    let named = family_names(list);
    let installed = named.iter().find(|name| {
        db.faces()
            .any(|face| face.families.iter().any(|(n, _)| n.eq_ignore_ascii_case(name)))
    });
    match installed {
        Some(name) => tracing::info!(family = %name, "using font family"),
        None => tracing::warn!(
            families = %list,
            "none of the requested font families is installed; falling back to the default \
             sans-serif face"
        ),
    }
}

/// Resolver that walks the requested families, then generic fallbacks, then any face at all.
pub(crate) fn make_font_resolver() -> usvg::FontResolver<'static> {
    use usvg::FontResolver;

    FontResolver {
        select_font: Box::new(|font, fontdb| {
            let mut families = Vec::<usvg::fontdb::Family<'_>>::new();
            for family in font.families() {
                families.push(match family {
                    usvg::FontFamily::Serif => usvg::fontdb::Family::Serif,
                    usvg::FontFamily::SansSerif => usvg::fontdb::Family::SansSerif,
                    usvg::FontFamily::Cursive => usvg::fontdb::Family::Cursive,
                    usvg::FontFamily::Fantasy => usvg::fontdb::Family::Fantasy,
                    usvg::FontFamily::Monospace => usvg::fontdb::Family::Monospace,
                    usvg::FontFamily::Named(s) => usvg::fontdb::Family::Name(s),
                });
            }
            families.push(usvg::fontdb::Family::SansSerif);

            let style = match font.style() {
                usvg::FontStyle::Normal => usvg::fontdb::Style::Normal,
                usvg::FontStyle::Italic => usvg::fontdb::Style::Italic,
                usvg::FontStyle::Oblique => usvg::fontdb::Style::Oblique,
            };

            let query = usvg::fontdb::Query {
                families: &families,
                weight: usvg::fontdb::Weight(font.weight()),
                stretch: usvg::fontdb::Stretch::Normal,
                style,
            };

            if let Some(id) = fontdb.query(&query) {
                return Some(id);
            }
            fontdb.faces().next().map(|f| f.id)
        }),
        select_fallback: FontResolver::default_fallback_selector(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/fonts.rs"]
mod tests;
