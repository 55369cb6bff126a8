//! Theme import rewriting for fetched component sources.
//!
//! Registry sources import the theme through a fixed alias. Before a file is
//! written, the quoted alias is replaced by a relative specifier pointing at the
//! consumer's own theme module.
use crate::paths::relative_module_path;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// Module alias used by every registry source that depends on the theme.
pub const THEME_ALIAS: &str = "@/lib/pdfx-theme";

const STRIPPED_EXTENSIONS: [&str; 4] = ["ts", "tsx", "js", "jsx"];

/// Characters that may directly precede the opening quote of an import specifier.
const SPECIFIER_OPENERS: [char; 7] = ['(', '[', '{', ',', '=', ':', ';'];

static ALIAS_SPECIFIER: LazyLock<Regex> = LazyLock::new(|| {
    let alias = regex::escape(THEME_ALIAS);
    Regex::new(&format!(r#"'{alias}'|"{alias}"|`{alias}`"#)).expect("theme alias regex")
});

/// Replace every quoted occurrence of [`THEME_ALIAS`] with `theme_import`.
///
/// Only exact, quoted specifiers match, so `@/lib/pdfx-theme-extra` or the alias
/// inside a longer string is left alone. The opening quote must start a token:
/// it follows whitespace, an opening bracket, or a separator, never a quote or a
/// path character. A closing quote therefore never opens a second match, and
/// rewriting twice gives the same result as rewriting once. The quote style is
/// preserved. Contents without the alias come back unchanged.
pub fn rewrite(content: &str, theme_import: &str) -> String {
    ALIAS_SPECIFIER
        .replace_all(content, |caps: &regex::Captures<'_>| {
            let specifier = &caps[0];
            let start = caps.get(0).map_or(0, |m| m.start());
            if !opens_specifier(&content[..start]) {
                return specifier.to_string();
            }
            let quote = &specifier[..1];
            format!("{quote}{theme_import}{quote}")
        })
        .into_owned()
}

fn opens_specifier(before: &str) -> bool {
    match before.chars().next_back() {
        None => true,
        Some(c) => c.is_whitespace() || SPECIFIER_OPENERS.contains(&c),
    }
}

/// Import specifier for `theme_file` as seen from a file written into `dest_dir`.
///
/// Both paths are relative to the project root.
pub fn theme_import_for(dest_dir: &Path, theme_file: &Path) -> String {
    let without_ext = match theme_file.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if STRIPPED_EXTENSIONS.contains(&ext) => theme_file.with_extension(""),
        _ => theme_file.to_path_buf(),
    };
    relative_module_path(dest_dir, &without_ext)
}
