//! Caption snippets for LaTeX documents that include the generated charts.
//!
//! Each chart `<name>` gets `figures/<name>-content.tex` holding a single
//! `\figurecontent{<name>}{<caption>}` call; the document defines the macro.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ReportError;

/// Directory for generated images, relative to the output root.
pub const IMAGES_DIR: &str = "images/generated";
/// Directory for caption snippets, relative to the output root.
pub const FIGURES_DIR: &str = "figures";

/// The caption snippet for one chart.
pub fn figure_content(name: &str, caption: &str) -> String {
    format!("\\figurecontent{{{name}}}{{{}}}\n", escape(caption))
}

/// Escape characters LaTeX treats specially in running text.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '%' | '&' | '#' | '_' | '$' | '{' | '}' => {
                out.push('\\');
                out.push(c);
            }
            '\\' => out.push_str("\\textbackslash{}"),
            '^' => out.push_str("\\textasciicircum{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            '∞' => out.push_str("$\\infty$"),
            _ => out.push(c),
        }
    }
    out
}

/// Write the caption snippet, creating the figures directory if needed.
pub fn write_figure_content(
    out_dir: &Path,
    name: &str,
    caption: &str,
) -> Result<PathBuf, ReportError> {
    let dir = out_dir.join(FIGURES_DIR);
    fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{name}-content.tex"));
    fs::write(&path, figure_content(name, caption))?;
    Ok(path)
}

/// Path for a chart image, creating the images directory if needed.
pub fn generated_image_path(out_dir: &Path, name: &str) -> Result<PathBuf, ReportError> {
    let dir = out_dir.join(IMAGES_DIR);
    fs::create_dir_all(&dir)?;
    Ok(dir.join(format!("{name}.svg")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_figure_content_escapes_caption() {
        assert_eq!(
            figure_content("delay-25_inf", "Delay (Ta/Ts = 25%, cap = ∞)"),
            "\\figurecontent{delay-25_inf}{Delay (Ta/Ts = 25\\%, cap = $\\infty$)}\n"
        );
    }

    #[test]
    fn test_figure_content_escapes_braces_and_specials() {
        assert_eq!(
            figure_content("x", r"a{b}\c^2~d"),
            "\\figurecontent{x}{a\\{b\\}\\textbackslash{}c\\textasciicircum{}2\\textasciitilde{}d}\n"
        );
    }

    #[test]
    fn test_write_figure_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_figure_content(dir.path(), "level", "Inventory level").unwrap();
        assert_eq!(path, dir.path().join("figures/level-content.tex"));
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "\\figurecontent{level}{Inventory level}\n"
        );

        let image = generated_image_path(dir.path(), "level").unwrap();
        assert!(image.parent().unwrap().is_dir());
        assert!(image.ends_with("images/generated/level.svg"));
    }
}
