//! Terminal rendering of step lists and audit reports
//!
//! Uses termimad for rich output and prints the markdown unchanged when
//! color is disabled, so piped output stays greppable.

use anyhow::Result;
use termimad::{crossterm::style::Color, MadSkin};

/// How a single markdown line is styled in rich mode.
#[derive(Debug, PartialEq, Eq)]
enum LineKind {
    Heading,
    /// An audit finding whose severity is error
    Error,
    /// An empty result such as "None."
    Empty,
    Text,
}

fn classify(line: &str) -> LineKind {
    if line.starts_with('#') {
        LineKind::Heading
    } else if line.starts_with("- **") && line.contains("(error)") {
        LineKind::Error
    } else if line == "None." || line == "No violations found." {
        LineKind::Empty
    } else {
        LineKind::Text
    }
}

/// Renders markdown either richly or as plain text
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
    error_skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Blue);
        skin.bold.set_fg(Color::Cyan);
        skin.italic.set_fg(Color::DarkGrey);

        let mut error_skin = skin.clone();
        error_skin.paragraph.set_fg(Color::Red);
        error_skin.bold.set_fg(Color::Red);

        Self {
            rich_enabled,
            skin,
            error_skin,
        }
    }

    /// Print markdown to stdout
    pub fn render(&self, markdown: &str) -> Result<()> {
        if !self.rich_enabled {
            print!("{markdown}");
            return Ok(());
        }

        for line in markdown.lines() {
            match classify(line) {
                // Keep the hashes so section levels stay visible
                LineKind::Heading => println!("\x1b[34m{line}\x1b[0m"),
                LineKind::Error => {
                    self.error_skin.print_inline(line);
                    println!();
                }
                LineKind::Empty => {
                    self.skin.print_inline(&format!("*{line}*"));
                    println!();
                }
                LineKind::Text => {
                    self.skin.print_inline(line);
                    println!();
                }
            }
        }
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_renderer() {
        let renderer = TerminalRenderer::new(false);
        assert!(!renderer.rich_enabled);
        renderer.render("## Next steps\n\nNone.\n").unwrap();
    }

    #[test]
    fn test_default_is_rich() {
        assert!(TerminalRenderer::default().rich_enabled);
    }

    #[test]
    fn test_classify_report_lines() {
        assert_eq!(classify("# Audit report"), LineKind::Heading);
        assert_eq!(
            classify("- **2_42** step 5 (error): Step id 5 is shared by 3 annotated steps"),
            LineKind::Error
        );
        assert_eq!(
            classify("- **2_42** step 5 (warning): Timestamp != -1 for missing step 5"),
            LineKind::Text
        );
        assert_eq!(classify("None."), LineKind::Empty);
        assert_eq!(classify("- 2. Steep-Steep tea"), LineKind::Text);
    }
}
