//! Terminal styling for command output

use owo_colors::{OwoColorize, colors::css};

/// Columns needed to print module numbers next to the outline.
const NUMBERED_OUTLINE_WIDTH: u16 = 60;

/// Whether stdout should be colored.
fn color_enabled() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Width of the attached terminal, if there is one.
fn terminal_width() -> Option<u16> {
    terminal_size::terminal_size().map(|(w, _)| w.0)
}

/// Whether the outline has room for a number column.
///
/// Output that is not a terminal always gets numbers.
pub fn has_room_for_numbers() -> bool {
    terminal_width().is_none_or(|w| w >= NUMBERED_OUTLINE_WIDTH)
}

#[derive(Debug, Clone, Copy)]
enum Style {
    Success,
    Warning,
    Heading,
    Dim,
}

fn paint(text: &str, style: Style) -> String {
    if !color_enabled() {
        return text.to_string();
    }
    match style {
        Style::Success => text.fg::<css::Green>().to_string(),
        Style::Warning => text.fg::<css::Orange>().to_string(),
        Style::Heading => text.fg::<css::LightBlue>().bold().to_string(),
        Style::Dim => text.dimmed().to_string(),
    }
}

/// Styling for strings printed by commands.
pub trait Colorize {
    /// Green, for a clean result.
    fn success(&self) -> String;
    /// Amber, for non-fatal problems.
    fn warning(&self) -> String;
    /// Bold blue, for section headings.
    fn heading(&self) -> String;
    /// Dimmed, for secondary detail.
    fn dim(&self) -> String;
}

impl<T: AsRef<str> + ?Sized> Colorize for T {
    fn success(&self) -> String {
        paint(self.as_ref(), Style::Success)
    }

    fn warning(&self) -> String {
        paint(self.as_ref(), Style::Warning)
    }

    fn heading(&self) -> String {
        paint(self.as_ref(), Style::Heading)
    }

    fn dim(&self) -> String {
        paint(self.as_ref(), Style::Dim)
    }
}
