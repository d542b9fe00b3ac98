//! Icon sets for Nerd Fonts, Unicode, and ASCII fallback.

use noteline_engine::IconStyle;

/// Icon set based on configured style.
#[derive(Debug, Clone)]
pub struct IconSet {
    mode: IconStyle,
}

impl Default for IconSet {
    fn default() -> Self {
        Self::new(IconStyle::default())
    }
}

impl IconSet {
    /// Create a new icon set with the specified style.
    pub fn new(mode: IconStyle) -> Self {
        Self { mode }
    }

    /// Get the current icon style.
    pub fn mode(&self) -> IconStyle {
        self.mode
    }

    /// Leading indicator of the active timeline row.
    pub fn current(&self) -> &'static str {
        match self.mode {
            IconStyle::Nerd => "\u{f0a9}", // nf-fa-arrow_circle_right
            IconStyle::Unicode => "\u{2192}", // →
            IconStyle::Ascii => ">",
        }
    }

    /// Frames of the loading spinner.
    fn spinner_frames(&self) -> &'static [&'static str] {
        match self.mode {
            IconStyle::Nerd | IconStyle::Unicode => &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"],
            IconStyle::Ascii => &["-", "\\", "|", "/"],
        }
    }

    /// Spinner frame for the given tick.
    pub fn spinner(&self, tick: usize) -> &'static str {
        let frames = self.spinner_frames();
        frames[tick % frames.len()]
    }

    /// Separator between the date and link in the reader header.
    pub fn dot(&self) -> &'static str {
        match self.mode {
            IconStyle::Nerd | IconStyle::Unicode => "\u{00b7}", // ·
            IconStyle::Ascii => "-",
        }
    }
}
