//! Catppuccin color palettes for the TUI.

use noteline_engine::ThemeName;
use ratatui::style::Color;

/// Opacity of inactive timeline labels.
pub const DIM_OPACITY: f32 = 0.5;

/// Opacity of inactive timeline labels under the pointer.
pub const HOVER_OPACITY: f32 = 0.8;

/// Theme color palette.
#[derive(Debug, Clone)]
pub struct Theme {
    // Backgrounds
    pub base: Color,
    pub surface: Color,

    // Foregrounds
    pub text: Color,
    pub subtext: Color,
    pub muted: Color,

    // Accents
    pub primary: Color,

    // Semantic
    pub error: Color,

    // Borders
    pub border: Color,
    pub border_focused: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

impl Theme {
    /// Palette for a configured theme name.
    pub fn named(name: ThemeName) -> Self {
        match name {
            ThemeName::Mocha => Self::mocha(),
            ThemeName::Latte => Self::latte(),
            ThemeName::HighContrast => Self::high_contrast(),
        }
    }

    /// Catppuccin Mocha theme (default dark theme).
    pub fn mocha() -> Self {
        Self {
            base: Color::Rgb(30, 30, 46),       // #1e1e2e
            surface: Color::Rgb(49, 50, 68),    // #313244

            text: Color::Rgb(205, 214, 244),    // #cdd6f4
            subtext: Color::Rgb(166, 173, 200), // #a6adc8
            muted: Color::Rgb(108, 112, 134),   // #6c7086

            primary: Color::Rgb(180, 190, 254), // #b4befe (lavender)

            error: Color::Rgb(243, 139, 168),   // #f38ba8 (red)

            border: Color::Rgb(69, 71, 90),            // #45475a
            border_focused: Color::Rgb(180, 190, 254), // #b4befe (lavender)
        }
    }

    /// Catppuccin Latte theme (light theme).
    pub fn latte() -> Self {
        Self {
            base: Color::Rgb(239, 241, 245),    // #eff1f5
            surface: Color::Rgb(230, 233, 239), // #e6e9ef

            text: Color::Rgb(76, 79, 105),      // #4c4f69
            subtext: Color::Rgb(92, 95, 119),   // #5c5f77
            muted: Color::Rgb(140, 143, 161),   // #8c8fa1

            primary: Color::Rgb(114, 135, 253), // #7287fd (lavender)

            error: Color::Rgb(210, 15, 57),     // #d20f39 (red)

            border: Color::Rgb(188, 192, 204),         // #bcc0cc
            border_focused: Color::Rgb(114, 135, 253), // #7287fd (lavender)
        }
    }

    /// High contrast theme for accessibility.
    pub fn high_contrast() -> Self {
        Self {
            base: Color::Black,
            surface: Color::Rgb(20, 20, 20),

            text: Color::White,
            subtext: Color::Rgb(200, 200, 200),
            muted: Color::Rgb(150, 150, 150),

            primary: Color::Cyan,

            error: Color::Red,

            border: Color::White,
            border_focused: Color::Cyan,
        }
    }

    /// Blend `fg` towards the background by `opacity` (0.0 = background, 1.0 = `fg`).
    ///
    /// Named colors cannot be blended; they switch at half opacity.
    pub fn fade(&self, fg: Color, opacity: f32) -> Color {
        let opacity = opacity.clamp(0.0, 1.0);
        match (fg, self.base) {
            (Color::Rgb(fr, fg_, fb), Color::Rgb(br, bg, bb)) => Color::Rgb(
                mix(br, fr, opacity),
                mix(bg, fg_, opacity),
                mix(bb, fb, opacity),
            ),
            _ if opacity >= 0.5 => fg,
            _ => self.base,
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn mix(from: u8, to: u8, t: f32) -> u8 {
    let from = f32::from(from);
    let to = f32::from(to);
    (from + (to - from) * t).round().clamp(0.0, 255.0) as u8
}
