//! Shared text and axis styling for the chart widgets.

use iced::theme::palette::Extended;
use iced::{Color, Font};

/// Compact widget typography, header and footer alike.
pub const TEXT_SIZE: f32 = 10.5;

pub const MONO: Font = Font::MONOSPACE;

/// Rough glyph advance used for label width estimates.
pub const CHAR_W: f32 = TEXT_SIZE * 0.64;

pub fn axis_color(palette: &Extended) -> Color {
    palette.background.strong.color.scale_alpha(0.6)
}
