//! Chart palette for the timeline widget.

pub use timeline_theme as default_theme;

use iced_core::{
    Color,
    theme::{Custom, Palette},
};
use palette::{FromColor, Hsva, rgb::Rgba};

/// Fill of an event marker that is not under the scrubber.
pub const EVENT_FILL: Color = Color::from_rgb8(75, 159, 213);

/// Outline shared by all event markers.
pub const EVENT_STROKE: Color = Color::from_rgb8(128, 128, 128);

const SERIES_PALETTE: [Color; 6] = [
    Color::from_rgb8(31, 119, 180),
    Color::from_rgb8(255, 127, 14),
    Color::from_rgb8(44, 160, 44),
    Color::from_rgb8(214, 39, 40),
    Color::from_rgb8(148, 103, 189),
    Color::from_rgb8(140, 86, 75),
];

/// Line and marker color for the series at `position`, cycling when the
/// dataset carries more series than the palette.
pub fn series_color(position: usize) -> Color {
    SERIES_PALETTE[position % SERIES_PALETTE.len()]
}

/// Fill of the event marker matching the selected snapshot.
pub fn event_highlight() -> Color {
    lightened(EVENT_FILL, 0.6)
}

pub fn timeline_theme() -> Custom {
    Custom::new(
        "Trendline".to_string(),
        Palette {
            background: Color::from_rgb8(250, 250, 248),
            text: Color::from_rgb8(45, 45, 45),
            primary: EVENT_FILL,
            success: Color::from_rgb8(44, 160, 44),
            danger: Color::from_rgb8(214, 39, 40),
            warning: Color::from_rgb8(230, 170, 30),
        },
    )
}

/// Raise value and wash out saturation, keeping the hue.
pub fn lightened(color: Color, amount: f32) -> Color {
    let mut hsva = Hsva::from_color(to_rgba(color));
    hsva.value = (hsva.value + amount).min(1.0);
    hsva.saturation *= 1.0 - amount;
    from_rgba(Rgba::from_color(hsva))
}

pub fn is_dark(color: Color) -> bool {
    relative_luminance(color) < 0.5
}

fn relative_luminance(color: Color) -> f32 {
    0.2126 * color.r + 0.7152 * color.g + 0.0722 * color.b
}

fn to_rgba(color: Color) -> Rgba {
    Rgba::new(color.r, color.g, color.b, color.a)
}

fn from_rgba(rgba: Rgba) -> Color {
    Color::from_rgba(rgba.red, rgba.green, rgba.blue, rgba.alpha)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlight_is_lighter_than_the_base_fill() {
        assert!(relative_luminance(event_highlight()) > relative_luminance(EVENT_FILL));
    }

    #[test]
    fn series_colors_cycle() {
        assert_eq!(series_color(0), series_color(SERIES_PALETTE.len()));
        assert_ne!(series_color(0), series_color(1));
    }

    #[test]
    fn luminance_splits_black_and_white() {
        assert!(is_dark(Color::BLACK));
        assert!(!is_dark(Color::WHITE));
        assert!(is_dark(Color::from_rgb8(31, 119, 180)));
    }
}
