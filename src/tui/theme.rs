use std::collections::HashMap;

use ratatui::style::Color;

use crate::model::task::Priority;
use crate::model::user::{DEFAULT_COLOR_CLASS, USER_COLOR_PALETTE};
use crate::model::UiConfig;

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub card_border: Color,
    pub drag_over: Color,
    pub progress_fill: Color,
    pub progress_empty: Color,
    pub search_match_bg: Color,
    pub search_match_fg: Color,
    /// Avatar colors keyed by user color class
    pub user_colors: HashMap<String, Color>,
}

const PALETTE_RGB: [(u8, u8, u8); 12] = [
    (0xFF, 0x7A, 0x00),
    (0x9D, 0x27, 0xE0),
    (0x6E, 0x52, 0xFF),
    (0xFC, 0x71, 0xFF),
    (0xFF, 0xBB, 0x2B),
    (0x1F, 0xD7, 0xC1),
    (0x46, 0x2F, 0x8A),
    (0xFF, 0x45, 0x46),
    (0x00, 0xBE, 0xE8),
    (0xFF, 0x5E, 0xB3),
    (0x93, 0xD7, 0x2D),
    (0xFF, 0xC7, 0x01),
];

impl Default for Theme {
    fn default() -> Self {
        let mut user_colors: HashMap<String, Color> = USER_COLOR_PALETTE
            .iter()
            .zip(PALETTE_RGB)
            .map(|(class, (r, g, b))| (class.to_string(), Color::Rgb(r, g, b)))
            .collect();
        user_colors.insert(DEFAULT_COLOR_CLASS.into(), Color::Rgb(0x7D, 0x78, 0xBF));

        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            red: Color::Rgb(0xFF, 0x44, 0x44),
            yellow: Color::Rgb(0xFF, 0xD7, 0x00),
            green: Color::Rgb(0x44, 0xFF, 0x88),
            cyan: Color::Rgb(0x44, 0xDD, 0xFF),
            card_border: Color::Rgb(0x3D, 0x14, 0x38),
            drag_over: Color::Rgb(0x44, 0xDD, 0xFF),
            progress_fill: Color::Rgb(0x44, 0x88, 0xFF),
            progress_empty: Color::Rgb(0x2A, 0x22, 0x44),
            search_match_bg: Color::Rgb(0x40, 0xE0, 0xD0),
            search_match_fg: Color::Rgb(0x0C, 0x00, 0x1B),
            user_colors,
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from the `[ui]` config, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            if let Some(color) = parse_hex_color(value) {
                match key.as_str() {
                    "background" => theme.background = color,
                    "text" => theme.text = color,
                    "text_bright" => theme.text_bright = color,
                    "highlight" => theme.highlight = color,
                    "dim" => theme.dim = color,
                    "red" => theme.red = color,
                    "yellow" => theme.yellow = color,
                    "green" => theme.green = color,
                    "cyan" => theme.cyan = color,
                    "card_border" => theme.card_border = color,
                    "drag_over" => theme.drag_over = color,
                    "progress_fill" => theme.progress_fill = color,
                    "progress_empty" => theme.progress_empty = color,
                    "search_match_bg" => theme.search_match_bg = color,
                    "search_match_fg" => theme.search_match_fg = color,
                    _ => {}
                }
            }
        }

        for (class, value) in &ui.user_colors {
            if let Some(color) = parse_hex_color(value) {
                theme.user_colors.insert(class.clone(), color);
            }
        }

        theme
    }

    /// Avatar color for a user color class. Classes written by other
    /// clients that this theme does not know fall back to the default class.
    pub fn user_color(&self, class: &str) -> Color {
        self.user_colors
            .get(class)
            .or_else(|| self.user_colors.get(DEFAULT_COLOR_CLASS))
            .copied()
            .unwrap_or(self.dim)
    }

    pub fn priority_color(&self, prio: Priority) -> Color {
        match prio {
            Priority::Urgent => self.red,
            Priority::Medium => self.yellow,
            Priority::Low => self.green,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert_eq!(
            parse_hex_color("#FF4444"),
            Some(Color::Rgb(0xFF, 0x44, 0x44))
        );
        assert_eq!(parse_hex_color("FF4444"), None); // missing #
        assert_eq!(parse_hex_color("#FF44"), None);
        assert_eq!(parse_hex_color("#ZZZZZZ"), None);
    }

    #[test]
    fn every_palette_class_has_a_color() {
        let theme = Theme::default();
        for class in USER_COLOR_PALETTE {
            assert!(theme.user_colors.contains_key(class), "{class}");
        }
        assert_eq!(theme.user_color("user-color-1"), Color::Rgb(0xFF, 0x7A, 0x00));
    }

    #[test]
    fn config_overrides() {
        let mut ui = UiConfig::default();
        ui.colors.insert("background".into(), "#000000".into());
        ui.colors.insert("nonsense".into(), "#000000".into());
        ui.user_colors.insert("user-color-3".into(), "#112233".into());
        ui.user_colors.insert("user-color-4".into(), "not a color".into());

        let theme = Theme::from_config(&ui);
        assert_eq!(theme.background, Color::Rgb(0, 0, 0));
        assert_eq!(theme.user_color("user-color-3"), Color::Rgb(0x11, 0x22, 0x33));
        assert_eq!(theme.user_color("user-color-4"), Color::Rgb(0xFC, 0x71, 0xFF));
        // unchanged defaults
        assert_eq!(theme.text, Color::Rgb(0xB0, 0xAA, 0xFF));
    }

    #[test]
    fn unknown_class_uses_default_color() {
        let theme = Theme::default();
        assert_eq!(
            theme.user_color("bg-mystery"),
            theme.user_color(DEFAULT_COLOR_CLASS)
        );
    }
}
