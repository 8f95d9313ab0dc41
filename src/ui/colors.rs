//! Theme colors
//!
//! Content refers to colors by symbolic name (`ui_gold`, `fx_fire`, ...).
//! The game script's `game_colors` maps names to hex codes; anything it
//! leaves out falls back to a built-in palette.

use std::collections::HashMap;

use ratatui::style::Color;

/// Symbolic name to terminal color
#[derive(Debug, Clone, Default)]
pub struct Palette {
    colors: HashMap<String, Color>,
}

/// Built-in colors for the names the core itself uses
fn fallback(name: &str) -> Color {
    match name {
        "ui_text" | "player" => Color::White,
        "ui_emphasis" => Color::LightRed,
        "ui_gold" => Color::Yellow,
        "fx_fire" => Color::Rgb(255, 120, 0),
        "asset_wall" => Color::Rgb(140, 120, 100),
        "asset_floor" => Color::Rgb(90, 90, 90),
        _ => Color::Gray,
    }
}

/// Parse `#rrggbb` or `#rgb`
pub fn parse_hex(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match digits.len() {
        6 => Some(Color::Rgb(
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        )),
        3 => {
            let short = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
            Some(Color::Rgb(short(0)?, short(1)?, short(2)?))
        }
        _ => None,
    }
}

impl Palette {
    pub fn from_theme(theme: &[(String, String)]) -> Self {
        let mut colors = HashMap::new();
        for (name, hex) in theme {
            match parse_hex(hex) {
                Some(color) => {
                    colors.insert(name.clone(), color);
                }
                None => log::warn!("Ignoring color {} = {:?}", name, hex),
            }
        }
        Self { colors }
    }

    pub fn color(&self, name: &str) -> Color {
        self.colors.get(name).copied().unwrap_or_else(|| fallback(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#ff8000"), Some(Color::Rgb(255, 128, 0)));
        assert_eq!(parse_hex("#fff"), Some(Color::Rgb(255, 255, 255)));
        assert_eq!(parse_hex("ff8000"), None);
        assert_eq!(parse_hex("#ggg"), None);
        assert_eq!(parse_hex("#1234"), None);
    }

    #[test]
    fn test_theme_overrides_fallback() {
        let palette = Palette::from_theme(&[
            ("ui_gold".to_string(), "#010203".to_string()),
            ("broken".to_string(), "red".to_string()),
        ]);
        assert_eq!(palette.color("ui_gold"), Color::Rgb(1, 2, 3));
        assert_eq!(palette.color("ui_emphasis"), Color::LightRed);
        assert_eq!(palette.color("broken"), Color::Gray);
    }
}
