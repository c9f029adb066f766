//! Hex color parsing and canonical serialization
//!
//! Stored colors are `#RRGGBB` strings. Parsing also accepts `RRGGBBAA` so that
//! hand-edited values with alpha still load; writing always drops alpha.

use egui::Color32;

/// Straight (non-premultiplied) RGBA color parsed from a hex string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl HexColor {
    pub const WHITE: HexColor = HexColor::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: HexColor = HexColor::rgb(0x00, 0x00, 0x00);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    /// Parse `RRGGBB` or `RRGGBBAA`, with optional `#` and surrounding whitespace.
    /// Any other length or a non-hex digit is a parse failure.
    pub fn parse(input: &str) -> Option<Self> {
        let digits: String = input.trim().chars().filter(|&c| c != '#').collect();
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }

        let value = match digits.len() {
            6 | 8 => u32::from_str_radix(&digits, 16).ok()?,
            _ => return None,
        };

        if digits.len() == 6 {
            Some(Self::rgb((value >> 16) as u8, (value >> 8) as u8, value as u8))
        } else {
            Some(Self {
                r: (value >> 24) as u8,
                g: (value >> 16) as u8,
                b: (value >> 8) as u8,
                a: value as u8,
            })
        }
    }

    /// Canonical storage form: `#RRGGBB`, uppercase, alpha ignored
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn to_color32(self) -> Color32 {
        Color32::from_rgba_unmultiplied(self.r, self.g, self.b, self.a)
    }

    pub fn to_rgb_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    pub fn from_rgb_array([r, g, b]: [u8; 3]) -> Self {
        Self::rgb(r, g, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_six_digits_with_hash() {
        assert_eq!(HexColor::parse("#FF8000"), Some(HexColor::rgb(0xFF, 0x80, 0x00)));
    }

    #[test]
    fn test_parse_lowercase_without_hash() {
        assert_eq!(HexColor::parse("1a2b3c"), Some(HexColor::rgb(0x1A, 0x2B, 0x3C)));
    }

    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(HexColor::parse("  #00FF00\n"), Some(HexColor::rgb(0, 0xFF, 0)));
    }

    #[test]
    fn test_parse_eight_digits_is_rgba() {
        let color = HexColor::parse("#11223344").unwrap();
        assert_eq!((color.r, color.g, color.b, color.a), (0x11, 0x22, 0x33, 0x44));
    }

    #[test]
    fn test_six_digit_round_trip_is_canonical_uppercase() {
        for input in ["#abcdef", "#ABCDEF", "abcdef", "#00ff7F", "#000000", "#FFFFFF"] {
            let hex = HexColor::parse(input).unwrap().to_hex();
            let expected = format!("#{}", input.trim_start_matches('#').to_ascii_uppercase());
            assert_eq!(hex, expected, "input {input}");
        }
    }

    #[test]
    fn test_eight_digit_serializes_rgb_portion() {
        assert_eq!(HexColor::parse("#a1b2c3d4").unwrap().to_hex(), "#A1B2C3");
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        for input in ["#ZZZZZZ", "#FFF", "", "#", "#FFFFF", "#FFFFFFF", "#FFFFFFFFF", "+12345"] {
            assert_eq!(HexColor::parse(input), None, "input {input:?}");
        }
    }

    #[test]
    fn test_to_color32_keeps_alpha() {
        let color = HexColor::parse("#0AC81E80").unwrap();
        assert_eq!(color.to_color32(), Color32::from_rgba_unmultiplied(10, 200, 30, 0x80));
    }

    #[test]
    fn test_rgb_array_drops_alpha() {
        let color = HexColor::parse("#10203080").unwrap();
        assert_eq!(color.to_rgb_array(), [0x10, 0x20, 0x30]);
        assert_eq!(HexColor::from_rgb_array([1, 2, 3]).a, 0xFF);
    }
}
