//! Overlay colours

use std::collections::BTreeMap;
use std::fmt;

use rand::Rng;
use tracing::warn;

/// An sRGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional)
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&digits[range], 16).ok();
        Some(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let [r, g, b]: [u8; 3] = rng.gen();
        Self::new(r, g, b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Built-in colours for the known overlay identifiers
pub const PREDEFINED_COLORS: &[(&str, Rgb)] = &[
    ("layer000", Rgb::new(0x4C, 0xAF, 0x50)),
    ("layer001", Rgb::new(0xF4, 0x43, 0x36)),
    ("layer002", Rgb::new(0x21, 0x96, 0xF3)),
    ("layer003", Rgb::new(0x00, 0xBC, 0xD4)),
    ("layer004", Rgb::new(0xFF, 0x98, 0x00)),
    ("layer005", Rgb::new(0x9C, 0x27, 0xB0)),
    ("layer006", Rgb::new(0x79, 0x55, 0x48)),
];

/// Assigns a display colour to each overlay identifier
#[derive(Debug, Clone)]
pub struct Palette {
    colors: BTreeMap<String, Rgb>,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: PREDEFINED_COLORS
                .iter()
                .map(|(id, color)| (id.to_string(), *color))
                .collect(),
        }
    }
}

impl Palette {
    /// Layer configured colours (`id -> "#RRGGBB"`) over the built-in ones
    pub fn with_overrides<I>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (id, hex) in overrides {
            match Rgb::from_hex(&hex) {
                Some(color) => {
                    self.colors.insert(id, color);
                }
                None => warn!("Ignoring invalid colour {:?} for layer {}", hex, id),
            }
        }
        self
    }

    pub fn predefined(&self, id: &str) -> Option<Rgb> {
        self.colors.get(id).copied()
    }

    /// Predefined colour, or a fresh random one
    pub fn color_for<R: Rng + ?Sized>(&self, id: &str, rng: &mut R) -> Rgb {
        self.predefined(id).unwrap_or_else(|| Rgb::random(rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Rgb::from_hex("#4CAF50"), Some(Rgb::new(0x4C, 0xAF, 0x50)));
        assert_eq!(Rgb::from_hex("f44336"), Some(Rgb::new(0xF4, 0x43, 0x36)));
        assert_eq!(Rgb::from_hex("#12345"), None);
        assert_eq!(Rgb::from_hex("#GGGGGG"), None);
        assert_eq!(Rgb::new(0x21, 0x96, 0xF3).to_hex(), "#2196F3");
    }

    #[test]
    fn test_predefined_and_random_colors() {
        let palette = Palette::default();
        let mut rng = StdRng::seed_from_u64(7);

        assert_eq!(palette.color_for("layer002", &mut rng).to_hex(), "#2196F3");
        assert_eq!(palette.predefined("layer099"), None);
        let _ = palette.color_for("layer099", &mut rng);
    }

    #[test]
    fn test_overrides_replace_defaults() {
        let palette = Palette::default().with_overrides(vec![
            ("layer000".to_string(), "#000000".to_string()),
            ("layer010".to_string(), "not a colour".to_string()),
        ]);

        assert_eq!(palette.predefined("layer000"), Some(Rgb::new(0, 0, 0)));
        assert_eq!(palette.predefined("layer010"), None);
        assert_eq!(palette.predefined("layer001"), Some(Rgb::new(0xF4, 0x43, 0x36)));
    }
}
