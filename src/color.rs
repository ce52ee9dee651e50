use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// An opaque 8 bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

/// Corporate design colors of the Berlin transport authority, each followed
/// by a darker or lighter shade.
pub const PALETTE: [Rgb; 14] = [
    Rgb(0xF0, 0xD7, 0x22), // traffic yellow
    Rgb(0xB6, 0xB3, 0x00),
    Rgb(0x52, 0x8D, 0xBA), // light blue
    Rgb(0x36, 0x6A, 0x93),
    Rgb(0xBC, 0x61, 0x94), // heather violet
    Rgb(0x8A, 0x43, 0x69),
    Rgb(0x59, 0x5B, 0x62), // slate grey
    Rgb(0x7A, 0x7A, 0x7A),
    Rgb(0x25, 0x25, 0x25), // traffic black
    Rgb(0x3D, 0x3D, 0x3D),
    Rgb(0x98, 0x9B, 0x9A), // traffic grey
    Rgb(0xC1, 0xC1, 0xC1),
    Rgb(0xFF, 0xFF, 0xFF), // traffic white, invisible on white backgrounds
    Rgb(0xE0, 0xE0, 0xE0),
];

// ---------------------------------------------------------------------------
// Word → color
// ---------------------------------------------------------------------------

/// Assign palette colors to `words` by their alphabetical position.
///
/// The palette repeats after 14 words. The same word can get a different
/// color if the set of words changes.
pub fn word_color_map<I, T>(words: I) -> BTreeMap<String, Rgb>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let sorted: std::collections::BTreeSet<String> = words.into_iter().map(Into::into).collect();
    sorted
        .into_iter()
        .enumerate()
        .map(|(i, word)| (word, PALETTE[i % PALETTE.len()]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colors_by_sorted_position() {
        let colors = word_color_map(vec!["zug", "bahn", "tram"]);
        assert_eq!(colors["bahn"], PALETTE[0]);
        assert_eq!(colors["tram"], PALETTE[1]);
        assert_eq!(colors["zug"], PALETTE[2]);
    }

    #[test]
    fn palette_repeats() {
        let words: Vec<String> = (0..16).map(|i| format!("w{:02}", i)).collect();
        let colors = word_color_map(words);
        assert_eq!(colors["w14"], PALETTE[0]);
        assert_eq!(colors["w15"], PALETTE[1]);
    }

    #[test]
    fn hex() {
        assert_eq!(PALETTE[0].to_string(), "#F0D722");
        assert_eq!(PALETTE[12].to_string(), "#FFFFFF");
    }
}
