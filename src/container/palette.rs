use crate::foundation::core::Rgb8;

/// Entries in a color table.
pub const PALETTE_LEN: usize = 256;

/// 256-entry color table for indexed formats.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<Rgb8>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::standard()
    }
}

impl Palette {
    /// Build from explicit entries. Short tables are padded with black; extra entries dropped.
    pub fn from_entries(mut entries: Vec<Rgb8>) -> Self {
        entries.resize(PALETTE_LEN, Rgb8::BLACK);
        Self { entries }
    }

    /// Standard table: black, fourteen named hues, then a 6-level color cube.
    pub fn standard() -> Self {
        let mut entries = vec![
            Rgb8::BLACK,
            Rgb8::new(255, 0, 0),
            Rgb8::new(0, 255, 0),
            Rgb8::new(0, 0, 255),
            Rgb8::new(255, 255, 0),
            Rgb8::new(255, 0, 255),
            Rgb8::new(0, 255, 255),
            Rgb8::WHITE,
            Rgb8::new(255, 128, 0),
            Rgb8::new(128, 0, 255),
            Rgb8::new(0, 128, 255),
            Rgb8::new(128, 255, 0),
            Rgb8::new(255, 0, 128),
            Rgb8::new(0, 255, 128),
            Rgb8::new(128, 128, 128),
        ];
        const STEPS: [u8; 6] = [0, 51, 102, 153, 204, 255];
        'cube: for r in STEPS {
            for g in STEPS {
                for b in STEPS {
                    if entries.len() == PALETTE_LEN {
                        break 'cube;
                    }
                    entries.push(Rgb8::new(r, g, b));
                }
            }
        }
        Self::from_entries(entries)
    }

    /// Standard table with indices 1..=63 forced to white, for single-index monochrome files.
    pub fn white63() -> Self {
        let mut palette = Self::standard();
        for entry in &mut palette.entries[1..64] {
            *entry = Rgb8::WHITE;
        }
        palette
    }

    /// Case-insensitive lookup of a built-in table.
    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "standard" | "idtf14" | "default" => Some(Self::standard()),
            "white63" | "white" | "mono" => Some(Self::white63()),
            _ => None,
        }
    }

    /// Color at `index`.
    pub fn get(&self, index: u8) -> Rgb8 {
        self.entries[usize::from(index)]
    }

    /// All entries in index order.
    pub fn entries(&self) -> &[Rgb8] {
        &self.entries
    }

    /// Index of the closest entry, skipping black at index 0. Ties keep the lower index.
    pub fn nearest(&self, color: Rgb8) -> u8 {
        let mut best = (1usize, u32::MAX);
        for (i, &entry) in self.entries.iter().enumerate().skip(1) {
            let d = entry.distance_sq(color);
            if d < best.1 {
                best = (i, d);
            }
        }
        best.0 as u8
    }
}

#[cfg(test)]
#[path = "../../tests/unit/container/palette.rs"]
mod tests;
