use crate::foundation::error::{LaserError, LaserResult};

pub(crate) const MAGIC: &[u8; 4] = b"ILDA";
pub(crate) const HEADER_LEN: usize = 32;
/// Format code of a color-table record.
pub(crate) const PALETTE_CODE: u8 = 2;

/// Point record layout of a geometry frame.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ContainerFormat {
    /// Code 0: X, Y, Z, status, palette index.
    Indexed3d,
    /// Code 1: X, Y, status, palette index.
    Indexed2d,
    /// Code 4: X, Y, Z, status, R, G, B.
    Truecolor3d,
    /// Code 5: X, Y, status, R, G, B.
    #[default]
    Truecolor2d,
}

impl ContainerFormat {
    /// Header format code.
    pub fn code(self) -> u8 {
        match self {
            Self::Indexed3d => 0,
            Self::Indexed2d => 1,
            Self::Truecolor3d => 4,
            Self::Truecolor2d => 5,
        }
    }

    /// Format for a point-record header code.
    pub fn from_code(code: u8) -> LaserResult<Self> {
        match code {
            0 => Ok(Self::Indexed3d),
            1 => Ok(Self::Indexed2d),
            4 => Ok(Self::Truecolor3d),
            5 => Ok(Self::Truecolor2d),
            other => Err(LaserError::format(format!(
                "unsupported format code {other}"
            ))),
        }
    }

    /// Whether points carry RGB instead of a palette index.
    pub fn is_truecolor(self) -> bool {
        matches!(self, Self::Truecolor3d | Self::Truecolor2d)
    }

    /// Whether points carry a z coordinate.
    pub fn has_z(self) -> bool {
        matches!(self, Self::Indexed3d | Self::Truecolor3d)
    }

    /// Bytes per point record.
    pub fn record_len(self) -> usize {
        let coords = if self.has_z() { 6 } else { 4 };
        let color = if self.is_truecolor() { 3 } else { 1 };
        coords + 1 + color
    }
}

/// Decoded 32-byte record header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Header {
    pub(crate) format_code: u8,
    pub(crate) name: String,
    pub(crate) company: String,
    pub(crate) record_count: u16,
    pub(crate) frame_number: u16,
    pub(crate) total_frames: u16,
    pub(crate) projector: u8,
}

impl Header {
    pub(crate) fn encode(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..4].copy_from_slice(MAGIC);
        out[7] = self.format_code;
        out[8..16].copy_from_slice(&encode_name8(&self.name));
        out[16..24].copy_from_slice(&encode_name8(&self.company));
        out[24..26].copy_from_slice(&self.record_count.to_be_bytes());
        out[26..28].copy_from_slice(&self.frame_number.to_be_bytes());
        out[28..30].copy_from_slice(&self.total_frames.to_be_bytes());
        out[30] = self.projector;
        out
    }

    pub(crate) fn decode(block: &[u8; HEADER_LEN]) -> LaserResult<Self> {
        if &block[0..4] != MAGIC {
            return Err(LaserError::format(format!(
                "bad magic {:02x?}",
                &block[0..4]
            )));
        }
        Ok(Self {
            format_code: block[7],
            name: decode_name8(&block[8..16]),
            company: decode_name8(&block[16..24]),
            record_count: u16::from_be_bytes([block[24], block[25]]),
            frame_number: u16::from_be_bytes([block[26], block[27]]),
            total_frames: u16::from_be_bytes([block[28], block[29]]),
            projector: block[30],
        })
    }

    /// Zero records with empty name and company fields.
    pub(crate) fn is_terminator(&self) -> bool {
        self.record_count == 0 && self.name.is_empty() && self.company.is_empty()
    }

    /// Whether this header, once encoded, decodes as the end-of-stream record. Names are
    /// compared after the 8-byte round trip, which drops trailing NUL and space.
    pub(crate) fn reads_as_terminator(&self) -> bool {
        self.record_count == 0
            && decode_name8(&encode_name8(&self.name)).is_empty()
            && decode_name8(&encode_name8(&self.company)).is_empty()
    }
}

fn encode_name8(s: &str) -> [u8; 8] {
    let mut out = [0u8; 8];
    for (dst, c) in out.iter_mut().zip(s.chars()) {
        *dst = if c.is_ascii() { c as u8 } else { b'?' };
    }
    out
}

fn decode_name8(b: &[u8]) -> String {
    let s: String = b
        .iter()
        .filter(|c| c.is_ascii())
        .map(|&c| c as char)
        .collect();
    s.trim_end_matches(['\0', ' ']).to_owned()
}

#[cfg(test)]
#[path = "../../tests/unit/container/format.rs"]
mod tests;
