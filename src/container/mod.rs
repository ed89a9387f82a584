//! Binary interchange container: a run of 32-byte-headed frame records closed by an empty
//! terminator record.

/// Header layout and format codes.
pub mod format;
/// Indexed color tables.
pub mod palette;
/// Raster previews of decoded frames.
pub mod preview;
/// Streaming decoder.
pub mod reader;
/// Frame and container encoder.
pub mod writer;

use crate::foundation::core::Rgb8;
pub use format::ContainerFormat;

/// Status bit: the beam is off while moving to this point.
pub const STATUS_BLANKED: u8 = 0x40;
/// Status bit: final point of the frame.
pub const STATUS_LAST: u8 = 0x80;

/// Per-point color, matching the frame's color profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointColor {
    /// Palette index.
    Indexed(u8),
    /// Straight RGB.
    Rgb(Rgb8),
}

/// One serialized deflection point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DevicePoint {
    /// Horizontal deflection.
    pub x: i16,
    /// Vertical deflection.
    pub y: i16,
    /// Zero for 2D formats.
    pub z: i16,
    /// Status byte: blanked and last-point bits.
    pub status: u8,
    /// Point color.
    pub color: PointColor,
}

impl DevicePoint {
    /// Visible point.
    pub fn lit(x: i16, y: i16, color: PointColor) -> Self {
        Self {
            x,
            y,
            z: 0,
            status: 0,
            color,
        }
    }

    /// Blanked move.
    pub fn blank(x: i16, y: i16, color: PointColor) -> Self {
        Self {
            status: STATUS_BLANKED,
            ..Self::lit(x, y, color)
        }
    }

    /// Whether the laser is off for this point.
    pub fn is_blanked(&self) -> bool {
        self.status & STATUS_BLANKED != 0
    }

    /// Whether the last-point bit is set.
    pub fn is_last(&self) -> bool {
        self.status & STATUS_LAST != 0
    }

    pub(crate) fn with_last(mut self, last: bool) -> Self {
        if last {
            self.status |= STATUS_LAST;
        } else {
            self.status &= !STATUS_LAST;
        }
        self
    }
}

/// One frame record as stored in the container.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerFrame {
    /// Point record layout.
    pub format: ContainerFormat,
    /// Up to 8 ASCII bytes.
    pub name: String,
    /// Up to 8 ASCII bytes.
    pub company: String,
    /// Header frame number. The writer replaces it with the frame's position.
    pub frame_number: u16,
    /// Header total frame count. The writer replaces it with the sequence length.
    pub total_frames: u16,
    /// Projector number.
    pub projector: u8,
    /// Points in drawing order.
    pub points: Vec<DevicePoint>,
}

impl ContainerFrame {
    /// Frame without points, header numbers zeroed.
    pub fn new(format: ContainerFormat, name: impl Into<String>, company: impl Into<String>) -> Self {
        Self {
            format,
            name: name.into(),
            company: company.into(),
            frame_number: 0,
            total_frames: 0,
            projector: 0,
            points: Vec::new(),
        }
    }

    /// Terminator records carry no points and empty name and company fields.
    pub fn is_terminator(&self) -> bool {
        self.points.is_empty() && self.name.is_empty() && self.company.is_empty()
    }
}

/// A fully decoded container.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Container {
    /// Point frames in file order, terminator excluded.
    pub frames: Vec<ContainerFrame>,
    /// Palette from a color-table record, if the file carried one.
    pub palette: Option<palette::Palette>,
}
