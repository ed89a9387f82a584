//! Sequence-level compilation: normalization, point budgeting, color resolution and encoding
//! of extracted frames into container frames.

/// Device-space border stroke removal.
pub mod border;
/// Per-frame point budgeting.
pub mod budget;
/// Stroke color sampling.
pub mod color;
/// Sequence-wide normalization into device coordinates.
pub mod normalize;

use crate::config::CompileConfig;
use crate::container::palette::Palette;
use crate::container::{ContainerFormat, ContainerFrame, PointColor};
use crate::foundation::core::Rgb8;
use crate::geometry::polyline::{Frame, Polyline};

use border::{BorderStrokeRule, remove_border_strokes};
use budget::{BudgetedFrame, budget_polylines};
use normalize::Normalization;

/// Per-frame statistics produced while encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Points written to the frame.
    pub points: usize,
    /// Source points lost to the ceiling.
    pub dropped: usize,
    /// Frame holds only the placeholder point.
    pub synthetic: bool,
    /// Border strokes removed after budgeting.
    pub border_strokes: usize,
}

/// Frozen phase-two state shared read-only by every frame of a sequence.
#[derive(Clone, Debug)]
pub struct FrameEncoder {
    norm: Normalization,
    ceiling: usize,
    never_empty: bool,
    border_rule: Option<BorderStrokeRule>,
    format: ContainerFormat,
    palette: Palette,
    palette_index: u8,
    company: String,
    name_prefix: String,
    projector: u8,
}

impl FrameEncoder {
    /// Encoder for one compile, sharing `norm` across every frame.
    pub fn new(cfg: &CompileConfig, norm: Normalization) -> Self {
        Self {
            norm,
            ceiling: cfg.budget.ceiling(),
            never_empty: cfg.budget.never_empty,
            border_rule: cfg.remove_outer_frame.then(BorderStrokeRule::default),
            format: cfg.format,
            palette: Palette::standard(),
            palette_index: cfg.palette_index,
            company: cfg.company.clone(),
            name_prefix: cfg.frame_name_prefix.clone(),
            projector: cfg.projector,
        }
    }

    /// Mapping applied to every frame.
    pub fn normalization(&self) -> &Normalization {
        &self.norm
    }

    /// Per-frame point ceiling.
    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Palette used to resolve indexed colors.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Header name for a frame: its own name unless blank, else the prefix and zero-padded index.
    pub fn frame_name(&self, frame: &Frame) -> String {
        frame
            .name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| format!("{}{:04}", self.name_prefix, frame.index))
    }

    /// Normalize, budget and color one frame, then drop device-space border strokes when
    /// outer-frame removal is on.
    pub fn encode(&self, frame: &Frame) -> (ContainerFrame, FrameStats) {
        let BudgetedFrame {
            mut points,
            dropped,
            synthetic,
        } = budget_polylines(
            &frame.polylines,
            &self.norm,
            self.ceiling,
            self.never_empty,
            |pl| self.point_color(pl),
        );
        let border_strokes = self
            .border_rule
            .map_or(0, |rule| remove_border_strokes(&mut points, rule));
        if border_strokes > 0 {
            tracing::debug!(frame = frame.index, border_strokes, "removed border strokes");
        }
        let stats = FrameStats {
            points: points.len(),
            dropped,
            synthetic,
            border_strokes,
        };
        let mut out = ContainerFrame::new(self.format, self.frame_name(frame), self.company.clone());
        out.projector = self.projector;
        out.points = points;
        (out, stats)
    }

    fn point_color(&self, polyline: Option<&Polyline>) -> PointColor {
        let explicit = polyline.and_then(|pl| pl.color);
        if self.format.is_truecolor() {
            PointColor::Rgb(explicit.unwrap_or(Rgb8::WHITE))
        } else {
            PointColor::Indexed(
                explicit
                    .map(|c| self.palette.nearest(c))
                    .unwrap_or(self.palette_index),
            )
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/encoder.rs"]
mod tests;
