//! Laserline compiles line-art frame sequences into laser projector container files.
//!
//! Frames come from vector paths, traced raster edge masks or colored mask layers. A
//! [`CompileSession`] extracts every frame, fixes one normalization for the whole sequence,
//! budgets and encodes each frame, and writes the container in frame order:
//!
//! - Pick a [`FrameSource`] ([`VectorSource`], [`RasterSource`], [`LayeredSource`])
//! - Configure a [`CompileConfig`] (or a named profile)
//! - [`CompileSession::export`] to a file, or [`CompileSession::compile`] in memory
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Sequence normalization, point budgets, color sampling and frame encoding.
pub mod compile;
/// Compile configuration and profiles.
pub mod config;
/// Binary container codec and preview rasterizer.
pub mod container;
/// Source-space polylines and per-frame geometry passes.
pub mod geometry;
/// Compile sessions.
pub mod session;
/// Frame sources.
pub mod source;
/// Raster skeleton tracing.
pub mod trace;

pub use crate::foundation::core::{
    Affine, BezPath, DEVICE_MAX, DEVICE_MIN, Point, Point2D, Rect, Rgb8,
};
pub use crate::foundation::error::{GeometryWarning, LaserError, LaserResult, Stage};

pub use crate::compile::normalize::{FitAxis, Normalization};
pub use crate::config::{CompileConfig, CompileOpts, MissingFramePolicy};
pub use crate::container::palette::Palette;
pub use crate::container::preview::render_preview;
pub use crate::container::reader::{FrameReader, read_container};
pub use crate::container::writer::write_container;
pub use crate::container::{Container, ContainerFormat, ContainerFrame, DevicePoint, PointColor};
pub use crate::geometry::polyline::{Frame, Polyline};
pub use crate::session::{CompileReport, CompileSession, CompiledSequence};
pub use crate::source::{FrameSource, LayeredSource, RasterSource, VectorSource};
