//! Frame producers. Each source turns one frame index into source-space polylines; everything
//! downstream is source-agnostic.

/// Multi-layer mask frames.
pub mod layers;
/// Edge-mask raster frames.
pub mod raster;
/// SVG and path-data frames.
pub mod vector;

use std::path::{Path, PathBuf};

use crate::config::CompileConfig;
use crate::foundation::error::{GeometryWarning, LaserError, LaserResult};
use crate::geometry::polyline::{Frame, Polyline};
use crate::geometry::simplify::simplify_polyline;

pub use layers::LayeredSource;
pub use raster::RasterSource;
pub use vector::VectorSource;

/// Produces the geometry of one frame at a time. Frames may be extracted concurrently.
pub trait FrameSource: Send + Sync {
    /// Number of frames in the sequence.
    fn frame_count(&self) -> usize;

    /// Container name for a frame, when the source carries one.
    fn frame_name(&self, _index: usize) -> Option<String> {
        None
    }

    /// Extract frame `index`, simplified and with stroke colors resolved.
    fn extract(&self, index: usize, cfg: &CompileConfig) -> LaserResult<Frame>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn frame_count(&self) -> usize {
        (**self).frame_count()
    }

    fn frame_name(&self, index: usize) -> Option<String> {
        (**self).frame_name(index)
    }

    fn extract(&self, index: usize, cfg: &CompileConfig) -> LaserResult<Frame> {
        (**self).extract(index, cfg)
    }
}

/// Simplify every polyline and drop the ones that collapse below two points.
pub(crate) fn simplify_all(polylines: &mut Vec<Polyline>, epsilon: f64) {
    for pl in polylines.iter_mut() {
        simplify_polyline(pl, epsilon);
    }
    polylines.retain(|pl| pl.len() >= 2);
}

pub(crate) fn push_warning(frame: &mut Frame, err: &LaserError) {
    tracing::warn!(frame = frame.index, error = %err, "skipped element");
    frame.warnings.push(GeometryWarning::new(frame.index, err));
}

/// Sorted files in `dir` named `frame_*.<ext>`, or every `*.<ext>` when none match.
pub fn list_frame_files(dir: &Path, ext: &str) -> LaserResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| LaserError::resource(None, format!("read dir {}: {e}", dir.display())))?;
    let mut all = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let matches_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(ext));
        if matches_ext && path.is_file() {
            all.push(path);
        }
    }
    all.sort();
    let framed: Vec<PathBuf> = all
        .iter()
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("frame_"))
        })
        .cloned()
        .collect();
    Ok(if framed.is_empty() { all } else { framed })
}

#[cfg(test)]
#[path = "../../tests/unit/source/files.rs"]
mod tests;
