use std::path::{Path, PathBuf};

use super::raster::{load_luma, trace_layer};
use super::FrameSource;
use crate::config::CompileConfig;
use crate::foundation::core::Rgb8;
use crate::foundation::error::{LaserError, LaserResult};
use crate::geometry::order::order_polylines;
use crate::geometry::polyline::Frame;

/// JSON description of a layered sequence.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerManifest {
    /// Frames in sequence order.
    pub frames: Vec<LayerFrame>,
}

/// One frame of a layer manifest.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerFrame {
    /// Container name for the frame.
    #[serde(default)]
    pub name: Option<String>,
    /// Masks drawn in order.
    #[serde(default)]
    pub layers: Vec<Layer>,
}

/// One binary mask whose traced strokes all take `rgb`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Layer {
    /// Mask image, relative to the manifest directory.
    pub mask: PathBuf,
    /// Color of every stroke traced from the mask.
    pub rgb: Rgb8,
}

/// Frames assembled from several colored mask layers each.
#[derive(Clone, Debug)]
pub struct LayeredSource {
    manifest: LayerManifest,
    /// Directory that relative mask paths resolve against.
    root: PathBuf,
}

impl LayeredSource {
    /// Source over `manifest`, resolving mask paths against `root`.
    pub fn new(manifest: LayerManifest, root: impl Into<PathBuf>) -> Self {
        Self {
            manifest,
            root: root.into(),
        }
    }

    /// Read a JSON manifest; mask paths are relative to the manifest's directory.
    pub fn from_manifest(path: &Path) -> LaserResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| LaserError::resource(None, format!("read {}: {e}", path.display())))?;
        let manifest: LayerManifest = serde_json::from_str(&text)
            .map_err(|e| LaserError::validation(format!("manifest {}: {e}", path.display())))?;
        let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(Self::new(manifest, root))
    }

    /// Parsed manifest.
    pub fn manifest(&self) -> &LayerManifest {
        &self.manifest
    }
}

impl FrameSource for LayeredSource {
    fn frame_count(&self) -> usize {
        self.manifest.frames.len()
    }

    fn frame_name(&self, index: usize) -> Option<String> {
        self.manifest.frames.get(index)?.name.clone()
    }

    #[tracing::instrument(level = "debug", skip(self, cfg))]
    fn extract(&self, index: usize, cfg: &CompileConfig) -> LaserResult<Frame> {
        let entry = self
            .manifest
            .frames
            .get(index)
            .ok_or_else(|| LaserError::validation(format!("frame {index} out of range")))?;
        let mut frame = Frame::new(index);
        frame.name = entry.name.clone();

        for layer in &entry.layers {
            let gray = load_luma(&self.root.join(&layer.mask), index)?;
            let traced = trace_layer(&gray, None, cfg);
            frame
                .polylines
                .extend(traced.into_iter().map(|pl| pl.with_color(layer.rgb)));
        }
        if cfg.order_polylines {
            frame.polylines = order_polylines(std::mem::take(&mut frame.polylines));
        }
        tracing::debug!(polylines = frame.polylines.len(), "extracted layered frame");
        Ok(frame)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/source/layers.rs"]
mod tests;
