use std::path::{Path, PathBuf};

use image::{GrayImage, RgbImage};

use super::{FrameSource, list_frame_files, simplify_all};
use crate::compile::color::sample_polyline_color;
use crate::config::CompileConfig;
use crate::foundation::error::{LaserError, LaserResult};
use crate::geometry::filter::retain_min_points;
use crate::geometry::order::order_polylines;
use crate::geometry::polyline::{Frame, Polyline};
use crate::trace::mask::BinaryMask;
use crate::trace::trace_mask;

/// Input for one raster frame.
#[derive(Clone, Debug)]
pub enum RasterFrame {
    /// Edge-mask image on disk, with an optional separate image to sample colors from. The mask
    /// itself is sampled when no color image is given.
    File {
        /// Edge-mask image.
        mask: PathBuf,
        /// Image sampled for stroke colors.
        color: Option<PathBuf>,
    },
    /// Images already in memory.
    Image {
        /// Edge mask.
        mask: GrayImage,
        /// Image sampled for stroke colors.
        color: Option<RgbImage>,
    },
}

/// Frames traced from binary edge masks.
#[derive(Clone, Debug, Default)]
pub struct RasterSource {
    frames: Vec<RasterFrame>,
}

impl RasterSource {
    /// Source over the given frames.
    pub fn new(frames: Vec<RasterFrame>) -> Self {
        Self { frames }
    }

    /// One frame per `frame_*.png` (else `*.png`) file in `dir`, sorted by name.
    pub fn from_dir(dir: &Path) -> LaserResult<Self> {
        let files = list_frame_files(dir, "png")?;
        if files.is_empty() {
            return Err(LaserError::resource(
                None,
                format!("no png frames in {}", dir.display()),
            ));
        }
        Ok(Self::from_files(files))
    }

    /// One frame per mask file, each sampled for its own colors.
    pub fn from_files(files: Vec<PathBuf>) -> Self {
        Self::new(
            files
                .into_iter()
                .map(|mask| RasterFrame::File { mask, color: None })
                .collect(),
        )
    }
}

impl FrameSource for RasterSource {
    fn frame_count(&self) -> usize {
        self.frames.len()
    }

    #[tracing::instrument(level = "debug", skip(self, cfg))]
    fn extract(&self, index: usize, cfg: &CompileConfig) -> LaserResult<Frame> {
        let input = self
            .frames
            .get(index)
            .ok_or_else(|| LaserError::validation(format!("frame {index} out of range")))?;
        let mut frame = Frame::new(index);
        frame.polylines = match input {
            RasterFrame::Image { mask, color } => {
                let sample_from = match color {
                    _ if !cfg.color.enabled => None,
                    Some(img) => Some(img.clone()),
                    None => Some(image::DynamicImage::ImageLuma8(mask.clone()).into_rgb8()),
                };
                trace_layer(mask, sample_from.as_ref(), cfg)
            }
            RasterFrame::File { mask, color } => {
                let gray = load_luma(mask, index)?;
                let sample_from = if cfg.color.enabled {
                    Some(load_rgb(color.as_deref().unwrap_or(mask), index)?)
                } else {
                    None
                };
                trace_layer(&gray, sample_from.as_ref(), cfg)
            }
        };
        if cfg.order_polylines {
            frame.polylines = order_polylines(std::mem::take(&mut frame.polylines));
        }
        tracing::debug!(polylines = frame.polylines.len(), "extracted raster frame");
        Ok(frame)
    }
}

/// Threshold, thin, trace, length-filter and simplify one mask, then sample stroke colors from
/// `color` when given.
pub(crate) fn trace_layer(
    gray: &GrayImage,
    color: Option<&RgbImage>,
    cfg: &CompileConfig,
) -> Vec<Polyline> {
    let mut mask = BinaryMask::from_luma(gray, cfg.mask_threshold);
    let mut polylines = trace_mask(&mut mask);
    retain_min_points(&mut polylines, cfg.min_polyline_points.max(2));
    simplify_all(&mut polylines, cfg.simplify_epsilon);
    if let Some(img) = color {
        for pl in &mut polylines {
            pl.color = Some(sample_polyline_color(pl, Some(img), &cfg.color));
        }
    }
    polylines
}

pub(crate) fn load_luma(path: &Path, frame: usize) -> LaserResult<GrayImage> {
    Ok(open_image(path, frame)?.into_luma8())
}

pub(crate) fn load_rgb(path: &Path, frame: usize) -> LaserResult<RgbImage> {
    Ok(open_image(path, frame)?.into_rgb8())
}

fn open_image(path: &Path, frame: usize) -> LaserResult<image::DynamicImage> {
    image::open(path)
        .map_err(|e| LaserError::resource(Some(frame), format!("{}: {e}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/source/raster.rs"]
mod tests;
