use std::path::{Path, PathBuf};

use usvg::tiny_skia_path::PathSegment;

use super::{FrameSource, list_frame_files, push_warning, simplify_all};
use crate::config::CompileConfig;
use crate::foundation::core::{Affine, BezPath, Point2D};
use crate::foundation::error::{LaserError, LaserResult};
use crate::geometry::order::order_polylines;
use crate::geometry::polyline::Frame;
use crate::geometry::sample::sample_path;

/// Geometry of one vector frame.
#[derive(Clone, Debug)]
pub enum VectorFrame {
    /// SVG document read at extraction time.
    SvgFile(PathBuf),
    /// SVG path-data strings (`d` attribute syntax).
    PathData(Vec<String>),
    /// Paths already parsed.
    Paths(Vec<BezPath>),
}

/// Frames made of vector paths.
#[derive(Clone, Debug, Default)]
pub struct VectorSource {
    frames: Vec<VectorFrame>,
}

impl VectorSource {
    /// Source over the given frames.
    pub fn new(frames: Vec<VectorFrame>) -> Self {
        Self { frames }
    }

    /// One frame per `frame_*.svg` (else `*.svg`) file in `dir`, sorted by name.
    pub fn from_dir(dir: &Path) -> LaserResult<Self> {
        let files = list_frame_files(dir, "svg")?;
        if files.is_empty() {
            return Err(LaserError::resource(
                None,
                format!("no svg frames in {}", dir.display()),
            ));
        }
        Ok(Self::new(files.into_iter().map(VectorFrame::SvgFile).collect()))
    }

    /// One frame per list of path-data strings.
    pub fn from_path_data(frames: Vec<Vec<String>>) -> Self {
        Self::new(frames.into_iter().map(VectorFrame::PathData).collect())
    }
}

impl FrameSource for VectorSource {
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

        let paths = match input {
            VectorFrame::Paths(paths) => paths.clone(),
            VectorFrame::SvgFile(path) => load_svg_paths(path, index)?,
            VectorFrame::PathData(data) => {
                let mut paths = Vec::with_capacity(data.len());
                for (i, d) in data.iter().enumerate() {
                    match BezPath::from_svg(d) {
                        Ok(p) => paths.push(p),
                        Err(e) => push_warning(
                            &mut frame,
                            &LaserError::geometry(format!("path {i}: {e}")),
                        ),
                    }
                }
                paths
            }
        };

        for path in &paths {
            let sampled = sample_path(path, cfg.curve_samples);
            for err in &sampled.skipped {
                push_warning(&mut frame, err);
            }
            frame.polylines.extend(sampled.polylines);
        }
        simplify_all(&mut frame.polylines, cfg.simplify_epsilon);
        if cfg.order_polylines {
            frame.polylines = order_polylines(std::mem::take(&mut frame.polylines));
        }
        tracing::debug!(polylines = frame.polylines.len(), "extracted vector frame");
        Ok(frame)
    }
}

/// Every path of an SVG document, in document order, with absolute transforms applied.
pub fn load_svg_paths(path: &Path, frame: usize) -> LaserResult<Vec<BezPath>> {
    let data = std::fs::read(path).map_err(|e| {
        LaserError::resource(Some(frame), format!("read {}: {e}", path.display()))
    })?;
    let tree = usvg::Tree::from_data(&data, &usvg::Options::default()).map_err(|e| {
        LaserError::resource(Some(frame), format!("parse {}: {e}", path.display()))
    })?;
    let mut out = Vec::new();
    collect_group(tree.root(), &mut out);
    Ok(out)
}

fn collect_group(group: &usvg::Group, out: &mut Vec<BezPath>) {
    for node in group.children() {
        match node {
            usvg::Node::Group(g) => collect_group(g, out),
            usvg::Node::Path(p) => out.push(to_bez_path(p)),
            _ => {}
        }
    }
}

fn to_bez_path(path: &usvg::Path) -> BezPath {
    let t = path.abs_transform();
    let affine = Affine::new([
        f64::from(t.sx),
        f64::from(t.ky),
        f64::from(t.kx),
        f64::from(t.sy),
        f64::from(t.tx),
        f64::from(t.ty),
    ]);
    let pt = |p: usvg::tiny_skia_path::Point| Point2D::new(f64::from(p.x), f64::from(p.y));

    let mut bez = BezPath::new();
    for seg in path.data().segments() {
        match seg {
            PathSegment::MoveTo(p) => bez.move_to(pt(p)),
            PathSegment::LineTo(p) => bez.line_to(pt(p)),
            PathSegment::QuadTo(c, p) => bez.quad_to(pt(c), pt(p)),
            PathSegment::CubicTo(c1, c2, p) => bez.curve_to(pt(c1), pt(c2), pt(p)),
            PathSegment::Close => bez.close_path(),
        }
    }
    affine * bez
}

#[cfg(test)]
#[path = "../../tests/unit/source/vector.rs"]
mod tests;
