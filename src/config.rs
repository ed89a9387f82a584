//! Compile configuration, named profiles and JSON loading.

use std::path::Path;

use crate::compile::budget::BudgetConfig;
use crate::compile::color::{ColorSampleConfig, MAX_HALF_WIDTH};
use crate::compile::normalize::FitAxis;
use crate::container::ContainerFormat;
use crate::foundation::error::{LaserError, LaserResult};

/// What to do when a frame's input file is missing.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MissingFramePolicy {
    /// Abort the whole compile; a gap would break timing against the source video.
    #[default]
    Fail,
    /// Substitute an empty frame and record a warning.
    Empty,
}

/// Every knob of a compile. Missing JSON fields take their defaults.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    /// Extent that maps onto the device span.
    pub fit_axis: FitAxis,
    /// Share of the device range the drawing may occupy, in (0, 1].
    pub fill_ratio: f64,
    /// Flip y for y-down sources.
    pub invert_y: bool,

    /// Samples per curved path segment.
    pub curve_samples: usize,
    /// Simplification tolerance in source units. Zero disables simplification.
    pub simplify_epsilon: f64,
    /// Traced chains with fewer points are dropped before simplification.
    pub min_polyline_points: usize,
    /// Polylines smaller than this share of the sequence bounds on both axes are dropped.
    pub min_rel_size: f64,
    /// Drop polylines tracing a border around the whole picture.
    pub remove_outer_frame: bool,
    /// Reorder polylines to shorten blank travel.
    pub order_polylines: bool,
    /// Luma strictly above this is foreground.
    pub mask_threshold: u8,

    /// Point budget.
    pub budget: BudgetConfig,
    /// Stroke color sampling.
    pub color: ColorSampleConfig,

    /// Output container format.
    pub format: ContainerFormat,
    /// Palette index for polylines without a color in indexed formats.
    pub palette_index: u8,
    /// Company tag written to every header.
    pub company: String,
    /// Prefix of generated frame names.
    pub frame_name_prefix: String,
    /// Projector number written to every header.
    pub projector: u8,
    /// What to do when a frame's input is missing.
    pub missing_frame: MissingFramePolicy,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            fit_axis: FitAxis::Max,
            fill_ratio: 0.95,
            invert_y: true,
            curve_samples: 64,
            simplify_epsilon: 1.2,
            min_polyline_points: 2,
            min_rel_size: 0.0,
            remove_outer_frame: false,
            order_polylines: true,
            mask_threshold: 127,
            budget: BudgetConfig::default(),
            color: ColorSampleConfig::default(),
            format: ContainerFormat::Truecolor2d,
            palette_index: 7,
            company: "LASERLN".to_owned(),
            frame_name_prefix: "F".to_owned(),
            projector: 0,
            missing_frame: MissingFramePolicy::Fail,
        }
    }
}

impl CompileConfig {
    /// Names accepted by [`CompileConfig::profile`].
    pub const PROFILES: [&'static str; 3] = ["classic", "arcade", "la_linea"];

    /// Named preset. Unknown names fall back to `classic`.
    pub fn profile(name: &str) -> Self {
        let classic = Self {
            min_rel_size: 0.01,
            remove_outer_frame: true,
            format: ContainerFormat::Indexed3d,
            palette_index: 7,
            ..Self::default()
        };
        match name.trim().to_ascii_lowercase().as_str() {
            "arcade" => Self {
                min_polyline_points: 30,
                color: ColorSampleConfig {
                    enabled: true,
                    ..ColorSampleConfig::default()
                },
                format: ContainerFormat::Truecolor2d,
                ..classic
            },
            "la_linea" => Self {
                palette_index: 1,
                ..classic
            },
            "classic" => classic,
            other => {
                tracing::warn!(profile = other, "unknown profile, using classic");
                classic
            }
        }
    }

    /// Load from a JSON file and validate.
    pub fn from_path(path: &Path) -> LaserResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| LaserError::resource(None, format!("read {}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    /// Parse and validate a JSON config.
    pub fn from_json(text: &str) -> LaserResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| LaserError::validation(format!("config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> LaserResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| LaserError::validation(format!("config json: {e}")))
    }

    /// Reject out-of-range values.
    pub fn validate(&self) -> LaserResult<()> {
        if !(self.fill_ratio > 0.0 && self.fill_ratio <= 1.0) {
            return Err(LaserError::validation(format!(
                "fill_ratio must be in (0, 1], got {}",
                self.fill_ratio
            )));
        }
        if self.curve_samples == 0 {
            return Err(LaserError::validation("curve_samples must be >= 1"));
        }
        if !(self.simplify_epsilon >= 0.0 && self.simplify_epsilon.is_finite()) {
            return Err(LaserError::validation(format!(
                "simplify_epsilon must be finite and >= 0, got {}",
                self.simplify_epsilon
            )));
        }
        if !(0.0..1.0).contains(&self.min_rel_size) {
            return Err(LaserError::validation(format!(
                "min_rel_size must be in [0, 1), got {}",
                self.min_rel_size
            )));
        }
        let b = &self.budget;
        if !(b.fps > 0.0 && b.fps.is_finite()) {
            return Err(LaserError::validation(format!(
                "fps must be finite and > 0, got {}",
                b.fps
            )));
        }
        if b.kpps == 0 {
            return Err(LaserError::validation("kpps must be > 0"));
        }
        if !(b.ppf_ratio > 0.0 && b.ppf_ratio <= 1.0) {
            return Err(LaserError::validation(format!(
                "ppf_ratio must be in (0, 1], got {}",
                b.ppf_ratio
            )));
        }
        if let Some(n) = b.max_points_override
            && !(1..=u32::from(u16::MAX)).contains(&n)
        {
            return Err(LaserError::validation(format!(
                "max_points_override must be in 1..={}, got {n}",
                u16::MAX
            )));
        }
        if self.color.stride == 0 {
            return Err(LaserError::validation("color.stride must be >= 1"));
        }
        if self.color.half_width > MAX_HALF_WIDTH {
            return Err(LaserError::validation(format!(
                "color.half_width must be <= {MAX_HALF_WIDTH}, got {}",
                self.color.half_width
            )));
        }
        if !self.company.is_ascii() || !self.frame_name_prefix.is_ascii() {
            return Err(LaserError::validation(
                "company and frame_name_prefix must be ASCII",
            ));
        }
        Ok(())
    }
}

/// Runtime execution options; never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompileOpts {
    /// Extract and encode frames on a dedicated rayon pool.
    pub parallel: bool,
    /// Worker threads when `parallel`; `None` uses rayon defaults.
    pub threads: Option<usize>,
    /// Bounded channel capacity between encoders and the file writer.
    pub channel_capacity: usize,
    /// Frames dispatched to the pool at once during export. Zero is treated as one.
    pub chunk_size: usize,
}

impl Default for CompileOpts {
    fn default() -> Self {
        Self {
            parallel: false,
            threads: None,
            channel_capacity: 4,
            chunk_size: 64,
        }
    }
}

impl CompileOpts {
    /// Reject a zero thread count.
    pub fn validate(&self) -> LaserResult<()> {
        if self.threads == Some(0) {
            return Err(LaserError::validation("threads must be >= 1 when set"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
