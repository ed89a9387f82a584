use std::fmt;

/// Result alias used throughout the crate.
pub type LaserResult<T> = Result<T, LaserError>;

/// Pipeline stage reported alongside per-frame failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Geometry extraction (tracing, sampling, simplification).
    Extract,
    /// Sequence-wide normalization.
    Normalize,
    /// Binary frame encoding.
    Encode,
    /// Container file output.
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Extract => "extract",
            Self::Normalize => "normalize",
            Self::Encode => "encode",
            Self::Write => "write",
        };
        f.write_str(s)
    }
}

/// Every failure the compiler can report.
#[derive(thiserror::Error, Debug)]
pub enum LaserError {
    /// Malformed or unsupported container data.
    #[error("format error: {0}")]
    Format(String),

    /// Geometry that cannot be traced, sampled or encoded.
    #[error("geometry error: {0}")]
    Geometry(String),

    /// Missing or unreadable input.
    #[error("resource error: {message}")]
    Resource {
        /// Frame the input belongs to, if known.
        frame: Option<usize>,
        /// What went wrong.
        message: String,
    },

    /// Rejected configuration or input values.
    #[error("validation error: {0}")]
    Validation(String),

    /// A failure tied to one frame and pipeline stage.
    #[error("frame {frame} failed during {stage}: {source}")]
    Frame {
        /// Zero-based frame index.
        frame: usize,
        /// Stage that failed.
        stage: Stage,
        /// Underlying error.
        #[source]
        source: Box<LaserError>,
    },

    /// The cancel callback asked to stop.
    #[error("canceled")]
    Canceled,

    /// Filesystem or stream failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Anything else, with its context chain.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LaserError {
    /// Build a [`LaserError::Format`].
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Build a [`LaserError::Geometry`].
    pub fn geometry(msg: impl Into<String>) -> Self {
        Self::Geometry(msg.into())
    }

    /// Build a [`LaserError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`LaserError::Resource`].
    pub fn resource(frame: Option<usize>, msg: impl Into<String>) -> Self {
        Self::Resource {
            frame,
            message: msg.into(),
        }
    }

    /// Attach the failing frame and stage. Cancellation passes through untouched.
    pub fn in_frame(self, frame: usize, stage: Stage) -> Self {
        match self {
            Self::Canceled => Self::Canceled,
            err @ Self::Frame { .. } => err,
            err => Self::Frame {
                frame,
                stage,
                source: Box::new(err),
            },
        }
    }

    /// Whether this is a cancellation.
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }

    /// Whether this is, or wraps, a resource error.
    pub fn is_resource(&self) -> bool {
        match self {
            Self::Resource { .. } => true,
            Self::Frame { source, .. } => source.is_resource(),
            _ => false,
        }
    }
}

/// Recoverable per-element problem, kept with its frame and surfaced in the compile report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeometryWarning {
    /// Frame the warning belongs to.
    pub frame: usize,
    /// Rendered error text.
    pub message: String,
}

impl GeometryWarning {
    /// Capture `err` as a warning for `frame`.
    pub fn new(frame: usize, err: &LaserError) -> Self {
        Self {
            frame,
            message: err.to_string(),
        }
    }
}

impl fmt::Display for GeometryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame {}: {}", self.frame, self.message)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
