//! Raster edge masks to polylines: thinning to a one-pixel skeleton, then a graph walk over its
//! 8-connectivity.

/// Binary pixel masks.
pub mod mask;
/// Skeleton walking into pixel chains.
pub mod skeleton;
/// Zhang-Suen thinning.
pub mod thinning;

use crate::geometry::polyline::Polyline;
use mask::BinaryMask;

/// Thin `mask` in place and trace the resulting skeleton.
#[tracing::instrument(level = "debug", skip(mask), fields(w = mask.width(), h = mask.height()))]
pub fn trace_mask(mask: &mut BinaryMask) -> Vec<Polyline> {
    let stats = thinning::thin(mask);
    tracing::debug!(
        iterations = stats.iterations,
        removed = stats.removed,
        "thinning finished"
    );
    skeleton::trace_skeleton(mask)
}
