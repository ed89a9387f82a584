//! Source-space polyline geometry: the frame model and the per-frame reductions applied to it.

/// Outer-frame and noise filters.
pub mod filter;
/// Greedy nearest-neighbour ordering.
pub mod order;
/// Polyline and frame model.
pub mod polyline;
/// Bezier path flattening.
pub mod sample;
/// Ramer-Douglas-Peucker simplification.
pub mod simplify;
