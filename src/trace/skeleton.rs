use std::collections::HashSet;

use crate::foundation::core::Point2D;
use crate::geometry::polyline::Polyline;
use crate::trace::mask::BinaryMask;

/// Row-major 8-neighborhood offsets `(dx, dy)`.
const NEIGHBORS8: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

type Pixel = (u32, u32);

/// Walk a one-pixel skeleton into polylines in pixel coordinates.
///
/// Walks start at every endpoint (degree 1) and stop at a junction (degree >= 3), another endpoint,
/// or when no unvisited continuation is left. Edges not consumed by those walks belong to closed
/// loops and are traced until they return to their start. Every undirected pixel-to-pixel edge is
/// consumed at most once.
pub fn trace_skeleton(skel: &BinaryMask) -> Vec<Polyline> {
    let graph = SkeletonGraph::new(skel);
    let pixels: Vec<Pixel> = skel.foreground().collect();
    if pixels.is_empty() {
        return Vec::new();
    }

    let mut visited = HashSet::<(Pixel, Pixel)>::new();
    let mut lines = Vec::<Vec<Pixel>>::new();

    for &ep in pixels.iter().filter(|&&p| graph.degree(p) == 1) {
        for nb in graph.neighbors(ep) {
            if visited.contains(&edge_key(ep, nb)) {
                continue;
            }
            lines.push(walk(&graph, &mut visited, ep, nb, WalkKind::Open));
        }
    }

    for &start in &pixels {
        for nb in graph.neighbors(start) {
            if visited.contains(&edge_key(start, nb)) {
                continue;
            }
            lines.push(walk(&graph, &mut visited, start, nb, WalkKind::Loop));
        }
    }

    lines
        .into_iter()
        .filter_map(|line| {
            Polyline::new(
                line.into_iter()
                    .map(|(x, y)| Point2D::new(f64::from(x), f64::from(y)))
                    .collect(),
            )
        })
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum WalkKind {
    /// Endpoint-rooted: stop at junctions and endpoints.
    Open,
    /// Leftover cycle: stop when back at the start.
    Loop,
}

fn walk(
    graph: &SkeletonGraph<'_>,
    visited: &mut HashSet<(Pixel, Pixel)>,
    start: Pixel,
    first: Pixel,
    kind: WalkKind,
) -> Vec<Pixel> {
    let mut line = vec![start];
    let mut prev = start;
    let mut cur = first;
    visited.insert(edge_key(prev, cur));

    loop {
        line.push(cur);
        match kind {
            WalkKind::Open if graph.degree(cur) != 2 => break,
            WalkKind::Loop if cur == start => break,
            _ => {}
        }

        let next = graph
            .neighbors(cur)
            .find(|&cand| cand != prev && !visited.contains(&edge_key(cur, cand)));
        let Some(next) = next else {
            break;
        };
        visited.insert(edge_key(cur, next));
        prev = cur;
        cur = next;
    }
    line
}

fn edge_key(a: Pixel, b: Pixel) -> (Pixel, Pixel) {
    if (a.1, a.0) <= (b.1, b.0) { (a, b) } else { (b, a) }
}

struct SkeletonGraph<'a> {
    skel: &'a BinaryMask,
}

impl<'a> SkeletonGraph<'a> {
    fn new(skel: &'a BinaryMask) -> Self {
        Self { skel }
    }

    fn neighbors(&self, (x, y): Pixel) -> impl Iterator<Item = Pixel> + '_ {
        let (x, y) = (i64::from(x), i64::from(y));
        NEIGHBORS8.iter().filter_map(move |&(dx, dy)| {
            let (nx, ny) = (x + dx, y + dy);
            self.skel
                .get(nx, ny)
                .then_some((nx as u32, ny as u32))
        })
    }

    fn degree(&self, p: Pixel) -> usize {
        self.neighbors(p).count()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/trace/skeleton.rs"]
mod tests;
