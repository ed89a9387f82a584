use crate::geometry::polyline::Polyline;

/// Greedy nearest-neighbor chaining to shorten blank travel between strokes.
///
/// The first polyline is kept as-is. Each following pick is the remaining polyline with an endpoint
/// closest (squared distance) to the current chain end; it is reversed when its end was the nearer
/// endpoint. Ties keep the earliest candidate in input order, start before end.
pub fn order_polylines(polylines: Vec<Polyline>) -> Vec<Polyline> {
    if polylines.len() < 2 {
        return polylines;
    }

    let mut remaining: Vec<Option<Polyline>> = polylines.into_iter().map(Some).collect();
    let mut ordered = Vec::with_capacity(remaining.len());
    let Some(first) = remaining[0].take() else {
        return ordered;
    };
    let mut cursor = first.last();
    ordered.push(first);

    for _ in 1..remaining.len() {
        let mut best: Option<(usize, bool, f64)> = None;
        for (i, slot) in remaining.iter().enumerate() {
            let Some(pl) = slot else {
                continue;
            };
            let d_start = (pl.first() - cursor).hypot2();
            let d_end = (pl.last() - cursor).hypot2();
            if best.is_none_or(|(_, _, d)| d_start < d) {
                best = Some((i, false, d_start));
            }
            if best.is_none_or(|(_, _, d)| d_end < d) {
                best = Some((i, true, d_end));
            }
        }

        let Some((i, reverse, _)) = best else {
            break;
        };
        let Some(mut next) = remaining[i].take() else {
            break;
        };
        if reverse {
            next.reverse();
        }
        cursor = next.last();
        ordered.push(next);
    }

    ordered
}

/// Summed blank-move distance of a stroke order, in source units.
pub fn blank_travel(polylines: &[Polyline]) -> f64 {
    polylines
        .windows(2)
        .map(|w| (w[1].first() - w[0].last()).hypot())
        .sum()
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/order.rs"]
mod tests;
