use crate::trace::mask::BinaryMask;

/// Upper bound on full (two sub-pass) iterations.
pub const MAX_THINNING_ITERATIONS: usize = 100;

/// Outcome of a thinning run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ThinningStats {
    /// Full iterations run.
    pub iterations: usize,
    /// Pixels cleared.
    pub removed: usize,
}

/// Zhang–Suen thinning, in place, until a full iteration removes nothing.
///
/// Border pixels are never eroded. Output is a one-pixel-wide skeleton and re-thinning it removes
/// no further pixels.
pub fn thin(mask: &mut BinaryMask) -> ThinningStats {
    let mut stats = ThinningStats::default();
    if mask.width() < 3 || mask.height() < 3 {
        return stats;
    }

    let mut to_clear = Vec::new();
    while stats.iterations < MAX_THINNING_ITERATIONS {
        stats.iterations += 1;
        let mut removed = 0;
        for step in [SubPass::First, SubPass::Second] {
            to_clear.clear();
            for y in 1..mask.height() - 1 {
                for x in 1..mask.width() - 1 {
                    if is_erodible(mask, x, y, step) {
                        to_clear.push((x, y));
                    }
                }
            }
            for &(x, y) in &to_clear {
                mask.set(x, y, false);
            }
            removed += to_clear.len();
        }
        stats.removed += removed;
        if removed == 0 {
            break;
        }
    }
    stats
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SubPass {
    First,
    Second,
}

/// Neighbors P2..P9, clockwise from north.
fn neighborhood(mask: &BinaryMask, x: u32, y: u32) -> [u8; 8] {
    let (x, y) = (i64::from(x), i64::from(y));
    [
        (x, y - 1),
        (x + 1, y - 1),
        (x + 1, y),
        (x + 1, y + 1),
        (x, y + 1),
        (x - 1, y + 1),
        (x - 1, y),
        (x - 1, y - 1),
    ]
    .map(|(nx, ny)| u8::from(mask.get(nx, ny)))
}

fn is_erodible(mask: &BinaryMask, x: u32, y: u32, step: SubPass) -> bool {
    if !mask.get(i64::from(x), i64::from(y)) {
        return false;
    }
    let n = neighborhood(mask, x, y);
    let b: u8 = n.iter().sum();
    if !(2..=6).contains(&b) {
        return false;
    }

    let transitions = (0..8).filter(|&i| n[i] == 0 && n[(i + 1) % 8] == 1).count();
    if transitions != 1 {
        return false;
    }

    let [p2, _, p4, _, p6, _, p8, _] = n;
    match step {
        SubPass::First => p2 * p4 * p6 == 0 && p4 * p6 * p8 == 0,
        SubPass::Second => p2 * p4 * p8 == 0 && p2 * p6 * p8 == 0,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/trace/thinning.rs"]
mod tests;
