use crate::spatial::TileGrid;

/// Water every tile starts with before relaxation.
pub const INITIAL_WATER: f64 = 2.0;
pub const RELAXATION_PASSES: usize = 64;
/// How far a tile looks for standing water when deriving saturation.
pub const SATURATION_RADIUS: usize = 4;

/// Seeds every tile with [`INITIAL_WATER`] and lets it run downhill.
///
/// Each pass visits tiles in row-major order; a tile hands half the level
/// difference to its lowest direct neighbor, never more than it holds.
pub fn relax_water(grid: &mut TileGrid) {
    for tile in grid.tiles_mut() {
        tile.water = INITIAL_WATER;
    }

    let positions: Vec<_> = grid.positions().collect();
    for _ in 0..RELAXATION_PASSES {
        for &pos in &positions {
            let (level, water) = match grid.get(pos) {
                Some(tile) => (tile.level(), tile.water),
                None => continue,
            };
            if water <= 0.0 {
                continue;
            }

            let mut lowest = None;
            for neighbor in grid.neighbors4(pos) {
                if let Some(tile) = grid.get(neighbor) {
                    let better = match lowest {
                        Some((_, best)) => tile.level() < best,
                        None => true,
                    };
                    if better {
                        lowest = Some((neighbor, tile.level()));
                    }
                }
            }

            let Some((target, target_level)) = lowest else {
                continue;
            };
            if target_level >= level {
                continue;
            }
            let transfer = ((level - target_level) / 2.0).min(water);
            if let Some(tile) = grid.get_mut(pos) {
                tile.water = (tile.water - transfer).max(0.0);
            }
            if let Some(tile) = grid.get_mut(target) {
                tile.water += transfer;
            }
        }
    }
}

/// Derives saturation from the current water layout.
///
/// For every distance `d` up to [`SATURATION_RADIUS`], the share of wet tiles
/// on the ring at `d` is weighted by `(R + 1 - d) / (R + 1)`; the weighted sum
/// is normalized by the total weight so the result sits in `[0, 1]`.
pub fn compute_saturation(grid: &mut TileGrid) {
    let radius = SATURATION_RADIUS;
    let values: Vec<_> = grid
        .positions()
        .map(|pos| {
            let mut total = 0.0;
            let mut weights = 0.0;
            for d in 0..=radius {
                let ring = grid.ring(pos, d);
                if ring.is_empty() {
                    continue;
                }
                let wet = ring
                    .iter()
                    .filter(|p| grid.get(**p).is_some_and(|t| t.has_water()))
                    .count();
                let weight = (radius + 1 - d) as f64 / (radius + 1) as f64;
                total += weight * wet as f64 / ring.len() as f64;
                weights += weight;
            }
            let saturation = if weights > 0.0 { total / weights } else { 0.0 };
            (pos, saturation.clamp(0.0, 1.0))
        })
        .collect();

    for (pos, saturation) in values {
        if let Some(tile) = grid.get_mut(pos) {
            tile.saturation = saturation;
        }
    }
}
