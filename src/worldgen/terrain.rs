use rand::Rng;

use crate::noise_field::{NoiseConfig, NoiseField};
use crate::rng::noise_seed;
use crate::spatial::TileGrid;

pub const MIN_ELEVATION: f64 = 1700.0;
pub const MAX_ELEVATION: f64 = 2500.0;

const HILL_NOISE: NoiseConfig = NoiseConfig::new(5, 0.035);
const VALLEY_NOISE: NoiseConfig = NoiseConfig::new(3, 0.02);
const OFFSET_NOISE: NoiseConfig = NoiseConfig::new(2, 0.08);

/// Exponent applied to the valley field; below 1 narrows the valley floors.
const VALLEY_WIDTH: f64 = 0.6;
/// Share of the hill field in the final mix.
const HILL_MIX: f64 = 0.6;
/// Maximum coordinate displacement from the offset fields, in tiles.
const OFFSET_STRENGTH: f64 = 3.0;

/// Fills every tile with a raw elevation in roughly `[-1, 1]`.
pub fn generate_elevation<R: Rng + ?Sized>(grid: &mut TileGrid, rng: &mut R) {
    let hills = NoiseField::new(noise_seed(rng), HILL_NOISE);
    let valleys = NoiseField::new(noise_seed(rng), VALLEY_NOISE);
    let offset_row = NoiseField::new(noise_seed(rng), OFFSET_NOISE);
    let offset_col = NoiseField::new(noise_seed(rng), OFFSET_NOISE);

    for tile in grid.tiles_mut() {
        let pos = tile.pos();
        let (x, y) = (pos.col as f64, pos.row as f64);
        let wx = x + OFFSET_STRENGTH * offset_col.sample_2d(x, y);
        let wy = y + OFFSET_STRENGTH * offset_row.sample_2d(x, y);

        let hill = hills.sample_2d(wx, wy);
        let valley = 2.0 * valleys.sample_2d(wx, wy).abs().powf(VALLEY_WIDTH) - 1.0;
        tile.elevation = HILL_MIX * hill + (1.0 - HILL_MIX) * valley;
    }
}

/// Maps the grid's elevation extremes onto `[MIN_ELEVATION, MAX_ELEVATION]`.
/// A perfectly flat grid lands on the lower bound.
pub fn normalize_elevation(grid: &mut TileGrid) {
    let (min, max) = grid.tiles().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), t| {
        (lo.min(t.elevation), hi.max(t.elevation))
    });
    let span = max - min;
    for tile in grid.tiles_mut() {
        tile.elevation = if span > f64::EPSILON {
            MIN_ELEVATION + (tile.elevation - min) / span * (MAX_ELEVATION - MIN_ELEVATION)
        } else {
            MIN_ELEVATION
        };
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn normalized_range_is_exact() {
        let mut grid = TileGrid::new(30, 30);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        generate_elevation(&mut grid, &mut rng);
        normalize_elevation(&mut grid);
        let min = grid.tiles().map(|t| t.elevation).fold(f64::INFINITY, f64::min);
        let max = grid
            .tiles()
            .map(|t| t.elevation)
            .fold(f64::NEG_INFINITY, f64::max);
        assert!((min - MIN_ELEVATION).abs() < 1e-9);
        assert!((max - MAX_ELEVATION).abs() < 1e-9);
    }

    #[test]
    fn flat_grid_normalizes_to_floor() {
        let mut grid = TileGrid::new(4, 4);
        normalize_elevation(&mut grid);
        assert!(grid.tiles().all(|t| t.elevation == MIN_ELEVATION));
    }

    #[test]
    fn same_seed_same_terrain() {
        let mut a = TileGrid::new(16, 16);
        let mut b = TileGrid::new(16, 16);
        generate_elevation(&mut a, &mut ChaCha8Rng::seed_from_u64(12));
        generate_elevation(&mut b, &mut ChaCha8Rng::seed_from_u64(12));
        let ea: Vec<f64> = a.tiles().map(|t| t.elevation).collect();
        let eb: Vec<f64> = b.tiles().map(|t| t.elevation).collect();
        assert_eq!(ea, eb);
    }
}
