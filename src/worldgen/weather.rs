use rand::Rng;

use crate::noise_field::{NoiseConfig, NoiseField};
use crate::rng::noise_seed;
use crate::spatial::TileGrid;

/// Slow-drifting cloud layer. Purely a visual overlay.
pub const CLOUD_NOISE: NoiseConfig = NoiseConfig::new(3, 0.06).with_changeability(0.002);

pub fn cloud_field<R: Rng + ?Sized>(rng: &mut R) -> NoiseField {
    NoiseField::new(noise_seed(rng), CLOUD_NOISE)
}

/// Recomputes cloud cover for the given world time, mapped into `[0, 1]`.
pub fn update_clouds(grid: &mut TileGrid, field: &NoiseField, seconds: f64) {
    for tile in grid.tiles_mut() {
        let pos = tile.pos();
        let value = field.sample_at_time(pos.col as f64, pos.row as f64, seconds);
        tile.cloud_cover = ((value + 1.0) / 2.0).clamp(0.0, 1.0);
    }
}
