//! Deterministic random number generation
//!
//! Every generator is seeded from (master seed, stream id, tick or stage), so a
//! run is fully reproducible from the world seed alone.

use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Identifier for a per-tick RNG stream, one per engine system.
pub type SystemId = u32;

/// Stream id reserved for world generation stages.
pub const WORLDGEN_STREAM: SystemId = 0x5747;

pub struct RngManager {
    master_seed: u64,
    current_tick: u64,
    system_rngs: HashMap<SystemId, ChaCha8Rng>,
}

impl RngManager {
    pub fn new(seed: u64) -> Self {
        Self {
            master_seed: seed,
            current_tick: 0,
            system_rngs: HashMap::new(),
        }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Advance to the next tick; every system stream is reseeded lazily.
    pub fn advance_tick(&mut self) {
        self.current_tick += 1;
        self.system_rngs.clear();
    }

    pub fn current_tick(&self) -> u64 {
        self.current_tick
    }

    /// Get or create the generator for a system within the current tick.
    pub fn system_rng(&mut self, system_id: SystemId) -> &mut ChaCha8Rng {
        let seed = derive_seed(self.master_seed, system_id, 0, self.current_tick);
        self.system_rngs
            .entry(system_id)
            .or_insert_with(|| ChaCha8Rng::seed_from_u64(seed))
    }

    /// A fresh generator for one world generation stage. Independent of the
    /// tick counter so re-running a stage replays the same draws.
    pub fn stage_rng(&self, stage_index: u64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(derive_seed(
            self.master_seed,
            WORLDGEN_STREAM,
            stage_index,
            0,
        ))
    }
}

impl Default for RngManager {
    fn default() -> Self {
        Self::new(42)
    }
}

fn derive_seed(master_seed: u64, system_id: SystemId, stream: u64, tick: u64) -> u64 {
    let mut seed = master_seed;
    seed = seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    seed ^= (system_id as u64).wrapping_mul(1103515245);
    seed = seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    seed ^= stream.wrapping_mul(48271);
    seed = seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    seed ^= tick.wrapping_mul(69069);
    seed
}

/// Draw a seed for a noise field. Perlin seeds are 32-bit.
pub fn noise_seed<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    rng.gen()
}
