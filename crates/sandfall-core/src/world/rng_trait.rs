//! RNG trait abstraction for the tick engine
//!
//! The engine never owns a random source. Callers pass one per tick:
//! - `rand::thread_rng()` for interactive runs
//! - a seeded `Xoshiro256StarStar` for reproducible runs
//! - [`FixedRng`] to pin every draw to one value in tests

/// Random number generator trait for the tick engine
pub trait WorldRng {
    /// Generate random f32 in [0.0, 1.0)
    fn gen_f32(&mut self) -> f32;

    /// Coin flip: true when one draw lands strictly above one half
    fn gen_bool(&mut self) -> bool {
        self.gen_f32() > 0.5
    }
}

// Covers ThreadRng and every seedable rng from rand_xoshiro
impl<T: ?Sized + rand::Rng> WorldRng for T {
    fn gen_f32(&mut self) -> f32 {
        rand::Rng::r#gen(self)
    }
}

/// Returns the same draw every time
///
/// `FixedRng(0.99)` releases every falling cell and sends liquids right when
/// both sides are open; `FixedRng(0.0)` keeps falling cells from sliding and
/// sends liquids left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedRng(pub f32);

impl WorldRng for FixedRng {
    fn gen_f32(&mut self) -> f32 {
        self.0
    }
}

/// Seeded rng for reproducible runs
#[cfg(feature = "seeded")]
pub fn seeded(seed: u64) -> rand_xoshiro::Xoshiro256StarStar {
    use rand::SeedableRng;
    rand_xoshiro::Xoshiro256StarStar::seed_from_u64(seed)
}
