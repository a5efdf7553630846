//! Random sources for the non-deterministic layouts.
//!
//! Layout functions take `&mut dyn RngCore` so callers decide between reproducible output
//! (seeded [`XorShift64Star`]) and engine-default randomness ([`rand::thread_rng`]).

use rand::{RngCore, SeedableRng};

/// Small, fast, seedable generator. Same shift/multiply constants as the classic
/// xorshift64* so seeded layouts are stable across platforms and releases.
#[derive(Debug, Clone)]
pub struct XorShift64Star {
    state: u64,
}

impl XorShift64Star {
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn step(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D_u64)
    }

}

impl RngCore for XorShift64Star {
    fn next_u32(&mut self) -> u32 {
        (self.step() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.step()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for XorShift64Star {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new(state)
    }
}

/// Seeded generator when `seed` is set, thread-local entropy otherwise.
pub(crate) fn source(seed: Option<u64>) -> Box<dyn RngCore> {
    match seed {
        Some(seed) => Box::new(XorShift64Star::seed_from_u64(seed)),
        None => Box::new(rand::thread_rng()),
    }
}
