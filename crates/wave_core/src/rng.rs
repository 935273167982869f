//! Seeded random sources for collapse and start-node picks.
//!
//! The solver only ever asks for two things: a unit sample for the weighted
//! walk, and a uniform index into a candidate list. `RngKind` picks which
//! stream a session seed feeds:
//! - `Std`: `rand`'s `StdRng`
//! - `DotNet`: `clr_random::CLRRandom`, bit-for-bit the .NET `System.Random`
//!   sequence, so a seed shared with a .NET host gives the same map

use clr_random::CLRRandom;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_core::SeedableRng as RandCoreSeedableRng;
use serde::{Deserialize, Serialize};

/// Random source used by the solver.
pub trait WaveRng {
    /// Uniform sample in [0, 1).
    fn next_double(&mut self) -> f64;

    /// Uniform index in [0, len). Always 0 for an empty range.
    fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_double() * len as f64) as usize).min(len - 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RngKind {
    #[default]
    Std,
    DotNet,
}

impl RngKind {
    pub fn build(self, seed: i32) -> Box<dyn WaveRng> {
        match self {
            RngKind::Std => Box::new(StdRandom::from_seed(seed)),
            RngKind::DotNet => Box::new(DotNetRandom::from_seed(seed)),
        }
    }
}

#[derive(Clone)]
pub struct StdRandom {
    rng: StdRng,
}

impl StdRandom {
    /// Seeds `StdRng` with the seed's magnitude, so `s` and `-s` agree.
    pub fn from_seed(seed: i32) -> Self {
        Self::from_u64_seed(u64::from(seed.unsigned_abs()))
    }

    pub fn from_u64_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl WaveRng for StdRandom {
    fn next_double(&mut self) -> f64 {
        self.rng.gen()
    }

    fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            0
        } else {
            self.rng.gen_range(0..len)
        }
    }
}

/// `System.Random` compatible stream.
pub struct DotNetRandom {
    rng: CLRRandom,
}

impl DotNetRandom {
    pub fn from_seed(seed: i32) -> Self {
        Self {
            rng: CLRRandom::from_seed(clr_random::Seed::from(seed)),
        }
    }

    /// Same as `Random.Next()`.
    pub fn next_int(&mut self) -> i32 {
        self.rng.next_i32()
    }
}

impl WaveRng for DotNetRandom {
    fn next_double(&mut self) -> f64 {
        self.rng.next_f64()
    }
}
