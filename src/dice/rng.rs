//! Random sources for the dice pipeline
//!
//! Live play uses a randomly seeded source; tests and replays use a fixed
//! seed or a scripted face sequence. Same seed + same calls = same faces.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;

/// Seed used when a share phrase is empty
const EMPTY_PHRASE_SEED: u64 = 0xa5a5_a5a5_a5a5_a5a5;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// The single operation the engine needs from randomness
pub trait RandomSource {
    /// Roll one die, returning a face in `1..=sides`
    fn roll_die(&mut self, sides: u32) -> u32;
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn roll_die(&mut self, sides: u32) -> u32 {
        (**self).roll_die(sides)
    }
}

/// ChaCha-backed dice that remember their seed
#[derive(Debug, Clone)]
pub struct SeededDice {
    seed: u64,
    rng: ChaCha8Rng,
}

impl SeededDice {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seed from a human-shareable phrase (FNV-1a hash)
    pub fn from_phrase(phrase: &str) -> Self {
        Self::from_seed(phrase_seed(phrase))
    }

    /// Fresh random seed for live play; still recorded for later replay
    pub fn from_entropy() -> Self {
        Self::from_seed(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Rewind to the start of the seed's sequence
    pub fn restart(&mut self) {
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
    }
}

impl RandomSource for SeededDice {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.rng.gen_range(1..=sides.max(1))
    }
}

/// Hash a phrase into a seed
pub fn phrase_seed(phrase: &str) -> u64 {
    if phrase.is_empty() {
        return EMPTY_PHRASE_SEED;
    }
    phrase.bytes().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ byte as u64).wrapping_mul(FNV_PRIME)
    })
}

/// Replays a recorded sequence of faces (audit replays, tests)
///
/// Faces are clamped into `1..=sides`. Once the script runs out every
/// roll returns 1 and the shortfall is counted.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    faces: VecDeque<u32>,
    shortfall: usize,
}

impl ScriptedDice {
    pub fn new(faces: Vec<u32>) -> Self {
        Self {
            faces: faces.into(),
            shortfall: 0,
        }
    }

    pub fn remaining(&self) -> usize {
        self.faces.len()
    }

    /// Rolls requested after the script was exhausted
    pub fn shortfall(&self) -> usize {
        self.shortfall
    }
}

impl RandomSource for ScriptedDice {
    fn roll_die(&mut self, sides: u32) -> u32 {
        match self.faces.pop_front() {
            Some(face) => face.clamp(1, sides.max(1)),
            None => {
                self.shortfall += 1;
                tracing::warn!("scripted dice exhausted; returning 1 for d{}", sides);
                1
            }
        }
    }
}
