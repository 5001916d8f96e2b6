//! Random string adapters backed by `rand`.

use std::sync::Mutex;

use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom, thread_rng};

use externals_core::{application::ports::RandomStringGenerator, domain::CharacterSet};

/// Production generator using the thread-local CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngGenerator;

impl ThreadRngGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl RandomStringGenerator for ThreadRngGenerator {
    fn random_string(&self, length: usize, charset: CharacterSet) -> String {
        draw(&mut thread_rng(), length, charset)
    }
}

/// Deterministic generator for reproducible runs (`--seed`).
#[derive(Debug)]
pub struct SeededGenerator {
    rng: Mutex<StdRng>,
}

impl SeededGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomStringGenerator for SeededGenerator {
    fn random_string(&self, length: usize, charset: CharacterSet) -> String {
        // A poisoned lock only means another draw panicked; the RNG is intact.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        draw(&mut *rng, length, charset)
    }
}

fn draw<R: Rng + ?Sized>(rng: &mut R, length: usize, charset: CharacterSet) -> String {
    let alphabet = charset.alphabet();
    if alphabet.is_empty() {
        return String::new();
    }

    (0..length)
        .filter_map(|_| alphabet.choose(rng).copied())
        .collect()
}
