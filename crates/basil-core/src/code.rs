//! QR code issuing.
//!
//! Codes are five digit numbers that are unique for as long as the
//! generator that issued them lives. Nothing is persisted: a new process
//! (or a [`CodeGenerator::reset`]) starts from an empty set.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

pub const CODE_MIN: u32 = 10_000;
pub const CODE_MAX: u32 = 99_999;
/// Number of distinct codes a single generator can issue.
pub const CODE_SPACE: usize = (CODE_MAX - CODE_MIN + 1) as usize;

pub struct CodeGenerator<R = StdRng> {
    issued: HashSet<String>,
    rng: R,
}

impl CodeGenerator<StdRng> {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Default for CodeGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> CodeGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            issued: HashSet::new(),
            rng,
        }
    }

    /// Draw a code uniformly from `CODE_MIN..=CODE_MAX` that this generator
    /// has not issued before, and record it as issued.
    ///
    /// Once all `CODE_SPACE` values are issued this never returns; check
    /// [`is_exhausted`](Self::is_exhausted) first if that can happen.
    pub fn generate(&mut self) -> String {
        loop {
            let code = self.rng.gen_range(CODE_MIN..=CODE_MAX).to_string();
            if self.issued.insert(code.clone()) {
                return code;
            }
        }
    }

    pub fn contains(&self, code: &str) -> bool {
        self.issued.contains(code)
    }

    pub fn issued(&self) -> usize {
        self.issued.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.issued.len() >= CODE_SPACE
    }

    /// Forget every issued code.
    pub fn reset(&mut self) {
        self.issued.clear();
    }
}
