//! Small seedable PRNG so that a seed fully determines generation output.
//!
//! Not cryptographically strong and not statistically rigorous — the state
//! space it drives is tiny (≤ 20 words, ≤ 10 candidates each). The only hard
//! requirement is reproducibility: the same seed must produce the same
//! sequence on every platform, so we avoid `std`'s hash-based sources and
//! floating-point transcendentals entirely.

/// PCG-style generator (XSH-RR output function over an LCG state).
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    /// Create a generator from an explicit seed.
    pub fn new(seed: u64) -> Self {
        // Offset so that seed 0 doesn't start from the all-zero state.
        Self { state: seed.wrapping_add(1) }
    }

    /// Advance the LCG and return 32 bits of output.
    pub fn next_u32(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let xorshifted = (((self.state >> 18) ^ self.state) >> 27) as u32;
        let rot = (self.state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    /// Uniform float in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / (f64::from(u32::MAX) + 1.0)
    }

    /// Uniform index in `[0, bound)`. `bound` must be non-zero.
    pub fn next_usize(&mut self, bound: usize) -> usize {
        self.next_u32() as usize % bound
    }

    /// In-place Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_usize(i + 1);
            slice.swap(i, j);
        }
    }
}

/// Draw a seed from the OS when the caller didn't pin one.
pub fn random_seed() -> u64 {
    let mut bytes = [0u8; 8];
    if getrandom::getrandom(&mut bytes).is_err() {
        // Fallback: a process-local counter still yields distinct seeds.
        static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);
        return COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
    }
    u64::from_le_bytes(bytes)
}
