const MULTIPLIER: u64 = 1_664_525;
const INCREMENT: u64 = 1_013_904_223;
const MODULUS: u64 = 1 << 32;

/// Linear congruential generator driving every random choice of a draft.
///
/// One instance belongs to one run. Two generators built from the same seed
/// yield the same stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Seeds the generator. The seed is reduced modulo 2^32, so negative
    /// seeds are valid.
    pub fn new(seed: i64) -> Self {
        SeededRng {
            state: seed.rem_euclid(MODULUS as i64) as u32,
        }
    }

    /// Seeds the generator from system entropy. Runs are not reproducible.
    pub fn from_entropy() -> Self {
        SeededRng {
            state: rand::random::<u32>(),
        }
    }

    pub fn from_seed(seed: Option<i64>) -> Self {
        match seed {
            Some(seed) => SeededRng::new(seed),
            None => SeededRng::from_entropy(),
        }
    }

    /// Advances the state and returns a value in `[0, 1)`.
    pub fn next(&mut self) -> f64 {
        let next = (self.state as u64 * MULTIPLIER + INCREMENT) % MODULUS;
        self.state = next as u32;
        next as f64 / MODULUS as f64
    }

    pub fn state(&self) -> u32 {
        self.state
    }
}
