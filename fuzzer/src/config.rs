/// Default number of variants produced per seed message.
pub const DEFAULT_ITERATIONS: usize = 1000;

/// Controls how many variants are produced and from which RNG seed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FuzzConfig {
    pub iterations: usize,
    /// Fixed RNG seed for a reproducible sequence; drawn from entropy when `None`.
    pub seed: Option<u64>,
}

impl Default for FuzzConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            seed: None,
        }
    }
}

impl FuzzConfig {
    /// A deterministic configuration.
    #[must_use]
    pub const fn seeded(iterations: usize, seed: u64) -> Self {
        Self {
            iterations,
            seed: Some(seed),
        }
    }
}
