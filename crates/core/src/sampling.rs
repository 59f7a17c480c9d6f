//! Échantillonnage pondéré reproductible

use crate::error::{DogmeError, Result};
use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Configuration de l'échantillonneur
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Seed pour reproductibilité
    pub seed: u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self { seed: 42 }
    }
}

impl SamplerConfig {
    /// Définit le seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Générateur déterministe initialisé avec le seed
    pub fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed)
    }
}

/// Tire un membre proportionnellement à son poids
pub fn weighted_choice<'a, T, R>(members: &'a [T], weights: &[f64], rng: &mut R) -> Result<&'a T>
where
    R: Rng + ?Sized,
{
    if members.len() != weights.len() {
        return Err(DogmeError::LengthMismatch {
            expected: members.len(),
            actual: weights.len(),
        });
    }

    let distribution =
        WeightedIndex::new(weights).map_err(|e| DogmeError::Sampling(e.to_string()))?;
    Ok(&members[distribution.sample(rng)])
}
