//! Fonctions mathématiques

use std::collections::BTreeMap;
use std::ops::Mul;

/// Configuration pour le calcul d'entropie
#[derive(Debug, Clone, Copy)]
pub struct EntropyConfig {
    /// Base du logarithme (e pour nats, 2.0 pour bits)
    pub log_base: f64,
}

impl Default for EntropyConfig {
    fn default() -> Self {
        Self {
            log_base: std::f64::consts::E,
        }
    }
}

impl EntropyConfig {
    /// Entropie exprimée en bits
    pub fn bits() -> Self {
        Self { log_base: 2.0 }
    }

    /// Convertit une entropie en nats vers la base configurée
    pub fn scale(&self, nats: f64) -> f64 {
        if (self.log_base - std::f64::consts::E).abs() < f64::EPSILON {
            nats
        } else {
            nats / self.log_base.ln()
        }
    }
}

/// Remet à l'échelle des valeurs pour que leur somme vaille `total`
pub fn rescale(values: &[f64], total: f64) -> Result<Vec<f64>, String> {
    let input_total: f64 = values.iter().sum();
    if input_total == 0.0 {
        return Err("Somme nulle: impossible de remettre à l'échelle".to_string());
    }

    Ok(values.iter().map(|v| v / input_total * total).collect())
}

/// Variante de [`rescale`] pour un dictionnaire
pub fn rescale_map<K: Ord + Clone>(
    values: &BTreeMap<K, f64>,
    total: f64,
) -> Result<BTreeMap<K, f64>, String> {
    let weights: Vec<f64> = values.values().copied().collect();
    let rescaled = rescale(&weights, total)?;
    Ok(values.keys().cloned().zip(rescaled).collect())
}

/// Compte les occurrences de chaque élément unique
pub fn frequency_dictionary<T, I>(items: I) -> BTreeMap<T, usize>
where
    T: Ord,
    I: IntoIterator<Item = T>,
{
    let mut counts = BTreeMap::new();
    for item in items {
        *counts.entry(item).or_insert(0) += 1;
    }
    counts
}

/// Produit des éléments, `one` pour une séquence vide
pub fn product<T, I>(items: I, one: T) -> T
where
    T: Mul<Output = T>,
    I: IntoIterator<Item = T>,
{
    items.into_iter().fold(one, |acc, x| acc * x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rescale_uniform() {
        let d = [1.0, 1.0, 1.0, 1.0];
        let r = rescale(&d, 1.0).unwrap();
        assert_eq!(r.len(), d.len());
        assert!((r.iter().sum::<f64>() - 1.0).abs() < 1e-12);

        let r = rescale(&d, 17.0).unwrap();
        let max = r.iter().cloned().fold(f64::MIN, f64::max);
        let min = r.iter().cloned().fold(f64::MAX, f64::min);
        assert_eq!(min, max);

        assert_eq!(rescale(&d, 4.0).unwrap(), d.to_vec());
    }

    #[test]
    fn test_rescale_with_zero() {
        let d = [1.0, 21.0, 0.0, 5.0];
        let r = rescale(&d, 2.0).unwrap();
        assert!((r.iter().sum::<f64>() - 2.0).abs() < 1e-12);
        assert_eq!(r[2], 0.0);
        assert_eq!(rescale(&d, 27.0).unwrap(), d.to_vec());
    }

    #[test]
    fn test_rescale_zero_total() {
        assert!(rescale(&[0.0, 0.0], 1.0).is_err());
        assert!(rescale(&[], 1.0).is_err());
    }

    #[test]
    fn test_rescale_map() {
        let d: BTreeMap<char, f64> = [('a', 2.0)].into_iter().collect();
        assert_eq!(rescale_map(&d, 1.0).unwrap()[&'a'], 1.0);
        assert_eq!(rescale_map(&d, 2.0).unwrap(), d);

        let d: BTreeMap<char, f64> = "abcd".chars().zip([1.0, 1.0, 1.0, 1.0]).collect();
        let r = rescale_map(&d, 2.0).unwrap();
        assert!((r.values().sum::<f64>() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_frequency_dictionary() {
        let counts = frequency_dictionary("aaabbc".chars());
        assert_eq!(counts[&'a'], 3);
        assert_eq!(counts[&'b'], 2);
        assert_eq!(counts[&'c'], 1);

        let counts = frequency_dictionary(["aaa", "bbb", "aaa", "bbb", "aaa", "ccc"]);
        assert_eq!(counts.get("aaa"), Some(&3));
        assert_eq!(counts.get("ccc"), Some(&1));
    }

    #[test]
    fn test_product() {
        assert_eq!(product(vec![2u64, 3, 7], 1), 42);
        assert_eq!(product(Vec::<u64>::new(), 1), 1);
    }

    #[test]
    fn test_entropy_config_scale() {
        let nats = std::f64::consts::LN_2;
        assert!((EntropyConfig::bits().scale(nats) - 1.0).abs() < 1e-12);
        assert_eq!(EntropyConfig::default().scale(nats), nats);
    }

    proptest! {
        #[test]
        fn prop_rescale_reproduces_total(
            values in proptest::collection::vec(0.0f64..1000.0, 1..16),
            total in 0.1f64..100.0,
        ) {
            prop_assume!(values.iter().sum::<f64>() > 0.0);
            let r = rescale(&values, total).unwrap();
            prop_assert!((r.iter().sum::<f64>() - total).abs() < 1e-9 * total.max(1.0));
        }

        #[test]
        fn prop_rescale_idempotent(
            values in proptest::collection::vec(0.0f64..1000.0, 1..16),
            total in 0.1f64..100.0,
        ) {
            prop_assume!(values.iter().sum::<f64>() > 0.0);
            let once = rescale(&values, total).unwrap();
            let twice = rescale(&once, total).unwrap();
            for (a, b) in once.iter().zip(&twice) {
                prop_assert!((a - b).abs() < 1e-9 * total.max(1.0));
            }
        }
    }
}
