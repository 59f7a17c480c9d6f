//! Nucléotides: compositions pondérées sur {A, C, G, T}
//!
//! Une lettre majuscule désigne un mélange équimolaire de ses bases, une
//! minuscule un mélange déséquilibré (`y` = C et T en proportions inégales).

use crate::constants::{
    base_index, iupac_letter, iupac_mask, DEFAULT_NUCLEOTIDE_LABEL, DEGENERATE_NUCLEOTIDES,
    STANDARD_NUCLEOTIDES,
};
use crate::error::{DogmeError, Result};
use crate::sampling::weighted_choice;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};
use rand::Rng;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Nucléotide éventuellement dégénéré
#[derive(Debug, Clone, PartialEq)]
pub struct Nucleotide {
    label: char,
    /// Poids exacts de A, C, G, T
    exact: [BigRational; 4],
    /// Vue flottante de `exact`
    weights: [f64; 4],
}

impl Nucleotide {
    /// Crée un nucléotide depuis une lettre IUPAC
    pub fn from_letter(letter: char) -> Result<Self> {
        let mask = iupac_mask(letter).ok_or(DogmeError::InvalidBase(letter))?;
        let exact = std::array::from_fn(|i| {
            if mask & (1 << i) != 0 {
                BigRational::one()
            } else {
                BigRational::zero()
            }
        });
        Self::from_exact_weights(exact)
    }

    /// Crée un nucléotide depuis les poids de A, C, G, T
    ///
    /// Chaque poids est lu par son écriture décimale la plus courte:
    /// `0.1` vaut exactement `1/10`.
    pub fn from_weights(weights: [f64; 4]) -> Result<Self> {
        check_weights(&weights)?;
        Self::from_exact_weights(weights.map(exact))
    }

    /// Crée un nucléotide depuis des poids rationnels exacts
    pub fn from_exact_weights(exact: [BigRational; 4]) -> Result<Self> {
        let label = exact_composition_to_letter(&exact)?;
        let weights = std::array::from_fn(|i| exact[i].to_f64().unwrap_or(0.0));
        Ok(Self {
            label,
            exact,
            weights,
        })
    }

    /// Crée un nucléotide depuis des couples (base, poids)
    ///
    /// Les bases absentes ont un poids nul; une base répétée cumule ses poids.
    pub fn from_composition<I>(composition: I) -> Result<Self>
    where
        I: IntoIterator<Item = (char, f64)>,
    {
        let mut weights: [BigRational; 4] = std::array::from_fn(|_| BigRational::zero());
        for (base, weight) in composition {
            let i = base_index(base).ok_or(DogmeError::InvalidBase(base))?;
            check_weights(&[weight])?;
            weights[i] += exact(weight);
        }
        Self::from_exact_weights(weights)
    }

    /// Lettre IUPAC (minuscule si non équimolaire)
    pub fn label(&self) -> char {
        self.label
    }

    pub fn weights(&self) -> &[f64; 4] {
        &self.weights
    }

    pub fn exact_weights(&self) -> &[BigRational; 4] {
        &self.exact
    }

    /// Poids d'une base standard (0 pour une lettre inconnue)
    pub fn weight(&self, base: char) -> f64 {
        base_index(base).map(|i| self.weights[i]).unwrap_or(0.0)
    }

    /// Composition complète, bases de poids nul incluses
    pub fn composition(&self) -> BTreeMap<char, f64> {
        STANDARD_NUCLEOTIDES
            .iter()
            .copied()
            .zip(self.weights)
            .collect()
    }

    /// Bases de poids non nul, triées
    pub fn members(&self) -> String {
        self.exact_nonzero().map(|(b, _)| b).collect()
    }

    /// Poids alignés sur [`Nucleotide::members`]
    pub fn proportions(&self) -> Vec<f64> {
        STANDARD_NUCLEOTIDES
            .iter()
            .zip(&self.exact)
            .zip(self.weights)
            .filter(|((_, value), _)| !value.is_zero())
            .map(|(_, w)| w)
            .collect()
    }

    /// Bases de poids non nul et leurs poids exacts
    pub(crate) fn exact_nonzero(&self) -> impl Iterator<Item = (char, &BigRational)> + '_ {
        STANDARD_NUCLEOTIDES
            .into_iter()
            .zip(&self.exact)
            .filter(|(_, w)| !w.is_zero())
    }

    /// Masque IUPAC des bases présentes
    pub fn mask(&self) -> u8 {
        exact_mask(&self.exact)
    }

    /// Plusieurs bases de poids non nul
    pub fn is_degenerate(&self) -> bool {
        self.exact_nonzero().count() > 1
    }

    /// Toutes les bases présentes ont le même poids
    pub fn is_equimolar(&self) -> bool {
        is_equimolar(&self.exact)
    }

    /// Nucléotide complémentaire (A <-> T, C <-> G)
    pub fn complement(&self) -> Self {
        let [a, c, g, t] = self.exact.clone();
        let exact = [t, g, c, a];
        let [wa, wc, wg, wt] = self.weights;
        Self {
            label: exact_composition_to_letter(&exact).unwrap_or(DEFAULT_NUCLEOTIDE_LABEL),
            exact,
            weights: [wt, wg, wc, wa],
        }
    }

    /// Copie dont les poids somment à `total`
    pub fn rescaled(&self, total: f64) -> Result<Self> {
        check_weights(&[total])?;
        let sum: BigRational = self.exact.iter().sum();
        if sum.is_zero() {
            return Err(DogmeError::ZeroComposition);
        }
        let factor = exact(total) / sum;
        Self::from_exact_weights(self.exact.clone().map(|w| w * &factor))
    }

    /// Tire une base selon la composition
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<char> {
        let members: Vec<char> = self.members().chars().collect();
        weighted_choice(&members, &self.proportions(), rng).copied()
    }

    /// Tire `k` bases indépendamment, avec remise
    pub fn samples<R: Rng + ?Sized>(&self, k: usize, rng: &mut R) -> Result<Vec<char>> {
        (0..k).map(|_| self.sample(rng)).collect()
    }
}

impl FromStr for Nucleotide {
    type Err = DogmeError;

    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(letter), None) => Self::from_letter(letter),
            _ => Err(DogmeError::Validation(format!(
                "un nucléotide s'écrit avec une seule lettre: {:?}",
                s
            ))),
        }
    }
}

impl fmt::Display for Nucleotide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Valeur rationnelle exacte de l'écriture décimale la plus courte d'un flottant
///
/// `0.1` devient `1/10`, de sorte que `0.1 + 0.2` et `0.3` donnent la même clé.
/// Les valeurs non finies valent zéro.
pub(crate) fn exact(weight: f64) -> BigRational {
    let text = format!("{:e}", weight);
    let Some((mantissa, exponent)) = text.split_once('e') else {
        return BigRational::zero();
    };
    let (integer, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let (Ok(digits), Ok(exponent)) = (
        format!("{}{}", integer, fraction).parse::<BigInt>(),
        exponent.parse::<i32>(),
    ) else {
        return BigRational::from_float(weight).unwrap_or_else(BigRational::zero);
    };

    let exponent = exponent - fraction.len() as i32;
    let scale = BigInt::from(10u32).pow(exponent.unsigned_abs());
    if exponent >= 0 {
        BigRational::from_integer(digits * scale)
    } else {
        BigRational::new(digits, scale)
    }
}

fn check_weights(weights: &[f64]) -> Result<()> {
    match weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        Some(w) => Err(DogmeError::Validation(format!("poids invalide: {}", w))),
        None => Ok(()),
    }
}

fn exact_mask(weights: &[BigRational; 4]) -> u8 {
    weights
        .iter()
        .enumerate()
        .filter(|(_, w)| !w.is_zero())
        .fold(0u8, |acc, (i, _)| acc | (1 << i))
}

fn is_equimolar(weights: &[BigRational; 4]) -> bool {
    let mut nonzero = weights.iter().filter(|w| !w.is_zero());
    match nonzero.next() {
        Some(first) => nonzero.all(|w| w == first),
        None => false,
    }
}

/// Lettre IUPAC de poids exacts (minuscule si non équimolaire)
pub fn exact_composition_to_letter(weights: &[BigRational; 4]) -> Result<char> {
    if let Some(w) = weights.iter().find(|w| w.is_negative()) {
        return Err(DogmeError::Validation(format!("poids invalide: {}", w)));
    }
    if weights.iter().all(Zero::is_zero) {
        return Err(DogmeError::ZeroComposition);
    }

    let letter = iupac_letter(exact_mask(weights)).unwrap_or(DEFAULT_NUCLEOTIDE_LABEL);
    if is_equimolar(weights) {
        Ok(letter)
    } else {
        Ok(letter.to_ascii_lowercase())
    }
}

/// Lettre IUPAC d'une composition (minuscule si non équimolaire)
pub fn composition_to_letter(weights: &[f64; 4]) -> Result<char> {
    check_weights(weights)?;
    exact_composition_to_letter(&weights.map(exact))
}

/// Combine des nucléotides en sommant leurs compositions pondérées
///
/// Sans proportions, chaque nucléotide pèse 1. La composition obtenue
/// est remise à l'échelle pour sommer à 1, en arithmétique exacte.
pub fn combine_nucleotides(nucleotides: &[&Nucleotide], proportions: Option<&[f64]>) -> Result<Nucleotide> {
    let ones = vec![1.0; nucleotides.len()];
    let proportions = proportions.unwrap_or(&ones);
    if proportions.len() != nucleotides.len() {
        return Err(DogmeError::LengthMismatch {
            expected: nucleotides.len(),
            actual: proportions.len(),
        });
    }
    check_weights(proportions)
        .map_err(|_| DogmeError::Validation("proportions négatives ou non finies".to_string()))?;

    let mut weights: [BigRational; 4] = std::array::from_fn(|_| BigRational::zero());
    for (nucleotide, p) in nucleotides.iter().zip(proportions) {
        let p = exact(*p);
        for (total, w) in weights.iter_mut().zip(&nucleotide.exact) {
            *total += w * &p;
        }
    }

    let sum: BigRational = weights.iter().sum();
    if sum.is_zero() {
        return Err(DogmeError::ZeroComposition);
    }
    Nucleotide::from_exact_weights(weights.map(|w| w / &sum))
}

/// Chaîne composée uniquement de lettres IUPAC (U accepté)
pub fn is_valid_nucleotide_string(s: &str) -> bool {
    s.chars().all(|c| {
        let c = c.to_ascii_uppercase();
        c == 'U' || DEGENERATE_NUCLEOTIDES.contains(c)
    })
}

/// Chaîne composée uniquement de A, C, G, T (ou U)
pub fn is_nondegenerate_nucleotide_string(s: &str) -> bool {
    s.chars().all(|c| base_index(c).is_some())
}

/// Chaîne IUPAC valide contenant au moins une lettre dégénérée
pub fn is_degenerate_nucleotide_string(s: &str) -> bool {
    is_valid_nucleotide_string(s) && !is_nondegenerate_nucleotide_string(s)
}
