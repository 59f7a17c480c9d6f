//! Codons: compositions pondérées sur les 64 codons standards
//!
//! Un codon construit depuis trois nucléotides garde ses bases et son
//! étiquette IUPAC. Un codon construit depuis une composition brute n'a pas
//! de bases et porte l'étiquette `NNN`: il ne peut pas être recombiné base
//! par base.

use crate::constants::{
    iupac_letter, iupac_mask, iupac_members, is_standard_codon, DEFAULT_CODON_LABEL,
};
use crate::error::{DogmeError, Result};
use crate::genetic_code::GeneticCode;
use crate::nucleotide::{combine_nucleotides, exact, Nucleotide};
use crate::sampling::weighted_choice;
use dogme_utils::{codon_strings, frequency_dictionary, normalize_nucleotide_string};
use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};
use rand::Rng;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Codon éventuellement dégénéré, lié à un code génétique
#[derive(Debug, Clone, PartialEq)]
pub struct Codon {
    bases: Option<[Nucleotide; 3]>,
    label: String,
    /// Poids exacts des codons standards
    exact: BTreeMap<String, BigRational>,
    /// Vue flottante de `exact`
    composition: BTreeMap<String, f64>,
    genetic_code: Arc<GeneticCode>,
}

impl Codon {
    /// Produit cartésien des bases de trois nucléotides
    pub fn from_nucleotides(bases: [Nucleotide; 3], genetic_code: Arc<GeneticCode>) -> Self {
        let mut exact = BTreeMap::new();
        let [first, second, third] = &bases;

        for (b1, w1) in first.exact_nonzero() {
            for (b2, w2) in second.exact_nonzero() {
                for (b3, w3) in third.exact_nonzero() {
                    exact.insert(format!("{}{}{}", b1, b2, b3), w1 * w2 * w3);
                }
            }
        }

        let label = bases.iter().map(Nucleotide::label).collect();
        Self::from_parts(Some(bases), label, exact, genetic_code)
    }

    fn from_parts(
        bases: Option<[Nucleotide; 3]>,
        label: String,
        exact: BTreeMap<String, BigRational>,
        genetic_code: Arc<GeneticCode>,
    ) -> Self {
        let composition = exact
            .iter()
            .map(|(codon, weight)| (codon.clone(), weight.to_f64().unwrap_or(0.0)))
            .collect();
        Self {
            bases,
            label,
            exact,
            composition,
            genetic_code,
        }
    }

    /// Codon depuis trois lettres IUPAC (`"NNK"`, `"aug"`, ...)
    pub fn parse(s: &str, genetic_code: Arc<GeneticCode>) -> Result<Self> {
        let letters: Vec<char> = s.chars().collect();
        let [a, b, c] = letters.as_slice() else {
            return Err(DogmeError::InvalidCodon(s.to_string()));
        };
        let bases = [
            Nucleotide::from_letter(*a)?,
            Nucleotide::from_letter(*b)?,
            Nucleotide::from_letter(*c)?,
        ];
        Ok(Self::from_nucleotides(bases, genetic_code))
    }

    /// Codon depuis une composition brute codon -> poids
    ///
    /// Les clés sont normalisées (majuscules, U -> T) et doivent être des
    /// codons standards. Chaque poids est lu par son écriture décimale la
    /// plus courte. Les entrées de poids nul sont ignorées.
    pub fn from_composition<S: AsRef<str>>(
        composition: &BTreeMap<S, f64>,
        genetic_code: Arc<GeneticCode>,
    ) -> Result<Self> {
        let mut exact_weights = BTreeMap::new();
        for (codon, weight) in composition {
            if !weight.is_finite() {
                return Err(DogmeError::Validation(format!(
                    "poids invalide pour {}: {}",
                    codon.as_ref(),
                    weight
                )));
            }
            exact_weights.insert(codon.as_ref().to_string(), exact(*weight));
        }
        Self::from_exact_composition(exact_weights, genetic_code)
    }

    /// Codon depuis une composition exacte codon -> poids
    pub fn from_exact_composition(
        composition: BTreeMap<String, BigRational>,
        genetic_code: Arc<GeneticCode>,
    ) -> Result<Self> {
        let mut normalized: BTreeMap<String, BigRational> = BTreeMap::new();
        for (codon, weight) in composition {
            let key = normalize_nucleotide_string(&codon);
            if !is_standard_codon(&key) {
                return Err(DogmeError::InvalidCodon(codon));
            }
            if weight.is_negative() {
                return Err(DogmeError::Validation(format!(
                    "poids invalide pour {}: {}",
                    key, weight
                )));
            }
            *normalized.entry(key).or_insert_with(BigRational::zero) += weight;
        }
        normalized.retain(|_, weight| !weight.is_zero());
        if normalized.is_empty() {
            return Err(DogmeError::ZeroComposition);
        }

        Ok(Self::from_parts(
            None,
            DEFAULT_CODON_LABEL.to_string(),
            normalized,
            genetic_code,
        ))
    }

    /// Codon depuis une liste de codons standards, chaque occurrence comptant 1
    pub fn from_codon_strings<S: AsRef<str>>(
        codons: &[S],
        genetic_code: Arc<GeneticCode>,
    ) -> Result<Self> {
        let counts = frequency_dictionary(codons.iter().map(|c| c.as_ref().to_string()));
        let composition: BTreeMap<String, f64> = counts
            .into_iter()
            .map(|(codon, count)| (codon, count as f64))
            .collect();
        Self::from_composition(&composition, genetic_code)
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Nucléotides constitutifs, absents pour une composition brute
    pub fn bases(&self) -> Option<&[Nucleotide; 3]> {
        self.bases.as_ref()
    }

    pub fn composition(&self) -> &BTreeMap<String, f64> {
        &self.composition
    }

    pub fn exact_composition(&self) -> &BTreeMap<String, BigRational> {
        &self.exact
    }

    /// Codons standards de poids non nul, triés
    pub fn members(&self) -> Vec<&str> {
        self.composition.keys().map(String::as_str).collect()
    }

    /// Poids alignés sur [`Codon::members`]
    pub fn proportions(&self) -> Vec<f64> {
        self.composition.values().copied().collect()
    }

    pub fn genetic_code(&self) -> &Arc<GeneticCode> {
        &self.genetic_code
    }

    /// Accès mutable au code génétique
    ///
    /// Un code partagé est d'abord copié: les autres objets liés à l'ancien
    /// code ne voient pas la modification.
    pub fn genetic_code_mut(&mut self) -> &mut GeneticCode {
        Arc::make_mut(&mut self.genetic_code)
    }

    /// Même composition sous un autre code génétique
    pub fn with_genetic_code(mut self, genetic_code: Arc<GeneticCode>) -> Self {
        self.genetic_code = genetic_code;
        self
    }

    pub fn is_degenerate(&self) -> bool {
        self.composition.len() > 1
    }

    pub fn is_equimolar(&self) -> bool {
        let mut weights = self.exact.values();
        match weights.next() {
            Some(first) => weights.all(|w| w == first),
            None => true,
        }
    }

    /// Composition en acides aminés: somme des poids par acide aminé codé
    pub fn translate(&self) -> BTreeMap<char, f64> {
        self.translate_exact()
            .into_iter()
            .map(|(aa, weight)| (aa, weight.to_f64().unwrap_or(0.0)))
            .collect()
    }

    /// Comme [`Codon::translate`], en arithmétique rationnelle exacte
    pub fn translate_exact(&self) -> BTreeMap<char, BigRational> {
        let mut amino_acids: BTreeMap<char, BigRational> = BTreeMap::new();
        for (codon, weight) in &self.exact {
            *amino_acids
                .entry(self.genetic_code.lookup(codon))
                .or_insert_with(BigRational::zero) += weight;
        }
        amino_acids
    }

    /// Comme [`Codon::translate`], avec des poids entiers (tronqués)
    pub fn translate_counts(&self) -> BTreeMap<char, u64> {
        self.translate_exact()
            .into_iter()
            .map(|(aa, weight)| (aa, weight.trunc().to_integer().to_u64().unwrap_or(0)))
            .collect()
    }

    /// Tire un codon standard selon la composition
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<String> {
        let members = self.members();
        let weights = self.proportions();
        weighted_choice(&members, &weights, rng).map(|codon| codon.to_string())
    }

    /// Tire `k` codons indépendamment, avec remise
    pub fn samples<R: Rng + ?Sized>(&self, k: usize, rng: &mut R) -> Result<Vec<String>> {
        (0..k).map(|_| self.sample(rng)).collect()
    }
}

impl fmt::Display for Codon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Mélange (OU) de plusieurs codons
///
/// Chaque composition est multipliée par sa proportion (1 par défaut) puis
/// les poids des codons communs sont additionnés. Le code génétique est celui
/// du premier codon.
pub fn combine_codons(codons: &[&Codon], proportions: Option<&[f64]>) -> Result<Codon> {
    let first = codons
        .first()
        .ok_or_else(|| DogmeError::Validation("aucun codon à combiner".to_string()))?;

    let ones = vec![1.0; codons.len()];
    let proportions = proportions.unwrap_or(&ones);
    if proportions.len() != codons.len() {
        return Err(DogmeError::LengthMismatch {
            expected: codons.len(),
            actual: proportions.len(),
        });
    }

    if let Some(p) = proportions.iter().find(|p| !p.is_finite() || **p < 0.0) {
        return Err(DogmeError::Validation(format!("proportion invalide: {}", p)));
    }

    let mut composition: BTreeMap<String, BigRational> = BTreeMap::new();
    for (codon, p) in codons.iter().zip(proportions) {
        let p = exact(*p);
        for (member, weight) in &codon.exact {
            *composition
                .entry(member.clone())
                .or_insert_with(BigRational::zero) += weight * &p;
        }
    }

    Codon::from_exact_composition(composition, first.genetic_code.clone())
}

/// Mélange base par base (ET) de deux codons décomposables
pub fn merge_codons(first: &Codon, second: &Codon, proportions: Option<[f64; 2]>) -> Result<Codon> {
    let (Some(left), Some(right)) = (&first.bases, &second.bases) else {
        return Err(DogmeError::MissingBases);
    };
    let proportions = proportions.unwrap_or([1.0, 1.0]);

    let [b1, b2, b3] =
        [0, 1, 2].map(|i| combine_nucleotides(&[&left[i], &right[i]], Some(&proportions[..])));
    Ok(Codon::from_nucleotides([b1?, b2?, b3?], first.genetic_code.clone()))
}

/// Codons standards représentés par un codon IUPAC (`"NNK"` -> 32 codons)
pub fn degenerate_codon_string_to_standard_members(codon: &str) -> Result<Vec<String>> {
    let letters: Vec<char> = codon.chars().collect();
    if letters.len() != 3 {
        return Err(DogmeError::InvalidCodon(codon.to_string()));
    }

    let mut members = vec![String::new()];
    for letter in letters {
        let bases = iupac_members(letter).ok_or(DogmeError::InvalidBase(letter))?;
        members = members
            .iter()
            .flat_map(|prefix| bases.chars().map(move |b| format!("{}{}", prefix, b)))
            .collect();
    }
    Ok(members)
}

/// Union position par position de deux étiquettes IUPAC (`NNK` + `NNS` = `NNB`)
pub fn combine_codon_labels(first: &str, second: &str) -> Result<String> {
    let (left, right): (Vec<char>, Vec<char>) = (first.chars().collect(), second.chars().collect());
    if left.len() != 3 {
        return Err(DogmeError::InvalidCodon(first.to_string()));
    }
    if right.len() != 3 {
        return Err(DogmeError::InvalidCodon(second.to_string()));
    }

    left.iter()
        .zip(&right)
        .map(|(a, b)| {
            let mask_a = iupac_mask(*a).ok_or(DogmeError::InvalidBase(*a))?;
            let mask_b = iupac_mask(*b).ok_or(DogmeError::InvalidBase(*b))?;
            iupac_letter(mask_a | mask_b).ok_or(DogmeError::InvalidBase(*a))
        })
        .collect()
}

/// Découpe une chaîne IUPAC en codons (les bases restantes sont ignorées)
pub fn nucleotide_string_to_codons(s: &str, genetic_code: Arc<GeneticCode>) -> Result<Vec<Codon>> {
    codon_strings(s)
        .iter()
        .map(|triplet| Codon::parse(triplet, genetic_code.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genetic_code::default_genetic_code;
    use crate::sampling::SamplerConfig;
    use num_traits::ToPrimitive;

    fn codon(s: &str) -> Codon {
        Codon::parse(s, default_genetic_code()).unwrap()
    }

    #[test]
    fn test_parse() {
        let c = codon("NNK");
        assert_eq!(c.label(), "NNK");
        assert_eq!(c.members().len(), 32);
        assert!(c.bases().is_some());
        assert!(c.is_degenerate());
        assert!(c.is_equimolar());

        let atg = codon("aug");
        assert_eq!(atg.label(), "ATG");
        assert_eq!(atg.members(), vec!["ATG"]);
        assert!(!atg.is_degenerate());

        assert!(matches!(
            Codon::parse("NN", default_genetic_code()),
            Err(DogmeError::InvalidCodon(_))
        ));
        assert_eq!(
            Codon::parse("NNZ", default_genetic_code()),
            Err(DogmeError::InvalidBase('Z'))
        );
    }

    #[test]
    fn test_nnk_translation_histogram() {
        let counts = codon("NNK").translate_counts();
        assert_eq!(counts.len(), 21);
        assert_eq!(counts.values().sum::<u64>(), 32);

        let histogram = frequency_dictionary(counts.values().copied());
        let expected: BTreeMap<u64, usize> = [(1, 13), (2, 5), (3, 3)].into_iter().collect();
        assert_eq!(histogram, expected);
    }

    #[test]
    fn test_nnk_translation_histogram_supe() {
        let c = Codon::parse("NNK", Arc::new(GeneticCode::supe())).unwrap();
        let counts = c.translate_counts();
        assert_eq!(counts.len(), 20);
        assert_eq!(counts[&'Q'], 2);

        let histogram = frequency_dictionary(counts.values().copied());
        let expected: BTreeMap<u64, usize> = [(1, 11), (2, 6), (3, 3)].into_iter().collect();
        assert_eq!(histogram, expected);
    }

    #[test]
    fn test_translate_representations() {
        let c = codon("NNK");
        let floats = c.translate();
        let exact = c.translate_exact();
        assert_eq!(floats[&'L'], 3.0);
        assert_eq!(exact[&'L'].to_f64(), Some(3.0));
        assert_eq!(exact[&'*'].to_f64(), Some(1.0));
    }

    #[test]
    fn test_skewed_nucleotides() {
        let skewed = Nucleotide::from_weights([1.0, 3.0, 0.0, 0.0]).unwrap();
        let a = Nucleotide::from_letter('A').unwrap();
        let c = Codon::from_nucleotides([a.clone(), a, skewed], default_genetic_code());
        assert_eq!(c.label(), "AAm");
        assert_eq!(c.composition()["AAA"], 1.0);
        assert_eq!(c.composition()["AAC"], 3.0);
        assert!(!c.is_equimolar());
        assert_eq!(c.translate()[&'K'], 1.0);
        assert_eq!(c.translate()[&'N'], 3.0);
    }

    #[test]
    fn test_from_composition() {
        let composition: BTreeMap<&str, f64> =
            [("aaa", 1.0), ("AAG", 2.0), ("CCC", 0.0)].into_iter().collect();
        let c = Codon::from_composition(&composition, default_genetic_code()).unwrap();
        assert_eq!(c.label(), DEFAULT_CODON_LABEL);
        assert!(c.bases().is_none());
        assert_eq!(c.members(), vec!["AAA", "AAG"]);
        assert_eq!(c.translate()[&'K'], 3.0);

        let bad: BTreeMap<&str, f64> = [("NNK", 1.0)].into_iter().collect();
        assert!(matches!(
            Codon::from_composition(&bad, default_genetic_code()),
            Err(DogmeError::InvalidCodon(_))
        ));
        let empty: BTreeMap<&str, f64> = [("AAA", 0.0)].into_iter().collect();
        assert_eq!(
            Codon::from_composition(&empty, default_genetic_code()),
            Err(DogmeError::ZeroComposition)
        );
    }

    #[test]
    fn test_decimal_weights_stay_exact() {
        // AAA + AAG (K) = 0.1 + 0.2, AAC (N) = 0.3
        let a = Nucleotide::from_letter('A').unwrap();
        let third = Nucleotide::from_weights([0.1, 0.3, 0.2, 0.0]).unwrap();
        let c = Codon::from_nucleotides([a.clone(), a, third], default_genetic_code());

        let amino_acids = c.translate_exact();
        assert_eq!(amino_acids[&'K'], amino_acids[&'N']);
        assert_eq!(amino_acids[&'K'], BigRational::new(3.into(), 10.into()));

        let composition: BTreeMap<&str, f64> =
            [("AAA", 0.1), ("AAG", 0.2), ("AAC", 0.3)].into_iter().collect();
        let raw = Codon::from_composition(&composition, default_genetic_code()).unwrap();
        assert_eq!(raw.translate_exact(), amino_acids);
    }

    #[test]
    fn test_from_codon_strings() {
        let c = Codon::from_codon_strings(&["AAA", "AAA", "TTT"], default_genetic_code()).unwrap();
        assert_eq!(c.composition()["AAA"], 2.0);
        assert_eq!(c.composition()["TTT"], 1.0);
        assert_eq!(c.translate_counts()[&'F'], 1);
    }

    #[test]
    fn test_combine_codons() {
        let aaa = codon("AAA");
        let nnn = codon("NNN");
        let combined = combine_codons(&[&aaa, &nnn], None).unwrap();
        assert_eq!(combined.label(), "NNN");
        assert!(combined.bases().is_none());
        assert_eq!(combined.members().len(), 64);
        assert_eq!(combined.composition()["AAA"], 2.0);
        assert_eq!(combined.composition()["CCC"], 1.0);

        let weighted = combine_codons(&[&aaa, &nnn], Some(&[3.0, 0.5])).unwrap();
        assert_eq!(weighted.composition()["AAA"], 3.5);

        assert!(matches!(
            combine_codons(&[&aaa], Some(&[1.0, 1.0])),
            Err(DogmeError::LengthMismatch { .. })
        ));
        assert!(combine_codons(&[], None).is_err());
    }

    #[test]
    fn test_merge_codons() {
        let merged = merge_codons(&codon("AAA"), &codon("CCC"), None).unwrap();
        assert_eq!(merged.label(), "MMM");
        assert_eq!(merged.members().len(), 8);
        assert!(merged.is_equimolar());

        let skewed = merge_codons(&codon("AAA"), &codon("CCC"), Some([3.0, 1.0])).unwrap();
        assert_eq!(skewed.label(), "mmm");

        let raw = Codon::from_codon_strings(&["AAA"], default_genetic_code()).unwrap();
        assert_eq!(
            merge_codons(&raw, &codon("CCC"), None),
            Err(DogmeError::MissingBases)
        );
    }

    #[test]
    fn test_degenerate_members() {
        assert_eq!(
            degenerate_codon_string_to_standard_members("ATG").unwrap(),
            vec!["ATG"]
        );
        let nnk = degenerate_codon_string_to_standard_members("NNK").unwrap();
        assert_eq!(nnk.len(), 32);
        assert_eq!(nnk[0], "AAG");
        assert_eq!(
            degenerate_codon_string_to_standard_members("ARY").unwrap(),
            vec!["AAC", "AAT", "AGC", "AGT"]
        );
        assert!(degenerate_codon_string_to_standard_members("AZA").is_err());
    }

    #[test]
    fn test_combine_labels() {
        assert_eq!(combine_codon_labels("NNK", "NNS").unwrap(), "NNB");
        assert_eq!(combine_codon_labels("NNK", "NNM").unwrap(), "NNN");
        assert_eq!(combine_codon_labels("AAA", "CCC").unwrap(), "MMM");
        assert_eq!(combine_codon_labels("ACG", "ACG").unwrap(), "ACG");
        assert!(combine_codon_labels("AC", "ACG").is_err());
    }

    #[test]
    fn test_string_to_codons() {
        let codons = nucleotide_string_to_codons("NNKATGcc", default_genetic_code()).unwrap();
        assert_eq!(codons.len(), 2);
        assert_eq!(codons[1].label(), "ATG");
    }

    #[test]
    fn test_copy_on_write_code() {
        let mut c = codon("TAG");
        let other = codon("TAG");
        c.genetic_code_mut().set("TAG", 'Q').unwrap();
        assert_eq!(c.translate()[&'Q'], 1.0);
        assert_eq!(other.translate()[&'*'], 1.0);
        assert_eq!(default_genetic_code().lookup("TAG"), '*');

        let rebound = other.with_genetic_code(Arc::new(GeneticCode::supe()));
        assert_eq!(rebound.translate()[&'Q'], 1.0);
        assert_eq!(rebound.label(), "TAG");
    }

    #[test]
    fn test_sampling() {
        let mut rng = SamplerConfig::default().rng();
        let c = codon("NNK");
        for drawn in c.samples(20, &mut rng).unwrap() {
            assert!(c.composition().contains_key(&drawn));
            assert!(drawn.ends_with('G') || drawn.ends_with('T'));
        }
    }
}
