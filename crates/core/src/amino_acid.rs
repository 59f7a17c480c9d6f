//! Acides aminés: compositions pondérées sur les symboles du code génétique

use crate::codon::Codon;
use crate::error::{DogmeError, Result};
use crate::genetic_code::GeneticCode;
use crate::sampling::weighted_choice;
use rand::Rng;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Acide aminé éventuellement dégénéré
#[derive(Debug, Clone, PartialEq)]
pub struct AminoAcid {
    label: char,
    composition: BTreeMap<char, f64>,
    codons: Vec<Codon>,
    genetic_code: Arc<GeneticCode>,
}

impl AminoAcid {
    /// Acide aminé pur (poids 1), porté par ses codons synonymes
    pub fn from_letter(letter: char, genetic_code: Arc<GeneticCode>) -> Result<Self> {
        let letter = letter.to_ascii_uppercase();
        let synonyms = genetic_code.synonymous_codons(letter);
        if synonyms.is_empty() {
            return Err(DogmeError::Validation(format!(
                "{} n'est codé par aucun codon du code {}",
                letter,
                genetic_code.name()
            )));
        }
        let codon = Codon::from_codon_strings(synonyms, genetic_code.clone())?;

        Ok(Self {
            label: letter,
            composition: BTreeMap::from([(letter, 1.0)]),
            codons: vec![codon],
            genetic_code,
        })
    }

    /// Acide aminé traduit depuis un codon IUPAC (`"NNK"`, `"GCT"`, ...)
    pub fn from_codon_str(codon: &str, genetic_code: Arc<GeneticCode>) -> Result<Self> {
        Ok(Self::from_codon(Codon::parse(codon, genetic_code)?))
    }

    /// Acide aminé traduit depuis un codon, sous le code de ce codon
    ///
    /// L'étiquette est la traduction de l'étiquette du codon: le symbole
    /// d'erreur pour un codon dégénéré.
    pub fn from_codon(codon: Codon) -> Self {
        let genetic_code = codon.genetic_code().clone();
        Self {
            label: genetic_code.lookup(codon.label()),
            composition: codon.translate(),
            codons: vec![codon],
            genetic_code,
        }
    }

    /// Acide aminé depuis une composition symbole -> poids
    pub fn from_composition(
        composition: &BTreeMap<char, f64>,
        genetic_code: Arc<GeneticCode>,
    ) -> Result<Self> {
        let mut normalized: BTreeMap<char, f64> = BTreeMap::new();
        for (aa, weight) in composition {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(DogmeError::Validation(format!(
                    "poids invalide pour {}: {}",
                    aa, weight
                )));
            }
            if *weight > 0.0 {
                *normalized.entry(aa.to_ascii_uppercase()).or_insert(0.0) += weight;
            }
        }

        let members: Vec<char> = normalized.keys().copied().collect();
        let label = match members.as_slice() {
            [] => return Err(DogmeError::ZeroComposition),
            [single] => *single,
            _ => genetic_code.error_symbol(),
        };

        Ok(Self {
            label,
            composition: normalized,
            codons: Vec::new(),
            genetic_code,
        })
    }

    pub fn label(&self) -> char {
        self.label
    }

    pub fn composition(&self) -> &BTreeMap<char, f64> {
        &self.composition
    }

    /// Symboles de poids non nul, triés
    pub fn members(&self) -> Vec<char> {
        self.composition.keys().copied().collect()
    }

    pub fn proportions(&self) -> Vec<f64> {
        self.composition.values().copied().collect()
    }

    /// Codons d'origine (vide pour une composition brute)
    pub fn codons(&self) -> &[Codon] {
        &self.codons
    }

    pub fn genetic_code(&self) -> &Arc<GeneticCode> {
        &self.genetic_code
    }

    pub fn is_degenerate(&self) -> bool {
        self.composition.len() > 1
    }

    pub fn is_equimolar(&self) -> bool {
        let mut weights = self.composition.values();
        match weights.next() {
            Some(first) => weights.all(|w| w == first),
            None => true,
        }
    }

    /// Tous les codons codant pour un des membres
    pub fn synonymous_codons(&self) -> Vec<String> {
        self.composition
            .keys()
            .flat_map(|aa| self.genetic_code.synonymous_codons(*aa).iter().cloned())
            .collect()
    }

    /// Codons synonymes réunis en un seul codon équimolaire
    pub fn synonymous_codon(&self) -> Result<Codon> {
        Codon::from_codon_strings(&self.synonymous_codons(), self.genetic_code.clone())
    }

    /// Un codon par codon synonyme
    pub fn synonymous_codon_list(&self) -> Result<Vec<Codon>> {
        self.synonymous_codons()
            .iter()
            .map(|codon| Codon::parse(codon, self.genetic_code.clone()))
            .collect()
    }

    /// Tire un symbole selon la composition
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<char> {
        let members = self.members();
        let weights = self.proportions();
        weighted_choice(&members, &weights, rng).copied()
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}
