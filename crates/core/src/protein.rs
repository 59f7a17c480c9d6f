//! Protéines: séquences d'acides aminés, avec ou sans ADN d'origine

use crate::amino_acid::AminoAcid;
use crate::codon::Codon;
use crate::error::{DogmeError, Result};
use crate::genetic_code::GeneticCode;
use crate::oligonucleotide::Oligonucleotide;
use rand::Rng;
use std::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Séquence d'acides aminés éventuellement dégénérés
#[derive(Debug, Clone)]
pub struct Protein {
    residues: Vec<AminoAcid>,
    codons: Option<Vec<Codon>>,
    oligonucleotide: Option<Rc<Oligonucleotide>>,
    genetic_code: Arc<GeneticCode>,
}

impl Protein {
    /// Protéine depuis une chaîne d'acides aminés, sans ADN
    pub fn from_amino_acid_str(s: &str, genetic_code: Arc<GeneticCode>) -> Result<Self> {
        let residues = s
            .chars()
            .map(|letter| AminoAcid::from_letter(letter, genetic_code.clone()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            residues,
            codons: None,
            oligonucleotide: None,
            genetic_code,
        })
    }

    /// Protéine traduite depuis une chaîne d'ADN (IUPAC, ARN accepté)
    pub fn from_dna_str(s: &str, genetic_code: Arc<GeneticCode>) -> Result<Self> {
        let oligo = Oligonucleotide::parse_deferred(s, genetic_code)?;
        Ok(Self::from_oligonucleotide(Rc::new(oligo)))
    }

    pub fn from_oligonucleotide(oligonucleotide: Rc<Oligonucleotide>) -> Self {
        let codons = oligonucleotide.codons().to_vec();
        let residues = codons.iter().cloned().map(AminoAcid::from_codon).collect();
        Self {
            residues,
            codons: Some(codons),
            genetic_code: oligonucleotide.genetic_code().clone(),
            oligonucleotide: Some(oligonucleotide),
        }
    }

    pub fn from_codon(codon: Codon) -> Self {
        let genetic_code = codon.genetic_code().clone();
        Self::from_codon_list(vec![codon], genetic_code)
    }

    /// Protéine depuis une liste de codons
    ///
    /// L'oligonucléotide n'est construit que si tous les codons ont des bases.
    pub fn from_codons(codons: Vec<Codon>) -> Result<Self> {
        let genetic_code = codons
            .first()
            .map(|codon| codon.genetic_code().clone())
            .ok_or_else(|| DogmeError::Validation("aucun codon".to_string()))?;
        Ok(Self::from_codon_list(codons, genetic_code))
    }

    fn from_codon_list(codons: Vec<Codon>, genetic_code: Arc<GeneticCode>) -> Self {
        let oligonucleotide = Oligonucleotide::from_codons_deferred(&codons, genetic_code.clone())
            .ok()
            .map(Rc::new);
        let residues = codons.iter().cloned().map(AminoAcid::from_codon).collect();
        Self {
            residues,
            codons: Some(codons),
            oligonucleotide,
            genetic_code,
        }
    }

    pub fn from_amino_acid(residue: AminoAcid) -> Self {
        let genetic_code = residue.genetic_code().clone();
        Self {
            residues: vec![residue],
            codons: None,
            oligonucleotide: None,
            genetic_code,
        }
    }

    pub fn from_amino_acids(residues: Vec<AminoAcid>) -> Result<Self> {
        let genetic_code = residues
            .first()
            .map(|residue| residue.genetic_code().clone())
            .ok_or_else(|| DogmeError::Validation("aucun acide aminé".to_string()))?;
        Ok(Self {
            residues,
            codons: None,
            oligonucleotide: None,
            genetic_code,
        })
    }

    /// Étiquettes des résidus concaténées
    pub fn label(&self) -> String {
        self.residues.iter().map(AminoAcid::label).collect()
    }

    pub fn residues(&self) -> &[AminoAcid] {
        &self.residues
    }

    pub fn codons(&self) -> Option<&[Codon]> {
        self.codons.as_deref()
    }

    pub fn oligonucleotide(&self) -> Option<&Rc<Oligonucleotide>> {
        self.oligonucleotide.as_ref()
    }

    pub fn genetic_code(&self) -> &Arc<GeneticCode> {
        &self.genetic_code
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    /// Vrai si au moins un résidu est dégénéré
    pub fn is_degenerate(&self) -> bool {
        self.residues.iter().any(AminoAcid::is_degenerate)
    }

    pub fn is_equimolar(&self) -> bool {
        self.residues.iter().all(AminoAcid::is_equimolar)
    }

    /// Codons synonymes de chaque résidu
    pub fn synonymous_codons(&self) -> Vec<Vec<String>> {
        self.residues.iter().map(AminoAcid::synonymous_codons).collect()
    }

    /// Tire une séquence d'acides aminés, un résidu par position
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<String> {
        self.residues.iter().map(|residue| residue.sample(rng)).collect()
    }

    pub fn samples<R: Rng + ?Sized>(&self, k: usize, rng: &mut R) -> Result<Vec<String>> {
        (0..k).map(|_| self.sample(rng)).collect()
    }
}

impl fmt::Display for Protein {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
