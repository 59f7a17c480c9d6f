//! Oligonucléotides dégénérés et leur table de dégénérescence protéique
//!
//! ```
//! use dogme_core::{default_genetic_code, Oligonucleotide};
//! use num_bigint::BigUint;
//!
//! let oligo = Oligonucleotide::parse("NNKNNK", default_genetic_code()).unwrap();
//! let table = oligo.assess_degeneracy();
//! assert_eq!(table.size_proteins(), &BigUint::from(441u32));
//! ```

use crate::codon::Codon;
use crate::degeneracy::{degeneracy_histogram, DegeneracyHistogram, DegeneracySummary, DegeneracyTable};
use crate::error::{DogmeError, Result};
use crate::genetic_code::{translate, GeneticCode};
use crate::nucleotide::{combine_nucleotides, Nucleotide};
use dogme_utils::{codon_strings, compact_label, rescale_map};
use num_rational::BigRational;
use num_traits::{One, Zero};
use rand::Rng;
use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Étape atteinte par un oligonucléotide
///
/// Les bases et les profils sont toujours calculés à la construction; seule
/// l'évaluation de la dégénérescence peut être différée.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssessmentState {
    ProfilesComputed,
    DegeneracyAssessed,
}

/// Séquence ordonnée de nucléotides (5' -> 3')
#[derive(Debug, Clone)]
pub struct Oligonucleotide {
    bases: Vec<Nucleotide>,
    codons: Vec<Codon>,
    label: String,
    compact_label: String,
    genetic_code: Arc<GeneticCode>,
    amino_acid_profile: Vec<BTreeMap<char, BigRational>>,
    degeneracy: OnceCell<DegeneracyTable>,
}

impl Oligonucleotide {
    /// Oligonucléotide depuis une chaîne IUPAC, dégénérescence évaluée
    pub fn parse(s: &str, genetic_code: Arc<GeneticCode>) -> Result<Self> {
        let oligo = Self::parse_deferred(s, genetic_code)?;
        oligo.assess_degeneracy();
        Ok(oligo)
    }

    /// Comme [`Oligonucleotide::parse`], sans évaluer la dégénérescence
    pub fn parse_deferred(s: &str, genetic_code: Arc<GeneticCode>) -> Result<Self> {
        let bases = s
            .chars()
            .map(Nucleotide::from_letter)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_nucleotides_deferred(bases, genetic_code))
    }

    pub fn from_nucleotides(bases: Vec<Nucleotide>, genetic_code: Arc<GeneticCode>) -> Self {
        let oligo = Self::from_nucleotides_deferred(bases, genetic_code);
        oligo.assess_degeneracy();
        oligo
    }

    pub fn from_nucleotides_deferred(bases: Vec<Nucleotide>, genetic_code: Arc<GeneticCode>) -> Self {
        let codons: Vec<Codon> = bases
            .chunks_exact(3)
            .map(|triplet| {
                Codon::from_nucleotides(
                    [triplet[0].clone(), triplet[1].clone(), triplet[2].clone()],
                    genetic_code.clone(),
                )
            })
            .collect();
        let amino_acid_profile = codons.iter().map(Codon::translate_exact).collect();

        let label: String = bases.iter().map(Nucleotide::label).collect();
        let compact_label = compact_label(&label);

        Self {
            bases,
            codons,
            label,
            compact_label,
            genetic_code,
            amino_acid_profile,
            degeneracy: OnceCell::new(),
        }
    }

    /// Oligonucléotide depuis des codons décomposables en bases
    pub fn from_codons(codons: &[Codon], genetic_code: Arc<GeneticCode>) -> Result<Self> {
        let oligo = Self::from_codons_deferred(codons, genetic_code)?;
        oligo.assess_degeneracy();
        Ok(oligo)
    }

    pub fn from_codons_deferred(codons: &[Codon], genetic_code: Arc<GeneticCode>) -> Result<Self> {
        let mut bases = Vec::with_capacity(3 * codons.len());
        for codon in codons {
            let triplet = codon.bases().ok_or(DogmeError::MissingBases)?;
            bases.extend(triplet.iter().cloned());
        }
        Ok(Self::from_nucleotides_deferred(bases, genetic_code))
    }

    /// Oligonucléotide depuis une composition par position
    pub fn from_compositions(
        compositions: &[BTreeMap<char, f64>],
        genetic_code: Arc<GeneticCode>,
    ) -> Result<Self> {
        let bases = compositions
            .iter()
            .map(|composition| Nucleotide::from_composition(composition.iter().map(|(b, w)| (*b, *w))))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_nucleotides(bases, genetic_code))
    }

    /// `NNN` répété `codons` fois: toutes les protéines de cette longueur
    pub fn randomized(codons: usize, genetic_code: Arc<GeneticCode>) -> Result<Self> {
        Self::parse(&"NNN".repeat(codons), genetic_code)
    }

    pub fn state(&self) -> AssessmentState {
        match self.degeneracy.get() {
            Some(_) => AssessmentState::DegeneracyAssessed,
            None => AssessmentState::ProfilesComputed,
        }
    }

    /// Évalue la dégénérescence si besoin et retourne la table
    pub fn assess_degeneracy(&self) -> &DegeneracyTable {
        self.degeneracy.get_or_init(|| {
            crate::log_operation!(
                "assess_degeneracy",
                design = self.compact_label.as_str(),
                codons = self.codons.len();
                {
                    let table =
                        DegeneracyTable::from_position_weights(self.amino_acid_profile.clone());
                    info!(
                        groups = table.len(),
                        proteins = %table.size_proteins(),
                        "dégénérescence évaluée"
                    );
                    table
                }
            )
        })
    }

    /// Table déjà évaluée, sans déclencher le calcul
    pub fn degeneracy(&self) -> Option<&DegeneracyTable> {
        self.degeneracy.get()
    }

    pub fn summary(&self) -> DegeneracySummary {
        self.assess_degeneracy().summary(&self.label)
    }

    pub fn bases(&self) -> &[Nucleotide] {
        &self.bases
    }

    /// Codons complets (les bases restantes sont ignorées)
    pub fn codons(&self) -> &[Codon] {
        &self.codons
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Étiquette avec les codons répétés regroupés (`NNK<3>AAA`)
    pub fn compact_label(&self) -> &str {
        &self.compact_label
    }

    pub fn genetic_code(&self) -> &Arc<GeneticCode> {
        &self.genetic_code
    }

    /// Nombre de bases
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    pub fn is_degenerate(&self) -> bool {
        self.bases.iter().any(Nucleotide::is_degenerate)
    }

    pub fn codon_strings(&self) -> Vec<String> {
        codon_strings(&self.label)
    }

    /// Traduction de l'étiquette (symbole d'erreur pour les codons dégénérés)
    pub fn translate(&self) -> String {
        translate(&self.label, &self.genetic_code)
    }

    /// Composition de chaque base
    pub fn base_profile(&self) -> Vec<BTreeMap<char, f64>> {
        self.bases.iter().map(Nucleotide::composition).collect()
    }

    /// Composition de chaque base, ramenée à une somme de 1
    pub fn rescaled_base_profile(&self) -> Result<Vec<BTreeMap<char, f64>>> {
        self.bases
            .iter()
            .map(|base| rescale_map(&base.composition(), 1.0).map_err(|_| DogmeError::ZeroComposition))
            .collect()
    }

    /// Composition de chaque codon
    pub fn codon_profile(&self) -> Vec<&BTreeMap<String, f64>> {
        self.codons.iter().map(Codon::composition).collect()
    }

    /// Poids exact de chaque acide aminé, par position
    pub fn amino_acid_profile(&self) -> &[BTreeMap<char, BigRational>] {
        &self.amino_acid_profile
    }

    /// Histogramme de dégénérescence de chaque position
    pub fn amino_acid_degeneracy_profile(&self) -> Vec<DegeneracyHistogram> {
        self.amino_acid_profile.iter().map(degeneracy_histogram).collect()
    }

    /// Tire une séquence d'ADN, codon par codon ou base par base
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, by_codon: bool) -> Result<String> {
        if by_codon {
            self.codons.iter().map(|codon| codon.sample(rng)).collect()
        } else {
            self.bases.iter().map(|base| base.sample(rng)).collect()
        }
    }

    /// Tire une séquence et la traduit en protéine
    pub fn sample_protein<R: Rng + ?Sized>(&self, rng: &mut R, by_codon: bool) -> Result<String> {
        let dna = self.sample(rng, by_codon)?;
        Ok(translate(&dna, &self.genetic_code))
    }

    pub fn samples<R: Rng + ?Sized>(&self, k: usize, rng: &mut R, by_codon: bool) -> Result<Vec<String>> {
        (0..k).map(|_| self.sample(rng, by_codon)).collect()
    }
}

impl fmt::Display for Oligonucleotide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Combine des oligonucléotides position par position
///
/// L'oligonucléotide `i` commence à `offsets[i]`. À chaque position, les
/// compositions des oligonucléotides qui la couvrent sont mélangées selon
/// leurs proportions. Le code génétique est celui du premier oligonucléotide.
pub fn combine_oligonucleotides(
    oligos: &[&Oligonucleotide],
    proportions: Option<&[f64]>,
    offsets: Option<&[usize]>,
) -> Result<Oligonucleotide> {
    let first = oligos
        .first()
        .ok_or_else(|| DogmeError::Validation("aucun oligonucléotide à combiner".to_string()))?;

    let ones = vec![1.0; oligos.len()];
    let zeros = vec![0; oligos.len()];
    let proportions = proportions.unwrap_or(&ones);
    let offsets = offsets.unwrap_or(&zeros);
    for actual in [proportions.len(), offsets.len()] {
        if actual != oligos.len() {
            return Err(crate::log_error!(DogmeError::LengthMismatch {
                expected: oligos.len(),
                actual,
            }));
        }
    }

    let longest = oligos.iter().map(|o| o.len()).max().unwrap_or(0);
    if let Some(offset) = offsets.iter().find(|offset| **offset > longest) {
        return Err(crate::log_error!(DogmeError::OffsetOutOfRange {
            offset: *offset,
            max: longest,
        }));
    }

    let total = oligos
        .iter()
        .zip(offsets)
        .map(|(oligo, offset)| offset + oligo.len())
        .max()
        .unwrap_or(0);

    let mut bases = Vec::with_capacity(total);
    for position in 0..total {
        let (covering, weights): (Vec<&Nucleotide>, Vec<f64>) = oligos
            .iter()
            .zip(offsets)
            .zip(proportions)
            .filter(|((oligo, offset), _)| position >= **offset && position < **offset + oligo.len())
            .map(|((oligo, offset), p)| (&oligo.bases[position - offset], *p))
            .unzip();
        if covering.is_empty() {
            return Err(crate::log_error!(DogmeError::Validation(format!(
                "position {} couverte par aucun oligonucléotide",
                position
            ))));
        }
        bases.push(combine_nucleotides(&covering, Some(weights.as_slice()))?);
    }

    Ok(Oligonucleotide::from_nucleotides(bases, first.genetic_code.clone()))
}

/// Reverse-complément dégénéré d'un oligonucléotide
pub fn reverse_complement(oligo: &Oligonucleotide) -> Oligonucleotide {
    let bases = oligo.bases.iter().rev().map(Nucleotide::complement).collect();
    Oligonucleotide::from_nucleotides(bases, oligo.genetic_code.clone())
}

/// Nombre de séquences d'ADN de l'oligonucléotide codant cette protéine
///
/// Zéro si un résidu n'est pas réalisable à sa position, ou si la protéine
/// n'a pas autant de résidus que l'oligonucléotide a de codons.
pub fn calculate_protein_degeneracy(protein: &str, oligo: &Oligonucleotide) -> BigRational {
    let residues: Vec<char> = protein.chars().map(|c| c.to_ascii_uppercase()).collect();
    if residues.len() != oligo.amino_acid_profile.len() {
        return BigRational::zero();
    }

    let mut degeneracy = BigRational::one();
    for (residue, weights) in residues.iter().zip(&oligo.amino_acid_profile) {
        match weights.get(residue) {
            Some(weight) => degeneracy *= weight,
            None => return BigRational::zero(),
        }
    }
    degeneracy
}

/// Quantile protéique du groupe de dégénérescence de cette protéine
///
/// `None` si la protéine n'est pas réalisable par l'oligonucléotide.
pub fn calculate_protein_quantile(protein: &str, oligo: &Oligonucleotide) -> Option<BigRational> {
    let degeneracy = calculate_protein_degeneracy(protein, oligo);
    if degeneracy.is_zero() {
        return None;
    }
    oligo
        .assess_degeneracy()
        .group_for(&degeneracy)
        .map(|group| group.protein_quantile.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genetic_code::default_genetic_code;
    use crate::sampling::SamplerConfig;
    use num_bigint::{BigInt, BigUint};

    fn oligo(s: &str) -> Oligonucleotide {
        Oligonucleotide::parse(s, default_genetic_code()).unwrap()
    }

    fn int(n: u64) -> BigRational {
        BigRational::from_integer(BigInt::from(n))
    }

    #[test]
    fn test_parse() {
        let o = oligo("NNKNNKNNKAAANNK");
        assert_eq!(o.len(), 15);
        assert_eq!(o.codons().len(), 5);
        assert_eq!(o.label(), "NNKNNKNNKAAANNK");
        assert_eq!(o.compact_label(), "NNK<3>AAANNK");
        assert_eq!(o.state(), AssessmentState::DegeneracyAssessed);
        assert!(o.is_degenerate());
        assert_eq!(o.codon_strings()[3], "AAA");

        assert_eq!(
            Oligonucleotide::parse("AAZ", default_genetic_code()).unwrap_err(),
            DogmeError::InvalidBase('Z')
        );
    }

    #[test]
    fn test_deferred_assessment() {
        let o = Oligonucleotide::parse_deferred("NNK", default_genetic_code()).unwrap();
        assert_eq!(o.state(), AssessmentState::ProfilesComputed);
        assert!(o.degeneracy().is_none());

        let table = o.assess_degeneracy();
        assert_eq!(table.size_proteins(), &BigUint::from(21u32));
        assert_eq!(o.state(), AssessmentState::DegeneracyAssessed);
        assert!(o.degeneracy().is_some());
    }

    #[test]
    fn test_profiles() {
        let o = oligo("NNKGCC");
        assert_eq!(o.base_profile().len(), 6);
        assert_eq!(o.base_profile()[5][&'C'], 1.0);
        assert_eq!(o.rescaled_base_profile().unwrap()[0][&'A'], 0.25);
        assert_eq!(o.codon_profile()[0].len(), 32);
        assert_eq!(o.amino_acid_profile()[1], BTreeMap::from([('A', int(1))]));

        let histograms = o.amino_acid_degeneracy_profile();
        assert_eq!(histograms[0].values().sum::<BigUint>(), BigUint::from(21u32));
        assert_eq!(histograms[1], BTreeMap::from([(int(1), BigUint::from(1u32))]));
    }

    #[test]
    fn test_trailing_bases() {
        let o = oligo("ATGCC");
        assert_eq!(o.codons().len(), 1);
        assert_eq!(o.translate(), "M");
        assert_eq!(o.assess_degeneracy().len(), 1);
    }

    #[test]
    fn test_empty_oligo() {
        let o = oligo("AC");
        assert!(o.codons().is_empty());
        let table = o.assess_degeneracy();
        assert!(table.is_empty());
        assert!(table.size_proteins().is_zero());
    }

    #[test]
    fn test_from_codons() {
        let codons = vec![
            Codon::parse("NNK", default_genetic_code()).unwrap(),
            Codon::parse("ATG", default_genetic_code()).unwrap(),
        ];
        let o = Oligonucleotide::from_codons(&codons, default_genetic_code()).unwrap();
        assert_eq!(o.label(), "NNKATG");

        let raw = Codon::from_codon_strings(&["AAA"], default_genetic_code()).unwrap();
        assert_eq!(
            Oligonucleotide::from_codons(&[raw], default_genetic_code()).unwrap_err(),
            DogmeError::MissingBases
        );
    }

    #[test]
    fn test_from_compositions() {
        let compositions = vec![
            BTreeMap::from([('A', 1.0)]),
            BTreeMap::from([('A', 1.0), ('G', 3.0)]),
            BTreeMap::from([('G', 1.0)]),
        ];
        let o = Oligonucleotide::from_compositions(&compositions, default_genetic_code()).unwrap();
        assert_eq!(o.label(), "ArG");
        let profile = &o.amino_acid_profile()[0];
        assert_eq!(profile[&'K'], int(1));
        assert_eq!(profile[&'R'], int(3));
    }

    #[test]
    fn test_decimal_compositions_group_exactly() {
        // AAA + AAG (K) = 0.1 + 0.2 et AAC (N) = 0.3: une seule dégénérescence
        let compositions = vec![
            BTreeMap::from([('A', 1.0)]),
            BTreeMap::from([('A', 1.0)]),
            BTreeMap::from([('A', 0.1), ('C', 0.3), ('G', 0.2)]),
        ];
        let o = Oligonucleotide::from_compositions(&compositions, default_genetic_code()).unwrap();
        assert_eq!(o.amino_acid_degeneracy_profile()[0].len(), 1);

        let table = o.assess_degeneracy();
        assert_eq!(table.len(), 1);
        assert_eq!(table.groups()[0].proteins, BigUint::from(2u32));
        assert_eq!(table.groups()[0].degeneracy, BigRational::new(BigInt::from(3), BigInt::from(10)));
    }

    #[test]
    fn test_translate() {
        assert_eq!(oligo("aaacccgggttt").translate(), "KPGF");
        assert_eq!(oligo("NNKATG").translate(), "_M");
    }

    #[test]
    fn test_reverse_complement() {
        let o = oligo("AAACCG");
        let rc = reverse_complement(&o);
        assert_eq!(rc.label(), "CGGTTT");
        assert_eq!(reverse_complement(&rc).label(), o.label());

        let degenerate = reverse_complement(&oligo("NNK"));
        assert_eq!(degenerate.label(), "MNN");
    }

    #[test]
    fn test_combine_oligonucleotides() {
        let a = oligo("AAA");
        let c = oligo("CCC");
        let combined = combine_oligonucleotides(&[&a, &c], None, None).unwrap();
        assert_eq!(combined.label(), "MMM");

        let skewed = combine_oligonucleotides(&[&a, &c], Some(&[1.0, 3.0]), None).unwrap();
        assert_eq!(skewed.label(), "mmm");
        assert_eq!(skewed.bases()[0].weight('C'), 0.75);

        let shifted = combine_oligonucleotides(&[&a, &c], None, Some(&[0, 3])).unwrap();
        assert_eq!(shifted.label(), "AAACCC");

        let overlap = combine_oligonucleotides(&[&a, &c], None, Some(&[0, 1])).unwrap();
        assert_eq!(overlap.label(), "AMMC");
    }

    #[test]
    fn test_combine_oligonucleotides_errors() {
        let a = oligo("AAA");
        let c = oligo("CCC");
        assert!(matches!(
            combine_oligonucleotides(&[&a, &c], Some(&[1.0]), None),
            Err(DogmeError::LengthMismatch { expected: 2, actual: 1 })
        ));
        assert!(matches!(
            combine_oligonucleotides(&[&a, &c], None, Some(&[0])),
            Err(DogmeError::LengthMismatch { .. })
        ));
        assert_eq!(
            combine_oligonucleotides(&[&a, &c], None, Some(&[0, 4])).unwrap_err(),
            DogmeError::OffsetOutOfRange { offset: 4, max: 3 }
        );
        assert!(combine_oligonucleotides(&[&a], None, Some(&[2])).is_err());
        assert!(combine_oligonucleotides(&[], None, None).is_err());
    }

    #[test]
    fn test_protein_degeneracy() {
        assert_eq!(calculate_protein_degeneracy("A", &oligo("NNN")), int(4));
        assert_eq!(calculate_protein_degeneracy("A", &oligo("NNK")), int(2));
        assert!(calculate_protein_degeneracy("A", &oligo("AAA")).is_zero());
        assert!(calculate_protein_degeneracy("AA", &oligo("NNN")).is_zero());
        assert_eq!(calculate_protein_degeneracy("l", &oligo("NNK")), int(3));
    }

    #[test]
    fn test_protein_quantile() {
        let o = oligo("NNK");
        // groupes: d=1 (13), d=2 (5), d=3 (3)
        let half = calculate_protein_quantile("A", &o).unwrap();
        assert_eq!(half, BigRational::new(BigInt::from(18), BigInt::from(21)));
        assert!(calculate_protein_quantile("L", &o).unwrap().is_one());
        assert_eq!(calculate_protein_quantile("A", &oligo("AAA")), None);
    }

    #[test]
    fn test_sampling() {
        let mut rng = SamplerConfig::default().rng();
        let o = oligo("NNKATG");
        for dna in o.samples(10, &mut rng, true).unwrap() {
            assert_eq!(dna.len(), 6);
            assert!(dna.ends_with("ATG"));
        }
        let by_base = o.sample(&mut rng, false).unwrap();
        assert!(matches!(by_base.chars().nth(2), Some('G' | 'T')));

        let protein = o.sample_protein(&mut rng, true).unwrap();
        assert_eq!(protein.len(), 2);
        assert!(protein.ends_with('M'));
    }

    #[test]
    fn test_summary() {
        let summary = oligo("NNK").summary();
        assert_eq!(summary.label, "NNK");
        assert_eq!(summary.size_oligonucleotides, "32");
        assert_eq!(summary.size_proteins, "21");
        assert_eq!(summary.groups, 3);
    }

    #[test]
    fn test_randomized() {
        let o = Oligonucleotide::randomized(2, default_genetic_code()).unwrap();
        assert_eq!(o.label(), "NNNNNN");
        assert_eq!(o.assess_degeneracy().size_proteins(), &BigUint::from(441u32));
    }
}
