//! Moteur de dégénérescence
//!
//! Pour chaque position, l'histogramme de dégénérescence associe un poids
//! (nombre de codons codant un acide aminé) au nombre d'acides aminés ayant
//! ce poids. Les histogrammes sont repliés de gauche à droite par produits
//! deux à deux, comme une multiplication de fonctions génératrices: la table
//! obtenue associe chaque dégénérescence au nombre de protéines distinctes qui
//! la partagent, sans jamais énumérer les séquences.
//!
//! Tous les calculs de table sont exacts (`BigRational` pour les poids,
//! `BigUint` pour les effectifs).

use dogme_utils::{product, EntropyConfig};
use num_bigint::{BigInt, BigUint};
use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f64::consts::LN_2;
use std::fmt;
use tracing::debug;

/// Dégénérescence -> nombre d'acides aminés (ou de protéines)
pub type DegeneracyHistogram = BTreeMap<BigRational, BigUint>;

/// Histogramme de dégénérescence d'une position
pub fn degeneracy_histogram(weights: &BTreeMap<char, BigRational>) -> DegeneracyHistogram {
    let mut histogram = DegeneracyHistogram::new();
    for weight in weights.values().filter(|w| !w.is_zero()) {
        *histogram.entry(weight.clone()).or_insert_with(BigUint::zero) += 1u32;
    }
    histogram
}

/// Replie des histogrammes de position en table de dégénérescence protéique
///
/// Une séquence vide d'histogrammes donne une table vide.
pub fn fold_histograms<'a, I>(histograms: I) -> DegeneracyHistogram
where
    I: IntoIterator<Item = &'a DegeneracyHistogram>,
{
    let mut running: Option<DegeneracyHistogram> = None;

    for (position, histogram) in histograms.into_iter().enumerate() {
        let next = match running {
            None => histogram.clone(),
            Some(table) => {
                let mut joined = DegeneracyHistogram::new();
                for (d1, c1) in &table {
                    for (d2, c2) in histogram {
                        *joined.entry(d1 * d2).or_insert_with(BigUint::zero) += c1 * c2;
                    }
                }
                joined
            }
        };
        debug!("Position {}: {} groupes de dégénérescence", position, next.len());
        running = Some(next);
    }

    running.unwrap_or_default()
}

/// Groupe de protéines partageant la même dégénérescence
#[derive(Debug, Clone, PartialEq)]
pub struct DegeneracyGroup {
    /// Nombre de séquences d'ADN codant chaque protéine du groupe
    pub degeneracy: BigRational,
    /// Nombre de protéines distinctes du groupe
    pub proteins: BigUint,
    /// `degeneracy × proteins`
    pub oligonucleotides: BigRational,
    /// Part cumulée de l'ADN jusqu'à ce groupe inclus
    pub dna_quantile: BigRational,
    /// Part cumulée des protéines jusqu'à ce groupe inclus
    pub protein_quantile: BigRational,
}

/// Table de dégénérescence protéique d'un oligonucléotide
#[derive(Debug, Clone, PartialEq)]
pub struct DegeneracyTable {
    groups: Vec<DegeneracyGroup>,
    size_oligonucleotides: BigRational,
    size_proteins: BigUint,
    position_weights: Vec<BTreeMap<char, BigRational>>,
}

impl DegeneracyTable {
    /// Construit la table depuis les poids exacts des acides aminés par position
    pub fn from_position_weights(position_weights: Vec<BTreeMap<char, BigRational>>) -> Self {
        let histograms: Vec<DegeneracyHistogram> =
            position_weights.iter().map(degeneracy_histogram).collect();
        let table = fold_histograms(&histograms);

        let size_proteins: BigUint = table.values().sum();
        let size_oligonucleotides: BigRational = table
            .iter()
            .map(|(degeneracy, proteins)| degeneracy * to_rational(proteins))
            .sum();

        let mut groups = Vec::with_capacity(table.len());
        let mut cumulative_dna = BigRational::zero();
        let mut cumulative_proteins = BigUint::zero();
        // BTreeMap: groupes déjà triés par dégénérescence croissante
        for (degeneracy, proteins) in table {
            let oligonucleotides = &degeneracy * to_rational(&proteins);
            cumulative_dna += &oligonucleotides;
            cumulative_proteins += &proteins;

            groups.push(DegeneracyGroup {
                dna_quantile: &cumulative_dna / &size_oligonucleotides,
                protein_quantile: to_rational(&cumulative_proteins) / to_rational(&size_proteins),
                degeneracy,
                proteins,
                oligonucleotides,
            });
        }

        Self {
            groups,
            size_oligonucleotides,
            size_proteins,
            position_weights,
        }
    }

    /// Groupes triés par dégénérescence croissante
    pub fn groups(&self) -> &[DegeneracyGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Nombre total de séquences d'ADN réalisables
    pub fn size_oligonucleotides(&self) -> &BigRational {
        &self.size_oligonucleotides
    }

    /// Nombre total de protéines distinctes réalisables
    pub fn size_proteins(&self) -> &BigUint {
        &self.size_proteins
    }

    pub fn position_weights(&self) -> &[BTreeMap<char, BigRational>] {
        &self.position_weights
    }

    /// Groupe d'une dégénérescence donnée
    pub fn group_for(&self, degeneracy: &BigRational) -> Option<&DegeneracyGroup> {
        self.groups
            .binary_search_by(|group| group.degeneracy.cmp(degeneracy))
            .ok()
            .map(|i| &self.groups[i])
    }

    /// Nombre moyen de séquences d'ADN par protéine
    pub fn average_degeneracy(&self) -> Option<BigRational> {
        if self.size_proteins.is_zero() {
            return None;
        }
        Some(&self.size_oligonucleotides / to_rational(&self.size_proteins))
    }

    /// Indice de Gini entre les parts cumulées de protéines et d'ADN
    ///
    /// 0 quand toutes les protéines sont également représentées.
    pub fn gini_index(&self) -> BigRational {
        if self.groups.is_empty() {
            return BigRational::zero();
        }
        let two = BigRational::from_integer(BigInt::from(2));

        let mut area = BigRational::zero();
        let mut previous = (BigRational::zero(), BigRational::zero());
        for group in &self.groups {
            let (x0, y0) = &previous;
            area += (&group.protein_quantile - x0) * (&group.dna_quantile + y0) / &two;
            previous = (group.protein_quantile.clone(), group.dna_quantile.clone());
        }

        (BigRational::one() / &two - area) * two
    }

    /// Diversité de Makowski-Soares: `1 / (P × Σ nᵢ pᵢ²)`, `pᵢ = dᵢ / D`
    pub fn makowski_diversity(&self) -> Option<BigRational> {
        if self.groups.is_empty() {
            return None;
        }
        let sum: BigRational = self
            .groups
            .iter()
            .map(|group| {
                let p = &group.degeneracy / &self.size_oligonucleotides;
                to_rational(&group.proteins) * &p * &p
            })
            .sum();

        inverse(to_rational(&self.size_proteins) * sum)
    }

    /// Diversité de Makowski-Soares par le produit des positions:
    /// `1 / (P × Πᵢ Σⱼ pᵢⱼ²)`
    pub fn alternative_makowski_diversity(&self) -> Option<BigRational> {
        if self.groups.is_empty() {
            return None;
        }
        let squares = self
            .position_weights
            .iter()
            .map(|weights| {
                let total: BigRational = weights.values().sum();
                if total.is_zero() {
                    return None;
                }
                Some(
                    weights
                        .values()
                        .map(|w| {
                            let p = w / &total;
                            &p * &p
                        })
                        .sum::<BigRational>(),
                )
            })
            .collect::<Option<Vec<_>>>()?;

        inverse(to_rational(&self.size_proteins) * product(squares, BigRational::one()))
    }

    /// Entropie `−Σ nᵢ pᵢ ln pᵢ` avec `pᵢ = dᵢ / P`
    pub fn entropy(&self, config: &EntropyConfig) -> f64 {
        let ln_total = ln_biguint(&self.size_proteins);
        config.scale(self.weighted_entropy(ln_total))
    }

    /// Entropie de Shannon de la distribution des protéines, `pᵢ = dᵢ / D`
    ///
    /// C'est l'entropie d'une protéine tirée au hasard dans l'ensemble d'ADN.
    pub fn protein_shannon_entropy(&self, config: &EntropyConfig) -> f64 {
        let ln_total = ln_rational(&self.size_oligonucleotides);
        config.scale(self.weighted_entropy(ln_total))
    }

    fn weighted_entropy(&self, ln_total: f64) -> f64 {
        self.groups
            .iter()
            .map(|group| {
                let ln_p = ln_rational(&group.degeneracy) - ln_total;
                let ln_mass = ln_biguint(&group.proteins) + ln_p;
                -(ln_mass.exp() * ln_p)
            })
            .sum()
    }

    /// Fraction attendue des protéines observées dans un échantillon de
    /// `sample_size` séquences d'ADN tirées au hasard
    ///
    /// Pour un groupe de `n` protéines recevant `Sᵢ = S × dna / D` tirages,
    /// la part observée est `1 − (1 − 1/n)^Sᵢ`. Le calcul se fait en espace
    /// logarithmique: les effectifs peuvent dépasser la plage des `f64`.
    pub fn expected_sampling_coverage(&self, sample_size: u64) -> f64 {
        if sample_size == 0 || self.size_proteins.is_zero() {
            return 0.0;
        }
        let ln_sample = (sample_size as f64).ln();
        let ln_dna = ln_rational(&self.size_oligonucleotides);
        let ln_proteins = ln_biguint(&self.size_proteins);

        let coverage: f64 = self
            .groups
            .iter()
            .map(|group| {
                let ln_draws = ln_sample + ln_rational(&group.oligonucleotides) - ln_dna;
                let ln_weight = ln_biguint(&group.proteins) - ln_proteins;
                (ln_weight + ln_observed(&group.proteins, ln_draws)).exp()
            })
            .sum();
        coverage.clamp(0.0, 1.0)
    }

    /// Résumé de la table pour un oligonucléotide
    pub fn summary(&self, label: &str) -> DegeneracySummary {
        DegeneracySummary {
            label: label.to_string(),
            size_oligonucleotides: self.size_oligonucleotides.to_string(),
            size_proteins: self.size_proteins.to_string(),
            average_degeneracy: self
                .average_degeneracy()
                .and_then(|d| d.to_f64())
                .unwrap_or(0.0),
            groups: self.groups.len(),
            gini_index: self.gini_index().to_f64().unwrap_or(0.0),
        }
    }
}

/// Résumé d'une table de dégénérescence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegeneracySummary {
    pub label: String,
    pub size_oligonucleotides: String,
    pub size_proteins: String,
    pub average_degeneracy: f64,
    pub groups: usize,
    pub gini_index: f64,
}

impl DegeneracySummary {
    /// Formate le résumé en tableau
    pub fn format_table(&self) -> String {
        format!(
            "┌────────────────────────────────────────────┐\n\
             │ Dégénérescence: {:<26} │\n\
             ├────────────────────────────────────────────┤\n\
             │ Taille (ADN)       : {:>21} │\n\
             │ Taille (protéines) : {:>21} │\n\
             │ Dégénérescence moy.: {:>21.4} │\n\
             │ Groupes            : {:>21} │\n\
             │ Indice de Gini     : {:>21.4} │\n\
             └────────────────────────────────────────────┘",
            self.label,
            self.size_oligonucleotides,
            self.size_proteins,
            self.average_degeneracy,
            self.groups,
            self.gini_index
        )
    }
}

impl fmt::Display for DegeneracySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_table())
    }
}

fn to_rational(n: &BigUint) -> BigRational {
    BigRational::from_integer(BigInt::from(n.clone()))
}

fn inverse(value: BigRational) -> Option<BigRational> {
    if value.is_zero() {
        None
    } else {
        Some(value.recip())
    }
}

/// Logarithme naturel d'un grand entier, sans dépassement flottant
fn ln_biguint(n: &BigUint) -> f64 {
    let bits = n.bits();
    if bits <= 1000 {
        return n.to_f64().map_or(f64::NAN, f64::ln);
    }
    let shift = bits - 64;
    let top: BigUint = n >> shift;
    top.to_f64().map_or(f64::NAN, f64::ln) + shift as f64 * LN_2
}

fn ln_rational(r: &BigRational) -> f64 {
    ln_biguint(r.numer().magnitude()) - ln_biguint(r.denom().magnitude())
}

/// `ln(1 − (1 − 1/n)^draws)`, avec `draws = exp(ln_draws)`
fn ln_observed(proteins: &BigUint, ln_draws: f64) -> f64 {
    if proteins.is_one() {
        return 0.0;
    }
    // taux = −ln(1 − 1/n), soit 1/n pour les grands effectifs
    let ln_rate = match proteins.to_f64() {
        Some(n) if proteins.bits() <= 52 => (-(-1.0 / n).ln_1p()).ln(),
        _ => -ln_biguint(proteins),
    };
    let ln_exponent = ln_draws + ln_rate;
    if ln_exponent < -23.0 {
        ln_exponent
    } else {
        (-(-ln_exponent.exp()).exp_m1()).ln()
    }
}
