//! Code génétique: correspondance entre codons et acides aminés
//!
//! ```
//! use dogme_core::GeneticCode;
//!
//! let standard = GeneticCode::standard();
//! assert_eq!(standard.lookup("AAA"), 'K');
//! assert_eq!(standard.lookup("gcu"), 'A');
//! assert_eq!(standard.lookup("BAD"), '_');
//! ```

use crate::constants::{
    ncbi_amino_acids, ncbi_name, standard_codons, ERROR_LABEL, STOP_LABEL,
};
use crate::error::{DogmeError, Result};
use dogme_utils::{codon_strings, normalize_nucleotide_string};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Configuration d'un code génétique
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneticCodeConfig {
    /// Identifiant NCBI de la table de base (1 = standard)
    pub ncbi_id: u32,
    /// Réaffectations codon -> acide aminé appliquées après la table de base
    pub updated_mappings: BTreeMap<String, char>,
    /// Symbole des codons stop
    pub stop_symbol: char,
    /// Symbole renvoyé pour un codon hors du code
    pub error_symbol: char,
    /// Nom explicite (sinon le nom NCBI)
    pub name: Option<String>,
}

impl Default for GeneticCodeConfig {
    fn default() -> Self {
        Self {
            ncbi_id: 1,
            updated_mappings: BTreeMap::new(),
            stop_symbol: STOP_LABEL,
            error_symbol: ERROR_LABEL,
            name: None,
        }
    }
}

impl GeneticCodeConfig {
    /// Configuration pour un identifiant NCBI
    pub fn ncbi(ncbi_id: u32) -> Self {
        Self {
            ncbi_id,
            ..Default::default()
        }
    }

    /// Ajoute une réaffectation codon -> acide aminé
    pub fn with_mapping(mut self, codon: &str, amino_acid: char) -> Self {
        self.updated_mappings.insert(codon.to_string(), amino_acid);
        self
    }

    /// Définit le nom du code
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }
}

/// Système de traduction des codons en acides aminés
#[derive(Debug, Clone, PartialEq)]
pub struct GeneticCode {
    name: String,
    ncbi_id: Option<u32>,
    stop_symbol: char,
    error_symbol: char,
    code: BTreeMap<String, char>,
    reversed: BTreeMap<char, Vec<String>>,
}

impl GeneticCode {
    /// Construit un code génétique depuis sa configuration
    ///
    /// Un identifiant NCBI inconnu donne un code vide.
    pub fn new(config: GeneticCodeConfig) -> Result<Self> {
        let mappings = normalize_mappings(&config.updated_mappings)?;

        let mut genetic_code = Self::from_table(&config);
        for (codon, amino_acid) in mappings {
            genetic_code.code.insert(codon, amino_acid);
        }
        genetic_code.rebuild_reversed();

        Ok(genetic_code)
    }

    /// Code génétique standard (NCBI 1)
    pub fn standard() -> Self {
        Self::from_ncbi_id(1)
    }

    /// Code génétique NCBI sans réaffectation
    pub fn from_ncbi_id(ncbi_id: u32) -> Self {
        Self::from_table(&GeneticCodeConfig::ncbi(ncbi_id))
    }

    /// Code suppresseur ambre supE (TAG -> Q)
    pub fn supe() -> Self {
        let mut code = Self::standard();
        code.code.insert("TAG".to_string(), 'Q');
        code.name = "supE".to_string();
        code.rebuild_reversed();
        code
    }

    /// Table NCBI de base, sans les réaffectations de la configuration
    fn from_table(config: &GeneticCodeConfig) -> Self {
        let table = ncbi_amino_acids(config.ncbi_id);

        let code: BTreeMap<String, char> = table
            .map(|amino_acids| {
                standard_codons()
                    .zip(amino_acids.chars())
                    .map(|(codon, aa)| {
                        let aa = if aa == STOP_LABEL { config.stop_symbol } else { aa };
                        (codon, aa)
                    })
                    .collect()
            })
            .unwrap_or_default();

        let name = config
            .name
            .clone()
            .or_else(|| ncbi_name(config.ncbi_id).map(str::to_string))
            .unwrap_or_default();

        let mut genetic_code = Self {
            name,
            ncbi_id: table.map(|_| config.ncbi_id),
            stop_symbol: config.stop_symbol,
            error_symbol: config.error_symbol,
            code,
            reversed: BTreeMap::new(),
        };
        genetic_code.rebuild_reversed();
        genetic_code
    }

    /// Retourne l'acide aminé d'un codon, ou le symbole d'erreur
    pub fn lookup(&self, codon: &str) -> char {
        let codon = normalize_nucleotide_string(codon);
        self.code.get(&codon).copied().unwrap_or(self.error_symbol)
    }

    /// Réaffecte un codon déjà présent dans le code
    pub fn set(&mut self, codon: &str, amino_acid: char) -> Result<()> {
        let codon = normalize_nucleotide_string(codon);
        match self.code.get_mut(&codon) {
            Some(slot) => {
                *slot = amino_acid;
                debug!("Codon {} réaffecté à {}", codon, amino_acid);
                self.rebuild_reversed();
                Ok(())
            }
            None => Err(crate::log_error!(DogmeError::Configuration(format!(
                "codon {} absent du code génétique",
                codon
            )))),
        }
    }

    /// Met à jour plusieurs correspondances
    ///
    /// Sans `expand`, les codons absents du code sont ignorés silencieusement.
    pub fn update(&mut self, mappings: &BTreeMap<String, char>, expand: bool) -> Result<()> {
        let mappings = normalize_mappings(mappings)?;

        let mut applied = 0usize;
        for (codon, amino_acid) in mappings {
            if expand || self.code.contains_key(&codon) {
                self.code.insert(codon, amino_acid);
                applied += 1;
            }
        }
        debug!("{} correspondance(s) appliquée(s) au code {}", applied, self.name);

        self.rebuild_reversed();
        Ok(())
    }

    fn rebuild_reversed(&mut self) {
        let mut reversed: BTreeMap<char, Vec<String>> = BTreeMap::new();
        for (codon, amino_acid) in &self.code {
            reversed.entry(*amino_acid).or_default().push(codon.clone());
        }
        self.reversed = reversed;
    }

    /// Codons du code, triés
    pub fn codons(&self) -> Vec<&str> {
        self.code.keys().map(String::as_str).collect()
    }

    /// Acides aminés alignés sur [`GeneticCode::codons`]
    pub fn amino_acids(&self) -> Vec<char> {
        self.code.values().copied().collect()
    }

    /// Ensemble des symboles produits par le code
    pub fn amino_acid_scope(&self) -> BTreeSet<char> {
        self.reversed.keys().copied().collect()
    }

    /// Vrai si au moins un codon code pour ce symbole
    pub fn contains_amino_acid(&self, amino_acid: char) -> bool {
        self.reversed.contains_key(&amino_acid)
    }

    /// Codons synonymes codant pour un acide aminé
    pub fn synonymous_codons(&self, amino_acid: char) -> &[String] {
        self.reversed
            .get(&amino_acid)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ncbi_id(&self) -> Option<u32> {
        self.ncbi_id
    }

    pub fn stop_symbol(&self) -> char {
        self.stop_symbol
    }

    pub fn error_symbol(&self) -> char {
        self.error_symbol
    }

    /// Nombre de codons dans le code
    pub fn len(&self) -> usize {
        self.code.len()
    }

    /// Vrai pour un code sans aucun codon
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}

impl Default for GeneticCode {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for GeneticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self
            .code
            .iter()
            .map(|(codon, aa)| format!("{} {}", codon, aa))
            .collect();
        write!(f, "{}", lines.join("\n"))
    }
}

fn normalize_mappings(mappings: &BTreeMap<String, char>) -> Result<Vec<(String, char)>> {
    mappings
        .iter()
        .map(|(codon, aa)| {
            let normalized = normalize_nucleotide_string(codon);
            if normalized.chars().count() != 3 {
                return Err(DogmeError::InvalidCodon(codon.clone()));
            }
            Ok((normalized, *aa))
        })
        .collect()
}

/// Code génétique standard partagé, construit une seule fois
pub fn default_genetic_code() -> Arc<GeneticCode> {
    static DEFAULT: OnceLock<Arc<GeneticCode>> = OnceLock::new();
    DEFAULT
        .get_or_init(|| Arc::new(GeneticCode::standard()))
        .clone()
}

/// Traduit une chaîne d'ADN (ou d'ARN) en chaîne d'acides aminés
pub fn translate(dna: &str, genetic_code: &GeneticCode) -> String {
    let dna = normalize_nucleotide_string(dna);
    codon_strings(&dna)
        .iter()
        .map(|codon| genetic_code.lookup(codon))
        .collect()
}
