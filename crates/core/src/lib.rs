//! Dogme Core Library
//!
//! Algèbre des séquences d'ADN dégénérées et statistiques de dégénérescence
//! des banques de protéines qu'elles codent.

pub mod amino_acid;
pub mod codon;
pub mod constants;
pub mod degeneracy;
pub mod error;
pub mod genetic_code;
pub mod logging;
pub mod nucleotide;
pub mod oligonucleotide;
pub mod protein;
pub mod sampling;

// Réexportations principales
pub use amino_acid::AminoAcid;
pub use codon::{
    combine_codon_labels, combine_codons, degenerate_codon_string_to_standard_members,
    merge_codons, nucleotide_string_to_codons, Codon,
};
pub use degeneracy::{DegeneracyGroup, DegeneracyHistogram, DegeneracySummary, DegeneracyTable};
pub use error::{DogmeError, Result};
pub use genetic_code::{default_genetic_code, translate, GeneticCode, GeneticCodeConfig};
pub use logging::init_logging;
// Les macros log_operation et log_error sont automatiquement exportées à la racine du crate
pub use nucleotide::{combine_nucleotides, Nucleotide};
pub use oligonucleotide::{
    calculate_protein_degeneracy, calculate_protein_quantile, combine_oligonucleotides,
    reverse_complement, AssessmentState, Oligonucleotide,
};
pub use protein::Protein;
pub use sampling::SamplerConfig;
pub use dogme_utils::EntropyConfig;
