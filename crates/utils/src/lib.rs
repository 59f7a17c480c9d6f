//! Utilitaires partagés

pub mod conversion;
pub mod math;

pub use conversion::{codon_strings, compact_label, normalize_nucleotide_string, random_oligonucleotide};
pub use math::{frequency_dictionary, product, rescale, rescale_map, EntropyConfig};
