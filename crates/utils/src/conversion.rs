//! Conversions et étiquettes de chaînes nucléotidiques

use rand::seq::SliceRandom;
use rand::Rng;

/// Lettres IUPAC utilisées par défaut pour les oligonucléotides aléatoires
pub const DEGENERATE_LETTERS: &str = "ACGTRYSWKMBDHVN";

/// Met une chaîne en majuscules et remplace l'uracile (U) par la thymine (T)
pub fn normalize_nucleotide_string(s: &str) -> String {
    s.chars()
        .map(|c| match c.to_ascii_uppercase() {
            'U' => 'T',
            other => other,
        })
        .collect()
}

/// Découpe une chaîne en triplets consécutifs (les bases restantes sont ignorées)
pub fn codon_strings(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    chars
        .chunks_exact(3)
        .map(|triplet| triplet.iter().collect())
        .collect()
}

/// Étiquette compacte: les codons identiques consécutifs sont regroupés
///
/// `NNKNNKNNKAAANNK` devient `NNK<3>AAANNK`.
pub fn compact_label(s: &str) -> String {
    let mut output = String::new();
    let mut previous: Option<String> = None;
    let mut count = 0usize;

    for codon in codon_strings(s) {
        if previous.as_deref() == Some(codon.as_str()) {
            count += 1;
            continue;
        }
        if count > 1 {
            output.push_str(&format!("<{}>", count));
        }
        output.push_str(&codon);
        previous = Some(codon);
        count = 1;
    }
    if count > 1 {
        output.push_str(&format!("<{}>", count));
    }

    output
}

/// Génère une chaîne aléatoire de lettres équiprobables
///
/// Utiliser `"ACGT"` pour des oligonucléotides non dégénérés.
pub fn random_oligonucleotide<R: Rng + ?Sized>(length: usize, letters: &str, rng: &mut R) -> String {
    let letters: Vec<char> = letters.chars().collect();
    (0..length)
        .filter_map(|_| letters.choose(rng).copied())
        .collect()
}
