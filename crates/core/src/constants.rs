//! Tables de constantes: codes IUPAC, codons standards et codes génétiques NCBI
//!
//! L'ordre A, C, G, T fait de l'appariement une simple inversion des index.
//!
//! Référence: Nomenclature for Incompletely Specified Bases in Nucleic Acid
//! Sequences (NC-IUB, 1984).

/// Les quatre nucléotides standards, dans l'ordre des index de composition
pub const STANDARD_NUCLEOTIDES: [char; 4] = ['A', 'C', 'G', 'T'];

/// Lettres IUPAC triées (bases standards incluses)
pub const DEGENERATE_NUCLEOTIDES: &str = "ABCDGHKMNRSTVWY";

/// Étiquette d'un nucléotide par défaut
pub const DEFAULT_NUCLEOTIDE_LABEL: char = 'N';

/// Étiquette d'un codon dont la composition ne dérive pas de trois bases
pub const DEFAULT_CODON_LABEL: &str = "NNN";

/// Symbole stop par défaut
pub const STOP_LABEL: char = '*';

/// Symbole d'erreur par défaut pour les codons non traduisibles
pub const ERROR_LABEL: char = '_';

/// Code IUPAC sous forme de masque (A=1, C=2, G=4, T=8)
const IUPAC_MASKS: [(char, u8); 15] = [
    ('A', 0b0001),
    ('C', 0b0010),
    ('G', 0b0100),
    ('T', 0b1000),
    ('R', 0b0101), // A ou G (purine)
    ('Y', 0b1010), // C ou T (pyrimidine)
    ('S', 0b0110), // G ou C (strong)
    ('W', 0b1001), // A ou T (weak)
    ('K', 0b1100), // G ou T (keto)
    ('M', 0b0011), // A ou C (amino)
    ('B', 0b1110), // pas A
    ('D', 0b1101), // pas C
    ('H', 0b1011), // pas G
    ('V', 0b0111), // pas T
    ('N', 0b1111),
];

/// Index d'une base standard dans une composition (A, C, G, T)
pub fn base_index(base: char) -> Option<usize> {
    match base.to_ascii_uppercase() {
        'A' => Some(0),
        'C' => Some(1),
        'G' => Some(2),
        'T' | 'U' => Some(3),
        _ => None,
    }
}

/// Masque IUPAC d'une lettre (insensible à la casse, U accepté)
pub fn iupac_mask(letter: char) -> Option<u8> {
    let letter = match letter.to_ascii_uppercase() {
        'U' => 'T',
        other => other,
    };
    IUPAC_MASKS
        .iter()
        .find(|(l, _)| *l == letter)
        .map(|(_, mask)| *mask)
}

/// Lettre IUPAC (majuscule) correspondant à un masque non nul
pub fn iupac_letter(mask: u8) -> Option<char> {
    IUPAC_MASKS
        .iter()
        .find(|(_, m)| *m == mask)
        .map(|(l, _)| *l)
}

/// Bases standards couvertes par un masque, triées
pub fn mask_members(mask: u8) -> impl Iterator<Item = char> {
    STANDARD_NUCLEOTIDES
        .into_iter()
        .enumerate()
        .filter(move |(i, _)| mask & (1 << i) != 0)
        .map(|(_, b)| b)
}

/// Bases standards représentées par une lettre IUPAC
pub fn iupac_members(letter: char) -> Option<String> {
    iupac_mask(letter).map(|mask| mask_members(mask).collect())
}

/// Les 64 codons standards dans l'ordre alphabétique (AAA, AAC, ..., TTT)
pub fn standard_codons() -> impl Iterator<Item = String> {
    (0..64).map(|i| {
        [i >> 4, (i >> 2) & 0b11, i & 0b11]
            .iter()
            .map(|&j| STANDARD_NUCLEOTIDES[j])
            .collect()
    })
}

/// Vrai si la chaîne est l'un des 64 codons standards (en majuscules)
pub fn is_standard_codon(codon: &str) -> bool {
    codon.len() == 3 && codon.chars().all(|c| matches!(c, 'A' | 'C' | 'G' | 'T'))
}

/// Noms des codes génétiques NCBI
pub const NCBI_GENETIC_CODE_NAMES: [(u32, &str); 20] = [
    (1, "Standard"),
    (2, "Vertebrate Mitochondrial"),
    (3, "Yeast Mitochondrial"),
    (
        4,
        "Mold Mitochondrial; Protozoan Mitochondrial; Coelenterate Mitochondrial; Mycoplasma; Spiroplasma",
    ),
    (5, "Invertebrate Mitochondrial"),
    (6, "Ciliate Nuclear; Dasycladacean Nuclear; Hexamita Nuclear"),
    (9, "Echinoderm Mitochondrial; Flatworm Mitochondrial"),
    (10, "Euplotid Nuclear"),
    (11, "Bacterial, Archaeal and Plant Plastid"),
    (12, "Alternative Yeast Nuclear"),
    (13, "Ascidian Mitochondrial"),
    (14, "Alternative Flatworm Mitochondrial"),
    (15, "Blepharisma Macronuclear"),
    (16, "Chlorophycean Mitochondrial"),
    (21, "Trematode Mitochondrial"),
    (22, "Scenedesmus obliquus Mitochondrial"),
    (23, "Thraustochytrium Mitochondrial"),
    (24, "Pterobranchia Mitochondrial"),
    (25, "Candidate Division SR1 and Gracilibacteria"),
    (26, "Pachysolen tannophilus Nuclear"),
];

/// Acides aminés alignés sur [`standard_codons`] pour chaque code NCBI
const NCBI_AMINO_ACIDS: [(u32, &str); 20] = [
    (1, "KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSS*CWCLFLF"),
    (2, "KNKNTTTT*S*SMIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSSWCWCLFLF"),
    (3, "KNKNTTTTRSRSMIMIQHQHPPPPRRRRTTTTEDEDAAAAGGGGVVVV*Y*YSSSSWCWCLFLF"),
    (4, "KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSSWCWCLFLF"),
    (5, "KNKNTTTTSSSSMIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSSWCWCLFLF"),
    (6, "KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVVQYQYSSSS*CWCLFLF"),
    (9, "NNKNTTTTSSSSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSSWCWCLFLF"),
    (10, "KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSSCCWCLFLF"),
    (11, "KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSS*CWCLFLF"),
    (12, "KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLSLEDEDAAAAGGGGVVVV*Y*YSSSS*CWCLFLF"),
    (13, "KNKNTTTTGSGSMIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSSWCWCLFLF"),
    (14, "NNKNTTTTSSSSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVVYY*YSSSSWCWCLFLF"),
    (15, "KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*YQYSSSS*CWCLFLF"),
    (16, "KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*YLYSSSS*CWCLFLF"),
    (21, "NNKNTTTTSSSSMIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSSWCWCLFLF"),
    (22, "KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*YLY*SSS*CWCLFLF"),
    (23, "KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSS*CWC*FLF"),
    (24, "KNKNTTTTSSKSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSSWCWCLFLF"),
    (25, "KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLLLEDEDAAAAGGGGVVVV*Y*YSSSSGCWCLFLF"),
    (26, "KNKNTTTTRSRSIIMIQHQHPPPPRRRRLLALEDEDAAAAGGGGVVVV*Y*YSSSS*CWCLFLF"),
];

/// Table NCBI (64 symboles alignés sur les codons triés)
pub fn ncbi_amino_acids(ncbi_id: u32) -> Option<&'static str> {
    NCBI_AMINO_ACIDS
        .iter()
        .find(|(id, _)| *id == ncbi_id)
        .map(|(_, table)| *table)
}

/// Nom d'un code génétique NCBI
pub fn ncbi_name(ncbi_id: u32) -> Option<&'static str> {
    NCBI_GENETIC_CODE_NAMES
        .iter()
        .find(|(id, _)| *id == ncbi_id)
        .map(|(_, name)| *name)
}
