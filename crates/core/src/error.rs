//! Types d'erreurs pour la bibliothèque dogme

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DogmeError {
    #[error("Entrée invalide: {0}")]
    Validation(String),

    #[error("Base IUPAC invalide: {0}")]
    InvalidBase(char),

    #[error("Codon invalide: {0}")]
    InvalidCodon(String),

    #[error("Composition de poids total nul")]
    ZeroComposition,

    #[error("Longueurs incohérentes: attendu {expected}, obtenu {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Décalage hors plage: {offset} > {max}")]
    OffsetOutOfRange { offset: usize, max: usize },

    #[error("Codon sans décomposition en bases")]
    MissingBases,

    #[error("Erreur de configuration du code génétique: {0}")]
    Configuration(String),

    #[error("Erreur d'échantillonnage: {0}")]
    Sampling(String),
}

impl DogmeError {
    /// Vrai pour les erreurs de validation des entrées d'un constructeur
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            DogmeError::Validation(_)
                | DogmeError::InvalidBase(_)
                | DogmeError::InvalidCodon(_)
                | DogmeError::ZeroComposition
                | DogmeError::LengthMismatch { .. }
                | DogmeError::OffsetOutOfRange { .. }
                | DogmeError::MissingBases
        )
    }

    /// Vrai pour les tentatives de modification hors du code génétique
    pub fn is_configuration(&self) -> bool {
        matches!(self, DogmeError::Configuration(_))
    }
}

pub type Result<T> = std::result::Result<T, DogmeError>;
