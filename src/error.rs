// =============================================================================
// ERROR — Les erreurs de la frontière
// =============================================================================
//
// Les algorithmes du cœur (closure, projection, chase...) sont TOTAUX :
// ils ne peuvent pas échouer sur une entrée bien formée. Toutes les erreurs
// naissent à la frontière :
//   - résolution des jetons d'attributs (nom ou index positionnel)
//   - état de session absent (analyse demandée avant le calcul de base)
//   - garde-fous sur l'énumération exponentielle
//   - configuration et E/S
//
// Aucune erreur n'est rejouée en interne : elles remontent telles quelles.
//
// =============================================================================

use thiserror::Error;

/// Erreur principale de normrust.
#[derive(Debug, Error)]
pub enum NormError {
    /// Un index de colonne (1-based) sort de l'ordre d'attributs connu.
    #[error("index de colonne {index} hors limites (attendu 1..={len})")]
    InvalidIndex { index: usize, len: usize },

    /// Un jeton non numérique ne correspond à aucun attribut.
    #[error("attribut inconnu '{name}'")]
    UnknownAttribute { name: String },

    /// Une opération demande un schéma de base qui n'existe pas encore.
    #[error("état préalable manquant : {what}")]
    MissingPrerequisiteState { what: String },

    /// L'univers est limité à la largeur du masque de bits.
    #[error("trop d'attributs : {count} (maximum {max})")]
    TooManyAttributes { count: usize, max: usize },

    /// L'énumération des sous-ensembles dépasserait la limite configurée.
    #[error("énumération refusée : {attrs} attributs, limite configurée à {limit}")]
    EnumerationLimit { attrs: usize, limit: usize },

    /// Aucune table fournie pour une décomposition.
    #[error("décomposition vide : aucune table fournie")]
    EmptyDecomposition,

    /// La portée (sous-relation analysée) est vide ou sort du schéma.
    #[error("portée invalide : {reason}")]
    InvalidScope { reason: String },

    #[error("configuration invalide : {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl NormError {
    /// Raccourci pour `MissingPrerequisiteState`.
    pub fn missing(what: impl Into<String>) -> Self {
        NormError::MissingPrerequisiteState { what: what.into() }
    }

    /// Vrai si l'erreur vient d'un jeton mal résolu (index ou nom).
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            NormError::InvalidIndex { .. } | NormError::UnknownAttribute { .. }
        )
    }
}

pub type NormResult<T> = Result<T, NormError>;
