// =============================================================================
// CONFIG — Réglages des analyses
// =============================================================================
//
// Deux réglages seulement :
//   - max_enumeration_attrs : au-delà, les analyses qui énumèrent les
//     sous-ensembles (projection, formes normales) refusent de tourner
//   - derived_fds : quelle notion de "dépendance dérivée" afficher
//
// Fichier JSON optionnel, tous les champs ont une valeur par défaut :
//
// ```json
// { "max_enumeration_attrs": 16, "derived_fds": "closure" }
// ```
//
// =============================================================================

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::attribute::MAX_ATTRIBUTES;
use crate::error::{NormError, NormResult};

/// Quelles dépendances "dérivées" montrer à l'utilisateur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DerivedFdMode {
    /// Chaînage par égalité exacte des ensembles (`find_transitive_fds`).
    #[default]
    Chain,
    /// Toutes les dépendances atomiques impliquées par fermeture, hors déclarées.
    Closure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub max_enumeration_attrs: usize,
    pub derived_fds: DerivedFdMode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_enumeration_attrs: 20,
            derived_fds: DerivedFdMode::Chain,
        }
    }
}

impl Config {
    pub fn from_json_str(text: &str) -> NormResult<Self> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> NormResult<Self> {
        let text = std::fs::read_to_string(path)?;
        log::debug!("configuration chargée depuis {}", path.display());
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> NormResult<()> {
        if self.max_enumeration_attrs == 0 || self.max_enumeration_attrs > MAX_ATTRIBUTES {
            return Err(NormError::Config(format!(
                "max_enumeration_attrs doit être entre 1 et {}, reçu {}",
                MAX_ATTRIBUTES, self.max_enumeration_attrs
            )));
        }
        Ok(())
    }

    /// Refuse une énumération sur `attrs` attributs si elle dépasse la limite.
    pub fn check_enumeration(&self, attrs: usize) -> NormResult<()> {
        if attrs > self.max_enumeration_attrs {
            return Err(NormError::EnumerationLimit {
                attrs,
                limit: self.max_enumeration_attrs,
            });
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = Config::default();
        assert_eq!(c.max_enumeration_attrs, 20);
        assert_eq!(c.derived_fds, DerivedFdMode::Chain);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let c = Config::from_json_str(r#"{ "derived_fds": "closure" }"#).unwrap();
        assert_eq!(c.derived_fds, DerivedFdMode::Closure);
        assert_eq!(c.max_enumeration_attrs, 20);
    }

    #[test]
    fn test_invalid_limit() {
        let err = Config::from_json_str(r#"{ "max_enumeration_attrs": 0 }"#).unwrap_err();
        assert!(matches!(err, NormError::Config(_)));
    }

    #[test]
    fn test_enumeration_guard() {
        let c = Config {
            max_enumeration_attrs: 3,
            ..Config::default()
        };
        assert!(c.check_enumeration(3).is_ok());
        assert!(matches!(
            c.check_enumeration(4),
            Err(NormError::EnumerationLimit { attrs: 4, limit: 3 })
        ));
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            Config::from_json_str("{ nope"),
            Err(NormError::Json(_))
        ));
    }
}
