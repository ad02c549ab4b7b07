// =============================================================================
// NORMRUST — Moteur de normalisation relationnelle en Rust
// =============================================================================
//
// normrust implémente la théorie de la conception de schémas relationnels :
// fermetures d'attributs, formes normales jusqu'à BCNF, projection de
// dépendances sur une décomposition, test de jointure sans perte (chase)
// et préservation des dépendances.
//
// Architecture :
//   core/     → Le cœur pur (aucune E/S, aucun état entre deux appels)
//   parse     → La frontière texte (en-têtes, listes, dépendances)
//   session   → L'historique pas à pas des décompositions
//   report/   → Rendu des analyses (texte, JSON)
//   config    → Réglages des analyses
//   error     → Les erreurs de la frontière
//
// Concepts fondamentaux :
//   Schema        = un univers d'attributs R + des dépendances F
//   X⁺            = tout ce que X détermine sous F
//   Decomposition = un découpage de R en tables
//   Chase         = le test de jointure sans perte par tableau
//
// =============================================================================

pub mod config;
pub mod core;
pub mod error;
pub mod parse;
pub mod report;
pub mod session;

pub use crate::config::{Config, DerivedFdMode};
pub use crate::core::attribute::{AttrSet, Universe};
pub use crate::core::fd::Fd;
pub use crate::core::schema::{Decomposition, Schema};
pub use crate::error::{NormError, NormResult};
