// =============================================================================
// CORE — Le cœur de la théorie de la normalisation
// =============================================================================
//
// Ce module regroupe toute la logique pure, sans E/S ni état partagé :
// uniquement des ensembles d'attributs et des dépendances fonctionnelles.
//
// Architecture (des feuilles vers la racine) :
//   attribute    → attributs, univers ordonné, AttrSet (masque de bits)
//   fd           → la dépendance X → Y en forme canonique
//   closure      → X⁺, implication, chaînage "observable"
//   projection   → π_S(F) par fermeture, réduction des LHS, couverture minimale
//   normal_form  → clés candidates, 1NF / 2NF / 3NF / BCNF
//   chase        → test de jointure sans perte par tableau
//   preservation → préservation des dépendances
//   schema       → schéma de base et décompositions
//   validate     → vérification de cohérence
//   analysis     → analyses complètes (résumé, projection, décomposition)
//
// =============================================================================

pub mod attribute;
pub mod fd;
pub mod closure;
pub mod projection;
pub mod normal_form;
pub mod chase;
pub mod preservation;
pub mod schema;
pub mod validate;
pub mod analysis;
