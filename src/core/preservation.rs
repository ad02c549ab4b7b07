// =============================================================================
// PRESERVATION — Préservation des dépendances
// =============================================================================
//
// Une décomposition préserve les dépendances si l'union des projections
// de F sur chaque sous-schéma suffit à retrouver F :
//
//   (π_R1(F) ∪ ... ∪ π_Rk(F))⁺  ⊇  F
//
// Autrement dit, on peut vérifier chaque contrainte de F localement, table
// par table, sans jamais refaire la jointure.
//
// CONTRE-EXEMPLE :
//   R = {A, B, C}, F = {A,B → C ; C → B}, décomposition {A, C}, {B, C}
//   Projections : {C → B}. A,B → C est perdue.
//
// =============================================================================

use super::attribute::AttrSet;
use super::closure::implies;
use super::fd::{self, Fd};
use super::projection::project_and_minimize;

/// Vrai si chaque dépendance de `original` est impliquée par `projected`.
///
/// S'arrête à la première dépendance manquante.
pub fn check_dependency_preserving(original: &[Fd], projected: &[Fd]) -> bool {
    original.iter().all(|fd| implies(projected, fd))
}

/// Les dépendances de `original` qui ne sont PAS impliquées par `projected`.
pub fn missing_fds(original: &[Fd], projected: &[Fd]) -> Vec<Fd> {
    original
        .iter()
        .filter(|fd| !implies(projected, fd))
        .copied()
        .collect()
}

/// L'union dédoublonnée des projections réduites de `fds` sur chaque table.
pub fn projected_union(tables: &[AttrSet], fds: &[Fd]) -> Vec<Fd> {
    fd::dedup(
        tables
            .iter()
            .flat_map(|table| project_and_minimize(*table, fds)),
    )
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    const A: usize = 0;
    const B: usize = 1;
    const C: usize = 2;

    fn set(idx: &[usize]) -> AttrSet {
        AttrSet::from_indices(idx.iter().copied())
    }

    fn fd(lhs: &[usize], rhs: &[usize]) -> Fd {
        Fd::new(set(lhs), set(rhs))
    }

    #[test]
    fn test_chain_decomposition_preserves() {
        let fds = vec![fd(&[A], &[B]), fd(&[B], &[C])];
        let union = projected_union(&[set(&[A, B]), set(&[B, C])], &fds);
        assert!(check_dependency_preserving(&fds, &union));
        assert!(missing_fds(&fds, &union).is_empty());
    }

    #[test]
    fn test_lost_dependency_is_reported() {
        let fds = vec![fd(&[A, B], &[C]), fd(&[C], &[B])];
        let union = projected_union(&[set(&[A, C]), set(&[B, C])], &fds);
        assert!(!check_dependency_preserving(&fds, &union));
        assert_eq!(missing_fds(&fds, &union), vec![fd(&[A, B], &[C])]);
    }

    #[test]
    fn test_implied_through_other_tables() {
        // A → C n'est dans aucune table, mais A → B et B → C l'impliquent.
        let fds = vec![fd(&[A], &[B]), fd(&[B], &[C]), fd(&[A], &[C])];
        let union = projected_union(&[set(&[A, B]), set(&[B, C])], &fds);
        assert!(check_dependency_preserving(&fds, &union));
    }

    #[test]
    fn test_empty_original_is_preserved() {
        assert!(check_dependency_preserving(&[], &[]));
    }
}
