// =============================================================================
// PROJECTION — Projection de dépendances et réduction des LHS
// =============================================================================
//
// Quand on découpe un schéma R en sous-schémas R1, R2..., chaque Ri hérite
// des dépendances de R qui "tiennent" sur ses attributs. Ce ne sont PAS
// seulement les dépendances déclarées dont LHS ∪ RHS ⊆ Ri : il faut toutes
// celles IMPLIQUÉES par F.
//
// EXEMPLE :
//   R = {A, B, C}, F = {A → B, B → C}, Ri = {A, C}
//   Aucune dépendance déclarée ne tient sur {A, C}, et pourtant A → C !
//
// ALGORITHME (projection exacte par fermeture) :
//   Pour chaque sous-ensemble non vide X de Ri :
//     calculer X⁺ sous F, garder (X⁺ ∩ Ri) \ X
//     émettre X → a pour chaque attribut a restant
//   C'est 2^|Ri| - 1 fermetures : exponentiel par nature (le problème est
//   difficile en général), réservé aux petites relations.
//
// Ensuite on RÉDUIT chaque LHS : on retire un attribut tant que la
// fermeture du reste couvre toujours le RHS, en recommençant depuis le
// début après chaque retrait (même stratégie de point fixe que la
// réécriture de chemins : on repart de zéro après chaque modification).
//
// =============================================================================

use super::attribute::AttrSet;
use super::closure::{compute_closure, implies};
use super::fd::{self, Fd, FxIndexSet};

/// Projette `fds` sur `attrs` par énumération des fermetures.
///
/// Chaque dépendance émise est atomique (RHS d'un seul attribut), non
/// triviale, et n'utilise que des attributs de `attrs`.
pub fn project_fds_by_closure(attrs: AttrSet, fds: &[Fd]) -> Vec<Fd> {
    let mut out: FxIndexSet<Fd> = FxIndexSet::default();

    for x in attrs.subsets() {
        let determined = compute_closure(x, fds).intersection(attrs).difference(x);
        for a in determined.iter() {
            out.insert(Fd::new(x, AttrSet::singleton(a)));
        }
    }

    log::trace!(
        "projection sur {} attributs : {} dépendances",
        attrs.len(),
        out.len()
    );
    fd::canonical(out)
}

/// Réduit le LHS de chaque dépendance sous `original`.
///
/// L'ordre d'essai des attributs est l'ordre des index (croissant), ce qui
/// rend le résultat déterministe. C'est une couverture réduite à gauche,
/// pas forcément le minimum global quand plusieurs LHS minimaux existent.
pub fn minimize_lhs_for_fds(fds: &[Fd], original: &[Fd]) -> Vec<Fd> {
    fd::canonical(
        fds.iter()
            .map(|fd| Fd::new(reduce_lhs(fd.lhs, fd.rhs, original), fd.rhs)),
    )
}

/// Projection puis réduction des LHS.
pub fn project_and_minimize(attrs: AttrSet, fds: &[Fd]) -> Vec<Fd> {
    let projected = project_fds_by_closure(attrs, fds);
    minimize_lhs_for_fds(&projected, fds)
}

fn reduce_lhs(mut lhs: AttrSet, rhs: AttrSet, original: &[Fd]) -> AttrSet {
    'restart: while lhs.len() > 1 {
        for a in lhs.iter() {
            let mut reduced = lhs;
            reduced.remove(a);
            if compute_closure(reduced, original).is_superset(rhs) {
                lhs = reduced;
                continue 'restart;
            }
        }
        break;
    }
    lhs
}

/// Couverture minimale : RHS atomiques, LHS réduits, aucune redondance.
///
/// 1. Découper chaque X → Y en X → a
/// 2. Réduire chaque LHS
/// 3. Retirer chaque dépendance impliquée par les autres
pub fn minimal_cover(fds: &[Fd]) -> Vec<Fd> {
    let atomic = fd::canonical(
        fds.iter()
            .flat_map(|fd| fd.split_rhs().collect::<Vec<_>>())
            .filter(|fd| !fd.is_trivial()),
    );
    let mut cover = minimize_lhs_for_fds(&atomic, fds);

    let mut i = 0;
    while i < cover.len() {
        let candidate = cover[i];
        let others: Vec<Fd> = cover
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, fd)| *fd)
            .collect();
        if implies(&others, &candidate) {
            cover.remove(i);
        } else {
            i += 1;
        }
    }
    cover
}
