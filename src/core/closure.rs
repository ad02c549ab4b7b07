// =============================================================================
// CLOSURE — Fermeture d'attributs et dépendances dérivées
// =============================================================================
//
// LA primitive de toute la théorie : la fermeture X⁺ d'un ensemble X sous
// un ensemble de dépendances F. C'est l'ensemble maximal d'attributs qu'on
// peut atteindre depuis X en appliquant F autant de fois que possible.
//
// ALGORITHME (point fixe) :
//   1. closure := X
//   2. Parcourir F : pour chaque L → R avec L ⊆ closure et R ⊄ closure,
//      faire closure := closure ∪ R
//   3. Recommencer tant qu'un parcours a ajouté quelque chose
//
// Chaque parcours non trivial agrandit strictement la fermeture, donc le
// nombre de parcours est borné par |R| (la taille de l'univers).
//
// PROPRIÉTÉS (testées dans tests/closure_properties.rs) :
//   - réflexive   : X ⊆ X⁺
//   - monotone    : X ⊆ Y ⇒ X⁺ ⊆ Y⁺
//   - idempotente : (X⁺)⁺ = X⁺
//
// Ce module contient aussi `find_transitive_fds`, une notion DIFFÉRENTE et
// plus faible de "dépendance dérivée" (chaînage par égalité exacte), gardée
// pour l'affichage. Voir sa documentation.
//
// =============================================================================

use rustc_hash::FxHashSet;

use super::attribute::AttrSet;
use super::fd::{self, Fd, FxIndexSet};

/// Calcule la fermeture X⁺ de `x` sous `fds`.
pub fn compute_closure(x: AttrSet, fds: &[Fd]) -> AttrSet {
    let mut closure = x;
    loop {
        let mut changed = false;
        for fd in fds {
            if fd.lhs.is_subset(closure) && !fd.rhs.is_subset(closure) {
                closure = closure.union(fd.rhs);
                changed = true;
            }
        }
        if !changed {
            return closure;
        }
    }
}

/// X est une super-clé de `attrs` : X⁺ ⊇ attrs.
pub fn is_superkey(x: AttrSet, attrs: AttrSet, fds: &[Fd]) -> bool {
    compute_closure(x, fds).is_superset(attrs)
}

/// F ⊨ X → Y
pub fn implies(fds: &[Fd], candidate: &Fd) -> bool {
    compute_closure(candidate.lhs, fds).is_superset(candidate.rhs)
}

/// F couvre G : chaque dépendance de G est impliquée par F.
pub fn covers(f: &[Fd], g: &[Fd]) -> bool {
    g.iter().all(|fd| implies(f, fd))
}

/// F et G ont la même fermeture.
pub fn equivalent(f: &[Fd], g: &[Fd]) -> bool {
    covers(f, g) && covers(g, f)
}

/// Dépendances "observables" obtenues par chaînage transitif.
///
/// On maintient un ensemble de dépendances connues (initialisé avec F) et
/// une liste de travail des nouvelles trouvailles (initialisée avec F).
/// À chaque tour, pour chaque nouvelle A → B et chaque connue C → D :
///   - si B = C exactement, on synthétise A → D
///   - si D = A exactement, on synthétise C → B
/// Les synthèses inédites alimentent le tour suivant. On s'arrête quand un
/// tour ne produit plus rien.
///
/// ATTENTION : c'est un chaînage par ÉGALITÉ D'ENSEMBLES, plus faible que
/// l'implication logique. Avec F = {A → B, B,C → D}, on n'obtient jamais
/// A,C → D. Cette fonction sert uniquement à montrer "ce qui a été déduit" ;
/// tout raisonnement passe par `compute_closure`.
///
/// Le résultat exclut F lui-même et les dépendances triviales.
pub fn find_transitive_fds(fds: &[Fd]) -> Vec<Fd> {
    let mut known: FxHashSet<Fd> = fds.iter().copied().collect();
    let mut newly_found: Vec<Fd> = fd::dedup(fds.iter().copied());
    let mut transitive: FxIndexSet<Fd> = FxIndexSet::default();

    while !newly_found.is_empty() {
        let mut found_this_round: FxIndexSet<Fd> = FxIndexSet::default();

        for new_fd in &newly_found {
            for existing in &known {
                // A → B, B → D  ⟹  A → D
                if new_fd.rhs == existing.lhs {
                    let candidate = Fd::new(new_fd.lhs, existing.rhs);
                    if !known.contains(&candidate) {
                        found_this_round.insert(candidate);
                    }
                }
                // C → A, A → B  ⟹  C → B
                if existing.rhs == new_fd.lhs {
                    let candidate = Fd::new(existing.lhs, new_fd.rhs);
                    if !known.contains(&candidate) {
                        found_this_round.insert(candidate);
                    }
                }
            }
        }

        newly_found = found_this_round.into_iter().collect();
        known.extend(newly_found.iter().copied());
        transitive.extend(newly_found.iter().copied());
    }

    fd::canonical(transitive.into_iter().filter(|fd| !fd.is_trivial()))
}
