// =============================================================================
// FD — Les dépendances fonctionnelles
// =============================================================================
//
// Une dépendance fonctionnelle X → Y dit : "les valeurs de X déterminent
// celles de Y". C'est la contrainte centrale de la théorie de la
// normalisation, l'équivalent des équations de chemins pour un schéma
// relationnel plat.
//
// FORME CANONIQUE :
//   LHS et RHS sont des AttrSet (masques de bits), donc l'égalité et le
//   hachage dépendent du CONTENU et jamais de l'ordre de construction :
//     {B, A} → {C}  ==  {A, B} → {C}
//
// TRIVIALITÉ :
//   X → Y est triviale si Y ⊆ X (ex: A,B → A). Valide comme valeur
//   intermédiaire, mais jamais affichée comme dépendance "dérivée".
//
// =============================================================================

use std::fmt;

use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;

use super::attribute::{AttrSet, Universe};

/// Ensemble ordonné par insertion, haché avec Fx.
pub type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;

/// Une dépendance fonctionnelle X → Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fd {
    pub lhs: AttrSet,
    pub rhs: AttrSet,
}

impl Fd {
    pub fn new(lhs: AttrSet, rhs: AttrSet) -> Self {
        Fd { lhs, rhs }
    }

    /// Y ⊆ X
    pub fn is_trivial(&self) -> bool {
        self.rhs.is_subset(self.lhs)
    }

    /// X ∪ Y
    pub fn attributes(&self) -> AttrSet {
        self.lhs.union(self.rhs)
    }

    /// La dépendance ne mentionne que des attributs de `scope`.
    pub fn is_within(&self, scope: AttrSet) -> bool {
        self.attributes().is_subset(scope)
    }

    /// Découpe X → {A, B} en X → A, X → B.
    pub fn split_rhs(&self) -> impl Iterator<Item = Fd> + '_ {
        self.rhs.iter().map(move |a| Fd::new(self.lhs, AttrSet::singleton(a)))
    }

    /// Vue affichable avec les noms de l'univers : `A,B→C`.
    pub fn display<'a>(&'a self, universe: &'a Universe) -> FdDisplay<'a> {
        FdDisplay { fd: self, universe }
    }
}

/// Adaptateur d'affichage d'une dépendance (les noms vivent dans l'univers).
pub struct FdDisplay<'a> {
    fd: &'a Fd,
    universe: &'a Universe,
}

impl fmt::Display for FdDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}→{}",
            self.universe.display_set(self.fd.lhs),
            self.universe.display_set(self.fd.rhs)
        )
    }
}

/// Dédoublonne en conservant l'ordre de première apparition.
pub fn dedup<I: IntoIterator<Item = Fd>>(fds: I) -> Vec<Fd> {
    fds.into_iter().collect::<FxIndexSet<Fd>>().into_iter().collect()
}

/// Dédoublonne puis trie (ordre canonique des masques).
pub fn canonical<I: IntoIterator<Item = Fd>>(fds: I) -> Vec<Fd> {
    let mut out = dedup(fds);
    out.sort();
    out
}

/// L'union de tous les attributs mentionnés par une liste de dépendances.
pub fn attributes_of(fds: &[Fd]) -> AttrSet {
    fds.iter().fold(AttrSet::empty(), |acc, fd| acc.union(fd.attributes()))
}

/// Rendu texte d'une liste : `A→B; B→C`, trié par texte.
pub fn display_list(fds: &[Fd], universe: &Universe) -> String {
    let mut rendered: Vec<String> = fds.iter().map(|fd| fd.display(universe).to_string()).collect();
    rendered.sort();
    rendered.join("; ")
}
