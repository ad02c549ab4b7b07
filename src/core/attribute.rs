// =============================================================================
// ATTRIBUTE — Attributs, univers et ensembles d'attributs (bitsets)
// =============================================================================
//
// Un attribut est un simple NOM (identité par valeur, sensible à la casse).
// Mais les algorithmes de normalisation passent leur temps à faire de
// l'algèbre d'ensembles : union, inclusion, différence... et surtout à
// ÉNUMÉRER des sous-ensembles (2^n pour la projection et BCNF).
//
// On sépare donc deux choses :
//   - l'UNIVERS : la liste ordonnée des noms (ordre d'insertion = ordre
//     positionnel, utilisé pour résoudre les index 1-based de la frontière)
//   - l'ATTRSET : un masque de bits sur les index de l'univers
//
// EXEMPLE :
//   Univers = [A, B, C, D]
//   {A, C}  = 0b0101
//   {B, D}  = 0b1010
//   {A, C} ∪ {B, D} = 0b1111 = tout l'univers
//
// Ainsi l'égalité, le hachage et l'inclusion sont des opérations O(1),
// et l'énumération des sous-ensembles devient un simple décrément masqué.
//
// =============================================================================

use std::borrow::Borrow;
use std::fmt;

use indexmap::IndexSet;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::{NormError, NormResult};

/// Largeur du masque : nombre maximal d'attributs dans un univers.
pub const MAX_ATTRIBUTES: usize = 64;

/// Un attribut = un nom de colonne.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
}

impl Attribute {
    pub fn new(name: &str) -> Self {
        Attribute { name: name.to_string() }
    }
}

impl Borrow<str> for Attribute {
    fn borrow(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Un ensemble d'attributs, représenté par un masque de bits.
///
/// Le bit i est à 1 si l'attribut d'index i de l'univers est présent.
/// Le type est `Copy` : toutes les opérations retournent une nouvelle valeur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AttrSet(u64);

impl AttrSet {
    /// L'ensemble vide.
    pub const fn empty() -> Self {
        AttrSet(0)
    }

    /// Les `n` premiers attributs de l'univers.
    pub fn full(n: usize) -> Self {
        if n >= MAX_ATTRIBUTES {
            AttrSet(u64::MAX)
        } else {
            AttrSet((1u64 << n) - 1)
        }
    }

    pub const fn from_bits(bits: u64) -> Self {
        AttrSet(bits)
    }

    pub fn singleton(index: usize) -> Self {
        debug_assert!(index < MAX_ATTRIBUTES);
        AttrSet(1u64 << index)
    }

    pub fn from_indices<I: IntoIterator<Item = usize>>(indices: I) -> Self {
        let mut set = AttrSet::empty();
        for i in indices {
            set.insert(i);
        }
        set
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    pub fn contains(self, index: usize) -> bool {
        index < MAX_ATTRIBUTES && (self.0 >> index) & 1 != 0
    }

    pub fn insert(&mut self, index: usize) {
        debug_assert!(index < MAX_ATTRIBUTES);
        self.0 |= 1u64 << index;
    }

    pub fn remove(&mut self, index: usize) {
        if index < MAX_ATTRIBUTES {
            self.0 &= !(1u64 << index);
        }
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn union(self, other: AttrSet) -> AttrSet {
        AttrSet(self.0 | other.0)
    }

    pub fn intersection(self, other: AttrSet) -> AttrSet {
        AttrSet(self.0 & other.0)
    }

    pub fn difference(self, other: AttrSet) -> AttrSet {
        AttrSet(self.0 & !other.0)
    }

    /// self ⊆ other
    pub fn is_subset(self, other: AttrSet) -> bool {
        self.0 & !other.0 == 0
    }

    /// self ⊇ other
    pub fn is_superset(self, other: AttrSet) -> bool {
        other.is_subset(self)
    }

    /// self ⊊ other
    pub fn is_strict_subset(self, other: AttrSet) -> bool {
        self != other && self.is_subset(other)
    }

    /// Les index présents, par ordre croissant.
    pub fn iter(self) -> AttrIter {
        AttrIter(self.0)
    }

    /// Tous les sous-ensembles NON VIDES, l'ensemble lui-même compris.
    ///
    /// Énumération classique des sous-masques : `sub = (sub - 1) & mask`.
    /// L'ordre est décroissant (en valeur de masque), l'ensemble vide
    /// n'est jamais produit. Coût : 2^|self| - 1 éléments.
    pub fn subsets(self) -> Subsets {
        Subsets {
            mask: self.0,
            next: if self.0 == 0 { None } else { Some(self.0) },
        }
    }

    /// Les sous-ensembles non vides STRICTS (self exclu).
    pub fn proper_subsets(self) -> impl Iterator<Item = AttrSet> {
        self.subsets().filter(move |s| *s != self)
    }
}

impl FromIterator<usize> for AttrSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        AttrSet::from_indices(iter)
    }
}

/// Itérateur sur les index d'un `AttrSet` (bit de poids faible d'abord).
pub struct AttrIter(u64);

impl Iterator for AttrIter {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.0 == 0 {
            return None;
        }
        let index = self.0.trailing_zeros() as usize;
        self.0 &= self.0 - 1;
        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.0.count_ones() as usize;
        (n, Some(n))
    }
}

impl ExactSizeIterator for AttrIter {}

/// Itérateur sur les sous-ensembles non vides d'un masque.
pub struct Subsets {
    mask: u64,
    next: Option<u64>,
}

impl Iterator for Subsets {
    type Item = AttrSet;

    fn next(&mut self) -> Option<AttrSet> {
        let current = self.next?;
        let following = current.wrapping_sub(1) & self.mask;
        self.next = if following == 0 { None } else { Some(following) };
        Some(AttrSet(current))
    }
}

/// L'univers : la liste ordonnée et dédoublonnée des attributs connus.
///
/// L'ordre d'insertion est l'ordre positionnel (colonne 1, 2, 3...).
/// Pour l'affichage, les noms sont triés lexicographiquement.
#[derive(Debug, Clone, Default)]
pub struct Universe {
    attrs: IndexSet<Attribute>,
}

impl Universe {
    pub fn new() -> Self {
        Universe { attrs: IndexSet::new() }
    }

    /// Construit un univers à partir d'une liste de noms.
    /// Les doublons sont ignorés (la première occurrence fixe la position).
    pub fn from_names<I, S>(names: I) -> NormResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut universe = Universe::new();
        for name in names {
            universe.add(name.as_ref())?;
        }
        Ok(universe)
    }

    /// Ajoute un attribut et retourne son index (l'index existant s'il est déjà connu).
    pub fn add(&mut self, name: &str) -> NormResult<usize> {
        if let Some(i) = self.attrs.get_index_of(name) {
            return Ok(i);
        }
        if self.attrs.len() >= MAX_ATTRIBUTES {
            return Err(NormError::TooManyAttributes {
                count: self.attrs.len() + 1,
                max: MAX_ATTRIBUTES,
            });
        }
        let (index, _) = self.attrs.insert_full(Attribute::new(name));
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.attrs.get_index_of(name)
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.attrs.get_index(index).map(|a| a.name.as_str())
    }

    /// Tous les attributs de l'univers.
    pub fn all(&self) -> AttrSet {
        AttrSet::full(self.attrs.len())
    }

    /// Résout une position 1-based (convention de la frontière) en index interne.
    pub fn resolve_position(&self, position: usize) -> NormResult<usize> {
        if position == 0 || position > self.attrs.len() {
            return Err(NormError::InvalidIndex {
                index: position,
                len: self.attrs.len(),
            });
        }
        Ok(position - 1)
    }

    /// Construit un `AttrSet` à partir de noms littéraux.
    pub fn set_of<I, S>(&self, names: I) -> NormResult<AttrSet>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = AttrSet::empty();
        for name in names {
            let name = name.as_ref();
            let index = self.index_of(name).ok_or_else(|| NormError::UnknownAttribute {
                name: name.to_string(),
            })?;
            set.insert(index);
        }
        Ok(set)
    }

    /// Les noms d'un ensemble, triés lexicographiquement.
    pub fn names(&self, set: AttrSet) -> Vec<&str> {
        set.iter()
            .filter_map(|i| self.name(i))
            .sorted()
            .collect()
    }

    /// Rendu texte d'un ensemble : `A,B,C`.
    pub fn display_set(&self, set: AttrSet) -> String {
        self.names(set).join(",")
    }

    /// Les attributs dans l'ordre positionnel.
    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attrs.iter()
    }
}

impl fmt::Display for Universe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.attrs.iter().map(|a| a.name.as_str()).join(", "))
    }
}
