// =============================================================================
// NORMAL FORM — Classification 1NF / 2NF / 3NF / BCNF
// =============================================================================
//
// Les formes normales mesurent "à quel point" les dépendances d'une relation
// sont portées par ses clés :
//
//   1NF  : attributs atomiques (toujours vrai ici : un attribut = un nom)
//   2NF  : aucun attribut non premier ne dépend d'une PARTIE d'une clé
//   3NF  : pour toute X → a non triviale, X est super-clé OU a est premier
//   BCNF : pour toute X → a non triviale, X est super-clé
//
// Un attribut est PREMIER s'il appartient à au moins une clé candidate.
//
// MÉTHODE : énumération exhaustive des sous-ensembles X de la relation et
// calcul de X⁺ ∩ attrs. C'est exact (on voit toutes les dépendances
// impliquées, pas seulement celles déclarées) mais en O(2^n · fermeture).
//
// EXEMPLE :
//   R = {A, B, C}, F = {A → B, B → C}
//   Clé : {A}. B → C avec B non super-clé et C non premier
//   ⟹ pas 3NF, pas BCNF ; pas de clé composée donc 2NF.
//
// =============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

use super::attribute::AttrSet;
use super::closure::compute_closure;
use super::fd::Fd;

/// Les formes normales, ordonnées de la plus faible à la plus forte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NormalForm {
    #[serde(rename = "1NF")]
    First,
    #[serde(rename = "2NF")]
    Second,
    #[serde(rename = "3NF")]
    Third,
    #[serde(rename = "BCNF")]
    BoyceCodd,
}

impl NormalForm {
    /// Description courte (affichée en infobulle dans les rapports).
    pub fn description(self) -> &'static str {
        match self {
            NormalForm::First => "Première forme normale : attributs atomiques",
            NormalForm::Second => "Deuxième forme normale : aucune dépendance partielle",
            NormalForm::Third => "Troisième forme normale : aucune dépendance transitive",
            NormalForm::BoyceCodd => "Forme normale de Boyce-Codd : tout déterminant est une super-clé",
        }
    }
}

impl fmt::Display for NormalForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NormalForm::First => "1NF",
            NormalForm::Second => "2NF",
            NormalForm::Third => "3NF",
            NormalForm::BoyceCodd => "BCNF",
        };
        write!(f, "{}", label)
    }
}

/// X⁺ restreint à la relation.
fn implied_within(x: AttrSet, attrs: AttrSet, fds: &[Fd]) -> AttrSet {
    compute_closure(x, fds).intersection(attrs)
}

/// Les clés candidates de `attrs` : super-clés minimales pour l'inclusion.
///
/// Une relation vide a pour seule clé l'ensemble vide.
pub fn candidate_keys(attrs: AttrSet, fds: &[Fd]) -> Vec<AttrSet> {
    if attrs.is_empty() {
        return vec![AttrSet::empty()];
    }

    let mut superkeys: Vec<AttrSet> = attrs
        .subsets()
        .filter(|x| implied_within(*x, attrs, fds) == attrs)
        .collect();
    // Les plus petites d'abord : une super-clé est minimale si aucune clé
    // déjà retenue n'est incluse dedans.
    superkeys.sort_by_key(|k| (k.len(), *k));

    let mut keys: Vec<AttrSet> = Vec::new();
    for sk in superkeys {
        if !keys.iter().any(|k| k.is_subset(sk)) {
            keys.push(sk);
        }
    }
    keys
}

/// L'union des clés candidates.
pub fn prime_attributes(attrs: AttrSet, fds: &[Fd]) -> AttrSet {
    candidate_keys(attrs, fds)
        .into_iter()
        .fold(AttrSet::empty(), AttrSet::union)
}

/// Test BCNF exhaustif.
///
/// Pour chaque sous-ensemble non vide STRICT X de `attrs` (X = attrs est
/// ignoré), on calcule X⁺ ∩ attrs. Si X détermine quelque chose de plus
/// que lui-même, X doit être super-clé ; sinon on répond `false` tout de suite.
pub fn is_bcnf(attrs: AttrSet, fds: &[Fd]) -> bool {
    for x in attrs.proper_subsets() {
        let implied = implied_within(x, attrs, fds);
        if implied != x && implied != attrs {
            return false;
        }
    }
    true
}

/// Les déterminants qui violent BCNF, sous la forme X → (X⁺ ∩ attrs) \ X.
///
/// Seuls les déterminants MINIMAUX sont retenus (si X viole BCNF, ses
/// sur-ensembles non super-clés le violent aussi, sans rien apprendre).
pub fn bcnf_violations(attrs: AttrSet, fds: &[Fd]) -> Vec<Fd> {
    let mut violating: Vec<Fd> = attrs
        .proper_subsets()
        .filter_map(|x| {
            let implied = implied_within(x, attrs, fds);
            (implied != x && implied != attrs).then(|| Fd::new(x, implied.difference(x)))
        })
        .collect();
    violating.sort_by_key(|fd| (fd.lhs.len(), *fd));

    let mut minimal: Vec<Fd> = Vec::new();
    for v in violating {
        if !minimal.iter().any(|m| m.lhs.is_subset(v.lhs)) {
            minimal.push(v);
        }
    }
    minimal.sort();
    minimal
}

/// 2NF : aucun attribut non premier ne dépend d'une partie stricte d'une clé.
pub fn is_2nf(attrs: AttrSet, fds: &[Fd]) -> bool {
    let keys = candidate_keys(attrs, fds);
    let non_prime = attrs.difference(keys.iter().fold(AttrSet::empty(), |acc, k| acc.union(*k)));
    if non_prime.is_empty() {
        return true;
    }

    keys.iter().all(|key| {
        key.proper_subsets().all(|part| {
            let dependents = implied_within(part, attrs, fds).difference(part);
            dependents.intersection(non_prime).is_empty()
        })
    })
}

/// 3NF : toute X → a non triviale a X super-clé ou a premier.
pub fn is_3nf(attrs: AttrSet, fds: &[Fd]) -> bool {
    let prime = prime_attributes(attrs, fds);
    let non_prime = attrs.difference(prime);
    if non_prime.is_empty() {
        return true;
    }

    attrs.proper_subsets().all(|x| {
        let implied = implied_within(x, attrs, fds);
        implied == attrs || implied.difference(x).intersection(non_prime).is_empty()
    })
}

/// La forme normale la plus forte satisfaite par `attrs` sous `fds`.
pub fn check_normal_form(attrs: AttrSet, fds: &[Fd]) -> NormalForm {
    if is_bcnf(attrs, fds) {
        NormalForm::BoyceCodd
    } else if is_3nf(attrs, fds) {
        NormalForm::Third
    } else if is_2nf(attrs, fds) {
        NormalForm::Second
    } else {
        NormalForm::First
    }
}

/// Tout ce qu'on sait d'une relation du point de vue des formes normales.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalFormReport {
    pub form: NormalForm,
    pub candidate_keys: Vec<AttrSet>,
    pub prime: AttrSet,
    pub violations: Vec<Fd>,
}

pub fn analyze_normal_form(attrs: AttrSet, fds: &[Fd]) -> NormalFormReport {
    let candidate_keys = candidate_keys(attrs, fds);
    let prime = candidate_keys.iter().fold(AttrSet::empty(), |acc, k| acc.union(*k));
    NormalFormReport {
        form: check_normal_form(attrs, fds),
        candidate_keys,
        prime,
        violations: bcnf_violations(attrs, fds),
    }
}
