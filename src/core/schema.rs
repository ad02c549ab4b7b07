// =============================================================================
// SCHEMA — Une relation universelle et sa décomposition
// =============================================================================
//
// Un Schema est la donnée de :
//   - un UNIVERS d'attributs R (ordonné : l'ordre de l'en-tête)
//   - un ensemble F de dépendances fonctionnelles sur R
//
// Une Decomposition découpe R en tables nommées R1, R2, ... dont chacune
// est un sous-ensemble d'attributs. Les dépendances d'une table ne sont
// jamais stockées : elles se DÉDUISENT de F par projection.
//
// EXEMPLE VISUEL :
//
//   Commande(client, ville, produit, prix)
//   F = { client → ville ; produit → prix }
//
//        ┌──────────────┐     ┌───────────────┐     ┌─────────────────┐
//        │ client ville │     │ produit prix  │     │ client produit  │
//        └──────────────┘     └───────────────┘     └─────────────────┘
//
// En texte :
//
// ```text
// schema Commande = literal {
//   attributes
//     client, ville, produit, prix
//   dependencies
//     client→ville
//     produit→prix
// }
// ```
//
// =============================================================================

use std::fmt;

use crate::error::NormResult;

use super::attribute::{AttrSet, Universe};
use super::chase;
use super::fd::{self, Fd};

/// Le schéma de base : un univers d'attributs et ses dépendances.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub name: String,
    pub universe: Universe,
    pub fds: Vec<Fd>,
}

impl Schema {
    pub fn new(name: &str) -> Self {
        Schema {
            name: name.to_string(),
            universe: Universe::new(),
            fds: Vec::new(),
        }
    }

    /// Construit directement depuis un univers et des dépendances résolues.
    pub fn from_parts(name: &str, universe: Universe, fds: Vec<Fd>) -> Self {
        Schema {
            name: name.to_string(),
            universe,
            fds: fd::dedup(fds),
        }
    }

    /// Ajoute un attribut à la fin de l'ordre (sans effet s'il existe déjà).
    pub fn add_attribute(&mut self, name: &str) -> NormResult<&mut Self> {
        self.universe.add(name)?;
        Ok(self)
    }

    pub fn with_attributes(&mut self, names: &[&str]) -> NormResult<&mut Self> {
        for name in names {
            self.add_attribute(name)?;
        }
        Ok(self)
    }

    /// Ajoute X → Y par noms d'attributs (déjà déclarés).
    pub fn add_fd(&mut self, lhs: &[&str], rhs: &[&str]) -> NormResult<&mut Self> {
        let fd = self.fd(lhs, rhs)?;
        if !self.fds.contains(&fd) {
            self.fds.push(fd);
        }
        Ok(self)
    }

    /// Résout X → Y sans l'ajouter.
    pub fn fd(&self, lhs: &[&str], rhs: &[&str]) -> NormResult<Fd> {
        Ok(Fd::new(self.set(lhs)?, self.set(rhs)?))
    }

    /// Résout une liste de noms en masque.
    pub fn set(&self, names: &[&str]) -> NormResult<AttrSet> {
        self.universe.set_of(names.iter().copied())
    }

    /// R tout entier.
    pub fn attrs(&self) -> AttrSet {
        self.universe.all()
    }

    pub fn attribute_count(&self) -> usize {
        self.universe.len()
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "schema {} = literal {{", self.name)?;
        writeln!(f, "  attributes")?;
        let names: Vec<&str> = self.universe.iter().map(|a| a.name.as_str()).collect();
        writeln!(f, "    {}", names.join(", "))?;

        if !self.fds.is_empty() {
            writeln!(f, "  dependencies")?;
            for dep in &self.fds {
                writeln!(f, "    {}", dep.display(&self.universe))?;
            }
        }
        write!(f, "}}")
    }
}

/// Une table d'une décomposition : un nom et ses attributs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub attrs: AttrSet,
}

impl Table {
    pub fn new(name: &str, attrs: AttrSet) -> Self {
        Table {
            name: name.to_string(),
            attrs,
        }
    }
}

/// Un découpage de R en tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decomposition {
    pub tables: Vec<Table>,
}

impl Decomposition {
    pub fn new() -> Self {
        Decomposition { tables: Vec::new() }
    }

    /// Tables nommées R1, R2, ... dans l'ordre donné.
    pub fn from_sets<I: IntoIterator<Item = AttrSet>>(sets: I) -> Self {
        let tables = sets
            .into_iter()
            .enumerate()
            .map(|(i, attrs)| Table::new(&format!("R{}", i + 1), attrs))
            .collect();
        Decomposition { tables }
    }

    pub fn add_table(&mut self, name: &str, attrs: AttrSet) -> &mut Self {
        self.tables.push(Table::new(name, attrs));
        self
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn sets(&self) -> Vec<AttrSet> {
        self.tables.iter().map(|t| t.attrs).collect()
    }

    /// Les tables triées par leur rendu "A,B" : ordre stable pour le chase.
    /// Chaque table garde son nom d'origine.
    pub fn sorted_tables(&self, universe: &Universe) -> Vec<&Table> {
        let mut tables: Vec<&Table> = self.tables.iter().collect();
        tables.sort_by_cached_key(|t| universe.display_set(t.attrs));
        tables
    }

    /// L'union des attributs de toutes les tables.
    pub fn union(&self) -> AttrSet {
        self.tables
            .iter()
            .fold(AttrSet::empty(), |acc, t| acc.union(t.attrs))
    }

    /// Les tables recouvrent-elles `r` ?
    pub fn covers(&self, r: AttrSet) -> bool {
        self.union().is_superset(r)
    }

    /// Les attributs présents dans au moins deux tables.
    pub fn shared_attributes(&self) -> AttrSet {
        chase::shared_attributes(self.union(), &self.sets())
    }

    /// Vue affichable avec les noms de l'univers.
    pub fn display<'a>(&'a self, universe: &'a Universe) -> DecompositionDisplay<'a> {
        DecompositionDisplay {
            decomposition: self,
            universe,
        }
    }
}

pub struct DecompositionDisplay<'a> {
    decomposition: &'a Decomposition,
    universe: &'a Universe,
}

impl fmt::Display for DecompositionDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .decomposition
            .tables
            .iter()
            .map(|t| format!("{}({})", t.name, self.universe.display_set(t.attrs)))
            .collect();
        write!(f, "{}", parts.join(" ⋈ "))
    }
}
