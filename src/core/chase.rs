// =============================================================================
// CHASE — Test de jointure sans perte par tableau
// =============================================================================
//
// Une décomposition {R1, ..., Rk} de R est SANS PERTE si la jointure
// naturelle des projections redonne toujours exactement la relation de
// départ, pour toute instance qui satisfait F.
//
// TABLEAU :
//   Une ligne par sous-schéma Ri, une colonne par attribut de R.
//   Case (i, a) = symbole DISTINGUÉ "a" si a ∈ Ri,
//                 symbole NON DISTINGUÉ propre à la ligne sinon.
//
//   Exemple : R = {A, B, C}, décomposition {A, B}, {A, C}
//
//            A     B     C
//     R1    a1    a2    b1.3
//     R2    a1    b2.2  a3
//
// ALGORITHME (chase) :
//   Pour chaque dépendance X → Y :
//     grouper les lignes qui ont les MÊMES symboles sur X
//     dans chaque groupe, unifier les symboles de chaque colonne de Y
//     (le distingué gagne ; sinon le plus petit symbole)
//   Répéter jusqu'au point fixe.
//
//   Unifier = renommer TOUTES les occurrences du symbole perdant dans la
//   colonne, pas seulement celles du groupe (égalité de valeurs).
//
//   Sans perte ⟺ une ligne ne contient plus que des symboles distingués.
//
// Sur l'exemple : A → B groupe R1 et R2 (même a1), la case (R2, B) devient
// a2, et R2 = (a1, a2, a3) : sans perte.
//
// =============================================================================

use std::fmt;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use super::attribute::{AttrSet, Universe};
use super::closure::compute_closure;
use super::fd::Fd;

/// Un symbole du tableau. L'ordre fait gagner le distingué à l'unification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    /// Valeur de la relation cible en colonne `col` : a_col.
    Distinguished(usize),
    /// Valeur propre à la case (ligne, colonne) d'origine : b_ligne.col.
    NonDistinguished(usize, usize),
}

impl Symbol {
    pub fn is_distinguished(self) -> bool {
        matches!(self, Symbol::Distinguished(_))
    }
}

/// Le tableau du chase : lignes = sous-schémas, colonnes = attributs de R.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tableau {
    /// Index des attributs de R, par ordre croissant.
    columns: Vec<usize>,
    rows: Vec<Vec<Symbol>>,
}

impl Tableau {
    /// Construit le tableau initial. Les attributs d'un sous-schéma hors de
    /// `r` sont ignorés.
    pub fn new(r: AttrSet, schemas: &[AttrSet]) -> Self {
        let columns: Vec<usize> = r.iter().collect();
        let rows = schemas
            .iter()
            .enumerate()
            .map(|(i, schema)| {
                columns
                    .iter()
                    .enumerate()
                    .map(|(j, &a)| {
                        if schema.contains(a) {
                            Symbol::Distinguished(j)
                        } else {
                            Symbol::NonDistinguished(i, j)
                        }
                    })
                    .collect()
            })
            .collect();
        Tableau { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn symbol(&self, row: usize, column: usize) -> Option<Symbol> {
        self.rows.get(row).and_then(|r| r.get(column)).copied()
    }

    fn position(&self, attr: usize) -> Option<usize> {
        self.columns.binary_search(&attr).ok()
    }

    /// Applique une dépendance une fois. Retourne vrai si une case a changé.
    ///
    /// Une dépendance dont le LHS sort de R est ignorée ; les attributs du
    /// RHS hors de R aussi.
    pub fn apply_fd(&mut self, fd: &Fd) -> bool {
        let lhs_cols: Option<Vec<usize>> = fd.lhs.iter().map(|a| self.position(a)).collect();
        let Some(lhs_cols) = lhs_cols else {
            return false;
        };
        let rhs_cols: Vec<usize> = fd.rhs.iter().filter_map(|a| self.position(a)).collect();

        let mut groups: IndexMap<Vec<Symbol>, Vec<usize>, FxBuildHasher> = IndexMap::default();
        for (i, row) in self.rows.iter().enumerate() {
            let key: Vec<Symbol> = lhs_cols.iter().map(|&c| row[c]).collect();
            groups.entry(key).or_default().push(i);
        }

        let mut changed = false;
        for members in groups.values().filter(|m| m.len() > 1) {
            for &col in &rhs_cols {
                changed |= self.unify(members, col);
            }
        }
        changed
    }

    /// Unifie la colonne `col` des lignes `members`.
    fn unify(&mut self, members: &[usize], col: usize) -> bool {
        let Some(winner) = members.iter().map(|&i| self.rows[i][col]).min() else {
            return false;
        };
        let losers: Vec<Symbol> = members
            .iter()
            .map(|&i| self.rows[i][col])
            .filter(|s| *s != winner)
            .collect();
        if losers.is_empty() {
            return false;
        }

        for row in &mut self.rows {
            if losers.contains(&row[col]) {
                row[col] = winner;
            }
        }
        true
    }

    /// Applique `fds` jusqu'au point fixe. Retourne le nombre de passes.
    pub fn chase(&mut self, fds: &[Fd]) -> usize {
        let mut passes = 0;
        loop {
            passes += 1;
            let mut changed = false;
            for fd in fds {
                changed |= self.apply_fd(fd);
            }
            if !changed {
                return passes;
            }
        }
    }

    /// La première ligne entièrement distinguée, s'il y en a une.
    pub fn distinguished_row(&self) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.iter().all(|s| s.is_distinguished()))
    }

    /// Vue affichable avec les noms de l'univers.
    pub fn render<'a>(&'a self, universe: &'a Universe) -> TableauDisplay<'a> {
        TableauDisplay {
            tableau: self,
            universe,
        }
    }
}

pub struct TableauDisplay<'a> {
    tableau: &'a Tableau,
    universe: &'a Universe,
}

impl fmt::Display for TableauDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>6}", "")?;
        for &a in &self.tableau.columns {
            write!(f, " {:>6}", self.universe.name(a).unwrap_or("?"))?;
        }
        writeln!(f)?;

        for (i, row) in self.tableau.rows.iter().enumerate() {
            write!(f, "{:>6}", format!("R{}", i + 1))?;
            for symbol in row {
                let cell = match symbol {
                    Symbol::Distinguished(c) => format!("a{}", c + 1),
                    Symbol::NonDistinguished(r, c) => format!("b{}.{}", r + 1, c + 1),
                };
                write!(f, " {:>6}", cell)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Résultat détaillé d'un test de jointure sans perte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LosslessReport {
    pub lossless: bool,
    /// Attributs de R présents dans au moins deux sous-schémas (diagnostic).
    pub shared: AttrSet,
    /// Premier sous-schéma entièrement déterminé par `shared`, s'il y en a un.
    pub shared_key_of: Option<usize>,
    /// Nombre de passes du chase (0 si le tableau n'a pas été construit).
    pub passes: usize,
    /// La ligne entièrement distinguée qui prouve l'absence de perte.
    pub witness_row: Option<usize>,
    pub tableau: Tableau,
    /// Nom de la table de chaque ligne du tableau (R1, R2... par défaut).
    pub table_names: Vec<String>,
}

impl LosslessReport {
    /// Renomme les lignes. Ignoré si le nombre de noms ne correspond pas.
    pub fn with_table_names(mut self, names: Vec<String>) -> Self {
        if names.len() == self.table_names.len() {
            self.table_names = names;
        }
        self
    }

    fn table_name(&self, row: usize) -> String {
        self.table_names
            .get(row)
            .cloned()
            .unwrap_or_else(|| format!("R{}", row + 1))
    }

    /// Phrase d'explication pour l'utilisateur.
    pub fn explanation(&self, universe: &Universe) -> String {
        if self.tableau.row_count() == 0 || self.tableau.columns.is_empty() {
            return "Jointure avec perte : relation ou décomposition vide.".to_string();
        }

        let shared = if self.shared.is_empty() {
            "aucun attribut commun entre les tables".to_string()
        } else {
            let role = match self.shared_key_of {
                Some(i) => format!("qui déterminent tout {}", self.table_name(i)),
                None => "qui ne déterminent aucune table".to_string(),
            };
            format!("attributs communs ({}) {}", universe.display_set(self.shared), role)
        };

        match self.witness_row {
            Some(row) => format!(
                "Jointure sans perte : {} ; après {} passe(s) du chase, la ligne {} est entièrement distinguée.",
                shared,
                self.passes,
                self.table_name(row)
            ),
            None => format!(
                "Jointure avec perte : {} ; après {} passe(s) du chase, aucune ligne n'est entièrement distinguée.",
                shared, self.passes
            ),
        }
    }
}

/// Les attributs de `r` qui apparaissent dans au moins deux sous-schémas.
pub fn shared_attributes(r: AttrSet, schemas: &[AttrSet]) -> AttrSet {
    let mut seen = AttrSet::empty();
    let mut shared = AttrSet::empty();
    for schema in schemas {
        let schema = schema.intersection(r);
        shared = shared.union(seen.intersection(schema));
        seen = seen.union(schema);
    }
    shared
}

/// Lance le chase et garde le tableau final.
///
/// Une relation vide ou une décomposition vide est déclarée avec perte.
pub fn chase_decomposition(r: AttrSet, schemas: &[AttrSet], fds: &[Fd]) -> LosslessReport {
    let shared = shared_attributes(r, schemas);
    let shared_key_of = if shared.is_empty() {
        None
    } else {
        let reach = compute_closure(shared, fds);
        schemas.iter().position(|s| reach.is_superset(s.intersection(r)))
    };

    let table_names: Vec<String> = (1..=schemas.len()).map(|i| format!("R{}", i)).collect();
    let mut tableau = Tableau::new(r, schemas);
    if r.is_empty() || schemas.is_empty() {
        return LosslessReport {
            lossless: false,
            shared,
            shared_key_of,
            passes: 0,
            witness_row: None,
            tableau,
            table_names,
        };
    }

    let passes = tableau.chase(fds);
    let witness_row = tableau.distinguished_row();
    log::debug!(
        "chase : {} lignes, {} passes, sans perte = {}",
        tableau.row_count(),
        passes,
        witness_row.is_some()
    );
    LosslessReport {
        lossless: witness_row.is_some(),
        shared,
        shared_key_of,
        passes,
        witness_row,
        tableau,
        table_names,
    }
}

/// Vrai si la décomposition `schemas` de `r` est sans perte sous `fds`.
pub fn check_lossless_join(r: AttrSet, schemas: &[AttrSet], fds: &[Fd]) -> bool {
    chase_decomposition(r, schemas, fds).lossless
}
