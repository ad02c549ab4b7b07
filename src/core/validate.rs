// =============================================================================
// VALIDATE — Vérification des schémas et des décompositions
// =============================================================================
//
// Ce module vérifie que les structures sont cohérentes AVANT analyse :
//   - Un Schema est bien formé (dépendances sur des attributs connus,
//     aucun côté vide)
//   - Une Decomposition est un vrai découpage de R (tables non vides,
//     attributs connus, pas de table en double, R recouvert)
//
// Les algorithmes restent totaux sur une entrée invalide (une table qui ne
// recouvre pas R donne simplement une jointure avec perte). La validation
// sert à PRÉVENIR l'utilisateur, pas à protéger le cœur.
//
// =============================================================================

use std::fmt;

use rustc_hash::FxHashSet;

use super::attribute::AttrSet;
use super::schema::{Decomposition, Schema};

/// Erreur de validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    fn new(message: String) -> Self {
        ValidationError { message }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation error: {}", self.message)
    }
}

/// Vérifie qu'un Schema est bien formé.
///
/// Conditions :
/// - Toute dépendance a un LHS et un RHS non vides
/// - Toute dépendance ne mentionne que des attributs de l'univers
pub fn validate_schema(schema: &Schema) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let r = schema.attrs();

    for (i, dep) in schema.fds.iter().enumerate() {
        if dep.lhs.is_empty() {
            errors.push(ValidationError::new(format!(
                "Dépendance {} : côté gauche vide",
                i
            )));
        }
        if dep.rhs.is_empty() {
            errors.push(ValidationError::new(format!(
                "Dépendance {} : côté droit vide",
                i
            )));
        }
        if !dep.is_within(r) {
            errors.push(ValidationError::new(format!(
                "Dépendance {} : attribut(s) hors du schéma '{}'",
                i, schema.name
            )));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Vérifie qu'une Decomposition découpe bien R.
///
/// Conditions :
/// - Au moins une table, et aucune table vide
/// - Chaque table ne contient que des attributs de `r`
/// - Deux tables n'ont pas le même nom ni les mêmes attributs
/// - L'union des tables recouvre `r`
pub fn validate_decomposition(
    decomposition: &Decomposition,
    r: AttrSet,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if decomposition.is_empty() {
        errors.push(ValidationError::new(
            "La décomposition ne contient aucune table".to_string(),
        ));
    }

    let mut names: FxHashSet<&str> = FxHashSet::default();
    let mut sets: FxHashSet<AttrSet> = FxHashSet::default();

    for table in &decomposition.tables {
        if table.attrs.is_empty() {
            errors.push(ValidationError::new(format!(
                "Table '{}' : aucun attribut",
                table.name
            )));
        }
        if !table.attrs.is_subset(r) {
            errors.push(ValidationError::new(format!(
                "Table '{}' : {} attribut(s) hors du schéma",
                table.name,
                table.attrs.difference(r).len()
            )));
        }
        if !names.insert(table.name.as_str()) {
            errors.push(ValidationError::new(format!(
                "Table '{}' : nom en double",
                table.name
            )));
        }
        if !table.attrs.is_empty() && !sets.insert(table.attrs) {
            errors.push(ValidationError::new(format!(
                "Table '{}' : mêmes attributs qu'une table précédente",
                table.name
            )));
        }
    }

    let uncovered = r.difference(decomposition.union());
    if !decomposition.is_empty() && !uncovered.is_empty() {
        errors.push(ValidationError::new(format!(
            "{} attribut(s) du schéma ne sont couverts par aucune table",
            uncovered.len()
        )));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fd::Fd;

    fn abc() -> Schema {
        let mut s = Schema::new("Test");
        s.with_attributes(&["A", "B", "C"])
            .unwrap()
            .add_fd(&["A"], &["B"])
            .unwrap();
        s
    }

    #[test]
    fn test_validate_schema_ok() {
        assert!(validate_schema(&abc()).is_ok());
    }

    #[test]
    fn test_validate_schema_empty_side() {
        let mut s = abc();
        let a = s.set(&["A"]).unwrap();
        s.fds.push(Fd::new(a, AttrSet::empty()));
        let errors = validate_schema(&s).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("côté droit"));
    }

    #[test]
    fn test_validate_schema_outside_attribute() {
        let mut s = abc();
        s.fds.push(Fd::new(AttrSet::singleton(0), AttrSet::singleton(7)));
        assert!(validate_schema(&s).is_err());
    }

    #[test]
    fn test_validate_decomposition_ok() {
        let s = abc();
        let d = Decomposition::from_sets([s.set(&["A", "B"]).unwrap(), s.set(&["A", "C"]).unwrap()]);
        assert!(validate_decomposition(&d, s.attrs()).is_ok());
    }

    #[test]
    fn test_validate_decomposition_uncovered() {
        let s = abc();
        let d = Decomposition::from_sets([s.set(&["A", "B"]).unwrap()]);
        let errors = validate_decomposition(&d, s.attrs()).unwrap_err();
        assert!(errors[0].message.contains("couverts"));
    }

    #[test]
    fn test_validate_decomposition_duplicates_and_empty() {
        let s = abc();
        let ab = s.set(&["A", "B"]).unwrap();
        let mut d = Decomposition::new();
        d.add_table("T", ab)
            .add_table("T", ab)
            .add_table("U", AttrSet::empty())
            .add_table("V", s.set(&["C"]).unwrap());
        let errors = validate_decomposition(&d, s.attrs()).unwrap_err();
        // nom en double + attributs en double + table vide
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_validate_empty_decomposition() {
        let s = abc();
        let errors = validate_decomposition(&Decomposition::new(), s.attrs()).unwrap_err();
        assert_eq!(errors.len(), 1);
    }
}
