// =============================================================================
// ANALYSIS — Analyses complètes d'un schéma et de ses décompositions
// =============================================================================
//
// Les modules précédents sont des briques. Celui-ci les assemble en trois
// analyses "prêtes à afficher" :
//
//   summarize               → le schéma de base seul : clés, forme normale,
//                             dépendances dérivées, déjà en BCNF ?
//   analyze_projection      → une projection R → S : dépendances de S,
//                             préservation, jointure {S, R \ S}
//   analyze_decomposition   → un découpage complet en tables, éventuellement
//                             à l'intérieur d'une PORTÉE S ⊂ R
//
// PORTÉE :
//   Quand on décompose une table déjà issue d'une étape précédente, on ne
//   raisonne plus sur R mais sur S. Les dépendances de référence deviennent
//   alors π_S(F), projetées par fermeture puis réduites à gauche.
//
//   R = {A, B, C, D}, F = {A → B, B → C}, S = {A, C, D}
//   π_S(F) = {A → C}
//
// GARDE-FOU :
//   Toute énumération porte sur 2^n sous-ensembles. Au-delà de
//   `Config::max_enumeration_attrs`, l'analyse est refusée (EnumerationLimit).
//
// =============================================================================

use crate::config::{Config, DerivedFdMode};
use crate::error::{NormError, NormResult};

use super::attribute::AttrSet;
use super::chase::{chase_decomposition, LosslessReport};
use super::closure::find_transitive_fds;
use super::fd::{self, Fd};
use super::normal_form::{analyze_normal_form, is_bcnf, NormalForm};
use super::preservation::{check_dependency_preserving, missing_fds};
use super::projection::project_and_minimize;
use super::schema::{Decomposition, Schema};
use super::validate::validate_decomposition;

/// Analyse d'une table d'une décomposition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableAnalysis {
    pub name: String,
    pub attrs: AttrSet,
    /// Dépendances projetées sur la table, LHS réduits.
    pub fds: Vec<Fd>,
    /// Dépendances dérivées, pour l'affichage seulement.
    pub derived: Vec<Fd>,
    pub normal_form: NormalForm,
    pub candidate_keys: Vec<AttrSet>,
    pub violations: Vec<Fd>,
}

impl TableAnalysis {
    pub fn is_bcnf(&self) -> bool {
        self.normal_form == NormalForm::BoyceCodd
    }
}

/// Analyse globale d'une décomposition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecompositionAnalysis {
    pub scope: AttrSet,
    /// Les dépendances de référence dans la portée.
    pub scope_fds: Vec<Fd>,
    pub tables: Vec<TableAnalysis>,
    pub dependency_preserving: bool,
    pub missing_fds: Vec<Fd>,
    pub lossless: LosslessReport,
    pub all_bcnf: bool,
    /// Attributs de la portée qu'aucune table ne contient.
    pub uncovered: AttrSet,
}

/// Analyse d'une projection R → S.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionAnalysis {
    pub target: AttrSet,
    pub fds: Vec<Fd>,
    pub dependency_preserving: bool,
    pub missing_fds: Vec<Fd>,
    /// Dépendances dérivées affichées pour S.
    pub derived: Vec<Fd>,
    /// R \ S, l'autre moitié du découpage en deux.
    pub complement: AttrSet,
    pub lossless: LosslessReport,
}

/// Résumé du schéma de base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaSummary {
    pub attrs: AttrSet,
    pub fds: Vec<Fd>,
    pub derived: Vec<Fd>,
    pub candidate_keys: Vec<AttrSet>,
    pub normal_form: NormalForm,
    pub already_bcnf: bool,
    pub violations: Vec<Fd>,
}

/// Point d'entrée des analyses sur un schéma de base.
pub struct Analyzer<'a> {
    schema: &'a Schema,
    config: &'a Config,
}

impl<'a> Analyzer<'a> {
    pub fn new(schema: &'a Schema, config: &'a Config) -> Self {
        Analyzer { schema, config }
    }

    pub fn schema(&self) -> &Schema {
        self.schema
    }

    /// Dépendances dérivées à afficher pour `fds` sur `attrs`, selon la config.
    pub fn derived_fds(&self, attrs: AttrSet, fds: &[Fd]) -> Vec<Fd> {
        match self.config.derived_fds {
            DerivedFdMode::Chain => find_transitive_fds(fds),
            DerivedFdMode::Closure => {
                let declared: Vec<Fd> = fds.iter().flat_map(|d| d.split_rhs().collect::<Vec<_>>()).collect();
                project_and_minimize(attrs, fds)
                    .into_iter()
                    .filter(|d| !declared.contains(d))
                    .collect()
            }
        }
    }

    /// La portée et ses dépendances de référence.
    ///
    /// Sans portée (ou avec S = R) : R et F tels quels.
    pub fn scope_fds(&self, scope: Option<AttrSet>) -> NormResult<(AttrSet, Vec<Fd>)> {
        let r = self.schema.attrs();
        match scope {
            None => Ok((r, self.schema.fds.clone())),
            Some(s) if s == r => Ok((r, self.schema.fds.clone())),
            Some(s) => {
                if s.is_empty() {
                    return Err(NormError::InvalidScope {
                        reason: "portée vide".to_string(),
                    });
                }
                if !s.is_subset(r) {
                    return Err(NormError::InvalidScope {
                        reason: format!("{} attribut(s) hors du schéma", s.difference(r).len()),
                    });
                }
                self.config.check_enumeration(s.len())?;
                Ok((s, project_and_minimize(s, &self.schema.fds)))
            }
        }
    }

    /// Analyse une table sous les dépendances de référence `reference`.
    pub fn analyze_table(&self, name: &str, attrs: AttrSet, reference: &[Fd]) -> NormResult<TableAnalysis> {
        self.config.check_enumeration(attrs.len())?;

        let fds = project_and_minimize(attrs, reference);
        let report = analyze_normal_form(attrs, &fds);
        log::debug!(
            "table {} : {} attributs, {} dépendances, {}",
            name,
            attrs.len(),
            fds.len(),
            report.form
        );

        Ok(TableAnalysis {
            name: name.to_string(),
            attrs,
            derived: self.derived_fds(attrs, &fds),
            normal_form: report.form,
            candidate_keys: report.candidate_keys,
            violations: report.violations,
            fds,
        })
    }

    /// Analyse complète d'un découpage, dans la portée donnée.
    pub fn analyze_decomposition(
        &self,
        decomposition: &Decomposition,
        scope: Option<AttrSet>,
    ) -> NormResult<DecompositionAnalysis> {
        if decomposition.is_empty() {
            return Err(NormError::EmptyDecomposition);
        }
        let (scope, scope_fds) = self.scope_fds(scope)?;

        if let Err(findings) = validate_decomposition(decomposition, scope) {
            for finding in &findings {
                log::warn!("{}", finding);
            }
        }

        let tables = decomposition
            .tables
            .iter()
            .map(|t| self.analyze_table(&t.name, t.attrs, &scope_fds))
            .collect::<NormResult<Vec<_>>>()?;

        let combined = fd::dedup(tables.iter().flat_map(|t| t.fds.iter().copied()));
        let dependency_preserving = check_dependency_preserving(&scope_fds, &combined);
        let missing = if dependency_preserving {
            Vec::new()
        } else {
            missing_fds(&scope_fds, &combined)
        };

        let sorted = decomposition.sorted_tables(&self.schema.universe);
        let sets: Vec<AttrSet> = sorted.iter().map(|t| t.attrs).collect();
        let lossless = chase_decomposition(scope, &sets, &scope_fds)
            .with_table_names(sorted.iter().map(|t| t.name.clone()).collect());
        let all_bcnf = tables.iter().all(TableAnalysis::is_bcnf);
        let uncovered = scope.difference(decomposition.union());

        log::debug!(
            "décomposition en {} tables : préservation = {}, sans perte = {}, BCNF = {}",
            tables.len(),
            dependency_preserving,
            lossless.lossless,
            all_bcnf
        );

        Ok(DecompositionAnalysis {
            scope,
            scope_fds,
            tables,
            dependency_preserving,
            missing_fds: missing,
            lossless,
            all_bcnf,
            uncovered,
        })
    }

    /// Projection sur `target` et découpage en deux {S, R \ S}.
    pub fn analyze_projection(&self, target: AttrSet) -> NormResult<ProjectionAnalysis> {
        let r = self.schema.attrs();
        if target.is_empty() || !target.is_subset(r) {
            return Err(NormError::InvalidScope {
                reason: "la cible de projection doit être un sous-ensemble non vide du schéma".to_string(),
            });
        }
        self.config.check_enumeration(target.len())?;

        let fds = project_and_minimize(target, &self.schema.fds);
        let dependency_preserving = check_dependency_preserving(&self.schema.fds, &fds);
        let missing = missing_fds(&self.schema.fds, &fds);

        let complement = r.difference(target);
        let mut parts = vec![target];
        if !complement.is_empty() {
            parts.push(complement);
        }
        let lossless = chase_decomposition(r, &parts, &self.schema.fds);

        Ok(ProjectionAnalysis {
            target,
            derived: self.derived_fds(target, &fds),
            fds,
            dependency_preserving,
            missing_fds: missing,
            complement,
            lossless,
        })
    }

    /// Résumé du schéma de base.
    ///
    /// Un schéma sans attribut n'est en BCNF que s'il n'a aucune dépendance.
    pub fn summarize(&self) -> NormResult<SchemaSummary> {
        let attrs = self.schema.attrs();
        self.config.check_enumeration(attrs.len())?;

        let fds = self.schema.fds.clone();
        let report = analyze_normal_form(attrs, &fds);
        let already_bcnf = if attrs.is_empty() {
            fds.is_empty()
        } else {
            is_bcnf(attrs, &fds)
        };

        Ok(SchemaSummary {
            attrs,
            derived: self.derived_fds(attrs, &fds),
            candidate_keys: report.candidate_keys,
            normal_form: report.form,
            already_bcnf,
            violations: report.violations,
            fds,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    /// R = {A, B, C, D}, F = {A → B, B → C}
    fn chain_schema() -> Schema {
        let mut s = Schema::new("Chaîne");
        s.with_attributes(&["A", "B", "C", "D"])
            .unwrap()
            .add_fd(&["A"], &["B"])
            .unwrap()
            .add_fd(&["B"], &["C"])
            .unwrap();
        s
    }

    #[test]
    fn test_summary() {
        let s = chain_schema();
        let config = Config::default();
        let summary = Analyzer::new(&s, &config).summarize().unwrap();
        assert_eq!(summary.candidate_keys, vec![s.set(&["A", "D"]).unwrap()]);
        assert!(!summary.already_bcnf);
        assert_eq!(summary.derived, vec![s.fd(&["A"], &["C"]).unwrap()]);
    }

    #[test]
    fn test_summary_empty_schema() {
        let s = Schema::new("Vide");
        let config = Config::default();
        let summary = Analyzer::new(&s, &config).summarize().unwrap();
        assert!(summary.already_bcnf);
        assert_eq!(summary.normal_form, NormalForm::BoyceCodd);
    }

    #[test]
    fn test_decomposition_bcnf_lossless_preserving() {
        let s = chain_schema();
        let config = Config::default();
        let d = Decomposition::from_sets([
            s.set(&["A", "B"]).unwrap(),
            s.set(&["B", "C"]).unwrap(),
            s.set(&["A", "D"]).unwrap(),
        ]);
        let analysis = Analyzer::new(&s, &config).analyze_decomposition(&d, None).unwrap();
        assert!(analysis.dependency_preserving);
        assert!(analysis.missing_fds.is_empty());
        assert!(analysis.lossless.lossless);
        assert!(analysis.all_bcnf);
        assert!(analysis.uncovered.is_empty());
        assert_eq!(analysis.tables[0].fds, vec![s.fd(&["A"], &["B"]).unwrap()]);
    }

    #[test]
    fn test_decomposition_lossy_and_missing() {
        let s = chain_schema();
        let config = Config::default();
        let d = Decomposition::from_sets([
            s.set(&["A", "C", "D"]).unwrap(),
            s.set(&["B", "C"]).unwrap(),
        ]);
        let analysis = Analyzer::new(&s, &config).analyze_decomposition(&d, None).unwrap();
        assert!(!analysis.dependency_preserving);
        assert_eq!(analysis.missing_fds, vec![s.fd(&["A"], &["B"]).unwrap()]);
        assert!(!analysis.lossless.lossless);
    }

    #[test]
    fn test_explanation_names_tables_in_input_order() {
        let mut s = Schema::new("ABC");
        s.with_attributes(&["A", "B", "C"])
            .unwrap()
            .add_fd(&["B"], &["C"])
            .unwrap();
        let config = Config::default();
        // R1 = (B,C), R2 = (A,B) : le chase les voit dans l'ordre inverse.
        let d = Decomposition::from_sets([s.set(&["B", "C"]).unwrap(), s.set(&["A", "B"]).unwrap()]);
        let analysis = Analyzer::new(&s, &config).analyze_decomposition(&d, None).unwrap();

        assert!(analysis.lossless.lossless);
        let text = analysis.lossless.explanation(&s.universe);
        assert!(text.contains("attributs communs (B) qui déterminent tout R1"));
        assert!(text.contains("la ligne R2 est entièrement distinguée"));
    }

    #[test]
    fn test_scoped_decomposition() {
        let s = chain_schema();
        let config = Config::default();
        let scope = s.set(&["A", "C", "D"]).unwrap();
        let analyzer = Analyzer::new(&s, &config);

        let (_, scope_fds) = analyzer.scope_fds(Some(scope)).unwrap();
        assert_eq!(scope_fds, vec![s.fd(&["A"], &["C"]).unwrap()]);

        let d = Decomposition::from_sets([s.set(&["A", "C"]).unwrap(), s.set(&["A", "D"]).unwrap()]);
        let analysis = analyzer.analyze_decomposition(&d, Some(scope)).unwrap();
        assert_eq!(analysis.scope, scope);
        assert!(analysis.lossless.lossless);
        assert!(analysis.dependency_preserving);
        assert!(analysis.all_bcnf);
    }

    #[test]
    fn test_empty_decomposition_rejected() {
        let s = chain_schema();
        let config = Config::default();
        let err = Analyzer::new(&s, &config)
            .analyze_decomposition(&Decomposition::new(), None)
            .unwrap_err();
        assert!(matches!(err, NormError::EmptyDecomposition));
    }

    #[test]
    fn test_invalid_scope() {
        let s = chain_schema();
        let config = Config::default();
        let analyzer = Analyzer::new(&s, &config);
        assert!(matches!(
            analyzer.scope_fds(Some(AttrSet::empty())),
            Err(NormError::InvalidScope { .. })
        ));
        assert!(matches!(
            analyzer.scope_fds(Some(AttrSet::singleton(9))),
            Err(NormError::InvalidScope { .. })
        ));
    }

    #[test]
    fn test_enumeration_limit() {
        let s = chain_schema();
        let config = Config {
            max_enumeration_attrs: 2,
            ..Config::default()
        };
        let err = Analyzer::new(&s, &config).summarize().unwrap_err();
        assert!(matches!(err, NormError::EnumerationLimit { attrs: 4, limit: 2 }));
    }

    #[test]
    fn test_projection_analysis() {
        let s = chain_schema();
        let config = Config::default();
        let target = s.set(&["A", "B", "C"]).unwrap();
        let p = Analyzer::new(&s, &config).analyze_projection(target).unwrap();
        // La projection garde A → C : elle est impliquée, pas déclarée.
        assert_eq!(
            p.fds,
            fd::canonical([
                s.fd(&["A"], &["B"]).unwrap(),
                s.fd(&["A"], &["C"]).unwrap(),
                s.fd(&["B"], &["C"]).unwrap(),
            ])
        );
        assert!(p.dependency_preserving);
        assert_eq!(p.complement, s.set(&["D"]).unwrap());
        // {A,B,C} et {D} ne partagent rien : jointure avec perte.
        assert!(!p.lossless.lossless);
        // Projection complète : le chaînage ne trouve rien de nouveau.
        assert!(p.derived.is_empty());

        // A,B → C puis C → D donne A,B → D, absent de la projection
        // (réduite en A → D).
        let mut s = Schema::new("Dérivées");
        s.with_attributes(&["A", "B", "C", "D"])
            .unwrap()
            .add_fd(&["A", "B"], &["C"])
            .unwrap()
            .add_fd(&["C"], &["D"])
            .unwrap()
            .add_fd(&["A"], &["D"])
            .unwrap();
        let p = Analyzer::new(&s, &config).analyze_projection(s.attrs()).unwrap();
        assert!(p.fds.contains(&s.fd(&["A"], &["D"]).unwrap()));
        assert_eq!(p.derived, vec![s.fd(&["A", "B"], &["D"]).unwrap()]);
    }

    #[test]
    fn test_derived_closure_mode() {
        let s = chain_schema();
        let config = Config {
            derived_fds: DerivedFdMode::Closure,
            ..Config::default()
        };
        let analyzer = Analyzer::new(&s, &config);
        let derived = analyzer.derived_fds(s.set(&["A", "B", "C"]).unwrap(), &s.fds);
        assert_eq!(derived, vec![s.fd(&["A"], &["C"]).unwrap()]);
    }
}
