// =============================================================================
// REPORT — Couche de présentation des analyses
// =============================================================================
//
// Le cœur produit des masques de bits et des index. Un rapport les traduit
// en quelque chose de lisible, avec les NOMS d'attributs de l'univers.
// Grâce au trait Reporter, on peut supporter :
//   - du texte pour le terminal (TextReporter)
//   - du JSON pour un autre programme (JsonReporter)
//
// Le cœur ne connaît JAMAIS les rapports. C'est le rapport qui traduit
// SchemaSummary → texte, DecompositionAnalysis → JSON, etc.
//
// Les "vues" de ce module sont des structures sérialisables intermédiaires :
// elles figent les noms une fois pour toutes, et les deux reporters les
// partagent.
//
// =============================================================================

pub mod json;
pub mod text;

use serde::Serialize;

use crate::core::analysis::{DecompositionAnalysis, ProjectionAnalysis, SchemaSummary, TableAnalysis};
use crate::core::attribute::{AttrSet, Universe};
use crate::core::chase::LosslessReport;
use crate::core::fd::Fd;
use crate::core::normal_form::NormalForm;
use crate::core::schema::Schema;
use crate::error::NormResult;

pub use json::JsonReporter;
pub use text::TextReporter;

/// Trait abstrait pour tous les formats de sortie.
///
/// Chaque méthode reçoit le schéma de base (pour les noms) et un résultat
/// d'analyse, et rend le texte final.
pub trait Reporter {
    fn summary(&self, schema: &Schema, summary: &SchemaSummary) -> NormResult<String>;

    fn projection(&self, schema: &Schema, analysis: &ProjectionAnalysis) -> NormResult<String>;

    fn decomposition(&self, schema: &Schema, analysis: &DecompositionAnalysis) -> NormResult<String>;

    /// X⁺ pour un ensemble X.
    fn closure(&self, schema: &Schema, x: AttrSet, closure: AttrSet) -> NormResult<String>;

    /// Une couverture minimale de F.
    fn cover(&self, schema: &Schema, cover: &[Fd]) -> NormResult<String>;

    /// Retourne le nom du format
    fn name(&self) -> &str;
}

fn names(universe: &Universe, set: AttrSet) -> Vec<String> {
    universe.names(set).into_iter().map(str::to_string).collect()
}

fn fd_texts(universe: &Universe, fds: &[Fd]) -> Vec<String> {
    let mut out: Vec<String> = fds.iter().map(|d| d.display(universe).to_string()).collect();
    out.sort();
    out
}

fn key_names(universe: &Universe, keys: &[AttrSet]) -> Vec<Vec<String>> {
    keys.iter().map(|k| names(universe, *k)).collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryView {
    pub schema: String,
    pub attributes: Vec<String>,
    pub fds: Vec<String>,
    pub derived_fds: Vec<String>,
    pub candidate_keys: Vec<Vec<String>>,
    pub normal_form: NormalForm,
    pub normal_form_description: &'static str,
    pub already_bcnf: bool,
    pub bcnf_violations: Vec<String>,
}

impl SummaryView {
    pub fn new(schema: &Schema, summary: &SchemaSummary) -> Self {
        let u = &schema.universe;
        SummaryView {
            schema: schema.name.clone(),
            attributes: schema.universe.iter().map(|a| a.name.clone()).collect(),
            fds: fd_texts(u, &summary.fds),
            derived_fds: fd_texts(u, &summary.derived),
            candidate_keys: key_names(u, &summary.candidate_keys),
            normal_form: summary.normal_form,
            normal_form_description: summary.normal_form.description(),
            already_bcnf: summary.already_bcnf,
            bcnf_violations: fd_texts(u, &summary.violations),
        }
    }
}

/// Détail de la jointure sans perte.
#[derive(Debug, Clone, Serialize)]
pub struct LosslessView {
    pub is_lossless: bool,
    pub shared_attributes: Vec<String>,
    pub explanation: String,
}

impl LosslessView {
    pub fn new(universe: &Universe, report: &LosslessReport) -> Self {
        LosslessView {
            is_lossless: report.lossless,
            shared_attributes: names(universe, report.shared),
            explanation: report.explanation(universe),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    pub name: String,
    pub attributes: Vec<String>,
    pub fds: Vec<String>,
    pub derived_fds: Vec<String>,
    pub candidate_keys: Vec<Vec<String>>,
    pub normal_form: NormalForm,
    pub bcnf: bool,
}

impl TableView {
    pub fn new(universe: &Universe, table: &TableAnalysis) -> Self {
        TableView {
            name: table.name.clone(),
            attributes: names(universe, table.attrs),
            fds: fd_texts(universe, &table.fds),
            derived_fds: fd_texts(universe, &table.derived),
            candidate_keys: key_names(universe, &table.candidate_keys),
            normal_form: table.normal_form,
            bcnf: table.is_bcnf(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DecompositionView {
    pub scope: Vec<String>,
    pub tables: Vec<TableView>,
    pub dependency_preserving: bool,
    pub missing_fds: Vec<String>,
    pub lossless_join: LosslessView,
    pub all_bcnf: bool,
    pub uncovered: Vec<String>,
}

impl DecompositionView {
    pub fn new(schema: &Schema, analysis: &DecompositionAnalysis) -> Self {
        let u = &schema.universe;
        DecompositionView {
            scope: names(u, analysis.scope),
            tables: analysis.tables.iter().map(|t| TableView::new(u, t)).collect(),
            dependency_preserving: analysis.dependency_preserving,
            missing_fds: fd_texts(u, &analysis.missing_fds),
            lossless_join: LosslessView::new(u, &analysis.lossless),
            all_bcnf: analysis.all_bcnf,
            uncovered: names(u, analysis.uncovered),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectionView {
    pub target: Vec<String>,
    pub complement: Vec<String>,
    pub fds: Vec<String>,
    pub derived_fds: Vec<String>,
    pub dependency_preserving: bool,
    pub missing_fds: Vec<String>,
    pub lossless_join: LosslessView,
}

impl ProjectionView {
    pub fn new(schema: &Schema, analysis: &ProjectionAnalysis) -> Self {
        let u = &schema.universe;
        ProjectionView {
            target: names(u, analysis.target),
            complement: names(u, analysis.complement),
            fds: fd_texts(u, &analysis.fds),
            derived_fds: fd_texts(u, &analysis.derived),
            dependency_preserving: analysis.dependency_preserving,
            missing_fds: fd_texts(u, &analysis.missing_fds),
            lossless_join: LosslessView::new(u, &analysis.lossless),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClosureView {
    pub attributes: Vec<String>,
    pub closure: Vec<String>,
}

impl ClosureView {
    pub fn new(schema: &Schema, x: AttrSet, closure: AttrSet) -> Self {
        ClosureView {
            attributes: names(&schema.universe, x),
            closure: names(&schema.universe, closure),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CoverView {
    pub fds: Vec<String>,
}

impl CoverView {
    pub fn new(schema: &Schema, cover: &[Fd]) -> Self {
        CoverView {
            fds: fd_texts(&schema.universe, cover),
        }
    }
}
