// =============================================================================
// REPORT TEXT — Rendu lisible pour le terminal
// =============================================================================
//
// Même mise en page que la démonstration : un titre encadré de "═══",
// puis des lignes indentées. ✓ / ✗ marquent les propriétés vérifiées.
//
//   ═══ Décomposition ═══
//     R1(A,B)   BCNF   A→B
//     R2(A,C)   BCNF   —
//   ✓ Préservation des dépendances
//   ✓ Jointure sans perte
//
// =============================================================================

use std::fmt::Write;

use crate::core::analysis::{DecompositionAnalysis, ProjectionAnalysis, SchemaSummary};
use crate::core::attribute::AttrSet;
use crate::core::fd::Fd;
use crate::core::schema::Schema;
use crate::error::NormResult;

use super::{
    ClosureView, CoverView, DecompositionView, LosslessView, ProjectionView, Reporter, SummaryView,
};

/// Reporter texte
pub struct TextReporter;

impl TextReporter {
    pub fn new() -> Self {
        TextReporter
    }
}

impl Default for TextReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn mark(ok: bool) -> &'static str {
    if ok {
        "✓"
    } else {
        "✗"
    }
}

fn list_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "—".to_string()
    } else {
        items.join("; ")
    }
}

fn keys_text(keys: &[Vec<String>]) -> String {
    keys.iter()
        .map(|k| format!("{{{}}}", k.join(",")))
        .collect::<Vec<_>>()
        .join(" ")
}

fn write_lossless(out: &mut String, view: &LosslessView) {
    let _ = writeln!(out, "{} Jointure sans perte", mark(view.is_lossless));
    let _ = writeln!(out, "    {}", view.explanation);
}

impl Reporter for TextReporter {
    fn summary(&self, schema: &Schema, summary: &SchemaSummary) -> NormResult<String> {
        let view = SummaryView::new(schema, summary);
        let mut out = String::new();
        let _ = writeln!(out, "═══ Schéma {} ═══", view.schema);
        let _ = writeln!(out, "  Attributs        : {}", view.attributes.join(", "));
        let _ = writeln!(out, "  Dépendances      : {}", list_or_dash(&view.fds));
        let _ = writeln!(out, "  Dérivées         : {}", list_or_dash(&view.derived_fds));
        let _ = writeln!(out, "  Clés candidates  : {}", keys_text(&view.candidate_keys));
        let _ = writeln!(
            out,
            "  Forme normale    : {} ({})",
            view.normal_form, view.normal_form_description
        );
        if !view.bcnf_violations.is_empty() {
            let _ = writeln!(out, "  Violations BCNF  : {}", view.bcnf_violations.join("; "));
        }
        let _ = writeln!(out, "{} Déjà en BCNF", mark(view.already_bcnf));
        Ok(out)
    }

    fn projection(&self, schema: &Schema, analysis: &ProjectionAnalysis) -> NormResult<String> {
        let view = ProjectionView::new(schema, analysis);
        let mut out = String::new();
        let _ = writeln!(out, "═══ Projection sur ({}) ═══", view.target.join(","));
        let _ = writeln!(out, "  Dépendances      : {}", list_or_dash(&view.fds));
        let _ = writeln!(out, "  Dérivées         : {}", list_or_dash(&view.derived_fds));
        let _ = writeln!(out, "  Complément       : ({})", view.complement.join(","));
        let _ = writeln!(out, "{} Préservation des dépendances", mark(view.dependency_preserving));
        if !view.missing_fds.is_empty() {
            let _ = writeln!(out, "    perdues : {}", view.missing_fds.join("; "));
        }
        write_lossless(&mut out, &view.lossless_join);
        Ok(out)
    }

    fn decomposition(&self, schema: &Schema, analysis: &DecompositionAnalysis) -> NormResult<String> {
        let view = DecompositionView::new(schema, analysis);
        let mut out = String::new();
        let _ = writeln!(out, "═══ Décomposition de ({}) ═══", view.scope.join(","));
        for t in &view.tables {
            let _ = writeln!(
                out,
                "  {}({})  {}  {}",
                t.name,
                t.attributes.join(","),
                t.normal_form,
                list_or_dash(&t.fds)
            );
            if !t.derived_fds.is_empty() {
                let _ = writeln!(out, "      dérivées : {}", t.derived_fds.join("; "));
            }
            let _ = writeln!(out, "      clés     : {}", keys_text(&t.candidate_keys));
        }
        if !view.uncovered.is_empty() {
            let _ = writeln!(out, "  Non couverts : {}", view.uncovered.join(", "));
        }
        let _ = writeln!(out, "{} Préservation des dépendances", mark(view.dependency_preserving));
        if !view.missing_fds.is_empty() {
            let _ = writeln!(out, "    perdues : {}", view.missing_fds.join("; "));
        }
        write_lossless(&mut out, &view.lossless_join);
        let _ = writeln!(out, "{} Toutes les tables en BCNF", mark(view.all_bcnf));
        Ok(out)
    }

    fn closure(&self, schema: &Schema, x: AttrSet, closure: AttrSet) -> NormResult<String> {
        let view = ClosureView::new(schema, x, closure);
        Ok(format!(
            "{{{}}}⁺ = {{{}}}\n",
            view.attributes.join(","),
            view.closure.join(",")
        ))
    }

    fn cover(&self, schema: &Schema, cover: &[Fd]) -> NormResult<String> {
        let view = CoverView::new(schema, cover);
        let mut out = String::from("═══ Couverture minimale ═══\n");
        for dep in &view.fds {
            let _ = writeln!(out, "  {}", dep);
        }
        Ok(out)
    }

    fn name(&self) -> &str {
        "text"
    }
}
