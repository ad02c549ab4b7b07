// =============================================================================
// REPORT JSON — Rendu machine des analyses
// =============================================================================
//
// Chaque analyse est rendue par sa vue sérialisable (voir report/mod.rs).
// Les formes normales sortent en "1NF" / "2NF" / "3NF" / "BCNF".
//
// =============================================================================

use serde::Serialize;

use crate::core::analysis::{DecompositionAnalysis, ProjectionAnalysis, SchemaSummary};
use crate::core::attribute::AttrSet;
use crate::core::fd::Fd;
use crate::core::schema::Schema;
use crate::error::NormResult;

use super::{ClosureView, CoverView, DecompositionView, ProjectionView, Reporter, SummaryView};

/// Reporter JSON — compact ou indenté
pub struct JsonReporter {
    pretty: bool,
}

impl JsonReporter {
    pub fn new(pretty: bool) -> Self {
        JsonReporter { pretty }
    }

    fn render<T: Serialize>(&self, view: &T) -> NormResult<String> {
        let text = if self.pretty {
            serde_json::to_string_pretty(view)?
        } else {
            serde_json::to_string(view)?
        };
        Ok(text)
    }
}

impl Reporter for JsonReporter {
    fn summary(&self, schema: &Schema, summary: &SchemaSummary) -> NormResult<String> {
        self.render(&SummaryView::new(schema, summary))
    }

    fn projection(&self, schema: &Schema, analysis: &ProjectionAnalysis) -> NormResult<String> {
        self.render(&ProjectionView::new(schema, analysis))
    }

    fn decomposition(&self, schema: &Schema, analysis: &DecompositionAnalysis) -> NormResult<String> {
        self.render(&DecompositionView::new(schema, analysis))
    }

    fn closure(&self, schema: &Schema, x: AttrSet, closure: AttrSet) -> NormResult<String> {
        self.render(&ClosureView::new(schema, x, closure))
    }

    fn cover(&self, schema: &Schema, cover: &[Fd]) -> NormResult<String> {
        self.render(&CoverView::new(schema, cover))
    }

    fn name(&self) -> &str {
        "json"
    }
}
