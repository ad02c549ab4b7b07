// =============================================================================
// SESSION — Historique des décompositions, avec annulation
// =============================================================================
//
// Un utilisateur normalise un schéma PAS À PAS : il pose le schéma de base,
// propose un découpage, l'analyse, redécoupe une des tables, revient en
// arrière... Ce module garde cet historique.
//
// MACHINE À ÉTATS (par analyse) :
//
//   AwaitingSchema ──set_schema──▶ SchemaReady ──advance──▶ Decomposed(1)
//                                       ▲                      │ advance
//                                       └──────undo────── Decomposed(n)
//
// Chaque étape est un Snapshot IMMUABLE (partagé par Arc) empilé sur une
// pile d'annulation. Rien n'est modifié en place : undo dépile, advance
// empile, set_schema repart d'une pile vide.
//
// Les analyses sont identifiées par un AnalysisId opaque. Un id inconnu,
// ou une étape demandée sans schéma de base, donne MissingPrerequisiteState.
//
// =============================================================================

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::config::Config;
use crate::core::analysis::{Analyzer, DecompositionAnalysis};
use crate::core::attribute::AttrSet;
use crate::core::schema::{Decomposition, Schema};
use crate::error::{NormError, NormResult};

/// Identifiant opaque d'une analyse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnalysisId(u64);

impl fmt::Display for AnalysisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "analyse#{}", self.0)
    }
}

/// Une étape de décomposition figée.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub decomposition: Decomposition,
    /// La sous-relation découpée (None = le schéma entier).
    pub scope: Option<AttrSet>,
}

/// Où en est une analyse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AwaitingSchema,
    SchemaReady,
    /// Nombre d'étapes sur la pile.
    Decomposed(usize),
}

#[derive(Debug, Default)]
struct Session {
    schema: Option<Arc<Schema>>,
    history: Vec<Arc<Snapshot>>,
}

impl Session {
    fn stage(&self) -> Stage {
        match (&self.schema, self.history.len()) {
            (None, _) => Stage::AwaitingSchema,
            (Some(_), 0) => Stage::SchemaReady,
            (Some(_), n) => Stage::Decomposed(n),
        }
    }
}

/// Toutes les analyses en cours.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: FxHashMap<AnalysisId, Session>,
    next_id: u64,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ouvre une analyse vide.
    pub fn open(&mut self) -> AnalysisId {
        self.next_id += 1;
        let id = AnalysisId(self.next_id);
        self.sessions.insert(id, Session::default());
        log::debug!("{} ouverte", id);
        id
    }

    fn session(&self, id: AnalysisId) -> NormResult<&Session> {
        self.sessions
            .get(&id)
            .ok_or_else(|| NormError::missing(format!("{} inconnue", id)))
    }

    fn session_mut(&mut self, id: AnalysisId) -> NormResult<&mut Session> {
        self.sessions
            .get_mut(&id)
            .ok_or_else(|| NormError::missing(format!("{} inconnue", id)))
    }

    /// Pose (ou remplace) le schéma de base. L'historique repart de zéro.
    pub fn set_schema(&mut self, id: AnalysisId, schema: Schema) -> NormResult<Arc<Schema>> {
        let session = self.session_mut(id)?;
        let schema = Arc::new(schema);
        session.schema = Some(Arc::clone(&schema));
        session.history.clear();
        Ok(schema)
    }

    /// Le schéma de base.
    pub fn schema(&self, id: AnalysisId) -> NormResult<Arc<Schema>> {
        self.session(id)?
            .schema
            .clone()
            .ok_or_else(|| NormError::missing(format!("{} : aucun schéma de base", id)))
    }

    /// Empile une nouvelle étape.
    pub fn advance(
        &mut self,
        id: AnalysisId,
        decomposition: Decomposition,
        scope: Option<AttrSet>,
    ) -> NormResult<Arc<Snapshot>> {
        let session = self.session_mut(id)?;
        if session.schema.is_none() {
            return Err(NormError::missing(format!(
                "{} : décomposition demandée avant le schéma de base",
                id
            )));
        }
        let snapshot = Arc::new(Snapshot {
            decomposition,
            scope,
        });
        session.history.push(Arc::clone(&snapshot));
        log::debug!("{} : étape {}", id, session.history.len());
        Ok(snapshot)
    }

    /// Dépile la dernière étape et retourne la nouvelle étape courante.
    pub fn undo(&mut self, id: AnalysisId) -> NormResult<Option<Arc<Snapshot>>> {
        let session = self.session_mut(id)?;
        if session.history.pop().is_none() {
            return Err(NormError::missing(format!("{} : rien à annuler", id)));
        }
        Ok(session.history.last().cloned())
    }

    /// L'étape courante (None si aucune décomposition n'a été posée).
    pub fn current(&self, id: AnalysisId) -> NormResult<Option<Arc<Snapshot>>> {
        Ok(self.session(id)?.history.last().cloned())
    }

    pub fn stage(&self, id: AnalysisId) -> NormResult<Stage> {
        Ok(self.session(id)?.stage())
    }

    /// Analyse l'étape courante contre le schéma de base.
    pub fn analyze_current(&self, id: AnalysisId, config: &Config) -> NormResult<DecompositionAnalysis> {
        let schema = self.schema(id)?;
        let snapshot = self
            .current(id)?
            .ok_or_else(|| NormError::missing(format!("{} : aucune décomposition", id)))?;
        Analyzer::new(&schema, config).analyze_decomposition(&snapshot.decomposition, snapshot.scope)
    }

    pub fn close(&mut self, id: AnalysisId) -> NormResult<()> {
        if self.sessions.remove(&id).is_none() {
            return Err(NormError::missing(format!("{} inconnue", id)));
        }
        log::debug!("{} fermée", id);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Schema {
        let mut s = Schema::new("ABC");
        s.with_attributes(&["A", "B", "C"])
            .unwrap()
            .add_fd(&["A"], &["B"])
            .unwrap();
        s
    }

    fn split(s: &Schema, parts: &[&[&str]]) -> Decomposition {
        Decomposition::from_sets(parts.iter().map(|p| s.set(p).unwrap()))
    }

    #[test]
    fn test_lifecycle() {
        let mut store = SessionStore::new();
        let id = store.open();
        assert_eq!(store.stage(id).unwrap(), Stage::AwaitingSchema);

        let schema = store.set_schema(id, abc()).unwrap();
        assert_eq!(store.stage(id).unwrap(), Stage::SchemaReady);

        store.advance(id, split(&schema, &[&["A", "B"], &["A", "C"]]), None).unwrap();
        store.advance(id, split(&schema, &[&["A", "B"], &["B", "C"]]), None).unwrap();
        assert_eq!(store.stage(id).unwrap(), Stage::Decomposed(2));

        let back = store.undo(id).unwrap().unwrap();
        assert_eq!(back.decomposition.tables[1].attrs, schema.set(&["A", "C"]).unwrap());
        assert_eq!(store.undo(id).unwrap(), None);
        assert_eq!(store.stage(id).unwrap(), Stage::SchemaReady);
    }

    #[test]
    fn test_missing_prerequisites() {
        let mut store = SessionStore::new();
        let id = store.open();
        let err = store.advance(id, Decomposition::new(), None).unwrap_err();
        assert!(matches!(err, NormError::MissingPrerequisiteState { .. }));
        assert!(store.schema(id).is_err());
        assert!(store.undo(id).is_err());
        assert!(store.analyze_current(id, &Config::default()).is_err());
    }

    #[test]
    fn test_unknown_and_closed_ids() {
        let mut store = SessionStore::new();
        let id = store.open();
        store.close(id).unwrap();
        assert!(store.is_empty());
        assert!(matches!(
            store.stage(id),
            Err(NormError::MissingPrerequisiteState { .. })
        ));
        assert!(store.close(id).is_err());
    }

    #[test]
    fn test_snapshots_are_shared_not_copied() {
        let mut store = SessionStore::new();
        let id = store.open();
        let schema = store.set_schema(id, abc()).unwrap();
        let pushed = store.advance(id, split(&schema, &[&["A", "B"], &["A", "C"]]), None).unwrap();
        let current = store.current(id).unwrap().unwrap();
        assert!(Arc::ptr_eq(&pushed, &current));
    }

    #[test]
    fn test_analyze_current() {
        let mut store = SessionStore::new();
        let id = store.open();
        let schema = store.set_schema(id, abc()).unwrap();
        store.advance(id, split(&schema, &[&["A", "B"], &["A", "C"]]), None).unwrap();
        let analysis = store.analyze_current(id, &Config::default()).unwrap();
        assert!(analysis.lossless.lossless);
        assert!(analysis.dependency_preserving);
    }

    #[test]
    fn test_new_schema_resets_history() {
        let mut store = SessionStore::new();
        let id = store.open();
        let schema = store.set_schema(id, abc()).unwrap();
        store.advance(id, split(&schema, &[&["A", "B"], &["A", "C"]]), None).unwrap();
        store.set_schema(id, abc()).unwrap();
        assert_eq!(store.current(id).unwrap(), None);
        assert_eq!(store.len(), 1);
    }
}
