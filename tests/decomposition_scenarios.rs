//! Scénarios de bout en bout : texte → schéma → analyses → rendus.

use normrust::config::{Config, DerivedFdMode};
use normrust::core::analysis::Analyzer;
use normrust::core::normal_form::NormalForm;
use normrust::core::schema::Schema;
use normrust::parse::{parse_attr_list, parse_decomposition, parse_fd_list, parse_header};
use normrust::report::{JsonReporter, Reporter, TextReporter};
use normrust::session::{SessionStore, Stage};
use normrust::NormError;
use serde_json::Value;

fn commande() -> Schema {
    let universe = parse_header("client, ville, produit, prix, quantite").unwrap();
    let parsed = parse_fd_list(
        "client -> ville; produit → prix; client,produit -> quantite",
        &universe,
    )
    .unwrap();
    assert!(parsed.dropped.is_empty());
    Schema::from_parts("Commande", universe, parsed.fds)
}

// =============================================================================
// SCHÉMA DE BASE
// =============================================================================

#[test]
fn test_commande_summary() {
    let schema = commande();
    let config = Config::default();
    let summary = Analyzer::new(&schema, &config).summarize().unwrap();

    let key = schema.set(&["client", "produit"]).unwrap();
    assert_eq!(summary.candidate_keys, vec![key]);
    assert_eq!(summary.normal_form, NormalForm::First);
    assert!(!summary.already_bcnf);
    assert!(!summary.violations.is_empty());
}

#[test]
fn test_positions_and_names_agree() {
    let universe = parse_header("A,B,C").unwrap();
    let by_name = parse_fd_list("A->B; B->C", &universe).unwrap();
    let by_position = parse_fd_list("1->2\n2->3", &universe).unwrap();
    assert_eq!(by_name.fds, by_position.fds);
}

#[test]
fn test_out_of_range_position() {
    let universe = parse_header("A,B,C").unwrap();
    let err = parse_fd_list("4->1", &universe).unwrap_err();
    assert!(matches!(err, NormError::InvalidIndex { index: 4, len: 3 }));
    assert!(err.is_resolution_error());
}

#[test]
fn test_malformed_items_are_reported() {
    let universe = parse_header("A,B,C").unwrap();
    let parsed = parse_fd_list("A->B; ->C; A->B->C", &universe).unwrap();
    assert_eq!(parsed.fds.len(), 1);
    assert_eq!(parsed.dropped.len(), 2);
}

// =============================================================================
// DÉCOUPAGES
// =============================================================================

#[test]
fn test_naive_split_is_lossy_and_loses_dependency() {
    let schema = commande();
    let config = Config::default();
    let naive = parse_decomposition("client, ville; produit, prix, quantite", &schema.universe).unwrap();
    let analysis = Analyzer::new(&schema, &config)
        .analyze_decomposition(&naive, None)
        .unwrap();

    assert!(!analysis.lossless.lossless);
    assert!(analysis.lossless.shared.is_empty());
    assert!(!analysis.dependency_preserving);
    assert_eq!(
        analysis.missing_fds,
        vec![schema.fd(&["client", "produit"], &["quantite"]).unwrap()]
    );
    assert!(analysis.uncovered.is_empty());
}

#[test]
fn test_bcnf_split_is_sound() {
    let schema = commande();
    let config = Config::default();
    let split = parse_decomposition(
        "client, ville; produit, prix; client, produit, quantite",
        &schema.universe,
    )
    .unwrap();
    let analysis = Analyzer::new(&schema, &config)
        .analyze_decomposition(&split, None)
        .unwrap();

    assert!(analysis.lossless.lossless);
    assert!(analysis.dependency_preserving);
    assert!(analysis.all_bcnf);
    assert_eq!(analysis.tables.len(), 3);
    assert!(analysis.tables.iter().all(|t| t.normal_form == NormalForm::BoyceCodd));
}

#[test]
fn test_scoped_split_uses_projected_dependencies() {
    let universe = parse_header("A,B,C,D").unwrap();
    let fds = parse_fd_list("A->B; B->C; C->D", &universe).unwrap().fds;
    let schema = Schema::from_parts("R", universe, fds);
    let config = Config::default();

    let scope = parse_attr_list("A,C,D", &schema.universe).unwrap();
    let split = parse_decomposition("A,C; C,D", &schema.universe).unwrap();
    let analysis = Analyzer::new(&schema, &config)
        .analyze_decomposition(&split, Some(scope))
        .unwrap();

    assert_eq!(analysis.scope, scope);
    assert!(analysis.scope_fds.contains(&schema.fd(&["A"], &["C"]).unwrap()));
    assert!(analysis.lossless.lossless);
    assert!(analysis.dependency_preserving);
}

#[test]
fn test_projection_complement() {
    let schema = commande();
    let config = Config::default();
    let target = parse_attr_list("client, ville, produit", &schema.universe).unwrap();
    let analysis = Analyzer::new(&schema, &config).analyze_projection(target).unwrap();

    assert_eq!(analysis.fds, vec![schema.fd(&["client"], &["ville"]).unwrap()]);
    assert_eq!(analysis.complement, schema.set(&["prix", "quantite"]).unwrap());
    assert!(!analysis.dependency_preserving);
    assert!(!analysis.lossless.lossless);
}

#[test]
fn test_enumeration_limit() {
    let schema = commande();
    let config = Config {
        max_enumeration_attrs: 3,
        derived_fds: DerivedFdMode::Chain,
    };
    let err = Analyzer::new(&schema, &config).summarize().unwrap_err();
    assert!(matches!(err, NormError::EnumerationLimit { attrs: 5, limit: 3 }));
}

// =============================================================================
// SESSION PAS À PAS
// =============================================================================

#[test]
fn test_session_flow_with_undo() {
    let config = Config::default();
    let mut store = SessionStore::new();
    let id = store.open();
    assert_eq!(store.stage(id).unwrap(), Stage::AwaitingSchema);

    let early = parse_decomposition("1,2", &parse_header("A,B").unwrap()).unwrap();
    assert!(matches!(
        store.advance(id, early, None),
        Err(NormError::MissingPrerequisiteState { .. })
    ));

    let schema = store.set_schema(id, commande()).unwrap();
    assert!(store.undo(id).is_err());

    let naive = parse_decomposition("client, ville; produit, prix, quantite", &schema.universe).unwrap();
    let split = parse_decomposition(
        "client, ville; produit, prix; client, produit, quantite",
        &schema.universe,
    )
    .unwrap();
    store.advance(id, naive.clone(), None).unwrap();
    store.advance(id, split, None).unwrap();
    assert_eq!(store.stage(id).unwrap(), Stage::Decomposed(2));
    assert!(store.analyze_current(id, &config).unwrap().lossless.lossless);

    let back = store.undo(id).unwrap().unwrap();
    assert_eq!(back.decomposition, naive);
    assert!(!store.analyze_current(id, &config).unwrap().lossless.lossless);

    store.close(id).unwrap();
    assert!(store.is_empty());
    assert!(store.stage(id).is_err());
}

// =============================================================================
// RENDUS
// =============================================================================

#[test]
fn test_reporters_agree() {
    let schema = commande();
    let config = Config::default();
    let split = parse_decomposition(
        "client, ville; produit, prix; client, produit, quantite",
        &schema.universe,
    )
    .unwrap();
    let analysis = Analyzer::new(&schema, &config)
        .analyze_decomposition(&split, None)
        .unwrap();

    let text = TextReporter::new().decomposition(&schema, &analysis).unwrap();
    assert!(text.contains("✓ Jointure sans perte"));
    assert!(text.contains("✓ Préservation des dépendances"));

    let json = JsonReporter::new(false).decomposition(&schema, &analysis).unwrap();
    let v: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(v["lossless_join"]["is_lossless"], Value::Bool(true));
    assert_eq!(v["all_bcnf"], Value::Bool(true));
    assert_eq!(v["tables"].as_array().map(Vec::len), Some(3));
}
