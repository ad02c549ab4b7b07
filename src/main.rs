// =============================================================================
// NORMRUST — Point d'entrée : ligne de commande et démonstration
// =============================================================================
//
// Sous-commandes :
//   demo       → exemple complet commenté, étape par étape
//   analyze    → résumé d'un schéma (clés, forme normale, dérivées)
//   closure    → X⁺ pour un ensemble X
//   project    → projection sur S et découpage {S, R \ S}
//   decompose  → analyse d'un découpage en tables
//   cover      → couverture minimale de F
//
// Exemple :
//   normrust decompose --header "A,B,C" --fds "A->B; B->C" --tables "A,B; B,C"
//
// =============================================================================

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use normrust::config::{Config, DerivedFdMode};
use normrust::core::analysis::Analyzer;
use normrust::core::closure::compute_closure;
use normrust::core::projection::minimal_cover;
use normrust::core::schema::{Decomposition, Schema};
use normrust::core::validate;
use normrust::parse;
use normrust::report::{JsonReporter, Reporter, TextReporter};
use normrust::session::SessionStore;

#[derive(Parser, Debug)]
#[clap(version, about = "Normalisation relationnelle : fermetures, formes normales, chase")]
struct Cli {
    /// Verbosité des logs (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Fichier de configuration JSON
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Format de sortie
    #[arg(long, value_enum, default_value_t = Format::Text, global = true)]
    format: Format,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Démonstration complète, étape par étape
    Demo,
    /// Résumé d'un schéma
    Analyze(SchemaArgs),
    /// Fermeture d'un ensemble d'attributs
    Closure {
        #[clap(flatten)]
        schema: SchemaArgs,
        /// Ensemble X, ex: "A,B" ou "1,2"
        #[arg(long)]
        attrs: String,
    },
    /// Projection sur un sous-ensemble d'attributs
    Project {
        #[clap(flatten)]
        schema: SchemaArgs,
        /// Cible S, ex: "A,B"
        #[arg(long)]
        target: String,
    },
    /// Analyse d'un découpage en tables
    Decompose {
        #[clap(flatten)]
        schema: SchemaArgs,
        /// Tables séparées par ';', ex: "A,B; B,C"
        #[arg(long)]
        tables: String,
        /// Sous-relation découpée (par défaut : tout le schéma)
        #[arg(long)]
        scope: Option<String>,
    },
    /// Couverture minimale des dépendances
    Cover(SchemaArgs),
}

#[derive(Args, Debug)]
struct SchemaArgs {
    /// En-tête : noms d'attributs dans l'ordre, ex: "A,B,C"
    #[arg(long)]
    header: String,

    /// Dépendances, ex: "A->B; B,C->A" (index 1-based acceptés)
    #[arg(long, default_value = "")]
    fds: String,

    /// Nom du schéma
    #[arg(long, default_value = "R")]
    name: String,

    /// Dépendances dérivées affichées
    #[arg(long, value_enum)]
    derived: Option<DerivedArg>,

    /// Limite d'attributs pour les énumérations exponentielles
    #[arg(long)]
    max_attrs: Option<usize>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Text,
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DerivedArg {
    Chain,
    Closure,
}

impl SchemaArgs {
    fn build(&self) -> Result<Schema> {
        let universe = parse::parse_header(&self.header).context("en-tête invalide")?;
        let parsed = parse::parse_fd_list(&self.fds, &universe).context("dépendances invalides")?;
        let schema = Schema::from_parts(&self.name, universe, parsed.fds);
        if let Err(findings) = validate::validate_schema(&schema) {
            for finding in findings {
                log::warn!("{}", finding);
            }
        }
        Ok(schema)
    }

    fn apply(&self, config: &mut Config) -> Result<()> {
        if let Some(derived) = self.derived {
            config.derived_fds = match derived {
                DerivedArg::Chain => DerivedFdMode::Chain,
                DerivedArg::Closure => DerivedFdMode::Closure,
            };
        }
        if let Some(max) = self.max_attrs {
            config.max_enumeration_attrs = max;
        }
        config.validate()?;
        Ok(())
    }
}

impl Cli {
    fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load(path)
                .with_context(|| format!("lecture de la configuration {}", path.display())),
            None => Ok(Config::default()),
        }
    }

    fn reporter(&self) -> Box<dyn Reporter> {
        match self.format {
            Format::Text => Box::new(TextReporter::new()),
            Format::Json => Box::new(JsonReporter::new(true)),
        }
    }

    fn run(self) -> Result<()> {
        let mut config = self.load_config()?;
        let reporter = self.reporter();

        let output = match &self.command {
            Command::Demo => return demo(&config),
            Command::Analyze(args) => {
                args.apply(&mut config)?;
                let schema = args.build()?;
                let summary = Analyzer::new(&schema, &config).summarize()?;
                reporter.summary(&schema, &summary)?
            }
            Command::Closure { schema: args, attrs } => {
                args.apply(&mut config)?;
                let schema = args.build()?;
                let x = parse::parse_attr_list(attrs, &schema.universe)?;
                reporter.closure(&schema, x, compute_closure(x, &schema.fds))?
            }
            Command::Project { schema: args, target } => {
                args.apply(&mut config)?;
                let schema = args.build()?;
                let target = parse::parse_attr_list(target, &schema.universe)?;
                let analysis = Analyzer::new(&schema, &config).analyze_projection(target)?;
                reporter.projection(&schema, &analysis)?
            }
            Command::Decompose {
                schema: args,
                tables,
                scope,
            } => {
                args.apply(&mut config)?;
                let schema = args.build()?;
                let decomposition = parse::parse_decomposition(tables, &schema.universe)?;
                let scope = scope
                    .as_deref()
                    .map(|s| parse::parse_attr_list(s, &schema.universe))
                    .transpose()?;
                let analysis =
                    Analyzer::new(&schema, &config).analyze_decomposition(&decomposition, scope)?;
                reporter.decomposition(&schema, &analysis)?
            }
            Command::Cover(args) => {
                args.apply(&mut config)?;
                let schema = args.build()?;
                reporter.cover(&schema, &minimal_cover(&schema.fds))?
            }
        };

        log::debug!("rendu au format {}", reporter.name());
        println!("{}", output);
        Ok(())
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    cli.run()
}

// =============================================================================
// DÉMONSTRATION
// =============================================================================

fn demo(config: &Config) -> Result<()> {
    println!("╔══════════════════════════════════════════════════╗");
    println!("║      NORMRUST — Normalisation relationnelle      ║");
    println!("║      Fermetures, formes normales, chase          ║");
    println!("╚══════════════════════════════════════════════════╝\n");

    let text = TextReporter::new();
    let mut store = SessionStore::new();
    let id = store.open();

    // ═══════════════════════════════════════════════════════════
    // ÉTAPE 1 : Le schéma de base (une seule grande table)
    // ═══════════════════════════════════════════════════════════
    println!("═══ ÉTAPE 1 : Schéma de base ═══\n");

    let universe = parse::parse_header("client, ville, produit, prix, quantite")?;
    let parsed = parse::parse_fd_list(
        "client -> ville; produit → prix; client,produit -> quantite; 2 -> ",
        &universe,
    )?;
    for dropped in &parsed.dropped {
        println!("  (ignorée : '{}')", dropped);
    }
    let schema = store.set_schema(id, Schema::from_parts("Commande", universe, parsed.fds))?;
    println!("{}\n", schema);

    match validate::validate_schema(&schema) {
        Ok(()) => println!("✓ Schéma valide\n"),
        Err(errors) => {
            for e in errors {
                println!("✗ {}", e);
            }
        }
    }

    // ═══════════════════════════════════════════════════════════
    // ÉTAPE 2 : Résumé (clés, forme normale)
    // ═══════════════════════════════════════════════════════════
    println!("═══ ÉTAPE 2 : Résumé ═══\n");

    let analyzer = Analyzer::new(&schema, config);
    print!("{}", text.summary(&schema, &analyzer.summarize()?)?);
    println!();

    // ═══════════════════════════════════════════════════════════
    // ÉTAPE 3 : Fermetures
    // ═══════════════════════════════════════════════════════════
    println!("═══ ÉTAPE 3 : Fermetures ═══\n");

    for attrs in ["client", "produit", "client,produit"] {
        let x = parse::parse_attr_list(attrs, &schema.universe)?;
        print!("  {}", text.closure(&schema, x, compute_closure(x, &schema.fds))?);
    }
    println!();

    // ═══════════════════════════════════════════════════════════
    // ÉTAPE 4 : Un premier découpage (mauvais)
    // ═══════════════════════════════════════════════════════════
    println!("═══ ÉTAPE 4 : Découpage naïf ═══\n");

    let naive = parse::parse_decomposition("client, ville; produit, prix, quantite", &schema.universe)?;
    println!("  {}\n", naive.display(&schema.universe));
    store.advance(id, naive, None)?;
    print!("{}", text.decomposition(&schema, &store.analyze_current(id, config)?)?);
    println!();

    // ═══════════════════════════════════════════════════════════
    // ÉTAPE 5 : Annuler, puis le découpage BCNF
    // ═══════════════════════════════════════════════════════════
    println!("═══ ÉTAPE 5 : Annulation et découpage BCNF ═══\n");

    store.undo(id)?;
    println!("  étape courante après annulation : {:?}\n", store.stage(id)?);

    let bcnf = parse::parse_decomposition(
        "client, ville; produit, prix; client, produit, quantite",
        &schema.universe,
    )?;
    println!("  {}\n", bcnf.display(&schema.universe));
    store.advance(id, bcnf, None)?;
    let analysis = store.analyze_current(id, config)?;
    print!("{}", text.decomposition(&schema, &analysis)?);
    println!();

    // ═══════════════════════════════════════════════════════════
    // ÉTAPE 6 : Projection et couverture minimale
    // ═══════════════════════════════════════════════════════════
    println!("═══ ÉTAPE 6 : Projection et couverture minimale ═══\n");

    let target = parse::parse_attr_list("client, ville, produit", &schema.universe)?;
    print!("{}", text.projection(&schema, &analyzer.analyze_projection(target)?)?);
    println!();
    print!("{}", text.cover(&schema, &minimal_cover(&schema.fds))?);
    println!();

    // ═══════════════════════════════════════════════════════════
    // ÉTAPE 7 : Le même résultat en JSON
    // ═══════════════════════════════════════════════════════════
    println!("═══ ÉTAPE 7 : Export JSON ═══\n");
    println!("{}", JsonReporter::new(true).decomposition(&schema, &analysis)?);

    let tables: Decomposition = store
        .current(id)?
        .map(|s| s.decomposition.clone())
        .unwrap_or_default();

    println!("\n═══════════════════════════════════════════════════");
    println!("Normalisation complète !");
    println!("  {} attributs → {} tables", schema.attribute_count(), tables.len());
    println!(
        "  sans perte : {}, préservation : {}, BCNF : {}",
        analysis.lossless.lossless, analysis.dependency_preserving, analysis.all_bcnf
    );
    println!("═══════════════════════════════════════════════════");

    store.close(id)?;
    Ok(())
}
