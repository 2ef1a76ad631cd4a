//! arbor: print the tree of one bundle as widget JSON.
//!
//! Usage:
//!   arbor --fixture demos/countries.json --bundle country
//!   arbor --fixture demos/countries.json --bundle country --lang de --selected 2
//!   arbor --fixture demos/countries.json --bundle country --config demos/arbor.ron --raw
//!
//! Logs go to stderr; `RUST_LOG=debug` shows cache hits and skipped entities.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use arbor_core::{
    FixedAccount, FixedLanguage, MemoryCache, MemoryStore, SystemClock, TreeBuilder, TreeConfig,
    TreeDeps,
};
use arbor_types::{Account, BundleId, EntityId, LangCode, NodeId, to_widget_nodes};

/// Render a bundle's entities as a tree.
#[derive(Parser, Debug)]
#[command(name = "arbor")]
#[command(about = "Build the entity tree of one bundle")]
struct Args {
    /// JSON fixture with bundles, field definitions, and entities
    #[arg(short, long)]
    fixture: PathBuf,

    /// RON tree config (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bundle to build
    #[arg(short, long)]
    bundle: String,

    #[arg(long, default_value = "wisski_individual")]
    entity_type: String,

    /// Language for labels; the current language is used when omitted
    #[arg(short, long)]
    lang: Option<String>,

    /// The current language
    #[arg(long, default_value = "en")]
    default_lang: String,

    /// Account name the tree is built for
    #[arg(short, long, default_value = "admin")]
    user: String,

    /// Permissions held by the account (repeatable)
    #[arg(short, long = "permission", default_values_t = [String::from("access content")])]
    permissions: Vec<String>,

    /// Node ids to mark as selected (repeatable)
    #[arg(short, long)]
    selected: Vec<String>,

    /// Print plain tree nodes instead of widget nodes
    #[arg(long)]
    raw: bool,
}

fn parse_node_id(raw: &str) -> NodeId {
    match raw.parse::<u64>() {
        Ok(id) => NodeId::Entity(EntityId::new(id)),
        Err(_) => NodeId::Bundle(BundleId::from(raw)),
    }
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => TreeConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TreeConfig::default(),
    };

    let store = MemoryStore::load_file(&args.fixture)
        .with_context(|| format!("loading fixture {}", args.fixture.display()))?;
    tracing::info!(
        fixture = %args.fixture.display(),
        entities = store.entity_count(),
        "fixture loaded"
    );

    let account = args
        .permissions
        .iter()
        .fold(Account::new(args.user.as_str()), |acc, p| acc.with_permission(p.as_str()));

    let clock = Arc::new(SystemClock);
    let deps = TreeDeps::from_store(
        Arc::new(store),
        Arc::new(MemoryCache::new(clock.clone())),
        Arc::new(FixedLanguage::new(args.default_lang.as_str())),
        Arc::new(FixedAccount::new(account)),
        clock,
    );
    let builder = TreeBuilder::new(deps, config);

    let bundle = BundleId::from(args.bundle.as_str());
    let lang = args.lang.as_deref().map(LangCode::from);
    let tree = builder.load_tree(&args.entity_type, &bundle, lang.as_ref(), 0, None)?;

    let json = if args.raw {
        serde_json::to_string_pretty(&tree)?
    } else {
        let selected: Vec<NodeId> = args.selected.iter().map(|s| parse_node_id(s)).collect();
        serde_json::to_string_pretty(&to_widget_nodes(&tree, &selected))?
    };
    println!("{json}");

    Ok(())
}
