//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use malldir_core::{
    FeedKind, ListingFeed, MallStrategy, SourceInput, StrategyRegistry, build_directory,
    source_meta,
};
use malldir_shared::{
    AppConfig, Directory, MallDirError, init_config, init_config_at, load_config, load_config_from,
};
use serde_json::Value;
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// malldir: canonical shopping-mall directories from scraped sources.
#[derive(Parser)]
#[command(
    name = "malldir",
    version,
    about = "Normalize shopping-mall directory pages and API dumps into canonical directory JSON.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (defaults to ~/.malldir/malldir.toml).
    #[arg(long, global = true, env = "MALLDIR_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// How the `--input` file is read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub(crate) enum InputKind {
    /// Rendered HTML page; visible text becomes the token stream.
    Html,
    /// JSON array of token strings.
    Tokens,
    /// JSON listing page (`{"docs": [...]}`) or bare array of documents.
    Listings,
    /// HTML page streaming its data through flight pushes, or the decoded
    /// payload itself.
    Flight,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Build a mall's directory from a saved source.
    Build(BuildArgs),

    /// List known mall strategies and configured aliases.
    List,

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args, Debug)]
pub(crate) struct BuildArgs {
    /// Mall slug (a built-in strategy or a configured alias).
    #[arg(long)]
    pub mall: String,

    /// Source file: HTML page, token list, or listing JSON.
    #[arg(long)]
    pub input: PathBuf,

    /// Input format (defaults to what the mall's strategy reads).
    #[arg(long, value_enum)]
    pub kind: Option<InputKind>,

    /// Dining listings to read alongside `--input` (listings only).
    #[arg(long)]
    pub dinings: Option<PathBuf>,

    /// Floor documents giving authoritative floor names and order.
    #[arg(long)]
    pub floors: Option<PathBuf>,

    /// Output directory (defaults to the configured output_dir).
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "malldir=info",
        1 => "malldir=debug",
        _ => "malldir=trace",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Command::Build(args) => {
            let config = resolve_config(config_path)?;
            let outcome = cmd_build(&args, &config)?;
            print_summary(&outcome);
            Ok(())
        }
        Command::List => cmd_list(&resolve_config(config_path)?),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(config_path),
            ConfigAction::Show => cmd_config_show(&resolve_config(config_path)?),
        },
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

// ---------------------------------------------------------------------------
// build
// ---------------------------------------------------------------------------

/// What a build wrote.
#[derive(Debug)]
pub(crate) struct BuildOutcome {
    pub path: PathBuf,
    pub directory: Directory,
}

pub(crate) fn cmd_build(args: &BuildArgs, config: &AppConfig) -> Result<BuildOutcome> {
    let registry = StrategyRegistry::new();
    let entry = config.mall(&args.mall);
    let strategy_slug = entry.map_or(args.mall.as_str(), |e| e.strategy_slug());
    let strategy = registry.get(strategy_slug).ok_or_else(|| {
        MallDirError::config(format!(
            "unknown mall '{}': no strategy named '{strategy_slug}' (see `malldir list`)",
            args.mall
        ))
    })?;

    let kind = args.kind.unwrap_or_else(|| default_kind(strategy, &args.input));
    info!(
        mall = %args.mall,
        strategy = strategy.slug(),
        ?kind,
        input = %args.input.display(),
        "building directory"
    );

    let input = read_input(kind, args)?;
    if input.is_empty() {
        warn!(input = %args.input.display(), "input holds no tokens or documents");
    }
    let source = source_meta(strategy, entry, Utc::now())?;
    let directory = build_directory(&args.mall, source, input, strategy)?;

    let out_dir = args
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.defaults.output_dir));
    let path = write_directory(&out_dir, &directory)?;

    Ok(BuildOutcome { path, directory })
}

/// Token strategies read HTML; otherwise JSON files are listings and
/// anything else is a flight page.
fn default_kind(strategy: &dyn MallStrategy, input: &Path) -> InputKind {
    if strategy.classifier_rules().is_some() {
        InputKind::Html
    } else if input.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
        InputKind::Listings
    } else {
        InputKind::Flight
    }
}

fn read_input(kind: InputKind, args: &BuildArgs) -> Result<SourceInput> {
    let input = match kind {
        InputKind::Html => {
            SourceInput::Tokens(malldir_extract::text_tokens(&read_text(&args.input)?))
        }
        InputKind::Tokens => {
            let text = read_text(&args.input)?;
            let tokens: Vec<String> = serde_json::from_str(&text).wrap_err_with(|| {
                format!("{} is not a JSON array of strings", args.input.display())
            })?;
            SourceInput::Tokens(tokens)
        }
        InputKind::Listings => {
            let mut feeds = vec![ListingFeed::new(FeedKind::Shops, read_docs(&args.input)?)];
            if let Some(dinings) = &args.dinings {
                feeds.push(ListingFeed::new(FeedKind::Dinings, read_docs(dinings)?));
            }
            let floors = match &args.floors {
                Some(path) => read_docs(path)?,
                None => Vec::new(),
            };
            SourceInput::Listings { feeds, floors }
        }
        InputKind::Flight => {
            let text = read_text(&args.input)?;
            let payload = malldir_extract::flight_payload(&text);
            if payload.is_empty() {
                SourceInput::OccupantPayload(text)
            } else {
                SourceInput::OccupantPayload(payload)
            }
        }
    };

    if kind != InputKind::Listings && (args.dinings.is_some() || args.floors.is_some()) {
        warn!(?kind, "--dinings and --floors only apply to listings input; ignored");
    }
    Ok(input)
}

fn read_text(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path).map_err(|e| MallDirError::io(path, e))?;
    Ok(text)
}

/// A listing dump is either one API page (`{"docs": [...]}`) or a bare
/// array of documents.
fn read_docs(path: &Path) -> Result<Vec<Value>> {
    let text = read_text(path)?;
    let value: Value = serde_json::from_str(&text)
        .wrap_err_with(|| format!("{} is not valid JSON", path.display()))?;
    match value {
        Value::Array(docs) => Ok(docs),
        Value::Object(mut page) => match page.remove("docs") {
            Some(Value::Array(docs)) => Ok(docs),
            _ => Err(eyre!("{}: expected a `docs` array", path.display())),
        },
        _ => Err(eyre!(
            "{}: expected a JSON array or an object with a `docs` array",
            path.display()
        )),
    }
}

/// Write `<out_dir>/<slug>.json` as pretty UTF-8 JSON.
fn write_directory(out_dir: &Path, directory: &Directory) -> Result<PathBuf> {
    std::fs::create_dir_all(out_dir).map_err(|e| MallDirError::io(out_dir, e))?;
    let path = out_dir.join(format!("{}.json", directory.mall_slug));
    let mut json = serde_json::to_string_pretty(directory).map_err(MallDirError::from)?;
    json.push('\n');
    std::fs::write(&path, json).map_err(|e| MallDirError::io(&path, e))?;
    info!(path = %path.display(), "wrote directory");
    Ok(path)
}

fn print_summary(outcome: &BuildOutcome) {
    let dir = &outcome.directory;
    println!();
    println!("  Directory built: {}", dir.mall_slug);
    println!("  Source:  {}", dir.source.name);
    println!("  Floors:  {}", dir.floor_count);
    println!("  Stores:  {}", dir.store_count);
    let listed = dir.listed_store_count();
    if listed != dir.store_count {
        println!("  Listed:  {listed} (source declares {})", dir.store_count);
    }
    println!("  Output:  {}", outcome.path.display());
    println!();
}

// ---------------------------------------------------------------------------
// list / config
// ---------------------------------------------------------------------------

fn cmd_list(config: &AppConfig) -> Result<()> {
    let registry = StrategyRegistry::new();
    println!("Strategies:");
    for strategy in registry.iter() {
        println!(
            "  {:<24} {}  <{}>",
            strategy.slug(),
            strategy.source_name(),
            strategy.source_url()
        );
    }

    if !config.malls.is_empty() {
        println!("Configured malls:");
        for entry in &config.malls {
            let known = registry.get(entry.strategy_slug()).is_some();
            println!(
                "  {:<24} -> {}{}",
                entry.slug,
                entry.strategy_slug(),
                if known { "" } else { " (unknown strategy)" }
            );
        }
    }
    Ok(())
}

fn cmd_config_init(path: Option<&Path>) -> Result<()> {
    let path = match path {
        Some(path) => {
            init_config_at(path)?;
            path.to_path_buf()
        }
        None => init_config()?,
    };
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(config: &AppConfig) -> Result<()> {
    let toml_str = toml::to_string_pretty(config)?;
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use malldir_shared::{Category, StoreStatus};

    fn fixture(path: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../fixtures")
            .join(path)
    }

    fn build_args(argv: &[&str]) -> BuildArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Command::Build(args) => args,
            _ => panic!("expected build"),
        }
    }

    fn build(mall: &str, input: &str, extra: &[&str]) -> (tempfile::TempDir, BuildOutcome) {
        let out = tempfile::tempdir().unwrap();
        let input = fixture(input);
        let out_str = out.path().to_str().unwrap().to_string();
        let mut argv = vec![
            "malldir",
            "build",
            "--mall",
            mall,
            "--input",
            input.to_str().unwrap(),
            "--out",
            out_str.as_str(),
        ];
        let extra: Vec<String> = extra
            .iter()
            .map(|a| match a.strip_prefix("fixture:") {
                Some(rel) => fixture(rel).to_string_lossy().into_owned(),
                None => a.to_string(),
            })
            .collect();
        argv.extend(extra.iter().map(String::as_str));
        let outcome = cmd_build(&build_args(&argv), &AppConfig::default()).unwrap();
        (out, outcome)
    }

    #[test]
    fn parses_global_flags_anywhere() {
        let cli = Cli::try_parse_from([
            "malldir",
            "build",
            "--mall",
            "iconsiam",
            "--input",
            "shops.json",
            "-vv",
            "--log-format",
            "json",
            "--kind",
            "listings",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.log_format, LogFormat::Json));
        match cli.command {
            Command::Build(args) => {
                assert_eq!(args.kind, Some(InputKind::Listings));
                assert_eq!(args.out, None);
            }
            _ => panic!("expected build"),
        }
    }

    #[test]
    fn build_requires_mall_and_input() {
        assert!(Cli::try_parse_from(["malldir", "build", "--input", "x.html"]).is_err());
        assert!(Cli::try_parse_from(["malldir", "build", "--mall", "iconsiam"]).is_err());
        assert!(
            Cli::try_parse_from([
                "malldir", "build", "--mall", "a", "--input", "b", "--kind", "pdf"
            ])
            .is_err()
        );
    }

    #[test]
    fn config_subcommands_parse() {
        let cli =
            Cli::try_parse_from(["malldir", "--config", "/tmp/m.toml", "config", "show"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some(Path::new("/tmp/m.toml")));
        assert!(matches!(
            cli.command,
            Command::Config {
                action: ConfigAction::Show
            }
        ));
    }

    #[test]
    fn builds_shoplist_page() {
        let (_out, outcome) = build(
            "central-chaengwattana",
            "html/central-chaengwattana-shoplist.html",
            &[],
        );
        let dir = &outcome.directory;
        assert_eq!(dir.store_count, 7);
        let ids: Vec<&str> = dir.floors.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["B1", "G", "1", "2", "3"]);

        let ground: Vec<&str> = dir.floors[1].stores.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(ground, ["Starbucks", "Kasikorn Bank"]);
        let third = &dir.floors[4].stores;
        assert_eq!(third[0].name, "After You Dessert Cafe");
        assert_eq!(third[0].category, Category::FoodAndBeverage);
        assert_eq!(third[1].category, Category::Electronics);
        assert_eq!(dir.floors[0].stores[0].category, Category::Services);
    }

    #[test]
    fn builds_status_card_page() {
        let (_out, outcome) = build("charn-at-the-avenue", "html/charn-directory.html", &[]);
        let dir = &outcome.directory;
        assert_eq!(dir.store_count, 4);
        let ids: Vec<&str> = dir.floors.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["UNKNOWN", "1", "2"]);

        let greyhound = &dir.floors[1].stores[0];
        assert_eq!(greyhound.name, "Greyhound Cafe");
        assert_eq!(greyhound.name_local.as_deref(), Some("เกรฮาวด์ คาเฟ่"));
        assert_eq!(greyhound.unit, "A-101");
        assert_eq!(greyhound.landmarks, ["Building A"]);
        assert_eq!(greyhound.status, StoreStatus::Active);

        let second: Vec<(&str, StoreStatus)> = dir.floors[2]
            .stores
            .iter()
            .map(|s| (s.name.as_str(), s.status))
            .collect();
        assert_eq!(
            second,
            [("Boots", StoreStatus::Closed), ("Fitness First", StoreStatus::Active)]
        );
        assert_eq!(dir.floors[0].stores[0].name, "Pop-up Market");
    }

    #[test]
    fn builds_flight_page_with_declared_count() {
        let (_out, outcome) = build("siam-paragon", "html/siamparagon-directory.html", &[]);
        let dir = &outcome.directory;
        assert_eq!(dir.store_count, 6);
        assert_eq!(dir.listed_store_count(), 5);
        let floors: Vec<(&str, i32)> =
            dir.floors.iter().map(|f| (f.id.as_str(), f.order)).collect();
        assert_eq!(floors, [("B1", -1), ("G", 0), ("M", 1), ("3", 4), ("5", 6)]);
        assert_eq!(dir.floors[0].stores[0].category, Category::Entertainment);
        assert_eq!(dir.floors[1].stores[0].category, Category::FoodAndBeverage);
        assert_eq!(dir.floors[3].stores[0].category, Category::Books);
    }

    #[test]
    fn builds_listing_dumps_and_writes_json() {
        let (out, outcome) = build(
            "iconsiam",
            "json/iconsiam-shops.json",
            &[
                "--dinings",
                "fixture:json/iconsiam-dinings.json",
                "--floors",
                "fixture:json/iconsiam-floors.json",
            ],
        );
        assert_eq!(outcome.path, out.path().join("iconsiam.json"));
        assert_eq!(outcome.directory.store_count, 6);

        let written = std::fs::read_to_string(&outcome.path).unwrap();
        assert!(written.contains("ไอคอนคราฟต์"));
        assert!(written.ends_with("}\n"));
        let json: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(json["mallSlug"], "iconsiam");
        assert_eq!(json["floorCount"], 5);
        assert_eq!(json["floors"][0]["id"], "UG");
        assert!(json["retrievedAt"].as_str().unwrap().ends_with('Z'));
    }

    #[test]
    fn alias_from_config_reuses_a_strategy() {
        let config: AppConfig = toml::from_str(
            r#"
[[malls]]
slug = "cwn"
strategy = "central-chaengwattana"
source_name = "Central CWN mirror"
"#,
        )
        .unwrap();
        let out = tempfile::tempdir().unwrap();
        let args = BuildArgs {
            mall: "cwn".into(),
            input: fixture("html/central-chaengwattana-shoplist.html"),
            kind: None,
            dinings: None,
            floors: None,
            out: Some(out.path().to_path_buf()),
        };
        let outcome = cmd_build(&args, &config).unwrap();
        assert_eq!(outcome.path, out.path().join("cwn.json"));
        assert_eq!(outcome.directory.mall_slug, "cwn");
        assert_eq!(outcome.directory.source.name, "Central CWN mirror");
    }

    #[test]
    fn unknown_mall_is_an_error() {
        let args = BuildArgs {
            mall: "mega-bangna".into(),
            input: fixture("html/charn-directory.html"),
            kind: None,
            dinings: None,
            floors: None,
            out: None,
        };
        let err = cmd_build(&args, &AppConfig::default()).unwrap_err();
        assert!(err.to_string().contains("mega-bangna"));
    }

    #[test]
    fn malformed_payload_fails_without_output() {
        let out = tempfile::tempdir().unwrap();
        let args = BuildArgs {
            mall: "siam-paragon".into(),
            input: fixture("html/charn-directory.html"),
            kind: Some(InputKind::Flight),
            dinings: None,
            floors: None,
            out: Some(out.path().to_path_buf()),
        };
        let err = cmd_build(&args, &AppConfig::default()).unwrap_err();
        assert!(err.to_string().contains("malformed source"));
        assert!(!out.path().join("siam-paragon.json").exists());
    }

    #[test]
    fn token_list_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("tokens.json");
        std::fs::write(
            &input,
            r#"["ALL SHOPS", "Fashion", "Zara", "3F", "Food & Beverage", "Starbucks", "GF"]"#,
        )
        .unwrap();
        let args = BuildArgs {
            mall: "central-chaengwattana".into(),
            input,
            kind: Some(InputKind::Tokens),
            dinings: None,
            floors: None,
            out: Some(dir.path().join("out")),
        };
        let outcome = cmd_build(&args, &AppConfig::default()).unwrap();
        assert_eq!(outcome.directory.store_count, 2);
        assert_eq!(outcome.directory.floors[0].stores[0].name, "Starbucks");
    }

    #[test]
    fn read_docs_accepts_pages_and_arrays() {
        let dir = tempfile::tempdir().unwrap();
        let array = dir.path().join("array.json");
        std::fs::write(&array, r#"[{"name": "G"}]"#).unwrap();
        assert_eq!(read_docs(&array).unwrap().len(), 1);
        assert_eq!(read_docs(&fixture("json/iconsiam-floors.json")).unwrap().len(), 4);

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, r#"{"items": []}"#).unwrap();
        assert!(read_docs(&bad).is_err());
    }
}
