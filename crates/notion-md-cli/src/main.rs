use anyhow::{Context, Result, bail};
use clap::Parser;
use log::LevelFilter;
use notion_md_config::Config;
use notion_md_engine::{
    BlockId, CancelToken, ClientSettings, ConvertError, MarkdownRenderer, NotionClient, Retrying,
    TreeFetcher, convert_document, write_markdown,
};
use std::{
    env, io,
    path::{Path, PathBuf},
    process,
    time::Duration,
};

const TOKEN_ENV_VAR: &str = "NOTION_TOKEN";

/// Convert a Notion page (or any block with children) to Markdown.
///
/// The page is fetched recursively with the token from NOTION_TOKEN and the
/// Markdown is written to stdout.
#[derive(Parser, Debug)]
#[command(
    name = "notion-to-md",
    version,
    after_help = "Examples:\n  notion-to-md cec15681-9083-4e1f-a0ae-72d268507aab\n  notion-to-md https://www.notion.so/team/By-name-cec1568190834e1fa0ae72d268507aab\n  notion-to-md --stdin < blocks.json"
)]
struct Cli {
    /// Block id or Notion page URL
    #[arg(required_unless_present_any = ["stdin", "init_config"], conflicts_with = "stdin")]
    target: Option<String>,

    /// Read one exported block list (JSON) from stdin instead of fetching
    #[arg(long)]
    stdin: bool,

    /// Indent nested list items by their depth in the block tree
    #[arg(long)]
    indent_nested: bool,

    /// Maximum nesting depth to fetch before failing
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Abort the whole fetch after this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Config file to use instead of ~/.config/notion-md/config.toml
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write a default config file and exit
    #[arg(long)]
    init_config: bool,

    /// Log progress to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(log_level(cli.verbose))
        .format_target(false)
        .parse_default_env()
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = config_path(cli.config.as_deref());

    if cli.init_config {
        return init_config(&config_path);
    }

    let config = match Config::load_from_path(&config_path)? {
        Some(config) => {
            log::info!("Loaded config from {}", config_path.display());
            config
        }
        None => {
            log::debug!("No config at {}, using defaults", config_path.display());
            Config::default()
        }
    };

    let renderer = MarkdownRenderer::new()
        .with_nested_indent(cli.indent_nested || config.render.indent_nested_lists);

    let markdown = if cli.stdin {
        convert_document(io::stdin().lock(), &renderer)
            .context("failed to convert document from stdin")?
    } else {
        let target = cli
            .target
            .as_deref()
            .context("a block id or Notion URL is required")?;
        fetch_markdown(target, &cli, &config, &renderer)?
    };

    write_markdown(io::stdout().lock(), &markdown).context("failed to write markdown")
}

fn fetch_markdown(
    target: &str,
    cli: &Cli,
    config: &Config,
    renderer: &MarkdownRenderer,
) -> Result<String> {
    let root = BlockId::resolve(target)?;
    log::info!("Resolved {target} to block {root}");

    let token = config
        .resolve_token(env::var(TOKEN_ENV_VAR).ok())
        .ok_or_else(|| ConvertError::Auth(format!("{TOKEN_ENV_VAR} environment variable not set")))?;

    let settings = ClientSettings {
        base_url: config.api.base_url.clone(),
        notion_version: config.api.notion_version.clone(),
        page_size: config.api.page_size,
        timeout: Duration::from_secs(config.api.timeout_secs),
    };
    let client = Retrying::new(NotionClient::new(token, settings)?, config.api.max_retries);

    let mut cancel = CancelToken::new();
    if let Some(secs) = cli.timeout {
        cancel = cancel.with_timeout(Duration::from_secs(secs));
    }

    let blocks = TreeFetcher::new(client)
        .with_max_depth(cli.max_depth.unwrap_or(config.fetch.max_depth))
        .with_cancel_token(cancel)
        .fetch_tree(&root)
        .with_context(|| format!("failed to fetch blocks for {root}"))?;
    log::info!("Fetched {} blocks", blocks.len());

    Ok(renderer.render_tree(&blocks))
}

fn init_config(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        bail!("config file already exists at {}", config_path.display());
    }

    Config::default()
        .save_to_path(config_path)
        .with_context(|| format!("failed to write {}", config_path.display()))?;
    eprintln!("Wrote default config to {}", config_path.display());
    Ok(())
}

fn config_path(arg: Option<&Path>) -> PathBuf {
    match arg {
        Some(path) => Config::expand_path(path).unwrap_or_else(|| path.to_path_buf()),
        None => Config::config_path(),
    }
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
