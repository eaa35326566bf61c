//! CLI entry point for regopack.
//!
//! This module is intentionally thin: it handles argument parsing, output and
//! exit codes. All business logic lives in the `regopack-app` crate.

mod http;
mod serve;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use regopack_app::{
    LoadInput, PLUGIN_VERSION, load_pack, serialize_analyzer_info, verify_fixtures,
};
use regopack_settings::Overrides;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const DEFAULT_RULES_DIR: &str = "rules";

/// Exit code when fixture expectations are not met.
const EXIT_FIXTURES_FAILED: i32 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "regopack",
    about = "Rego policy pack analyzer for infrastructure-as-code engines",
    disable_version_flag = true
)]
struct Cli {
    /// Directory holding the rule sources (default: `rules`).
    #[arg(long)]
    rules: Option<Utf8PathBuf>,

    /// Print the pack's analyzer info as JSON and exit.
    #[arg(long)]
    get_plugin_info: bool,

    /// Print the plugin version and exit.
    #[arg(short = 'V', long)]
    version: bool,

    /// Analyze every `*.json` fixture in DIR; names containing `invalid` must
    /// produce violations.
    #[arg(long, value_name = "DIR")]
    test_fixtures: Option<Utf8PathBuf>,

    /// Override the pack display name.
    #[arg(long)]
    display_name: Option<String>,

    /// Address the analyzer service binds to. Port 0 picks a free port.
    #[arg(long, default_value = "127.0.0.1:0")]
    listen: SocketAddr,

    /// Emit logs as JSON lines on stderr.
    #[arg(long)]
    log_json: bool,

    /// Host engine address. Without `--rules`, an existing directory here is
    /// taken as the rules directory.
    target: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("regopack error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    if cli.version {
        println!("{PLUGIN_VERSION}");
        return Ok(0);
    }

    let serving = !cli.get_plugin_info && cli.test_fixtures.is_none();
    if serving && cli.target.is_none() {
        anyhow::bail!("could not connect to host RPC; missing argument");
    }

    let (rules_dir, host) = resolve_target(cli.rules.as_deref(), cli.target.as_deref());

    let ctx = load_pack(LoadInput {
        rules_dir: &rules_dir,
        overrides: Overrides {
            display_name: cli.display_name.clone(),
        },
    })
    .with_context(|| format!("load policy pack from {rules_dir}"))?;

    if cli.get_plugin_info {
        let json = serialize_analyzer_info(&ctx.analyzer_info())?;
        println!("{json}");
        return Ok(0);
    }

    if let Some(dir) = cli.test_fixtures.as_deref() {
        let report = verify_fixtures(&ctx, dir)?;
        print!("{}", report.render_text());
        return Ok(if report.all_passed() {
            0
        } else {
            EXIT_FIXTURES_FAILED
        });
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;
    runtime.block_on(serve::serve(Arc::new(ctx), cli.listen, host))?;
    Ok(0)
}

/// Split the flags into the rules directory and the host engine address.
fn resolve_target(rules: Option<&Utf8Path>, target: Option<&str>) -> (Utf8PathBuf, Option<String>) {
    match (rules, target) {
        (Some(dir), host) => (dir.to_path_buf(), host.map(str::to_string)),
        (None, Some(t)) if Utf8Path::new(t).is_dir() => (Utf8PathBuf::from(t), None),
        (None, host) => (
            Utf8PathBuf::from(DEFAULT_RULES_DIR),
            host.map(str::to_string),
        ),
    }
}
