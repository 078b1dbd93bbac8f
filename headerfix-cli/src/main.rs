mod config;

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use config::{CliOverrides, ConfigMerger};
use fs_err as fs;
use headerfix_edit::{
    PatchEvent, PatchOptions, PatchRun, Progress, builtin_rules, lookup_rule, patch_all,
    select_rules,
};
use headerfix_render::render_report_md;
use headerfix_types::report::ToolInfo;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "headerfix",
    version,
    about = "Rewrites modular Firebase imports in Flutter plugin headers.",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Command>,

    #[command(flatten)]
    patch: PatchArgs,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Patch the target headers (the default when no command is given).
    Patch(PatchArgs),
    /// List the rewrite rules in application order.
    ListRules(ListRulesArgs),
    /// Explain what a rule matches, what it writes, and why.
    Explain(ExplainArgs),
}

#[derive(Debug, Parser)]
struct PatchArgs {
    /// Config file (default: ./headerfix.toml when present).
    #[arg(long)]
    config: Option<Utf8PathBuf>,

    /// Pub cache root for the built-in target list (default: $HOME/.pub-cache).
    #[arg(long, env = "PUB_CACHE")]
    pub_cache: Option<Utf8PathBuf>,

    /// Header to patch; repeatable. Replaces the built-in target list.
    #[arg(long = "target", value_name = "PATH")]
    targets: Vec<Utf8PathBuf>,

    /// Allowlist patterns for rule ids.
    #[arg(long)]
    allow: Vec<String>,

    /// Denylist patterns for rule ids.
    #[arg(long)]
    deny: Vec<String>,

    /// Show what would change without writing any file.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Keep a copy of each file before replacing it.
    #[arg(long, default_value_t = false)]
    backup: bool,

    /// Also write report.json, report.md and patch.diff here.
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,
}

#[derive(Debug, Parser)]
struct ListRulesArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Parser)]
struct ExplainArgs {
    /// Rule id to explain (e.g., "firebase-umbrella").
    rule_id: String,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    match real_main() {
        Ok(code) => code,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(1)
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Some(Command::Patch(args)) => cmd_patch(args),
        Some(Command::ListRules(args)) => cmd_list_rules(args).map(|()| ExitCode::SUCCESS),
        Some(Command::Explain(args)) => cmd_explain(args).map(|()| ExitCode::SUCCESS),
        None => cmd_patch(cli.patch),
    }
}

/// Prints the per-file progress lines on stdout.
struct ConsoleProgress {
    dry_run: bool,
}

impl Progress for ConsoleProgress {
    fn event(&mut self, event: PatchEvent<'_>) {
        match event {
            PatchEvent::NotFound(path) => println!("File not found: {path}"),
            PatchEvent::Fixing(path) => println!("Fixing {path}"),
            PatchEvent::Fixed(outcome) if self.dry_run => println!("Would fix {}", outcome.path),
            PatchEvent::Fixed(outcome) => println!("Fixed {}", outcome.path),
            PatchEvent::Failed(err) => println!("Failed {}: {}", err.path(), err),
        }
    }
}

fn cmd_patch(args: PatchArgs) -> anyhow::Result<ExitCode> {
    let file_config = match &args.config {
        Some(path) => config::load_config(path).context("load headerfix config")?,
        None => {
            config::load_or_default(Utf8Path::new(".")).context("load headerfix.toml config")?
        }
    };
    let merged = ConfigMerger::new(file_config).merge(&CliOverrides {
        pub_cache: args.pub_cache,
        targets: args.targets,
        allow: args.allow,
        deny: args.deny,
        backup: args.backup,
    });

    debug!(
        "merged config: targets={:?}, allow={:?}, deny={:?}, backups={:?}",
        merged.targets, merged.allow, merged.deny, merged.backups
    );

    let home = std::env::var("HOME").ok().map(Utf8PathBuf::from);
    let targets = merged
        .resolve_targets(home.as_deref())
        .context("resolve target list")?;

    let rules = select_rules(&merged.allow, &merged.deny);
    if rules.is_empty() {
        warn!("allow/deny patterns exclude every rule; files will be checked but not changed");
    }

    let opts = PatchOptions {
        dry_run: args.dry_run,
        backup_enabled: merged.backups.enabled,
        backup_suffix: merged.backups.suffix.clone(),
    };

    let mut progress = ConsoleProgress {
        dry_run: args.dry_run,
    };
    let run = patch_all(&targets, &rules, &opts, tool_info(), &mut progress);

    let patch = run.patch();
    if args.dry_run && !patch.is_empty() {
        print!("{patch}");
    }

    if let Some(out_dir) = &args.out_dir {
        write_artifacts(out_dir, &run, &patch)?;
    }

    if run.report.has_failures() {
        error!(
            "{} of {} target(s) failed",
            run.report.summary.failed, run.report.summary.targets
        );
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

fn write_artifacts(out_dir: &Utf8Path, run: &PatchRun, patch: &str) -> anyhow::Result<()> {
    fs::create_dir_all(out_dir).with_context(|| format!("create {}", out_dir))?;
    write_json(&out_dir.join("report.json"), &run.report)?;
    fs::write(out_dir.join("report.md"), render_report_md(&run.report))
        .with_context(|| format!("write {}", out_dir.join("report.md")))?;
    fs::write(out_dir.join("patch.diff"), patch)
        .with_context(|| format!("write {}", out_dir.join("patch.diff")))?;
    info!("wrote report to {}", out_dir);
    Ok(())
}

fn write_json<T: serde::Serialize>(path: &Utf8Path, v: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(v).context("serialize json")?;
    fs::write(path, s).with_context(|| format!("write {}", path))?;
    Ok(())
}

fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "headerfix".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    }
}

fn cmd_list_rules(args: ListRulesArgs) -> anyhow::Result<()> {
    match args.format {
        OutputFormat::Text => {
            println!("Rewrite rules (applied in this order):\n");
            println!("  {:<22} {:<46} REPLACEMENT", "ID", "PATTERN");
            println!("  {:<22} {:<46} -----------", "--", "-------");
            for rule in builtin_rules() {
                let replacement = if rule.is_deletion() {
                    "(removed)"
                } else {
                    rule.replacement
                };
                println!("  {:<22} {:<46} {}", rule.id, rule.pattern, replacement);
            }
            println!();
            println!("Use 'headerfix explain <id>' for details.");
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(builtin_rules())?);
        }
    }
    Ok(())
}

fn cmd_explain(args: ExplainArgs) -> anyhow::Result<()> {
    let Some(rule) = lookup_rule(&args.rule_id) else {
        let available: Vec<&str> = builtin_rules().iter().map(|r| r.id).collect();
        anyhow::bail!(
            "Unknown rule id: '{}'\n\nAvailable rules: {}",
            args.rule_id,
            available.join(", ")
        );
    };
    let position = builtin_rules()
        .iter()
        .position(|r| r.id == rule.id)
        .map_or(0, |i| i + 1);

    println!("================================================================================");
    println!("RULE: {}", rule.id);
    println!("================================================================================");
    println!();
    println!("Order:       {} of {}", position, builtin_rules().len());
    println!("Matches:     {}", rule.pattern);
    if rule.is_deletion() {
        println!("Writes:      (nothing; the import is removed)");
    } else {
        println!("Writes:      {}", rule.replacement);
    }
    println!();
    println!("RATIONALE");
    println!("--------------------------------------------------------------------------------");
    println!("{}", rule.rationale);
    println!();

    Ok(())
}
