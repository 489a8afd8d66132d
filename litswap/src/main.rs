use clap::{ArgAction, Parser, Subcommand};
use miette::{IntoDiagnostic, MietteHandlerOpts, Report, Result, WrapErr, bail};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use litswap::{
    config::{core::Config, presets::Preset},
    diagf,
    locator::core::{locate_all, report, snippet},
    replacer::core::{ReplaceJob, Rule, RuleSet, WriteMode},
    utils::logging,
};

#[derive(Parser)]
#[command(
    name = "litswap",
    version,
    about = "Locate character offsets and apply literal replacements across source files"
)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Print `<offset> -> line <L> col <C>` for each offset
    #[command(visible_aliases = &["l"])]
    Locate {
        source: PathBuf,
        #[arg(required = true)]
        offsets: Vec<usize>,
        /// Show the source around each offset on stderr
        #[arg(short, long)]
        context: bool,
    },
    /// Rewrite files in place with ordered OLD=NEW rules
    #[command(visible_aliases = &["r"])]
    Replace {
        #[arg(required = true)]
        targets: Vec<PathBuf>,
        #[arg(short, long = "rule", value_name = "OLD=NEW", value_parser = parse_rule, required = true)]
        rules: Vec<Rule>,
        /// Write nothing unless every target can be rewritten
        #[arg(short, long)]
        atomic: bool,
    },
    /// Run a JSON config or a built-in preset
    #[command(visible_aliases = &["x"])]
    Run {
        config: Option<PathBuf>,
        #[arg(short, long, value_enum, conflicts_with = "config")]
        preset: Option<Preset>,
        /// Resolve relative paths against this directory
        #[arg(long)]
        root: Option<PathBuf>,
        #[arg(short, long)]
        atomic: bool,
        /// Print the resolved config as JSON and exit
        #[arg(long)]
        dump: bool,
    },
}

fn parse_rule(s: &str) -> std::result::Result<Rule, String> {
    match s.split_once('=') {
        Some((old, _)) if old.is_empty() => Err("pattern before `=` is empty".into()),
        Some((old, new)) => Ok(Rule::new(old, new)),
        None => Err(format!("expected OLD=NEW, got `{s}`")),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    miette::set_hook(Box::new(|_| {
        Box::new(
            MietteHandlerOpts::new()
                .color(true)
                .context_lines(3)
                .build(),
        )
    }))?;

    let _guard = logging::init(logging::level_for(cli.verbose, cli.quiet));
    debug!("litswap v{}", litswap::version());

    match cli.cmd {
        Cmd::Locate {
            source,
            offsets,
            context,
        } => locate(&source, &offsets, context)?,

        Cmd::Replace {
            targets,
            rules,
            atomic,
        } => {
            let job = ReplaceJob {
                rules: RuleSet::new(rules),
                targets,
            };
            let mode = if atomic {
                WriteMode::Atomic
            } else {
                WriteMode::Sequential
            };
            replace(&job, mode)?;
        }

        Cmd::Run {
            config,
            preset,
            root,
            atomic,
            dump,
        } => {
            let mut config = match (config, preset) {
                (Some(path), _) => Config::from_path(&path)?,
                (None, Some(preset)) => preset.config(),
                (None, None) => bail!("give a config file or --preset"),
            };
            if let Some(root) = root {
                config = config.rooted(&root);
            }
            config.atomic |= atomic;

            if dump {
                let json = config
                    .to_json()
                    .into_diagnostic()
                    .wrap_err("cannot render config as JSON")?;
                println!("{json}");
                return Ok(());
            }

            if let Some(source) = &config.source_path {
                if !config.offsets.is_empty() {
                    locate(source, &config.offsets, false)?;
                }
            }
            let mode = config.write_mode();
            for job in config.jobs() {
                replace(&job, mode)?;
            }
        }
    }

    Ok(())
}

fn locate(source: &Path, offsets: &[usize], context: bool) -> Result<()> {
    let src = std::fs::read_to_string(source)
        .into_diagnostic()
        .wrap_err_with(|| format!("cannot read {}", source.display()))?;
    report(&src, offsets, io::stdout().lock())?;

    if context {
        let name = source.display().to_string();
        for located in locate_all(&src, offsets)? {
            diagf!(at located.at(&name), "offset {}", located.offset);
            eprintln!("{:?}", Report::new(snippet(&name, &src, &located)?));
        }
    }
    Ok(())
}

fn replace(job: &ReplaceJob, mode: WriteMode) -> Result<()> {
    let outcomes = job.run(mode)?;
    let changed = outcomes.iter().filter(|o| o.changed).count();
    let replacements: usize = outcomes.iter().map(|o| o.replacements).sum();
    info!(
        files = outcomes.len(),
        changed,
        replacements,
        ?mode,
        "job finished"
    );
    Ok(())
}
