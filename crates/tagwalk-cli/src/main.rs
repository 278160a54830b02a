//! `tagwalk`: run the directives in a markup file and print the result.
//!
//! Dialogs (`alert`, `confirm`, `prompt`) and `log` output go to stderr and
//! read answers from stdin; the final document goes to stdout.

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tagwalk::{ConsoleHost, EventTarget, ExecContext, Host, Interpreter, Value};

#[derive(Parser, Debug)]
#[command(name = "tagwalk")]
#[command(version, about = "Execute directive elements in a markup document")]
struct Cli {
    /// Markup file to run
    file: PathBuf,

    /// Iterations a single <for>/<while> may run
    #[arg(long, default_value_t = 10_000)]
    max_loop_iterations: usize,

    /// Maximum nesting of <call>
    #[arg(long, default_value_t = 256)]
    max_call_depth: usize,

    /// Rounds of inserted-markup processing after each pass
    #[arg(long, default_value_t = 64)]
    max_mutation_rounds: usize,

    /// Leave directive elements visible in the output
    #[arg(long)]
    no_hide: bool,

    /// Seed a string variable before running (NAME=VALUE, repeatable)
    #[arg(long = "var", value_name = "NAME=VALUE")]
    vars: Vec<String>,

    /// Fire an event after the run (TARGET:EVENT, repeatable; TARGET is
    /// `window`, `document`, an id or a selector)
    #[arg(long = "fire", value_name = "TARGET:EVENT")]
    fire: Vec<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let markup = fs::read_to_string(&cli.file)
        .with_context(|| format!("reading {}", cli.file.display()))?;

    let ctx = ExecContext::new()
        .with_max_loop_iterations(cli.max_loop_iterations)
        .with_max_call_depth(cli.max_call_depth)
        .with_max_mutation_rounds(cli.max_mutation_rounds)
        .with_hide_directives(!cli.no_hide)
        .with_trace(cli.verbose >= 2);

    let host = ConsoleHost::new(io::stdin().lock(), io::stderr());
    let mut interp = Interpreter::from_markup(&markup, host)
        .with_context(|| format!("parsing {}", cli.file.display()))?
        .with_context(ctx);

    for assignment in &cli.vars {
        let (name, value) = parse_var(assignment)?;
        interp
            .namespace_mut()
            .declare_variable(name, Value::string(value));
    }

    let dispatched = interp.run();
    info!(dispatched, "run complete");

    for request in &cli.fire {
        fire(&mut interp, request)?;
    }

    println!("{}", interp.document().to_markup());
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tagwalk={level},tagwalk_cli={level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn parse_var(assignment: &str) -> Result<(&str, &str)> {
    match assignment.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value)),
        _ => bail!("expected NAME=VALUE, got '{}'", assignment),
    }
}

/// Split `TARGET:EVENT` at the last colon, so selectors may contain one.
fn parse_fire(request: &str) -> Result<(&str, &str)> {
    match request.rsplit_once(':') {
        Some((target, event)) if !target.is_empty() && !event.is_empty() => Ok((target, event)),
        _ => bail!("expected TARGET:EVENT, got '{}'", request),
    }
}

fn fire<H: Host>(interp: &mut Interpreter<H>, request: &str) -> Result<()> {
    let (target, event) = parse_fire(request)?;
    let resolved = match target {
        "window" => EventTarget::Window,
        "document" => EventTarget::Document,
        reference => match interp.document().resolve_reference(reference) {
            Some(node) => EventTarget::Node(node),
            None => bail!("no element matches '{}'", reference),
        },
    };
    let handlers = interp.dispatch_event(resolved, event);
    debug!(event_target = %resolved, event, handlers, "fired event");
    Ok(())
}
