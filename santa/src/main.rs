//! Gift exchange CLI.
//!
//! Keeps one `exchange_<name>.json` file per exchange in the storage
//! directory. Every command loads the exchange, applies one roster operation
//! and writes it back.

use std::collections::HashSet;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use santa::core::pointer::{Pointer, PointerState};
use santa::core::roster::Roster;
use santa::core::types::ParticipantId;
use santa::exit_codes;
use santa::io::config::{CONFIG_FILE, SantaConfig, load_config, write_config};
use santa::io::reveal::render_reveal;
use santa::io::store::ExchangeStore;
use santa::logging;

#[derive(Parser)]
#[command(name = "santa", version, about = "Gift exchange roster and draw")]
struct Cli {
    /// Directory holding exchange files and `santa.toml`.
    #[arg(long, global = true, default_value = ".")]
    dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default `santa.toml` into the storage directory.
    Init {
        /// Overwrite an existing config file.
        #[arg(short, long)]
        force: bool,
    },
    /// Create an empty exchange.
    Create {
        exchange: String,
        /// Spending limit per gift (defaults to `default_budget` from config).
        #[arg(long)]
        budget: Option<f64>,
        /// Overwrite an existing exchange with the same name.
        #[arg(short, long)]
        force: bool,
    },
    /// Add a participant. Names must be unique within the exchange.
    Join {
        exchange: String,
        name: String,
        id: ParticipantId,
    },
    /// Append a wish to a participant's wishlist.
    Wish {
        exchange: String,
        id: ParticipantId,
        text: String,
    },
    /// Remove a participant and redraw the remaining assignments.
    Leave {
        exchange: String,
        id: ParticipantId,
        /// Seed for a reproducible redraw.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Draw a recipient for every participant.
    Draw {
        exchange: String,
        /// Seed for a reproducible draw.
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Set every assignment explicitly, as `GIVER=RECIPIENT` pairs.
    ///
    /// Use `GIVER=none` to leave a giver unassigned.
    Assign {
        exchange: String,
        #[arg(required = true, value_parser = parse_assignment)]
        pairs: Vec<(ParticipantId, Option<ParticipantId>)>,
    },
    /// Print participants and their wishlists.
    Show { exchange: String },
    /// Print the drawn assignments.
    Pairs { exchange: String },
    /// Print the notice for one giver.
    Reveal {
        exchange: String,
        id: ParticipantId,
    },
    /// List stored exchanges.
    List,
    /// Delete an exchange file.
    Delete { exchange: String },
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let store = ExchangeStore::new(&cli.dir);
    match cli.command {
        Command::Init { force } => cmd_init(&store, force),
        Command::Create {
            exchange,
            budget,
            force,
        } => cmd_create(&store, &exchange, budget, force),
        Command::Join { exchange, name, id } => cmd_join(&store, &exchange, &name, id),
        Command::Wish { exchange, id, text } => cmd_wish(&store, &exchange, id, text),
        Command::Leave { exchange, id, seed } => cmd_leave(&store, &exchange, id, seed),
        Command::Draw { exchange, seed } => cmd_draw(&store, &exchange, seed),
        Command::Assign { exchange, pairs } => cmd_assign(&store, &exchange, pairs),
        Command::Show { exchange } => {
            println!("{}", store.load(&exchange)?);
            Ok(exit_codes::OK)
        }
        Command::Pairs { exchange } => cmd_pairs(&store, &exchange),
        Command::Reveal { exchange, id } => cmd_reveal(&store, &exchange, id),
        Command::List => {
            for name in store.list()? {
                println!("{}", name);
            }
            Ok(exit_codes::OK)
        }
        Command::Delete { exchange } => {
            store.delete(&exchange)?;
            Ok(exit_codes::OK)
        }
    }
}

fn cmd_init(store: &ExchangeStore, force: bool) -> Result<i32> {
    let path = store.dir().join(CONFIG_FILE);
    if path.exists() && !force {
        eprintln!("{} already exists (use --force to overwrite)", path.display());
        return Ok(exit_codes::REJECTED);
    }
    write_config(&path, &SantaConfig::default())?;
    info!(path = %path.display(), "config written");
    Ok(exit_codes::OK)
}

fn cmd_create(
    store: &ExchangeStore,
    exchange: &str,
    budget: Option<f64>,
    force: bool,
) -> Result<i32> {
    let budget = match budget {
        Some(budget) => budget,
        None => load_config(&store.dir().join(CONFIG_FILE))?.default_budget,
    };
    if !budget.is_finite() || budget < 0.0 {
        bail!("budget must be a non-negative number, got {}", budget);
    }
    store.create(exchange, budget, force)?;
    info!(exchange, budget, "exchange created");
    Ok(exit_codes::OK)
}

fn cmd_join(store: &ExchangeStore, exchange: &str, name: &str, id: ParticipantId) -> Result<i32> {
    let mut roster = store.load(exchange)?;
    if !roster.register(name, id) {
        eprintln!("'{}' or id {} is already part of '{}'", name, id, exchange);
        return Ok(exit_codes::REJECTED);
    }
    if roster.pointer_state() == PointerState::Partial {
        eprintln!("note: gifts were already drawn; run `santa draw` to include {}", name);
    }
    store.save(&roster)?;
    Ok(exit_codes::OK)
}

fn cmd_wish(store: &ExchangeStore, exchange: &str, id: ParticipantId, text: String) -> Result<i32> {
    let mut roster = store.load(exchange)?;
    if roster.participant(id).is_none() {
        eprintln!("no participant {} in '{}'", id, exchange);
        return Ok(exit_codes::REJECTED);
    }
    roster.add_wish(id, text);
    store.save(&roster)?;
    Ok(exit_codes::OK)
}

fn cmd_leave(
    store: &ExchangeStore,
    exchange: &str,
    id: ParticipantId,
    seed: Option<u64>,
) -> Result<i32> {
    let mut roster = store.load(exchange)?;
    let mut rng = make_rng(seed);
    if !roster.remove(id, &mut rng) {
        eprintln!("no participant {} in '{}'", id, exchange);
        return Ok(exit_codes::REJECTED);
    }
    store.save(&roster)?;
    Ok(exit_codes::OK)
}

fn cmd_draw(store: &ExchangeStore, exchange: &str, seed: Option<u64>) -> Result<i32> {
    let mut roster = store.load(exchange)?;
    let mut rng = make_rng(seed);
    if !roster.randomize(&mut rng) {
        eprintln!("'{}' needs at least two participants to draw", exchange);
        return Ok(exit_codes::REJECTED);
    }
    store.save(&roster)?;
    Ok(exit_codes::OK)
}

fn cmd_assign(
    store: &ExchangeStore,
    exchange: &str,
    pairs: Vec<(ParticipantId, Option<ParticipantId>)>,
) -> Result<i32> {
    let mut roster = store.load(exchange)?;
    let applied = pointer_from_pairs(pairs).and_then(|pointer| roster.try_set_pointer(pointer));
    if let Err(errors) = applied {
        eprintln!("assignment rejected:\n- {}", errors.join("\n- "));
        return Ok(exit_codes::REJECTED);
    }
    store.save(&roster)?;
    Ok(exit_codes::OK)
}

fn cmd_pairs(store: &ExchangeStore, exchange: &str) -> Result<i32> {
    let roster = store.load(exchange)?;
    for line in pair_lines(&roster) {
        println!("{}", line);
    }
    Ok(exit_codes::OK)
}

fn cmd_reveal(store: &ExchangeStore, exchange: &str, id: ParticipantId) -> Result<i32> {
    let cfg = load_config(&store.dir().join(CONFIG_FILE))?;
    let roster = store.load(exchange)?;
    let notice = render_reveal(&cfg.reveal.template, &roster, id)
        .with_context(|| format!("reveal for {} in '{}'", id, exchange))?;
    println!("{}", notice);
    Ok(exit_codes::OK)
}

/// One `giver -> recipient` line per participant, in registration order.
fn pair_lines(roster: &Roster) -> Vec<String> {
    roster
        .participants()
        .iter()
        .map(|giver| match roster.recipient_of(giver.id) {
            Some(recipient) => format!("{} -> {}", giver.name, recipient.name),
            None => format!("{} -> (not drawn)", giver.name),
        })
        .collect()
}

/// Collect `assign` pairs into a pointer. A giver may appear only once.
fn pointer_from_pairs(
    pairs: Vec<(ParticipantId, Option<ParticipantId>)>,
) -> Result<Pointer, Vec<String>> {
    let mut seen = HashSet::new();
    let repeated: Vec<String> = pairs
        .iter()
        .filter(|(giver, _)| !seen.insert(*giver))
        .map(|(giver, _)| format!("giver {} is listed more than once", giver))
        .collect();
    if !repeated.is_empty() {
        return Err(repeated);
    }
    Ok(pairs.into_iter().collect())
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Parse `GIVER=RECIPIENT`, where `RECIPIENT` may be `none`.
fn parse_assignment(raw: &str) -> Result<(ParticipantId, Option<ParticipantId>)> {
    let (giver, recipient) = raw
        .split_once('=')
        .ok_or_else(|| anyhow!("expected GIVER=RECIPIENT, got '{}'", raw))?;
    let giver: ParticipantId = giver
        .parse()
        .with_context(|| format!("invalid giver id '{}'", giver))?;
    let recipient = match recipient.trim() {
        "none" | "null" => None,
        value => Some(
            value
                .parse::<ParticipantId>()
                .with_context(|| format!("invalid recipient id '{}'", value))?,
        ),
    };
    Ok((giver, recipient))
}
