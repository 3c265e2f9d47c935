//! Goldfish - Main Binary
//!
//! Line-oriented practice table: load a deck, then drive the table with the
//! same single-key shortcuts and gestures the table understands.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use goldfish::{
    core::{CardId, Point},
    loader::{
        DeckInfo, DeckLoader, DeckStore, ImageSlot, ImageState, JsonDeckStore,
        UrlTemplateLookup,
    },
    table::{
        DropResult, HandSetup, Key, ManaColor, Modal, OutputFormat, Session, TableConfig,
        TableState, VerbosityLevel,
    },
    zones::Zone,
};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "goldfish")]
#[command(about = "Goldfish - solo practice table for card game decks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a deck at an interactive table
    Play {
        /// Deck file (.dck) (required unless --store is provided)
        #[arg(value_name = "DECK", required_unless_present = "store")]
        deck: Option<PathBuf>,

        /// Play the first deck saved in this store directory
        #[arg(long, value_name = "DIR")]
        store: Option<PathBuf>,

        /// Set random seed for deterministic shuffles
        #[arg(long)]
        seed: Option<u64>,

        /// Opening hand size
        #[arg(long, default_value_t = goldfish::table::config::STARTING_HAND_SIZE)]
        hand_size: usize,

        /// Starting life total
        #[arg(long, default_value_t = goldfish::table::config::STARTING_LIFE, allow_hyphen_values = true)]
        life: i32,

        /// Cards to put in the opening hand, separated by ';'
        #[arg(long, value_name = "CARDS")]
        hand: Option<String>,

        /// Base URL card images are resolved against
        #[arg(long, default_value = UrlTemplateLookup::DEFAULT_BASE_URL)]
        image_base: String,

        /// Verbosity level for table output (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, default_value = "normal", short = 'v')]
        verbosity: VerbosityLevel,

        /// Print table events as JSON lines
        #[arg(long)]
        json_log: bool,
    },

    /// Save a deck file into a store directory
    Import {
        /// Deck file (.dck)
        #[arg(value_name = "DECK")]
        deck: PathBuf,

        /// Store directory
        #[arg(long, value_name = "DIR")]
        store: PathBuf,

        /// Name to store the deck under (default: file name)
        #[arg(long)]
        name: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Play {
            deck,
            store,
            seed,
            hand_size,
            life,
            hand,
            image_base,
            verbosity,
            json_log,
        } => {
            let config = TableConfig {
                starting_hand_size: hand_size,
                starting_life: life,
                seed,
                ..TableConfig::default()
            };
            let format = if json_log {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            };
            run_play(deck, store, config, hand, image_base, verbosity, format).await?
        }
        Commands::Import { deck, store, name } => run_import(&deck, &store, name).await?,
    }

    Ok(())
}

async fn load_deck_file(path: &Path) -> anyhow::Result<DeckInfo> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading deck file {}", path.display()))?;
    let list =
        DeckLoader::parse(&content).with_context(|| format!("parsing {}", path.display()))?;
    Ok(list.build())
}

async fn run_import(path: &Path, store_dir: &Path, name: Option<String>) -> anyhow::Result<()> {
    let deck = load_deck_file(path).await?;
    let name = name.unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "deck".to_string())
    });

    let store = JsonDeckStore::open(store_dir)
        .with_context(|| format!("opening store {}", store_dir.display()))?;
    store.put_deck(&deck.all_cards(), &name)?;

    println!(
        "Imported '{}' ({} cards, {} commanders) into {}",
        name,
        deck.len(),
        deck.commanders.len(),
        store_dir.display()
    );
    Ok(())
}

async fn run_play(
    deck_path: Option<PathBuf>,
    store_dir: Option<PathBuf>,
    config: TableConfig,
    hand: Option<String>,
    image_base: String,
    verbosity: VerbosityLevel,
    log_format: OutputFormat,
) -> anyhow::Result<()> {
    let deck = match (deck_path, store_dir) {
        (Some(path), _) => load_deck_file(&path).await?,
        (None, Some(dir)) => {
            let store = JsonDeckStore::open(&dir)
                .with_context(|| format!("opening store {}", dir.display()))?;
            match store.get_deck()? {
                Some(deck) => deck,
                None => bail!("no deck stored in {}", dir.display()),
            }
        }
        (None, None) => bail!("a deck file or --store is required"),
    };

    let hand = hand.as_deref().map(HandSetup::parse).transpose()?;

    let mut table = TableState::new(config);
    table.logger.set_verbosity(verbosity);
    table.logger.set_output_format(log_format);
    table.start_game(Some(deck), hand.as_ref())?;

    let mut session = Session::new(table);
    let mut preview = ImageSlot::new(Arc::new(UrlTemplateLookup::new(image_base)));

    print_table(&session);
    println!("Type 'help' for commands.");

    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        std::io::stdout().flush()?;
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match handle_line(&mut session, &mut preview, &line).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => println!("{e:#}"),
        }

        print_modal(&session);
    }

    Ok(())
}

/// Run one REPL line; returns false when the user quits
async fn handle_line(
    session: &mut Session,
    preview: &mut ImageSlot<UrlTemplateLookup>,
    line: &str,
) -> anyhow::Result<bool> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        [] => {}
        ["quit"] | ["exit"] => return Ok(false),
        ["help"] | ["?"] => print_help(),
        ["show"] => print_table(session),
        ["undo"] => {
            if !session.table_mut().undo() {
                println!("Nothing to undo");
            }
        }
        ["hover", id] => {
            let card: CardId = id.parse().context("card id")?;
            match session.layout().card_point(card, &session.table().zones) {
                Some(point) => {
                    session.pointer_move(point);
                    show_hovered(session, preview).await;
                }
                None => println!("Card {card} is not on the table"),
            }
        }
        ["click", id] => {
            let card: CardId = id.parse().context("card id")?;
            if !session.click_card(card) {
                println!("Nothing happens");
            }
        }
        ["life", "set", n] => {
            let life: i32 = n.parse().context("life total")?;
            session.table_mut().set_life(life);
            println!("{}", session.table().details());
        }
        ["life", delta] => {
            let delta: i32 = delta.parse().context("life change")?;
            session.table_mut().adjust_life(delta);
            println!("{}", session.table().details());
        }
        ["mana", "clear"] => {
            session.table_mut().empty_mana_pool();
            println!("{}", session.table().details());
        }
        ["mana", color, delta] => {
            let color: ManaColor = color.parse().map_err(anyhow::Error::msg)?;
            let delta: i32 = delta.parse().context("mana change")?;
            session.table_mut().adjust_mana(color, delta);
            println!("{}", session.table().details());
        }
        ["drag", id, x, y] => {
            let card: CardId = id.parse().context("card id")?;
            let target = Point::new(x.parse().context("x")?, y.parse().context("y")?);
            drag_card(session, card, target);
        }
        ["select", row] => {
            let row: usize = row.parse().context("row")?;
            if !session.select_search_row(row)? {
                println!("No such row");
            }
        }
        ["type", ..] if !session.modal().is_open() => println!("No dialog open"),
        ["type", ..] => {
            for c in line.trim_start()["type".len()..].trim().chars() {
                session.key(Key::Char(c))?;
            }
        }
        [word] => match parse_key(word) {
            Some(key) => {
                session.key(key)?;
            }
            None => println!("Unknown command '{word}'"),
        },
        _ => println!("Unknown command '{}'", line.trim()),
    }
    Ok(true)
}

fn parse_key(word: &str) -> Option<Key> {
    let key = match word {
        "up" => Key::Up,
        "down" => Key::Down,
        "enter" => Key::Enter,
        "esc" | "escape" => Key::Escape,
        "backspace" | "bs" => Key::Backspace,
        _ => {
            let mut chars = word.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Key::Char(c),
                _ => return None,
            }
        }
    };
    Some(key)
}

fn drag_card(session: &mut Session, card: CardId, target: Point) {
    let Some(start) = session.layout().card_point(card, &session.table().zones) else {
        println!("Card {card} is not on the table");
        return;
    };
    session.pointer_move(start);
    if !session.begin_drag(card) {
        println!("Cannot drag right now");
        return;
    }
    session.pointer_move(target);
    match session.drop_card() {
        DropResult::Transferred {
            source,
            target,
            outcome,
            ..
        } => println!("{source} -> {target}: {outcome:?}"),
        DropResult::NoTarget { .. } => println!("Dropped outside the table"),
        DropResult::Failed(e) => println!("{e}"),
        DropResult::NotDragging => {}
    }
}

async fn show_hovered(session: &Session, preview: &mut ImageSlot<UrlTemplateLookup>) {
    let Some(card) = session.hovered_card() else {
        println!("Nothing under the pointer");
        return;
    };
    let Some((zone, record)) = session.table().card(card) else {
        return;
    };

    // Library cards are face down
    if zone == Zone::Library {
        preview.unbind();
        println!("Hovering the library ({} cards)", session.table().zones.len(zone));
        return;
    }

    preview.bind(&record.card);
    match preview.settle().await {
        ImageState::Loaded(images) => {
            let url = match (&images.back, record.transformed) {
                (Some(back), true) => back,
                _ => &images.front,
            };
            println!("Hovering {} ({}) in {}: {}", record.name(), card, zone, url);
        }
        _ => println!("Hovering {} ({}) in {}", record.name(), card, zone),
    }
}

fn print_help() {
    println!("Keys: d draw, s shuffle, u untap all, n next turn, r restart,");
    println!("      t transform, x tap/untap, b library bottom, = / - / 0 counters,");
    println!("      e g h l search exile/graveyard/hand/library");
    println!("Commands: hover <id>, click <id>, drag <id> <x> <y>, show, undo, quit");
    println!("          life <+n|-n>, life set <n>, mana <W|U|B|R|G|C> <+n|-n>, mana clear");
    println!("In dialogs: type <text>, up, down, enter, esc, backspace, select <row>");
}

fn print_table(session: &Session) {
    let table = session.table();
    println!("== Turn {} ==", table.turn());
    println!("{}", table.details());
    for zone in Zone::ALL {
        let cards = table.zone(zone);
        match zone {
            Zone::Library => println!("[{zone}] {} cards", cards.len()),
            Zone::Battlefield => {
                println!("[{zone}]");
                for zc in cards {
                    let pos = zc.position.unwrap_or(Point::ORIGIN);
                    println!(
                        "  {:>4} {}{}{} at ({:.0}, {:.0})",
                        zc.id(),
                        zc.name(),
                        if zc.tapped { " (tapped)" } else { "" },
                        if zc.counters != 0 {
                            format!(" [{:+}]", zc.counters)
                        } else {
                            String::new()
                        },
                        pos.x,
                        pos.y
                    );
                }
            }
            _ => {
                println!("[{zone}]");
                for zc in cards {
                    println!(
                        "  {:>4} {}{}",
                        zc.id(),
                        zc.name(),
                        if zc.transformed { " (transformed)" } else { "" }
                    );
                }
            }
        }
    }
}

fn print_modal(session: &Session) {
    match session.modal() {
        Modal::None => {}
        Modal::RestartConfirm => println!("Restart the game? (y/n)"),
        Modal::Search(search) => {
            println!("Search {} > {}", search.source(), search.query());
            for (row, option) in search.filtered().iter().enumerate() {
                let marker = if row == search.selected_index() { '>' } else { ' ' };
                println!("{marker} {row:>2} {} x{}", option.label, option.count);
            }
        }
    }
}
