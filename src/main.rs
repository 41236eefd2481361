use clap::{Parser, Subcommand};
use gallery_order::config::{self, Config};
use gallery_order::output;
use gallery_order::selector::OrderedCollectionSelector;
use gallery_order::sequence;
use gallery_order::sqlite::SqliteStore;
use gallery_order::store::ItemStore;
use gallery_order::types::{ItemId, ParentId, Selector};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gallery-order")]
#[command(about = "Order and rotate images within galleries")]
#[command(long_about = "\
Order and rotate images within galleries

Every image belongs to one gallery and carries an order value. New images
arrive unordered and are placed at the end of their gallery the next time
it is read. Orders are kept dense (1, 2, 3, ...) after every change.

Selection modes:
  random       uniform draw, never the same image twice in a row
  ascending    forward through the order, wrapping to the first image
  descending   backward through the order, wrapping to the last image

Run 'gallery-order gen-config' to generate a documented gallery-order.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = config::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    /// SQLite catalog (overrides store.path from the config)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Log debug diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add unordered images to a gallery
    Add {
        parent: u64,
        /// Number of images to add
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
    /// Delete an image
    Remove { item: u64 },
    /// Move an image to another gallery (placed at the end)
    Attach { item: u64, parent: u64 },
    /// List a gallery in order
    List {
        parent: u64,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Count the images in a gallery
    Count { parent: u64 },
    /// Pick the image to show after --previous
    Next {
        parent: u64,
        /// Selection mode (defaults to selection.mode from the config)
        #[arg(long)]
        mode: Option<Selector>,
        /// The image currently shown
        #[arg(long)]
        previous: Option<u64>,
    },
    /// Preview a rotation: pick repeatedly, each pick following the last
    Cycle {
        parent: u64,
        #[arg(long)]
        mode: Option<Selector>,
        #[arg(long, default_value_t = 10)]
        steps: usize,
        /// Image to start after
        #[arg(long)]
        start: Option<u64>,
    },
    /// Renumber a gallery to 1..n
    Reorder { parent: u64 },
    /// Place unordered images at the end of a gallery
    Normalize { parent: u64 },
    /// Move an image one position (later by default)
    Move {
        item: u64,
        /// Move towards the front instead
        #[arg(long)]
        earlier: bool,
    },
    /// Sort image ids by their stored order
    Sort {
        #[arg(required = true)]
        ids: Vec<u64>,
        #[arg(long)]
        reverse: bool,
    },
    /// Print a stock gallery-order.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let config = config::load_config(&cli.config)?;
    init_logging(&config, cli.verbose);
    tracing::debug!(
        path = %cli.config.display(),
        mode = %config.selection.mode,
        "loaded config"
    );

    let db_path = cli.db.clone().unwrap_or_else(|| config.store_path());
    let store = SqliteStore::open(&db_path)?;
    let default_mode = config.selection.mode;

    let mut selector = OrderedCollectionSelector::new(store);
    let lines = match cli.command {
        Command::Add { parent, count } => {
            let parent = ParentId(parent);
            let created_at = chrono::Utc::now().timestamp();
            let ids = (0..count)
                .map(|_| selector.store().insert(Some(parent), created_at))
                .collect::<Result<Vec<_>, _>>()?;
            output::format_added(parent, &ids)
        }
        Command::Remove { item } => {
            let item = ItemId(item);
            let removed = selector.store().remove(item)?;
            output::format_removed(item, removed)
        }
        Command::Attach { item, parent } => {
            let (item, parent) = (ItemId(item), ParentId(parent));
            let attached = selector.store().attach(item, parent)?;
            output::format_attached(item, parent, attached)
        }
        Command::List { parent, json } => {
            let parent = ParentId(parent);
            selector.get_all_ids(parent)?;
            let mut items = selector.store().items_in(parent)?;
            sequence::sort_canonical(&mut items);
            if json {
                vec![serde_json::to_string_pretty(&items)?]
            } else {
                output::format_gallery(parent, &items)
            }
        }
        Command::Count { parent } => {
            let parent = ParentId(parent);
            output::format_count(parent, selector.get_count(parent)?)
        }
        Command::Next {
            parent,
            mode,
            previous,
        } => {
            let (parent, mode) = (ParentId(parent), mode.unwrap_or(default_mode));
            let previous = previous.map(ItemId);
            let picked = selector.get_item_id(parent, mode, previous)?;
            output::format_selection(parent, mode, previous, picked)
        }
        Command::Cycle {
            parent,
            mode,
            steps,
            start,
        } => {
            let (parent, mode) = (ParentId(parent), mode.unwrap_or(default_mode));
            let shown = selector.rotation(parent, mode, start.map(ItemId), steps)?;
            output::format_rotation(parent, mode, &shown)
        }
        Command::Reorder { parent } => {
            let parent = ParentId(parent);
            output::format_reorder(parent, selector.reorder(parent)?)
        }
        Command::Normalize { parent } => {
            let parent = ParentId(parent);
            output::format_normalize(parent, selector.reorder_if_needed(parent)?)
        }
        Command::Move { item, earlier } => {
            let item = ItemId(item);
            let moved = selector.change_order(item, !earlier)?;
            output::format_move(item, !earlier, moved)
        }
        Command::Sort { ids, reverse } => {
            let ids: Vec<ItemId> = ids.into_iter().map(ItemId).collect();
            output::format_sorted(&selector.get_sorted_by_order(&ids, reverse)?, reverse)
        }
        Command::GenConfig => unreachable!("gen-config returns before the store is opened"),
    };

    tracing::debug!(cache = %selector.cache_stats(), "view cache");
    output::print_lines(&lines);
    Ok(())
}

/// Install the stderr log subscriber. `RUST_LOG` wins over the config level;
/// `--verbose` raises the config level to debug.
fn init_logging(config: &Config, verbose: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
