use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::{Parser, Subcommand};
use layers::{
    LayersState, TocSettings, denormalize_groups, normalize_map, save_map, sort_node,
    split_map_and_layers, split_of,
};
use store::{DirMapStore, MapStore, SavedMap, encode_share};
use tools::{parse_order, read_map, render_tree, to_json};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect and reorder map table-of-contents trees")]
struct Args {
    /// Indent JSON output
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Split a flat map config into `flat` + synthesized `groups`
    Split {
        /// Map config JSON (`-` for stdin)
        input: PathBuf,
    },

    /// Print the TOC as an indented tree, topmost first
    Tree { input: PathBuf },

    /// Reorder the children of one node and print the new layer order
    Sort {
        input: PathBuf,

        /// Group id or name, or `root` for the top level
        #[arg(long)]
        node: String,

        /// New order as original child indices, e.g. `1,0`
        #[arg(long, allow_hyphen_values = true)]
        order: String,

        /// Active TOC filter text (sorting is refused while set)
        #[arg(long, default_value = "")]
        filter: String,

        /// Behave as if layer sorting were deactivated
        #[arg(long)]
        no_sort: bool,
    },

    /// Inflate the tree into full layers with derived group visibility
    Denormalize { input: PathBuf },

    /// Normalize a map and persist it under a content-addressed id
    Save {
        input: PathBuf,

        /// Directory holding saved maps
        #[arg(long, default_value = "maps")]
        store: PathBuf,

        #[arg(long)]
        name: Option<String>,
    },

    /// Print a permalink payload for a map config
    Share { input: PathBuf },

    /// List saved maps, most recent first
    List {
        #[arg(long, default_value = "maps")]
        store: PathBuf,
    },
}

fn main() {
    if let Err(e) = real_main() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn real_main() -> Result<(), String> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let pretty = args.pretty;

    match args.command {
        Command::Split { input } => {
            let map = split_map_and_layers(read_map(&input)?);
            println!("{}", to_json(&map, pretty)?);
        }
        Command::Tree { input } => {
            let split = split_of(&read_map(&input)?);
            print!("{}", render_tree(&split));
        }
        Command::Sort {
            input,
            node,
            order,
            filter,
            no_sort,
        } => {
            let map = read_map(&input)?;
            let order = parse_order(&order)?;
            let settings = TocSettings {
                activate_sort_layer: !no_sort,
                filter_text: filter,
            };
            match sort_node(&map, &node, &order, &settings) {
                Some(outcome) => println!("{}", to_json(&outcome.layers, pretty)?),
                None => {
                    tracing::info!("sort of {node} not applied; layer order unchanged");
                    println!("{}", to_json(&split_of(&map).flat, pretty)?);
                }
            }
        }
        Command::Denormalize { input } => {
            let split = split_of(&read_map(&input)?);
            let denormalized = denormalize_groups(&split.flat, &split.groups);
            println!("{}", to_json(&denormalized, pretty)?);
        }
        Command::Save { input, store, name } => {
            let name = name.unwrap_or_else(|| {
                input
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "map".to_string())
            });
            let map = normalize_map(read_map(&input)?);
            let config = save_map(&LayersState::from(split_of(&map)));
            let saved = SavedMap::new(name, config, now_ms()).map_err(|e| e.to_string())?;
            let id = saved.id.clone();
            DirMapStore::new(store)
                .upsert(saved)
                .map_err(|e| e.to_string())?;
            println!("{id}");
        }
        Command::Share { input } => {
            let map = read_map(&input)?;
            println!("{}", encode_share(&map).map_err(|e| e.to_string())?);
        }
        Command::List { store } => {
            let maps = DirMapStore::new(store).list().map_err(|e| e.to_string())?;
            for map in maps {
                println!("{}\t{}\t{}", map.id, map.created_at_ms, map.name);
            }
        }
    }

    Ok(())
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
