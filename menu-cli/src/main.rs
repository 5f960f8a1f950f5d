//! Command-line front end for the menu editor.
//!
//! Talks to the REST backend at `--url` (or `MENU_API_URL`), or to a seeded
//! in-process backend with `--offline`.

mod paths;

use std::fs::File;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use menu_lib::api::{InMemoryMenuApi, MenuApi};
use menu_lib::dnd::DropPosition;
use menu_lib::expand::ExpandedSet;
use menu_lib::model::{Menu, MenuDraft, MenuId, MenuPatch};
use menu_lib::validation::available_parents;
use menu_lib::{DEFAULT_BASE_URL, MenuClient, MenuEditor, MoveOutcome};
use simplelog::{Config, LevelFilter, WriteLogger};

/// Edit a hierarchical navigation menu
#[derive(Parser)]
#[command(name = "menu")]
#[command(about = "Inspect and rearrange a hierarchical navigation menu")]
struct Cli {
    /// Base URL of the menu backend
    #[arg(long, env = "MENU_API_URL", default_value = DEFAULT_BASE_URL)]
    url: String,

    /// Use a seeded in-memory backend instead of the REST backend
    #[arg(long)]
    offline: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the menu tree
    Tree {
        /// Expand every node
        #[arg(short, long)]
        all: bool,

        /// Expand only these nodes
        #[arg(short, long, value_delimiter = ',')]
        expand: Vec<MenuId>,
    },

    /// Move a node relative to another one
    Move {
        /// Node to move
        id: MenuId,

        /// Node to drop on
        #[arg(short, long, conflicts_with = "root")]
        target: Option<MenuId>,

        /// Where to drop relative to the target: before, after or inside
        #[arg(short, long, default_value = "after")]
        position: DropPosition,

        /// Move to the end of the root level
        #[arg(long)]
        root: bool,
    },

    /// Create a menu item
    Create {
        #[arg(long)]
        title: String,

        #[arg(long)]
        path: String,

        #[arg(long)]
        icon: String,

        /// Parent node, root level when omitted
        #[arg(long)]
        parent: Option<MenuId>,

        #[arg(long, default_value_t = 0)]
        order: i32,

        /// Create the item hidden
        #[arg(long)]
        inactive: bool,
    },

    /// Update fields of a menu item
    Update {
        id: MenuId,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        path: Option<String>,

        #[arg(long)]
        icon: Option<String>,

        #[arg(long)]
        active: Option<bool>,

        #[arg(long, conflicts_with = "root")]
        parent: Option<MenuId>,

        /// Move the item to the root level
        #[arg(long)]
        root: bool,
    },

    /// Delete a menu item and everything below it
    Delete { id: MenuId },

    /// List the nodes that may become the parent of a node
    Parents {
        /// Node being edited, omit for a new item
        id: Option<MenuId>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("Warning: logging disabled: {:#}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    paths::rotate_logs();
    let path = paths::log_file().context("No home directory to keep logs in")?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let file =
        File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    WriteLogger::init(level, Config::default(), file).context("Failed to initialize logger")?;
    Ok(())
}

fn backend(cli: &Cli) -> Result<Arc<dyn MenuApi>> {
    if cli.offline {
        log::info!("Using in-memory backend");
        return Ok(Arc::new(InMemoryMenuApi::with_menus(demo_menus())));
    }
    let client = MenuClient::builder()
        .url(cli.url.as_str())
        .build()
        .with_context(|| format!("Invalid backend URL '{}'", cli.url))?;
    log::info!("Using backend at {}", client.base_url());
    Ok(Arc::new(client))
}

async fn run(cli: Cli) -> Result<()> {
    let mut editor = MenuEditor::with_shared(backend(&cli)?);
    editor.refresh().await.context("Failed to load menus")?;

    match cli.command {
        Commands::Tree { all, expand } => {
            if all {
                editor.expand_all();
            } else {
                *editor.expanded_mut() = expand.into_iter().collect::<ExpandedSet>();
            }
            print_tree(&editor, cli.json)?;
        }
        Commands::Move {
            id,
            target,
            position,
            root,
        } => {
            let target = match (target, root) {
                (Some(target), false) => Some(target),
                (None, true) => None,
                _ => bail!("Pass either --target or --root"),
            };
            match editor.move_node(id, target, position).await? {
                MoveOutcome::Ignored => println!("Nothing to move: invalid or unknown target"),
                MoveOutcome::Unchanged => println!("Menu {} is already there", id),
                MoveOutcome::Moved(plan) if cli.json => {
                    println!("{}", serde_json::to_string_pretty(&plan)?);
                }
                MoveOutcome::Moved(plan) => println!(
                    "Moved menu {} to index {} under {}",
                    id,
                    plan.new_index,
                    describe_parent(&editor, plan.new_parent_id)
                ),
            }
        }
        Commands::Create {
            title,
            path,
            icon,
            parent,
            order,
            inactive,
        } => {
            let draft = MenuDraft::new()
                .title(title)
                .path(path)
                .icon(icon)
                .parent(parent)
                .order_index(order)
                .active(!inactive);
            let menu = editor.create(&draft).await?;
            print_menu(&menu, cli.json)?;
        }
        Commands::Update {
            id,
            title,
            path,
            icon,
            active,
            parent,
            root,
        } => {
            let mut patch = MenuPatch::new();
            patch.title = title;
            patch.path = path;
            patch.icon = icon;
            patch.is_active = active;
            if root {
                patch = patch.parent(None);
            } else if parent.is_some() {
                patch = patch.parent(parent);
            }
            if patch.is_empty() {
                bail!("Nothing to update");
            }
            let menu = editor.update(id, &patch).await?;
            print_menu(&menu, cli.json)?;
        }
        Commands::Delete { id } => {
            if editor.delete(id).await? {
                println!("Deleted menu {} and its children", id);
            } else {
                println!("Menu {} was not deleted", id);
            }
        }
        Commands::Parents { id } => {
            let parents = available_parents(editor.nodes(), id);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&parents)?);
            } else {
                println!("(root)");
                for menu in &parents {
                    println!("#{} {}", menu.id, menu.title);
                }
            }
        }
    }

    if editor.is_stale() {
        eprintln!("Warning: the menu list could not be reloaded and may be out of date");
    }
    Ok(())
}

fn describe_parent(editor: &MenuEditor, parent: Option<MenuId>) -> String {
    match parent.and_then(|id| editor.find(id)) {
        Some(node) => format!("'{}'", node.menu.title),
        None => "the root level".to_string(),
    }
}

/// Prints the visible rows, or with `json` the whole nested tree regardless
/// of expansion.
fn print_tree(editor: &MenuEditor, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(editor.tree())?);
        return Ok(());
    }

    for row in editor.visible_rows() {
        let Some(node) = editor.find(row.id) else {
            continue;
        };
        let marker = match (row.has_children, row.expanded) {
            (false, _) => ' ',
            (true, true) => '▾',
            (true, false) => '▸',
        };
        let menu = &node.menu;
        let hidden = if menu.is_active { "" } else { " (inactive)" };
        println!(
            "{:indent$}{} #{} {} {}{}",
            "",
            marker,
            menu.id,
            menu.title,
            menu.path,
            hidden,
            indent = row.depth * 2
        );
    }
    Ok(())
}

fn print_menu(menu: &Menu, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(menu)?);
    } else {
        println!("#{} {} {}", menu.id, menu.title, menu.path);
    }
    Ok(())
}

fn demo_menus() -> Vec<Menu> {
    vec![
        Menu::new(1, "Dashboard").with_path("/").with_icon("home").with_order(0),
        Menu::new(2, "Content").with_path("/content").with_icon("file").with_order(1),
        Menu::new(3, "Pages").with_path("/content/pages").with_icon("file-text").with_parent(2).with_order(0),
        Menu::new(4, "Media").with_path("/content/media").with_icon("image").with_parent(2).with_order(1),
        Menu::new(5, "Settings").with_path("/settings").with_icon("cog").with_order(2),
        Menu::new(6, "Users").with_path("/settings/users").with_icon("user").with_parent(5).with_order(0),
        Menu::new(7, "Roles").with_path("/settings/users/roles").with_icon("key").with_parent(6).with_order(0),
    ]
}
