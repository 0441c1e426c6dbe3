/*
 * Interactive console front-end. It wires the application logic to the
 * HTTP gateways: user input becomes `AppEvent`s, the logic's queued
 * `Command`s are either handed to the `GatewayExecutor` (network) or
 * rendered here (presentation), and gateway completions flow back in as
 * events over an mpsc channel.
 */
mod app_logic;
mod core;
mod gateway;

use crate::app_logic::{AppEvent, BrowserLogic, Command};
use crate::core::{CheckState, CoreConfigManager, MessageSeverity, TreeItemDescriptor};
use crate::gateway::{GatewayExecutor, HttpDeliveryGateway, HttpListingGateway};

use clap::Parser;
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::sync::mpsc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "share-courier", version, about = "Browse a remote share and submit selections for archiving and delivery")]
struct Cli {
    /// Site to connect to (defaults to the configured or last-used site)
    #[arg(long)]
    site: Option<String>,

    /// Root path to load on startup (defaults to the last-used root)
    #[arg(long)]
    root: Option<String>,

    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let config_manager = Arc::new(CoreConfigManager::new());
    let mut logic = BrowserLogic::new(config_manager);

    let listing = Arc::new(HttpListingGateway::new(Duration::from_secs(
        logic.listing_timeout_secs(),
    ))?);
    let delivery = Arc::new(HttpDeliveryGateway::new(Duration::from_secs(
        logic.submission_timeout_secs(),
    ))?);
    let (event_tx, event_rx) = mpsc::channel();
    let executor = GatewayExecutor::new(listing, delivery, event_tx);

    let mut shell = Shell::new();

    if let Some(site) = cli.site {
        logic.handle_event(AppEvent::SiteSelected { name: site });
        shell.pump(&mut logic, &executor, &event_rx);
    }
    let startup_root = cli
        .root
        .or_else(|| logic.startup_root_path().map(str::to_string));
    if let Some(root) = startup_root {
        logic.handle_event(AppEvent::RootPathSubmitted { input: root });
        shell.pump(&mut logic, &executor, &event_rx);
    }

    println!("share-courier connected to site '{}'. Type 'help' for commands.", logic.active_site());

    let stdin = io::stdin();
    loop {
        print!("{}> ", if shell.busy { "(submitting) " } else { "" });
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((v, r)) => (v, r.trim()),
            None => (line, ""),
        };
        match verb {
            "" => {}
            "help" => print_help(),
            "sites" => {
                for name in logic.site_names() {
                    let marker = if name == logic.active_site() { "*" } else { " " };
                    println!(" {marker} {name}");
                }
            }
            "site" => {
                logic.handle_event(AppEvent::SiteSelected {
                    name: rest.to_string(),
                });
            }
            "root" => {
                logic.handle_event(AppEvent::RootPathSubmitted {
                    input: rest.to_string(),
                });
            }
            "expand" => {
                logic.handle_event(AppEvent::NodeExpansionRequested {
                    node_id: rest.to_string(),
                });
            }
            "check" => {
                logic.handle_event(AppEvent::NodeCheckToggled {
                    node_id: rest.to_string(),
                });
            }
            "ls" => render_tree(&logic.describe_tree()),
            "submit" => logic.handle_event(AppEvent::SubmitRequested),
            "quit" | "exit" => break,
            other => println!("Unknown command '{other}'. Type 'help' for commands."),
        }
        shell.pump(&mut logic, &executor, &event_rx);
    }
    Ok(())
}

struct Shell {
    busy: bool,
    outstanding: usize,
}

impl Shell {
    fn new() -> Self {
        Shell {
            busy: false,
            outstanding: 0,
        }
    }

    /*
     * Drains the logic's command queue, dispatching network commands to the
     * executor and rendering the rest, then waits for any outstanding
     * gateway completions and feeds them back in as events. Returns once
     * the system is quiescent.
     */
    fn pump(
        &mut self,
        logic: &mut BrowserLogic,
        executor: &GatewayExecutor,
        events: &mpsc::Receiver<AppEvent>,
    ) {
        loop {
            while let Some(command) = logic.try_dequeue_command() {
                let is_network = matches!(
                    command,
                    Command::FetchListing { .. } | Command::SubmitSelection { .. }
                );
                match executor.try_execute(command) {
                    Ok(()) => {
                        if is_network {
                            self.outstanding += 1;
                        }
                    }
                    Err(command) => self.render(command),
                }
            }
            if self.outstanding == 0 {
                return;
            }
            match events.recv_timeout(Duration::from_secs(3600)) {
                Ok(event) => {
                    self.outstanding -= 1;
                    logic.handle_event(event);
                }
                Err(e) => {
                    log::error!("Shell: Event channel closed: {e}");
                    return;
                }
            }
        }
    }

    fn render(&mut self, command: Command) {
        match command {
            Command::PopulateTree { items } => render_tree(&items),
            Command::ShowNotice { severity, text } => {
                let prefix = match severity {
                    MessageSeverity::Information => "info",
                    MessageSeverity::Warning => "warning",
                    MessageSeverity::Error => "error",
                };
                println!("[{prefix}] {text}");
            }
            Command::SetInteractionEnabled { enabled } => {
                self.busy = !enabled;
            }
            other => log::warn!("Shell: Unhandled command: {other:?}"),
        }
    }
}

fn render_tree(items: &[TreeItemDescriptor]) {
    if items.is_empty() {
        println!("(no tree loaded)");
        return;
    }
    for item in items {
        render_item(item, 0);
    }
}

fn render_item(item: &TreeItemDescriptor, depth: usize) {
    let indent = "  ".repeat(depth);
    let check = if !item.selectable {
        "   "
    } else if item.state == CheckState::Checked {
        "[x]"
    } else {
        "[ ]"
    };
    let kind = if item.is_folder {
        if item.children_loaded { "dir" } else { "dir?" }
    } else {
        item.category.map(|c| c.tag()).unwrap_or("file")
    };
    println!("{indent}{check} {:<5} {}", kind, item.text);
    for child in &item.children {
        render_item(child, depth + 1);
    }
}

fn print_help() {
    println!("  sites           list configured sites (* marks the active one)");
    println!("  site <name>     switch to another site (clears the tree)");
    println!("  root <path>     load a root path, e.g. root \\\\server\\share");
    println!("  ls              show the current tree with check marks");
    println!("  expand <id>     fetch the children of a directory");
    println!("  check <id>      toggle selection of a file or directory");
    println!("  submit          archive and deliver the checked items");
    println!("  quit            exit");
}
