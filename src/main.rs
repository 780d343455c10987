use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::bail;
use clap::{Parser, Subcommand};

mod graph;
mod render;
mod sheet;
mod ship;
mod watch;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "sheet2graph")]
#[command(about = "Spreadsheet to graph JSON converter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a spreadsheet to a graph JSON document once.
    Convert {
        #[arg(long)]
        input: String,

        #[arg(short = 'o', long)]
        out: String,
    },

    /// Watch the spreadsheet for saves, reconverting (and optionally
    /// shipping the results to a remote host) on each qualifying change.
    Watch {
        #[arg(long)]
        input: String,

        #[arg(short = 'o', long)]
        out: String,

        /// Minimum seconds between two accepted change events.
        #[arg(long, default_value_t = 3)]
        debounce_secs: u64,

        #[arg(long)]
        host: Option<String>,

        #[arg(long, default_value_t = 22)]
        port: u16,

        #[arg(long)]
        user: Option<String>,

        #[arg(long, env = "SHEET2GRAPH_PASSWORD", hide_env_values = true)]
        password: Option<String>,

        /// Remote path for the generated JSON artifact.
        #[arg(long)]
        remote_out: Option<String>,

        /// Remote path for the source spreadsheet.
        #[arg(long)]
        remote_input: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Convert { input, out } => {
            convert(&input, &out)?;
        }
        Commands::Watch {
            input,
            out,
            debounce_secs,
            host,
            port,
            user,
            password,
            remote_out,
            remote_input,
        } => {
            let plan = ship_plan(host, port, user, password, remote_out, remote_input)?;

            // Ctrl-C flips the stop flag; the watch loop notices and returns.
            let stop = Arc::new(AtomicBool::new(false));
            {
                let stop = stop.clone();
                ctrlc::set_handler(move || stop.store(true, Ordering::SeqCst))?;
            }

            println!("Watching {} (debounce {}s)", input, debounce_secs);
            watch::watch_path(
                Path::new(&input),
                Duration::from_secs(debounce_secs),
                &stop,
                || run_cycle(&input, &out, plan.as_ref()),
            )?;
            println!("Watch stopped");
        }
    }

    Ok(())
}

/// One conversion: load, normalize, expand, write, summarize.
fn convert(input: &str, out: &str) -> Result<graph::GraphDoc> {
    // 1) Load the first sheet into a string table.
    let mut table = sheet::read_first_sheet(input)?;

    // 2) Normalize rows (blank fill + line-break rewrite in `details`).
    graph::normalize_rows(&mut table)?;

    // 3) Expand source/target lists into a deduplicated edge list.
    let doc = graph::build(table)?;

    // 4) Write the artifact and print the summary.
    render::write_graph_json(&doc, out)?;
    render::print_summary(&doc, out);

    Ok(doc)
}

/// One watch-mode cycle. Failures are reported and swallowed so the
/// watch loop keeps running.
fn run_cycle(input: &str, out: &str, plan: Option<&ShipPlan>) {
    if let Err(e) = convert(input, out) {
        eprintln!("conversion failed: {:#}", e);
        return;
    }

    if let Some(plan) = plan {
        for (local, remote) in [(out, &plan.remote_out), (input, &plan.remote_input)] {
            if let Err(e) = ship::ship(&plan.remote, Path::new(local), remote) {
                eprintln!("upload of {} failed: {:#}", local, e);
                return;
            }
            println!("Shipped {} -> {}:{}", local, plan.remote.host, remote);
        }
    }
}

struct ShipPlan {
    remote: ship::RemoteConfig,
    remote_out: String,
    remote_input: String,
}

/// The five remote flags are all-or-nothing.
fn ship_plan(
    host: Option<String>,
    port: u16,
    user: Option<String>,
    password: Option<String>,
    remote_out: Option<String>,
    remote_input: Option<String>,
) -> Result<Option<ShipPlan>> {
    match (host, user, password, remote_out, remote_input) {
        (Some(host), Some(user), Some(password), Some(remote_out), Some(remote_input)) => {
            Ok(Some(ShipPlan {
                remote: ship::RemoteConfig {
                    host,
                    port,
                    user,
                    password,
                },
                remote_out,
                remote_input,
            }))
        }
        (None, None, None, None, None) => Ok(None),
        _ => bail!(
            "remote shipping needs --host, --user, --password, --remote-out and --remote-input together"
        ),
    }
}
