use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{Instrument, info, info_span};

use srs_cli::session::SessionCommand;
use srs_cli::settings::Settings;
use srs_core::{CoreError, Workspace};
use srs_ingest::{bundle_name, load_bundle};
use srs_persistence::StorageBackend;
use srs_results::{project_snapshot, write_results};

use crate::cli::{ExportArgs, OpenArgs};
use crate::summary::{print_current, print_help, print_status};

/// Run an interactive session on its own single-threaded runtime.
pub fn run_session(args: &OpenArgs, settings: &Settings) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("start async runtime")?;
    let span = info_span!("session", bundle = %args.bundle.display());
    let result = runtime.block_on(run_open(args, settings).instrument(span));
    // A pending stdin read must not keep the process alive.
    runtime.shutdown_background();
    result
}

async fn run_open(args: &OpenArgs, settings: &Settings) -> Result<()> {
    let images = load_bundle(&args.bundle, args.shuffle || settings.ingest.shuffle)
        .with_context(|| format!("load bundle {}", args.bundle.display()))?;
    let store = Arc::new(settings.open_store());
    let mut workspace = Workspace::new(Arc::clone(&store), settings.autosave.clone());

    if args.resume {
        workspace.restore(images).map_err(|e| user_error(&e))?;
        println!(
            "Resumed saved progress: {} of {} images rated.",
            workspace.rated_images(),
            workspace.collection().len()
        );
    } else {
        let previous = store.info();
        workspace
            .load_fresh(images, bundle_name(&args.bundle))
            .map_err(|e| user_error(&e))?;
        if previous.present {
            println!(
                "Started a new session; saved progress for {} was discarded.",
                previous
                    .collection_name
                    .as_deref()
                    .unwrap_or("an earlier bundle")
            );
        }
    }

    print_current(&workspace);
    println!("Type 'help' for commands.");

    let outcome = read_commands(&mut workspace).await;

    match workspace.shutdown() {
        Some(at) => println!(
            "Progress saved at {}.",
            at.with_timezone(&Local).format("%H:%M:%S")
        ),
        None => eprintln!("Progress could not be saved; see the log for details."),
    }
    outcome
}

/// Run commands from stdin until `quit`, end of input, or Ctrl-C.
async fn read_commands<B: StorageBackend + 'static>(workspace: &mut Workspace<B>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        prompt()?;
        let line = tokio::select! {
            line = lines.next_line() => line.context("read command")?,
            signal = tokio::signal::ctrl_c() => {
                signal.context("listen for Ctrl-C")?;
                println!();
                info!("Interrupted; saving before exit");
                return Ok(());
            }
        };
        let Some(line) = line else {
            return Ok(());
        };
        if line.trim().is_empty() {
            continue;
        }
        let command = match line.parse::<SessionCommand>() {
            Ok(command) => command,
            Err(error) => {
                eprintln!("{error}");
                continue;
            }
        };
        match execute(workspace, command) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => return Ok(()),
            Err(error) => eprintln!("{error:#}"),
        }
    }
}

enum Flow {
    Continue,
    Quit,
}

fn execute<B: StorageBackend + 'static>(
    workspace: &mut Workspace<B>,
    command: SessionCommand,
) -> Result<Flow> {
    match command {
        SessionCommand::Rate(value) => {
            let rating = workspace.rate(value).map_err(|e| user_error(&e))?;
            if let Some(image) = workspace.current_image() {
                println!(
                    "Rated {} with {} stars (average {:.1}).",
                    image.path,
                    rating.value,
                    srs_model::average_rating(workspace.ratings_for(&image.path))
                );
            }
        }
        SessionCommand::Undo => match workspace.undo_last_rating().map_err(|e| user_error(&e))? {
            Some(rating) => println!("Removed the {}-star rating.", rating.value),
            None => println!("This image has no ratings to undo."),
        },
        SessionCommand::Note(text) => {
            let cleared = text.is_empty();
            workspace.set_note(text).map_err(|e| user_error(&e))?;
            println!("{}", if cleared { "Note cleared." } else { "Note saved." });
        }
        SessionCommand::Next => {
            if workspace.next() {
                print_current(workspace);
            } else {
                println!("Already at the last image.");
            }
        }
        SessionCommand::Prev => {
            if workspace.previous() {
                print_current(workspace);
            } else {
                println!("Already at the first image.");
            }
        }
        SessionCommand::Goto(position) => {
            workspace
                .go_to(position.saturating_sub(1))
                .map_err(|e| user_error(&e))?;
            print_current(workspace);
        }
        SessionCommand::Shuffle => {
            workspace.shuffle_order().map_err(|e| user_error(&e))?;
            println!("Shuffled {} images.", workspace.collection().len());
            print_current(workspace);
        }
        SessionCommand::Show => print_current(workspace),
        SessionCommand::Save => match workspace.save_now() {
            Some(at) => println!("Saved at {}.", at.with_timezone(&Local).format("%H:%M:%S")),
            None => eprintln!("Progress could not be saved; see the log for details."),
        },
        SessionCommand::Export(dir) => {
            let dir = dir.unwrap_or_else(|| PathBuf::from("."));
            let path = write_results(&dir, workspace.collection_name(), &workspace.results())?;
            println!("Results written to {}.", path.display());
        }
        SessionCommand::Help => print_help(),
        SessionCommand::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

pub fn run_status(settings: &Settings) -> Result<()> {
    let store = settings.open_store();
    let location = store.backend().path_for(store.key());
    print_status(&store.info(), store.expiry(), &location);
    Ok(())
}

pub fn run_export(args: &ExportArgs, settings: &Settings) -> Result<()> {
    let store = settings.open_store();
    let snapshot = store
        .load()
        .ok_or_else(|| anyhow!("there is no saved progress to export"))?;
    let results = project_snapshot(&snapshot);
    let dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("."));
    let path = write_results(&dir, snapshot.collection_name(), &results)?;
    println!(
        "Exported results for {} images to {}.",
        results.len(),
        path.display()
    );
    Ok(())
}

pub fn run_clear(settings: &Settings) -> Result<()> {
    settings.open_store().clear();
    println!("Saved progress cleared.");
    Ok(())
}

fn prompt() -> Result<()> {
    print!("> ");
    std::io::stdout().flush().context("flush stdout")
}

fn user_error(error: &CoreError) -> anyhow::Error {
    match error.suggestion() {
        Some(hint) => anyhow!("{}\nhint: {hint}", error.user_message()),
        None => anyhow!(error.user_message()),
    }
}
