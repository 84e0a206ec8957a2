use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use srs_core::Workspace;
use srs_persistence::{SnapshotInfo, StorageBackend};

use srs_cli::session::HELP;

pub fn print_status(info: &SnapshotInfo, expiry: Duration, location: &Path) {
    if !info.present {
        println!("No saved progress.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Saved progress"), header_cell("")]);
    apply_table_style(&mut table);

    let saved_at = info.timestamp;
    let expires_at = saved_at.and_then(|at| {
        chrono::Duration::from_std(expiry)
            .ok()
            .and_then(|window| at.checked_add_signed(window))
    });

    table.add_row(vec![
        Cell::new("Collection"),
        optional_cell(info.collection_name.as_deref()),
    ]);
    table.add_row(vec![
        Cell::new("Images"),
        Cell::new(info.image_count.unwrap_or_default()),
    ]);
    table.add_row(vec![
        Cell::new("Ratings"),
        Cell::new(info.rated_count.unwrap_or_default()).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![Cell::new("Saved"), time_cell(saved_at)]);
    table.add_row(vec![Cell::new("Expires"), time_cell(expires_at)]);
    table.add_row(vec![
        Cell::new("Session"),
        dim_cell(info.session_id.as_deref().unwrap_or("-")),
    ]);
    table.add_row(vec![Cell::new("Location"), dim_cell(location.display())]);
    println!("{table}");
}

pub fn print_current<B: StorageBackend + 'static>(workspace: &Workspace<B>) {
    let Some(image) = workspace.current_image() else {
        println!("No images loaded.");
        return;
    };
    let ratings = workspace.ratings_for(&image.path);
    let stars: Vec<String> = ratings.iter().map(|r| r.value.to_string()).collect();
    let average = srs_model::average_rating(ratings);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell(&format!(
            "Image {} of {}",
            workspace.current_index() + 1,
            workspace.collection().len()
        )),
        header_cell(&image.path),
    ]);
    apply_table_style(&mut table);
    table.add_row(vec![Cell::new("Size"), Cell::new(format!("{} bytes", image.size))]);
    table.add_row(vec![
        Cell::new("Ratings"),
        if stars.is_empty() {
            dim_cell("none")
        } else {
            Cell::new(stars.join(", "))
        },
    ]);
    table.add_row(vec![
        Cell::new("Average"),
        Cell::new(format!("{average:.1}")).fg(Color::Yellow),
    ]);
    table.add_row(vec![
        Cell::new("Note"),
        optional_cell(Some(workspace.note_for(&image.path)).filter(|n| !n.is_empty())),
    ]);
    table.add_row(vec![
        Cell::new("Rated"),
        dim_cell(format!(
            "{} of {} images",
            workspace.rated_images(),
            workspace.collection().len()
        )),
    ]);
    println!("{table}");
}

pub fn print_help() {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Command"), header_cell("Action")]);
    apply_table_style(&mut table);
    for (command, action) in HELP {
        table.add_row(vec![Cell::new(command).fg(Color::Cyan), Cell::new(action)]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(text) => Cell::new(text),
        None => dim_cell("-"),
    }
}

fn time_cell(value: Option<DateTime<Utc>>) -> Cell {
    match value {
        Some(at) => Cell::new(at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")),
        None => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
