use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Parser;

use mdgrid::cli::{Action, CliArgs, TableSummary};
use mdgrid::commands::Cmd;
use mdgrid::config::TableEditorConfig;
use mdgrid::host::{Document, MarkdownSurface};
use mdgrid::messages::TableMsg;
use mdgrid::table::TableCommand;

fn main() -> Result<()> {
    mdgrid::tracing::init();

    let action = CliArgs::parse()
        .into_action()
        .map_err(anyhow::Error::msg)?;
    let config = TableEditorConfig::load();

    match action {
        Action::List { file, json } => list_tables(&file, json, &config),
        Action::Show { file, table } => {
            let surface = open(&file, &config)?;
            let view = surface
                .view(table)
                .with_context(|| no_such_table(&file, table, &surface))?;
            println!("{}", view.to_text());
            Ok(())
        }
        Action::Edit {
            file,
            table,
            command,
            in_place,
        } => edit_table(&file, table, command, in_place, &config),
    }
}

fn open(file: &Path, config: &TableEditorConfig) -> Result<MarkdownSurface> {
    let document = Document::from_file(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    Ok(MarkdownSurface::from_document(document, config))
}

fn no_such_table(file: &Path, table: usize, surface: &MarkdownSurface) -> String {
    format!(
        "{} has no table {} ({} found)",
        file.display(),
        table,
        surface.widgets().len()
    )
}

fn list_tables(file: &Path, json: bool, config: &TableEditorConfig) -> Result<()> {
    let surface = open(file, config)?;
    let summaries: Vec<TableSummary> = surface
        .widgets()
        .iter()
        .map(TableSummary::from_widget)
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    for s in &summaries {
        println!(
            "#{} lines {}-{}: {} columns, {} rows [{}]",
            s.index,
            s.first_line,
            s.last_line,
            s.columns,
            s.rows,
            s.header.join(", ")
        );
    }
    Ok(())
}

fn edit_table(
    file: &Path,
    table: usize,
    command: TableCommand,
    in_place: bool,
    config: &TableEditorConfig,
) -> Result<()> {
    let mut surface = open(file, config)?;
    if surface.widget(table).is_none() {
        bail!(no_such_table(file, table, &surface));
    }

    let name = command.name();
    match surface.send(table, TableMsg::Command(command)) {
        cmd @ Cmd::Commit(_) => {
            tracing::debug!(command = name, ?cmd, "table updated");
        }
        _ => eprintln!("{}: table unchanged", name),
    }
    surface.animation_frame();

    if in_place {
        surface
            .document
            .save()
            .with_context(|| format!("failed to write {}", file.display()))?;
    } else {
        print!("{}", surface.text());
    }
    Ok(())
}
