use std::io::Write;

use anyhow::{Context, Result, bail};

use inchi_forge::io::identifiers::{read_identifiers, read_lines};
use inchi_forge::{InchiOutput, KeyOutput, KeyStatus};

use crate::cli::BatchArgs;
use crate::config::{build_engine, call_options};
use crate::display::{Context as DisplayContext, Progress, print_batch_summary};
use crate::io::{create_output, open_input};

/// One output line per entry, plus whether the entry succeeded.
type Row = (String, bool);

pub fn run_convert(args: BatchArgs, ctx: DisplayContext) -> Result<()> {
    let engine = build_engine(&args.engine)?;
    let options = call_options(&args.engine);

    run_batch(&args, ctx, "Conversion", Entries::Identifiers, |entries| {
        entries
            .iter()
            .map(|identifier| -> Result<Row> {
                Ok(convert_row(&engine.inchi_from_inchi(identifier, options)?))
            })
            .collect()
    })
}

pub fn run_key(args: BatchArgs, ctx: DisplayContext) -> Result<()> {
    let engine = build_engine(&args.engine)?;

    run_batch(&args, ctx, "Key Derivation", Entries::Identifiers, |entries| {
        engine
            .keys_for(entries)
            .into_iter()
            .map(|key| -> Result<Row> { Ok(key_row(&key?)) })
            .collect()
    })
}

pub fn run_check_key(args: BatchArgs, ctx: DisplayContext) -> Result<()> {
    let engine = build_engine(&args.engine)?;

    run_batch(&args, ctx, "Key Check", Entries::Lines, |entries| {
        entries
            .iter()
            .map(|key| -> Result<Row> {
                let status = engine.validate_key(key)?;
                Ok((format!("{}\t{}", key, status), status.is_valid()))
            })
            .collect()
    })
}

pub fn run_check(args: BatchArgs, ctx: DisplayContext) -> Result<()> {
    let engine = build_engine(&args.engine)?;

    run_batch(&args, ctx, "Identifier Check", Entries::Lines, |entries| {
        entries
            .iter()
            .map(|identifier| -> Result<Row> {
                let status = engine.check_identifier(identifier)?;
                Ok((format!("{}\t{}", identifier, status), status.is_valid()))
            })
            .collect()
    })
}

#[derive(Clone, Copy)]
enum Entries {
    /// Every line must be an identifier.
    Identifiers,
    /// Any non-blank, non-comment line.
    Lines,
}

fn run_batch(
    args: &BatchArgs,
    ctx: DisplayContext,
    title: &str,
    kind: Entries,
    process: impl FnOnce(&[String]) -> Result<Vec<Row>>,
) -> Result<()> {
    let mut progress = Progress::new(ctx.interactive, 3);

    progress.step("Reading entries");
    let entries = load_entries(args, kind)?;
    if entries.is_empty() {
        bail!("Input is empty: no entries to process");
    }
    progress.complete_step("Reading entries", &[format!("{} entries", entries.len())]);

    progress.step("Calling identifier library");
    let rows = process(&entries)?;
    let passed = rows.iter().filter(|(_, ok)| *ok).count();
    progress.complete_step(
        "Calling identifier library",
        &[format!("{} of {} succeeded", passed, rows.len())],
    );

    progress.step("Writing output");
    let mut out = create_output(args.io.output.as_deref())?;
    for (line, _) in &rows {
        writeln!(out, "{}", line)?;
    }
    out.flush()?;
    progress.complete_step("Writing output", &[]);

    if progress.is_interactive() {
        print_batch_summary(title, rows.len(), passed);
    }
    progress.finish();

    if passed < rows.len() {
        bail!("{} of {} entries failed", rows.len() - passed, rows.len());
    }
    Ok(())
}

fn load_entries(args: &BatchArgs, kind: Entries) -> Result<Vec<String>> {
    if !args.entries.is_empty() {
        return Ok(args.entries.clone());
    }

    let input = open_input(args.io.input.as_deref())?;
    let entries = match kind {
        Entries::Identifiers => read_identifiers(input),
        Entries::Lines => read_lines(input),
    };
    entries.context("Failed to read entry list")
}

// Failed entries are written as comment lines.
fn convert_row(output: &InchiOutput) -> Row {
    match output.identifier() {
        Some(inchi) => (inchi.to_string(), true),
        None => (format!("# {} {}", output.status, output.message).trim_end().to_string(), false),
    }
}

fn key_row(output: &KeyOutput) -> Row {
    if output.status != KeyStatus::Ok {
        return (format!("# {}", output.status), false);
    }
    match &output.extensions {
        Some((first, second)) => (format!("{}\t{}\t{}", output.key, first, second), true),
        None => (output.key.clone(), true),
    }
}
