use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};

use inchi_forge::io::sdf;
use inchi_forge::{InchiOutput, RetStatus, normalize_options};

use crate::cli::{InchiArgs, StructureArgs};
use crate::config::{build_engine, call_options};
use crate::display::{Context as DisplayContext, Progress, print_structure_info};
use crate::io::{create_output, open_input};

pub fn run_inchi(args: InchiArgs, ctx: DisplayContext) -> Result<()> {
    let total_steps = if args.key { 3 } else { 2 };
    let mut progress = Progress::new(ctx.interactive, total_steps);
    let engine = build_engine(&args.engine)?;

    progress.step("Reading structure");
    let input = open_input(args.io.input.as_deref())?;
    let mut molecule = sdf::read(input).context("Failed to read SDF input")?;
    if let Some(options) = &args.engine.options {
        molecule.options = normalize_options(options)?;
    }
    progress.complete_step(
        "Reading structure",
        &[
            "Parse V2000 connection table".to_string(),
            "Apply charge, radical and isotope properties".to_string(),
        ],
    );

    if ctx.interactive {
        print_structure_info(&molecule);
    }

    progress.step("Generating identifier");
    let output = engine.generate(&molecule)?;
    let inchi = require_identifier(&output)?.to_string();
    progress.complete_step("Generating identifier", &status_substeps(&output));

    let key = if args.key {
        progress.step("Deriving key");
        let key = engine.generate_key(&inchi)?;
        if key.parsed().is_none() {
            bail!("Key derivation failed with status {}", key.status);
        }
        progress.complete_step("Deriving key", &[format!("Status {}", key.status)]);
        Some(key.key)
    } else {
        None
    };

    let mut out = create_output(args.io.output.as_deref())?;
    writeln!(out, "{}", inchi)?;
    if args.aux && !output.aux_info.is_empty() {
        writeln!(out, "{}", output.aux_info)?;
    }
    if let Some(key) = key {
        writeln!(out, "InChIKey={}", key)?;
    }
    out.flush()?;

    progress.finish();
    Ok(())
}

pub fn run_structure(args: StructureArgs, ctx: DisplayContext) -> Result<()> {
    let mut progress = Progress::new(ctx.interactive, 2);
    let engine = build_engine(&args.engine)?;

    let identifier = match args.identifier {
        Some(identifier) => identifier,
        None => first_entry(open_input(args.io.input.as_deref())?)?,
    };

    progress.step("Rebuilding structure");
    let output = engine.structure_from_inchi(&identifier, call_options(&args.engine))?;
    if !output.status.has_result() {
        bail!(
            "Structure generation failed with status {}: {}",
            output.status,
            message_or_default(&output.message)
        );
    }
    let mut substeps = vec![format!("Status {}", output.status)];
    if output.warning_flags.any() {
        substeps.push("Library raised structure warning flags".to_string());
    }
    progress.complete_step("Rebuilding structure", &substeps);

    if ctx.interactive {
        print_structure_info(&output.molecule);
    }

    progress.step("Writing output");
    let mut out = create_output(args.io.output.as_deref())?;
    sdf::write(&mut out, &output.molecule)?;
    out.flush()?;
    progress.complete_step("Writing output", &["Write V2000 SD record".to_string()]);

    progress.finish();
    Ok(())
}

fn require_identifier(output: &InchiOutput) -> Result<&str> {
    match output.identifier() {
        Some(inchi) => Ok(inchi),
        None => bail!(
            "Identifier generation failed with status {}: {}",
            output.status,
            message_or_default(&output.message)
        ),
    }
}

fn status_substeps(output: &InchiOutput) -> Vec<String> {
    let mut substeps = vec![format!("Status {}", output.status)];
    if output.status == RetStatus::Warning && !output.message.is_empty() {
        substeps.push(output.message.clone());
    }
    substeps
}

fn first_entry(reader: impl BufRead) -> Result<String> {
    for line in reader.lines() {
        let line = line?;
        let entry = line.trim();
        if !entry.is_empty() && !entry.starts_with('#') {
            return Ok(entry.to_string());
        }
    }
    bail!("Input is empty: expected an identifier")
}

fn message_or_default(message: &str) -> &str {
    if message.is_empty() {
        "no message from the library"
    } else {
        message
    }
}
