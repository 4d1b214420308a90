mod identifier;
mod structure;

use identifier::{run_check, run_check_key, run_convert, run_key};
use structure::{run_inchi, run_structure};

use anyhow::Result;

use crate::cli::Command;
use crate::display::Context;

pub fn dispatch(command: Command, ctx: Context) -> Result<()> {
    match command {
        Command::Inchi(args) => run_inchi(args, ctx),
        Command::Structure(args) => run_structure(args, ctx),
        Command::Convert(args) => run_convert(args, ctx),
        Command::Key(args) => run_key(args, ctx),
        Command::CheckKey(args) => run_check_key(args, ctx),
        Command::Check(args) => run_check(args, ctx),
    }
}
