mod cli;
mod convert;
mod csv;
mod domain;
mod error;
mod output;

use std::io::Write;

use clap::Parser;
use tracing::error;

use crate::{
    cli::Args,
    convert::Conversion,
    error::{Error, Result},
};

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(args, &mut std::io::stdout()) {
        error!("{err}");
        std::process::exit(err.exit_code());
    }
}

fn run(args: Args, out: &mut impl Write) -> Result<()> {
    let formats = args.date_formats()?;
    let Some(input) = args.input else {
        writeln!(out, "{}", Args::usage()).map_err(|err| Error::io("stdout", err))?;
        return Err(Error::Usage(
            "please provide the statement file as an argument".to_owned(),
        ));
    };

    let conversion = convert::convert_file(&input, &formats)?;

    report(&conversion, out).map_err(|err| Error::io("stdout", err))
}

fn report(conversion: &Conversion, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(
        out,
        "=== Wrote {} bytes to {} ======",
        conversion.bytes_written,
        conversion.output_path.display()
    )?;
    writeln!(out, "{}", conversion.content)?;
    writeln!(out, "=== {} statements converted ======", conversion.records)
}
