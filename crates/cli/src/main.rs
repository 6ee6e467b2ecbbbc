mod options;

use anyhow::{Context, Result};
use optmap_argparse::{Diagnostic, Parsed, Parser};
use std::io::{self, Write};
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    init_tracing();

    let schema = options::schema().context("failed to register options")?;
    let parser = Parser::new(schema);

    let argv: Vec<String> = std::env::args().skip(1).collect();
    tracing::debug!(count = argv.len(), "parsing arguments");
    let parsed = parser.parse(&argv);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    report(&mut out, &parser, &parsed).context("failed to write to stdout")?;
    out.flush()?;

    Ok(())
}

fn report(out: &mut impl Write, parser: &Parser, parsed: &Parsed<'_>) -> io::Result<()> {
    for diag in &parsed.diagnostics {
        match diag {
            Diagnostic::UnknownArgument { .. } => writeln!(out, "warning: {diag}")?,
            Diagnostic::MissingValue { .. } => writeln!(out, "error: {diag}")?,
        }
    }

    if parsed.has_flag(options::HELP) {
        write!(out, "{}", parser.help())?;
        return Ok(());
    }

    let name = parsed.get_string(options::NAME);
    if !name.is_empty() {
        writeln!(out, "User: {name}")?;
    }

    let output = parsed.get_string(options::OUTPUT);
    if !output.is_empty() {
        writeln!(out, "Output File: {output}")?;
    }

    if parsed.has_flag(options::VERBOSE) {
        writeln!(out, "[DEBUG] Verbose mode is ON.")?;
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}
