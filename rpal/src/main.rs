use anyhow::Context;
use clap::Parser;
use span::SourceFiles;
use std::io;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rpal")]
#[command(about = "Interpreter for the RPAL language")]
struct Args {
    /// RPAL source file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Print the abstract syntax tree, and nothing else
    #[arg(long = "ast")]
    ast: bool,

    /// Print the standardized tree, and nothing else
    #[arg(long = "st", conflicts_with = "ast")]
    st: bool,

    /// Print the control structures, and nothing else
    #[arg(long, conflicts_with_all = ["ast", "st"])]
    control: bool,

    /// Initial size of the environment heap, in bytes
    #[arg(long, value_name = "BYTES", default_value_t = rpal::DEFAULT_HEAP_CAPACITY)]
    heap_capacity: usize,
}

/// `-ast` and `-st` are spelled with a single dash.
fn normalize_switch(arg: String) -> String {
    match arg.as_str() {
        "-ast" => String::from("--ast"),
        "-st" => String::from("--st"),
        _ => arg,
    }
}

/// Logs go to stderr, and only when `RUST_LOG` is set, e.g. `RUST_LOG=eval=trace`.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        let filter = EnvFilter::from_default_env();
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .with(filter)
            .init();
    }
}

/// Syntax errors are rendered with the offending line; everything else by its message.
fn reported(src_files: &SourceFiles, err: rpal::Error) -> anyhow::Error {
    match err {
        rpal::Error::Syntax(err) => {
            let mut report = Vec::new();
            match err.report(src_files, &mut report) {
                Result::Ok(()) => {
                    anyhow::Error::msg(String::from_utf8_lossy(&report).trim_end().to_string())
                }
                Result::Err(_) => err.into(),
            }
        }
        err => err.into(),
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let mut src_files = SourceFiles::new();
    let (_, name) = src_files
        .load_source_file(&args.file)
        .with_context(|| format!("couldn't read {}", args.file.display()))?;
    let src_file = src_files
        .get_by_name(&name)
        .with_context(|| format!("{} was not loaded", name))?;
    tracing::debug!(file = %name, bytes = src_file.content.len(), "loaded");

    let mut tree = rpal::parse_source(src_file).map_err(|err| reported(&src_files, err))?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.ast {
        out.write_all(pretty::pretty_tree(&tree).as_bytes())?;
        return Result::Ok(());
    }

    ast::standardize(&mut tree)?;
    if args.st {
        out.write_all(pretty::pretty_tree(&tree).as_bytes())?;
        return Result::Ok(());
    }

    let structures = compiler::build_root_closure(&tree)?;
    if args.control {
        out.write_all(pretty::pretty_control(&tree, &structures).as_bytes())?;
        return Result::Ok(());
    }

    let result = rpal::evaluate(&tree, &structures, args.heap_capacity, &mut out);
    // whatever was printed before a failure still ends the line
    writeln!(out)?;
    out.flush()?;
    let _ = result?;
    Result::Ok(())
}

fn main() {
    init_tracing();
    let args = Args::parse_from(std::env::args().map(normalize_switch));
    std::process::exit(match run(&args) {
        Result::Ok(()) => 0,
        Result::Err(err) => {
            eprintln!("{:#}", err);
            1
        }
    })
}
