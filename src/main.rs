// The thin CLI driver: `cc <source_file> <output_asm_file>`, exit 0 on
// success, exit 1 on any failure, diagnostics to stderr, silent
// success.

use cc::emit::Emitter;
use cc::error::{CompileError, DriverError, IoErrorContext};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

/// Translates a curated C-like subset into GNU-style x86-64 assembly.
#[derive(Parser, Debug)]
#[command(name = "cc", version, about)]
struct Args {
    /// Source file to compile.
    source: PathBuf,

    /// Path to write the generated GAS assembly to.
    output: PathBuf,

    /// Write Graphviz `.dot` dumps of the SAST/TIR/AIR alongside the
    /// normal output, using this path prefix. Purely a debugging aid;
    /// omitting it changes no other behavior.
    #[arg(long, value_name = "PREFIX")]
    dump_dot: Option<PathBuf>,
}

fn run(args: Args) -> Result<(), DriverError> {
    let source = fs::read_to_string(&args.source)
        .map_err(|err| DriverError::Io(err, IoErrorContext::ReadInput, args.source.clone()))?;

    info!(path = %args.source.display(), "parsing source");
    let program = cc::parser::parse_program(&source).map_err(CompileError::from)?;

    info!("lowering to TIR");
    let tir = cc::tir::lower_program(&program)?;

    info!("selecting AIR instructions");
    let air = cc::select::select_program(&tir);

    info!("allocating stack slots");
    let allocated = cc::stackalloc::allocate_stack_slots(air);

    info!("legalizing instructions");
    let legal = cc::legalize::legalize_program(allocated);

    if let Some(prefix) = &args.dump_dot {
        dump_dot_files(prefix, &program, &tir)?;
    }

    info!(path = %args.output.display(), "emitting assembly");
    Emitter::create(&args.output)?.dump(&legal)
}

fn dump_dot_files(
    prefix: &std::path::Path,
    program: &cc::ast::Program,
    tir: &cc::tir::TProgram,
) -> Result<(), DriverError> {
    let write = |suffix: &str, contents: String| -> Result<(), DriverError> {
        let path = prefix.with_extension(suffix);
        fs::write(&path, contents).map_err(|err| DriverError::Io(err, IoErrorContext::WriteOutput, path))
    };
    write("sast.dot", cc::dot::dump_sast(program))?;
    write("tir.dot", cc::dot::dump_tir(tir))?;
    let air = cc::select::select_program(tir);
    write("air.dot", cc::dot::dump_air(&air))
}

fn main() -> ExitCode {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
