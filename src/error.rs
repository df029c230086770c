// Error kinds shared by every pipeline stage: wrap a lower stage's
// error as a variant, wrap I/O failures with the file operation that
// failed.

use std::fmt;
use std::path::PathBuf;

/// A single lexer/parser failure. Distinct from `CompileError` so the
/// parser can build one without committing to how it will be reported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyntaxError {
    UnexpectedChar(char),
    UnterminatedNumber,
    NumberOverflow(String),
    Expected { expected: &'static str, found: String },
    UnexpectedEof { expected: &'static str },
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxError::UnexpectedChar(c) => write!(f, "unexpected character '{c}'"),
            SyntaxError::UnterminatedNumber => write!(f, "unterminated integer literal"),
            SyntaxError::NumberOverflow(s) => write!(f, "integer literal '{s}' does not fit in 32 bits"),
            SyntaxError::Expected { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            SyntaxError::UnexpectedEof { expected } => {
                write!(f, "expected {expected}, found end of input")
            }
        }
    }
}

/// Every compile-time failure, flattened into one enum that every pass
/// (parser through emitter) returns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CompileError {
    Syntax(SyntaxError),
    UnsupportedType(&'static str),
    /// A downstream pass found a tree shape its predecessor should have
    /// made impossible. Always a compiler bug, never a user error.
    InternalInvariant(String),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Syntax(e) => write!(f, "syntax error: {e}"),
            CompileError::UnsupportedType(t) => write!(f, "unsupported type: {t}"),
            CompileError::InternalInvariant(msg) => write!(f, "internal compiler error: {msg}"),
        }
    }
}

impl std::error::Error for CompileError {}

impl From<SyntaxError> for CompileError {
    fn from(e: SyntaxError) -> Self {
        CompileError::Syntax(e)
    }
}

/// Context for an I/O failure at the driver boundary, so the CLI can
/// report which of the two named files failed and how.
#[derive(Debug)]
pub enum IoErrorContext {
    ReadInput,
    WriteOutput,
}

/// Top-level driver error: either the compiler failed, or opening one
/// of the two CLI-named files failed.
#[derive(Debug)]
pub enum DriverError {
    Compile(CompileError),
    Io(std::io::Error, IoErrorContext, PathBuf),
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::Compile(e) => write!(f, "{e}"),
            DriverError::Io(err, context, path) => write!(
                f,
                "{} file \"{}\" failed: {}",
                match context {
                    IoErrorContext::ReadInput => "reading input",
                    IoErrorContext::WriteOutput => "writing output",
                },
                path.display(),
                err
            ),
        }
    }
}

impl std::error::Error for DriverError {}

impl From<CompileError> for DriverError {
    fn from(e: CompileError) -> Self {
        DriverError::Compile(e)
    }
}

pub type CResult<T> = Result<T, CompileError>;
