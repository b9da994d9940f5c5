//! Parser for RPN lines.
//!
//! Recognises the four keywords and otherwise requires a mnemonic known to
//! the registry.

use rteval_common::TypeDescriptor;
use rteval_registry::{FunctionRegistry, CAST, CONST, READ, WRITE};

use crate::error::CompileError;
use crate::lexer::tokenize_line;

/// One RPN command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `READ <name>`
    Read(String),
    /// `WRITE <name>`
    Write(String),
    /// `CONST <type> <literal>`
    Const(TypeDescriptor, String),
    /// `CAST <type>`
    Cast(TypeDescriptor),
    /// Any other mnemonic, upper-cased.
    Call(String),
}

/// A command together with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpnLine {
    pub line: usize,
    pub command: Command,
}

/// Parse every non-blank line of `text`.
///
/// Returns the first error encountered.
pub fn parse_program(
    text: &str,
    registry: &FunctionRegistry,
) -> Result<Vec<RpnLine>, CompileError> {
    let mut lines = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let tokens = tokenize_line(raw);
        if let Some(command) = parse_line(&tokens, line, registry)? {
            lines.push(RpnLine { line, command });
        }
    }
    Ok(lines)
}

fn parse_line(
    tokens: &[&str],
    line: usize,
    registry: &FunctionRegistry,
) -> Result<Option<Command>, CompileError> {
    let Some((first, args)) = tokens.split_first() else {
        return Ok(None);
    };
    let keyword = first.to_ascii_uppercase();

    let command = match keyword.as_str() {
        READ => Command::Read(expect_name(args, line, READ)?.to_string()),
        WRITE => Command::Write(expect_name(args, line, WRITE)?.to_string()),
        CONST => {
            let [ty, literal] = expect_args::<2>(args, line, CONST)?;
            Command::Const(expect_type(ty, line)?, literal.to_string())
        }
        CAST => {
            let [ty] = expect_args::<1>(args, line, CAST)?;
            Command::Cast(expect_type(ty, line)?)
        }
        _ => {
            if !registry.contains(&keyword) {
                return Err(CompileError::UnknownCommand {
                    line,
                    token: first.to_string(),
                });
            }
            expect_args::<0>(args, line, "function")?;
            Command::Call(keyword)
        }
    };
    Ok(Some(command))
}

/// Exactly `N` arguments.
fn expect_args<'a, const N: usize>(
    args: &[&'a str],
    line: usize,
    command: &'static str,
) -> Result<[&'a str; N], CompileError> {
    if args.len() < N {
        return Err(CompileError::MissingArgument {
            line,
            command,
            expected: N,
        });
    }
    if let Some(extra) = args.get(N) {
        return Err(CompileError::UnexpectedToken {
            line,
            token: extra.to_string(),
        });
    }
    Ok(std::array::from_fn(|i| args[i]))
}

fn expect_name<'a>(
    args: &[&'a str],
    line: usize,
    command: &'static str,
) -> Result<&'a str, CompileError> {
    let [name] = expect_args::<1>(args, line, command)?;
    Ok(name)
}

fn expect_type(token: &str, line: usize) -> Result<TypeDescriptor, CompileError> {
    TypeDescriptor::from_name(token).ok_or_else(|| CompileError::UnknownType {
        line,
        token: token.to_string(),
    })
}
