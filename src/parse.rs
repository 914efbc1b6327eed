//! # Parsing Module
//!
//! This module loads program source into a [`Program`] memory image.
//!
//! Program source is a whitespace separated list of words. Each word
//! becomes exactly one cell:
//! - a mnemonic such as `LITERAL` or `DS_ADD` (case insensitive, with a
//!   few Forth style aliases like `+` and `@`) becomes its opcode,
//! - a decimal integer like `42` or `-7` is stored verbatim,
//! - a hexadecimal integer like `0x22` or `-0x10` is stored verbatim.
//!
//! Comments (`// ...` and `/* ... */`) are stripped before parsing.
//!
//! #### Error Locations
//!
//! The byte offsets in a [`LoadError`] refer to the source *after*
//! comments are stripped. Use [`strip_comments`] to recover the text
//! that the offsets index into.
use crate::vm::{InstructionSet, Op, Program};

use codespan_reporting::{
    diagnostic::{Diagnostic, Label},
    files::SimpleFile,
    term::{self, termcolor::NoColor},
};
use core::{fmt, ops::Range};
use lazy_static::lazy_static;
use maplit::btreemap;
use no_comment::{languages, IntoWithoutComments as _};
use nom::{
    branch::alt,
    bytes::complete::{tag_no_case, take_while1},
    character::complete::{digit1, hex_digit1, multispace0, one_of},
    combinator::{all_consuming, map, opt},
    error::ParseError,
    sequence::preceded,
    IResult,
};
use std::collections::BTreeMap;

lazy_static! {
    // Every canonical mnemonic, plus the Forth spellings of the same words.
    static ref MNEMONICS: BTreeMap<&'static str, Op> = {
        let mut result = btreemap! {
            "@" => Op::DsFetch,
            "!" => Op::DsStore,
            "+" => Op::DsAdd,
            "-" => Op::DsSub,
            "*" => Op::DsMul,
            "/" => Op::DsDiv,
            "=" => Op::DsEq,
            "AND" => Op::DsAnd,
            "INVERT" => Op::DsNot,
        };
        result.extend(Op::ALL.iter().map(|op| (op.mnemonic(), *op)));
        result
    };
}

/// Look up a mnemonic, ignoring case.
pub fn lookup_mnemonic(name: &str) -> Option<Op> {
    MNEMONICS.get(name.to_ascii_uppercase().as_str()).copied()
}

/// An error produced while loading program source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadError {
    /// A word that is neither a mnemonic nor an integer.
    UnknownWord { word: String, offset: usize },
    /// An integer that does not fit in 64 bits.
    InvalidInteger { word: String, offset: usize },
    /// An `IF` without a `THEN`, or a `THEN` without an `IF`.
    Unbalanced { op: Op, word: String, offset: usize },
}

impl LoadError {
    /// The byte range of the offending word in the stripped source.
    pub fn span(&self) -> Range<usize> {
        match self {
            LoadError::UnknownWord { word, offset }
            | LoadError::InvalidInteger { word, offset }
            | LoadError::Unbalanced { word, offset, .. } => *offset..*offset + word.len(),
        }
    }

    /// Build a diagnostic pointing at the offending word.
    pub fn to_diagnostic(&self) -> Diagnostic<()> {
        let label = match self {
            LoadError::UnknownWord { .. } => "not a mnemonic or an integer".to_string(),
            LoadError::InvalidInteger { .. } => "does not fit in 64 bits".to_string(),
            LoadError::Unbalanced { op: Op::If, .. } => "this IF is never closed".to_string(),
            LoadError::Unbalanced { op, .. } => format!("this {op} closes nothing"),
        };
        Diagnostic::error()
            .with_message(self.to_string())
            .with_labels(vec![Label::primary((), self.span()).with_message(label)])
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::UnknownWord { word, .. } => write!(f, "unknown word `{word}`"),
            LoadError::InvalidInteger { word, .. } => write!(f, "invalid integer `{word}`"),
            LoadError::Unbalanced { op, .. } => write!(f, "unmatched `{op}`"),
        }
    }
}

impl std::error::Error for LoadError {}

/// Remove `//` and `/* */` comments from program source.
pub fn strip_comments(input: impl ToString) -> String {
    input
        .to_string()
        .chars()
        .without_comments(languages::rust())
        .collect::<String>()
}

/// Parse program source into a memory image.
pub fn parse_program(input: impl ToString) -> Result<Program, LoadError> {
    let code = strip_comments(input);

    let mut program = Program::new();
    // The source offset of the word behind each cell.
    let mut words = vec![];
    let mut rest = code.as_str();
    while let Ok((after, word)) = preceded(whitespace::<()>, word::<()>)(rest) {
        let offset = code.len() - after.len() - word.len();
        rest = after;

        program = match token(word) {
            Ok((_, Token::Integer { negative, radix, digits })) => {
                let digits = if negative {
                    format!("-{digits}")
                } else {
                    digits.to_string()
                };
                let value = i64::from_str_radix(&digits, radix).map_err(|_| {
                    LoadError::InvalidInteger {
                        word: word.to_string(),
                        offset,
                    }
                })?;
                program.raw(value)
            }
            Ok((_, Token::Name(name))) => match lookup_mnemonic(name) {
                Some(op) => program.op(op),
                None => {
                    return Err(LoadError::UnknownWord {
                        word: word.to_string(),
                        offset,
                    })
                }
            },
            Err(_) => {
                return Err(LoadError::UnknownWord {
                    word: word.to_string(),
                    offset,
                })
            }
        };
        words.push((offset, word));
    }

    if let Err(unmatched) = program.check_conditionals(&InstructionSet::default()) {
        let (offset, word) = words[unmatched.address];
        return Err(LoadError::Unbalanced {
            op: unmatched.op,
            word: word.to_string(),
            offset,
        });
    }

    Ok(program)
}

/// Render a load error against its (comment-stripped) source as plain text.
pub fn format_error(name: &str, code: &str, err: &LoadError) -> String {
    let file = SimpleFile::new(name, code);
    let mut writer = NoColor::new(vec![]);
    let config = term::Config::default();
    match term::emit(&mut writer, &config, &file, &err.to_diagnostic()) {
        Ok(()) => String::from_utf8_lossy(&writer.into_inner()).into_owned(),
        Err(_) => err.to_string(),
    }
}

enum Token<'a> {
    Integer {
        negative: bool,
        radix: u32,
        digits: &'a str,
    },
    Name(&'a str),
}

fn whitespace<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, &'a str, E> {
    multispace0(input)
}

fn word<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, &'a str, E> {
    take_while1(|c: char| !c.is_whitespace())(input)
}

fn integer(input: &str) -> IResult<&str, Token<'_>> {
    let (input, sign) = opt(one_of("+-"))(input)?;
    let negative = sign == Some('-');
    alt((
        map(preceded(tag_no_case("0x"), hex_digit1), move |digits| {
            Token::Integer {
                negative,
                radix: 16,
                digits,
            }
        }),
        map(digit1, move |digits| Token::Integer {
            negative,
            radix: 10,
            digits,
        }),
    ))(input)
}

fn name(input: &str) -> IResult<&str, Token<'_>> {
    map(word, Token::Name)(input)
}

/// Classify a single word. The whole word must be consumed.
fn token(input: &str) -> IResult<&str, Token<'_>> {
    all_consuming(alt((integer, name)))(input)
}
