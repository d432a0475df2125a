//! Parsing of the AIGER ASCII (`aag`) format into a typed representation.
//!
//! This module only understands the textual `aag` variant of AIGER, with
//! header shapes up to version 1.9 (five header numbers). The binary `aig`
//! extensions are out of scope and rejected as [`AigerError::UnsupportedVersion`].

use std::fmt;
use std::io::{BufRead, BufReader, Read};

/// A raw AIGER literal: `2 * variable + polarity`. Variable 0 is reserved for
/// the constants (literal 0 is constant false, literal 1 is constant true).
pub type Lit = u32;

/// Returns whether a literal denotes one of the two constants.
pub fn lit_is_constant(l: Lit) -> bool {
    l >> 1 == 0
}

/// Variable index of a literal (0 for the constants).
pub fn lit_var(l: Lit) -> u32 {
    l >> 1
}

/// Polarity of a literal (true means negated).
pub fn lit_pol(l: Lit) -> bool {
    l & 1 != 0
}

/// Errors produced while parsing an `aag` file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AigerError {
    /// The file is empty, or the header line has fewer than five numbers.
    MissingHeader,
    /// The first token of the header is not `aag`.
    NoMagic,
    /// The header has more than five numbers (AIGER 1.9 binary extensions).
    UnsupportedVersion,
    /// A literal or header number could not be parsed as an integer.
    TooManyLiterals,
    /// A symbol line starts with something other than `i`, `o`, `l` or `c`.
    InvalidSymbolTarget,
    /// A symbol line is just the type letter, with nothing following it.
    SymbolTooShort,
    /// A symbol line has no digits right after the type letter.
    SymbolMissingIndex,
    /// A symbol line has an index but no label text.
    SymbolMissingLabel,
    /// A symbol index does not parse, or is out of range for its section.
    SymbolInvalidIndex,
}

impl fmt::Display for AigerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use AigerError::*;
        let msg = match self {
            MissingHeader => "missing or incomplete aag header",
            NoMagic => "missing aag magic",
            UnsupportedVersion => "unsupported AIGER version (binary extensions rejected)",
            TooManyLiterals => "malformed literal or header number",
            InvalidSymbolTarget => "symbol line does not start with i, o, l or c",
            SymbolTooShort => "symbol line is too short",
            SymbolMissingIndex => "symbol line is missing its index",
            SymbolMissingLabel => "symbol line is missing its label",
            SymbolInvalidIndex => "symbol index is invalid or out of range",
        };
        write!(f, "{msg}")
    }
}

impl std::error::Error for AigerError {}

/// Parsed `aag M I L O A` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Header {
    /// Maximum variable index declared by the file.
    pub max_var: u32,
    /// Number of primary inputs.
    pub nb_inputs: usize,
    /// Number of latches.
    pub nb_latches: usize,
    /// Number of primary outputs.
    pub nb_outputs: usize,
    /// Number of and-gates.
    pub nb_and_gates: usize,
}

/// A latch definition: `out = next(in)`. Parsed, but never turned into logic:
/// sequential behaviour is out of scope for this front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latch {
    /// Literal driven by the latch.
    pub out: Lit,
    /// Literal computing the latch's next state.
    pub next: Lit,
}

/// An and-gate definition: `out = a & b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AndGate {
    /// Output literal (always a fresh, unnegated variable).
    pub out: Lit,
    /// First input literal.
    pub a: Lit,
    /// Second input literal.
    pub b: Lit,
}

/// Typed representation of a parsed `aag` file.
#[derive(Debug, Clone, Default)]
pub struct Aiger {
    /// The parsed header.
    pub header: Header,
    /// Input literals, in declaration order.
    pub inputs: Vec<Lit>,
    /// Latch definitions, in declaration order. Discarded by the netlist builder.
    pub latches: Vec<Latch>,
    /// Output literals, in declaration order.
    pub outputs: Vec<Lit>,
    /// And-gate definitions, in declaration order.
    pub and_gates: Vec<AndGate>,
    /// Symbol labels for inputs, keyed by declaration index.
    pub input_names: std::collections::BTreeMap<usize, String>,
    /// Symbol labels for outputs, keyed by declaration index.
    pub output_names: std::collections::BTreeMap<usize, String>,
    /// Symbol labels for latches, keyed by declaration index.
    pub latch_names: std::collections::BTreeMap<usize, String>,
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(i) => &line[..i],
        None => line,
    }
}

fn parse_u32(s: &str) -> Result<u32, AigerError> {
    s.parse().map_err(|_| AigerError::TooManyLiterals)
}

/// Parse an ASCII AIGER (`aag`) file from a reader.
pub fn parse_aag<R: Read>(r: R) -> Result<Aiger, AigerError> {
    let mut lines = BufReader::new(r)
        .lines()
        .map_while(Result::ok)
        .map(|l| strip_comment(&l).trim().to_string());

    let header_line = lines.next().ok_or(AigerError::MissingHeader)?;
    let mut tokens = header_line.split_whitespace();
    let magic = tokens.next().ok_or(AigerError::MissingHeader)?;
    if magic != "aag" {
        return Err(AigerError::NoMagic);
    }
    let nums: Vec<&str> = tokens.collect();
    if nums.len() > 5 {
        return Err(AigerError::UnsupportedVersion);
    }
    if nums.len() < 5 {
        return Err(AigerError::MissingHeader);
    }
    let header = Header {
        max_var: parse_u32(nums[0])?,
        nb_inputs: parse_u32(nums[1])? as usize,
        nb_latches: parse_u32(nums[2])? as usize,
        nb_outputs: parse_u32(nums[3])? as usize,
        nb_and_gates: parse_u32(nums[4])? as usize,
    };

    // Body lines, with empty lines already skipped by the trim+filter below.
    let mut body = lines.filter(|l| !l.is_empty());

    let mut next_lit = |body: &mut dyn Iterator<Item = String>| -> Result<Lit, AigerError> {
        let line = body
            .next()
            .unwrap_or_else(|| panic!("unexpected end of file while reading AIGER body"));
        parse_u32(&line)
    };

    let mut inputs = Vec::with_capacity(header.nb_inputs);
    for _ in 0..header.nb_inputs {
        inputs.push(next_lit(&mut body)?);
    }

    let mut latches = Vec::with_capacity(header.nb_latches);
    for _ in 0..header.nb_latches {
        let line = body
            .next()
            .unwrap_or_else(|| panic!("unexpected end of file while reading AIGER latches"));
        let toks: Vec<&str> = line.split_whitespace().collect();
        assert!(toks.len() >= 2, "malformed latch line: {line}");
        latches.push(Latch {
            out: parse_u32(toks[0])?,
            next: parse_u32(toks[1])?,
        });
    }

    let mut outputs = Vec::with_capacity(header.nb_outputs);
    for _ in 0..header.nb_outputs {
        outputs.push(next_lit(&mut body)?);
    }

    let mut and_gates = Vec::with_capacity(header.nb_and_gates);
    for _ in 0..header.nb_and_gates {
        let line = body
            .next()
            .unwrap_or_else(|| panic!("unexpected end of file while reading AIGER and-gates"));
        let toks: Vec<&str> = line.split_whitespace().collect();
        assert!(toks.len() >= 3, "malformed and-gate line: {line}");
        and_gates.push(AndGate {
            out: parse_u32(toks[0])?,
            a: parse_u32(toks[1])?,
            b: parse_u32(toks[2])?,
        });
    }

    let mut input_names = std::collections::BTreeMap::new();
    let mut output_names = std::collections::BTreeMap::new();
    let mut latch_names = std::collections::BTreeMap::new();

    for line in body {
        if line.starts_with('c') {
            break;
        }
        let mut chars = line.chars();
        let prefix = chars.next().ok_or(AigerError::SymbolTooShort)?;
        if !matches!(prefix, 'i' | 'o' | 'l') {
            return Err(AigerError::InvalidSymbolTarget);
        }
        let rest = chars.as_str();
        if rest.is_empty() {
            return Err(AigerError::SymbolTooShort);
        }
        let idx_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        if idx_end == 0 {
            return Err(AigerError::SymbolMissingIndex);
        }
        let (idx_str, label_part) = rest.split_at(idx_end);
        let index: usize = idx_str.parse().map_err(|_| AigerError::SymbolInvalidIndex)?;
        let label = label_part.trim();
        if label.is_empty() {
            return Err(AigerError::SymbolMissingLabel);
        }
        let bound = match prefix {
            'i' => header.nb_inputs,
            'o' => header.nb_outputs,
            'l' => header.nb_latches,
            _ => unreachable!(),
        };
        if index >= bound {
            return Err(AigerError::SymbolInvalidIndex);
        }
        match prefix {
            'i' => {
                input_names.insert(index, label.to_string());
            }
            'o' => {
                output_names.insert(index, label.to_string());
            }
            'l' => {
                latch_names.insert(index, label.to_string());
            }
            _ => unreachable!(),
        }
    }

    Ok(Aiger {
        header,
        inputs,
        latches,
        outputs,
        and_gates,
        input_names,
        output_names,
        latch_names,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate() {
        let aig = parse_aag("aag 0 0 0 0 0\n".as_bytes()).unwrap();
        assert_eq!(aig.header.max_var, 0);
        assert_eq!(aig.inputs.len(), 0);
        assert_eq!(aig.outputs.len(), 0);
        assert_eq!(aig.and_gates.len(), 0);
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(parse_aag("".as_bytes()).unwrap_err(), AigerError::MissingHeader);
        assert_eq!(
            parse_aag("aag 1 1 0 1\n".as_bytes()).unwrap_err(),
            AigerError::MissingHeader
        );
    }

    #[test]
    fn test_no_magic() {
        assert_eq!(
            parse_aag("aig 1 1 0 1 0\n".as_bytes()).unwrap_err(),
            AigerError::NoMagic
        );
    }

    #[test]
    fn test_unsupported_version() {
        assert_eq!(
            parse_aag("aag 1 1 0 1 0 0 0 0\n".as_bytes()).unwrap_err(),
            AigerError::UnsupportedVersion
        );
    }

    #[test]
    fn test_too_many_literals() {
        assert_eq!(
            parse_aag("aag x 1 0 1 0\n".as_bytes()).unwrap_err(),
            AigerError::TooManyLiterals
        );
    }

    #[test]
    fn test_comments_and_whitespace() {
        let text = "aag 1 1 0 1 0   # header comment\n2   \n2\n";
        let aig = parse_aag(text.as_bytes()).unwrap();
        assert_eq!(aig.inputs, vec![2]);
        assert_eq!(aig.outputs, vec![2]);
    }

    #[test]
    fn test_single_and_gate() {
        // aag 3 2 0 2 1: inputs x1, x2; single and-gate out = AND(x1, !x1);
        // output 0 is the gate, output 1 passes x2 through unchanged.
        let text = "aag 3 2 0 2 1\n2\n4\n6\n4\n6 2 3\n";
        let aig = parse_aag(text.as_bytes()).unwrap();
        assert_eq!(aig.inputs, vec![2, 4]);
        assert_eq!(aig.outputs, vec![6, 4]);
        assert_eq!(aig.and_gates.len(), 1);
        assert_eq!(aig.and_gates[0], AndGate { out: 6, a: 2, b: 3 });
    }

    #[test]
    fn test_symbol_table() {
        let text = "aag 1 1 0 1 0\n2\n2\ni0 reset\no0 out\nc\nsome free-form comment\n";
        let aig = parse_aag(text.as_bytes()).unwrap();
        assert_eq!(aig.input_names.get(&0), Some(&"reset".to_string()));
        assert_eq!(aig.output_names.get(&0), Some(&"out".to_string()));
    }

    #[test]
    fn test_symbol_errors() {
        let bad_target = "aag 1 1 0 1 0\n2\n2\nx0 foo\n";
        assert_eq!(
            parse_aag(bad_target.as_bytes()).unwrap_err(),
            AigerError::InvalidSymbolTarget
        );

        let too_short = "aag 1 1 0 1 0\n2\n2\ni\n";
        assert_eq!(
            parse_aag(too_short.as_bytes()).unwrap_err(),
            AigerError::SymbolTooShort
        );

        let missing_index = "aag 1 1 0 1 0\n2\n2\ni foo\n";
        assert_eq!(
            parse_aag(missing_index.as_bytes()).unwrap_err(),
            AigerError::SymbolMissingIndex
        );

        let missing_label = "aag 1 1 0 1 0\n2\n2\ni0\n";
        assert_eq!(
            parse_aag(missing_label.as_bytes()).unwrap_err(),
            AigerError::SymbolMissingLabel
        );

        let invalid_index = "aag 1 1 0 1 0\n2\n2\ni5 foo\n";
        assert_eq!(
            parse_aag(invalid_index.as_bytes()).unwrap_err(),
            AigerError::SymbolInvalidIndex
        );
    }
}
