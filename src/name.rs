//! Label classification and normalization.
//!
//! Every name stored in a lexicon passes through this module first. A raw
//! label is either a structured formula (`H2O`, `Ca(OH)2`, `A & B`), whose
//! case and symbols are significant, or a plain label (`Cell Membrane`,
//! `cell_membrane`), which is folded to a lowercase word sequence.
//!
//! Both normalizations are deterministic and idempotent:
//!
//! ```
//! use mediator_lexicon::name::normalize;
//!
//! assert_eq!(normalize("cellMembrane"), "cell membrane");
//! assert_eq!(normalize("B & A"), "A&B");
//! assert_eq!(normalize(&normalize("Cell_Membrane")), normalize("Cell_Membrane"));
//! ```

use std::sync::OnceLock;

use regex::Regex;

const OPERATORS: &[char] = &[
    '(', ')', '[', ']', '+', '-', '=', '&', '|', '^', '~', '!', ',', '.', '∧', '∨', '¬',
];

const COMMUTATIVE: &[char] = &['&', '|', '∧', '∨', '+'];

static ELEMENT_SEQUENCE: OnceLock<Option<Regex>> = OnceLock::new();

fn element_sequence() -> Option<&'static Regex> {
    ELEMENT_SEQUENCE
        .get_or_init(|| Regex::new(r"^(?:[A-Z][a-z]?[0-9]*)+$").ok())
        .as_ref()
}

fn is_operator(c: char) -> bool {
    OPERATORS.contains(&c)
}

/// A raw label tagged with the normalization rule that applies to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label<'a> {
    /// A structured expression: element symbols, numbers and operators.
    Formula(&'a str),
    /// An ordinary label.
    Plain(&'a str),
}

impl<'a> Label<'a> {
    /// Returns the raw text this label was classified from.
    #[must_use]
    pub const fn raw(&self) -> &'a str {
        match self {
            Self::Formula(raw) | Self::Plain(raw) => *raw,
        }
    }

    /// Returns true for the formula variant.
    #[must_use]
    pub const fn is_formula(&self) -> bool {
        matches!(self, Self::Formula(_))
    }

    /// Canonicalizes the label into a lookup key.
    #[must_use]
    pub fn normalize(&self) -> String {
        match self {
            Self::Formula(raw) => normalize_formula(raw),
            Self::Plain(raw) => normalize_plain(raw),
        }
    }
}

/// Classifies a raw label as a formula or a plain label.
///
/// A label is a formula when every alphanumeric token is a number or a run
/// of element-like symbols (`Ca`, `OH`, `C6H12O6`) and the label carries
/// at least one digit or operator. `ATP` stays plain, `ATP2` does not.
#[must_use]
pub fn classify(raw: &str) -> Label<'_> {
    if is_formula(raw) {
        Label::Formula(raw)
    } else {
        Label::Plain(raw)
    }
}

/// Classifies and normalizes a raw label in one step.
#[must_use]
pub fn normalize(raw: &str) -> String {
    classify(raw).normalize()
}

fn is_formula(raw: &str) -> bool {
    let Some(elements) = element_sequence() else {
        return false;
    };

    let mut tokens = 0usize;
    let mut marked = raw.chars().any(is_operator);
    for token in raw.split(|c: char| c.is_whitespace() || is_operator(c)) {
        if token.is_empty() {
            continue;
        }
        let numeric = token.chars().all(|c| c.is_ascii_digit());
        if !numeric && !elements.is_match(token) {
            return false;
        }
        marked |= token.chars().any(|c| c.is_ascii_digit());
        tokens += 1;
    }
    tokens > 0 && marked
}

/// Folds a plain label to lowercase words.
///
/// Separators are decided on the lowercased characters: some capitals
/// lowercase to a letter plus a combining mark (`İ` to `i` + U+0307), and
/// the mark must be folded on the first pass, not the second.
fn normalize_plain(raw: &str) -> String {
    let mut folded = String::with_capacity(raw.len());
    let mut prev: Option<char> = None;
    for c in raw.chars() {
        if prev.is_some_and(char::is_lowercase) && changes_case(c) {
            folded.push(' ');
        }
        for lower in c.to_lowercase() {
            folded.push(if lower.is_alphanumeric() { lower } else { ' ' });
        }
        prev = Some(c);
    }
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// True for capitals that lowercasing rewrites. Uncased capitals such as
/// `ϒ` survive lowercasing and must not split words on a later pass.
fn changes_case(c: char) -> bool {
    let mut lower = c.to_lowercase();
    !(lower.next() == Some(c) && lower.next().is_none())
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Word(String),
    Op(char),
}

fn tokenize(raw: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    for c in raw.chars() {
        if c.is_whitespace() || is_operator(c) {
            if !word.is_empty() {
                tokens.push(Token::Word(std::mem::take(&mut word)));
            }
            if is_operator(c) {
                tokens.push(Token::Op(c));
            }
        } else {
            word.push(c);
        }
    }
    if !word.is_empty() {
        tokens.push(Token::Word(word));
    }
    tokens
}

/// Renders an operand: adjacent words get one space, bracketed groups are
/// canonicalized recursively.
fn render_operand(tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut prev_word = false;
    let mut i = 0;
    while i < tokens.len() {
        match &tokens[i] {
            Token::Word(w) => {
                if prev_word {
                    out.push(' ');
                }
                out.push_str(w);
                prev_word = true;
            }
            Token::Op(open @ ('(' | '[')) => {
                prev_word = false;
                if let Some(close) = matching_close(tokens, i) {
                    out.push(*open);
                    out.push_str(&canonical(&tokens[i + 1..close]));
                    if let Token::Op(c) = &tokens[close] {
                        out.push(*c);
                    }
                    i = close;
                } else {
                    out.push(*open);
                }
            }
            Token::Op(c) => {
                out.push(*c);
                prev_word = false;
            }
        }
        i += 1;
    }
    out
}

fn matching_close(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        match token {
            Token::Op('(' | '[') => depth += 1,
            Token::Op(')' | ']') => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Positions of operators outside any bracket pair.
fn top_level_operators(tokens: &[Token]) -> Vec<(usize, char)> {
    let mut depth = 0usize;
    let mut found = Vec::new();
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::Op('(' | '[') => depth += 1,
            Token::Op(')' | ']') => depth = depth.saturating_sub(1),
            Token::Op(c) if depth == 0 => found.push((i, *c)),
            Token::Word(_) | Token::Op(_) => {}
        }
    }
    found
}

/// Returns true if every bracket in the run is closed and none closes early.
fn is_balanced(tokens: &[Token]) -> bool {
    let mut depth = 0usize;
    for token in tokens {
        match token {
            Token::Op('(' | '[') => depth += 1,
            Token::Op(')' | ']') => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            Token::Word(_) | Token::Op(_) => {}
        }
    }
    depth == 0
}

/// Operands of a top-level run of one commutative operator are sorted, so
/// `B & A` and `A&B` share a key. Any other operator mix keeps its order,
/// as do operands with a stray bracket: moving one would regroup the
/// tokens around it on the next pass.
fn canonical(tokens: &[Token]) -> String {
    let ops = top_level_operators(tokens);

    let mut operands = Vec::with_capacity(ops.len() + 1);
    let mut start = 0;
    for &(at, _) in &ops {
        operands.push(&tokens[start..at]);
        start = at + 1;
    }
    operands.push(&tokens[start..]);

    let commutative = match ops.first() {
        Some(&(_, first)) => {
            COMMUTATIVE.contains(&first)
                && ops.iter().all(|&(_, c)| c == first)
                && operands
                    .iter()
                    .all(|operand| !operand.is_empty() && is_balanced(operand))
        }
        None => false,
    };

    let mut rendered: Vec<String> = operands.into_iter().map(render_operand).collect();
    if commutative {
        rendered.sort();
    }

    let mut out = String::new();
    for (i, part) in rendered.iter().enumerate() {
        if i > 0 {
            out.push(ops[i - 1].1);
        }
        out.push_str(part);
    }
    out
}

fn normalize_formula(raw: &str) -> String {
    canonical(&tokenize(raw))
}
