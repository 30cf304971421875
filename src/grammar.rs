use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

use crate::generator::Generator;
use crate::utils::{GrammarError, Result};

/// Separates a rule's symbol from its alternatives
pub const SEPARATOR: &str = "::=";

/// Separates the alternatives of a rule
pub const ALTERNATION: char = '|';

/// Represents an element in the grammar, either a terminal or a non-terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    /// A terminal token, emitted verbatim
    Terminal(String),
    /// A reference to a symbol defined by the grammar
    NonTerminal(String),
}

impl Element {
    /// The token text as it appeared in the rule
    pub fn token(&self) -> &str {
        match self {
            Element::Terminal(text) | Element::NonTerminal(text) => text,
        }
    }
}

/// One alternative right-hand side of a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Production {
    /// The sequence of elements in this production, never empty
    pub elements: Vec<Element>,
}

/// An immutable grammar keyed by symbol in sorted order.
///
/// Built atomically from rule lines of the form `SYMBOL::=ALT1|ALT2|...`,
/// where each alternative is a whitespace separated token sequence. A token
/// naming a defined symbol is a non-terminal; every other token is a terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    rules: BTreeMap<String, Vec<Production>>,
}

impl Grammar {
    /// Parse a grammar from its rule lines.
    ///
    /// Fails when there are no lines, when a line lacks `::=` or a symbol,
    /// when a symbol is defined twice, or when an alternative has no tokens.
    pub fn from_lines<I, S>(lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::build(
            lines
                .into_iter()
                .enumerate()
                .map(|(idx, line)| (idx + 1, line)),
        )
    }

    /// Parse a grammar file, one rule per line.
    ///
    /// Blank lines and lines starting with `#` are skipped.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "loading grammar file");
        content.parse()
    }

    fn build<I, S>(lines: I) -> Result<Self>
    where
        I: Iterator<Item = (usize, S)>,
        S: AsRef<str>,
    {
        let mut raw: BTreeMap<String, Vec<Vec<String>>> = BTreeMap::new();

        for (number, line) in lines {
            let line = line.as_ref();
            let (lhs, rhs) = line.split_once(SEPARATOR).ok_or_else(|| {
                GrammarError::MissingSeparator {
                    line: number,
                    text: line.to_string(),
                }
            })?;

            let symbol = lhs.trim();
            if symbol.is_empty() {
                return Err(GrammarError::EmptySymbol { line: number });
            }
            if raw.contains_key(symbol) {
                return Err(GrammarError::DuplicateSymbol(symbol.to_string()));
            }

            let mut alternatives = Vec::new();
            for (index, alternative) in rhs.split(ALTERNATION).enumerate() {
                let tokens: Vec<String> =
                    alternative.split_whitespace().map(str::to_string).collect();
                if tokens.is_empty() {
                    return Err(GrammarError::EmptyAlternative {
                        symbol: symbol.to_string(),
                        index: index + 1,
                    });
                }
                alternatives.push(tokens);
            }

            raw.insert(symbol.to_string(), alternatives);
        }

        if raw.is_empty() {
            return Err(GrammarError::EmptyGrammar);
        }

        // Classification needs every symbol, so it runs once all lines are in.
        let rules = raw
            .iter()
            .map(|(symbol, alternatives)| {
                let productions = alternatives
                    .iter()
                    .map(|tokens| Production {
                        elements: tokens
                            .iter()
                            .map(|token| {
                                if raw.contains_key(token) {
                                    Element::NonTerminal(token.clone())
                                } else {
                                    Element::Terminal(token.clone())
                                }
                            })
                            .collect(),
                    })
                    .collect();
                (symbol.clone(), productions)
            })
            .collect::<BTreeMap<_, _>>();

        debug!(symbols = rules.len(), "grammar constructed");
        Ok(Grammar { rules })
    }

    /// Check if the grammar defines a symbol
    pub fn contains(&self, symbol: &str) -> bool {
        self.rules.contains_key(symbol)
    }

    /// All defined symbols in sorted order
    pub fn symbols(&self) -> Vec<&str> {
        self.rules.keys().map(String::as_str).collect()
    }

    /// The alternatives of a symbol, if it is defined
    pub fn productions(&self, symbol: &str) -> Option<&[Production]> {
        self.rules.get(symbol).map(Vec::as_slice)
    }

    /// Number of defined symbols
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Always false for a constructed grammar
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Generate `count` random sentences from `symbol` with an entropy seeded generator
    pub fn generate(&self, symbol: &str, count: i64) -> Result<Vec<String>> {
        Generator::new(self).generate(symbol, count)
    }
}

impl FromStr for Grammar {
    type Err = GrammarError;

    fn from_str(text: &str) -> Result<Self> {
        Self::build(
            text.lines()
                .enumerate()
                .map(|(idx, line)| (idx + 1, line.trim()))
                .filter(|(_, line)| !line.is_empty() && !line.starts_with('#')),
        )
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.symbols().join(", "))
    }
}

/// Builder for assembling grammar rule lines
#[derive(Debug, Default, Clone)]
pub struct GrammarBuilder {
    lines: Vec<String>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        GrammarBuilder::default()
    }

    /// Add a rule from a symbol and its alternatives
    pub fn rule(mut self, symbol: &str, alternatives: &[&str]) -> Self {
        self.lines.push(format!(
            "{}{}{}",
            symbol,
            SEPARATOR,
            alternatives.join(&ALTERNATION.to_string())
        ));
        self
    }

    /// Add a raw rule line
    pub fn line(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    /// Build the grammar, validating every line
    pub fn build(self) -> Result<Grammar> {
        Grammar::from_lines(&self.lines)
    }
}
