use std::io;
use thiserror::Error;

/// Errors raised while building a grammar or generating from it
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Invalid grammar: no rules defined")]
    EmptyGrammar,

    #[error("Invalid grammar: line {line} has no '::=' separator: {text:?}")]
    MissingSeparator { line: usize, text: String },

    #[error("Invalid grammar: line {line} has an empty left-hand side")]
    EmptySymbol { line: usize },

    #[error("Invalid grammar: duplicate definition of {0}")]
    DuplicateSymbol(String),

    #[error("Invalid grammar: alternative {index} of {symbol} is empty")]
    EmptyAlternative { symbol: String, index: usize },

    #[error("Invalid argument: unknown symbol {0}")]
    UnknownSymbol(String),

    #[error("Invalid argument: negative count {0}")]
    NegativeCount(i64),

    #[error("Grammar too deep: expanding {symbol} exceeded depth {limit}")]
    TooDeep { symbol: String, limit: usize },
}

impl GrammarError {
    /// True for errors raised while constructing a grammar from its rule lines
    pub fn is_invalid_grammar(&self) -> bool {
        matches!(
            self,
            GrammarError::EmptyGrammar
                | GrammarError::MissingSeparator { .. }
                | GrammarError::EmptySymbol { .. }
                | GrammarError::DuplicateSymbol(_)
                | GrammarError::EmptyAlternative { .. }
        )
    }

    /// True for errors raised by bad arguments to a generation call
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            GrammarError::UnknownSymbol(_) | GrammarError::NegativeCount(_)
        )
    }
}

/// Result type for grammar operations
pub type Result<T> = std::result::Result<T, GrammarError>;
