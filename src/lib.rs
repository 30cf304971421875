//! Grammar-Solver generates random sentences from context-free grammars.
//!
//! A grammar is written one rule per line as `SYMBOL::=ALT1|ALT2|...`, where
//! each alternative is a whitespace separated sequence of tokens. Tokens that
//! name a defined symbol are expanded recursively; every other token is
//! emitted verbatim.
//!
//! # Example
//!
//! ```rust
//! use grammar_solver::{Generator, Grammar};
//!
//! let grammar = Grammar::from_lines(["<S>::=<A> b", "<A>::=a|c"]).unwrap();
//! assert_eq!(grammar.symbols(), vec!["<A>", "<S>"]);
//!
//! let mut generator = Generator::seeded(&grammar, 7);
//! let sentences = generator.generate("<S>", 1).unwrap();
//! assert!(sentences[0] == "a b" || sentences[0] == "c b");
//! ```

pub mod generator;
pub mod grammar;
pub mod utils;

pub use generator::{Generator, GeneratorConfig};
pub use grammar::{Grammar, GrammarBuilder};
pub use utils::{GrammarError, Result};

// Re-export common enums and structs
pub use grammar::{Element, Production};
