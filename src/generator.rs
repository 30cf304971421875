use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::grammar::{Element, Grammar};
use crate::utils::{GrammarError, Result};

/// Configuration options for generation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Maximum expansion depth; `None` expands until the grammar terminates
    pub max_depth: Option<usize>,
    /// Seed for the random source; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl GeneratorConfig {
    /// Load a configuration from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Load a configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Produces random derivations from a grammar.
///
/// One random source is threaded through every recursive expansion, so a
/// seeded generator is fully deterministic for a given grammar.
#[derive(Debug)]
pub struct Generator<'g, R = StdRng> {
    grammar: &'g Grammar,
    rng: R,
    max_depth: Option<usize>,
}

impl<'g> Generator<'g, StdRng> {
    /// Create a generator seeded from entropy
    pub fn new(grammar: &'g Grammar) -> Self {
        Self::with_rng(grammar, StdRng::from_entropy())
    }

    /// Create a deterministic generator
    pub fn seeded(grammar: &'g Grammar, seed: u64) -> Self {
        Self::with_rng(grammar, StdRng::seed_from_u64(seed))
    }

    pub fn from_config(grammar: &'g Grammar, config: &GeneratorConfig) -> Self {
        let generator = match config.seed {
            Some(seed) => Self::seeded(grammar, seed),
            None => Self::new(grammar),
        };
        Generator {
            max_depth: config.max_depth,
            ..generator
        }
    }
}

impl<'g, R: Rng> Generator<'g, R> {
    /// Create a generator drawing from the given random source
    pub fn with_rng(grammar: &'g Grammar, rng: R) -> Self {
        Generator {
            grammar,
            rng,
            max_depth: None,
        }
    }

    /// Fail derivations that nest deeper than `limit` expansions
    pub fn with_max_depth(mut self, limit: usize) -> Self {
        self.max_depth = Some(limit);
        self
    }

    /// Generate `count` independent sentences from `symbol`.
    ///
    /// Arguments are validated before any expansion: an undefined symbol or a
    /// negative count fails even when the other argument is valid.
    pub fn generate(&mut self, symbol: &str, count: i64) -> Result<Vec<String>> {
        if !self.grammar.contains(symbol) {
            return Err(GrammarError::UnknownSymbol(symbol.to_string()));
        }
        if count < 0 {
            return Err(GrammarError::NegativeCount(count));
        }

        debug!(symbol, count, "generating sentences");
        (0..count).map(|_| self.sentence(symbol)).collect()
    }

    /// Generate a single sentence from `symbol`
    pub fn sentence(&mut self, symbol: &str) -> Result<String> {
        if !self.grammar.contains(symbol) {
            return Err(GrammarError::UnknownSymbol(symbol.to_string()));
        }

        let mut tokens = Vec::new();
        self.expand(symbol, 0, &mut tokens)?;
        Ok(tokens.join(" "))
    }

    /// Recursively expand a symbol, appending its terminals to `out`
    fn expand(&mut self, symbol: &str, depth: usize, out: &mut Vec<&'g str>) -> Result<()> {
        if let Some(limit) = self.max_depth {
            if depth >= limit {
                warn!(symbol, limit, "expansion depth limit reached");
                return Err(GrammarError::TooDeep {
                    symbol: symbol.to_string(),
                    limit,
                });
            }
        }

        let grammar = self.grammar;
        let productions = grammar
            .productions(symbol)
            .ok_or_else(|| GrammarError::UnknownSymbol(symbol.to_string()))?;

        // Chosen fresh on every expansion, never fixed per symbol.
        let production = &productions[self.rng.gen_range(0..productions.len())];

        for element in &production.elements {
            match element {
                Element::Terminal(text) => out.push(text),
                Element::NonTerminal(name) => self.expand(name, depth + 1, out)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_grammar() -> Grammar {
        Grammar::from_lines([
            "<s>::=<np> <vp>",
            "<np>::=<dp> <adjp> <n>|<pn>",
            "<dp>::=the|a",
            "<adjp>::=<adj>|<adj> <adjp>",
            "<adj>::=big|fat|green|wonderful|faulty",
            "<n>::=dog|cat|man|university|father|mother|child",
            "<pn>::=John|Jane|Sally|Spot|Fred|Elmo",
            "<vp>::=<tv> <np>|<iv>",
            "<tv>::=hit|honored|kissed|helped",
            "<iv>::=died|collapsed|laughed|wept",
        ])
        .unwrap()
    }

    #[test]
    fn test_single_alternative_is_fixed() {
        let grammar = Grammar::from_lines(["<X>::=x"]).unwrap();
        let mut generator = Generator::seeded(&grammar, 7);
        assert_eq!(generator.generate("<X>", 3).unwrap(), vec!["x", "x", "x"]);
    }

    #[test]
    fn test_zero_count() {
        let grammar = sample_grammar();
        let mut generator = Generator::seeded(&grammar, 1);
        assert!(generator.generate("<s>", 0).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_arguments() {
        let grammar = sample_grammar();
        let mut generator = Generator::seeded(&grammar, 1);

        let err = generator.generate("<undefined>", 1).unwrap_err();
        assert!(matches!(err, GrammarError::UnknownSymbol(_)));
        let err = generator.generate("<undefined>", 0).unwrap_err();
        assert!(err.is_invalid_argument());
        let err = generator.generate("<s>", -1).unwrap_err();
        assert!(matches!(err, GrammarError::NegativeCount(-1)));
        let err = generator.generate("<undefined>", -5).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_sentences_contain_only_terminals() {
        let grammar = sample_grammar();
        let mut generator = Generator::seeded(&grammar, 42);
        let sentences = generator.generate("<s>", 50).unwrap();

        assert_eq!(sentences.len(), 50);
        for sentence in &sentences {
            assert_eq!(sentence.trim(), sentence);
            assert!(!sentence.contains("  "));
            for token in sentence.split(' ') {
                assert!(!grammar.contains(token), "{} left unexpanded", token);
            }
        }
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let grammar = sample_grammar();
        let first = Generator::seeded(&grammar, 2024).generate("<s>", 20).unwrap();
        let second = Generator::seeded(&grammar, 2024).generate("<s>", 20).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_alternatives_chosen_per_expansion() {
        // Both <A> references must be able to differ within one sentence.
        let grammar = Grammar::from_lines(["<S>::=<A> <A>", "<A>::=a|b"]).unwrap();
        let mut generator = Generator::seeded(&grammar, 3);
        let sentences = generator.generate("<S>", 200).unwrap();
        assert!(sentences.iter().any(|s| s == "a b" || s == "b a"));
    }

    #[test]
    fn test_depth_limit() {
        let grammar = Grammar::from_lines(["<loop>::=<loop> again"]).unwrap();
        let mut generator = Generator::seeded(&grammar, 0).with_max_depth(5);

        let err = generator.sentence("<loop>").unwrap_err();
        match err {
            GrammarError::TooDeep { symbol, limit } => {
                assert_eq!(symbol, "<loop>");
                assert_eq!(limit, 5);
            }
            other => panic!("Expected TooDeep, got {:?}", other),
        }
    }

    #[test]
    fn test_depth_limit_allows_shallow_grammars() {
        let grammar = Grammar::from_lines(["<S>::=<A> b", "<A>::=a|c"]).unwrap();
        let mut generator = Generator::seeded(&grammar, 9).with_max_depth(2);
        for sentence in generator.generate("<S>", 10).unwrap() {
            assert!(sentence == "a b" || sentence == "c b");
        }
    }

    #[test]
    fn test_config_from_json() {
        let config = GeneratorConfig::from_json_str(r#"{"max_depth": 12}"#).unwrap();
        assert_eq!(
            config,
            GeneratorConfig {
                max_depth: Some(12),
                seed: None,
            }
        );

        let config = GeneratorConfig::from_json_str("{}").unwrap();
        assert_eq!(config, GeneratorConfig::default());

        assert!(matches!(
            GeneratorConfig::from_json_str("{not json"),
            Err(GrammarError::Config(_))
        ));
    }

    #[test]
    fn test_from_config() {
        let grammar = Grammar::from_lines(["<loop>::=<loop>|x"]).unwrap();
        let config = GeneratorConfig {
            max_depth: Some(1),
            seed: Some(5),
        };

        let a = Generator::from_config(&grammar, &config).sentence("<loop>");
        let b = Generator::from_config(&grammar, &config).sentence("<loop>");
        match (a, b) {
            (Ok(a), Ok(b)) => {
                assert_eq!(a, "x");
                assert_eq!(b, "x");
            }
            (Err(a), Err(b)) => {
                assert!(matches!(a, GrammarError::TooDeep { limit: 1, .. }));
                assert!(matches!(b, GrammarError::TooDeep { limit: 1, .. }));
            }
            other => panic!("Seeded generators diverged: {:?}", other),
        }
    }
}
