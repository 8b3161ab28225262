//! minic analysis service: runs lexer, parser and semantic analyzer over one
//! source text and assembles the combined result.
//!
//! Each stage runs on whatever the previous one produced, errors included,
//! so one call always yields a complete [`AnalysisResult`]. Nothing is kept
//! between calls; concurrent callers need no coordination.

pub mod report;
pub mod server;

pub use report::{AnalyzeRequest, AnalyzeResponse, SymbolRow, TokenRow};

use minic_analyzer::SymbolEntry;
use minic_syntax::error::{LexicalError, SemanticError, SyntaxError};
use minic_syntax::token::Token;

/// Everything one analysis produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisResult {
    pub tokens: Vec<Token>,
    pub lexical_errors: Vec<LexicalError>,
    pub symbol_table: Vec<SymbolEntry>,
    pub syntax_errors: Vec<SyntaxError>,
    pub semantic_errors: Vec<SemanticError>,
}

impl AnalysisResult {
    pub fn diagnostic_count(&self) -> usize {
        self.lexical_errors.len() + self.syntax_errors.len() + self.semantic_errors.len()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostic_count() > 0
    }
}

/// Analyze `source` end to end. Never fails.
pub fn analyze(source: &str) -> AnalysisResult {
    let lexed = minic_lexer::tokenize(source);
    let parsed = minic_parser::parse(lexed.tokens.clone());
    let analysis = minic_analyzer::analyze(&parsed.program);
    AnalysisResult {
        tokens: lexed.tokens,
        lexical_errors: lexed.errors,
        symbol_table: analysis.symbol_table,
        syntax_errors: parsed.errors,
        semantic_errors: analysis.errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stages_run_past_earlier_errors() {
        let result = analyze("int $a = 1\nb = a;\nint a;");
        assert_eq!(result.lexical_errors.len(), 1);
        assert_eq!(result.syntax_errors.len(), 1);
        assert_eq!(result.semantic_errors.len(), 2);
        assert_eq!(result.diagnostic_count(), 4);
        assert!(result.has_errors());
    }

    #[test]
    fn test_empty_source() {
        let result = analyze("");
        assert_eq!(result, AnalysisResult::default());
        assert!(!result.has_errors());
    }
}
