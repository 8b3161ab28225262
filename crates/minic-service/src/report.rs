//! JSON wire format of the analysis endpoint.
//!
//! Diagnostics are flattened to their `Line <n>: <message>` text. Lexical
//! errors are listed first under `syntaxErrors`, so clients that only render
//! the syntax and semantic lists still see them, and again on their own under
//! `lexicalErrors`.

use serde::{Deserialize, Serialize};

use minic_syntax::token::TokenType;

use crate::AnalysisResult;

/// Body of `POST /api/analyze`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRow {
    pub line: usize,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRow {
    pub line: usize,
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub scope: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub total_tokens: usize,
    pub tokens: Vec<TokenRow>,
    pub symbol_table: Vec<SymbolRow>,
    pub syntax_errors: Vec<String>,
    pub semantic_errors: Vec<String>,
    pub lexical_errors: Vec<String>,
}

impl AnalysisResult {
    pub fn to_response(&self) -> AnalyzeResponse {
        let lexical_errors: Vec<String> = self
            .lexical_errors
            .iter()
            .map(|e| format!("Line {}: lexical error: {}", e.line, e.message))
            .collect();
        let syntax_errors = lexical_errors
            .iter()
            .cloned()
            .chain(self.syntax_errors.iter().map(ToString::to_string))
            .collect();
        AnalyzeResponse {
            total_tokens: self.tokens.len(),
            tokens: self
                .tokens
                .iter()
                .map(|t| TokenRow {
                    line: t.line,
                    token_type: t.token_type(),
                    value: t.lexeme().to_string(),
                })
                .collect(),
            symbol_table: self
                .symbol_table
                .iter()
                .map(|s| SymbolRow {
                    line: s.line,
                    name: s.name.clone(),
                    ty: s.ty.name().to_string(),
                    scope: s.scope,
                })
                .collect(),
            syntax_errors,
            semantic_errors: self.semantic_errors.iter().map(ToString::to_string).collect(),
            lexical_errors,
        }
    }
}
