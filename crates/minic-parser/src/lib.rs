pub mod parser;

pub use parser::{Parsed, Parser, MAX_NESTING};

use minic_syntax::token::Token;

/// Parse a token stream in one call.
pub fn parse(tokens: Vec<Token>) -> Parsed {
    Parser::new(tokens).parse_program()
}
