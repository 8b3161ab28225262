//! minic lexer: converts source text into tokens.
//!
//! Scanning never aborts. A character that cannot start a token is reported
//! as a [`LexicalError`], skipped on its own, and scanning resumes with the
//! next character.
use minic_syntax::error::LexicalError;
use minic_syntax::token::{Token, TokenKind};

/// Output of a full scan: every token recognized plus every rejected character.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lexed {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexicalError>,
}

/// Tokenize `source` in one call.
pub fn tokenize(source: &str) -> Lexed {
    Lexer::new(source).tokenize()
}

/// Streaming character scanner that produces tokens with positions.
pub struct Lexer {
    src: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
    errors: Vec<LexicalError>,
}

impl Lexer {
    /// Create a new lexer over the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            src: input.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
            errors: Vec::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }
    fn peek_next(&self) -> Option<char> {
        self.src.get(self.pos + 1).copied()
    }
    fn advance(&mut self) -> Option<char> {
        let ch = self.src.get(self.pos).copied();
        if let Some(c) = ch {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        ch
    }

    fn error(&mut self, line: usize, col: usize, msg: impl Into<String>) {
        self.errors.push(LexicalError::new(line, col, msg));
    }

    /// Skips whitespace, `// line` comments and `/* block */` comments.
    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else if c == '/' && self.peek_next() == Some('/') {
                while let Some(c2) = self.peek() {
                    if c2 == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else if c == '/' && self.peek_next() == Some('*') {
                self.skip_block_comment();
            } else {
                break;
            }
        }
    }

    fn skip_block_comment(&mut self) {
        let start_line = self.line;
        let start_col = self.col;
        self.advance();
        self.advance();
        loop {
            match self.peek() {
                None => {
                    self.error(start_line, start_col, "unterminated block comment");
                    return;
                }
                Some('*') if self.peek_next() == Some('/') => {
                    self.advance();
                    self.advance();
                    return;
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    fn read_number(&mut self) -> Token {
        let start_line = self.line;
        let start_col = self.col;
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        Token::new(TokenKind::Number(s), start_line, start_col)
    }

    fn read_ident_or_keyword(&mut self) -> Token {
        let start_line = self.line;
        let start_col = self.col;
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        let kind = TokenKind::keyword(&s).unwrap_or(TokenKind::Ident(s));
        Token::new(kind, start_line, start_col)
    }

    /// Consumes one character (two for `==`) and returns its token, if the
    /// character is an operator or punctuation mark.
    fn read_symbol(&mut self, c: char) -> Option<TokenKind> {
        let kind = match c {
            '=' if self.peek_next() == Some('=') => {
                self.advance();
                TokenKind::EqEq
            }
            '=' => TokenKind::Equal,
            '<' => TokenKind::Less,
            '>' => TokenKind::Greater,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ';' => TokenKind::Semicolon,
            _ => return None,
        };
        self.advance();
        Some(kind)
    }

    /// Tokenize the entire input.
    pub fn tokenize(mut self) -> Lexed {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            let line = self.line;
            let col = self.col;
            let c = match self.peek() {
                None => break,
                Some(c) => c,
            };
            if c.is_ascii_digit() {
                tokens.push(self.read_number());
            } else if c.is_ascii_alphabetic() || c == '_' {
                tokens.push(self.read_ident_or_keyword());
            } else if let Some(kind) = self.read_symbol(c) {
                tokens.push(Token::new(kind, line, col));
            } else {
                self.advance();
                let msg = match self.peek() {
                    Some(n) if n.is_ascii_alphanumeric() || n == '_' => format!(
                        "invalid character '{}' (identifiers may only contain letters, digits and '_')",
                        c
                    ),
                    _ => format!("invalid character '{}'", c),
                };
                self.error(line, col, msg);
            }
        }
        Lexed {
            tokens,
            errors: self.errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minic_syntax::token::TokenType;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).tokens.into_iter().map(|t| t.kind).collect()
    }

    fn ident(s: &str) -> TokenKind {
        TokenKind::Ident(s.to_string())
    }

    fn num(s: &str) -> TokenKind {
        TokenKind::Number(s.to_string())
    }

    #[test]
    fn test_declaration_tokens() {
        assert_eq!(
            kinds("int x = 10;"),
            vec![TokenKind::Int, ident("x"), TokenKind::Equal, num("10"), TokenKind::Semicolon]
        );
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("if while int iffy integer _tmp x_1"),
            vec![
                TokenKind::If,
                TokenKind::While,
                TokenKind::Int,
                ident("iffy"),
                ident("integer"),
                ident("_tmp"),
                ident("x_1"),
            ]
        );
    }

    #[test]
    fn test_operators_match_greedily() {
        assert_eq!(
            kinds("a == b = c < d > e"),
            vec![
                ident("a"),
                TokenKind::EqEq,
                ident("b"),
                TokenKind::Equal,
                ident("c"),
                TokenKind::Less,
                ident("d"),
                TokenKind::Greater,
                ident("e"),
            ]
        );
        assert_eq!(kinds("==="), vec![TokenKind::EqEq, TokenKind::Equal]);
    }

    #[test]
    fn test_token_types() {
        let types: Vec<TokenType> = tokenize("while (x) { y = 1 + 2; }")
            .tokens
            .iter()
            .map(|t| t.token_type())
            .collect();
        assert_eq!(
            types,
            vec![
                TokenType::Keyword,
                TokenType::Punctuation,
                TokenType::Identifier,
                TokenType::Punctuation,
                TokenType::Punctuation,
                TokenType::Identifier,
                TokenType::Operator,
                TokenType::Number,
                TokenType::Operator,
                TokenType::Number,
                TokenType::Punctuation,
                TokenType::Punctuation,
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        let lexed = tokenize("// header\nint a = 5; // trailing\n/* multi\n line */ int b;");
        assert!(lexed.errors.is_empty());
        let lines: Vec<(String, usize)> = lexed
            .tokens
            .iter()
            .map(|t| (t.lexeme().to_string(), t.line))
            .collect();
        assert_eq!(lines[0], ("int".to_string(), 2));
        assert_eq!(lines[5], ("int".to_string(), 4));
        assert_eq!(lines[6], ("b".to_string(), 4));
    }

    #[test]
    fn test_slash_is_division_when_not_a_comment() {
        assert_eq!(kinds("a / b"), vec![ident("a"), TokenKind::Slash, ident("b")]);
    }

    #[test]
    fn test_unterminated_block_comment() {
        let lexed = tokenize("int a;\n/* never\nclosed");
        assert_eq!(lexed.tokens.len(), 3);
        assert_eq!(lexed.errors.len(), 1);
        assert_eq!(lexed.errors[0].line, 2);
        assert!(lexed.errors[0].message.contains("unterminated"));
    }

    #[test]
    fn test_invalid_character_in_identifier() {
        let lexed = tokenize("int $invalid = 20;");
        assert_eq!(lexed.errors.len(), 1);
        assert_eq!(lexed.errors[0].line, 1);
        assert_eq!(lexed.errors[0].col, 5);
        assert!(lexed.errors[0].message.contains("'$'"));
        assert_eq!(
            lexed.tokens.iter().map(|t| t.kind.clone()).collect::<Vec<_>>(),
            vec![TokenKind::Int, ident("invalid"), TokenKind::Equal, num("20"), TokenKind::Semicolon]
        );
    }

    #[test]
    fn test_each_invalid_character_reported_once() {
        let lexed = tokenize("a # b\n@@");
        assert_eq!(lexed.tokens.len(), 2);
        let lines: Vec<usize> = lexed.errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![1, 2, 2]);
    }

    #[test]
    fn test_lines_are_monotonic() {
        let lexed = tokenize("int x\n=\n\n 1\n;");
        let lines: Vec<usize> = lexed.tokens.iter().map(|t| t.line).collect();
        assert_eq!(lines, vec![1, 1, 2, 4, 5]);
    }

    #[test]
    fn test_lexemes_and_trivia_cover_the_source() {
        let src = "int a=1;// c\n/* d */ while(a<2){a=a*3;} $";
        let lexed = tokenize(src);
        let joined: String = lexed.tokens.iter().map(|t| t.lexeme()).collect();
        let stripped: String = src
            .replace("// c", "")
            .replace("/* d */", "")
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '$')
            .collect();
        assert_eq!(joined, stripped);
        assert_eq!(lexed.errors.len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let lexed = tokenize("");
        assert!(lexed.tokens.is_empty());
        assert!(lexed.errors.is_empty());
    }
}
