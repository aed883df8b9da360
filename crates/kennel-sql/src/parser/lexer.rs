//! Tokenizer for statement headers.
//!
//! Only the part of a statement before the value tuples is tokenized. The
//! tuple section is scanned as raw text by [`super::statement`].

/// Kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A run of alphanumeric characters or underscores.
    Word,
    /// Text enclosed in single or double quotes.
    Quoted,
    /// Any other single non-whitespace character.
    Symbol,
}

/// A token with its byte span in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Token kind.
    pub kind: TokenKind,
    /// Source text covered by the token, quotes included.
    pub text: &'a str,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Token<'_> {
    /// Returns true if this is a word equal to `keyword`, ignoring ASCII case.
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.kind == TokenKind::Word && self.text.eq_ignore_ascii_case(keyword)
    }
}

/// Returns true for characters that may appear in a word.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Iterator over the tokens of a string.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer positioned at the start of `source`.
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn token(&mut self, kind: TokenKind, len: usize) -> Token<'a> {
        let start = self.pos;
        self.pos += len;
        Token {
            kind,
            text: &self.source[start..self.pos],
            start,
            end: self.pos,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let skipped = self.rest().len() - self.rest().trim_start().len();
        self.pos += skipped;

        let rest = self.rest();
        let first = rest.chars().next()?;

        if is_word_char(first) {
            let len = rest.find(|c: char| !is_word_char(c)).unwrap_or(rest.len());
            return Some(self.token(TokenKind::Word, len));
        }

        if first == '\'' || first == '"' {
            // An unterminated quote runs to the end of input.
            let body = &rest[1..];
            let len = body.find(first).map_or(rest.len(), |close| close + 2);
            return Some(self.token(TokenKind::Quoted, len));
        }

        Some(self.token(TokenKind::Symbol, first.len_utf8()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<(TokenKind, &str)> {
        Lexer::new(source).map(|t| (t.kind, t.text)).collect()
    }

    #[test]
    fn test_words_and_symbols() {
        assert_eq!(
            kinds("INSERT INTO dogs (a, b)"),
            vec![
                (TokenKind::Word, "INSERT"),
                (TokenKind::Word, "INTO"),
                (TokenKind::Word, "dogs"),
                (TokenKind::Symbol, "("),
                (TokenKind::Word, "a"),
                (TokenKind::Symbol, ","),
                (TokenKind::Word, "b"),
                (TokenKind::Symbol, ")"),
            ]
        );
    }

    #[test]
    fn test_unicode_identifier() {
        assert_eq!(kinds("dueños"), vec![(TokenKind::Word, "dueños")]);
    }

    #[test]
    fn test_quoted() {
        assert_eq!(
            kinds("'VALUES' \"x y\" 'open"),
            vec![
                (TokenKind::Quoted, "'VALUES'"),
                (TokenKind::Quoted, "\"x y\""),
                (TokenKind::Quoted, "'open"),
            ]
        );
    }

    #[test]
    fn test_spans() {
        let tokens: Vec<Token<'_>> = Lexer::new("  INTO\n  dogs").collect();
        assert_eq!((tokens[0].start, tokens[0].end), (2, 6));
        assert_eq!((tokens[1].start, tokens[1].end), (9, 13));
    }

    #[test]
    fn test_is_keyword() {
        let token = Lexer::new("values").next().unwrap();
        assert!(token.is_keyword("VALUES"));
        assert!(!token.is_keyword("VALUE"));
    }

    #[test]
    fn test_empty_input() {
        assert!(Lexer::new("   \n\t").next().is_none());
    }
}
