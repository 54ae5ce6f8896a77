//! Splits a pipeline expression into tokens.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or literal.
    Word,
    LParen,
    RParen,
    Pipe,
    Comma,
    Bang,
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Byte offset in the source expression.
    pub pos: usize,
}

impl Token<'_> {
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => "end of input".to_string(),
            _ => format!("'{}'", self.text),
        }
    }
}

fn punctuation(ch: char) -> Option<TokenKind> {
    match ch {
        '(' => Some(TokenKind::LParen),
        ')' => Some(TokenKind::RParen),
        '|' => Some(TokenKind::Pipe),
        ',' => Some(TokenKind::Comma),
        '!' => Some(TokenKind::Bang),
        _ => None,
    }
}

/// Tokenizes `input`. Whitespace only separates; every other run of
/// non-punctuation characters is one `Word`. The result always ends with an
/// `Eof` token.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut word_start: Option<usize> = None;

    for (pos, ch) in input.char_indices() {
        let kind = punctuation(ch);
        if kind.is_none() && !ch.is_whitespace() {
            word_start.get_or_insert(pos);
            continue;
        }
        if let Some(start) = word_start.take() {
            tokens.push(Token {
                kind: TokenKind::Word,
                text: &input[start..pos],
                pos: start,
            });
        }
        if let Some(kind) = kind {
            tokens.push(Token {
                kind,
                text: &input[pos..pos + ch.len_utf8()],
                pos,
            });
        }
    }
    if let Some(start) = word_start {
        tokens.push(Token {
            kind: TokenKind::Word,
            text: &input[start..],
            pos: start,
        });
    }
    tokens.push(Token {
        kind: TokenKind::Eof,
        text: "",
        pos: input.len(),
    });
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(input: &str) -> Vec<&str> {
        tokenize(input).iter().map(|t| t.text).collect()
    }

    #[test]
    fn empty_input_is_just_eof() {
        let tokens = tokenize("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Eof);
        assert_eq!(tokenize("  \t ").len(), 1);
    }

    #[test]
    fn punctuation_is_split_out() {
        assert_eq!(
            texts("from(Reward2)|split(,)"),
            vec!["from", "(", "Reward2", ")", "|", "split", "(", ",", ")", ""]
        );
        assert_eq!(texts("filter(!zero)"), vec!["filter", "(", "!", "zero", ")", ""]);
    }

    #[test]
    fn whitespace_separates_words() {
        assert_eq!(
            texts("group(Mode, dict(ID))"),
            vec!["group", "(", "Mode", ",", "dict", "(", "ID", ")", ")", ""]
        );
        assert_eq!(texts("a b"), vec!["a", "b", ""]);
    }

    #[test]
    fn positions_are_byte_offsets() {
        let tokens = tokenize("split(:, int32)");
        assert_eq!(tokens[2].text, ":");
        assert_eq!(tokens[2].pos, 6);
        assert_eq!(tokens[4].text, "int32");
        assert_eq!(tokens[4].pos, 9);
        assert_eq!(tokens.last().map(|t| t.pos), Some(15));
    }

    #[test]
    fn non_ascii_words() {
        assert_eq!(texts("split(：)"), vec!["split", "(", "：", ")", ""]);
    }
}
