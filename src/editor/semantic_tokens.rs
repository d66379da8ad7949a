//! LSP semantic tokens from a classified token stream.

use lsp_types::{SemanticToken, SemanticTokenType, SemanticTokensLegend};

use crate::lexer::{Token, TokenCategory};

/// Legend order; a token's `token_type` is its index here.
const TOKEN_TYPES: [SemanticTokenType; 9] = [
    SemanticTokenType::COMMENT,
    SemanticTokenType::STRING,
    SemanticTokenType::NUMBER,
    SemanticTokenType::KEYWORD,
    SemanticTokenType::TYPE,
    SemanticTokenType::FUNCTION,
    SemanticTokenType::ENUM_MEMBER,
    SemanticTokenType::VARIABLE,
    SemanticTokenType::OPERATOR,
];

pub fn legend() -> SemanticTokensLegend {
    SemanticTokensLegend {
        token_types: TOKEN_TYPES.to_vec(),
        token_modifiers: Vec::new(),
    }
}

fn token_type(category: TokenCategory) -> Option<u32> {
    let index = match category {
        TokenCategory::Comment => 0,
        TokenCategory::String => 1,
        TokenCategory::Number => 2,
        TokenCategory::Keyword => 3,
        TokenCategory::Type => 4,
        TokenCategory::Function => 5,
        TokenCategory::Atom => 6,
        TokenCategory::Variable => 7,
        TokenCategory::Operator => 8,
        TokenCategory::None => return None,
    };
    Some(index)
}

/// Delta-encodes absolute token positions.
struct SemanticTokensBuilder {
    tokens: Vec<SemanticToken>,
    prev_line: u32,
    prev_start: u32,
}

impl SemanticTokensBuilder {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            prev_line: 0,
            prev_start: 0,
        }
    }

    /// Add a token with absolute position; tokens must arrive in document order.
    fn push(&mut self, line: u32, start: u32, length: u32, token_type: u32) {
        let delta_line = line.saturating_sub(self.prev_line);
        let delta_start = if delta_line == 0 {
            start.saturating_sub(self.prev_start)
        } else {
            start
        };

        self.tokens.push(SemanticToken {
            delta_line,
            delta_start,
            length,
            token_type,
            token_modifiers_bitset: 0,
        });

        self.prev_line = line;
        self.prev_start = start;
    }

    fn build(self) -> Vec<SemanticToken> {
        self.tokens
    }
}

fn utf16_len(s: &str) -> u32 {
    s.encode_utf16().count() as u32
}

/// Semantic tokens for `tokens` over `text`. Columns and lengths are UTF-16 units;
/// a token spanning several lines is split per line and `none` tokens are skipped.
pub fn semantic_tokens(text: &str, tokens: &[Token]) -> Vec<SemanticToken> {
    let mut builder = SemanticTokensBuilder::new();
    let mut line = 0u32;
    let mut line_start = 0usize;
    let mut scanned = 0usize;

    for token in tokens {
        let Some(kind) = token_type(token.category) else {
            continue;
        };

        for (i, _) in text[scanned..token.start].match_indices('\n') {
            line += 1;
            line_start = scanned + i + 1;
        }

        let mut segment_start = token.start;
        for part in token.text(text).split('\n') {
            if !part.is_empty() {
                let column = utf16_len(&text[line_start..segment_start]);
                builder.push(line, column, utf16_len(part), kind);
            }
            segment_start += part.len() + 1;
            if segment_start <= token.end {
                line += 1;
                line_start = segment_start;
            }
        }
        scanned = token.end;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::{tokenize, WplClassifier};

    #[test]
    fn test_delta_encoding() {
        let text = "rule a\n  (ip:x)";
        let tokens = tokenize(&WplClassifier::default(), text);
        let encoded = semantic_tokens(text, &tokens);

        // rule, a, (, ip, :, x, )
        assert_eq!(encoded.len(), 7);
        assert_eq!((encoded[0].delta_line, encoded[0].delta_start, encoded[0].length), (0, 0, 4));
        assert_eq!(encoded[0].token_type, 3);
        assert_eq!((encoded[1].delta_line, encoded[1].delta_start), (0, 5));
        assert_eq!((encoded[2].delta_line, encoded[2].delta_start), (1, 2));
        assert_eq!((encoded[3].delta_start, encoded[3].length, encoded[3].token_type), (1, 2, 4));
    }

    #[test]
    fn test_multiline_token_is_split() {
        let text = "ab\ncd x";
        let tokens = vec![
            Token::new(0, 5, TokenCategory::Comment),
            Token::new(5, 6, TokenCategory::None),
            Token::new(6, 7, TokenCategory::Variable),
        ];
        let encoded = semantic_tokens(text, &tokens);
        assert_eq!(encoded.len(), 3);
        assert_eq!((encoded[1].delta_line, encoded[1].delta_start, encoded[1].length), (1, 0, 2));
        assert_eq!((encoded[2].delta_line, encoded[2].delta_start, encoded[2].token_type), (0, 3, 7));
    }

    #[test]
    fn test_lines_counted_across_unstyled_tokens() {
        let text = "a\n\n  b\nc";
        let tokens = vec![
            Token::new(0, 1, TokenCategory::Variable),
            Token::new(1, 5, TokenCategory::None),
            Token::new(5, 6, TokenCategory::Variable),
            Token::new(6, 7, TokenCategory::None),
            Token::new(7, 8, TokenCategory::Keyword),
        ];
        let encoded = semantic_tokens(text, &tokens);
        let positions: Vec<_> = encoded.iter().map(|t| (t.delta_line, t.delta_start)).collect();
        assert_eq!(positions, vec![(0, 0), (2, 2), (1, 0)]);
    }

    #[test]
    fn test_utf16_columns() {
        let text = "\"说明\" x";
        let tokens = vec![
            Token::new(0, 8, TokenCategory::String),
            Token::new(8, 9, TokenCategory::None),
            Token::new(9, 10, TokenCategory::Variable),
        ];
        let encoded = semantic_tokens(text, &tokens);
        assert_eq!(encoded[0].length, 4);
        assert_eq!(encoded[1].delta_start, 5);
    }

    #[test]
    fn test_legend_matches_indices() {
        let legend = legend();
        assert_eq!(legend.token_types[token_type(TokenCategory::Function).unwrap() as usize], SemanticTokenType::FUNCTION);
        assert_eq!(token_type(TokenCategory::None), None);
    }
}
