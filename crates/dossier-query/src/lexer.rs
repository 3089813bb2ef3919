//! Tokenizer for the search box syntax.
//!
//! Recognized forms:
//! - `word`
//! - `"quoted phrase"`
//! - `-word` and `-"quoted phrase"` (exclusions)
//! - `field:value` and `field:"quoted value"`, optionally prefixed with `-`
//! - the uppercase connectors `AND` and `OR`
//!
//! Anything that does not fit degrades to a plain word. A quote without a
//! closing partner is an ordinary character.

use std::iter::Peekable;
use std::str::CharIndices;

/// Boolean connector between terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connector::And => "AND",
            Connector::Or => "OR",
        }
    }
}

/// A lexical unit of a raw query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Word(String),
    Phrase(String),
    /// `-word`, stored without the dash.
    Negated(String),
    FieldValue {
        field: String,
        value: String,
        negated: bool,
    },
    Connector(Connector),
}

fn is_field_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Split a raw query into tokens.
pub fn tokenize(raw: &str) -> Vec<Token> {
    Lexer::new(raw).collect()
}

struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(&(_, c)) = self.chars.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.chars.next();
        }
    }

    /// Byte offset of the closing quote for a quote opened at `open`.
    fn closing_quote(&self, open: usize) -> Option<usize> {
        self.input[open + 1..].find('"').map(|rel| open + 1 + rel)
    }

    /// Advance the iterator to just past byte offset `end`.
    fn advance_past(&mut self, end: usize) {
        while let Some(&(i, _)) = self.chars.peek() {
            if i > end {
                break;
            }
            self.chars.next();
        }
    }

    /// Consume a run of non-whitespace starting at `start`, returning it.
    fn bare_word(&mut self, start: usize) -> &'a str {
        let mut end = self.input.len();
        while let Some(&(i, c)) = self.chars.peek() {
            if c.is_whitespace() {
                end = i;
                break;
            }
            self.chars.next();
        }
        &self.input[start..end]
    }

    /// Try `field:value` or `field:"quoted value"` at `start` (after any dash).
    fn field_value(&mut self, start: usize) -> Option<(String, String)> {
        let rest = &self.input[start..];
        let colon = rest.find(':')?;
        let field = &rest[..colon];
        if field.is_empty() || !field.chars().all(is_field_char) {
            return None;
        }

        let value_start = start + colon + 1;
        let after = &self.input[value_start..];
        if after.starts_with('"') {
            if let Some(close) = self.closing_quote(value_start) {
                let value = &self.input[value_start + 1..close];
                if value.is_empty() {
                    return None;
                }
                self.advance_past(close);
                return Some((field.to_string(), value.to_string()));
            }
        }

        let value_len = after.find(char::is_whitespace).unwrap_or(after.len());
        if value_len == 0 {
            return None;
        }
        let value = &after[..value_len];
        self.advance_past(value_start + value_len - 1);
        Some((field.to_string(), value.to_string()))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.skip_whitespace();
        let &(start, first) = self.chars.peek()?;

        if first == '"' {
            if let Some(close) = self.closing_quote(start) {
                self.advance_past(close);
                let phrase = self.input[start + 1..close].trim();
                if phrase.is_empty() {
                    return self.next();
                }
                return Some(Token::Phrase(phrase.to_string()));
            }
            return Some(Token::Word(self.bare_word(start).to_string()));
        }

        let negated = first == '-';
        let field_start = if negated { start + 1 } else { start };

        if negated && self.input[field_start..].starts_with('"') {
            if let Some(close) = self.closing_quote(field_start) {
                self.advance_past(close);
                let phrase = self.input[field_start + 1..close].trim();
                if phrase.is_empty() {
                    return self.next();
                }
                return Some(Token::Negated(phrase.to_string()));
            }
        }

        if let Some((field, value)) = self.field_value(field_start) {
            return Some(Token::FieldValue {
                field,
                value,
                negated,
            });
        }

        let word = self.bare_word(start);
        match word {
            "AND" => Some(Token::Connector(Connector::And)),
            "OR" => Some(Token::Connector(Connector::Or)),
            w if negated && w.chars().count() > 1 => Some(Token::Negated(w[1..].to_string())),
            w => Some(Token::Word(w.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(s: &str) -> Token {
        Token::Word(s.to_string())
    }

    fn field(f: &str, v: &str) -> Token {
        Token::FieldValue {
            field: f.to_string(),
            value: v.to_string(),
            negated: false,
        }
    }

    #[test]
    fn test_plain_words() {
        assert_eq!(tokenize("  bail   commercial "), vec![word("bail"), word("commercial")]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_phrase() {
        assert_eq!(
            tokenize(r#""force majeure" clause"#),
            vec![Token::Phrase("force majeure".into()), word("clause")]
        );
    }

    #[test]
    fn test_unterminated_quote_is_a_word() {
        assert_eq!(tokenize(r#""force majeure"#), vec![word("\"force"), word("majeure")]);
    }

    #[test]
    fn test_empty_phrase_is_dropped() {
        assert_eq!(tokenize(r#""" bail"#), vec![word("bail")]);
    }

    #[test]
    fn test_negated_word() {
        assert_eq!(tokenize("-résilié"), vec![Token::Negated("résilié".into())]);
    }

    #[test]
    fn test_negated_phrase() {
        assert_eq!(
            tokenize(r#"bail -"clause pénale""#),
            vec![word("bail"), Token::Negated("clause pénale".into())]
        );
    }

    #[test]
    fn test_lone_dash_is_a_word() {
        assert_eq!(tokenize("a - b"), vec![word("a"), word("-"), word("b")]);
    }

    #[test]
    fn test_field_bareword() {
        assert_eq!(tokenize("avocat:Dupont"), vec![field("avocat", "Dupont")]);
    }

    #[test]
    fn test_field_quoted_value() {
        assert_eq!(
            tokenize(r#"avocat:"Jean Dupont" contrat"#),
            vec![field("avocat", "Jean Dupont"), word("contrat")]
        );
    }

    #[test]
    fn test_field_value_keeps_inner_colons() {
        assert_eq!(tokenize("ref:2024:17"), vec![field("ref", "2024:17")]);
    }

    #[test]
    fn test_field_with_unterminated_quote_takes_bareword() {
        assert_eq!(
            tokenize(r#"nom:"bail commercial"#),
            vec![field("nom", "\"bail"), word("commercial")]
        );
    }

    #[test]
    fn test_empty_field_value_is_a_word() {
        assert_eq!(tokenize("avocat: x"), vec![word("avocat:"), word("x")]);
        assert_eq!(tokenize(":x"), vec![word(":x")]);
    }

    #[test]
    fn test_negated_field() {
        assert_eq!(
            tokenize("-categorie:Factures"),
            vec![Token::FieldValue {
                field: "categorie".into(),
                value: "Factures".into(),
                negated: true,
            }]
        );
    }

    #[test]
    fn test_connectors_are_uppercase_only() {
        assert_eq!(
            tokenize("bail OR vente AND or"),
            vec![
                word("bail"),
                Token::Connector(Connector::Or),
                word("vente"),
                Token::Connector(Connector::And),
                word("or"),
            ]
        );
    }

    #[test]
    fn test_non_ascii_field_name() {
        assert_eq!(tokenize("spécialité:civil"), vec![field("spécialité", "civil")]);
    }
}
