//! Recursive-descent parser over [`Token`]s.
//!
//! Grammar, applied in two passes:
//!
//! ```text
//! query     := (field_term | other)*          -- field terms are pulled out first
//! remainder := branch ("OR" branch)*
//! branch    := (phrase | negated | word | "AND")*
//! ```
//!
//! Field terms are consumed before the remainder is split on connectors, so a
//! quoted field value containing `OR` never starts a new branch.

use crate::fields::canonical_field;
use crate::lexer::{tokenize, Connector, Token};

/// A `field:value` constraint, with the field already canonicalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTerm {
    pub field: String,
    pub value: String,
    pub negated: bool,
}

impl FieldTerm {
    /// Values containing whitespace are matched as phrases.
    pub fn is_phrase(&self) -> bool {
        self.value.chars().any(char::is_whitespace)
    }
}

/// A positive free-text term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    Word(String),
    Phrase(String),
}

/// One `OR`-separated alternative.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Branch {
    pub positive: Vec<Term>,
    pub negative: Vec<String>,
}

impl Branch {
    fn is_empty(&self) -> bool {
        self.positive.is_empty() && self.negative.is_empty()
    }
}

/// Free text left once field terms are removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Remainder {
    Empty,
    /// Operator-free text, matched as one flexible clause.
    Flexible(String),
    Branches(Vec<Branch>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    pub fields: Vec<FieldTerm>,
    pub remainder: Remainder,
}

fn is_connector_word(word: &str) -> bool {
    word.eq_ignore_ascii_case("and") || word.eq_ignore_ascii_case("or")
}

/// Whether a token sequence needs the structured form.
///
/// Connectors only count between two other tokens; a leading or trailing
/// `OR` is just a word.
pub fn has_operators(tokens: &[Token]) -> bool {
    let last = tokens.len().saturating_sub(1);
    tokens.iter().enumerate().any(|(i, token)| {
        let interior = i > 0 && i < last;
        match token {
            Token::Word(w) => interior && is_connector_word(w),
            Token::Connector(_) => interior,
            Token::Phrase(_) | Token::Negated(_) | Token::FieldValue { .. } => true,
        }
    })
}

/// Parse a raw query string.
pub fn parse(raw: &str) -> ParsedQuery {
    Parser::new(tokenize(raw)).parse()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn parse(self) -> ParsedQuery {
        let (fields, rest): (Vec<Token>, Vec<Token>) = self
            .tokens
            .into_iter()
            .partition(|t| matches!(t, Token::FieldValue { .. }));

        let fields = fields
            .into_iter()
            .filter_map(|t| match t {
                Token::FieldValue {
                    field,
                    value,
                    negated,
                } => Some(FieldTerm {
                    field: canonical_field(&field),
                    value,
                    negated,
                }),
                _ => None,
            })
            .collect();

        let remainder = if rest.is_empty() {
            Remainder::Empty
        } else if !has_operators(&rest) {
            Remainder::Flexible(join_words(&rest))
        } else {
            Remainder::Branches(Parser::new(rest).branches())
        };

        ParsedQuery { fields, remainder }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    /// remainder := branch ("OR" branch)*
    fn branches(&mut self) -> Vec<Branch> {
        let mut branches = Vec::new();
        loop {
            let branch = self.branch();
            if !branch.is_empty() {
                branches.push(branch);
            }
            match self.advance() {
                Some(Token::Connector(Connector::Or)) => continue,
                _ => break,
            }
        }
        branches
    }

    /// branch := (phrase | negated | word | "AND")*
    fn branch(&mut self) -> Branch {
        let mut branch = Branch::default();
        while let Some(token) = self.peek() {
            match token {
                Token::Connector(Connector::Or) => break,
                Token::Connector(Connector::And) => {}
                Token::Phrase(p) => branch.positive.push(Term::Phrase(p.clone())),
                Token::Word(w) => branch.positive.push(Term::Word(w.clone())),
                Token::Negated(n) => branch.negative.push(n.clone()),
                // Already pulled out by the first pass.
                Token::FieldValue { .. } => {}
            }
            self.pos += 1;
        }
        branch
    }
}

fn join_words(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter_map(|t| match t {
            Token::Word(w) => Some(w.as_str()),
            Token::Connector(c) => Some(c.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(ws: &[&str]) -> Vec<Term> {
        ws.iter().map(|w| Term::Word(w.to_string())).collect()
    }

    #[test]
    fn test_plain_text_is_flexible() {
        let parsed = parse("bail commercial");
        assert!(parsed.fields.is_empty());
        assert_eq!(parsed.remainder, Remainder::Flexible("bail commercial".into()));
    }

    #[test]
    fn test_empty_query() {
        let parsed = parse("   ");
        assert!(parsed.fields.is_empty());
        assert_eq!(parsed.remainder, Remainder::Empty);
    }

    #[test]
    fn test_field_then_flexible_remainder() {
        let parsed = parse(r#"avocat:"Jean Dupont" contrat"#);
        assert_eq!(
            parsed.fields,
            vec![FieldTerm {
                field: "avocat".into(),
                value: "Jean Dupont".into(),
                negated: false,
            }]
        );
        assert!(parsed.fields[0].is_phrase());
        assert_eq!(parsed.remainder, Remainder::Flexible("contrat".into()));
    }

    #[test]
    fn test_field_alias_is_canonicalized() {
        let parsed = parse("titre:bail");
        assert_eq!(parsed.fields[0].field, "nom");
        assert!(!parsed.fields[0].is_phrase());
        assert_eq!(parsed.remainder, Remainder::Empty);
    }

    #[test]
    fn test_repeated_fields_are_all_kept() {
        let parsed = parse("tag:bail tag:commercial");
        assert_eq!(parsed.fields.len(), 2);
        assert!(parsed.fields.iter().all(|f| f.field == "mots_cles"));
    }

    #[test]
    fn test_or_inside_field_value_does_not_split() {
        let parsed = parse(r#"nom:"vente OR achat" bail"#);
        assert_eq!(parsed.fields[0].value, "vente OR achat");
        assert_eq!(parsed.remainder, Remainder::Flexible("bail".into()));
    }

    #[test]
    fn test_phrase_and_exclusion_single_branch() {
        let parsed = parse(r#""force majeure" -résilié"#);
        assert_eq!(
            parsed.remainder,
            Remainder::Branches(vec![Branch {
                positive: vec![Term::Phrase("force majeure".into())],
                negative: vec!["résilié".into()],
            }])
        );
    }

    #[test]
    fn test_or_splits_into_branches() {
        let parsed = parse("bail commercial OR cession -fonds");
        assert_eq!(
            parsed.remainder,
            Remainder::Branches(vec![
                Branch {
                    positive: words(&["bail", "commercial"]),
                    negative: vec![],
                },
                Branch {
                    positive: words(&["cession"]),
                    negative: vec!["fonds".into()],
                },
            ])
        );
    }

    #[test]
    fn test_and_connector_is_discarded() {
        let parsed = parse("bail AND vente");
        assert_eq!(
            parsed.remainder,
            Remainder::Branches(vec![Branch {
                positive: words(&["bail", "vente"]),
                negative: vec![],
            }])
        );
    }

    #[test]
    fn test_lowercase_connector_is_a_positive_word() {
        let parsed = parse("bail or vente");
        assert_eq!(
            parsed.remainder,
            Remainder::Branches(vec![Branch {
                positive: words(&["bail", "or", "vente"]),
                negative: vec![],
            }])
        );
    }

    #[test]
    fn test_empty_branches_are_dropped() {
        let parsed = parse("bail OR OR vente");
        match parsed.remainder {
            Remainder::Branches(branches) => assert_eq!(branches.len(), 2),
            other => panic!("expected branches, got {:?}", other),
        }
    }

    #[test]
    fn test_has_operators_ignores_edge_connectors() {
        assert!(!has_operators(&tokenize("OR bail")));
        assert!(!has_operators(&tokenize("bail and")));
        assert!(has_operators(&tokenize("bail and vente")));
        assert!(has_operators(&tokenize("bail OR vente")));
        assert!(!has_operators(&tokenize("Jean-Pierre")));
        assert!(has_operators(&tokenize("-Jean")));
    }

    #[test]
    fn test_edge_connector_stays_in_flexible_text() {
        let parsed = parse("OR bail");
        assert_eq!(parsed.remainder, Remainder::Flexible("OR bail".into()));
    }

    #[test]
    fn test_negated_field() {
        let parsed = parse("-categ:Factures bail");
        assert_eq!(
            parsed.fields,
            vec![FieldTerm {
                field: "categorie".into(),
                value: "Factures".into(),
                negated: true,
            }]
        );
        assert_eq!(parsed.remainder, Remainder::Flexible("bail".into()));
    }
}
