//! Lowering of parsed queries to [`Clause`] trees.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use dossier_core::ExactFilters;

use crate::expr::{BoolQuery, Clause, MultiMatch};
use crate::fields::{EXCLUSION_FIELDS, FLEXIBLE_FIELDS, STRUCTURED_FIELDS};
use crate::lexer::tokenize;
use crate::parser::{has_operators, parse, Branch, FieldTerm, Remainder, Term};

/// Which form the compiler chose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMode {
    MatchAll,
    Flexible,
    Structured,
}

/// A compiled search request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    /// The raw string, kept for in-process scoring.
    pub raw: String,
    pub mode: QueryMode,
    /// Free-text expression, without filters.
    pub expr: Clause,
    pub filters: ExactFilters,
}

impl CompiledQuery {
    /// The full clause: free-text expression conjoined with the exact filters.
    pub fn clause(&self) -> Clause {
        let filters = self
            .filters
            .terms()
            .into_iter()
            .map(|(field, value)| Clause::Term {
                field: field.to_string(),
                value: value.to_string(),
            })
            .collect();
        self.expr.clone().with_filters(filters)
    }

    /// Elasticsearch query DSL for the `query` member of a search body.
    pub fn to_json(&self) -> Value {
        self.clause().to_json()
    }
}

/// Whether `raw` uses any syntax beyond plain words.
pub fn has_advanced_operators(raw: &str) -> bool {
    has_operators(&tokenize(raw))
}

/// Compile a raw search string with no exact filters.
pub fn compile(raw: &str) -> CompiledQuery {
    compile_with_filters(raw, ExactFilters::default())
}

/// Compile a raw search string. Never fails: degenerate input yields match-all.
pub fn compile_with_filters(raw: &str, filters: ExactFilters) -> CompiledQuery {
    let trimmed = raw.trim();
    let tokens = tokenize(trimmed);
    let (mode, expr) = if tokens.is_empty() {
        (QueryMode::MatchAll, Clause::MatchAll)
    } else if !has_operators(&tokens) {
        (QueryMode::Flexible, flexible_clause(trimmed))
    } else {
        (QueryMode::Structured, structured_expression(trimmed))
    };

    debug!(query = trimmed, mode = ?mode, "Compiled search query");

    CompiledQuery {
        raw: raw.to_string(),
        mode,
        expr,
        filters,
    }
}

/// Weighted fuzzy match requiring every token.
fn flexible_clause(text: &str) -> Clause {
    Clause::MultiMatch(MultiMatch {
        query: text.to_string(),
        fields: FLEXIBLE_FIELDS.to_vec(),
        fuzzy: true,
        require_all: true,
        phrase: false,
    })
}

fn field_clause(term: &FieldTerm) -> Clause {
    if term.is_phrase() {
        Clause::MatchPhrase {
            field: term.field.clone(),
            phrase: term.value.clone(),
        }
    } else {
        Clause::Match {
            field: term.field.clone(),
            value: term.value.clone(),
        }
    }
}

fn positive_clause(term: &Term) -> Clause {
    let (query, phrase) = match term {
        Term::Phrase(p) => (p, true),
        Term::Word(w) => (w, false),
    };
    Clause::MultiMatch(MultiMatch {
        query: query.clone(),
        fields: STRUCTURED_FIELDS.to_vec(),
        fuzzy: !phrase,
        require_all: false,
        phrase,
    })
}

fn exclusion_clause(term: &str) -> Clause {
    Clause::MultiMatch(MultiMatch {
        query: term.to_string(),
        fields: EXCLUSION_FIELDS.to_vec(),
        fuzzy: false,
        require_all: false,
        phrase: false,
    })
}

fn structured_expression(text: &str) -> Clause {
    let parsed = parse(text);
    let mut query = BoolQuery::default();

    for term in &parsed.fields {
        let clause = field_clause(term);
        if term.negated {
            query.must_not.push(clause);
        } else {
            query.must.push(clause);
        }
    }

    match parsed.remainder {
        Remainder::Empty => {}
        Remainder::Flexible(rest) => query.must.push(flexible_clause(&rest)),
        Remainder::Branches(branches) => lower_branches(&branches, &mut query),
    }

    if query.is_unconstrained() {
        return Clause::MatchAll;
    }
    Clause::Bool(query)
}

/// One branch lands directly in `must`; several become alternatives in
/// `should`, at least one of which has to match. Exclusions are global.
fn lower_branches(branches: &[Branch], query: &mut BoolQuery) {
    for branch in branches {
        query
            .must_not
            .extend(branch.negative.iter().map(|n| exclusion_clause(n)));
    }

    let alternatives: Vec<Vec<Clause>> = branches
        .iter()
        .filter(|b| !b.positive.is_empty())
        .map(|b| b.positive.iter().map(positive_clause).collect())
        .collect();

    match alternatives.len() {
        0 => {}
        1 => query.must.extend(alternatives.into_iter().flatten()),
        _ => {
            query.should = alternatives
                .into_iter()
                .map(|must| {
                    Clause::Bool(BoolQuery {
                        must,
                        ..Default::default()
                    })
                })
                .collect();
            query.minimum_should_match = Some(1);
        }
    }
}
