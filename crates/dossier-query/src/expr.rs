//! Backend-agnostic boolean query tree and its Elasticsearch rendering.

use serde_json::{json, Map, Value};

use crate::fields::WeightedField;

/// A weighted multi-field match.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiMatch {
    pub query: String,
    pub fields: Vec<WeightedField>,
    /// Automatic edit-distance fuzziness.
    pub fuzzy: bool,
    /// Every token must match (operator AND).
    pub require_all: bool,
    /// Match the query as a phrase.
    pub phrase: bool,
}

/// Leaf clauses and boolean composition.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    MultiMatch(MultiMatch),
    /// Analyzed match on one field.
    Match { field: String, value: String },
    /// Phrase match on one field.
    MatchPhrase { field: String, phrase: String },
    /// Exact keyword equality, used for filters.
    Term { field: String, value: String },
    MatchAll,
    Bool(BoolQuery),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolQuery {
    pub must: Vec<Clause>,
    pub should: Vec<Clause>,
    pub must_not: Vec<Clause>,
    pub filter: Vec<Clause>,
    pub minimum_should_match: Option<u32>,
}

impl BoolQuery {
    /// True when no scoring group holds a clause.
    pub fn is_unconstrained(&self) -> bool {
        self.must.is_empty() && self.should.is_empty() && self.must_not.is_empty()
    }
}

impl Clause {
    /// Render as Elasticsearch query DSL.
    pub fn to_json(&self) -> Value {
        match self {
            Clause::MultiMatch(mm) => {
                let mut body = Map::new();
                body.insert("query".into(), json!(mm.query));
                body.insert(
                    "fields".into(),
                    json!(mm
                        .fields
                        .iter()
                        .map(WeightedField::to_engine_notation)
                        .collect::<Vec<_>>()),
                );
                if mm.phrase {
                    body.insert("type".into(), json!("phrase"));
                }
                if mm.fuzzy {
                    body.insert("fuzziness".into(), json!("AUTO"));
                }
                if mm.require_all {
                    body.insert("operator".into(), json!("and"));
                }
                json!({ "multi_match": body })
            }
            Clause::Match { field, value } => json!({ "match": { field: value } }),
            Clause::MatchPhrase { field, phrase } => json!({ "match_phrase": { field: phrase } }),
            Clause::Term { field, value } => json!({ "term": { field: value } }),
            Clause::MatchAll => json!({ "match_all": {} }),
            Clause::Bool(b) => {
                let mut body = Map::new();
                for (key, group) in [
                    ("must", &b.must),
                    ("should", &b.should),
                    ("must_not", &b.must_not),
                    ("filter", &b.filter),
                ] {
                    if !group.is_empty() {
                        body.insert(
                            key.into(),
                            Value::Array(group.iter().map(Clause::to_json).collect()),
                        );
                    }
                }
                if let Some(min) = b.minimum_should_match {
                    body.insert("minimum_should_match".into(), json!(min));
                }
                json!({ "bool": body })
            }
        }
    }

    /// Attach filter clauses, wrapping non-boolean clauses in a bool.
    pub fn with_filters(self, filters: Vec<Clause>) -> Clause {
        if filters.is_empty() {
            return self;
        }
        match self {
            Clause::Bool(mut b) => {
                b.filter.extend(filters);
                Clause::Bool(b)
            }
            other => Clause::Bool(BoolQuery {
                must: vec![other],
                filter: filters,
                ..Default::default()
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FLEXIBLE_FIELDS;

    #[test]
    fn test_multi_match_json() {
        let clause = Clause::MultiMatch(MultiMatch {
            query: "bail".into(),
            fields: FLEXIBLE_FIELDS.to_vec(),
            fuzzy: true,
            require_all: true,
            phrase: false,
        });
        let json = clause.to_json();
        assert_eq!(json["multi_match"]["query"], "bail");
        assert_eq!(json["multi_match"]["fuzziness"], "AUTO");
        assert_eq!(json["multi_match"]["operator"], "and");
        assert_eq!(json["multi_match"]["fields"][0], "nom^4");
        assert!(json["multi_match"].get("type").is_none());
    }

    #[test]
    fn test_bool_omits_empty_groups() {
        let clause = Clause::Bool(BoolQuery {
            must: vec![Clause::MatchAll],
            ..Default::default()
        });
        assert_eq!(clause.to_json(), json!({"bool": {"must": [{"match_all": {}}]}}));
    }

    #[test]
    fn test_with_filters_wraps_leaf() {
        let clause = Clause::MatchAll.with_filters(vec![Clause::Term {
            field: "avocat".into(),
            value: "Maître Dupont".into(),
        }]);
        assert_eq!(
            clause.to_json(),
            json!({"bool": {
                "must": [{"match_all": {}}],
                "filter": [{"term": {"avocat": "Maître Dupont"}}]
            }})
        );
    }

    #[test]
    fn test_with_filters_extends_bool() {
        let clause = Clause::Bool(BoolQuery {
            must_not: vec![Clause::Match {
                field: "nom".into(),
                value: "brouillon".into(),
            }],
            ..Default::default()
        })
        .with_filters(vec![Clause::Term {
            field: "categorie".into(),
            value: "Contrats".into(),
        }]);
        match clause {
            Clause::Bool(b) => {
                assert_eq!(b.filter.len(), 1);
                assert_eq!(b.must_not.len(), 1);
                assert!(b.must.is_empty());
            }
            other => panic!("expected bool, got {:?}", other),
        }
    }

    #[test]
    fn test_with_no_filters_is_identity() {
        assert_eq!(Clause::MatchAll.with_filters(vec![]), Clause::MatchAll);
    }
}
