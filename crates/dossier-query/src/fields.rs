//! Field aliases and boost tables.

use dossier_core::field;

/// A searchable field with an optional boost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeightedField {
    pub name: &'static str,
    pub boost: Option<u32>,
}

impl WeightedField {
    pub const fn boosted(name: &'static str, boost: u32) -> Self {
        Self {
            name,
            boost: Some(boost),
        }
    }

    pub const fn plain(name: &'static str) -> Self {
        Self { name, boost: None }
    }

    /// Engine notation: `nom^4`, or the bare name when unboosted.
    pub fn to_engine_notation(&self) -> String {
        match self.boost {
            Some(boost) => format!("{}^{}", self.name, boost),
            None => self.name.to_string(),
        }
    }
}

/// Boosts for the flexible clause.
pub const FLEXIBLE_FIELDS: &[WeightedField] = &[
    WeightedField::boosted(field::NAME, 4),
    WeightedField::boosted(field::CONTENT, 2),
    WeightedField::boosted(field::KEYWORDS, 3),
    WeightedField::boosted(field::SPECIALTY, 2),
    WeightedField::boosted(field::PERSON, 2),
    WeightedField::boosted(field::CATEGORY, 2),
];

/// Boosts for positive words and phrases of a structured expression.
pub const STRUCTURED_FIELDS: &[WeightedField] = &[
    WeightedField::boosted(field::NAME, 3),
    WeightedField::boosted(field::CONTENT, 2),
    WeightedField::boosted(field::KEYWORDS, 2),
    WeightedField::plain(field::SPECIALTY),
    WeightedField::plain(field::PERSON),
    WeightedField::plain(field::CATEGORY),
];

/// Exclusions match every field without boosts.
pub const EXCLUSION_FIELDS: &[WeightedField] = &[
    WeightedField::plain(field::NAME),
    WeightedField::plain(field::CONTENT),
    WeightedField::plain(field::KEYWORDS),
    WeightedField::plain(field::SPECIALTY),
    WeightedField::plain(field::PERSON),
    WeightedField::plain(field::CATEGORY),
];

/// Map a user-typed field name to its index field. Unknown names pass through
/// lower-cased.
pub fn canonical_field(name: &str) -> String {
    let lowered = name.to_lowercase();
    let canonical = match lowered.as_str() {
        "titre" | "nom" => field::NAME,
        "contenu" | "texte" => field::CONTENT,
        "avocat" => field::PERSON,
        "specialite" => field::SPECIALTY,
        "categorie" | "categ" => field::CATEGORY,
        "motcle" | "tag" => field::KEYWORDS,
        _ => return lowered,
    };
    canonical.to_string()
}
