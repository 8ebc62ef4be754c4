//! Search query grammar.
//!
//! A query is a list of space-separated clauses:
//!
//! | syntax      | meaning                                   |
//! |-------------|-------------------------------------------|
//! | `blue`      | optional term                             |
//! | `blu*`      | wildcard (`*` matches any run of chars)   |
//! | `blue^20`   | boost for matches in the token name       |
//! | `+color`    | documents must contain the term           |
//! | `-opacity`  | documents must not contain the term       |
//! | `value:rgb` | match in one field only                   |

use std::fmt;

/// Indexed document fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Token name with hyphens replaced by spaces.
    SeparatedName,
    /// Declared value.
    Value,
}

impl Field {
    /// Every field, in index order.
    pub const ALL: [Field; 2] = [Field::SeparatedName, Field::Value];

    /// Field name as written in queries.
    pub fn as_str(self) -> &'static str {
        match self {
            Field::SeparatedName => "separatedName",
            Field::Value => "value",
        }
    }

    /// Parse a field name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }
}

/// Whether a clause must, may, or must not match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Presence {
    #[default]
    Optional,
    Required,
    Prohibited,
}

/// One query clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    /// Lowercased term, possibly containing `*`.
    pub term: String,
    /// Field restriction; `None` searches every field.
    pub field: Option<Field>,
    /// Score multiplier.
    pub boost: f64,
    /// Presence requirement.
    pub presence: Presence,
}

impl Clause {
    /// Optional clause over every field.
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into().to_lowercase(),
            field: None,
            boost: 1.0,
            presence: Presence::Optional,
        }
    }

    /// Check whether the term contains a wildcard.
    pub fn is_wildcard(&self) -> bool {
        self.term.contains('*')
    }

    /// Check whether an index term satisfies this clause's term.
    pub fn matches_term(&self, candidate: &str) -> bool {
        if self.is_wildcard() {
            glob_match(&self.term, candidate)
        } else {
            self.term == candidate
        }
    }

    /// Fields this clause searches.
    pub fn fields(&self) -> Vec<Field> {
        match self.field {
            Some(field) => vec![field],
            None => Field::ALL.to_vec(),
        }
    }
}

/// A parsed query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    pub clauses: Vec<Clause>,
}

impl Query {
    /// Parse query text. Unparseable pieces degrade to plain terms.
    pub fn parse(text: &str) -> Self {
        let clauses = text.split_whitespace().filter_map(parse_clause).collect();
        Self { clauses }
    }

    /// Check whether the query has no clauses.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match clause.presence {
                Presence::Required => f.write_str("+")?,
                Presence::Prohibited => f.write_str("-")?,
                Presence::Optional => {}
            }
            if let Some(field) = clause.field {
                write!(f, "{}:", field.as_str())?;
            }
            f.write_str(&clause.term)?;
            if clause.boost != 1.0 {
                write!(f, "^{}", clause.boost)?;
            }
        }
        Ok(())
    }
}

fn parse_clause(piece: &str) -> Option<Clause> {
    let (presence, rest) = match piece.as_bytes().first() {
        Some(b'+') => (Presence::Required, &piece[1..]),
        Some(b'-') => (Presence::Prohibited, &piece[1..]),
        _ => (Presence::Optional, piece),
    };

    let (field, rest) = match rest.split_once(':') {
        Some((name, term)) => match Field::from_name(name) {
            Some(field) => (Some(field), term),
            None => (None, rest),
        },
        None => (None, rest),
    };

    let (term, boost) = match rest.rsplit_once('^') {
        Some((term, boost)) => match boost.parse::<f64>() {
            Ok(boost) => (term, boost),
            Err(_) => (rest, 1.0),
        },
        None => (rest, 1.0),
    };

    if term.is_empty() {
        return None;
    }

    Some(Clause {
        term: term.to_lowercase(),
        field,
        boost,
        presence,
    })
}

/// Match `text` against a pattern where `*` matches any run of characters.
fn glob_match(pattern: &str, text: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    let mut star: Option<(usize, usize)> = None;

    while t < text.len() {
        if p < pattern.len() && pattern[p] == '*' {
            star = Some((p, t));
            p += 1;
        } else if p < pattern.len() && pattern[p] == text[t] {
            p += 1;
            t += 1;
        } else if let Some((star_p, star_t)) = star {
            p = star_p + 1;
            t = star_t + 1;
            star = Some((star_p, star_t + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|c| *c == '*')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_modifiers() {
        let query = Query::parse("color^20 blu* +color -opacity value:rgb");
        let clauses = &query.clauses;

        assert_eq!(clauses.len(), 5);
        assert_eq!((clauses[0].term.as_str(), clauses[0].boost), ("color", 20.0));
        assert!(clauses[1].is_wildcard());
        assert_eq!(clauses[2].presence, Presence::Required);
        assert_eq!(clauses[3].presence, Presence::Prohibited);
        assert_eq!(clauses[4].field, Some(Field::Value));
        assert_eq!(query.to_string(), "color^20 blu* +color -opacity value:rgb");
    }

    #[test]
    fn odd_pieces_stay_terms() {
        let query = Query::parse("size^big name:x + ^3");
        let terms: Vec<_> = query.clauses.iter().map(|c| c.term.as_str()).collect();
        assert_eq!(terms, vec!["size^big", "name:x"]);
    }

    #[test]
    fn wildcards() {
        let clause = Clause::new("blu*");
        assert!(clause.matches_term("blue"));
        assert!(clause.matches_term("blu"));
        assert!(!clause.matches_term("ablue"));

        let inner = Clause::new("b*e");
        assert!(inner.matches_term("blue"));
        assert!(!inner.matches_term("blues"));

        assert!(Clause::new("*").matches_term("anything"));
    }
}
