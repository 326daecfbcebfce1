//! Filter expression construction
//!
//! Pure functions composing boolean predicates into query-language
//! fragments. Nothing here validates a fragment: a malformed predicate
//! surfaces only when the finished query is submitted.
//!
//! Values are wrapped in quote literals verbatim; embedded quote characters
//! are NOT escaped, so the generated strings are only as trustworthy as
//! their inputs. Do not hand these functions untrusted text.

use gus_core::error::FilterError;
use tracing::warn;

/// Wildcard character accepted in [`like`] patterns.
pub const DEFAULT_WILDCARD: char = '*';

/// A rendered boolean predicate fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment(String);

impl Fragment {
    /// Wrap an already-rendered predicate.
    pub fn raw(expr: impl Into<String>) -> Self {
        Self(expr.into())
    }

    /// View the rendered predicate.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the rendered predicate.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Fragment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result type for fallible filter constructors
pub type FilterResult = Result<Fragment, FilterError>;

/// Opt-in fail-soft adapter
///
/// Converts a filter construction error into an absent fragment with a
/// logged diagnostic, so a builder chain keeps going with a best-effort
/// partial query instead of aborting.
pub trait Lenient {
    fn lenient(self) -> Option<Fragment>;
}

impl Lenient for FilterResult {
    fn lenient(self) -> Option<Fragment> {
        match self {
            Ok(fragment) => Some(fragment),
            Err(err) => {
                warn!(%err, "dropping filter");
                None
            }
        }
    }
}

fn require(
    operation: &'static str,
    argument: &'static str,
    value: &str,
) -> Result<(), FilterError> {
    if value.is_empty() {
        Err(FilterError::MissingArgument {
            operation,
            argument,
        })
    } else {
        Ok(())
    }
}

/// `field = 'value'`
pub fn equals(field: &str, value: &str) -> FilterResult {
    require("equals", "field", field)?;
    require("equals", "value", value)?;
    Ok(Fragment(format!("{} = {}", field, quote(value))))
}

/// `field != 'value'`
pub fn not_equals(field: &str, value: &str) -> FilterResult {
    require("not_equals", "field", field)?;
    require("not_equals", "value", value)?;
    Ok(Fragment(format!("{} != {}", field, quote(value))))
}

/// `field < literal` — the right-hand side is taken verbatim (datetime
/// literals are not quoted in the query language).
pub fn before(field: &str, literal: &str) -> FilterResult {
    require("before", "field", field)?;
    require("before", "literal", literal)?;
    Ok(Fragment(format!("{} < {}", field, literal)))
}

/// `field > literal` — verbatim right-hand side, as in [`before`].
pub fn after(field: &str, literal: &str) -> FilterResult {
    require("after", "field", field)?;
    require("after", "literal", literal)?;
    Ok(Fragment(format!("{} > {}", field, literal)))
}

/// `field IN values`
///
/// `values` is caller-supplied and must already be bracketed: a literal
/// list such as `(1,2,3)` or a nested subquery string.
pub fn is_in(field: &str, values: &str) -> FilterResult {
    require("is_in", "field", field)?;
    require("is_in", "values", values)?;
    Ok(Fragment(format!("{} IN {}", field, values)))
}

/// `field LIKE 'pattern'`, replacing [`DEFAULT_WILDCARD`] with `%`.
pub fn like(field: &str, pattern: &str) -> FilterResult {
    like_with(field, pattern, DEFAULT_WILDCARD)
}

/// `field LIKE 'pattern'` with a caller-chosen wildcard character.
pub fn like_with(field: &str, pattern: &str, wildcard: char) -> FilterResult {
    require("like", "field", field)?;
    require("like", "pattern", pattern)?;
    let translated = pattern.replace(wildcard, "%");
    Ok(Fragment(format!("{} LIKE {}", field, quote(&translated))))
}

/// Join predicates with ` AND `. Needs at least two operands.
pub fn all_of(parts: &[Fragment]) -> FilterResult {
    join("all_of", " AND ", parts)
}

/// Join predicates with ` OR `. Needs at least two operands.
pub fn any_of(parts: &[Fragment]) -> FilterResult {
    join("any_of", " OR ", parts)
}

fn join(operation: &'static str, connective: &str, parts: &[Fragment]) -> FilterResult {
    if parts.len() < 2 {
        return Err(FilterError::TooFewOperands {
            operation,
            given: parts.len(),
        });
    }
    let rendered: Vec<&str> = parts.iter().map(Fragment::as_str).collect();
    Ok(Fragment(rendered.join(connective)))
}

/// Wrap in single quote literals. No escaping is performed.
pub fn quote(value: &str) -> String {
    format!("'{}'", value)
}

/// Wrap in parentheses.
pub fn bracket(value: &str) -> String {
    format!("({})", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equals() {
        let fragment = equals("CaseNumber", "108983").unwrap();
        assert_eq!(fragment.as_str(), "CaseNumber = '108983'");
    }

    #[test]
    fn test_equals_missing_argument() {
        assert_eq!(
            equals("", "108983"),
            Err(FilterError::MissingArgument {
                operation: "equals",
                argument: "field",
            })
        );
        assert_eq!(
            equals("CaseNumber", ""),
            Err(FilterError::MissingArgument {
                operation: "equals",
                argument: "value",
            })
        );
    }

    #[test]
    fn test_not_equals() {
        let fragment = not_equals("Status", "Closed").unwrap();
        assert_eq!(fragment.as_str(), "Status != 'Closed'");
    }

    #[test]
    fn test_is_in_passes_values_through() {
        let fragment = is_in("Id", "(1,2,3)").unwrap();
        assert_eq!(fragment.as_str(), "Id IN (1,2,3)");
    }

    #[test]
    fn test_like_translates_wildcard() {
        let fragment = like("Subject", "*deploy*").unwrap();
        assert_eq!(fragment.as_str(), "Subject LIKE '%deploy%'");
    }

    #[test]
    fn test_like_with_custom_wildcard() {
        let fragment = like_with("Subject", "?deploy?", '?').unwrap();
        assert_eq!(fragment.as_str(), "Subject LIKE '%deploy%'");
    }

    #[test]
    fn test_comparisons_take_literal_rhs() {
        let start = before("Scheduled_Start__c", "2019-06-09T01:00:00.000000Z").unwrap();
        assert_eq!(
            start.as_str(),
            "Scheduled_Start__c < 2019-06-09T01:00:00.000000Z"
        );
        let end = after("Scheduled_End__c", "2019-06-09T01:00:00.000000Z").unwrap();
        assert_eq!(
            end.as_str(),
            "Scheduled_End__c > 2019-06-09T01:00:00.000000Z"
        );
    }

    #[test]
    fn test_all_of() {
        let parts = [
            equals("A", "1").unwrap(),
            equals("B", "2").unwrap(),
            equals("C", "3").unwrap(),
        ];
        assert_eq!(
            all_of(&parts).unwrap().as_str(),
            "A = '1' AND B = '2' AND C = '3'"
        );
    }

    #[test]
    fn test_any_of() {
        let parts = [equals("A", "1").unwrap(), equals("B", "2").unwrap()];
        assert_eq!(any_of(&parts).unwrap().as_str(), "A = '1' OR B = '2'");
    }

    #[test]
    fn test_combinators_need_two_operands() {
        let one = [equals("A", "1").unwrap()];
        assert_eq!(
            all_of(&one),
            Err(FilterError::TooFewOperands {
                operation: "all_of",
                given: 1,
            })
        );
        assert_eq!(
            any_of(&[]),
            Err(FilterError::TooFewOperands {
                operation: "any_of",
                given: 0,
            })
        );
    }

    #[test]
    fn test_lenient_drops_errors() {
        assert!(equals("", "").lenient().is_none());
        assert_eq!(
            equals("A", "1").lenient().unwrap().as_str(),
            "A = '1'"
        );
    }

    #[test]
    fn test_quote_bracket_round_trip() {
        for value in ["108983", "a b c", ""] {
            assert_eq!(bracket(&quote(value)), format!("('{}')", value));
        }
    }

    #[test]
    fn test_no_escaping_of_embedded_quotes() {
        // Documented gap: embedded quotes pass through untouched.
        let fragment = equals("Name", "O'Brien").unwrap();
        assert_eq!(fragment.as_str(), "Name = 'O'Brien'");
    }
}
