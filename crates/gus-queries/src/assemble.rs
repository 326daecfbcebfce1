//! Final query string rendering
//!
//! Renders the clauses of a query in their fixed grammatical order:
//! `SELECT fields FROM object [WHERE ...] [ORDER BY ... ASC|DESC]
//! [LIMIT n]`.

use std::collections::HashSet;

use gus_core::error::QueryError;

use crate::filters::Fragment;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    /// Ascending order (A-Z, 1-9, oldest first)
    Asc,
    /// Descending order (Z-A, 9-1, newest first)
    #[default]
    Desc,
}

impl SortDirection {
    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "ASC" | "ASCENDING" => Some(Self::Asc),
            "DESC" | "DESCENDING" => Some(Self::Desc),
            _ => None,
        }
    }

    /// Convert to the query-language keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// A sort clause: field and direction always travel together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub direction: SortDirection,
}

impl Sort {
    /// Create a sort clause
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Ascending sort
    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    /// Descending sort
    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }
}

/// The SELECT field list
///
/// A raw string is passed through verbatim; a name list is joined with
/// commas in input order. Any other shape is unrepresentable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldList {
    /// Caller-rendered field expression, used as-is
    Raw(String),
    /// Ordered, distinct field names
    Names(Vec<String>),
}

impl FieldList {
    /// The default selection: the record id.
    pub fn id() -> Self {
        Self::Raw("Id".to_string())
    }

    /// Render the field list, validating the non-empty/distinct invariant.
    pub fn render(&self) -> Result<String, QueryError> {
        match self {
            Self::Raw(raw) => {
                if raw.is_empty() {
                    Err(QueryError::EmptyFields)
                } else {
                    Ok(raw.clone())
                }
            }
            Self::Names(names) => {
                if names.is_empty() {
                    return Err(QueryError::EmptyFields);
                }
                let mut seen = HashSet::new();
                for name in names {
                    if !seen.insert(name.as_str()) {
                        return Err(QueryError::DuplicateField(name.clone()));
                    }
                }
                Ok(names.join(","))
            }
        }
    }
}

impl Default for FieldList {
    fn default() -> Self {
        Self::id()
    }
}

impl From<&str> for FieldList {
    fn from(raw: &str) -> Self {
        Self::Raw(raw.to_string())
    }
}

impl From<String> for FieldList {
    fn from(raw: String) -> Self {
        Self::Raw(raw)
    }
}

impl From<Vec<String>> for FieldList {
    fn from(names: Vec<String>) -> Self {
        Self::Names(names)
    }
}

impl From<Vec<&str>> for FieldList {
    fn from(names: Vec<&str>) -> Self {
        Self::Names(names.into_iter().map(str::to_string).collect())
    }
}

/// Render a complete query string.
pub fn assemble(
    object: &str,
    fields: &FieldList,
    filter: Option<&Fragment>,
    sort: Option<&Sort>,
    limit: Option<u32>,
) -> Result<String, QueryError> {
    let mut query = format!("SELECT {} FROM {}", fields.render()?, object);

    if let Some(filter) = filter {
        query.push_str(&format!(" WHERE {}", filter));
    }

    if let Some(sort) = sort {
        query.push_str(&format!(" ORDER BY {} {}", sort.field, sort.direction.as_str()));
    }

    if let Some(limit) = limit {
        if limit == 0 {
            return Err(QueryError::InvalidLimit(0));
        }
        query.push_str(&format!(" LIMIT {}", limit));
    }

    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::equals;

    #[test]
    fn test_minimal_query() {
        let query = assemble("Case", &FieldList::id(), None, None, None).unwrap();
        assert_eq!(query, "SELECT Id FROM Case");
    }

    #[test]
    fn test_fields_render_in_input_order() {
        let fields = FieldList::from(vec!["Id", "CaseNumber", "Subject"]);
        let query = assemble("Case", &fields, None, None, None).unwrap();
        assert_eq!(query, "SELECT Id,CaseNumber,Subject FROM Case");
    }

    #[test]
    fn test_raw_fields_pass_through() {
        let fields = FieldList::from("CreatedBy.Name, CreatedDate");
        let query = assemble("CaseComment", &fields, None, None, None).unwrap();
        assert_eq!(query, "SELECT CreatedBy.Name, CreatedDate FROM CaseComment");
    }

    #[test]
    fn test_all_clauses_in_order() {
        let fields = FieldList::from(vec!["Id", "Subject"]);
        let filter = equals("Status", "New").unwrap();
        let sort = Sort::desc("CreatedDate");
        let query = assemble("Case", &fields, Some(&filter), Some(&sort), Some(200)).unwrap();
        assert_eq!(
            query,
            "SELECT Id,Subject FROM Case WHERE Status = 'New' ORDER BY CreatedDate DESC LIMIT 200"
        );
    }

    #[test]
    fn test_empty_fields_rejected() {
        assert_eq!(
            assemble("Case", &FieldList::Names(vec![]), None, None, None),
            Err(QueryError::EmptyFields)
        );
        assert_eq!(
            assemble("Case", &FieldList::Raw(String::new()), None, None, None),
            Err(QueryError::EmptyFields)
        );
    }

    #[test]
    fn test_duplicate_fields_rejected() {
        let fields = FieldList::from(vec!["Id", "Subject", "Id"]);
        assert_eq!(
            assemble("Case", &fields, None, None, None),
            Err(QueryError::DuplicateField("Id".to_string()))
        );
    }

    #[test]
    fn test_zero_limit_rejected() {
        assert_eq!(
            assemble("Case", &FieldList::id(), None, None, Some(0)),
            Err(QueryError::InvalidLimit(0))
        );
    }

    #[test]
    fn test_sort_direction_parsing() {
        assert_eq!(SortDirection::from_str("asc"), Some(SortDirection::Asc));
        assert_eq!(SortDirection::from_str("DESC"), Some(SortDirection::Desc));
        assert_eq!(SortDirection::from_str("sideways"), None);
    }
}
