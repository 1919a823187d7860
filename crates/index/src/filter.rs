//! Filter compilation for the vector-search backend.
//!
//! UI filter state (selected publications, optional date range) is
//! compiled into a small boolean-predicate tree, then serialized into
//! the backend's JSON shape in one place. The serializer flattens a
//! conjunction into sibling fields when that is unambiguous and nests
//! it under `$and` when it is not.

use newschat_core::ChatFilters;
use serde_json::{json, Map, Value};

/// A compiled filter expression over article metadata.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    /// No constraint
    Empty,

    /// Equality constraint on the publication field
    Publication(String),

    /// Disjunction over publication equality constraints
    AnyPublication(Vec<String>),

    /// Inclusive publication-date range, bounds in epoch seconds
    PublishedBetween {
        from: Option<i64>,
        to: Option<i64>,
    },

    /// Conjunction of sub-expressions
    All(Vec<FilterExpr>),
}

impl FilterExpr {
    /// Compile UI filter state into a filter expression.
    ///
    /// Shapes, by selection:
    /// - no publications, no range → [`FilterExpr::Empty`]
    /// - one publication → direct equality
    /// - several publications → disjunction of equalities
    /// - a date range combines with the publication constraint as a
    ///   conjunction (flattened or nested by the serializer)
    pub fn compile(filters: &ChatFilters) -> Self {
        let publication = match filters.publications.as_slice() {
            [] => None,
            [only] => Some(FilterExpr::Publication(only.clone())),
            many => Some(FilterExpr::AnyPublication(many.to_vec())),
        };

        let date = filters.date_range.as_ref().and_then(|range| {
            let from = range.from.map(|d| d.timestamp());
            let to = range.to.map(|d| d.timestamp());
            (from.is_some() || to.is_some()).then_some(FilterExpr::PublishedBetween { from, to })
        });

        match (publication, date) {
            (None, None) => FilterExpr::Empty,
            (Some(expr), None) | (None, Some(expr)) => expr,
            (Some(publication), Some(date)) => FilterExpr::All(vec![publication, date]),
        }
    }

    /// Serialize into the backend's JSON filter shape.
    ///
    /// This is the single point of coupling to the backend format.
    pub fn to_backend_value(&self) -> Value {
        match self {
            FilterExpr::Empty => json!({}),

            FilterExpr::Publication(publication) => json!({ "publication": publication }),

            FilterExpr::AnyPublication(publications) => json!({
                "$or": publications
                    .iter()
                    .map(|p| json!({ "publication": p }))
                    .collect::<Vec<_>>(),
            }),

            FilterExpr::PublishedBetween { from, to } => {
                let mut range = Map::new();
                if let Some(from) = from {
                    range.insert("$gte".to_string(), json!(from));
                }
                if let Some(to) = to {
                    range.insert("$lte".to_string(), json!(to));
                }
                json!({ "publication_date": range })
            }

            FilterExpr::All(members) => {
                let values: Vec<Value> = members.iter().map(Self::to_backend_value).collect();

                // Merging into one flat object is only unambiguous when
                // every member contributes plain, non-overlapping fields.
                // An operator key like `$or` must keep its own object, so
                // the whole conjunction nests under `$and`.
                match flatten_conjunction(&values) {
                    Some(flat) => Value::Object(flat),
                    None => json!({ "$and": values }),
                }
            }
        }
    }
}

/// Try to merge conjunction members into one object of sibling fields.
///
/// Fails (returns `None`) when any member carries an operator key or
/// when two members write the same field.
fn flatten_conjunction(values: &[Value]) -> Option<Map<String, Value>> {
    let mut flat = Map::new();

    for value in values {
        let object = value.as_object()?;
        for (key, value) in object {
            if key.starts_with('$') {
                return None;
            }
            if flat.insert(key.clone(), value.clone()).is_some() {
                return None;
            }
        }
    }

    Some(flat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use newschat_core::DateRange;

    fn filters(publications: &[&str], range: Option<DateRange>) -> ChatFilters {
        ChatFilters {
            publications: publications.iter().map(|p| p.to_string()).collect(),
            date_range: range,
        }
    }

    fn range(from_secs: Option<i64>, to_secs: Option<i64>) -> DateRange {
        DateRange {
            from: from_secs.map(|s| Utc.timestamp_opt(s, 0).unwrap()),
            to: to_secs.map(|s| Utc.timestamp_opt(s, 0).unwrap()),
        }
    }

    #[test]
    fn test_no_filters_is_empty_object() {
        let expr = FilterExpr::compile(&filters(&[], None));
        assert_eq!(expr, FilterExpr::Empty);
        assert_eq!(expr.to_backend_value(), json!({}));
    }

    #[test]
    fn test_single_publication_is_direct_equality() {
        let expr = FilterExpr::compile(&filters(&["mintpress"], None));
        assert_eq!(
            expr.to_backend_value(),
            json!({ "publication": "mintpress" })
        );
    }

    #[test]
    fn test_multiple_publications_become_disjunction() {
        let expr = FilterExpr::compile(&filters(&["mintpress", "grayzone"], None));
        assert_eq!(
            expr.to_backend_value(),
            json!({
                "$or": [
                    { "publication": "mintpress" },
                    { "publication": "grayzone" },
                ]
            })
        );
    }

    #[test]
    fn test_date_range_alone() {
        let expr = FilterExpr::compile(&filters(&[], Some(range(Some(100), Some(200)))));
        assert_eq!(
            expr.to_backend_value(),
            json!({ "publication_date": { "$gte": 100, "$lte": 200 } })
        );
    }

    #[test]
    fn test_open_ended_date_range_drops_unset_bound() {
        let expr = FilterExpr::compile(&filters(&[], Some(range(Some(100), None))));
        assert_eq!(
            expr.to_backend_value(),
            json!({ "publication_date": { "$gte": 100 } })
        );
    }

    #[test]
    fn test_empty_date_range_is_no_constraint() {
        let expr = FilterExpr::compile(&filters(&[], Some(range(None, None))));
        assert_eq!(expr, FilterExpr::Empty);
    }

    #[test]
    fn test_single_publication_with_range_flattens() {
        let expr = FilterExpr::compile(&filters(
            &["mintpress"],
            Some(range(Some(100), Some(200))),
        ));
        assert_eq!(
            expr.to_backend_value(),
            json!({
                "publication": "mintpress",
                "publication_date": { "$gte": 100, "$lte": 200 },
            })
        );
    }

    #[test]
    fn test_disjunction_with_range_nests_under_and() {
        let expr = FilterExpr::compile(&filters(
            &["mintpress", "grayzone"],
            Some(range(Some(100), Some(200))),
        ));
        assert_eq!(
            expr.to_backend_value(),
            json!({
                "$and": [
                    {
                        "$or": [
                            { "publication": "mintpress" },
                            { "publication": "grayzone" },
                        ]
                    },
                    { "publication_date": { "$gte": 100, "$lte": 200 } },
                ]
            })
        );
    }

    #[test]
    fn test_range_bounds_are_epoch_seconds() {
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let expr = FilterExpr::compile(&filters(
            &[],
            Some(DateRange {
                from: Some(from),
                to: None,
            }),
        ));
        assert_eq!(
            expr.to_backend_value(),
            json!({ "publication_date": { "$gte": from.timestamp() } })
        );
    }
}
