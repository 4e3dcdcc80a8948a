//! Column role assignment and its validation against a table.
//!
//! A [`ColumnRoles`] value names the partition, subcategory, measure and
//! additional masking columns. Before any masking runs it is resolved against
//! the table into [`ResolvedRoles`], which carries column indices and fails on
//! unknown, duplicated or overlapping columns and on relation arity errors.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::table::Table;
use crate::types::Result;

/// The role a column plays in masking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Partition,
    Subcategory,
    Measure,
    Additional,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Partition => "partition",
            Role::Subcategory => "subcategory",
            Role::Measure => "measure",
            Role::Additional => "additional masking",
        };
        f.write_str(name)
    }
}

/// Relation between measure columns, without its columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    /// Measure columns are independent
    #[default]
    None,
    /// Numerator and denominator of a rate
    Rate,
    /// A total followed by its elements
    Sum,
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelationType::None => "None",
            RelationType::Rate => "Rate",
            RelationType::Sum => "Sum",
        };
        f.write_str(name)
    }
}

/// Measure columns together with the relation that binds them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "relation", rename_all = "snake_case")]
pub enum MeasureColumns {
    #[serde(rename = "none")]
    Independent { columns: Vec<String> },
    Rate {
        numerator: String,
        denominator: String,
    },
    Sum { total: String, elements: Vec<String> },
}

impl Default for MeasureColumns {
    fn default() -> Self {
        MeasureColumns::Independent {
            columns: Vec::new(),
        }
    }
}

impl MeasureColumns {
    /// Build measure columns from a relation type and an ordered column list.
    ///
    /// For `Rate` the numerator comes first; for `Sum` the total comes first.
    pub fn from_relation(relation: RelationType, mut columns: Vec<String>) -> Result<Self> {
        match relation {
            RelationType::None => {
                if columns.is_empty() {
                    return Err(arity_error(relation, "at least 1", 0));
                }
                Ok(MeasureColumns::Independent { columns })
            }
            RelationType::Rate => {
                if columns.len() != 2 {
                    return Err(arity_error(relation, "exactly 2", columns.len()));
                }
                let denominator = columns.pop().unwrap_or_default();
                let numerator = columns.pop().unwrap_or_default();
                Ok(MeasureColumns::Rate {
                    numerator,
                    denominator,
                })
            }
            RelationType::Sum => {
                if columns.len() < 2 {
                    return Err(arity_error(relation, "at least 2", columns.len()));
                }
                let elements = columns.split_off(1);
                let total = columns.pop().unwrap_or_default();
                Ok(MeasureColumns::Sum { total, elements })
            }
        }
    }

    pub fn relation(&self) -> RelationType {
        match self {
            MeasureColumns::Independent { .. } => RelationType::None,
            MeasureColumns::Rate { .. } => RelationType::Rate,
            MeasureColumns::Sum { .. } => RelationType::Sum,
        }
    }

    /// Measure columns in order (numerator or total first)
    pub fn columns(&self) -> Vec<&str> {
        match self {
            MeasureColumns::Independent { columns } => {
                columns.iter().map(String::as_str).collect()
            }
            MeasureColumns::Rate {
                numerator,
                denominator,
            } => vec![numerator.as_str(), denominator.as_str()],
            MeasureColumns::Sum { total, elements } => std::iter::once(total.as_str())
                .chain(elements.iter().map(String::as_str))
                .collect(),
        }
    }
}

fn arity_error(relation: RelationType, expected: &str, found: usize) -> Error {
    Error::RelationArity {
        relation: relation.to_string(),
        expected: expected.to_string(),
        found,
    }
}

/// Assignment of table columns to masking roles; unlisted columns are ignored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnRoles {
    pub partition: Vec<String>,
    pub subcategory: Vec<String>,
    pub measures: MeasureColumns,
    pub additional: Vec<String>,
}

impl ColumnRoles {
    /// Validate the assignment against `table` and attach column indices
    pub fn resolve(&self, table: &Table) -> Result<ResolvedRoles> {
        let measure_names = self.measures.columns();
        match &self.measures {
            MeasureColumns::Independent { columns } if columns.is_empty() => {
                return Err(arity_error(RelationType::None, "at least 1", 0));
            }
            MeasureColumns::Sum { elements, .. } if elements.is_empty() => {
                return Err(arity_error(RelationType::Sum, "at least 2", 1));
            }
            _ => {}
        }

        let mut seen: HashMap<&str, Role> = HashMap::new();
        let groups: [(Role, Vec<&str>); 4] = [
            (Role::Partition, self.partition.iter().map(String::as_str).collect()),
            (Role::Subcategory, self.subcategory.iter().map(String::as_str).collect()),
            (Role::Measure, measure_names.clone()),
            (Role::Additional, self.additional.iter().map(String::as_str).collect()),
        ];

        for (role, names) in &groups {
            for name in names {
                if let Some(first) = seen.insert(*name, *role) {
                    if first == *role {
                        return Err(Error::DuplicateColumn {
                            column: name.to_string(),
                            role: *role,
                        });
                    }
                    return Err(Error::OverlappingRoles {
                        column: name.to_string(),
                        first,
                        second: *role,
                    });
                }
            }
        }

        let lookup = |names: &[&str]| -> Result<Vec<ColumnRef>> {
            names
                .iter()
                .map(|name| {
                    table
                        .column_index(name)
                        .map(|index| ColumnRef {
                            name: name.to_string(),
                            index,
                        })
                        .ok_or_else(|| Error::UnknownColumn(name.to_string()))
                })
                .collect()
        };

        let partition = lookup(&groups[0].1)?;
        let subcategory = lookup(&groups[1].1)?;
        let measures = lookup(&measure_names)?;
        let additional = lookup(&groups[3].1)?;

        let relation = match self.measures.relation() {
            RelationType::None => ResolvedRelation::None,
            RelationType::Rate => ResolvedRelation::Rate {
                numerator: measures[0].clone(),
                denominator: measures[1].clone(),
            },
            RelationType::Sum => ResolvedRelation::Sum {
                total: measures[0].clone(),
                elements: measures[1..].to_vec(),
            },
        };

        Ok(ResolvedRoles {
            partition,
            subcategory,
            measures,
            relation,
            additional,
        })
    }
}

/// A column name bound to its position in a specific table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub name: String,
    pub index: usize,
}

/// Measure relation with resolved columns
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedRelation {
    None,
    Rate {
        numerator: ColumnRef,
        denominator: ColumnRef,
    },
    Sum {
        total: ColumnRef,
        elements: Vec<ColumnRef>,
    },
}

/// Roles validated against a table
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRoles {
    pub partition: Vec<ColumnRef>,
    pub subcategory: Vec<ColumnRef>,
    /// All measure columns, numerator or total first
    pub measures: Vec<ColumnRef>,
    pub relation: ResolvedRelation,
    pub additional: Vec<ColumnRef>,
}

/// Resolve a column selector: a header name, or a 1-based column number
pub fn resolve_selector(headers: &[String], selector: &str) -> Result<String> {
    let selector = selector.trim();
    if let Some(name) = headers.iter().find(|h| h.as_str() == selector) {
        return Ok(name.clone());
    }
    match selector.parse::<usize>() {
        Ok(number) if number >= 1 && number <= headers.len() => Ok(headers[number - 1].clone()),
        _ => Err(Error::UnknownColumn(selector.to_string())),
    }
}

/// Resolve a list of selectors, preserving order
pub fn resolve_selectors(headers: &[String], selectors: &[String]) -> Result<Vec<String>> {
    selectors
        .iter()
        .map(|s| resolve_selector(headers, s))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn sample_table() -> Table {
        Table::from_rows(
            ["Year", "Gender", "Region", "Count", "Total", "Note"],
            vec![vec!["2023", "All", "North", "10", "20", "x"]],
        )
        .unwrap()
    }

    #[test]
    fn test_rate_from_relation() {
        let measures =
            MeasureColumns::from_relation(RelationType::Rate, strings(&["Cases", "Pop"])).unwrap();
        assert_eq!(
            measures,
            MeasureColumns::Rate {
                numerator: "Cases".to_string(),
                denominator: "Pop".to_string(),
            }
        );
        assert_eq!(measures.columns(), vec!["Cases", "Pop"]);
    }

    #[test]
    fn test_rate_arity() {
        let result = MeasureColumns::from_relation(RelationType::Rate, strings(&["a", "b", "c"]));
        assert!(matches!(result, Err(Error::RelationArity { found: 3, .. })));
    }

    #[test]
    fn test_sum_from_relation() {
        let measures =
            MeasureColumns::from_relation(RelationType::Sum, strings(&["Total", "A", "B"]))
                .unwrap();
        assert_eq!(measures.relation(), RelationType::Sum);
        assert_eq!(measures.columns(), vec!["Total", "A", "B"]);

        let result = MeasureColumns::from_relation(RelationType::Sum, strings(&["Total"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_independent_requires_a_column() {
        let result = MeasureColumns::from_relation(RelationType::None, Vec::new());
        assert!(matches!(result, Err(Error::RelationArity { .. })));
    }

    #[test]
    fn test_resolve_indices() {
        let roles = ColumnRoles {
            partition: strings(&["Year"]),
            subcategory: strings(&["Gender", "Region"]),
            measures: MeasureColumns::Sum {
                total: "Total".to_string(),
                elements: strings(&["Count"]),
            },
            additional: strings(&["Note"]),
        };

        let resolved = roles.resolve(&sample_table()).unwrap();
        assert_eq!(resolved.partition[0].index, 0);
        assert_eq!(resolved.measures[0].name, "Total");
        assert_eq!(resolved.measures[0].index, 4);
        assert!(matches!(resolved.relation, ResolvedRelation::Sum { ref elements, .. } if elements.len() == 1));
        assert_eq!(resolved.additional[0].index, 5);
    }

    #[test]
    fn test_overlapping_roles_rejected() {
        let roles = ColumnRoles {
            partition: strings(&["Year"]),
            subcategory: strings(&["Gender"]),
            measures: MeasureColumns::Independent {
                columns: strings(&["Count", "Gender"]),
            },
            additional: Vec::new(),
        };

        match roles.resolve(&sample_table()) {
            Err(Error::OverlappingRoles {
                column,
                first,
                second,
            }) => {
                assert_eq!(column, "Gender");
                assert_eq!(first, Role::Subcategory);
                assert_eq!(second, Role::Measure);
            }
            other => panic!("expected overlapping roles, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_within_role_rejected() {
        let roles = ColumnRoles {
            partition: strings(&["Year", "Year"]),
            measures: MeasureColumns::Independent {
                columns: strings(&["Count"]),
            },
            ..ColumnRoles::default()
        };
        assert!(matches!(
            roles.resolve(&sample_table()),
            Err(Error::DuplicateColumn { role: Role::Partition, .. })
        ));
    }

    #[test]
    fn test_rate_with_same_column_twice_rejected() {
        let roles = ColumnRoles {
            measures: MeasureColumns::Rate {
                numerator: "Count".to_string(),
                denominator: "Count".to_string(),
            },
            ..ColumnRoles::default()
        };
        assert!(matches!(
            roles.resolve(&sample_table()),
            Err(Error::DuplicateColumn { role: Role::Measure, .. })
        ));
    }

    #[test]
    fn test_unknown_column_rejected() {
        let roles = ColumnRoles {
            measures: MeasureColumns::Independent {
                columns: strings(&["Deaths"]),
            },
            ..ColumnRoles::default()
        };
        assert!(matches!(
            roles.resolve(&sample_table()),
            Err(Error::UnknownColumn(name)) if name == "Deaths"
        ));
    }

    #[test]
    fn test_resolve_selector() {
        let headers = strings(&["Year", "Gender", "2"]);
        assert_eq!(resolve_selector(&headers, "Gender").unwrap(), "Gender");
        assert_eq!(resolve_selector(&headers, "1").unwrap(), "Year");
        // An exact header match wins over a column number
        assert_eq!(resolve_selector(&headers, "2").unwrap(), "2");
        assert!(resolve_selector(&headers, "4").is_err());
        assert!(resolve_selector(&headers, "0").is_err());
    }

    #[test]
    fn test_roles_json_shape() {
        let json = r#"{
            "partition": ["Year"],
            "measures": {"relation": "rate", "numerator": "Cases", "denominator": "Pop"}
        }"#;
        let roles: ColumnRoles = serde_json::from_str(json).unwrap();
        assert_eq!(roles.measures.relation(), RelationType::Rate);
        assert!(roles.subcategory.is_empty());

        let json = r#"{"measures": {"relation": "none", "columns": ["Count"]}}"#;
        let roles: ColumnRoles = serde_json::from_str(json).unwrap();
        assert_eq!(roles.measures.columns(), vec!["Count"]);
    }
}
