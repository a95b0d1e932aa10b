//! Upsert statement generation for the graph store
//!
//! Pure text artifacts: nothing here touches the network or a database.
//! Every statement is an idempotent create-if-absent (`MERGE`) and every
//! name travels as a bound parameter, never spliced into the statement
//! text. Executing the statements is the caller's concern.
//!
//! The per-dance and per-judge marks in [`ParsedPage::results`] are not
//! turned into statements here; callers running a marks-upsert pass must
//! bind competitor ids and marks as parameters the same way.

use crate::parser::ParsedPage;
use serde::Serialize;

/// One idempotent create-or-match operation, with its bound parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpsertStatement {
    /// Statement text containing only `$param` placeholders
    pub text: String,

    /// Parameter bindings, in placeholder order
    pub params: Vec<(String, String)>,
}

impl UpsertStatement {
    fn new(text: &str, params: &[(&str, &str)]) -> Self {
        Self {
            text: text.to_string(),
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

const MERGE_PERSON: &str = "MERGE (:Person {name: $name})";

const MERGE_COUPLE: &str = "MERGE (lead:Person {name: $lead})\n\
     MERGE (follow:Person {name: $follow})\n\
     MERGE (lead)-[:MEMBER_OF {role: 'lead'}]->\
     (:Couple {number: $number})\
     <-[:MEMBER_OF {role: 'follow'}]-(follow)";

/// Converts one parsed page into its ordered upsert statements
///
/// Judges first, then couples, each in page order; identical input always
/// yields an identical statement sequence.
pub fn to_statements(page: &ParsedPage) -> Vec<UpsertStatement> {
    let mut statements = Vec::with_capacity(page.judges.len() + page.couples.len());

    for judge in &page.judges {
        statements.push(UpsertStatement::new(
            MERGE_PERSON,
            &[("name", judge.name.as_str())],
        ));
    }

    for couple in &page.couples {
        statements.push(UpsertStatement::new(
            MERGE_COUPLE,
            &[
                ("lead", couple.lead.as_str()),
                ("follow", couple.follow.as_str()),
                ("number", couple.number.as_str()),
            ],
        ));
    }

    statements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Couple, Judge};

    fn sample_page() -> ParsedPage {
        ParsedPage {
            results: Vec::new(),
            judges: vec![
                Judge {
                    id: "J1".to_string(),
                    name: "Pat".to_string(),
                },
                Judge {
                    id: "J2".to_string(),
                    name: "Sue".to_string(),
                },
            ],
            couples: vec![Couple {
                number: "12".to_string(),
                lead: "Leo".to_string(),
                follow: "Mia".to_string(),
            }],
        }
    }

    #[test]
    fn test_one_statement_per_judge_and_couple() {
        let statements = to_statements(&sample_page());
        assert_eq!(statements.len(), 3);
        assert_eq!(statements[0].params, vec![("name".to_string(), "Pat".to_string())]);
        assert_eq!(
            statements[2].params,
            vec![
                ("lead".to_string(), "Leo".to_string()),
                ("follow".to_string(), "Mia".to_string()),
                ("number".to_string(), "12".to_string()),
            ]
        );
    }

    #[test]
    fn test_statement_text_never_embeds_a_name() {
        let page = sample_page();
        for statement in to_statements(&page) {
            for name in ["Pat", "Sue", "Leo", "Mia"] {
                assert!(
                    !statement.text.contains(name),
                    "name {:?} leaked into statement text: {}",
                    name,
                    statement.text
                );
            }
        }
    }

    #[test]
    fn test_hostile_name_stays_in_parameters() {
        let mut page = sample_page();
        page.judges[0].name = "x'}) DETACH DELETE n //".to_string();

        let statements = to_statements(&page);
        assert!(!statements[0].text.contains("DETACH"));
        assert_eq!(statements[0].params[0].1, "x'}) DETACH DELETE n //");
    }

    #[test]
    fn test_generation_is_pure() {
        let page = sample_page();
        assert_eq!(to_statements(&page), to_statements(&page));
    }

    #[test]
    fn test_empty_page_yields_no_statements() {
        let page = ParsedPage {
            results: Vec::new(),
            judges: Vec::new(),
            couples: Vec::new(),
        };
        assert!(to_statements(&page).is_empty());
    }
}
