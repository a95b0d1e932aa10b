//! Roster parsing: the couples/judges table trailing every score page
//!
//! The final table on a page is a free-form roster rather than a result
//! grid. Its cells flatten into one ordered token stream that the literal
//! token "Judges" splits into a couples segment and a judges segment.

use crate::{ParseError, ParseResult};
use scraper::ElementRef;

use super::tables::{cell_text, elements};

/// A competing couple from the roster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Couple {
    pub number: String,
    pub lead: String,
    pub follow: String,
}

/// A judge from the roster
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Judge {
    pub id: String,
    pub name: String,
}

/// Parses the trailing roster table into couples and judges
pub(crate) fn parse_roster(table: ElementRef<'_>) -> ParseResult<(Vec<Couple>, Vec<Judge>)> {
    split_tokens(&roster_tokens(table))
}

/// Flattens the roster rows into one ordered, non-empty token sequence
fn roster_tokens(table: ElementRef<'_>) -> Vec<String> {
    let mut tokens = Vec::new();
    for row in elements(table, "tr") {
        for cell in elements(row, "td") {
            let text = cell_text(cell);
            if !text.is_empty() {
                tokens.push(text);
            }
        }
    }
    tokens
}

/// Splits the token stream at the "Judges" sentinel and decodes each side
///
/// The judges segment, after its header, pairs up as (id, name). The
/// couples segment, after its header, carries an artifact cell as the 2nd
/// token of every group of 4; dropping those leaves (number, lead, follow)
/// triples.
pub(crate) fn split_tokens(tokens: &[String]) -> ParseResult<(Vec<Couple>, Vec<Judge>)> {
    let sentinel = tokens
        .iter()
        .position(|t| t == "Judges")
        .ok_or(ParseError::MissingJudgesSentinel)?;
    let (left, right) = tokens.split_at(sentinel);

    let judge_tokens = &right[1..];
    if judge_tokens.len() % 2 != 0 {
        return Err(ParseError::OddJudgesSegment(judge_tokens.len()));
    }
    let judges = judge_tokens
        .chunks(2)
        .map(|pair| Judge {
            id: pair[0].clone(),
            name: pair[1].clone(),
        })
        .collect();

    let couple_tokens = left.get(1..).unwrap_or_default();
    let kept: Vec<&String> = couple_tokens
        .iter()
        .enumerate()
        .filter(|(index, _)| index % 4 != 1)
        .map(|(_, token)| token)
        .collect();
    if kept.len() % 3 != 0 {
        return Err(ParseError::RaggedCouplesSegment(kept.len()));
    }
    let couples = kept
        .chunks(3)
        .map(|triple| Couple {
            number: triple[0].clone(),
            lead: triple[1].clone(),
            follow: triple[2].clone(),
        })
        .collect();

    Ok((couples, judges))
}
