//! Result-table parsing
//!
//! Every table on a score page except the trailing roster table is a result
//! table. The layout is undeclared in the markup and varies by kind: the
//! table whose name row reads "Summary" has dance-name columns, every other
//! table has judge-identifier columns. The two kinds disagree about which
//! trailing cell holds the competitor's place, so they are parsed into
//! explicit tagged variants instead of sharing one shape.

use crate::{ParseError, ParseResult};
use scraper::{ElementRef, Selector};

/// One parsed result table from a score page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultTable {
    /// The per-dance summary block: one mark column per dance
    Summary {
        dances: Vec<String>,
        rows: Vec<CompetitorRow>,
    },

    /// A single dance's scoring: one mark column per judge
    Judged {
        name: String,
        judges: Vec<String>,
        rows: Vec<CompetitorRow>,
    },
}

/// One competitor's line in a result table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetitorRow {
    pub competitor: String,
    /// One numeric mark per column of the owning table
    pub marks: Vec<u32>,
    /// Taken verbatim; final-round places can read like "1" but are not
    /// guaranteed numeric
    pub place: String,
}

/// Which trailing cell of a competitor row holds the place
#[derive(Debug, Clone, Copy)]
enum PlaceCell {
    /// Summary rows: the place is the last cell
    Last,
    /// Judged rows: the last cell is an unrelated total, the place sits
    /// second to last
    SecondToLast,
}

/// Parses one result table into its tagged variant
pub(crate) fn parse_result_table(table: ElementRef<'_>) -> ParseResult<ResultTable> {
    let rows = elements(table, "tr");

    // Row 0 names the table, row 1 carries the column headers.
    let name = rows
        .first()
        .and_then(|row| texts(*row, "td.h3").into_iter().next())
        .unwrap_or_default();
    let header = rows
        .get(1)
        .map(|row| texts(*row, "td.t1b"))
        .unwrap_or_default();
    let body = rows.get(2..).unwrap_or_default();

    if name == "Summary" {
        // The header ends in a decorative cell.
        let dances = header[..header.len().saturating_sub(1)].to_vec();
        let rows = competitor_rows(body, dances.len(), PlaceCell::Last)?;
        Ok(ResultTable::Summary { dances, rows })
    } else {
        // The header starts and ends with decorative cells.
        let judges = if header.len() >= 2 {
            header[1..header.len() - 1].to_vec()
        } else {
            Vec::new()
        };
        let rows = competitor_rows(body, judges.len(), PlaceCell::SecondToLast)?;
        Ok(ResultTable::Judged { name, judges, rows })
    }
}

/// Parses the competitor lines of one table
fn competitor_rows(
    rows: &[ElementRef<'_>],
    mark_count: usize,
    place_cell: PlaceCell,
) -> ParseResult<Vec<CompetitorRow>> {
    let mut out = Vec::new();

    for row in rows {
        let cells = elements(*row, "td");
        if cells.is_empty() {
            continue;
        }

        let competitor = texts(*row, "td.t1b")
            .into_iter()
            .next()
            .unwrap_or_else(|| cell_text(cells[0]));

        let trailing = match place_cell {
            PlaceCell::Last => 1,
            PlaceCell::SecondToLast => 2,
        };
        let want = 1 + mark_count + trailing;
        if cells.len() < want {
            return Err(ParseError::ShortRow {
                got: cells.len(),
                want,
            });
        }

        // The marks are the next mark_count cells after the competitor id.
        let mut marks = Vec::with_capacity(mark_count);
        for cell in &cells[1..1 + mark_count] {
            let value = cell_text(*cell);
            let mark = value.parse::<u32>().map_err(|_| ParseError::BadMark {
                competitor: competitor.clone(),
                value: value.clone(),
            })?;
            marks.push(mark);
        }

        let place = match place_cell {
            PlaceCell::Last => cell_text(cells[cells.len() - 1]),
            PlaceCell::SecondToLast => cell_text(cells[cells.len() - 2]),
        };

        out.push(CompetitorRow {
            competitor,
            marks,
            place,
        });
    }

    Ok(out)
}

/// Collects the descendants of `parent` matching a selector literal
pub(crate) fn elements<'a>(parent: ElementRef<'a>, selector: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(selector) {
        Ok(sel) => parent.select(&sel).collect(),
        Err(_) => Vec::new(),
    }
}

/// Collects the trimmed text of the descendants matching a selector literal
pub(crate) fn texts(parent: ElementRef<'_>, selector: &str) -> Vec<String> {
    elements(parent, selector)
        .into_iter()
        .map(cell_text)
        .collect()
}

/// Full text content of one element, trimmed
pub(crate) fn cell_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
