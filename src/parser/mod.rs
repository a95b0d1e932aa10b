//! Table parser for cached score pages
//!
//! A score page carries an ordered run of `table.t1n` elements: every one
//! but the last is a result table (summary or per-dance), the last is the
//! couples/judges roster. Parsing is decoupled from crawling; it only ever
//! reads the local cache.

mod roster;
mod tables;

pub use roster::{Couple, Judge};
pub use tables::{CompetitorRow, ResultTable};

use crate::config::Config;
use crate::query::{self, UpsertStatement};
use crate::store::PageStore;
use crate::{ParseError, ParseResult, Result};
use scraper::{ElementRef, Html, Selector};

/// Everything extracted from one cached page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPage {
    pub results: Vec<ResultTable>,
    pub judges: Vec<Judge>,
    pub couples: Vec<Couple>,
}

/// Parses one cached page's markup into structured records
pub fn parse_page(html: &str) -> ParseResult<ParsedPage> {
    let document = Html::parse_document(html);

    let page_tables: Vec<ElementRef> = match Selector::parse("body > table.t1n") {
        Ok(sel) => document.select(&sel).collect(),
        Err(_) => Vec::new(),
    };

    // At minimum one result table plus the trailing roster table.
    let Some((roster_table, result_tables)) = page_tables.split_last() else {
        return Err(ParseError::TooFewTables(0));
    };
    if result_tables.is_empty() {
        return Err(ParseError::TooFewTables(page_tables.len()));
    }

    let mut results = Vec::with_capacity(result_tables.len());
    for table in result_tables {
        results.push(tables::parse_result_table(*table)?);
    }

    let (couples, judges) = roster::parse_roster(*roster_table)?;

    Ok(ParsedPage {
        results,
        judges,
        couples,
    })
}

/// Outcome of one extract run over the cache
#[derive(Debug, Default)]
pub struct ExtractOutcome {
    /// Pages parsed successfully
    pub pages: usize,

    /// Pages skipped because their layout violated a parse invariant
    pub failures: usize,

    /// Upsert statements for every successfully parsed page, in cache order
    pub statements: Vec<UpsertStatement>,
}

/// Walks the cache, parses every page, and collects upsert statements
///
/// A page that violates a structural invariant is reported and skipped;
/// the rest of the run continues. Cache read failures are surfaced as
/// errors since they mean the extract saw an incomplete cache.
pub fn run_extract(config: &Config) -> Result<ExtractOutcome> {
    let store = PageStore::new(&config.storage.cache_dir)?;
    let mut outcome = ExtractOutcome::default();

    for (index, path) in store.list()?.iter().enumerate() {
        let html = store.read(path)?;
        match parse_page(&html) {
            Ok(page) => {
                outcome.statements.extend(query::to_statements(&page));
                outcome.pages += 1;
            }
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "Skipping malformed page");
                outcome.failures += 1;
            }
        }

        if (index + 1) % 10 == 0 {
            tracing::info!(processed = index + 1, "Extract progress");
        }
    }

    tracing::info!(
        pages = outcome.pages,
        failures = outcome.failures,
        statements = outcome.statements.len(),
        "Extract complete"
    );
    Ok(outcome)
}
