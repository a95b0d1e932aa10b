//! Link discovery for the three page shapes the crawl walks through
//!
//! The site declares no schema anywhere; these extractors encode the fixed
//! structural positions the markup has kept for years: event links sit in
//! table cells on the root page, placement links in the second table of the
//! `#placement` form, and the selectable page indices in the `#selCount`
//! dropdown of a scoresheet.
//!
//! Discovery order is document order, which keeps the link sequence (and so
//! the fingerprint) stable run-to-run for unchanged markup.

use scraper::{Html, Selector};

/// One heat referenced by an event page's placement links
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeatRef {
    pub event: String,
    pub heat: String,
}

/// Extracts every event link from the root page, in document order
pub fn event_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse("body td > a") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                links.push(href.to_string());
            }
        }
    }

    links
}

/// Pulls the event id out of a discovered link
///
/// Root links look like `event3.asp?event=bds2017`; the id is whatever
/// follows the first `=`, up to the next query separator.
pub fn event_id(link: &str) -> Option<String> {
    let (_, rest) = link.split_once('=')?;
    let id = rest.split('&').next().unwrap_or(rest);
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

/// Extracts the (event, heat) pairs referenced by an event page
///
/// Duplicate references to the same heat are collapsed so each heat is
/// fetched and cached exactly once per crawl.
pub fn heat_refs(html: &str) -> Vec<HeatRef> {
    let document = Html::parse_document(html);
    let mut refs: Vec<HeatRef> = Vec::new();

    if let Ok(selector) = Selector::parse("#placement form > table:nth-child(2) a") {
        for element in document.select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let Some(heat_ref) = parse_heat_href(href) else {
                continue;
            };
            if !refs.contains(&heat_ref) {
                refs.push(heat_ref);
            }
        }
    }

    refs
}

/// Parses a placement href's query string into a heat reference
fn parse_heat_href(href: &str) -> Option<HeatRef> {
    let (_, query) = href.split_once('?')?;

    let mut event = None;
    let mut heat = None;
    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        match key.as_ref() {
            "event" => event = Some(value.into_owned()),
            "heatid" => heat = Some(value.into_owned()),
            _ => {}
        }
    }

    Some(HeatRef {
        event: event?,
        heat: heat?,
    })
}

/// Reads the selectable page indices from a scoresheet's `#selCount` options
///
/// The first index always names the page that was fetched to discover the
/// options; the orchestrator never fetches it a second time. A scoresheet
/// with no dropdown is a single-page heat.
pub fn page_indices(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut indices = Vec::new();

    if let Ok(selector) = Selector::parse("#selCount > option") {
        for element in document.select(&selector) {
            if let Some(value) = element.value().attr("value") {
                indices.push(value.to_string());
            }
        }
    }

    indices
}
