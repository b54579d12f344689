//! Token search over the catalog.
//!
//! A query is split into lowercase whitespace-separated tokens; an item
//! matches only if its name contains **every** token (case-insensitive).
//! Matching items are ranked by a positional bonus:
//!
//! - +3 for each token the name starts with
//! - +1 for each token found elsewhere in the name
//!
//! so a query of N tokens scores in `[N, 3N]`. Ties keep catalog order.
//!
//! The search is a pure function of `(query, items)`: it borrows the items,
//! returns references into the same slice and never mutates anything.

use crate::error::{GearCrateError, Result};
use crate::types::CatalogItem;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tokens and trimmed queries shorter than this are ignored
pub const MIN_TOKEN_LEN: usize = 2;

/// Score for a token found at the start of the name
pub const PREFIX_SCORE: u32 = 3;

/// Score for a token found anywhere else in the name
pub const INFIX_SCORE: u32 = 1;

/// Trim a raw query and decide whether a search should run at all.
///
/// Returns `None` for empty, whitespace-only and too-short queries; the
/// caller treats that as "no search" rather than "no results".
pub fn normalize_query(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.chars().count() < MIN_TOKEN_LEN {
        None
    } else {
        Some(trimmed)
    }
}

/// Split a query into lowercase tokens, dropping tokens that are too short.
pub fn tokenize(query: &str) -> Vec<String> {
    query
        .to_lowercase()
        .split_whitespace()
        .filter(|t| t.chars().count() >= MIN_TOKEN_LEN)
        .map(str::to_string)
        .collect()
}

/// Score a lowercased name against a token set.
///
/// Returns `None` if any token is missing from the name.
pub fn score(name_lower: &str, tokens: &[String]) -> Option<u32> {
    let mut total = 0;
    for token in tokens {
        if name_lower.starts_with(token.as_str()) {
            total += PREFIX_SCORE;
        } else if name_lower.contains(token.as_str()) {
            total += INFIX_SCORE;
        } else {
            return None;
        }
    }
    Some(total)
}

/// Rank-match `query` against `items` by name.
///
/// Returns the matching items, highest score first. Equal scores keep
/// their relative input order.
pub fn token_search<'a>(query: &str, items: &'a [CatalogItem]) -> Vec<&'a CatalogItem> {
    ranked(query, items)
        .into_iter()
        .map(|hit| hit.item)
        .collect()
}

/// A matching item together with its score
#[derive(Debug, Clone, Copy)]
pub struct ScoredItem<'a> {
    pub item: &'a CatalogItem,
    pub score: u32,
}

/// Like [`token_search`] but keeps the score of every hit.
pub fn ranked<'a>(query: &str, items: &'a [CatalogItem]) -> Vec<ScoredItem<'a>> {
    let tokens = tokenize(query);
    if tokens.is_empty() {
        return Vec::new();
    }

    let mut hits: Vec<ScoredItem<'a>> = items
        .iter()
        .filter_map(|item| {
            score(&item.name.to_lowercase(), &tokens).map(|score| ScoredItem { item, score })
        })
        .collect();

    // sort_by is stable
    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits
}

/// Maximum number of results shown at once.
///
/// The limit only decides how many leading results are displayed; it never
/// affects which items match or how they are ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct SearchLimit(usize);

impl SearchLimit {
    /// Default number of displayed results
    pub const DEFAULT: SearchLimit = SearchLimit(25);

    /// Create a limit; zero is rejected.
    pub fn new(limit: usize) -> Result<Self> {
        if limit == 0 {
            return Err(GearCrateError::invalid_preference(
                "search_limit",
                "must be a positive integer",
            ));
        }
        Ok(SearchLimit(limit))
    }

    /// Get the raw limit
    pub fn get(&self) -> usize {
        self.0
    }
}

impl Default for SearchLimit {
    fn default() -> Self {
        SearchLimit::DEFAULT
    }
}

impl TryFrom<usize> for SearchLimit {
    type Error = GearCrateError;

    fn try_from(value: usize) -> Result<Self> {
        SearchLimit::new(value)
    }
}

impl From<SearchLimit> for usize {
    fn from(limit: SearchLimit) -> usize {
        limit.0
    }
}

impl FromStr for SearchLimit {
    type Err = GearCrateError;

    fn from_str(s: &str) -> Result<Self> {
        let value: usize = s.trim().parse().map_err(|_| {
            GearCrateError::invalid_preference("search_limit", format!("not a number: {}", s))
        })?;
        SearchLimit::new(value)
    }
}

impl fmt::Display for SearchLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The truncated head of a ranked result set plus the true match count.
#[derive(Debug, Clone)]
pub struct SearchPage<'a> {
    /// Leading results, at most `limit` of them
    pub items: Vec<&'a CatalogItem>,

    /// Total number of matches before truncation
    pub total: usize,
}

impl<'a> SearchPage<'a> {
    /// Number of results actually shown
    pub fn shown(&self) -> usize {
        self.items.len()
    }

    /// True if more items matched than are shown
    pub fn is_truncated(&self) -> bool {
        self.total > self.items.len()
    }

    /// True if nothing matched
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Normalize, search and truncate in one step.
///
/// Returns `None` when the query is too short to search (see
/// [`normalize_query`]).
pub fn search_page<'a>(
    raw_query: &str,
    items: &'a [CatalogItem],
    limit: SearchLimit,
) -> Option<SearchPage<'a>> {
    let query = normalize_query(raw_query)?;
    let mut results = token_search(query, items);
    let total = results.len();
    results.truncate(limit.get());
    Some(SearchPage {
        items: results,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<CatalogItem> {
        vec![
            CatalogItem::new("ADP Arms Black", 1),
            CatalogItem::new("ADP Helmet Black", 0),
            CatalogItem::new("Overlord Helmet Heavy Orange", 2),
            CatalogItem::new("ADP Legs Black", 0),
        ]
    }

    fn names<'a>(results: &[&'a CatalogItem]) -> Vec<&'a str> {
        results.iter().map(|i| i.name.as_str()).collect()
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("ADP  Black"), vec!["adp", "black"]);
        assert_eq!(tokenize("a adp x"), vec!["adp"]);
        assert!(tokenize("   ").is_empty());
        assert!(tokenize("x").is_empty());
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  he "), Some("he"));
        assert_eq!(normalize_query("x"), None);
        assert_eq!(normalize_query("  "), None);
        assert_eq!(normalize_query(""), None);
    }

    #[test]
    fn test_all_tokens_required() {
        let items = catalog();
        let results = token_search("adp black", &items);
        assert_eq!(
            names(&results),
            vec!["ADP Arms Black", "ADP Helmet Black", "ADP Legs Black"]
        );
    }

    #[test]
    fn test_ties_keep_input_order() {
        let items = catalog();
        let hits = ranked("adp black", &items);
        assert!(hits.iter().all(|h| h.score == PREFIX_SCORE + INFIX_SCORE));
    }

    #[test]
    fn test_ties_keep_input_order_after_reordering() {
        let items = vec![
            CatalogItem::new("Arms ADP", 0),
            CatalogItem::new("ADP Core", 0),
            CatalogItem::new("Legs ADP", 0),
            CatalogItem::new("ADP Helmet", 0),
            CatalogItem::new("Core ADP", 0),
        ];
        let results = token_search("adp", &items);
        assert_eq!(
            names(&results),
            vec!["ADP Core", "ADP Helmet", "Arms ADP", "Legs ADP", "Core ADP"]
        );
    }

    #[test]
    fn test_match_iff_all_tokens_contained() {
        let items = catalog();
        for query in ["adp black", "he", "helmet", "overlord orange", "black tan", "lm ck"] {
            let tokens = tokenize(query);
            let results = token_search(query, &items);
            for item in &items {
                let name = item.name.to_lowercase();
                let contains_all = tokens.iter().all(|t| name.contains(t.as_str()));
                let included = results.iter().any(|r| std::ptr::eq(*r, item));
                assert_eq!(included, contains_all, "{query:?} vs {:?}", item.name);
            }
        }
    }

    #[test]
    fn test_infix_match() {
        let items = catalog();
        let hits = ranked("he", &items);
        let found: Vec<_> = hits.iter().map(|h| (h.item.name.as_str(), h.score)).collect();
        assert_eq!(
            found,
            vec![("ADP Helmet Black", 1), ("Overlord Helmet Heavy Orange", 1)]
        );
    }

    #[test]
    fn test_short_and_blank_queries() {
        let items = catalog();
        assert!(token_search("x", &items).is_empty());
        assert!(token_search("  ", &items).is_empty());
        assert!(token_search("", &items).is_empty());
    }

    #[test]
    fn test_single_item_match() {
        let items = catalog();
        let results = token_search("overlord orange heavy", &items);
        assert_eq!(names(&results), vec!["Overlord Helmet Heavy Orange"]);
    }

    #[test]
    fn test_prefix_ranks_above_infix() {
        let items = vec![
            CatalogItem::new("Heavy Helmet", 0),
            CatalogItem::new("Helmet Heavy", 0),
        ];
        let hits = ranked("helmet", &items);
        assert_eq!(hits[0].item.name, "Helmet Heavy");
        assert_eq!(hits[0].score, 3);
        assert_eq!(hits[1].score, 1);
    }

    #[test]
    fn test_results_reference_input() {
        let items = catalog();
        let results = token_search("overlord", &items);
        assert!(std::ptr::eq(results[0], &items[2]));
    }

    #[test]
    fn test_search_does_not_mutate() {
        let items = catalog();
        let before = items.clone();
        let _ = token_search("adp black", &items);
        assert_eq!(items, before);
    }

    #[test]
    fn test_deterministic() {
        let items = catalog();
        let first = names(&token_search("black", &items));
        let second = names(&token_search("black", &items));
        assert_eq!(first, second);
    }

    #[test]
    fn test_search_page_truncates_but_reports_total() {
        let items = catalog();
        let page = search_page("black", &items, SearchLimit::new(2).unwrap()).unwrap();
        assert_eq!(page.shown(), 2);
        assert_eq!(page.total, 3);
        assert!(page.is_truncated());
        assert_eq!(names(&page.items), vec!["ADP Arms Black", "ADP Helmet Black"]);
    }

    #[test]
    fn test_search_page_short_query() {
        let items = catalog();
        assert!(search_page(" a ", &items, SearchLimit::DEFAULT).is_none());
    }

    #[test]
    fn test_search_limit() {
        assert!(SearchLimit::new(0).is_err());
        assert_eq!(SearchLimit::default().get(), 25);
        assert_eq!("50".parse::<SearchLimit>().unwrap().get(), 50);
        assert!("abc".parse::<SearchLimit>().is_err());
        assert!(serde_json::from_str::<SearchLimit>("0").is_err());
    }
}
