//! Listing page URL planning.
//!
//! A category is scraped from a seed URL plus `page_count - 1` follow-up
//! pages. Seeds that already carry a `page` parameter are advanced from that
//! value; anything else gets a `pg` parameter appended.

use crate::error::{Result, ScanError};
use url::Url;

/// Query key advanced when the seed already paginates itself.
const PAGE_KEY: &str = "page";
/// Query key appended when it does not.
const APPENDED_PAGE_KEY: &str = "pg";

/// Derive the ordered listing URLs for one category.
///
/// The first entry is always the unmodified seed, even for a `page_count` of 0 or 1.
pub fn plan_page_urls(seed: &str, page_count: u32) -> Result<Vec<String>> {
    let parsed = Url::parse(seed).map_err(|e| ScanError::InvalidSeedUrl {
        url: seed.to_string(),
        reason: e.to_string(),
    })?;

    let mut urls = vec![seed.to_string()];
    let grouped = group_query_pairs(&parsed);

    if let Some((_, values)) = grouped.iter().find(|(key, _)| key == PAGE_KEY) {
        let start = values
            .first()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .unwrap_or(1);
        let pages = (1..i64::from(page_count)).map_while(|offset| start.checked_add(offset));
        for page in pages {
            urls.push(rebuild_query(&parsed, &grouped, PAGE_KEY, &page.to_string()));
        }
    } else {
        let sep = if parsed.query().is_some_and(|q| !q.is_empty()) {
            '&'
        } else {
            '?'
        };
        for page in 2..=page_count {
            urls.push(format!("{seed}{sep}{APPENDED_PAGE_KEY}={page}"));
        }
    }

    Ok(urls)
}

/// Query parameters grouped by key, keys in order of first appearance.
/// Blank values are skipped, so `page=` does not count as a page parameter.
fn group_query_pairs(url: &Url) -> Vec<(String, Vec<String>)> {
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for (key, value) in url.query_pairs().filter(|(_, value)| !value.is_empty()) {
        match grouped.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value.into_owned()),
            None => grouped.push((key.into_owned(), vec![value.into_owned()])),
        }
    }
    grouped
}

/// Re-serialize the query with `replace_key` set to the single value `value`.
/// Multi-valued keys are written as repeated pairs.
fn rebuild_query(
    parsed: &Url,
    grouped: &[(String, Vec<String>)],
    replace_key: &str,
    value: &str,
) -> String {
    let mut url = parsed.clone();
    url.set_fragment(None);
    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (key, values) in grouped {
            if key == replace_key {
                pairs.append_pair(key, value);
            } else {
                for v in values {
                    pairs.append_pair(key, v);
                }
            }
        }
    }
    url.to_string()
}
