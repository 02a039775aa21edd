//! Field extraction from IMDb title pages.
//!
//! IMDb has served two markup layouts for the same facts:
//!
//! - **classic**: a `<div class="txt-block">` holding an `<h4 class="inline">`
//!   label ("Budget:", "Runtime:", ...) followed by the value as loose text or
//!   links
//! - **metadata list**: an `<li data-testid="title-boxoffice-budget">` row with
//!   a label span and an `ipc-metadata-list-item__content-container` div
//!
//! Every extractor tries both layouts and returns `None` when neither yields a
//! usable value. Extractors are independent of one another: a broken budget
//! row says nothing about the runtime.

use crate::document::{DetailNode, normalize_whitespace};
use regex::Regex;
use std::sync::LazyLock;

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("digit pattern is valid"));

/// "1h 21m", "2h30m", "2 hours", "1 hour 5 minutes"
static HOURS_MINUTES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*h(?:ours?|rs?)?(?:\s*(\d+)\s*m)?").expect("hours pattern is valid")
});

/// "81 min", "81min"
static MINUTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*min").expect("minutes pattern is valid"));

/// Trailing release year on a page title: "Toy Story (1995)"
static TRAILING_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\(\d{4}\)\s*$").expect("year pattern is valid"));

const CONTENT_CONTAINER: (&str, &str) = ("class", "ipc-metadata-list-item__content-container");

const DIRECTOR_LABELS: &[&str] = &["Director:", "Directors:"];
const BUDGET_LABELS: &[&str] = &["Budget:"];
const GROSS_LABELS: &[&str] = &["Cumulative Worldwide Gross:"];
const RUNTIME_LABELS: &[&str] = &["Runtime:"];

const BUDGET_TESTID: &str = "title-boxoffice-budget";
const GROSS_TESTID: &str = "title-boxoffice-cumulativeworldwidegross";
const RUNTIME_TESTID: &str = "title-techspec_runtime";
const CREDIT_TESTID: &str = "title-pc-principal-credit";

/// Page title without its trailing "(YYYY)"
pub fn extract_title<N: DetailNode>(root: &N) -> Option<String> {
    let heading = root.find_first("h1", &[])?;
    let text = heading.text_content();
    let title = TRAILING_YEAR.replace(&text, "");
    let title = normalize_whitespace(&title);
    (!title.is_empty()).then_some(title)
}

/// First credited director
pub fn extract_director<N: DetailNode>(root: &N) -> Option<String> {
    classic_director(root)
        .or_else(|| listed_director(root))
        .filter(|name| !name.is_empty())
}

pub fn extract_budget<N: DetailNode>(root: &N) -> Option<u64> {
    labeled_text(root, BUDGET_LABELS, BUDGET_TESTID).and_then(|text| parse_money(&text))
}

/// Cumulative worldwide gross
pub fn extract_gross<N: DetailNode>(root: &N) -> Option<u64> {
    labeled_text(root, GROSS_LABELS, GROSS_TESTID).and_then(|text| parse_money(&text))
}

/// Runtime in minutes; zero is treated as missing
pub fn extract_runtime<N: DetailNode>(root: &N) -> Option<u32> {
    if let Some(time) = root
        .find_first("div", &[("class", "title_wrapper")])
        .and_then(|wrapper| wrapper.find_first("time", &[]))
    {
        if let Some(minutes) = parse_runtime(&time.text_content()) {
            return Some(minutes);
        }
    }
    labeled_text(root, RUNTIME_LABELS, RUNTIME_TESTID).and_then(|text| parse_runtime(&text))
}

/// Parse an amount of money out of surrounding prose.
///
/// Thousands separators and currency symbols are removed, then the first run
/// of digits is taken: `"$55,000,000 (estimated)"` -> `55000000`.
pub fn parse_money(text: &str) -> Option<u64> {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != ',' && !is_currency_symbol(*c))
        .collect();
    DIGITS.find(&cleaned)?.as_str().parse().ok()
}

/// Parse a runtime in minutes from "81 min", "1h 21m", "1 hour 21 minutes"
/// or, failing those, the first run of digits.
pub fn parse_runtime(text: &str) -> Option<u32> {
    let minutes = if let Some(caps) = HOURS_MINUTES.captures(text) {
        let hours: u32 = caps[1].parse().ok()?;
        let extra: u32 = match caps.get(2) {
            Some(m) => m.as_str().parse().ok()?,
            None => 0,
        };
        hours.checked_mul(60)?.checked_add(extra)?
    } else if let Some(caps) = MINUTES.captures(text) {
        caps[1].parse().ok()?
    } else {
        DIGITS.find(text)?.as_str().parse().ok()?
    };
    (minutes > 0).then_some(minutes)
}

fn is_currency_symbol(c: char) -> bool {
    matches!(c, '$' | '€' | '£' | '¥' | '₹' | '₽' | '₩')
}

/// Value text for a labeled fact, from whichever layout the page uses
fn labeled_text<N: DetailNode>(root: &N, labels: &[&str], testid: &str) -> Option<String> {
    classic_text(root, labels)
        .or_else(|| listed_text(root, testid))
        .filter(|text| !text.is_empty())
}

/// The `h4.inline` label whose text starts with one of `labels`
fn classic_label<N: DetailNode>(root: &N, labels: &[&str]) -> Option<N> {
    root.find_all("h4", &[("class", "inline")])
        .into_iter()
        .find(|label| {
            let text = label.text_content();
            labels.iter().any(|wanted| text.starts_with(wanted))
        })
}

/// Text of the block around a classic label, with the label removed
fn classic_text<N: DetailNode>(root: &N, labels: &[&str]) -> Option<String> {
    let label = classic_label(root, labels)?;
    let label_text = label.text_content();
    let block = label.parent_node()?.text_content();

    let value = match block.find(&label_text) {
        Some(at) => &block[at + label_text.len()..],
        None => block.as_str(),
    };
    Some(value.trim().to_string())
}

/// Content text of a metadata-list row
fn listed_text<N: DetailNode>(root: &N, testid: &str) -> Option<String> {
    let row = root.find_first("li", &[("data-testid", testid)])?;
    match row.find_first("div", &[CONTENT_CONTAINER]) {
        Some(content) => Some(content.text_content()),
        None => Some(row.text_content()),
    }
}

/// Classic layout: first link following the "Director:" label
fn classic_director<N: DetailNode>(root: &N) -> Option<String> {
    let label = classic_label(root, DIRECTOR_LABELS)?;
    let mut sibling = label.next_sibling_element();
    while let Some(node) = sibling {
        if node.tag_name() == "a" {
            return Some(node.text_content());
        }
        sibling = node.next_sibling_element();
    }
    None
}

/// Metadata-list layout: first name in the principal credit row labeled "Director"
fn listed_director<N: DetailNode>(root: &N) -> Option<String> {
    root.find_all("li", &[("data-testid", CREDIT_TESTID)])
        .into_iter()
        .find(|row| row.text_content().starts_with("Director"))
        .and_then(|row| {
            let content = row.find_first("div", &[CONTENT_CONTAINER])?;
            content.find_first("a", &[])
        })
        .map(|name| name.text_content())
}
