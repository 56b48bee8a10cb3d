//! Provider card extraction from the directory search page.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use rehabmap_core::ProviderRecord;
use scraper::{ElementRef, Html, Node, Selector};

/// Every provider in the directory is in NSW.
const DIRECTORY_STATE: &str = "NSW";
const MISSING_PHONE: &str = "N/A";

static CARD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".search-result-card").expect("valid selector"));
static NAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".provider-name-heading").expect("valid selector"));
static ADDRESS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".address-block").expect("valid selector"));
static PHONE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".phone-number-value").expect("valid selector"));
static LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid selector"));

static STATE_POSTCODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bNSW\s+(\d{4})\b").expect("valid regex"));
static ANY_POSTCODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})\b").expect("valid regex"));
static SUBURB: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([A-Z\s]+?)\s+NSW\s+\d{4}").expect("valid regex"));

/// Parse every provider card on a directory page.
///
/// Cards without a provider name are skipped; every other card is kept, even
/// when two cards describe the same company. A card whose link yields an ID
/// already issued on this page gets its name-and-address key instead, so IDs
/// stay distinct. Coordinates are left empty for the geocoding stage.
#[must_use]
pub fn parse_provider_cards(html: &str, page_url: &str) -> Vec<ProviderRecord> {
    let document = Html::parse_document(html);
    let base = reqwest::Url::parse(page_url).ok();

    let mut seen_ids = HashSet::new();
    let mut records = Vec::new();

    for (index, card) in document.select(&CARD).enumerate() {
        let Some(mut record) = parse_card(card, base.as_ref()) else {
            tracing::warn!(index, "skipping provider card without a name");
            continue;
        };
        if !seen_ids.insert(record.provider_id.clone()) {
            let key = make_provider_key(&record.company_name, &record.business_address);
            tracing::debug!(
                provider_id = %record.provider_id,
                key = %key,
                "provider link shared with an earlier card; using address key"
            );
            seen_ids.insert(key.clone());
            record.provider_id = key;
        }
        records.push(record);
    }

    records
}

fn parse_card(card: ElementRef<'_>, base: Option<&reqwest::Url>) -> Option<ProviderRecord> {
    let company_name = first_text(card, &NAME).filter(|s| !s.is_empty())?;
    let business_address = card
        .select(&ADDRESS)
        .next()
        .map(address_text)
        .unwrap_or_default();
    let phone = first_text(card, &PHONE)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| MISSING_PHONE.to_string());
    let link = card
        .select(&LINK)
        .filter_map(|a| a.value().attr("href"))
        .find(|href| is_page_link(href))
        .and_then(|href| resolve_link(href, base))
        .unwrap_or_default();

    let provider_id = provider_id_from_link(&link)
        .unwrap_or_else(|| make_provider_key(&company_name, &business_address));

    Some(ProviderRecord {
        display_name: None,
        suburb: extract_suburb(&business_address).unwrap_or_default(),
        postcode: extract_postcode(&business_address).unwrap_or_default(),
        state: DIRECTORY_STATE.to_string(),
        region: String::new(),
        phone,
        provider_id,
        link,
        latitude: String::new(),
        longitude: String::new(),
        company_name,
        business_address,
    })
}

fn first_text(card: ElementRef<'_>, selector: &Selector) -> Option<String> {
    card.select(selector)
        .next()
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
}

/// Elements that start a new address line.
const LINE_ELEMENTS: &[&str] = &[
    "address", "div", "h1", "h2", "h3", "h4", "h5", "h6", "li", "p", "tr",
];

/// Joins the address block's rendered lines with commas so multi-line
/// addresses read as `Level 2, 100 George St, SYDNEY NSW 2000`.
///
/// Only `<br>` and block elements end a line; inline markup such as `<span>`
/// flows into the surrounding text.
fn address_text(block: ElementRef<'_>) -> String {
    let mut rendered = String::new();
    push_rendered_text(block, &mut rendered);
    rendered
        .lines()
        .map(|line| collapse_whitespace(line).trim_matches(',').trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn push_rendered_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(&text.replace(['\n', '\r'], " ")),
            Node::Element(_) => {
                let Some(child) = ElementRef::wrap(child) else {
                    continue;
                };
                let name = child.value().name();
                if name == "br" {
                    out.push('\n');
                } else if LINE_ELEMENTS.contains(&name) {
                    out.push('\n');
                    push_rendered_text(child, out);
                    out.push('\n');
                } else {
                    push_rendered_text(child, out);
                }
            }
            _ => {}
        }
    }
}

pub(crate) fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_page_link(href: &str) -> bool {
    let href = href.trim();
    !(href.is_empty()
        || href.starts_with('#')
        || href.starts_with("tel:")
        || href.starts_with("mailto:")
        || href.starts_with("javascript:"))
}

fn resolve_link(href: &str, base: Option<&reqwest::Url>) -> Option<String> {
    let href = href.trim();
    match reqwest::Url::parse(href) {
        Ok(url) => Some(url.to_string()),
        Err(_) => base.and_then(|b| b.join(href).ok()).map(|u| u.to_string()),
    }
}

/// Last non-empty path segment of a provider link.
pub(crate) fn provider_id_from_link(link: &str) -> Option<String> {
    let url = reqwest::Url::parse(link).ok()?;
    url.path_segments()?
        .filter(|s| !s.is_empty())
        .next_back()
        .map(str::to_owned)
}

/// Deterministic fallback ID for cards without a usable link, or whose link
/// repeats an earlier card's: SHA-256 hex of the lowercased name and address.
#[must_use]
pub fn make_provider_key(company_name: &str, business_address: &str) -> String {
    use sha2::{Digest, Sha256};
    let input = format!(
        "{}\x00{}",
        company_name.trim().to_lowercase(),
        business_address.trim().to_lowercase(),
    );
    format!("{:x}", Sha256::digest(input.as_bytes()))
}

/// Postcode following `NSW`, else the first standalone four-digit number.
pub(crate) fn extract_postcode(address: &str) -> Option<String> {
    STATE_POSTCODE
        .captures(address)
        .or_else(|| ANY_POSTCODE.captures(address))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Upper-case suburb between a comma and `NSW <postcode>`, title-cased.
pub(crate) fn extract_suburb(address: &str) -> Option<String> {
    let raw = SUBURB.captures(address)?.get(1)?.as_str().trim();
    if raw.is_empty() {
        return None;
    }
    Some(title_case(raw))
}

pub(crate) fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
