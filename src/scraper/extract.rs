// extract.rs
//
// Field extraction for one listing detail page. Every field has its own
// function returning an Option; none of them can stop the others.

use crate::domain::listing::parse_listing_date;
use crate::scraper::models::ListingFields;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::BTreeSet;
use std::sync::OnceLock;

const FEATURES_MARKER: &str = "Features And Amenities";
const UTILITIES_MARKER: &str = "Utilities";
const CREATED_AT_MARKER: &str = "Created At";
const SECTION_ARTIFACTS: [&str; 2] = ["Internal features", "External features"];

fn price_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"KSh\s?[\d,]+").unwrap())
}

fn location_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\bin\s+(.+)").unwrap())
}

fn integer_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+").unwrap())
}

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d[\d,]*(?:\.\d+)?").unwrap())
}

fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{1,2}\s\w+\s\d{4}").unwrap())
}

/// Runs every field extractor over a detail page.
pub fn extract_listing(html: &str) -> ListingFields {
    let document = Html::parse_document(html);
    let body_text = visible_text(&document);
    let spans = span_fragments(&document);

    let mut amenities = feature_items(&document);
    amenities.extend(utility_chips(&document));

    ListingFields {
        price_kes: extract_price(&body_text),
        location: primary_heading(&document).and_then(|h| extract_location(&h)),
        bedrooms: extract_bedrooms(&spans),
        bathrooms: extract_bathrooms(&spans),
        size_sqm: extract_size(&spans),
        amenities: normalize_amenities(amenities),
        listing_date: extract_listing_date(&document),
    }
}

// ---------------- PRICE ----------------

/// First "KSh 12,500"-style amount in the text, digits only.
pub fn extract_price(text: &str) -> Option<u64> {
    let found = price_re().find(text)?;
    let digits: String = found.as_str().chars().filter(char::is_ascii_digit).collect();
    digits.parse::<u64>().ok().filter(|p| *p > 0)
}

// ---------------- LOCATION ----------------

/// "3 Bedroom Apartment in Kilimani" -> "Kilimani"
pub fn extract_location(heading: &str) -> Option<String> {
    let caps = location_re().captures(heading)?;
    let location = caps.get(1)?.as_str().trim();
    (!location.is_empty()).then(|| location.to_string())
}

fn primary_heading(document: &Html) -> Option<String> {
    let h1 = Selector::parse("h1").ok()?;
    document.select(&h1).next().map(element_text)
}

// ---------------- DETAILS ----------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DetailKind {
    Bedrooms,
    Bathrooms,
    Size,
}

// A fragment counts for one kind only, checked in this order.
fn classify(fragment: &str) -> Option<DetailKind> {
    if fragment.contains("Bedroom") {
        Some(DetailKind::Bedrooms)
    } else if fragment.contains("Bathroom") {
        Some(DetailKind::Bathrooms)
    } else if fragment.contains("m²") {
        Some(DetailKind::Size)
    } else {
        None
    }
}

fn fragments_of<'a, S: AsRef<str>>(
    fragments: &'a [S],
    kind: DetailKind,
) -> impl Iterator<Item = &'a str> {
    fragments
        .iter()
        .map(AsRef::as_ref)
        .filter(move |f| classify(f) == Some(kind))
}

pub fn extract_bedrooms<S: AsRef<str>>(fragments: &[S]) -> Option<u32> {
    fragments_of(fragments, DetailKind::Bedrooms).find_map(first_integer)
}

pub fn extract_bathrooms<S: AsRef<str>>(fragments: &[S]) -> Option<f64> {
    fragments_of(fragments, DetailKind::Bathrooms).find_map(first_number)
}

pub fn extract_size<S: AsRef<str>>(fragments: &[S]) -> Option<f64> {
    fragments_of(fragments, DetailKind::Size)
        .find_map(first_number)
        .filter(|s| *s > 0.0)
}

fn first_integer(text: &str) -> Option<u32> {
    integer_re().find(text)?.as_str().parse().ok()
}

fn first_number(text: &str) -> Option<f64> {
    let raw = number_re().find(text)?.as_str().replace(',', "");
    raw.parse().ok()
}

fn span_fragments(document: &Html) -> Vec<String> {
    match Selector::parse("span") {
        Ok(span) => document
            .select(&span)
            .map(element_text)
            .filter(|t| !t.is_empty())
            .collect(),
        Err(_) => Vec::new(),
    }
}

// ---------------- DATE ----------------

/// Looks at the "Created At" label, then its parent when the date sits in
/// a sibling element.
pub fn extract_listing_date(document: &Html) -> Option<chrono::NaiveDate> {
    let label = find_by_own_text(document, CREATED_AT_MARKER)?;

    std::iter::once(label)
        .chain(label.parent().and_then(ElementRef::wrap))
        .find_map(|el| parse_created_at(&element_text(el)))
}

pub fn parse_created_at(text: &str) -> Option<chrono::NaiveDate> {
    let found = date_re().find(text)?;
    parse_listing_date(found.as_str())
}

// ---------------- AMENITIES ----------------

/// List items after the "Features And Amenities" label. Sub-sections stay
/// in; a heading at the label's own level or above ends the list.
fn feature_items(document: &Html) -> Vec<String> {
    let mut items = Vec::new();
    // Some(level of the label); 0 when the label isn't a heading, so nothing ends it
    let mut section: Option<u8> = None;

    for el in document.root_element().descendants().filter_map(ElementRef::wrap) {
        let Some(label_level) = section else {
            if own_text(el).contains(FEATURES_MARKER) {
                section = Some(heading_level(el).unwrap_or(0));
            }
            continue;
        };

        if heading_level(el).is_some_and(|level| level <= label_level) {
            break;
        }

        if el.value().name() == "li" {
            let text = element_text(el);
            if !SECTION_ARTIFACTS.contains(&text.as_str()) {
                items.push(text);
            }
        }
    }

    items
}

/// Chip labels inside the div that holds the "Utilities" label.
fn utility_chips(document: &Html) -> Vec<String> {
    let Some(label) = find_by_own_text(document, UTILITIES_MARKER) else {
        return Vec::new();
    };

    let Some(section) = label
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == "div")
    else {
        return Vec::new();
    };

    let Ok(span) = Selector::parse("span") else {
        return Vec::new();
    };

    section
        .select(&span)
        .filter(|chip| chip.id() != label.id())
        .map(element_text)
        .filter(|t| !t.contains(UTILITIES_MARKER))
        .filter(|t| !SECTION_ARTIFACTS.contains(&t.as_str()))
        .collect()
}

/// Splits comma lists into single tags, drops blanks, de-duplicates and
/// sorts. No tag contains the table's ", " separator.
pub fn normalize_amenities<I>(raw: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = String>,
{
    raw.into_iter()
        .flat_map(|a| {
            a.split(',')
                .map(collapse_whitespace)
                .collect::<Vec<_>>()
        })
        .filter(|a| !a.is_empty())
        .collect()
}

// ---------------- DOM HELPERS ----------------

/// Collapsed text of an element and its descendants.
fn element_text(el: ElementRef) -> String {
    collapse_whitespace(&el.text().collect::<Vec<_>>().join(" "))
}

/// Text nodes directly under the element, ignoring descendants.
fn own_text(el: ElementRef) -> String {
    let parts: Vec<&str> = el
        .children()
        .filter_map(|child| child.value().as_text())
        .map(|t| &**t)
        .collect();
    collapse_whitespace(&parts.join(" "))
}

fn find_by_own_text<'a>(document: &'a Html, needle: &str) -> Option<ElementRef<'a>> {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|el| own_text(*el).contains(needle))
}

fn heading_level(el: ElementRef) -> Option<u8> {
    match el.value().name() {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// Body text without script/style contents, one line per text node.
fn visible_text(document: &Html) -> String {
    document
        .root_element()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let parent = node.parent()?;
            match parent.value() {
                Node::Element(e) if matches!(e.name(), "script" | "style" | "noscript") => None,
                _ => Some(collapse_whitespace(text)),
            }
        })
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
