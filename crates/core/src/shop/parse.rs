//! HTML extraction for the shop's pages.
//!
//! Pure functions over page source so the selectors stay testable without a
//! live site.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::catalog::ReleaseSummary;

use super::ReleaseDetails;

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("valid selector"));
static LISTING_ENTRY: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.linebig").expect("valid selector"));
static IMG: Lazy<Selector> = Lazy::new(|| Selector::parse("img").expect("valid selector"));
static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").expect("valid selector"));

/// Release paths start with a numeric id, e.g. `/12345-some-release/`.
fn is_release_path(href: &str) -> bool {
    let id: Vec<char> = href.chars().skip(1).take(5).collect();
    href.starts_with('/') && id.len() == 5 && id.iter().all(|c| c.is_ascii_digit())
}

fn absolute(base_url: &str, href: &str) -> String {
    if href.starts_with('/') {
        format!("{}{}", base_url.trim_end_matches('/'), href)
    } else {
        href.to_string()
    }
}

/// Artist and title from one listing entry.
///
/// The entry holds an artist element (text ending with a colon) followed by
/// the title as a bare text node.
fn parse_entry(entry: ElementRef<'_>) -> Option<(String, String)> {
    let artist_el = entry.children().find_map(ElementRef::wrap)?;
    let artist = artist_el
        .text()
        .collect::<String>()
        .trim()
        .trim_end_matches(':')
        .to_string();

    let title = entry
        .children()
        .filter_map(|node| node.value().as_text().map(|t| t.to_string()))
        .collect::<String>()
        .trim()
        .to_string();

    if artist.is_empty() || title.is_empty() {
        return None;
    }
    Some((artist, title))
}

/// Releases on a listing page, in page order.
///
/// Release links are collected separately from the name entries and zipped;
/// the page interleaves them but always in matching order.
pub fn parse_listing(html: &str, base_url: &str) -> Vec<ReleaseSummary> {
    let doc = Html::parse_document(html);

    let mut links: Vec<String> = Vec::new();
    for anchor in doc.select(&ANCHOR) {
        if let Some(href) = anchor.value().attr("href") {
            if is_release_path(href) && !links.iter().any(|l| l == href) {
                links.push(href.to_string());
            }
        }
    }

    let names = doc.select(&LISTING_ENTRY).filter_map(parse_entry);

    links
        .into_iter()
        .zip(names)
        .map(|(href, (artist, title))| ReleaseSummary {
            link: absolute(base_url, &href),
            artist,
            title,
        })
        .collect()
}

/// Track titles from a release page, page order, de-duplicated without
/// regard to case. Preview clips are not tracks.
pub fn parse_tracks(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);

    let mut seen: Vec<String> = Vec::new();
    let mut tracks: Vec<String> = Vec::new();

    for anchor in doc.select(&ANCHOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(title) = anchor.value().attr("title") else {
            continue;
        };
        if !href.contains(".mp3") || href.contains("clip") {
            continue;
        }
        let upper = title.to_uppercase();
        if seen.contains(&upper) {
            continue;
        }
        seen.push(upper);
        tracks.push(title.to_string());
    }

    tracks
}

/// Cover image URLs from a release page. The shop serves thumbnails and full
/// covers; only the latter carry `big` in the URL.
pub fn parse_images(html: &str, base_url: &str) -> Vec<String> {
    let doc = Html::parse_document(html);

    doc.select(&IMG)
        .filter_map(|img| img.value().attr("src"))
        .filter(|src| src.contains("big"))
        .map(|src| absolute(base_url, src))
        .collect()
}

/// Display metadata from a release page.
///
/// The page title is `"Artist: Title - <shop name>"`; the label is the last
/// anchor pointing into the label index.
pub fn parse_details(html: &str) -> Option<ReleaseDetails> {
    let doc = Html::parse_document(html);

    let page_title: String = doc.select(&TITLE).next()?.text().collect();
    let page_title = page_title.trim();
    let display = page_title
        .rsplit_once(" - ")
        .map(|(name, _)| name)
        .unwrap_or(page_title);

    let (artist, title) = display.split_once(':')?;
    let title = format!("{}: {}", artist.trim(), title.trim());

    let label = doc
        .select(&ANCHOR)
        .filter(|a| a.value().attr("href").is_some_and(|h| h.contains("/label/")))
        .filter_map(|a| {
            let text = a.text().collect::<String>().trim().to_string();
            (!text.is_empty()).then_some(text)
        })
        .last()?;

    Some(ReleaseDetails { title, label })
}
