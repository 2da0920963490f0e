//! HTML metadata extraction
//!
//! This module pulls track metadata out of an already-fetched page:
//! - The `<title>` in `<head>`, matched against a service title pattern
//! - `<meta>` elements in `<head>` declaring a `music:song` relation
//!
//! Extraction is pure. A parsed [`Html`] is not `Send`, so callers parse and
//! extract in one synchronous step and drop the document before awaiting.

use crate::track::Track;
use crate::ExtractError;
use regex::Regex;
use scraper::{ElementRef, Html};

/// Relation declared by member-song metadata elements
const SONG_RELATION: &str = "music:song";

/// Parses a response body into a document tree
pub fn parse_document(body: &str) -> Html {
    Html::parse_document(body)
}

/// Returns the element children of `parent` that satisfy `predicate`
///
/// Only direct children are visited; text, comment and other non-element
/// nodes are skipped.
pub fn children_matching<'a, P>(
    parent: ElementRef<'a>,
    mut predicate: P,
) -> impl Iterator<Item = ElementRef<'a>>
where
    P: FnMut(&ElementRef<'a>) -> bool,
{
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |element| predicate(element))
}

/// Returns the element children of `parent` with the given tag name
pub fn child_elements<'a>(
    parent: ElementRef<'a>,
    tag: &'a str,
) -> impl Iterator<Item = ElementRef<'a>> {
    children_matching(parent, move |element| element.value().name() == tag)
}

/// Returns the first element child of `parent` with the given tag name
pub fn first_child_element<'a>(parent: ElementRef<'a>, tag: &'a str) -> Option<ElementRef<'a>> {
    child_elements(parent, tag).next()
}

fn head(document: &Html) -> Option<ElementRef<'_>> {
    first_child_element(document.root_element(), "head")
}

/// Extracts a track from the document title
///
/// # Arguments
///
/// * `document` - The parsed page
/// * `pattern` - Title pattern with `name` and `author` capture groups
///
/// # Returns
///
/// * `Ok(Track)` - Captured groups, verbatim
/// * `Err(ExtractError::TitleNotFound)` - No `<title>` in `<head>`
/// * `Err(ExtractError::TitlePatternMismatch)` - Title doesn't match
///
/// # Example
///
/// ```
/// use regex::Regex;
/// use songbridge::resolver::{extract_track, parse_document};
///
/// let document = parse_document(
///     "<html><head><title>Vaporize - song and lyrics by Broken Bells | Spotify</title></head></html>",
/// );
/// let pattern = Regex::new(r"(?P<name>.+) - song and lyrics by (?P<author>.+) \| Spotify").unwrap();
/// let track = extract_track(&document, &pattern).unwrap();
/// assert_eq!(track.name, "Vaporize");
/// assert_eq!(track.artist, "Broken Bells");
/// ```
pub fn extract_track(document: &Html, pattern: &Regex) -> Result<Track, ExtractError> {
    let title = head(document)
        .and_then(|head| first_child_element(head, "title"))
        .ok_or(ExtractError::TitleNotFound)?;

    let text: String = title.text().collect();
    let captures = pattern
        .captures(&text)
        .ok_or_else(|| ExtractError::TitlePatternMismatch(text.clone()))?;

    match (captures.name("name"), captures.name("author")) {
        (Some(name), Some(author)) => Ok(Track::new(name.as_str(), author.as_str())),
        _ => Err(ExtractError::TitlePatternMismatch(text.clone())),
    }
}

/// Lazily collects up to `max` member-song URLs in document order
///
/// Both `name="music:song"` and `property="music:song"` spellings are
/// recognized; the URL is read from `content`. Fewer than `max` results is
/// not an error.
pub fn extract_member_links(document: &Html, max: usize) -> impl Iterator<Item = String> + '_ {
    head(document)
        .into_iter()
        .flat_map(|head| child_elements(head, "meta"))
        .filter(is_song_meta)
        .filter_map(|meta| meta.value().attr("content").map(str::to_string))
        .take(max)
}

fn is_song_meta(meta: &ElementRef<'_>) -> bool {
    let element = meta.value();
    element.attr("name") == Some(SONG_RELATION) || element.attr("property") == Some(SONG_RELATION)
}

/// Parses a body and extracts its track in one step
pub fn track_from_body(body: &str, pattern: &Regex) -> Result<Track, ExtractError> {
    extract_track(&parse_document(body), pattern)
}

/// Parses a body and collects up to `max` member links in one step
pub fn member_links_from_body(body: &str, max: usize) -> Vec<String> {
    extract_member_links(&parse_document(body), max).collect()
}
