use crate::ClassifyError;
use url::Url;

/// Query parameter addressing one item inside a collection page
pub const ITEM_INDEX_PARAM: &str = "i";

/// Query parameter selecting the page locale
pub const LOCALE_PARAM: &str = "l";

/// Locale the title patterns are written against
pub const LOCALE: &str = "en-GB";

/// Removes characters a rich-text paste may have added around a URL
///
/// # Examples
///
/// ```
/// use songbridge::url::sanitize;
///
/// assert_eq!(
///     sanitize(r" https://open.spotify.com/track/abc\?si=1 "),
///     "https://open.spotify.com/track/abc?si=1"
/// );
/// ```
pub fn sanitize(raw: &str) -> String {
    raw.trim().replace('\\', "")
}

/// Parses a raw URL and rewrites its query for deterministic page rendering
///
/// # Normalization Steps
///
/// 1. Strip backslash escapes and surrounding whitespace
/// 2. Parse the URL; reject if malformed, hostless or not HTTP(S)
/// 3. Remove the fragment
/// 4. Replace the query with `i=<index>` (only when a non-empty index was
///    given) followed by `l=en-GB`
///
/// # Examples
///
/// ```
/// use songbridge::url::normalize_url;
///
/// let url = normalize_url("https://music.apple.com/es/album/vaporize/353032605?i=353032612&ls").unwrap();
/// assert_eq!(
///     url.as_str(),
///     "https://music.apple.com/es/album/vaporize/353032605?i=353032612&l=en-GB"
/// );
/// ```
pub fn normalize_url(raw: &str) -> Result<Url, ClassifyError> {
    let cleaned = sanitize(raw);
    let mut url = Url::parse(&cleaned).map_err(|e| ClassifyError::InvalidUrl(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ClassifyError::InvalidUrl(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(ClassifyError::InvalidUrl(format!("Missing host in {}", cleaned)));
    }

    url.set_fragment(None);

    let item_index = item_index(&url);
    url.set_query(None);
    {
        let mut pairs = url.query_pairs_mut();
        if let Some(index) = &item_index {
            pairs.append_pair(ITEM_INDEX_PARAM, index);
        }
        pairs.append_pair(LOCALE_PARAM, LOCALE);
    }

    Ok(url)
}

/// Returns the non-empty item index of a URL, if any
pub fn item_index(url: &Url) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == ITEM_INDEX_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}
