use std::fmt;

/// A track identified by its name and artist
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Track {
    pub name: String,
    pub artist: String,
}

impl Track {
    pub fn new(name: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artist: artist.into(),
        }
    }

    /// Returns the canonical search phrase for this track
    ///
    /// The phrase doubles as the search cache key, so it is built verbatim from
    /// the fields with no case or whitespace folding.
    ///
    /// # Examples
    ///
    /// ```
    /// use songbridge::Track;
    ///
    /// let track = Track::new("Vaporize", "Broken Bells");
    /// assert_eq!(track.search_phrase(), r#""Vaporize" by "Broken Bells""#);
    /// ```
    pub fn search_phrase(&self) -> String {
        format!("\"{}\" by \"{}\"", self.name, self.artist)
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.search_phrase())
    }
}
