//! Competitor name normalisation.
//!
//! The fixture feed spells clubs with their registered suffixes
//! ("Arsenal FC", "AFC Bournemouth"), while rankings, predictions and the UI
//! use the short canonical form ("Arsenal", "Bournemouth"). Every lookup in
//! the scoring path goes through [`NameNormalizer::to_canonical`] first.
//!
//! Unknown names are never an error: they come back untouched and the
//! strength classifier deals with them.

use std::collections::HashMap;

/// Feed name → canonical name for the built-in season.
pub const BUILTIN_FEED_NAMES: &[(&str, &str)] = &[
    ("Arsenal FC", "Arsenal"),
    ("Aston Villa FC", "Aston Villa"),
    ("AFC Bournemouth", "Bournemouth"),
    ("Brentford FC", "Brentford"),
    ("Brighton & Hove Albion FC", "Brighton & Hove Albion"),
    ("Burnley FC", "Burnley"),
    ("Chelsea FC", "Chelsea"),
    ("Crystal Palace FC", "Crystal Palace"),
    ("Everton FC", "Everton"),
    ("Fulham FC", "Fulham"),
    ("Leeds United FC", "Leeds United"),
    ("Liverpool FC", "Liverpool"),
    ("Manchester City FC", "Manchester City"),
    ("Manchester United FC", "Manchester United"),
    ("Newcastle United FC", "Newcastle United"),
    ("Nottingham Forest FC", "Nottingham Forest"),
    ("Sunderland AFC", "Sunderland"),
    ("Tottenham Hotspur FC", "Tottenham Hotspur"),
    ("West Ham United FC", "West Ham United"),
    ("Wolverhampton Wanderers FC", "Wolverhampton Wanderers"),
];

/// Club-suffix tokens stripped from either end of a name.
const TRAILING_TOKENS: &[&str] = &[" FC", " AFC", " F.C."];
const LEADING_TOKENS: &[&str] = &["AFC ", "FC "];

/// Bidirectional feed/canonical name table.
#[derive(Debug, Clone)]
pub struct NameNormalizer {
    /// lowercased feed name → canonical name
    feed_to_canonical: HashMap<String, String>,
    /// lowercased canonical name → canonical name
    canonical: HashMap<String, String>,
    /// canonical name → feed name
    canonical_to_feed: HashMap<String, String>,
}

impl NameNormalizer {
    /// Build a normaliser from `(feed_name, canonical_name)` pairs.
    pub fn new<I, F, C>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (F, C)>,
        F: Into<String>,
        C: Into<String>,
    {
        let mut feed_to_canonical = HashMap::new();
        let mut canonical = HashMap::new();
        let mut canonical_to_feed = HashMap::new();

        for (feed, canon) in pairs {
            let feed: String = feed.into();
            let canon: String = canon.into();
            feed_to_canonical.insert(key(&feed), canon.clone());
            canonical.insert(key(&canon), canon.clone());
            canonical_to_feed.insert(canon, feed);
        }

        NameNormalizer {
            feed_to_canonical,
            canonical,
            canonical_to_feed,
        }
    }

    pub fn builtin() -> Self {
        Self::new(BUILTIN_FEED_NAMES.iter().copied())
    }

    /// Map any spelling of a competitor to its canonical short name.
    ///
    /// Returns either a canonical name or `name` exactly as given, so
    /// `to_canonical(to_canonical(x)) == to_canonical(x)`.
    pub fn to_canonical(&self, name: &str) -> String {
        if let Some(found) = self.lookup(name.trim()) {
            return found.to_string();
        }
        let stripped = strip_club_tokens(name);
        if let Some(found) = self.lookup(stripped) {
            return found.to_string();
        }
        name.to_string()
    }

    /// Map a canonical name back to the feed's long form.
    pub fn to_feed(&self, name: &str) -> String {
        let canonical = self.to_canonical(name);
        self.canonical_to_feed
            .get(&canonical)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    pub fn len(&self) -> usize {
        self.canonical_to_feed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical_to_feed.is_empty()
    }

    fn lookup(&self, name: &str) -> Option<&str> {
        let k = key(name);
        self.canonical
            .get(&k)
            .or_else(|| self.feed_to_canonical.get(&k))
            .map(String::as_str)
    }
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Strip one leading and one trailing club-suffix token, then trim.
///
/// "Sunderland AFC" → "Sunderland", "AFC Bournemouth" → "Bournemouth".
pub fn strip_club_tokens(name: &str) -> &str {
    let mut s = name.trim();
    for token in TRAILING_TOKENS {
        if let Some(rest) = s.strip_suffix(token) {
            s = rest;
            break;
        }
    }
    for token in LEADING_TOKENS {
        if let Some(rest) = s.strip_prefix(token) {
            s = rest;
            break;
        }
    }
    s.trim()
}

fn key(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}
