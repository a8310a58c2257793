use regex::{Regex, RegexBuilder};

/// Case-insensitive allow-list of domain substrings
///
/// Each configured domain is escaped and joined into a single alternation,
/// so user-supplied entries are always matched literally: `bit.ly` matches
/// `bit.ly` and `m.bit.ly` but not `bitxly`. A match anywhere inside the
/// netloc counts.
///
/// An empty list compiles to the empty pattern, which matches every netloc.
#[derive(Debug, Clone)]
pub struct DomainMatcher {
    pattern: Regex,
    domain_count: usize,
}

impl DomainMatcher {
    /// Compiles a matcher from a list of domain strings
    ///
    /// Blank entries are skipped; duplicates are harmless.
    ///
    /// # Examples
    ///
    /// ```
    /// use unshorten::url::DomainMatcher;
    ///
    /// let matcher = DomainMatcher::new(&["bit.ly", "t.co"]).unwrap();
    /// assert!(matcher.is_match("BIT.LY"));
    /// assert!(matcher.is_match("t.co:443"));
    /// assert!(!matcher.is_match("example.com"));
    /// ```
    pub fn new<S: AsRef<str>>(domains: &[S]) -> Result<Self, regex::Error> {
        let alternatives: Vec<String> = domains
            .iter()
            .map(|d| d.as_ref().trim())
            .filter(|d| !d.is_empty())
            .map(regex::escape)
            .collect();

        let pattern = RegexBuilder::new(&format!("(?:{})", alternatives.join("|")))
            .case_insensitive(true)
            .build()?;

        Ok(Self {
            pattern,
            domain_count: alternatives.len(),
        })
    }

    /// Returns true if any configured domain occurs within `netloc`
    pub fn is_match(&self, netloc: &str) -> bool {
        self.pattern.is_match(netloc)
    }

    /// Number of non-blank domains in the allow-list
    pub fn domain_count(&self) -> usize {
        self.domain_count
    }

    pub fn is_empty(&self) -> bool {
        self.domain_count == 0
    }
}
