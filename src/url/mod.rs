//! URL eligibility module for Unshorten
//!
//! This module decides, per URL, whether expansion is attempted at all.
//! Two independent criteria apply, and either may be absent:
//! - a maximum URL length (in characters)
//! - an allow-list of domains matched against the URL's network location
//!
//! An absent criterion never excludes a URL.

mod domain;
mod matcher;

pub use domain::extract_netloc;
pub use matcher::DomainMatcher;

/// Result of checking a URL against the eligibility rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Eligibility {
    /// The URL should be expanded
    Eligible,
    /// The URL is longer than the configured maximum
    TooLong,
    /// The URL's netloc matches none of the allowed domains
    DomainNotAllowed,
}

impl Eligibility {
    /// Returns true if expansion should be attempted
    pub fn is_eligible(&self) -> bool {
        matches!(self, Self::Eligible)
    }
}

/// Pure predicate deciding whether a URL is worth expanding
#[derive(Debug, Clone, Default)]
pub struct EligibilityFilter {
    max_length: Option<usize>,
    domains: Option<DomainMatcher>,
}

impl EligibilityFilter {
    /// Creates a filter from an optional length limit and domain matcher
    pub fn new(max_length: Option<usize>, domains: Option<DomainMatcher>) -> Self {
        Self {
            max_length,
            domains,
        }
    }

    /// Builds a filter from raw settings, compiling the domain list
    ///
    /// # Arguments
    ///
    /// * `max_length` - Longest URL (in characters) that is still expanded
    /// * `domains` - Allowed domain substrings, `None` to allow every domain
    pub fn from_settings<S: AsRef<str>>(
        max_length: Option<usize>,
        domains: Option<&[S]>,
    ) -> Result<Self, regex::Error> {
        let domains = match domains {
            Some(list) => {
                let matcher = DomainMatcher::new(list)?;
                if matcher.is_empty() {
                    tracing::warn!("Domain allow-list is empty; every domain will be expanded");
                }
                Some(matcher)
            }
            None => None,
        };

        Ok(Self::new(max_length, domains))
    }

    /// A filter that lets every URL through
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Classifies a URL against the length and domain rules
    ///
    /// The length rule is checked first, so an over-long URL is rejected
    /// even when its domain is on the allow-list.
    ///
    /// # Examples
    ///
    /// ```
    /// use unshorten::url::{Eligibility, EligibilityFilter};
    ///
    /// let filter = EligibilityFilter::from_settings(Some(30), Some(&["bit.ly"][..])).unwrap();
    /// assert_eq!(filter.check("http://bit.ly/abc"), Eligibility::Eligible);
    /// assert_eq!(filter.check("http://example.com/abc"), Eligibility::DomainNotAllowed);
    /// assert_eq!(
    ///     filter.check("http://bit.ly/a-very-long-path-indeed"),
    ///     Eligibility::TooLong
    /// );
    /// ```
    pub fn check(&self, url: &str) -> Eligibility {
        if let Some(max_length) = self.max_length {
            if url.chars().count() > max_length {
                return Eligibility::TooLong;
            }
        }

        if let Some(domains) = &self.domains {
            if !domains.is_match(extract_netloc(url)) {
                return Eligibility::DomainNotAllowed;
            }
        }

        Eligibility::Eligible
    }

    /// Returns true if expansion should be attempted for `url`
    pub fn should_attempt(&self, url: &str) -> bool {
        self.check(url).is_eligible()
    }
}
