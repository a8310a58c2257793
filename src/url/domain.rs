/// Extracts the network location (`[userinfo@]host[:port]`) from a URL string
///
/// No validation is performed: the input is split the way a generic URL
/// splitter would, so malformed URLs still yield a (possibly empty) netloc
/// that can be matched against a domain allow-list. A URL without a `//`
/// authority marker has an empty netloc.
///
/// # Examples
///
/// ```
/// use unshorten::url::extract_netloc;
///
/// assert_eq!(extract_netloc("https://bit.ly/abc"), "bit.ly");
/// assert_eq!(extract_netloc("http://t.co:8080/x?y=1"), "t.co:8080");
/// assert_eq!(extract_netloc("//goo.gl/x"), "goo.gl");
/// assert_eq!(extract_netloc("bit.ly/abc"), "");
/// ```
pub fn extract_netloc(url: &str) -> &str {
    let rest = match url.split_once(':') {
        Some((scheme, rest)) if is_scheme(scheme) => rest,
        _ => url,
    };

    match rest.strip_prefix("//") {
        Some(authority) => {
            let end = authority
                .find(|c| matches!(c, '/' | '?' | '#'))
                .unwrap_or(authority.len());
            &authority[..end]
        }
        None => "",
    }
}

/// RFC 3986 scheme: a letter followed by letters, digits, `+`, `-` or `.`
fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}
