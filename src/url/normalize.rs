use crate::UrlError;
use std::fmt;
use url::{ParseError, Url};

/// Identity key of a URL: everything except the scheme and the fragment
///
/// Two URLs that differ only by scheme or fragment share the same key. The key
/// is used for visited checks and frontier deduplication, never for fetching.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedUrl {
    /// Network location (`user:pass@host:port`)
    pub netloc: String,
    /// Path without the trailing `;params` of its last segment
    pub path: String,
    /// Parameters of the last path segment (text after `;`)
    pub params: String,
    /// Query string without the leading `?`
    pub query: String,
}

impl NormalizedUrl {
    /// Concatenated path, params and query, with no separators
    ///
    /// This is the string that scope prefixes are compared against.
    pub fn location(&self) -> String {
        format!("{}{}{}", self.path, self.params, self.query)
    }
}

impl fmt::Display for NormalizedUrl {
    /// Formats the key as a scheme-relative URL (`//netloc/path;params?query`)
    ///
    /// The output normalizes back to an equal key.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "//{}{}", self.netloc, self.path)?;
        if !self.params.is_empty() {
            write!(f, ";{}", self.params)?;
        }
        if !self.query.is_empty() {
            write!(f, "?{}", self.query)?;
        }
        Ok(())
    }
}

/// Parses an absolute or scheme-relative URL string
///
/// Scheme-relative strings (`//host/path`) are parsed as `http:` URLs, which
/// is enough for identity purposes since the scheme is discarded anyway.
pub fn parse_url(url_str: &str) -> Result<Url, UrlError> {
    match Url::parse(url_str) {
        Ok(url) => Ok(url),
        Err(ParseError::RelativeUrlWithoutBase) if url_str.starts_with("//") => {
            Url::parse(&format!("http:{}", url_str))
                .map_err(|e| UrlError::Parse(format!("{}: {}", url_str, e)))
        }
        Err(e) => Err(UrlError::Parse(format!("{}: {}", url_str, e))),
    }
}

/// Normalizes a URL string into its identity key
///
/// # Normalization Steps
///
/// 1. Parse the URL (absolute, or scheme-relative `//...`)
/// 2. Drop the scheme
/// 3. Drop the fragment
/// 4. Split `;params` off the last path segment
/// 5. Drop explicit default HTTP(S) ports (80, 443)
///
/// Host lowercasing and percent-encoding cleanup follow the `url` crate's
/// parser, so equal keys always serialize identically.
///
/// # Examples
///
/// ```
/// use site_search::url::normalize_url;
///
/// let a = normalize_url("http://example.com/docs/page?x=1#intro").unwrap();
/// let b = normalize_url("https://example.com/docs/page?x=1").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "//example.com/docs/page?x=1");
/// ```
pub fn normalize_url(url_str: &str) -> Result<NormalizedUrl, UrlError> {
    let url = parse_url(url_str)?;
    normalize_parsed(&url)
}

/// Normalizes an already parsed URL
pub fn normalize_parsed(url: &Url) -> Result<NormalizedUrl, UrlError> {
    let netloc = netloc(url)?;
    let (path, params) = split_params(url.path());

    Ok(NormalizedUrl {
        netloc,
        path: path.to_string(),
        params: params.to_string(),
        query: url.query().unwrap_or("").to_string(),
    })
}

/// Splits the `;params` suffix off the last segment of a path
pub(crate) fn split_params(path: &str) -> (&str, &str) {
    let segment_start = path.rfind('/').map_or(0, |i| i + 1);
    match path[segment_start..].find(';') {
        Some(offset) => {
            let split = segment_start + offset;
            (&path[..split], &path[split + 1..])
        }
        None => (path, ""),
    }
}

/// Builds the network location of a URL, keeping credentials and port
fn netloc(url: &Url) -> Result<String, UrlError> {
    let host = url
        .host_str()
        .ok_or_else(|| UrlError::MissingHost(url.to_string()))?;

    let mut netloc = String::new();
    if !url.username().is_empty() || url.password().is_some() {
        netloc.push_str(url.username());
        if let Some(password) = url.password() {
            netloc.push(':');
            netloc.push_str(password);
        }
        netloc.push('@');
    }
    netloc.push_str(host);

    // Scheme is discarded, so a port that is only the default for one of
    // http/https must not distinguish two keys. `port()` is already None for
    // the scheme's own default.
    match url.port() {
        None | Some(80) | Some(443) => {}
        Some(port) => {
            netloc.push(':');
            netloc.push_str(&port.to_string());
        }
    }

    Ok(netloc)
}
