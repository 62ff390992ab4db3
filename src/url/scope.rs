//! Crawl scope: which URLs may be fetched
//!
//! A URL is in scope when its scheme is HTTP(S), its path does not end in a
//! blocked non-text file extension, and it falls under one of the registered
//! allowed prefixes.

use crate::url::normalize::{normalize_parsed, normalize_url, split_params};
use crate::UrlError;
use url::Url;

/// Path suffixes of formats that are never crawled (images, archives,
/// audio/video, office documents, fonts, disk images)
pub const EXCLUDED_EXTENSIONS: &[&str] = &[
    ".tiff", ".docx", ".xlsx", ".pptx", ".flac", ".aiff", ".jpeg", ".webm", ".mpeg", ".webp",
    ".iso", ".zip", ".exe", ".pdf", ".gif", ".jpg", ".png", ".bz2", ".jar", ".bmp", ".tif",
    ".cab", ".ppt", ".xls", ".doc", ".pub", ".rar", ".msi", ".deb", ".rpm", ".mp4", ".mp3",
    ".wav", ".wmv", ".ogg", ".ogv", ".m4a", ".flv", ".aac", ".dvi", ".tex", ".svg", ".eps",
    ".tgz", ".ttf", ".otf", ".img", ".dmg", ".smi", ".gz", ".ps", ".xz", ".7z", ".ai", ".z",
];

/// An allowed (network location, path prefix) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedPrefix {
    /// Network location that must match exactly
    pub netloc: String,
    /// Literal prefix of the concatenated path + params + query
    pub prefix: String,
}

impl AllowedPrefix {
    /// Builds an allowed prefix from a URL such as `https://example.org/docs/`
    pub fn parse(url_prefix: &str) -> Result<Self, UrlError> {
        let normalized = normalize_url(url_prefix)?;
        Ok(Self {
            prefix: normalized.location(),
            netloc: normalized.netloc,
        })
    }
}

/// The set of allowed prefixes for one crawl
#[derive(Debug, Clone, Default)]
pub struct Scope {
    prefixes: Vec<AllowedPrefix>,
}

impl Scope {
    /// Creates an empty scope; nothing matches until a prefix is added
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scope with one allowed prefix per seed URL
    pub fn from_seeds<S: AsRef<str>>(seeds: &[S]) -> Result<Self, UrlError> {
        let mut scope = Self::new();
        for seed in seeds {
            scope.add_prefix(seed.as_ref())?;
        }
        Ok(scope)
    }

    /// Registers an allowed URL prefix
    ///
    /// A URL is crawled if it matches one or more allowed prefixes.
    pub fn add_prefix(&mut self, url_prefix: &str) -> Result<(), UrlError> {
        let prefix = AllowedPrefix::parse(url_prefix)?;
        tracing::debug!(netloc = %prefix.netloc, prefix = %prefix.prefix, "Allowed prefix registered");
        self.prefixes.push(prefix);
        Ok(())
    }

    /// Returns the registered prefixes
    pub fn prefixes(&self) -> &[AllowedPrefix] {
        &self.prefixes
    }

    /// Checks whether `url` may be crawled
    ///
    /// True iff the scheme, extension and prefix checks all pass. Unparseable
    /// URLs never match.
    ///
    /// # Examples
    ///
    /// ```
    /// use site_search::url::Scope;
    ///
    /// let scope = Scope::from_seeds(&["https://example.org/docs/"]).unwrap();
    /// assert!(scope.matches("https://example.org/docs/guide.html"));
    /// assert!(!scope.matches("https://example.org/blog/"));
    /// assert!(!scope.matches("https://example.org/docs/manual.pdf"));
    /// assert!(!scope.matches("ftp://example.org/docs/"));
    /// ```
    pub fn matches(&self, url: &str) -> bool {
        match Url::parse(url) {
            Ok(parsed) => {
                matches_scheme(&parsed) && matches_extension(&parsed) && self.matches_prefix(&parsed)
            }
            Err(_) => false,
        }
    }

    /// Checks the network location and path prefix of a parsed URL
    pub fn matches_prefix(&self, url: &Url) -> bool {
        let Ok(normalized) = normalize_parsed(url) else {
            return false;
        };
        let location = normalized.location();

        self.prefixes
            .iter()
            .any(|p| p.netloc == normalized.netloc && location.starts_with(&p.prefix))
    }
}

/// Checks that the URL scheme is `http` or `https`
pub fn matches_scheme(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}

/// Checks that the path does not end in a blocked file extension
pub fn matches_extension(url: &Url) -> bool {
    let (path, _) = split_params(url.path());
    let path = path.to_lowercase();
    !EXCLUDED_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
}
