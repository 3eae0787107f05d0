//! Permissive URL splitting.
//!
//! Two views of the same input. `UrlParts::parse` splits like a generic URI
//! parser: without `//` there is no authority, so a bare domain such as
//! `example.com/login` is entirely path. `lenient_netloc` instead recovers a
//! host from scheme-less input for the public suffix split. Nothing is
//! normalized or rejected; components are raw slices of the input.

/// Raw components of a URL-ish string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParts<'a> {
    pub scheme: &'a str,
    pub netloc: &'a str,
    pub path: &'a str,
    /// `;params` of the last path segment, split off for hierarchical schemes
    pub params: &'a str,
    pub query: &'a str,
    pub fragment: &'a str,
}

impl<'a> UrlParts<'a> {
    pub fn parse(input: &'a str) -> Self {
        // Leading control characters and spaces are not part of the URL
        let rest = input.trim_start_matches(|c: char| c <= ' ');

        let (scheme, rest) = split_scheme(rest).unwrap_or(("", rest));

        let (netloc, rest) = match rest.strip_prefix("//") {
            Some(after) => after.split_at(authority_end(after)),
            None => ("", rest),
        };

        let (rest, fragment) = match rest.split_once('#') {
            Some((before, fragment)) => (before, fragment),
            None => (rest, ""),
        };
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, query),
            None => (rest, ""),
        };
        let (path, params) = if uses_params(scheme) {
            split_params(path)
        } else {
            (path, "")
        };

        Self {
            scheme,
            netloc,
            path,
            params,
            query,
            fragment,
        }
    }

    /// Count of non-empty `/`-separated path segments
    pub fn path_depth(&self) -> usize {
        self.path.split('/').filter(|segment| !segment.is_empty()).count()
    }
}

/// Network location as seen by a lenient host extractor: an optional
/// `scheme://` or `//` prefix is dropped and the rest is cut at the first
/// `/`, `?` or `#`. Scheme-less input like `example.com:8080/x` yields
/// `example.com:8080`. Userinfo and port are left for the caller to strip.
pub fn lenient_netloc(input: &str) -> &str {
    let trimmed = input.trim();

    let schemeless = match trimmed.find("//") {
        Some(0) => &trimmed[2..],
        Some(idx)
            if idx >= 2
                && trimmed[..idx].ends_with(':')
                && trimmed[..idx - 1].chars().all(is_scheme_char) =>
        {
            &trimmed[idx + 2..]
        }
        _ => trimmed,
    };

    &schemeless[..authority_end(schemeless)]
}

fn authority_end(s: &str) -> usize {
    s.find(|c| matches!(c, '/' | '?' | '#')).unwrap_or(s.len())
}

/// Schemes whose last path segment may carry `;params`
const PARAM_SCHEMES: [&str; 15] = [
    "", "ftp", "hdl", "prospero", "http", "imap", "https", "shttp", "rtsp", "rtspu", "sip",
    "sips", "mms", "sftp", "tel",
];

fn uses_params(scheme: &str) -> bool {
    PARAM_SCHEMES
        .iter()
        .any(|known| known.eq_ignore_ascii_case(scheme))
}

fn split_params(path: &str) -> (&str, &str) {
    let last_segment = path.rfind('/').unwrap_or(0);
    match path[last_segment..].find(';') {
        Some(idx) => {
            let at = last_segment + idx;
            (&path[..at], &path[at + 1..])
        }
        None => (path, ""),
    }
}

fn is_scheme_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')
}

/// Split off `scheme:` whenever the text before the first `:` is a valid
/// scheme token, including `localhost:8080` style input.
fn split_scheme(input: &str) -> Option<(&str, &str)> {
    let (candidate, rest) = input.split_once(':')?;

    let mut chars = candidate.chars();
    let first = chars.next()?;
    if first.is_ascii_alphabetic() && chars.all(is_scheme_char) {
        Some((candidate, rest))
    } else {
        None
    }
}
