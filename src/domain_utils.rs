use lazy_static::lazy_static;
use regex::Regex;
use std::net::Ipv6Addr;

lazy_static! {
    static ref IPV4_LITERAL: Regex = Regex::new(r"^\d{1,3}(\.\d{1,3}){3}$").unwrap();
}

/// A host split around its public suffix
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainParts {
    pub subdomain: String,
    pub registered_domain: String,
    pub suffix: String,
}

impl DomainParts {
    /// Number of dot-separated labels left of the registered domain
    pub fn subdomain_count(&self) -> usize {
        if self.subdomain.is_empty() {
            0
        } else {
            self.subdomain.split('.').count()
        }
    }
}

/// Domain hierarchy utilities
pub struct DomainUtils;

impl DomainUtils {
    /// Strip userinfo and port from a network location and lowercase the host
    pub fn host_from_netloc(netloc: &str) -> String {
        let without_userinfo = match netloc.rfind('@') {
            Some(idx) => &netloc[idx + 1..],
            None => netloc,
        };

        let host = if let Some(bracketed) = without_userinfo.strip_prefix('[') {
            match bracketed.find(']') {
                Some(end) => &bracketed[..end],
                None => bracketed,
            }
        } else {
            match without_userinfo.rfind(':') {
                Some(idx)
                    if without_userinfo[idx + 1..]
                        .chars()
                        .all(|c| c.is_ascii_digit()) =>
                {
                    &without_userinfo[..idx]
                }
                _ => without_userinfo,
            }
        };

        host.trim_end_matches('.').to_lowercase()
    }

    /// Check for a bare dotted-quad literal
    pub fn is_ipv4_literal(domain: &str) -> bool {
        IPV4_LITERAL.is_match(domain)
    }

    pub fn is_ip_literal(host: &str) -> bool {
        Self::is_ipv4_literal(host) || host.parse::<Ipv6Addr>().is_ok()
    }

    /// Decompose a lowercased host into subdomain, registered domain and
    /// ICANN public suffix.
    ///
    /// Hosts whose suffix is not on the list have no registrable part: the
    /// last label is treated as the domain and everything before it as
    /// subdomain. IP literals are their own registered domain.
    pub fn split_public_suffix(host: &str) -> DomainParts {
        if host.is_empty() {
            return DomainParts::default();
        }

        if Self::is_ip_literal(host) {
            return DomainParts {
                registered_domain: host.to_string(),
                ..Default::default()
            };
        }

        let suffix = match Self::icann_suffix(host) {
            Some(suffix) => suffix,
            None => {
                let subdomain = host
                    .rsplit_once('.')
                    .map(|(sub, _)| sub.to_string())
                    .unwrap_or_default();
                return DomainParts {
                    subdomain,
                    ..Default::default()
                };
            }
        };

        let prefix = host
            .strip_suffix(suffix)
            .and_then(|p| p.strip_suffix('.'))
            .unwrap_or("");

        let (subdomain, label) = match prefix.rsplit_once('.') {
            Some((sub, label)) => (sub, label),
            None => ("", prefix),
        };

        if label.is_empty() {
            return DomainParts {
                subdomain: subdomain.to_string(),
                suffix: suffix.to_string(),
                ..Default::default()
            };
        }

        DomainParts {
            subdomain: subdomain.to_string(),
            registered_domain: format!("{}.{}", label, suffix),
            suffix: suffix.to_string(),
        }
    }

    /// Longest matching ICANN suffix; private-section entries such as
    /// `github.io` are walked up to their ICANN parent.
    fn icann_suffix(host: &str) -> Option<&str> {
        let mut candidate = host;
        loop {
            let suffix = psl::suffix(candidate.as_bytes())?;
            if !suffix.is_known() {
                return None;
            }

            let matched = candidate.get(candidate.len() - suffix.as_bytes().len()..)?;
            match suffix.typ() {
                Some(psl::Type::Private) => {
                    let (_, parent) = matched.split_once('.')?;
                    candidate = parent;
                }
                _ => return Some(matched),
            }
        }
    }
}
