use super::tld_risk::is_risky_tld;
use super::url_parts::{lenient_netloc, UrlParts};
use super::FeatureVector;
use crate::domain_utils::DomainUtils;
use std::collections::BTreeMap;

/// Extract the lexical feature vector for a URL.
///
/// Total over all input: malformed or empty URLs produce zero/empty values
/// for whatever could not be parsed, never an error.
pub fn extract_features(url: &str) -> FeatureVector {
    let parts = UrlParts::parse(url);
    let host = DomainUtils::host_from_netloc(lenient_netloc(url));
    if host.is_empty() {
        log::debug!("No host in {:?}, domain features left empty", url);
    }
    let domain = DomainUtils::split_public_suffix(&host);

    let url_lower = url.to_lowercase();
    let url_length = url.chars().count();
    let denominator = url_length.max(1) as f64;

    let mut letter_count = 0;
    let mut digit_count = 0;
    let mut special_char_count = 0;
    let mut contains_unicode = false;
    for c in url.chars() {
        if c.is_alphabetic() {
            letter_count += 1;
        }
        if c.is_numeric() {
            digit_count += 1;
        }
        if !c.is_alphanumeric() {
            special_char_count += 1;
        }
        if !c.is_ascii() {
            contains_unicode = true;
        }
    }

    let flag = |b: bool| u8::from(b);
    let has = |keyword: &str| flag(url_lower.contains(keyword));

    FeatureVector {
        url_length,
        domain_length: domain.registered_domain.chars().count(),
        tld: domain.suffix.clone(),
        is_risky_tld: flag(is_risky_tld(&domain.suffix)),
        is_domain_ip: flag(DomainUtils::is_ipv4_literal(&domain.registered_domain)),
        subdomain_count: domain.subdomain_count(),

        letter_count,
        digit_count,
        special_char_count,
        letter_ratio: letter_count as f64 / denominator,
        digit_ratio: digit_count as f64 / denominator,
        special_char_ratio: special_char_count as f64 / denominator,

        dot_count: url.matches('.').count(),
        hyphen_count: url.matches('-').count(),
        at_count: url.matches('@').count(),
        param_count: url.matches('?').count(),
        eq_count: url.matches('=').count(),
        amp_count: url.matches('&').count(),

        has_https: flag(url_lower.starts_with("https://")),
        has_www: has("www."),
        has_at_symbol: flag(url.contains('@')),
        contains_unicode: flag(contains_unicode),
        has_encoded: flag(url.contains('%')),

        path_depth: parts.path_depth(),
        query_length: parts.query.chars().count(),

        entropy: shannon_entropy(url),

        contains_login: has("login"),
        contains_verify: has("verify"),
        contains_secure: has("secure"),
        contains_update: has("update"),
        contains_account: has("account"),
        contains_free: has("free"),
        contains_promo: has("promo"),
        contains_click: has("click"),
        contains_wallet: has("wallet"),
    }
}

/// Shannon entropy in bits over the string's own character distribution.
/// Empty input has entropy 0.
pub fn shannon_entropy(s: &str) -> f64 {
    // Ordered map keeps the float summation order fixed between calls
    let mut counts: BTreeMap<char, usize> = BTreeMap::new();
    let mut total = 0usize;
    for c in s.chars() {
        *counts.entry(c).or_insert(0) += 1;
        total += 1;
    }

    if total == 0 {
        return 0.0;
    }

    let total = total as f64;
    let entropy: f64 = counts
        .values()
        .map(|&n| {
            let p = n as f64 / total;
            -p * p.log2()
        })
        .sum();

    if entropy <= 0.0 {
        0.0
    } else {
        entropy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FEATURE_COUNT;

    const SAMPLE_URLS: [&str; 10] = [
        "",
        "   ",
        "https://example.com",
        "http://secure-login.tk/verify?x=1",
        "example.com/a/b",
        "http://192.168.1.1/login",
        "http://exаmple.com",
        "https://user:pw@host.example.co.uk:8443/p?a=1&b=2#frag",
        "%%%%",
        "1234567890",
    ];

    #[test]
    fn test_simple_https_url() {
        let fv = extract_features("https://example.com");
        assert_eq!(fv.url_length, 19);
        assert_eq!(fv.domain_length, 11);
        assert_eq!(fv.tld, "com");
        assert_eq!(fv.is_risky_tld, 0);
        assert_eq!(fv.is_domain_ip, 0);
        assert_eq!(fv.subdomain_count, 0);
        assert_eq!(fv.letter_count, 15);
        assert_eq!(fv.digit_count, 0);
        assert_eq!(fv.special_char_count, 4);
        assert!((fv.letter_ratio - 15.0 / 19.0).abs() < 1e-12);
        assert_eq!(fv.dot_count, 1);
        assert_eq!(fv.has_https, 1);
        assert_eq!(fv.has_www, 0);
        assert_eq!(fv.path_depth, 0);
        assert_eq!(fv.query_length, 0);
    }

    #[test]
    fn test_phishing_style_url() {
        let fv = extract_features("http://secure-login.tk/verify?x=1");
        assert_eq!(fv.tld, "tk");
        assert_eq!(fv.is_risky_tld, 1);
        assert_eq!(fv.hyphen_count, 1);
        assert_eq!(fv.param_count, 1);
        assert_eq!(fv.eq_count, 1);
        assert_eq!(fv.has_https, 0);
        assert_eq!(fv.path_depth, 1);
        assert_eq!(fv.query_length, 3);
        assert_eq!(fv.contains_login, 1);
        assert_eq!(fv.contains_secure, 1);
        assert_eq!(fv.contains_verify, 1);
        assert_eq!(fv.contains_wallet, 0);
    }

    #[test]
    fn test_empty_url_is_all_default() {
        assert_eq!(extract_features(""), FeatureVector::default());
    }

    #[test]
    fn test_whitespace_url_does_not_fail() {
        let fv = extract_features("   ");
        assert_eq!(fv.url_length, 3);
        assert_eq!(fv.special_char_count, 3);
        assert_eq!(fv.special_char_ratio, 1.0);
        assert_eq!(fv.entropy, 0.0);
        assert!(fv.tld.is_empty());
        assert_eq!(fv.domain_length, 0);
    }

    #[test]
    fn test_compound_suffix_and_www() {
        let fv = extract_features("https://www.bbc.co.uk/news");
        assert_eq!(fv.tld, "co.uk");
        assert_eq!(fv.domain_length, "bbc.co.uk".len());
        assert_eq!(fv.subdomain_count, 1);
        assert_eq!(fv.has_www, 1);
        assert_eq!(fv.path_depth, 1);
    }

    #[test]
    fn test_ip_host() {
        let fv = extract_features("http://192.168.1.1/login");
        assert_eq!(fv.is_domain_ip, 1);
        assert_eq!(fv.domain_length, 11);
        assert!(fv.tld.is_empty());
        assert_eq!(fv.subdomain_count, 0);
    }

    #[test]
    fn test_unicode_and_encoding_flags() {
        let fv = extract_features("http://exаmple.com");
        assert_eq!(fv.contains_unicode, 1);
        assert_eq!(fv.url_length, 18);

        let fv = extract_features("http://example.com/%2e%2e/");
        assert_eq!(fv.has_encoded, 1);
        assert_eq!(fv.contains_unicode, 0);
    }

    #[test]
    fn test_bare_domain_path_depth() {
        // No scheme means no authority: the host counts as a path segment
        assert_eq!(extract_features("www.google.com").path_depth, 1);
        assert_eq!(extract_features("localhost:8080/a/b").path_depth, 3);

        let fv = extract_features("wikipedia.org/wiki/Rust?lang=en");
        assert_eq!(fv.path_depth, 3);
        assert_eq!(fv.query_length, 7);
        assert_eq!(fv.tld, "org");
        assert_eq!(fv.domain_length, "wikipedia.org".len());
    }

    #[test]
    fn test_input_is_measured_untrimmed() {
        let raw = extract_features("https://example.com");
        let padded = extract_features(" https://example.com");
        assert_eq!(padded.url_length, raw.url_length + 1);
        assert_eq!(padded.special_char_count, raw.special_char_count + 1);
        assert_eq!(padded.has_https, 0);
        assert_eq!(padded.tld, raw.tld);
    }

    #[test]
    fn test_subdomain_count() {
        assert_eq!(extract_features("http://a.b.c.example.com").subdomain_count, 3);
        assert_eq!(extract_features("example.com").subdomain_count, 0);
    }

    #[test]
    fn test_at_symbol() {
        // Everything before '@' is userinfo; the real host is evil.tk
        let fv = extract_features("http://paypal.com@evil.tk/");
        assert_eq!(fv.has_at_symbol, 1);
        assert_eq!(fv.at_count, 1);
        assert_eq!(fv.tld, "tk");
        assert_eq!(fv.domain_length, "evil.tk".len());
    }

    #[test]
    fn test_entropy() {
        assert_eq!(shannon_entropy(""), 0.0);
        assert_eq!(shannon_entropy("aaaa"), 0.0);
        assert!((shannon_entropy("abcd") - 2.0).abs() < 1e-12);
        assert!((shannon_entropy("abcdefgh") - 3.0).abs() < 1e-12);
        assert!((shannon_entropy("aabb") - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ratios_in_unit_interval() {
        for url in SAMPLE_URLS {
            let fv = extract_features(url);
            for ratio in [fv.letter_ratio, fv.digit_ratio, fv.special_char_ratio] {
                assert!((0.0..=1.0).contains(&ratio), "{:?} ratio {}", url, ratio);
            }
        }
    }

    #[test]
    fn test_extraction_is_deterministic() {
        for url in SAMPLE_URLS {
            let first = extract_features(url);
            let second = extract_features(url);
            assert_eq!(first, second);
            assert_eq!(first.values().len(), FEATURE_COUNT);
            assert_eq!(
                serde_json::to_string(&first).unwrap(),
                serde_json::to_string(&second).unwrap()
            );
        }
    }
}
