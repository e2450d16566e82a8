//! Signals read straight off the raw URL string.

use regex::Regex;
use std::sync::LazyLock;

const SENSITIVE_WORDS: [&str; 9] = [
    "secure",
    "account",
    "update",
    "free",
    "login",
    "ebayisapi",
    "webscr",
    "signin",
    "banking",
];

static IP_HOST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"http[s]?://\d+\.\d+\.\d+\.\d+").expect("valid IP regex"));

static SHORTENER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(bit\.ly|goo\.gl|tinyurl\.com|ow\.ly|t\.co|is\.gd|buff\.ly)")
        .expect("valid shortener regex")
});

fn flag(condition: bool) -> i64 {
    i64::from(condition)
}

/// A dotted quad right after an http(s) scheme separator, anywhere in the URL.
pub fn has_ip_address(url: &str) -> i64 {
    flag(IP_HOST.is_match(url))
}

pub fn url_length(url: &str) -> i64 {
    url.chars().count() as i64
}

pub fn has_at_symbol(url: &str) -> i64 {
    flag(url.contains('@'))
}

/// More than one non-overlapping `//`, i.e. one beyond the scheme separator.
pub fn has_double_slash(url: &str) -> i64 {
    flag(url.matches("//").count() > 1)
}

pub fn has_https(url: &str) -> i64 {
    flag(url.starts_with("https"))
}

pub fn has_sensitive_words(url: &str) -> i64 {
    let lower = url.to_lowercase();
    flag(SENSITIVE_WORDS.iter().any(|word| lower.contains(word)))
}

/// Case-sensitive and unanchored: `t.co` inside `microsoft.com` matches.
pub fn is_shortened(url: &str) -> i64 {
    flag(SHORTENER.is_match(url))
}

pub fn has_encoded_chars(url: &str) -> i64 {
    flag(url.contains('%') || url.contains("\\x"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ip_address() {
        assert_eq!(has_ip_address("http://192.168.1.1/login"), 1);
        assert_eq!(has_ip_address("https://10.0.0.1"), 1);
        assert_eq!(has_ip_address("https://example.com/?r=http://1.2.3.4"), 1);
        assert_eq!(has_ip_address("ftp://192.168.1.1/"), 0);
        assert_eq!(has_ip_address("https://1.2.3.example.com"), 0);
    }

    #[test]
    fn test_url_length_counts_chars() {
        assert_eq!(url_length(""), 0);
        assert_eq!(url_length("http://a.b"), 10);
        assert_eq!(url_length("http://bücher.de"), 16);
    }

    #[test]
    fn test_double_slash() {
        assert_eq!(has_double_slash("https://example.com/a"), 0);
        assert_eq!(has_double_slash("https://example.com//a"), 1);
        assert_eq!(has_double_slash("https://example.com/r?u=http://x"), 1);
        assert_eq!(has_double_slash("///"), 0);
    }

    #[test]
    fn test_https_is_literal_prefix() {
        assert_eq!(has_https("https://example.com"), 1);
        assert_eq!(has_https("httpsfoo"), 1);
        assert_eq!(has_https("HTTPS://example.com"), 0);
        assert_eq!(has_https("http://example.com"), 0);
    }

    #[test]
    fn test_sensitive_words_case_insensitive() {
        assert_eq!(has_sensitive_words("https://example.com/SignIn"), 1);
        assert_eq!(has_sensitive_words("https://cgi.ebay.com/ws/eBayISAPI.dll"), 1);
        assert_eq!(has_sensitive_words("https://example.com/about"), 0);
    }

    #[test]
    fn test_shortener() {
        assert_eq!(is_shortened("https://bit.ly/abc123"), 1);
        assert_eq!(is_shortened("https://t.co/xyz"), 1);
        assert_eq!(is_shortened("https://www.microsoft.com/"), 1);
        assert_eq!(is_shortened("https://BIT.LY/abc"), 0);
        assert_eq!(is_shortened("https://example.com/"), 0);
    }

    #[test]
    fn test_encoded_chars() {
        assert_eq!(has_encoded_chars("https://example.com/%2e%2e"), 1);
        assert_eq!(has_encoded_chars(r"https://example.com/\x2e"), 1);
        assert_eq!(has_encoded_chars("https://example.com/x2e"), 0);
        assert_eq!(has_at_symbol("https://user@example.com"), 1);
    }
}
