//! Literal URL splitting.
//!
//! Feature extraction has to see URLs the way they were written, so this
//! parser does no percent-decoding and no case folding. Components that
//! cannot be found come back empty; only authorities that no URL splitter
//! would accept (broken brackets, delimiters hidden behind NFKC) fail.

use crate::error::ExtractionError;
use regex::Regex;
use serde::Serialize;
use std::net::Ipv6Addr;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static IPV_FUTURE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v[a-fA-F0-9]+\..+$").expect("valid IPvFuture regex"));

/// Delimiters a host must not gain through compatibility normalization.
const NETLOC_DELIMITERS: [char; 5] = ['/', '?', '#', '@', ':'];

/// A raw URL together with the components derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlParts {
    raw: String,
    scheme: String,
    host: String,
    path: String,
}

impl UrlParts {
    /// Split `raw` into scheme, host (netloc) and path.
    ///
    /// Tab, CR and LF are dropped and leading control characters or spaces
    /// are stripped before splitting; `raw()` still returns the input as-is.
    pub fn parse(raw: &str) -> Result<Self, ExtractionError> {
        let cleaned: String = raw
            .trim_start_matches(|c: char| c <= ' ')
            .chars()
            .filter(|c| !matches!(c, '\t' | '\r' | '\n'))
            .collect();

        let (scheme, rest) = split_scheme(&cleaned);

        let (host, rest) = match rest.strip_prefix("//") {
            Some(authority) => {
                let end = authority.find(['/', '?', '#']).unwrap_or(authority.len());
                authority.split_at(end)
            }
            None => ("", rest),
        };

        if host.contains('[') != host.contains(']') {
            return Err(ExtractionError::MalformedHost {
                url: raw.to_string(),
                host: host.to_string(),
            });
        }
        check_bracketed_host(raw, host)?;
        check_nfkc_host(raw, host)?;

        let path_end = rest.find(['?', '#']).unwrap_or(rest.len());

        Ok(Self {
            raw: raw.to_string(),
            scheme: scheme.to_string(),
            host: host.to_string(),
            path: rest[..path_end].to_string(),
        })
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The whole authority: userinfo and port are not split off.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// `[...]` must hold an IPv6 literal (optionally scoped) or `v<hex>.<chars>`.
fn check_bracketed_host(raw: &str, host: &str) -> Result<(), ExtractionError> {
    let Some((_, after_open)) = host.split_once('[') else {
        return Ok(());
    };
    let bracketed = after_open.split(']').next().unwrap_or_default();

    let valid = if bracketed.starts_with('v') {
        IPV_FUTURE.is_match(bracketed)
    } else {
        let address = match bracketed.split_once('%') {
            Some((address, scope)) if !scope.is_empty() && !scope.contains('%') => address,
            Some(_) => return Err(invalid_bracketed(raw, host)),
            None => bracketed,
        };
        address.parse::<Ipv6Addr>().is_ok()
    };

    if valid {
        Ok(())
    } else {
        Err(invalid_bracketed(raw, host))
    }
}

fn invalid_bracketed(raw: &str, host: &str) -> ExtractionError {
    ExtractionError::InvalidBracketedHost {
        url: raw.to_string(),
        host: host.to_string(),
    }
}

/// Reject non-ASCII hosts that turn into URL delimiters under NFKC,
/// e.g. a fullwidth `＃` becoming `#`.
fn check_nfkc_host(raw: &str, host: &str) -> Result<(), ExtractionError> {
    if host.is_ascii() {
        return Ok(());
    }

    let stripped: String = host
        .chars()
        .filter(|c| !matches!(c, '@' | ':' | '#' | '?'))
        .collect();
    let normalized: String = stripped.nfkc().collect();

    if stripped != normalized && normalized.contains(NETLOC_DELIMITERS) {
        return Err(ExtractionError::NormalizedDelimiter {
            url: raw.to_string(),
            host: host.to_string(),
        });
    }
    Ok(())
}

fn split_scheme(url: &str) -> (&str, &str) {
    let Some(colon) = url.find(':') else {
        return ("", url);
    };

    let candidate = &url[..colon];
    let starts_alpha = candidate
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic());
    let valid = candidate
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));

    if starts_alpha && valid {
        (candidate, &url[colon + 1..])
    } else {
        ("", url)
    }
}
