//! Signals read from the parsed host and path.

use crate::domain_utils::DomainUtils;

const SUSPICIOUS_TLDS: [&str; 7] = [".tk", ".ml", ".ga", ".cf", ".gq", ".xyz", ".top"];

const BRANDS: [&str; 9] = [
    "paypal",
    "google",
    "hsbc",
    "amazon",
    "microsoft",
    "netflix",
    "facebook",
    "gmail",
    "apple",
];

pub fn num_dots(host: &str) -> i64 {
    host.matches('.').count() as i64
}

pub fn subdomain_depth(host: &str) -> i64 {
    DomainUtils::subdomain_depth(host)
}

pub fn path_depth(path: &str) -> i64 {
    path.matches('/').count() as i64
}

pub fn has_hyphen(host: &str) -> i64 {
    i64::from(host.contains('-'))
}

pub fn is_suspicious_tld(host: &str) -> i64 {
    i64::from(DomainUtils::ends_with_any(host, &SUSPICIOUS_TLDS))
}

/// A known brand inside the subdomain labels while the registrable label is
/// something else, e.g. `paypal.account-check.com`.
pub fn brand_in_subdomain_not_domain(host: &str) -> i64 {
    let Some(split) = DomainUtils::split_registrable(host) else {
        return 0;
    };

    let spoofed = BRANDS
        .iter()
        .any(|brand| split.subdomain.contains(brand) && *brand != split.registrable);
    i64::from(spoofed)
}
