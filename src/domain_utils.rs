/// Dot-label helpers for literal host strings
pub struct DomainUtils;

/// A host split around its registrable label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSplit<'a> {
    /// Every label except the last two, re-joined with dots.
    pub subdomain: String,
    /// The second-to-last label.
    pub registrable: &'a str,
}

impl DomainUtils {
    /// Split a host on '.'; an empty host yields one empty label.
    pub fn labels(host: &str) -> Vec<&str> {
        host.split('.').collect()
    }

    /// Number of labels beyond `domain.tld`. Negative for single-label hosts.
    pub fn subdomain_depth(host: &str) -> i64 {
        host.split('.').count() as i64 - 2
    }

    /// Split into subdomain and registrable label, `None` below two labels.
    pub fn split_registrable(host: &str) -> Option<HostSplit<'_>> {
        let labels = Self::labels(host);
        if labels.len() < 2 {
            return None;
        }

        let registrable_idx = labels.len() - 2;
        Some(HostSplit {
            subdomain: labels[..registrable_idx].join("."),
            registrable: labels[registrable_idx],
        })
    }

    /// Case-sensitive suffix match against any of `suffixes`.
    pub fn ends_with_any(host: &str, suffixes: &[&str]) -> bool {
        suffixes.iter().any(|suffix| host.ends_with(suffix))
    }
}
