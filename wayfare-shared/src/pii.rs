//! Log-safe rendering of e-mail addresses.

use std::fmt;

/// Formats an e-mail address as `d***@demo.com`. The domain stays readable
/// for triage; the mailbox does not. Values that are not an address render
/// as `***`.
pub struct Masked<T>(pub T);

impl<T: AsRef<str>> Masked<T> {
    fn write_masked(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0.as_ref().trim();
        if let Some((local, domain)) = value.split_once('@') {
            if let Some(first) = local.chars().next() {
                if !domain.is_empty() && !domain.contains('@') {
                    return write!(f, "{}***@{}", first, domain);
                }
            }
        }
        f.write_str("***")
    }
}

impl<T: AsRef<str>> fmt::Display for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_masked(f)
    }
}

impl<T: AsRef<str>> fmt::Debug for Masked<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_masked(f)
    }
}
