use std::fmt;

/// Header carrying the caller identity, inbound and outbound.
pub const IDENTITY_HEADER: &str = "X-User-Name";

/// Opaque caller identity taken from the `X-User-Name` header.
///
/// The only way in is [`CallerIdentity::parse`], so a value is never blank.
/// The raw token is forwarded verbatim to the backends through `as_str`, but
/// `Debug` and `Display` only print a short masked form so it never lands in
/// logs whole.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CallerIdentity(String);

impl CallerIdentity {
    /// Returns `None` for an empty or whitespace-only token.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(raw.to_string()))
        }
    }

    /// The unmodified token, for forwarding.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CallerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CallerIdentity({})", self)
    }
}

impl fmt::Display for CallerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.chars().next() {
            Some(first) => write!(f, "{}****", first),
            None => write!(f, "****"),
        }
    }
}
