/// Is `candidate` shaped like `local@domain.tld`?
///
/// Deliberately liberal: this is a format check, not RFC 5322 validation.
/// Rejecting a real address is worse than accepting a bogus one, since the
/// provider performs its own checks anyway.
///
/// Accepted iff the whole string is `[^\s@]+ @ [^\s@]+ . [^\s@]+`.
pub fn is_valid_email(candidate: &str) -> bool {
    if candidate.chars().any(is_space) {
        return false;
    }

    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    // any dot with at least one char on either side will do
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Unicode whitespace, plus U+FEFF (zero width no-break space).
fn is_space(c: char) -> bool { c.is_whitespace() || c == '\u{feff}' }

/// An email address that passed `is_valid_email`. Provider adapters only
/// accept this type, so nothing reaches a provider without being checked.
#[derive(Clone, Debug)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    pub fn parse(email: String) -> Result<Self, String> {
        if is_valid_email(&email) {
            Ok(Self(email))
        } else {
            Err(format!("Invalid email: {email:?}"))
        }
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str { &self.0 }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
