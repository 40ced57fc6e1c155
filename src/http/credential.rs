/// Source of the bearer credential used when a call supplies no token
///
/// The client only reads from it. Closures returning `Option<String>` work as
/// sources too, which is handy for tokens that rotate.
///
/// ```
/// use fetchit::http::{CredentialSource, StaticToken};
///
/// let fixed = StaticToken::new("abc");
/// assert_eq!(fixed.token().as_deref(), Some("abc"));
///
/// let dynamic = || Some("rotated".to_string());
/// assert_eq!(dynamic.token().as_deref(), Some("rotated"));
/// ```
pub trait CredentialSource {
    fn token(&self) -> Option<String>;
}

/// No fallback credential; only per-call tokens are sent
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredential;

impl CredentialSource for NoCredential {
    fn token(&self) -> Option<String> {
        None
    }
}

/// A fixed credential supplied at construction time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl CredentialSource for StaticToken {
    fn token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

impl<F> CredentialSource for F
where
    F: Fn() -> Option<String>,
{
    fn token(&self) -> Option<String> {
        self()
    }
}
