//! Transport options for remote fetches.

/// Transport policy for a single fetch operation.
///
/// TLS trust is scoped to the client built from one of these values and is
/// never installed process-wide, so relaxed trust for one retrieval cannot
/// leak into unrelated requests made by the same process.
///
/// # Examples
///
/// ```
/// use provost_core::FetchOptions;
///
/// // Full certificate verification.
/// let options = FetchOptions::default();
/// assert!(!options.accept_invalid_certs);
///
/// // Relaxed trust for an ad-hoc mirror.
/// let options = FetchOptions::relaxed_trust();
/// assert!(options.accept_invalid_certs);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Accept TLS certificates that fail verification (self-signed,
    /// expired, wrong host). Off by default.
    pub accept_invalid_certs: bool,
}

impl FetchOptions {
    /// Creates options that skip TLS certificate verification.
    ///
    /// Deployment archives are routinely served from ad-hoc or self-signed
    /// mirrors, so the archive retrieval deliberately opts into this policy.
    /// It is a documented risk accepted for that one request; every other
    /// retrieval should use [`FetchOptions::default`].
    #[must_use]
    pub const fn relaxed_trust() -> Self {
        Self {
            accept_invalid_certs: true,
        }
    }
}
