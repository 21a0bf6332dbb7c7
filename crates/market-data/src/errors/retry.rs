/// Classification for retry policy.
///
/// | Class | Retried? |
/// |-------|----------|
/// | `Never` | No, surfaced immediately |
/// | `WithBackoff` | Yes, until the retry budget is spent |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry - bad key, bad symbol, or malformed response.
    Never,

    /// Transient failure such as HTTP 429, 5xx or a timeout.
    /// Sleep for the policy's backoff delay and try again.
    WithBackoff,
}
