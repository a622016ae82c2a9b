/// Errors reported back to the caller of the accessibility core.
///
/// Persistence, speech device and platform failures never show up here: they
/// are recovered where they happen and only logged.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AccessibilityError {
    #[error("unknown vision profile: {0}")]
    UnknownProfile(String),

    #[error("invalid gesture configuration: {0}")]
    InvalidGestureConfig(String),

    #[error("long-press timer requires a running tokio runtime")]
    NoRuntime,
}
