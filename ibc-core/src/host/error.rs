use displaydoc::Display;

/// Why a string is not a valid identifier.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// identifier `{id}` must be between {min} and {max} characters long
    InvalidLength { id: String, min: u64, max: u64 },
    /// identifier `{id}` may only contain ASCII letters, digits and `._+-#[]<>`
    InvalidCharacter { id: String },
    /// identifier prefix `{prefix}` is invalid
    InvalidPrefix { prefix: String },
    /// failed to parse `{value}`: `{description}`
    FailedToParse { value: String, description: String },
}

impl std::error::Error for IdentifierError {}
