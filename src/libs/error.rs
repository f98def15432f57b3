/// Errors raised while reading MAF blocks or encoding them into another format.
///
/// Any of these aborts the whole conversion; there is no skip-and-continue.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvError {
    /// Malformed MAF input: no sequence lines, ragged alignment text, bad fields
    #[error("{0}")]
    Parse(String),
    /// The block is legal MAF but can't be expressed in the target format
    #[error("{0}")]
    Constraint(String),
    /// A numeric or probability field that doesn't parse or is out of range
    #[error("{0}")]
    Value(String),
    #[error("missing annotation: {0}")]
    MissingAnnotation(String),
    #[error("unknown format: {0}")]
    UnknownFormat(String),
}

impl ConvError {
    pub fn parse(msg: impl Into<String>) -> Self {
        ConvError::Parse(msg.into())
    }

    pub fn constraint(msg: impl Into<String>) -> Self {
        ConvError::Constraint(msg.into())
    }

    pub fn value(msg: impl Into<String>) -> Self {
        ConvError::Value(msg.into())
    }
}
