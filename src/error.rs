use thiserror::Error;

/// Failures when parsing the closed vocabularies from their string keys.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown tag: {0}")]
    UnknownTag(String),
    #[error("unknown tier: {0}")]
    UnknownTier(String),
    #[error("unknown topic: {0}")]
    UnknownTopic(String),
    #[error("invalid argument for topic {topic}: {value}")]
    InvalidTopicArgument { topic: &'static str, value: String },
}
