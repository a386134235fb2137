use std::fmt;

/// Failures raised while normalizing an uploaded delimited file.
///
/// All of these are input-validation failures: reported to the caller
/// verbatim, never retried, never partially recovered.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    EmptyInput,
    MalformedInput(String),
    NoData,
    MissingHeader,
    InvalidHeader,
    /// A data record's field count differs from the header's. The index
    /// counts records from the top of the file, with the header at 0.
    RowShapeMismatch { row_index: usize },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::EmptyInput => write!(f, "file content is empty"),
            ParseError::MalformedInput(msg) => write!(f, "failed to read delimited text: {}", msg),
            ParseError::NoData => write!(f, "file contains no records"),
            ParseError::MissingHeader => write!(f, "header row not found"),
            ParseError::InvalidHeader => write!(f, "header is invalid, all fields are blank"),
            ParseError::RowShapeMismatch { row_index } => {
                write!(
                    f,
                    "data row at index {} does not match the header length",
                    row_index
                )
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Terminal per-request failures from the remote inference path.
///
/// None of these triggers a retry or a fallback between providers.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceError {
    /// Payload serialization or request construction failed; programmer-facing.
    RequestBuild(String),
    /// The send itself failed at the network level.
    Transport(String),
    /// Non-success HTTP status; the raw body is kept for diagnostics.
    Provider { status: u16, body: String },
    /// The response body was not valid JSON.
    Decode(String),
    /// The decoded JSON did not have the shape the provider contract promises.
    InvalidResponseShape(String),
    /// The chat provider returned an empty response sequence.
    NoResponses,
    /// The table had zero columns; no network call is made.
    EmptyTable,
}

impl fmt::Display for InferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferenceError::RequestBuild(msg) => {
                write!(f, "failed to build provider request: {}", msg)
            }
            InferenceError::Transport(msg) => {
                write!(f, "failed to send request to provider: {}", msg)
            }
            InferenceError::Provider { status, body } => {
                write!(f, "provider returned status {}: {}", status, body)
            }
            InferenceError::Decode(msg) => {
                write!(f, "failed to decode provider response: {}", msg)
            }
            InferenceError::InvalidResponseShape(msg) => {
                write!(f, "invalid provider response: {}", msg)
            }
            InferenceError::NoResponses => write!(f, "no responses found"),
            InferenceError::EmptyTable => write!(f, "table is empty"),
        }
    }
}

impl std::error::Error for InferenceError {}

/// Umbrella over the two taxonomies so the HTTP layer can tell bad input
/// (400) from processing/provider failure (500) without string matching.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzeError {
    Parse(ParseError),
    Inference(InferenceError),
}

impl From<ParseError> for AnalyzeError {
    fn from(err: ParseError) -> Self {
        AnalyzeError::Parse(err)
    }
}

impl From<InferenceError> for AnalyzeError {
    fn from(err: InferenceError) -> Self {
        AnalyzeError::Inference(err)
    }
}

impl fmt::Display for AnalyzeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalyzeError::Parse(err) => err.fmt(f),
            AnalyzeError::Inference(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for AnalyzeError {}
