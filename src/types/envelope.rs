//! Response envelope returned for every query

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which branch produced a response, or that it failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Rag,
    Web,
    Action,
    Error,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Source::Rag => "rag",
            Source::Web => "web",
            Source::Action => "action",
            Source::Error => "error",
        };
        f.write_str(name)
    }
}

/// User-facing reference backing an answer
///
/// `Web` is declared first so untagged deserialization only picks
/// `Document` when no `url` is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Citation {
    Web {
        document: String,
        url: String,
    },
    Document {
        document: String,
        relevance: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        page: Option<String>,
    },
}

impl Citation {
    pub fn document(&self) -> &str {
        match self {
            Citation::Web { document, .. } | Citation::Document { document, .. } => document,
        }
    }

    pub fn page(&self) -> Option<&str> {
        match self {
            Citation::Document { page, .. } => page.as_deref(),
            Citation::Web { .. } => None,
        }
    }

    pub fn relevance(&self) -> Option<f64> {
        match self {
            Citation::Document { relevance, .. } => *relevance,
            Citation::Web { .. } => None,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Citation::Web { url, .. } => Some(url),
            Citation::Document { .. } => None,
        }
    }
}

/// The sole contract between the pipeline and its caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub response: String,
    pub citations: Vec<Citation>,
    pub source: Source,
}

impl ResponseEnvelope {
    pub fn rag(response: impl Into<String>, citations: Vec<Citation>) -> Self {
        Self {
            response: response.into(),
            citations,
            source: Source::Rag,
        }
    }

    pub fn web(response: impl Into<String>, citations: Vec<Citation>) -> Self {
        Self {
            response: response.into(),
            citations,
            source: Source::Web,
        }
    }

    pub fn action(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            citations: Vec::new(),
            source: Source::Action,
        }
    }

    /// Error envelopes never carry citations
    pub fn error(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            citations: Vec::new(),
            source: Source::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.source == Source::Error
    }
}
