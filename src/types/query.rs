//! Incoming query and routing intent

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Raw user query, immutable once received
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Correlation id used in logs
    id: Uuid,
    text: String,
    user_id: Option<String>,
}

impl Query {
    /// Create a query from raw user text
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            user_id: None,
        }
    }

    /// Attach the id of the user who asked
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}

/// Handling strategy chosen for a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Intent {
    /// Manuals, troubleshooting, installation, calculations
    Technical,
    /// Real-time prices, news, regulations, weather
    Market,
    /// Direct device-control commands
    Action,
}

impl Intent {
    /// Match priority when a classifier reply names several categories
    pub const PRIORITY: [Intent; 3] = [Intent::Technical, Intent::Market, Intent::Action];

    /// Category label as it appears in the classification prompt
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Technical => "TECHNICAL",
            Intent::Market => "MARKET",
            Intent::Action => "ACTION",
        }
    }
}

impl Default for Intent {
    fn default() -> Self {
        Intent::Technical
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_creation() {
        let query = Query::new("Berapa tegangan Voc Inverter X?");
        assert_eq!(query.text(), "Berapa tegangan Voc Inverter X?");
        assert!(query.user_id().is_none());
    }

    #[test]
    fn test_query_with_user() {
        let query = Query::new("Matikan alat").with_user("guest");
        assert_eq!(query.user_id(), Some("guest"));
    }

    #[test]
    fn test_queries_get_distinct_ids() {
        let a = Query::new("same text");
        let b = Query::new("same text");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_intent_labels_and_priority() {
        assert_eq!(Intent::PRIORITY[0], Intent::Technical);
        assert_eq!(Intent::Market.to_string(), "MARKET");
        assert_eq!(Intent::default(), Intent::Technical);
        assert_eq!(serde_json::to_string(&Intent::Action).unwrap(), "\"ACTION\"");
    }
}
