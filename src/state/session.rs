//! Conversation session model
//!
//! A session owns the ordered message history for one client plus the
//! analytics derived from it. History is append-only; the only removal is
//! a wholesale clear, which also resets analytics and the session clock.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::classify::Category;
use crate::gemini::types::{RequestContent, TurnRole};

/// Role of a message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message from the user
    User,
    /// Message from the model
    Model,
}

impl MessageRole {
    /// Role tag used on the Gemini wire
    pub fn as_turn_role(&self) -> TurnRole {
        match self {
            MessageRole::User => TurnRole::User,
            MessageRole::Model => TurnRole::Model,
        }
    }
}

/// A single message in a session
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    /// Role of the message sender
    pub role: MessageRole,
    /// Message text
    pub text: String,
    /// When the message was recorded
    pub timestamp: DateTime<Utc>,
    /// Upstream latency in milliseconds, set on model messages only
    pub latency_ms: Option<u64>,
}

/// One client's conversation and its analytics
#[derive(Debug, Clone)]
pub struct ChatSession {
    /// When this session started (reset restarts the clock)
    pub started_at: DateTime<Utc>,
    messages: Vec<ChatMessage>,
    exchanges: u64,
    response_times_ms: Vec<u64>,
    topics: BTreeSet<&'static str>,
    categories: BTreeMap<Category, u64>,
}

/// Point-in-time analytics view of a session
#[derive(Debug, Serialize)]
pub struct AnalyticsSnapshot {
    /// Number of question/answer exchanges started
    ///
    /// An exchange whose upstream call failed still counts (its user
    /// message stays in history) but contributes no latency sample, so
    /// `average_response_time` may average fewer values than this count.
    pub total_messages: u64,
    /// Mean upstream latency in seconds, 0.0 when no reply was recorded yet
    pub average_response_time: f64,
    /// Topics matched by keyword tagging so far
    pub topics: Vec<&'static str>,
    /// Per-category question counts
    pub categories: BTreeMap<&'static str, u64>,
    /// When the session started
    pub session_started_at: DateTime<Utc>,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// Create a fresh, empty session with the clock started now
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            messages: Vec::new(),
            exchanges: 0,
            response_times_ms: Vec::new(),
            topics: BTreeSet::new(),
            categories: BTreeMap::new(),
        }
    }

    /// Whether the session holds no messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Ordered message history
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Append the user's message and return its sequence id (1-based)
    pub fn record_user(&mut self, text: impl Into<String>) -> u64 {
        self.messages.push(ChatMessage {
            role: MessageRole::User,
            text: text.into(),
            timestamp: Utc::now(),
            latency_ms: None,
        });
        self.exchanges += 1;
        self.exchanges
    }

    /// Append the model's reply and record its latency
    pub fn record_model(&mut self, text: impl Into<String>, latency_ms: u64) {
        self.messages.push(ChatMessage {
            role: MessageRole::Model,
            text: text.into(),
            timestamp: Utc::now(),
            latency_ms: Some(latency_ms),
        });
        self.response_times_ms.push(latency_ms);
    }

    /// Add keyword topics matched for a user message
    pub fn record_topics(&mut self, topics: impl IntoIterator<Item = &'static str>) {
        self.topics.extend(topics);
    }

    /// Count one question under the given category
    pub fn record_category(&mut self, category: Category) {
        *self.categories.entry(category).or_insert(0) += 1;
    }

    /// Wholesale reset: history, analytics and the session clock
    pub fn clear(&mut self) {
        *self = ChatSession::new();
    }

    /// Full history as role-tagged turns for the upstream request
    pub fn history_contents(&self) -> Vec<RequestContent> {
        self.messages
            .iter()
            .map(|m| RequestContent::turn(m.role.as_turn_role(), m.text.clone()))
            .collect()
    }

    /// Derive the current analytics view
    pub fn snapshot(&self) -> AnalyticsSnapshot {
        let average_response_time = if self.response_times_ms.is_empty() {
            0.0
        } else {
            let total: u64 = self.response_times_ms.iter().sum();
            total as f64 / self.response_times_ms.len() as f64 / 1000.0
        };

        AnalyticsSnapshot {
            total_messages: self.exchanges,
            average_response_time,
            topics: self.topics.iter().copied().collect(),
            categories: self
                .categories
                .iter()
                .map(|(category, count)| (category.as_str(), *count))
                .collect(),
            session_started_at: self.started_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_empty() {
        let session = ChatSession::new();
        assert!(session.is_empty());
        let snapshot = session.snapshot();
        assert_eq!(snapshot.total_messages, 0);
        assert_eq!(snapshot.average_response_time, 0.0);
        assert!(snapshot.topics.is_empty());
        assert!(snapshot.categories.is_empty());
    }

    #[test]
    fn test_exchange_appends_one_user_and_one_model_entry() {
        let mut session = ChatSession::new();
        let id = session.record_user("question");
        session.record_model("answer", 120);

        assert_eq!(id, 1);
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[0].role, MessageRole::User);
        assert_eq!(session.messages()[1].role, MessageRole::Model);
        assert_eq!(session.messages()[1].latency_ms, Some(120));
        assert_eq!(session.snapshot().total_messages, 1);
    }

    #[test]
    fn test_sequence_ids_increment() {
        let mut session = ChatSession::new();
        assert_eq!(session.record_user("a"), 1);
        session.record_model("r", 10);
        assert_eq!(session.record_user("b"), 2);
    }

    #[test]
    fn test_history_contents_keeps_order() {
        let mut session = ChatSession::new();
        session.record_user("q1");
        session.record_model("a1", 10);
        session.record_user("q2");
        session.record_model("a2", 20);

        let contents = session.history_contents();
        assert_eq!(contents.len(), 4);
        let json = serde_json::to_value(&contents).unwrap();
        assert_eq!(json[0]["role"], "user");
        assert_eq!(json[0]["parts"][0]["text"], "q1");
        assert_eq!(json[1]["role"], "model");
        assert_eq!(json[3]["parts"][0]["text"], "a2");
    }

    #[test]
    fn test_average_response_time() {
        let mut session = ChatSession::new();
        session.record_user("q1");
        session.record_model("a1", 1000);
        session.record_user("q2");
        session.record_model("a2", 3000);

        let snapshot = session.snapshot();
        assert!((snapshot.average_response_time - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_topics_and_categories_accumulate() {
        let mut session = ChatSession::new();
        session.record_topics(["skills", "education"]);
        session.record_topics(["skills"]);
        session.record_category(Category::Skills);
        session.record_category(Category::Skills);
        session.record_category(Category::General);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.topics, vec!["education", "skills"]);
        assert_eq!(snapshot.categories.get("Skills"), Some(&2));
        assert_eq!(snapshot.categories.get("General"), Some(&1));
    }

    #[test]
    fn test_failed_exchange_counts_but_adds_no_latency_sample() {
        let mut session = ChatSession::new();
        // First exchange never got a reply; the user message stays.
        session.record_user("q1");
        session.record_user("q2");
        session.record_model("a2", 2000);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.total_messages, 2);
        // Only the completed exchange contributes to the average.
        assert!((snapshot.average_response_time - 2.0).abs() < f64::EPSILON);
        assert_eq!(session.messages().len(), 3);
    }

    #[test]
    fn test_clear_resets_everything_and_restarts_clock() {
        let mut session = ChatSession::new();
        session.record_user("q");
        session.record_model("a", 50);
        session.record_topics(["skills"]);
        session.record_category(Category::Skills);
        let before = session.started_at;

        session.clear();

        assert!(session.is_empty());
        let snapshot = session.snapshot();
        assert_eq!(snapshot.total_messages, 0);
        assert!(snapshot.topics.is_empty());
        assert!(snapshot.categories.is_empty());
        assert!(session.started_at >= before);
    }
}
