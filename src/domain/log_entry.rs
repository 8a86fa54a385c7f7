//! Log entry domain model.
//!
//! A [`LogEntry`] is one recorded question/answer interaction ingested from the
//! external log feed. Apart from its classification (`user_type`) and its
//! evaluation membership flag (`is_added_to_eval`) it is immutable once loaded.

use serde::{Deserialize, Serialize};

/// Which display partition a log belongs to.
///
/// Every log is either traffic from a regular user or from a test account.
/// Operators move users between the two partitions with a reclassify action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Normal,
    Test,
}

impl UserType {
    /// Returns the other partition.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Normal => Self::Test,
            Self::Test => Self::Normal,
        }
    }
}

/// One historical question/answer interaction.
///
/// Capability flags travel as `0`/`1` on the wire and are held as booleans;
/// `isDeepThinking` may be absent from older feeds and then reads as `false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: String,
    pub index: u32,
    pub user_name: String,
    #[serde(default)]
    pub user_account: String,
    #[serde(default)]
    pub department: String,
    pub content: String,
    #[serde(default)]
    pub source: String,
    #[serde(with = "flag")]
    pub is_online: bool,
    #[serde(rename = "isFileQA", with = "flag")]
    pub is_file_qa: bool,
    #[serde(with = "flag")]
    pub is_knowledge_base: bool,
    #[serde(default, with = "flag")]
    pub is_deep_thinking: bool,
    #[serde(default)]
    pub intent_type: String,
    #[serde(default)]
    pub thinking_process: String,
    #[serde(default)]
    pub answer_content: String,
    #[serde(default)]
    pub chat_id: String,
    #[serde(default)]
    pub question_id: String,
    #[serde(default)]
    pub answer_id: String,
    #[serde(default)]
    pub is_added_to_eval: bool,
    #[serde(default)]
    pub user_type: UserType,
}

impl LogEntry {
    /// Creates a log with the given identity and question, every optional
    /// field left empty and every flag off.
    ///
    /// # Examples
    ///
    /// ```
    /// use eval_console::domain::{LogEntry, UserType};
    ///
    /// let log = LogEntry::new("L1", "Alice", "How do I reset my VPN token?");
    /// assert_eq!(log.user_type, UserType::Normal);
    /// assert!(!log.is_added_to_eval);
    /// ```
    pub fn new(id: impl Into<String>, user_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            index: 0,
            user_name: user_name.into(),
            user_account: String::new(),
            department: String::new(),
            content: content.into(),
            source: String::new(),
            is_online: false,
            is_file_qa: false,
            is_knowledge_base: false,
            is_deep_thinking: false,
            intent_type: String::new(),
            thinking_process: String::new(),
            answer_content: String::new(),
            chat_id: String::new(),
            question_id: String::new(),
            answer_id: String::new(),
            is_added_to_eval: false,
            user_type: UserType::Normal,
        }
    }
}

/// Serde adapter for `0`/`1` capability flags.
///
/// Serializes as an integer; accepts either an integer (non-zero is `true`) or
/// a JSON boolean when reading.
pub(crate) mod flag {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Int(u64),
        Bool(bool),
    }

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(match Repr::deserialize(deserializer)? {
            Repr::Int(n) => n != 0,
            Repr::Bool(b) => b,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_record_with_numeric_flags() {
        let json = r#"{
            "id": "L7", "index": 7, "userName": "Bob", "userAccount": "bob01",
            "department": "Finance", "content": "Quarterly close steps?",
            "source": "web", "isOnline": 1, "isFileQA": 0, "isKnowledgeBase": 1,
            "answerContent": "See the close checklist.", "userType": "test"
        }"#;

        let log: LogEntry = serde_json::from_str(json).unwrap();

        assert!(log.is_online);
        assert!(!log.is_file_qa);
        assert!(log.is_knowledge_base);
        assert!(!log.is_deep_thinking, "absent isDeepThinking reads as 0");
        assert_eq!(log.user_type, UserType::Test);
        assert!(log.intent_type.is_empty());
    }

    #[test]
    fn flags_serialize_as_integers() {
        let mut log = LogEntry::new("L1", "Alice", "q");
        log.is_file_qa = true;

        let value = serde_json::to_value(&log).unwrap();

        assert_eq!(value["isFileQA"], 1);
        assert_eq!(value["isOnline"], 0);
        assert_eq!(value["userType"], "normal");
    }

    #[test]
    fn opposite_flips_partition() {
        assert_eq!(UserType::Normal.opposite(), UserType::Test);
        assert_eq!(UserType::Test.opposite(), UserType::Normal);
    }
}
