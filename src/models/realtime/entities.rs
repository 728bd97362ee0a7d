use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 会产生变更事件的数据表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/realtime.ts")]
pub enum ChangeTable {
    Exercises,
    Submissions,
}

impl std::str::FromStr for ChangeTable {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "exercises" => Ok(ChangeTable::Exercises),
            "submissions" => Ok(ChangeTable::Submissions),
            _ => Err(format!("Invalid table: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export, export_to = "../frontend/src/types/generated/realtime.ts")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// 行级变更事件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/realtime.ts")]
pub struct ChangeEvent {
    pub table: ChangeTable,
    pub event: ChangeKind,
    pub id: i64,
    // 答案所属的练习
    pub exercise_id: Option<i64>,
    pub at: chrono::DateTime<chrono::Utc>,
}

impl ChangeEvent {
    pub fn new(table: ChangeTable, event: ChangeKind, id: i64) -> Self {
        Self {
            table,
            event,
            id,
            exercise_id: None,
            at: chrono::Utc::now(),
        }
    }

    pub fn exercise(event: ChangeKind, id: i64) -> Self {
        Self::new(ChangeTable::Exercises, event, id)
    }

    pub fn submission(event: ChangeKind, id: i64, exercise_id: i64) -> Self {
        Self {
            exercise_id: Some(exercise_id),
            ..Self::new(ChangeTable::Submissions, event, id)
        }
    }
}

/// 推送给 WebSocket 客户端的消息
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/realtime.ts")]
pub enum RealtimeMessage {
    Connected { profile_id: i64 },
    Change(ChangeEvent),
    Ping,
    Pong,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_event_serialization() {
        let event = ChangeEvent::submission(ChangeKind::Insert, 7, 3);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["table"], "submissions");
        assert_eq!(json["event"], "INSERT");
        assert_eq!(json["id"], 7);
        assert_eq!(json["exercise_id"], 3);
    }

    #[test]
    fn test_realtime_message_tagging() {
        let msg = RealtimeMessage::Change(ChangeEvent::exercise(ChangeKind::Delete, 1));
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "change");
        assert_eq!(json["table"], "exercises");
        assert_eq!(json["event"], "DELETE");

        let json = serde_json::to_value(RealtimeMessage::Connected { profile_id: 5 }).unwrap();
        assert_eq!(json["type"], "connected");
        assert_eq!(json["profile_id"], 5);
    }

    #[test]
    fn test_client_ping_parse() {
        let msg: RealtimeMessage = serde_json::from_str(r#"{"type":"ping"}"#).unwrap();
        assert!(matches!(msg, RealtimeMessage::Ping));
    }

    #[test]
    fn test_table_parse() {
        assert_eq!(" exercises".parse::<ChangeTable>(), Ok(ChangeTable::Exercises));
        assert!("profiles".parse::<ChangeTable>().is_err());
    }
}
