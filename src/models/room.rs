use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Available,
    Maintenance,
}

impl RoomStatus {
    pub fn code(&self) -> i64 {
        match self {
            RoomStatus::Available => 1,
            RoomStatus::Maintenance => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(RoomStatus::Available),
            2 => Some(RoomStatus::Maintenance),
            _ => None,
        }
    }
}

/// A room joined with the name of its type, for display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomWithType {
    pub id: i64,
    pub room_number: String,
    pub type_id: i64,
    pub type_name: String,
    pub description: String,
    pub status: RoomStatus,
    pub floor: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}
