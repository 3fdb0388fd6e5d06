// ── Housekeeping tasks ──
//
// Created by the side-effect dispatcher, consumed by external
// maintenance tooling. Append-only from this core's perspective.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::ids::{RoomId, TaskId};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TaskKind {
    CheckoutCleaning,
    PreArrivalInspection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HousekeepingTask {
    pub id: TaskId,
    pub room_id: RoomId,
    pub kind: TaskKind,
    pub scheduled_for: DateTime<Utc>,
    pub instructions: String,
    /// Which sync source triggered the task.
    pub source: String,
    pub created_at: DateTime<Utc>,
}
