use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const HUMAN_RISK_COLUMNS: &str =
    "id, species_id, risk_level, description, created_at, updated_at";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct HumanRisk {
    pub id: Uuid,
    pub species_id: Uuid,
    /// Free-form severity, e.g. "high" or "venomous bite"
    pub risk_level: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
