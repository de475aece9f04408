use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct Holiday {
    pub date: NaiveDate,
    pub name: Option<String>,
}
