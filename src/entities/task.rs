use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "task")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

/// Task progress states, stored as a compact integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
pub enum TaskStatus {
    #[sea_orm(num_value = 0)]
    NotStarted,
    #[sea_orm(num_value = 1)]
    InProgress,
    #[sea_orm(num_value = 2)]
    Completed,
}

impl TaskStatus {
    /// Returns the canonical wire token for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "NOT_STARTED",
            TaskStatus::InProgress => "IN_PROGRESS",
            TaskStatus::Completed => "COMPLETED",
        }
    }

    /// Parses a wire token into a status, ignoring case.
    pub fn parse(token: &str) -> Option<TaskStatus> {
        if token.eq_ignore_ascii_case("NOT_STARTED") {
            Some(TaskStatus::NotStarted)
        } else if token.eq_ignore_ascii_case("IN_PROGRESS") {
            Some(TaskStatus::InProgress)
        } else if token.eq_ignore_ascii_case("COMPLETED") {
            Some(TaskStatus::Completed)
        } else {
            None
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
