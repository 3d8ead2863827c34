use std::collections::HashSet;

use sea_orm::{entity::prelude::*, ActiveValue::Set, FromJsonQueryResult};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One approval step. `conditions` is a free-form expression evaluated by
/// whatever runs the workflow; it is stored verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub order: i32,
    #[serde(default)]
    pub approver: String,
    #[serde(default)]
    pub conditions: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct WorkflowSteps(pub Vec<WorkflowStep>);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error("Duplicate step order: {0}")]
    DuplicateOrder(i32),
}

impl WorkflowSteps {
    /// Sorts steps by `order`; two steps may not share one.
    pub fn ordered(mut steps: Vec<WorkflowStep>) -> Result<Self, WorkflowError> {
        let mut seen = HashSet::new();
        for step in &steps {
            if !seen.insert(step.order) {
                return Err(WorkflowError::DuplicateOrder(step.order));
            }
        }
        steps.sort_by_key(|step| step.order);

        Ok(Self(steps))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "workflows")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
    pub organization_id: i32,
    pub creator_id: i32,
    pub name: String,
    pub description: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub steps: WorkflowSteps,
    pub enabled: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::organization::Entity",
        from = "Column::OrganizationId",
        to = "super::organization::Column::Id",
        on_delete = "Cascade"
    )]
    Organization,
}

impl Related<super::organization::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

super::base::soft_delete_entity!();

#[derive(Debug, Deserialize)]
pub struct NewWorkflow {
    pub organization_id: i32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub steps: Vec<WorkflowStep>,
    #[serde(default)]
    pub enabled: bool,
}

impl NewWorkflow {
    pub fn into_active_model(self, creator: i32) -> Result<ActiveModel, WorkflowError> {
        let steps = WorkflowSteps::ordered(self.steps)?;
        let now = chrono::Utc::now();

        Ok(ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            organization_id: Set(self.organization_id),
            creator_id: Set(creator),
            name: Set(self.name),
            description: Set(self.description),
            steps: Set(steps),
            enabled: Set(self.enabled),
            ..Default::default()
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct WorkflowChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub steps: Option<Vec<WorkflowStep>>,
    pub enabled: Option<bool>,
}

impl WorkflowChanges {
    pub fn apply(self, workflow: Model) -> Result<ActiveModel, WorkflowError> {
        let mut active: ActiveModel = workflow.into();
        if let Some(steps) = self.steps {
            active.steps = Set(WorkflowSteps::ordered(steps)?);
        }
        if let Some(name) = self.name {
            active.name = Set(name);
        }
        if let Some(description) = self.description {
            active.description = Set(description);
        }
        if let Some(enabled) = self.enabled {
            active.enabled = Set(enabled);
        }
        active.updated_at = Set(chrono::Utc::now());

        Ok(active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(name: &str, order: i32) -> WorkflowStep {
        WorkflowStep {
            name: name.to_string(),
            description: String::new(),
            order,
            approver: "finance".to_string(),
            conditions: "amount > 1000".to_string(),
        }
    }

    #[test]
    fn steps_are_stored_in_order() {
        let steps = WorkflowSteps::ordered(vec![step("sign", 3), step("review", 1), step("approve", 2)])
            .unwrap();

        let names: Vec<&str> = steps.0.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["review", "approve", "sign"]);
    }

    #[test]
    fn duplicate_orders_are_rejected() {
        let err = WorkflowSteps::ordered(vec![step("a", 1), step("b", 1)]).unwrap_err();
        assert_eq!(err, WorkflowError::DuplicateOrder(1));
    }

    #[test]
    fn conditions_are_kept_verbatim() {
        let json = serde_json::json!([{ "name": "gate", "order": 1, "conditions": "region == 'eu'" }]);
        let steps: WorkflowSteps = serde_json::from_value(json).unwrap();

        assert_eq!(steps.0[0].conditions, "region == 'eu'");
        assert_eq!(steps.0[0].approver, "");
    }
}
