use sea_orm::{entity::prelude::*, ActiveValue::Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
    #[sea_orm(string_value = "trialing")]
    Trialing,
    #[sea_orm(string_value = "canceled")]
    Canceled,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "subscriptions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
    pub organization_id: i32,
    pub plan_id: Option<i32>,
    pub status: SubscriptionStatus,
    pub start_date: DateTimeUtc,
    pub end_date: Option<DateTimeUtc>,
    pub payment_method: String,
    pub last_payment_date: Option<DateTimeUtc>,
    pub next_billing_date: Option<DateTimeUtc>,
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
    #[sea_orm(
        belongs_to = "super::subscription_plan::Entity",
        from = "Column::PlanId",
        to = "super::subscription_plan::Column::Id",
        on_delete = "SetNull"
    )]
    SubscriptionPlan,
    #[sea_orm(has_many = "super::payment_transaction::Entity")]
    PaymentTransaction,
}

impl Related<super::organization::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organization.def()
    }
}

impl Related<super::subscription_plan::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SubscriptionPlan.def()
    }
}

impl Related<super::payment_transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PaymentTransaction.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

super::base::soft_delete_entity!();

#[derive(Debug, Deserialize)]
pub struct NewSubscription {
    pub organization_id: i32,
    #[serde(default)]
    pub plan_id: Option<i32>,
    #[serde(default)]
    pub status: Option<SubscriptionStatus>,
    #[serde(default)]
    pub start_date: Option<DateTimeUtc>,
    #[serde(default)]
    pub end_date: Option<DateTimeUtc>,
    #[serde(default)]
    pub payment_method: String,
    #[serde(default)]
    pub last_payment_date: Option<DateTimeUtc>,
    #[serde(default)]
    pub next_billing_date: Option<DateTimeUtc>,
}

impl NewSubscription {
    /// Unset status defaults to trialing and unset start date to the
    /// creation time. Nothing moves the status afterwards except explicit
    /// updates.
    pub fn into_active_model(self) -> ActiveModel {
        let now = chrono::Utc::now();

        ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            organization_id: Set(self.organization_id),
            plan_id: Set(self.plan_id),
            status: Set(self.status.unwrap_or(SubscriptionStatus::Trialing)),
            start_date: Set(self.start_date.unwrap_or(now)),
            end_date: Set(self.end_date),
            payment_method: Set(self.payment_method),
            last_payment_date: Set(self.last_payment_date),
            next_billing_date: Set(self.next_billing_date),
            ..Default::default()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SubscriptionChanges {
    pub plan_id: Option<i32>,
    pub status: Option<SubscriptionStatus>,
    pub end_date: Option<DateTimeUtc>,
    pub payment_method: Option<String>,
    pub last_payment_date: Option<DateTimeUtc>,
    pub next_billing_date: Option<DateTimeUtc>,
}

impl SubscriptionChanges {
    pub fn apply(self, subscription: Model) -> ActiveModel {
        let mut active: ActiveModel = subscription.into();
        if let Some(plan_id) = self.plan_id {
            active.plan_id = Set(Some(plan_id));
        }
        if let Some(status) = self.status {
            active.status = Set(status);
        }
        if let Some(end_date) = self.end_date {
            active.end_date = Set(Some(end_date));
        }
        if let Some(payment_method) = self.payment_method {
            active.payment_method = Set(payment_method);
        }
        if let Some(date) = self.last_payment_date {
            active.last_payment_date = Set(Some(date));
        }
        if let Some(date) = self.next_billing_date {
            active.next_billing_date = Set(Some(date));
        }
        active.updated_at = Set(chrono::Utc::now());
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn new_subscription() -> NewSubscription {
        NewSubscription {
            organization_id: 3,
            plan_id: None,
            status: None,
            start_date: None,
            end_date: None,
            payment_method: String::new(),
            last_payment_date: None,
            next_billing_date: None,
        }
    }

    #[test]
    fn defaults_to_trialing_from_now() {
        let before = Utc::now();
        let active = new_subscription().into_active_model();
        let after = Utc::now();

        assert_eq!(active.status.unwrap(), SubscriptionStatus::Trialing);
        let start = active.start_date.unwrap();
        assert_eq!(start, active.created_at.unwrap());
        assert!(start >= before && start <= after + Duration::seconds(1));
    }

    #[test]
    fn explicit_values_are_kept() {
        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let active = NewSubscription {
            status: Some(SubscriptionStatus::Active),
            start_date: Some(start),
            ..new_subscription()
        }
        .into_active_model();

        assert_eq!(active.status.unwrap(), SubscriptionStatus::Active);
        assert_eq!(active.start_date.unwrap(), start);
    }

    #[test]
    fn status_round_trips_through_json() {
        let status: SubscriptionStatus = serde_json::from_str("\"canceled\"").unwrap();
        assert_eq!(status, SubscriptionStatus::Canceled);
    }
}
