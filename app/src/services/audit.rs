use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::{
    models::audit_log::{AuditChanges, NewAuditLog},
    repos::audit_logs::AuditLogsRepo,
};

/// Appends an audit entry for an organization-scoped change. A failed append
/// is logged and otherwise ignored; the change itself already happened.
pub async fn record(
    db: &DatabaseConnection,
    actor: i32,
    organization_id: i32,
    action: &str,
    resource_type: &str,
    resource_id: i32,
    changes: AuditChanges,
) {
    let entry = NewAuditLog {
        organization_id,
        action: action.to_string(),
        resource_type: resource_type.to_string(),
        resource_id,
        changes,
    };

    if let Err(e) = AuditLogsRepo::new(db.clone()).append(entry, actor).await {
        warn!(
            "Failed to record {} on {} {}: {}",
            action, resource_type, resource_id, e
        );
    }
}

/// Snapshot of a resource as the `after` side of a diff, or as an opaque
/// payload when it does not serialize to an object.
pub fn snapshot<T: Serialize>(resource: &T) -> AuditChanges {
    match serde_json::to_value(resource) {
        Ok(value) => AuditChanges::Opaque(value),
        Err(e) => {
            warn!("Failed to snapshot resource for audit: {}", e);
            AuditChanges::default()
        }
    }
}

/// Field-level diff between two snapshots of the same resource. Only
/// top-level fields that changed are kept, and `updated_at` is ignored.
pub fn diff<T: Serialize>(before: &T, after: &T) -> AuditChanges {
    let (Ok(Value::Object(before)), Ok(Value::Object(after))) =
        (serde_json::to_value(before), serde_json::to_value(after))
    else {
        return AuditChanges::default();
    };

    after
        .iter()
        .filter(|(name, _)| name.as_str() != "updated_at")
        .filter(|(name, value)| before.get(name.as_str()) != Some(*value))
        .fold(AuditChanges::default(), |changes, (name, value)| {
            let previous = before.get(name.as_str()).cloned().unwrap_or(Value::Null);
            changes.field(name, previous, value)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::audit_log::FieldDiff;

    #[derive(Serialize)]
    struct Domain {
        domain: &'static str,
        verified: bool,
        updated_at: i64,
    }

    #[test]
    fn diff_keeps_only_changed_fields() {
        let before = Domain {
            domain: "acme.test",
            verified: false,
            updated_at: 1,
        };
        let after = Domain {
            verified: true,
            updated_at: 2,
            ..before
        };

        let AuditChanges::Fields(FieldDiff { fields }) = diff(&before, &after) else {
            panic!("expected a field diff");
        };
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["verified"].before, Value::Bool(false));
        assert_eq!(fields["verified"].after, Value::Bool(true));
    }

    #[test]
    fn snapshots_are_opaque() {
        let snapshot = snapshot(&serde_json::json!({"name": "Acme"}));
        assert_eq!(
            snapshot,
            AuditChanges::Opaque(serde_json::json!({"name": "Acme"}))
        );
    }
}
