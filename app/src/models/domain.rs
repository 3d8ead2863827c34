use sea_orm::{entity::prelude::*, ActiveValue::Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "domains")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
    pub organization_id: i32,
    #[sea_orm(unique)]
    pub domain: String,
    pub verified: bool,
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

/// Lowercases and trims a hostname. Returns `None` for values that cannot be
/// a hostname (empty, whitespace, scheme or path separators).
pub fn normalize_hostname(raw: &str) -> Option<String> {
    let host = raw.trim().trim_end_matches('.').to_ascii_lowercase();

    let valid = !host.is_empty()
        && host.len() <= 253
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
        && !host.starts_with('.')
        && !host.contains("..");

    valid.then_some(host)
}

#[derive(Debug, Deserialize)]
pub struct NewDomain {
    pub organization_id: i32,
    pub domain: String,
}

impl NewDomain {
    /// `None` when the hostname is invalid.
    pub fn into_active_model(self) -> Option<ActiveModel> {
        let domain = normalize_hostname(&self.domain)?;
        let now = chrono::Utc::now();

        Some(ActiveModel {
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            organization_id: Set(self.organization_id),
            domain: Set(domain),
            verified: Set(false),
            ..Default::default()
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DomainChanges {
    pub verified: Option<bool>,
}

impl DomainChanges {
    pub fn apply(self, domain: Model) -> ActiveModel {
        let mut active: ActiveModel = domain.into();
        if let Some(verified) = self.verified {
            active.verified = Set(verified);
        }
        active.updated_at = Set(chrono::Utc::now());
        active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hostnames_are_normalized() {
        assert_eq!(
            normalize_hostname("  App.Example.COM. "),
            Some("app.example.com".to_string())
        );
        assert_eq!(normalize_hostname("a-b.io"), Some("a-b.io".to_string()));
    }

    #[test]
    fn junk_hostnames_are_rejected() {
        assert_eq!(normalize_hostname(""), None);
        assert_eq!(normalize_hostname("https://example.com"), None);
        assert_eq!(normalize_hostname("exa mple.com"), None);
        assert_eq!(normalize_hostname(".example.com"), None);
        assert_eq!(normalize_hostname("example..com"), None);
    }
}
