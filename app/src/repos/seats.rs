use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, ModelTrait,
    QueryFilter, QueryOrder,
};

use crate::{
    models::{
        organization::Entity as OrganizationEntity,
        role::{self, Entity as RoleEntity, Model as Role},
        seat::{self, Entity as SeatEntity, Model as Seat, NewSeat, SeatChanges},
        seat_role,
        user::Entity as UserEntity,
    },
    repos::{
        scope::{find_live, hide_deleted, link, scoped, soft_delete},
        WriteError,
    },
};

pub struct SeatsRepo {
    db: DatabaseConnection,
}

impl SeatsRepo {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// A seat binds a live user to a live organization.
    pub async fn create(&self, new_seat: NewSeat) -> Result<Seat, DbErr> {
        find_live::<OrganizationEntity, _>(&self.db, new_seat.organization_id).await?;
        find_live::<UserEntity, _>(&self.db, new_seat.user_id).await?;

        new_seat.into_active_model().insert(&self.db).await
    }

    pub async fn get(&self, id: i32) -> Result<Seat, DbErr> {
        find_live::<SeatEntity, _>(&self.db, id).await
    }

    pub async fn update(&self, id: i32, changes: SeatChanges) -> Result<Seat, WriteError> {
        let seat = self.get(id).await?;
        let seat = changes.apply(seat)?.update(&self.db).await?;

        Ok(seat)
    }

    pub async fn soft_delete(&self, id: i32) -> Result<(), DbErr> {
        soft_delete::<SeatEntity, _>(&self.db, id).await
    }

    pub async fn list_for_organization(
        &self,
        organization_id: i32,
        include_deleted: bool,
    ) -> Result<Vec<Seat>, DbErr> {
        scoped::<SeatEntity>(include_deleted)
            .filter(seat::Column::OrganizationId.eq(organization_id))
            .order_by_asc(seat::Column::Id)
            .all(&self.db)
            .await
    }

    pub async fn assign_role(&self, seat_id: i32, role_id: i32) -> Result<(), DbErr> {
        self.get(seat_id).await?;
        find_live::<RoleEntity, _>(&self.db, role_id).await?;

        link(
            &self.db,
            seat_role::ActiveModel {
                seat_id: Set(seat_id),
                role_id: Set(role_id),
            },
        )
        .await
    }

    pub async fn roles(&self, seat_id: i32) -> Result<Vec<Role>, DbErr> {
        let seat = self.get(seat_id).await?;

        hide_deleted(seat.find_related(RoleEntity))
            .order_by_asc(role::Column::Name)
            .all(&self.db)
            .await
    }
}
