use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use tracing::{error, info};

use crate::{
    core::state::AppState,
    models::{
        audit_log::AuditChanges,
        payment_transaction::{Model as PaymentTransaction, NewPaymentTransaction},
        subscription::{Model as Subscription, NewSubscription, SubscriptionChanges},
    },
    repos::subscriptions::SubscriptionsRepo,
    services::audit,
    utils::{
        jwt::Claims,
        response::{APIError, APIResponse, Created},
    },
};

const RESOURCE: &str = "subscription";

pub async fn create_subscription(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<NewSubscription>,
) -> Result<Created<Subscription>, APIError> {
    let subscription = SubscriptionsRepo::new(state.database.clone())
        .create(payload)
        .await
        .map_err(|e| {
            error!("Failed to create subscription: {}", e);
            APIError::from(e)
        })?;

    audit::record(
        &state.database,
        claims.id,
        subscription.organization_id,
        "create",
        RESOURCE,
        subscription.id,
        audit::snapshot(&subscription),
    )
    .await;

    Ok(Created(subscription))
}

pub async fn get_subscription(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Subscription>, APIError> {
    Ok(Json(
        SubscriptionsRepo::new(state.database.clone()).get(id).await?,
    ))
}

pub async fn update_subscription(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(payload): Json<SubscriptionChanges>,
) -> Result<Json<Subscription>, APIError> {
    let subscriptions_repo = SubscriptionsRepo::new(state.database.clone());
    let before = subscriptions_repo.get(id).await?;
    let after = subscriptions_repo.update(id, payload).await?;

    audit::record(
        &state.database,
        claims.id,
        after.organization_id,
        "update",
        RESOURCE,
        id,
        audit::diff(&before, &after),
    )
    .await;

    Ok(Json(after))
}

pub async fn delete_subscription(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> Result<APIResponse, APIError> {
    let subscriptions_repo = SubscriptionsRepo::new(state.database.clone());
    let subscription = subscriptions_repo.get(id).await?;
    subscriptions_repo.soft_delete(id).await?;

    audit::record(
        &state.database,
        claims.id,
        subscription.organization_id,
        "delete",
        RESOURCE,
        id,
        AuditChanges::default(),
    )
    .await;

    Ok(APIResponse::NoContent)
}

pub async fn record_transaction(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(payload): Json<NewPaymentTransaction>,
) -> Result<Created<PaymentTransaction>, APIError> {
    let subscriptions_repo = SubscriptionsRepo::new(state.database.clone());
    let subscription = subscriptions_repo.get(id).await?;
    let transaction = subscriptions_repo
        .record_transaction(id, payload)
        .await
        .map_err(|e| {
            error!("Failed to record transaction for subscription {}: {}", id, e);
            APIError::from(e)
        })?;
    info!(
        "Recorded {} {} transaction on subscription {}",
        transaction.amount, transaction.currency, id
    );

    audit::record(
        &state.database,
        claims.id,
        subscription.organization_id,
        "record_transaction",
        "payment_transaction",
        transaction.id,
        audit::snapshot(&transaction),
    )
    .await;

    Ok(Created(transaction))
}

pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<PaymentTransaction>>, APIError> {
    Ok(Json(
        SubscriptionsRepo::new(state.database.clone())
            .transactions(id)
            .await?,
    ))
}
