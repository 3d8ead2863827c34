use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{error, info};

use crate::{
    core::state::AppState,
    models::{
        feature::{Model as Feature, NewFeature},
        subscription_plan::{Model as SubscriptionPlan, NewPlan, PlanChanges},
    },
    repos::plans::{FeaturesRepo, PlansRepo},
    utils::response::{APIError, APIResponse, Created},
};

pub async fn create_plan(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewPlan>,
) -> Result<Created<SubscriptionPlan>, APIError> {
    let plan = PlansRepo::new(state.database.clone())
        .create(payload)
        .await
        .map_err(|e| {
            error!("Failed to create plan: {}", e);
            APIError::from(e)
        })?;
    info!("Created plan {} ({})", plan.id, plan.name);

    Ok(Created(plan))
}

pub async fn list_plans(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SubscriptionPlan>>, APIError> {
    Ok(Json(PlansRepo::new(state.database.clone()).list().await?))
}

pub async fn get_plan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<SubscriptionPlan>, APIError> {
    Ok(Json(PlansRepo::new(state.database.clone()).get(id).await?))
}

pub async fn update_plan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<PlanChanges>,
) -> Result<Json<SubscriptionPlan>, APIError> {
    Ok(Json(
        PlansRepo::new(state.database.clone())
            .update(id, payload)
            .await?,
    ))
}

pub async fn delete_plan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<APIResponse, APIError> {
    PlansRepo::new(state.database.clone()).soft_delete(id).await?;
    info!("Deleted plan {}", id);

    Ok(APIResponse::NoContent)
}

pub async fn list_plan_features(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Vec<Feature>>, APIError> {
    Ok(Json(PlansRepo::new(state.database.clone()).features(id).await?))
}

pub async fn add_plan_feature(
    State(state): State<Arc<AppState>>,
    Path((id, feature_id)): Path<(i32, i32)>,
) -> Result<APIResponse, APIError> {
    PlansRepo::new(state.database.clone())
        .add_feature(id, feature_id)
        .await?;

    Ok(APIResponse::OK)
}

pub async fn create_feature(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewFeature>,
) -> Result<Created<Feature>, APIError> {
    let feature = FeaturesRepo::new(state.database.clone())
        .create(payload)
        .await
        .map_err(|e| {
            error!("Failed to create feature: {}", e);
            APIError::from(e)
        })?;

    Ok(Created(feature))
}

pub async fn list_features(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Feature>>, APIError> {
    Ok(Json(FeaturesRepo::new(state.database.clone()).list().await?))
}

pub async fn delete_feature(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<APIResponse, APIError> {
    FeaturesRepo::new(state.database.clone())
        .soft_delete(id)
        .await?;

    Ok(APIResponse::NoContent)
}
