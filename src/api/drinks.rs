// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};

use crate::{
    auth::{
        permissions::{DeleteDrinks, GetDrinksDetail, PatchDrinks, PostDrinks},
        RequirePermission,
    },
    error::ApiError,
    models::{
        CreateDrinkRequest, DrinkDeleted, DrinkList, DrinkSummaryList, UpdateDrinkRequest,
    },
    state::AppState,
};

fn drink_id(id: Result<Path<u64>, PathRejection>) -> Result<u64, ApiError> {
    id.map(|Path(id)| id)
        .map_err(|_| ApiError::not_found("resource not found"))
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::unprocessable(rejection.body_text()))
}

#[utoipa::path(
    get,
    path = "/drinks",
    tag = "Drinks",
    responses((status = 200, body = DrinkSummaryList))
)]
pub async fn list_drinks(State(state): State<AppState>) -> Json<DrinkSummaryList> {
    let store = state.store.read().await;
    Json(DrinkSummaryList {
        success: true,
        drinks: store.list_drinks().iter().map(|drink| drink.short()).collect(),
    })
}

#[utoipa::path(
    get,
    path = "/drinks-detail",
    tag = "Drinks",
    security(("bearer_auth" = ["get:drinks-detail"])),
    responses(
        (status = 200, body = DrinkList),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Permission not granted")
    )
)]
pub async fn list_drink_details(
    RequirePermission(_claims, _): RequirePermission<GetDrinksDetail>,
    State(state): State<AppState>,
) -> Json<DrinkList> {
    let store = state.store.read().await;
    Json(DrinkList {
        success: true,
        drinks: store.list_drinks(),
    })
}

#[utoipa::path(
    post,
    path = "/drinks",
    request_body = CreateDrinkRequest,
    tag = "Drinks",
    security(("bearer_auth" = ["post:drinks"])),
    responses(
        (status = 200, body = DrinkList),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Permission not granted"),
        (status = 422, description = "Invalid drink or duplicate title")
    )
)]
pub async fn create_drink(
    RequirePermission(claims, _): RequirePermission<PostDrinks>,
    State(state): State<AppState>,
    payload: Result<Json<CreateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinkList>, ApiError> {
    let request = body(payload)?;
    let drink = state.store.write().await.create_drink(request)?;

    tracing::info!(drink_id = drink.id, subject = claims.subject(), "Drink created");
    Ok(Json(DrinkList {
        success: true,
        drinks: vec![drink],
    }))
}

#[utoipa::path(
    patch,
    path = "/drinks/{id}",
    params(("id" = u64, Path, description = "Identifier of the drink to update")),
    request_body = UpdateDrinkRequest,
    tag = "Drinks",
    security(("bearer_auth" = ["patch:drinks"])),
    responses(
        (status = 200, body = DrinkList),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Permission not granted"),
        (status = 404, description = "Drink not found"),
        (status = 422, description = "Invalid update or duplicate title")
    )
)]
pub async fn update_drink(
    RequirePermission(claims, _): RequirePermission<PatchDrinks>,
    id: Result<Path<u64>, PathRejection>,
    State(state): State<AppState>,
    payload: Result<Json<UpdateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinkList>, ApiError> {
    let id = drink_id(id)?;
    let request = body(payload)?;
    let drink = state.store.write().await.update_drink(id, request)?;

    tracing::info!(drink_id = id, subject = claims.subject(), "Drink updated");
    Ok(Json(DrinkList {
        success: true,
        drinks: vec![drink],
    }))
}

#[utoipa::path(
    delete,
    path = "/drinks/{id}",
    params(("id" = u64, Path, description = "Identifier of the drink to delete")),
    tag = "Drinks",
    security(("bearer_auth" = ["delete:drinks"])),
    responses(
        (status = 200, body = DrinkDeleted),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Permission not granted"),
        (status = 404, description = "Drink not found")
    )
)]
pub async fn delete_drink(
    RequirePermission(claims, _): RequirePermission<DeleteDrinks>,
    id: Result<Path<u64>, PathRejection>,
    State(state): State<AppState>,
) -> Result<Json<DrinkDeleted>, ApiError> {
    let id = drink_id(id)?;
    state.store.write().await.delete_drink(id)?;

    tracing::info!(drink_id = id, subject = claims.subject(), "Drink deleted");
    Ok(Json(DrinkDeleted {
        success: true,
        delete: id,
    }))
}
