use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id_role: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: i32,
}

/// Create and update payload. Any `idRole` in the body is ignored.
#[derive(Deserialize)]
pub struct RoleInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "active")]
    pub status: i32,
}

fn active() -> i32 {
    1
}

#[derive(Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
}

fn default_size() -> u32 {
    20
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub content: Vec<Role>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub number: u32,
    pub size: u32,
    pub number_of_elements: u32,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

pub type Db = Arc<RwLock<HashMap<Uuid, Role>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/roles", get(list_roles).post(create_role))
        .route("/roles/pageable", get(list_roles_pageable))
        .route("/roles/{id}", get(get_role).put(update_role).delete(delete_role))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock server listening");
    }
    axum::serve(listener, app()).await
}

async fn sorted_roles(db: &Db) -> Vec<Role> {
    let mut roles: Vec<Role> = db.read().await.values().cloned().collect();
    roles.sort_by(|a, b| a.name.cmp(&b.name).then(a.id_role.cmp(&b.id_role)));
    roles
}

async fn list_roles(State(db): State<Db>) -> Json<Vec<Role>> {
    Json(sorted_roles(&db).await)
}

async fn list_roles_pageable(
    State(db): State<Db>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page>, StatusCode> {
    if params.size == 0 {
        return Err(StatusCode::BAD_REQUEST);
    }
    let roles = sorted_roles(&db).await;
    let total = roles.len() as u64;
    let total_pages = total.div_ceil(params.size as u64) as u32;
    let content: Vec<Role> = roles
        .into_iter()
        .skip(params.page as usize * params.size as usize)
        .take(params.size as usize)
        .collect();
    let count = content.len() as u32;
    Ok(Json(Page {
        content,
        total_elements: total,
        total_pages,
        number: params.page,
        size: params.size,
        number_of_elements: count,
        first: params.page == 0,
        last: params.page.saturating_add(1) >= total_pages,
        empty: count == 0,
    }))
}

async fn create_role(
    State(db): State<Db>,
    Json(input): Json<RoleInput>,
) -> (StatusCode, Json<Role>) {
    let role = Role {
        id_role: Uuid::new_v4(),
        name: input.name,
        description: input.description,
        status: input.status,
    };
    db.write().await.insert(role.id_role, role.clone());
    (StatusCode::CREATED, Json(role))
}

async fn get_role(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<Json<Role>, StatusCode> {
    let roles = db.read().await;
    roles.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_role(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<RoleInput>,
) -> Result<Json<Role>, StatusCode> {
    let mut roles = db.write().await;
    let role = roles.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    role.name = input.name;
    role.description = input.description;
    role.status = input.status;
    Ok(Json(role.clone()))
}

async fn delete_role(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<StatusCode, StatusCode> {
    let mut roles = db.write().await;
    roles.remove(&id).map(|_| StatusCode::NO_CONTENT).ok_or(StatusCode::NOT_FOUND)
}
