//! Route table and handlers.

use super::{ApiResult, AppContext};
use crate::kanban::ports::BoardStore;
use crate::lifecycle::{
    domain::StatusView,
    services::FlexibleKind,
};
use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tower_http::trace::TraceLayer;

const NO_CURRENT_TASK: &str = "no current task";

/// Response body shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageBody {
    /// Human-readable result.
    pub message: String,
}

impl MessageBody {
    /// Wraps `message`.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    fn json(outcome: &impl Display) -> Json<Self> {
        Json(Self::new(outcome.to_string()))
    }
}

/// `/status` response: the message plus the board summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBody {
    /// Current task, or a placeholder when the running pool is empty.
    pub message: String,
    /// Pool counts and session count.
    #[serde(flatten)]
    pub view: StatusView,
}

/// `/tips` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipRequest {
    /// `<type>:<repo>:<question>:<detail>`.
    pub task: String,
}

/// `/update_tasks` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTasksRequest {
    /// New running pool contents.
    pub tasks: Vec<String>,
}

/// `/build_flexible` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildFlexibleRequest {
    /// Ad-hoc task for the `flex` kind.
    #[serde(default)]
    pub task: Option<String>,
    /// `flex` or `pool`.
    #[serde(rename = "type", default)]
    pub kind: FlexibleKind,
    /// Whether to add the action prefix.
    #[serde(default = "default_action")]
    pub action: bool,
}

const fn default_action() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct AddKanbanQuery {
    max_p: Option<usize>,
}

/// Builds the router over `context`.
pub fn router<S, C>(context: AppContext<S, C>) -> Router
where
    S: BoardStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    Router::new()
        .route("/receive", get(receive::<S, C>))
        .route("/start", get(start::<S, C>))
        .route("/close", get(close::<S, C>))
        .route("/run", get(run::<S, C>))
        .route("/build_kanban", get(kanban::<S, C>))
        .route("/kanban", get(kanban::<S, C>))
        .route("/add_kanban", get(add_kanban::<S, C>))
        .route("/status", get(status::<S, C>))
        .route("/tips", post(tips::<S, C>))
        .route("/update_tasks", post(update_tasks::<S, C>))
        .route("/build_flexible", post(build_flexible::<S, C>))
        .layer(TraceLayer::new_for_http())
        .with_state(context)
}

async fn receive<S, C>(State(context): State<AppContext<S, C>>) -> ApiResult<Json<MessageBody>>
where
    S: BoardStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    let current = context.controller().receive().await?;
    let message = current.map_or_else(
        || NO_CURRENT_TASK.to_owned(),
        |decoded| decoded.display_message(),
    );
    Ok(Json(MessageBody::new(message)))
}

async fn start<S, C>(State(context): State<AppContext<S, C>>) -> ApiResult<Json<MessageBody>>
where
    S: BoardStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    Ok(MessageBody::json(&context.controller().start().await?))
}

async fn close<S, C>(State(context): State<AppContext<S, C>>) -> ApiResult<Json<MessageBody>>
where
    S: BoardStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    Ok(MessageBody::json(&context.controller().close().await?))
}

async fn run<S, C>(State(context): State<AppContext<S, C>>) -> ApiResult<Json<MessageBody>>
where
    S: BoardStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    Ok(MessageBody::json(&context.controller().run().await?))
}

async fn kanban<S, C>(State(context): State<AppContext<S, C>>) -> ApiResult<Json<MessageBody>>
where
    S: BoardStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    Ok(MessageBody::json(&context.controller().kanban().await?))
}

async fn add_kanban<S, C>(
    State(context): State<AppContext<S, C>>,
    Query(query): Query<AddKanbanQuery>,
) -> ApiResult<Json<MessageBody>>
where
    S: BoardStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    Ok(MessageBody::json(
        &context.controller().add_kanban(query.max_p).await?,
    ))
}

async fn status<S, C>(State(context): State<AppContext<S, C>>) -> ApiResult<Json<StatusBody>>
where
    S: BoardStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    let view = context.controller().status().await?;
    let message = view
        .current
        .clone()
        .unwrap_or_else(|| NO_CURRENT_TASK.to_owned());
    Ok(Json(StatusBody { message, view }))
}

async fn tips<S, C>(
    State(context): State<AppContext<S, C>>,
    Json(request): Json<TipRequest>,
) -> ApiResult<Json<MessageBody>>
where
    S: BoardStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    Ok(MessageBody::json(
        &context.controller().tips(&request.task).await?,
    ))
}

async fn update_tasks<S, C>(
    State(context): State<AppContext<S, C>>,
    Json(request): Json<UpdateTasksRequest>,
) -> ApiResult<Json<MessageBody>>
where
    S: BoardStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    Ok(MessageBody::json(
        &context.controller().update_tasks(&request.tasks).await?,
    ))
}

async fn build_flexible<S, C>(
    State(context): State<AppContext<S, C>>,
    Json(request): Json<BuildFlexibleRequest>,
) -> ApiResult<Json<MessageBody>>
where
    S: BoardStore + 'static,
    C: Clock + Send + Sync + 'static,
{
    let outcome = context
        .controller()
        .build_flexible(request.task.as_deref(), request.kind, request.action)
        .await?;
    Ok(MessageBody::json(&outcome))
}
