use crate::data::{EngineConfig, SchedulingInput, SolveResult};
use crate::solver;
use axum::{Json, Router, routing::post};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SolveRequest {
    #[serde(flatten)]
    input: SchedulingInput,
    #[serde(default)]
    config: EngineConfig,
}

// The run contract never surfaces a bare error, so the handler always
// answers 200 with the structured result.
async fn solve_handler(Json(request): Json<SolveRequest>) -> Json<SolveResult> {
    Json(solver::solve(&request.input, &request.config))
}

pub async fn run_server() {
    let app = Router::new().route("/v1/timetable/solve", post(solve_handler));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:8080")
        .await
        .unwrap();

    println!("Server running at http://{}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
