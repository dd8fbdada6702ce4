//! Save and list endpoints for persisted flashcards.

use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use cardforge_core::model::Flashcard;

use crate::AppState;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/flashcards")
            .route(web::post().to(save))
            .route(web::get().to(list)),
    );
}

fn default_user() -> String {
    "anonymous".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveBody {
    #[serde(default = "default_user")]
    user_id: String,
    #[serde(default)]
    flashcards: Vec<Flashcard>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListQuery {
    #[serde(default = "default_user")]
    user_id: String,
}

async fn save(state: web::Data<AppState>, body: web::Json<SaveBody>) -> impl Responder {
    if body.flashcards.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "No flashcards to save"
        }));
    }

    match state.db.save_flashcards(&body.user_id, &body.flashcards) {
        Ok(stored) => HttpResponse::Created().json(serde_json::json!({
            "saved": stored.len(),
            "flashcards": stored,
        })),
        Err(e) => {
            tracing::error!("failed to save flashcards: {e:#}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to save flashcards"
            }))
        }
    }
}

async fn list(state: web::Data<AppState>, query: web::Query<ListQuery>) -> impl Responder {
    match state.db.list_flashcards(&query.user_id) {
        Ok(cards) => HttpResponse::Ok().json(serde_json::json!({ "flashcards": cards })),
        Err(e) => {
            tracing::error!("failed to fetch flashcards: {e:#}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to fetch flashcards"
            }))
        }
    }
}
