//! The flashcard generation endpoint.

use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use cardforge_core::error::GenerateError;

use crate::AppState;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/generate").route(web::post().to(generate)));
}

#[derive(Debug, Deserialize)]
struct GenerateBody {
    #[serde(default)]
    notes: String,
}

async fn generate(state: web::Data<AppState>, body: web::Json<GenerateBody>) -> impl Responder {
    match state.generator.generate(&body.notes).await {
        Ok(cards) => HttpResponse::Ok().json(serde_json::json!({ "flashcards": cards })),
        Err(GenerateError::InvalidInput) => HttpResponse::BadRequest().json(serde_json::json!({
            "error": "No notes provided"
        })),
        Err(GenerateError::Analysis(e)) => {
            tracing::error!("analysis failed: {e:#}");
            HttpResponse::BadGateway().json(serde_json::json!({
                "error": "Failed to analyze notes"
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    use cardforge_core::model::{Analysis, Entity, EntityCategory};

    use crate::controllers::test_util::test_state;

    fn analysis() -> Analysis {
        Analysis {
            entities: vec![
                Entity::new("Marie Curie", EntityCategory::Person),
                Entity::new("1898", EntityCategory::Date),
            ],
            ..Default::default()
        }
    }

    #[actix_web::test]
    async fn generate_returns_cards() {
        let (_dir, state) = test_state(analysis(), 0.9);
        let app = test::init_service(
            App::new()
                .app_data(state)
                .configure(crate::controllers::config_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/generate")
            .set_json(serde_json::json!({ "notes": "Marie Curie discovered radium in 1898." }))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        let cards = body["flashcards"].as_array().unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0]["question"], "Who is Marie Curie?");
        assert_eq!(cards[1]["question"], "When did 1898 happen?");
    }

    #[actix_web::test]
    async fn blank_notes_rejected() {
        let (_dir, state) = test_state(Analysis::default(), 0.9);
        let app = test::init_service(
            App::new()
                .app_data(state)
                .configure(crate::controllers::config_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/generate")
            .set_json(serde_json::json!({ "notes": "   " }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn missing_notes_field_rejected() {
        let (_dir, state) = test_state(Analysis::default(), 0.9);
        let app = test::init_service(
            App::new()
                .app_data(state)
                .configure(crate::controllers::config_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/generate")
            .set_json(serde_json::json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
    }
}
