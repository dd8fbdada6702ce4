//! HTTP route handlers.

pub mod flashcards;
pub mod generate;
pub mod health;

pub fn config_routes(cfg: &mut actix_web::web::ServiceConfig) {
    generate::config_routes(cfg);
    flashcards::config_routes(cfg);
    health::config_routes(cfg);
}
