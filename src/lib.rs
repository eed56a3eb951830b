pub mod config;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    ai_service::{AIService, TextGenerator},
    quiz_service::{QuizService, QuizSettings},
    session_service::SessionService,
};
use reqwest::Client;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: QuizService,
    pub session_service: SessionService,
}

impl AppState {
    pub fn new() -> error::Result<Self> {
        let config = crate::config::get_config();
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(180))
            .build()
            .map_err(|e| error::Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        let ai_service = AIService::new(
            config.openai_api_key.clone(),
            config.openai_base_url.clone(),
            config.openai_model.clone(),
            http_client,
        );
        let settings = QuizSettings {
            default_count: config.default_question_count,
            max_count: config.max_question_count,
            chunk_size: config.chunk_size,
            generation_timeout: config.generation_timeout(),
        };

        Ok(Self {
            quiz_service: QuizService::new(Arc::new(ai_service), settings),
            session_service: SessionService::with_limits(config.session_ttl(), config.max_sessions),
        })
    }

    pub fn with_generator(generator: Arc<dyn TextGenerator>, settings: QuizSettings) -> Self {
        Self {
            quiz_service: QuizService::new(generator, settings),
            session_service: SessionService::new(),
        }
    }
}
