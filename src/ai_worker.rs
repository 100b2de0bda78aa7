use crate::ai::{fallback_questions, QuestionSource, SearchProvider};
use crate::logger;
use crate::models::{AiRequest, AiResponse};
use crossbeam_channel::{Receiver, Sender};
use std::io;
use std::sync::Arc;
use std::thread;

/// Collaborators the worker calls. A missing backend behaves like a failing
/// one: generation falls back to the static batch and search returns nothing.
#[derive(Clone, Default)]
pub struct AiBackends {
    pub questions: Option<Arc<dyn QuestionSource>>,
    pub search: Option<Arc<dyn SearchProvider>>,
}

pub async fn handle_request(backends: &AiBackends, request: AiRequest) -> AiResponse {
    match request {
        AiRequest::Generate { token, content } => {
            let generated = match &backends.questions {
                Some(source) => source.generate(&content).await,
                None => Err(crate::error::AiError::Client("AI is not configured".to_string())),
            };
            match generated {
                Ok(questions) => AiResponse::Questions {
                    token,
                    questions,
                    used_fallback: false,
                },
                Err(e) => {
                    logger::log(&format!("Generation failed, using fallback: {}", e));
                    AiResponse::Questions {
                        token,
                        questions: fallback_questions(),
                        used_fallback: true,
                    }
                }
            }
        }
        AiRequest::Search {
            token,
            question_id,
            query,
        } => {
            let results = match &backends.search {
                Some(provider) => provider.search(&query).await.unwrap_or_else(|e| {
                    logger::log(&format!("Search failed for question {}: {}", question_id, e));
                    Vec::new()
                }),
                None => Vec::new(),
            };
            AiResponse::SearchResults {
                token,
                question_id,
                results,
            }
        }
    }
}

pub fn spawn_ai_worker(
    ai_tx: Sender<AiResponse>,
    ai_rx: Receiver<AiRequest>,
    backends: AiBackends,
) -> io::Result<thread::JoinHandle<()>> {
    thread::Builder::new()
        .name("neurally::ai_worker".to_string())
        .spawn(move || {
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    logger::log(&format!("Worker failed to start runtime: {}", e));
                    return;
                }
            };

            // Exits once every request sender is dropped.
            while let Ok(request) = ai_rx.recv() {
                logger::log(&format!("Worker received request: {:?}", request));
                let response = rt.block_on(handle_request(&backends, request));
                if ai_tx.send(response).is_err() {
                    break;
                }
            }
            logger::log("Worker channel disconnected, exiting");
        })
}
