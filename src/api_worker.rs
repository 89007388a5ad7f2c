use crate::api::QuizService;
use crate::models::{ApiRequest, ApiResponse};
use crossbeam_channel::{Receiver, Sender};
use std::io;
use std::sync::Arc;
use std::thread;

/// Runs quiz service calls off the UI thread.
///
/// Each request becomes its own task, so a slow generation never holds up a
/// newer one. Every response carries the id of the request that produced it;
/// deciding whether it is still wanted is up to the receiver. The worker stops
/// once the request channel disconnects.
pub fn spawn_api_worker(
    service: Arc<dyn QuizService>,
    response_tx: Sender<ApiResponse>,
    request_rx: Receiver<ApiRequest>,
) -> io::Result<thread::JoinHandle<()>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    thread::Builder::new()
        .name("notes-quiz::api_worker".to_string())
        .spawn(move || {
            while let Ok(request) = request_rx.recv() {
                let service = Arc::clone(&service);
                let tx = response_tx.clone();
                runtime.spawn(async move {
                    let response = execute(service.as_ref(), request).await;
                    if tx.send(response).is_err() {
                        log::debug!("Response dropped, UI is gone");
                    }
                });
            }
            log::info!("Worker channel disconnected, exiting");
            runtime.shutdown_background();
        })
}

async fn execute(service: &dyn QuizService, request: ApiRequest) -> ApiResponse {
    match request {
        ApiRequest::Generate { request_id, params } => {
            log::info!("Worker running generation #{}", request_id);
            let outcome = service.generate_quiz(&params).await;
            if let Err(e) = &outcome {
                log::warn!("Generation #{} failed: {}", request_id, e);
            }
            ApiResponse::Generated {
                request_id,
                outcome,
            }
        }
        ApiRequest::Extract { request_id, files } => {
            log::info!(
                "Worker running extraction #{} for {} file(s)",
                request_id,
                files.len()
            );
            let outcome = service.extract_notes(&files).await;
            if let Err(e) = &outcome {
                log::warn!("Extraction #{} failed: {}", request_id, e);
            }
            ApiResponse::Extracted {
                request_id,
                files,
                outcome,
            }
        }
    }
}
