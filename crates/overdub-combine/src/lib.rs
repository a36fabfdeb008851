#![allow(
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_const_for_fn,
    clippy::module_name_repetitions
)]

//! The combine pipeline: fetch remote audio, lay it over the base video,
//! publish the result.

mod assets;
mod compositor;
mod error;
mod fetcher;
mod pipeline;
mod publisher;
mod request;
mod scratch;
#[cfg(test)]
mod test_store;
mod types;

use std::sync::Arc;

use axum::{Json, Router, extract::State, routing::post};
use overdub_storage::ObjectStore;

pub use error::{CombineError, Result};
pub use pipeline::Combiner;
pub use types::{CombineRequest, CombineResponse};
use pipeline::CombinerBuilder;
use request::ExtractPayload;

/// Build the combine pipeline from configuration
///
/// The object store is passed in so callers decide which backend (or test
/// double) serves the base video and receives the results.
pub fn build_server(config: &overdub_config::Config, store: Arc<dyn ObjectStore>) -> anyhow::Result<Arc<Combiner>> {
    let combiner = Arc::new(
        CombinerBuilder::new(config, store)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to initialize combine pipeline: {e}"))?,
    );
    Ok(combiner)
}

/// Create the endpoint router for the combine pipeline
pub fn endpoint_router() -> Router<Arc<Combiner>> {
    Router::new().route("/combine-video-audio", post(combine_video_audio))
}

async fn combine_video_audio(
    State(combiner): State<Arc<Combiner>>,
    ExtractPayload(request): ExtractPayload<CombineRequest>,
) -> Result<Json<CombineResponse>> {
    tracing::debug!(audio_url = %request.audio_url, "combine handler called");

    let response = combiner.combine(request).await?;

    Ok(Json(response))
}
