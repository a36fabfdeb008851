use std::sync::Arc;
use std::time::Instant;

use overdub_config::Config;
use overdub_core::HttpError;
use overdub_media::MediaToolkit;
use overdub_storage::ObjectStore;
use overdub_telemetry::metrics::PipelineMetrics;
use tracing::Instrument;

use crate::{
    assets::BaseAssetProvider,
    compositor::Compositor,
    error::Result,
    fetcher::AudioFetcher,
    publisher::Publisher,
    scratch::Scratch,
    types::{CombineRequest, CombineResponse},
};

/// Runs the fetch, compose and publish steps for each request
///
/// Built once at startup and shared across requests; holds no per-request
/// state, so concurrent requests only share the object store handle and
/// the scratch directory.
pub struct Combiner {
    scratch: Scratch,
    media: MediaToolkit,
    fetcher: AudioFetcher,
    base_asset: BaseAssetProvider,
    compositor: Compositor,
    publisher: Publisher,
    metrics: PipelineMetrics,
}

impl Combiner {
    /// Handle one combine request end to end
    ///
    /// Every temporary file created along the way is gone by the time this
    /// returns, whatever the outcome.
    pub async fn combine(&self, request: CombineRequest) -> Result<CombineResponse> {
        let start = Instant::now();
        let result = self.run(&request).await;

        match &result {
            Ok(response) => {
                self.metrics.record_request(start, "ok");
                tracing::info!(
                    audio_url = %request.audio_url,
                    video_url = %response.video_url,
                    elapsed_ms = start.elapsed().as_millis(),
                    "combine succeeded"
                );
            }
            Err(e) => {
                self.metrics.record_request(start, e.error_type());
                if e.status_code().is_server_error() {
                    tracing::error!(audio_url = %request.audio_url, step = e.step(), error = %e, "combine failed");
                } else {
                    tracing::warn!(audio_url = %request.audio_url, step = e.step(), error = %e, "combine rejected");
                }
            }
        }

        result
    }

    async fn run(&self, request: &CombineRequest) -> Result<CombineResponse> {
        let url = request.audio_url()?;

        let audio = self
            .step("fetch_audio", self.fetcher.fetch(&url, &self.scratch, &self.media))
            .await?;
        let video = self.step("base_video", self.base_asset.fetch(&self.scratch)).await?;
        let rendered = self
            .step(
                "compose",
                self.compositor.compose(video.path(), audio.path(), &self.scratch),
            )
            .await?;

        // Inputs are no longer needed once the render exists
        audio.release();
        video.release();

        let video_url = self.step("publish", self.publisher.publish(&rendered)).await?;
        rendered.release();

        Ok(CombineResponse { video_url })
    }

    async fn step<T>(&self, name: &'static str, work: impl Future<Output = Result<T>>) -> Result<T> {
        let start = Instant::now();
        let result = work.instrument(tracing::info_span!("combine_step", step = name)).await;
        self.metrics.record_step(start, name);
        result
    }
}

/// Builder for constructing the combiner from configuration
pub(crate) struct CombinerBuilder<'a> {
    config: &'a Config,
    store: Arc<dyn ObjectStore>,
}

impl<'a> CombinerBuilder<'a> {
    pub fn new(config: &'a Config, store: Arc<dyn ObjectStore>) -> Self {
        Self { config, store }
    }

    pub fn build(self) -> anyhow::Result<Combiner> {
        let config = self.config;
        let media = MediaToolkit::from_config(&config.media);
        let scratch = Scratch::new(config.media.scratch_dir.clone());

        tracing::debug!(
            bucket = self.store.bucket(),
            base_video = %config.storage.base_video_object,
            scratch_dir = %scratch.dir().display(),
            "combine pipeline initialized"
        );

        Ok(Combiner {
            fetcher: AudioFetcher::new(&config.fetch)?,
            base_asset: BaseAssetProvider::new(self.store.clone(), config.storage.base_video_object.clone()),
            compositor: Compositor::new(media.clone()),
            publisher: Publisher::new(self.store, &config.publish),
            metrics: PipelineMetrics::new(),
            scratch,
            media,
        })
    }
}
