use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

/// Runs a pipeline's extract, transform and load stages in order.
pub struct HubEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> HubEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("🚀 Starting snapshot export");

        tracing::info!("📡 Extracting market data...");
        let snapshot = self.pipeline.extract().await?;
        tracing::debug!("Extract finished after {:?}", started.elapsed());

        tracing::info!("🔄 Building dashboard report...");
        let report = self.pipeline.transform(snapshot).await?;
        tracing::debug!("Transform finished after {:?}", started.elapsed());

        tracing::info!("💾 Writing bundle...");
        let output_path = self.pipeline.load(report).await?;

        tracing::info!("✅ Snapshot exported to {} in {:?}", output_path, started.elapsed());
        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::HubError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingPipeline {
        fail_transform: bool,
        stages: Mutex<Vec<&'static str>>,
    }

    #[async_trait]
    impl Pipeline for RecordingPipeline {
        type Snapshot = u32;
        type Report = String;

        async fn extract(&self) -> Result<u32> {
            self.stages.lock().unwrap().push("extract");
            Ok(21)
        }

        async fn transform(&self, snapshot: u32) -> Result<String> {
            self.stages.lock().unwrap().push("transform");
            if self.fail_transform {
                return Err(HubError::ProcessingError {
                    message: "bad snapshot".to_string(),
                });
            }
            Ok((snapshot * 2).to_string())
        }

        async fn load(&self, report: String) -> Result<String> {
            self.stages.lock().unwrap().push("load");
            Ok(format!("out/{}.zip", report))
        }
    }

    #[tokio::test]
    async fn test_run_executes_stages_in_order() {
        let engine = HubEngine::new(RecordingPipeline {
            fail_transform: false,
            stages: Mutex::new(Vec::new()),
        });

        assert_eq!(engine.run().await.unwrap(), "out/42.zip");
        assert_eq!(*engine.pipeline().stages.lock().unwrap(), vec!["extract", "transform", "load"]);
    }

    #[tokio::test]
    async fn test_run_stops_on_stage_error() {
        let engine = HubEngine::new(RecordingPipeline {
            fail_transform: true,
            stages: Mutex::new(Vec::new()),
        });

        assert!(engine.run().await.is_err());
        assert_eq!(*engine.pipeline().stages.lock().unwrap(), vec!["extract", "transform"]);
    }
}
