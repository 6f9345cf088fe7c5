// SPDX-License-Identifier: GPL-3.0-only

//! PipeWire GStreamer pipeline for camera preview

use super::super::types::*;
use crate::constants::{pipeline, timing};
use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Live preview pipeline: pipewiresrc → videoconvert → RGBA appsink
pub struct PreviewPipeline {
    pipeline: gstreamer::Pipeline,
    appsink: AppSink,
}

impl PreviewPipeline {
    /// Build and start a preview pipeline for `device`
    pub fn new(device: &CameraDevice, frame_sender: FrameSender) -> BackendResult<Self> {
        info!(device = %device.name, path = %device.path, "Creating PipeWire preview pipeline");

        gstreamer::init().map_err(|e| BackendError::InitializationFailed(e.to_string()))?;

        let source = match device.target_object() {
            Some(target) => format!("pipewiresrc target-object={} do-timestamp=true", target),
            None => "pipewiresrc do-timestamp=true".to_string(),
        };
        let description = format!(
            "{source} ! videoconvert ! video/x-raw,format={format} ! appsink name=sink",
            format = pipeline::OUTPUT_FORMAT
        );
        debug!(%description, "Launching pipeline");

        let pipeline = gstreamer::parse::launch(&description)
            .map_err(|e| BackendError::InitializationFailed(e.to_string()))?
            .dynamic_cast::<gstreamer::Pipeline>()
            .map_err(|_| {
                BackendError::InitializationFailed("Launch result is not a pipeline".to_string())
            })?;

        let appsink = pipeline
            .by_name("sink")
            .ok_or_else(|| BackendError::InitializationFailed("Failed to get appsink".to_string()))?
            .dynamic_cast::<AppSink>()
            .map_err(|_| {
                BackendError::InitializationFailed("Failed to cast appsink".to_string())
            })?;

        appsink.set_property("sync", false);
        appsink.set_property("max-buffers", pipeline::MAX_BUFFERS);
        appsink.set_property("drop", true);
        appsink.set_property("enable-last-sample", false);

        let frame_counter = Arc::new(AtomicU64::new(0));
        appsink.set_callbacks(
            gstreamer_app::AppSinkCallbacks::builder()
                .new_sample(move |appsink| {
                    let frame_num = frame_counter.fetch_add(1, Ordering::Relaxed);
                    let sample = appsink.pull_sample().map_err(|_| gstreamer::FlowError::Eos)?;

                    let frame = match frame_from_sample(&sample) {
                        Ok(frame) => frame,
                        Err(e) => {
                            if frame_num % timing::FRAME_LOG_INTERVAL == 0 {
                                error!(frame = frame_num, error = %e, "Failed to read frame");
                            }
                            return Err(gstreamer::FlowError::Error);
                        }
                    };

                    if frame_num % timing::FRAME_LOG_INTERVAL == 0 {
                        debug!(
                            frame = frame_num,
                            width = frame.width,
                            height = frame.height,
                            "Preview frame"
                        );
                    }

                    // Dropping frames is fine for live preview
                    let mut sender = frame_sender.clone();
                    if let Err(e) = sender.try_send(frame)
                        && e.is_disconnected()
                    {
                        return Err(gstreamer::FlowError::Eos);
                    }

                    Ok(gstreamer::FlowSuccess::Ok)
                })
                .build(),
        );

        pipeline.set_state(gstreamer::State::Playing).map_err(|e| {
            BackendError::InitializationFailed(format!("Failed to start pipeline: {}", e))
        })?;

        let (result, state, pending) = pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::START_TIMEOUT_SECS,
        ));
        debug!(result = ?result, state = ?state, pending = ?pending, "Pipeline state");
        if result.is_err() {
            let _ = pipeline.set_state(gstreamer::State::Null);
            return Err(BackendError::InitializationFailed(
                "Pipeline failed to reach PLAYING".to_string(),
            ));
        }
        if state != gstreamer::State::Playing {
            warn!("Pipeline is not in PLAYING state yet");
        }

        Ok(Self { pipeline, appsink })
    }

    /// Stop the pipeline and release the camera
    pub fn stop(self) -> BackendResult<()> {
        info!("Stopping preview pipeline");
        self.shutdown()
    }

    fn shutdown(&self) -> BackendResult<()> {
        self.appsink
            .set_callbacks(gstreamer_app::AppSinkCallbacks::builder().build());

        self.pipeline
            .set_state(gstreamer::State::Null)
            .map_err(|e| BackendError::Other(format!("Failed to stop pipeline: {}", e)))?;

        let (result, state, _) = self.pipeline.state(gstreamer::ClockTime::from_seconds(
            timing::STOP_TIMEOUT_SECS,
        ));
        if let Err(e) = result {
            debug!(error = ?e, state = ?state, "Pipeline state change had issues");
        }
        Ok(())
    }
}

impl Drop for PreviewPipeline {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!(error = %e, "Failed to stop preview pipeline on drop");
        }
    }
}

/// Copy a sample into a tightly packed RGBA frame
fn frame_from_sample(sample: &gstreamer::Sample) -> Result<CameraFrame, String> {
    let captured_at = Instant::now();
    let buffer = sample.buffer().ok_or("No buffer in sample")?;
    let caps = sample.caps().ok_or("No caps in sample")?;
    let info = VideoInfo::from_caps(caps).map_err(|e| e.to_string())?;
    let map = buffer.map_readable().map_err(|e| e.to_string())?;

    let width = info.width();
    let height = info.height();
    let stride = info.stride()[0] as usize;
    let offset = info.offset()[0];

    let plane = map
        .as_slice()
        .get(offset..)
        .ok_or("Plane offset beyond buffer")?;
    let data = pack_rows(plane, width, height, stride)?;

    Ok(CameraFrame {
        width,
        height,
        data: Arc::from(data),
        captured_at,
    })
}

/// Strip row padding from an RGBA image with the given stride
pub(crate) fn pack_rows(
    src: &[u8],
    width: u32,
    height: u32,
    stride: usize,
) -> Result<Vec<u8>, String> {
    let row_len = width as usize * 4;
    if stride < row_len {
        return Err(format!("Stride {} shorter than row {}", stride, row_len));
    }
    let needed = stride * (height as usize).saturating_sub(1) + row_len;
    if src.len() < needed {
        return Err(format!("Buffer is {} bytes, need {}", src.len(), needed));
    }

    if stride == row_len {
        return Ok(src[..row_len * height as usize].to_vec());
    }

    let mut packed = Vec::with_capacity(row_len * height as usize);
    for row in src.chunks(stride).take(height as usize) {
        packed.extend_from_slice(&row[..row_len]);
    }
    Ok(packed)
}
