// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 camera backend
//!
//! Streams frames from a `/dev/video*` node on a dedicated capture thread.
//! The thread decodes every buffer to RGBA and parks it in a latest-frame
//! slot; the live preview polls that slot and `take_photo` encodes it.

use super::format_converters::{mjpeg_to_rgba, yuyv_to_rgba};
use super::types::*;
use super::CameraDevice;
use crate::constants::{JPEG_QUALITY, v4l2 as v4l2_consts};
use crate::errors::CameraError;
use crate::storage;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use v4l::buffer::Type;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;
use v4l::FourCC;

type FrameSlot = Arc<Mutex<Option<Arc<CameraFrame>>>>;

/// Enumerate V4L2 nodes that support video capture
pub fn enumerate_cameras() -> Vec<CameraDescriptor> {
    let mut cameras = Vec::new();

    for node in v4l::context::enum_devices() {
        let path = node.path().to_string_lossy().to_string();
        let Some(info) = query_device_info(&path) else {
            continue;
        };
        if !info.1 {
            debug!(path = %path, "Skipping node without video capture capability");
            continue;
        }
        let name = node.name().unwrap_or_else(|| info.0.card.clone());
        cameras.push(CameraDescriptor {
            index: node.index(),
            name,
            path,
        });
    }

    cameras.sort_by_key(|c| c.index);
    info!(count = cameras.len(), "Enumerated V4L2 capture devices");
    cameras
}

/// Query QUERYCAP for a node, returning its info and whether it captures video
pub fn query_device_info(path: &str) -> Option<(DeviceInfo, bool)> {
    let device = Device::with_path(path).ok()?;
    let caps = device.query_caps().ok()?;
    let captures = caps
        .capabilities
        .contains(v4l::capability::Flags::VIDEO_CAPTURE);
    Some((
        DeviceInfo {
            card: caps.card,
            driver: caps.driver,
            path: path.to_string(),
            bus: caps.bus,
        },
        captures,
    ))
}

struct StreamHandle {
    running: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl StreamHandle {
    fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
            && self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        // Don't join - the thread exits after its current buffer
        self.thread.take();
    }
}

/// V4L2 camera device
pub struct V4l2Camera {
    device: Option<CameraDescriptor>,
    stream: Mutex<Option<StreamHandle>>,
    latest_frame: FrameSlot,
    capture_dir: PathBuf,
}

impl V4l2Camera {
    /// Open the configured device, or the first capture device when unset
    pub fn open(preferred_path: Option<&str>) -> Self {
        let cameras = enumerate_cameras();
        let device = match preferred_path {
            Some(path) => cameras
                .iter()
                .find(|c| c.path == path)
                .cloned()
                .or_else(|| {
                    warn!(path, "Configured camera not found, using first camera");
                    cameras.first().cloned()
                }),
            None => cameras.first().cloned(),
        };

        match &device {
            Some(cam) => info!(name = %cam.name, path = %cam.path, "Using camera"),
            None => warn!("No camera available"),
        }

        Self::with_device(device, storage::capture_directory())
    }

    /// Build a camera for a specific device and capture directory
    pub fn with_device(device: Option<CameraDescriptor>, capture_dir: PathBuf) -> Self {
        Self {
            device,
            stream: Mutex::new(None),
            latest_frame: Arc::new(Mutex::new(None)),
            capture_dir,
        }
    }

    /// The selected device
    pub fn descriptor(&self) -> Option<&CameraDescriptor> {
        self.device.as_ref()
    }

    /// Block until a frame newer than the warm-up period arrives
    ///
    /// Used by headless capture where nothing else drives the preview.
    pub fn wait_for_frame(
        &self,
        warmup: std::time::Duration,
        timeout: std::time::Duration,
    ) -> CameraResult<Arc<CameraFrame>> {
        let start = Instant::now();
        let mut frame = None;

        while start.elapsed() < timeout {
            if let Some(f) = self.latest_frame() {
                frame = Some(f);
                if start.elapsed() > warmup {
                    break;
                }
            }
            std::thread::sleep(std::time::Duration::from_millis(16));
        }

        frame.ok_or(CameraError::NoFrameAvailable)
    }
}

impl CameraDevice for V4l2Camera {
    fn is_available(&self) -> bool {
        self.device.is_some()
    }

    fn request_permission(&self) -> PermissionStatus {
        let Some(device) = &self.device else {
            return PermissionStatus::Denied;
        };

        match std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .open(&device.path)
        {
            Ok(_) => {
                info!(path = %device.path, "Camera access granted");
                PermissionStatus::Granted
            }
            Err(e) => {
                warn!(path = %device.path, error = %e, "Camera access denied");
                PermissionStatus::Denied
            }
        }
    }

    fn start_preview(&self) -> CameraResult<()> {
        let device = self.device.as_ref().ok_or(CameraError::NoCameraFound)?;

        let mut stream = self.stream.lock().unwrap_or_else(PoisonError::into_inner);
        if stream.as_ref().is_some_and(StreamHandle::is_running) {
            debug!("Preview already streaming");
            return Ok(());
        }

        let running = Arc::new(AtomicBool::new(true));
        let running_clone = Arc::clone(&running);
        let slot = Arc::clone(&self.latest_frame);
        let path = device.path.clone();

        let thread = std::thread::Builder::new()
            .name("v4l2-capture".into())
            .spawn(move || {
                if let Err(e) = capture_loop(&path, slot, running_clone) {
                    error!(error = %e, "Capture loop failed");
                }
            })
            .map_err(|e| CameraError::InitializationFailed(e.to_string()))?;

        info!(path = %device.path, "Preview stream started");
        *stream = Some(StreamHandle {
            running,
            thread: Some(thread),
        });
        Ok(())
    }

    fn stop_preview(&self) {
        let mut stream = self.stream.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(mut handle) = stream.take() {
            info!("Stopping preview stream");
            handle.stop();
        }
        self.latest_frame
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }

    fn latest_frame(&self) -> Option<Arc<CameraFrame>> {
        self.latest_frame
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn take_photo(&self) -> CameraResult<CapturedPhoto> {
        let frame = self.latest_frame().ok_or(CameraError::NoFrameAvailable)?;
        storage::ensure_directory(&self.capture_dir)?;
        let path = storage::new_capture_path(&self.capture_dir);
        save_frame_as_jpeg(&frame, &path)?;
        info!(path = %path.display(), width = frame.width, height = frame.height, "Photo taken");
        Ok(CapturedPhoto { path })
    }

    fn name(&self) -> String {
        self.device
            .as_ref()
            .map(|d| d.name.clone())
            .unwrap_or_default()
    }
}

impl Drop for V4l2Camera {
    fn drop(&mut self) {
        if let Some(mut handle) = self
            .stream
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.stop();
        }
    }
}

/// Encode an RGBA frame as JPEG
pub fn save_frame_as_jpeg(frame: &CameraFrame, path: &Path) -> CameraResult<()> {
    let rgba = image::RgbaImage::from_raw(frame.width, frame.height, frame.data.to_vec())
        .ok_or_else(|| CameraError::SaveFailed("Frame data does not match dimensions".into()))?;
    let rgb = image::DynamicImage::ImageRgba8(rgba).to_rgb8();

    let file = std::fs::File::create(path)?;
    let mut writer = std::io::BufWriter::new(file);
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
    rgb.write_with_encoder(encoder)
        .map_err(|e| CameraError::SaveFailed(e.to_string()))?;
    std::io::Write::flush(&mut writer)?;
    Ok(())
}

/// Main capture loop running in a separate thread
fn capture_loop(
    device_path: &str,
    slot: FrameSlot,
    running: Arc<AtomicBool>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    static FRAME_COUNTER: AtomicU64 = AtomicU64::new(0);

    let mut dev = Device::with_path(device_path)
        .map_err(|e| format!("Failed to open V4L2 device {}: {}", device_path, e))?;

    let mjpg = FourCC::new(b"MJPG");
    let yuyv = FourCC::new(b"YUYV");

    let mut format = dev
        .format()
        .map_err(|e| format!("Failed to get format: {}", e))?;
    format.width = v4l2_consts::CAPTURE_WIDTH;
    format.height = v4l2_consts::CAPTURE_HEIGHT;
    format.fourcc = mjpg;

    let format = match dev.set_format(&format) {
        Ok(f) => f,
        Err(e) => {
            warn!(error = %e, "Could not set MJPG format, retrying with YUYV");
            format.fourcc = yuyv;
            dev.set_format(&format)
                .map_err(|e| format!("Failed to set format: {}", e))?
        }
    };

    if format.fourcc != mjpg && format.fourcc != yuyv {
        return Err(format!("Unsupported pixel format {}", format.fourcc).into());
    }

    info!(
        width = format.width,
        height = format.height,
        fourcc = %format.fourcc,
        "V4L2 capture format"
    );

    let mut stream = MmapStream::with_buffers(&mut dev, Type::VideoCapture, v4l2_consts::BUFFER_COUNT)
        .map_err(|e| format!("Failed to create buffer stream: {}", e))?;

    while running.load(Ordering::Acquire) {
        let frame_start = Instant::now();

        let (buf, meta) = match stream.next() {
            Ok(next) => next,
            Err(e) => {
                warn!(error = %e, "Failed to capture frame");
                std::thread::sleep(std::time::Duration::from_millis(10));
                continue;
            }
        };

        let used = match meta.bytesused as usize {
            0 => buf.len(),
            n => n.min(buf.len()),
        };
        let data = &buf[..used];

        let decoded = if format.fourcc == mjpg {
            mjpeg_to_rgba(data)
        } else {
            let packed = unpad_rows(data, format.width * 2, format.stride, format.height);
            Some((
                yuyv_to_rgba(&packed, format.width, format.height),
                format.width,
                format.height,
            ))
        };

        let Some((rgba, width, height)) = decoded else {
            debug!("Dropping undecodable frame");
            continue;
        };
        let Some(frame) = complete_frame(rgba, width, height, frame_start) else {
            debug!(width, height, bytes = used, "Dropping incomplete frame");
            continue;
        };

        let frame_num = FRAME_COUNTER.fetch_add(1, Ordering::Relaxed);
        if frame_num % 60 == 0 {
            debug!(
                frame = frame_num,
                sequence = meta.sequence,
                elapsed_us = frame_start.elapsed().as_micros(),
                "Frame captured"
            );
        }

        *slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(frame));
    }

    info!("V4L2 capture loop ended");
    Ok(())
}

/// Frame for the latest-frame slot, if the pixels cover the full image
fn complete_frame(
    rgba: Vec<u8>,
    width: u32,
    height: u32,
    captured_at: Instant,
) -> Option<CameraFrame> {
    if rgba.len() != width as usize * height as usize * 4 {
        return None;
    }
    Some(CameraFrame {
        width,
        height,
        data: Arc::from(rgba),
        captured_at,
    })
}

/// Strip per-row padding when the driver stride exceeds the packed row size
fn unpad_rows(data: &[u8], row_bytes: u32, stride: u32, height: u32) -> std::borrow::Cow<'_, [u8]> {
    if stride <= row_bytes {
        return std::borrow::Cow::Borrowed(data);
    }
    let mut packed = Vec::with_capacity((row_bytes * height) as usize);
    for row in data.chunks(stride as usize).take(height as usize) {
        packed.extend_from_slice(&row[..row.len().min(row_bytes as usize)]);
    }
    std::borrow::Cow::Owned(packed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unpad_rows() {
        let data = [1, 2, 0, 0, 3, 4, 0, 0];
        assert_eq!(&*unpad_rows(&data, 2, 4, 2), &[1, 2, 3, 4]);
        assert_eq!(&*unpad_rows(&data, 4, 4, 2), &data);
    }

    #[test]
    fn test_short_yuyv_frame_is_dropped() {
        // 4x2 YUYV needs 16 bytes; a short buffer only fills the first row
        let short = yuyv_to_rgba(&[128; 8], 4, 2);
        assert!(complete_frame(short, 4, 2, Instant::now()).is_none());

        let full = yuyv_to_rgba(&[128; 16], 4, 2);
        let frame = complete_frame(full, 4, 2, Instant::now()).unwrap();
        assert_eq!(frame.data.len(), 4 * 2 * 4);
    }

    #[test]
    fn test_camera_without_device() {
        let camera = V4l2Camera::with_device(None, std::env::temp_dir());
        assert!(!camera.is_available());
        assert_eq!(camera.request_permission(), PermissionStatus::Denied);
        assert!(matches!(
            camera.start_preview(),
            Err(CameraError::NoCameraFound)
        ));
        assert!(matches!(
            camera.take_photo(),
            Err(CameraError::NoFrameAvailable)
        ));
    }

    #[test]
    fn test_save_frame_as_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.jpg");
        let frame = CameraFrame::from_rgba(4, 2, vec![200; 4 * 2 * 4]);
        save_frame_as_jpeg(&frame, &path).unwrap();
        assert_eq!(image::image_dimensions(&path).unwrap(), (4, 2));
    }
}
