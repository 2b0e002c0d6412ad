use candle_core::Device;
use tracing::debug;

#[cfg(any(feature = "metal", feature = "cuda"))]
use tracing::{info, warn};

/// Picks the device the sentence encoder runs on: Metal, then CUDA, then CPU.
///
/// GPU backends are only tried when compiled in via the `metal` / `cuda` features.
pub fn select_device() -> Device {
    #[cfg(feature = "metal")]
    match Device::new_metal(0) {
        Ok(device) => {
            info!("Sentence encoder using Metal");
            return device;
        }
        Err(e) => warn!(error = %e, "Metal device unavailable"),
    }

    #[cfg(feature = "cuda")]
    match Device::new_cuda(0) {
        Ok(device) => {
            info!("Sentence encoder using CUDA");
            return device;
        }
        Err(e) => warn!(error = %e, "CUDA device unavailable"),
    }

    debug!("Sentence encoder using CPU");
    Device::Cpu
}

/// Short name for logs and readiness output.
pub fn device_label(device: &Device) -> &'static str {
    match device {
        Device::Cpu => "cpu",
        Device::Cuda(_) => "cuda",
        Device::Metal(_) => "metal",
    }
}
