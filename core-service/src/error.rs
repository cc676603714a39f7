use bridge_traits::DeviceId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Capability missing: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },

    #[error("Device already registered: {0}")]
    DeviceAlreadyRegistered(DeviceId),

    #[error("Device not registered: {0}")]
    DeviceNotRegistered(DeviceId),

    #[error("Device registry already installed")]
    RegistryAlreadyInstalled,

    #[error("Device registry not installed")]
    RegistryNotInstalled,

    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),

    #[error("Playback error: {0}")]
    Playback(#[from] core_playback::PlaybackError),
}

pub type Result<T> = std::result::Result<T, CoreError>;
