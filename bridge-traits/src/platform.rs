//! Platform-specific helper abstractions used to keep trait bounds aligned with
//! the threading guarantees of each target.
//!
//! Native set-top stacks require `Send + Sync` so bridge implementations can be
//! shared with hardware callback trampolines. Browser-class boxes running the
//! core as WebAssembly are single threaded and their element handles (e.g.,
//! `web_sys` objects) cannot satisfy those bounds. The helper trait below makes
//! the required bounds conditional without duplicating every trait definition.

/// Marker trait that applies `Send + Sync` on native targets while becoming a
/// no-op on `wasm32`.
#[cfg(not(target_arch = "wasm32"))]
pub trait PlatformSendSync: Send + Sync {}

#[cfg(not(target_arch = "wasm32"))]
impl<T> PlatformSendSync for T where T: Send + Sync {}

#[cfg(target_arch = "wasm32")]
pub trait PlatformSendSync {}

#[cfg(target_arch = "wasm32")]
impl<T> PlatformSendSync for T {}
