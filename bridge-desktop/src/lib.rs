//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop and headless hosts
//! (developer machines, CI, emulators without a real decoder).
//!
//! ## Overview
//!
//! - `MediaElementAdapter` using an in-memory element tree
//!   ([`HeadlessElementTree`])
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::HeadlessElementTree;
//! use std::sync::Arc;
//!
//! let adapter = Arc::new(HeadlessElementTree::new());
//! // Inject into PlayerConfig::builder().element_adapter(adapter)
//! ```

mod element_tree;

pub use element_tree::{BoundSource, FailurePoint, HeadlessElementTree};
