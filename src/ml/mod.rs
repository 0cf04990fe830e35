//! Built-in solver capabilities (deploy-safe inference).
//!
//! The harness is capability-agnostic; this module carries the input
//! featurization contract for exported models and the optional in-process
//! backends the stock binary can run without a Python toolchain.

pub mod features;
#[cfg(feature = "onnx")]
pub mod onnx;

pub use features::adjacency_features;
#[cfg(feature = "onnx")]
pub use onnx::OnnxSolver;
