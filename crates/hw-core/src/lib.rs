//! Core types and frame evaluation for hellowave.
//!
//! Effect functions, the color cycler, line layout and the frame evaluator
//! are pure; everything that touches a terminal, a font or a file lives in
//! the other crates of the workspace.

pub mod clock;
pub mod color;
pub mod config;
pub mod effect;
pub mod error;
pub mod frame;
pub mod layout;
pub mod traits;

pub use color::ColorScheme;
pub use config::AnimationConfig;
pub use effect::{EffectConfig, EffectKind};
pub use error::CoreError;
pub use frame::{Dimensions, DrawInstruction, Frame, FrameEvaluator, Line};
