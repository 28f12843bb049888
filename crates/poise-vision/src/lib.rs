//! Poise Vision - Behavioral analysis of webcam frames
//!
//! Frames flow one way through a stateless pipeline:
//!
//! base64 frame → decoded image → landmarks (external detector)
//! → features → per-aspect classification → confidence score → suggestions
//!
//! Each call is independent. No history is kept between frames, so
//! there is no temporal smoothing of expressions or eye contact.

pub mod analysis;
pub mod decode;
pub mod detector;
pub mod expression;
pub mod gaze;
pub mod gesture;
pub mod landmark;
pub mod posture;
pub mod score;

pub use analysis::*;
pub use decode::*;
pub use detector::*;
pub use expression::*;
pub use gaze::*;
pub use gesture::*;
pub use landmark::*;
pub use posture::*;
pub use score::*;
