//! Mosaic Services Layer
//!
//! Everything between raw platform events and the grid controller:
//! input normalization, momentum, frame timing and settings.

pub mod clock;
pub mod input;
pub mod momentum;
pub mod settings;

pub use clock::FrameClock;
pub use input::{DeltaMode, InputAdapter, WheelInput};
pub use momentum::{Glide, MomentumPolicy, NoMomentum, TweenGlide, TweenMomentum};
pub use settings::{InputSettings, MomentumSettings, Settings, SettingsError};
