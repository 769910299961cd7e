//! Fingerprint strategy implementations.

mod average;
mod exact;
mod mean_color;
mod perceptual;

pub use average::AverageStrategy;
pub use exact::ExactStrategy;
pub use mean_color::MeanColorStrategy;
pub use perceptual::PerceptualStrategy;
