//! Value types for light control parameters.

mod address;
mod brightness;
mod color;
mod fade;
mod power;

pub use address::DeviceAddress;
pub use brightness::Brightness;
pub use color::{Color, NamedColor};
pub use fade::Fade;
pub use power::PowerMode;
