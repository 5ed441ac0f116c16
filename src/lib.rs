pub mod cli;
pub mod error;
pub mod logger;
pub mod processor;
pub mod settings;

pub use error::{Result, TransparencyError};
pub use processor::{convert, convert_with, is_background, ConvertResult, Pixel};
pub use settings::ConvertSettings;
