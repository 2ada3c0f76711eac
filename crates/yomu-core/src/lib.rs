mod error;
mod processor;
mod progress;

pub use error::RunError;
pub use processor::Processor;
pub use progress::{ProgressSender, progress_channel};

#[cfg(test)]
mod tests;
