// Adapters layer: concrete sources of raw generator output.

pub mod file;
pub mod webhook;

pub use file::FileSource;
pub use webhook::WebhookSource;
