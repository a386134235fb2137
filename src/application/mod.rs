pub mod analyze;
pub mod chat;

pub use analyze::AnalyzeUseCase;
pub use chat::ChatUseCase;
