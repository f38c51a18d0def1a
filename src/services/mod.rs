pub mod hosting;
pub mod language_model;

pub use hosting::HostingService;
pub use language_model::LanguageModelService;
