pub mod assistant;
pub mod providers;

pub use assistant::AssistantInvoker;
