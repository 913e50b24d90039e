pub mod broadcast;
pub mod openai;
pub mod recommendation;
pub mod scheduler;
pub mod sheets;
pub mod stats;
