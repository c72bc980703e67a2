pub mod models;
pub mod repository;

pub use models::AgentView;
pub use repository::AgentRepository;
