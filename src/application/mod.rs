pub mod events;
pub mod task_service;
