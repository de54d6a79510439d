pub mod add_screen;
pub mod controller;
pub mod list_screen;
pub mod task_item;
