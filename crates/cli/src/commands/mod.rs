pub mod edit_config;
pub mod help;
pub mod list_actions;
pub mod list_keybinds;
pub mod schema;
pub mod show_config;
pub mod validate_config;
pub mod version;
