pub mod setup;
pub mod camera;
pub mod interaction;
pub mod debug;
pub mod ui;

// Systems are imported directly where needed
