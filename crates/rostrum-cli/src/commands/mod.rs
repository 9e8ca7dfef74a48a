pub mod debate;
pub mod info;
pub mod stdin_input;
pub mod topics;
