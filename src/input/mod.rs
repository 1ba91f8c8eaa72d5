pub mod command_mode;
