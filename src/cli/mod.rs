pub mod commands;
pub mod console;
pub mod display;
pub mod k8s;
pub mod studio;

pub use commands::{CliArgs, Commands, KubeArgs};
