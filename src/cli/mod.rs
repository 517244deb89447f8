pub mod commands;
pub mod output;

pub use commands::{
    CliArgs, CodeArgs, Commands, ConfigArgs, ContainerArgs, GenerateArgs, GenerateTarget,
    StacksArgs, WorkflowOutputArgs,
};
pub use output::{OutputFormat, OutputFormatter};
