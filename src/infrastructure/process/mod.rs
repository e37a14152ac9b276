pub mod command_executor;

pub use command_executor::{
    CommandError,
    CommandOutput,
    CommandRunner,
    CommandSpec,
    SystemCommandRunner,
};

#[cfg(test)]
pub use command_executor::MockCommandRunner;
