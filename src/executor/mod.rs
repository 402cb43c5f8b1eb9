mod argv;
mod builtins;
mod default_executor;
mod executor;
mod launcher;
mod pipeline;

pub use argv::{ArgVector, count_args};
pub use builtins::{BuiltinCommand, BuiltinManager, CdCommand};
pub use default_executor::{DefaultExecutor, evaluate};
pub use executor::{
    EXEC_FAILURE_STATUS, ExecStatus, Executor, STATUS_INTERNAL, STATUS_INVALID_NODE,
    STATUS_RESOURCE, exit_code, status_for,
};
pub use launcher::{Channel, Endpoint, Launched, launch, run};
pub use pipeline::{PipelineHandler, PipelineReport, flatten_pipeline};
