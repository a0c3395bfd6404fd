//! Process exit codes for failed runs.

use crate::container::ContainerError;
use crate::env;

/// Exit code for an error that ended the run.
///
/// [`ContainerError::RuntimeUnavailable`] anywhere in the context chain maps to
/// [`env::EXIT_RUNTIME_UNAVAILABLE`]; everything else is [`env::EXIT_FAILURE`].
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ContainerError>() {
        Some(ContainerError::RuntimeUnavailable(_)) => env::EXIT_RUNTIME_UNAVAILABLE,
        _ => env::EXIT_FAILURE,
    }
}
