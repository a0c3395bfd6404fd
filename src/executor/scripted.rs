//! Scriptable command executor.
//!
//! Answers runtime commands from canned [`ExecutionResult`]s so the lifecycle
//! logic can run without Docker or Podman installed. Responses are keyed by an
//! argument prefix; the longest matching prefix wins, so `["ps", "-a"]` and
//! `["ps"]` can be scripted independently.

use super::{CommandExecutor, ExecutionCommand, ExecutionResult, ExecutorError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
enum Response {
    Result(ExecutionResult),
    SpawnFailure,
    Hang,
}

#[derive(Debug)]
struct Rule {
    prefix: Vec<String>,
    responses: VecDeque<Response>,
}

#[derive(Debug, Default)]
struct Script {
    rules: Vec<Rule>,
    calls: Vec<ExecutionCommand>,
}

/// Executor that replays scripted responses and records every call.
///
/// Responses queued for the same prefix are consumed in order; the last one
/// repeats for any further calls. Clones share the same script, so a test can
/// hand one clone to the controller and inspect the recorded calls on another.
#[derive(Debug, Clone, Default)]
pub struct ScriptedExecutor {
    script: Arc<Mutex<Script>>,
}

impl ScriptedExecutor {
    /// Create an executor with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a result for commands whose arguments start with `prefix`.
    pub fn on(&self, prefix: &[&str], result: ExecutionResult) -> &Self {
        self.push(prefix, Response::Result(result));
        self
    }

    /// Queue a spawn failure, as if the program were not installed.
    pub fn fail_to_spawn(&self, prefix: &[&str]) -> &Self {
        self.push(prefix, Response::SpawnFailure);
        self
    }

    /// Queue a hang: the command runs into its timeout.
    pub fn time_out(&self, prefix: &[&str]) -> &Self {
        self.push(prefix, Response::Hang);
        self
    }

    /// All commands executed so far, in order.
    pub fn calls(&self) -> Vec<ExecutionCommand> {
        self.lock().calls.clone()
    }

    /// Number of executed commands whose arguments start with `prefix`.
    pub fn count_calls(&self, prefix: &[&str]) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| starts_with(&call.args, prefix))
            .count()
    }

    /// Render rows in the `id|status|ports|names` listing format.
    pub fn listing(rows: &[[&str; 4]]) -> String {
        rows.iter()
            .map(|row| format!("{}\n", row.join("|")))
            .collect()
    }

    fn push(&self, prefix: &[&str], response: Response) {
        let mut script = self.lock();
        let prefix: Vec<String> = prefix.iter().map(|s| s.to_string()).collect();

        match script.rules.iter_mut().find(|rule| rule.prefix == prefix) {
            Some(rule) => rule.responses.push_back(response),
            None => script.rules.push(Rule {
                prefix,
                responses: VecDeque::from([response]),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Script> {
        // A panicking test thread must not hide the recorded calls from the others.
        self.script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn starts_with<S: AsRef<str>>(args: &[String], prefix: &[S]) -> bool {
    args.len() >= prefix.len()
        && args
            .iter()
            .zip(prefix)
            .all(|(arg, expected)| arg.as_str() == AsRef::<str>::as_ref(expected))
}

#[async_trait]
impl CommandExecutor for ScriptedExecutor {
    async fn execute(&self, cmd: ExecutionCommand) -> Result<ExecutionResult, ExecutorError> {
        let mut script = self.lock();
        script.calls.push(cmd.clone());

        let rule = script
            .rules
            .iter_mut()
            .filter(|rule| starts_with(&cmd.args, &rule.prefix[..]))
            .max_by_key(|rule| rule.prefix.len())
            .ok_or_else(|| {
                ExecutorError::Other(format!("no scripted response for: {}", cmd.display_line()))
            })?;

        let response = if rule.responses.len() > 1 {
            rule.responses.pop_front()
        } else {
            rule.responses.front().cloned()
        };

        match response {
            Some(Response::Result(result)) => Ok(result),
            Some(Response::SpawnFailure) => Err(ExecutorError::Spawn {
                program: cmd.program.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "program not found"),
            }),
            Some(Response::Hang) => match cmd.timeout {
                Some(limit) => Err(ExecutorError::Timeout(limit)),
                None => Err(ExecutorError::Other(format!(
                    "scripted hang without a timeout: {}",
                    cmd.display_line()
                ))),
            },
            None => Err(ExecutorError::Other(format!(
                "scripted responses exhausted for: {}",
                cmd.display_line()
            ))),
        }
    }

    fn executor_type(&self) -> &'static str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(args: &[&str]) -> ExecutionCommand {
        ExecutionCommand::new("docker", args.iter().map(|s| s.to_string()).collect())
    }

    #[tokio::test]
    async fn test_longest_prefix_wins() {
        let executor = ScriptedExecutor::new();
        executor
            .on(&["ps"], ExecutionResult::ok("probe"))
            .on(&["ps", "-a"], ExecutionResult::ok("listing"));

        let probe = executor.execute(command(&["ps"])).await.unwrap();
        let listing = executor.execute(command(&["ps", "-a", "--format", "x"])).await.unwrap();

        assert_eq!(probe.stdout, "probe");
        assert_eq!(listing.stdout, "listing");
    }

    #[tokio::test]
    async fn test_responses_consumed_in_order_and_last_repeats() {
        let executor = ScriptedExecutor::new();
        executor
            .on(&["ps"], ExecutionResult::ok("first"))
            .on(&["ps"], ExecutionResult::ok("second"));

        let mut outputs = Vec::new();
        for _ in 0..3 {
            outputs.push(executor.execute(command(&["ps"])).await.unwrap().stdout);
        }

        assert_eq!(outputs, vec!["first", "second", "second"]);
        assert_eq!(executor.count_calls(&["ps"]), 3);
    }

    #[tokio::test]
    async fn test_unscripted_command_is_an_error() {
        let executor = ScriptedExecutor::new();

        let result = executor.execute(command(&["start", "abc"])).await;
        assert!(matches!(result, Err(ExecutorError::Other(_))));
        assert_eq!(executor.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_spawn_failure() {
        let executor = ScriptedExecutor::new();
        executor.fail_to_spawn(&["ps"]);

        let result = executor.execute(command(&["ps"])).await;
        assert!(matches!(result, Err(ExecutorError::Spawn { .. })));
    }

    #[tokio::test]
    async fn test_hang_reports_the_command_timeout() {
        let executor = ScriptedExecutor::new();
        executor.time_out(&["ps"]);

        let bounded = command(&["ps"]).with_timeout(std::time::Duration::from_secs(3));
        let result = executor.execute(bounded).await;
        assert!(matches!(result, Err(ExecutorError::Timeout(limit)) if limit.as_secs() == 3));

        let unbounded = executor.execute(command(&["ps"])).await;
        assert!(matches!(unbounded, Err(ExecutorError::Other(_))));
    }

    #[test]
    fn test_listing_format() {
        let listing = ScriptedExecutor::listing(&[
            ["6c5a934e00fb", "Up 2 hours", "0.0.0.0:7200->3306/tcp", "mysql-db-multi"],
            ["1f2e3d4c5b6a", "Exited (0) 3 months ago", "", "other"],
        ]);

        assert_eq!(
            listing,
            "6c5a934e00fb|Up 2 hours|0.0.0.0:7200->3306/tcp|mysql-db-multi\n\
             1f2e3d4c5b6a|Exited (0) 3 months ago||other\n"
        );
    }
}
