//! Scripted command runner
//!
//! Answers `git`, `lsof` and `netstat` invocations from a fixed script so the
//! status pipeline can be exercised without real repositories or sockets.

use std::sync::Mutex;

use async_trait::async_trait;
use cc_status_line::infrastructure::process::{
    CommandError, CommandOutput, CommandRunner, CommandSpec,
};

#[derive(Debug, Clone)]
enum Reply {
    Output(CommandOutput),
    /// The program is not installed
    Missing,
}

#[derive(Debug, Clone)]
struct Rule {
    program: String,
    /// `None` matches any arguments
    args: Option<Vec<String>>,
    reply: Reply,
}

/// Replies to commands from a script; unscripted commands exit with status 1.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    rules: Vec<Rule>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to exactly `program args...`
    pub fn on(mut self, program: &str, args: &[&str], exit_code: i32, stdout: &str) -> Self {
        self.rules.push(Rule {
            program: program.to_string(),
            args: Some(args.iter().map(|a| a.to_string()).collect()),
            reply: Reply::Output(CommandOutput::new(exit_code, stdout, "")),
        });
        self
    }

    /// Reply to a git query with exit status 0
    pub fn git(self, args: &[&str], stdout: &str) -> Self {
        self.on("git", args, 0, stdout)
    }

    /// A clean repository on `branch`, up to date, without an origin remote
    pub fn clean_repo(self, branch: &str) -> Self {
        self.git(&["symbolic-ref", "--short", "HEAD"], &format!("{}\n", branch))
            .git(&["rev-list", "--count", "HEAD..@{u}"], "0\n")
            .git(&["status", "--porcelain"], "")
    }

    /// `lsof` reports a listener on `port`
    pub fn listening(self, port: u16) -> Self {
        self.on(
            "lsof",
            &[&format!("-i:{}", port)],
            0,
            &format!("node 4242 dev 21u IPv4 0t0 TCP *:{} (LISTEN)\n", port),
        )
    }

    /// Every invocation of `program` fails to spawn
    pub fn missing(mut self, program: &str) -> Self {
        self.rules.push(Rule {
            program: program.to_string(),
            args: None,
            reply: Reply::Missing,
        });
        self
    }

    /// Command lines run so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn reply_for(&self, spec: &CommandSpec) -> Reply {
        self.rules
            .iter()
            .find(|rule| {
                rule.program == spec.program
                    && rule.args.as_ref().map_or(true, |args| *args == spec.args)
            })
            .map(|rule| rule.reply.clone())
            .unwrap_or_else(|| Reply::Output(CommandOutput::new(1, "", "")))
    }
}

#[async_trait]
impl CommandRunner for ScriptedRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput, CommandError> {
        self.calls.lock().unwrap().push(spec.display());
        match self.reply_for(spec) {
            Reply::Output(output) => Ok(output),
            Reply::Missing => Err(CommandError::NotFound {
                program: spec.program.clone(),
            }),
        }
    }
}
