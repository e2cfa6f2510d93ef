//! The directive loop runner.
//!
//! One `process` call handles one user request: query the model, walk the
//! reply's segments in order, gate and execute each directive, feed its
//! outcome back as a synthetic user message, and re-query. Follow-up
//! replies are processed depth-first: the directives of a follow-up run to
//! completion before the remaining segments of the reply that triggered it.
//!
//! The walk is iterative. An explicit frame stack replaces recursion, and a
//! directive turn counter bounds the whole request so a model that keeps
//! issuing directives cannot loop forever.

use crate::gate::{ExecutionGate, GateDecision};
use crate::observer::{NullObserver, TurnObserver};
use ori_core::client::ChatCompletionClient;
use ori_core::directive::{Directive, ExecutionOutcome, Segment};
use ori_core::error::Error;
use ori_core::message::{Conversation, Message};
use ori_parser::segments;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Directive turns allowed per user request unless overridden.
pub const DEFAULT_MAX_DIRECTIVE_TURNS: u32 = 10;

/// Reply text returned when the turn bound stops the loop.
const TURN_LIMIT_REPLY: &str = "I've reached the directive turn limit for this request. \
     Ask me to continue if you'd like me to keep going.";

/// Drives the query/parse/gate/execute cycle for one request at a time.
pub struct AgentLoop {
    client: Arc<dyn ChatCompletionClient>,
    gate: ExecutionGate,
    observer: Arc<dyn TurnObserver>,
    max_directive_turns: u32,
}

impl AgentLoop {
    pub fn new(client: Arc<dyn ChatCompletionClient>, gate: ExecutionGate) -> Self {
        Self {
            client,
            gate,
            observer: Arc::new(NullObserver),
            max_directive_turns: DEFAULT_MAX_DIRECTIVE_TURNS,
        }
    }

    /// Replace the default (silent) observer.
    pub fn with_observer(mut self, observer: Arc<dyn TurnObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Bound the number of directive turns per request.
    pub fn with_max_directive_turns(mut self, max_directive_turns: u32) -> Self {
        self.max_directive_turns = max_directive_turns;
        self
    }

    /// Run the loop for the request already appended to `conversation`.
    ///
    /// Returns the text of the reply that ended the loop. Everything the
    /// loop produced (assistant replies and synthetic outcome messages)
    /// stays in `conversation` for the next request.
    pub async fn process(&self, conversation: &mut Conversation) -> Result<String, Error> {
        let mut turns_used: u32 = 0;

        let mut final_text = self.query(conversation).await?;
        let mut stack: Vec<VecDeque<Segment>> = vec![segments(&final_text).collect()];

        while let Some(frame) = stack.last_mut() {
            let Some(segment) = frame.pop_front() else {
                stack.pop();
                continue;
            };

            match segment {
                Segment::Literal(text) => self.observer.assistant_text(&text),
                Segment::Directive(directive) => {
                    if turns_used >= self.max_directive_turns {
                        warn!(
                            limit = self.max_directive_turns,
                            "Directive turn limit reached, stopping loop"
                        );
                        self.observer.turn_limit_reached(self.max_directive_turns);
                        conversation.push(Message::assistant(TURN_LIMIT_REPLY));
                        return Ok(TURN_LIMIT_REPLY.to_string());
                    }
                    turns_used += 1;

                    self.observer.directive_started(&directive);
                    let outcome = match self.gate.process(&directive).await {
                        GateDecision::Executed(outcome) => outcome,
                        GateDecision::Declined => declined_outcome(),
                    };
                    self.observer.directive_finished(&directive, &outcome);

                    conversation.push(Message::user(outcome_message(&directive, &outcome)));

                    final_text = self.query(conversation).await?;
                    stack.push(segments(&final_text).collect());
                }
            }
        }

        info!(turns_used, "Request complete");
        Ok(final_text)
    }

    async fn query(&self, conversation: &mut Conversation) -> Result<String, Error> {
        debug!(
            provider = self.client.name(),
            history_len = conversation.len(),
            "Sending conversation"
        );
        let reply = self.client.send(conversation.messages()).await?;
        let text = reply.content.clone();
        conversation.push(reply);
        Ok(text)
    }
}

/// Outcome recorded for a directive the user declined.
fn declined_outcome() -> ExecutionOutcome {
    ExecutionOutcome::failure("Declined by user")
}

/// Render an outcome as the synthetic user message fed back to the model.
fn outcome_message(directive: &Directive, outcome: &ExecutionOutcome) -> String {
    if outcome.output == declined_outcome().output {
        return format!(
            "The user declined the {} directive. It was not executed and no result is available. \
             Do not retry it; continue without it or propose an alternative.",
            directive.kind()
        );
    }
    if outcome.succeeded {
        format!(
            "Directive result ({}):\n{}",
            directive.kind(),
            outcome.output
        )
    } else {
        format!(
            "Directive failed ({}):\n{}",
            directive.kind(),
            outcome.output
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::Confirm;
    use async_trait::async_trait;
    use ori_core::directive::RunOutput;
    use ori_core::error::ClientError;
    use ori_core::runner::CommandRunner;
    use std::sync::Mutex;

    /// Replays a fixed script of replies, one per `send` call.
    struct ScriptedClient {
        replies: Mutex<VecDeque<String>>,
    }

    impl ScriptedClient {
        fn new(replies: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            })
        }
    }

    #[async_trait]
    impl ChatCompletionClient for ScriptedClient {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn send(&self, _history: &[Message]) -> Result<Message, ClientError> {
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| ClientError::Network("script exhausted".into()))?;
            Ok(Message::assistant(reply))
        }
    }

    /// Records every command and answers with a canned output.
    struct RecordingRunner {
        commands: Mutex<Vec<String>>,
        reply: String,
    }

    impl RecordingRunner {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                commands: Mutex::new(Vec::new()),
                reply: reply.to_string(),
            })
        }

        fn commands(&self) -> Vec<String> {
            self.commands.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommandRunner for RecordingRunner {
        async fn run(&self, command: &str) -> RunOutput {
            self.commands.lock().unwrap().push(command.to_string());
            RunOutput {
                ran: true,
                output: self.reply.clone(),
            }
        }
    }

    struct Always(bool);

    impl Confirm for Always {
        fn confirm(&self, _directive: &Directive) -> bool {
            self.0
        }
    }

    fn agent(
        client: Arc<dyn ChatCompletionClient>,
        runner: Arc<dyn CommandRunner>,
        confirm: bool,
    ) -> AgentLoop {
        AgentLoop::new(
            client,
            ExecutionGate::new(runner, Arc::new(Always(confirm))),
        )
    }

    #[tokio::test]
    async fn plain_reply_ends_loop_immediately() {
        let runner = RecordingRunner::new("unused");
        let agent = agent(
            ScriptedClient::new(&["Just an answer."]),
            runner.clone(),
            true,
        );
        let mut conversation = Conversation::new();
        conversation.push(Message::user("hello"));

        let reply = agent.process(&mut conversation).await.unwrap();

        assert_eq!(reply, "Just an answer.");
        assert!(runner.commands().is_empty());
        // user + assistant
        assert_eq!(conversation.len(), 2);
    }

    #[tokio::test]
    async fn exec_outcome_is_fed_back() {
        let runner = RecordingRunner::new("/home/alice");
        let agent = agent(
            ScriptedClient::new(&["Checking.\n[exec]echo $HOME[/exec]", "It is /home/alice."]),
            runner.clone(),
            true,
        );
        let mut conversation = Conversation::new();
        conversation.push(Message::user("where is my home?"));

        let reply = agent.process(&mut conversation).await.unwrap();

        assert_eq!(reply, "It is /home/alice.");
        assert_eq!(runner.commands(), vec!["echo $HOME"]);

        // user, assistant, synthetic outcome, assistant
        assert_eq!(conversation.len(), 4);
        let synthetic = &conversation.messages()[2];
        assert_eq!(synthetic.role, ori_core::message::Role::User);
        assert!(synthetic.content.contains("/home/alice"));
        assert!(synthetic.content.contains("exec"));
    }

    #[tokio::test]
    async fn declined_directive_feeds_decline_message() {
        let runner = RecordingRunner::new("unused");
        let agent = agent(
            ScriptedClient::new(&["[exec]rm -rf /tmp/x[/exec]", "Understood, skipping."]),
            runner.clone(),
            false,
        );
        let mut conversation = Conversation::new();
        conversation.push(Message::user("clean up"));

        let reply = agent.process(&mut conversation).await.unwrap();

        assert_eq!(reply, "Understood, skipping.");
        assert!(runner.commands().is_empty());
        let synthetic = &conversation.messages()[2];
        assert!(synthetic.content.contains("declined"));
        assert!(synthetic.content.contains("Do not retry"));
    }

    #[tokio::test]
    async fn directives_run_depth_first() {
        let runner = RecordingRunner::new("ok");
        let agent = agent(
            ScriptedClient::new(&[
                "[exec]a[/exec][exec]b[/exec]",
                "[exec]c[/exec]",
                "done with c",
                "finished",
            ]),
            runner.clone(),
            true,
        );
        let mut conversation = Conversation::new();
        conversation.push(Message::user("go"));

        let reply = agent.process(&mut conversation).await.unwrap();

        // The follow-up reply to `a` issues `c`, which runs before `b`.
        assert_eq!(runner.commands(), vec!["a", "c", "b"]);
        assert_eq!(reply, "finished");
    }

    #[tokio::test]
    async fn turn_limit_stops_runaway_model() {
        let runner = RecordingRunner::new("ok");
        let script: Vec<&str> = vec!["[exec]again[/exec]"; 10];
        let agent =
            agent(ScriptedClient::new(&script), runner.clone(), true).with_max_directive_turns(3);
        let mut conversation = Conversation::new();
        conversation.push(Message::user("loop forever"));

        let reply = agent.process(&mut conversation).await.unwrap();

        assert_eq!(runner.commands().len(), 3);
        assert!(reply.contains("turn limit"));
        assert_eq!(conversation.last().unwrap().content, reply);
    }

    #[tokio::test]
    async fn client_error_propagates() {
        let runner = RecordingRunner::new("unused");
        let agent = agent(ScriptedClient::new(&[]), runner, true);
        let mut conversation = Conversation::new();
        conversation.push(Message::user("hello"));

        let result = agent.process(&mut conversation).await;
        assert!(matches!(result, Err(Error::Client(_))));
    }

    #[tokio::test]
    async fn observer_sees_segments_in_order() {
        struct Recording(Mutex<Vec<String>>);

        impl TurnObserver for Recording {
            fn assistant_text(&self, text: &str) {
                self.0.lock().unwrap().push(format!("text:{text}"));
            }
            fn directive_started(&self, directive: &Directive) {
                self.0
                    .lock()
                    .unwrap()
                    .push(format!("start:{}", directive.kind()));
            }
            fn directive_finished(&self, directive: &Directive, outcome: &ExecutionOutcome) {
                self.0
                    .lock()
                    .unwrap()
                    .push(format!("finish:{}:{}", directive.kind(), outcome.succeeded));
            }
            fn turn_limit_reached(&self, limit: u32) {
                self.0.lock().unwrap().push(format!("limit:{limit}"));
            }
        }

        let observer = Arc::new(Recording(Mutex::new(Vec::new())));
        let runner = RecordingRunner::new("ok");
        let agent = agent(
            ScriptedClient::new(&["before [exec]pwd[/exec] after", "all done"]),
            runner,
            true,
        )
        .with_observer(observer.clone());
        let mut conversation = Conversation::new();
        conversation.push(Message::user("where am I?"));

        agent.process(&mut conversation).await.unwrap();

        let events = observer.0.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                "text:before ".to_string(),
                "start:exec".to_string(),
                "finish:exec:true".to_string(),
                "text:all done".to_string(),
                "text: after".to_string(),
            ]
        );
    }
}
