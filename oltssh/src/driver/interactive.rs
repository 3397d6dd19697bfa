//! Interactive command support for handling prompts that require user input.
//!
//! Some OLT commands stop and ask before they act:
//! - `ont delete 0 all` asks `Are you sure to delete the ONTs? (y/n)[n]:`
//! - `quit` at the top level asks for logout confirmation
//!
//! `send_interactive` handles these by sending a sequence of inputs, each
//! waiting for a specific prompt text before proceeding.

use std::time::Duration;

/// An event in an interactive command sequence.
///
/// # Example
///
/// ```rust
/// use oltssh::driver::InteractiveEvent;
///
/// let events = vec![
///     InteractiveEvent::new("ont delete 0 all", "(y/n)[n]:"),
///     InteractiveEvent::new("y", "MA5683T(config-if-gpon-0/1)#"),
/// ];
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InteractiveEvent {
    /// The input to send (command or response).
    pub input: String,

    /// Text to wait for after sending input.
    pub prompt: String,

    /// Whether this input should be hidden in logs.
    pub hidden: bool,
}

impl InteractiveEvent {
    /// Create a new interactive event.
    pub fn new(input: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            prompt: prompt.into(),
            hidden: false,
        }
    }

    /// Create an event for hidden input.
    pub fn hidden(input: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            hidden: true,
            ..Self::new(input, prompt)
        }
    }

    /// Input as it may appear in logs.
    pub(crate) fn display_input(&self) -> &str {
        if self.hidden { "********" } else { &self.input }
    }
}

/// Result of an interactive command sequence.
#[derive(Debug, Clone)]
pub struct InteractiveResult {
    /// Results from each step in the sequence.
    pub steps: Vec<InteractiveStep>,

    /// Total time for the entire sequence.
    pub elapsed: Duration,
}

impl InteractiveResult {
    pub fn new(steps: Vec<InteractiveStep>, elapsed: Duration) -> Self {
        Self { steps, elapsed }
    }

    /// Get the final output (from the last step).
    pub fn final_output(&self) -> Option<&str> {
        self.steps.last().map(|s| s.output.as_str())
    }

    /// Get all outputs concatenated.
    pub fn full_output(&self) -> String {
        self.steps.iter().map(|s| s.output.as_str()).collect()
    }
}

/// Result of a single step in an interactive sequence.
#[derive(Debug, Clone)]
pub struct InteractiveStep {
    /// The input that was sent (masked if hidden).
    pub input: String,

    /// The output received after sending input.
    pub output: String,

    /// Time taken for this step.
    pub elapsed: Duration,
}

/// Builder for creating interactive command sequences.
///
/// # Example
///
/// ```rust
/// use oltssh::driver::InteractiveBuilder;
///
/// let events = InteractiveBuilder::new()
///     .send("quit")
///     .expect("before logout")
///     .send("y")
///     .expect("to log on")
///     .build();
/// assert_eq!(events.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct InteractiveBuilder {
    events: Vec<InteractiveEvent>,
}

impl InteractiveBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an input to send.
    ///
    /// Must be followed by `expect()` to specify what to wait for.
    pub fn send(self, input: impl Into<String>) -> InteractiveBuilderWithInput {
        InteractiveBuilderWithInput {
            builder: self,
            input: input.into(),
            hidden: false,
        }
    }

    /// Add an input that must not show up in logs.
    pub fn send_hidden(self, input: impl Into<String>) -> InteractiveBuilderWithInput {
        InteractiveBuilderWithInput {
            builder: self,
            input: input.into(),
            hidden: true,
        }
    }

    /// Build the list of interactive events.
    pub fn build(self) -> Vec<InteractiveEvent> {
        self.events
    }
}

/// Intermediate state for the builder after `send()` is called.
#[derive(Debug)]
pub struct InteractiveBuilderWithInput {
    builder: InteractiveBuilder,
    input: String,
    hidden: bool,
}

impl InteractiveBuilderWithInput {
    /// Specify the prompt text to wait for after sending the input.
    pub fn expect(mut self, prompt: impl Into<String>) -> InteractiveBuilder {
        let event = if self.hidden {
            InteractiveEvent::hidden(self.input, prompt)
        } else {
            InteractiveEvent::new(self.input, prompt)
        };
        self.builder.events.push(event);
        self.builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interactive_event_new() {
        let event = InteractiveEvent::new("y", "#");
        assert_eq!(event.input, "y");
        assert!(!event.hidden);
        assert_eq!(event.display_input(), "y");
    }

    #[test]
    fn test_interactive_event_hidden() {
        let event = InteractiveEvent::hidden("secret123", "#");
        assert!(event.hidden);
        assert_eq!(event.display_input(), "********");
    }

    #[test]
    fn test_interactive_builder() {
        let events = InteractiveBuilder::new()
            .send("ont delete 0 all")
            .expect("(y/n)[n]:")
            .send("y")
            .expect("MA5683T(config-if-gpon-0/1)#")
            .build();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].input, "ont delete 0 all");
        assert_eq!(events[0].prompt, "(y/n)[n]:");
        assert_eq!(events[1].input, "y");
    }

    #[test]
    fn test_interactive_result() {
        let steps = vec![
            InteractiveStep {
                input: "quit".into(),
                output: "output1".into(),
                elapsed: Duration::from_millis(100),
            },
            InteractiveStep {
                input: "y".into(),
                output: "output2".into(),
                elapsed: Duration::from_millis(200),
            },
        ];
        let result = InteractiveResult::new(steps, Duration::from_millis(300));

        assert_eq!(result.final_output(), Some("output2"));
        assert_eq!(result.full_output(), "output1output2");
    }
}
