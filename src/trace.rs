//! Diagnostics for the interpreter, switched on through the `SOL25_TRACE`
//! environment variable: `1` enables everything, a comma-separated list
//! (`load`, `dispatch`) selects phases. Lines go to stderr so they never
//! mix with program output.

use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Classes taken into the registry.
    Load,
    /// Message sends and the dispatch step that accepted them.
    Dispatch,
}

const ALL_PHASES: [Phase; 2] = [Phase::Load, Phase::Dispatch];

impl Phase {
    fn name(self) -> &'static str {
        match self {
            Phase::Load => "load",
            Phase::Dispatch => "dispatch",
        }
    }
}

fn parse_spec(spec: &str) -> Vec<Phase> {
    match spec.trim() {
        "" | "0" => Vec::new(),
        "1" => ALL_PHASES.to_vec(),
        list => ALL_PHASES
            .into_iter()
            .filter(|phase| list.split(',').any(|name| name.trim() == phase.name()))
            .collect(),
    }
}

fn enabled(phase: Phase) -> bool {
    static ENABLED: OnceLock<Vec<Phase>> = OnceLock::new();
    ENABLED
        .get_or_init(|| parse_spec(&std::env::var("SOL25_TRACE").unwrap_or_default()))
        .contains(&phase)
}

/// One line per class taken into the registry.
pub(crate) fn class_loaded(name: &str, parent: &str, methods: usize) {
    if enabled(Phase::Load) {
        eprintln!(
            "sol25: load class={} parent={} methods={}",
            name, parent, methods
        );
    }
}

/// One line per message send, tagged with the dispatch step that accepted
/// it and the frame depth at that moment.
pub(crate) fn send(depth: usize, receiver: &str, selector: &str, step: &str) {
    if enabled(Phase::Dispatch) {
        eprintln!(
            "sol25: dispatch depth={} receiver={} selector='{}' step={}",
            depth, receiver, selector, step
        );
    }
}
