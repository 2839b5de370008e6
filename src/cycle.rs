// Decision logic for one send cycle, kept free of I/O so it can be tested
// without a terminal, network, or disk.
use regex::Regex;

pub const DEFAULT_RECIPIENT_NAME: &str = "Hiring Manager";
pub const DEFAULT_COMPANY: &str = "your company";

/// One pass through the interactive send flow. `Log` remembers whether the
/// delivery attempt worked so the terminal state can be derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStep {
    CollectRecipient,
    SelectResume,
    GenerateSubject,
    Confirm,
    Send,
    Log { sent: bool },
    Done(Terminal),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminal {
    Sent,
    Aborted,
    Failed,
}

/// Outcome of the step that just ran, as reported by the I/O layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepResult {
    Advance,
    Declined,
    SendFailed,
}

pub fn next_step(current: CycleStep, result: StepResult) -> CycleStep {
    match (current, result) {
        (CycleStep::Done(terminal), _) => CycleStep::Done(terminal),
        // Declining (no attachment, or at the confirmation gate) ends the
        // cycle before anything is sent or logged.
        (_, StepResult::Declined) => CycleStep::Done(Terminal::Aborted),
        (CycleStep::CollectRecipient, _) => CycleStep::SelectResume,
        (CycleStep::SelectResume, _) => CycleStep::GenerateSubject,
        (CycleStep::GenerateSubject, _) => CycleStep::Confirm,
        (CycleStep::Confirm, _) => CycleStep::Send,
        (CycleStep::Send, StepResult::SendFailed) => CycleStep::Log { sent: false },
        (CycleStep::Send, _) => CycleStep::Log { sent: true },
        (CycleStep::Log { sent: true }, _) => CycleStep::Done(Terminal::Sent),
        (CycleStep::Log { sent: false }, _) => CycleStep::Done(Terminal::Failed),
    }
}

pub fn is_valid_email(candidate: &str) -> bool {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return false;
    }
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .unwrap()
        .is_match(candidate)
}

pub fn display_name(name: Option<&str>) -> &str {
    match name {
        Some(name) if !name.trim().is_empty() => name,
        _ => DEFAULT_RECIPIENT_NAME,
    }
}

pub fn display_company(company: Option<&str>) -> &str {
    match company {
        Some(company) if !company.trim().is_empty() => company,
        _ => DEFAULT_COMPANY,
    }
}

pub fn none_if_empty(input: String) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
