// Sink-agnostic event fan-out between the runner's worker thread and observers

use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};

use super::types::{CompletionEvent, FailureEvent, LogLine, ProgressEvent, TerminalEvent};

/// Fan-out notification bus with three independent channels: progress, log,
/// and terminal (completion-or-failure).
///
/// Each channel accepts any number of subscribers; publishing clones the
/// event to every subscriber in turn. Channels never couple: a slow or
/// dropped progress subscriber cannot delay a terminal event. Within one
/// channel, events arrive in the order they were published (mpsc is FIFO).
///
/// Publishing with no subscribers, or after a subscriber dropped its
/// receiver, is not an error; the send is simply skipped for that sink.
#[derive(Default)]
pub struct EventBus {
    progress: Mutex<Vec<Sender<ProgressEvent>>>,
    log: Mutex<Vec<Sender<LogLine>>>,
    terminal: Mutex<Vec<Sender<TerminalEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe_progress(&self) -> Receiver<ProgressEvent> {
        let (tx, rx) = mpsc::channel();
        self.progress.lock().unwrap().push(tx);
        rx
    }

    pub fn subscribe_log(&self) -> Receiver<LogLine> {
        let (tx, rx) = mpsc::channel();
        self.log.lock().unwrap().push(tx);
        rx
    }

    pub fn subscribe_terminal(&self) -> Receiver<TerminalEvent> {
        let (tx, rx) = mpsc::channel();
        self.terminal.lock().unwrap().push(tx);
        rx
    }

    pub fn publish_progress(&self, event: ProgressEvent) {
        for tx in self.progress.lock().unwrap().iter() {
            let _ = tx.send(event.clone());
        }
    }

    pub fn log(&self, text: impl Into<String>) {
        let line = LogLine { text: text.into() };
        for tx in self.log.lock().unwrap().iter() {
            let _ = tx.send(line.clone());
        }
    }

    pub fn publish_completion(&self, event: CompletionEvent) {
        self.publish_terminal(TerminalEvent::Completed(event));
    }

    pub fn publish_failure(&self, event: FailureEvent) {
        self.publish_terminal(TerminalEvent::Failed(event));
    }

    fn publish_terminal(&self, event: TerminalEvent) {
        for tx in self.terminal.lock().unwrap().iter() {
            let _ = tx.send(event.clone());
        }
    }
}
