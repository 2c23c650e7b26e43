//! An editing session: the state plus everything around it that a front
//! end needs, passed explicitly instead of living in a global.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::block::Block;
use crate::canvas::{DragController, DropTarget};
use crate::editor::{DocumentDetails, EditorState, Message, reduce};
use crate::error::EditorError;
use crate::publish::{PublishHandle, PublishReceipt, PublishRequest, Publisher};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

const TOAST_TTL: Duration = Duration::from_secs(4);

/// The document as it was when a publish started.
#[derive(Debug, Clone)]
struct Shipped {
    blocks: Vec<Block>,
    details: DocumentDetails,
}

impl Shipped {
    fn of(state: &EditorState) -> Self {
        Self {
            blocks: state.blocks().to_vec(),
            details: state.details().clone(),
        }
    }

    fn matches(&self, state: &EditorState) -> bool {
        self.blocks == state.blocks() && &self.details == state.details()
    }
}

pub struct EditorSession {
    state: EditorState,
    drag: DragController,
    toast: Option<Toast>,
    publisher: Arc<dyn Publisher>,
    publishing: Option<(PublishHandle, Shipped)>,
}

impl EditorSession {
    pub fn new(state: EditorState, publisher: Arc<dyn Publisher>) -> Self {
        Self {
            state,
            drag: DragController::new(),
            toast: None,
            publisher,
            publishing: None,
        }
    }

    pub const fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn into_state(self) -> EditorState {
        self.state
    }

    /// Run `msg` through the reducer. A rejected action is logged, shown as
    /// a warning toast and returned; the state stays as it was.
    pub fn dispatch(&mut self, msg: Message) -> Option<EditorError> {
        let state = std::mem::take(&mut self.state);
        let (state, error) = reduce(state, msg);
        self.state = state;
        if let Some(error) = &error {
            crate::editor::log_rejection(error);
            self.show_toast(ToastLevel::Warning, error.to_string());
        }
        error
    }

    pub fn drag(&mut self) -> &mut DragController {
        &mut self.drag
    }

    /// Finish the current drag at `target` and apply the result.
    pub fn drop_at(&mut self, target: Option<DropTarget>) -> Option<EditorError> {
        let msg = self.drag.drop(&self.state, target)?;
        self.dispatch(msg)
    }

    pub fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    /// Drop the toast once its time is up. Returns whether it changed.
    pub fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }

    /// The publish dialog's proposal for the current document.
    pub fn publish_request(&self, repository: &str) -> PublishRequest {
        PublishRequest::for_document(repository, self.state.details(), self.state.to_markdown())
    }

    pub const fn is_publishing(&self) -> bool {
        self.publishing.is_some()
    }

    /// Start publishing in the background. Returns `false` if a publish is
    /// already running.
    pub fn start_publish(&mut self, request: PublishRequest) -> bool {
        if self.publishing.is_some() {
            return false;
        }
        tracing::info!(repository = %request.repository, branch = %request.branch, "publishing");
        let handle = PublishHandle::spawn(Arc::clone(&self.publisher), request);
        self.publishing = Some((handle, Shipped::of(&self.state)));
        true
    }

    /// Check on the running publish.
    ///
    /// A success marks the document clean unless it was edited while the
    /// publish ran. A failure is surfaced as a toast and returned as
    /// [`EditorError::PublishFailed`].
    pub fn poll_publish(&mut self) -> Option<Result<PublishReceipt, EditorError>> {
        let result = self.publishing.as_mut()?.0.poll()?;
        let (_, shipped) = self.publishing.take()?;
        Some(self.finish_publish(&shipped, result))
    }

    /// Block until the running publish finishes.
    pub fn wait_publish(&mut self) -> Option<Result<PublishReceipt, EditorError>> {
        let (handle, shipped) = self.publishing.take()?;
        let result = handle.wait();
        Some(self.finish_publish(&shipped, result))
    }

    /// Forget the running publish; its result is discarded.
    pub fn cancel_publish(&mut self) {
        if let Some((handle, _)) = self.publishing.take() {
            handle.cancel();
            self.show_toast(ToastLevel::Info, "Publish cancelled");
        }
    }

    fn finish_publish(
        &mut self,
        shipped: &Shipped,
        result: Result<PublishReceipt, crate::publish::PublishError>,
    ) -> Result<PublishReceipt, EditorError> {
        match result {
            Ok(receipt) => {
                let mut message = match &receipt.pull_request {
                    Some(pr) => format!("Published, pull request #{} opened", pr.number),
                    None => format!("Published to {}", receipt.commit.branch),
                };
                if shipped.matches(&self.state) {
                    self.dispatch(Message::SetDirty(false));
                } else {
                    tracing::info!("document changed while publishing; keeping it dirty");
                    message.push_str("; newer edits are not published yet");
                }
                self.show_toast(ToastLevel::Info, message);
                Ok(receipt)
            }
            Err(err) => {
                tracing::warn!(%err, "publish failed");
                let error = EditorError::PublishFailed(err.to_string());
                self.show_toast(ToastLevel::Error, error.to_string());
                Err(error)
            }
        }
    }
}
