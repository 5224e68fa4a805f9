//! Multi-sample enrollment
//!
//! The module builds a template from [`ENROLL_SAMPLE_COUNT`] finger
//! presentations. Each presentation is one Enroll command carrying the user
//! ID and the sample index; the response says whether another sample is
//! needed (Continue) or the template is stored (Final).
//!
//! ```text
//! Idle ──start──▶ Sampling(0) ──Continue──▶ Sampling(1) ─ … ─▶ Sampling(7)
//!                     │                                            │
//!                     ├──cancel──▶ Cancelled                  Final│
//!                     └──failure──▶ Failed(reason)                 ▼
//!                                                              Completed
//! ```
//!
//! Failures are never retried automatically. Terminal states stay terminal;
//! enrolling again takes a new [`Enrollment`].

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info, warn};

use gtfp_core::{
    Continuation, Request, Response, Status, constants::ENROLL_SAMPLE_COUNT, reply,
};
use gtfp_types::UserId;

use crate::{
    error::{Error, ProtocolError, Result},
    session::Session,
};

/// Why an enrollment stopped
#[derive(Debug)]
pub enum FailureReason {
    /// Capture problem the user can fix by presenting the finger again
    Quality(Status),

    /// Any other failure status from the module
    Device(Status),

    /// Responses that do not fit the enrollment sequence
    Protocol(ProtocolError),

    /// The exchange itself failed (timeout, framing, transport)
    Session(Error),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quality(status) => write!(f, "capture rejected: {}", status),
            Self::Device(status) => write!(f, "module refused: {}", status),
            Self::Protocol(err) => write!(f, "protocol violation: {}", err),
            Self::Session(err) => write!(f, "session failure: {}", err),
        }
    }
}

/// Enrollment progress
#[derive(Debug)]
pub enum EnrollState {
    /// Not started
    Idle,

    /// Waiting to capture the sample with this index
    Sampling(u8),

    /// Template stored on the module
    Completed,

    Failed(FailureReason),

    Cancelled,
}

impl EnrollState {
    /// Check if no further step is possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed(_) | Self::Cancelled)
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Sampling(_) => "Sampling",
            Self::Completed => "Completed",
            Self::Failed(_) => "Failed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for EnrollState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sampling(sample) => {
                write!(f, "Sampling({}/{})", u16::from(*sample) + 1, ENROLL_SAMPLE_COUNT)
            }
            Self::Failed(reason) => write!(f, "Failed({})", reason),
            other => f.write_str(other.name()),
        }
    }
}

/// Result of one [`Enrollment::step`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Sample accepted; ask the user to lift and present the finger again
    Continue { next_sample: u8 },

    Completed,

    /// See [`Enrollment::state`] for the reason
    Failed,

    Cancelled,
}

/// Requests cancellation from another task
///
/// A command already on the wire is never interrupted; the enrollment
/// cancels before its next sample instead.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    requested: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.requested.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }
}

/// Enrollment of one user ID
///
/// # Examples
///
/// ```no_run
/// use gtfp::{Device, EnrollState, SerialTransport, UserId};
///
/// # async fn run() -> gtfp::Result<()> {
/// let device = Device::new(SerialTransport::open("/dev/ttyUSB0", 115_200)?);
/// device.open().await?;
///
/// let mut enrollment = device.start_enrollment(UserId::new(7)?)?;
/// enrollment
///     .run(|sample| println!("Place finger ({}/8)", sample + 1))
///     .await?;
///
/// match enrollment.state() {
///     EnrollState::Completed => println!("Enrolled"),
///     other => println!("Stopped: {}", other),
/// }
/// # Ok(())
/// # }
/// ```
pub struct Enrollment<'a> {
    session: &'a Session,
    user_id: Option<UserId>,
    state: EnrollState,
    last_continuation: Option<Continuation>,
    cancel: CancelHandle,
}

impl<'a> Enrollment<'a> {
    /// Create an idle enrollment on `session`
    pub fn new(session: &'a Session) -> Self {
        Self {
            session,
            user_id: None,
            state: EnrollState::Idle,
            last_continuation: None,
            cancel: CancelHandle::default(),
        }
    }

    pub fn state(&self) -> &EnrollState {
        &self.state
    }

    pub fn into_state(self) -> EnrollState {
        self.state
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    /// Continuation marker of the last accepted sample
    pub fn last_continuation(&self) -> Option<Continuation> {
        self.last_continuation
    }

    /// Handle that cancels this enrollment before its next sample
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Begin enrolling `user_id`
    ///
    /// Nothing is sent yet; the first [`step`](Self::step) captures sample 0.
    /// Whether the ID is already taken is the caller's concern; the module
    /// answers UserExist if so.
    pub fn start(&mut self, user_id: UserId) -> Result<()> {
        if !matches!(self.state, EnrollState::Idle) {
            return Err(invalid_state("start", &self.state));
        }

        debug!("Starting enrollment of user {}", user_id);

        self.user_id = Some(user_id);
        self.state = EnrollState::Sampling(0);
        Ok(())
    }

    /// Capture the current sample
    ///
    /// Blocks for up to the configured enroll timeout while the user
    /// presents the finger. Failures end the enrollment and are reported
    /// through the state rather than as `Err`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidState`] unless sampling is in progress
    /// - [`Error::SessionBusy`] if another command holds the session;
    ///   nothing was sent and the state is unchanged
    pub async fn step(&mut self) -> Result<StepOutcome> {
        let (user_id, sample) = match (self.user_id, &self.state) {
            (Some(user_id), EnrollState::Sampling(sample)) => (user_id, *sample),
            _ => return Err(invalid_state("step", &self.state)),
        };

        if self.cancel.is_cancelled() {
            self.cancel().await?;
            return Ok(StepOutcome::Cancelled);
        }

        let request = Request::enroll(user_id, sample)?;
        let timeout = self.session.config().enroll_timeout;

        debug!("Capturing sample {}/{} for user {}", sample + 1, ENROLL_SAMPLE_COUNT, user_id);

        self.state = match self.session.execute(&request, timeout).await {
            Ok(response) => self.interpret(sample, &response),
            Err(Error::SessionBusy) => return Err(Error::SessionBusy),
            Err(e) => {
                warn!("Enroll sample {} for user {} failed: {}", sample, user_id, e);
                EnrollState::Failed(FailureReason::Session(e))
            }
        };

        Ok(match &self.state {
            EnrollState::Sampling(next_sample) => StepOutcome::Continue {
                next_sample: *next_sample,
            },
            EnrollState::Completed => StepOutcome::Completed,
            EnrollState::Cancelled => StepOutcome::Cancelled,
            EnrollState::Idle | EnrollState::Failed(_) => StepOutcome::Failed,
        })
    }

    /// Abort the enrollment
    ///
    /// Sends EnrollCancel and ends in `Cancelled` whatever the module
    /// answers.
    pub async fn cancel(&mut self) -> Result<()> {
        if !matches!(self.state, EnrollState::Sampling(_)) {
            return Err(invalid_state("cancel", &self.state));
        }

        let timeout = self.session.config().command_timeout;
        match self.session.execute(&Request::EnrollCancel, timeout).await {
            Ok(response) if response.is_success() => debug!("Enrollment cancelled on the module"),
            Ok(response) => warn!("EnrollCancel answered {}", response.status),
            Err(e) => warn!("EnrollCancel failed: {}", e),
        }

        info!("Enrollment of user {:?} cancelled", self.user_id.map(UserId::get));

        self.state = EnrollState::Cancelled;
        Ok(())
    }

    /// Drive the enrollment to a terminal state
    ///
    /// `on_prompt` is called with the sample index before each capture so
    /// the caller can ask the user to present (or lift and re-present) the
    /// finger.
    pub async fn run<F>(&mut self, mut on_prompt: F) -> Result<&EnrollState>
    where
        F: FnMut(u8),
    {
        if !matches!(self.state, EnrollState::Sampling(_)) {
            return Err(invalid_state("run", &self.state));
        }

        while let EnrollState::Sampling(sample) = self.state {
            if !self.cancel.is_cancelled() {
                on_prompt(sample);
            }
            self.step().await?;
        }

        Ok(&self.state)
    }

    fn interpret(&mut self, sample: u8, response: &Response) -> EnrollState {
        let status = response.status;

        if !status.is_success() {
            warn!("Sample {} rejected: {}", sample, status);
            let reason = if status.is_enroll_quality_failure() {
                FailureReason::Quality(status)
            } else {
                FailureReason::Device(status)
            };
            return EnrollState::Failed(reason);
        }

        let continuation = match reply::continuation(response) {
            Ok(continuation) => continuation,
            Err(e) => {
                warn!("Sample {}: {}", sample, e);
                return EnrollState::Failed(match Error::from(e) {
                    Error::Protocol(err) => FailureReason::Protocol(err),
                    other => FailureReason::Session(other),
                });
            }
        };

        self.last_continuation = Some(continuation);
        let collected = sample + 1;

        match continuation {
            Continuation::Continue if collected < ENROLL_SAMPLE_COUNT => {
                debug!("Sample {} accepted, {} to go", sample, ENROLL_SAMPLE_COUNT - collected);
                EnrollState::Sampling(collected)
            }
            Continuation::Continue => {
                warn!("Module asked for more than {} samples", ENROLL_SAMPLE_COUNT);
                EnrollState::Failed(FailureReason::Protocol(ProtocolError::MissingFinal {
                    expected: ENROLL_SAMPLE_COUNT,
                }))
            }
            Continuation::Final if collected == ENROLL_SAMPLE_COUNT => {
                info!(
                    "Enrollment of user {:?} completed",
                    self.user_id.map(UserId::get)
                );
                EnrollState::Completed
            }
            Continuation::Final => {
                warn!("Module finished after only {} samples", collected);
                EnrollState::Failed(FailureReason::Protocol(ProtocolError::EarlyFinal {
                    collected,
                    expected: ENROLL_SAMPLE_COUNT,
                }))
            }
        }
    }
}

fn invalid_state(operation: &str, state: &EnrollState) -> Error {
    Error::InvalidState(format!("cannot {} enrollment in state {}", operation, state))
}
