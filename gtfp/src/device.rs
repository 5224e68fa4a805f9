//! High-level device interface

use tracing::{debug, info, warn};

use gtfp_core::{Command, ExtendedBlock, Request, Response, SessionState, Status, reply};
use gtfp_transport::{SerialTransport, Transport};
use gtfp_types::{BaudRate, FirmwareVersion, LedState, OpenInfo, UserId};

use crate::{
    config::Config,
    enroll::{EnrollState, Enrollment},
    error::{Error, ProtocolError, Result},
    session::Session,
};

/// GT-NUCL1633K1 fingerprint module
///
/// High-level interface over a [`Session`]. Every method sends one command
/// (enrollment sends several) and turns a failure status into
/// [`Error::Device`].
///
/// # Examples
///
/// ```no_run
/// use gtfp::{Device, LedState};
///
/// #[tokio::main]
/// async fn main() -> gtfp::Result<()> {
///     let device = Device::open_serial("/dev/ttyUSB0", 115_200)?;
///
///     device.open().await?;
///     device.set_led(LedState::On).await?;
///
///     let fw = device.get_fw_version().await?;
///     println!("{}", fw);
///     println!("{} users enrolled", device.get_user_count().await?);
///
///     device.close().await?;
///     Ok(())
/// }
/// ```
pub struct Device {
    session: Session,
}

impl Device {
    /// Create a device on `transport` with default settings
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            session: Session::new(transport),
        }
    }

    /// Create a device on `transport` with custom settings
    pub fn with_config(transport: impl Transport + 'static, config: Config) -> Self {
        Self {
            session: Session::with_config(transport, config),
        }
    }

    /// Open a serial port and create a device on it
    pub fn open_serial(path: impl Into<String>, baud_rate: u32) -> Result<Self> {
        Ok(Self::new(SerialTransport::open(path, baud_rate)?))
    }

    /// Underlying session, for raw [`Request`]s
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Check if Open has been acknowledged (and Close not yet sent)
    pub fn is_open(&self) -> bool {
        self.session.tracker().is_open()
    }

    /// Initialize the module
    pub async fn open(&self) -> Result<()> {
        self.command(&Request::Open { read_info: false }).await?;
        self.mark_open();
        Ok(())
    }

    /// Initialize the module and read its device information block
    pub async fn open_with_info(&self) -> Result<OpenInfo> {
        let request = Request::Open { read_info: true };

        match self.command_with_extended(&request).await? {
            ExtendedBlock::OpenInfo(open_info) => {
                self.mark_open();
                debug!("Device info: {:?}", open_info);
                Ok(open_info)
            }
            other => Err(unexpected_block(&request, &other)),
        }
    }

    /// Terminate the module session
    ///
    /// The host-side state is closed even if the module does not answer.
    pub async fn close(&self) -> Result<()> {
        let result = self.command(&Request::Close).await;
        self.session.tracker().mark_closed();

        match result {
            Ok(_) => {
                info!("Module closed");
                Ok(())
            }
            Err(e) => {
                warn!("Close failed: {}", e);
                Err(e)
            }
        }
    }

    /// Change the line speed of module and host
    ///
    /// The module answers at the old speed and switches afterwards; the
    /// host port follows if the transport supports it.
    pub async fn set_baud_rate(&self, rate: BaudRate) -> Result<()> {
        self.command(&Request::UartControl(rate)).await?;

        match self.session.set_host_baud_rate(rate.bits_per_second()).await {
            Ok(()) => {
                info!("Line speed now {} bps", rate.bits_per_second());
                Ok(())
            }
            Err(Error::Io(gtfp_transport::Error::Unsupported { transport, .. })) => {
                debug!(
                    "Module now at {} bps; {} transport cannot follow",
                    rate.bits_per_second(),
                    transport
                );
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Switch the sensor backlight
    pub async fn set_led(&self, state: LedState) -> Result<()> {
        self.command(&Request::LedControl(state)).await?;
        Ok(())
    }

    /// Check whether a finger is on the sensor
    pub async fn is_finger_pressed(&self) -> Result<bool> {
        let response = self.session.execute_default(&Request::IsPressFinger).await?;

        match response.status {
            Status::Success => Ok(reply::finger_pressed(&response)?),
            Status::FingerNotPressed => Ok(false),
            status => Err(device_error(&Request::IsPressFinger, status)),
        }
    }

    /// Prepare an enrollment of `user_id`
    ///
    /// Nothing is sent until the first [`Enrollment::step`].
    pub fn start_enrollment(&self, user_id: UserId) -> Result<Enrollment<'_>> {
        let mut enrollment = Enrollment::new(&self.session);
        enrollment.start(user_id)?;
        Ok(enrollment)
    }

    /// Enroll `user_id` from start to a terminal state
    ///
    /// `on_prompt` gets the sample index before each capture. Enrollment
    /// failures are reported in the returned state, not as `Err`.
    pub async fn enroll<F>(&self, user_id: UserId, on_prompt: F) -> Result<EnrollState>
    where
        F: FnMut(u8),
    {
        let mut enrollment = self.start_enrollment(user_id)?;
        enrollment.run(on_prompt).await?;
        Ok(enrollment.into_state())
    }

    /// Delete one enrolled user
    pub async fn delete_id(&self, user_id: UserId) -> Result<()> {
        self.command(&Request::DeleteId(user_id)).await?;
        debug!("Deleted user {}", user_id);
        Ok(())
    }

    /// Delete every enrolled user
    pub async fn delete_all(&self) -> Result<()> {
        self.command(&Request::DeleteAll).await?;
        info!("Deleted all users");
        Ok(())
    }

    /// Number of enrolled users
    pub async fn get_user_count(&self) -> Result<u16> {
        let response = self.command(&Request::GetUserCount).await?;
        Ok(reply::user_count(&response))
    }

    /// Capture a finger and search the database
    ///
    /// Returns `None` if the finger matches nobody. Waits as long as one
    /// enroll sample, since the module captures a finger first.
    pub async fn identify(&self) -> Result<Option<UserId>> {
        let timeout = self.session.config().enroll_timeout;
        let response = self.session.execute(&Request::Identify, timeout).await?;

        match response.status {
            Status::Success => Ok(Some(reply::user_id(Command::Identify, &response)?)),
            Status::NoUser => Ok(None),
            status => Err(device_error(&Request::Identify, status)),
        }
    }

    /// First free user ID
    pub async fn get_entry_id(&self) -> Result<UserId> {
        let response = self.command(&Request::GetEntryId).await?;
        Ok(reply::user_id(Command::GetEntryId, &response)?)
    }

    /// Read the firmware version block
    pub async fn get_fw_version(&self) -> Result<FirmwareVersion> {
        let request = Request::GetFwVersion;

        match self.command_with_extended(&request).await? {
            ExtendedBlock::FirmwareVersion(fw) => {
                debug!("Firmware: {}", fw);
                Ok(fw)
            }
            other => Err(unexpected_block(&request, &other)),
        }
    }

    // Helper methods

    fn mark_open(&self) {
        if self.session.tracker().mark_open() == SessionState::Open {
            debug!("Module was already open");
        } else {
            info!("Module opened");
        }
    }

    async fn command(&self, request: &Request) -> Result<Response> {
        let response = self.session.execute_default(request).await?;

        if !response.is_success() {
            return Err(device_error(request, response.status));
        }

        Ok(response)
    }

    async fn command_with_extended(&self, request: &Request) -> Result<ExtendedBlock> {
        let len = request.extended_len().ok_or_else(|| {
            Error::from(ProtocolError::InvalidReply {
                command: request.command(),
                reason: "command has no data block".to_string(),
            })
        })?;

        let timeout = self.session.config().command_timeout;
        let (response, block) = self
            .session
            .execute_with_extended(request, timeout, len)
            .await?;

        if !response.is_success() {
            return Err(device_error(request, response.status));
        }

        block.ok_or_else(|| {
            ProtocolError::InvalidReply {
                command: request.command(),
                reason: "data block missing".to_string(),
            }
            .into()
        })
    }
}

fn device_error(request: &Request, status: Status) -> Error {
    warn!("{} failed: {}", request, status);
    Error::Device {
        command: request.command(),
        status,
    }
}

fn unexpected_block(request: &Request, block: &ExtendedBlock) -> Error {
    ProtocolError::InvalidReply {
        command: request.command(),
        reason: format!("unexpected data block {:?}", block),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{ScriptLog, ScriptedTransport, response_frame};
    use gtfp_core::constants::{enroll, fw_version, offsets, open_info};
    use pretty_assertions::assert_eq;

    fn device() -> (Device, ScriptLog) {
        let (transport, log) = ScriptedTransport::new();
        (Device::new(transport), log)
    }

    #[tokio::test]
    async fn test_open_close() {
        let (device, log) = device();
        log.push(response_frame(Command::Open, 0, 0, Status::Success));
        log.push(response_frame(Command::Close, 0, 0, Status::Success));

        assert!(!device.is_open());
        device.open().await.unwrap();
        assert!(device.is_open());
        device.close().await.unwrap();
        assert!(!device.is_open());

        assert_eq!(log.sent()[0], [0xF5, 0xA0, 0x00, 0x00, 0x00, 0x00, 0xA0, 0xF5]);
    }

    #[tokio::test]
    async fn test_close_without_reply_still_closes() {
        let (device, log) = device();
        log.push(response_frame(Command::Open, 0, 0, Status::Success));
        device.open().await.unwrap();

        let result = device.close().await;
        assert!(matches!(result, Err(Error::Timeout { command: Command::Close, .. })));
        assert!(!device.is_open());
    }

    #[tokio::test]
    async fn test_open_failure_stays_closed() {
        let (device, log) = device();
        log.push(response_frame(Command::Open, 0, 0, Status::Fail));

        let err = device.open().await.unwrap_err();
        assert_eq!(err.status(), Some(Status::Fail));
        assert!(!device.is_open());
    }

    #[tokio::test]
    async fn test_open_with_info() {
        let (device, log) = device();
        log.push(response_frame(Command::Open, 0, 0, Status::Success));
        let mut block = [0u8; open_info::SIZE];
        block[open_info::DEVICE_ID] = 0x01;
        block[open_info::DAY] = 17;
        block[open_info::MONTH] = 3;
        block[open_info::YEAR..open_info::YEAR + 2].copy_from_slice(&2021u16.to_le_bytes());
        block[open_info::SENSOR_TYPE] = 0x33;
        log.push(block);

        let info = device.open_with_info().await.unwrap();
        assert_eq!(info.device_id, 0x01);
        assert_eq!(info.release_year, 2021);
        assert_eq!(info.sensor_type, 0x33);
        assert!(device.is_open());

        assert_eq!(log.sent()[0][offsets::P1], 0x01);
    }

    #[tokio::test]
    async fn test_get_fw_version() {
        let (device, log) = device();
        log.push(response_frame(Command::GetFwVersion, 0, 0, Status::Success));
        let mut block = [0u8; fw_version::SIZE];
        block[fw_version::SENSOR_TYPE] = 0x16;
        block[fw_version::YEAR] = 23;
        block[fw_version::MONTH] = 11;
        block[fw_version::DAY] = 5;
        block[fw_version::VERSION] = 4;
        log.push(block);

        let fw = device.get_fw_version().await.unwrap();
        assert_eq!(
            fw,
            FirmwareVersion {
                sensor_type: 0x16,
                year: 23,
                month: 11,
                day: 5,
                version: 4,
            }
        );
        assert_eq!(log.pending(), 0);
    }

    #[tokio::test]
    async fn test_get_fw_version_unsupported() {
        let (device, log) = device();
        log.push(response_frame(Command::GetFwVersion, 0, 0, Status::CommandNoSupport));

        let err = device.get_fw_version().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Device {
                command: Command::GetFwVersion,
                status: Status::CommandNoSupport,
            }
        ));
    }

    #[tokio::test]
    async fn test_identify() {
        let (device, log) = device();
        log.push(response_frame(Command::Identify, 0x00, 0x2A, Status::Success));
        log.push(response_frame(Command::Identify, 0, 0, Status::NoUser));
        log.push(response_frame(Command::Identify, 0, 0, Status::FingerNotPressed));

        assert_eq!(device.identify().await.unwrap(), Some(UserId::new(42).unwrap()));
        assert_eq!(device.identify().await.unwrap(), None);
        assert_eq!(
            device.identify().await.unwrap_err().status(),
            Some(Status::FingerNotPressed)
        );
    }

    #[tokio::test]
    async fn test_delete_missing_user() {
        let (device, log) = device();
        log.push(response_frame(Command::DeleteId, 0, 0, Status::NoUser));

        let err = device.delete_id(UserId::new(300).unwrap()).await.unwrap_err();
        assert_eq!(err.status(), Some(Status::NoUser));

        let sent = log.sent();
        assert_eq!(sent[0][offsets::P1], 0x01);
        assert_eq!(sent[0][offsets::P2], 0x2C);
    }

    #[tokio::test]
    async fn test_user_queries() {
        let (device, log) = device();
        log.push(response_frame(Command::GetUserCount, 0x01, 0x00, Status::Success));
        log.push(response_frame(Command::GetEntryId, 0x00, 0x05, Status::Success));
        log.push(response_frame(Command::DeleteAll, 0, 0, Status::Success));

        assert_eq!(device.get_user_count().await.unwrap(), 256);
        assert_eq!(device.get_entry_id().await.unwrap().get(), 5);
        device.delete_all().await.unwrap();
    }

    #[tokio::test]
    async fn test_is_finger_pressed() {
        let (device, log) = device();
        log.push(response_frame(Command::IsPressFinger, 1, 0, Status::Success));
        log.push(response_frame(Command::IsPressFinger, 0, 0, Status::Success));
        log.push(response_frame(Command::IsPressFinger, 0, 0, Status::FingerNotPressed));

        assert!(device.is_finger_pressed().await.unwrap());
        assert!(!device.is_finger_pressed().await.unwrap());
        assert!(!device.is_finger_pressed().await.unwrap());
    }

    #[tokio::test]
    async fn test_set_baud_rate_without_host_support() {
        let (device, log) = device();
        log.push(response_frame(Command::UartControl, 0, 0, Status::Success));

        device.set_baud_rate(BaudRate::B921600).await.unwrap();
        assert_eq!(log.sent()[0][offsets::P1], 6);
    }

    #[tokio::test]
    async fn test_set_led() {
        let (device, log) = device();
        log.push(response_frame(Command::LedControl, 0, 0, Status::Success));

        device.set_led(LedState::Off).await.unwrap();
        assert_eq!(log.sent()[0], [0xF5, 0xB4, 0x01, 0x00, 0x00, 0x00, 0xB5, 0xF5]);
    }

    #[tokio::test]
    async fn test_enroll_to_completion() {
        let (device, log) = device();
        for _ in 0..7 {
            log.push(response_frame(Command::Enroll, enroll::CONTINUE, 0, Status::Success));
        }
        log.push(response_frame(Command::Enroll, enroll::FINAL, 0, Status::Success));

        let mut prompts = 0;
        let state = device
            .enroll(UserId::new(9).unwrap(), |_| prompts += 1)
            .await
            .unwrap();

        assert!(matches!(state, EnrollState::Completed));
        assert_eq!(prompts, 8);
    }
}
