#![cfg_attr(not(test), no_std)]

use embedded_hal_async::delay::DelayNs;
use embedded_io::ReadReady;
use embedded_io_async::{Read, Write};
use log::debug;

mod constants;
pub use constants::*;

mod error;
pub use error::*;

mod config;
pub use config::*;

pub mod frame;
pub use frame::{Frame, FRAME_LEN};

/// Sensor hardware sub-model, inferred from a version query.
///
/// Purely informational: the wire protocol is identical across variants.
/// The classification is a tolerance heuristic over firmware version bytes
/// and is never re-validated after initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Variant could not be determined (sensor silent or unrecognized).
    Unknown,
    /// MH-Z19B.
    B,
    /// MH-Z19C.
    C,
    /// MH-Z19D.
    D,
}

impl Variant {
    /// Returns the human-readable model name.
    pub fn name(&self) -> &'static str {
        match self {
            Variant::B => "MH-Z19B",
            Variant::C => "MH-Z19C",
            Variant::D => "MH-Z19D",
            Variant::Unknown => "MH-Z19 (Unknown)",
        }
    }
}

impl core::fmt::Display for Variant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

// Maps the version discriminant onto a variant. Takes the larger of the two
// candidate bytes because firmwares disagree on which offset carries the
// version info.
fn classify_variant(a: u8, b: u8) -> Variant {
    let v = a.max(b);
    if v >= VARIANT_D_MIN {
        Variant::D
    } else if v >= VARIANT_C_MIN {
        Variant::C
    } else {
        Variant::B
    }
}

/// Represents an MH-Z19 family CO2 sensor.
///
/// This struct provides methods to interact with the sensor, such as reading
/// the gas concentration and temperature, calibrating it, and configuring
/// its settings.
///
/// The driver starts without a serial handle; every protocol operation fails
/// with [`Error::InvalidResponse`] until [`Mhz19::init`] has attached one.
///
/// # Type Parameters
///
/// * `Serial`: The type of the serial interface used to communicate with the
///   sensor. It must implement `embedded_io_async::Read`, `Write` and
///   `ReadReady`.
/// * `Delay`: An `embedded_hal_async::delay::DelayNs` implementation, used
///   for the post-write settle delay and for yielding between receive polls.
pub struct Mhz19<Serial, Delay> {
    serial: Option<Serial>,
    delay: Delay,
    config: Config,
    variant: Variant,
    last_frame: Frame,
    filter_window: u16,
    filter_sum: u32,
    filter_count: u16,
}

impl<S, D> Mhz19<S, D>
where
    S: Read + Write + ReadReady,
    D: DelayNs,
{
    /// Creates a new, uninitialized `Mhz19` driver.
    ///
    /// # Arguments
    ///
    /// * `delay`: The delay provider for protocol timing.
    /// * `config`: Receive timeout and settle delay settings.
    ///
    /// # Returns
    ///
    /// A driver in the uninitialized state; call [`Mhz19::init`] before
    /// issuing any sensor operation.
    pub fn new(delay: D, config: Config) -> Self {
        Self {
            serial: None,
            delay,
            config,
            variant: Variant::Unknown,
            last_frame: [0; FRAME_LEN],
            filter_window: 1,
            filter_sum: 0,
            filter_count: 0,
        }
    }

    /// Attaches the serial interface and probes the sensor variant.
    ///
    /// Variant detection is best-effort: a sensor that does not answer the
    /// version query leaves the variant as [`Variant::Unknown`] without
    /// surfacing an error, so initialization never blocks normal readings.
    pub async fn init(&mut self, serial: S) {
        self.serial = Some(serial);
        self.detect_variant().await;
        debug!("MH-Z19 init complete, variant: {}", self.variant);
    }

    /// Queries the firmware version and classifies the sensor sub-model.
    ///
    /// Any protocol failure degrades to [`Variant::Unknown`]; this call
    /// never returns an error. The result is also stored on the driver and
    /// available later through [`Mhz19::variant`].
    pub async fn detect_variant(&mut self) -> Variant {
        let variant = match self.query_version().await {
            Ok(v) => v,
            Err(e) => {
                log::warn!("Variant detection failed ({e}), keeping Unknown");
                Variant::Unknown
            }
        };
        self.variant = variant;
        variant
    }

    async fn query_version(&mut self) -> Result<Variant, Error> {
        self.send_command(CMD_VERSION, 0).await?;
        let response = self.receive().await?;
        debug!("Version response: {:02X?}", response);
        Ok(classify_variant(response[2], response[3]))
    }

    /// Returns the variant detected during initialization.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Reads the current CO2 concentration in ppm.
    ///
    /// When a moving-average filter window larger than 1 is configured (see
    /// [`Mhz19::set_filter_window`]), raw samples are accumulated; while the
    /// window is still filling each call returns its own raw value, and the
    /// call that completes the window returns the integer-truncated average
    /// and resets the accumulator.
    ///
    /// # Returns
    ///
    /// * `Ok(u16)` with the concentration in ppm.
    /// * `Err(Error::InvalidResponse)` if the driver is uninitialized.
    /// * `Err(Error::Timeout)` / `Err(Error::Crc)` / `Err(Error::Transport)`
    ///   on protocol failures.
    pub async fn read_co2(&mut self) -> Result<u16, Error> {
        self.send_command(CMD_READ, 0).await?;
        let response = self.receive().await?;
        let raw = u16::from_be_bytes([response[2], response[3]]);

        if self.filter_window > 1 {
            self.filter_sum += u32::from(raw);
            self.filter_count += 1;
            if self.filter_count >= self.filter_window {
                let averaged = (self.filter_sum / u32::from(self.filter_window)) as u16;
                self.filter_sum = 0;
                self.filter_count = 0;
                debug!("CO2 {averaged} ppm (averaged over {} samples)", self.filter_window);
                return Ok(averaged);
            }
            // Window still filling: report the raw sample, not a partial average.
            debug!("CO2 {raw} ppm (raw, window filling)");
            return Ok(raw);
        }

        debug!("CO2 {raw} ppm");
        Ok(raw)
    }

    /// Reads the sensor temperature in degrees Celsius.
    ///
    /// The read command returns the temperature alongside the concentration;
    /// the raw byte is offset by 40 degrees.
    pub async fn read_temperature(&mut self) -> Result<f32, Error> {
        self.send_command(CMD_READ, 0).await?;
        let response = self.receive().await?;
        let temperature = f32::from(response[4]) - 40.0;
        debug!("Temperature {temperature} C");
        Ok(temperature)
    }

    /// Triggers a zero point calibration.
    ///
    /// The sensor must have been in a stable 400 ppm environment (outdoor
    /// air) for around 20 minutes before this is meaningful.
    pub async fn calibrate_zero(&mut self) -> Result<(), Error> {
        self.send_command(CMD_CALIBRATE_ZERO, 0).await
    }

    /// Triggers a span point calibration against a known concentration.
    ///
    /// # Arguments
    ///
    /// * `ppm`: The reference concentration the sensor is currently exposed
    ///   to. The datasheet suggests 2000 ppm, at least 1000.
    pub async fn calibrate_span(&mut self, ppm: u16) -> Result<(), Error> {
        self.send_command(CMD_CALIBRATE_SPAN, ppm).await
    }

    /// Enables or disables automatic baseline correction (ABC).
    ///
    /// With ABC enabled the sensor periodically re-zeroes itself against the
    /// lowest concentration observed, assuming it sees fresh air regularly.
    pub async fn set_auto_calibration(&mut self, enabled: bool) -> Result<(), Error> {
        debug!("Setting auto calibration: {enabled}");
        self.send_command(CMD_ABC, if enabled { ABC_ENABLE } else { 0 })
            .await
    }

    /// Sets the detection range.
    ///
    /// # Arguments
    ///
    /// * `range`: Upper bound of the measurement range in ppm. Only 2000 and
    ///   5000 are accepted.
    ///
    /// # Returns
    ///
    /// * `Err(Error::InvalidResponse)` for any other range value; nothing is
    ///   written to the sensor in that case.
    pub async fn set_range(&mut self, range: u16) -> Result<(), Error> {
        if range != 2000 && range != 5000 {
            log::error!("Unsupported detection range: {range}");
            return Err(Error::InvalidResponse);
        }
        self.send_command(CMD_SET_RANGE, range).await
    }

    /// Unlocks configuration on firmwares that require a code before
    /// accepting calibration or range commands.
    pub async fn unlock(&mut self, code: u16) -> Result<(), Error> {
        self.send_command(CMD_UNLOCK, code).await
    }

    /// Locks configuration again by sending the unlock opcode with a zero
    /// payload.
    pub async fn lock(&mut self) -> Result<(), Error> {
        self.send_command(CMD_UNLOCK, 0).await
    }

    /// Sets the moving-average filter window for CO2 readings.
    ///
    /// A window of 1 (the default) disables filtering and raw values pass
    /// through untouched. The accumulator is reset whenever the window
    /// changes.
    pub fn set_filter_window(&mut self, samples: u16) {
        self.filter_window = samples.max(1);
        self.filter_sum = 0;
        self.filter_count = 0;
    }

    /// Returns a copy of the most recently received raw frame.
    ///
    /// All zeroes if no frame has been received yet. The snapshot is
    /// refreshed on every completed response, including ones that failed
    /// checksum verification, which makes it useful when diagnosing a
    /// misbehaving module.
    pub fn last_raw_response(&self) -> Frame {
        self.last_frame
    }

    // Builds a command frame, writes it out and waits the settle delay.
    async fn send_command(&mut self, command: u8, value: u16) -> Result<(), Error> {
        let packet = frame::build_command(command, value);
        debug!("Sending command {command:02X}: {packet:02X?}");

        let serial = self.serial.as_mut().ok_or(Error::InvalidResponse)?;
        let written = serial.write(&packet).await.map_err(|_| Error::Transport)?;
        serial.flush().await.map_err(|_| Error::Transport)?;

        // Give the module time to process before a response is expected.
        self.delay.delay_ms(self.config.settle_delay_ms).await;

        if written != FRAME_LEN {
            log::error!("Short write: {written} of {FRAME_LEN} bytes transferred");
            return Err(Error::Transport);
        }
        Ok(())
    }

    // Synchronizes on the 0xFF frame head, then collects the remaining
    // 8 bytes. Yields for POLL_INTERVAL_MS whenever no byte is ready. The
    // deadline accounts both idle polls and consumed bytes (a byte on the
    // wire takes about a millisecond at the module's 9600 baud), so the
    // loop terminates even against a line that never goes idle.
    async fn receive(&mut self) -> Result<Frame, Error> {
        let timeout_ms = self.config.receive_timeout_ms;
        let serial = self.serial.as_mut().ok_or(Error::InvalidResponse)?;

        let mut buffer: Frame = [0; FRAME_LEN];
        let mut filled = 0;
        let mut elapsed_ms = 0;

        loop {
            if elapsed_ms >= timeout_ms {
                log::error!("No complete frame after {elapsed_ms} ms ({filled} bytes received)");
                return Err(Error::Timeout);
            }

            if !serial.read_ready().map_err(|_| Error::Transport)? {
                self.delay.delay_ms(POLL_INTERVAL_MS).await;
                elapsed_ms += POLL_INTERVAL_MS;
                continue;
            }

            let mut byte = [0u8; 1];
            let count = serial.read(&mut byte).await.map_err(|_| Error::Transport)?;
            if count == 0 {
                self.delay.delay_ms(POLL_INTERVAL_MS).await;
                elapsed_ms += POLL_INTERVAL_MS;
                continue;
            }

            // Nominal wire time for the byte just consumed.
            elapsed_ms += POLL_INTERVAL_MS;

            // Discard noise until the frame head shows up.
            if filled == 0 && byte[0] != FRAME_HEAD {
                continue;
            }

            buffer[filled] = byte[0];
            filled += 1;
            if filled == FRAME_LEN {
                break;
            }
        }

        // Snapshot before verification so a corrupted frame can still be
        // inspected by the caller.
        self.last_frame = buffer;

        if !frame::verify(&buffer) {
            log::error!(
                "Bad checksum: calculated {:02X}, received {:02X}. Frame: {:02X?}",
                frame::checksum(&buffer),
                buffer[8],
                buffer
            );
            return Err(Error::Crc);
        }

        debug!("Received frame: {buffer:02X?}");
        Ok(buffer)
    }
}
