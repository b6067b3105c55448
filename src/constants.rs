// FRAME_HEAD is the byte that marks the beginning of any frame (command or response).
pub const FRAME_HEAD: u8 = 0xFF;

// SENSOR_ID is the fixed sensor number carried in byte 1 of every command frame.
pub const SENSOR_ID: u8 = 0x01;

// CMD_READ requests the current gas concentration and temperature.
pub const CMD_READ: u8 = 0x86;

// CMD_CALIBRATE_ZERO triggers a zero point calibration (400 ppm reference).
pub const CMD_CALIBRATE_ZERO: u8 = 0x87;

// CMD_CALIBRATE_SPAN triggers a span point calibration.
pub const CMD_CALIBRATE_SPAN: u8 = 0x88;

// CMD_ABC toggles automatic baseline correction (self-calibration).
pub const CMD_ABC: u8 = 0x79;

// CMD_SET_RANGE selects the detection range (2000 or 5000 ppm).
pub const CMD_SET_RANGE: u8 = 0x99;

// CMD_VERSION queries firmware/version info, used for variant detection.
pub const CMD_VERSION: u8 = 0xA0;

// CMD_UNLOCK unlocks (payload = code) or locks (payload = 0) configuration
// on firmwares that gate calibration commands behind it.
pub const CMD_UNLOCK: u8 = 0x9F;

// ABC_ENABLE is the payload that switches automatic baseline correction on.
pub const ABC_ENABLE: u16 = 0x00A0;

// Variant detection thresholds applied to the version discriminant byte.
// These encode observed firmware variance, not a documented protocol; they
// live here so they can be revisited without touching the framing code.
pub const VARIANT_D_MIN: u8 = 0x30;
pub const VARIANT_C_MIN: u8 = 0x14;

// POLL_INTERVAL_MS is how long the receive loop yields between polls when
// no byte is ready.
pub const POLL_INTERVAL_MS: u32 = 1;
