/// Configuration settings for the MH-Z19 driver.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    /// How long `receive` waits for a complete response frame, in
    /// milliseconds of accumulated idle polling.
    pub receive_timeout_ms: u32,
    /// Pause after each command write, giving the module time to process
    /// before a response is expected.
    pub settle_delay_ms: u32,
}

impl Config {
    /// Creates a new `Config` with the default timings.
    pub fn new() -> Config {
        Config::default()
    }

    /// Sets the receive timeout in milliseconds.
    ///
    /// # Arguments
    ///
    /// * `timeout_ms` - The deadline for assembling a full response frame.
    ///
    /// # Returns
    ///
    /// The updated `Config` instance.
    pub fn receive_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.receive_timeout_ms = timeout_ms;
        self
    }

    /// Sets the post-write settle delay in milliseconds.
    ///
    /// # Arguments
    ///
    /// * `delay_ms` - The pause inserted after every command write.
    ///
    /// # Returns
    ///
    /// The updated `Config` instance.
    pub fn settle_delay_ms(mut self, delay_ms: u32) -> Self {
        self.settle_delay_ms = delay_ms;
        self
    }
}

/// Provides default timing values for the MH-Z19 driver.
impl Default for Config {
    /// Returns the default configuration: 1000 ms receive timeout and a
    /// 10 ms settle delay after each write.
    fn default() -> Config {
        Config {
            receive_timeout_ms: 1000,
            settle_delay_ms: 10,
        }
    }
}
