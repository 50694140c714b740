//! Indicator trait definitions.

/// Streaming indicator that maintains internal state.
///
/// Indicators are updated once per bar. Until the indicator has seen
/// enough input, `update` returns `None` and the instrument is inactive.
pub trait StreamingIndicator: Send {
    /// The input consumed per bar.
    type Input: Copy;
    /// The output type of the indicator.
    type Output: Copy;

    /// Update the indicator with a new input.
    ///
    /// # Returns
    /// The current indicator value, or None if not yet ready or undefined
    fn update(&mut self, input: Self::Input) -> Option<Self::Output>;

    /// Get the current value without adding new data.
    fn current(&self) -> Option<Self::Output>;

    /// Reset the indicator state.
    fn reset(&mut self);

    /// Check if the indicator has enough data to produce values.
    fn is_ready(&self) -> bool;

    /// Get the number of inputs required before the first value.
    fn period(&self) -> usize;

    /// Get the name of the indicator.
    fn name(&self) -> &str;
}
