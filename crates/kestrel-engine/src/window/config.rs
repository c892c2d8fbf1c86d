/// Window/runtime configuration, applied atomically at loop construction.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Initial drawable width in logical pixels.
    pub width: u32,
    /// Initial drawable height in logical pixels.
    pub height: u32,
    pub title: String,
    pub resizable: bool,
    /// Opens the window maximized.
    pub fullscreen: bool,
    /// Caps presentation to the display refresh rate.
    pub vsync: bool,
    /// Centers the window on its monitor when it opens.
    pub center_on_start: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "kestrel".to_string(),
            resizable: false,
            fullscreen: false,
            vsync: false,
            center_on_start: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_stock_window() {
        let config = RuntimeConfig::default();
        assert_eq!(config.width, 800);
        assert_eq!(config.height, 600);
        assert_eq!(config.title, "kestrel");
        assert!(!config.resizable);
        assert!(!config.fullscreen);
        assert!(!config.vsync);
        assert!(!config.center_on_start);
    }
}
