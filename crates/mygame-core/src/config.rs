/// Configuration for the diagnostic sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// `EnvFilter` directives used on desktop hosts. `RUST_LOG` wins when set.
    pub filter: String,
    /// Tag attached to every line on hosts that support tags (logcat).
    pub tag: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            filter: "info,winit=warn".to_string(),
            tag: crate::logging::APP_TAG.to_string(),
        }
    }
}

impl LogConfig {
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }
}

/// Profiling options for the activity host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilingConfig {
    /// Profiling is disabled unless explicitly requested
    pub enabled: bool,
    /// Address the puffin server binds to, viewable with `puffin_viewer`
    pub address: String,
}

impl Default for ProfilingConfig {
    fn default() -> Self {
        ProfilingConfig {
            enabled: false,
            address: "0.0.0.0:8585".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_config_defaults_to_app_tag() {
        let config = LogConfig::default();
        assert_eq!(config.tag, "MyGame");
        assert!(config.filter.starts_with("info"));
    }

    #[test]
    fn log_config_setters() {
        let config = LogConfig::default().with_filter("trace").with_tag("Other");
        assert_eq!(config.filter, "trace");
        assert_eq!(config.tag, "Other");
    }

    #[test]
    fn profiling_is_off_by_default() {
        assert!(!ProfilingConfig::default().enabled);
    }
}
