/// How the runtime reacts when a pass calls hooks in a different order or
/// number than earlier passes did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HookOrderCheck {
    /// Log a warning and re-initialise the offending slot.
    #[default]
    Lenient,
    /// Fail the hook call (or the pass) with an order/count mismatch error.
    Strict,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RuntimeConfig {
    pub hook_order: HookOrderCheck,
}

impl RuntimeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict() -> Self {
        Self {
            hook_order: HookOrderCheck::Strict,
        }
    }

    pub fn hook_order(mut self, check: HookOrderCheck) -> Self {
        self.hook_order = check;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.hook_order == HookOrderCheck::Strict
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_round_trip() {
        let config = RuntimeConfig::strict();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"hook_order":"Strict"}"#);
        let back: RuntimeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: RuntimeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.hook_order, HookOrderCheck::Lenient);
        assert!(!config.is_strict());
    }
}
