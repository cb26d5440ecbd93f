use argh::FromArgs;
use std::path::PathBuf;

/// Resource layer switches
#[derive(Debug, Default, FromArgs)]
pub struct ResourceArgs {
    /// log protocol violations instead of panicking
    #[argh(switch)]
    pub relaxed_protocol: bool,
    /// panic on protocol violations, even in release builds
    #[argh(switch)]
    pub strict_protocol: bool,
    /// drop cached GPU objects when their resource is deleted
    #[argh(switch)]
    pub evict_on_delete: bool,

    /// directory relative asset paths are resolved against
    #[argh(option)]
    pub asset_root: Option<PathBuf>,
}

impl ResourceArgs {
    /// Parses the switches from the process arguments, falling back to defaults on error.
    pub fn from_env() -> ResourceArgs {
        let mut args = std::env::args();
        let Some(cmd_name) = args.next() else {
            return ResourceArgs::default();
        };
        let args: Vec<String> = args.collect();
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        ResourceArgs::parse(&cmd_name, &args).unwrap_or_default()
    }

    pub fn parse(cmd_name: &str, args: &[&str]) -> Option<ResourceArgs> {
        ResourceArgs::from_args(&[cmd_name], args).ok()
    }

    /// `Some(true)` when strict, `Some(false)` when relaxed, `None` when unspecified.
    ///
    /// `--strict-protocol` wins if both switches are given.
    pub fn strict_protocol(&self) -> Option<bool> {
        match (self.strict_protocol, self.relaxed_protocol) {
            (true, _) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_switches() {
        let args = ResourceArgs::parse(
            "prism",
            &["--relaxed-protocol", "--evict-on-delete", "--asset-root", "assets"],
        )
        .unwrap();

        assert_eq!(args.strict_protocol(), Some(false));
        assert!(args.evict_on_delete);
        assert_eq!(args.asset_root, Some(PathBuf::from("assets")));
    }

    #[test]
    fn strict_wins_over_relaxed() {
        let args =
            ResourceArgs::parse("prism", &["--relaxed-protocol", "--strict-protocol"]).unwrap();
        assert_eq!(args.strict_protocol(), Some(true));
    }

    #[test]
    fn unknown_switch_is_rejected() {
        assert!(ResourceArgs::parse("prism", &["--fullscreen"]).is_none());
        assert_eq!(ResourceArgs::default().strict_protocol(), None);
    }
}
