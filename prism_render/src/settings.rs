use bon::Builder;
use prism_utils::{LogSink, ResourceArgs};

/// What a cache does when the resource protocol is broken.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ProtocolPolicy {
    /// Panic. The default in debug builds.
    Strict,
    /// Log at error level, record the violation and carry on. The default in release builds.
    Relaxed,
}

impl Default for ProtocolPolicy {
    fn default() -> Self {
        if cfg!(debug_assertions) {
            ProtocolPolicy::Strict
        } else {
            ProtocolPolicy::Relaxed
        }
    }
}

/// What happens to a cached GPU object when its resource is deleted from the store.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum DeletePolicy {
    /// Keep the GPU object. Lookups keep working until the cache is dropped.
    #[default]
    Retain,
    /// Drop the cache entry.
    Evict,
}

#[derive(Debug, Clone, Default, Builder)]
pub struct CacheSettings {
    #[builder(default)]
    pub protocol: ProtocolPolicy,
    #[builder(default)]
    pub delete_policy: DeletePolicy,
    #[builder(default)]
    pub log_sink: LogSink,
}

impl CacheSettings {
    pub fn from_args(args: &ResourceArgs) -> Self {
        let protocol = match args.strict_protocol() {
            Some(true) => ProtocolPolicy::Strict,
            Some(false) => ProtocolPolicy::Relaxed,
            None => ProtocolPolicy::default(),
        };
        let delete_policy = if args.evict_on_delete {
            DeletePolicy::Evict
        } else {
            DeletePolicy::Retain
        };

        CacheSettings::builder()
            .protocol(protocol)
            .delete_policy(delete_policy)
            .build()
    }

    pub fn relaxed() -> Self {
        CacheSettings::builder()
            .protocol(ProtocolPolicy::Relaxed)
            .build()
    }

    pub fn strict() -> Self {
        CacheSettings::builder()
            .protocol(ProtocolPolicy::Strict)
            .build()
    }
}
