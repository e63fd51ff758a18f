use crate::config::error::ConfigError;
use crate::config::ConfigMap;

/// Versioned pair of configuration snapshots.
///
/// `startup` captures the configuration "as launched"; `edited` is the working
/// copy later user edits go through. Both are deep copies: mutating the live
/// config never changes a snapshot, and the two snapshots never alias each
/// other.
#[derive(Debug, Clone)]
pub struct ConfigSnapshots {
    version: u64,
    startup: ConfigMap,
    edited: ConfigMap,
}

impl ConfigSnapshots {
    /// Take the construction-time snapshots of the live configuration.
    pub fn capture(live: &ConfigMap) -> Self {
        Self {
            version: 1,
            startup: live.clone(),
            edited: live.clone(),
        }
    }

    /// Re-copy the named sections from the live configuration into both
    /// snapshots and bump the snapshot version.
    ///
    /// Used after startup completes, when sections populated during the
    /// pipeline (tentacle and evaluator configuration) are absent or stale in
    /// the construction-time copies. A named section missing from the live
    /// config is an error.
    pub fn resnapshot(&mut self, live: &ConfigMap, sections: &[&str]) -> Result<(), ConfigError> {
        for section in sections {
            let value = live
                .section(section)
                .cloned()
                .ok_or_else(|| ConfigError::SectionMissing {
                    section: section.to_string(),
                })?;
            self.startup.set(section, value.clone())?;
            self.edited.set(section, value)?;
        }
        self.version += 1;
        log::debug!(
            "Config snapshots refreshed (version {}, sections {:?})",
            self.version,
            sections
        );
        Ok(())
    }

    /// Snapshot version, bumped on every resnapshot
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The "as launched" configuration copy
    pub fn startup(&self) -> &ConfigMap {
        &self.startup
    }

    /// The working copy intended for later user edits
    pub fn edited(&self) -> &ConfigMap {
        &self.edited
    }

    /// Mutable access to the working copy
    pub fn edited_mut(&mut self) -> &mut ConfigMap {
        &mut self.edited
    }
}
