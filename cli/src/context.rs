use fusebox_core::{FuseContainer, FuseError, FuseId, FuseboxConfig, SystemClock};

/// State for the interactive shell: one container of message fuses.
pub struct ShellContext {
    pub config: FuseboxConfig,
    pub fuses: FuseContainer<String>,
}

impl ShellContext {
    pub fn new(config: FuseboxConfig) -> Result<Self, FuseError> {
        let fuses = FuseContainer::with_config(config.container, SystemClock)?;
        Ok(Self { config, fuses })
    }

    /// Resolve a position shown by `list` to the fuse currently there
    pub fn id_at(&self, index: usize) -> Result<FuseId, FuseError> {
        self.fuses
            .get_at(index)
            .map(|fuse| fuse.id())
            .ok_or(FuseError::OutOfRange {
                index,
                len: self.fuses.len(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_at_follows_positions() {
        let mut ctx = ShellContext::new(FuseboxConfig::default()).unwrap();
        let first = ctx.fuses.add_secs("a".to_string(), 60, |_| {}).unwrap();
        let second = ctx.fuses.add_secs("b".to_string(), 60, |_| {}).unwrap();

        assert_eq!(ctx.id_at(1).unwrap(), second);
        ctx.fuses.remove(first).unwrap();
        assert_eq!(ctx.id_at(0).unwrap(), second);
        assert!(matches!(
            ctx.id_at(1),
            Err(FuseError::OutOfRange { index: 1, len: 1 })
        ));
    }
}
