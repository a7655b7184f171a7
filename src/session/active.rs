use crate::band::Band;

/// Blocks of the block maximum grid already covered by an extracted segment.
///
/// Disabled in fast mode, where every block reads as inactive and marking is a no-op.
#[derive(Debug, Clone, Default)]
pub struct ActiveMask {
    mask: Band<bool>,
    enabled: bool,
}

impl ActiveMask {
    pub fn new(diags: usize, blocks: usize, enabled: bool) -> Self {
        let mut active = Self::default();
        active.init(diags, blocks, enabled);
        active
    }

    /// Clears the mask and reshapes it to `diags` by `blocks`
    pub fn init(&mut self, diags: usize, blocks: usize, enabled: bool) {
        let (diags, blocks) = if enabled { (diags, blocks) } else { (0, 0) };
        self.mask.init(diags, blocks);
        self.enabled = enabled;
    }

    #[inline(always)]
    pub fn is_active(&self, o: i32, block: i32) -> bool {
        self.enabled && self.mask.get(o as usize, block as usize)
    }

    /// Marks blocks `[begin, end)` of diagonal offset `o`
    pub fn set_active(&mut self, o: i32, begin: i32, end: i32) {
        if self.enabled {
            self.mask.fill(o as usize, begin as usize, end as usize, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_active() {
        let mut active = ActiveMask::new(16, 4, true);
        active.set_active(3, 1, 3);
        assert!(!active.is_active(3, 0));
        assert!(active.is_active(3, 1));
        assert!(active.is_active(3, 2));
        assert!(!active.is_active(3, 3));
        assert!(!active.is_active(4, 1));
    }

    #[test]
    fn test_init_clears() {
        let mut active = ActiveMask::new(16, 4, true);
        active.set_active(3, 0, 4);
        active.init(32, 2, true);
        assert!(!active.is_active(3, 0));
        assert!(!active.is_active(3, 1));
        active.set_active(31, 1, 2);
        assert!(active.is_active(31, 1));
    }

    #[test]
    fn test_disabled() {
        let mut active = ActiveMask::new(16, 4, false);
        active.set_active(3, 0, 4);
        assert!(!active.is_active(3, 1));
    }
}
