//! The shared "copied" row indicator.
//!
//! One flag for the whole list, not one timer per row: a successful copy
//! flashes exactly one row, and a newer copy supersedes the older flash
//! instead of coexisting with it. Expiry is guarded by a monotonic token so
//! a timer armed for a superseded copy can neither clear the newer flash
//! nor resurrect its own.

use std::time::Duration;

use crate::song::SongId;

/// How long a row stays in the copied state after a successful clipboard
/// write.
pub const FLASH_DURATION: Duration = Duration::from_millis(300);

/// `{active row, generation token}` — the arena-and-generation pattern in
/// miniature.
#[derive(Debug, Default)]
pub struct CopyFlash {
    active: Option<SongId>,
    token: u64,
}

impl CopyFlash {
    /// Mark `id` as the (single) flashing row and return the token the
    /// matching expiry timer must present.
    pub fn begin(&mut self, id: SongId) -> u64 {
        self.token += 1;
        self.active = Some(id);
        self.token
    }

    /// Clear the flash, but only if `(id, token)` still names the current
    /// generation. Stale expirations are no-ops.
    pub fn expire(&mut self, id: SongId, token: u64) {
        if self.token == token && self.active == Some(id) {
            self.active = None;
        }
    }

    pub fn active(&self) -> Option<SongId> {
        self.active
    }

    pub fn is_flashing(&self, id: SongId) -> bool {
        self.active == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_then_expire_clears() {
        let mut flash = CopyFlash::default();
        let token = flash.begin(SongId(3));
        assert!(flash.is_flashing(SongId(3)));
        flash.expire(SongId(3), token);
        assert_eq!(flash.active(), None);
    }

    #[test]
    fn only_one_row_flashes_at_a_time() {
        let mut flash = CopyFlash::default();
        flash.begin(SongId(1));
        flash.begin(SongId(2));
        assert!(!flash.is_flashing(SongId(1)));
        assert!(flash.is_flashing(SongId(2)));
    }

    #[test]
    fn stale_token_cannot_clear_newer_flash() {
        let mut flash = CopyFlash::default();
        let old = flash.begin(SongId(1));
        flash.begin(SongId(2));
        flash.expire(SongId(1), old);
        assert!(flash.is_flashing(SongId(2)));
    }

    #[test]
    fn stale_token_cannot_resurrect_cleared_flash() {
        let mut flash = CopyFlash::default();
        let first = flash.begin(SongId(1));
        let second = flash.begin(SongId(1));
        flash.expire(SongId(1), second);
        flash.expire(SongId(1), first);
        assert_eq!(flash.active(), None);
    }

    #[test]
    fn recopy_same_row_resets_generation() {
        let mut flash = CopyFlash::default();
        let first = flash.begin(SongId(5));
        let second = flash.begin(SongId(5));
        // The first timer fires after the second copy: flag must survive.
        flash.expire(SongId(5), first);
        assert!(flash.is_flashing(SongId(5)));
        flash.expire(SongId(5), second);
        assert!(!flash.is_flashing(SongId(5)));
    }
}
