//! Page bookkeeping shared by the list screens

use std::sync::{Mutex, MutexGuard};

/// A page request owned by one load
///
/// Claims from before the last [`Pager::reset`] are stale and are ignored by
/// [`Pager::finish`] and [`Pager::fail`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageClaim {
    pub(crate) page: u32,
    epoch: u64,
}

/// Tracks the last loaded page of a paginated list
///
/// A load is claimed with [`Pager::begin_next`] and released with
/// [`Pager::finish`] or [`Pager::fail`]. An empty page marks the end of the
/// list; no further pages are requested until [`Pager::reset`].
#[derive(Debug, Default)]
pub(crate) struct Pager {
    page: u32,
    loading: bool,
    last: bool,
    epoch: u64,
}

impl Pager {
    /// Start over from the first page, which the caller now owns
    pub(crate) fn reset(&mut self) -> PageClaim {
        let epoch = self.epoch.wrapping_add(1);
        *self = Self {
            epoch,
            ..Self::default()
        };
        PageClaim { page: 0, epoch }
    }

    /// Claim the next page, `None` while a load is in flight or after the last page
    pub(crate) fn begin_next(&mut self) -> Option<PageClaim> {
        if self.loading || self.last {
            return None;
        }
        self.loading = true;
        Some(PageClaim {
            page: self.page + 1,
            epoch: self.epoch,
        })
    }

    /// Record a loaded page; `false` if the claim was superseded by a reset
    pub(crate) fn finish(&mut self, claim: PageClaim, received: usize) -> bool {
        if !self.is_current(claim) {
            return false;
        }
        self.loading = false;
        if received == 0 {
            self.last = true;
        } else {
            self.page = claim.page;
        }
        true
    }

    /// Release a failed claim; `false` if it was superseded by a reset
    pub(crate) fn fail(&mut self, claim: PageClaim) -> bool {
        if !self.is_current(claim) {
            return false;
        }
        self.loading = false;
        true
    }

    pub(crate) fn is_current(&self, claim: PageClaim) -> bool {
        claim.epoch == self.epoch
    }

    pub(crate) fn is_last(&self) -> bool {
        self.last
    }
}

pub(crate) fn lock(pager: &Mutex<Pager>) -> MutexGuard<'_, Pager> {
    pager.lock().unwrap_or_else(|e| e.into_inner())
}
