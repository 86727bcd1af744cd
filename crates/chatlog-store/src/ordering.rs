//! In-place partition-exchange sort.
//!
//! The pivot is always the last element of the sub-range, so already sorted
//! and reverse-sorted input degrade to O(n²) comparisons.  Messages are
//! usually appended in timestamp order, which is exactly that case; callers
//! sorting very large ledgers should expect quadratic time.  Stack depth
//! stays O(log n) because only the shorter side is recursed into.

use tracing::debug;

use crate::models::Message;
use crate::room::ChatRoom;

/// Sort `items` ascending by `key`.  Not stable: items with equal keys may
/// change relative order.
pub fn quick_sort_by_key<T, K, F>(items: &mut [T], key: F)
where
    K: Ord,
    F: Fn(&T) -> K,
{
    if items.len() < 2 {
        return;
    }
    let high = items.len() - 1;
    sort_range(items, 0, high, &key);
}

/// Sort the inclusive range `low..=high`.
fn sort_range<T, K, F>(items: &mut [T], mut low: usize, mut high: usize, key: &F)
where
    K: Ord,
    F: Fn(&T) -> K,
{
    while low < high {
        let pivot = partition(items, low, high, key);
        if pivot - low < high - pivot {
            if pivot > low {
                sort_range(items, low, pivot - 1, key);
            }
            low = pivot + 1;
        } else {
            // pivot > low: otherwise both sides would be empty and low == high.
            if pivot < high {
                sort_range(items, pivot + 1, high, key);
            }
            high = pivot - 1;
        }
    }
}

/// Move every item keyed strictly below the pivot (`items[high]`) to the
/// front of the range, then place the pivot right after them.  Returns the
/// pivot's final index.
fn partition<T, K, F>(items: &mut [T], low: usize, high: usize, key: &F) -> usize
where
    K: Ord,
    F: Fn(&T) -> K,
{
    let pivot = key(&items[high]);
    let mut boundary = low;
    for j in low..high {
        if key(&items[j]) < pivot {
            items.swap(boundary, j);
            boundary += 1;
        }
    }
    items.swap(boundary, high);
    boundary
}

impl ChatRoom {
    /// Sort messages by ascending timestamp, in place.
    ///
    /// The undo stack is rebuilt afterwards, so the next undo removes
    /// whichever message is now last.
    pub fn sort_by_timestamp(&mut self) {
        if self.is_empty() {
            return;
        }
        quick_sort_by_key(self.messages_mut(), Message::created_at);
        self.reseed_undo();
        debug!(count = self.count(), "sorted messages by timestamp");
    }
}
