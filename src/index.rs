use ndarray::ArrayView1;
use serde::{Serialize, Deserialize};




/**
 * Direction in which a monotonic sequence runs
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Ascending,
    Descending,
}




// ============================================================================
impl SortOrder {

    /**
     * Determine the order from the first two elements: ascending if `a < b`,
     * and descending otherwise.
     */
    pub fn of_pair(a: f64, b: f64) -> Self {
        if a < b {
            SortOrder::Ascending
        } else {
            SortOrder::Descending
        }
    }

    /**
     * Return the order of the sequence if it is strictly monotonic, or `None`
     * if it is not (or has fewer than two elements, or contains a NaN).
     */
    pub fn of_strict(array: ArrayView1<f64>) -> Option<Self> {
        if array.len() < 2 {
            return None
        }
        let order = Self::of_pair(array[0], array[1]);

        for i in 1..array.len() {
            if !order.precedes(array[i - 1], array[i]) {
                return None
            }
        }
        Some(order)
    }

    /// Whether `a` comes strictly before `b` under this order.
    pub fn precedes(self, a: f64, b: f64) -> bool {
        match self {
            SortOrder::Ascending  => a < b,
            SortOrder::Descending => a > b,
        }
    }

    fn precedes_or_equals(self, a: f64, b: f64) -> bool {
        match self {
            SortOrder::Ascending  => a <= b,
            SortOrder::Descending => a >= b,
        }
    }
}




/**
 * Return the index `i` of the bracket containing `x` in a monotonic array, so
 * that `x` lies between `array[i]` (inclusive) and `array[i + 1]`
 * (exclusive). The sort order is taken from the first two elements. `None`
 * is returned for arrays with fewer than two elements, and when `x` is before
 * the first element, or at or beyond the last one.
 */
pub fn find_bracket_index(array: ArrayView1<f64>, x: f64) -> Option<usize> {
    let size = array.len();

    if size < 2 {
        return None
    }
    let order = SortOrder::of_pair(array[0], array[1]);

    let mut left = 0;
    let mut right = size - 1;

    while left <= right {
        let mid = left + (right - left) / 2;

        if order.precedes_or_equals(array[mid], x) && (mid == size - 1 || order.precedes(x, array[mid + 1])) {
            // the last sample starts no bracket
            return if mid == size - 1 { None } else { Some(mid) }
        }
        if order.precedes(array[mid], x) {
            left = mid + 1;
        } else if mid == 0 {
            return None
        } else {
            right = mid - 1;
        }
    }
    None
}
