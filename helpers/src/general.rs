use std::error::Error;
use std::fmt;
use std::ops::Range;

/// InputValueError is used if some option or parameter does not fulfill the posed requirements,
/// e.g., a view window without any rows.
#[derive(Debug, Clone)]
pub struct InputValueError;

impl fmt::Display for InputValueError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Invalid input value")
    }
}

impl Error for InputValueError {}

#[derive(Debug, Clone, Copy)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// argsort returns the indices that would sort an array. The sort is stable, i.e. equal values
/// keep the order in which they appear in x. NaN values are ordered by their total order.
pub fn argsort(x: &[f64], order: SortOrder) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..x.len()).collect();
    match order {
        SortOrder::Ascending => indices.sort_by(|&a, &b| x[a].total_cmp(&x[b])),
        SortOrder::Descending => indices.sort_by(|&a, &b| x[b].total_cmp(&x[a])),
    }
    indices
}

/// lap_frac returns the fractional part of a progress value that counts laps, i.e. the position
/// within the current lap in [0.0, 1.0[.
pub fn lap_frac(progress: f64) -> f64 {
    let frac = progress.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if frac >= 1.0 {
        0.0
    } else {
        frac
    }
}

/// window_bounds returns the index range of a window with (at most) size elements out of len
/// elements that keeps center as close to the middle as possible without running over either
/// end of the list.
pub fn window_bounds(len: usize, center: usize, size: usize) -> Result<Range<usize>, InputValueError> {
    if size == 0 {
        return Err(InputValueError);
    }

    if len <= size {
        return Ok(0..len);
    }

    let start = center.saturating_sub(size / 2).min(len - size);
    Ok(start..start + size)
}
