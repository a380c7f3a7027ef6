use tracing::debug;

use crate::core::ndvi::{ENDMEMBER_EPSILON, SHADOW_EPSILON, ndvi_nudged};
use crate::error::{Error, Result};
use crate::types::{Band, Endmember, Endmembers, PixelCoord};

// All scans below walk the bands in logical row-major order and only replace
// the current best on a strict improvement, so ties always resolve to the
// first coordinate in that order regardless of memory layout.

fn ensure_non_empty(red: &Band, nir: &Band) -> Result<()> {
    if red.is_empty() {
        return Err(Error::EmptyInput { band: "red" });
    }
    if nir.is_empty() {
        return Err(Error::EmptyInput { band: "nir" });
    }
    Ok(())
}

fn endmember_at(red: &Band, nir: &Band, coord: PixelCoord, epsilon: f64) -> Endmember {
    let r = red[coord.as_index()];
    let n = nir[coord.as_index()];
    Endmember {
        coord,
        red: r,
        nir: n,
        ndvi: ndvi_nudged(r, n, epsilon),
    }
}

/// First coordinate holding the maximum of `band`. NaN samples never win.
fn first_max(band: &Band) -> Option<PixelCoord> {
    let mut best: Option<(PixelCoord, f64)> = None;
    for ((row, col), &v) in band.indexed_iter() {
        if v.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((PixelCoord::new(row, col), v)),
        }
    }
    best.map(|(coord, _)| coord)
}

/// First and second coordinates holding the maximum of `band`.
fn first_two_max(band: &Band) -> Option<(PixelCoord, Option<PixelCoord>)> {
    let mut max = f64::NEG_INFINITY;
    let mut first: Option<PixelCoord> = None;
    let mut second: Option<PixelCoord> = None;
    for ((row, col), &v) in band.indexed_iter() {
        if v.is_nan() {
            continue;
        }
        if first.is_none() || v > max {
            max = v;
            first = Some(PixelCoord::new(row, col));
            second = None;
        } else if v == max && second.is_none() {
            second = Some(PixelCoord::new(row, col));
        }
    }
    first.map(|f| (f, second))
}

/// Shadow point: the lowest nonzero red+NIR sum.
///
/// Zero sums are no-data and never candidates. Returns
/// [`Error::AllZeroSum`] when no pixel has a nonzero sum.
pub fn shadow_point(red: &Band, nir: &Band) -> Result<Endmember> {
    ensure_non_empty(red, nir)?;
    debug_assert_eq!(red.dim(), nir.dim());

    let mut best: Option<(PixelCoord, f64)> = None;
    for (((row, col), &r), &n) in red.indexed_iter().zip(nir.iter()) {
        let sum = r + n;
        if sum == 0.0 || sum.is_nan() {
            continue;
        }
        match best {
            Some((_, b)) if sum >= b => {}
            _ => best = Some((PixelCoord::new(row, col), sum)),
        }
    }

    let (coord, sum) = best.ok_or(Error::AllZeroSum { pixels: red.len() })?;
    let shadow = endmember_at(red, nir, coord, SHADOW_EPSILON);
    debug!(
        "Shadow point at {} (sum={:.6}, ndvi={:.6})",
        coord, sum, shadow.ndvi
    );
    Ok(shadow)
}

/// Brightness endmembers: highest red ("A") and highest NIR ("B").
///
/// When several pixels share the NIR maximum and the first of them is the
/// red-max pixel, the second tying pixel is used instead. A single NIR
/// maximum that coincides with the red maximum is returned as-is, so both
/// endmembers can be the same pixel.
pub fn brightness_endmembers(red: &Band, nir: &Band) -> Result<(Endmember, Endmember)> {
    ensure_non_empty(red, nir)?;
    debug_assert_eq!(red.dim(), nir.dim());

    let red_coord = first_max(red)
        .ok_or_else(|| Error::Processing("red band holds only NaN samples".into()))?;
    let (nir_first, nir_second) = first_two_max(nir)
        .ok_or_else(|| Error::Processing("NIR band holds only NaN samples".into()))?;

    let nir_coord = match nir_second {
        Some(second) if nir_first == red_coord => second,
        _ => nir_first,
    };

    let red_max = endmember_at(red, nir, red_coord, ENDMEMBER_EPSILON);
    let nir_max = endmember_at(red, nir, nir_coord, ENDMEMBER_EPSILON);
    debug!(
        "Endmember A (red max) at {} ndvi={:.6}; Endmember B (NIR max) at {} ndvi={:.6}",
        red_coord, red_max.ndvi, nir_coord, nir_max.ndvi
    );
    Ok((red_max, nir_max))
}

/// Locate the shadow, red-max and nir-max reference pixels of a band pair.
pub fn locate_endmembers(red: &Band, nir: &Band) -> Result<Endmembers> {
    let shadow = shadow_point(red, nir)?;
    let (red_max, nir_max) = brightness_endmembers(red, nir)?;
    Ok(Endmembers {
        shadow,
        red_max,
        nir_max,
    })
}
