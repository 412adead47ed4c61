//! Waypoint checker: compares two coordinate files row by row.
//!
//! Both inputs are header-less CSV with three columns (`x,y,z`).  The output
//! has one Euclidean distance per row, five decimals, no header.

use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::info;

use crate::{OutputError, OutputResult};

fn read_points<R: Read>(reader: R) -> OutputResult<Vec<[f64; 3]>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .trim(Trim::All)
        .from_reader(reader);
    let mut points = Vec::new();
    for record in rdr.deserialize::<(f64, f64, f64)>() {
        let (x, y, z) = record?;
        points.push([x, y, z]);
    }
    Ok(points)
}

/// Row-wise distances between two coordinate streams.
///
/// # Errors
///
/// [`OutputError::ShapeMismatch`] if the streams have different lengths.
pub fn waypoint_distances<A: Read, B: Read>(expected: A, actual: B) -> OutputResult<Vec<f64>> {
    let left = read_points(expected)?;
    let right = read_points(actual)?;
    if left.len() != right.len() {
        return Err(OutputError::ShapeMismatch { left: left.len(), right: right.len() });
    }
    Ok(left
        .iter()
        .zip(&right)
        .map(|(a, b)| {
            let (dx, dy, dz) = (a[0] - b[0], a[1] - b[1], a[2] - b[2]);
            (dx * dx + dy * dy + dz * dz).sqrt()
        })
        .collect())
}

/// Compare the files at `expected` and `actual` and write the distances to
/// `out`.  Returns the distances.
pub fn check_waypoints(expected: &Path, actual: &Path, out: &Path) -> OutputResult<Vec<f64>> {
    let distances = waypoint_distances(
        std::fs::File::open(expected)?,
        std::fs::File::open(actual)?,
    )?;

    let mut w = std::io::BufWriter::new(std::fs::File::create(out)?);
    for d in &distances {
        writeln!(w, "{d:.5}")?;
    }
    w.flush()?;

    info!(rows = distances.len(), out = %out.display(), "waypoint distances written");
    Ok(distances)
}
