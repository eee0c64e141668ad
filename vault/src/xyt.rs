//! Reader for `.xyt` minutiae files.
//!
//! One minutia per line, `x y theta quality` separated by spaces, no header. The
//! result is sorted by quality, highest first; minutiae of equal quality keep file
//! order. An orientation of 360 degrees is read as 0.

use std::fs;
use std::path::Path;

use crate::constants::THETA_RANGE;
use crate::errors::VaultError;
use crate::minutia::Minutia;

pub fn parse_xyt(input: &str) -> Result<Vec<Minutia>, VaultError> {
    let mut minutiae = Vec::new();
    for (i, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        minutiae.push(parse_line(line, i + 1)?);
    }
    minutiae.sort_by(|a, b| b.quality.cmp(&a.quality));
    Ok(minutiae)
}

pub fn read_xyt(path: impl AsRef<Path>) -> Result<Vec<Minutia>, VaultError> {
    parse_xyt(&fs::read_to_string(path)?)
}

fn parse_line(line: &str, number: usize) -> Result<Minutia, VaultError> {
    let fields = line
        .split_whitespace()
        .map(|f| {
            f.parse::<i32>().map_err(|e| VaultError::Parse {
                line: number,
                reason: format!("{f:?}: {e}"),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let [x, y, theta, quality] = fields[..] else {
        return Err(VaultError::Parse {
            line: number,
            reason: format!("expected 4 fields, found {}", fields.len()),
        });
    };
    let theta = if theta == THETA_RANGE { 0 } else { theta };
    Minutia::sensor(x, y, theta, quality).map_err(|e| VaultError::Parse {
        line: number,
        reason: e.to_string(),
    })
}
