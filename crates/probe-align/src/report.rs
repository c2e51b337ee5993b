// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Text scan reports.
//!
//! ```text
//! --- scanner 0 ---
//! 404,-588,-901
//! 528,-643,409
//!
//! --- scanner 1 ---
//! 686,422,578
//! ```
//!
//! Blocks are separated by blank lines. Surrounding whitespace and CRLF line
//! endings are tolerated. Scanners are returned in file order.

use std::collections::BTreeSet;

use probe_geom::Point3;
use thiserror::Error;

use crate::scanner::{Scanner, ScannerId};

const HEADER_PREFIX: &str = "--- scanner ";
const HEADER_SUFFIX: &str = " ---";

/// Scan report parse failure. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanParseError {
    /// A line starting with `---` is not a valid scanner header.
    #[error("line {line}: invalid scanner header {text:?}")]
    InvalidHeader {
        /// Offending line.
        line: usize,
        /// Line content.
        text: String,
    },
    /// A point line is not three comma-separated integers.
    #[error("line {line}: invalid coordinate {text:?}")]
    InvalidPoint {
        /// Offending line.
        line: usize,
        /// Line content.
        text: String,
    },
    /// A coordinate lies outside `±Point3::COORDINATE_LIMIT`.
    #[error("line {line}: coordinate out of range {text:?}")]
    CoordinateOutOfRange {
        /// Offending line.
        line: usize,
        /// Line content.
        text: String,
    },
    /// A point appeared before any header.
    #[error("line {line}: point outside any scanner block")]
    PointWithoutScanner {
        /// Offending line.
        line: usize,
    },
    /// Two blocks used the same id.
    #[error("line {line}: duplicate scanner id {id}")]
    DuplicateScanner {
        /// Offending line.
        line: usize,
        /// Repeated id.
        id: ScannerId,
    },
    /// The report contained no scanner blocks.
    #[error("report contains no scanners")]
    Empty,
}

/// Parses a scan report into scanners, in file order.
pub fn parse_scan_report(input: &str) -> Result<Vec<Scanner>, ScanParseError> {
    let mut out: Vec<Scanner> = Vec::new();
    let mut seen: BTreeSet<ScannerId> = BTreeSet::new();
    let mut current: Option<(ScannerId, Vec<Point3>)> = None;

    for (idx, raw) in input.lines().enumerate() {
        let line = idx + 1;
        let text = raw.trim();
        if text.is_empty() {
            if let Some((id, points)) = current.take() {
                out.push(Scanner::new(id, points));
            }
            continue;
        }
        if text.starts_with("---") {
            let id = parse_header(text).ok_or_else(|| ScanParseError::InvalidHeader {
                line,
                text: text.to_owned(),
            })?;
            if !seen.insert(id) {
                return Err(ScanParseError::DuplicateScanner { line, id });
            }
            if let Some((prev, points)) = current.replace((id, Vec::new())) {
                out.push(Scanner::new(prev, points));
            }
            continue;
        }
        let point = parse_point(text).ok_or_else(|| ScanParseError::InvalidPoint {
            line,
            text: text.to_owned(),
        })?;
        if !point.is_within_limit() {
            return Err(ScanParseError::CoordinateOutOfRange {
                line,
                text: text.to_owned(),
            });
        }
        match current.as_mut() {
            Some((_, points)) => points.push(point),
            None => return Err(ScanParseError::PointWithoutScanner { line }),
        }
    }
    if let Some((id, points)) = current {
        out.push(Scanner::new(id, points));
    }
    if out.is_empty() {
        return Err(ScanParseError::Empty);
    }
    Ok(out)
}

fn parse_header(text: &str) -> Option<ScannerId> {
    text.strip_prefix(HEADER_PREFIX)?
        .strip_suffix(HEADER_SUFFIX)?
        .trim()
        .parse()
        .ok()
}

fn parse_point(text: &str) -> Option<Point3> {
    let mut parts = text.split(',').map(|s| s.trim().parse::<i64>());
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(Ok(x)), Some(Ok(y)), Some(Ok(z)), None) => Some(Point3::new(x, y, z)),
        _ => None,
    }
}

/// Renders scanners back into the report format.
pub fn write_scan_report(scanners: &[Scanner]) -> String {
    let mut out = String::new();
    for (i, s) in scanners.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&format!("{HEADER_PREFIX}{}{HEADER_SUFFIX}\n", s.id()));
        for p in s.points() {
            out.push_str(&format!("{p}\n"));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn parses_blocks_in_file_order() {
        let input = "--- scanner 3 ---\r\n1,2,3\r\n-4,5,-6\r\n\r\n--- scanner 0 ---\n 7 , 8 , 9 \n";
        let scanners = parse_scan_report(input).expect("parse");
        assert_eq!(scanners.len(), 2);
        assert_eq!(scanners[0].id(), 3);
        assert_eq!(
            scanners[0].points(),
            &[Point3::new(1, 2, 3), Point3::new(-4, 5, -6)]
        );
        assert_eq!(scanners[1].id(), 0);
        assert_eq!(scanners[1].points(), &[Point3::new(7, 8, 9)]);
    }

    #[test]
    fn header_without_blank_line_starts_new_block() {
        let input = "--- scanner 0 ---\n1,1,1\n--- scanner 1 ---\n2,2,2\n";
        let scanners = parse_scan_report(input).expect("parse");
        assert_eq!(scanners.len(), 2);
        assert_eq!(scanners[1].points(), &[Point3::new(2, 2, 2)]);
    }

    #[test]
    fn reports_line_numbers() {
        assert_eq!(
            parse_scan_report("--- scanner 0 ---\n1,2\n"),
            Err(ScanParseError::InvalidPoint {
                line: 2,
                text: "1,2".into()
            })
        );
        assert_eq!(
            parse_scan_report("--- scanner x ---\n"),
            Err(ScanParseError::InvalidHeader {
                line: 1,
                text: "--- scanner x ---".into()
            })
        );
        assert_eq!(
            parse_scan_report("1,2,3\n"),
            Err(ScanParseError::PointWithoutScanner { line: 1 })
        );
        assert_eq!(
            parse_scan_report("--- scanner 1 ---\n\n--- scanner 1 ---\n"),
            Err(ScanParseError::DuplicateScanner { line: 3, id: 1 })
        );
        assert_eq!(parse_scan_report("\n\n"), Err(ScanParseError::Empty));
        assert!(parse_scan_report("--- scanner 0 ---\n1,2,3,4\n").is_err());
    }

    #[test]
    fn coordinates_beyond_the_limit_are_rejected() {
        let lim = Point3::COORDINATE_LIMIT;
        let edge = format!("--- scanner 0 ---\n{lim},-{lim},0\n");
        assert!(parse_scan_report(&edge).is_ok());

        let input = "--- scanner 0 ---\n1,2,3\n4000000000,0,0\n-4000000000,0,0\n";
        assert_eq!(
            parse_scan_report(input),
            Err(ScanParseError::CoordinateOutOfRange {
                line: 3,
                text: "4000000000,0,0".into()
            })
        );
    }

    #[test]
    fn written_report_parses_back() {
        let scanners = vec![
            Scanner::new(0, vec![Point3::new(1, -2, 3)]),
            Scanner::new(5, vec![Point3::new(0, 0, 0), Point3::new(-9, 9, -9)]),
        ];
        let text = write_scan_report(&scanners);
        assert!(text.starts_with("--- scanner 0 ---\n1,-2,3\n\n--- scanner 5 ---\n"));
        assert_eq!(parse_scan_report(&text), Ok(scanners));
    }
}
