//! hMETIS `.hgr` text format I/O.
//!
//! Line 1 is `num_hyperedges num_hypernodes [hypergraph_type]`, optionally preceded by `%`
//! comment lines. `hypergraph_type` is one of `{0, 1, 10, 11}`: bit 0 (ones digit) means
//! hyperedge weights are present, bit 1 (tens digit) means hypernode weights are present. Pin
//! ids on hyperedge lines are 1-based and are converted to 0-based on parse.

use std::io::{BufRead, Write};

use crate::error::HgrError;
use crate::hypergraph::Hypergraph;

/// Parsed contents of an hMETIS file, before being turned into a `Hypergraph`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HgrFile {
    pub num_hyperedges: usize,
    pub num_hypernodes: usize,
    pub has_hyperedge_weights: bool,
    pub has_hypernode_weights: bool,
    pub pins: Vec<Vec<u32>>,
    pub hyperedge_weights: Vec<u64>,
    pub hypernode_weights: Vec<u64>,
}

fn decode_type(hypergraph_type: u32) -> Result<(bool, bool), HgrError> {
    match hypergraph_type {
        0 => Ok((false, false)),
        1 => Ok((true, false)),
        10 => Ok((false, true)),
        11 => Ok((true, true)),
        other => Err(HgrError::UnsupportedType(other)),
    }
}

/// Parses an hMETIS `.hgr` file from any buffered reader.
pub fn parse_hgr(reader: impl BufRead) -> Result<HgrFile, HgrError> {
    let mut lines = reader
        .lines()
        .map(|line| line.map_err(HgrError::from))
        .filter(|line| match line {
            Ok(text) => !text.trim_start().starts_with('%'),
            Err(_) => true,
        });

    let header = lines.next().ok_or(HgrError::MissingHeader)??;
    let header_parts: Vec<&str> = header.split_whitespace().collect();
    if header_parts.len() < 2 {
        return Err(HgrError::MalformedHeader(header));
    }

    let num_hyperedges: usize = header_parts[0].parse()?;
    let num_hypernodes: usize = header_parts[1].parse()?;
    let hypergraph_type: u32 = match header_parts.get(2) {
        Some(raw) => raw.parse()?,
        None => 0,
    };
    let (has_hyperedge_weights, has_hypernode_weights) = decode_type(hypergraph_type)?;

    let mut pins = Vec::with_capacity(num_hyperedges);
    let mut hyperedge_weights = Vec::with_capacity(num_hyperedges);

    for _ in 0..num_hyperedges {
        let line = lines
            .next()
            .ok_or(HgrError::HyperedgeCountMismatch {
                expected: num_hyperedges,
                found: pins.len(),
            })??;
        let mut fields = line.split_whitespace();

        if has_hyperedge_weights {
            let weight: u64 = fields
                .next()
                .ok_or_else(|| HgrError::MalformedHeader(line.clone()))?
                .parse()?;
            hyperedge_weights.push(weight);
        } else {
            hyperedge_weights.push(1);
        }

        let mut edge_pins = Vec::new();
        for raw_pin in fields {
            let pin_1based: u32 = raw_pin.parse()?;
            if pin_1based == 0 || pin_1based as usize > num_hypernodes {
                return Err(HgrError::PinOutOfRange {
                    hyperedge: pins.len(),
                    pin: pin_1based,
                    num_hypernodes,
                });
            }
            edge_pins.push(pin_1based - 1);
        }
        pins.push(edge_pins);
    }

    let mut hypernode_weights = Vec::with_capacity(num_hypernodes);
    if has_hypernode_weights {
        for _ in 0..num_hypernodes {
            let line = lines.next().ok_or(HgrError::NodeWeightCountMismatch {
                expected: num_hypernodes,
                found: hypernode_weights.len(),
            })??;
            hypernode_weights.push(line.trim().parse()?);
        }
    } else {
        hypernode_weights = vec![1; num_hypernodes];
    }

    Ok(HgrFile {
        num_hyperedges,
        num_hypernodes,
        has_hyperedge_weights,
        has_hypernode_weights,
        pins,
        hyperedge_weights,
        hypernode_weights,
    })
}

/// Writes a hypergraph back out in hMETIS format (always with edge and node weights, type 11),
/// using its currently enabled pins/hyperedges.
pub fn write_hgr(mut writer: impl Write, h: &Hypergraph) -> std::io::Result<()> {
    writeln!(writer, "{} {} 11", h.current_num_hyperedges(), h.current_num_hypernodes())?;
    for e in h.hyperedges() {
        if !h.is_hyperedge_enabled(e) {
            continue;
        }
        let pins: Vec<String> = h.pins(e).iter().map(|&p| (p + 1).to_string()).collect();
        writeln!(writer, "{} {}", h.hyperedge_weight(e), pins.join(" "))?;
    }
    for v in h.hypernodes() {
        if h.is_hypernode_enabled(v) {
            writeln!(writer, "{}", h.hypernode_weight(v))?;
        }
    }
    Ok(())
}

/// Reads one `PartitionId` per line, in hypernode order.
pub fn read_communities(reader: impl BufRead) -> Result<Vec<u32>, HgrError> {
    let mut communities = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        communities.push(trimmed.parse()?);
    }
    Ok(communities)
}

impl From<HgrFile> for Hypergraph {
    fn from(file: HgrFile) -> Self {
        Hypergraph::new(
            file.num_hypernodes,
            file.pins,
            file.hyperedge_weights,
            file.hypernode_weights,
        )
    }
}

impl Hypergraph {
    /// Builds a hypergraph from a parsed hMETIS file. Every hypernode starts in community `0`
    /// until assigned with `set_communities`.
    pub fn from_hgr(file: HgrFile) -> Self {
        file.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// E5 from SPEC_FULL.md §8.
    #[test]
    fn parses_weighted_hgr() {
        let input = "3 4 11\n2 1 2\n3 2 3 4\n1 4\n5\n6\n7\n8\n";
        let file = parse_hgr(Cursor::new(input)).unwrap();

        assert_eq!(file.num_hyperedges, 3);
        assert_eq!(file.num_hypernodes, 4);
        assert_eq!(file.hyperedge_weights, vec![2, 3, 1]);
        assert_eq!(file.pins, vec![vec![0, 1], vec![1, 2, 3], vec![3]]);
        assert_eq!(file.hypernode_weights, vec![5, 6, 7, 8]);
    }

    #[test]
    fn rejects_unsupported_type() {
        let input = "1 2 5\n1 2\n";
        let err = parse_hgr(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, HgrError::UnsupportedType(5)));
    }

    #[test]
    fn rejects_out_of_range_pin() {
        let input = "1 2 0\n1 5\n";
        let err = parse_hgr(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, HgrError::PinOutOfRange { .. }));
    }

    #[test]
    fn ignores_comment_lines() {
        let input = "% a comment\n1 2 0\n1 2\n";
        let file = parse_hgr(Cursor::new(input)).unwrap();
        assert_eq!(file.pins, vec![vec![0, 1]]);
    }

    #[test]
    fn unweighted_defaults() {
        let input = "1 3 0\n1 2 3\n";
        let file = parse_hgr(Cursor::new(input)).unwrap();
        assert_eq!(file.hyperedge_weights, vec![1]);
        assert_eq!(file.hypernode_weights, vec![1, 1, 1]);
    }

    #[test]
    fn round_trip_through_hypergraph() {
        let input = "3 4 11\n2 1 2\n3 2 3 4\n1 4\n5\n6\n7\n8\n";
        let file = parse_hgr(Cursor::new(input)).unwrap();
        let h: Hypergraph = file.into();

        let mut out = Vec::new();
        write_hgr(&mut out, &h).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("3 4 11\n"));
    }
}
