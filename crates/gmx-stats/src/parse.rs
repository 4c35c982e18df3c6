//! Splits a raw counter report into its delimited statistics blocks.
//!
//! A report is plain text: every `dump_statistics` call appends one block of
//! `key value ...` lines bracketed by literal begin/end markers. The parser
//! is a lazy iterator over those blocks and borrows from the report text, so
//! a multi-gigabyte report is never duplicated in memory.

/// Line prefix opening a statistics block.
pub const BEGIN_MARKER: &str = "---------- Begin Simulation Statistics";
/// Line prefix closing a statistics block.
pub const END_MARKER: &str = "---------- End Simulation Statistics";

/// One delimited dump of counter values, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsBlock<'a> {
    /// `(key, value)` pairs in the order they appear inside the block.
    pub entries: Vec<(&'a str, &'a str)>,
}

/// Lazy iterator over the complete blocks of one report.
///
/// Only blocks closed by an end marker are yielded. A begin marker seen
/// while a block is open restarts it, dropping the partial contents, and a
/// block still open at end of input is discarded. Both cover a simulation
/// that died mid-dump.
#[derive(Debug)]
pub struct BlockIter<'a> {
    lines: std::str::Lines<'a>,
}

/// Iterates over the statistics blocks of `report`.
pub fn blocks(report: &str) -> BlockIter<'_> {
    BlockIter {
        lines: report.lines(),
    }
}

impl<'a> Iterator for BlockIter<'a> {
    type Item = StatsBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut open: Option<Vec<(&'a str, &'a str)>> = None;
        for line in self.lines.by_ref() {
            let trimmed = line.trim_start();
            if trimmed.starts_with(BEGIN_MARKER) {
                open = Some(Vec::new());
                continue;
            }
            if trimmed.starts_with(END_MARKER) {
                if let Some(entries) = open.take() {
                    return Some(StatsBlock { entries });
                }
                // End without a begin: stale marker, nothing to emit.
                continue;
            }
            if let Some(entries) = open.as_mut() {
                let mut tokens = line.split_whitespace();
                if let (Some(key), Some(value)) = (tokens.next(), tokens.next()) {
                    // Trailing tokens are per-counter annotations; only the
                    // first value column matters.
                    entries.push((key, value));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_two_complete_blocks() {
        let report = "\
---------- Begin Simulation Statistics ----------
sim.cycles 10
sim.insts 20
---------- End Simulation Statistics   ----------
---------- Begin Simulation Statistics ----------
sim.cycles 30
---------- End Simulation Statistics   ----------
";
        let parsed: Vec<_> = blocks(report).collect();
        assert_eq!(parsed.len(), 2);
        assert_eq!(
            parsed[0].entries,
            vec![("sim.cycles", "10"), ("sim.insts", "20")]
        );
        assert_eq!(parsed[1].entries, vec![("sim.cycles", "30")]);
    }

    #[test]
    fn unterminated_block_is_discarded() {
        let report = "\
---------- Begin Simulation Statistics ----------
sim.cycles 10
";
        assert_eq!(blocks(report).count(), 0);
    }

    #[test]
    fn reopened_block_drops_the_partial_one() {
        let report = "\
---------- Begin Simulation Statistics ----------
stale.key 1
---------- Begin Simulation Statistics ----------
fresh.key 2
---------- End Simulation Statistics   ----------
";
        let parsed: Vec<_> = blocks(report).collect();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].entries, vec![("fresh.key", "2")]);
    }

    #[test]
    fn stray_end_marker_is_ignored() {
        let report = "\
---------- End Simulation Statistics   ----------
---------- Begin Simulation Statistics ----------
k 1
---------- End Simulation Statistics   ----------
";
        assert_eq!(blocks(report).count(), 1);
    }

    #[test]
    fn short_lines_skip_and_extra_tokens_drop() {
        let report = "\
---------- Begin Simulation Statistics ----------
lonely
sim.ipc 1.5 # instructions per cycle
---------- End Simulation Statistics   ----------
";
        let parsed: Vec<_> = blocks(report).collect();
        assert_eq!(parsed[0].entries, vec![("sim.ipc", "1.5")]);
    }

    #[test]
    fn lines_outside_any_block_are_noise() {
        let report = "\
warning: simulated time rollover
---------- Begin Simulation Statistics ----------
k 1
---------- End Simulation Statistics   ----------
info: exiting
";
        let parsed: Vec<_> = blocks(report).collect();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].entries, vec![("k", "1")]);
    }
}
