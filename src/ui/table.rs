//! Topic/channel table rendering.
//!
//! Each call redraws the whole screen for one node: clear, a bold header
//! naming the node, the column headings, then one row per topic followed
//! by one row per channel of that topic. Rendering holds no state, so the
//! same snapshot always produces the same bytes.

use std::fmt::Display;
use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Attribute, Print, SetAttribute},
    terminal::{Clear, ClearType},
};

use nsqtop_types::{QueueCounts, StatsSnapshot};

use crate::data::comma;

/// Marker shown in the column that does not apply to a row.
pub const PLACEHOLDER: &str = "∙";

/// Column headings in display order.
pub const COLUMNS: [&str; 6] = ["topic", "channel", "depth", "in-flight", "deferred", "timeouts"];

/// Width of the topic and channel name columns.
const NAME_WIDTH: usize = 30;

/// Width of each numeric column.
const COUNT_WIDTH: usize = 15;

/// Blank lines between the top of the screen and the node header.
const TOP_MARGIN: &str = "\n\n\n";

/// One data row of the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow<'a> {
    pub topic: &'a str,
    pub channel: &'a str,
    pub counts: QueueCounts,
}

impl TableRow<'_> {
    fn cells(&self) -> [String; 6] {
        let [depth, in_flight, deferred, timeouts] = self.counts.as_array().map(comma);
        [
            self.topic.to_string(),
            self.channel.to_string(),
            depth,
            in_flight,
            deferred,
            timeouts,
        ]
    }
}

/// Lay out the data rows for a snapshot: each topic, then its channels,
/// all in snapshot order.
pub fn table_rows(snapshot: &StatsSnapshot) -> Vec<TableRow<'_>> {
    let mut rows = Vec::with_capacity(snapshot.row_count());
    for topic in &snapshot.topics {
        rows.push(TableRow {
            topic: &topic.name,
            channel: PLACEHOLDER,
            counts: topic.counts,
        });
        rows.extend(topic.channels.iter().map(|channel| TableRow {
            topic: PLACEHOLDER,
            channel: &channel.name,
            counts: channel.counts,
        }));
    }
    rows
}

/// Render one node's snapshot as a full-screen table.
pub fn render<W: Write>(out: &mut W, address: &str, snapshot: &StatsSnapshot) -> io::Result<()> {
    write_preamble(out, address)?;
    write_line(out, &COLUMNS.map(str::to_string))?;

    for row in table_rows(snapshot) {
        write_line(out, &row.cells())?;
    }

    out.flush()
}

/// Render a node whose stats could not be fetched.
pub fn render_error<W: Write>(out: &mut W, address: &str, error: &dyn Display) -> io::Result<()> {
    write_preamble(out, address)?;
    writeln!(out, "{:>width$} {}", "error:", error, width = NAME_WIDTH)?;
    out.flush()
}

fn write_preamble<W: Write>(out: &mut W, address: &str) -> io::Result<()> {
    queue!(
        out,
        Clear(ClearType::All),
        MoveTo(0, 0),
        Print(TOP_MARGIN),
        SetAttribute(Attribute::Bold),
        Print(format!("{address:>NAME_WIDTH$}")),
        SetAttribute(Attribute::Reset),
        Print("\n"),
    )
}

fn write_line<W: Write>(out: &mut W, cells: &[String; 6]) -> io::Result<()> {
    let [topic, channel, depth, in_flight, deferred, timeouts] = cells;
    writeln!(
        out,
        "{topic:>NAME_WIDTH$} {channel:>NAME_WIDTH$} \
         {depth:>COUNT_WIDTH$} {in_flight:>COUNT_WIDTH$} \
         {deferred:>COUNT_WIDTH$} {timeouts:>COUNT_WIDTH$}"
    )
}
