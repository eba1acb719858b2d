use crate::flatten::table::Table;
use anyhow::{Context, Result};
use std::io::Write;

/// Writes tables as tab-separated text to any output
pub struct TableWriter<W: Write> {
    writer: W,
}

impl<W: Write> TableWriter<W> {
    pub fn new(writer: W) -> Self {
        TableWriter { writer }
    }

    /// Write the header line followed by one line per row
    pub fn write_table(&mut self, table: &Table) -> Result<()> {
        self.writer
            .write_all(table.header_line().as_bytes())
            .context("Failed to write table header")?;

        for row in table.rows() {
            self.writer
                .write_all(table.row_line(row).as_bytes())
                .context("Failed to write table row")?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush writer")
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}
