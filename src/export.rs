use collector::api::Result;
use collector::{drop_duplicates, ExportBatch, Field, Record};
use log::{debug, info};
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Name of the file gathering the repositories of every exported user.
pub const COMPLETE_REPOS_FILE: &str = "complete-user-repos.csv";

const SEPARATOR: &str = "\t";

/// Writes export batches as tab separated files into one directory.
pub struct Exporter {
    dir: PathBuf,
}

impl Exporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Exporter { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes the batch to its own timestamped file and returns the file path.
    pub fn write(&self, batch: &ExportBatch) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(batch.file_name());
        let records = drop_duplicates(batch.records.clone());
        let mut writer = BufWriter::new(File::create(&path)?);
        write_row(&mut writer, batch.kind.header().iter())?;
        write_records(&mut writer, &records)?;
        writer.flush()?;
        info!("Exported {} rows to {}", records.len(), path.display());
        Ok(path)
    }

    /// Appends the batch rows to the aggregate repositories file.
    pub fn append_complete(&self, batch: &ExportBatch) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(COMPLETE_REPOS_FILE);
        let created = !path.exists();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = BufWriter::new(file);
        if created {
            write_row(&mut writer, batch.kind.header().iter())?;
        }
        let records = drop_duplicates(batch.records.clone());
        write_records(&mut writer, &records)?;
        writer.flush()?;
        debug!("Appended {} rows to {}", records.len(), path.display());
        Ok(path)
    }
}

fn write_records<W: Write>(writer: &mut W, records: &[Record]) -> std::io::Result<()> {
    for record in records {
        write_row(writer, record.values().map(Field::to_string))?;
    }
    Ok(())
}

fn write_row<W, I>(writer: &mut W, cells: I) -> std::io::Result<()>
where
    W: Write,
    I: Iterator,
    I::Item: AsRef<str>,
{
    let row: Vec<String> = cells.map(|cell| escape(cell.as_ref())).collect();
    writeln!(writer, "{}", row.join(SEPARATOR))
}

/// Quotes cells that would otherwise break the row layout.
fn escape(cell: &str) -> String {
    if cell.contains(SEPARATOR) || cell.contains(|c: char| matches!(c, '"' | '\n' | '\r')) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests;
