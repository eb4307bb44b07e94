use crate::data::Error;
use csv::StringRecord;
use std::{fs::File, io, path::Path};
use tracing::debug;

/// Orders exactly as they appear in the file: the header plus every record,
/// nothing validated or converted yet.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Table {
    headers: StringRecord,
    rows: Vec<StringRecord>,
}

impl Table {
    pub fn new(headers: StringRecord, rows: Vec<StringRecord>) -> Self {
        Self { headers, rows }
    }

    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    pub fn rows(&self) -> &[StringRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Opens `path` and loads it with [`load_from_reader`]. A missing file gets its
/// own error kind, any other failure to open it is `Unexpected`.
pub(crate) fn load(path: &Path) -> Result<Table, Error> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
        _ => Error::Unexpected(e.to_string()),
    })?;
    let table = load_from_reader(file)?;
    debug!("Loaded {} rows from {}", table.len(), path.display());
    Ok(table)
}

/// Simple CSV importer. Fields are trimmed and every record must be as wide as
/// the header. A header without data rows is a valid, empty table.
pub(crate) fn load_from_reader<R: io::Read>(reader: R) -> Result<Table, Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = rdr.headers().map_err(classify)?.clone();
    if headers.is_empty() {
        return Err(Error::Empty);
    }
    let rows = rdr
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(classify)?;
    Ok(Table::new(headers, rows))
}

fn classify(err: csv::Error) -> Error {
    match err.kind() {
        csv::ErrorKind::UnequalLengths { .. } => Error::Parse(err.to_string()),
        _ => Error::Unexpected(err.to_string()),
    }
}
