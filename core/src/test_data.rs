use std::io::Read;
use std::path::Path;

use serde::Deserialize;

/// One row of book test data: `title,type,creation_date`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BookCase {
    pub title: String,
    #[serde(rename = "type")]
    pub book_type: String,
    pub creation_date: String,
}

pub fn load_book_cases(path: impl AsRef<Path>) -> Result<Vec<BookCase>, csv::Error> {
    let path = path.as_ref();
    let cases = read_book_cases(std::fs::File::open(path)?)?;
    tracing::debug!(path = %path.display(), count = cases.len(), "loaded book test data");
    Ok(cases)
}

pub fn read_book_cases<R: Read>(reader: R) -> Result<Vec<BookCase>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let cases = rdr.deserialize().collect::<Result<Vec<BookCase>, _>>()?;
    Ok(cases)
}
