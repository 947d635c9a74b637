use std::fmt::{Display, Formatter};

/// One credential record as listed by the vault.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Entry {
    pub id: String,
    pub name: String,
    pub user: String,
    pub folder: String,
}

impl Entry {
    /// Parses one tab-separated `id, name, user, folder` listing row.
    ///
    /// Missing trailing columns are read as empty.
    pub fn from_listing_row(row: &str) -> Self {
        let mut fields = row.split('\t').map(ToString::to_string);

        Self {
            id: fields.next().unwrap_or_default(),
            name: fields.next().unwrap_or_default(),
            user: fields.next().unwrap_or_default(),
            folder: fields.next().unwrap_or_default(),
        }
    }

    /// Case-insensitive exact match against the entry's folder.
    pub fn in_folder(&self, folder: &str) -> bool {
        self.folder.to_lowercase() == folder.to_lowercase()
    }
}

impl Display for Entry {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.name)?;

        if !self.user.is_empty() {
            write!(formatter, " ({})", self.user)?;
        }

        Ok(())
    }
}

/// Parses the full output of a vault listing, skipping blank rows.
pub fn parse_listing(output: &str) -> Vec<Entry> {
    output
        .lines()
        .filter(|row| !row.trim().is_empty())
        .map(Entry::from_listing_row)
        .collect()
}

/// Keeps the entries of `folder`, or all of them when no folder is given.
pub fn filter_by_folder(entries: Vec<Entry>, folder: Option<&str>) -> Vec<Entry> {
    match folder {
        Some(folder) => entries
            .into_iter()
            .filter(|entry| entry.in_folder(folder))
            .collect(),
        None => entries,
    }
}
