use serde::{Deserialize, Serialize};

/// One recipient: the text drawn onto the template and a stable identifier for list edits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameEntry {
    /// Text drawn onto the certificate.
    pub name: String,
    /// Opaque identifier, unique within its list.
    pub id: String,
}

impl NameEntry {
    /// Construct an entry.
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
        }
    }
}

/// Ordered list of recipients. Duplicate names are allowed; ids are not reused.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameList {
    entries: Vec<NameEntry>,
    last_stamp: i64,
}

impl NameList {
    /// Empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read one name per line from plain text.
    ///
    /// Only the first comma-separated column is used; cells are trimmed and blank rows dropped.
    /// With `skip_header` the first line is ignored.
    pub fn from_lines(text: &str, skip_header: bool) -> Self {
        let names = text
            .lines()
            .skip(usize::from(skip_header))
            .map(|line| line.split(',').next().unwrap_or_default());
        let mut list = Self::new();
        list.extend_names(names);
        list
    }

    /// Append one name after trimming it. Blank input is ignored and returns `None`.
    pub fn push_name(&mut self, name: &str) -> Option<&NameEntry> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let id = self.next_stamp().to_string();
        self.entries.push(NameEntry::new(name, id));
        self.entries.last()
    }

    /// Append many names at once; blanks are skipped. Returns the number added.
    pub fn extend_names<I, S>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stamp = self.next_stamp();
        let before = self.entries.len();
        let added = names
            .into_iter()
            .filter_map(|n| {
                let n = n.as_ref().trim();
                (!n.is_empty()).then(|| n.to_owned())
            })
            .enumerate()
            .map(|(i, n)| NameEntry::new(n, format!("{stamp}-{i}")));
        self.entries.extend(added);
        self.entries.len() - before
    }

    /// Remove the entry with `id`, returning it.
    pub fn remove(&mut self, id: &str) -> Option<NameEntry> {
        let idx = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(idx))
    }

    /// Name of the first entry, used as the preview sample.
    pub fn first_name(&self) -> Option<&str> {
        self.entries.first().map(|e| e.name.as_str())
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[NameEntry] {
        &self.entries
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, NameEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Millisecond stamp for new ids, bumped past the previous one so ids stay unique when
    /// several edits land in the same millisecond.
    fn next_stamp(&mut self) -> i64 {
        let now = chrono::Utc::now().timestamp_millis();
        self.last_stamp = now.max(self.last_stamp + 1);
        self.last_stamp
    }
}

impl<'a> IntoIterator for &'a NameList {
    type Item = &'a NameEntry;
    type IntoIter = std::slice::Iter<'a, NameEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl From<Vec<NameEntry>> for NameList {
    fn from(entries: Vec<NameEntry>) -> Self {
        Self {
            entries,
            last_stamp: 0,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/batch/names.rs"]
mod tests;
