use serde::{Deserialize, Serialize};

/// A named slot in the table schema.
///
/// `label` is the generated default name, `value` is what the user typed as
/// the header. A column has no identity beyond its position.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Column {
    pub label: String,
    pub value: String,
}

impl Column {
    /// Creates the default column for position `index` (0-based).
    pub fn create(index: usize) -> Self {
        Column {
            label: default_label(index),
            value: String::new(),
        }
    }

    pub fn is_filled(&self) -> bool {
        !self.value.trim().is_empty()
    }
}

/// Generated label for the column at `index`: "Column 1", "Column 2", ...
pub fn default_label(index: usize) -> String {
    format!("Column {}", index + 1)
}

/// Ordered list of columns.
///
/// Only [`crate::table::Table`] can add or remove columns, so that every
/// schema change reaches the rows in the same call.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    pub fn with_defaults(count: usize) -> Self {
        Schema {
            columns: (0..count).map(Column::create).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Column> {
        self.columns.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Column> {
        self.columns.iter()
    }

    pub fn labels(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.label.as_str()).collect()
    }

    pub fn values(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.value.as_str()).collect()
    }

    /// True when at least one column exists and every header has been filled in.
    pub fn all_filled(&self) -> bool {
        !self.columns.is_empty() && self.columns.iter().all(Column::is_filled)
    }

    /// Header used in the CSV export and error messages.
    ///
    /// Falls back to "Column N" when the user left the value empty. Returns
    /// the fallback for indices past the end as well.
    pub fn header(&self, index: usize) -> String {
        match self.columns.get(index) {
            Some(col) if !col.value.is_empty() => col.value.clone(),
            _ => default_label(index),
        }
    }

    /// Shorter header used by the recent-entries preview.
    pub fn preview_header(&self, index: usize) -> String {
        match self.columns.get(index) {
            Some(col) if !col.value.is_empty() => col.value.clone(),
            _ => format!("Col {}", index + 1),
        }
    }

    /// Prompt shown for the cell at `index` while entering a row.
    pub fn placeholder(&self, index: usize) -> String {
        format!("Enter {}", self.header(index))
    }

    pub(crate) fn push_default(&mut self) -> usize {
        let index = self.columns.len();
        self.columns.push(Column::create(index));
        index
    }

    pub(crate) fn set_value(&mut self, index: usize, text: &str) -> bool {
        match self.columns.get_mut(index) {
            Some(col) => {
                col.value = text.to_string();
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove(&mut self, index: usize) -> Option<Column> {
        if index < self.columns.len() {
            Some(self.columns.remove(index))
        } else {
            None
        }
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_numbered_from_one() {
        let schema = Schema::with_defaults(3);
        assert_eq!(schema.labels(), vec!["Column 1", "Column 2", "Column 3"]);
        assert_eq!(schema.values(), vec!["", "", ""]);
    }

    #[test]
    fn all_filled_requires_nonblank_values() {
        let mut schema = Schema::with_defaults(2);
        assert!(!schema.all_filled());

        schema.set_value(0, "Site");
        schema.set_value(1, "   ");
        assert!(!schema.all_filled());

        schema.set_value(1, "Depth");
        assert!(schema.all_filled());
    }

    #[test]
    fn all_filled_is_false_without_columns() {
        assert!(!Schema::default().all_filled());
    }

    #[test]
    fn header_falls_back_to_generated_name() {
        let mut schema = Schema::with_defaults(2);
        schema.set_value(1, "Depth");
        assert_eq!(schema.header(0), "Column 1");
        assert_eq!(schema.header(1), "Depth");
        assert_eq!(schema.preview_header(0), "Col 1");
        assert_eq!(schema.placeholder(1), "Enter Depth");
    }

    #[test]
    fn set_value_out_of_range_is_ignored() {
        let mut schema = Schema::with_defaults(1);
        assert!(!schema.set_value(5, "x"));
        assert_eq!(schema.values(), vec![""]);
    }

    #[test]
    fn push_default_uses_next_number() {
        let mut schema = Schema::with_defaults(3);
        schema.remove(0);
        let index = schema.push_default();
        assert_eq!(index, 2);
        assert_eq!(schema.labels(), vec!["Column 2", "Column 3", "Column 3"]);
    }
}
