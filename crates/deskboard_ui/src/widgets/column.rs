use std::{collections::HashSet, fmt, sync::Arc};

use deskboard_api::TableRecord;
use ratatui::layout::Constraint;
use thiserror::Error;

/// Turns a whole record into the text shown in a cell
pub type CellRenderer<R> = Arc<dyn Fn(&R) -> String + Send + Sync>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ColumnError {
    #[error("duplicate column key `{0}`")]
    DuplicateKey(String),
}

/// How one record field maps to a header and its cells
pub struct Column<R> {
    key: String,
    label: String,
    render: Option<CellRenderer<R>>,
    sortable: bool,
    width: Option<Constraint>,
}

impl<R> Clone for Column<R> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            label: self.label.clone(),
            render: self.render.clone(),
            sortable: self.sortable,
            width: self.width,
        }
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("render", &self.render.as_ref().map(|_| "<fn>"))
            .field("sortable", &self.sortable)
            .field("width", &self.width)
            .finish()
    }
}

impl<R: TableRecord> Column<R> {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            render: None,
            sortable: false,
            width: None,
        }
    }

    /// Render cells from the whole record instead of the raw field value
    #[must_use]
    pub fn render(
        mut self,
        render: impl Fn(&R) -> String + Send + Sync + 'static,
    ) -> Self {
        self.render = Some(Arc::new(render));
        self
    }

    /// Host a sort toggle bound to this column's key in the header
    #[must_use]
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Layout hint; columns without one are sized from their content
    #[must_use]
    pub fn width(mut self, width: Constraint) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub const fn is_sortable(&self) -> bool {
        self.sortable
    }

    #[must_use]
    pub const fn width_hint(&self) -> Option<Constraint> {
        self.width
    }

    /// Text of this column's cell for `record`
    #[must_use]
    pub fn resolve(&self, record: &R) -> String {
        match &self.render {
            Some(render) => render(record),
            None => record
                .field(&self.key)
                .map(std::borrow::Cow::into_owned)
                .unwrap_or_default(),
        }
    }
}

/// An ordered list of columns with unique keys
pub struct ColumnSet<R> {
    columns: Vec<Column<R>>,
}

impl<R> Clone for ColumnSet<R> {
    fn clone(&self) -> Self {
        Self {
            columns: self.columns.clone(),
        }
    }
}

impl<R> fmt::Debug for ColumnSet<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.columns).finish()
    }
}

impl<R: TableRecord> ColumnSet<R> {
    pub fn new(columns: Vec<Column<R>>) -> Result<Self, ColumnError> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.key()) {
                return Err(ColumnError::DuplicateKey(column.key().to_string()));
            }
        }
        Ok(Self { columns })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column<R>> {
        self.columns.iter()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Column<R>> {
        self.columns.get(index)
    }

    #[must_use]
    pub fn position(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.key() == key)
    }

    /// Cells of one record, in display order
    #[must_use]
    pub fn resolve_row(&self, record: &R) -> Vec<String> {
        self.columns.iter().map(|column| column.resolve(record)).collect()
    }
}

#[cfg(test)]
mod tests {
    use deskboard_api::Record;
    use serde_json::json;

    use super::*;

    fn testimonial() -> Record {
        Record::from_value(json!({
            "_id": "t1",
            "name": "Ada",
            "image": "",
            "companyName": "Analytical Engines"
        }))
        .expect("object")
    }

    #[test]
    fn test_raw_value_shown_without_renderer() {
        let column = Column::<Record>::new("name", "Name");
        assert_eq!(column.resolve(&testimonial()), "Ada");
    }

    #[test]
    fn test_missing_field_renders_empty() {
        let column = Column::<Record>::new("title", "Title");
        assert_eq!(column.resolve(&testimonial()), "");
    }

    #[test]
    fn test_renderer_sees_whole_record() {
        let column = Column::<Record>::new("image", "Image").render(|r: &Record| {
            match r.field("image").as_deref() {
                Some("") | None => format!("No image ({})", r.id().unwrap_or_default()),
                Some(_) => "[image]".to_string(),
            }
        });
        assert_eq!(column.resolve(&testimonial()), "No image (t1)");
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let result = ColumnSet::<Record>::new(vec![
            Column::new("name", "Name"),
            Column::new("email", "Email"),
            Column::new("name", "Full name"),
        ]);
        assert_eq!(
            result.err(),
            Some(ColumnError::DuplicateKey("name".to_string()))
        );
    }

    #[test]
    fn test_order_is_display_order() {
        let set = ColumnSet::<Record>::new(vec![
            Column::new("companyName", "Company"),
            Column::new("name", "Name").sortable(),
        ])
        .expect("unique keys");
        assert_eq!(set.position("name"), Some(1));
        assert!(set.get(1).is_some_and(Column::is_sortable));
        assert_eq!(
            set.resolve_row(&testimonial()),
            vec!["Analytical Engines".to_string(), "Ada".to_string()]
        );
    }
}
