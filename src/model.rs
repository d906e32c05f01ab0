//! Normalized workbook model produced by extraction.
//!
//! Everything here is plain data: the mapper builds it once, the store owns it
//! afterwards and the rules only ever borrow it.

use crate::viz::{VizType, worksheet_tag};
use serde::{Deserialize, Serialize};

/// A parsed workbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkbookModel {
    /// Generated at parse time; two parses of one file get different ids.
    pub id: String,
    pub filename: String,
    pub summary: Summary,
    /// Document order.
    pub worksheets: Vec<Worksheet>,
    pub datasources: Vec<Datasource>,
}

impl WorkbookModel {
    pub fn worksheet(&self, name: &str) -> Option<&Worksheet> {
        self.worksheets.iter().find(|ws| ws.name == name)
    }

    /// True when both models were extracted from equivalent documents
    /// (everything but `id` and `filename` matches).
    pub fn same_structure(&self, other: &WorkbookModel) -> bool {
        self.summary == other.summary && self.worksheets == other.worksheets && self.datasources == other.datasources
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub name: String,
    pub version: String,
    pub worksheet_count: usize,
    pub dashboard_count: usize,
    pub story_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worksheet {
    pub name: String,
    /// Class of the first mark element, `"automatic"` when there is none.
    pub mark_type: String,
    pub shelves: Shelves,
    pub filters: Vec<Filter>,
    /// Current visualization type; `None` is reported as `"unknown"`.
    #[serde(with = "worksheet_tag")]
    pub viz_type: Option<VizType>,
    pub dimensions: Vec<String>,
    pub measures: Vec<String>,
}

impl Worksheet {
    /// A worksheet with the given name and no fields, shelves or filters.
    pub fn named(name: impl Into<String>) -> Self {
        Worksheet {
            name: name.into(),
            mark_type: DEFAULT_MARK_TYPE.to_string(),
            shelves: Shelves::default(),
            filters: Vec::new(),
            viz_type: None,
            dimensions: Vec::new(),
            measures: Vec::new(),
        }
    }

    pub fn with_viz(mut self, viz_type: VizType) -> Self {
        self.viz_type = Some(viz_type);
        self
    }

    pub fn with_dimensions<I, S>(mut self, dimensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dimensions = dimensions.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_measures<I, S>(mut self, measures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.measures = measures.into_iter().map(Into::into).collect();
        self
    }

    /// Whether the current type is `viz`. An unknown type never matches.
    pub fn is(&self, viz: VizType) -> bool {
        self.viz_type == Some(viz)
    }
}

pub const DEFAULT_MARK_TYPE: &str = "automatic";

/// Encoding channel a field can be placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShelfRole {
    Columns,
    Rows,
    Color,
    Size,
    Shape,
    Label,
    Detail,
    Tooltip,
}

impl ShelfRole {
    pub const ALL: [ShelfRole; 8] = [
        ShelfRole::Columns,
        ShelfRole::Rows,
        ShelfRole::Color,
        ShelfRole::Size,
        ShelfRole::Shape,
        ShelfRole::Label,
        ShelfRole::Detail,
        ShelfRole::Tooltip,
    ];

    /// Key used in the serialized shelf mapping.
    pub fn key(self) -> &'static str {
        match self {
            ShelfRole::Columns => "columns",
            ShelfRole::Rows => "rows",
            ShelfRole::Color => "color",
            ShelfRole::Size => "size",
            ShelfRole::Shape => "shape",
            ShelfRole::Label => "label",
            ShelfRole::Detail => "detail",
            ShelfRole::Tooltip => "tooltip",
        }
    }

    /// Value of the `shelf` attribute that places a field on this role.
    /// Labels live on the `text-shelf`.
    pub fn shelf_token(self) -> &'static str {
        match self {
            ShelfRole::Columns => "columns-shelf",
            ShelfRole::Rows => "rows-shelf",
            ShelfRole::Color => "color-shelf",
            ShelfRole::Size => "size-shelf",
            ShelfRole::Shape => "shape-shelf",
            ShelfRole::Label => "text-shelf",
            ShelfRole::Detail => "detail-shelf",
            ShelfRole::Tooltip => "tooltip-shelf",
        }
    }

    pub fn from_shelf_token(token: &str) -> Option<Self> {
        ShelfRole::ALL.into_iter().find(|role| role.shelf_token() == token)
    }
}

/// Field names per shelf. All eight roles are always present, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shelves {
    pub columns: Vec<String>,
    pub rows: Vec<String>,
    pub color: Vec<String>,
    pub size: Vec<String>,
    pub shape: Vec<String>,
    pub label: Vec<String>,
    pub detail: Vec<String>,
    pub tooltip: Vec<String>,
}

impl Shelves {
    pub fn get(&self, role: ShelfRole) -> &[String] {
        match role {
            ShelfRole::Columns => &self.columns,
            ShelfRole::Rows => &self.rows,
            ShelfRole::Color => &self.color,
            ShelfRole::Size => &self.size,
            ShelfRole::Shape => &self.shape,
            ShelfRole::Label => &self.label,
            ShelfRole::Detail => &self.detail,
            ShelfRole::Tooltip => &self.tooltip,
        }
    }

    fn get_mut(&mut self, role: ShelfRole) -> &mut Vec<String> {
        match role {
            ShelfRole::Columns => &mut self.columns,
            ShelfRole::Rows => &mut self.rows,
            ShelfRole::Color => &mut self.color,
            ShelfRole::Size => &mut self.size,
            ShelfRole::Shape => &mut self.shape,
            ShelfRole::Label => &mut self.label,
            ShelfRole::Detail => &mut self.detail,
            ShelfRole::Tooltip => &mut self.tooltip,
        }
    }

    /// Append `field` to `role` unless it is already there. Returns whether it
    /// was added.
    pub fn push_unique(&mut self, role: ShelfRole, field: &str) -> bool {
        let fields = self.get_mut(role);
        if fields.iter().any(|f| f == field) {
            return false;
        }
        fields.push(field.to_string());
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = (ShelfRole, &[String])> + '_ {
        ShelfRole::ALL.into_iter().map(move |role| (role, self.get(role)))
    }

    /// Every placed field, shelf by shelf in role order. A field that sits on
    /// two shelves is yielded twice.
    pub fn fields(&self) -> impl Iterator<Item = &String> + '_ {
        self.iter().flat_map(|(_, fields)| fields.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, fields)| fields.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub values: Vec<String>,
}

pub const DEFAULT_FILTER_KIND: &str = "categorical";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Datasource {
    pub name: String,
    /// `None` when the datasource has no connection element. Serialized as
    /// an empty object either way, never `null`.
    #[serde(with = "connection_object", default)]
    pub connection: Option<Connection>,
    pub columns: Vec<Column>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub class: String,
    pub dbname: String,
    pub server: String,
    pub username: String,
}

mod connection_object {
    use super::Connection;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Deserialize)]
    struct Partial {
        class: Option<String>,
        dbname: Option<String>,
        server: Option<String>,
        username: Option<String>,
    }

    pub fn serialize<S: Serializer>(value: &Option<Connection>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(connection) => connection.serialize(serializer),
            None => serializer.serialize_map(Some(0))?.end(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Connection>, D::Error> {
        let Some(p) = Option::<Partial>::deserialize(deserializer)? else { return Ok(None) };
        if p.class.is_none() && p.dbname.is_none() && p.server.is_none() && p.username.is_none() {
            return Ok(None);
        }
        Ok(Some(Connection {
            class: p.class.unwrap_or_default(),
            dbname: p.dbname.unwrap_or_default(),
            server: p.server.unwrap_or_default(),
            username: p.username.unwrap_or_default(),
        }))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub datatype: String,
    pub role: String,
    #[serde(rename = "type")]
    pub kind: String,
}
