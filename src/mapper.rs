//! Structural mapping: parsed workbook tree to [`WorkbookModel`].
//!
//! ```text
//! <workbook name version>
//!   ├─ <worksheet name> ──▶ mark class, shelves, filters, field roles
//!   ├─ <dashboard> / <story>  (counted only)
//!   └─ <datasource name> ──▶ connection + columns
//! ```
//!
//! Unknown elements are ignored. Lookups are descendant searches, so the
//! mapper does not care how deeply the authoring tool nests things.
//!
//! ## Shelves
//!
//! Two strategies feed the same shelf lists and never add a field twice:
//!
//! 1. any element with a `shelf` attribute such as `rows-shelf` places its
//!    `name` on that shelf;
//! 2. any `pane` whose name mentions "columns" or "rows" places every nested
//!    `field` name on that shelf.
//!
//! ## Field roles
//!
//! Columns listed under `datasource-dependencies` carry an explicit `role`.
//! Only when that yields neither a dimension nor a measure does the mapper
//! fall back to guessing from shelf fields: a name containing an aggregation
//! token (`SUM`, `AVG`, `COUNT`) is a measure, anything else a dimension. The
//! two paths are never mixed.

use crate::config::MappingConfig;
use crate::infer::{infer_viz_type, mark_class};
use crate::keywords::KeywordSet;
use crate::model::{
    Column, Connection, DEFAULT_FILTER_KIND, Datasource, Filter, ShelfRole, Shelves, Summary, WorkbookModel,
    Worksheet,
};
use crate::xml::{self, attr_or, non_empty};
use roxmltree::{Document, Node};
use std::collections::HashSet;

const UNTITLED: &str = "Untitled";
const UNKNOWN_VERSION: &str = "Unknown";
const UNNAMED: &str = "Unnamed";

/// Build a workbook model with a fresh id.
pub fn map_workbook(doc: &Document<'_>, filename: &str, config: &MappingConfig) -> WorkbookModel {
    let root = doc.root_element();

    WorkbookModel {
        id: uuid::Uuid::new_v4().to_string(),
        filename: filename.to_string(),
        summary: summary(root),
        worksheets: xml::descendants(root, "worksheet").map(|ws| worksheet(ws, &config.aggregation_tokens)).collect(),
        datasources: xml::descendants(root, "datasource").map(datasource).collect(),
    }
}

fn summary(root: Node<'_, '_>) -> Summary {
    Summary {
        name: attr_or(root, "name", UNTITLED).to_string(),
        version: attr_or(root, "version", UNKNOWN_VERSION).to_string(),
        worksheet_count: xml::descendants(root, "worksheet").count(),
        dashboard_count: xml::descendants(root, "dashboard").count(),
        story_count: xml::descendants(root, "story").count(),
    }
}

fn worksheet(node: Node<'_, '_>, aggregation: &KeywordSet) -> Worksheet {
    let shelves = shelves(node);
    let (dimensions, measures) = field_roles(node, &shelves, aggregation);

    Worksheet {
        name: attr_or(node, "name", UNNAMED).to_string(),
        mark_type: mark_class(node).to_string(),
        filters: filters(node),
        viz_type: infer_viz_type(node),
        shelves,
        dimensions,
        measures,
    }
}

pub(crate) fn shelves(worksheet: Node<'_, '_>) -> Shelves {
    let mut shelves = Shelves::default();

    for (element, token) in xml::with_attribute(worksheet, "shelf") {
        let Some(role) = ShelfRole::from_shelf_token(token) else { continue };
        if let Some(field) = non_empty(element, "name") {
            shelves.push_unique(role, field);
        }
    }

    for pane in xml::descendants(worksheet, "pane") {
        let pane_name = attr_or(pane, "name", "").to_lowercase();
        let role = if pane_name.contains("columns") {
            ShelfRole::Columns
        } else if pane_name.contains("rows") {
            ShelfRole::Rows
        } else {
            continue;
        };
        for field in xml::descendants(pane, "field").filter_map(|f| non_empty(f, "name")) {
            shelves.push_unique(role, field);
        }
    }

    shelves
}

fn filters(worksheet: Node<'_, '_>) -> Vec<Filter> {
    xml::descendants(worksheet, "filter")
        .map(|filter| Filter {
            field: attr_or(filter, "column", "").to_string(),
            kind: attr_or(filter, "class", DEFAULT_FILTER_KIND).to_string(),
            values: xml::descendants(filter, "groupfilter")
                .filter_map(|g| non_empty(g, "member"))
                .map(str::to_string)
                .collect(),
        })
        .collect()
}

/// `(dimensions, measures)` for one worksheet. Each list keeps first-seen
/// order and holds a name at most once.
pub(crate) fn field_roles(
    worksheet: Node<'_, '_>,
    shelves: &Shelves,
    aggregation: &KeywordSet,
) -> (Vec<String>, Vec<String>) {
    let mut dimensions = Vec::new();
    let mut measures = Vec::new();
    let mut seen_nodes = HashSet::new();

    for deps in xml::descendants(worksheet, "datasource-dependencies") {
        for column in xml::descendants(deps, "column") {
            if !seen_nodes.insert(column.id()) {
                continue;
            }
            let Some(name) = non_empty(column, "name") else { continue };
            match column.attribute("role") {
                Some("measure") => push_unique(&mut measures, name),
                Some("dimension") => push_unique(&mut dimensions, name),
                _ => {}
            }
        }
    }

    if dimensions.is_empty() && measures.is_empty() {
        for field in shelves.fields() {
            if aggregation.matches(field) {
                push_unique(&mut measures, field);
            } else {
                push_unique(&mut dimensions, field);
            }
        }
        if !dimensions.is_empty() || !measures.is_empty() {
            tracing::debug!(
                dimensions = dimensions.len(),
                measures = measures.len(),
                "field roles guessed from shelf names"
            );
        }
    }

    (dimensions, measures)
}

fn push_unique(list: &mut Vec<String>, name: &str) {
    if !list.iter().any(|n| n == name) {
        list.push(name.to_string());
    }
}

fn datasource(node: Node<'_, '_>) -> Datasource {
    Datasource {
        name: attr_or(node, "name", UNNAMED).to_string(),
        connection: xml::first(node, "connection").map(|c| Connection {
            class: attr_or(c, "class", "").to_string(),
            dbname: attr_or(c, "dbname", "").to_string(),
            server: attr_or(c, "server", "").to_string(),
            username: attr_or(c, "username", "").to_string(),
        }),
        columns: xml::descendants(node, "column")
            .map(|c| Column {
                name: attr_or(c, "name", "").to_string(),
                datatype: attr_or(c, "datatype", "").to_string(),
                role: attr_or(c, "role", "").to_string(),
                kind: attr_or(c, "type", "").to_string(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viz::VizType;
    use pretty_assertions::assert_eq;

    const WORKBOOK: &str = r#"<?xml version='1.0' encoding='utf-8' ?>
<workbook name="Superstore" version="18.1">
  <datasources>
    <datasource name="Orders">
      <connection class="postgres" dbname="sales" server="db.internal" username="analyst"/>
      <column name="[Order Date]" datatype="date" role="dimension" type="ordinal"/>
      <column name="[Sales]" datatype="real" role="measure" type="quantitative"/>
    </datasource>
    <datasource name="Parameters"/>
  </datasources>
  <worksheets>
    <worksheet name="Sales Over Time">
      <table>
        <view>
          <datasource-dependencies datasource="Orders">
            <column name="[Order Date]" role="dimension"/>
            <column name="[Sales]" role="measure"/>
            <column name="[Profit]" role="measure"/>
            <column name="[Number of Records]" role="count"/>
          </datasource-dependencies>
          <filter class="categorical" column="[Region]">
            <groupfilter function="union">
              <groupfilter function="member" member="East"/>
              <groupfilter function="member" member="West"/>
            </groupfilter>
          </filter>
          <filter column="[Segment]"/>
        </view>
        <panes>
          <pane><mark class="Bar"/></pane>
        </panes>
        <encodings>
          <color shelf="color-shelf" name="[Category]"/>
          <text shelf="text-shelf" name="[Sales]"/>
          <rows shelf="rows-shelf" name="[Sales]"/>
          <pages shelf="pages-shelf" name="[Year]"/>
        </encodings>
        <pane name="Columns pane"><field name="[Order Date]"/><field name="[Region]"/></pane>
        <pane name="rows"><field name="[Sales]"/></pane>
      </table>
    </worksheet>
    <worksheet name="Guessed">
      <table>
        <rows shelf="rows-shelf" name="SUM(Profit)"/>
        <cols shelf="columns-shelf" name="Segment"/>
        <tip shelf="tooltip-shelf" name="Segment"/>
        <mark class="Circle"/>
      </table>
    </worksheet>
    <worksheet/>
  </worksheets>
  <dashboards><dashboard name="Overview"/></dashboards>
  <stories><story name="Story 1"/><story name="Story 2"/></stories>
</workbook>"#;

    fn mapped() -> WorkbookModel {
        let doc = crate::document::parse_markup(WORKBOOK).unwrap();
        map_workbook(&doc, "superstore.twb", &MappingConfig::default())
    }

    #[test]
    fn summary_counts_sheets_anywhere() {
        let wb = mapped();
        assert_eq!(
            wb.summary,
            Summary {
                name: "Superstore".into(),
                version: "18.1".into(),
                worksheet_count: 3,
                dashboard_count: 1,
                story_count: 2,
            }
        );
        assert_eq!(wb.filename, "superstore.twb");
    }

    #[test]
    fn summary_defaults_without_root_attributes() {
        let doc = crate::document::parse_markup("<workbook/>").unwrap();
        let wb = map_workbook(&doc, "x.twb", &MappingConfig::default());
        assert_eq!(wb.summary.name, "Untitled");
        assert_eq!(wb.summary.version, "Unknown");
        assert!(wb.worksheets.is_empty());
    }

    #[test]
    fn worksheets_keep_document_order_and_defaults() {
        let wb = mapped();
        let names: Vec<&str> = wb.worksheets.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["Sales Over Time", "Guessed", "Unnamed"]);

        let empty = &wb.worksheets[2];
        assert_eq!(empty.mark_type, "automatic");
        assert_eq!(empty.viz_type, None);
        assert!(empty.shelves.is_empty());
    }

    #[test]
    fn shelves_merge_both_strategies_without_duplicates() {
        let wb = mapped();
        let shelves = &wb.worksheets[0].shelves;
        assert_eq!(shelves.columns, vec!["[Order Date]", "[Region]"]);
        assert_eq!(shelves.rows, vec!["[Sales]"]);
        assert_eq!(shelves.color, vec!["[Category]"]);
        assert_eq!(shelves.label, vec!["[Sales]"]);
        assert!(shelves.detail.is_empty());
        assert!(shelves.tooltip.is_empty());
    }

    #[test]
    fn filters_collect_members() {
        let wb = mapped();
        let filters = &wb.worksheets[0].filters;
        assert_eq!(
            filters,
            &vec![
                Filter {
                    field: "[Region]".into(),
                    kind: "categorical".into(),
                    values: vec!["East".into(), "West".into()],
                },
                Filter { field: "[Segment]".into(), kind: "categorical".into(), values: vec![] },
            ]
        );
    }

    #[test]
    fn explicit_roles_win() {
        let wb = mapped();
        let ws = &wb.worksheets[0];
        assert_eq!(ws.mark_type, "Bar");
        assert_eq!(ws.viz_type, Some(VizType::BarChart));
        assert_eq!(ws.dimensions, vec!["[Order Date]"]);
        assert_eq!(ws.measures, vec!["[Sales]", "[Profit]"]);
    }

    #[test]
    fn roles_fall_back_to_aggregation_tokens() {
        let wb = mapped();
        let ws = &wb.worksheets[1];
        assert_eq!(ws.viz_type, Some(VizType::ScatterPlot));
        assert_eq!(ws.measures, vec!["SUM(Profit)"]);
        assert_eq!(ws.dimensions, vec!["Segment"]);
    }

    #[test]
    fn datasources_carry_connection_and_columns() {
        let wb = mapped();
        let orders = &wb.datasources[0];
        assert_eq!(orders.name, "Orders");
        assert_eq!(
            orders.connection,
            Some(Connection {
                class: "postgres".into(),
                dbname: "sales".into(),
                server: "db.internal".into(),
                username: "analyst".into(),
            })
        );
        assert_eq!(orders.columns.len(), 2);
        assert_eq!(orders.columns[1].kind, "quantitative");

        let params = &wb.datasources[1];
        assert_eq!(params.connection, None);
        assert!(params.columns.is_empty());
        assert_eq!(serde_json::to_value(params).unwrap()["connection"], serde_json::json!({}));
    }

    #[test]
    fn measure_listed_in_two_dependency_sections_appears_once() {
        let doc = crate::document::parse_markup(
            r#"<workbook><worksheet name="Split"><table><view>
  <datasource-dependencies datasource="Orders">
    <column name="[Sales]" role="measure"/>
    <column name="[Region]" role="dimension"/>
  </datasource-dependencies>
  <datasource-dependencies datasource="Returns">
    <column name="[Sales]" role="measure"/>
  </datasource-dependencies>
</view></table></worksheet></workbook>"#,
        )
        .unwrap();
        let wb = map_workbook(&doc, "split.twb", &MappingConfig::default());
        assert_eq!(wb.worksheets[0].measures, vec!["[Sales]"]);
        assert_eq!(wb.worksheets[0].dimensions, vec!["[Region]"]);
    }

    #[test]
    fn mapping_twice_gives_same_structure_and_new_ids() {
        let a = mapped();
        let b = mapped();
        assert_ne!(a.id, b.id);
        assert!(a.same_structure(&b));
    }
}
