//! Declarative column configuration.
//!
//! Columns can be described in TOML or JSON and built in one go. Every field
//! is optional and defaults to what [`GridColumn::new`] would produce.
//!
//! ```
//! use horizon_grid::config::GridConfig;
//!
//! let config = GridConfig::from_toml_str(r#"
//!     [[columns]]
//!     header_text = "Name"
//!     editable = true
//!     cell = { kind = "text", field = "name" }
//!
//!     [[columns]]
//!     header_text = "Done"
//!     width = 48
//!     cell = { kind = "check_box", field = "done" }
//! "#).unwrap();
//!
//! let columns = config.build_columns().unwrap();
//! assert_eq!(columns[1].width(), 48);
//! ```

use std::sync::Arc;

use horizon_grid_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::cell::{
    CellBinding, CellKind, CheckBoxCell, ComboBoxCell, ImageTextCell, ImageViewCell, TextBoxCell,
};
use crate::column::{GridColumn, AUTO_WIDTH, UNSET_MAX_WIDTH, UNSET_MIN_WIDTH};
use crate::error::{GridError, Result};
use crate::value::TextAlignment;

/// Configuration of a column's cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellConfig {
    pub kind: CellKind,
    /// Field shown by the cell (the text field for `image_text`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Image field of an `image_text` cell.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_field: Option<String>,
    /// Options of a `combo` cell.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl CellConfig {
    /// A cell of `kind` reading `field`.
    pub fn new(kind: CellKind, field: impl Into<String>) -> Self {
        Self {
            kind,
            field: Some(field.into()),
            ..Self::default()
        }
    }

    /// Describes a column with no cell.
    pub fn none() -> Self {
        Self {
            kind: CellKind::None,
            ..Self::default()
        }
    }

    /// Snapshots an existing cell binding.
    ///
    /// Custom cells wrap closures and cannot be described, so they fail.
    pub fn from_binding(cell: &dyn CellBinding) -> Result<Self> {
        let kind = cell.kind();
        if matches!(kind, CellKind::Custom | CellKind::None) {
            return Err(GridError::invalid_config(
                "cell.kind",
                format!("{kind:?} cells cannot be saved to configuration"),
            ));
        }
        let mut fields = cell.fields().into_iter();
        let image_field = match kind {
            CellKind::ImageText => fields.next(),
            _ => None,
        };
        Ok(Self {
            kind,
            field: fields.next(),
            image_field,
            options: cell.options(),
        })
    }

    /// Checks that the kind has the fields and options it needs.
    pub fn validate(&self) -> Result<()> {
        match self.kind {
            CellKind::Combo if self.options.is_empty() => {
                return Err(GridError::invalid_config(
                    "cell.options",
                    "combo cells need at least one option",
                ));
            }
            CellKind::ImageText if self.image_field.is_none() => {
                return Err(GridError::invalid_config(
                    "cell.image_field",
                    "image_text cells need an image field",
                ));
            }
            CellKind::Custom => return Err(custom_unsupported()),
            CellKind::Text | CellKind::None => return Ok(()),
            _ => {}
        }
        if self.field.is_none() {
            return Err(GridError::invalid_config(
                "cell.field",
                format!("{:?} cells need a field", self.kind),
            ));
        }
        Ok(())
    }

    /// Builds the cell binding, or `None` for the `none` kind.
    pub fn build(&self) -> Result<Option<Arc<dyn CellBinding>>> {
        self.validate()?;
        let field = self.field.clone().unwrap_or_default();
        let cell: Arc<dyn CellBinding> = match self.kind {
            CellKind::Text => match &self.field {
                Some(field) => Arc::new(TextBoxCell::new(field.clone())),
                None => Arc::new(TextBoxCell::unbound()),
            },
            CellKind::CheckBox => Arc::new(CheckBoxCell::new(field)),
            CellKind::Image => Arc::new(ImageViewCell::new(field)),
            CellKind::Combo => Arc::new(ComboBoxCell::new(field, self.options.iter().cloned())),
            CellKind::ImageText => Arc::new(ImageTextCell::new(
                self.image_field.clone().unwrap_or_default(),
                field,
            )),
            CellKind::Custom => return Err(custom_unsupported()),
            CellKind::None => return Ok(None),
        };
        Ok(Some(cell))
    }
}

fn custom_unsupported() -> GridError {
    GridError::invalid_config("cell.kind", "custom cells cannot be built from configuration")
}

/// Configuration of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub header_text: String,
    /// Fixed width, or `-1` for auto sizing.
    pub width: i32,
    /// Overrides the sizing mode implied by `width`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_size: Option<bool>,
    pub min_width: i32,
    pub max_width: i32,
    pub resizable: bool,
    pub sortable: bool,
    pub editable: bool,
    pub visible: bool,
    pub expand: bool,
    pub header_alignment: TextAlignment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_index: Option<i32>,
    /// The cell. Omitted keeps the default text cell; `kind = "none"` removes it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell: Option<CellConfig>,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            header_text: String::new(),
            width: AUTO_WIDTH,
            auto_size: None,
            min_width: UNSET_MIN_WIDTH,
            max_width: UNSET_MAX_WIDTH,
            resizable: true,
            sortable: false,
            editable: false,
            visible: true,
            expand: false,
            header_alignment: TextAlignment::Left,
            display_index: None,
            cell: None,
        }
    }
}

impl ColumnConfig {
    /// Parses a column from TOML.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses a column from JSON.
    pub fn from_json_str(source: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges and cell consistency.
    pub fn validate(&self) -> Result<()> {
        if self.width < 0 && self.width != AUTO_WIDTH {
            return Err(GridError::invalid_config(
                "width",
                format!("{} is negative (use {} for auto sizing)", self.width, AUTO_WIDTH),
            ));
        }
        if self.min_width < 0 {
            return Err(GridError::invalid_config("min_width", "must not be negative"));
        }
        if self.min_width > self.max_width {
            return Err(GridError::invalid_config(
                "min_width",
                format!("{} exceeds max_width {}", self.min_width, self.max_width),
            ));
        }
        match &self.cell {
            Some(cell) => cell.validate(),
            None => Ok(()),
        }
    }
}

/// A whole column set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub columns: Vec<ColumnConfig>,
}

impl GridConfig {
    /// Parses and validates a column set from TOML.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a column set from JSON.
    pub fn from_json_str(source: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Pretty-printed TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validates every column, reporting the first failure with its position.
    pub fn validate(&self) -> Result<()> {
        for (index, column) in self.columns.iter().enumerate() {
            column.validate().map_err(|err| at_position(index, err))?;
        }
        Ok(())
    }

    /// Snapshots a column set. Fails on the first column that cannot be described.
    pub fn snapshot(columns: &[GridColumn]) -> Result<Self> {
        let columns = columns
            .iter()
            .enumerate()
            .map(|(index, column)| column.to_config().map_err(|err| at_position(index, err)))
            .collect::<Result<_>>()?;
        Ok(Self { columns })
    }

    /// Builds detached columns, in order.
    pub fn build_columns(&self) -> Result<Vec<GridColumn>> {
        self.validate()?;
        self.columns.iter().map(GridColumn::from_config).collect()
    }
}

fn at_position(index: usize, err: GridError) -> GridError {
    match err {
        GridError::InvalidConfig { field, message } => GridError::InvalidConfig {
            field: format!("columns[{index}].{field}"),
            message,
        },
        other => other,
    }
}

impl GridColumn {
    /// Builds a detached column from configuration.
    ///
    /// A configured display index is held back until the column is attached.
    pub fn from_config(config: &ColumnConfig) -> Result<Self> {
        config.validate()?;

        let column = GridColumn::new();
        if let Some(cell) = &config.cell {
            column.set_cell_binding(cell.build()?);
        }
        column.set_header_text(config.header_text.clone());
        column.set_width(config.width);
        if let Some(auto_size) = config.auto_size {
            column.set_auto_size(auto_size);
        }
        column.set_min_width(config.min_width);
        column.set_max_width(config.max_width);
        column.set_resizable(config.resizable);
        column.set_sortable(config.sortable);
        column.set_visible(config.visible);
        column.set_expand(config.expand);
        column.set_header_alignment(config.header_alignment);
        column.set_editable(config.editable)?;
        if let Some(index) = config.display_index {
            column.set_display_index(index);
        }

        tracing::debug!(target: targets::CONFIG, header = %config.header_text, "column built from configuration");
        Ok(column)
    }

    /// Snapshots the column's current settings.
    ///
    /// A column without a cell is written as `kind = "none"`. Custom cells fail.
    pub fn to_config(&self) -> Result<ColumnConfig> {
        let cell = match self.cell_binding() {
            Some(cell) => CellConfig::from_binding(cell.as_ref())?,
            None => CellConfig::none(),
        };
        let index = self.display_index();
        Ok(ColumnConfig {
            header_text: self.header_text(),
            width: self.native().fixed_width().max(AUTO_WIDTH),
            auto_size: Some(self.auto_size()),
            min_width: self.min_width(),
            max_width: self.max_width(),
            resizable: self.resizable(),
            sortable: self.sortable(),
            editable: self.editable(),
            visible: self.visible(),
            expand: self.expand(),
            header_alignment: self.header_alignment(),
            display_index: (index >= 0).then_some(index),
            cell: Some(cell),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CustomCell;
    use crate::native::ColumnSizing;
    use crate::value::CellValue;

    fn invalid_field(err: GridError) -> String {
        match err {
            GridError::InvalidConfig { field, .. } => field,
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_match_new_column() {
        let config = ColumnConfig::from_toml_str("").unwrap();
        assert_eq!(config, ColumnConfig::default());

        let column = GridColumn::from_config(&config).unwrap();
        assert!(column.auto_size());
        assert!(column.resizable());
        assert_eq!(column.cell_binding().unwrap().kind(), CellKind::Text);
    }

    #[test]
    fn test_column_from_toml() {
        let config = ColumnConfig::from_toml_str(
            r#"
            header_text = "Size"
            width = 90
            min_width = 40
            sortable = true
            header_alignment = "right"
            display_index = 2
            cell = { kind = "combo", field = "size", options = ["S", "M", "L"] }
            "#,
        )
        .unwrap();

        let column = GridColumn::from_config(&config).unwrap();
        assert_eq!(column.header_text(), "Size");
        assert_eq!(column.width(), 90);
        assert_eq!(column.native().sizing(), ColumnSizing::Fixed);
        assert_eq!(column.min_width(), 40);
        assert!(column.sortable());
        assert_eq!(column.header_alignment(), TextAlignment::Right);
        assert_eq!(column.pending_display_index(), Some(2));
        assert_eq!(column.cell_binding().unwrap().options(), vec!["S", "M", "L"]);
    }

    #[test]
    fn test_column_from_json() {
        let config = ColumnConfig::from_json_str(
            r#"{ "header_text": "Icon", "cell": { "kind": "image_text", "image_field": "icon", "field": "name" } }"#,
        )
        .unwrap();
        let column = GridColumn::from_config(&config).unwrap();
        assert_eq!(column.cell_binding().unwrap().fields(), vec!["icon", "name"]);
    }

    #[test]
    fn test_auto_size_override() {
        let config = ColumnConfig {
            width: 120,
            auto_size: Some(true),
            ..ColumnConfig::default()
        };
        let column = GridColumn::from_config(&config).unwrap();
        assert!(column.auto_size());
        assert_eq!(column.native().fixed_width(), 120);
    }

    #[test]
    fn test_validation_errors() {
        let err = ColumnConfig::from_toml_str("width = -5").unwrap_err();
        assert_eq!(invalid_field(err), "width");

        let err = ColumnConfig::from_toml_str("min_width = 50\nmax_width = 10").unwrap_err();
        assert_eq!(invalid_field(err), "min_width");

        let err = ColumnConfig::from_toml_str(r#"cell = { kind = "combo", field = "x" }"#).unwrap_err();
        assert_eq!(invalid_field(err), "cell.options");

        let err = ColumnConfig::from_toml_str(r#"cell = { kind = "image_text", field = "x" }"#).unwrap_err();
        assert_eq!(invalid_field(err), "cell.image_field");

        let err = ColumnConfig::from_toml_str(r#"cell = { kind = "check_box" }"#).unwrap_err();
        assert_eq!(invalid_field(err), "cell.field");

        let err = ColumnConfig::from_toml_str(r#"cell = { kind = "custom" }"#).unwrap_err();
        assert_eq!(invalid_field(err), "cell.kind");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            ColumnConfig::from_toml_str("width = \"wide\""),
            Err(GridError::Toml(_))
        ));
        assert!(matches!(
            ColumnConfig::from_json_str("{ not json"),
            Err(GridError::Json(_))
        ));
    }

    #[test]
    fn test_grid_config_reports_column_position() {
        let err = GridConfig::from_json_str(
            r#"{ "columns": [ { "header_text": "ok" }, { "width": -3 } ] }"#,
        )
        .unwrap_err();
        assert_eq!(invalid_field(err), "columns[1].width");
    }

    #[test]
    fn test_snapshot_rebuilds_equivalent_columns() {
        let column = GridColumn::new();
        column.set_header_text("Done");
        column.set_width(48);
        column.set_max_width(64);
        column.set_cell_binding(Some(Arc::new(CheckBoxCell::new("done"))));
        column.set_editable(true).unwrap();
        column.set_display_index(1);

        let snapshot = GridConfig::snapshot(&[column]).unwrap();
        let text = snapshot.to_toml_string().unwrap();
        let parsed = GridConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, snapshot);

        let rebuilt = &parsed.build_columns().unwrap()[0];
        assert_eq!(rebuilt.header_text(), "Done");
        assert_eq!(rebuilt.width(), 48);
        assert!(!rebuilt.auto_size());
        assert_eq!(rebuilt.max_width(), 64);
        assert!(rebuilt.editable());
        assert_eq!(rebuilt.pending_display_index(), Some(1));
        assert_eq!(
            parsed.columns[0].cell,
            Some(CellConfig::new(CellKind::CheckBox, "done"))
        );
    }

    #[test]
    fn test_default_column_snapshot() {
        let config = GridColumn::new().to_config().unwrap();
        assert_eq!(config.width, AUTO_WIDTH);
        assert_eq!(config.auto_size, Some(true));
        assert_eq!(config.display_index, None);
        assert_eq!(
            config.cell,
            Some(CellConfig {
                kind: CellKind::Text,
                ..CellConfig::default()
            })
        );
        let json = GridConfig { columns: vec![config] }.to_json_string().unwrap();
        assert!(GridConfig::from_json_str(&json).is_ok());
    }

    #[test]
    fn test_column_without_cell_stays_without_cell() {
        let column = GridColumn::new();
        column.set_header_text("Spacer");
        column.set_cell_binding(None);

        let text = GridConfig::snapshot(&[column]).unwrap().to_toml_string().unwrap();
        assert!(text.contains("kind = \"none\""));

        let rebuilt = GridConfig::from_toml_str(&text).unwrap().build_columns().unwrap();
        assert_eq!(rebuilt[0].header_text(), "Spacer");
        assert!(rebuilt[0].cell_binding().is_none());
    }

    #[test]
    fn test_custom_cell_cannot_be_saved() {
        let plain = GridColumn::new();
        let custom = GridColumn::new();
        custom.set_cell_binding(Some(Arc::new(CustomCell::new(|_, _| CellValue::Empty))));

        let err = GridConfig::snapshot(&[plain, custom]).unwrap_err();
        assert_eq!(invalid_field(err), "columns[1].cell.kind");
    }
}
