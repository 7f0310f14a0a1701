//! IT asset inventory records and their table columns.

use std::fmt;
use std::fs;
use std::path::Path;

use chrono::NaiveDateTime;
use datagrid::{CellValue, Column, TableRow};
use serde::Deserialize;

use crate::error::DemoError;

/// Inventory bundled with the binary, used when no file is given.
const BUNDLED: &str = include_str!("../data/assets.json");

/// Lifecycle status of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetStatus {
    Disponible,
    Asignado,
    EnReparacion,
    DeBaja,
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Disponible => "Disponible",
            Self::Asignado => "Asignado",
            Self::EnReparacion => "En reparación",
            Self::DeBaja => "De baja",
        })
    }
}

/// A tracked IT asset.
#[derive(Debug, Clone, Deserialize)]
pub struct Asset {
    pub id: u32,
    pub serial: String,
    pub kind: String,
    pub model: String,
    pub assignee: Option<String>,
    pub area: Option<String>,
    pub status: AssetStatus,
    pub purchased_at: NaiveDateTime,
}

impl TableRow for Asset {
    type Key = u32;

    fn key(&self) -> u32 {
        self.id
    }
}

/// Where the inventory comes from.
#[derive(Debug, Clone)]
pub enum Source {
    Bundled,
    File(String),
}

impl Source {
    /// Load the full inventory.
    pub fn fetch(&self) -> Result<Vec<Asset>, DemoError> {
        let json = match self {
            Self::Bundled => BUNDLED.to_string(),
            Self::File(path) => fs::read_to_string(Path::new(path))?,
        };
        let assets: Vec<Asset> = serde_json::from_str(&json)?;
        log::debug!("Loaded {} assets from {:?}", assets.len(), self);
        Ok(assets)
    }
}

pub fn columns() -> Vec<Column<Asset>> {
    vec![
        Column::new("serial", "Serial", |a: &Asset| CellValue::from(&a.serial)).sortable(),
        Column::new("kind", "Tipo", |a: &Asset| CellValue::from(&a.kind)).sortable(),
        Column::new("model", "Modelo", |a: &Asset| CellValue::from(&a.model)),
        Column::new("assignee", "Responsable", |a: &Asset| {
            CellValue::from(a.assignee.as_deref())
        })
        .sortable()
        .render_with(|value, _| {
            if value.is_empty() { "—".to_string() } else { value.to_string() }
        }),
        Column::new("area", "Área", |a: &Asset| CellValue::from(a.area.as_deref())),
        Column::new("status", "Estado", |a: &Asset| CellValue::from(a.status.to_string()))
            .sortable(),
        Column::new("purchased_at", "Compra", |a: &Asset| {
            CellValue::from(a.purchased_at)
        })
        .sortable()
        .filterable(false)
        .render_with(|_, a| a.purchased_at.format("%d/%m/%Y").to_string()),
    ]
}
