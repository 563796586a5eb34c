//! Map file and report serialization
//!
//! Maps are stored as RON (the analyzer's native format) or JSON, picked by
//! file extension. Analysis reports are always JSON so downstream tooling
//! can consume them without a RON parser.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::{MapAnalysis, PlayArea};
use crate::errors::{AnalyzerError, Result};

/// A complete map on disk: walkability, heights, play area
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapFile {
    pub name: String,
    pub width: usize,
    pub height: usize,
    pub play_area: PlayArea,
    /// Row-major, 1 = pathable ground
    pub walkable: Vec<u8>,
    /// Row-major raw terrain height
    pub heights: Vec<u8>,
}

impl MapFile {
    /// Load a map, validating grid sizes against the declared dimensions
    pub fn load(path: &str) -> Result<MapFile> {
        let contents = fs::read_to_string(path)?;

        let map: MapFile = if Path::new(path).extension().is_some_and(|e| e == "json") {
            serde_json::from_str(&contents)?
        } else {
            ron::from_str(&contents)?
        };

        let cells = map.width * map.height;
        if map.walkable.len() != cells || map.heights.len() != cells {
            return Err(AnalyzerError::map_loading(format!(
                "map '{}' declares {}x{} but carries {} walkable / {} height cells",
                map.name,
                map.height,
                map.width,
                map.walkable.len(),
                map.heights.len()
            )));
        }

        info!(name = %map.name, width = map.width, height = map.height, "map loaded");
        Ok(map)
    }

    /// Save the map, format picked by extension (`.json` or RON default)
    pub fn save(&self, path: &str) -> Result<()> {
        let contents = if Path::new(path).extension().is_some_and(|e| e == "json") {
            serde_json::to_string(self)?
        } else {
            ron::to_string(self).map_err(AnalyzerError::from)?
        };
        fs::write(path, contents)?;
        Ok(())
    }

    /// Pathfinding weight grid derived from walkability: 1.0 on ground,
    /// unpathable elsewhere
    pub fn weight_grid(&self) -> Vec<f32> {
        self.walkable
            .iter()
            .map(|&cell| if cell == 1 { 1.0 } else { f32::INFINITY })
            .collect()
    }
}

/// Analysis results paired with the map they came from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub map_name: String,
    pub width: usize,
    pub height: usize,
    pub analysis: MapAnalysis,
}

impl AnalysisReport {
    pub fn new(map: &MapFile, analysis: MapAnalysis) -> Self {
        Self {
            map_name: map.name.clone(),
            width: map.width,
            height: map.height,
            analysis,
        }
    }

    /// Write the report as JSON
    pub fn save(&self, path: &str) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        info!(path, "analysis report written");
        Ok(())
    }
}
