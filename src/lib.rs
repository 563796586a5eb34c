pub mod analysis;
pub mod errors;
pub mod pathfinding;
pub mod serialization;

pub use analysis::{analyze_map, Choke, MapAnalysis, PlayArea, LEVEL_DIFFERENCE};

pub use errors::{AnalyzerError, Result};

pub use pathfinding::{astar, astar_with_teleport, nodes_within_distance};

pub use serialization::{AnalysisReport, MapFile};
