use std::{fs, path::Path};

use stepgraph_core::{CurationTables, Pipeline, PipelineBuilder, Recording};
use tempfile::TempDir;

/// Tea recipe: boiling water and adding leaves are independent, both
/// precede steeping.
pub const TEA_RECIPE: &str = r#"{
    "steps": {
        "0": "START",
        "1": "Boil-Boil water",
        "2": "Add-Add tea leaves",
        "3": "Steep-Steep tea",
        "4": "Pour-Pour into cup",
        "5": "END"
    },
    "edges": [[0, 1], [0, 2], [1, 3], [2, 3], [3, 4], [4, 5]]
}"#;

/// Two recordings of "Make Tea": a clean one and one that skips boiling.
pub const TEA_RECORDINGS: &str = r#"[
    {
        "recording_id": "1_1",
        "activity_id": 1,
        "activity_name": "Make Tea",
        "step_annotations": [
            {"step_id": 3, "description": "Steep-Steep tea", "start_time": 25.0, "end_time": 40.0},
            {"step_id": 1, "description": "Boil-Boil water", "start_time": 1.0, "end_time": 9.0},
            {
                "step_id": 4,
                "description": "Pour-Pour into cup",
                "start_time": 45.0,
                "end_time": 50.0,
                "errors": [{"tag": "Timing Error", "description": "Poured before steeping finished"}]
            },
            {"step_id": 2, "description": "Add-Add tea leaves", "start_time": 10.0, "end_time": 20.0}
        ]
    },
    {
        "recording_id": "1_2",
        "activity_id": 1,
        "activity_name": "Make Tea",
        "step_annotations": [
            {"step_id": 2, "description": "Add-Add tea leaves", "start_time": 0.0, "end_time": 8.0},
            {"step_id": 3, "description": "Steep-Steep tea", "start_time": 10.0, "end_time": 20.0},
            {"step_id": 4, "description": "Pour-Pour into cup", "start_time": 25.0, "end_time": 30.0},
            {
                "step_id": 1,
                "description": "Boil-Boil water",
                "start_time": -1.0,
                "end_time": -1.0,
                "errors": [{"tag": "Missing Step", "description": "Water was never boiled"}]
            }
        ]
    }
]"#;

/// Helper function to create a recipe directory holding the tea recipe
pub fn create_recipe_dir() -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    write_file(temp_dir.path(), "maketea.json", TEA_RECIPE);
    temp_dir
}

pub fn write_file(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).expect("Failed to write fixture");
}

/// Helper function to create a pipeline over the tea recipe
pub fn create_test_pipeline() -> (TempDir, Pipeline) {
    let temp_dir = create_recipe_dir();
    let pipeline = PipelineBuilder::new()
        .with_recipe_dir(temp_dir.path())
        .with_curation(CurationTables::default())
        .build()
        .expect("Failed to create pipeline");
    (temp_dir, pipeline)
}

pub fn tea_recordings() -> Vec<Recording> {
    serde_json::from_str(TEA_RECORDINGS).expect("Failed to parse recordings")
}
