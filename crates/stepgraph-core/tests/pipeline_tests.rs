mod common;

use std::path::PathBuf;

use common::{create_recipe_dir, create_test_pipeline, tea_recordings, write_file};
use stepgraph_core::{
    load_recordings, CoreError, CurationTables, DisambiguationSource, ExampleType, ExceptionSource,
    Payload, PipelineBuilder, RecordedStep, Recording, ViolationKind,
};

fn step_ids(payload: &Payload) -> Vec<i64> {
    match payload {
        Payload::Next { next_steps } => next_steps.iter().map(|s| s.step_id).collect(),
        Payload::Missing { missing_steps } => missing_steps.iter().map(|s| s.step_id).collect(),
        _ => panic!("payload has no steps"),
    }
}

#[test]
fn test_complete_pipeline_run() {
    let (_temp_dir, pipeline) = create_test_pipeline();

    let output = pipeline
        .run(tea_recordings())
        .expect("Failed to run pipeline");

    assert!(output.report.is_empty(), "{:?}", output.report);
    assert_eq!(output.examples.len(), 15);

    let counts = output.examples.counts();
    assert_eq!(counts.get(&ExampleType::Next), Some(&7));
    assert_eq!(counts.get(&ExampleType::Missing), Some(&7));
    assert_eq!(counts.get(&ExampleType::Timing), Some(&1));
    assert_eq!(output.examples.validate_end_times(), 0);
}

#[test]
fn test_clean_recording_examples() {
    let (_temp_dir, pipeline) = create_test_pipeline();
    let recording = tea_recordings().remove(0);

    let outcome = pipeline
        .process_recording(recording)
        .expect("Failed to process recording");

    let question_ids: Vec<&str> = outcome
        .examples
        .iter()
        .map(|e| e.question_id.as_str())
        .collect();
    assert_eq!(
        question_ids,
        vec![
            "1_1_1_next",
            "1_1_1_missing",
            "1_1_2_next",
            "1_1_2_missing",
            "1_1_3_next",
            "1_1_3_missing",
            "1_1_4_next",
            "1_1_4_missing",
            "1_1_4_timing",
        ]
    );

    // Boiled water: adding leaves is the only step whose prerequisites hold
    assert_eq!(step_ids(&outcome.examples[0].payload), vec![2]);
    // Poured: only END remains, and END is never reported
    assert!(step_ids(&outcome.examples[6].payload).is_empty());

    let timing = &outcome.examples[8];
    assert_eq!(timing.end_time, "00:00:50");
    assert_eq!(timing.previous_steps.len(), 3);
    assert!(matches!(
        &timing.payload,
        Payload::Timing { error_description } if error_description == "Poured before steeping finished"
    ));
    assert!(!timing.is_noisy);
}

#[test]
fn test_skipped_step_is_reported_missing() {
    let (_temp_dir, pipeline) = create_test_pipeline();
    let recording = tea_recordings().remove(1);

    let outcome = pipeline
        .process_recording(recording)
        .expect("Failed to process recording");

    assert!(outcome.violations.is_empty());
    assert_eq!(outcome.examples.len(), 6);

    // After adding leaves, boiling is still a valid next step
    assert_eq!(outcome.examples[0].question_id, "1_2_2_next");
    assert_eq!(step_ids(&outcome.examples[0].payload), vec![1]);
    assert!(step_ids(&outcome.examples[1].payload).is_empty());

    // Once steeping happened, boiling can only have been skipped
    assert_eq!(outcome.examples[3].question_id, "1_2_3_missing");
    assert_eq!(step_ids(&outcome.examples[3].payload), vec![1]);

    // The placeholder never enters the history
    let previous: Vec<i64> = outcome.examples[3]
        .previous_steps
        .iter()
        .map(|s| s.step_id)
        .collect();
    assert_eq!(previous, vec![2]);
}

#[test]
fn test_unidentified_step_is_aligned_by_description() {
    let (_temp_dir, pipeline) = create_test_pipeline();
    let recording = Recording {
        recording_id: "1_9".to_string(),
        activity_id: 1,
        activity_name: "Make Tea".to_string(),
        step_annotations: vec![
            RecordedStep::new(1, "Boil-Boil water", 1.0, 9.0),
            RecordedStep::new(-1, "Add-Add tea leaves", 10.0, 20.0),
            RecordedStep::new(3, "Steep-Steep tea", 25.0, 40.0),
        ],
    };

    let outcome = pipeline
        .process_recording(recording)
        .expect("Failed to process recording");

    let question_ids: Vec<&str> = outcome
        .examples
        .iter()
        .map(|e| e.question_id.as_str())
        .collect();
    assert_eq!(
        question_ids,
        vec![
            "1_9_1_next",
            "1_9_1_missing",
            "1_9_2_next",
            "1_9_2_missing",
            "1_9_3_next",
            "1_9_3_missing",
        ]
    );
    // adding leaves was performed, so nothing is missing after steeping
    assert!(step_ids(&outcome.examples[5].payload).is_empty());
}

#[test]
fn test_prepared_recording_keeps_single_start_step() {
    let (_temp_dir, pipeline) = create_test_pipeline();
    let prepared = tea_recordings().remove(0).with_start_step();
    assert!(prepared.has_start_step());

    let (aligned, violations) = pipeline
        .align_and_audit(prepared)
        .expect("Failed to align prepared recording");
    assert!(violations.is_empty());
    assert!(!aligned.has_start_step());
    assert_eq!(aligned.step_annotations.len(), 4);
}

#[test]
fn test_start_next_is_opt_in() {
    let temp_dir = create_recipe_dir();
    let recording = Recording {
        recording_id: "1_3".to_string(),
        activity_id: 1,
        activity_name: "Make Tea".to_string(),
        step_annotations: vec![
            RecordedStep::new(1, "Boil-Boil water", 6.0, 15.0),
            RecordedStep::new(2, "Add-Add tea leaves", 16.0, 25.0),
        ],
    };

    let default = PipelineBuilder::new()
        .with_recipe_dir(temp_dir.path())
        .with_curation(CurationTables::default())
        .build()
        .expect("Failed to create pipeline");
    let outcome = default.process_recording(recording.clone()).unwrap();
    assert!(outcome.examples.iter().all(|e| e.current_step.step_id != -1));

    let with_start = PipelineBuilder::new()
        .with_recipe_dir(temp_dir.path())
        .with_curation(CurationTables::default())
        .include_start_next(true)
        .build()
        .expect("Failed to create pipeline");
    let outcome = with_start.process_recording(recording).unwrap();
    let first = &outcome.examples[0];
    assert_eq!(first.question_id, "1_3_-1_next");
    assert_eq!(first.end_time, "00:00:06");
    assert_eq!(step_ids(&first.payload), vec![1, 2]);
}

#[test]
fn test_unknown_activity_aborts() {
    let (_temp_dir, pipeline) = create_test_pipeline();
    let mut recording = tea_recordings().remove(0);
    recording.activity_name = "Make Coffee".to_string();

    let result = pipeline.process_recording(recording);
    assert!(matches!(result, Err(CoreError::UnknownActivity { ref name }) if name == "Make Coffee"));
}

#[test]
fn test_unknown_description_aborts() {
    let (_temp_dir, pipeline) = create_test_pipeline();
    let mut recording = tea_recordings().remove(0);
    recording.step_annotations[0].description = "Stir-Stir with spoon".to_string();

    let result = pipeline.run(vec![recording]);
    assert!(matches!(result, Err(CoreError::DescriptionNotFound { .. })));
}

#[test]
fn test_duplicate_recording_ids_rejected() {
    let (_temp_dir, pipeline) = create_test_pipeline();
    let first = tea_recordings().remove(0);
    let second = first.clone();

    let result = pipeline.run(vec![first, second]);
    assert!(matches!(result, Err(CoreError::DuplicateExampleId { ref id }) if id == "1_1_1_next"));
}

#[test]
fn test_audit_reports_annotation_problems() {
    let (_temp_dir, pipeline) = create_test_pipeline();
    let recording = Recording {
        recording_id: "1_4".to_string(),
        activity_id: 1,
        activity_name: "Make Tea".to_string(),
        step_annotations: vec![
            RecordedStep::new(1, "Boil-Boil water", 1.0, 9.0),
            RecordedStep::new(2, "Add-Add tea leaves", 10.0, 20.0)
                .with_error(stepgraph_core::ErrorTag::MissingStep, "annotated twice"),
            RecordedStep::new(3, "Steep-Steep tea", 21.0, 30.0),
            RecordedStep::new(3, "Steep-Steep tea", 31.0, 40.0),
            RecordedStep::new(4, "Pour-Pour into cup", -1.0, -1.0),
        ],
    };

    let report = pipeline.audit(vec![recording]).expect("Failed to audit");
    let kinds = report.counts_by_kind();
    assert_eq!(kinds.get(&ViolationKind::TimedMissingStep), Some(&1));
    assert_eq!(kinds.get(&ViolationKind::UntaggedMissingStep), Some(&1));
    assert_eq!(kinds.get(&ViolationKind::DuplicateStepId), Some(&1));
    assert_eq!(report.len(), 3);
}

#[test]
fn test_repeated_unique_steps_can_be_allowed() {
    let temp_dir = create_recipe_dir();
    let tables = CurationTables {
        allow_repeated_unique_steps: true,
        ..CurationTables::default()
    };
    let pipeline = PipelineBuilder::new()
        .with_recipe_dir(temp_dir.path())
        .with_curation(tables)
        .build()
        .expect("Failed to create pipeline");

    let recording = Recording {
        recording_id: "1_5".to_string(),
        activity_id: 1,
        activity_name: "Make Tea".to_string(),
        step_annotations: vec![
            RecordedStep::new(1, "Boil-Boil water", 1.0, 9.0),
            RecordedStep::new(1, "Boil-Boil water", 10.0, 19.0),
        ],
    };
    let report = pipeline.audit(vec![recording]).expect("Failed to audit");
    assert!(report.is_empty());
}

#[test]
fn test_load_recordings_from_file() {
    let temp_dir = create_recipe_dir();
    write_file(temp_dir.path(), "recordings.json", common::TEA_RECORDINGS);

    let recordings = load_recordings(temp_dir.path().join("recordings.json")).unwrap();
    assert_eq!(recordings.len(), 2);
    assert_eq!(recordings[1].step_annotations.len(), 4);

    let missing = temp_dir.path().join("absent.json");
    assert!(matches!(
        load_recordings(missing),
        Err(CoreError::FileSystem { .. })
    ));
}

#[test]
fn test_invalid_recipe_aborts_loading() {
    let temp_dir = create_recipe_dir();
    write_file(
        temp_dir.path(),
        "loop.json",
        r#"{"steps": {"0": "START", "1": "A-A", "2": "B-B"}, "edges": [[0, 1], [1, 2], [2, 1]]}"#,
    );

    let result = PipelineBuilder::new()
        .with_recipe_dir(temp_dir.path())
        .with_curation(CurationTables::default())
        .build();
    assert!(matches!(result, Err(CoreError::CyclicGraph { .. })));
}

#[test]
fn test_builder_requires_recipes() {
    let result = PipelineBuilder::new()
        .with_curation(CurationTables::default())
        .build();
    assert!(matches!(result, Err(CoreError::Configuration { .. })));
}

#[test]
fn test_shipped_curation_tables() {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "..", "..", "config", "curation.json"]
        .iter()
        .collect();
    let tables = CurationTables::load(path).expect("Failed to load shipped curation tables");

    // id queues are only meaningful next to the dataset's step id offsets
    assert!(tables.disambiguation.is_empty());
    assert_eq!(tables.ids_for(2, 5), None);
    assert!(tables.allows_simultaneous(16, "16_1"));
    assert!(tables.allows_order_error("13_41", 4));
    assert!(tables.allows_repeat("10_42", 3, 2));
    assert!(tables.allows_repeated_unique_steps());
}
