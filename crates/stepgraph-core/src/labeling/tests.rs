use super::*;
use crate::{
    models::{RecordedStep, SYNTHETIC_START_ID},
    trace::TraceBuilder,
};

/// 0 → 1 → 2 → 3 → 4(END)
fn recipe() -> RecipeGraph {
    RecipeGraph::new(
        [
            (0, "START"),
            (1, "Take-Take a mug"),
            (2, "Add-Add coffee"),
            (3, "Pour-Pour water"),
            (4, "END"),
        ],
        [(0, 1), (1, 2), (2, 3), (3, 4)],
    )
    .unwrap()
}

fn context(graph: &RecipeGraph) -> RecordingContext<'_> {
    RecordingContext {
        graph,
        recording_id: "3_9",
        activity_name: "Coffee",
    }
}

fn question_ids(examples: &[LabeledExample]) -> Vec<&str> {
    examples.iter().map(|e| e.question_id.as_str()).collect()
}

fn steps() -> Vec<RecordedStep> {
    vec![
        RecordedStep::new(SYNTHETIC_START_ID, "Start-Start cooking.", 0.0, 6.0),
        RecordedStep::new(1, "Take-Take a mug", 6.0, 12.0),
        RecordedStep::new(2, "Add-Add coffee", -1.0, -1.0)
            .with_error(ErrorTag::MissingStep, "Skipped this step"),
        RecordedStep::new(3, "Pour-Pour water", 14.0, 30.0)
            .with_error(ErrorTag::OrderError, "Poured before adding coffee")
            .with_error(ErrorTag::TemperatureError, "Water was cold"),
    ]
}

#[test]
fn test_generates_next_missing_and_error_questions() {
    let graph = recipe();
    let points = TraceBuilder::new().build(&steps());
    let examples = ExampleGenerator::new().generate(&context(&graph), &points);

    assert_eq!(
        question_ids(&examples),
        vec![
            "3_9_1_next",
            "3_9_1_missing",
            "3_9_3_next",
            "3_9_3_missing",
            "3_9_3_order",
            "3_9_3_temperature",
        ]
    );

    let pour_missing = &examples[3];
    match &pour_missing.payload {
        Payload::Missing { missing_steps } => {
            assert_eq!(missing_steps.len(), 1);
            assert_eq!(missing_steps[0].step_id, 2);
        }
        other => panic!("unexpected payload {other:?}"),
    }
    assert_eq!(pour_missing.end_time, "00:00:30");
    assert_eq!(pour_missing.previous_steps.len(), 1);

    match &examples[5].payload {
        Payload::Temperature { error_description } => {
            assert_eq!(error_description, "Water was cold")
        }
        other => panic!("unexpected payload {other:?}"),
    }
}

#[test]
fn test_last_step_has_empty_next() {
    let graph = recipe();
    let points = TraceBuilder::new().build(&steps());
    let examples = ExampleGenerator::new().generate(&context(&graph), &points);
    match &examples[2].payload {
        Payload::Next { next_steps } => assert!(next_steps.is_empty()),
        other => panic!("unexpected payload {other:?}"),
    }
}

#[test]
fn test_start_point_is_opt_in() {
    let graph = recipe();
    let points = TraceBuilder::new().build(&steps());

    let default = ExampleGenerator::new().generate(&context(&graph), &points);
    assert!(default.iter().all(|e| e.current_step.step_id != SYNTHETIC_START_ID));

    let with_start = ExampleGenerator::new()
        .with_start_next(true)
        .generate(&context(&graph), &points);
    let first = &with_start[0];
    assert_eq!(first.question_id, "3_9_-1_next");
    match &first.payload {
        Payload::Next { next_steps } => {
            let ids: Vec<i64> = next_steps.iter().map(|s| s.step_id).collect();
            assert_eq!(ids, graph.roots());
        }
        other => panic!("unexpected payload {other:?}"),
    }
}

#[test]
fn test_overlapping_points_emit_nothing() {
    let graph = recipe();
    let steps = vec![
        RecordedStep::new(1, "Take-Take a mug", 6.0, 30.0),
        RecordedStep::new(2, "Add-Add coffee", 10.0, 40.0),
    ];
    let points = TraceBuilder::new().build(&steps);
    assert!(points[0].is_overlapping);
    let examples = ExampleGenerator::new().generate(&context(&graph), &points);
    assert_eq!(question_ids(&examples), vec!["3_9_2_next", "3_9_2_missing"]);
    // the overlapping step still forms history
    assert_eq!(examples[0].previous_steps[0].step_id, 1);
}

#[test]
fn test_repeated_step_keeps_first_question() {
    let graph = recipe();
    let steps = vec![
        RecordedStep::new(1, "Take-Take a mug", 6.0, 12.0),
        RecordedStep::new(2, "Add-Add coffee", 14.0, 20.0),
        RecordedStep::new(1, "Take-Take a mug", 22.0, 30.0),
    ];
    let points = TraceBuilder::new().build(&steps);
    let examples = ExampleGenerator::new().generate(&context(&graph), &points);
    let next_for_one: Vec<&LabeledExample> = examples
        .iter()
        .filter(|e| e.question_id == "3_9_1_next")
        .collect();
    assert_eq!(next_for_one.len(), 1);
    assert!(next_for_one[0].previous_steps.is_empty());
}

#[test]
fn test_noise_excludes_tags_per_type() {
    let graph = recipe();
    let steps = vec![
        RecordedStep::new(1, "Take-Take a mug", 6.0, 12.0)
            .with_error(ErrorTag::MissingStep, "annotated on an observed step"),
        RecordedStep::new(3, "Pour-Pour water", 14.0, 30.0),
    ];
    // the tagged first step is a placeholder and never enters history
    let points = TraceBuilder::new().build(&steps);
    let examples = ExampleGenerator::new().generate(&context(&graph), &points);
    assert!(examples.iter().all(|e| !e.is_noisy));

    let steps = vec![
        RecordedStep::new(1, "Take-Take a mug", 6.0, 12.0)
            .with_error(ErrorTag::OrderError, "out of order"),
        RecordedStep::new(2, "Add-Add coffee", 14.0, 30.0)
            .with_error(ErrorTag::OrderError, "out of order"),
    ];
    let points = TraceBuilder::new().build(&steps);
    let examples = ExampleGenerator::new().generate(&context(&graph), &points);
    let noisy: Vec<(&str, bool)> = examples
        .iter()
        .filter(|e| e.current_step.step_id == 2)
        .map(|e| (e.kind().as_str(), e.is_noisy))
        .collect();
    assert_eq!(
        noisy,
        vec![("next", true), ("missing", true), ("order", false)]
    );
}

#[test]
fn test_canned_error_description() {
    let step = RecordedStep::new(2, "Add-Add coffee", 14.0, 30.0);
    assert_eq!(
        error_description(&step, &ErrorTag::TimingError),
        "This step does not contain any timing errors."
    );
}

#[test]
fn test_example_set_rejects_duplicate_question_ids() {
    let graph = recipe();
    let points = TraceBuilder::new().build(&steps());
    let examples = ExampleGenerator::new().generate(&context(&graph), &points);

    let mut set = ExampleSet::new();
    set.extend(examples.clone()).unwrap();
    assert_eq!(set.len(), 6);
    assert_eq!(set.counts()[&ExampleType::Next], 2);
    assert_eq!(set.validate_end_times(), 0);

    let result = set.insert(examples[0].clone());
    assert!(matches!(result, Err(CoreError::DuplicateExampleId { .. })));
    assert_eq!(set.len(), 6);
}

#[test]
fn test_parse_hhmmss() {
    assert_eq!(parse_hhmmss("01:02:05"), Some(3725));
    assert_eq!(parse_hhmmss("-00:00:05"), Some(-5));
    assert_eq!(parse_hhmmss("1:2"), None);
    assert_eq!(parse_hhmmss("aa:00:00"), None);
}
