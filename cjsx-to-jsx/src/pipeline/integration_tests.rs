//! Scenario tests for full pipeline runs.

use crate::core::{SourceUnit, StageKind, StageStatus};
use crate::events::{CollectingEventSink, PipelineEvent};
use crate::execution::InProcessBackend;
use crate::pipeline::{PipelineBuilder, PipelineState};
use crate::stages::{AstRewriteStage, FormatStage, MacroStripStage, StageContext};
use crate::testing::{fixture_stages, transforms, FailingBackend, RecordingBackend, ScriptedBackend};
use pretty_assertions::assert_eq;
use std::path::Path;
use std::sync::Arc;

const SOURCE: &str = "Hello = ->\n  <Greeting name=\"world\" />\n";

fn source() -> SourceUnit {
    SourceUnit::new("app.cjsx", Path::new("/work"), SOURCE)
}

fn context() -> StageContext {
    StageContext::new("/work/app.cjsx", "/work/app.jsx")
}

#[tokio::test]
async fn test_full_run_visits_every_state() {
    let sink = Arc::new(CollectingEventSink::new());
    let pipeline = PipelineBuilder::new()
        .stages(fixture_stages())
        .event_sink(sink.clone())
        .build()
        .unwrap();

    let run = pipeline.run(source(), &context()).await;

    assert_eq!(
        run.states,
        vec![
            PipelineState::MacroStrip,
            PipelineState::DialectConvert,
            PipelineState::AstRewrite,
            PipelineState::Format,
            PipelineState::Done,
        ]
    );
    assert!(run.is_success());
    assert_eq!(run.records.len(), 4);
    assert!(run.records.iter().all(|record| record.status == StageStatus::Ok));

    let output = run.outcome.unwrap();
    assert!(output.text().contains("<Greeting name=\"world\" />"));
    assert!(!output.text().contains("React.createElement"));

    let events = sink.events();
    let names: Vec<&str> = events.iter().map(PipelineEvent::name).collect();
    assert_eq!(names.first(), Some(&"pipeline.started"));
    assert_eq!(names.last(), Some(&"pipeline.completed"));
    assert!(events.iter().all(|event| event.run_id() == run.run_id));
    assert_eq!(sink.events_of_type("stage.completed").len(), 4);
}

#[tokio::test]
async fn test_macro_strip_failure_halts_pipeline() {
    let dialect = Arc::new(RecordingBackend::new(transforms::dialect_convert));
    let [_, _, ast_rewrite, format] = fixture_stages();
    let sink = Arc::new(CollectingEventSink::new());

    let pipeline = PipelineBuilder::new()
        .stage(Arc::new(MacroStripStage::new(Arc::new(FailingBackend::new(
            "Parse error on line 2: unexpected <",
        )))))
        .stage(Arc::new(crate::stages::DialectConvertStage::new(
            dialect.clone(),
            Arc::default(),
        )))
        .stage(ast_rewrite)
        .stage(format)
        .event_sink(sink.clone())
        .build()
        .unwrap();

    let run = pipeline.run(source(), &context()).await;

    assert_eq!(run.final_state(), PipelineState::Failed);
    assert_eq!(run.states, vec![PipelineState::MacroStrip, PipelineState::Failed]);
    assert_eq!(dialect.calls(), 0);

    let failure = run.outcome.unwrap_err();
    assert_eq!(failure.stage, StageKind::MacroStrip);
    assert_eq!(failure.label(), "CJSX Transform");
    assert_eq!(failure.message, "Parse error on line 2: unexpected <");

    assert_eq!(run.records.len(), 1);
    assert_eq!(run.records[0].status, StageStatus::Fail);
    assert_eq!(sink.events_of_type("stage.failed").len(), 1);
    assert_eq!(sink.events_of_type("pipeline.failed").len(), 1);
    assert!(sink.events_of_type("pipeline.completed").is_empty());
}

#[tokio::test]
async fn test_skip_format_output_matches_ast_rewrite() {
    let [macro_strip, dialect, ast_rewrite, format] = fixture_stages();
    let sink = Arc::new(CollectingEventSink::new());
    let pipeline = PipelineBuilder::new()
        .stage(macro_strip.clone())
        .stage(dialect.clone())
        .stage(ast_rewrite.clone())
        .stage(format)
        .skip_format(true)
        .event_sink(sink.clone())
        .build()
        .unwrap();

    let run = pipeline.run(source(), &context()).await;
    assert_eq!(run.states.last(), Some(&PipelineState::Done));
    assert!(!run.states.contains(&PipelineState::Format));
    assert_eq!(
        run.record(StageKind::Format).map(|record| record.status),
        Some(StageStatus::Skip)
    );
    assert_eq!(
        sink.events_of_type("stage.skipped")
            .iter()
            .filter_map(PipelineEvent::stage)
            .collect::<Vec<_>>(),
        vec![StageKind::Format]
    );

    let ctx = context();
    let mut artifact = source().into_artifact();
    for stage in [macro_strip, dialect, ast_rewrite] {
        artifact = stage.run(artifact, &ctx).await.into_result().unwrap();
    }

    assert_eq!(run.outcome.unwrap().text(), artifact.text());
}

#[tokio::test]
async fn test_runs_are_deterministic() {
    let pipeline = PipelineBuilder::new()
        .stages(fixture_stages())
        .build()
        .unwrap();

    let first = pipeline.run(source(), &context()).await.outcome.unwrap();
    let second = pipeline.run(source(), &context()).await.outcome.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_in_process_error_surfaces_verbatim() {
    let [macro_strip, dialect, _, format] = fixture_stages();
    let rewrite = InProcessBackend::new("babel", |_| {
        Err("SyntaxError: Unexpected token (1:9)".to_string())
    });

    let pipeline = PipelineBuilder::new()
        .stage(macro_strip)
        .stage(dialect)
        .stage(Arc::new(AstRewriteStage::new(Arc::new(rewrite))))
        .stage(format)
        .build()
        .unwrap();

    let run = pipeline.run(source(), &context()).await;

    assert_eq!(
        run.states,
        vec![
            PipelineState::MacroStrip,
            PipelineState::DialectConvert,
            PipelineState::AstRewrite,
            PipelineState::Failed,
        ]
    );
    let failure = run.outcome.unwrap_err();
    assert_eq!(failure.label(), "Babel");
    assert_eq!(failure.message, "SyntaxError: Unexpected token (1:9)");
}

#[tokio::test]
async fn test_formatter_output_replaces_artifact_until_it_fails() {
    let [macro_strip, dialect, ast_rewrite, _] = fixture_stages();
    let formatter = Arc::new(
        ScriptedBackend::new()
            .then_ok("const Hello = () => <Greeting name=\"world\" />;\n")
            .then_err("[error] app.jsx: SyntaxError: Unexpected token (2:1)"),
    );

    let pipeline = PipelineBuilder::new()
        .stage(macro_strip)
        .stage(dialect)
        .stage(ast_rewrite)
        .stage(Arc::new(FormatStage::new(formatter.clone(), Arc::default())))
        .build()
        .unwrap();

    let first = pipeline.run(source(), &context()).await;
    assert_eq!(
        first.outcome.unwrap().text(),
        "const Hello = () => <Greeting name=\"world\" />;\n"
    );

    let second = pipeline.run(source(), &context()).await;
    assert_eq!(second.final_state(), PipelineState::Failed);
    let failure = second.outcome.unwrap_err();
    assert_eq!(failure.stage, StageKind::Format);
    assert_eq!(failure.message, "[error] app.jsx: SyntaxError: Unexpected token (2:1)");
    assert_eq!(formatter.remaining(), 0);
}
