//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::capture::{acquire_frames, load_capture};
use serde_json::{Value, json};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use swinglab_core::{
    BatchReport, Category, MetricKind, SwingAnalysis, SwingAnalyzer, SwingError, SwingPhase,
};

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

fn print_json(output: &Value) -> Result<(), SwingError> {
    let text = serde_json::to_string_pretty(output)
        .map_err(|e| SwingError::Serialization(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

/// Analysis as JSON, with the letter grade alongside the scores.
pub fn analysis_json(analysis: &SwingAnalysis) -> Result<Value, SwingError> {
    let mut value =
        serde_json::to_value(analysis).map_err(|e| SwingError::Serialization(e.to_string()))?;
    if let Some(map) = value.as_object_mut() {
        map.insert("grade".to_string(), json!(analysis.scores.grade()));
    }
    Ok(value)
}

fn print_analysis(file: &Path, analysis: &SwingAnalysis) {
    let scores = &analysis.scores;

    println!("Swing Analysis: {}", file.display());
    println!("==============");
    println!(
        "Frames: {} ({:.2}s)    Confidence: {:.1}",
        analysis.frame_count, analysis.duration_secs, analysis.confidence
    );
    println!();

    println!("Scores");
    for category in Category::ALL {
        println!("  {:<10} {:>6.1}", category.name(), scores.get(category));
    }
    println!(
        "  {:<10} {:>6.1}  ({})",
        "overall",
        scores.overall,
        scores.grade()
    );
    println!();

    println!("Phases ({:?})", analysis.phases.detection);
    for (phase, range) in SwingPhase::ALL.iter().zip(analysis.phases.ranges()) {
        println!("  {:<15} [{}, {})", phase.name(), range.start, range.end);
    }
    println!();

    println!("Metrics");
    for kind in MetricKind::ALL {
        match analysis.metrics.get(kind) {
            Some(value) => println!("  {:<22} {:>8.2}", kind.name(), value),
            None => println!("  {:<22} {:>8}", kind.name(), "undefined"),
        }
    }
    println!();

    let recs = &analysis.recommendations;
    println!("Priority: {}", recs.priority_level.as_str());
    print_list("Strengths", &recs.strengths);
    print_list("Areas for improvement", &recs.areas_for_improvement);
    print_list("Recommendations", &recs.specific_recommendations);
    print_list("Practice drills", &recs.practice_drills);
    print_list("Key insights", &recs.key_insights);
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{}:", title);
    for item in items {
        println!("  - {}", item);
    }
}

// =============================================================================
// ANALYZE COMMAND
// =============================================================================

/// Analyze one capture file.
pub fn cmd_analyze(
    analyzer: &SwingAnalyzer,
    json_mode: bool,
    file: &Path,
) -> Result<(), SwingError> {
    let capture = load_capture(file)?;
    let analysis = match capture.video {
        Some(video) => analyzer.analyze_video(&video, capture.frames)?,
        None => analyzer.analyze(capture.frames)?,
    };

    tracing::info!(
        overall = analysis.scores.overall,
        confidence = analysis.confidence,
        "Analyzed {:?}",
        file
    );

    if json_mode {
        return print_json(&analysis_json(&analysis)?);
    }

    print_analysis(file, &analysis);
    Ok(())
}

// =============================================================================
// BATCH COMMAND
// =============================================================================

/// Analyze `files` in order, optionally on the blocking pool.
///
/// Results always come back in input order, one slot per file.
pub async fn run_batch(
    analyzer: Arc<SwingAnalyzer>,
    files: Vec<PathBuf>,
    parallel: bool,
) -> BatchReport {
    if !parallel {
        return analyzer.analyze_batch(files.iter().map(|file| acquire_frames(file)));
    }

    let handles: Vec<_> = files
        .into_iter()
        .map(|file| {
            let analyzer = Arc::clone(&analyzer);
            tokio::task::spawn_blocking(move || {
                acquire_frames(&file).and_then(|frames| analyzer.analyze(frames))
            })
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let outcome = handle.await.unwrap_or_else(|e| {
            Err(SwingError::UpstreamAcquisition(format!(
                "Analysis worker failed: {}",
                e
            )))
        });
        results.push(outcome);
    }

    BatchReport::from_results(results)
}

/// Batch report as JSON.
pub fn batch_json(files: &[PathBuf], report: &BatchReport) -> Result<Value, SwingError> {
    let results = report
        .results()
        .iter()
        .zip(files)
        .enumerate()
        .map(|(index, (result, file))| {
            Ok(match result {
                Ok(analysis) => json!({
                    "index": index,
                    "file": file.to_string_lossy(),
                    "status": "ok",
                    "analysis": analysis_json(analysis)?,
                }),
                Err(e) => json!({
                    "index": index,
                    "file": file.to_string_lossy(),
                    "status": "error",
                    "error": e.to_string(),
                }),
            })
        })
        .collect::<Result<Vec<Value>, SwingError>>()?;

    Ok(json!({
        "total_processed": report.total_processed(),
        "successful": report.successful(),
        "failed": report.failed(),
        "results": results,
    }))
}

/// Analyze several capture files.
pub async fn cmd_batch(
    analyzer: SwingAnalyzer,
    json_mode: bool,
    files: Vec<PathBuf>,
    parallel: bool,
) -> Result<(), SwingError> {
    tracing::info!("Batch of {} captures (parallel: {})", files.len(), parallel);

    let report = run_batch(Arc::new(analyzer), files.clone(), parallel).await;

    if json_mode {
        return print_json(&batch_json(&files, &report)?);
    }

    println!("Batch Analysis");
    println!("==============");
    for (index, (result, file)) in report.results().iter().zip(&files).enumerate() {
        match result {
            Ok(analysis) => println!(
                "  [{}] {}  overall {:.1} ({})  confidence {:.1}",
                index,
                file.display(),
                analysis.scores.overall,
                analysis.scores.grade(),
                analysis.confidence
            ),
            Err(e) => println!("  [{}] {}  error: {}", index, file.display(), e),
        }
    }
    println!();
    println!(
        "Processed: {}    Successful: {}    Failed: {}",
        report.total_processed(),
        report.successful(),
        report.failed()
    );

    Ok(())
}

// =============================================================================
// RULES COMMAND
// =============================================================================

/// Show the scoring rule table and model attachments.
pub fn cmd_rules(analyzer: &SwingAnalyzer, json_mode: bool) -> Result<(), SwingError> {
    let rules = analyzer.scoring().rules();
    let info = analyzer.model_info();
    let config = analyzer.config();

    if json_mode {
        let output = json!({
            "model_version": info.model_version,
            "analyzer": config,
            "rules": rules,
            "models": info.models,
        });
        return print_json(&output);
    }

    println!("Scoring Rules (model version {})", info.model_version);
    println!("=============");
    println!("Base score: {}", rules.base());
    println!(
        "Visibility threshold: > {}    Downswing speed threshold: {}",
        config.min_visibility, config.downswing_speed_threshold
    );

    for category in Category::ALL {
        println!();
        match info.models.get(&category).and_then(Option::as_deref) {
            Some(name) => println!("{} (model: {}, rules below are bypassed)", category, name),
            None => println!("{} (rule table)", category),
        }
        for rule in rules.rules_for(category) {
            for tier in &rule.tiers {
                println!(
                    "  {:<22} {:<16} +{}",
                    rule.metric.name(),
                    tier.condition.to_string(),
                    tier.bonus
                );
            }
        }
    }

    Ok(())
}
