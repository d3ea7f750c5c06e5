//! Content gate integration tests
//!
//! End-to-end behavior of the aggregate gate over realistic documents.

use std::sync::Arc;

use guidegate::gate::{check_workout_coverage, find_workout_files, CheckDetails};
use guidegate::{
    evaluate_document, AggregateGate, CheckName, ContentType, GateSpec, PhraseSets, Severity,
};

const RESEARCH_DOC: &str = "\
## OVERVIEW
Unbound 200 is 200 miles of Flint Hills gravel. Most riders finish in 14 hours. Don't start too fast.

## COURSE
The first real test comes at mile 42. Plan for 11,000 feet of climbing. You'll hit the Teterville rollers at mile 80.

## WEATHER
Expect 95 degrees by 2pm. In 2023, 38% of starters did not finish.

## TERRAIN
u/gravelgrinder said \"the chunk at mile 120 ate my tires\". Skip the 32mm tires.

## LOGISTICS
Check-in closes at 5pm. Sources: https://www.reddit.com/r/gravelcycling/comments/abc, https://www.youtube.com/watch?v=xyz, https://unboundgravel.com/race-info

## RIDER INTEL
You will suffer. Your legs will quit before your head. Bottom line: eat 90 grams of carbs per hour.
";

fn guide_of_size(bytes: usize) -> String {
    let mut doc = String::from(
        "## Race Overview\n## Course Breakdown\n## Training Plan\n## Fueling Strategy\n\
         ## Pacing Strategy\n## Equipment\n## Race Week\n## Race Day\n",
    );
    let filler = "Ride the first 60 miles at 70% of threshold and eat every 20 minutes.\n";
    while doc.len() < bytes {
        doc.push_str(filler);
    }
    doc
}

// =============================================================================
// Aggregate behavior
// =============================================================================

mod aggregate_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_complete_research_document_passes() {
        let report = evaluate_document(RESEARCH_DOC, ContentType::Research);
        assert!(report.overall_passed(), "{}", report.to_json().unwrap());
        assert!(report.critical_failures().is_empty());
    }

    #[test]
    fn test_missing_weather_section_fails_research() {
        let doc = RESEARCH_DOC.replace("## WEATHER\n", "");
        let report = evaluate_document(&doc, ContentType::Research);

        assert!(!report.overall_passed());
        assert!(report.critical_failures().contains(&CheckName::Sections));
        match &report.check(CheckName::Sections).unwrap().details {
            CheckDetails::Sections {
                missing_sections, ..
            } => assert_eq!(missing_sections, &vec!["## WEATHER".to_string()]),
            other => panic!("unexpected details {:?}", other),
        }
    }

    #[test]
    fn test_slop_sentence() {
        let report = evaluate_document(
            "It's worth noting that this race is truly remarkable.",
            ContentType::Research,
        );
        let slop = report.check(CheckName::Slop).unwrap();
        assert!(!slop.passed);
        match &slop.details {
            CheckDetails::Slop { slop_count, .. } => assert!(*slop_count >= 2),
            other => panic!("unexpected details {:?}", other),
        }
        assert!(report.critical_failures().contains(&CheckName::Slop));
    }

    #[test]
    fn test_documents_without_slop_pass_slop_check() {
        let docs = [
            RESEARCH_DOC,
            "Ride 200 miles.",
            "The course climbs 11,000 feet. Bring two bottles.",
            "",
        ];
        for doc in docs {
            for content_type in ContentType::ALL {
                let report = evaluate_document(doc, content_type);
                assert!(report.check(CheckName::Slop).unwrap().passed, "{:?}", doc);
            }
        }
    }

    #[test]
    fn test_overall_matches_critical_failures() {
        let docs = [
            RESEARCH_DOC.to_string(),
            RESEARCH_DOC.replace("## WEATHER", "## CLIMATE"),
            "TODO: write this".to_string(),
            "The split was undefined at mile 3.".to_string(),
            guide_of_size(25_000),
            String::new(),
        ];
        for doc in &docs {
            for content_type in ContentType::ALL {
                let report = evaluate_document(doc, content_type);
                assert_eq!(report.overall_passed(), report.critical_failures().is_empty());
            }
        }
    }

    #[test]
    fn test_reports_are_byte_identical() {
        for content_type in ContentType::ALL {
            let first = evaluate_document(RESEARCH_DOC, content_type).to_json().unwrap();
            let second = evaluate_document(RESEARCH_DOC, content_type).to_json().unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_check_order_in_json() {
        let json = evaluate_document(RESEARCH_DOC, ContentType::Research)
            .to_json()
            .unwrap();
        let positions: Vec<usize> = ["\"content\"", "\"slop\"", "\"voice\"", "\"null_text\""]
            .iter()
            .map(|key| json.find(key).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_empty_document_fails_every_type() {
        for content_type in ContentType::ALL {
            let report = evaluate_document("   \n", content_type);
            assert!(!report.overall_passed());
            assert!(report.critical_failures().contains(&CheckName::Content));
        }
    }

    #[test]
    fn test_placeholder_blocks_every_type() {
        for content_type in ContentType::ALL {
            let report = evaluate_document("[INSERT race name] is a hard race.", content_type);
            assert!(report.critical_failures().contains(&CheckName::Placeholder));
        }
    }

    #[test]
    fn test_brief_soft_failures_are_warnings() {
        let report = evaluate_document("Short and vague.", ContentType::Brief);
        assert!(report.overall_passed());
        assert!(report.warnings().contains(&CheckName::Citations));
        assert_eq!(
            report.check(CheckName::Citations).unwrap().severity,
            Severity::Warning
        );
    }
}

// =============================================================================
// Guides and plans
// =============================================================================

mod guide_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_guide_size_bounds() {
        let small = evaluate_document(&guide_of_size(5_000), ContentType::Guide);
        assert!(small.critical_failures().contains(&CheckName::GuideSize));

        let right = evaluate_document(&guide_of_size(25_000), ContentType::Guide);
        assert!(right.overall_passed(), "{:?}", right.critical_failures());
    }

    #[test]
    fn test_workout_coverage() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..9 {
            std::fs::write(dir.path().join(format!("w{:02}.zwo", i)), "<workout_file/>").unwrap();
        }
        std::fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let files = find_workout_files(dir.path());
        assert_eq!(files.len(), 9);

        let thresholds = GateSpec::builtin().thresholds;
        assert!(check_workout_coverage(3, files.len(), &thresholds).passed);
        assert!(!check_workout_coverage(4, files.len(), &thresholds).passed);
        assert!(!check_workout_coverage(0, files.len(), &thresholds).passed);
    }
}

// =============================================================================
// Batch runs
// =============================================================================

mod batch_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use guidegate::batch::BatchOptions;
    use guidegate::run_batch;

    #[test]
    fn test_batch_is_deterministic_across_worker_counts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("races")).unwrap();
        std::fs::write(dir.path().join("races/unbound-research.md"), RESEARCH_DOC).unwrap();
        std::fs::write(
            dir.path().join("races/mid-south-research.md"),
            RESEARCH_DOC.replace("## WEATHER\n", ""),
        )
        .unwrap();
        std::fs::write(dir.path().join("races/unbound-guide.md"), guide_of_size(25_000)).unwrap();
        std::fs::write(dir.path().join("notes.md"), "scratch").unwrap();

        let gate = AggregateGate::builtin().unwrap();
        let run = |workers| {
            let options = BatchOptions {
                workers: Some(workers),
                show_progress: false,
                ..BatchOptions::default()
            };
            serde_json::to_string(&run_batch(&gate, dir.path(), &options).unwrap()).unwrap()
        };

        let single = run(1);
        assert_eq!(single, run(4));

        let summary = run_batch(
            &gate,
            dir.path(),
            &BatchOptions {
                show_progress: false,
                ..BatchOptions::default()
            },
        )
        .unwrap();
        assert_eq!(summary.total, 3);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped.len(), 1);
    }
}

// =============================================================================
// Spec overrides
// =============================================================================

mod override_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_stricter_override_changes_verdict() {
        let mut spec = GateSpec::builtin();
        spec.version = "2026.10-strict".to_string();
        spec.thresholds.min_citations_research = 10;

        let gate = AggregateGate::new(Arc::new(spec), Arc::new(PhraseSets::builtin().unwrap()))
            .unwrap();
        let report = gate.evaluate_text(RESEARCH_DOC, ContentType::Research);
        assert_eq!(report.spec_version(), "2026.10-strict");
        assert!(report.critical_failures().contains(&CheckName::Citations));
        assert_ne!(
            report.spec_fingerprint(),
            evaluate_document(RESEARCH_DOC, ContentType::Research).spec_fingerprint()
        );
    }

    #[test]
    fn test_yaml_override_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gate.yaml");
        let mut spec = GateSpec::builtin();
        spec.thresholds.slop_ceiling = 1;
        std::fs::write(&path, serde_yaml::to_string(&spec).unwrap()).unwrap();

        let loaded = GateSpec::load(&path).unwrap();
        assert_eq!(loaded.thresholds.slop_ceiling, 1);
    }

    #[test]
    fn test_gate_is_shareable_across_threads() {
        let gate = Arc::new(AggregateGate::builtin().unwrap());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let gate = Arc::clone(&gate);
                std::thread::spawn(move || {
                    gate.evaluate_text(RESEARCH_DOC, ContentType::Research)
                        .to_json()
                        .unwrap()
                })
            })
            .collect();
        let outputs: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(outputs.windows(2).all(|w| w[0] == w[1]));
    }
}
