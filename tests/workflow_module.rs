use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use sv_agent::shared::Logger;
use sv_agent::workflow::{
    convert_modules, convert_workflows, module_workflow, AwlkitConverter, WdlOutlineAnalyzer,
    WorkflowAnalyzer, WorkflowConverter, WorkflowError,
};
use tempfile::tempdir;

/// Writes a stub CWL document; fails for inputs whose name contains `broken`.
#[derive(Default)]
struct FakeConverter {
    seen: RefCell<Vec<String>>,
}

impl WorkflowConverter for FakeConverter {
    fn name(&self) -> &str {
        "fake"
    }

    fn convert_file(&self, input: &Path, output: &Path) -> Result<(), WorkflowError> {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.seen.borrow_mut().push(name.clone());
        if name.contains("broken") {
            return Err(WorkflowError::Parse {
                path: input.display().to_string(),
                reason: "unsupported construct".to_string(),
            });
        }
        if !input.is_file() {
            return Err(WorkflowError::NotFound {
                path: input.display().to_string(),
            });
        }
        fs::write(output, "cwlVersion: v1.2\n").expect("write cwl");
        Ok(())
    }
}

fn write(path: &Path, body: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(path, body).expect("write file");
    path.to_path_buf()
}

const SAMPLE_WDL: &str = r#"version 1.0

import "Structs.wdl"
import "Utils.wdl" as utils

# Collects counts per sample and merges them.
workflow SampleFlow {
  input {
    Array[File] bams
    File reference
    String prefix = "out"
  }

  scatter (bam in bams) {
    call CollectCounts { input: bam = bam, ref = reference }
  }

  call utils.Merge as MergeCounts {
    input:
      counts = CollectCounts.counts
  }

  call Annotate {
    input: merged = MergeCounts.merged, prefix = prefix
  }

  call Qc { input: ref = reference }

  output {
    File annotated = Annotate.vcf
    File qc_report = Qc.report
  }
}

task CollectCounts {
  input {
    File bam
    File ref
  }
  command <<<
    collect ~{bam} > counts.txt
  >>>
  output {
    File counts = "counts.txt"
  }
}
"#;

#[test]
fn conversion_failures_do_not_stop_the_batch() {
    let temp = tempdir().expect("tempdir");
    let inputs = vec![
        write(&temp.path().join("wdl/A.wdl"), "workflow A {}"),
        write(&temp.path().join("wdl/broken.wdl"), "workflow B {"),
        write(&temp.path().join("wdl/C.wdl"), "workflow C {}"),
    ];
    let out_dir = temp.path().join("cwl");
    let converter = FakeConverter::default();

    let report =
        convert_workflows(&converter, &inputs, &out_dir, &Logger::disabled()).expect("report");
    assert_eq!(report.converted, vec!["A.wdl".to_string(), "C.wdl".to_string()]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].file, "broken.wdl");
    assert!(report.failed[0].error.contains("unsupported construct"));
    assert!(!report.is_success());
    assert!(out_dir.join("A.cwl").is_file());
    assert!(out_dir.join("C.cwl").is_file());
    assert_eq!(converter.seen.borrow().len(), 3);
    assert!(report.summary().starts_with("converted=2\nfailed=1"));
}

#[test]
fn module_ids_resolve_to_pipeline_workflows() {
    assert_eq!(module_workflow("Module00a"), Some("GatherSampleEvidence"));
    assert_eq!(module_workflow("module04"), Some("GenotypeBatch"));
    assert_eq!(module_workflow("Module99"), None);

    let temp = tempdir().expect("tempdir");
    let root = temp.path().join("gatk-sv");
    write(&root.join("wdl/ClusterBatch.wdl"), "workflow ClusterBatch {}");
    let converter = FakeConverter::default();
    let modules = vec!["Module01".to_string(), "Module99".to_string()];
    let report = convert_modules(
        &converter,
        &root,
        &temp.path().join("out"),
        &modules,
        &Logger::disabled(),
    )
    .expect("report");
    assert_eq!(report.converted, vec!["ClusterBatch.wdl".to_string()]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].file, "Module99");
}

#[test]
fn converting_every_module_scans_the_wdl_directory() {
    let temp = tempdir().expect("tempdir");
    let root = temp.path().join("gatk-sv");
    write(&root.join("wdl/EvidenceQC.wdl"), "workflow EvidenceQC {}");
    write(&root.join("wdl/ClusterBatch.wdl"), "workflow ClusterBatch {}");
    write(&root.join("wdl/README.md"), "not a workflow");
    let converter = FakeConverter::default();
    let report = convert_modules(
        &converter,
        &root,
        &temp.path().join("out"),
        &[],
        &Logger::disabled(),
    )
    .expect("report");
    assert_eq!(
        report.converted,
        vec!["ClusterBatch.wdl".to_string(), "EvidenceQC.wdl".to_string()]
    );

    let missing = convert_modules(
        &converter,
        &temp.path().join("absent"),
        &temp.path().join("out"),
        &[],
        &Logger::disabled(),
    );
    assert!(matches!(missing, Err(WorkflowError::NotFound { .. })));
}

#[test]
fn missing_converter_binary_is_recorded_per_file() {
    let temp = tempdir().expect("tempdir");
    let input = write(&temp.path().join("A.wdl"), "workflow A {}");
    let converter = AwlkitConverter::new("sv-agent-no-such-converter", Duration::from_secs(2));
    let report = convert_workflows(
        &converter,
        &[input],
        &temp.path().join("out"),
        &Logger::disabled(),
    )
    .expect("report");
    assert!(report.converted.is_empty());
    assert!(report.failed[0].error.contains("not installed"));
}

#[cfg(unix)]
#[test]
fn awlkit_converter_reports_non_zero_exit() {
    use std::os::unix::fs::PermissionsExt;

    let temp = tempdir().expect("tempdir");
    let script = write(
        &temp.path().join("fake-awlkit"),
        "#!/bin/sh\necho 'unsupported scatter' >&2\nexit 2\n",
    );
    let mut perms = fs::metadata(&script).expect("metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&script, perms).expect("chmod");

    let input = write(&temp.path().join("A.wdl"), "workflow A {}");
    let converter = AwlkitConverter::new(script.display().to_string(), Duration::from_secs(5));
    let err = converter
        .convert_file(&input, &temp.path().join("A.cwl"))
        .expect_err("non-zero exit");
    match err {
        WorkflowError::NonZeroExit {
            exit_code, stderr, ..
        } => {
            assert_eq!(exit_code, 2);
            assert_eq!(stderr, "unsupported scatter");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn wdl_outline_collects_structure() {
    let temp = tempdir().expect("tempdir");
    let path = write(&temp.path().join("SampleFlow.wdl"), SAMPLE_WDL);
    let analyzer = WdlOutlineAnalyzer;
    let summary = analyzer.parse(&path).expect("parse");

    assert_eq!(summary.name, "SampleFlow");
    assert_eq!(summary.inputs, vec!["bams", "reference", "prefix"]);
    assert_eq!(summary.outputs, vec!["annotated", "qc_report"]);
    assert_eq!(summary.tasks, vec!["CollectCounts"]);
    assert_eq!(summary.imports, vec!["Structs.wdl", "Utils.wdl"]);

    let names: Vec<&str> = summary.calls.iter().map(|call| call.name()).collect();
    assert_eq!(names, vec!["CollectCounts", "MergeCounts", "Annotate", "Qc"]);
    assert!(summary.calls[0].scattered);
    assert!(!summary.calls[1].scattered);
    assert_eq!(summary.calls[1].target, "utils.Merge");
    assert_eq!(summary.calls[1].depends_on, vec!["CollectCounts"]);
    assert_eq!(summary.calls[2].depends_on, vec!["MergeCounts"]);
    assert!(summary.calls[3].depends_on.is_empty());

    let stats = analyzer.statistics(&summary);
    assert_eq!(stats.total_calls, 4);
    assert!(!stats.has_cycles);
    assert_eq!(stats.max_parallelism, 2);
}

#[test]
fn cyclic_call_graphs_are_flagged() {
    let source = "workflow Loop {\n  call A { input: x = B.out }\n  call B { input: y = A.out }\n  call C\n}\n";
    let analyzer = WdlOutlineAnalyzer;
    let summary = analyzer.parse_source(source, "loop.wdl").expect("parse");
    let stats = analyzer.statistics(&summary);
    assert!(stats.has_cycles);
    assert_eq!(stats.total_calls, 3);
    assert_eq!(stats.max_parallelism, 1);
}

#[test]
fn analysis_errors_name_the_file() {
    let temp = tempdir().expect("tempdir");
    let analyzer = WdlOutlineAnalyzer;
    let missing = analyzer.parse(&temp.path().join("nope.wdl"));
    assert!(matches!(missing, Err(WorkflowError::NotFound { .. })));

    let empty = write(&temp.path().join("empty.wdl"), "version 1.0\n");
    let err = analyzer.parse(&empty).expect_err("no definitions");
    assert!(err.to_string().contains("no workflow or task definitions"));
}
