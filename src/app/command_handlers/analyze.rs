use crate::workflow::{WdlOutlineAnalyzer, WorkflowAnalyzer};
use std::path::Path;

fn list(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

pub fn cmd_analyze(args: &[String]) -> Result<String, String> {
    if args.len() != 1 {
        return Err("usage: analyze <workflow.wdl>".to_string());
    }
    let analyzer = WdlOutlineAnalyzer;
    let summary = analyzer
        .parse(Path::new(&args[0]))
        .map_err(|e| e.to_string())?;
    let stats = analyzer.statistics(&summary);

    let calls: Vec<String> = summary
        .calls
        .iter()
        .map(|call| {
            let deps = if call.depends_on.is_empty() {
                String::new()
            } else {
                format!(" <- {}", call.depends_on.join(", "))
            };
            let scatter = if call.scattered { " [scatter]" } else { "" };
            format!("  {}{scatter}{deps}", call.name())
        })
        .collect();

    let mut lines = vec![
        format!("workflow={}", summary.name),
        format!("inputs={}", list(&summary.inputs)),
        format!("outputs={}", list(&summary.outputs)),
        format!("tasks={}", list(&summary.tasks)),
        format!("imports={}", list(&summary.imports)),
        format!("total_calls={}", stats.total_calls),
        format!("max_parallelism={}", stats.max_parallelism),
        format!("has_cycles={}", stats.has_cycles),
    ];
    if !calls.is_empty() {
        lines.push("calls:".to_string());
        lines.extend(calls);
    }
    Ok(lines.join("\n"))
}
