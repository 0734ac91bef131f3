use super::{io_error, WorkflowError};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallSite {
    pub target: String,
    pub alias: Option<String>,
    pub depends_on: Vec<String>,
    pub scattered: bool,
}

impl CallSite {
    pub fn name(&self) -> &str {
        match &self.alias {
            Some(alias) => alias,
            None => self.target.rsplit('.').next().unwrap_or(&self.target),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WorkflowSummary {
    pub name: String,
    pub path: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub tasks: Vec<String>,
    pub calls: Vec<CallSite>,
    pub imports: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkflowStatistics {
    pub max_parallelism: usize,
    pub has_cycles: bool,
    pub total_calls: usize,
}

pub trait WorkflowAnalyzer {
    fn parse(&self, path: &Path) -> Result<WorkflowSummary, WorkflowError>;
    fn statistics(&self, summary: &WorkflowSummary) -> WorkflowStatistics;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WdlOutlineAnalyzer;

impl WdlOutlineAnalyzer {
    pub fn parse_source(&self, source: &str, path: &str) -> Result<WorkflowSummary, WorkflowError> {
        let mut scanner = Scanner::default();
        for raw in source.lines() {
            scanner.line(strip_comment(raw).trim());
        }
        let Scanner {
            mut summary,
            call_bodies,
            ..
        } = scanner;
        if summary.name.is_empty() && summary.tasks.is_empty() {
            return Err(WorkflowError::Parse {
                path: path.to_string(),
                reason: "no workflow or task definitions found".to_string(),
            });
        }
        summary.path = path.to_string();
        resolve_dependencies(&mut summary.calls, &call_bodies);
        Ok(summary)
    }
}

impl WorkflowAnalyzer for WdlOutlineAnalyzer {
    fn parse(&self, path: &Path) -> Result<WorkflowSummary, WorkflowError> {
        if !path.is_file() {
            return Err(WorkflowError::NotFound {
                path: path.display().to_string(),
            });
        }
        let source = fs::read_to_string(path).map_err(|e| io_error(path, e))?;
        self.parse_source(&source, &path.display().to_string())
    }

    fn statistics(&self, summary: &WorkflowSummary) -> WorkflowStatistics {
        let total_calls = summary.calls.len();
        let has_cycles = has_cycle(&summary.calls);
        let max_parallelism = if total_calls == 0 {
            0
        } else if has_cycles {
            summary
                .calls
                .iter()
                .filter(|call| call.depends_on.is_empty())
                .count()
                .max(1)
        } else {
            widest_level(&summary.calls)
        };
        WorkflowStatistics {
            max_parallelism,
            has_cycles,
            total_calls,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    Workflow,
    Task,
    Input,
    Output,
    Call(usize),
    Scatter,
    Other,
}

#[derive(Default)]
struct Scanner {
    summary: WorkflowSummary,
    call_bodies: Vec<String>,
    stack: Vec<Block>,
}

impl Scanner {
    fn in_workflow_section(&self, section: Block) -> bool {
        match self.stack.as_slice() {
            [.., Block::Workflow, top] => *top == section,
            _ => false,
        }
    }

    fn current_call(&self) -> Option<usize> {
        self.stack.iter().rev().find_map(|block| match block {
            Block::Call(index) => Some(*index),
            _ => None,
        })
    }

    fn line(&mut self, line: &str) {
        if line.is_empty() {
            return;
        }
        let opens = line.matches('{').count();
        let closes = line.matches('}').count();
        let keyword = line.split_whitespace().next().unwrap_or_default();
        let keyword = keyword.trim_end_matches('{');

        if let Some(index) = self.current_call() {
            self.call_bodies[index].push(' ');
            self.call_bodies[index].push_str(line);
        }

        let mut opened = None;
        match keyword {
            "import" => {
                if let Some(import) = quoted(line) {
                    self.summary.imports.push(import.to_string());
                }
            }
            "workflow" if self.stack.is_empty() => {
                self.summary.name = block_name(line);
                opened = Some(Block::Workflow);
            }
            "task" if self.stack.is_empty() => {
                self.summary.tasks.push(block_name(line));
                opened = Some(Block::Task);
            }
            "input" if line.contains('{') => opened = Some(Block::Input),
            "output" if line.contains('{') => opened = Some(Block::Output),
            "scatter" => opened = Some(Block::Scatter),
            "call" => {
                let index = self.record_call(line);
                opened = Some(Block::Call(index));
            }
            _ => {
                if self.in_workflow_section(Block::Input) {
                    if let Some(name) = declaration_name(line) {
                        self.summary.inputs.push(name);
                    }
                } else if self.in_workflow_section(Block::Output) {
                    if let Some(name) = declaration_name(line) {
                        self.summary.outputs.push(name);
                    }
                }
            }
        }

        if opens > closes {
            self.stack.push(opened.unwrap_or(Block::Other));
            for _ in 1..(opens - closes) {
                self.stack.push(Block::Other);
            }
        } else {
            for _ in 0..(closes - opens) {
                self.stack.pop();
            }
        }
    }

    fn record_call(&mut self, line: &str) -> usize {
        let mut tokens = line
            .split_whitespace()
            .skip(1)
            .map(|token| token.trim_end_matches('{'))
            .filter(|token| !token.is_empty());
        let target = tokens.next().unwrap_or_default().to_string();
        let alias = match tokens.next() {
            Some("as") => tokens.next().map(str::to_string),
            _ => None,
        };
        let scattered = self.stack.contains(&Block::Scatter);
        self.summary.calls.push(CallSite {
            target,
            alias,
            depends_on: Vec::new(),
            scattered,
        });
        let body = line.split_once('{').map(|(_, rest)| rest).unwrap_or_default();
        self.call_bodies.push(body.to_string());
        self.summary.calls.len() - 1
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(index) => &line[..index],
        None => line,
    }
}

fn quoted(line: &str) -> Option<&str> {
    let start = line.find('"')? + 1;
    let len = line[start..].find('"')?;
    Some(&line[start..start + len])
}

fn block_name(line: &str) -> String {
    line.split_whitespace()
        .nth(1)
        .unwrap_or_default()
        .trim_end_matches('{')
        .to_string()
}

fn declaration_name(line: &str) -> Option<String> {
    let declaration = line.split('=').next().unwrap_or_default().trim();
    if declaration.is_empty() || declaration.starts_with('}') {
        return None;
    }
    let mut tokens = declaration.split_whitespace();
    let _ty = tokens.next()?;
    let name = tokens.last()?;
    let name = name.trim_end_matches(',');
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
        .then(|| name.to_string())
}

fn references(body: &str, name: &str) -> bool {
    let needle = format!("{name}.");
    body.match_indices(&needle).any(|(index, _)| {
        body[..index]
            .chars()
            .next_back()
            .map_or(true, |c| !(c.is_ascii_alphanumeric() || c == '_' || c == '.'))
    })
}

fn resolve_dependencies(calls: &mut [CallSite], bodies: &[String]) {
    let names: Vec<String> = calls.iter().map(|call| call.name().to_string()).collect();
    for (index, call) in calls.iter_mut().enumerate() {
        let body = bodies.get(index).map(String::as_str).unwrap_or_default();
        call.depends_on = names
            .iter()
            .enumerate()
            .filter(|(other, name)| *other != index && references(body, name))
            .map(|(_, name)| name.clone())
            .collect();
        call.depends_on.dedup();
    }
}

fn has_cycle(calls: &[CallSite]) -> bool {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        New,
        Active,
        Done,
    }

    let index: HashMap<&str, usize> = calls
        .iter()
        .enumerate()
        .map(|(i, call)| (call.name(), i))
        .collect();
    let mut marks = vec![Mark::New; calls.len()];

    fn visit(
        node: usize,
        calls: &[CallSite],
        index: &HashMap<&str, usize>,
        marks: &mut [Mark],
    ) -> bool {
        match marks[node] {
            Mark::Active => return true,
            Mark::Done => return false,
            Mark::New => {}
        }
        marks[node] = Mark::Active;
        for dep in &calls[node].depends_on {
            if let Some(&next) = index.get(dep.as_str()) {
                if visit(next, calls, index, marks) {
                    return true;
                }
            }
        }
        marks[node] = Mark::Done;
        false
    }

    (0..calls.len()).any(|node| visit(node, calls, &index, &mut marks))
}

// Acyclic input only.
fn widest_level(calls: &[CallSite]) -> usize {
    let index: HashMap<&str, usize> = calls
        .iter()
        .enumerate()
        .map(|(i, call)| (call.name(), i))
        .collect();
    let mut depth: Vec<Option<usize>> = vec![None; calls.len()];

    fn depth_of(
        node: usize,
        calls: &[CallSite],
        index: &HashMap<&str, usize>,
        depth: &mut [Option<usize>],
    ) -> usize {
        if let Some(known) = depth[node] {
            return known;
        }
        let level = calls[node]
            .depends_on
            .iter()
            .filter_map(|dep| index.get(dep.as_str()).copied())
            .map(|dep| depth_of(dep, calls, index, depth) + 1)
            .max()
            .unwrap_or(0);
        depth[node] = Some(level);
        level
    }

    let mut widths: BTreeMap<usize, usize> = BTreeMap::new();
    for node in 0..calls.len() {
        let level = depth_of(node, calls, &index, &mut depth);
        *widths.entry(level).or_default() += 1;
    }
    widths.values().copied().max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_names_ignore_types_and_defaults() {
        assert_eq!(declaration_name("Array[File] bams").as_deref(), Some("bams"));
        assert_eq!(
            declaration_name("Map[String, File] lookup").as_deref(),
            Some("lookup")
        );
        assert_eq!(
            declaration_name("File output_vcf = \"test.vcf\"").as_deref(),
            Some("output_vcf")
        );
        assert_eq!(declaration_name("}"), None);
    }

    #[test]
    fn references_need_a_word_boundary() {
        assert!(references(" input: vcf = Gather.out", "Gather"));
        assert!(!references(" input: vcf = PreGather.out", "Gather"));
    }
}
