mod catalog;

pub const SV_TYPE_CODES: [&str; 5] = ["DEL", "DUP", "INV", "INS", "BND"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    pub name: &'static str,
    pub purpose: &'static str,
    pub inputs: &'static [&'static str],
    pub outputs: &'static [&'static str],
    pub algorithms: &'static [&'static str],
    pub key_metrics: &'static [&'static str],
    pub details: &'static [(&'static str, &'static [&'static str])],
}

impl ModuleInfo {
    fn searchable_text(&self) -> String {
        let mut parts = vec![self.name.to_string(), self.purpose.to_string()];
        for list in [self.inputs, self.outputs, self.algorithms, self.key_metrics] {
            parts.extend(list.iter().map(|v| v.to_string()));
        }
        for (label, values) in self.details {
            parts.push(label.to_string());
            parts.extend(values.iter().map(|v| v.to_string()));
        }
        parts.join(" ").to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvTypeInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub min_size: u32,
    pub detection_methods: &'static [&'static str],
    pub impact: &'static str,
}

impl SvTypeInfo {
    fn searchable_text(&self) -> String {
        format!(
            "{} {} {} {} {}",
            self.name,
            self.description,
            self.min_size,
            self.detection_methods.join(" "),
            self.impact
        )
        .to_lowercase()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaqEntry {
    pub question: &'static str,
    pub answer: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BestPracticeList {
    pub category: &'static str,
    pub practices: &'static [&'static str],
}

impl BestPracticeList {
    pub fn title(&self) -> String {
        self.category
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    pub can_do: &'static [&'static str],
    pub cannot_do: &'static [&'static str],
    pub run_command: &'static str,
    pub convert_command: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnowledgeHit<'a> {
    Faq(&'a FaqEntry),
    Module {
        id: &'a str,
        info: &'a ModuleInfo,
    },
    SvType {
        code: &'a str,
        info: &'a SvTypeInfo,
    },
}

impl KnowledgeHit<'_> {
    pub fn context_line(&self) -> String {
        match self {
            Self::Faq(entry) => format!("Q: {} A: {}", entry.question, entry.answer),
            Self::Module { id, info } => format!("{id}: {} - {}", info.name, info.purpose),
            Self::SvType { code, info } => format!("{code}: {} - {}", info.name, info.description),
        }
    }

    pub fn answer_block(&self) -> String {
        match self {
            Self::Faq(entry) => format!("**{}**\n{}", entry.question, entry.answer),
            Self::Module { id, info } => {
                format!("**{id}: {}**\nPurpose: {}", info.name, info.purpose)
            }
            Self::SvType { code, info } => {
                format!("**{code}: {}**\n{}", info.name, info.description)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    pub domain: &'static str,
    pub pipeline: &'static str,
    sv_types: Vec<(&'static str, SvTypeInfo)>,
    modules: Vec<(&'static str, ModuleInfo)>,
    faq: Vec<FaqEntry>,
    best_practices: Vec<BestPracticeList>,
    capabilities: Capabilities,
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::gatk_sv()
    }
}

impl KnowledgeBase {
    pub fn gatk_sv() -> Self {
        Self {
            domain: "Structural Variant Analysis",
            pipeline: "GATK-SV",
            sv_types: catalog::sv_types(),
            modules: catalog::modules(),
            faq: catalog::faq(),
            best_practices: catalog::best_practices(),
            capabilities: catalog::capabilities(),
        }
    }

    pub fn get_module_info(&self, module_id: &str) -> Option<&ModuleInfo> {
        self.modules
            .iter()
            .find(|(id, _)| *id == module_id)
            .map(|(_, info)| info)
    }

    pub fn get_sv_type_info(&self, code: &str) -> Option<&SvTypeInfo> {
        let code = code.trim().to_ascii_uppercase();
        self.sv_types
            .iter()
            .find(|(id, _)| *id == code)
            .map(|(_, info)| info)
    }

    pub fn modules(&self) -> impl Iterator<Item = (&str, &ModuleInfo)> {
        self.modules.iter().map(|(id, info)| (*id, info))
    }

    pub fn sv_types(&self) -> impl Iterator<Item = (&str, &SvTypeInfo)> {
        self.sv_types.iter().map(|(code, info)| (*code, info))
    }

    pub fn faq(&self) -> &[FaqEntry] {
        &self.faq
    }

    pub fn best_practices(&self) -> &[BestPracticeList] {
        &self.best_practices
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn search_knowledge(&self, query: &str) -> Vec<KnowledgeHit<'_>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut hits = Vec::new();
        for entry in &self.faq {
            if entry.question.to_lowercase().contains(&needle)
                || entry.answer.to_lowercase().contains(&needle)
            {
                hits.push(KnowledgeHit::Faq(entry));
            }
        }
        for (id, info) in &self.modules {
            if id.to_lowercase().contains(&needle) || info.searchable_text().contains(&needle) {
                hits.push(KnowledgeHit::Module { id, info });
            }
        }
        for (code, info) in &self.sv_types {
            if code.to_lowercase().contains(&needle) || info.searchable_text().contains(&needle) {
                hits.push(KnowledgeHit::SvType { code, info });
            }
        }
        hits
    }

    pub fn faq_by_word_overlap(&self, query: &str) -> Option<&FaqEntry> {
        let lowered = query.to_lowercase();
        let words: Vec<&str> = lowered.split_whitespace().collect();
        if words.is_empty() {
            return None;
        }
        self.faq.iter().find(|entry| {
            let question = entry.question.to_lowercase();
            words.iter().any(|word| question.contains(word))
        })
    }

    pub fn pipeline_overview(&self) -> &'static str {
        catalog::PIPELINE_OVERVIEW
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn best_practice_titles_are_title_cased() {
        let kb = KnowledgeBase::gatk_sv();
        let titles: Vec<String> = kb.best_practices().iter().map(|p| p.title()).collect();
        assert!(titles.contains(&"Sample Selection".to_string()));
        assert!(titles.contains(&"Quality Control".to_string()));
    }

    #[test]
    fn module_search_covers_detail_facets() {
        let kb = KnowledgeBase::gatk_sv();
        let hits = kb.search_knowledge("gnomad-sv");
        assert!(hits
            .iter()
            .any(|hit| matches!(hit, KnowledgeHit::Module { id, .. } if *id == "Module05")));
    }
}
