use super::{BestPracticeList, Capabilities, FaqEntry, ModuleInfo, SvTypeInfo};

const NONE: &[&str] = &[];

pub(super) fn sv_types() -> Vec<(&'static str, SvTypeInfo)> {
    vec![
        (
            "DEL",
            SvTypeInfo {
                name: "Deletion",
                description: "Loss of genomic sequence",
                min_size: 50,
                detection_methods: &["read depth", "split reads", "discordant pairs"],
                impact: "Can cause loss of function if affecting genes",
            },
        ),
        (
            "DUP",
            SvTypeInfo {
                name: "Duplication",
                description: "Gain of genomic sequence",
                min_size: 50,
                detection_methods: &["read depth", "split reads", "discordant pairs"],
                impact: "Can cause dosage imbalance",
            },
        ),
        (
            "INV",
            SvTypeInfo {
                name: "Inversion",
                description: "Reversal of genomic sequence orientation",
                min_size: 50,
                detection_methods: &["split reads", "discordant pairs"],
                impact: "Can disrupt genes at breakpoints",
            },
        ),
        (
            "INS",
            SvTypeInfo {
                name: "Insertion",
                description: "Addition of new sequence",
                min_size: 50,
                detection_methods: &["split reads", "local assembly"],
                impact: "Can disrupt genes or regulatory elements",
            },
        ),
        (
            "BND",
            SvTypeInfo {
                name: "Breakend",
                description: "Complex rearrangement or translocation",
                min_size: 0,
                detection_methods: &["split reads", "discordant pairs"],
                impact: "Can create fusion genes or disrupt multiple loci",
            },
        ),
    ]
}

pub(super) fn modules() -> Vec<(&'static str, ModuleInfo)> {
    vec![
        (
            "Module00a",
            ModuleInfo {
                name: "Sample QC",
                purpose: "Assess individual sample quality metrics",
                inputs: &["BAM/CRAM files", "reference genome"],
                outputs: &["QC metrics", "coverage statistics"],
                algorithms: NONE,
                key_metrics: &[
                    "mean coverage",
                    "insert size distribution",
                    "chimeric read rate",
                ],
                details: &[],
            },
        ),
        (
            "Module00b",
            ModuleInfo {
                name: "Evidence Collection",
                purpose: "Gather SV evidence from multiple algorithms",
                inputs: NONE,
                outputs: &["raw SV calls per algorithm", "evidence files"],
                algorithms: &["Manta", "MELT", "Wham", "cn.MOPS"],
                key_metrics: NONE,
                details: &[(
                    "evidence types",
                    &["split reads", "discordant pairs", "read depth"],
                )],
            },
        ),
        (
            "Module00c",
            ModuleInfo {
                name: "Batch QC",
                purpose: "Assess batch-level quality and identify outliers",
                inputs: NONE,
                outputs: &["outlier samples", "batch statistics"],
                algorithms: NONE,
                key_metrics: NONE,
                details: &[(
                    "checks",
                    &["sample relatedness", "batch effects", "coverage uniformity"],
                )],
            },
        ),
        (
            "Module01",
            ModuleInfo {
                name: "Clustering",
                purpose: "Cluster SV calls across samples",
                inputs: NONE,
                outputs: &["clustered SV sites", "variant frequencies"],
                algorithms: NONE,
                key_metrics: NONE,
                details: &[("process", &["Merge similar calls within and across samples"])],
            },
        ),
        (
            "Module02",
            ModuleInfo {
                name: "Variant Filtering",
                purpose: "Apply quality filters to SV calls",
                inputs: NONE,
                outputs: &["filtered VCF", "filter statistics"],
                algorithms: NONE,
                key_metrics: NONE,
                details: &[(
                    "filters",
                    &["frequency", "quality score", "evidence support"],
                )],
            },
        ),
        (
            "Module03",
            ModuleInfo {
                name: "Genotyping",
                purpose: "Re-genotype SVs across all samples",
                inputs: NONE,
                outputs: &["genotyped VCF", "genotype quality scores"],
                algorithms: NONE,
                key_metrics: NONE,
                details: &[(
                    "methods",
                    &["read depth", "split read counting", "paired-end mapping"],
                )],
            },
        ),
        (
            "Module04",
            ModuleInfo {
                name: "Complex SV Resolution",
                purpose: "Resolve complex and multi-allelic SVs",
                inputs: NONE,
                outputs: &["resolved VCF"],
                algorithms: NONE,
                key_metrics: NONE,
                details: &[(
                    "handles",
                    &[
                        "overlapping SVs",
                        "complex rearrangements",
                        "multi-allelic sites",
                    ],
                )],
            },
        ),
        (
            "Module05",
            ModuleInfo {
                name: "Annotation",
                purpose: "Annotate SVs with functional information",
                inputs: NONE,
                outputs: &["annotated VCF"],
                algorithms: NONE,
                key_metrics: NONE,
                details: &[
                    (
                        "annotations",
                        &["gene overlap", "regulatory elements", "population frequency"],
                    ),
                    ("databases", &["gnomAD-SV", "DGV", "ENCODE"]),
                ],
            },
        ),
        (
            "Module06",
            ModuleInfo {
                name: "Final QC",
                purpose: "Final quality control and metric generation",
                inputs: NONE,
                outputs: &["final VCF", "QC report"],
                algorithms: NONE,
                key_metrics: &["Ti/Tv ratio", "SV size distribution", "per-sample counts"],
                details: &[],
            },
        ),
    ]
}

pub(super) fn faq() -> Vec<FaqEntry> {
    vec![
        FaqEntry {
            question: "What is GATK-SV?",
            answer: "GATK-SV is a comprehensive pipeline developed by the Broad Institute for discovering structural variants (SVs) in whole-genome sequencing data. It uses multiple evidence types and algorithms to detect deletions, duplications, inversions, insertions, and complex rearrangements.",
        },
        FaqEntry {
            question: "What are structural variants?",
            answer: "Structural variants (SVs) are genomic alterations larger than 50bp, including deletions (DEL), duplications (DUP), inversions (INV), insertions (INS), and translocations (BND). They contribute significantly to genetic diversity and disease.",
        },
        FaqEntry {
            question: "What input data do I need?",
            answer: "You need: 1) Aligned BAM or CRAM files (whole genome sequencing, >30x coverage recommended), 2) Reference genome (matching your alignment), 3) Sample metadata (sex, batch information)",
        },
        FaqEntry {
            question: "How long does the pipeline take?",
            answer: "For a cohort of 100 samples at 30x coverage: Module00a-c: 2-4 hours, Module01-03: 6-12 hours, Module04-06: 4-8 hours. Total: 12-24 hours depending on compute resources.",
        },
        FaqEntry {
            question: "What algorithms does GATK-SV use?",
            answer: "GATK-SV integrates multiple SV callers: Manta (all SV types), MELT (mobile element insertions), Wham (deletions, duplications), cn.MOPS (copy number variants). It combines their results for comprehensive SV detection.",
        },
        FaqEntry {
            question: "How do I interpret the outputs?",
            answer: "The final VCF contains: SV type and coordinates, quality scores, genotypes for each sample, allele frequencies, functional annotations. Use FILTER column for high-confidence calls (PASS) and INFO fields for detailed metrics.",
        },
        FaqEntry {
            question: "What coverage is recommended?",
            answer: "Minimum 30x mean coverage for reliable SV detection. Lower coverage (10-20x) can detect large SVs but misses smaller events. Higher coverage (>50x) improves sensitivity for complex SVs.",
        },
        FaqEntry {
            question: "Can I run on a single sample?",
            answer: "GATK-SV is designed for cohort analysis (minimum 30 samples recommended). For single samples, consider using individual SV callers like Manta or Delly directly.",
        },
        FaqEntry {
            question: "How do I handle related samples?",
            answer: "Include relationship information in your sample metadata. The pipeline accounts for relatedness in allele frequency calculations and filtering. Trios and families can improve SV calling accuracy.",
        },
        FaqEntry {
            question: "What compute resources do I need?",
            answer: "Recommended: 16-32 cores, 64-128GB RAM per node, 1-2TB storage per 100 samples. The pipeline is parallelizable across samples and genomic regions.",
        },
    ]
}

pub(super) fn best_practices() -> Vec<BestPracticeList> {
    vec![
        BestPracticeList {
            category: "sample_selection",
            practices: &[
                "Use samples from the same sequencing platform and chemistry",
                "Include at least 30 samples for robust frequency estimates",
                "Balance cases and controls if studying disease",
                "Include both sexes for better X/Y chromosome SV calling",
            ],
        },
        BestPracticeList {
            category: "quality_control",
            practices: &[
                "Remove samples with <10x mean coverage",
                "Check for contamination and sample swaps",
                "Identify and handle outliers in insert size or chimeric reads",
                "Verify sex from coverage of sex chromosomes",
            ],
        },
        BestPracticeList {
            category: "filtering_strategy",
            practices: &[
                "Start with default filters, adjust based on validation",
                "Consider population-specific allele frequencies",
                "Use orthogonal validation for novel SVs",
                "Be more stringent for clinical applications",
            ],
        },
        BestPracticeList {
            category: "validation",
            practices: &[
                "Use PCR for breakpoint validation",
                "Employ orthogonal methods (array CGH, optical mapping)",
                "Check inheritance patterns in families",
                "Visualize calls in IGV or similar tools",
            ],
        },
    ]
}

pub(super) fn capabilities() -> Capabilities {
    Capabilities {
        can_do: &[
            "Execute GATK-SV modules as CWL workflows locally with cwltool",
            "Convert GATK-SV WDL workflows to CWL",
            "Plan Seven Bridges executions with cost estimates",
            "Analyze workflow structure and parallelism",
            "Answer questions about SV types and GATK-SV modules",
        ],
        cannot_do: &[
            "Run WDL workflows directly without conversion",
            "Access files on remote platforms without credentials",
            "Validate the biological correctness of SV calls",
        ],
        run_command: "sv-agent run <workflow.cwl> <inputs.yaml>",
        convert_command: "sv-agent convert --output <dir> --modules Module00a,Module01",
    }
}

pub(super) const PIPELINE_OVERVIEW: &str = "GATK-SV Pipeline Overview:

The GATK-SV pipeline is a comprehensive workflow for structural variant discovery in whole-genome sequencing data. It consists of several modules that work together:

1. **Evidence Collection** (Module00a-c):
   - Collects quality metrics per sample
   - Runs multiple SV calling algorithms
   - Performs batch-level QC

2. **SV Discovery** (Module01-02):
   - Clusters SV calls across samples
   - Filters based on quality and frequency

3. **Genotyping** (Module03):
   - Re-genotypes all SVs across all samples
   - Provides accurate allele frequencies

4. **Resolution & Annotation** (Module04-05):
   - Resolves complex variants
   - Annotates with functional information

5. **Final QC** (Module06):
   - Generates final metrics
   - Produces analysis-ready VCF

The pipeline can detect deletions (DEL), duplications (DUP), inversions (INV) and insertions (INS) of at least 50bp, plus translocations and complex events (BND), integrating split-read, discordant-pair, read-depth and local-assembly evidence.";
