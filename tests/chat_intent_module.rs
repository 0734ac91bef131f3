use sv_agent::chat::{classify_intent, is_cloud_execution_request, Intent};

#[test]
fn question_stems_outrank_keyword_rules() {
    assert_eq!(
        classify_intent("What is the best way to run Module00a?"),
        Intent::General
    );
    assert_eq!(classify_intent("How do I convert WDL?"), Intent::General);
}

#[test]
fn keyword_rules_apply_in_order() {
    assert_eq!(classify_intent("Explain module 01"), Intent::Explain);
    assert_eq!(classify_intent("convert GatherSampleEvidence.wdl"), Intent::Convert);
    assert_eq!(classify_intent("analyze the workflow graph"), Intent::Analyze);
    assert_eq!(classify_intent("run Module00a on sample1.bam"), Intent::Run);
    assert_eq!(classify_intent("recommend filters for my cohort"), Intent::Recommend);
    assert_eq!(classify_intent("Manta failed with an error"), Intent::Troubleshoot);
    assert_eq!(classify_intent("help"), Intent::Help);
    assert_eq!(classify_intent("show status"), Intent::Status);
    assert_eq!(classify_intent("deletions in cancer"), Intent::General);
}

#[test]
fn classification_is_deterministic() {
    let text = "Please convert and then run module 3";
    let first = classify_intent(text);
    for _ in 0..5 {
        assert_eq!(classify_intent(text), first);
    }
    assert_eq!(first, Intent::Convert);
}

#[test]
fn cloud_requests_need_a_platform_and_a_verb() {
    assert!(is_cloud_execution_request("Run QC on Seven Bridges with sample1.bam"));
    assert!(is_cloud_execution_request("execute module01 on CGC"));
    assert!(is_cloud_execution_request("Please process this on the cloud"));
    assert!(!is_cloud_execution_request("Tell me about Seven Bridges"));
    assert!(!is_cloud_execution_request("run module00a locally"));
    assert!(!is_cloud_execution_request("run the sbtools test"));
}
