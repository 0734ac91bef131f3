use sv_agent::chat::{
    DialogReply, DialogState, ExecutionDialog, ExecutionPlan, InstanceSize, PlanField, Platform,
};

fn expect_question(reply: &DialogReply) -> PlanField {
    match reply {
        DialogReply::Question { field, .. } => *field,
        other => panic!("expected a question, got {other:?}"),
    }
}

#[test]
fn partial_request_asks_for_project_then_instance_size() {
    let mut dialog = ExecutionDialog::new();
    let first = dialog.start("Run QC on Seven Bridges with sample1.bam");
    assert_eq!(expect_question(&first), PlanField::Project);
    assert!(first.message().starts_with("**Seven Bridges Execution Setup**"));
    assert_eq!(dialog.awaiting_field(), Some(PlanField::Project));

    let second = dialog.answer("alice/sv-study").expect("dialog active");
    assert_eq!(expect_question(&second), PlanField::InstanceSize);
    assert!(second.message().starts_with("**Step 2**"));

    let last = dialog.answer("medium").expect("dialog active");
    let DialogReply::Ready { plan, message } = last else {
        panic!("expected ready plan");
    };
    assert_eq!(plan.platform(), Platform::Aws);
    assert_eq!(plan.module(), "Module00a");
    assert_eq!(plan.files(), ["sample1.bam".to_string()]);
    assert_eq!(plan.project(), "alice/sv-study");
    assert_eq!(plan.instance_size(), InstanceSize::Medium);
    assert!(message.starts_with("**Seven Bridges Execution Plan**"));
    assert_eq!(dialog.state(), &DialogState::Idle);
    assert_eq!(dialog.awaiting_field(), None);
}

#[test]
fn empty_request_takes_five_round_trips() {
    let mut dialog = ExecutionDialog::new();
    let mut asked = vec![expect_question(&dialog.start("Please process this on the cloud"))];
    let answers = ["1", "3", "sample1.bam, sample2.bam", "alice/sv-study", "large"];
    let mut ready = None;
    for answer in answers {
        match dialog.answer(answer).expect("dialog active") {
            DialogReply::Question { field, .. } => asked.push(field),
            DialogReply::Ready { plan, .. } => ready = Some(plan),
            other => panic!("unexpected reply {other:?}"),
        }
    }
    assert_eq!(asked, PlanField::ALL.to_vec());
    let plan = ready.expect("ready after five answers");
    assert_eq!(plan.platform(), Platform::Cgc);
    assert_eq!(plan.module(), "Module00c");
    assert_eq!(plan.files().len(), 2);
    assert_eq!(plan.instance_size(), InstanceSize::Large);
}

#[test]
fn complete_request_is_ready_without_questions() {
    let mut dialog = ExecutionDialog::new();
    let reply = dialog.start(
        "Run Module01 on CGC with sample1.bam in project alice/sv-study using a large instance",
    );
    assert!(matches!(reply, DialogReply::Ready { .. }));
    assert!(!dialog.is_active());
}

#[test]
fn unrecognized_answers_reask_the_same_field() {
    let mut dialog = ExecutionDialog::new();
    dialog.start("Run QC on Seven Bridges with sample1.bam");
    let reply = dialog.answer("no idea").expect("dialog active");
    match &reply {
        DialogReply::Unrecognized { field, message } => {
            assert_eq!(*field, PlanField::Project);
            assert!(message.contains("I did not recognise \"no idea\""));
        }
        other => panic!("expected unrecognized, got {other:?}"),
    }
    assert_eq!(dialog.awaiting_field(), Some(PlanField::Project));
    assert_eq!(dialog.step(), 0);
}

#[test]
fn cancel_words_abandon_the_dialog() {
    let mut dialog = ExecutionDialog::new();
    dialog.start("Please process this on the cloud");
    let reply = dialog.answer("never mind").expect("dialog active");
    assert!(matches!(reply, DialogReply::Cancelled { .. }));
    assert!(!dialog.is_active());
    assert!(dialog.answer("1").is_none());
}

#[test]
fn file_names_never_fill_the_instance_size() {
    let plan = ExecutionPlan::from_request("Run QC on Seven Bridges with test_sample.bam");
    assert_eq!(plan.instance_size, None);
    assert_eq!(plan.files, vec!["test_sample.bam".to_string()]);

    let mut dialog = ExecutionDialog::new();
    let first = dialog.start("Run QC on Seven Bridges with test_sample.bam");
    assert_eq!(expect_question(&first), PlanField::Project);
    let second = dialog.answer("alice/study").expect("dialog active");
    assert_eq!(expect_question(&second), PlanField::InstanceSize);
    assert!(dialog.is_active());
    assert_eq!(dialog.awaiting_field(), Some(PlanField::InstanceSize));
}

#[test]
fn file_names_never_fill_the_platform_or_module() {
    let plan = ExecutionPlan::from_request("run this on sb with aws_genotyping_cohort.bam");
    assert_eq!(plan.platform, None);
    assert_eq!(plan.module, None);
    assert_eq!(plan.files, vec!["aws_genotyping_cohort.bam".to_string()]);
}

#[test]
fn word_pairs_are_not_projects() {
    let plan = ExecutionPlan::from_request("run and/or process sample1.bam on cgc");
    assert_eq!(plan.project, None);
    assert_eq!(plan.platform, Some(Platform::Cgc));

    let named = ExecutionPlan::from_request("run and/or process sample1.bam on cgc in alice/cohort");
    assert_eq!(named.project.as_deref(), Some("alice/cohort"));
}
