mod common;

use std::time::Duration;

use common::{fakes, Calls, EmbedBehaviour, FakeLlm, FakeRetriever};
use sahaya_prompt::SystemInstruction;
use sahaya_rag::{ChatOrchestrator, RagError, Stage, UserMessage, DEFAULT_TOP_K};

fn between<'a>(text: &'a str, start: &str, end: &str) -> &'a str {
    let from = text.find(start).expect("start marker") + start.len();
    let to = from + text[from..].find(end).expect("end marker");
    &text[from..to]
}

#[tokio::test]
async fn blank_message_is_rejected_without_upstream_calls() {
    let calls = Calls::default();
    let (e, r, l) = fakes(&calls, EmbedBehaviour::Vector(vec![0.1, 0.2]), vec!["A"]);
    let orchestrator = ChatOrchestrator::builder(e, r, l).build();

    for input in ["", "   ", "\n"] {
        let err = orchestrator.handle(input).await.unwrap_err();
        assert!(err.is_invalid_input());
        assert_eq!(err.stage(), Stage::Validate);
    }
    assert_eq!(calls.counts(), (0, 0, 0));
}

#[tokio::test]
async fn happy_path_runs_each_stage_once() {
    let calls = Calls::default();
    let (e, r, l) = fakes(
        &calls,
        EmbedBehaviour::Vector(vec![0.1, 0.2]),
        vec!["A", "B", "C", "D"],
    );
    let orchestrator = ChatOrchestrator::builder(e, r, l).build();

    let answer = orchestrator.handle("How long does it take?").await.unwrap();
    assert_eq!(answer.answer, "Here is what you need.");
    assert_eq!(calls.counts(), (1, 1, 1));
    assert_eq!(*calls.top_k.lock().unwrap(), Some(DEFAULT_TOP_K));

    let prompt = calls.last_prompt();
    assert_eq!(
        between(&prompt, "Context: ", "\n\nUser Question: "),
        "A\n\nB\n\nC"
    );
}

#[tokio::test]
async fn prompt_carries_the_single_retrieved_passage() {
    let calls = Calls::default();
    let (e, r, l) = fakes(
        &calls,
        EmbedBehaviour::Vector(vec![0.3, 0.4]),
        vec!["You need ID proof and address proof."],
    );
    let instruction = SystemInstruction::new("Help with marriage registration.").unwrap();
    let orchestrator = ChatOrchestrator::builder(e, r, l)
        .system_instruction(instruction)
        .build();

    orchestrator.handle("What documents are needed?").await.unwrap();

    let prompt = calls.last_prompt();
    assert_eq!(
        between(&prompt, "Context: ", "\n\nUser Question: "),
        "You need ID proof and address proof."
    );
    assert_eq!(
        prompt,
        "Help with marriage registration.\n\nContext: You need ID proof and address proof.\n\nUser Question: What documents are needed?"
    );
}

#[tokio::test]
async fn zero_matches_still_generates() {
    let calls = Calls::default();
    let (e, r, l) = fakes(&calls, EmbedBehaviour::Vector(vec![0.1]), vec![]);
    let orchestrator = ChatOrchestrator::builder(e, r, l).build();

    let answer = orchestrator.handle("Hello").await.unwrap();
    assert_eq!(answer.answer, "Here is what you need.");
    assert_eq!(calls.counts(), (1, 1, 1));
    assert!(calls
        .last_prompt()
        .ends_with("\n\nContext: \n\nUser Question: Hello"));
}

#[tokio::test]
async fn embedding_failure_is_an_upstream_error() {
    let calls = Calls::default();
    let (e, r, l) = fakes(&calls, EmbedBehaviour::Fail, vec!["A"]);
    let orchestrator = ChatOrchestrator::builder(e, r, l).build();

    let err = orchestrator.handle("Fees?").await.unwrap_err();
    assert!(matches!(err, RagError::Upstream { stage: Stage::Embed, .. }));
    assert!(err.to_string().contains("API key not valid"));
    assert_eq!(calls.counts(), (1, 0, 0));
}

#[tokio::test]
async fn empty_embedding_is_an_upstream_error() {
    let calls = Calls::default();
    let (e, r, l) = fakes(&calls, EmbedBehaviour::Vector(vec![]), vec!["A"]);
    let orchestrator = ChatOrchestrator::builder(e, r, l).build();

    let err = orchestrator.handle("Fees?").await.unwrap_err();
    assert!(matches!(err, RagError::Upstream { stage: Stage::Embed, .. }));
    assert_eq!(calls.counts(), (1, 0, 0));
}

#[tokio::test]
async fn retrieval_failure_stops_before_generation() {
    let calls = Calls::default();
    let (e, _, l) = fakes(&calls, EmbedBehaviour::Vector(vec![0.1]), vec![]);
    let r = FakeRetriever {
        calls: calls.clone(),
        texts: vec![],
        fail: true,
    };
    let orchestrator = ChatOrchestrator::builder(e, r, l).build();

    let err = orchestrator.handle("Fees?").await.unwrap_err();
    assert_eq!(err.stage(), Stage::Retrieve);
    assert_eq!(calls.counts(), (1, 1, 0));
}

#[tokio::test]
async fn generation_failure_is_an_upstream_error() {
    let calls = Calls::default();
    let (e, r, _) = fakes(&calls, EmbedBehaviour::Vector(vec![0.1]), vec!["A"]);
    let l = FakeLlm {
        calls: calls.clone(),
        fail: true,
    };
    let orchestrator = ChatOrchestrator::builder(e, r, l).build();

    let err = orchestrator.handle("Fees?").await.unwrap_err();
    assert!(matches!(err, RagError::Upstream { stage: Stage::Generate, .. }));
    assert_eq!(calls.counts(), (1, 1, 1));
}

#[tokio::test(start_paused = true)]
async fn hung_upstream_call_times_out() {
    let calls = Calls::default();
    let (e, r, l) = fakes(&calls, EmbedBehaviour::Hang, vec!["A"]);
    let orchestrator = ChatOrchestrator::builder(e, r, l)
        .upstream_timeout(Duration::from_secs(5))
        .build();

    let err = orchestrator.handle("Fees?").await.unwrap_err();
    assert!(matches!(err, RagError::Upstream { stage: Stage::Embed, .. }));
    assert!(err.to_string().contains("timed out after 5s"));
    assert_eq!(calls.counts(), (1, 0, 0));
}

#[tokio::test]
async fn stages_can_run_in_isolation() {
    let calls = Calls::default();
    let (e, r, l) = fakes(&calls, EmbedBehaviour::Vector(vec![0.1, 0.2]), vec!["X", "Y"]);
    let orchestrator = ChatOrchestrator::builder(e, r, l).top_k(1).build();

    let message = UserMessage::parse("Where do I apply?").unwrap();
    let embedding = orchestrator.embed(&message).await.unwrap();
    assert_eq!(embedding.as_slice(), &[0.1, 0.2]);

    let context = orchestrator.retrieve(&embedding).await.unwrap();
    assert_eq!(context.text, "X");

    let prompt = orchestrator.compose(&message, &context).unwrap();
    assert!(prompt.as_str().ends_with("Context: X\n\nUser Question: Where do I apply?"));
    assert_eq!(calls.counts(), (1, 1, 0));
}

#[tokio::test]
async fn concurrent_turns_are_independent() {
    let calls = Calls::default();
    let (e, r, l) = fakes(&calls, EmbedBehaviour::Vector(vec![0.1]), vec!["A"]);
    let orchestrator = std::sync::Arc::new(ChatOrchestrator::builder(e, r, l).build());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let orchestrator = orchestrator.clone();
            tokio::spawn(async move { orchestrator.handle(&format!("question {i}")).await })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }
    assert_eq!(calls.counts(), (8, 8, 8));
    assert_eq!(calls.prompts.lock().unwrap().len(), 8);
}
