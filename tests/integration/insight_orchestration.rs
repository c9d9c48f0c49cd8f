//! Integration tests for insight orchestration and its failure policy

use super::test_utils::{fail, gate, ok, ScriptedClient};
use skyinsight::error::{ApiError, InsightError};
use skyinsight::insight::fallback::EXAMPLE_MARKER;
use skyinsight::insight::{fallback_references, InsightOrchestrator, ObjectName, MAX_REFERENCES};
use std::error::Error as _;
use std::sync::Arc;

fn name(raw: &str) -> ObjectName {
    ObjectName::parse(raw).unwrap()
}

#[tokio::test]
async fn test_betelgeuse_both_calls_succeed() {
    let client = Arc::new(
        ScriptedClient::new()
            .narrative(ok("Betelgeuse is a red supergiant..."))
            .references(ok(
                "Ref one\nRef two\n\n   \nRef three\nRef four\nRef five",
            )),
    );
    let orch = InsightOrchestrator::new(client.clone());

    let result = orch.get_insights(&name("Betelgeuse")).await.unwrap();

    assert_eq!(result.narrative(), "Betelgeuse is a red supergiant...");
    assert_eq!(result.references().len(), MAX_REFERENCES);
    assert_eq!(
        &result.references()[..],
        ["Ref one", "Ref two", "Ref three", "Ref four"]
    );
    assert!(!result.references().is_fallback());

    let prompts = client.prompts();
    assert_eq!(prompts.len(), 2);
    assert!(prompts.iter().all(|p| p.contains("Betelgeuse")));
}

#[tokio::test]
async fn test_sn1987a_narrative_failure_is_fatal() {
    let client = Arc::new(
        ScriptedClient::new()
            .narrative(fail("connection reset"))
            .references(ok("Ref one")),
    );
    let orch = InsightOrchestrator::new(client.clone());

    let err = orch.get_insights(&name("SN 1987A")).await.unwrap_err();

    assert_eq!(err.to_string(), "Failed to generate insights. Please try again.");
    assert!(matches!(
        err,
        InsightError::GenerationFailed(ApiError::ProviderRequestFailed(_))
    ));
    assert!(err.source().unwrap().to_string().contains("connection reset"));
    // The reference call still ran; its result is discarded.
    assert_eq!(client.prompts().len(), 2);
}

#[tokio::test]
async fn test_narrative_failure_wins_over_reference_failure() {
    let client = Arc::new(
        ScriptedClient::new()
            .narrative(fail("quota exceeded"))
            .references(fail("quota exceeded")),
    );
    let orch = InsightOrchestrator::new(client);

    let err = orch.get_insights(&name("SN 1987A")).await.unwrap_err();
    assert!(matches!(err, InsightError::GenerationFailed(_)));
}

#[tokio::test]
async fn test_m31_reference_failure_uses_fallback() {
    let client = Arc::new(
        ScriptedClient::new()
            .narrative(ok("M31 is the Andromeda Galaxy."))
            .references(fail("service unavailable")),
    );
    let orch = InsightOrchestrator::new(client);
    let m31 = name("M31");

    let result = orch.get_insights(&m31).await.unwrap();

    assert_eq!(result.narrative(), "M31 is the Andromeda Galaxy.");
    assert_eq!(result.references(), &fallback_references(&m31));
    assert_eq!(result.references().len(), 4);
    for reference in result.references().iter() {
        assert!(reference.contains("M31"));
        assert!(reference.contains(EXAMPLE_MARKER));
    }
}

#[tokio::test]
async fn test_short_reference_reply_is_not_padded() {
    let client = Arc::new(
        ScriptedClient::new()
            .narrative(ok("Vega."))
            .references(ok("\nOnly one reference\n\n")),
    );
    let orch = InsightOrchestrator::new(client);

    let result = orch.get_insights(&name("Vega")).await.unwrap();
    assert_eq!(&result.references()[..], ["Only one reference"]);
}

#[tokio::test]
async fn test_empty_narrative_is_a_success() {
    let client = Arc::new(
        ScriptedClient::new()
            .narrative(ok(""))
            .references(ok("Ref")),
    );
    let orch = InsightOrchestrator::new(client);

    let result = orch.get_insights(&name("Vega")).await.unwrap();
    assert_eq!(result.narrative(), "");
}

#[tokio::test]
async fn test_calls_are_dispatched_concurrently() {
    let (narrative_tx, narrative_reply) = gate();
    let (references_tx, references_reply) = gate();
    let client = Arc::new(
        ScriptedClient::new()
            .narrative(narrative_reply)
            .references(references_reply),
    );
    let orch = InsightOrchestrator::new(client.clone());
    let vega = name("Vega");

    let driver = async {
        // Both requests are in flight before either has completed.
        assert_eq!(client.prompts().len(), 2);
        references_tx.send(Ok("Ref A\nRef B".to_string())).unwrap();
        tokio::task::yield_now().await;
        narrative_tx.send(Ok("Vega narrative".to_string())).unwrap();
    };

    let (result, ()) = futures::join!(orch.get_insights(&vega), driver);
    let result = result.unwrap();
    assert_eq!(result.narrative(), "Vega narrative");
    assert_eq!(&result.references()[..], ["Ref A", "Ref B"]);
}

#[tokio::test]
async fn test_summarize_data_passes_text_through() {
    let client = Arc::new(ScriptedClient::new().narrative(ok("Key findings: periodic dimming.")));
    let orch = InsightOrchestrator::new(client.clone());

    let summary = orch
        .summarize_data("Algol photometry, 2.87 day period")
        .await
        .unwrap();

    assert_eq!(summary, "Key findings: periodic dimming.");
    let prompts = client.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Algol photometry, 2.87 day period"));
}

#[tokio::test]
async fn test_summarize_data_failure_has_fixed_message() {
    let client = Arc::new(ScriptedClient::new().narrative(fail("timeout")));
    let orch = InsightOrchestrator::new(client);

    let err = orch.summarize_data("data").await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to summarize data. Please try again.");
}
