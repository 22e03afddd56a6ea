//! End-to-end properties of the chat session state machine.

use datachat::api::{DataPoint, QueryResponse, Visualization};
use datachat::chat::{ChatSession, Origin};
use datachat::components::ChartSpec;
use pretty_assertions::assert_eq;

fn loaded_session() -> ChatSession {
    let mut s = ChatSession::new();
    s.datasets_loaded(vec!["csgo".to_string(), "twitch".to_string()]);
    s
}

#[test]
fn transcript_is_monotonic_across_arbitrary_switch_sequences() {
    let mut s = loaded_session();
    let switches = [
        "twitch", "csgo", "csgo", "twitch", "bogus", "twitch", "csgo",
    ];
    let mut prev_len = 0;
    for name in switches {
        let before = s.transcript().len();
        let switched = s.switch_dataset(name);
        let after = s.transcript().len();
        // Each switch appends exactly one announcement; no-ops append none.
        assert_eq!(after - before, usize::from(switched));
        assert!(after >= prev_len);
        prev_len = after;
    }
}

#[test]
fn each_switch_appends_at_most_one_summary() {
    let mut s = loaded_session();
    s.switch_dataset("twitch");
    let before = s.transcript().len();
    // Two racing fetches land with identical content in the same minute.
    s.summary_loaded("twitch", "columns: viewers, hours");
    s.summary_loaded("twitch", "columns: viewers, hours");
    assert_eq!(s.transcript().len(), before + 1);
}

#[test]
fn full_query_cycle_success() {
    let mut s = loaded_session();
    assert_eq!(s.begin_query("top player?").as_deref(), Some("csgo"));
    assert!(s.awaiting_response());
    assert_eq!(s.transcript().last().unwrap().origin, Origin::User);

    let response = QueryResponse {
        query: Some("df.nlargest(1, 'kills')".to_string()),
        result: serde_json::json!([{"player": "s1mple"}]),
        humanized_response: "The top player is s1mple.".to_string(),
        visualization: Some(Visualization {
            chart_type: Some("bar".to_string()),
            data_points: Some(vec![
                DataPoint {
                    name: "A".to_string(),
                    value: 1.0,
                },
                DataPoint {
                    name: "B".to_string(),
                    value: 2.0,
                },
            ]),
        }),
    };
    s.complete_query(response);

    assert!(!s.awaiting_response());
    assert_eq!(
        s.transcript().last().unwrap().content,
        "The top player is s1mple."
    );

    // The retained response drives the renderer.
    let spec = ChartSpec::from_response(s.last_response().unwrap()).unwrap();
    assert_eq!(
        spec,
        ChartSpec::Bar {
            labels: vec!["A".to_string(), "B".to_string()],
            values: vec![1.0, 2.0],
        }
    );
}

#[test]
fn full_query_cycle_failure_keeps_prior_response() {
    let mut s = loaded_session();
    s.begin_query("first").unwrap();
    s.complete_query(QueryResponse {
        query: None,
        result: serde_json::Value::Null,
        humanized_response: "fine".to_string(),
        visualization: None,
    });
    let prior = s.last_response().cloned();

    s.begin_query("second").unwrap();
    let before = s.transcript().len();
    s.fail_query();

    assert!(!s.awaiting_response());
    assert_eq!(s.transcript().len(), before + 1);
    assert_eq!(s.transcript().last().unwrap().origin, Origin::Chat);
    assert_eq!(s.last_response(), prior.as_ref());
}

#[test]
fn unsupported_chart_type_names_the_tag() {
    let response = QueryResponse {
        query: None,
        result: serde_json::Value::Null,
        humanized_response: "chart time".to_string(),
        visualization: Some(Visualization {
            chart_type: Some("pie".to_string()),
            data_points: Some(vec![DataPoint {
                name: "A".to_string(),
                value: 1.0,
            }]),
        }),
    };
    match ChartSpec::from_response(&response) {
        Some(ChartSpec::Unsupported { tag }) => assert_eq!(tag, "pie"),
        other => panic!("expected unsupported spec, got {other:?}"),
    }
}
