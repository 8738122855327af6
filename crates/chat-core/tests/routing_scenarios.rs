// crates/chat-core/tests/routing_scenarios.rs
use chat_core::{classify, ContentFilter, Inbound};

#[test]
fn private_message_keeps_spaces_in_body() {
    let filter = ContentFilter::default();
    assert_eq!(
        classify("/msg alice hello there", &filter),
        Inbound::Private {
            target: "alice",
            content: "hello there",
        }
    );
    assert_eq!(
        classify("/msg alice  two  spaces", &filter),
        Inbound::Private {
            target: "alice",
            content: " two  spaces",
        }
    );
}

#[test]
fn private_message_without_body_is_malformed() {
    let filter = ContentFilter::default();
    assert_eq!(classify("/msg", &filter), Inbound::MalformedPrivate);
    assert_eq!(classify("/msg alice", &filter), Inbound::MalformedPrivate);
    assert_eq!(classify("/msg alice ", &filter), Inbound::MalformedPrivate);
}

#[test]
fn whitespace_only_body_is_still_delivered() {
    let filter = ContentFilter::default();
    assert_eq!(
        classify("/msg alice   ", &filter),
        Inbound::Private {
            target: "alice",
            content: "  ",
        }
    );
}

#[test]
fn msg_must_be_its_own_token() {
    let filter = ContentFilter::default();
    assert_eq!(classify("/msgalice hi there", &filter), Inbound::Broadcast);
    assert_eq!(classify("bob: /msg alice hi", &filter), Inbound::Broadcast);
}

#[test]
fn private_messages_take_priority_over_filter() {
    let filter = ContentFilter::default();
    assert_eq!(
        classify("/msg alice BadWord", &filter),
        Inbound::Private {
            target: "alice",
            content: "BadWord",
        }
    );
}

#[test]
fn filter_is_case_insensitive_substring() {
    let filter = ContentFilter::default();
    assert_eq!(classify("bob: what a BADWORDy day", &filter), Inbound::Filtered);
    assert_eq!(classify("bob: all good", &filter), Inbound::Broadcast);
}

#[test]
fn filter_from_csv_drops_empties() {
    let filter = ContentFilter::from_csv(" Spam, ,eggs ,");
    assert_eq!(filter.words(), &["spam".to_string(), "eggs".to_string()]);
    assert!(filter.is_blocked("GREEN EGGS"));
    assert!(!filter.is_blocked("badword"));

    let empty = ContentFilter::from_csv("");
    assert!(!empty.is_blocked("anything"));
}
