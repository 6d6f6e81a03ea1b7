//! Encoding-layer laws exercised through the public API.

use ssmix_hl7::{escape, unescape, FieldValue, Message, Segment};

#[test]
fn escape_round_trips_for_any_data() {
    let samples = [
        "",
        "plain",
        "A|B^C\\D",
        "~&|^\\",
        "日本語テキスト",
        "半角ｶﾅと|記号^混在~データ&終端\\",
    ];
    for sample in samples {
        let encoded = escape(sample);
        assert_eq!(unescape(&encoded).unwrap(), sample, "round trip of {sample:?}");
    }
}

#[test]
fn each_encoding_character_is_escaped_exactly_once() {
    let encoded = escape("|^~\\&");
    assert_eq!(encoded, "\\F\\\\S\\\\R\\\\E\\\\T\\");
    assert_eq!(encoded.matches('\\').count(), 10);
}

#[test]
fn the_three_absence_states_are_distinct_on_the_wire() {
    let mut seg = Segment::new("RXE").unwrap();
    seg.push(FieldValue::Empty)
        .push(FieldValue::Null)
        .push(FieldValue::datum("50"));
    assert_eq!(seg.encode(), "RXE||\"\"|50");
}

#[test]
fn messages_are_cr_framed_and_free_of_line_feeds() {
    let mut message = Message::new();
    let mut header = Segment::msh();
    header.push("HIS123");
    message.push(header);
    let mut pid = Segment::new("PID").unwrap();
    pid.push("0001").push_empty(1).push("患者データ");
    message.push(pid);

    let text = String::from_utf8(message.encode()).unwrap();
    assert!(!text.contains('\n'));
    let segments: Vec<&str> = text.split('\r').collect();
    assert_eq!(segments.len(), 3);
    assert!(segments[2].is_empty(), "every segment ends with CR");
}
