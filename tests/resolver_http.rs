#![cfg(feature = "remote")]

use routinegrid::resolve::resolve_source;
use routinegrid::shortcode::encode_routine;
use routinegrid::{Error, HttpResolver, SectionResolver, SourceInput};

const FEED: &str = r#"[
  {"sectionId":177609,"courseCode":"CSE220","sectionName":"3","faculties":"RRK","roomName":"09A-05C",
   "sectionSchedule":{"classSchedules":[
     {"day":"SUNDAY","startTime":"09:30:00","endTime":"10:50:00"},
     {"day":"TUESDAY","startTime":"09:30:00","endTime":"10:50:00"}]}},
  {"sectionId":171234,"courseCode":"MAT215","sectionName":"12","roomName":"10F-21C","labRoomName":"10F-21L",
   "sectionSchedule":{"classSchedules":[{"day":"MONDAY","startTime":"14:00:00","endTime":"15:20:00"}]},
   "labSchedules":[{"day":"THURSDAY","startTime":"08:00:00","endTime":"10:50:00"}]}
]"#;

/// Serve `body` with `status` to exactly one request.
fn serve_once(status: u16, body: &'static str) -> String {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr();
    std::thread::spawn(move || {
        if let Ok(request) = server.recv() {
            let response = tiny_http::Response::from_string(body).with_status_code(status);
            let _ = request.respond(response);
        }
    });
    format!("http://{}/connect.json", addr)
}

#[tokio::test]
async fn looks_up_requested_sections() {
    let url = serve_once(200, FEED);
    let resolver = HttpResolver::new(url, 5_000).unwrap();
    let entries = resolver.lookup(&["171234".to_string()]).await.unwrap();
    assert_eq!(entries.len(), 1);
    let e = &entries[0];
    assert_eq!(e.course_code, "MAT215");
    assert_eq!(e.instructor, "TBA");
    assert_eq!(e.class_sessions, vec!["MON (2:00 PM-3:20 PM-10F-21C)"]);
    assert_eq!(e.lab_sessions, vec!["THU (8:00 AM-10:50 AM-10F-21L)"]);
    assert_eq!(e.lab_course_code.as_deref(), Some("MAT215L"));
}

#[tokio::test]
async fn short_code_expands_through_the_feed() {
    let url = serve_once(200, FEED);
    let resolver = HttpResolver::new(url, 5_000).unwrap();
    let input = SourceInput::new("Alice", encode_routine(&["177609"]));
    let source = resolve_source(&input, Some(&resolver)).await.unwrap();
    assert_eq!(source.display_name, "Alice");
    assert_eq!(source.entries[0].class_sessions.len(), 2);
}

#[tokio::test]
async fn unknown_sections_are_a_resolution_error() {
    let url = serve_once(200, FEED);
    let resolver = HttpResolver::new(url, 5_000).unwrap();
    let err = resolver.lookup(&["170000".to_string()]).await.unwrap_err();
    assert!(matches!(err, Error::Resolution(_)));
}

#[tokio::test]
async fn http_failure_is_a_network_error() {
    let url = serve_once(503, "unavailable");
    let resolver = HttpResolver::new(url, 5_000).unwrap();
    let err = resolver.lookup(&["177609".to_string()]).await.unwrap_err();
    assert!(matches!(err, Error::Network(_)));
}
