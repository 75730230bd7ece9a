use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use docchat::api::HttpBackend;
use docchat::controller::{
    ChatController, FlowOutcome, Message, PDF_LOADED_MESSAGE, Role, UploadStatus, View,
};
use docchat::document::UploadDocument;
use docchat::terminal::{self, repl::CHAT_BUSY_NOTICE};
use serde_json::{Value, json};
use std::io::Write;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

#[derive(Debug, Default)]
struct Recorder {
    lines: Mutex<Vec<String>>,
}

impl Recorder {
    fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    fn push(&self, line: String) {
        self.lines.lock().unwrap().push(line);
    }
}

impl View for Recorder {
    fn message_appended(&self, message: &Message) {
        self.push(format!("{:?}: {}", message.role(), message.text()));
    }
    fn typing_changed(&self, visible: bool) {
        self.push(format!("typing {visible}"));
    }
    fn status_changed(&self, status: &UploadStatus) {
        self.push(format!("status {}", status.class().unwrap_or("hidden")));
    }
    fn followup_changed(&self, followup: Option<&str>) {
        self.push(format!("followup {followup:?}"));
    }
    fn input_cleared(&self) {
        self.push("input cleared".to_string());
    }
    fn alert(&self, text: &str) {
        self.push(format!("alert {text}"));
    }
}

#[derive(Clone, Default)]
struct Stub {
    chats: Arc<Mutex<Vec<Value>>>,
    uploads: Arc<Mutex<usize>>,
    reject_upload: bool,
    slow_chat: bool,
}

async fn upload(State(stub): State<Stub>) -> (StatusCode, Json<Value>) {
    *stub.uploads.lock().unwrap() += 1;
    if stub.reject_upload {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "detail": "bad format" })),
        )
    } else {
        (StatusCode::OK, Json(json!({ "filename": "paper.pdf" })))
    }
}

async fn chat(State(stub): State<Stub>, Json(body): Json<Value>) -> Json<Value> {
    stub.chats.lock().unwrap().push(body.clone());
    if stub.slow_chat {
        tokio::time::sleep(std::time::Duration::from_millis(300)).await;
    }
    match body["question"].as_str() {
        Some("What is the summary?") => {
            Json(json!({ "answer": "It's about X.", "followup": "Want details on X?" }))
        }
        _ => Json(json!({ "answer": "Here is more." })),
    }
}

async fn start(stub: Stub) -> (Arc<ChatController<HttpBackend, Recorder>>, Arc<Recorder>) {
    let app = Router::new()
        .route("/upload-pdf/", post(upload))
        .route("/chat/", post(chat))
        .with_state(stub);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let backend = Arc::new(HttpBackend::new(format!("http://{addr}")).unwrap());
    let view = Arc::new(Recorder::default());
    let controller = Arc::new(ChatController::new(backend, Arc::clone(&view)));
    (controller, view)
}

fn pdf() -> Option<UploadDocument> {
    Some(UploadDocument::new("paper.pdf", b"%PDF-1.4".to_vec()))
}

#[tokio::test]
async fn test_upload_without_file_never_hits_network() {
    let stub = Stub::default();
    let (controller, view) = start(stub.clone()).await;

    assert_eq!(controller.submit_upload(None).await, FlowOutcome::Skipped);

    assert_eq!(*stub.uploads.lock().unwrap(), 0);
    assert!(controller.messages().is_empty());
    assert_eq!(view.lines(), vec!["alert Please select a PDF file"]);
}

#[tokio::test]
async fn test_successful_upload_confirms_once() {
    let (controller, view) = start(Stub::default()).await;

    assert_eq!(controller.submit_upload(pdf()).await, FlowOutcome::Completed);

    assert_eq!(
        view.lines(),
        vec![
            "status alert-info".to_string(),
            "status alert-success".to_string(),
            format!("Bot: {PDF_LOADED_MESSAGE}"),
        ]
    );
    let messages = controller.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].text(), PDF_LOADED_MESSAGE);
    assert!(
        controller
            .upload_status()
            .text()
            .unwrap()
            .contains("\"paper.pdf\"")
    );
}

#[tokio::test]
async fn test_rejected_upload_leaves_transcript_alone() {
    let stub = Stub {
        reject_upload: true,
        ..Stub::default()
    };
    let (controller, _view) = start(stub).await;

    assert_eq!(controller.submit_upload(pdf()).await, FlowOutcome::Failed);

    let status = controller.upload_status();
    assert_eq!(status.class(), Some("alert-danger"));
    assert!(status.text().unwrap().contains("bad format"));
    assert!(controller.messages().is_empty());
}

#[tokio::test]
async fn test_question_then_followup_round_trip() {
    let stub = Stub::default();
    let (controller, view) = start(stub.clone()).await;

    controller.submit_chat("What is the summary?").await;
    assert_eq!(
        view.lines(),
        vec![
            "User: What is the summary?",
            "input cleared",
            "followup None",
            "typing true",
            "typing false",
            "Bot: It's about X.",
            "followup Some(\"Want details on X?\")",
        ]
    );
    assert_eq!(
        controller.pending_followup().as_deref(),
        Some("Want details on X?")
    );

    assert_eq!(controller.accept_followup().await, FlowOutcome::Completed);
    assert_eq!(controller.pending_followup(), None);

    let sent = stub.chats.lock().unwrap().clone();
    assert_eq!(
        sent[1],
        json!({ "question": "", "use_followup": true, "followup_text": "Want details on X?" })
    );

    let transcript: Vec<_> = controller
        .messages()
        .iter()
        .map(|m| (m.role(), m.text().to_string()))
        .collect();
    assert_eq!(
        transcript,
        vec![
            (Role::User, "What is the summary?".to_string()),
            (Role::Bot, "It's about X.".to_string()),
            (Role::User, "Want details on X?".to_string()),
            (Role::Bot, "Here is more.".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_repl_drives_controller() {
    let stub = Stub::default();
    let (controller, _view) = start(stub.clone()).await;

    let mut file = NamedTempFile::with_suffix(".pdf").unwrap();
    file.write_all(b"%PDF-1.4").unwrap();

    let script = format!(
        "/upload {}\nWhat is the summary?\n/help\n/bogus\n/quit\nignored after quit\n",
        file.path().display()
    );
    let mut out = Vec::new();
    terminal::run(Arc::clone(&controller), script.as_bytes(), &mut out)
        .await
        .unwrap();

    assert_eq!(*stub.uploads.lock().unwrap(), 1);
    assert_eq!(stub.chats.lock().unwrap().len(), 1);

    let messages = controller.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages.iter().filter(|m| m.role() == Role::User).count(), 1);
    assert!(messages.iter().any(|m| m.text() == PDF_LOADED_MESSAGE));
    assert!(!controller.is_chat_in_flight());

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains("/upload <file.pdf>"));
    assert!(printed.contains("Unknown command /bogus"));
}

#[tokio::test]
async fn test_repl_reports_unreadable_file() {
    let stub = Stub::default();
    let (controller, _view) = start(stub.clone()).await;

    let mut out = Vec::new();
    terminal::run(
        Arc::clone(&controller),
        "/upload /no/such/file.pdf\n".as_bytes(),
        &mut out,
    )
    .await
    .unwrap();

    assert_eq!(*stub.uploads.lock().unwrap(), 0);
    assert!(String::from_utf8(out).unwrap().contains("Cannot read /no/such/file.pdf"));
}

#[tokio::test]
async fn test_repl_reports_question_refused_while_answer_pending() {
    let stub = Stub {
        slow_chat: true,
        ..Stub::default()
    };
    let (controller, view) = start(stub.clone()).await;

    let mut out = Vec::new();
    terminal::run(
        Arc::clone(&controller),
        "first question\nsecond question\n".as_bytes(),
        &mut out,
    )
    .await
    .unwrap();

    assert_eq!(stub.chats.lock().unwrap().len(), 1);
    assert_eq!(
        view.lines()
            .iter()
            .filter(|line| line.starts_with("User: "))
            .count(),
        1
    );

    let printed = String::from_utf8(out).unwrap();
    assert!(printed.contains(CHAT_BUSY_NOTICE));
    let sent = stub.chats.lock().unwrap()[0]["question"]
        .as_str()
        .unwrap()
        .to_string();
    let refused = if sent == "first question" {
        "second question"
    } else {
        "first question"
    };
    assert!(printed.contains(&format!("question not sent: {refused}")));
}

#[tokio::test]
async fn test_startup_upload_of_missing_file_is_reported() {
    let stub = Stub::default();
    let (controller, _view) = start(stub.clone()).await;

    let mut out = Vec::new();
    let outcome = terminal::repl::upload_file(
        &*controller,
        std::path::Path::new("/no/such/startup.pdf"),
        &mut out,
    )
    .await
    .unwrap();

    assert_eq!(outcome, FlowOutcome::Skipped);
    assert_eq!(*stub.uploads.lock().unwrap(), 0);
    assert!(
        String::from_utf8(out)
            .unwrap()
            .starts_with("Cannot read /no/such/startup.pdf: ")
    );
}

#[tokio::test]
async fn test_startup_upload_submits_readable_file() {
    let stub = Stub::default();
    let (controller, _view) = start(stub.clone()).await;

    let mut file = NamedTempFile::with_suffix(".pdf").unwrap();
    file.write_all(b"%PDF-1.4").unwrap();

    let mut out = Vec::new();
    let outcome = terminal::repl::upload_file(&*controller, file.path(), &mut out)
        .await
        .unwrap();

    assert_eq!(outcome, FlowOutcome::Completed);
    assert_eq!(*stub.uploads.lock().unwrap(), 1);
    assert!(out.is_empty());
}
